pub mod cashback;
mod common;
pub mod invest;
pub mod overview;
pub mod spending;

pub mod aggregate;
pub mod commands;
pub mod contracts;
pub mod error;
pub mod greeting;
pub mod invest;
pub mod quotes;
pub mod rank;
pub mod report;
pub mod settings;
pub mod table;
pub mod window;

pub use contracts::envelope::SuccessEnvelope;
pub use error::{ReportError, ReportResult};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

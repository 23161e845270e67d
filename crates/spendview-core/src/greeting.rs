use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPeriod {
    Night,
    Morning,
    Day,
    Evening,
}

impl DayPeriod {
    /// `[0,6)` night, `[6,12)` morning, `[12,18)` day, `[18,24)` evening.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => Self::Night,
            6..=11 => Self::Morning,
            12..=17 => Self::Day,
            _ => Self::Evening,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreetingLabels {
    pub night: String,
    pub morning: String,
    pub day: String,
    pub evening: String,
}

impl Default for GreetingLabels {
    fn default() -> Self {
        Self {
            night: "Доброй ночи".to_string(),
            morning: "Доброе утро".to_string(),
            day: "Добрый день".to_string(),
            evening: "Добрый вечер".to_string(),
        }
    }
}

impl GreetingLabels {
    pub fn label(&self, period: DayPeriod) -> &str {
        match period {
            DayPeriod::Night => &self.night,
            DayPeriod::Morning => &self.morning,
            DayPeriod::Day => &self.day,
            DayPeriod::Evening => &self.evening,
        }
    }
}

pub fn greeting(reference: &NaiveDateTime, labels: &GreetingLabels) -> String {
    labels
        .label(DayPeriod::from_hour(reference.hour()))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{DayPeriod, GreetingLabels};

    #[test]
    fn band_edges() {
        let cases = [
            (0, DayPeriod::Night),
            (3, DayPeriod::Night),
            (5, DayPeriod::Night),
            (6, DayPeriod::Morning),
            (11, DayPeriod::Morning),
            (12, DayPeriod::Day),
            (17, DayPeriod::Day),
            (18, DayPeriod::Evening),
            (21, DayPeriod::Evening),
            (23, DayPeriod::Evening),
        ];
        for (hour, expected) in cases {
            assert_eq!(DayPeriod::from_hour(hour), expected, "hour {hour}");
        }
    }

    #[test]
    fn default_labels() {
        let labels = GreetingLabels::default();
        assert_eq!(labels.label(DayPeriod::Morning), "Доброе утро");
        assert_eq!(labels.label(DayPeriod::Evening), "Добрый вечер");
    }
}

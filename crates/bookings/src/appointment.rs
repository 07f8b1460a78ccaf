//! Request types for the typed booking helpers.

use std::{fmt, str::FromStr};

use {
    chrono::{NaiveDate, NaiveDateTime},
    serde::{Deserialize, Serialize},
};

/// `30-Apr-2019`
pub const DATE_FORMAT: &str = "%d-%b-%Y";
/// `30-Apr-2019 14:30:00`
pub const DATE_TIME_FORMAT: &str = "%d-%b-%Y %H:%M:%S";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_date_time(at: NaiveDateTime) -> String {
    at.format(DATE_TIME_FORMAT).to_string()
}

/// Customer block, sent as a JSON string inside the form body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

/// A new appointment. Service and staff fall back to the configured
/// resources when unset.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub from_time: NaiveDateTime,
    pub customer: CustomerDetails,
    pub time_zone: Option<String>,
    pub notes: Option<String>,
    pub service_id: Option<String>,
    pub staff_id: Option<String>,
}

impl NewAppointment {
    pub fn new(from_time: NaiveDateTime, customer: CustomerDetails) -> Self {
        Self {
            from_time,
            customer,
            time_zone: None,
            notes: None,
            service_id: None,
            staff_id: None,
        }
    }
}

/// Status transitions accepted by `updateappointment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentAction {
    Cancel,
    Completed,
    NoShow,
}

impl AppointmentAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cancel => "cancel",
            Self::Completed => "completed",
            Self::NoShow => "noshow",
        }
    }
}

impl fmt::Display for AppointmentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cancel" => Ok(Self::Cancel),
            "completed" => Ok(Self::Completed),
            "noshow" | "no-show" => Ok(Self::NoShow),
            other => Err(format!(
                "unknown appointment action `{other}` (expected cancel, completed or noshow)"
            )),
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zoho_dates() {
        let date = NaiveDate::from_ymd_opt(2019, 4, 30).unwrap();
        assert_eq!(format_date(date), "30-Apr-2019");
        let at = date.and_hms_opt(14, 30, 0).unwrap();
        assert_eq!(format_date_time(at), "30-Apr-2019 14:30:00");
    }

    #[test]
    fn action_parsing() {
        assert_eq!("cancel".parse::<AppointmentAction>().unwrap(), AppointmentAction::Cancel);
        assert_eq!("No-Show".parse::<AppointmentAction>().unwrap(), AppointmentAction::NoShow);
        assert!("reschedule".parse::<AppointmentAction>().is_err());
        assert_eq!(
            serde_json::to_value(AppointmentAction::NoShow).unwrap(),
            "noshow"
        );
    }
}

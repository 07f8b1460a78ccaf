use std::{fmt, str::FromStr};

use {
    reqwest::Method,
    serde::{Deserialize, Serialize},
};

/// A named Bookings API action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Book,
    Get,
    Update,
    Reschedule,
    Availability,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown booking operation: {0}")]
pub struct UnknownOperation(pub String);

impl Operation {
    pub const ALL: [Operation; 5] = [
        Self::Book,
        Self::Get,
        Self::Update,
        Self::Reschedule,
        Self::Availability,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::Get => "get",
            Self::Update => "update",
            Self::Reschedule => "reschedule",
            Self::Availability => "availability",
        }
    }

    /// Path segment appended to the Bookings base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::Book => "appointment",
            Self::Get => "getappointment",
            Self::Update => "updateappointment",
            Self::Reschedule => "rescheduleappointment",
            Self::Availability => "availableslots",
        }
    }

    /// Reads send their payload as query parameters, everything else as a
    /// form body.
    pub fn is_read(self) -> bool {
        matches!(self, Self::Availability)
    }

    pub fn method(self) -> Method {
        if self.is_read() { Method::GET } else { Method::POST }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

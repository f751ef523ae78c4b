//! Outcome classification shared by repositories, interactors and responses.
//!
//! Numeric values mirror common HTTP status codes so a presentation layer
//! can map them one to one. The mapping itself is not performed here.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Closed set of outcome classifications.
///
/// `Found` doubles as the "insert target already exists" failure signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum OperationStatus {
    Ok,
    Created,
    NoContent,
    Found,
    BadRequest,
    NotAuthenticated,
    NotAuthorized,
    NotFound,
    InternalError,
}

const ALL_STATUSES: [OperationStatus; 9] = [
    OperationStatus::Ok,
    OperationStatus::Created,
    OperationStatus::NoContent,
    OperationStatus::Found,
    OperationStatus::BadRequest,
    OperationStatus::NotAuthenticated,
    OperationStatus::NotAuthorized,
    OperationStatus::NotFound,
    OperationStatus::InternalError,
];

impl OperationStatus {
    /// Numeric code of this status.
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::NoContent => 204,
            Self::Found => 302,
            Self::BadRequest => 400,
            Self::NotAuthenticated => 401,
            Self::NotAuthorized => 403,
            Self::NotFound => 404,
            Self::InternalError => 500,
        }
    }

    /// Stable display name.
    pub fn description(self) -> &'static str {
        match self {
            Self::Ok => "Ok",
            Self::Created => "Created",
            Self::NoContent => "NoContent",
            Self::Found => "Found",
            Self::BadRequest => "BadRequest",
            Self::NotAuthenticated => "NotAuthenticated",
            Self::NotAuthorized => "NotAuthorized",
            Self::NotFound => "NotFound",
            Self::InternalError => "InternalError",
        }
    }

    /// Resolves a numeric code. Unknown codes yield `None`.
    pub fn from_code(code: u16) -> Option<Self> {
        ALL_STATUSES
            .into_iter()
            .find(|status| status.code() == code)
    }

    /// Whether this status reports a completed request with no error attached.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Ok | Self::Created | Self::NoContent)
    }
}

impl Display for OperationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl From<OperationStatus> for u16 {
    fn from(value: OperationStatus) -> Self {
        value.code()
    }
}

impl TryFrom<u16> for OperationStatus {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::from_code(value)
            .ok_or_else(|| format!("The status value '{value}' does not exist in the enumeration."))
    }
}

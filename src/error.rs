//! Error types for the Toronto Hydro to InfluxDB2 exporter.
//!
//! Each component has its own error enum so callers can decide, per failure
//! kind, whether to skip a day, abort a meter, or abort the whole cycle.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias using our custom error types.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error type that encompasses all application errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("configuration error")]
    Config(#[from] ConfigError),

    /// Portal communication and parsing errors
    #[error("portal error")]
    Portal(#[from] PortalError),

    /// Generic errors that don't fit other categories
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration value is invalid
    #[error("invalid configuration value for {field}: {message}")]
    Invalid { field: String, message: String },
}

/// Failure of a single HTTP exchange with the portal.
#[derive(Error, Debug)]
pub enum RequestError {
    /// Network or connection failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The portal answered with something other than 200
    #[error("unexpected status {status}")]
    Status { status: u16 },

    /// The body could not be decoded
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Portal session, discovery and fetch errors.
#[derive(Error, Debug)]
pub enum PortalError {
    /// Login page did not contain the expected form
    #[error("login form '{element_id}' not found on login page")]
    LoginFormNotFound { element_id: String },

    /// Login page fetch or credential submission failed
    #[error("login failed")]
    LoginFailed(#[source] RequestError),

    /// Logout request failed
    #[error("logout failed")]
    LogoutFailed(#[source] RequestError),

    /// Meter list could not be fetched or decoded
    #[error("meter list unavailable")]
    MeterListUnavailable(#[source] RequestError),

    /// Hourly data request failed
    #[error("hourly data unavailable for meter {meter} on {date}")]
    DataUnavailable {
        meter: String,
        date: NaiveDate,
        #[source]
        source: RequestError,
    },

    /// Hourly data could not be parsed
    #[error("malformed payload")]
    MalformedPayload(#[from] PayloadError),

    /// Hourly data carried an hour label that could not be resolved
    #[error("malformed time slot")]
    MalformedTimeSlot(#[from] TimeSlotError),

    /// A configured or extracted URL could not be parsed
    #[error("invalid portal URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

/// CSV payload errors.
#[derive(Error, Debug)]
pub enum PayloadError {
    /// CSV structure is broken (e.g. rows of unequal length)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row
    #[error("missing column '{0}'")]
    MissingColumn(String),

    /// A cell could not be parsed as a number
    #[error("failed to parse number from '{text}' in column '{column}'")]
    NumberParse { column: String, text: String },
}

/// Hour label resolution errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimeSlotError {
    /// Label is not one of the 24 known hour labels
    #[error("unrecognized time slot label '{0}'")]
    Malformed(String),

    /// Label resolves to a wall-clock time skipped by a DST transition
    #[error("local time {date} {hour}:00 does not exist in {zone}")]
    NonexistentLocalTime {
        date: NaiveDate,
        hour: u32,
        zone: String,
    },
}

/// InfluxDB storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Range query for existing points failed
    #[error("failed to query existing points: {0}")]
    QueryFailed(String),

    /// Write operation failed
    #[error("failed to write {count} data points: {message}")]
    WriteFailed { count: usize, message: String },

    /// Invalid data point
    #[error("invalid data point: {0}")]
    InvalidDataPoint(String),
}

/// Reconciliation precondition and store errors.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// Called with nothing to reconcile
    #[error("no records to reconcile for meter {0}")]
    EmptyBatch(String),

    /// Batch contains a record belonging to another meter
    #[error("record for meter {found} in batch for meter {expected}")]
    ForeignRecord { expected: String, found: String },

    /// Store query or write failed
    #[error(transparent)]
    Store(#[from] StorageError),
}

impl ConfigError {
    /// Creates a new invalid configuration error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl RequestError {
    /// Creates a status error from an HTTP status code.
    pub fn status(status: reqwest::StatusCode) -> Self {
        Self::Status {
            status: status.as_u16(),
        }
    }

    /// Returns the HTTP status code when the failure was a status error.
    #[cfg(test)]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status } => Some(*status),
            _ => None,
        }
    }
}

impl PortalError {
    /// Creates a login form not found error.
    pub fn login_form_not_found(element_id: impl Into<String>) -> Self {
        Self::LoginFormNotFound {
            element_id: element_id.into(),
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: err.to_string(),
        }
    }
}

impl PayloadError {
    /// Creates a number parse error.
    pub fn number_parse(column: impl Into<String>, text: impl Into<String>) -> Self {
        Self::NumberParse {
            column: column.into(),
            text: text.into(),
        }
    }
}

impl StorageError {
    /// Creates a query failed error.
    pub fn query_failed(err: impl std::fmt::Display) -> Self {
        Self::QueryFailed(err.to_string())
    }

    /// Creates a write failed error.
    pub fn write_failed(count: usize, err: impl std::fmt::Display) -> Self {
        Self::WriteFailed {
            count,
            message: err.to_string(),
        }
    }
}

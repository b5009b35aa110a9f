use std::path::PathBuf;
use thiserror::Error;

const COOKIE_HINT: &str =
    "possible reason is a missing or invalid session cookie, expected in AOC_SESSION";

#[derive(Debug, Error)]
pub enum AocError {
    #[error("{name} env variable missing, should contain the {purpose}")]
    MissingConfiguration {
        name: &'static str,
        purpose: &'static str,
    },

    #[error("year and day not set, defaults revert to today and today ({today}) is not Dec 1-25")]
    OutOfSeason { today: chrono::NaiveDate },

    #[error("invalid year and/or day provided: year={year:?}, day={day:?}")]
    InvalidDateRange { year: Option<i32>, day: Option<i64> },

    #[error("error in request from {url}: status = {status}")]
    AuthenticationOrServerError {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("identification needed for server at {url}")]
    AuthenticationRequired { url: String },

    #[error("could not write {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl AocError {
    /// Likely cause, logged at debug level next to the error itself.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            AocError::AuthenticationOrServerError { .. } | AocError::AuthenticationRequired { .. } => {
                Some(COOKIE_HINT)
            }
            AocError::OutOfSeason { .. } => Some("pass --year and --day explicitly"),
            AocError::MissingConfiguration { .. } => Some("variables may also be set in a .env file"),
            _ => None,
        }
    }
}

/// Reasons a decoded tracking code fails acceptance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid QR code: year {year} outside {min}..={max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("invalid QR code: tracking number {0:?} has no separator")]
    MalformedTrackingNumber(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("token is not a three-part JWT")]
    MalformedToken,

    #[error("token claims could not be decoded: {0}")]
    InvalidClaims(String),

    #[error("token has no subject")]
    MissingSubject,

    #[error("no stored token")]
    NoToken,
}

#[derive(Debug, thiserror::Error)]
pub enum DoctrackError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}

impl DoctrackError {
    /// Validation failures are recoverable; the caller keeps scanning.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DoctrackError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, DoctrackError>;

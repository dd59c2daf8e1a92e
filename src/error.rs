use thiserror::Error;

/// Failures surfaced to callers. Malformed lines in the persisted tables are
/// never reported through this type; they are skipped on load and dropped on
/// rewrite (recovery by omission).
#[derive(Error, Debug)]
pub enum SrmsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("roll {0} already exists")]
    DuplicateKey(u32),

    #[error("no record for roll {0}")]
    NotFound(u32),

    #[error("mark {value} for {subject} is outside 0-100")]
    OutOfRange { subject: &'static str, value: f32 },

    #[error("invalid subject index: {0}")]
    InvalidSubject(usize),

    #[error("complaint text is empty")]
    EmptyComplaint,

    #[error("no active complaint for roll {0}")]
    NoComplaint(u32),

    #[error("wrong roll number or password")]
    AuthenticationFailed,

    #[error("password must be at least {min} characters (got {got})")]
    PasswordTooShort { min: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, SrmsError>;

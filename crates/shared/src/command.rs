use crate::mealplan::Day;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no active user identity")]
    InvalidIdentity,

    #[error("persistence failure: {0}")]
    Persistence(#[source] anyhow::Error),

    #[error("day {0} not found in meal plan")]
    DayNotFound(Day),

    #[error("no eligible recipes for any meal type")]
    EmptyPool,

    #[error("{0}")]
    Validate(#[from] validator::ValidationErrors),

    #[error("recipe id {0} already exists")]
    DuplicateId(String),

    #[error("{0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Persistence(value.into())
    }
}

#[cfg(feature = "full")]
impl From<sqlx::Error> for Error {
    fn from(value: sqlx::Error) -> Self {
        Self::Persistence(value.into())
    }
}

#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::Server(format!($msg)))
    };
    ($err:expr $(,)?) => {
        return Err($crate::Error::Server(format!($err)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::Server(format!($fmt, $($arg)*)))
    };
}

#[macro_export]
macro_rules! invalid_identity {
    () => {
        return Err($crate::Error::InvalidIdentity)
    };
}

use thiserror::Error;
use unblas_abi::AbiError;
use unblas_accelerate_api::Unsupported;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure carries the name of the operation it came from.
#[derive(Debug, Error)]
pub enum Error {
    /// A logical argument rule was broken; nothing was called.
    #[error("{func}: invalid argument: {condition}")]
    Precondition { func: &'static str, condition: String },

    /// A size, stride or leading dimension does not fit the native integer.
    #[error("{func}: {arg} = {value} exceeds the native integer maximum {max}")]
    Overflow {
        func: &'static str,
        arg: &'static str,
        value: i64,
        max: i64,
    },

    /// No backend, no library, or no such kernel in the one that is loaded.
    #[error("{func}: unavailable: {what}")]
    Unavailable { func: &'static str, what: String },

    /// The native library or runtime reported a failure.
    #[error("{func}: {call} failed: {source}")]
    Native {
        func: &'static str,
        call: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("configuration error: {0:#}")]
    Config(anyhow::Error),
}

impl Error {
    /// Name of the operation that failed, when there is one.
    pub fn func(&self) -> Option<&'static str> {
        match self {
            Error::Precondition { func, .. }
            | Error::Overflow { func, .. }
            | Error::Unavailable { func, .. }
            | Error::Native { func, .. } => Some(func),
            Error::Config(_) => None,
        }
    }

    pub(crate) fn unavailable(func: &'static str, what: impl Into<String>) -> Self {
        Error::Unavailable {
            func,
            what: what.into(),
        }
    }

    pub(crate) fn abi(func: &'static str, err: AbiError) -> Self {
        match err {
            AbiError::ProfileLocked { .. } | AbiError::IntWidthMismatch { .. } => {
                Error::Config(err.into())
            }
            other => Error::unavailable(func, other.to_string()),
        }
    }

    /// Wrap a provider error; operations the provider lacks are `Unavailable`.
    pub(crate) fn provider(func: &'static str, call: String, err: anyhow::Error) -> Self {
        if let Some(unsupported) = err.downcast_ref::<Unsupported>() {
            return Error::unavailable(func, unsupported.to_string());
        }
        Error::Native {
            func,
            call,
            source: err.into(),
        }
    }
}

use thiserror::Error;
use tracing::error;

use crate::backend::BackendError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The record API answered with `success: false`
    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    InvalidId(&'static str),

    #[error("Failed to decode {label} record: {source}")]
    Decode {
        label: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Collapse a failed operation into its empty value after logging it.
///
/// Services are best-effort: callers get `[]`, `None` or `false` and the
/// cause only ends up in the log.
pub(crate) trait OrLog<T> {
    fn or_log(self, context: impl FnOnce() -> String) -> T;
}

impl<T: Default> OrLog<T> for Result<T, ServiceError> {
    fn or_log(self, context: impl FnOnce() -> String) -> T {
        match self {
            Ok(value) => value,
            Err(ServiceError::Rejected(message)) => {
                error!("{}", message);
                T::default()
            }
            Err(ServiceError::Backend(err)) => {
                match err.backend_message() {
                    Some(message) => error!("{}: {}", context(), message),
                    None => error!("{}: {}", context(), err),
                }
                T::default()
            }
            Err(err) => {
                error!("{}: {}", context(), err);
                T::default()
            }
        }
    }
}

//! Error types for backend operations.

use thiserror::Error;

/// Error type for backend operations.
///
/// This enum categorizes errors that can occur while talking to a store so the
/// cache can report them without knowing the store's own error types.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Internal backend error, state or computation error.
    ///
    /// Any error not related to network interaction.
    #[error(transparent)]
    InternalError(Box<dyn std::error::Error + Send + Sync>),

    /// Network interaction error.
    ///
    /// Errors occurring during communication with remote stores.
    #[error(transparent)]
    ConnectionError(Box<dyn std::error::Error + Send + Sync>),
}

impl BackendError {
    /// Wraps any error as an [`BackendError::InternalError`].
    pub fn internal<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::InternalError(error.into())
    }

    /// Wraps any error as a [`BackendError::ConnectionError`].
    pub fn connection<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::ConnectionError(error.into())
    }
}

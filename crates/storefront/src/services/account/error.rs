//! Account error types.

use thiserror::Error;

/// Errors from account operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    /// Email or password was left blank.
    #[error("Please fill in all fields")]
    MissingCredentials,

    /// The operation needs a signed-in user.
    #[error("not logged in")]
    NotLoggedIn,
}

//! Error taxonomy for store operations.
//!
//! # Design
//! Every rejection is terminal for the request that caused it. The variants
//! map one-to-one onto HTTP statuses in the server crate; the message carried
//! by `NotFound`, `Conflict` and `BadRequest` is the text sent back in the
//! `{"error": ...}` body. `Forbidden` carries no message because the quota
//! rejection is answered with an empty body.

use thiserror::Error;

pub const USER_NOT_FOUND: &str = "User not found!";
pub const USERNAME_TAKEN: &str = "Username already exists";
pub const ALREADY_PRO: &str = "Pro plan is already activated.";
pub const INVALID_USER: &str = "must be a valid user!";
pub const INVALID_UUID: &str = "must be a valid uuid!";
pub const INVALID_TODO: &str = "must be a valid Todo!";
pub const TODO_NOT_FOUND: &str = "Todo not found";

/// Errors returned by `Store` operations and resolution checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The addressed user or todo does not exist.
    #[error("{0}")]
    NotFound(&'static str),

    /// The request collides with existing state: a taken username, or a user
    /// that is already pro.
    #[error("{0}")]
    Conflict(&'static str),

    /// A non-pro user has reached the todo quota.
    #[error("todo quota exceeded")]
    Forbidden,

    /// The todo id in the path is not a well-formed UUID.
    #[error("{0}")]
    BadRequest(&'static str),
}

impl Error {
    /// Message for the JSON error body, `None` when the response carries no body.
    pub fn message(&self) -> Option<&'static str> {
        match *self {
            Error::NotFound(msg) | Error::Conflict(msg) | Error::BadRequest(msg) => Some(msg),
            Error::Forbidden => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

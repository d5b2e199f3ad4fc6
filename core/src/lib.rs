//! Domain core of the users & todos service.
//!
//! # Overview
//! Holds the data model, the error taxonomy and the in-memory `Store` with
//! every operation the HTTP layer exposes. Nothing here performs I/O; the
//! server crate owns the runtime, the lock around the store and the mapping
//! of `Error` onto HTTP responses.
//!
//! # Design
//! - `Store` is an owned value injected into handlers, not a global.
//! - Request guards (user lookup by id or by `username` header, quota check,
//!   todo existence check) return typed handles (`UserRef`, `TodoRef`) that
//!   the mutating operations take explicitly.
//! - Deadlines are parsed leniently; an unparseable one is kept and rendered
//!   as `null`.

pub mod deadline;
pub mod error;
pub mod store;
pub mod types;

pub use deadline::Deadline;
pub use error::{Error, Result};
pub use store::{Store, TodoRef, UserRef};
pub use types::{CreateUser, Todo, TodoInput, User, TODO_QUOTA};

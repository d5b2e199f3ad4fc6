//! In-memory store of users and their todos.
//!
//! # Design
//! `Store` is a plain owned value: the server wraps it in a lock and hands a
//! guard to each handler, tests create a fresh one per case. Lookups are
//! linear scans over `Vec`s, in insertion order.
//!
//! The request guards of the HTTP layer are the `find_*`/`check_*` methods.
//! Instead of attaching entities to the request they return `UserRef` and
//! `TodoRef` handles that the mutating operations take as arguments. Users
//! are never removed, so a `UserRef` is `Copy`. A `TodoRef` is not: it is
//! borrowed by the operations that keep the todo and consumed by
//! `delete_todo`, so the handle of a removed todo cannot be reused. Todo
//! handles resolved before a deletion in the same user's list must be
//! resolved again.

use uuid::{Uuid, Variant};

use crate::deadline::Deadline;
use crate::error::{
    Error, Result, ALREADY_PRO, INVALID_TODO, INVALID_USER, INVALID_UUID, TODO_NOT_FOUND,
    USERNAME_TAKEN, USER_NOT_FOUND,
};
use crate::types::{CreateUser, Todo, TodoInput, User};

/// A resolved user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserRef(usize);

/// A resolved todo together with its owner.
#[derive(Debug, PartialEq, Eq)]
pub struct TodoRef {
    user: UserRef,
    todo: usize,
}

impl TodoRef {
    pub fn user(&self) -> UserRef {
        self.user
    }
}

#[derive(Debug, Default)]
pub struct Store {
    users: Vec<User>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, user: UserRef) -> &User {
        &self.users[user.0]
    }

    pub fn todo(&self, todo: &TodoRef) -> &Todo {
        &self.users[todo.user.0].todos[todo.todo]
    }

    fn todo_mut(&mut self, todo: &TodoRef) -> &mut Todo {
        &mut self.users[todo.user.0].todos[todo.todo]
    }

    /// Register a new user. Usernames are compared case-sensitively.
    pub fn create_user(&mut self, input: CreateUser) -> Result<&User> {
        if self.users.iter().any(|user| user.username == input.username) {
            return Err(Error::Conflict(USERNAME_TAKEN));
        }
        self.users.push(User::new(input.name, input.username));
        let created = self.users.len() - 1;
        Ok(&self.users[created])
    }

    /// Resolve a user from the raw `{id}` path segment. Anything that is not
    /// the id of a stored user, malformed or not, is `NotFound`.
    pub fn find_user_by_id(&self, id: &str) -> Result<UserRef> {
        self.users
            .iter()
            .position(|user| id_matches(&user.id, id))
            .map(UserRef)
            .ok_or(Error::NotFound(USER_NOT_FOUND))
    }

    /// Resolve the account named by the `username` header.
    pub fn find_user_by_username(&self, username: Option<&str>) -> Result<UserRef> {
        self.position_of_username(username)
            .map(UserRef)
            .ok_or(Error::NotFound(USER_NOT_FOUND))
    }

    fn position_of_username(&self, username: Option<&str>) -> Option<usize> {
        let username = username?;
        self.users.iter().position(|user| user.username == username)
    }

    /// One-way switch to the pro plan.
    pub fn upgrade_to_pro(&mut self, user: UserRef) -> Result<&User> {
        let user = &mut self.users[user.0];
        if user.pro {
            return Err(Error::Conflict(ALREADY_PRO));
        }
        user.pro = true;
        Ok(user)
    }

    pub fn check_todo_quota(&self, user: UserRef) -> Result<()> {
        if self.user(user).can_add_todo() {
            Ok(())
        } else {
            Err(Error::Forbidden)
        }
    }

    /// Resolve a todo from the `username` header and the raw `{id}` path
    /// segment. Checks run in order and stop at the first failure: the user
    /// must exist, the id must be a canonical UUID, and the user must own a
    /// todo with that id.
    pub fn check_todo_exists(&self, username: Option<&str>, id: &str) -> Result<TodoRef> {
        let user = self
            .position_of_username(username)
            .ok_or(Error::NotFound(INVALID_USER))?;
        if !is_valid_uuid(id) {
            return Err(Error::BadRequest(INVALID_UUID));
        }
        let todo = self.users[user]
            .todos
            .iter()
            .position(|todo| id_matches(&todo.id, id))
            .ok_or(Error::NotFound(INVALID_TODO))?;
        Ok(TodoRef {
            user: UserRef(user),
            todo,
        })
    }

    pub fn list_todos(&self, user: UserRef) -> &[Todo] {
        &self.user(user).todos
    }

    /// Append a todo. The quota is not checked here, see `check_todo_quota`.
    pub fn create_todo(&mut self, user: UserRef, input: TodoInput) -> &Todo {
        let todos = &mut self.users[user.0].todos;
        todos.push(Todo::new(input));
        let created = todos.len() - 1;
        &todos[created]
    }

    /// Overwrite title and deadline; `done`, `created_at` and `id` are kept.
    pub fn update_todo(&mut self, todo: &TodoRef, input: TodoInput) -> &Todo {
        let todo = self.todo_mut(todo);
        todo.title = input.title;
        todo.deadline = Deadline::parse(input.deadline.as_deref());
        todo
    }

    pub fn mark_todo_done(&mut self, todo: &TodoRef) -> &Todo {
        let todo = self.todo_mut(todo);
        todo.done = true;
        todo
    }

    /// Remove `todo` from `user`'s list, matching by todo id. Consumes the
    /// handle.
    pub fn delete_todo(&mut self, user: UserRef, todo: TodoRef) -> Result<Todo> {
        let id = self.todo(&todo).id;
        let todos = &mut self.users[user.0].todos;
        let index = todos
            .iter()
            .position(|candidate| candidate.id == id)
            .ok_or(Error::NotFound(TODO_NOT_FOUND))?;
        Ok(todos.remove(index))
    }
}

/// Canonical hyphenated form, RFC 4122 variant and version 1 to 5, or the nil
/// UUID. Case-insensitive.
pub fn is_valid_uuid(raw: &str) -> bool {
    if raw.len() != 36 {
        return false;
    }
    match Uuid::try_parse(raw) {
        Ok(uuid) if uuid.is_nil() => true,
        Ok(uuid) => {
            uuid.get_variant() == Variant::RFC4122 && matches!(uuid.get_version_num(), 1..=5)
        }
        Err(_) => false,
    }
}

// Ids are compared against their lowercase string form, so an uppercase path
// segment passes `is_valid_uuid` but never matches a stored id.
fn id_matches(id: &Uuid, raw: &str) -> bool {
    let mut buf = Uuid::encode_buffer();
    let encoded: &str = id.hyphenated().encode_lower(&mut buf);
    encoded == raw
}

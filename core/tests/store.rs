//! Business-rule scenarios driven through the public `Store` API.
//!
//! Each test walks the same path the HTTP layer takes: resolve the caller,
//! run the guard checks, then apply the operation.

use todo_core::{CreateUser, Error, Store, TodoInput, UserRef, TODO_QUOTA};

fn register(store: &mut Store, name: &str, username: &str) -> UserRef {
    store
        .create_user(CreateUser {
            name: name.to_string(),
            username: username.to_string(),
        })
        .unwrap();
    store.find_user_by_username(Some(username)).unwrap()
}

/// Quota check followed by creation, as `POST /todos` does it.
fn add_todo(store: &mut Store, username: &str, title: &str) -> Result<String, Error> {
    let user = store.find_user_by_username(Some(username))?;
    store.check_todo_quota(user)?;
    let todo = store.create_todo(
        user,
        TodoInput {
            title: title.to_string(),
            deadline: Some("2025-01-01".to_string()),
        },
    );
    Ok(todo.id.to_string())
}

#[test]
fn every_new_user_starts_plain() {
    let mut store = Store::new();
    for (name, username) in [("A", "a"), ("B", "b"), ("C", "c")] {
        let user = register(&mut store, name, username);
        assert!(!store.user(user).pro);
        assert!(store.list_todos(user).is_empty());
    }
    assert_eq!(store.users().len(), 3);
}

#[test]
fn eleventh_todo_forbidden_until_upgrade() {
    let mut store = Store::new();
    let user = register(&mut store, "A", "a");

    for n in 0..TODO_QUOTA {
        add_todo(&mut store, "a", &format!("todo {n}")).unwrap();
    }
    assert_eq!(add_todo(&mut store, "a", "one too many"), Err(Error::Forbidden));
    assert_eq!(store.list_todos(user).len(), TODO_QUOTA);

    let id = store.user(user).id.to_string();
    let by_id = store.find_user_by_id(&id).unwrap();
    store.upgrade_to_pro(by_id).unwrap();

    for n in 0..5 {
        add_todo(&mut store, "a", &format!("pro todo {n}")).unwrap();
    }
    assert_eq!(store.list_todos(user).len(), TODO_QUOTA + 5);
}

#[test]
fn second_upgrade_is_conflict() {
    let mut store = Store::new();
    let user = register(&mut store, "A", "a");
    store.upgrade_to_pro(user).unwrap();
    assert!(matches!(store.upgrade_to_pro(user), Err(Error::Conflict(_))));
}

#[test]
fn quota_is_per_user() {
    let mut store = Store::new();
    register(&mut store, "A", "a");
    register(&mut store, "B", "b");
    for n in 0..TODO_QUOTA {
        add_todo(&mut store, "a", &format!("todo {n}")).unwrap();
    }
    assert_eq!(add_todo(&mut store, "a", "blocked"), Err(Error::Forbidden));
    assert!(add_todo(&mut store, "b", "allowed").is_ok());
}

#[test]
fn delete_then_recreate_frees_quota() {
    let mut store = Store::new();
    let user = register(&mut store, "A", "a");
    let mut ids = Vec::new();
    for n in 0..TODO_QUOTA {
        ids.push(add_todo(&mut store, "a", &format!("todo {n}")).unwrap());
    }

    let todo = store.check_todo_exists(Some("a"), &ids[3]).unwrap();
    store.delete_todo(user, todo).unwrap();
    assert_eq!(store.list_todos(user).len(), TODO_QUOTA - 1);
    assert!(store
        .list_todos(user)
        .iter()
        .all(|todo| todo.id.to_string() != ids[3]));

    add_todo(&mut store, "a", "replacement").unwrap();
    assert_eq!(add_todo(&mut store, "a", "blocked"), Err(Error::Forbidden));
}

#[test]
fn unknown_user_cannot_add_todos() {
    let mut store = Store::new();
    assert!(matches!(
        add_todo(&mut store, "ghost", "t"),
        Err(Error::NotFound(_))
    ));
}

//! HTTP surface of the users & todos service.
//!
//! Routes resolve the caller (by path id or by the `username` header) against
//! the shared `Store`, run the guard checks and apply one store operation,
//! all under a single lock acquisition per request.

pub mod config;
pub mod error;

use std::{future::Future, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, patch, post, put},
    Json, Router,
};
use todo_core::{CreateUser, Store, Todo, TodoInput, User};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub use error::{ApiError, ErrorBody};

/// Request header naming the acting account.
pub const USERNAME_HEADER: &str = "username";

pub type Db = Arc<RwLock<Store>>;

type ApiResult<T> = Result<T, ApiError>;

pub fn app() -> Router {
    app_with_store(Store::new())
}

pub fn app_with_store(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/users", post(create_user))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/pro", patch(upgrade_to_pro))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
        .route("/todos/{id}/done", patch(mark_todo_done))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn run_with_shutdown<F>(listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app())
        .with_graceful_shutdown(shutdown)
        .await
}

/// Decode a todo body. Called only after the guards have passed, so a
/// malformed body never masks a 404/403/400. Anything that does not decode as
/// a todo object reads as an empty input.
fn todo_input(body: &[u8]) -> TodoInput {
    serde_json::from_slice(body).unwrap_or_default()
}

fn username(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(USERNAME_HEADER)
        .and_then(|value| value.to_str().ok())
}

async fn create_user(
    State(db): State<Db>,
    Json(input): Json<CreateUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let mut store = db.write().await;
    let user = store.create_user(input)?.clone();
    info!(user_id = %user.id, username = %user.username, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<User>> {
    let store = db.read().await;
    let user = store.find_user_by_id(&id)?;
    Ok(Json(store.user(user).clone()))
}

async fn upgrade_to_pro(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<User>> {
    let mut store = db.write().await;
    let user = store.find_user_by_id(&id)?;
    let user = store.upgrade_to_pro(user)?;
    info!(user_id = %user.id, "user upgraded to pro");
    Ok(Json(user.clone()))
}

async fn list_todos(State(db): State<Db>, headers: HeaderMap) -> ApiResult<Json<Vec<Todo>>> {
    let store = db.read().await;
    let user = store.find_user_by_username(username(&headers))?;
    Ok(Json(store.list_todos(user).to_vec()))
}

async fn create_todo(
    State(db): State<Db>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    let mut store = db.write().await;
    let user = store.find_user_by_username(username(&headers))?;
    store.check_todo_quota(user)?;
    let todo = store.create_todo(user, todo_input(&body)).clone();
    info!(todo_id = %todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Todo>> {
    let mut store = db.write().await;
    let todo = store.check_todo_exists(username(&headers), &id)?;
    Ok(Json(store.update_todo(&todo, todo_input(&body)).clone()))
}

async fn mark_todo_done(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<Todo>> {
    let mut store = db.write().await;
    let todo = store.check_todo_exists(username(&headers), &id)?;
    Ok(Json(store.mark_todo_done(&todo).clone()))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    let user = store.find_user_by_username(username(&headers))?;
    let todo = store.check_todo_exists(username(&headers), &id)?;
    let removed = store.delete_todo(user, todo)?;
    info!(todo_id = %removed.id, "todo deleted");
    Ok(StatusCode::NO_CONTENT)
}

use axum::extract::{Form, Path};
use axum::response::{Html, Redirect};
use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use tracing::info;

use crate::db::repository;
use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;
use crate::views;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_todos))
        .route("/create/", get(create_form).post(create_todo))
        .route("/update/{id}/", get(update_form).post(update_todo))
        .route("/delete/{id}/", get(confirm_delete).post(delete_todo))
        .route("/toggle/{id}/", get(toggle_todo))
        .route("/api/todos", get(list_todos_json))
        .route("/health", get(health))
        .with_state(state)
}

fn back_to_list() -> Redirect {
    Redirect::to("/")
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn list_todos(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let todos = repository::fetch_todos(&state.db).await?;
    Ok(Html(views::render_list(&state.templates, &todos)?))
}

async fn list_todos_json(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = repository::fetch_todos(&state.db).await?;
    Ok(Json(todos))
}

async fn create_form(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(views::render_form(&state.templates, "Create", None)?))
}

async fn create_todo(
    State(state): State<AppState>,
    Form(form): Form<TodoForm>,
) -> Result<Redirect, AppError> {
    let todo = repository::insert_todo(&state.db, form.into_new()).await?;
    info!("created todo {}", todo.id);
    Ok(back_to_list())
}

async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let todo = repository::find_todo_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Html(views::render_form(
        &state.templates,
        "Update",
        Some(&todo),
    )?))
}

async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<TodoForm>,
) -> Result<Redirect, AppError> {
    repository::update_todo(&state.db, &id, form.into_update())
        .await?
        .ok_or(AppError::NotFound)?;
    info!("updated todo {}", id);
    Ok(back_to_list())
}

async fn confirm_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let todo = repository::find_todo_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Html(views::render_confirm_delete(&state.templates, &todo)?))
}

async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let ok = repository::delete_todo(&state.db, &id).await?;
    if ok {
        info!("deleted todo {}", id);
        Ok(back_to_list())
    } else {
        Err(AppError::NotFound)
    }
}

async fn toggle_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let todo = repository::toggle_todo(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    info!("todo {} completed = {}", todo.id, todo.completed);
    Ok(back_to_list())
}

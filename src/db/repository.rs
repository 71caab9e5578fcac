use chrono::{SecondsFormat, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{NewTodo, Todo, UpdateTodo};

/// Fixed-width UTC timestamp, so string order matches time order.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn touch(todo: &mut Todo) {
    let now = now_timestamp();
    todo.updated_at = if now < todo.created_at {
        todo.created_at.clone()
    } else {
        now
    };
}

pub async fn fetch_todos(db: &SqlitePool) -> Result<Vec<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>(
        r#"
        SELECT id, title, description, completed, created_at, updated_at
        FROM todos
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn find_todo_by_id(db: &SqlitePool, id: &str) -> Result<Option<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>(
        "SELECT id, title, description, completed, created_at, updated_at FROM todos WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_todo(db: &SqlitePool, req: NewTodo) -> Result<Todo, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = now_timestamp();

    sqlx::query(
        r#"
        INSERT INTO todos
            (id, title, description, completed, created_at, updated_at)
        VALUES (?1, ?2, ?3, 0, ?4, ?5)
        "#,
    )
    .bind(&id)
    .bind(&req.title)
    .bind(&req.description)
    .bind(&now)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Todo {
        id,
        title: req.title,
        description: req.description,
        completed: false,
        created_at: now.clone(),
        updated_at: now,
    })
}

pub async fn update_todo(
    db: &SqlitePool,
    id: &str,
    req: UpdateTodo,
) -> Result<Option<Todo>, sqlx::Error> {
    let mut current = match find_todo_by_id(db, id).await? {
        Some(t) => t,
        None => return Ok(None),
    };

    current.title = req.title;
    current.description = req.description;
    current.completed = req.completed;
    touch(&mut current);

    sqlx::query(
        r#"
        UPDATE todos
        SET title = ?1,
            description = ?2,
            completed = ?3,
            updated_at = ?4
        WHERE id = ?5
        "#,
    )
    .bind(&current.title)
    .bind(&current.description)
    .bind(current.completed)
    .bind(&current.updated_at)
    .bind(id)
    .execute(db)
    .await?;

    Ok(Some(current))
}

pub async fn toggle_todo(db: &SqlitePool, id: &str) -> Result<Option<Todo>, sqlx::Error> {
    let mut current = match find_todo_by_id(db, id).await? {
        Some(t) => t,
        None => return Ok(None),
    };

    current.completed = !current.completed;
    touch(&mut current);

    sqlx::query("UPDATE todos SET completed = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(current.completed)
        .bind(&current.updated_at)
        .bind(id)
        .execute(db)
        .await?;

    Ok(Some(current))
}

pub async fn delete_todo(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;

    async fn setup_test_db() -> SqlitePool {
        connect_in_memory()
            .await
            .expect("Failed to create test db")
    }

    #[tokio::test]
    async fn test_insert_with_title_only() {
        let pool = setup_test_db().await;

        let todo = insert_todo(&pool, NewTodo::new("Test Todo"))
            .await
            .expect("Failed to insert todo");

        assert_eq!(todo.title, "Test Todo");
        assert_eq!(todo.description, "");
        assert!(!todo.completed);
        assert_eq!(todo.created_at, todo.updated_at);

        let stored = find_todo_by_id(&pool, &todo.id)
            .await
            .expect("Failed to fetch todo")
            .expect("Todo not found");
        assert_eq!(stored.description, "");
        assert!(!stored.completed);
    }

    #[tokio::test]
    async fn test_insert_accepts_empty_title() {
        let pool = setup_test_db().await;

        let todo = insert_todo(&pool, NewTodo::new("").with_description("Test"))
            .await
            .expect("Failed to insert todo");

        assert_eq!(todo.title, "");
        assert_eq!(todo.description, "Test");
    }

    #[tokio::test]
    async fn test_fetch_todos_newest_first() {
        let pool = setup_test_db().await;

        for title in ["A", "B", "C"] {
            insert_todo(&pool, NewTodo::new(title))
                .await
                .expect("Failed to insert todo");
        }

        let todos = fetch_todos(&pool).await.expect("Failed to fetch todos");
        let titles: Vec<&str> = todos.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "B", "A"]);
    }

    #[tokio::test]
    async fn test_update_todo_overwrites_fields() {
        let pool = setup_test_db().await;

        let todo = insert_todo(
            &pool,
            NewTodo::new("Original Title").with_description("Original Description"),
        )
        .await
        .expect("Failed to insert todo");

        let updated = update_todo(
            &pool,
            &todo.id,
            UpdateTodo {
                title: "Updated Title".to_string(),
                description: "Updated Description".to_string(),
                completed: true,
            },
        )
        .await
        .expect("Failed to update todo")
        .expect("Todo not found");

        assert_eq!(updated.title, "Updated Title");
        assert_eq!(updated.description, "Updated Description");
        assert!(updated.completed);
        assert_eq!(updated.created_at, todo.created_at);
        assert!(updated.created_at <= updated.updated_at);

        let stored = find_todo_by_id(&pool, &todo.id)
            .await
            .expect("Failed to fetch todo")
            .expect("Todo not found");
        assert_eq!(stored.title, "Updated Title");
        assert!(stored.completed);
    }

    #[tokio::test]
    async fn test_update_missing_todo() {
        let pool = setup_test_db().await;

        let result = update_todo(
            &pool,
            "does-not-exist",
            UpdateTodo {
                title: "x".to_string(),
                description: String::new(),
                completed: false,
            },
        )
        .await
        .expect("Failed to run update");

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let pool = setup_test_db().await;

        let todo = insert_todo(&pool, NewTodo::new("Toggle me"))
            .await
            .expect("Failed to insert todo");

        let once = toggle_todo(&pool, &todo.id)
            .await
            .expect("Failed to toggle todo")
            .expect("Todo not found");
        assert!(once.completed);

        let twice = toggle_todo(&pool, &todo.id)
            .await
            .expect("Failed to toggle todo")
            .expect("Todo not found");
        assert_eq!(twice.completed, todo.completed);
        assert!(twice.updated_at >= once.updated_at);
    }

    #[tokio::test]
    async fn test_toggle_missing_todo() {
        let pool = setup_test_db().await;

        let result = toggle_todo(&pool, "does-not-exist")
            .await
            .expect("Failed to run toggle");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_todo() {
        let pool = setup_test_db().await;

        let keep = insert_todo(&pool, NewTodo::new("Keep"))
            .await
            .expect("Failed to insert todo");
        let gone = insert_todo(&pool, NewTodo::new("Delete"))
            .await
            .expect("Failed to insert todo");

        assert!(delete_todo(&pool, &gone.id).await.expect("Failed to delete"));

        let found = find_todo_by_id(&pool, &gone.id)
            .await
            .expect("Failed to fetch todo");
        assert!(found.is_none());

        let todos = fetch_todos(&pool).await.expect("Failed to fetch todos");
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, keep.id);

        // 二回目は対象なし
        assert!(!delete_todo(&pool, &gone.id).await.expect("Failed to delete"));
    }
}

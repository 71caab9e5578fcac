use std::sync::Arc;

use sqlx::SqlitePool;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub templates: Arc<Tera>,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Result<Self, tera::Error> {
        let templates = crate::views::templates()?;
        Ok(Self {
            db,
            templates: Arc::new(templates),
        })
    }
}

use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use super::Document;
use crate::db::memory_pool;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SearchHit {
    pub filename: String,
    pub content: String,
    /// Higher is more relevant.
    pub score: f64,
}

impl SearchHit {
    /// First `max_chars` characters of the content on a single line.
    pub fn preview(&self, max_chars: usize) -> String {
        self.content
            .chars()
            .take(max_chars)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect()
    }
}

/// Full-text index over [`Document`]s. Tokenizing and ranking belong to the
/// implementation.
#[async_trait]
pub trait TextIndex: Send + Sync {
    /// Replaces the indexed corpus with `documents`.
    async fn fit(&self, documents: Vec<Document>) -> Result<(), sqlx::Error>;

    /// Best `num_results` hits for `query`, most relevant first.
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchHit>, sqlx::Error>;
}

/// [`TextIndex`] backed by an SQLite FTS5 table ranked with bm25.
/// `content` is tokenized; `filename` is stored as an unindexed keyword.
pub struct SqliteFtsIndex {
    db: SqlitePool,
}

impl SqliteFtsIndex {
    pub async fn new(db: SqlitePool) -> Result<Self, sqlx::Error> {
        // FTS5 CREATE has no IF NOT EXISTS guard of its own
        let exists: bool = sqlx::query_scalar(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'docs_fts'",
        )
        .fetch_one(&db)
        .await?;

        if !exists {
            sqlx::query("CREATE VIRTUAL TABLE docs_fts USING fts5(filename UNINDEXED, content)")
                .execute(&db)
                .await?;
        }

        Ok(Self { db })
    }

    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        Self::new(memory_pool().await?).await
    }
}

#[async_trait]
impl TextIndex for SqliteFtsIndex {
    async fn fit(&self, documents: Vec<Document>) -> Result<(), sqlx::Error> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM docs_fts").execute(&mut *tx).await?;

        for doc in &documents {
            sqlx::query("INSERT INTO docs_fts (filename, content) VALUES (?1, ?2)")
                .bind(&doc.filename)
                .bind(&doc.content)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await
    }

    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchHit>, sqlx::Error> {
        let Some(match_expr) = build_match_expression(query) else {
            return Ok(Vec::new());
        };
        if num_results == 0 {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, SearchHit>(
            r#"
            SELECT filename, content, -bm25(docs_fts) AS score
            FROM docs_fts
            WHERE docs_fts MATCH ?1
            ORDER BY bm25(docs_fts), filename
            LIMIT ?2
            "#,
        )
        .bind(match_expr)
        .bind(i64::try_from(num_results).unwrap_or(i64::MAX))
        .fetch_all(&self.db)
        .await
    }
}

/// Quotes each whitespace-separated term and ORs them, so free text never
/// trips FTS5 query syntax and any term can match.
fn build_match_expression(query: &str) -> Option<String> {
    let terms: Vec<String> = query
        .split_whitespace()
        .map(|term| format!("\"{}\"", term.replace('"', "\"\"")))
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" OR "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(filename: &str, content: &str) -> Document {
        Document {
            content: content.to_string(),
            filename: filename.to_string(),
        }
    }

    async fn fitted_index() -> SqliteFtsIndex {
        let index = SqliteFtsIndex::in_memory().await.expect("index");
        index
            .fit(vec![
                doc("README.md", "FastMCP makes building servers simple."),
                doc(
                    "examples/testing_demo/README.md",
                    "This demo shows a testing demo. Run the demo with pytest.",
                ),
                doc("docs/servers/context.mdx", "The context object, see the demo."),
                doc("docs/settings.mdx", "Settings reference."),
            ])
            .await
            .expect("fit");
        index
    }

    #[test]
    fn match_expression_quotes_terms() {
        assert_eq!(build_match_expression("   "), None);
        assert_eq!(
            build_match_expression("demo \"quoted\" x-y"),
            Some("\"demo\" OR \"\"\"quoted\"\"\" OR \"x-y\"".to_string())
        );
    }

    #[tokio::test]
    async fn most_relevant_document_comes_first() {
        let index = fitted_index().await;

        let hits = index.search("demo", 5).await.expect("search");

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].filename, "examples/testing_demo/README.md");
        assert_eq!(hits[1].filename, "docs/servers/context.mdx");
        assert!(hits[0].score >= hits[1].score);
    }

    #[tokio::test]
    async fn num_results_limits_hits() {
        let index = fitted_index().await;

        let hits = index.search("demo context settings", 1).await.expect("search");
        assert_eq!(hits.len(), 1);

        assert!(index.search("demo", 0).await.expect("search").is_empty());
    }

    #[tokio::test]
    async fn blank_query_returns_nothing() {
        let index = fitted_index().await;
        assert!(index.search("  ", 5).await.expect("search").is_empty());
    }

    #[tokio::test]
    async fn fit_replaces_previous_corpus() {
        let index = fitted_index().await;
        index
            .fit(vec![doc("only.md", "nothing relevant")])
            .await
            .expect("refit");

        assert!(index.search("demo", 5).await.expect("search").is_empty());
        let hits = index.search("relevant", 5).await.expect("search");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].filename, "only.md");
    }

    #[test]
    fn preview_is_single_line_and_bounded() {
        let hit = SearchHit {
            filename: "a.md".to_string(),
            content: "line one\nline two".to_string(),
            score: 1.0,
        };
        assert_eq!(hit.preview(10), "line one l");
        assert_eq!(hit.preview(100), "line one line two");
    }
}

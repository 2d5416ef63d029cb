use crate::model::{Figure, NewFigure};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No row matches the id, or the id can never have been generated (`< 1`).
    #[error("record not found")]
    NotFound,
    /// The row exists but its version no longer matches the one the caller read.
    #[error("edit conflict on figure {0}")]
    Conflict(i64),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for figure rows.
///
/// Implementations must reject ids below 1 with [`StoreError::NotFound`]
/// without touching storage.
#[async_trait::async_trait]
pub trait FigureStore: Send + Sync {
    /// Insert a row and return it with `id`, `created_at` and `version` populated.
    async fn create(&self, figure: NewFigure) -> StoreResult<Figure>;
    async fn get(&self, id: i64) -> StoreResult<Figure>;
    /// Persist the mutable fields of `figure`, bump the version by one and
    /// return the new version. With `expected_version` set, the write only
    /// happens if the stored version still equals it.
    async fn update(&self, figure: &Figure, expected_version: Option<i32>) -> StoreResult<i32>;
    async fn delete(&self, id: i64) -> StoreResult<()>;
}

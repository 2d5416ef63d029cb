//! Figure use cases: validation and error classification over a [`FigureStore`].
//!
//! Invalid input never reaches the store, and ids below 1 are answered with
//! `NotFound` without a storage call.

use std::sync::Arc;

use thiserror::Error;

use crate::logic::validate::{validate_figure, FieldErrors, Validator};
use crate::model::{Figure, NewFigure};
use crate::store::traits::{FigureStore, StoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("figure not found")]
    NotFound,
    #[error("validation failed: {0:?}")]
    ValidationFailed(FieldErrors),
    #[error("edit conflict on figure {0}")]
    Conflict(i64),
    #[error("internal error: {0:#}")]
    Internal(anyhow::Error),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ServiceError::NotFound,
            StoreError::Conflict(id) => ServiceError::Conflict(id),
            StoreError::Storage(e) => ServiceError::Internal(e),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub struct FigureService<S: FigureStore> {
    store: Arc<S>,
}

impl<S: FigureStore> Clone for FigureService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: FigureStore> FigureService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn create_figure(&self, figure: NewFigure) -> ServiceResult<Figure> {
        check(&figure)?;

        let created = self.store.create(figure).await?;
        log::debug!("Created figure {} (version {})", created.id, created.version);
        Ok(created)
    }

    pub async fn get_figure(&self, id: i64) -> ServiceResult<Figure> {
        if id < 1 {
            return Err(ServiceError::NotFound);
        }
        Ok(self.store.get(id).await?)
    }

    /// Replace all mutable fields of figure `id`.
    ///
    /// When `expected_version` is given it must equal the stored version,
    /// both when the record is read and when it is written; otherwise the
    /// call fails with [`ServiceError::Conflict`]. Without it the last writer
    /// wins.
    pub async fn update_figure(
        &self,
        id: i64,
        changes: NewFigure,
        expected_version: Option<i32>,
    ) -> ServiceResult<Figure> {
        if id < 1 {
            return Err(ServiceError::NotFound);
        }

        let mut figure = self.store.get(id).await?;
        if let Some(expected) = expected_version {
            if figure.version != expected {
                log::warn!(
                    "Figure {} is at version {}, caller expected {}",
                    id,
                    figure.version,
                    expected
                );
                return Err(ServiceError::Conflict(id));
            }
        }

        check(&changes)?;
        figure.apply(changes);

        figure.version = match self.store.update(&figure, expected_version).await {
            Ok(version) => version,
            Err(StoreError::Conflict(id)) => {
                log::warn!("Figure {} changed while being updated", id);
                return Err(ServiceError::Conflict(id));
            }
            Err(e) => return Err(e.into()),
        };
        log::debug!("Updated figure {} to version {}", figure.id, figure.version);
        Ok(figure)
    }

    pub async fn delete_figure(&self, id: i64) -> ServiceResult<()> {
        if id < 1 {
            return Err(ServiceError::NotFound);
        }

        self.store.delete(id).await?;
        log::debug!("Deleted figure {}", id);
        Ok(())
    }
}

fn check(figure: &NewFigure) -> ServiceResult<()> {
    let mut v = Validator::new();
    validate_figure(&mut v, figure);
    v.into_result().map_err(ServiceError::ValidationFailed)
}

use std::collections::BTreeMap;

use chrono::{SubsecRound, Utc};
use parking_lot::RwLock;

use crate::model::{Figure, NewFigure};
use crate::store::traits::{FigureStore, StoreError, StoreResult};

/// In-process figure table. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Table>,
}

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, Figure>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl FigureStore for MemoryStore {
    async fn create(&self, figure: NewFigure) -> StoreResult<Figure> {
        let mut table = self.inner.write();
        table.last_id += 1;

        let created = Figure {
            id: table.last_id,
            created_at: Utc::now().trunc_subsecs(0),
            name: figure.name,
            years_of_life: figure.years_of_life,
            description: figure.description,
            version: 1,
        };
        table.rows.insert(created.id, created.clone());

        Ok(created)
    }

    async fn get(&self, id: i64) -> StoreResult<Figure> {
        if id < 1 {
            return Err(StoreError::NotFound);
        }

        self.inner
            .read()
            .rows
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update(&self, figure: &Figure, expected_version: Option<i32>) -> StoreResult<i32> {
        if figure.id < 1 {
            return Err(StoreError::NotFound);
        }

        let mut table = self.inner.write();
        let Some(row) = table.rows.get_mut(&figure.id) else {
            return Err(StoreError::NotFound);
        };

        if let Some(expected) = expected_version {
            if row.version != expected {
                return Err(StoreError::Conflict(figure.id));
            }
        }

        row.name = figure.name.clone();
        row.years_of_life = figure.years_of_life.clone();
        row.description = figure.description.clone();
        row.version += 1;

        Ok(row.version)
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        if id < 1 {
            return Err(StoreError::NotFound);
        }

        match self.inner.write().rows.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }
}

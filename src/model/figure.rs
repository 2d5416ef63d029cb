use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted historical figure.
///
/// `id`, `created_at` and `version` are assigned by the store; callers only
/// ever supply the three text fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub years_of_life: String,
    pub description: String,
    pub version: i32,
}

impl Figure {
    /// Overwrite the mutable fields. Every field is replaced, there is no merge.
    pub fn apply(&mut self, changes: NewFigure) {
        self.name = changes.name;
        self.years_of_life = changes.years_of_life;
        self.description = changes.description;
    }

    pub fn location(&self) -> String {
        format!("/v1/figures/{}", self.id)
    }
}

/// Candidate figure handed to the store on create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFigure {
    pub name: String,
    pub years_of_life: String,
    pub description: String,
}

impl NewFigure {
    pub fn new(
        name: impl Into<String>,
        years_of_life: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            years_of_life: years_of_life.into(),
            description: description.into(),
        }
    }
}

/// Request body for `POST /v1/figures` and `PUT /v1/figures/:id`.
///
/// Absent text fields decode as empty strings so that a missing `name`
/// surfaces as a validation failure rather than a decoding error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FigureInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub years_of_life: String,
    #[serde(default)]
    pub description: String,
    /// Version the caller last observed. Ignored on create; on update a
    /// mismatch is reported as an edit conflict.
    #[serde(default)]
    pub version: Option<i32>,
}

impl FigureInput {
    pub fn into_parts(self) -> (NewFigure, Option<i32>) {
        (
            NewFigure {
                name: self.name,
                years_of_life: self.years_of_life,
                description: self.description,
            },
            self.version,
        )
    }
}

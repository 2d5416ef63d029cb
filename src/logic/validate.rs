use std::collections::BTreeMap;

use crate::model::NewFigure;

pub const NAME_MAX_BYTES: usize = 500;
pub const DESCRIPTION_MAX_BYTES: usize = 1000;
pub const YEARS_OF_LIFE_MAX_BYTES: usize = 10;

/// Field name -> message, one entry per violated field.
pub type FieldErrors = BTreeMap<String, String>;

/// Collects rule violations keyed by field name.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` against `field` unless `ok` holds.
    /// Only the first violation per field is kept.
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.errors
                .entry(field.to_string())
                .or_insert_with(|| message.to_string());
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Apply the figure rules, reporting every invalid field at once.
pub fn validate_figure(v: &mut Validator, figure: &NewFigure) {
    v.check(!figure.name.is_empty(), "name", "must be provided");
    v.check(
        figure.name.len() <= NAME_MAX_BYTES,
        "name",
        "must not be more than 500 bytes long",
    );
    v.check(
        figure.description.len() <= DESCRIPTION_MAX_BYTES,
        "description",
        "must not be more than 1000 bytes long",
    );
    v.check(
        figure.years_of_life.len() <= YEARS_OF_LIFE_MAX_BYTES,
        "years_of_life",
        "must not be more than 10 bytes long",
    );
}

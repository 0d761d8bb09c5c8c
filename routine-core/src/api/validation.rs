//! Field-level validation for incoming view models.
//!
//! Validators collect every violation instead of stopping at the first, so
//! a client can fix a request in one round trip.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use thiserror::Error;

/// Earliest accepted year of birth.
pub const EARLIEST_BIRTH_YEAR: i32 = 1800;

/// Violations keyed by the camelCase path of the offending field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("request failed validation on {} field(s)", .errors.len())]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.errors.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Folds `other` in, prefixing each of its field paths.
    pub fn merge_prefixed(&mut self, prefix: &str, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors
                .entry(format!("{prefix}.{field}"))
                .or_default()
                .extend(messages);
        }
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

pub(crate) fn required(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: &str,
) {
    if value.trim().is_empty() {
        errors.add(field, format!("The {label} field is required."));
    }
}

pub(crate) fn max_length(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: &str,
    max: usize,
) {
    if value.chars().count() > max {
        errors.add(
            field,
            format!("The field {label} must be at most {max} characters long."),
        );
    }
}

pub(crate) fn birth_date(
    errors: &mut ValidationErrors,
    field: &str,
    value: NaiveDate,
    today: NaiveDate,
) {
    if value.year() < EARLIEST_BIRTH_YEAR {
        errors.add(
            field,
            format!("Year of birth should be later than {EARLIEST_BIRTH_YEAR}."),
        );
    }
    if value > today {
        errors.add(field, "Date of birth should be earlier than current date.");
    }
}

//! Author-Book junction (N:M relationship)

use std::collections::HashSet;

use sqlx::FromRow;

use super::Author;
use crate::error::{AppError, FieldErrors};

/// Author row tagged with the book it is linked to
#[derive(Debug, Clone, FromRow)]
pub struct BookAuthorRow {
    pub book_id: i64,
    #[sqlx(flatten)]
    pub author: Author,
}

/// Changes needed to turn the current author set of a book into the desired one
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    /// Links to remove
    pub detach: Vec<i64>,
    /// Links to add
    pub attach: Vec<i64>,
}

impl SyncPlan {
    pub fn between(current: &[i64], desired: &[i64]) -> Self {
        let current_set: HashSet<i64> = current.iter().copied().collect();
        let desired_set: HashSet<i64> = desired.iter().copied().collect();

        let mut seen = HashSet::new();
        Self {
            detach: current
                .iter()
                .copied()
                .filter(|id| !desired_set.contains(id))
                .collect(),
            attach: desired
                .iter()
                .copied()
                .filter(|id| !current_set.contains(id) && seen.insert(*id))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.detach.is_empty() && self.attach.is_empty()
    }
}

/// Validation failure for every requested id that has no author row, keyed `<field>.<index>`.
pub fn unknown_authors(field: &str, requested: &[i64], existing: &[i64]) -> Option<AppError> {
    let existing: HashSet<i64> = existing.iter().copied().collect();
    let errors: FieldErrors = requested
        .iter()
        .enumerate()
        .filter(|(_, id)| !existing.contains(*id))
        .map(|(idx, _)| {
            let key = format!("{}.{}", field, idx);
            let message = format!("The selected {} is invalid.", key);
            (key, vec![message])
        })
        .collect();

    if errors.is_empty() {
        None
    } else {
        Some(AppError::Validation(errors))
    }
}

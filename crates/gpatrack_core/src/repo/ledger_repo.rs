//! Typed persistence for the course ledger and theme preference.
//!
//! # Responsibility
//! - Map the `allCourses` and `theme` keys to domain types.
//! - Reject corrupt snapshots instead of masking them as empty ledgers.
//!
//! # Invariants
//! - `allCourses` is always written as one full JSON array.
//! - `theme` is written as the bare label (`light` or `dark`).

use crate::model::course::CourseRecord;
use crate::model::theme::ThemePreference;
use crate::repo::kv_repo::{KeyValueStore, StoreError, StoreResult};
use log::warn;

/// Key of the serialized ledger snapshot.
pub const ALL_COURSES_KEY: &str = "allCourses";
/// Key of the theme preference.
pub const THEME_KEY: &str = "theme";

/// Typed facade over a [`KeyValueStore`].
pub struct LedgerStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> LedgerStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow of the wrapped key-value store.
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Loads the ledger snapshot.
    ///
    /// A missing key or a stored JSON `null` reads as an empty ledger.
    ///
    /// # Errors
    /// - `InvalidData` when the snapshot is not a valid course array.
    pub fn load_courses(&self) -> StoreResult<Vec<CourseRecord>> {
        let Some(raw) = self.store.get(ALL_COURSES_KEY)? else {
            return Ok(Vec::new());
        };
        let parsed: Option<Vec<CourseRecord>> = serde_json::from_str(&raw)
            .map_err(|err| StoreError::InvalidData(format!("{ALL_COURSES_KEY}: {err}")))?;
        Ok(parsed.unwrap_or_default())
    }

    /// Rewrites the full ledger snapshot.
    pub fn save_courses(&self, courses: &[CourseRecord]) -> StoreResult<()> {
        let encoded = serde_json::to_string(courses)?;
        self.store.set(ALL_COURSES_KEY, &encoded)
    }

    /// Loads the stored theme, or `None` when never saved.
    ///
    /// Unknown stored labels are treated as unset.
    pub fn load_theme(&self) -> StoreResult<Option<ThemePreference>> {
        let Some(raw) = self.store.get(THEME_KEY)? else {
            return Ok(None);
        };
        let theme = ThemePreference::parse(raw.trim());
        if theme.is_none() {
            warn!("event=theme_load module=repo status=fallback reason=unknown_value");
        }
        Ok(theme)
    }

    pub fn save_theme(&self, theme: ThemePreference) -> StoreResult<()> {
        self.store.set(THEME_KEY, theme.as_str())
    }
}

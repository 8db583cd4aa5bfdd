//! Detail-on-demand loader for the modal view
//!
//! `Closed -> Loading -> Loaded | Failed`, with `Closed` reachable from any
//! state. Every issued request carries a generation; a completion is applied
//! only if its generation is still the current one, so a late response for a
//! previous selection can never overwrite a newer one.

use serde::{Deserialize, Serialize};
use tracing::debug;
use tui_dispatch::DataResource;

use crate::state::FullDetailRecord;

/// Moves listed in the detail view before collapsing into "+N more"
pub const MOVE_PREVIEW_LIMIT: usize = 15;

/// A fetch the loader wants issued
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailRequest {
    pub generation: u64,
    pub url: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailStatus<'a> {
    Closed,
    Loading,
    Loaded(&'a FullDetailRecord),
    Failed(&'a str),
}

impl DetailStatus<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            DetailStatus::Closed => "closed",
            DetailStatus::Loading => "loading",
            DetailStatus::Loaded(_) => "loaded",
            DetailStatus::Failed(_) => "failed",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetailLoader {
    selected: Option<String>,
    generation: u64,
    record: DataResource<FullDetailRecord>,
}

impl Default for DetailLoader {
    fn default() -> Self {
        Self {
            selected: None,
            generation: 0,
            record: DataResource::Empty,
        }
    }
}

impl DetailLoader {
    /// Open (or switch) the view to `url`. Always fetches fresh.
    pub fn select(&mut self, url: impl Into<String>) -> DetailRequest {
        let url = url.into();
        self.generation += 1;
        self.selected = Some(url.clone());
        self.record = DataResource::Loading;
        DetailRequest {
            generation: self.generation,
            url,
        }
    }

    /// Re-issue the failed fetch for the same selection
    pub fn retry(&mut self) -> Option<DetailRequest> {
        if !self.record.is_failed() {
            return None;
        }
        let url = self.selected.clone()?;
        self.generation += 1;
        self.record = DataResource::Loading;
        Some(DetailRequest {
            generation: self.generation,
            url,
        })
    }

    /// Back to `Closed`; returns false when already closed
    pub fn close(&mut self) -> bool {
        if self.selected.is_none() && self.record.is_empty() {
            return false;
        }
        self.selected = None;
        self.record = DataResource::Empty;
        true
    }

    /// Apply a completion; returns false when it was stale and discarded
    pub fn resolve(
        &mut self,
        generation: u64,
        result: Result<FullDetailRecord, String>,
    ) -> bool {
        if generation != self.generation || self.selected.is_none() {
            debug!(
                generation,
                current = self.generation,
                "discarding stale detail response"
            );
            return false;
        }
        self.record = match result {
            Ok(record) => DataResource::Loaded(record),
            Err(error) => DataResource::Failed(error),
        };
        true
    }

    pub fn status(&self) -> DetailStatus<'_> {
        match &self.record {
            DataResource::Empty => DetailStatus::Closed,
            DataResource::Loading => DetailStatus::Loading,
            DataResource::Loaded(record) => DetailStatus::Loaded(record),
            DataResource::Failed(error) => DetailStatus::Failed(error),
        }
    }

    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.record.is_loading()
    }

    pub fn selected_url(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// First moves to list, plus how many were left out
#[derive(Debug, PartialEq, Eq)]
pub struct MovePreview<'a> {
    pub shown: &'a [String],
    pub remaining: usize,
}

pub fn move_preview(moves: &[String]) -> MovePreview<'_> {
    let shown = &moves[..moves.len().min(MOVE_PREVIEW_LIMIT)];
    MovePreview {
        shown,
        remaining: moves.len() - shown.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DetailRecord;

    fn full_record(name: &str) -> FullDetailRecord {
        FullDetailRecord {
            summary: DetailRecord {
                id: 1,
                name: name.to_string(),
                url: format!("https://pokeapi.co/api/v2/pokemon/{name}/"),
                image_primary: None,
                image_fallback: None,
                categories: vec!["grass".into()],
                height: 7,
                weight: 69,
            },
            base_experience: Some(64),
            image_dream_world: None,
            abilities: Vec::new(),
            stats: Vec::new(),
            moves: Vec::new(),
        }
    }

    #[test]
    fn test_select_enters_loading() {
        let mut loader = DetailLoader::default();
        assert_eq!(loader.status(), DetailStatus::Closed);

        let request = loader.select("a");
        assert_eq!(request.url, "a");
        assert_eq!(request.generation, 1);
        assert_eq!(loader.status(), DetailStatus::Loading);
        assert!(loader.is_open());
    }

    #[test]
    fn test_resolve_success_and_failure() {
        let mut loader = DetailLoader::default();
        let request = loader.select("a");
        assert!(loader.resolve(request.generation, Ok(full_record("a"))));
        assert!(matches!(loader.status(), DetailStatus::Loaded(record) if record.summary.name == "a"));

        let request = loader.select("b");
        assert!(loader.resolve(request.generation, Err("HTTP 500".into())));
        assert_eq!(loader.status(), DetailStatus::Failed("HTTP 500"));
    }

    #[test]
    fn test_late_response_for_previous_selection_is_discarded() {
        let mut loader = DetailLoader::default();
        let first = loader.select("a");
        let second = loader.select("b");

        assert!(!loader.resolve(first.generation, Ok(full_record("a"))));
        assert_eq!(loader.status(), DetailStatus::Loading);

        assert!(loader.resolve(second.generation, Ok(full_record("b"))));
        assert!(!loader.resolve(first.generation, Err("late".into())));
        assert!(matches!(loader.status(), DetailStatus::Loaded(record) if record.summary.name == "b"));
        assert_eq!(loader.selected_url(), Some("b"));
    }

    #[test]
    fn test_retry_only_from_failed() {
        let mut loader = DetailLoader::default();
        assert_eq!(loader.retry(), None);

        let request = loader.select("a");
        assert_eq!(loader.retry(), None);

        loader.resolve(request.generation, Err("boom".into()));
        let retry = loader.retry().expect("retry from failed");
        assert_eq!(retry.url, "a");
        assert_eq!(retry.generation, request.generation + 1);
        assert_eq!(loader.status(), DetailStatus::Loading);
    }

    #[test]
    fn test_close_discards_everything_and_is_idempotent() {
        let mut loader = DetailLoader::default();
        assert!(!loader.close());

        let request = loader.select("a");
        assert!(loader.close());
        assert_eq!(loader.status(), DetailStatus::Closed);
        assert_eq!(loader.selected_url(), None);

        assert!(!loader.resolve(request.generation, Ok(full_record("a"))));
        assert_eq!(loader.status(), DetailStatus::Closed);
        assert!(!loader.close());
    }

    #[test]
    fn test_move_preview() {
        let moves: Vec<String> = (0..22).map(|i| format!("move-{i}")).collect();
        let preview = move_preview(&moves);
        assert_eq!(preview.shown.len(), MOVE_PREVIEW_LIMIT);
        assert_eq!(preview.remaining, 7);

        // 16..=20 moves still report the overflow
        let preview = move_preview(&moves[..17]);
        assert_eq!(preview.remaining, 2);

        let preview = move_preview(&moves[..3]);
        assert_eq!(preview.shown.len(), 3);
        assert_eq!(preview.remaining, 0);
    }
}

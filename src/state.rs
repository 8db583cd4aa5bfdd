//! Application state - single source of truth

use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::artwork::{ArtworkCache, ArtworkView};
use crate::collection::Collection;
use crate::detail::{DetailLoader, DetailStatus};
use crate::search::CatalogView;

/// Pointer returned by the list endpoint; only lives until details resolve
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListReference {
    pub name: String,
    pub url: String,
}

/// Card-level record, one per successfully resolved [`ListReference`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub id: u32,
    pub name: String,
    pub url: String,
    pub image_primary: Option<String>,
    pub image_fallback: Option<String>,
    pub categories: Vec<String>,
    /// Decimeters
    pub height: u32,
    /// Hectograms
    pub weight: u32,
}

impl DetailRecord {
    pub fn image_url(&self) -> Option<&str> {
        self.image_primary
            .as_deref()
            .or(self.image_fallback.as_deref())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub is_hidden: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStat {
    pub name: String,
    pub base: u32,
}

/// Modal-level record; fetched fresh every time the detail view opens
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullDetailRecord {
    pub summary: DetailRecord,
    pub base_experience: Option<u32>,
    pub image_dream_world: Option<String>,
    pub abilities: Vec<Ability>,
    pub stats: Vec<BaseStat>,
    pub moves: Vec<String>,
}

impl FullDetailRecord {
    /// Official artwork, then dream world art, then the default sprite
    pub fn image_url(&self) -> Option<&str> {
        self.summary
            .image_primary
            .as_deref()
            .or(self.image_dream_world.as_deref())
            .or(self.summary.image_fallback.as_deref())
    }
}

/// Lifecycle of the catalog fetch cycle (list, then detail fan-out)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogPhase {
    #[default]
    Idle,
    FetchingList,
    ResolvingDetails,
    Ready,
    Failed(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchState {
    /// Whether the search input is capturing keys
    pub active: bool,
    pub query: String,
}

/// What the catalog area should show; derived, never stored
#[derive(Debug)]
pub enum CatalogScreen<'a> {
    FetchingList,
    ResolvingDetails,
    Failed(&'a str),
    /// The fetch cycle finished but no record resolved
    Unavailable,
    NoResults(&'a str),
    Grid(CatalogView<'a>),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub phase: CatalogPhase,
    /// Tag of the current fetch cycle; completions from older cycles are dropped
    pub fetch_generation: u64,
    pub collection: Collection,
    pub search: SearchState,
    /// 1-based page into the filtered collection
    pub page: usize,
    /// Focused card within the visible page
    pub cursor: usize,
    pub detail: DetailLoader,
    /// Decoded images by URL; rebuilt from the network each session
    #[serde(skip)]
    pub artwork: ArtworkCache,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            phase: CatalogPhase::Idle,
            fetch_generation: 0,
            collection: Collection::default(),
            search: SearchState::default(),
            page: 1,
            cursor: 0,
            detail: DetailLoader::default(),
            artwork: ArtworkCache::default(),
            tick: 0,
        }
    }
}

impl AppState {
    pub fn view(&self) -> CatalogView<'_> {
        CatalogView::derive(self.collection.all(), &self.search.query, self.page)
    }

    /// A refresh keeps showing the previous records until the new batch lands
    pub fn screen(&self) -> CatalogScreen<'_> {
        if let CatalogPhase::Failed(error) = &self.phase {
            return CatalogScreen::Failed(error);
        }
        if self.collection.is_empty() {
            return match self.phase {
                CatalogPhase::Ready => CatalogScreen::Unavailable,
                CatalogPhase::ResolvingDetails => CatalogScreen::ResolvingDetails,
                _ => CatalogScreen::FetchingList,
            };
        }
        let view = self.view();
        if view.filtered.is_empty() {
            CatalogScreen::NoResults(&self.search.query)
        } else {
            CatalogScreen::Grid(view)
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self.phase,
            CatalogPhase::FetchingList | CatalogPhase::ResolvingDetails
        ) || self.detail.is_loading()
    }

    /// Detail URL of the focused card on the visible page
    pub fn focused_url(&self) -> Option<String> {
        let view = self.view();
        view.visible()
            .get(self.cursor)
            .map(|record| record.url.clone())
    }

    /// Artwork for the loaded detail record
    pub fn detail_artwork(&self) -> ArtworkView<'_> {
        match self.detail.status() {
            DetailStatus::Loaded(record) => self.artwork.view(record.image_url()),
            _ => ArtworkView::NoImage,
        }
    }

    /// Image URLs of the cards on the visible page
    pub fn visible_image_urls(&self) -> Vec<String> {
        self.view()
            .visible()
            .iter()
            .filter_map(|record| record.image_url().map(str::to_string))
            .collect()
    }

    /// Re-establishes the page and cursor bounds after the filtered set changed
    pub fn clamp_position(&mut self) {
        let (page, visible) = {
            let view = self.view();
            (view.page, view.visible().len())
        };
        self.page = page;
        self.cursor = self.cursor.min(visible.saturating_sub(1));
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        let view = self.view();
        vec![
            DebugSection::new("Catalog")
                .entry("phase", ron_string(&self.phase))
                .entry("generation", ron_string(&self.fetch_generation))
                .entry("records", ron_string(&self.collection.len()))
                .entry("artwork", ron_string(&self.artwork.ready_count())),
            DebugSection::new("View")
                .entry("query", ron_string(&self.search.query))
                .entry("search_active", ron_string(&self.search.active))
                .entry("filtered", ron_string(&view.filtered.len()))
                .entry("page", ron_string(&view.page))
                .entry("total_pages", ron_string(&view.total_pages))
                .entry("cursor", ron_string(&self.cursor)),
            DebugSection::new("Detail")
                .entry("selected", ron_string(&self.detail.selected_url()))
                .entry("generation", ron_string(&self.detail.generation()))
                .entry("status", ron_string(&self.detail.status().label())),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32, name: &str, categories: &[&str]) -> DetailRecord {
        DetailRecord {
            id,
            name: name.to_string(),
            url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
            image_primary: None,
            image_fallback: None,
            categories: categories.iter().map(|c| c.to_string()).collect(),
            height: 7,
            weight: 69,
        }
    }

    #[test]
    fn test_initial_screen_is_loading() {
        let state = AppState::default();
        assert!(matches!(state.screen(), CatalogScreen::FetchingList));
    }

    #[test]
    fn test_resolving_without_records_is_distinct_from_no_results() {
        let mut state = AppState {
            phase: CatalogPhase::ResolvingDetails,
            ..Default::default()
        };
        assert!(matches!(state.screen(), CatalogScreen::ResolvingDetails));

        state.collection.replace(vec![record(1, "bulbasaur", &["grass"])]);
        state.phase = CatalogPhase::Ready;
        state.search.query = "zzz".into();
        assert!(matches!(state.screen(), CatalogScreen::NoResults("zzz")));
    }

    #[test]
    fn test_refresh_keeps_previous_records_on_screen() {
        let mut state = AppState {
            phase: CatalogPhase::Ready,
            ..Default::default()
        };
        state.collection.replace(vec![record(1, "bulbasaur", &["grass"])]);
        state.phase = CatalogPhase::FetchingList;
        assert!(matches!(state.screen(), CatalogScreen::Grid(_)));
    }

    #[test]
    fn test_ready_with_empty_collection_is_unavailable() {
        let state = AppState {
            phase: CatalogPhase::Ready,
            ..Default::default()
        };
        assert!(matches!(state.screen(), CatalogScreen::Unavailable));
    }

    #[test]
    fn test_focused_url_follows_cursor() {
        let mut state = AppState {
            phase: CatalogPhase::Ready,
            ..Default::default()
        };
        state.collection.replace(vec![
            record(1, "bulbasaur", &["grass"]),
            record(4, "charmander", &["fire"]),
        ]);
        state.cursor = 1;
        assert_eq!(
            state.focused_url().as_deref(),
            Some("https://pokeapi.co/api/v2/pokemon/4/")
        );
    }

    #[test]
    fn test_image_fallback_chain() {
        let mut summary = record(1, "bulbasaur", &["grass"]);
        summary.image_fallback = Some("front.png".into());
        assert_eq!(summary.image_url(), Some("front.png"));

        let full = FullDetailRecord {
            summary,
            base_experience: Some(64),
            image_dream_world: Some("dream.svg".into()),
            abilities: Vec::new(),
            stats: Vec::new(),
            moves: Vec::new(),
        };
        assert_eq!(full.image_url(), Some("dream.svg"));
    }
}

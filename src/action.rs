//! Actions: user intents and async completions

use serde::{Deserialize, Serialize};

use crate::artwork::Artwork;
use crate::state::{DetailRecord, FullDetailRecord, ListReference};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    // ===== Catalog category =====
    /// Intent: start a fetch cycle from scratch (initial load and retry)
    CatalogFetch,
    /// Result: list page arrived for the given cycle
    CatalogDidLoadList {
        generation: u64,
        references: Vec<ListReference>,
    },
    /// Result: detail fan-out settled with the surviving records
    CatalogDidResolve {
        generation: u64,
        records: Vec<DetailRecord>,
    },
    /// Result: list fetch failed; fatal for the catalog view
    CatalogDidError { generation: u64, error: String },

    // ===== Search category =====
    SearchOpen,
    /// Replace the query; always returns to the first page
    SearchQueryChange(String),
    /// Leave the input, keeping the query
    SearchSubmit,
    /// Leave the input and clear the query
    SearchCancel,

    // ===== Page category =====
    PageSelect(usize),
    PageNext,
    PagePrev,

    // ===== Cursor category =====
    CursorMove(i16),
    CursorSet(usize),

    // ===== Detail category =====
    /// Intent: open the detail view for a record URL
    DetailOpen(String),
    DetailDidLoad {
        generation: u64,
        record: FullDetailRecord,
    },
    DetailDidError { generation: u64, error: String },
    DetailRetry,
    DetailClose,

    // ===== Artwork category =====
    ArtworkDidLoad { url: String, artwork: Artwork },
    ArtworkDidError { url: String, error: String },

    // ===== Uncategorized (global) =====
    Tick,
    Quit,
}

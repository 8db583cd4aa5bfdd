//! Effects - side effects declared by the reducer

use std::sync::Arc;

use tracing::{debug, warn};
use tui_dispatch::{TaskKey, TaskManager};

use crate::action::Action;
use crate::aggregate::resolve_details;
use crate::api::CatalogApi;
use crate::artwork::Artwork;
use crate::state::ListReference;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Fetch the list page for a fetch cycle
    FetchList { generation: u64 },
    /// Fan out detail requests for every reference of a fetch cycle
    ResolveDetails {
        generation: u64,
        references: Vec<ListReference>,
    },
    /// Fetch the full record for the detail view
    FetchDetail { generation: u64, url: String },
    /// Download and decode one image into the artwork cache
    FetchArtwork { url: String },
}

impl Effect {
    /// Task key for the spawned request. Unique per generation, so a newer
    /// request never cancels an older one still in flight.
    pub fn task_key(&self) -> String {
        match self {
            Effect::FetchList { generation } => format!("catalog_list_{generation}"),
            Effect::ResolveDetails { generation, .. } => format!("catalog_details_{generation}"),
            Effect::FetchDetail { generation, .. } => format!("detail_{generation}"),
            Effect::FetchArtwork { url } => format!("artwork_{url}"),
        }
    }
}

/// Spawn `effect` on the task manager; its completion action is sent back
/// to the store when the request settles.
pub fn spawn(tasks: &mut TaskManager<Action>, api: &Arc<dyn CatalogApi>, effect: Effect) {
    let key = TaskKey::new(effect.task_key());
    tasks.spawn(key, execute(Arc::clone(api), effect));
}

/// Run an effect against the catalog and produce its completion action
pub async fn execute(api: Arc<dyn CatalogApi>, effect: Effect) -> Action {
    match effect {
        Effect::FetchList { generation } => match api.fetch_list().await {
            Ok(references) => {
                debug!(generation, count = references.len(), "list page loaded");
                Action::CatalogDidLoadList {
                    generation,
                    references,
                }
            }
            Err(error) => {
                warn!(generation, %error, "list fetch failed");
                Action::CatalogDidError {
                    generation,
                    error: error.to_string(),
                }
            }
        },
        Effect::ResolveDetails {
            generation,
            references,
        } => Action::CatalogDidResolve {
            generation,
            records: resolve_details(api, references).await,
        },
        Effect::FetchDetail { generation, url } => match api.fetch_full_detail(&url).await {
            Ok(record) => Action::DetailDidLoad { generation, record },
            Err(error) => {
                warn!(generation, %url, %error, "detail fetch failed");
                Action::DetailDidError {
                    generation,
                    error: error.to_string(),
                }
            }
        },
        Effect::FetchArtwork { url } => {
            let decoded = match api.fetch_bytes(&url).await {
                Ok(bytes) => Artwork::decode(&bytes),
                Err(error) => Err(error.to_string()),
            };
            match decoded {
                Ok(artwork) => Action::ArtworkDidLoad { url, artwork },
                Err(error) => {
                    debug!(%url, %error, "artwork unavailable");
                    Action::ArtworkDidError { url, error }
                }
            }
        }
    }
}

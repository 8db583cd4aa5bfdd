//! Reducer - pure function: (state, action) -> DispatchResult

use tracing::{debug, info, warn};
use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::detail::DetailRequest;
use crate::effect::Effect;
use crate::state::{AppState, CatalogPhase};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Catalog actions =====
        Action::CatalogFetch => {
            state.fetch_generation += 1;
            state.phase = CatalogPhase::FetchingList;
            info!(generation = state.fetch_generation, "catalog fetch cycle started");
            DispatchResult::changed_with(Effect::FetchList {
                generation: state.fetch_generation,
            })
        }

        Action::CatalogDidLoadList {
            generation,
            references,
        } => {
            if generation != state.fetch_generation {
                debug!(generation, "discarding stale list response");
                return DispatchResult::unchanged();
            }
            state.phase = CatalogPhase::ResolvingDetails;
            DispatchResult::changed_with(Effect::ResolveDetails {
                generation,
                references,
            })
        }

        Action::CatalogDidResolve {
            generation,
            records,
        } => {
            if generation != state.fetch_generation {
                debug!(generation, "discarding stale detail batch");
                return DispatchResult::unchanged();
            }
            let dropped = state.collection.replace(records);
            if dropped > 0 {
                warn!(dropped, "duplicate names removed from collection");
            }
            state.phase = CatalogPhase::Ready;
            state.clamp_position();
            DispatchResult::changed_with_many(visible_artwork(state))
        }

        Action::CatalogDidError { generation, error } => {
            if generation != state.fetch_generation {
                return DispatchResult::unchanged();
            }
            state.phase = CatalogPhase::Failed(error);
            DispatchResult::changed()
        }

        // ===== Search actions =====
        Action::SearchOpen => {
            if state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = true;
            DispatchResult::changed()
        }

        Action::SearchQueryChange(query) => {
            if query == state.search.query {
                return DispatchResult::unchanged();
            }
            state.search.query = query;
            reset_position(state);
            DispatchResult::changed_with_many(visible_artwork(state))
        }

        Action::SearchSubmit => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search.active && state.search.query.is_empty() {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            if state.search.query.is_empty() {
                return DispatchResult::changed();
            }
            state.search.query.clear();
            reset_position(state);
            DispatchResult::changed_with_many(visible_artwork(state))
        }

        // ===== Page actions =====
        Action::PageSelect(page) => select_page(state, page),
        Action::PageNext => {
            let page = state.page.saturating_add(1);
            select_page(state, page)
        }
        Action::PagePrev => {
            let page = state.page.saturating_sub(1);
            select_page(state, page)
        }

        // ===== Cursor actions =====
        Action::CursorMove(delta) => {
            let visible = state.view().visible().len();
            if visible == 0 {
                return DispatchResult::unchanged();
            }
            let target = (state.cursor as i64 + i64::from(delta)).clamp(0, visible as i64 - 1);
            set_cursor(state, target as usize)
        }

        Action::CursorSet(index) => {
            let visible = state.view().visible().len();
            if index >= visible {
                return DispatchResult::unchanged();
            }
            set_cursor(state, index)
        }

        // ===== Detail actions =====
        Action::DetailOpen(url) => {
            let request = state.detail.select(url);
            fetch_detail(request)
        }

        Action::DetailDidLoad { generation, record } => {
            let image_url = record.image_url().map(str::to_string);
            if !state.detail.resolve(generation, Ok(record)) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with_many(request_artwork(state, image_url))
        }

        Action::DetailDidError { generation, error } => {
            if state.detail.resolve(generation, Err(error)) {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::DetailRetry => match state.detail.retry() {
            Some(request) => fetch_detail(request),
            None => DispatchResult::unchanged(),
        },

        Action::DetailClose => {
            if state.detail.close() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // ===== Artwork actions =====
        Action::ArtworkDidLoad { url, artwork } => {
            debug!(%url, width = artwork.width, height = artwork.height, "artwork cached");
            state.artwork.store(url, artwork);
            DispatchResult::changed()
        }

        Action::ArtworkDidError { url, error } => {
            debug!(%url, %error, "artwork marked missing");
            state.artwork.mark_missing(url);
            DispatchResult::changed()
        }

        // ===== Global actions =====
        Action::Tick => {
            if state.is_loading() {
                state.tick = state.tick.wrapping_add(1);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn reset_position(state: &mut AppState) {
    state.page = 1;
    state.cursor = 0;
}

fn select_page(state: &mut AppState, page: usize) -> DispatchResult<Effect> {
    let target = crate::search::clamp_page(page, state.view().total_pages);
    if target == state.page {
        return DispatchResult::unchanged();
    }
    state.page = target;
    state.cursor = 0;
    DispatchResult::changed_with_many(visible_artwork(state))
}

fn set_cursor(state: &mut AppState, index: usize) -> DispatchResult<Effect> {
    if index == state.cursor {
        return DispatchResult::unchanged();
    }
    state.cursor = index;
    DispatchResult::changed()
}

/// Fetch effects for images not yet requested this session
fn request_artwork(
    state: &mut AppState,
    urls: impl IntoIterator<Item = String>,
) -> Vec<Effect> {
    urls.into_iter()
        .filter(|url| state.artwork.request(url))
        .map(|url| Effect::FetchArtwork { url })
        .collect()
}

fn visible_artwork(state: &mut AppState) -> Vec<Effect> {
    let urls = state.visible_image_urls();
    request_artwork(state, urls)
}

fn fetch_detail(request: DetailRequest) -> DispatchResult<Effect> {
    DispatchResult::changed_with(Effect::FetchDetail {
        generation: request.generation,
        url: request.url,
    })
}

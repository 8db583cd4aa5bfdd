//! Detail fan-out for a list page

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::api::CatalogApi;
use crate::state::{DetailRecord, ListReference};

/// Resolve every reference concurrently and keep the ones that succeeded.
///
/// All requests are issued before any is awaited and the batch waits for
/// every one of them to settle. Failed items are dropped, so the result may
/// be shorter than the input (or empty) and comes back in completion order.
pub async fn resolve_details(
    api: Arc<dyn CatalogApi>,
    references: Vec<ListReference>,
) -> Vec<DetailRecord> {
    let total = references.len();
    let mut join_set = JoinSet::new();
    for reference in references {
        let api = Arc::clone(&api);
        join_set.spawn(async move {
            let result = api.fetch_detail(&reference.url).await;
            (reference, result)
        });
    }

    let mut records = Vec::with_capacity(total);
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((_, Ok(record))) => records.push(record),
            Ok((reference, Err(error))) => {
                warn!(name = %reference.name, %error, "dropping unresolved record");
            }
            Err(error) => warn!(%error, "detail task did not complete"),
        }
    }

    info!(resolved = records.len(), total, "detail batch settled");
    records
}

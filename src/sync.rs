use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::fetcher::{self, Fetched, Fetcher};
use crate::parser;
use crate::store::MasterStore;

/// Counts returned after a sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncStats {
    pub total: usize,
    pub updated: usize,
    pub unavailable: usize,
}

/// Fetch all documents and fold the successful ones into `master`.
///
/// Unavailable documents keep their prior record untouched. Every record updated
/// here gets `now` as its `last_updated`.
pub async fn sync<F: Fetcher>(
    fetcher: Arc<F>,
    documents: &[String],
    concurrency: usize,
    master: &mut MasterStore,
    now: DateTime<Utc>,
) -> Result<SyncStats> {
    info!("Fetching {} documents", documents.len());
    let fetched = fetcher::fetch_all(fetcher, documents, concurrency).await?;
    Ok(apply(master, fetched, now))
}

/// Reconcile fetched documents into `master`, one at a time, in the given order.
pub fn apply(master: &mut MasterStore, fetched: Vec<Fetched>, now: DateTime<Utc>) -> SyncStats {
    let mut stats = SyncStats {
        total: fetched.len(),
        updated: 0,
        unavailable: 0,
    };

    for Fetched { filename, result } in fetched {
        match result {
            Ok(markdown) => {
                let record =
                    parser::process_document(&filename, &markdown, master.get(&filename), now);
                master.upsert(record);
                stats.updated += 1;
            }
            Err(e) => {
                warn!("Skipping {}", e);
                stats.unavailable += 1;
            }
        }
    }

    stats
}

// ── Tests ──

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::catalog;
use crate::error::FetchError;
use crate::settings::Settings;

/// Retrieves the raw text of one document. Any error means "unavailable this run".
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, filename: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .build()?;
        Ok(HttpFetcher {
            client,
            base_url: settings.base_url.clone(),
        })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, filename: &str) -> Result<String, FetchError> {
        let url = catalog::raw_url(&self.base_url, filename);
        let transport = |source| FetchError::Transport {
            filename: filename.to_string(),
            source,
        };

        let start = Instant::now();
        let response = self.client.get(&url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                filename: filename.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await.map_err(transport)?;
        debug!(
            "Fetched {} ({} bytes) in {}ms",
            url,
            body.len(),
            start.elapsed().as_millis()
        );
        Ok(body)
    }
}

/// Outcome of fetching one configured document.
pub struct Fetched {
    pub filename: String,
    pub result: Result<String, FetchError>,
}

/// Fetch every document with at most `concurrency` requests in flight.
///
/// Results come back in the order of `documents`, whatever order they finished in.
pub async fn fetch_all<F: Fetcher>(
    fetcher: Arc<F>,
    documents: &[String],
    concurrency: usize,
) -> Result<Vec<Fetched>> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let total = documents.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    // Channel: workers send (position, outcome), main loop slots them back in order
    let (tx, mut rx) =
        tokio::sync::mpsc::channel::<(usize, Result<String, FetchError>)>(concurrency.max(1) * 2);

    for (idx, filename) in documents.iter().cloned().enumerate() {
        let fetcher = Arc::clone(&fetcher);
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();

        tokio::spawn(async move {
            let Ok(_permit) = sem.acquire().await else {
                return;
            };
            let result = fetcher.fetch(&filename).await;
            let _ = tx.send((idx, result)).await;
        });
    }

    // Drop our copy of tx so rx closes when all spawned tasks finish
    drop(tx);

    let mut slots: Vec<Option<Result<String, FetchError>>> = (0..total).map(|_| None).collect();
    while let Some((idx, result)) = rx.recv().await {
        slots[idx] = Some(result);
        pb.inc(1);
    }
    pb.finish_and_clear();

    // A task that panicked never sent; its document is unavailable like any other
    let fetched: Vec<Fetched> = documents
        .iter()
        .zip(slots)
        .map(|(filename, slot)| Fetched {
            filename: filename.clone(),
            result: slot.unwrap_or_else(|| {
                warn!("Fetch task for {} ended without a result", filename);
                Err(FetchError::TaskFailed {
                    filename: filename.clone(),
                })
            }),
        })
        .collect();

    let ok = fetched.iter().filter(|f| f.result.is_ok()).count();
    info!("Fetched {} documents ({} ok, {} unavailable)", total, ok, total - ok);
    Ok(fetched)
}

// ── Tests ──

mod catalog;
mod error;
mod fetcher;
mod parser;
mod settings;
mod snapshot;
mod store;
mod sync;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use fetcher::HttpFetcher;
use settings::Settings;
use snapshot::SnapshotWriter;
use store::{MasterStore, Store};

#[derive(Parser)]
#[command(name = "fmhy_sync", about = "Track FMHY markdown docs as stable, dated sections")]
struct Cli {
    /// Config file (default: ./fmhy_sync.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch all documents, update the master store and write today's snapshot
    Sync {
        /// Only process the first N configured documents
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Per-document overview of the master store
    Stats,
    /// List snapshot dates, or summarize one snapshot
    Snapshots {
        /// Snapshot date to summarize (YYYY-MM-DD)
        date: Option<chrono::NaiveDate>,
    },
    /// Write filename/category/raw_url metadata for the configured documents
    Catalog {
        /// Output path, or "-" for stdout
        #[arg(short, long, default_value = "output.json")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    info!(settings = ?settings, "Configuration loaded");

    let result = match cli.command {
        Commands::Sync { limit } => {
            let store = Store::new(&settings.store_path);
            let snapshots = SnapshotWriter::new(&settings.snapshot_dir);
            let documents = match limit {
                Some(n) => &settings.documents[..n.min(settings.documents.len())],
                None => &settings.documents[..],
            };

            let mut master = load_store(&store)?;
            let now = chrono::Utc::now();
            let fetcher = Arc::new(HttpFetcher::new(&settings)?);

            println!("Syncing {} documents...", documents.len());
            let stats =
                sync::sync(fetcher, documents, settings.concurrency, &mut master, now).await?;

            store
                .save(&master)
                .with_context(|| format!("Failed to save master store {:?}", store.path()))?;
            let snap = snapshots
                .write(&master, now.date_naive())
                .context("Failed to write snapshot")?;

            println!(
                "Done: {} documents ({} updated, {} unavailable).",
                stats.total, stats.updated, stats.unavailable
            );
            println!("Store:    {}", store.path().display());
            println!("Snapshot: {}", snap.display());
            Ok(())
        }
        Commands::Stats => {
            let store = Store::new(&settings.store_path);
            let master = load_store(&store)?;
            if master.files.is_empty() {
                println!("Master store is empty. Run 'sync' first.");
                return Ok(());
            }

            println!("{:>3} | {:<28} | {:>8} | {:<25}", "#", "Document", "Sections", "Last updated");
            println!("{}", "-".repeat(74));
            for (i, r) in master.files.iter().enumerate() {
                println!(
                    "{:>3} | {:<28} | {:>8} | {:<25}",
                    i + 1,
                    truncate(&r.filename, 28),
                    r.sections.len(),
                    r.last_updated.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                );
            }

            let missing: Vec<&str> = settings
                .documents
                .iter()
                .filter(|d| master.get(d).is_none())
                .map(String::as_str)
                .collect();
            if !missing.is_empty() {
                println!("\nNever fetched: {}", missing.join(", "));
            }

            println!(
                "\n{} documents | {} sections",
                master.files.len(),
                master.section_count()
            );
            Ok(())
        }
        Commands::Snapshots { date: Some(date) } => {
            let snapshots = SnapshotWriter::new(&settings.snapshot_dir);
            if !snapshots.path_for(date).exists() {
                println!("No snapshot for {}.", date);
                return Ok(());
            }
            let master = snapshots
                .load(date)
                .with_context(|| format!("Failed to load snapshot {:?}", snapshots.path_for(date)))?;
            for r in &master.files {
                println!("{:<28} {:>5} sections", truncate(&r.filename, 28), r.sections.len());
            }
            println!(
                "\n{}: {} documents | {} sections",
                date,
                master.files.len(),
                master.section_count()
            );
            Ok(())
        }
        Commands::Snapshots { date: None } => {
            let snapshots = SnapshotWriter::new(&settings.snapshot_dir);
            let dates = snapshots
                .list()
                .with_context(|| format!("Failed to list snapshots in {:?}", snapshots.dir()))?;
            if dates.is_empty() {
                println!("No snapshots in {}.", snapshots.dir().display());
                return Ok(());
            }
            for date in &dates {
                println!("{}  {}", date, snapshots.path_for(*date).display());
            }
            println!("\n{} snapshots", dates.len());
            Ok(())
        }
        Commands::Catalog { output } => {
            let meta = catalog::catalog(&settings.documents, &settings.base_url);
            let json = serde_json::to_string_pretty(&meta)?;
            if output.as_os_str() == "-" {
                println!("{}", json);
            } else {
                let mut file = std::fs::File::create(&output)
                    .with_context(|| format!("Error writing to {}", output.display()))?;
                writeln!(file, "{}", json)
                    .with_context(|| format!("Error writing to {}", output.display()))?;
                println!("Generated metadata for {} files.", meta.len());
                println!("Output saved to: {}", output.display());
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn load_store(store: &Store) -> anyhow::Result<MasterStore> {
    store
        .load()
        .with_context(|| format!("Failed to load master store {:?}", store.path()))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

// ── Tests ──

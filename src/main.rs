use anyhow::{bail, Context, Result};
use potluck_registry::config::{categories_from, DEFAULT_DATA_FILE};
use potluck_registry::{export_file_name, summarize, EntryStore, DEFAULT_LOCK_TIMEOUT};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

const USAGE: &str = "usage: potluck <init|list|summary|categories|export [dest]>";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("init") => run_init(),
        Some("list") => run_list(),
        Some("summary") => run_summary(),
        Some("categories") => run_categories(),
        Some("export") => run_export(args.get(2).map(PathBuf::from)),
        _ => bail!(USAGE),
    }
}

fn data_file() -> PathBuf {
    env::var("POTLUCK_DATA_FILE")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
}

fn open_store() -> Result<EntryStore> {
    let registry = categories_from(env::var("POTLUCK_CATEGORIES").ok().as_deref());
    let path = data_file();
    EntryStore::open(&path, Arc::new(registry), DEFAULT_LOCK_TIMEOUT)
        .with_context(|| format!("Failed to open {}", path.display()))
}

fn run_init() -> Result<()> {
    let store = open_store()?;
    let count = store.load().context("Failed to read entries")?.len();
    println!("✓ Entry store ready: {} ({} entries)", store.path().display(), count);
    Ok(())
}

fn run_list() -> Result<()> {
    let store = open_store()?;
    let entries = store.load().context("Failed to read entries")?;

    if entries.is_empty() {
        println!("No entries yet.");
        return Ok(());
    }

    println!("{:>4}  {:<20} {:<28} {:<24} {:>4}", "#", "Name", "Category", "Dish", "Qty");
    for (index, entry) in entries.iter().enumerate() {
        println!(
            "{:>4}  {:<20} {:<28} {:<24} {:>4}",
            index, entry.name, entry.category, entry.dish, entry.quantity
        );
    }
    println!("\n{} entries", entries.len());
    Ok(())
}

fn run_summary() -> Result<()> {
    let store = open_store()?;
    let entries = store.load().context("Failed to read entries")?;

    for summary in summarize(store.registry(), &entries) {
        println!("📦 {} - total {}", summary.category, summary.total);
        for item in &summary.items {
            println!("     {} x{} ({})", item.dish, item.quantity, item.name);
        }
    }
    Ok(())
}

fn run_categories() -> Result<()> {
    let store = open_store()?;
    for label in store.registry().labels() {
        println!("{}", label);
    }
    Ok(())
}

fn run_export(dest: Option<PathBuf>) -> Result<()> {
    let store = open_store()?;
    let dest = dest.unwrap_or_else(|| {
        PathBuf::from(export_file_name(store.path(), chrono::Utc::now()))
    });

    let bytes = store.raw_bytes().context("Failed to read entry store")?;
    fs::write(&dest, &bytes).with_context(|| format!("Failed to write {}", dest.display()))?;
    println!("💾 Exported {} bytes to {}", bytes.len(), dest.display());
    Ok(())
}

//! Main entry point for the harmedia CLI application.
//!
//! This binary provides a command-line interface for listing and extracting
//! media embedded in HAR captures read from the local filesystem or over HTTP.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing_subscriber::EnvFilter;

use harmedia::archive::{CompressionMethod, DosDateTime};
use harmedia::export::{self, SaveStatus};
use harmedia::{extract_media, parse_document, Cli, HttpSource, LocalFileSource, MediaRecord, Source};

/// Application entry point.
///
/// Parses command-line arguments, loads the capture from a local file or
/// HTTP URL and dispatches to the requested mode.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise derive the filter from --debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let data = if cli.is_http_url() {
        // Handle remote capture
        let source = HttpSource::new(cli.file.clone())?;
        let data = load(&source).await?;

        if !cli.is_quiet() {
            eprintln!("Downloaded: {}", format_size(source.transferred_bytes()));
        }
        data
    } else {
        load(&LocalFileSource::new(&cli.file)).await?
    };

    let document = parse_document(&data).with_context(|| format!("Failed to parse {}", cli.file))?;
    let records = extract_media(&document);
    tracing::debug!(entries = document.len(), records = records.len(), "extracted media");

    process_media(&records, &cli).await
}

async fn load<S: Source>(source: &S) -> Result<Vec<u8>> {
    tracing::info!("Loading capture from {}", source.location());
    source.read_all().await
}

/// Dispatch on CLI options.
///
/// - `--json`: gallery listing as JSON
/// - `-l` / `-v`: plain or verbose listing
/// - `NAMES`: retrieve specific files by name
/// - `-z`: bundle into a ZIP archive
/// - `-p`: decoded bytes to stdout
/// - otherwise: save every record into the output directory
async fn process_media(records: &[MediaRecord], cli: &Cli) -> Result<()> {
    if cli.json {
        let listing = export::gallery(records);
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if cli.list || cli.verbose {
        list_media(records, cli.verbose);
        return Ok(());
    }

    if !cli.names.is_empty() {
        return retrieve_named(records, cli).await;
    }

    if !cli.is_quiet() {
        let with_payload = records.iter().filter(|r| r.has_payload()).count();
        println!("Found {} media entries with base64 data.", with_payload);
    }

    if let Some(ref archive) = cli.archive {
        return write_archive(records, Path::new(archive), cli).await;
    }

    if cli.pipe {
        return pipe_all(records).await;
    }

    save_to_dir(records, cli).await
}

/// List media carrying a payload.
///
/// Simple format (`-l`) prints derived file names; verbose format (`-v`)
/// adds decoded size, mime type and source URL with a totals line.
fn list_media(records: &[MediaRecord], verbose: bool) {
    if verbose {
        println!("{:>10}  {:<24}  {:<24}  URL", "Length", "Type", "Name");
        println!("{}", "-".repeat(90));
    }

    let mut total_size = 0u64;
    let mut file_count = 0usize;

    for record in records.iter().filter(|r| r.has_payload()) {
        if !verbose {
            println!("{}", record.filename());
            continue;
        }

        // A payload that does not decode is listed without a size
        let length = match record.decode() {
            Ok(data) => {
                total_size += data.len() as u64;
                data.len().to_string()
            }
            Err(_) => "-".to_string(),
        };
        file_count += 1;

        println!(
            "{:>10}  {:<24}  {:<24}  {}",
            length,
            record.mime_type,
            record.filename(),
            record.source_url
        );
    }

    if verbose {
        println!("{}", "-".repeat(90));
        println!("{:>10}  {:<24}  {} files", total_size, "", file_count);
    }
}

/// Retrieve each requested name, writing it under its derived file name.
///
/// Every name is attempted; the command fails afterwards if any was not
/// found or did not decode.
async fn retrieve_named(records: &[MediaRecord], cli: &Cli) -> Result<()> {
    let dir = cli.output_dir();
    let show_filename = cli.pipe && cli.names.len() > 1;
    let mut failures = 0usize;

    for name in &cli.names {
        let retrieved = match export::find_by_filename(records, name) {
            Ok(retrieved) => retrieved,
            Err(e) => {
                eprintln!("{}", e);
                failures += 1;
                continue;
            }
        };

        if cli.pipe {
            write_stdout(&retrieved.filename, &retrieved.data, show_filename).await?;
            continue;
        }

        let path = dir.join(&retrieved.filename);
        if !may_write(&path, &retrieved.filename, cli).await {
            continue;
        }

        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        tokio::fs::write(&path, &retrieved.data)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        if !cli.is_quiet() {
            println!("  extracting: {} ({})", retrieved.filename, retrieved.mime_type);
        }
    }

    if failures > 0 {
        bail!("{} of {} requested files could not be retrieved", failures, cli.names.len());
    }
    Ok(())
}

/// Bundle all records into a ZIP archive at `path`.
async fn write_archive(records: &[MediaRecord], path: &Path, cli: &Cli) -> Result<()> {
    let display = path.display().to_string();
    if !may_write(path, &display, cli).await {
        return Ok(());
    }

    let method = if cli.deflate {
        CompressionMethod::Deflate
    } else {
        CompressionMethod::Stored
    };
    let modified = DosDateTime::from_naive(chrono::Local::now().naive_local());

    let (buf, summary) = export::build_archive(records, method, modified)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, &buf)
        .await
        .with_context(|| format!("Failed to write {}", display))?;

    if !cli.is_very_quiet() {
        eprintln!(
            "Archived {} files into {} ({} without data, {} failed to decode)",
            summary.stored,
            display,
            summary.without_payload,
            summary.failed
        );
    }
    Ok(())
}

/// Write every record carrying a payload to stdout, numbered like
/// [`export::save_all`] names its files.
async fn pipe_all(records: &[MediaRecord]) -> Result<()> {
    let decodable: Vec<_> = records.iter().filter(|r| r.has_payload()).collect();
    let show_filename = decodable.len() > 1;

    for (i, record) in decodable.into_iter().enumerate() {
        let name = export::archive_name(i + 1, record);
        match record.decode() {
            Ok(data) => write_stdout(&name, &data, show_filename).await?,
            Err(e) => tracing::warn!("Skipping {}: {}", name, e),
        }
    }
    Ok(())
}

/// Decode and write every record carrying a payload into the output
/// directory.
async fn save_to_dir(records: &[MediaRecord], cli: &Cli) -> Result<()> {
    let dir = cli.output_dir();
    let outcomes = export::save_all(records, &dir, cli.overwrite).await?;

    for outcome in outcomes {
        match outcome.status {
            SaveStatus::Written(_) => {
                if !cli.is_quiet() {
                    println!("  extracting: {}", outcome.name);
                }
            }
            SaveStatus::Exists => {
                if !cli.is_quiet() {
                    if cli.never_overwrite {
                        eprintln!("Skipping: {} (file exists)", outcome.name);
                    } else {
                        eprintln!("Skipping: {} (use -o to overwrite)", outcome.name);
                    }
                }
            }
            SaveStatus::Failed(e) => {
                if !cli.is_very_quiet() {
                    eprintln!("Failed to save {}: {:#}", outcome.name, e);
                }
            }
        }
    }

    Ok(())
}

/// Apply the overwrite options to an existing target.
async fn may_write(path: &Path, name: &str, cli: &Cli) -> bool {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) || cli.overwrite {
        return true;
    }

    if !cli.is_quiet() {
        if cli.never_overwrite {
            eprintln!("Skipping: {} (file exists)", name);
        } else {
            eprintln!("Skipping: {} (use -o to overwrite)", name);
        }
    }
    false
}

async fn write_stdout(name: &str, data: &[u8], show_filename: bool) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    if show_filename {
        stdout.write_all(format!("--- {} ---\n", name).as_bytes()).await?;
    }
    stdout.write_all(data).await?;
    stdout.flush().await?;
    Ok(())
}

/// Format a byte size into a human-readable string.
///
/// ```ignore
/// assert_eq!(format_size(500), "500 bytes");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

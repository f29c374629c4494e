use clap::Parser;
use std::path::{Path, PathBuf};

use crate::io::is_http_url;

#[derive(Parser, Debug)]
#[command(name = "harmedia")]
#[command(version)]
#[command(about = "Extract images and videos embedded in a HAR capture", long_about = None)]
#[command(after_help = "Examples:\n  \
  harmedia session.har                  save all media to ./images next to session.har\n  \
  harmedia -l session.har               list media file names\n  \
  harmedia -z media.zip session.har     bundle all media into media.zip\n  \
  harmedia -p session.har logo.png > logo.png   write one file to stdout")]
pub struct Cli {
    /// HAR file path or HTTP URL
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Media file names to retrieve (default: all, numbered)
    #[arg(value_name = "NAMES")]
    pub names: Vec<String>,

    /// List media file names
    #[arg(short = 'l')]
    pub list: bool,

    /// List verbosely (size, type, name)
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Print the gallery listing as JSON
    #[arg(long)]
    pub json: bool,

    /// Extract files to pipe, no messages
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Extract files into exdir (default: `images` next to FILE)
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<String>,

    /// Bundle all media into a ZIP archive instead of separate files
    #[arg(short = 'z', value_name = "ARCHIVE")]
    pub archive: Option<String>,

    /// Compress archive members with DEFLATE
    #[arg(long, requires = "archive")]
    pub deflate: bool,

    /// Never overwrite existing files
    #[arg(short = 'n')]
    pub never_overwrite: bool,

    /// Overwrite files WITHOUT prompting
    #[arg(short = 'o', conflicts_with = "never_overwrite")]
    pub overwrite: bool,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    pub fn is_http_url(&self) -> bool {
        is_http_url(&self.file)
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.pipe
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    /// Directory media is written to.
    ///
    /// Defaults to `images` beside a local HAR file, or `./images` for a URL.
    pub fn output_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.extract_dir {
            return PathBuf::from(dir);
        }

        if self.is_http_url() {
            return PathBuf::from("images");
        }

        let file = Path::new(&self.file);
        let absolute = std::path::absolute(file).unwrap_or_else(|_| file.to_path_buf());
        absolute
            .parent()
            .map(|p| p.join("images"))
            .unwrap_or_else(|| PathBuf::from("images"))
    }

    /// Default tracing filter when RUST_LOG is not set
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "harmedia=debug"
        } else {
            "harmedia=warn"
        }
    }
}

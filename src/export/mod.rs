//! Consumers of extracted media records.
//!
//! - [`gallery()`]: preview listing with `data:` URIs
//! - [`find_by_filename`]: single-file retrieval by derived filename
//! - [`save_all`]: decode and write every record into a directory
//! - [`build_archive`]: bundle every record into a ZIP archive
//!
//! Decode failures are always scoped to one record. Batch operations skip
//! the record and carry on.

mod gallery;
mod lookup;
mod save;

pub use gallery::{gallery, GalleryItem};
pub use lookup::{find_by_filename, LookupError, Retrieved};
pub use save::{archive_name, build_archive, save_all, ArchiveSummary, SaveOutcome, SaveStatus};

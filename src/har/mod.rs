//! HAR capture documents.
//!
//! A HAR file is a JSON log of HTTP exchanges recorded by a browser's network
//! inspector. Only the parts needed to find embedded media are modelled:
//!
//! - `log.entries[].request.url`
//! - `log.entries[].response.content.{mimeType, encoding, text}`
//! - `log.entries[].response.headers[].{name, value}`
//!
//! Everything else in the document is ignored.

mod parser;
mod structures;

pub use parser::{from_value, parse_document, HarError};
pub use structures::*;

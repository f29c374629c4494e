use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Content encoding marker for bodies that carry decodable media.
pub const BASE64_ENCODING: &str = "base64";

/// A parsed capture document: the ordered entries of `log.entries`.
#[derive(Debug, Clone, Default)]
pub struct CaptureDocument {
    pub entries: Vec<Entry>,
}

impl CaptureDocument {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One recorded request/response exchange.
///
/// Every field is optional on the wire. Missing or mistyped values fall back
/// to their defaults instead of failing the document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Entry {
    #[serde(deserialize_with = "lenient")]
    pub request: Request,
    #[serde(deserialize_with = "lenient")]
    pub response: Response,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Request {
    #[serde(deserialize_with = "lenient")]
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Response {
    #[serde(deserialize_with = "lenient")]
    pub content: Content,
    #[serde(deserialize_with = "lenient")]
    pub headers: Vec<Header>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Content {
    #[serde(deserialize_with = "lenient")]
    pub mime_type: String,
    #[serde(deserialize_with = "lenient")]
    pub encoding: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Header {
    #[serde(deserialize_with = "scalar_text")]
    pub name: String,
    #[serde(deserialize_with = "scalar_text")]
    pub value: String,
}

impl Entry {
    /// Build an entry directly, mostly useful for tests and callers that
    /// assemble captures from another source.
    pub fn new(url: impl Into<String>, mime_type: impl Into<String>) -> Self {
        let mut entry = Self::default();
        entry.request.url = url.into();
        entry.response.content.mime_type = mime_type.into();
        entry
    }

    /// Attach a base64 body.
    pub fn with_base64_body(mut self, text: impl Into<String>) -> Self {
        self.response.content.encoding = Some(BASE64_ENCODING.to_string());
        self.response.content.text = Some(text.into());
        self
    }

    /// Attach a body with an arbitrary (or no) encoding marker.
    pub fn with_body(mut self, encoding: Option<&str>, text: impl Into<String>) -> Self {
        self.response.content.encoding = encoding.map(str::to_string);
        self.response.content.text = Some(text.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.response.headers.push(Header {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn url(&self) -> &str {
        &self.request.url
    }

    pub fn mime_type(&self) -> &str {
        &self.response.content.mime_type
    }

    pub fn encoding(&self) -> Option<&str> {
        self.response.content.encoding.as_deref()
    }

    /// Body text, but only when it is marked as base64.
    ///
    /// Text recorded under any other encoding is never treated as media.
    pub fn base64_body(&self) -> Option<&str> {
        match self.encoding() {
            Some(BASE64_ENCODING) => self.response.content.text.as_deref(),
            _ => None,
        }
    }

    /// Value of the first header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.response
            .headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}

/// Deserialize a field, falling back to its default when the JSON value has
/// an unexpected shape (for example `null` or a number where a string is
/// expected).
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Deserialize a header field as text. Numbers and booleans keep their JSON
/// spelling (`1234` → `"1234"`); anything else becomes empty.
fn scalar_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    })
}

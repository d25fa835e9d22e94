//! Response snapshot types.
//!
//! A [`ResponseSnapshot`] holds the facts about one finished fetch that the
//! detector needs: status, headers, redirect history and the decoded body.
//! Snapshots are built once by whatever HTTP client performed the fetch and
//! are read-only afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Case-insensitive header mapping.
///
/// Names are stored lower-cased. When the same header is inserted more than
/// once, the first value is kept and later values are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    /// Create an empty header mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header. Returns `false` if a value for this name was already present.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) -> bool {
        let name = name.as_ref().to_ascii_lowercase();
        if self.0.contains_key(&name) {
            return false;
        }
        self.0.insert(name, value.into());
        true
    }

    /// Look up a header value by name, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Iterate over `(lower-cased name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of distinct headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no headers are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl From<BTreeMap<String, String>> for Headers {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<Headers> for BTreeMap<String, String> {
    fn from(headers: Headers) -> Self {
        headers.0
    }
}

/// One hop of a redirect chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectHop {
    /// URL that issued the redirect
    pub url: String,
    /// Status code returned at this hop
    pub status: u16,
}

impl RedirectHop {
    /// Create a redirect hop.
    #[must_use]
    pub fn new(url: impl Into<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            status,
        }
    }
}

/// Response body as seen by the detector.
///
/// Serialized untagged: a JSON string is decoded text, an object with an
/// `error` field is a body that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Body {
    /// Fully decoded text content
    Text(String),
    /// The body bytes could not be decoded as text
    Undecodable {
        /// Decoder error message
        error: String,
    },
}

impl Body {
    /// Decoded text, if decoding succeeded.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Undecodable { .. } => None,
        }
    }
}

/// Immutable facts about one fetched response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSnapshot {
    status: u16,
    #[serde(default)]
    headers: Headers,
    #[serde(default)]
    redirect_history: Vec<RedirectHop>,
    body: Body,
}

impl ResponseSnapshot {
    /// Create a snapshot from a status code and decoded body text.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Headers::new(),
            redirect_history: Vec::new(),
            body: Body::Text(body.into()),
        }
    }

    /// Create a snapshot from raw body bytes, decoding them as UTF-8.
    ///
    /// Invalid UTF-8 does not fail construction; the body is recorded as
    /// undecodable and the detector reports it as a decode failure.
    #[must_use]
    pub fn from_bytes(status: u16, bytes: Vec<u8>) -> Self {
        let body = match String::from_utf8(bytes) {
            Ok(text) => Body::Text(text),
            Err(e) => Body::Undecodable {
                error: e.to_string(),
            },
        };

        Self {
            status,
            headers: Headers::new(),
            redirect_history: Vec::new(),
            body,
        }
    }

    /// Attach a header. The first value inserted for a name wins.
    #[must_use]
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Replace the header mapping.
    #[must_use]
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Append a redirect hop. Hops must be added in chronological order.
    #[must_use]
    pub fn with_redirect(mut self, url: impl Into<String>, status: u16) -> Self {
        self.redirect_history.push(RedirectHop::new(url, status));
        self
    }

    /// Replace the redirect history.
    #[must_use]
    pub fn with_redirect_history(mut self, history: Vec<RedirectHop>) -> Self {
        self.redirect_history = history;
        self
    }

    /// Transport status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Redirect hops in chronological order.
    #[must_use]
    pub fn redirect_history(&self) -> &[RedirectHop] {
        &self.redirect_history
    }

    /// Response body.
    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Decoded body text, if decoding succeeded.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.body.as_text()
    }

    /// Byte length of the decoded body (0 when undecodable).
    #[must_use]
    pub fn content_length(&self) -> usize {
        self.text().map_or(0, str::len)
    }
}

#[cfg(feature = "reqwest")]
impl ResponseSnapshot {
    /// Capture a snapshot from a `reqwest` response, consuming its body.
    ///
    /// `reqwest` does not expose the redirect chain it followed, so callers
    /// that track hops (for example with a custom redirect policy) pass them
    /// in. Header values that are not visible ASCII are skipped.
    pub async fn from_reqwest(
        response: reqwest::Response,
        redirect_history: Vec<RedirectHop>,
    ) -> Self {
        let status = response.status().as_u16();
        let headers = Headers::from_header_map(response.headers());

        let body = match response.text().await {
            Ok(text) => Body::Text(text),
            Err(e) => Body::Undecodable {
                error: e.to_string(),
            },
        };

        Self {
            status,
            headers,
            redirect_history,
            body,
        }
    }
}

#[cfg(feature = "reqwest")]
impl Headers {
    fn from_header_map(map: &reqwest::header::HeaderMap) -> Self {
        let mut headers = Self::new();
        for (name, value) in map {
            match value.to_str() {
                Ok(value) => {
                    headers.insert(name.as_str(), value);
                }
                Err(_) => {
                    tracing::debug!(header = %name, "skipping non-text header value");
                }
            }
        }
        headers
    }
}

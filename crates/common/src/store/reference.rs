/// A string pointing at content, classified by its literal prefix
///
/// Classification is a plain prefix test rather than URL parsing, so a
/// content address can never be mistaken for a scheme and vice versa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Already fetchable over HTTP(S)
    Url(String),
    /// Inline `data:` URL
    Data(String),
    /// Bare content address, fetched through the aggregator
    BlobId(String),
}

impl Reference {
    pub fn classify(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            Self::Url(s.to_string())
        } else if s.starts_with("data:") {
            Self::Data(s.to_string())
        } else {
            Self::BlobId(s.to_string())
        }
    }

    /// Turn the reference into a fetchable URL, templating bare content
    /// addresses onto `aggregator`
    pub fn into_url(self, aggregator: &str) -> String {
        match self {
            Self::Url(url) | Self::Data(url) => url,
            Self::BlobId(id) => format!("{}/v1/{}", aggregator.trim_end_matches('/'), id),
        }
    }
}

/// Resolve a reference string to a URL
pub fn resolve_reference(aggregator: &str, reference: &str) -> String {
    Reference::classify(reference).into_url(aggregator)
}

use std::fmt;

/// Base URL of the journal service plus appended path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiUrl(String);

impl AsRef<str> for ApiUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl ApiUrl {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self(base_url.into().trim_end_matches('/').to_string())
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }

    /// Append one path segment, percent-encoding it.
    pub fn append_segment(&self, segment: impl fmt::Display) -> Self {
        let encoded = urlencoding::encode(&segment.to_string()).into_owned();
        self.append_path(&encoded)
    }
}

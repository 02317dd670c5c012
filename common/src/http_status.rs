//! HTTP status classification for upstream feed responses.

/// Status code returned by the rate feed.
///
/// Stored as the raw number so errors can report it without re-parsing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpStatusCode(pub u16);

impl HttpStatusCode {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }

    /// The feed answers 404 for base currencies it does not publish.
    pub fn is_not_found(&self) -> bool {
        self.0 == 404
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.0)
    }
}

impl From<u16> for HttpStatusCode {
    fn from(code: u16) -> Self {
        HttpStatusCode(code)
    }
}

impl std::fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

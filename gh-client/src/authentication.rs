use std::fmt::Debug;

use reqwest::header::HeaderValue;

/// A GitHub personal access token. The value is always provided by the
/// caller; there is no default.
#[derive(Clone)]
pub struct TokenAuth {
    token: String,
}

impl Debug for TokenAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuth").field("token", &"****").finish()
    }
}

impl TokenAuth {
    pub fn new(token: String) -> Self {
        Self { token }
    }

    pub(crate) fn header_value(&self) -> HeaderValue {
        let buf = format!("token {}", self.token).into_bytes();
        let mut header = HeaderValue::from_bytes(&buf).expect("should always be valid HeaderValue");
        header.set_sensitive(true);
        header
    }
}

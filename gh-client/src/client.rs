use std::fmt::Debug;

use reqwest::{header::AUTHORIZATION, RequestBuilder, Response};
use url::Url;

use crate::{authentication::TokenAuth, error::APIError};

// The API rejects requests without a User-Agent.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct GHClient {
    http_client: reqwest::Client,
    api_url: Url,
    authenticator: TokenAuth,
}

impl Debug for GHClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GHClient")
            .field("api_url", &self.api_url.as_str())
            .field("authenticator", &self.authenticator)
            .finish_non_exhaustive()
    }
}

impl GHClient {
    pub fn new(api_url: Url, authenticator: TokenAuth) -> Result<Self, APIError> {
        let http_client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(GHClient {
            http_client,
            api_url,
            authenticator,
        })
    }

    pub(crate) fn get(&self, route: &[&str]) -> RequestBuilder {
        let mut url = self.api_url.clone();
        url.path_segments_mut().expect("Base url").extend(route);
        self.http_client
            .get(url)
            .header(AUTHORIZATION, self.authenticator.header_value())
    }

    pub(crate) async fn execute(
        &self,
        request: reqwest::Request,
    ) -> Result<Response, reqwest::Error> {
        let resp = self.http_client.execute(request).await?;
        resp.error_for_status()
    }

    /// Fetch the raw bytes behind an absolute URL.
    ///
    /// Release assets live on the download host, not the API host, and are
    /// served without credentials, so no authorization header is attached.
    pub async fn download(&self, url: &Url) -> Result<Vec<u8>, APIError> {
        let resp = self
            .http_client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.bytes().await?.to_vec())
    }
}

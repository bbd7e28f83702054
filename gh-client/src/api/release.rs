use std::sync::Arc;

use time::OffsetDateTime;
use url::Url;

use crate::{client::GHClient, error::APIError};

/// A tagged release as reported by the listing endpoint.
///
/// `published_at` is null on the wire for draft releases, which also have no
/// downloadable assets.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: Url,
}

#[derive(Debug, Clone)]
pub struct Repository {
    client: Arc<GHClient>,
    owner: String,
    name: String,
}

impl Repository {
    /// Expects the usual `owner/name` form.
    pub fn from_spec(client: Arc<GHClient>, spec: &str) -> Result<Self, APIError> {
        match spec.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    client,
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(APIError::InvalidRepository(spec.to_string())),
        }
    }

    pub fn name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// List every release of the repository, newest first, as the API
    /// returns them. A non-success status fails the whole listing.
    pub async fn releases(&self) -> Result<Vec<Release>, APIError> {
        let req = self
            .client
            .get(&["repos", &self.owner, &self.name, "releases"])
            .build()?;
        let resp = self.client.execute(req).await?;
        Ok(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authentication::TokenAuth;
    use mockito::Server;

    fn client_for(server: &Server) -> Arc<GHClient> {
        let url = Url::parse(&server.url()).unwrap();
        Arc::new(GHClient::new(url, TokenAuth::new("t0ken".to_string())).unwrap())
    }

    #[tokio::test]
    async fn lists_releases_with_token_header() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/knative/operator/releases")
            .match_header("authorization", "token t0ken")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {
                        "tag_name": "knative-v1.14.5",
                        "published_at": "2024-05-28T09:00:00Z",
                        "assets": [
                            {
                                "name": "knative-operator-v1.14.5.tgz",
                                "browser_download_url": "https://example.com/knative-operator-v1.14.5.tgz"
                            }
                        ]
                    },
                    {
                        "tag_name": "knative-v1.15.0-draft",
                        "published_at": null,
                        "assets": []
                    }
                ]"#,
            )
            .create_async()
            .await;

        let repo = Repository::from_spec(client_for(&server), "knative/operator").unwrap();
        let releases = repo.releases().await.unwrap();
        mock.assert_async().await;

        assert_eq!(releases.len(), 2);
        assert_eq!(releases[0].tag_name, "knative-v1.14.5");
        assert!(releases[0].published_at.is_some());
        assert_eq!(releases[0].assets[0].name, "knative-operator-v1.14.5.tgz");
        assert_eq!(releases[1].published_at, None);
        assert!(releases[1].assets.is_empty());
    }

    #[tokio::test]
    async fn listing_failure_is_fatal() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/knative/operator/releases")
            .with_status(403)
            .create_async()
            .await;

        let repo = Repository::from_spec(client_for(&server), "knative/operator").unwrap();
        assert!(repo.releases().await.is_err());
    }

    #[tokio::test]
    async fn downloads_raw_bytes_without_credentials() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/download/chart.tgz")
            .match_header("authorization", mockito::Matcher::Missing)
            .with_status(200)
            .with_body(b"archive bytes")
            .create_async()
            .await;

        let client = client_for(&server);
        let url = Url::parse(&format!("{}/download/chart.tgz", server.url())).unwrap();
        let bytes = client.download(&url).await.unwrap();
        mock.assert_async().await;
        assert_eq!(bytes, b"archive bytes");
    }

    #[tokio::test]
    async fn download_failure_is_fatal() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/download/chart.tgz")
            .with_status(404)
            .create_async()
            .await;

        let client = client_for(&server);
        let url = Url::parse(&format!("{}/download/chart.tgz", server.url())).unwrap();
        assert!(client.download(&url).await.is_err());
    }

    #[test]
    fn rejects_malformed_repository_specs() {
        let url = Url::parse("https://api.github.com").unwrap();
        let client = Arc::new(GHClient::new(url, TokenAuth::new("t0ken".to_string())).unwrap());
        for spec in ["knative", "knative/operator/extra", "/operator", "knative/"] {
            assert!(
                matches!(
                    Repository::from_spec(client.clone(), spec),
                    Err(APIError::InvalidRepository(_))
                ),
                "accepted {spec:?}"
            );
        }
    }
}

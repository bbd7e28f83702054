use std::{fs::File, path::Path};

use gh_client::{client::GHClient, error::APIError};
use serde::ser::{Serialize, SerializeMap, Serializer};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use tracing::info;
use url::Url;

use crate::{chart::ChartDetails, filter::SelectedAsset};

const INDEX_API_VERSION: &str = "v1";
const ENTRY_API_VERSION: &str = "v2";

/// One chart version in the repository index, in the layout `helm repo`
/// clients expect. `created` is the publish time of the release the archive
/// was attached to, not the time the index was built.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct IndexEntry {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub name: String,
    pub version: String,
    pub urls: Vec<Url>,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    pub digest: String,
    pub description: String,
    #[serde(rename = "appVersion")]
    pub app_version: String,
}

/// A chart repository index: chart name to its published versions.
///
/// Both the chart keys and the versions under a key keep the order the
/// assets were processed in.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Index {
    entries: Vec<(String, Vec<IndexEntry>)>,
}

impl Index {
    /// Download and hash every selected asset, in order.
    ///
    /// A failed download fails the whole build; there is no partial index.
    pub async fn build(client: &GHClient, assets: &[SelectedAsset]) -> Result<Self, APIError> {
        let mut index = Index::default();
        for asset in assets {
            info!(
                "Processing Helm chart release: {} version: {} from URL: {}",
                asset.chart_name, asset.chart_version, asset.download_url
            );
            let bytes = client.download(&asset.download_url).await?;
            let digest = hex::encode(Sha256::digest(&bytes));
            let details = ChartDetails::from_archive(&bytes);
            index.push(IndexEntry {
                api_version: ENTRY_API_VERSION.to_string(),
                name: asset.chart_name.clone(),
                version: asset.chart_version.clone(),
                urls: vec![asset.download_url.clone()],
                created: asset.release_date,
                digest,
                description: details.description,
                app_version: details.version,
            });
        }
        Ok(index)
    }

    fn push(&mut self, entry: IndexEntry) {
        match self.entries.iter_mut().find(|(name, _)| *name == entry.name) {
            Some((_, entries)) => entries.push(entry),
            None => self.entries.push((entry.name.clone(), vec![entry])),
        }
    }
}

impl Serialize for Index {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("apiVersion", INDEX_API_VERSION)?;
        map.serialize_entry("entries", &Entries(&self.entries))?;
        map.end()
    }
}

// A derived map type would not keep the first-seen chart order.
struct Entries<'a>(&'a [(String, Vec<IndexEntry>)]);

impl Serialize for Entries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, entries) in self.0 {
            map.serialize_entry(name, entries)?;
        }
        map.end()
    }
}

/// Build the full index, then write it out.
///
/// The output file only appears once every asset has been downloaded and
/// hashed.
pub async fn create_index(
    client: &GHClient,
    assets: &[SelectedAsset],
    path: &Path,
) -> anyhow::Result<()> {
    let index = Index::build(client, assets).await?;
    serde_yaml::to_writer(File::create(path)?, &index)?;
    Ok(())
}

use std::sync::LazyLock;

use gh_client::api::release::Release;
use regex::Regex;
use time::OffsetDateTime;
use tracing::debug;
use url::Url;

/// Packaged operator charts attached to a release, e.g.
/// `knative-operator-v1.14.5.tgz`. Anchored, so checksums files or renamed
/// copies never match.
static CHART_ARCHIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(knative-operator)-(v?\d+\.\d+\.\d+)\.tgz$").unwrap());

/// A chart archive picked out of a release, carrying the fields the index
/// needs from its release and its filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedAsset {
    pub release_tag: String,
    pub chart_name: String,
    pub chart_version: String,
    pub download_url: Url,
    pub release_date: OffsetDateTime,
}

/// Scan releases for packaged chart archives.
///
/// Releases are visited in listed order, assets within a release likewise;
/// a release without matching assets contributes nothing. Chart name and
/// version come from the filename's capture groups, so every selected asset
/// has a well-formed pair.
pub fn find_chart_assets(releases: &[Release]) -> Vec<SelectedAsset> {
    let mut selected = Vec::new();
    for release in releases {
        let Some(release_date) = release.published_at else {
            debug!(tag = %release.tag_name, "Skipping unpublished release");
            continue;
        };
        for asset in &release.assets {
            let Some(captures) = CHART_ARCHIVE.captures(&asset.name) else {
                continue;
            };
            selected.push(SelectedAsset {
                release_tag: release.tag_name.clone(),
                chart_name: captures[1].to_string(),
                chart_version: captures[2].to_string(),
                download_url: asset.browser_download_url.clone(),
                release_date,
            });
        }
    }
    selected
}

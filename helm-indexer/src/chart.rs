use std::io::Read;

use flate2::read::GzDecoder;
use serde::Deserialize;
use tracing::debug;

const NO_DESCRIPTION: &str = "No description available";
const NO_VERSION: &str = "No version available";

/// The fields read from a chart's `Chart.yaml`. The rest of the manifest is
/// ignored.
#[derive(Debug, Deserialize)]
struct Chart {
    description: Option<String>,
    version: Option<String>,
}

#[derive(Debug, thiserror::Error)]
enum ChartError {
    #[error("Unable to read archive")]
    Archive(#[from] std::io::Error),
    #[error("No chart manifest in archive")]
    MissingManifest,
    #[error("Unable to parse chart manifest")]
    Manifest(#[from] serde_yaml::Error),
}

/// Description and version of a packaged chart, with fixed fallbacks for
/// archives the manifest cannot be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartDetails {
    pub description: String,
    pub version: String,
}

impl Default for ChartDetails {
    fn default() -> Self {
        Self {
            description: NO_DESCRIPTION.to_string(),
            version: NO_VERSION.to_string(),
        }
    }
}

impl ChartDetails {
    /// Read the chart manifest out of a gzipped chart archive.
    ///
    /// A broken archive, a missing manifest and an unparsable manifest all
    /// yield the fallback values instead of an error; the caller still gets
    /// an index entry.
    pub fn from_archive(bytes: &[u8]) -> Self {
        match read_chart(bytes) {
            Ok(chart) => ChartDetails {
                description: chart
                    .description
                    .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
                version: chart.version.unwrap_or_else(|| NO_VERSION.to_string()),
            },
            Err(error) => {
                debug!(%error, "Unable to extract chart details");
                ChartDetails::default()
            }
        }
    }
}

/// Charts are packaged as `<chart-dir>/Chart.yaml` plus templates, so the
/// manifest is the entry exactly one directory down.
fn read_chart(bytes: &[u8]) -> Result<Chart, ChartError> {
    let mut archive = tar::Archive::new(GzDecoder::new(bytes));
    for entry in archive.entries()? {
        let mut entry = entry?;
        let is_manifest = {
            let path = entry.path()?;
            path.components().count() == 2 && path.file_name().is_some_and(|f| f == "Chart.yaml")
        };
        if is_manifest {
            let mut manifest = Vec::new();
            entry.read_to_end(&mut manifest)?;
            return Ok(serde_yaml::from_slice(&manifest)?);
        }
    }
    Err(ChartError::MissingManifest)
}

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use gh_client::{
    api::release::Repository, authentication::TokenAuth, client::GHClient, files::GhHosts,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

mod chart;
mod filter;
mod index;

#[derive(Parser, Debug)]
struct Cli {
    /// Repository to scan, in `owner/name` form.
    repo: String,
    #[arg(short, long)]
    token: Option<String>,
    #[arg(short, long, default_value = "https://api.github.com")]
    api_url: Url,
    #[arg(short, long, default_value = "index.yaml")]
    output: PathBuf,
}

#[tokio::main]
async fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }

    tracing_subscriber::fmt::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Cli::parse();

    let token = match args.token {
        Some(token) => token,
        None => {
            let cfg = GhHosts::new(None).expect("Unable to read the gh hosts file");
            let host = args.api_url.host_str().expect("API url has no host");
            cfg.token_for(host)
                .unwrap_or_else(|| panic!("No token given and none in the gh hosts file for {host}"))
                .to_string()
        }
    };

    let client = Arc::new(
        GHClient::new(args.api_url.clone(), TokenAuth::new(token))
            .expect("Unable to create the GitHub client"),
    );

    let repo = Repository::from_spec(client.clone(), &args.repo).expect("Invalid repository");
    let releases = repo.releases().await.expect("Unable to list releases");
    let assets = filter::find_chart_assets(&releases);
    info!(
        "Found {} Helm chart assets in the releases of {}",
        assets.len(),
        repo.name()
    );

    if assets.is_empty() {
        info!("No chart archives in the releases, not writing an index");
        return;
    }

    index::create_index(&client, &assets, &args.output)
        .await
        .expect("Unable to build the chart index");
    info!("Wrote chart index to {}", args.output.display());
}

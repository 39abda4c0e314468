//! The download stage: copy the five source CSVs into the raw directory.
//!
//! Every source is read and checked before the first file is written.

mod client;

pub use client::{BasicClient, HttpClient};

use anyhow::{Context, Result, bail};
use std::fs;
use tracing::{debug, info};

use crate::config::{
    RAW_CHARACTERS, RAW_DIRECTOR, RAW_MOVIES_TOTAL_GROSS, RAW_REVENUE, RAW_VOICE_ACTORS,
    StagePaths,
};
use crate::tables::write_atomic;

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Fetches `location` over HTTP, or reads it from disk when it is not a URL.
#[tracing::instrument(skip(client))]
pub async fn load_source<C: HttpClient>(client: &C, location: &str) -> Result<Vec<u8>> {
    let bytes = if location.starts_with("http://") || location.starts_with("https://") {
        fetch_bytes(client, location).await?
    } else {
        tokio::fs::read(location).await?
    };
    debug!(bytes = bytes.len(), "Source loaded");
    Ok(bytes)
}

/// Fails unless `bytes` parses as CSV with at least one named column.
pub fn check_csv(bytes: &[u8]) -> Result<()> {
    let mut rdr = csv::Reader::from_reader(bytes);
    let headers = rdr.headers()?;
    if headers.iter().all(|h| h.trim().is_empty()) {
        bail!("no CSV header row");
    }
    for record in rdr.records() {
        record?;
    }
    Ok(())
}

/// Downloads every source with a [`BasicClient`].
pub async fn download(paths: &StagePaths) -> Result<()> {
    let client = BasicClient::new()?;
    download_with(&client, paths).await
}

#[tracing::instrument(skip_all, fields(out_dir = %paths.out_dir.display()))]
pub async fn download_with<C: HttpClient>(client: &C, paths: &StagePaths) -> Result<()> {
    let s = &paths.sources;
    let targets = [
        (&s.characters, RAW_CHARACTERS),
        (&s.director, RAW_DIRECTOR),
        (&s.movies_total_gross, RAW_MOVIES_TOTAL_GROSS),
        (&s.revenue, RAW_REVENUE),
        (&s.voice_actors, RAW_VOICE_ACTORS),
    ];

    let mut bodies = Vec::with_capacity(targets.len());
    for (location, name) in targets {
        let bytes = load_source(client, location)
            .await
            .with_context(|| format!("failed to fetch '{location}'"))?;
        check_csv(&bytes).with_context(|| format!("'{location}' is not a CSV table"))?;
        bodies.push((name, bytes));
    }

    fs::create_dir_all(&paths.out_dir)
        .with_context(|| format!("failed to create '{}'", paths.out_dir.display()))?;
    for (name, bytes) in bodies {
        let path = paths.out_dir.join(name);
        write_atomic(&path, &bytes)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        info!(file = name, bytes = bytes.len(), "Raw table saved");
    }

    Ok(())
}

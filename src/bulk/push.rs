//! POST an NDJSON bulk body to `<base-url>/_bulk`.

use anyhow::{Context, Result, bail};
use log::{debug, info};
use reqwest::Url;
use reqwest::blocking::Client;

use crate::utils::config::BulkConsts;

/// `<base>/_bulk`, keeping any path prefix on the base URL.
pub fn bulk_url(base: &str) -> Result<Url> {
    let mut url = Url::parse(base)
        .with_context(|| format!("error while parsing elasticsearch url ({base})"))?;
    let path = format!(
        "{}/{}",
        url.path().trim_end_matches('/'),
        BulkConsts::PATH_SUFFIX
    );
    url.set_path(&path);
    Ok(url)
}

/// Split a body into chunks of at most `docs_per_chunk` documents (two lines each).
/// `docs_per_chunk == 0` keeps the whole body in one chunk.
pub fn split_bulk_body(body: &[u8], docs_per_chunk: usize) -> Vec<Vec<u8>> {
    if body.is_empty() {
        return Vec::new();
    }
    if docs_per_chunk == 0 {
        return vec![body.to_vec()];
    }
    let lines: Vec<&[u8]> = body.split_inclusive(|b| *b == b'\n').collect();
    lines
        .chunks(docs_per_chunk * BulkConsts::LINES_PER_DOC)
        .map(|chunk| chunk.concat())
        .collect()
}

/// Push `body` to the backend. Any transport error or non-2xx status fails the push.
pub fn push(base_url: &str, body: &[u8], bulk_size: usize) -> Result<()> {
    let url = bulk_url(base_url)?;
    let chunks = split_bulk_body(body, bulk_size);
    if chunks.is_empty() {
        info!("Nothing to push");
        return Ok(());
    }
    let client = Client::builder()
        .timeout(BulkConsts::TIMEOUT)
        .build()
        .context("build http client")?;

    let total = chunks.len();
    for (i, chunk) in chunks.into_iter().enumerate() {
        debug!("POST {} ({} bytes, chunk {}/{})", url, chunk.len(), i + 1, total);
        let resp = client
            .post(url.clone())
            .header(reqwest::header::CONTENT_TYPE, BulkConsts::CONTENT_TYPE)
            .body(chunk)
            .send()
            .context("error while pushing to elasticsearch")?;
        let status = resp.status();
        if !status.is_success() {
            bail!("wrong status code ({})", status.as_u16());
        }
    }
    info!("Pushed {} bulk request(s) to {}", total, url);
    Ok(())
}

/*============================================================
  Synavera Project: Syn-Compat
  Module: syncompat_core::catalog
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Query Splunkbase for the full app catalog (releases and
    their platform compatibility) and fetch the documentation
    pages describing premium app compatibility and published
    platform versions.

  Security / Safety Notes:
    Performs read-only HTTPS GET requests to public endpoints.
    No credentials are transmitted.

  Dependencies:
    reqwest for HTTP, serde for response parsing, tokio for
    concurrent page retrieval.

  Operational Scope:
    Fetched once per batch; every app in the batch is resolved
    against the same snapshot.

  Revision History:
    2026-09-14 COD  Implemented asynchronous Splunkbase client.
    2026-10-02 COD  Paginate until a short page instead of a
                    fixed app count.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Defensive retry logic with exponential backoff
    - Structured response parsing with explicit error paths
    - Configurable timeouts and parallelism
============================================================*/

use std::collections::HashMap;
use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};
use tokio::time::sleep;
use urlencoding::encode;

use crate::config::{CatalogConfig, DocsConfig};
use crate::docs::{parse_platform_versions, parse_premium_matrix, PremiumMatrix};
use crate::error::{Result, SyncompatError};

/// Splunkbase apps keyed by their unique id.
pub type Catalog = HashMap<u64, CatalogEntry>;

const INCLUDE: &str = "releases,releases.content,releases.splunk_compatibility,\
releases.cim_compatibility,release,release.content,release.cim_compatibility,\
release.splunk_compatibility";

/// One Splunkbase app.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub uid: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub appid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub releases: Vec<Release>,
}

/// One published release of a Splunkbase app.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub splunk_compatibility: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_compatibility: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
}

#[derive(Debug, Deserialize)]
struct CatalogPage {
    #[serde(default, deserialize_with = "null_as_default")]
    results: Vec<CatalogEntry>,
}

/// Data shared by every resolution in a batch.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub catalog: Catalog,
    pub matrix: PremiumMatrix,
}

/// Client for Splunkbase and the Splunk documentation site.
#[derive(Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    page_size: usize,
    max_apps: usize,
    max_parallel_requests: usize,
    catalog_timeout: Duration,
    catalog_retries: usize,
    matrix_url: String,
    versions_url: String,
    docs_timeout: Duration,
    docs_retries: usize,
}

impl CatalogClient {
    /// Construct a new client from configuration.
    pub fn new(catalog: &CatalogConfig, docs: &DocsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("Syn-Compat-Core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| {
                SyncompatError::Network(format!("Failed to build HTTP client: {err}"))
            })?;

        Ok(Self {
            client,
            base_url: catalog.base_url.clone(),
            page_size: catalog.page_size.max(1),
            max_apps: catalog.max_apps.max(1),
            max_parallel_requests: catalog.max_parallel_requests.max(1),
            catalog_timeout: Duration::from_secs(catalog.timeout),
            catalog_retries: catalog.max_retries.max(1),
            matrix_url: docs.matrix_url.clone(),
            versions_url: docs.versions_url.clone(),
            docs_timeout: Duration::from_secs(docs.timeout),
            docs_retries: docs.max_retries.max(1),
        })
    }

    /// Fetch catalog and premium matrix concurrently.
    pub async fn fetch_snapshot(&self) -> Result<Snapshot> {
        let (catalog, matrix) =
            tokio::try_join!(self.fetch_catalog(), self.fetch_premium_matrix())?;
        Ok(Snapshot { catalog, matrix })
    }

    /// Fetch every Splunkbase app.
    ///
    /// Pages are requested in concurrent waves of `max_parallel_requests`;
    /// the first wave containing a short page ends the walk.
    pub async fn fetch_catalog(&self) -> Result<Catalog> {
        let mut catalog = Catalog::new();
        let max_pages = self.max_apps.div_ceil(self.page_size);
        let mut next_page = 0usize;

        while next_page < max_pages {
            let wave_end = (next_page + self.max_parallel_requests).min(max_pages);
            let mut tasks = Vec::new();
            for page in next_page..wave_end {
                let client = self.clone();
                let offset = page * self.page_size;
                tasks.push(tokio::spawn(async move { client.fetch_page(offset).await }));
            }

            let mut exhausted = false;
            for task in tasks {
                let entries = task.await.map_err(|err| {
                    SyncompatError::Runtime(format!("Catalog page task failed: {err}"))
                })??;
                if entries.len() < self.page_size {
                    exhausted = true;
                }
                for entry in entries {
                    catalog.insert(entry.uid, entry);
                }
            }

            if exhausted {
                break;
            }
            next_page = wave_end;
        }

        Ok(catalog)
    }

    /// Fetch and parse the premium app compatibility matrix.
    pub async fn fetch_premium_matrix(&self) -> Result<PremiumMatrix> {
        let body = self
            .get_text(&self.matrix_url, self.docs_timeout, self.docs_retries)
            .await?;
        parse_premium_matrix(&body)
    }

    /// Fetch the list of published Splunk platform versions.
    pub async fn fetch_platform_versions(&self) -> Result<Vec<String>> {
        let body = self
            .get_text(&self.versions_url, self.docs_timeout, self.docs_retries)
            .await?;
        parse_platform_versions(&body)
    }

    fn compose_url(&self, offset: usize) -> String {
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}limit={}&offset={offset}&include={}",
            self.base_url,
            self.page_size,
            encode(INCLUDE)
        )
    }

    async fn fetch_page(&self, offset: usize) -> Result<Vec<CatalogEntry>> {
        let url = self.compose_url(offset);
        let response = self
            .get_with_retries(&url, self.catalog_timeout, self.catalog_retries)
            .await?;
        let page = response.json::<CatalogPage>().await.map_err(|err| {
            SyncompatError::Serialization(format!(
                "Failed to decode Splunkbase page at offset {offset}: {err}"
            ))
        })?;
        Ok(page.results)
    }

    async fn get_text(&self, url: &str, timeout: Duration, retries: usize) -> Result<String> {
        let response = self.get_with_retries(url, timeout, retries).await?;
        response.text().await.map_err(|err| {
            SyncompatError::Serialization(format!("Failed to read response body from {url}: {err}"))
        })
    }

    async fn get_with_retries(
        &self,
        url: &str,
        timeout: Duration,
        retries: usize,
    ) -> Result<reqwest::Response> {
        let mut attempt = 0;
        loop {
            let mut request = self.client.get(url);
            if !timeout.is_zero() {
                request = request.timeout(timeout);
            }
            let response = request.send().await.map_err(|err| {
                SyncompatError::Network(format!("Request to {url} failed: {err}"))
            })?;

            if response.status() == StatusCode::OK {
                return Ok(response);
            }

            attempt += 1;
            if attempt >= retries {
                return Err(SyncompatError::Network(format!(
                    "Request {url} failed with status {} after {attempt} attempts",
                    response.status()
                )));
            }
            let exponent = (attempt as u32).min(8);
            let backoff = Duration::from_millis(200_u64.saturating_mul(1_u64 << exponent));
            sleep(backoff).await;
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

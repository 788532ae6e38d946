//! Blocking HTTP access to the upstream API, with retry and backoff.

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::catalog::{AgenciesResponse, CorrectionRecord, CorrectionsResponse, TitleInfo, TitlesResponse};
use super::{CatalogSource, DocumentFetcher, FetchError};
use crate::config::EngineConfig;
use crate::types::agency::Agency;
use crate::types::identifiers::DocumentKey;

const AGENCIES_PATH: &str = "/api/admin/v1/agencies.json";
const TITLES_PATH: &str = "/api/versioner/v1/titles.json";
const CORRECTIONS_PATH: &str = "/api/admin/v1/corrections.json";

#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
    max_retries: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl HttpSource {
    pub fn new(config: &EngineConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()
            .map_err(|e| FetchError::Transport {
                url: config.base_url.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
        })
    }

    pub fn document_url(&self, key: &DocumentKey) -> String {
        format!(
            "{}/api/versioner/v1/full/{}/title-{}.xml",
            self.base_url, key.issue_date, key.title
        )
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.get(&url, "application/json")?;
        resp.json::<T>().map_err(|e| FetchError::Decode {
            url,
            reason: e.to_string(),
        })
    }

    /// GET with retries on transport errors, 429 and 5xx. Other statuses
    /// fail immediately.
    fn get(&self, url: &str, accept: &str) -> Result<Response, FetchError> {
        let mut backoff = self.initial_backoff;
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                debug!(url, attempt, max_retries = self.max_retries, ?backoff, "retrying request");
                std::thread::sleep(backoff);
                backoff = (backoff * 2).min(self.max_backoff);
            }

            match self.client.get(url).header(ACCEPT, accept).send() {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        return Ok(resp);
                    }
                    let err = FetchError::Status {
                        url: url.to_string(),
                        status: status.as_u16(),
                    };
                    if !(status.is_server_error() || status.as_u16() == 429) {
                        return Err(err);
                    }
                    last_err = Some(err);
                }
                Err(e) => {
                    last_err = Some(FetchError::Transport {
                        url: url.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Err(last_err.unwrap_or_else(|| FetchError::Transport {
            url: url.to_string(),
            reason: "no attempt made".into(),
        }))
    }
}

impl DocumentFetcher for HttpSource {
    fn fetch_document(&self, key: &DocumentKey) -> Result<Box<dyn Read + Send>, FetchError> {
        let url = self.document_url(key);
        let resp = self.get(&url, "application/xml")?;
        Ok(Box::new(resp))
    }
}

impl CatalogSource for HttpSource {
    fn fetch_titles(&self) -> Result<Vec<TitleInfo>, FetchError> {
        self.get_json::<TitlesResponse>(TITLES_PATH).map(|r| r.titles)
    }

    fn fetch_agencies(&self) -> Result<Vec<Agency>, FetchError> {
        self.get_json::<AgenciesResponse>(AGENCIES_PATH).map(|r| r.agencies)
    }

    fn fetch_corrections(&self) -> Result<Vec<CorrectionRecord>, FetchError> {
        self.get_json::<CorrectionsResponse>(CORRECTIONS_PATH)
            .map(|r| r.ecfr_corrections)
    }
}

//! Ingestion collaborator: cursor-paginated fetch of raw game records from
//! the stats API. The client never sleeps or retries on its own; a rate
//! limit surfaces as `PipelineError::RateLimited` and the orchestration
//! layer decides whether to pause.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::error::{PipelineError, Result};
use crate::observability::metrics;

/// One page of the games endpoint: a data array plus pagination metadata.
#[derive(Debug, Deserialize)]
struct GamesPage {
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default)]
    meta: PageMeta,
}

#[derive(Debug, Default, Deserialize)]
struct PageMeta {
    next_cursor: Option<Value>,
}

pub struct GamesApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    api_key: String,
}

impl GamesApiClient {
    pub fn new(config: ApiConfig, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            api_key,
        }
    }

    /// Fetch every game of one season, following `next_cursor` until the API
    /// stops returning one or the page cap is reached.
    pub async fn fetch_season(&self, season: i32) -> Result<Vec<Value>> {
        let start = std::time::Instant::now();
        let mut all_games = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page = 0u32;

        loop {
            page += 1;
            let batch = self.fetch_page(season, cursor.as_deref()).await?;
            debug!(
                season,
                page,
                count = batch.records.len(),
                cursor = batch.next_cursor.as_deref().unwrap_or("-"),
                "fetched page"
            );
            all_games.extend(batch.records);

            cursor = batch.next_cursor;
            if cursor.is_none() {
                break;
            }
            if page >= self.config.max_pages {
                warn!(
                    season,
                    max_pages = self.config.max_pages,
                    "page cap reached while the API still returns a cursor"
                );
                break;
            }
        }

        metrics::ingest::record_season_duration(start.elapsed().as_secs_f64());
        info!(season, games = all_games.len(), pages = page, "season fetched");
        Ok(all_games)
    }

    async fn fetch_page(&self, season: i32, cursor: Option<&str>) -> Result<PageRecords> {
        let mut query: Vec<(&str, String)> = vec![
            ("per_page", self.config.per_page.to_string()),
            ("seasons[]", season.to_string()),
        ];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }

        let response = self
            .http
            .get(&self.config.base_url)
            .header("Authorization", &self.api_key)
            .query(&query)
            .send()
            .await
            .inspect_err(|_| metrics::ingest::record_page_error())?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            metrics::ingest::record_rate_limited();
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.config.rate_limit_pause_secs);
            return Err(PipelineError::RateLimited { retry_after_secs });
        }
        if !status.is_success() {
            metrics::ingest::record_page_error();
            let message = response.text().await.unwrap_or_default();
            return Err(PipelineError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: GamesPage = response.json().await?;
        metrics::ingest::record_page_success(payload.data.len());

        // The API has returned cursors both as strings and as bare numbers.
        let next_cursor = payload.meta.next_cursor.and_then(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        Ok(PageRecords {
            records: payload.data,
            next_cursor,
        })
    }
}

struct PageRecords {
    records: Vec<Value>,
    next_cursor: Option<String>,
}

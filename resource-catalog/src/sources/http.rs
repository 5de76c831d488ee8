use crate::traits::DataSource;
use crate::types::{CatalogError, FetchConfig, Result};
use async_trait::async_trait;
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use url::Url;

/// Catalog files served over HTTP(S) with the same layout as the data
/// directory.
pub struct HttpSource {
    client: Client,
    base_url: Url,
    config: FetchConfig,
}

impl HttpSource {
    pub fn new(base_url: &str, config: FetchConfig) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join replaces the last segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    pub fn resolve(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn fetch_text(&self, url: &Url) -> Result<String> {
        let start_time = Instant::now();

        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: Duration::from_secs(self.config.retry_delay_seconds),
            initial_interval: Duration::from_secs(self.config.retry_delay_seconds),
            max_interval: Duration::from_secs(self.config.retry_delay_seconds * 8),
            multiplier: 2.0,
            max_elapsed_time: Some(Duration::from_secs(self.config.timeout_seconds * 3)),
            ..Default::default()
        };

        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match self.client.get(url.clone()).send().await {
                Ok(response) => {
                    let status = response.status();

                    // Missing files are an answer, not a transient failure
                    if status.is_client_error() {
                        return Err(CatalogError::HttpStatus {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                    }

                    if !status.is_success() {
                        last_error = Some(CatalogError::HttpStatus {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                    } else {
                        if let Some(content_length) = response.content_length() {
                            let size_mb = content_length as usize / (1024 * 1024);
                            if size_mb > self.config.max_file_size_mb {
                                return Err(CatalogError::FileTooLarge {
                                    path: url.to_string(),
                                    size_mb,
                                });
                            }
                        }

                        match response.text().await {
                            Ok(content) => {
                                info!(
                                    "Fetched {} ({} bytes in {}ms)",
                                    url,
                                    content.len(),
                                    start_time.elapsed().as_millis()
                                );
                                return Ok(content);
                            }
                            Err(e) => last_error = Some(CatalogError::Http(e)),
                        }
                    }
                }
                Err(e) => last_error = Some(CatalogError::Http(e)),
            }

            if attempt < self.config.max_retries {
                if let Some(delay) = backoff.next_backoff() {
                    warn!("Attempt {} failed for {}, retrying in {:?}", attempt + 1, url, delay);
                    tokio::time::sleep(delay).await;
                    continue;
                }
            }
            break;
        }

        error!("Failed to fetch {} after {} attempts", url, self.config.max_retries + 1);
        Err(last_error.unwrap_or_else(|| CatalogError::General(format!("Failed to fetch {}", url))))
    }
}

#[async_trait]
impl DataSource for HttpSource {
    fn source_name(&self) -> String {
        format!("http {}", self.base_url)
    }

    async fn fetch_json(&self, path: &str) -> Result<Value> {
        let url = self.resolve(path)?;
        debug!("Fetching {}", url);

        let content = self.fetch_text(&url).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

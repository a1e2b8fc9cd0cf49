use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};
use url::Url;

use sibyl_core::catalog::Catalog;
use sibyl_core::error::{Result, SibylError};
use sibyl_core::source::CatalogSource;

const HTTP_TIMEOUT_SECS: u64 = 30;

/// Catalog served by a remote endpoint as a JSON array of row objects.
pub struct HttpCatalogSource {
    client: Client,
    url: Url,
    name_column: String,
}

impl HttpCatalogSource {
    pub fn new(url: Url, name_column: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("sibyl/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            url,
            name_column: name_column.into(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn load(&self) -> Result<Catalog> {
        debug!("Fetching catalog");
        let response = self.client.get(self.url.clone()).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SibylError::Source(format!(
                "catalog endpoint returned HTTP {}: {}",
                status,
                body.chars().take(500).collect::<String>()
            )));
        }

        let records: Vec<Map<String, Value>> = response.json().await?;
        let catalog = Catalog::from_records(&records, &self.name_column);

        info!(
            records = records.len(),
            rows = catalog.rows().len(),
            columns = catalog.columns().len(),
            "Catalog fetched"
        );
        Ok(catalog)
    }
}

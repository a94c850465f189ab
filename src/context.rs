use std::sync::Arc;
use tracing::info;

use crate::app::{RunReport, RunRequest, RunUseCase, UploadUseCase, ValidateUseCase};
use crate::common::constants::SHEETS_SCOPES;
use crate::common::error::Result;
use crate::config::Config;
use crate::infra::http_client::ReqwestHttp;
use crate::infra::lookup_adapter::GetAddressClient;
use crate::infra::rate_limiter_adapter::RateLimiterAdapter;
use crate::infra::sheets::{ServiceAccountKey, SheetsClient, TokenProvider};
use crate::pipeline::rate_limiter::{Limits, RateLimiter};

/// Everything a run needs, built once from configuration and passed explicitly.
pub struct AppContext {
    config: Config,
    runner: RunUseCase,
}

impl AppContext {
    /// Resolves the API key and loads the service-account key. Either failing aborts setup.
    pub fn from_config(config: Config) -> Result<Self> {
        info!("Getting API key");
        let api_key = config.lookup.resolve_api_key()?;

        info!(path = %config.sheets.credentials_file.display(), "Creating Google API client");
        let key = ServiceAccountKey::from_file(&config.sheets.credentials_file)?;
        let timeout = config.lookup.timeout();
        let mut google_http = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            google_http = google_http.timeout(timeout);
        }
        let google_http = google_http.build()?;
        let tokens = TokenProvider::new(key, SHEETS_SCOPES, google_http.clone())?;
        let sheets = Arc::new(SheetsClient::new(google_http, tokens)?);

        let lookup = GetAddressClient::new(
            Box::new(ReqwestHttp::new(timeout)?),
            &config.lookup.base_url,
            api_key,
        )?;
        let rate = RateLimiterAdapter(RateLimiter::new(Limits {
            requests_per_min: config.lookup.requests_per_min,
        }));

        let validator = ValidateUseCase::new(Box::new(lookup), Box::new(rate))
            .with_concurrency(config.lookup.concurrency);
        let uploader = UploadUseCase::new(
            Box::new(sheets.clone()),
            config.sheets.output_worksheet.clone(),
        );
        let runner = RunUseCase::new(Box::new(sheets), validator, uploader);

        Ok(Self { config, runner })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn run(&self, request: &RunRequest) -> Result<RunReport> {
        self.runner.run(request).await
    }
}

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{
    config::RevalidateConfig,
    error::{AppError, Result},
};

const SECRET_HEADER: &str = "x-revalidate-secret";

/// Invalidates cached storefront pages for a path such as `/products/12`.
#[async_trait]
pub trait Revalidator: Send + Sync {
    async fn revalidate_path(&self, path: &str) -> Result<()>;
}

pub fn from_config(config: &RevalidateConfig) -> Arc<dyn Revalidator> {
    match config.url {
        Some(ref url) => {
            tracing::info!("Cache revalidation enabled: {}", url);
            Arc::new(HttpRevalidator::new(url.clone(), config.secret.clone()))
        }
        None => {
            tracing::info!("REVALIDATE_URL not set, cache revalidation disabled");
            Arc::new(NoopRevalidator)
        }
    }
}

/// Calls the storefront's revalidation hook over HTTP.
pub struct HttpRevalidator {
    client: reqwest::Client,
    url: String,
    secret: Option<String>,
}

impl HttpRevalidator {
    pub fn new(url: String, secret: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            secret,
        }
    }
}

#[async_trait]
impl Revalidator for HttpRevalidator {
    async fn revalidate_path(&self, path: &str) -> Result<()> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "path": path }));

        if let Some(ref secret) = self.secret {
            request = request.header(SECRET_HEADER, secret);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::InternalError(format!("Revalidate request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::InternalError(format!(
                "Revalidate hook returned {} for {}",
                response.status(),
                path
            )));
        }

        tracing::debug!("Revalidated {}", path);
        Ok(())
    }
}

pub struct NoopRevalidator;

#[async_trait]
impl Revalidator for NoopRevalidator {
    async fn revalidate_path(&self, _path: &str) -> Result<()> {
        Ok(())
    }
}

/// Keeps every requested path, for embedding hosts and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingRevalidator {
    paths: Arc<Mutex<Vec<String>>>,
}

impl RecordingRevalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Revalidator for RecordingRevalidator {
    async fn revalidate_path(&self, path: &str) -> Result<()> {
        self.paths
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(path.to_string());
        Ok(())
    }
}

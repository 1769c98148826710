use crate::error::{AppError, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub catalog: CatalogConfig,
    pub revalidate: RevalidateConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Listing defaults applied when a caller leaves the page size out.
#[derive(Debug, Clone, Copy)]
pub struct CatalogConfig {
    pub default_page_size: i64,
    pub max_page_size: i64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_page_size: 12,
            max_page_size: 100,
        }
    }
}

/// Where cached storefront pages are invalidated after a mutation.
/// Without a url, invalidation is skipped.
#[derive(Debug, Clone, Default)]
pub struct RevalidateConfig {
    pub url: Option<String>,
    pub secret: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let catalog = CatalogConfig {
            default_page_size: parse_var("DEFAULT_PAGE_SIZE", "12")?,
            max_page_size: parse_var("MAX_PAGE_SIZE", "100")?,
        };

        if catalog.default_page_size <= 0 || catalog.max_page_size < catalog.default_page_size {
            return Err(AppError::ConfigError(
                "DEFAULT_PAGE_SIZE must be positive and not exceed MAX_PAGE_SIZE".to_string(),
            ));
        }

        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("PORT", "3000")?,
                max_body_size: parse_var("MAX_BODY_SIZE", "10485760")?,
            },
            database: DatabaseConfig {
                url: env::var("DB_URL")?,
                max_connections: parse_var("DB_MAX_CONNECTIONS", "20")?,
            },
            cors: CorsConfig {
                allowed_origins: env::var("FRONTEND_URL")?
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            catalog,
            revalidate: RevalidateConfig {
                url: non_empty_var("REVALIDATE_URL"),
                secret: non_empty_var("REVALIDATE_SECRET"),
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: &str) -> Result<T> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| AppError::ConfigError(format!("Invalid {} value", name)))
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use branchline_content::http_loader::DEFAULT_CONTENT_URL;

use crate::error::AppError;

/// Where the story document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// Fetch with a single HTTP GET.
    Url(String),
    /// Read from a local JSON file.
    File(PathBuf),
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Story document source.
    pub content: ContentSource,
    /// File backing the progress store.
    pub progress_path: PathBuf,
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which returns the value of a
    /// variable if it is set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is not a valid `u16`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let content = match lookup("BRANCHLINE_CONTENT_FILE") {
            Some(path) => ContentSource::File(PathBuf::from(path)),
            None => ContentSource::Url(
                lookup("BRANCHLINE_CONTENT_URL").unwrap_or_else(|| DEFAULT_CONTENT_URL.to_owned()),
            ),
        };
        let progress_path = lookup("BRANCHLINE_PROGRESS_PATH")
            .map_or_else(|| PathBuf::from("branchline-progress.json"), PathBuf::from);
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_owned())
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;

        Ok(Self {
            content,
            progress_path,
            host,
            port,
        })
    }

    /// The socket address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `host:port` is not a valid address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

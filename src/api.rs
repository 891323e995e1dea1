use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{ debug, error, warn };
use url::Url;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("request for URL '{url}' crashed: {source}")]
    Transport {
        url: Url,
        source: reqwest::Error,
    },

    #[error("reading '{url}' failed: {source}")]
    Io {
        url: Url,
        source: std::io::Error,
    },

    #[error("request for URL '{url}' failed with status {status}")]
    Status {
        url: Url,
        status: u16,
    },

    #[error("request for URL '{url}' got invalid JSON: {source}")]
    Malformed {
        url: Url,
        body: String,
        source: serde_json::Error,
    },
}

/// Whether a completed request counts as successful. Local files have no HTTP
/// status and report 0.
pub fn is_success(status: u16, url: &Url) -> bool {
    status == 200 || (status == 0 && url.scheme() == "file")
}

/// Issues single JSON GET requests. Relative URLs resolve against `base`.
#[derive(Debug, Clone, Default)]
pub struct Fetcher {
    client: reqwest::Client,
    base: Option<Url>,
}

impl Fetcher {
    pub fn new(base: Option<Url>) -> Self {
        Fetcher {
            client: reqwest::Client::new(),
            base,
        }
    }

    pub fn resolve(&self, url: &str) -> Result<Url, FetchError> {
        let invalid = |source: url::ParseError| FetchError::InvalidUrl { url: url.to_string(), source };
        match Url::parse(url) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) =>
                match &self.base {
                    Some(base) => base.join(url).map_err(invalid),
                    None => Err(invalid(url::ParseError::RelativeUrlWithoutBase)),
                }
            Err(other) => Err(invalid(other)),
        }
    }

    /// Fetches `url` once and decodes the body as JSON. Every failure is
    /// logged before it is returned.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let result = self.try_fetch_json(url).await;
        if let Err(err) = &result {
            report(err);
        }
        result
    }

    /// Fetches `url` and hands the decoded value to `continuation`. The
    /// continuation runs at most once and never on failure. Returns whether
    /// it ran.
    pub async fn load_json<T, F>(&self, url: &str, continuation: F) -> bool
        where T: DeserializeOwned, F: FnOnce(T)
    {
        match self.fetch_json(url).await {
            Ok(value) => {
                continuation(value);
                true
            }
            Err(_) => false,
        }
    }

    async fn try_fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let url = self.resolve(url)?;
        let (status, body) = self.get(&url).await?;
        debug!(%url, status, bytes = body.len(), "listing request completed");
        if !is_success(status, &url) {
            return Err(FetchError::Status { url, status });
        }
        serde_json::from_str(&body).map_err(|source| FetchError::Malformed { url, body, source })
    }

    async fn get(&self, url: &Url) -> Result<(u16, String), FetchError> {
        if url.scheme() == "file" {
            let io_err = |source: std::io::Error| FetchError::Io { url: url.clone(), source };
            let path = url
                .to_file_path()
                .map_err(|_| {
                    io_err(std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a local path"))
                })?;
            let body = tokio::fs::read_to_string(&path).await.map_err(io_err)?;
            return Ok((0, body));
        }

        let transport = |source: reqwest::Error| FetchError::Transport { url: url.clone(), source };
        let res = self.client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send().await
            .map_err(transport)?;
        let status = res.status().as_u16();
        let body = res.text().await.map_err(transport)?;
        Ok((status, body))
    }
}

fn report(err: &FetchError) {
    match err {
        FetchError::InvalidUrl { url, source } => {
            error!(%url, error = %source, "invalid listing URL");
        }
        FetchError::Transport { url, source } => {
            error!(%url, error = %source, "listing request crashed");
        }
        FetchError::Io { url, source } => {
            error!(%url, error = %source, "listing file could not be read");
        }
        FetchError::Status { url, status } => {
            warn!(%url, status, "listing request failed");
        }
        FetchError::Malformed { url, body, source } => {
            warn!(%url, %body, error = %source, "listing request got invalid JSON");
        }
    }
}

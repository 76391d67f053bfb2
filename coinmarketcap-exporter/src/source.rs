//! Ticker data sources.
//!
//! A [`DataSource`] is picked once at startup from [`SourceConfig`] and
//! never switched afterwards. Both variants hand back the raw payload
//! text; decoding happens in [`crate::ticker`].

use std::path::PathBuf;
use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, trace};

use crate::config::{SourceConfig, SourceMode};
use crate::error::FetchError;

/// Fetches the ticker payload from the remote API.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    client: reqwest::Client,
    url: String,
    convert: String,
    limit: u32,
}

impl RemoteSource {
    /// Create a remote source with its own HTTP client.
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            url: config.url.clone(),
            convert: config.convert.clone(),
            limit: config.limit,
        })
    }

    /// Issue one GET request and return the body on HTTP 200.
    pub async fn fetch(&self) -> Result<String, FetchError> {
        let limit = self.limit.to_string();

        trace!(url = %self.url, convert = %self.convert, limit = self.limit, "Querying ticker API");

        let response = self
            .client
            .get(&self.url)
            .query(&[("convert", self.convert.as_str()), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(FetchError::Transport)?;
        debug!(bytes = body.len(), "Fetched ticker payload");
        Ok(body)
    }
}

/// Reads the ticker payload from a local file.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    path: PathBuf,
}

impl FixtureSource {
    /// Create a fixture source for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The fixture file location.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Return the file contents verbatim.
    pub async fn fetch(&self) -> Result<String, FetchError> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), bytes = body.len(), "Read ticker fixture");
        Ok(body)
    }
}

/// The active data source for this process.
#[derive(Debug, Clone)]
pub enum DataSource {
    Remote(RemoteSource),
    Fixture(FixtureSource),
}

impl DataSource {
    /// Build the source selected by `config.mode`.
    pub fn from_config(config: &SourceConfig) -> Result<Self, FetchError> {
        match config.mode {
            SourceMode::Live => Ok(Self::Remote(RemoteSource::new(config)?)),
            SourceMode::Fixture => Ok(Self::Fixture(FixtureSource::new(&config.fixture_path))),
        }
    }

    /// The mode this source was built for.
    pub fn mode(&self) -> SourceMode {
        match self {
            Self::Remote(_) => SourceMode::Live,
            Self::Fixture(_) => SourceMode::Fixture,
        }
    }

    /// Fetch the raw ticker payload.
    pub async fn fetch(&self) -> Result<String, FetchError> {
        match self {
            Self::Remote(source) => source.fetch().await,
            Self::Fixture(source) => source.fetch().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::extract::Query;
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::get;
    use std::collections::HashMap;
    use std::net::SocketAddr;

    /// Serve `router` on an ephemeral port and return its address.
    async fn spawn_upstream(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    fn live_config(url: String) -> SourceConfig {
        SourceConfig {
            url,
            timeout_secs: 2,
            ..SourceConfig::default()
        }
    }

    #[test]
    fn test_from_config_selects_mode() {
        let live = DataSource::from_config(&SourceConfig::default()).unwrap();
        assert_eq!(live.mode(), SourceMode::Live);

        let fixture = DataSource::from_config(&SourceConfig {
            mode: SourceMode::Fixture,
            ..SourceConfig::default()
        })
        .unwrap();
        assert_eq!(fixture.mode(), SourceMode::Fixture);
        match fixture {
            DataSource::Fixture(f) => assert_eq!(f.path(), std::path::Path::new("test.json")),
            DataSource::Remote(_) => panic!("expected fixture source"),
        }
    }

    #[tokio::test]
    async fn test_fixture_fetch_returns_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.json");
        std::fs::write(&path, "[{\"id\":\"bitcoin\"}]").unwrap();

        let body = FixtureSource::new(&path).fetch().await.unwrap();
        assert_eq!(body, "[{\"id\":\"bitcoin\"}]");
    }

    #[tokio::test]
    async fn test_fixture_fetch_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = FixtureSource::new(&path).fetch().await.unwrap_err();
        match err {
            FetchError::Io { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_remote_fetch_sends_query_and_returns_body() {
        let router = Router::new().route(
            "/v1/ticker/",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                format!(
                    "convert={} limit={}",
                    params.get("convert").cloned().unwrap_or_default(),
                    params.get("limit").cloned().unwrap_or_default()
                )
            }),
        );
        let addr = spawn_upstream(router).await;

        let source = RemoteSource::new(&live_config(format!("http://{addr}/v1/ticker/"))).unwrap();
        let body = source.fetch().await.unwrap();

        assert_eq!(body, "convert=EUR limit=50");
    }

    #[tokio::test]
    async fn test_remote_fetch_body_not_validated() {
        let router = Router::new().route("/", get(|| async { "definitely not json" }));
        let addr = spawn_upstream(router).await;

        let source = DataSource::from_config(&live_config(format!("http://{addr}/"))).unwrap();
        assert_eq!(source.fetch().await.unwrap(), "definitely not json");
    }

    #[tokio::test]
    async fn test_remote_fetch_error_status() {
        let router = Router::new().route(
            "/",
            get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let addr = spawn_upstream(router).await;

        let source = RemoteSource::new(&live_config(format!("http://{addr}/"))).unwrap();
        let err = source.fetch().await.unwrap_err();

        assert!(matches!(err, FetchError::Status(500)));
        assert_eq!(err.to_string(), "HTTP returned code 500");
    }

    #[tokio::test]
    async fn test_remote_fetch_non_200_success_is_error() {
        let router = Router::new().route("/", get(|| async { (AxumStatus::ACCEPTED, "later") }));
        let addr = spawn_upstream(router).await;

        let source = RemoteSource::new(&live_config(format!("http://{addr}/"))).unwrap();
        assert!(matches!(
            source.fetch().await.unwrap_err(),
            FetchError::Status(202)
        ));
    }

    #[tokio::test]
    async fn test_remote_fetch_connection_refused() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = RemoteSource::new(&live_config(format!("http://{addr}/"))).unwrap();
        assert!(matches!(
            source.fetch().await.unwrap_err(),
            FetchError::Transport(_)
        ));
    }
}

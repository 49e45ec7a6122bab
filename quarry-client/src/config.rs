//! Search client configuration.

use crate::engine::SearchEngineVariant;
use crate::error::{Result, SearchClientError};
use serde::Deserialize;
use std::time::Duration;

/// Search client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Node URL(s). Requests go to the first one.
    pub urls: Vec<String>,
    /// Basic auth username.
    pub username: Option<String>,
    /// Basic auth password.
    pub password: Option<String>,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Request timeout.
    pub request_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
    /// Headers sent with every request.
    pub default_headers: Vec<(String, String)>,
    /// Engine variant to assume instead of asking the cluster.
    pub engine: Option<SearchEngineVariant>,
    /// Indent JSON request bodies.
    pub pretty_print: bool,
}

impl ClientConfig {
    /// Create a new configuration with a single URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            password: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            user_agent: format!("quarry-client/{}", env!("CARGO_PKG_VERSION")),
            default_headers: Vec::new(),
            engine: None,
            pretty_print: false,
        }
    }

    /// Set basic authentication credentials.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Skip detection and assume `engine`.
    pub fn with_engine(mut self, engine: SearchEngineVariant) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Indent JSON request bodies.
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// First configured URL.
    pub fn base_url(&self) -> Result<&str> {
        self.urls
            .first()
            .map(String::as_str)
            .ok_or_else(|| SearchClientError::Config("No URLs provided".to_string()))
    }

    /// Parse a TOML document.
    ///
    /// ```
    /// use quarry_client::ClientConfig;
    ///
    /// let config = ClientConfig::from_toml_str(r#"
    ///     urls = ["http://localhost:9200"]
    ///     request_timeout_secs = 5
    ///     engine = "OS2"
    /// "#).unwrap();
    /// assert_eq!(config.request_timeout.as_secs(), 5);
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| SearchClientError::Config(format!("Failed to parse TOML: {}", e)))?;
        file.into_config()
    }

    /// Read `<PREFIX>_URL`, `<PREFIX>_USERNAME`, `<PREFIX>_PASSWORD`,
    /// `<PREFIX>_ENGINE` and `<PREFIX>_REQUEST_TIMEOUT_SECS`, after loading a
    /// `.env` file if one exists.
    pub fn from_env(prefix: &str) -> Result<Self> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(prefix, |key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(prefix: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(&format!("{}_{}", prefix, name));

        let url = var("URL")
            .ok_or_else(|| SearchClientError::Config(format!("{}_URL is not set", prefix)))?;
        let mut config = Self::new(url);

        if let (Some(user), Some(pass)) = (var("USERNAME"), var("PASSWORD")) {
            config = config.with_basic_auth(user, pass);
        }
        if let Some(engine) = var("ENGINE") {
            config.engine = Some(engine.parse().map_err(SearchClientError::Config)?);
        }
        if let Some(secs) = var("REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                SearchClientError::Config(format!(
                    "{}_REQUEST_TIMEOUT_SECS is not a number: {}",
                    prefix, secs
                ))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:9200")
    }
}

/// On-disk form of [`ClientConfig`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    urls: Vec<String>,
    username: Option<String>,
    password: Option<String>,
    connect_timeout_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    user_agent: Option<String>,
    #[serde(default)]
    headers: Vec<(String, String)>,
    engine: Option<SearchEngineVariant>,
    #[serde(default)]
    pretty_print: bool,
}

impl ConfigFile {
    fn into_config(self) -> Result<ClientConfig> {
        if self.urls.is_empty() {
            return Err(SearchClientError::Config("No URLs provided".to_string()));
        }

        let defaults = ClientConfig::default();
        Ok(ClientConfig {
            urls: self.urls,
            username: self.username,
            password: self.password,
            connect_timeout: self
                .connect_timeout_secs
                .map_or(defaults.connect_timeout, Duration::from_secs),
            request_timeout: self
                .request_timeout_secs
                .map_or(defaults.request_timeout, Duration::from_secs),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
            default_headers: self.headers,
            engine: self.engine,
            pretty_print: self.pretty_print,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("http://search:9200")
            .with_basic_auth("elastic", "secret")
            .with_request_timeout(Duration::from_secs(5))
            .with_header("X-Tenant", "acme")
            .with_engine(SearchEngineVariant::Es8)
            .with_pretty_print(true);

        assert_eq!(config.base_url().unwrap(), "http://search:9200");
        assert_eq!(config.username.as_deref(), Some("elastic"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.default_headers, [("X-Tenant".to_string(), "acme".to_string())]);
        assert_eq!(config.engine, Some(SearchEngineVariant::Es8));
        assert!(config.pretty_print);
    }

    #[test]
    fn test_no_urls() {
        let mut config = ClientConfig::default();
        config.urls.clear();
        assert!(matches!(config.base_url(), Err(SearchClientError::Config(_))));
    }

    #[test]
    fn test_from_toml() {
        let config = ClientConfig::from_toml_str(
            r#"
            urls = ["https://a:9200", "https://b:9200"]
            username = "admin"
            password = "admin"
            connect_timeout_secs = 2
            headers = [["X-Opaque-Id", "batch-7"]]
            engine = "os1"
            pretty_print = true
            "#,
        )
        .unwrap();

        assert_eq!(config.urls.len(), 2);
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.engine, Some(SearchEngineVariant::Os1));
        assert_eq!(config.default_headers[0].0, "X-Opaque-Id");
        assert!(config.pretty_print);
    }

    #[test]
    fn test_from_toml_rejects_bad_input() {
        assert!(ClientConfig::from_toml_str("urls = []").is_err());
        assert!(ClientConfig::from_toml_str("urls = [\"x\"]\nengine = \"solr\"").is_err());
        assert!(ClientConfig::from_toml_str("urls = [\"x\"]\nretries = 3").is_err());
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SEARCH_URL", "http://es:9200"),
            ("SEARCH_USERNAME", "elastic"),
            ("SEARCH_PASSWORD", "changeme"),
            ("SEARCH_ENGINE", "ES7"),
            ("SEARCH_REQUEST_TIMEOUT_SECS", "12"),
        ]);
        let config =
            ClientConfig::from_lookup("SEARCH", |k| vars.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.urls, ["http://es:9200"]);
        assert_eq!(config.password.as_deref(), Some("changeme"));
        assert_eq!(config.engine, Some(SearchEngineVariant::Es7));
        assert_eq!(config.request_timeout, Duration::from_secs(12));
    }

    #[test]
    fn test_from_lookup_requires_url() {
        let result = ClientConfig::from_lookup("SEARCH", |_| None);
        assert!(matches!(result, Err(SearchClientError::Config(msg)) if msg.contains("SEARCH_URL")));
    }

    #[test]
    fn test_from_env_missing_url() {
        assert!(ClientConfig::from_env("QUARRY_TEST_NONEXISTENT_12345").is_err());
    }
}

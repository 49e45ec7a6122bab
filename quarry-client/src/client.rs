//! Search client implementation.

use crate::config::ClientConfig;
use crate::engine::SearchEngineVariant;
use crate::error::{Result, SearchClientError};
use crate::transport::{HttpTransport, RawResponse, RequestBody, Transport, TransportRequest};
use http::Method;
use quarry_dsl::{IlmConfiguration, IlmPhases, MultiSearchDsl, SearchDsl, serializer};
use quarry_log::{debug, info, warn};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// JSON object returned by the cluster.
pub type JsonObject = Map<String, Value>;

/// Client that submits quarry request bodies to a cluster.
#[derive(Clone)]
pub struct SearchClient {
    transport: Arc<dyn Transport>,
    config: Arc<ClientConfig>,
    engine: Arc<OnceCell<SearchEngineVariant>>,
}

impl SearchClient {
    /// Create a client that talks HTTP to the configured cluster.
    pub fn new(config: ClientConfig) -> Result<Self> {
        info!("Initializing search client for: {:?}", config.urls);
        config.base_url()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client over any transport.
    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        let engine = match config.engine {
            Some(pinned) => OnceCell::new_with(Some(pinned)),
            None => OnceCell::new(),
        };
        Self {
            transport: Arc::new(transport),
            config: Arc::new(config),
            engine: Arc::new(engine),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Engine variant of the cluster, detected from `GET /` on first use.
    pub async fn engine_variant(&self) -> Result<SearchEngineVariant> {
        let variant = self
            .engine
            .get_or_try_init(|| async {
                let root = self.root_info().await?;
                let variant = SearchEngineVariant::from_root_info(&Value::Object(root))
                    .ok_or_else(|| {
                        SearchClientError::InvalidResponse(
                            "cluster info has no recognizable version".to_string(),
                        )
                    })?;
                info!("Detected search engine: {}", variant);
                Ok::<_, SearchClientError>(variant)
            })
            .await?;
        Ok(*variant)
    }

    /// Body of `GET /`.
    pub async fn root_info(&self) -> Result<JsonObject> {
        self.send(TransportRequest::new(Method::GET, Vec::<String>::new()))
            .await
    }

    /// Fail with [`SearchClientError::UnsupportedEngine`] unless the cluster
    /// is one of `allowed`.
    pub async fn validate_engine(
        &self,
        message: &str,
        allowed: &[SearchEngineVariant],
    ) -> Result<()> {
        let variant = self.engine_variant().await?;
        if allowed.contains(&variant) {
            return Ok(());
        }
        warn!("{} (connected to {})", message, variant);
        Err(SearchClientError::UnsupportedEngine {
            message: message.to_string(),
            variant,
        })
    }

    /// Create or replace lifecycle policy `policy_id` with the phases built
    /// by `block`. Elasticsearch only.
    pub async fn set_ilm_policy(
        &self,
        policy_id: &str,
        block: impl FnOnce(&mut IlmPhases) -> quarry_dsl::Result<()>,
    ) -> Result<JsonObject> {
        self.validate_engine(
            "ilm only works on Elasticsearch",
            &[SearchEngineVariant::Es7, SearchEngineVariant::Es8],
        )
        .await?;

        let config = IlmConfiguration::build(block)?;
        let body = serializer::to_json(&config, true)?;
        self.send(
            TransportRequest::new(Method::PUT, ["_ilm", "policy", policy_id])
                .with_body(RequestBody::Json(body)),
        )
        .await
    }

    /// Fetch lifecycle policy `policy_id`.
    pub async fn get_ilm_policy(&self, policy_id: &str) -> Result<JsonObject> {
        self.send(TransportRequest::new(Method::GET, ["_ilm", "policy", policy_id]))
            .await
    }

    /// Delete lifecycle policy `policy_id`.
    pub async fn delete_ilm_policy(&self, policy_id: &str) -> Result<JsonObject> {
        self.send(TransportRequest::new(Method::DELETE, ["_ilm", "policy", policy_id]))
            .await
    }

    /// Run `dsl` against `target` (an index, alias or comma-separated list).
    pub async fn search(&self, target: &str, dsl: &SearchDsl) -> Result<JsonObject> {
        let body = self.json_body(dsl)?;
        self.send(TransportRequest::new(Method::POST, [target, "_search"]).with_body(body))
            .await
    }

    /// Run the searches added by `block` as one `_msearch` request.
    /// Headers without an index fall back to `target`.
    pub async fn msearch(
        &self,
        target: Option<&str>,
        block: impl FnOnce(&mut MultiSearchDsl),
    ) -> Result<JsonObject> {
        let mut batch = MultiSearchDsl::new();
        block(&mut batch);
        self.msearch_batch(target, &batch).await
    }

    /// Submit a prebuilt multi-search batch.
    pub async fn msearch_batch(
        &self,
        target: Option<&str>,
        batch: &MultiSearchDsl,
    ) -> Result<JsonObject> {
        let path = match target {
            Some(target) => vec![target, "_msearch"],
            None => vec!["_msearch"],
        };
        self.send(
            TransportRequest::new(Method::POST, path)
                .with_body(RequestBody::NdJson(batch.request_body())),
        )
        .await
    }

    fn json_body<T: Serialize + ?Sized>(&self, value: &T) -> Result<RequestBody> {
        Ok(RequestBody::Json(serializer::to_json(
            value,
            self.config.pretty_print,
        )?))
    }

    async fn send(&self, request: TransportRequest) -> Result<JsonObject> {
        debug!("{} {}", request.method, request.path_string());
        let response = self.transport.execute(request).await?;
        parse_json_object(&response)
    }
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("config", &self.config)
            .field("engine", &self.engine.get())
            .finish()
    }
}

/// Parse a response body as a JSON object.
pub fn parse_json_object(response: &RawResponse) -> Result<JsonObject> {
    match response.json()? {
        Value::Object(object) => Ok(object),
        other => Err(SearchClientError::InvalidResponse(format!(
            "expected a JSON object, got: {}",
            other
        ))),
    }
}

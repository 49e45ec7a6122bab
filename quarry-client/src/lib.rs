//! Elasticsearch and OpenSearch client for quarry request bodies.
//!
//! This crate provides:
//! - A [`Transport`] seam with a reqwest-backed [`HttpTransport`]
//! - Engine variant detection and gating
//! - Index lifecycle policy management
//! - Search and multi-search submission
//!
//! # Example
//!
//! ```rust,no_run
//! use quarry_client::{ClientConfig, SearchClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SearchClient::new(ClientConfig::new("http://localhost:9200"))?;
//!
//!     client
//!         .set_ilm_policy("logs", |phases| {
//!             phases.hot(|p| {
//!                 p.set_min_age("0s").with_actions(|a| {
//!                     a.roll_over(50);
//!                 })?;
//!                 Ok(())
//!             })?;
//!             Ok(())
//!         })
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod client;
mod config;
mod engine;
mod error;
mod transport;

pub use client::{JsonObject, SearchClient, parse_json_object};
pub use config::ClientConfig;
pub use engine::SearchEngineVariant;
pub use error::{Result, SearchClientError, TransportError};
pub use transport::{
    HttpTransport, RawResponse, RequestBody, Transport, TransportRequest, TransportResult,
};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        ClientConfig, JsonObject, Result, SearchClient, SearchClientError, SearchEngineVariant,
        Transport,
    };
}

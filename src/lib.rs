// Quarry - typed request bodies for Elasticsearch and OpenSearch
//
// Builders mirror the engines' JSON request format; the client submits them
// and hands back the parsed JSON response.

// Re-export the DSL
pub use quarry_dsl::*;

// Re-export logging
pub use quarry_log;

// Re-export the client
#[cfg(feature = "client")]
pub use quarry_client;

#[cfg(feature = "client")]
pub use quarry_client::{
    ClientConfig, JsonObject, SearchClient, SearchClientError, SearchEngineVariant,
    TransportError,
};

// Prelude for common imports
pub mod prelude {
    pub use quarry_dsl::prelude::*;

    #[cfg(feature = "client")]
    pub use quarry_client::prelude::{
        ClientConfig, JsonObject, SearchClient, SearchClientError, SearchEngineVariant, Transport,
    };
}

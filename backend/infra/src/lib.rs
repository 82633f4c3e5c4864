//! Infrastructure shared by the outbound service clients.
//!
//! Provides the access-token sources used to authenticate calls and the
//! construction of the shared HTTP client.

pub mod credentials;
pub mod http;

pub use credentials::{
    token_source_from_config, MetadataServerToken, NoCredentials, StaticToken, TokenSource,
};
pub use http::{authorized, build_client};

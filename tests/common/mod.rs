//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{catalog_body, TestCatalogServer};
//!
//! #[tokio::test]
//! async fn test_fetch() {
//!     let server = TestCatalogServer::spawn(catalog_body(&["Sunrise"])).await;
//!     let cache = server.cache();
//!     cache.ensure_ready().await.unwrap();
//! }
//! ```

mod fixtures;
mod server;

pub use fixtures::*;
pub use server::TestCatalogServer;

//! summer-remote: HTTP access to the Summer CRM API.
//!
//! - [`CollectionClient`] -- list/create/update/delete for one resource
//! - [`EnrichmentAggregator`] -- parallel, failure-isolated enrichment fetches
//! - [`ClientConfig`] -- injected base URLs and timeout
//! - [`Transport`] -- the network seam, with [`UreqTransport`] for real use
//!   and [`fake::FakeTransport`] for tests

pub mod collection;
pub mod config;
pub mod enrichment;
pub mod envelope;
pub mod fake;
pub mod transport;

pub use collection::CollectionClient;
pub use config::{ClientConfig, ConfigError};
pub use enrichment::{EnrichmentAggregator, EnrichmentEndpoint};
pub use envelope::{ApiEnvelope, Operation};
pub use transport::{HttpRequest, HttpResponse, Method, Transport, UreqTransport};

//! FormSage Gateway: the data layer of a document-processing dashboard.
//!
//! The dashboard front end shows AI-extracted field metrics (confidence
//! scores, processing times, document-type distributions) sourced from an
//! external backend that executes SQL over the extraction tables. That
//! backend does not commit to one response shape, so every metric fetch
//! goes through the same pipeline:
//!
//! 1. [`client::BackendClient`] posts the metric's SQL and decodes the body
//!    into the [`normalize::RawResponse`] union at the wire boundary.
//! 2. [`normalize::normalize`] collapses any variant into an ordered table
//!    of flat records.
//! 3. [`charts`] extracts typed chart rows from the table.
//! 4. On any failure along the way, the view substitutes its entry from the
//!    [`fallback`] catalog and the dashboard stays populated (fail-soft).
//!
//! The `server` feature adds the axum gateway: pass-through proxy routes
//! for the front end's metric cards and chat assistant, plus the dashboard
//! view routes that run the pipeline server-side.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use formsage::server::GatewayConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = GatewayConfig::load()?;
//!     formsage::server::start_server(config).await?;
//!     Ok(())
//! }
//! ```

pub mod charts;
pub mod fallback;
pub mod normalize;
pub mod queries;

#[cfg(feature = "client")]
pub mod client;

#[cfg(feature = "server")]
pub mod server;

pub use normalize::{normalize, NormalizedRecord, NormalizedTable, RawResponse};
pub use queries::Metric;

#[cfg(feature = "client")]
pub use client::{BackendClient, ClientError};

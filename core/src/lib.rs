//! Typed async client for the Marvel Comics REST API.
//!
//! # Overview
//! Turns typed query models into signed GET requests and unwraps the API's
//! response envelope into typed entities. Stateless: no caching, no retries,
//! no automatic pagination.
//!
//! # Design
//! - `MarvelClient` builds unsigned `HttpRequest` values and parses
//!   `HttpResponse` values without touching the network, so callers with
//!   their own HTTP stack can use it directly (host does IO).
//! - `Dispatcher` signs requests and sends them through a `Transport`,
//!   honouring a caller-supplied `CallContext` for cancellation and timeouts.
//! - `Marvel` composes the two into one async method per endpoint.
//! - Query models share a single serializer (`QueryBuilder`); each model only
//!   names its parameters and its `orderBy` whitelist.
//!
//! ```no_run
//! use marvel_core::{Marvel, MarvelConfig, SeriesQuery};
//!
//! # async fn run() -> Result<(), marvel_core::ClientError> {
//! let marvel = Marvel::from_config(&MarvelConfig::from_env()?)?;
//! let query = SeriesQuery {
//!     title_starts_with: Some("Amazing".to_string()),
//!     limit: Some(10),
//!     ..Default::default()
//! };
//! for series in marvel.series().list(&query).await? {
//!     println!("{} {:?}", series.id, series.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod http;
pub mod params;
pub mod query;
pub mod transport;
pub mod types;

pub use auth::Credentials;
pub use client::{MarvelClient, DEFAULT_BASE_URL};
pub use config::MarvelConfig;
pub use endpoints::Marvel;
pub use envelope::Page;
pub use error::{ClientError, Interruption};
pub use http::{HttpRequest, HttpResponse};
pub use params::{ComicFormat, DateDescriptor, FormatType, OrderBy, SeriesType, WireToken};
pub use query::{
    CharacterQuery, ComicQuery, CreatorQuery, EventQuery, QueryBuilder, QueryParams, SeriesQuery,
    StoryQuery,
};
pub use transport::{CallContext, Dispatcher, ReqwestTransport, Transport};
pub use tokio_util::sync::CancellationToken;
pub use types::{Character, Comic, Creator, Entity, Event, Resource, Series, Story};

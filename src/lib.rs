//! Client for the Rock Gym Pro REST API.
//!
//! Every call is an authenticated GET whose JSON envelope is reshaped into a
//! [`CanonicalResult`]: the payload under `data`, the rest of the envelope
//! under `response`, and the page URLs of a paginated collection under
//! `pages`. Further pages are fetched explicitly with
//! [`Client::fetch_page`].
//!
//! ```rust,ignore
//! use rgp_client::{Client, DateRange};
//!
//! let client = Client::new("apiname", "apikey")?;
//! let range = DateRange::new("2024-03-01 00:00:00", "2024-03-01 23:59:59");
//! let first = client.get_facility_checkins("AAA", &range).await?;
//! if let Some(url) = first.page_urls().get(1) {
//!     let second = client.fetch_page(url).await?;
//! }
//! ```

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod logging;
pub mod response;
pub mod utils;

pub use client::{Client, ClientBuilder, ParamValue, Params, DEFAULT_BASE_URL};
pub use config::Config;
pub use endpoints::{DateRange, FacilityScope};
pub use error::{ConfigError, Result, RgpError};
pub use response::{normalize, CanonicalResult, Normalized, Pages, RawBody};

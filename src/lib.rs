//! A typed client for the NextBus public XML feed.
//!
//! Fetches transit agencies, routes, stops, and real-time arrival
//! predictions into plain Rust structures. Every operation is one blocking
//! HTTP round trip; route lists and route details are cached per entity
//! until a refresh is requested.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use nextbus::{Agency, FeedClient};
//!
//! # fn main() -> Result<(), nextbus::Error> {
//! let transport = Arc::new(FeedClient::new()?);
//! let mut agency = Agency::new(
//!     "sf-muni".into(),
//!     "San Francisco Municipal Railway".into(),
//!     Some("SF Muni".into()),
//!     "California-Northern".into(),
//!     transport,
//! );
//!
//! for route in agency.routes()? {
//!     println!("{}: {}", route.tag, route.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod feed;
mod model;

pub use feed::{DownloadError, Error, FeedClient, FeedTransport, ParseError};
pub use model::*;

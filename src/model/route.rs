use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::{Arc, Mutex, MutexGuard, Weak},
};

use serde::{Deserialize, Serialize};

use crate::{
    feed::{Error, FeedTransport, parse, request::FeedRequest},
    model::{Agency, Direction, agency::AgencyInner},
};

/// A public transportation route. Routes can run in multiple directions
/// (inbound, outbound, etc.) and carry an ordered set of stops per
/// direction.
///
/// Identity is the `(agency tag, route tag)` pair; equality and hashing
/// ignore the title fields. Clones of one route share a single details
/// cache.
#[derive(Clone)]
pub struct Route {
    /// A unique identifier for the route within its agency. For most
    /// agencies this is the short form of the route's name, e.g. `30` or
    /// `N`.
    pub tag: String,
    /// The full title of the route, e.g. `30-Stockton` or `N-Judah`.
    pub title: String,
    /// A short title for constrained interfaces. Only used by certain
    /// agencies.
    pub short_title: Option<String>,
    /// Set to `true` to refetch route details on the next request instead
    /// of reusing the cached version.
    pub needs_refresh: bool,
    pub(crate) agency_tag: String,
    pub(crate) agency: Weak<AgencyInner>,
    pub(crate) transport: Arc<dyn FeedTransport>,
    pub(crate) cached_details: Arc<Mutex<Option<RouteDetails>>>,
}

impl Route {
    /// Initializes a route without an agency behind it. Detail fetches
    /// still work, but nothing is reconciled against an agency's caches.
    pub fn new(
        agency_tag: String,
        tag: String,
        title: String,
        short_title: Option<String>,
        transport: Arc<dyn FeedTransport>,
    ) -> Self {
        Self::from_parts(agency_tag, tag, title, short_title, Weak::new(), transport)
    }

    /// Initializes a route bound to an agency, so detail fetches populate
    /// the agency's stop and direction caches.
    pub fn with_agency(
        agency: &Agency,
        tag: String,
        title: String,
        short_title: Option<String>,
    ) -> Self {
        Self::from_parts(
            agency.tag.clone(),
            tag,
            title,
            short_title,
            Arc::downgrade(&agency.inner),
            agency.inner.transport.clone(),
        )
    }

    pub(crate) fn from_parts(
        agency_tag: String,
        tag: String,
        title: String,
        short_title: Option<String>,
        agency: Weak<AgencyInner>,
        transport: Arc<dyn FeedTransport>,
    ) -> Self {
        Self {
            tag,
            title,
            short_title,
            needs_refresh: false,
            agency_tag,
            agency,
            transport,
            cached_details: Arc::new(Mutex::new(None)),
        }
    }

    /// The tag of the agency this route belongs to.
    pub fn agency_tag(&self) -> &str {
        &self.agency_tag
    }

    /// Details about the route. The first call downloads and parses the
    /// route configuration; later calls reuse the cached details until
    /// `needs_refresh` is set.
    ///
    /// Pass `true` to also request directions the agency has marked
    /// inactive.
    pub fn details(&mut self, show_inactive_directions: bool) -> Result<RouteDetails, Error> {
        if !self.needs_refresh
            && let Some(details) = &*self.details_cache()
        {
            return Ok(details.clone());
        }

        let url = FeedRequest::RouteConfig {
            agency: &self.agency_tag,
            route: &self.tag,
            verbose: show_inactive_directions,
        }
        .url();
        let body = self.transport.fetch(&url)?;
        let document = parse::document(&body)?;
        let details = parse::route_config(&document, self)?;

        *self.details_cache() = Some(details.clone());
        self.needs_refresh = false;
        Ok(details)
    }

    fn details_cache(&self) -> MutexGuard<'_, Option<RouteDetails>> {
        self.cached_details
            .lock()
            .expect("route details lock poisoned")
    }
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.agency_tag == other.agency_tag && self.tag == other.tag
    }
}

impl Eq for Route {}

impl Hash for Route {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.agency_tag.hash(state);
        self.tag.hash(state);
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("tag", &self.tag)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

/// Details about a route that require a separate API call.
#[derive(Debug, Clone)]
pub struct RouteDetails {
    /// The route's display color.
    pub color: String,
    /// A color that contrasts with `color`.
    pub opposite_color: String,
    /// The route's bounding box on a map.
    pub bounds: RouteArea,
    /// The route's possible directions, in document order.
    pub directions: Vec<Direction>,
}

/// A route's maximum bounds on a map, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteArea {
    /// The minimum latitude of the bounding box.
    pub lat_min: f64,
    /// The maximum latitude of the bounding box.
    pub lat_max: f64,
    /// The minimum longitude of the bounding box.
    pub lon_min: f64,
    /// The maximum longitude of the bounding box.
    pub lon_max: f64,
}

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{
    feed::{Error, FeedTransport, parse, request::FeedRequest},
    model::{Direction, Route, Stop},
};

/// A public transit agency. The top-level scope for route and stop tag
/// uniqueness, and the owner of the entity caches that reconcile repeated
/// fetches.
#[derive(Clone)]
pub struct Agency {
    /// A unique identifier for the transit agency.
    pub tag: String,
    /// The agency's title.
    pub title: String,
    /// If provided, a shorter title for the agency.
    pub short_title: Option<String>,
    /// The name of the region.
    pub region_title: String,
    /// Set to `true` to refetch network data on the next request instead
    /// of reusing the cached version.
    pub needs_refresh: bool,
    pub(crate) inner: Arc<AgencyInner>,
}

/// Shared state behind an agency: the transport handle and the caches.
/// Child entities hold `Weak` references to this block, so a route or stop
/// never keeps its agency alive.
pub(crate) struct AgencyInner {
    pub(crate) transport: Arc<dyn FeedTransport>,
    caches: Mutex<AgencyCaches>,
}

/// Per-agency entity caches, keyed by tag. No eviction; entries live as
/// long as the agency does.
#[derive(Default)]
pub(crate) struct AgencyCaches {
    pub(crate) route_list: Option<Vec<Route>>,
    pub(crate) routes: HashMap<String, Route>,
    pub(crate) stops: HashMap<String, Stop>,
    pub(crate) directions: HashMap<String, Direction>,
}

impl AgencyInner {
    pub(crate) fn lock(&self) -> MutexGuard<'_, AgencyCaches> {
        self.caches.lock().expect("agency cache lock poisoned")
    }
}

impl Agency {
    /// Initializes a new transit agency.
    pub fn new(
        tag: String,
        title: String,
        short_title: Option<String>,
        region_title: String,
        transport: Arc<dyn FeedTransport>,
    ) -> Self {
        Self {
            tag,
            title,
            short_title,
            region_title,
            needs_refresh: false,
            inner: Arc::new(AgencyInner {
                transport,
                caches: Mutex::new(AgencyCaches::default()),
            }),
        }
    }

    /// Downloads the list of every agency the feed serves.
    pub fn list(transport: Arc<dyn FeedTransport>) -> Result<Vec<Agency>, Error> {
        let url = FeedRequest::AgencyList.url();
        let body = transport.fetch(&url)?;
        let document = parse::document(&body)?;
        parse::agency_list(&document, &transport)
    }

    /// The agency's routes. The first call downloads and parses the route
    /// list; later calls reuse the cached list until `needs_refresh` is
    /// set.
    pub fn routes(&mut self) -> Result<Vec<Route>, Error> {
        if !self.needs_refresh {
            let caches = self.inner.lock();
            if let Some(cached) = &caches.route_list {
                return Ok(cached.clone());
            }
        }

        let url = FeedRequest::RouteList { agency: &self.tag }.url();
        let body = self.inner.transport.fetch(&url)?;
        let document = parse::document(&body)?;
        let routes = parse::route_list(&document, self)?;

        self.inner.lock().route_list = Some(routes.clone());
        self.needs_refresh = false;
        Ok(routes)
    }
}

impl fmt::Debug for Agency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agency")
            .field("tag", &self.tag)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

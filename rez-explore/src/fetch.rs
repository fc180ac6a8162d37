//! Single-flight lifecycle of the zones request.
//!
//! `Idle -> Loading -> Ready | Failed`, with `invalidate` returning to `Idle`
//! from anywhere. Every submit bumps a generation counter and hands back a
//! [`Ticket`]; a completion is applied only while its ticket is current, so
//! the last submit wins whatever order the responses arrive in.

use log::{debug, info, warn};
use rez_core::resource::Resource;
use rez_core::zone::Zone;
use rez_core::zone_type::ZoneType;
use rez_core::RezError;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::future::Future;
use std::rc::Rc;

/// Everything the backend needs to score zones. Immutable once submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub area_id: String,
    pub resource: Resource,
    pub zone_type: ZoneType,
    /// Encoded filter fragment, see [`rez_core::encoder::encode`].
    pub filter_string: String,
    pub weights: BTreeMap<String, f64>,
    pub lcoe: BTreeMap<String, f64>,
}

/// Why a fetch failed.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchError {
    pub status: Option<u16>,
    pub message: String,
}

impl From<RezError> for FetchError {
    fn from(e: RezError) -> Self {
        match e {
            RezError::Network { status, message } => FetchError { status, message },
            other => FetchError {
                status: None,
                message: other.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading(Rc<FetchRequest>),
    Ready(Rc<FetchRequest>, Rc<Vec<Zone>>),
    Failed(Rc<FetchRequest>, FetchError),
}

impl FetchState {
    pub fn name(&self) -> &'static str {
        match self {
            FetchState::Idle => "idle",
            FetchState::Loading(_) => "loading",
            FetchState::Ready(..) => "ready",
            FetchState::Failed(..) => "failed",
        }
    }
}

/// Handle for one submitted request.
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    request: Rc<FetchRequest>,
}

impl Ticket {
    pub fn request(&self) -> &FetchRequest {
        &self.request
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Anything that can turn a [`FetchRequest`] into zones.
pub trait ZoneSource {
    fn fetch_zones(
        &self,
        request: &FetchRequest,
    ) -> impl Future<Output = rez_core::Result<Vec<Zone>>>;
}

#[derive(Debug, Default)]
pub struct ZoneFetchMachine {
    state: FetchState,
    generation: u64,
}

impl ZoneFetchMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading `request`, superseding anything in flight.
    pub fn submit(&mut self, request: FetchRequest) -> Ticket {
        if self.is_loading() {
            info!("Superseding in-flight zones request");
        }
        self.generation += 1;
        let request = Rc::new(request);
        info!(
            "Fetching {} zones for {} ({})",
            request.resource.api_name(),
            request.area_id,
            request.zone_type
        );
        self.state = FetchState::Loading(Rc::clone(&request));
        Ticket {
            generation: self.generation,
            request,
        }
    }

    /// Apply a completion. Returns `false` when the ticket is stale and the
    /// result was dropped.
    pub fn resolve(&mut self, ticket: &Ticket, result: rez_core::Result<Vec<Zone>>) -> bool {
        let current = match &self.state {
            FetchState::Loading(req) => {
                ticket.generation == self.generation && Rc::ptr_eq(req, &ticket.request)
            }
            _ => false,
        };
        if !current {
            debug!(
                "Discarding stale zones response (generation {}, current {})",
                ticket.generation, self.generation
            );
            return false;
        }
        let request = Rc::clone(&ticket.request);
        self.state = match result {
            Ok(zones) => {
                info!("Received {} zones for {}", zones.len(), request.area_id);
                FetchState::Ready(request, Rc::new(zones))
            }
            Err(e) => {
                warn!("Zones request for {} failed: {e}", request.area_id);
                FetchState::Failed(request, e.into())
            }
        };
        true
    }

    /// Back to `Idle`; every outstanding ticket becomes stale.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.state = FetchState::Idle;
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, FetchState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, FetchState::Loading(_))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, FetchState::Ready(..))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, FetchState::Failed(..))
    }

    /// Zones, once ready.
    pub fn data(&self) -> Option<&[Zone]> {
        match &self.state {
            FetchState::Ready(_, zones) => Some(zones.as_slice()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match &self.state {
            FetchState::Failed(_, e) => Some(e),
            _ => None,
        }
    }

    /// The request behind the current state, `None` while idle.
    pub fn request(&self) -> Option<&FetchRequest> {
        match &self.state {
            FetchState::Idle => None,
            FetchState::Loading(r) | FetchState::Ready(r, _) | FetchState::Failed(r, _) => Some(r),
        }
    }
}

/// Submit `request`, await `source` and resolve. The machine is only
/// borrowed around the transitions, so other submits may interleave while
/// the fetch is pending. Returns whether this result was applied.
pub async fn run<S: ZoneSource>(
    machine: &RefCell<ZoneFetchMachine>,
    source: &S,
    request: FetchRequest,
) -> bool {
    let ticket = machine.borrow_mut().submit(request);
    let result = source.fetch_zones(ticket.request()).await;
    machine.borrow_mut().resolve(&ticket, result)
}

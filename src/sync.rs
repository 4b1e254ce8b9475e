//! Round-trips to the authoritative server.
//!
//! The controller never predicts: a click sends a purchase request and the
//! page keeps showing the last confirmed snapshot until the server answers
//! with a complete new one. Completions arrive later on the same thread, in
//! whatever order the network delivers them.

use std::cell::Cell;
use std::rc::Rc;

use crate::clock::Clock;
use crate::error::{SyncError, TransportError};
use crate::snapshot::{EntityKind, PurchaseKind, PurchaseRequest, Snapshot};
use crate::store::{GameStore, SessionState};

/// What the controller asks the transport to do.
#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    /// Read the current state.
    Bootstrap,
    /// Attempt a purchase. The server decides whether it is legal.
    Purchase(PurchaseRequest),
}

impl Request {
    fn describe(&self) -> String {
        match self {
            Request::Bootstrap => "bootstrap".to_string(),
            Request::Purchase(p) => format!("purchase of {:?} `{}`", p.clicked, p.name),
        }
    }
}

/// Raw server answer.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Callback invoked exactly once when a request finishes.
pub type Completion = Box<dyn FnOnce(Result<Response, TransportError>)>;

/// The request function. Implementations must not call `done` re-entrantly
/// from inside `send` if the caller holds borrows; the browser transport
/// always completes on a later turn of the event loop.
pub trait Transport {
    fn send(&self, request: Request, done: Completion);
}

/// Result of a round-trip that did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The response was installed and a full redraw ran.
    Installed,
    /// A newer response was already installed; this one was dropped.
    Superseded,
}

/// A clicked element resolved to the entity it shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClickTag {
    pub kind: EntityKind,
    pub name: String,
}

impl ClickTag {
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

/// Everything a completion needs, detached from the transport.
struct Installer {
    store: Rc<GameStore>,
    clock: Rc<dyn Clock>,
    redraw: Rc<dyn Fn()>,
    discard_stale: bool,
}

impl Installer {
    fn complete(
        &self,
        seq: u64,
        result: Result<Response, TransportError>,
    ) -> Result<SyncOutcome, SyncError> {
        let response = result?;
        if !response.is_success() {
            return Err(SyncError::Status(response.status));
        }
        if self.discard_stale {
            if let Ok(current) = self.store.current_snapshot() {
                if seq < current.origin() {
                    return Ok(SyncOutcome::Superseded);
                }
            }
        }
        let snapshot = Snapshot::from_json(&response.body, self.clock.now(), seq)?;
        self.store.replace_snapshot(snapshot);
        (self.redraw)();
        Ok(SyncOutcome::Installed)
    }
}

pub struct SyncController<T: Transport> {
    transport: T,
    store: Rc<GameStore>,
    clock: Rc<dyn Clock>,
    redraw: Rc<dyn Fn()>,
    discard_stale: bool,
    /// Sequence number of the most recently sent request.
    last_seq: Cell<u64>,
}

impl<T: Transport> SyncController<T> {
    /// `redraw` runs right after every successful snapshot replacement.
    pub fn new(
        transport: T,
        store: Rc<GameStore>,
        clock: Rc<dyn Clock>,
        redraw: impl Fn() + 'static,
    ) -> Self {
        Self {
            transport,
            store,
            clock,
            redraw: Rc::new(redraw),
            discard_stale: true,
            last_seq: Cell::new(0),
        }
    }

    /// With `false`, every response is installed and the last one to arrive
    /// wins regardless of send order.
    pub fn discard_stale_responses(mut self, discard: bool) -> Self {
        self.discard_stale = discard;
        self
    }

    pub fn session_state(&self) -> SessionState {
        self.store.session_state()
    }

    /// Fetch the initial state. On failure the store stays as it was.
    pub fn bootstrap(&self, on_done: impl FnOnce(Result<SyncOutcome, SyncError>) + 'static) {
        self.dispatch(Request::Bootstrap, on_done);
    }

    /// Ask the server to buy one `name`. Nothing changes locally until the
    /// answer arrives; a rejected purchase comes back as the unchanged state.
    pub fn submit_purchase(
        &self,
        name: &str,
        kind: PurchaseKind,
        on_done: impl FnOnce(Result<SyncOutcome, SyncError>) + 'static,
    ) {
        self.dispatch(
            Request::Purchase(PurchaseRequest::single(name, kind)),
            on_done,
        );
    }

    /// Route a click. Returns true if a purchase request was sent; clicks on
    /// resources are ignored.
    pub fn handle_click(
        &self,
        tag: &ClickTag,
        on_done: impl FnOnce(Result<SyncOutcome, SyncError>) + 'static,
    ) -> bool {
        match tag.kind.purchase_kind() {
            Some(kind) => {
                self.submit_purchase(&tag.name, kind, on_done);
                true
            }
            None => false,
        }
    }

    fn dispatch(
        &self,
        request: Request,
        on_done: impl FnOnce(Result<SyncOutcome, SyncError>) + 'static,
    ) {
        let seq = self.last_seq.get() + 1;
        self.last_seq.set(seq);

        let label = request.describe();
        log::debug!("sending {} (#{})", label, seq);

        let installer = Installer {
            store: self.store.clone(),
            clock: self.clock.clone(),
            redraw: self.redraw.clone(),
            discard_stale: self.discard_stale,
        };
        self.transport.send(
            request,
            Box::new(move |result| {
                let outcome = installer.complete(seq, result);
                match &outcome {
                    Ok(SyncOutcome::Installed) => log::info!("{} (#{}) installed", label, seq),
                    Ok(SyncOutcome::Superseded) => {
                        log::warn!("{} (#{}) arrived after a newer response, dropped", label, seq)
                    }
                    Err(e) => log::warn!("{} (#{}) failed: {}", label, seq, e),
                }
                on_done(outcome);
            }),
        );
    }
}

//! Command registry: binds wire identifiers to receive handlers.
//!
//! Registration happens once at role bootstrap and is not reachable
//! afterward; re-registration silently replaces the previous handler
//! (last-registration-wins). Dispatch of an identifier with no handler
//! drops the frame with no observable effect — on a shared bus, traffic
//! addressed to the other role is expected, not a fault.

use heapless::LinearMap;
use tracing::{trace, warn};

use argo_common::protocol::CmdId;

/// Receive handler: validates the payload and, on success, updates the
/// mailbox or telemetry caches. Must never block.
pub type CmdHandler = Box<dyn Fn(&[u8]) + Send + Sync>;

/// Upper bound on registered handlers; the full identifier set is 13.
const REGISTRY_CAPACITY: usize = 16;

pub struct CommandRegistry {
    handlers: LinearMap<CmdId, CmdHandler, REGISTRY_CAPACITY>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            handlers: LinearMap::new(),
        }
    }

    /// Bind `handler` to `id`, replacing any previous binding.
    pub fn register(&mut self, id: CmdId, handler: CmdHandler) {
        match self.handlers.insert(id, handler) {
            Ok(Some(_)) => trace!(?id, "handler replaced"),
            Ok(None) => {}
            // Unreachable while the identifier set fits the capacity bound.
            Err(_) => warn!(?id, "registry full, handler dropped"),
        }
    }

    /// Dispatch a received frame to its handler.
    ///
    /// Unknown raw identifiers and identifiers without a handler for the
    /// active role are dropped silently.
    pub fn dispatch(&self, raw_id: u16, payload: &[u8]) {
        let Some(id) = CmdId::from_u16(raw_id) else {
            trace!(raw_id, "unknown command identifier, frame dropped");
            return;
        };
        match self.handlers.get(&id) {
            Some(handler) => handler(payload),
            None => trace!(?id, "no handler for active role, frame dropped"),
        }
    }

    pub fn is_registered(&self, id: CmdId) -> bool {
        self.handlers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

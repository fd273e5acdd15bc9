use std::collections::HashMap;
use std::rc::Rc;

use crate::Result;
use crate::dom::NodeId;
use crate::page::Window;

/// An event handler. Handlers receive the window so they can read the
/// document, talk to the backend client handle and navigate; `EventState`
/// carries target identity and the prevent/stop flags.
pub type Handler = Rc<dyn Fn(&mut Window, &mut EventState) -> Result<()>>;

#[derive(Debug, Clone)]
pub struct EventState {
    pub event_type: String,
    pub target: NodeId,
    pub current_target: NodeId,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

impl EventState {
    pub(crate) fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

#[derive(Default)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<String, Vec<Handler>>>,
}

impl std::fmt::Debug for ListenerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count: usize = self
            .map
            .values()
            .flat_map(|events| events.values())
            .map(Vec::len)
            .sum();
        f.debug_struct("ListenerStore")
            .field("listeners", &count)
            .finish()
    }
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node_id: NodeId, event: &str, handler: Handler) {
        self.map
            .entry(node_id)
            .or_default()
            .entry(event.to_string())
            .or_default()
            .push(handler);
    }

    pub(crate) fn get(&self, node_id: NodeId, event: &str) -> Vec<Handler> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .cloned()
            .unwrap_or_default()
    }

    /// Drops every registration. Called when the document body is replaced;
    /// stale `NodeId` keys must not fire against recycled positions.
    pub(crate) fn clear(&mut self) {
        self.map.clear();
    }
}

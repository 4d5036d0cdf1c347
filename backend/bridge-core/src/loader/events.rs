use models::LoaderEventType;

use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter, Result as FormatResult};

use log::warn;

/// Error a lifecycle handler may report. It is logged and otherwise ignored.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

pub type EventHandler<E> = Box<dyn FnMut(&LoaderEvent<'_, E>) -> Result<(), HandlerError>>;

/// What a lifecycle handler receives.
#[derive(Debug, Clone, Copy)]
pub struct LoaderEvent<'a, E> {
    pub kind: LoaderEventType,
    /// The loader's root element. `None` before creation and once destroyed.
    pub el: Option<&'a E>,
    /// The container the root element is appended to.
    pub parent_el: &'a E,
    /// The session id, also on `Destroyed` so handlers can tell loaders apart.
    pub id: &'a str,
}

/// At most one handler per event kind.
pub struct EventHandlers<E> {
    handlers: BTreeMap<LoaderEventType, EventHandler<E>>,
}

impl<E> Default for EventHandlers<E> {
    fn default() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }
}

impl<E> Debug for EventHandlers<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

impl<E> EventHandlers<E> {
    /// Register `handler` for `kind`, replacing any previous one.
    pub fn on<F>(&mut self, kind: LoaderEventType, handler: F)
    where
        F: FnMut(&LoaderEvent<'_, E>) -> Result<(), HandlerError> + 'static,
    {
        self.handlers.insert(kind, Box::new(handler));
    }

    pub fn contains(&self, kind: LoaderEventType) -> bool {
        self.handlers.contains_key(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    /// Invoke the handler for `event.kind`, if any. A failing handler is logged.
    pub fn emit(&mut self, event: &LoaderEvent<'_, E>) {
        let Some(handler) = self.handlers.get_mut(&event.kind) else {
            return;
        };

        if let Err(error) = handler(event) {
            warn!("Handler for \"{}\" event failed: {}", event.kind, error);
        }
    }
}

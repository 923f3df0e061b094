//! Stateful wrapper around [`reduce`](crate::reduce) that tells its owner
//! when the demo moves in or out of the `has-selection` state.

use selectie_density::{HashJitter, Jitter};

use crate::{ControllerState, Event, SelectionContext, reduce};

type Listener<'a> = Box<dyn FnMut(bool) + 'a>;

/// Holds the current [`ControllerState`] and applies events to it.
pub struct Controller<'a, J = HashJitter> {
    ctx: SelectionContext<'a, J>,
    state: ControllerState,
    listener: Option<Listener<'a>>,
}

impl<J> std::fmt::Debug for Controller<'_, J> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("state", &self.state)
            .field("listener", &self.listener.is_some())
            .finish_non_exhaustive()
    }
}

impl<'a, J: Jitter> Controller<'a, J> {
    #[must_use]
    pub const fn new(ctx: SelectionContext<'a, J>, state: ControllerState) -> Self {
        Self {
            ctx,
            state,
            listener: None,
        }
    }

    /// Registers a callback invoked with the new value whenever
    /// `has_selection` flips.
    #[must_use]
    pub fn on_selection_change(mut self, listener: impl FnMut(bool) + 'a) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Applies an event and returns the resulting state.
    pub fn dispatch(&mut self, event: Event) -> &ControllerState {
        let had_selection = self.state.has_selection();
        self.state = reduce(&self.state, event, &self.ctx);

        let has_selection = self.state.has_selection();
        if had_selection != has_selection {
            log::debug!("has_selection changed to {has_selection}");
            if let Some(listener) = self.listener.as_mut() {
                listener(has_selection);
            }
        }

        &self.state
    }

    #[must_use]
    pub const fn state(&self) -> &ControllerState {
        &self.state
    }

    #[must_use]
    pub const fn context(&self) -> &SelectionContext<'a, J> {
        &self.ctx
    }
}

use bevy::prelude::*;

/// Actions that compete for control of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Move,
}

/// Arbitrates between concurrent actions on one unit: starting an action
/// cancels whatever else was running.
pub trait ActionArbiter {
    fn start_action(&mut self, action: ActionKind);
}

/// The action a unit is currently performing.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentAction {
    action: Option<ActionKind>,
}

impl CurrentAction {
    pub fn get(&self) -> Option<ActionKind> {
        self.action
    }

    /// Clears the current action, returning it.
    pub fn cancel(&mut self) -> Option<ActionKind> {
        self.action.take()
    }
}

impl ActionArbiter for CurrentAction {
    fn start_action(&mut self, action: ActionKind) {
        if let Some(previous) = self.action.replace(action) {
            trace!("Action {:?} superseded by {:?}", previous, action);
        }
    }
}

//! Controllers registered with a supervisor, keyed by identifier

use super::{ControllerId, ControllerKind};
use crate::error::{ControlError, Result};

/// Ordered set of controllers; the first registered is the initial state
#[derive(Debug, Clone, Default)]
pub struct ControllerRegistry {
    entries: Vec<ControllerKind>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        ControllerRegistry {
            entries: Vec::new(),
        }
    }

    /// Register a controller; each identifier may appear once
    pub fn register(&mut self, controller: ControllerKind) -> Result<()> {
        let id = controller.id();
        if self.contains(id) {
            return Err(ControlError::invalid(
                "controllers",
                format!("{} registered twice", id),
            ));
        }
        self.entries.push(controller);
        Ok(())
    }

    pub fn contains(&self, id: ControllerId) -> bool {
        self.entries.iter().any(|c| c.id() == id)
    }

    pub fn get(&self, id: ControllerId) -> Result<&ControllerKind> {
        self.entries
            .iter()
            .find(|c| c.id() == id)
            .ok_or(ControlError::UnknownController(id))
    }

    pub fn get_mut(&mut self, id: ControllerId) -> Result<&mut ControllerKind> {
        self.entries
            .iter_mut()
            .find(|c| c.id() == id)
            .ok_or(ControlError::UnknownController(id))
    }

    /// Identifier of the first registered controller
    pub fn initial(&self) -> Option<ControllerId> {
        self.entries.first().map(ControllerKind::id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ControllerId> + '_ {
        self.entries.iter().map(ControllerKind::id)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ControllerKind> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

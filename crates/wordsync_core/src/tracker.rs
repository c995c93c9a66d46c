use crate::DocumentId;

/// Single-slot record of the document that currently has focus.
///
/// The slot only changes through [`ActiveDocumentTracker::swap`], which hands
/// back the document that just lost focus.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActiveDocumentTracker {
    focused: Option<DocumentId>,
}

impl ActiveDocumentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `next` as focused and returns the previous occupant of the slot.
    pub fn swap(&mut self, next: Option<DocumentId>) -> Option<DocumentId> {
        std::mem::replace(&mut self.focused, next)
    }

    pub fn current(&self) -> Option<&DocumentId> {
        self.focused.as_ref()
    }

    /// Empties the slot without reporting a transition.
    pub fn clear(&mut self) {
        self.focused = None;
    }
}

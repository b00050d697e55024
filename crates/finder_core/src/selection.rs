use std::collections::BTreeSet;

use crate::projection::DisplayRow;
use crate::record::PartId;

/// Record ids chosen for batch operations. Kept a subset of the visible rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    ids: BTreeSet<PartId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: PartId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Toggles `id` if it is visible; hidden ids are never added.
    pub fn toggle(&mut self, id: PartId, visible: &[DisplayRow]) -> bool {
        if !visible.iter().any(|row| row.id == id) {
            return false;
        }
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
        true
    }

    pub fn select_all(&mut self, visible: &[DisplayRow]) {
        self.ids.extend(visible.iter().map(|row| row.id));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drops every id not present in `visible`. Returns how many were dropped.
    pub fn retain_visible(&mut self, visible: &[DisplayRow]) -> usize {
        let before = self.ids.len();
        let visible: BTreeSet<PartId> = visible.iter().map(|row| row.id).collect();
        self.ids.retain(|id| visible.contains(id));
        before - self.ids.len()
    }

    /// Owned copy for a batch operation; later selection edits do not affect it.
    pub fn snapshot(&self) -> Vec<PartId> {
        self.ids.iter().copied().collect()
    }
}

//! Expand/collapse state of the widget panel.

use serde::{Deserialize, Serialize};

/// Keys the widget reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKey {
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelState {
    pub expanded: bool,
}

impl Default for PanelState {
    fn default() -> Self {
        Self { expanded: true }
    }
}

impl PanelState {
    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    /// Returns `true` if the key changed the panel.
    pub fn handle_key(&mut self, key: WidgetKey) -> bool {
        match key {
            WidgetKey::Escape if self.expanded => {
                self.expanded = false;
                true
            }
            _ => false,
        }
    }
}

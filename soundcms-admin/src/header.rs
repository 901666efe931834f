//! Page header buttons.

use serde::{Deserialize, Serialize};

use crate::state::State;

/// One button in the page header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderButton {
    pub key: String,
    pub label: String,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default)]
    pub loading: bool,
}

fn enabled_default() -> bool {
    true
}

impl HeaderButton {
    /// An enabled, idle button.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            enabled: true,
            loading: false,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Header buttons for the current page.
///
/// Owned by one page; mutated only through the setters below. Setters that
/// name an unknown key return `false` and change nothing.
#[derive(Debug, Clone, Default)]
pub struct HeaderButtons {
    buttons: State<Vec<HeaderButton>>,
}

impl HeaderButtons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole button set.
    pub fn set_buttons(&self, buttons: Vec<HeaderButton>) {
        self.buttons.set(buttons);
    }

    pub fn set_enabled(&self, key: &str, enabled: bool) -> bool {
        self.modify_button(key, |button| button.enabled = enabled)
    }

    pub fn set_loading(&self, key: &str, loading: bool) -> bool {
        self.modify_button(key, |button| button.loading = loading)
    }

    /// Remove every button, e.g. when the page is left.
    pub fn clear(&self) {
        self.buttons.set(Vec::new());
    }

    pub fn buttons(&self) -> Vec<HeaderButton> {
        self.buttons.get()
    }

    pub fn get(&self, key: &str) -> Option<HeaderButton> {
        self.buttons
            .with(|buttons| buttons.iter().find(|b| b.key == key).cloned())
    }

    /// Whether the setters changed anything since the last call.
    pub fn take_changed(&self) -> bool {
        let changed = self.buttons.is_dirty();
        self.buttons.clear_dirty();
        changed
    }

    fn modify_button(&self, key: &str, f: impl FnOnce(&mut HeaderButton)) -> bool {
        self.buttons.modify(|buttons| match buttons.iter_mut().find(|b| b.key == key) {
            Some(button) => {
                f(button);
                true
            }
            None => false,
        })
    }
}

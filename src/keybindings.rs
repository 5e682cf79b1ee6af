//! Customizable keybindings.
//!
//! Each action can be bound to several keys; by default Delete and Backspace
//! both remove the selected box. Bindings are stored in the configuration file.

use serde::{Deserialize, Serialize};

use crate::input::Key;

/// What a key press asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    NextImage,
    PrevImage,
    DeleteSelected,
    CancelDrag,
}

/// Keybinding configuration for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    /// Keys that move to the next image
    #[serde(default = "default_next_image")]
    pub next_image: Vec<Key>,
    /// Keys that move to the previous image
    #[serde(default = "default_prev_image")]
    pub prev_image: Vec<Key>,
    /// Keys that delete the selected box
    #[serde(default = "default_delete_selected")]
    pub delete_selected: Vec<Key>,
    /// Keys that abandon the box being drawn
    #[serde(default = "default_cancel_drag")]
    pub cancel_drag: Vec<Key>,
}

fn default_next_image() -> Vec<Key> {
    vec![Key::ArrowRight]
}

fn default_prev_image() -> Vec<Key> {
    vec![Key::ArrowLeft]
}

fn default_delete_selected() -> Vec<Key> {
    vec![Key::Delete, Key::Backspace]
}

fn default_cancel_drag() -> Vec<Key> {
    vec![Key::Escape]
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            next_image: default_next_image(),
            prev_image: default_prev_image(),
            delete_selected: default_delete_selected(),
            cancel_drag: default_cancel_drag(),
        }
    }
}

impl KeyBindings {
    /// Create new keybindings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    fn bindings(&self) -> [(KeyAction, &[Key]); 4] {
        [
            (KeyAction::NextImage, self.next_image.as_slice()),
            (KeyAction::PrevImage, self.prev_image.as_slice()),
            (KeyAction::DeleteSelected, self.delete_selected.as_slice()),
            (KeyAction::CancelDrag, self.cancel_drag.as_slice()),
        ]
    }

    /// Get the action that corresponds to a key press, if any.
    pub fn action_for_key(&self, key: Key) -> Option<KeyAction> {
        self.bindings()
            .into_iter()
            .find(|(_, keys)| keys.contains(&key))
            .map(|(action, _)| action)
    }
}

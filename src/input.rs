//! Input events delivered by the host's interaction layer.

use serde::{Deserialize, Serialize};

use crate::model::Point;

/// Keys the session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Delete,
    Backspace,
    Escape,
}

impl Key {
    /// Parse a key from its DOM-style or lowercase name (e.g. `"ArrowRight"`, `"right"`).
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name.to_ascii_lowercase().as_str() {
            "arrowleft" | "left" => Key::ArrowLeft,
            "arrowright" | "right" => Key::ArrowRight,
            "delete" | "del" => Key::Delete,
            "backspace" => Key::Backspace,
            "escape" | "esc" => Key::Escape,
            _ => return None,
        };
        Some(key)
    }
}

/// A discrete user action on the canvas.
///
/// Pointer positions are in screen pixels on the rendering surface; the session
/// maps them into image space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    /// Mouse wheel over the canvas; negative `delta_y` scrolls up.
    Wheel { delta_y: f32 },
    Key(Key),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_name() {
        assert_eq!(Key::from_name("ArrowRight"), Some(Key::ArrowRight));
        assert_eq!(Key::from_name("left"), Some(Key::ArrowLeft));
        assert_eq!(Key::from_name("Backspace"), Some(Key::Backspace));
        assert_eq!(Key::from_name("F5"), None);
    }

    #[test]
    fn test_key_serde_names() {
        let json = serde_json::to_string(&Key::ArrowRight).unwrap();
        assert_eq!(json, "\"arrow_right\"");
        let key: Key = serde_json::from_str("\"backspace\"").unwrap();
        assert_eq!(key, Key::Backspace);
    }
}

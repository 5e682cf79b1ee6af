//! bbox-labeler - YOLO bounding-box annotation engine
//!
//! Holds the state of a labeling session (classes, images, boxes, selection)
//! and turns discrete input events into state changes, draw lists and a
//! YOLO-format dataset archive. Rendering and file picking belong to the host:
//! the native binary in `main.rs` drives a session from text commands, a web
//! host would feed it browser events.

pub mod config;
pub mod constants;
pub mod coords;
pub mod export;
pub mod format;
pub mod geometry;
pub mod input;
pub mod keybindings;
pub mod model;
pub mod provider;
pub mod render;
pub mod session;
pub mod state;
pub mod views;

pub use config::AppConfig;
pub use session::{Session, SessionSettings};

//! BILT - Batch Image Labeling Tool
//!
//! A browser-based tool for classifying a batch of images: upload a set of
//! images, label each one with free text or numeric hotkeys, and download the
//! results as a zip archive with one folder per label.
//!
//! The core (session state, label ledger, shortcut dispatch, export packager)
//! is plain Rust and unit-tested natively; the `wasm` module binds it to the
//! browser.

mod app;
mod config;
mod constants;
mod export;
mod keybindings;
mod message;
mod model;
mod state;
#[cfg(test)]
mod test_image;
mod wasm_file;

pub use app::{BiltApp, Screen};
pub use config::{AppConfig, ConfigError, LogLevel, UserPreferences};
pub use constants::{ARCHIVE_NAME, LARGE_BATCH_THRESHOLD};
pub use export::{ExportBundle, ExportError, ExportFile, LabelGroup, build_archive};
pub use keybindings::{
    Binding, KeyBindings, KeyCode, MAX_LABEL_HOTKEYS, Modifiers, ShortcutRow, key_to_string,
};
pub use message::Message;
pub use model::{IMAGE_EXTENSIONS, ImageEntry, ImageSource, is_image_filename};
pub use state::{Advance, LoadedImage, SessionState};

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;

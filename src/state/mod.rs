//! Application state management modules.

mod focus;
mod session;

pub use focus::InputFocus;
pub use session::{Advance, LoadedImage, SessionState};

//! Application message types for BILT.
//!
//! All UI events and actions are represented as messages in the Elm
//! architecture style; `BiltApp::update` is the single place they mutate
//! state.

use crate::state::LoadedImage;

/// Messages that can be sent to update application state.
#[derive(Clone)]
pub enum Message {
    // Upload
    /// Open the browser file picker
    OpenFilePicker,
    /// Files were selected and read
    FilesLoaded(Vec<LoadedImage>),

    // Navigation
    /// Navigate to the next image
    NextImage,
    /// Navigate to the previous image
    PrevImage,

    // Classification
    /// Classify the current image with a known label (hotkey or button)
    Classify(String),
    /// Label input text changed
    LabelInputChanged(String),
    /// Focus the label input (shortcut combo)
    FocusLabelInput,
    /// The label input gained or lost focus in the document
    LabelInputFocusChanged(bool),
    /// Submit the typed label for the current image
    SubmitLabelInput,

    // Results
    /// Open the shortcuts reference page
    OpenShortcuts,
    /// Build the archive and trigger the download
    DownloadResults,
    /// Discard the session and start over
    NewSession,
}

//! Main BILT application state and update loop.
//!
//! `BiltApp` owns the classification session, the keybinding table, and the
//! label-input state. The host page (or the wasm glue) feeds it `Message`
//! values and key events; everything else is read-only accessors.

use crate::config::AppConfig;
use crate::constants::ARCHIVE_NAME;
use crate::export;
use crate::keybindings::{KeyBindings, KeyCode, Modifiers, ShortcutRow};
use crate::message::Message;
use crate::model::{ImageEntry, labels};
use crate::state::{Advance, InputFocus, LoadedImage, SessionState};
use crate::wasm_file;

/// Which view the host page should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// No images yet: show the upload prompt
    Upload,
    /// Classifying: show the viewer and controls
    Classify,
    /// Session finished: show the results summary
    Results,
}

impl Screen {
    /// Stable name for the host page.
    pub fn name(self) -> &'static str {
        match self {
            Screen::Upload => "upload",
            Screen::Classify => "classify",
            Screen::Results => "results",
        }
    }
}

/// Application state for one BILT instance.
#[derive(Debug, Default)]
pub struct BiltApp {
    /// The classification session (entries, position, finished flag)
    session: SessionState,
    /// Shortcut configuration
    keybindings: KeyBindings,
    /// Current contents of the free-text label input
    label_input: String,
    /// Whether keystrokes belong to the label input
    input_focus: InputFocus,
    /// One-line status for the host page
    status_message: Option<String>,
    /// Set when the host page should focus the label input
    focus_request: bool,
    /// Set when the host page should open the shortcuts reference
    shortcuts_request: bool,
}

impl BiltApp {
    /// Create an app with default keybindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one message.
    pub fn update(&mut self, message: Message) {
        match message {
            Message::OpenFilePicker => {
                log::info!("📂 Opening file picker...");
                wasm_file::open_file_picker();
            }
            Message::FilesLoaded(files) => self.handle_files_loaded(files),
            Message::NextImage => {
                if self.session.is_finished() {
                    log::debug!("Navigation ignored: session finished");
                } else if self.session.advance() == Advance::Moved {
                    self.update_position_status();
                } else {
                    log::debug!("Already at the last image");
                }
            }
            Message::PrevImage => {
                if self.session.is_finished() {
                    log::debug!("Navigation ignored: session finished");
                } else if self.session.retreat() {
                    self.update_position_status();
                }
            }
            Message::Classify(label) => {
                if self.session.is_finished() {
                    log::debug!("Classify ignored: session finished");
                } else {
                    self.classify_current(Some(label));
                }
            }
            Message::LabelInputChanged(text) => {
                self.label_input = text;
            }
            Message::FocusLabelInput => {
                self.input_focus.focus();
                self.focus_request = true;
            }
            Message::LabelInputFocusChanged(focused) => {
                if focused {
                    self.input_focus.focus();
                } else {
                    self.input_focus.blur();
                }
            }
            Message::SubmitLabelInput => {
                if self.session.is_finished() {
                    log::debug!("Submit ignored: session finished");
                } else {
                    let text = std::mem::take(&mut self.label_input);
                    let label = if text.is_empty() { None } else { Some(text) };
                    self.classify_current(label);
                }
                self.input_focus.blur();
            }
            Message::OpenShortcuts => {
                log::debug!("Opening shortcuts reference");
                self.shortcuts_request = true;
            }
            Message::DownloadResults => self.handle_download(),
            Message::NewSession => {
                self.session.reset();
                self.label_input.clear();
                self.input_focus.blur();
                self.status_message = None;
                wasm_file::revoke_object_urls();
            }
        }
    }

    /// Handle keyboard events, routing by focus state.
    ///
    /// Returns the message the key maps to, if any. While the label input is
    /// focused every shortcut is suppressed so digits and arrows reach the
    /// text field; only submission gets through.
    pub fn handle_key_event(&self, key: KeyCode, modifiers: Modifiers) -> Option<Message> {
        if self.input_focus.is_text_entry() {
            return match key {
                KeyCode::Enter => Some(Message::SubmitLabelInput),
                _ => None,
            };
        }

        if self.keybindings.focus_input.matches(key, modifiers) {
            return Some(Message::FocusLabelInput);
        }
        if self.keybindings.open_shortcuts.matches(key, modifiers) {
            return Some(Message::OpenShortcuts);
        }

        // Everything below is a bare-key shortcut; none applies on the
        // results screen.
        if modifiers.ctrl || modifiers.alt || self.session.is_finished() {
            return None;
        }
        if key == self.keybindings.next_image {
            return Some(Message::NextImage);
        }
        if key == self.keybindings.prev_image {
            return Some(Message::PrevImage);
        }

        // Digit k classifies with the k-th distinct label, when it exists.
        if let Some(slot) = self.keybindings.label_index_for_key(key) {
            let labels = labels::distinct_labels(self.session.entries());
            if let Some(label) = labels.get(slot) {
                return Some(Message::Classify((*label).to_string()));
            }
        }
        None
    }

    /// Poll platform glue for work; returns true if state changed.
    ///
    /// The browser file picker delivers its result through a thread-local
    /// mailbox; the host page calls this once per animation frame.
    pub fn tick(&mut self) -> bool {
        if let Some(files) = wasm_file::take_pending_files() {
            self.update(Message::FilesLoaded(files));
            return true;
        }
        false
    }

    fn handle_files_loaded(&mut self, files: Vec<LoadedImage>) {
        if files.is_empty() {
            log::warn!("📂 No files selected");
            return;
        }
        let entries: Vec<ImageEntry> = files
            .into_iter()
            .filter_map(|f| ImageEntry::from_upload(&f.name, f.data))
            .collect();
        if entries.is_empty() {
            self.status_message = Some("No image files in selection".to_string());
            return;
        }

        let count = entries.len();
        self.session.append(entries);
        self.status_message = Some(format!("Loaded {} images", count));
    }

    /// The shared classification action for the hotkey and free-text paths.
    fn classify_current(&mut self, label: Option<String>) {
        let Some(name) = self.session.current_name().map(String::from) else {
            return;
        };
        match &label {
            Some(l) => log::info!("🏷️ {} -> {}", name, l),
            None => log::info!("🏷️ {} left unclassified", name),
        }

        self.session.classify(label);
        if self.session.is_finished() {
            self.status_message = Some(format!(
                "Classification complete: {} images",
                self.session.len()
            ));
        } else {
            self.update_position_status();
        }
    }

    fn handle_download(&mut self) {
        // The build is synchronous, but the generation check keeps the
        // discard-on-reset contract if a source ever becomes asynchronous.
        let generation = self.session.generation();
        match export::build_archive(self.session.entries()) {
            Ok(bytes) => {
                if self.session.generation() != generation {
                    log::warn!("📦 Discarding export from a reset session");
                    return;
                }
                self.status_message = Some("Download started".to_string());
                wasm_file::download_bytes(&bytes, ARCHIVE_NAME);
            }
            Err(e) => {
                log::error!("📦 Export failed: {}", e);
                self.status_message = Some(format!("Export failed: {}", e));
            }
        }
    }

    fn update_position_status(&mut self) {
        if let Some(name) = self.session.current_name() {
            self.status_message = Some(format!("Image {}: {}", self.session.progress(), name));
        }
    }

    // ------------------------------------------------------------------
    // Read-only accessors for the host page
    // ------------------------------------------------------------------

    /// The classification session.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Which view the host page should render.
    pub fn screen(&self) -> Screen {
        if self.session.is_finished() {
            Screen::Results
        } else if self.session.is_empty() {
            Screen::Upload
        } else {
            Screen::Classify
        }
    }

    /// Distinct labels in first-occurrence order (hotkey order).
    pub fn distinct_labels(&self) -> Vec<String> {
        labels::distinct_labels(self.session.entries())
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Per-label counts for the results summary.
    pub fn label_counts(&self) -> Vec<(String, usize)> {
        labels::label_counts(self.session.entries())
    }

    /// The shortcuts reference table.
    pub fn shortcuts(&self) -> Vec<ShortcutRow> {
        self.keybindings.reference()
    }

    /// Current keybinding table.
    pub fn keybindings(&self) -> &KeyBindings {
        &self.keybindings
    }

    /// Current text in the label input.
    pub fn label_input(&self) -> &str {
        &self.label_input
    }

    /// Whether the label input currently owns keystrokes.
    pub fn is_input_focused(&self) -> bool {
        self.input_focus.is_text_entry()
    }

    /// Latest status line, if any.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Export the current settings as a config object.
    pub fn config(&self) -> AppConfig {
        AppConfig::from_keybindings(self.keybindings.clone())
    }

    /// Apply an imported config.
    pub fn apply_config(&mut self, config: AppConfig) {
        log::set_max_level(config.preferences.log_level.to_level_filter());
        self.keybindings = config.keybindings;
        log::info!("⚙️ Applied configuration");
    }

    /// Take the pending "focus the label input" request, if set.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_request)
    }

    /// Take the pending "open the shortcuts page" request, if set.
    pub fn take_shortcuts_request(&mut self) -> bool {
        std::mem::take(&mut self.shortcuts_request)
    }
}

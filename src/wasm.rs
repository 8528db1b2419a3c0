//! WASM entry point and browser surface.
//!
//! The host page owns the DOM (viewer, buttons, the label input) and drives
//! the app through `WebApp`. The document-level keydown listener is attached
//! here, once, over the shared app cell: the dispatcher reads the latest
//! state on every event, so there is nothing to re-subscribe and no stale
//! closure. The label input is the host's element; the host forwards its
//! focus, input, and submit events so the dispatcher's focus state stays
//! true.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::app::BiltApp;
use crate::keybindings::{KeyCode, Modifiers};
use crate::message::Message;
use crate::model::ImageSource;
use crate::wasm_file;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"BILT: logger already initialized".into());
    }
    log::info!("BILT WASM starting...");
}

/// Browser handle to one BILT application instance.
#[wasm_bindgen]
pub struct WebApp {
    app: Rc<RefCell<BiltApp>>,
}

#[wasm_bindgen]
impl WebApp {
    /// Create the app and attach the document key listener.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebApp {
        let app = Rc::new(RefCell::new(BiltApp::new()));
        attach_key_listener(&app);
        WebApp { app }
    }

    /// Poll platform glue for completed file reads.
    ///
    /// Call once per animation frame; returns true when state changed and the
    /// page should re-render.
    pub fn tick(&self) -> bool {
        self.app.borrow_mut().tick()
    }

    // --------------------------------------------------------------
    // Actions
    // --------------------------------------------------------------

    /// Open the image file picker.
    pub fn open_file_picker(&self) {
        self.app.borrow_mut().update(Message::OpenFilePicker);
    }

    /// Navigate to the next image.
    pub fn next_image(&self) {
        self.app.borrow_mut().update(Message::NextImage);
    }

    /// Navigate to the previous image.
    pub fn prev_image(&self) {
        self.app.borrow_mut().update(Message::PrevImage);
    }

    /// Classify the current image with a known label (label button click).
    pub fn classify(&self, label: String) {
        self.app.borrow_mut().update(Message::Classify(label));
    }

    /// Mirror the label input's text.
    pub fn label_input_changed(&self, text: String) {
        self.app.borrow_mut().update(Message::LabelInputChanged(text));
    }

    /// Mirror the label input's focus state (focus/blur events).
    pub fn notify_input_focused(&self, focused: bool) {
        self.app
            .borrow_mut()
            .update(Message::LabelInputFocusChanged(focused));
    }

    /// Submit the typed label for the current image (form submit).
    pub fn submit_label(&self) {
        self.app.borrow_mut().update(Message::SubmitLabelInput);
    }

    /// Build the archive and trigger the download.
    pub fn download_results(&self) {
        self.app.borrow_mut().update(Message::DownloadResults);
    }

    /// Open the shortcuts reference (keyboard icon click).
    pub fn open_shortcuts(&self) {
        self.app.borrow_mut().update(Message::OpenShortcuts);
    }

    /// Discard the session and start over.
    pub fn reset_session(&self) {
        self.app.borrow_mut().update(Message::NewSession);
    }

    // --------------------------------------------------------------
    // State for rendering
    // --------------------------------------------------------------

    /// Current screen: "upload", "classify", or "results".
    pub fn screen(&self) -> String {
        self.app.borrow().screen().name().to_string()
    }

    /// Progress string like "3/15".
    pub fn progress(&self) -> String {
        self.app.borrow().session().progress()
    }

    /// File name of the current image.
    pub fn current_name(&self) -> Option<String> {
        self.app.borrow().session().current_name().map(String::from)
    }

    /// Object URL for displaying the current image.
    pub fn current_image_url(&self) -> Option<String> {
        let app = self.app.borrow();
        let entry = app.session().current()?;
        match &entry.source {
            ImageSource::Memory(bytes) => {
                wasm_file::object_url_for(app.session().current_index(), entry.mime_type(), bytes)
            }
            ImageSource::Path(_) => None,
        }
    }

    /// Current text of the label input.
    pub fn label_input(&self) -> String {
        self.app.borrow().label_input().to_string()
    }

    /// Latest status line.
    pub fn status_message(&self) -> Option<String> {
        self.app.borrow().status_message().map(String::from)
    }

    /// Whether the session has finished.
    pub fn is_finished(&self) -> bool {
        self.app.borrow().session().is_finished()
    }

    /// Distinct labels in hotkey order, as a JSON array.
    pub fn distinct_labels_json(&self) -> String {
        serde_json::to_string(&self.app.borrow().distinct_labels())
            .unwrap_or_else(|_| "[]".to_string())
    }

    /// Per-label counts for the results summary, as a JSON array of
    /// `[label, count]` pairs.
    pub fn label_counts_json(&self) -> String {
        serde_json::to_string(&self.app.borrow().label_counts())
            .unwrap_or_else(|_| "[]".to_string())
    }

    /// The shortcuts reference table, as a JSON array of `{keys, action}`.
    pub fn shortcuts_json(&self) -> String {
        serde_json::to_string(&self.app.borrow().shortcuts())
            .unwrap_or_else(|_| "[]".to_string())
    }

    /// True once when the host should focus the label input.
    pub fn take_focus_request(&self) -> bool {
        self.app.borrow_mut().take_focus_request()
    }

    /// True once when the host should open the shortcuts page.
    pub fn take_shortcuts_request(&self) -> bool {
        self.app.borrow_mut().take_shortcuts_request()
    }

    // --------------------------------------------------------------
    // Configuration
    // --------------------------------------------------------------

    /// Export current settings as JSON.
    pub fn export_config(&self) -> Result<String, JsError> {
        self.app
            .borrow()
            .config()
            .to_json()
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Import settings from JSON.
    pub fn import_config(&self, json: &str) -> Result<(), JsError> {
        let config =
            crate::config::AppConfig::from_json(json).map_err(|e| JsError::new(&e.to_string()))?;
        self.app.borrow_mut().apply_config(config);
        Ok(())
    }
}

impl Default for WebApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Attach the document-level keydown listener over the shared app cell.
fn attach_key_listener(app: &Rc<RefCell<BiltApp>>) {
    let document = web_sys::window()
        .expect("no window")
        .document()
        .expect("no document");

    let app = Rc::clone(app);
    let closure = Closure::wrap(Box::new(move |event: web_sys::KeyboardEvent| {
        let Some(key) = KeyCode::from_browser_key(&event.key()) else {
            return;
        };
        let modifiers = Modifiers {
            ctrl: event.ctrl_key() || event.meta_key(),
            shift: event.shift_key(),
            alt: event.alt_key(),
        };

        // Borrow twice so update() can re-enter accessors freely.
        let message = app.borrow().handle_key_event(key, modifiers);
        if let Some(message) = message {
            event.prevent_default();
            app.borrow_mut().update(message);
        }
    }) as Box<dyn FnMut(web_sys::KeyboardEvent)>);

    document
        .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
        .expect("failed to attach keydown listener");
    closure.forget(); // The listener lives for the page lifetime
}

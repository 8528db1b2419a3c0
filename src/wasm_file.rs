//! Browser file glue for the WASM build.
//!
//! Three concerns live here, all backed by web_sys:
//! - the hidden file-picker input that reads selected images into memory,
//!   delivered through a thread-local mailbox the app polls via `tick()`
//! - the object-URL registry for displaying uploaded images, revoked in bulk
//!   on session reset so a large batch cannot leak URLs
//! - the download trigger for the export archive (transient object URL,
//!   synthetic anchor click, immediate revoke)
//!
//! Non-WASM builds get no-op stubs so the core compiles and tests natively.

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::collections::HashMap;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use crate::state::LoadedImage;

#[cfg(target_arch = "wasm32")]
thread_local! {
    /// Files read by the picker, waiting for the app to poll them via tick()
    static PENDING_FILES: RefCell<Option<Vec<LoadedImage>>> = const { RefCell::new(None) };

    /// Object URLs created for displaying uploaded images, by entry index
    static OBJECT_URLS: RefCell<HashMap<usize, String>> = RefCell::new(HashMap::new());
}

/// Take files loaded by the file picker, if any arrived since the last poll.
#[cfg(target_arch = "wasm32")]
pub fn take_pending_files() -> Option<Vec<LoadedImage>> {
    PENDING_FILES.with(|pending| pending.borrow_mut().take())
}

#[cfg(target_arch = "wasm32")]
fn set_pending_files(files: Vec<LoadedImage>) {
    PENDING_FILES.with(|pending| {
        *pending.borrow_mut() = Some(files);
    });
}

/// Open the browser file picker for selecting image files.
#[cfg(target_arch = "wasm32")]
pub fn open_file_picker() {
    use web_sys::{Document, Event, FileReader, HtmlInputElement};

    use crate::constants::LARGE_BATCH_THRESHOLD;
    use crate::model::is_image_filename;

    let window = web_sys::window().expect("no window");
    let document: Document = window.document().expect("no document");

    // Create a hidden file input element
    let input: HtmlInputElement = document
        .create_element("input")
        .expect("failed to create input")
        .dyn_into()
        .expect("not an input element");

    input.set_type("file");
    input.set_accept("image/*");
    input.set_multiple(true);

    // Read raw file bytes as they load
    let results: Rc<RefCell<Vec<LoadedImage>>> = Rc::new(RefCell::new(Vec::new()));
    let total_files: Rc<RefCell<usize>> = Rc::new(RefCell::new(0));
    let loaded_files: Rc<RefCell<usize>> = Rc::new(RefCell::new(0));

    // Clone for closure
    let results_clone = results.clone();
    let total_clone = total_files.clone();
    let loaded_clone = loaded_files.clone();

    // Handle file selection
    let onchange = Closure::wrap(Box::new(move |event: Event| {
        let input: HtmlInputElement = event
            .target()
            .expect("no target")
            .dyn_into()
            .expect("not input");

        let Some(files) = input.files() else {
            return;
        };
        let count = files.length();
        if count == 0 {
            log::warn!("📂 No files selected");
            return;
        }

        // The accept attribute is advisory; filter by name here and sniff
        // content later when entries are built.
        let mut image_files = Vec::new();
        for i in 0..count {
            if let Some(file) = files.get(i) {
                if is_image_filename(&file.name()) {
                    image_files.push(file);
                }
            }
        }

        if image_files.is_empty() {
            log::warn!("📂 No image files in selection");
            set_pending_files(Vec::new());
            return;
        }

        let image_count = image_files.len();
        if image_count > LARGE_BATCH_THRESHOLD {
            let window = web_sys::window().expect("no window");
            let message = format!(
                "You selected {} images.\n\n\
                Loading many images in the browser can use significant memory.\n\n\
                Continue anyway?",
                image_count
            );
            let confirmed = window.confirm_with_message(&message).unwrap_or(false);
            if !confirmed {
                log::info!("📂 Cancelled loading {} images", image_count);
                set_pending_files(Vec::new());
                return;
            }
        }

        *total_clone.borrow_mut() = image_count;
        log::info!("📂 Reading {} image files", image_count);

        for file in image_files {
            let name = file.name();
            let reader = FileReader::new().expect("failed to create FileReader");

            let results_inner = results_clone.clone();
            let loaded_inner = loaded_clone.clone();
            let total_inner = total_clone.clone();
            let name_clone = name.clone();

            // Store raw bytes when this file finishes loading
            let onload = Closure::wrap(Box::new(move |event: Event| {
                let reader: FileReader = event
                    .target()
                    .expect("no target")
                    .dyn_into()
                    .expect("not FileReader");

                if let Ok(result) = reader.result() {
                    let array = js_sys::Uint8Array::new(&result);
                    let data = array.to_vec();
                    log::debug!("📂 Read {}: {} bytes", name_clone, data.len());
                    results_inner.borrow_mut().push(LoadedImage {
                        name: name_clone.clone(),
                        data,
                    });
                }

                // Hand the batch over once every file settled
                *loaded_inner.borrow_mut() += 1;
                let loaded = *loaded_inner.borrow();
                let total = *total_inner.borrow();
                if loaded >= total {
                    let mut files = results_inner.borrow().clone();
                    // FileReader callbacks land in completion order
                    files.sort_by(|a, b| a.name.cmp(&b.name));
                    log::info!("📂 All {} files read", total);
                    set_pending_files(files);
                }
            }) as Box<dyn FnMut(Event)>);

            reader.set_onload(Some(onload.as_ref().unchecked_ref()));
            onload.forget(); // Leak the closure to keep it alive

            reader
                .read_as_array_buffer(&file)
                .expect("failed to read file");
        }
    }) as Box<dyn FnMut(Event)>);

    input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
    onchange.forget(); // Leak the closure to keep it alive

    // Trigger the file picker
    input.click();
}

/// Get (or create) an object URL for displaying an uploaded image.
///
/// URLs are cached per entry index and live until `revoke_object_urls`, so
/// re-viewing an image does not mint a new URL each time.
#[cfg(target_arch = "wasm32")]
pub fn object_url_for(index: usize, mime: &str, bytes: &[u8]) -> Option<String> {
    use web_sys::{Blob, BlobPropertyBag, Url};

    let cached = OBJECT_URLS.with(|urls| urls.borrow().get(&index).cloned());
    if cached.is_some() {
        return cached;
    }

    let array = js_sys::Array::new();
    array.push(&js_sys::Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type(mime);

    let blob = Blob::new_with_u8_array_sequence_and_options(&array, &options).ok()?;
    let url = Url::create_object_url_with_blob(&blob).ok()?;

    OBJECT_URLS.with(|urls| {
        urls.borrow_mut().insert(index, url.clone());
    });
    Some(url)
}

/// Revoke every display URL. Called on session reset and teardown.
#[cfg(target_arch = "wasm32")]
pub fn revoke_object_urls() {
    use web_sys::Url;

    OBJECT_URLS.with(|urls| {
        let mut urls = urls.borrow_mut();
        let count = urls.len();
        for (_, url) in urls.drain() {
            Url::revoke_object_url(&url).ok();
        }
        if count > 0 {
            log::debug!("🔄 Revoked {} object URLs", count);
        }
    });
}

/// Trigger a browser download of the given bytes.
///
/// The object URL exists only for the duration of the synthetic click.
#[cfg(target_arch = "wasm32")]
pub fn download_bytes(bytes: &[u8], filename: &str) {
    use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

    let document = web_sys::window()
        .expect("no window")
        .document()
        .expect("no document");

    let array = js_sys::Array::new();
    array.push(&js_sys::Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type("application/zip");

    let blob = match Blob::new_with_u8_array_sequence_and_options(&array, &options) {
        Ok(blob) => blob,
        Err(e) => {
            log::error!("📦 Failed to create download blob: {:?}", e);
            return;
        }
    };
    let url = match Url::create_object_url_with_blob(&blob) {
        Ok(url) => url,
        Err(e) => {
            log::error!("📦 Failed to create object URL: {:?}", e);
            return;
        }
    };

    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .expect("failed to create anchor")
        .dyn_into()
        .expect("not an anchor element");
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();

    // The click has handed the blob to the browser; free the URL now.
    Url::revoke_object_url(&url).ok();
    log::info!("📦 Download triggered: {}", filename);
}

// Stub implementations for non-WASM builds

#[cfg(not(target_arch = "wasm32"))]
pub fn take_pending_files() -> Option<Vec<LoadedImage>> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn open_file_picker() {
    // No-op outside the browser
}

#[cfg(not(target_arch = "wasm32"))]
pub fn revoke_object_urls() {
    // No-op outside the browser
}

#[cfg(not(target_arch = "wasm32"))]
pub fn download_bytes(bytes: &[u8], filename: &str) {
    log::info!(
        "📦 {} ready ({} bytes); downloads only run in the browser",
        filename,
        bytes.len()
    );
}

//! Image entry data model.
//!
//! One entry per uploaded image: the original file name, the image bytes (or
//! a path to them), and the optional classification label.

use std::borrow::Cow;
use std::io;
use std::path::PathBuf;

/// Supported image extensions
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff", "tif", "webp", "gif"];

/// Check if a filename (string) has a supported image extension.
/// Works with both full paths and just filenames.
pub fn is_image_filename(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}

/// Where an entry's bytes live.
///
/// Browser uploads arrive as in-memory bytes (read through `FileReader`);
/// natively loaded files keep their path and are read at export time.
#[derive(Clone, Debug)]
pub enum ImageSource {
    /// Raw image bytes held in memory
    Memory(Vec<u8>),
    /// Path to an image file on disk
    Path(PathBuf),
}

impl ImageSource {
    /// Get the entry's bytes, reading from disk for path sources.
    ///
    /// This is the only fallible step of an export; a failure here aborts the
    /// whole archive build.
    pub fn read(&self) -> io::Result<Cow<'_, [u8]>> {
        match self {
            ImageSource::Memory(data) => Ok(Cow::Borrowed(data)),
            ImageSource::Path(path) => std::fs::read(path).map(Cow::Owned),
        }
    }
}

/// One uploaded image plus its optional classification label.
#[derive(Clone, Debug)]
pub struct ImageEntry {
    /// Original file name, used for display and for the archive entry name
    pub name: String,
    /// The image bytes, in memory or on disk
    pub source: ImageSource,
    /// Assigned label; `None` until classified (or classified as empty)
    pub label: Option<String>,
}

impl ImageEntry {
    /// Create an unlabeled entry from in-memory bytes.
    pub fn from_memory(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            source: ImageSource::Memory(data),
            label: None,
        }
    }

    /// Create an unlabeled entry from a file path.
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(String::from)
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            name,
            source: ImageSource::Path(path),
            label: None,
        }
    }

    /// Validate an uploaded file and build an entry from it.
    ///
    /// The browser's `accept` filter is advisory, so uploads are checked
    /// twice: by extension and by content sniffing the magic bytes. Returns
    /// `None` (with a warning log) for anything that is not an image.
    pub fn from_upload(name: &str, data: Vec<u8>) -> Option<Self> {
        if !is_image_filename(name) {
            log::warn!("📂 Skipping non-image file: {}", name);
            return None;
        }
        match image::guess_format(&data) {
            Ok(format) => {
                log::debug!("📂 {}: {:?}, {} bytes", name, format, data.len());
                Some(Self::from_memory(name, data))
            }
            Err(_) => {
                log::warn!("📂 Skipping {}: content is not a recognized image", name);
                None
            }
        }
    }

    /// MIME type inferred from the file extension, for display blobs.
    pub fn mime_type(&self) -> &'static str {
        let lower = self.name.to_lowercase();
        match lower.rsplit('.').next() {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("bmp") => "image/bmp",
            Some("tif") | Some("tiff") => "image/tiff",
            _ => "application/octet-stream",
        }
    }

    /// Assign a label, normalizing the empty string to "no classification".
    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label.filter(|l| !l.is_empty());
    }

    /// The assigned label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Whether the entry has a non-empty label.
    pub fn is_labeled(&self) -> bool {
        self.label.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_filename() {
        assert!(is_image_filename("photo.png"));
        assert!(is_image_filename("photo.JPG"));
        assert!(is_image_filename("dir/photo.jpeg"));
        assert!(!is_image_filename("notes.txt"));
        assert!(!is_image_filename("photo"));
    }

    #[test]
    fn test_set_label_normalizes_empty() {
        let mut entry = ImageEntry::from_memory("a.png", vec![]);
        entry.set_label(Some("cat".to_string()));
        assert_eq!(entry.label(), Some("cat"));
        assert!(entry.is_labeled());

        entry.set_label(Some(String::new()));
        assert_eq!(entry.label(), None);
        assert!(!entry.is_labeled());
    }

    #[test]
    fn test_from_upload_rejects_bad_extension() {
        assert!(ImageEntry::from_upload("malware.exe", vec![0x89, 0x50]).is_none());
    }

    #[test]
    fn test_from_upload_rejects_bad_content() {
        assert!(ImageEntry::from_upload("fake.png", b"not an image".to_vec()).is_none());
    }

    #[test]
    fn test_from_upload_accepts_real_png() {
        let png = crate::test_image::png_bytes(4, 4, [10, 20, 30]);
        let entry = ImageEntry::from_upload("real.png", png).expect("valid png rejected");
        assert_eq!(entry.name, "real.png");
        assert!(!entry.is_labeled());
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(ImageEntry::from_memory("a.png", vec![]).mime_type(), "image/png");
        assert_eq!(ImageEntry::from_memory("a.JPG", vec![]).mime_type(), "image/jpeg");
        assert_eq!(
            ImageEntry::from_memory("noext", vec![]).mime_type(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_memory_source_read() {
        let source = ImageSource::Memory(vec![1, 2, 3]);
        assert_eq!(source.read().unwrap().as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn test_path_source_read_missing_file_fails() {
        let source = ImageSource::Path(PathBuf::from("/nonexistent/missing.png"));
        assert!(source.read().is_err());
    }
}

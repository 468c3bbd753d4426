use crate::{CompareError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

// ── Attachment ───────────────────────────────────────────────────────────────

/// A named binary artifact handed to an [`AttachmentSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Human-readable name, e.g. `"Pixel diff page 2"`.
    pub name: String,

    /// Encoded payload (PNG bytes for page evidence).
    pub payload: Vec<u8>,

    /// MIME type of `payload`.
    pub content_type: String,
}

impl Attachment {
    /// File name used when the attachment is written to disk: the name in
    /// lower case with spaces replaced by `_`, plus an extension derived from
    /// the content type.
    ///
    /// ```
    /// # use pdfpixeldiff::Attachment;
    /// let a = Attachment {
    ///     name: "Pixel diff page 2".into(),
    ///     payload: vec![],
    ///     content_type: "image/png".into(),
    /// };
    /// assert_eq!(a.file_name(), "pixel_diff_page_2.png");
    /// ```
    pub fn file_name(&self) -> String {
        let stem: String = self
            .name
            .chars()
            .map(|c| match c {
                ' ' => '_',
                '/' | '\\' | ':' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        format!("{stem}.{}", extension_for(&self.content_type))
    }

    /// Write this attachment into `output_dir`, creating the directory if
    /// necessary.
    pub fn save_to_disk<P: AsRef<Path>>(&self, output_dir: P) -> std::io::Result<()> {
        let dir = output_dir.as_ref();
        std::fs::create_dir_all(dir)?;
        std::fs::write(dir.join(self.file_name()), &self.payload)
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        _ => "bin",
    }
}

// ── AttachmentSink ───────────────────────────────────────────────────────────

/// Destination for evidence produced by a failing comparison, typically the
/// surrounding test report.
pub trait AttachmentSink: Sync {
    /// Accept one attachment. Errors abort the comparison.
    fn attach(&self, name: &str, payload: Vec<u8>, content_type: &str) -> Result<()>;
}

// ── MemorySink ───────────────────────────────────────────────────────────────

/// Keeps every attachment in memory, in the order received.
#[derive(Debug, Default)]
pub struct MemorySink {
    attachments: Mutex<Vec<Attachment>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything attached so far.
    pub fn attachments(&self) -> Vec<Attachment> {
        self.lock().clone()
    }

    /// Number of attachments received.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Consume the sink and return its attachments.
    pub fn into_attachments(self) -> Vec<Attachment> {
        self.attachments
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Attachment>> {
        // A panic in another attach call cannot leave the Vec half-written.
        self.attachments
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AttachmentSink for MemorySink {
    fn attach(&self, name: &str, payload: Vec<u8>, content_type: &str) -> Result<()> {
        self.lock().push(Attachment {
            name: name.to_owned(),
            payload,
            content_type: content_type.to_owned(),
        });
        Ok(())
    }
}

// ── DirectorySink ────────────────────────────────────────────────────────────

/// Writes each attachment into a directory, named by
/// [`Attachment::file_name`]. The directory is created on first write.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
}

impl DirectorySink {
    /// Create a sink that writes into `directory`.
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl AttachmentSink for DirectorySink {
    fn attach(&self, name: &str, payload: Vec<u8>, content_type: &str) -> Result<()> {
        if name.is_empty() {
            return Err(CompareError::Sink("attachment name must not be empty".into()));
        }

        let attachment = Attachment {
            name: name.to_owned(),
            payload,
            content_type: content_type.to_owned(),
        };
        attachment.save_to_disk(&self.directory)?;
        tracing::debug!(
            path = %self.directory.join(attachment.file_name()).display(),
            "wrote attachment"
        );
        Ok(())
    }
}

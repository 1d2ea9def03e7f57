//! Native (rfd) picker backend.
//!
//! Implements [`FilePicker`] with `rfd::AsyncFileDialog`: the OS dialog on
//! desktop platforms and the Web File Picker on `wasm32`. A dismissed dialog
//! maps to [`DropzoneError::Cancelled`].
//!
//! Notes
//! - Accept groups map to `rfd` filters; only plain extensions survive
//!   (MIME keys and wildcards have no native equivalent).
//! - On `wasm32` file sizes are not known until the file is read, so picked
//!   files report no size.
use std::path::PathBuf;

use async_trait::async_trait;

use crate::core::{DropzoneError, RawFile};
use crate::dialog::{FilePicker, PickerOptions};
use crate::transfer::FileHandle;

#[cfg(feature = "tracing")]
use tracing::trace;

/// File picker backed by `rfd`.
#[derive(Clone, Debug, Default)]
pub struct RfdPicker {
    title: Option<String>,
    directory: Option<PathBuf>,
}

impl RfdPicker {
    /// Picker with platform defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dialog title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the initial directory.
    pub fn directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directory = Some(dir.into());
        self
    }

    fn to_rfd(&self, options: &PickerOptions) -> rfd::AsyncFileDialog {
        let mut d = rfd::AsyncFileDialog::new();
        if let Some(title) = &self.title {
            d = d.set_title(title);
        }
        if let Some(dir) = &self.directory {
            d = d.set_directory(dir);
        }
        for group in &options.types {
            let exts_owned: Vec<String> = group
                .accept
                .values()
                .flatten()
                .filter_map(|s| plain_extension_for_native(s))
                .collect();
            let exts: Vec<&str> = exts_owned.iter().map(|s| s.as_str()).collect();
            if !exts.is_empty() {
                d = d.add_filter(&group.description, &exts);
            }
        }
        d
    }
}

#[async_trait(?Send)]
impl FilePicker for RfdPicker {
    fn is_supported(&self) -> bool {
        true
    }

    async fn open(&self, options: &PickerOptions) -> Result<Vec<Box<dyn FileHandle>>, DropzoneError> {
        #[cfg(feature = "tracing")]
        trace!(multiple = options.multiple, "rfd async open");
        let dialog = self.to_rfd(options);
        let picked = if options.multiple {
            dialog.pick_files().await
        } else {
            dialog.pick_file().await.map(|h| vec![h])
        };
        match picked {
            Some(handles) if !handles.is_empty() => Ok(handles
                .into_iter()
                .map(|h| Box::new(RfdHandle(h)) as Box<dyn FileHandle>)
                .collect()),
            _ => Err(DropzoneError::Cancelled),
        }
    }
}

struct RfdHandle(rfd::FileHandle);

#[async_trait(?Send)]
impl FileHandle for RfdHandle {
    async fn get_file(&self) -> Result<RawFile, DropzoneError> {
        #[cfg(not(target_arch = "wasm32"))]
        let size = Some(std::fs::metadata(self.0.path())?.len());
        #[cfg(target_arch = "wasm32")]
        let size = None;
        Ok(RawFile {
            name: self.0.file_name(),
            size,
            mime_type: String::new(),
            relative_path: None,
        })
    }
}

fn plain_extension_for_native(token: &str) -> Option<String> {
    let t = token.trim().trim_start_matches('.');
    if t.is_empty() || t.contains('*') || t.contains('?') {
        return None;
    }
    Some(t.to_lowercase())
}

//! File dialog controller.
//!
//! Two ways to let the user pick files:
//! - a programmatic picker ([`FilePicker`], e.g. the File System Access API or
//!   the `native-rfd` backend), used when the host opted in and the picker is
//!   usable;
//! - a hidden `<input type="file">` ([`InputElement`]) whose change event is
//!   routed through [`Dropzone::handle_input_change`].
//!
//! Both feed the same validation path as a drop. A picker that fails with a
//! security error is disabled for the lifetime of the dropzone and the hidden
//! input takes over.
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use indexmap::IndexMap;

use crate::accept::AcceptanceSpec;
use crate::core::{DropzoneError, RawFile};
use crate::dropzone::Dropzone;
use crate::extract::FileSource;
use crate::mime;
use crate::state::Action;
use crate::transfer::FileHandle;

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

/// How long to wait after the window regains focus before deciding that the
/// hidden input's dialog was cancelled.
pub const DIALOG_SETTLE_DELAY: Duration = Duration::from_millis(300);

/// Description used for the single accept group handed to pickers.
const PICKER_GROUP_DESCRIPTION: &str = "Files";

/// Fallback key for extensions with no known MIME type.
const OCTET_STREAM: &str = "application/octet-stream";

/// MIME wildcards pickers understand.
const PICKER_WILDCARDS: &[&str] = &["audio/*", "video/*", "image/*", "text/*", "application/*"];

/// One accept group of a picker (`{ description, accept: { mime: [exts] } }`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PickerAcceptType {
    /// Group label shown by the picker.
    pub description: String,
    /// MIME type → dot-prefixed extensions.
    pub accept: IndexMap<String, Vec<String>>,
}

/// Options passed to [`FilePicker::open`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PickerOptions {
    /// Allow selecting several files.
    pub multiple: bool,
    /// Accept groups; empty = any file.
    pub types: Vec<PickerAcceptType>,
}

/// Programmatic file picker.
///
/// `open` must fail with [`DropzoneError::Cancelled`] when the user dismisses
/// the picker and with [`DropzoneError::Security`] when the platform refuses
/// to show it.
#[async_trait(?Send)]
pub trait FilePicker {
    /// Whether the picker API exists on this platform.
    fn is_supported(&self) -> bool;
    /// Whether the page runs in a secure context (HTTPS, localhost, desktop).
    fn is_secure_context(&self) -> bool {
        true
    }
    /// Show the picker and return the chosen handles.
    async fn open(&self, options: &PickerOptions) -> Result<Vec<Box<dyn FileHandle>>, DropzoneError>;
}

/// Hidden file input used when no picker is available.
pub trait InputElement {
    /// Reset the input's value so re-selecting the same file fires `change`.
    fn clear_value(&self);
    /// Files currently selected in the input.
    fn files(&self) -> Vec<RawFile>;
    /// Open the native dialog.
    fn click(&self);
}

/// Delay source for the cancel-detection heuristic.
pub trait Timer {
    /// Resolve after `duration`.
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// Derive picker options from an acceptance spec.
///
/// MIME entries become keys; extensions are grouped under their inferred MIME
/// type (or `application/octet-stream`). Tokens that are neither are skipped.
pub fn picker_options(spec: &AcceptanceSpec) -> PickerOptions {
    let mut accept: IndexMap<String, Vec<String>> = IndexMap::new();
    for token in spec.accepted_types.iter().flatten() {
        let t = token.trim().to_lowercase();
        if is_mime_type(&t) {
            accept.entry(t).or_default();
        } else if is_extension(&t) {
            let key = mime::from_extension(&t).unwrap_or(OCTET_STREAM);
            let exts = accept.entry(key.to_string()).or_default();
            if !exts.contains(&t) {
                exts.push(t);
            }
        } else {
            warn_skipped_token(token);
        }
    }
    let types = if accept.is_empty() {
        Vec::new()
    } else {
        vec![PickerAcceptType {
            description: PICKER_GROUP_DESCRIPTION.to_string(),
            accept,
        }]
    };
    PickerOptions {
        multiple: spec.multiple,
        types,
    }
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_mime_type(t: &str) -> bool {
    if PICKER_WILDCARDS.contains(&t) {
        return true;
    }
    let Some((primary, sub)) = t.split_once('/') else {
        return false;
    };
    is_word(primary)
        && !sub.is_empty()
        && sub
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '.'))
}

fn is_extension(t: &str) -> bool {
    t.starts_with('.') && t.rsplit_once('.').is_some_and(|(_, ext)| is_word(ext))
}

impl Dropzone {
    /// Whether the programmatic picker will be used for the next `open`.
    pub fn uses_file_picker(&self) -> bool {
        !self.picker_disabled.get()
            && self.options.use_fs_access_api
            && self
                .picker
                .as_ref()
                .is_some_and(|p| p.is_secure_context() && p.is_supported())
    }

    /// Open the file dialog.
    ///
    /// The dialog state and open observer are applied before this returns;
    /// the returned future drives the picker (if one is used) to completion.
    pub fn open(&self) -> impl Future<Output = ()> + '_ {
        let use_picker = self.uses_file_picker();
        if use_picker {
            trace_dialog_path("picker");
            self.begin_dialog();
        } else if self.input.is_some() {
            trace_dialog_path("input");
            self.begin_dialog();
            self.click_input();
        }
        async move {
            if use_picker {
                self.run_picker().await;
            }
        }
    }

    /// Window regained focus: detect a cancelled hidden-input dialog.
    ///
    /// Browsers fire no cancel event for file inputs. If the dialog is still
    /// marked active and the input holds no files once the settle delay has
    /// elapsed, the dialog is treated as cancelled.
    ///
    /// The input's file list is only filled in after focus returns, so the
    /// check needs a [`Timer`]; without one it is skipped and the dialog stays
    /// active until the next change, drop or open.
    pub fn handle_window_focus(&self) -> impl Future<Output = ()> + '_ {
        let armed = !self.uses_file_picker() && self.state.borrow().is_file_dialog_active;
        async move {
            if !armed {
                return;
            }
            let Some(timer) = &self.timer else {
                warn_no_timer();
                return;
            };
            timer.sleep(DIALOG_SETTLE_DELAY).await;
            let Some(input) = &self.input else {
                return;
            };
            if input.files().is_empty() {
                self.dispatch(Action::CloseDialog);
                self.observers.file_dialog_cancel();
            }
        }
    }

    fn begin_dialog(&self) {
        self.dispatch(Action::OpenDialog);
        self.observers.file_dialog_open();
    }

    fn click_input(&self) {
        if let Some(input) = &self.input {
            input.clear_value();
            input.click();
        }
    }

    async fn run_picker(&self) {
        let Some(picker) = self.picker.as_deref() else {
            return;
        };
        let options = picker_options(&self.options.acceptance);
        let files = match picker.open(&options).await {
            Ok(handles) => self.extractor.extract(FileSource::Handles(&handles)).await,
            Err(err) => Err(err),
        };
        match files {
            Ok(files) => {
                self.set_files(files, None);
                self.dispatch(Action::CloseDialog);
            }
            Err(DropzoneError::Cancelled) => {
                self.dispatch(Action::CloseDialog);
                self.observers.file_dialog_cancel();
            }
            Err(DropzoneError::Security(reason)) => {
                debug_picker_disabled(&reason);
                self.picker_disabled.set(true);
                if self.input.is_some() {
                    self.click_input();
                } else {
                    self.observers.error(&DropzoneError::NoInputElement);
                }
            }
            Err(err) => self.observers.error(&err),
        }
    }
}

#[cfg(feature = "tracing")]
fn trace_dialog_path(path: &'static str) {
    trace!(path, "opening file dialog");
}

#[cfg(not(feature = "tracing"))]
fn trace_dialog_path(_path: &'static str) {}

#[cfg(feature = "tracing")]
fn debug_picker_disabled(reason: &str) {
    debug!(reason, "file picker refused; falling back to the input element");
}

#[cfg(not(feature = "tracing"))]
fn debug_picker_disabled(_reason: &str) {}

#[cfg(feature = "tracing")]
fn warn_no_timer() {
    tracing::warn!("no timer installed; skipping file dialog cancel detection");
}

#[cfg(not(feature = "tracing"))]
fn warn_no_timer() {}

#[cfg(feature = "tracing")]
fn warn_skipped_token(token: &str) {
    tracing::warn!(token, "accepted type is neither a MIME type nor an extension; skipped for the picker");
}

#[cfg(not(feature = "tracing"))]
fn warn_skipped_token(_token: &str) {}

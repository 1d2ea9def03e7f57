use std::fmt;

use crate::core::{DropzoneError, FileDescriptor, FileRejection};
use crate::event::DropEvent;

#[cfg(feature = "tracing")]
use tracing::warn;

type EventFn = dyn Fn(&DropEvent) + 'static;
type DropFn = dyn Fn(&[FileDescriptor], &[FileRejection], Option<&DropEvent>) + 'static;
type AcceptedFn = dyn Fn(&[FileDescriptor], Option<&DropEvent>) + 'static;
type RejectedFn = dyn Fn(&[FileRejection], Option<&DropEvent>) + 'static;
type NotifyFn = dyn Fn() + 'static;
type ErrorFn = dyn Fn(&DropzoneError) + 'static;

/// Optional callbacks fired by a [`crate::Dropzone`].
///
/// Drop callbacks receive `None` as event when files came from the file
/// picker rather than from a drag or input change.
///
/// Examples
/// ```
/// use dropzone::Observers;
/// let observers = Observers::new()
///     .on_drop(|accepted, rejected, _event| {
///         println!("{} accepted, {} rejected", accepted.len(), rejected.len());
///     })
///     .on_error(|err| eprintln!("dropzone error: {err}"));
/// ```
#[derive(Default)]
pub struct Observers {
    drag_enter: Option<Box<EventFn>>,
    drag_over: Option<Box<EventFn>>,
    drag_leave: Option<Box<EventFn>>,
    drop: Option<Box<DropFn>>,
    drop_accepted: Option<Box<AcceptedFn>>,
    drop_rejected: Option<Box<RejectedFn>>,
    file_dialog_open: Option<Box<NotifyFn>>,
    file_dialog_cancel: Option<Box<NotifyFn>>,
    error: Option<Box<ErrorFn>>,
}

impl Observers {
    /// No callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drag with files entered the root (after the probe resolved).
    pub fn on_drag_enter<F>(mut self, f: F) -> Self
    where
        F: Fn(&DropEvent) + 'static,
    {
        self.drag_enter = Some(Box::new(f));
        self
    }

    /// Drag with files moves over the root.
    pub fn on_drag_over<F>(mut self, f: F) -> Self
    where
        F: Fn(&DropEvent) + 'static,
    {
        self.drag_over = Some(Box::new(f));
        self
    }

    /// Drag with files left the root entirely.
    pub fn on_drag_leave<F>(mut self, f: F) -> Self
    where
        F: Fn(&DropEvent) + 'static,
    {
        self.drag_leave = Some(Box::new(f));
        self
    }

    /// Every processed batch, accepted and rejected partitions.
    pub fn on_drop<F>(mut self, f: F) -> Self
    where
        F: Fn(&[FileDescriptor], &[FileRejection], Option<&DropEvent>) + 'static,
    {
        self.drop = Some(Box::new(f));
        self
    }

    /// Batches with at least one accepted file.
    pub fn on_drop_accepted<F>(mut self, f: F) -> Self
    where
        F: Fn(&[FileDescriptor], Option<&DropEvent>) + 'static,
    {
        self.drop_accepted = Some(Box::new(f));
        self
    }

    /// Batches with at least one rejected file.
    pub fn on_drop_rejected<F>(mut self, f: F) -> Self
    where
        F: Fn(&[FileRejection], Option<&DropEvent>) + 'static,
    {
        self.drop_rejected = Some(Box::new(f));
        self
    }

    /// A file dialog was opened.
    pub fn on_file_dialog_open<F>(mut self, f: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.file_dialog_open = Some(Box::new(f));
        self
    }

    /// The user dismissed the file dialog.
    pub fn on_file_dialog_cancel<F>(mut self, f: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.file_dialog_cancel = Some(Box::new(f));
        self
    }

    /// Extraction or picker failures. Without it errors are only logged.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&DropzoneError) + 'static,
    {
        self.error = Some(Box::new(f));
        self
    }

    pub(crate) fn drag_enter(&self, event: &DropEvent) {
        if let Some(f) = &self.drag_enter {
            f(event);
        }
    }

    pub(crate) fn drag_over(&self, event: &DropEvent) {
        if let Some(f) = &self.drag_over {
            f(event);
        }
    }

    pub(crate) fn drag_leave(&self, event: &DropEvent) {
        if let Some(f) = &self.drag_leave {
            f(event);
        }
    }

    /// Fire the drop family: `drop` always, then rejected/accepted when non-empty.
    pub(crate) fn dropped(
        &self,
        accepted: &[FileDescriptor],
        rejected: &[FileRejection],
        event: Option<&DropEvent>,
    ) {
        if let Some(f) = &self.drop {
            f(accepted, rejected, event);
        }
        if !rejected.is_empty() {
            if let Some(f) = &self.drop_rejected {
                f(rejected, event);
            }
        }
        if !accepted.is_empty() {
            if let Some(f) = &self.drop_accepted {
                f(accepted, event);
            }
        }
    }

    pub(crate) fn file_dialog_open(&self) {
        if let Some(f) = &self.file_dialog_open {
            f();
        }
    }

    pub(crate) fn file_dialog_cancel(&self) {
        if let Some(f) = &self.file_dialog_cancel {
            f();
        }
    }

    pub(crate) fn error(&self, err: &DropzoneError) {
        match &self.error {
            Some(f) => f(err),
            None => warn_unhandled(err),
        }
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("drag_enter", &self.drag_enter.is_some())
            .field("drag_over", &self.drag_over.is_some())
            .field("drag_leave", &self.drag_leave.is_some())
            .field("drop", &self.drop.is_some())
            .field("drop_accepted", &self.drop_accepted.is_some())
            .field("drop_rejected", &self.drop_rejected.is_some())
            .field("file_dialog_open", &self.file_dialog_open.is_some())
            .field("file_dialog_cancel", &self.file_dialog_cancel.is_some())
            .field("error", &self.error.is_some())
            .finish()
    }
}

#[cfg(feature = "tracing")]
fn warn_unhandled(err: &DropzoneError) {
    warn!(%err, "unhandled dropzone error");
}

#[cfg(not(feature = "tracing"))]
fn warn_unhandled(_err: &DropzoneError) {}

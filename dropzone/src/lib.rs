#![deny(missing_docs)]
//! Drag-and-drop and file-picker target behavior.
//!
//! A [`Dropzone`] turns one surface into a file drop target. It is UI-agnostic:
//! the host forwards platform events (drag enter/over/leave, drop, focus,
//! keys, clicks, input changes) and drives the returned futures on its local
//! executor. The dropzone extracts files, validates them against an
//! [`AcceptanceSpec`], keeps an [`InteractionState`] and notifies
//! [`Observers`].
//!
//! Platform capabilities are traits ([`DataTransfer`], [`Entry`],
//! [`FilePicker`], [`InputElement`], [`RootElement`], [`Timer`]) so the same
//! behavior runs over browser bindings, a native windowing library or test
//! fakes.
//!
//! Backends shipped here:
//! - [`fs`]: dropped filesystem paths, with recursive directory expansion
//! - `native-rfd` feature: OS dialogs (desktop) and Web File Picker (wasm)
//!   via `rfd`
//!
//! Logging goes through `tracing` (default `tracing` feature); install any
//! subscriber to see probe, verdict and dialog events.

mod accept;
mod core;
mod dialog;
mod dropzone;
mod event;
mod extract;
pub mod fs;
pub mod mime;
#[cfg(feature = "native-rfd")]
mod native;
mod observers;
mod options;
mod state;
#[cfg(test)]
mod testing;
mod transfer;

pub use accept::{
    AcceptanceSpec, BatchVerdict, Validator, evaluate_batch, is_batch_within_cardinality,
    matches_size, matches_type, probe_batch, size_error,
};
pub use core::{DropzoneError, ErrorCode, FileDescriptor, FileError, FileRejection, RawFile};
pub use dialog::{
    DIALOG_SETTLE_DELAY, FilePicker, InputElement, PickerAcceptType, PickerOptions, Timer,
    picker_options,
};
pub use dropzone::{Dropzone, RootElement};
pub use event::{DropEvent, EventKind, Key, KeyEvent, Payload, TargetId};
pub use extract::{
    DefaultExtractor, FileExtractor, FileSource, extract, from_dir_entry, from_entry,
    from_transfer,
};
#[cfg(feature = "native-rfd")]
pub use native::RfdPicker;
pub use observers::Observers;
pub use options::DropzoneOptions;
pub use state::{Action, InteractionState};
pub use transfer::{DataTransfer, DropEffect, Entry, EntryReader, FileHandle, ItemKind, TransferItem};

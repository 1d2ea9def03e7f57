use std::cell::Cell;
use std::fmt;

use crate::core::RawFile;
use crate::transfer::DataTransfer;

/// Browser payload type announcing dragged files.
pub(crate) const FILES_TYPE: &str = "Files";
/// Legacy Firefox equivalent of [`FILES_TYPE`].
const MOZ_FILE_TYPE: &str = "application/x-moz-file";

/// Opaque identity of an element that can be an event target.
///
/// Hosts map their element handles to ids (pointer value, node index, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TargetId(u64);

impl TargetId {
    /// Wrap a host-assigned id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Which interaction produced a [`DropEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// Pointer carrying a drag entered an element.
    DragEnter,
    /// Pointer carrying a drag moved over an element.
    DragOver,
    /// Pointer carrying a drag left an element.
    DragLeave,
    /// Drag released over an element.
    Drop,
    /// The hidden file input changed.
    Change,
}

/// Files attached to an event.
pub enum Payload {
    /// Nothing readable.
    None,
    /// Drag-and-drop data.
    Transfer(Box<dyn DataTransfer>),
    /// File list of a changed input element.
    InputFiles(Vec<RawFile>),
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::None => f.write_str("None"),
            Payload::Transfer(_) => f.debug_tuple("Transfer").finish_non_exhaustive(),
            Payload::InputFiles(files) => f.debug_tuple("InputFiles").field(files).finish(),
        }
    }
}

/// Drag or input-change event handed to the dropzone handlers.
///
/// Propagation and default-action flags use interior mutability so that
/// observers receiving `&DropEvent` can still stop propagation.
#[derive(Debug)]
pub struct DropEvent {
    kind: EventKind,
    target: TargetId,
    payload: Payload,
    propagation_stopped: Cell<bool>,
    default_prevented: Cell<bool>,
}

impl DropEvent {
    /// Event without payload.
    pub fn new(kind: EventKind, target: TargetId) -> Self {
        Self::with_payload(kind, target, Payload::None)
    }

    /// Drag event carrying a data transfer.
    pub fn drag<T>(kind: EventKind, target: TargetId, transfer: T) -> Self
    where
        T: DataTransfer + 'static,
    {
        Self::with_payload(kind, target, Payload::Transfer(Box::new(transfer)))
    }

    /// Change event of the hidden input.
    pub fn change(target: TargetId, files: Vec<RawFile>) -> Self {
        Self::with_payload(EventKind::Change, target, Payload::InputFiles(files))
    }

    /// Event with an explicit payload.
    pub fn with_payload(kind: EventKind, target: TargetId, payload: Payload) -> Self {
        Self {
            kind,
            target,
            payload,
            propagation_stopped: Cell::new(false),
            default_prevented: Cell::new(false),
        }
    }

    /// Event kind.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Element the event was dispatched to.
    pub fn target(&self) -> TargetId {
        self.target
    }

    /// Attached payload.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Data transfer, for drag events.
    pub fn transfer(&self) -> Option<&dyn DataTransfer> {
        match &self.payload {
            Payload::Transfer(t) => Some(t.as_ref()),
            _ => None,
        }
    }

    /// Whether the event carries files (as opposed to text or links).
    pub fn has_files(&self) -> bool {
        match &self.payload {
            Payload::Transfer(t) => t
                .types()
                .iter()
                .any(|ty| ty == FILES_TYPE || ty == MOZ_FILE_TYPE),
            Payload::InputFiles(_) => true,
            Payload::None => false,
        }
    }

    /// Stop the event from reaching ancestor handlers.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    /// Whether [`DropEvent::stop_propagation`] was called.
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    /// Suppress the platform's default action (e.g. opening the file).
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Whether [`DropEvent::prevent_default`] was called.
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Keys the dropzone reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Enter / Return.
    Enter,
    /// Space bar.
    Space,
    /// Anything else.
    Other,
}

/// Key-down event on the dropzone root or one of its descendants.
#[derive(Debug)]
pub struct KeyEvent {
    /// Pressed key.
    pub key: Key,
    /// Element holding focus.
    pub target: TargetId,
    default_prevented: Cell<bool>,
}

impl KeyEvent {
    /// Create a key event.
    pub fn new(key: Key, target: TargetId) -> Self {
        Self {
            key,
            target,
            default_prevented: Cell::new(false),
        }
    }

    /// Suppress the default action (scrolling on Space, form submit on Enter).
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Whether [`KeyEvent::prevent_default`] was called.
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

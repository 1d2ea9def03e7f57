//! Capabilities the host platform provides for reading dropped or picked files.
//!
//! These traits stand in for the browser's `DataTransfer`, `DataTransferItem`,
//! `FileSystemEntry` and `FileSystemFileHandle` objects. A web host implements
//! them over `web-sys` types; the [`crate::fs`] module implements them over
//! local paths for desktop hosts. All of them are `?Send`: the interaction
//! model is single-threaded.
use async_trait::async_trait;

use crate::core::{DropzoneError, RawFile};

/// Kind of a transfer item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    /// A file (or directory) item.
    File,
    /// A string payload (text, URL, HTML, ...).
    String,
}

/// Visual feedback requested from the platform while dragging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DropEffect {
    /// No drop allowed.
    #[default]
    None,
    /// Copy cursor.
    Copy,
    /// Link cursor.
    Link,
    /// Move cursor.
    Move,
}

/// Data carried by a drag-and-drop interaction.
pub trait DataTransfer {
    /// Payload type names (browsers report `"Files"` when files are dragged).
    fn types(&self) -> Vec<String>;
    /// Structured item list, when the platform exposes one.
    fn items(&self) -> Option<&[Box<dyn TransferItem>]>;
    /// Flat file list.
    fn files(&self) -> Vec<RawFile>;
    /// Request a drop effect. Platforms may ignore it.
    fn set_drop_effect(&self, effect: DropEffect);
}

/// One item of a [`DataTransfer`].
pub trait TransferItem {
    /// Item kind.
    fn kind(&self) -> ItemKind;
    /// Reported MIME type; the only thing readable before the drop.
    fn mime_type(&self) -> String;
    /// Materialize the item as a file (only valid on drop).
    fn get_as_file(&self) -> Option<RawFile>;
    /// File-system entry for the item, when the platform exposes entries.
    fn get_as_entry(&self) -> Option<Box<dyn Entry>> {
        None
    }
}

/// A file or directory within a dropped tree.
#[async_trait(?Send)]
pub trait Entry {
    /// Base name.
    fn name(&self) -> String;
    /// Path from the drop root, e.g. `/photos/2024/a.png`.
    fn full_path(&self) -> String;
    /// Whether this entry is a directory.
    fn is_directory(&self) -> bool;
    /// Read a file entry.
    async fn file(&self) -> Result<RawFile, DropzoneError>;
    /// Create a paged reader for a directory entry.
    fn create_reader(&self) -> Box<dyn EntryReader>;
}

/// Paged directory enumeration.
#[async_trait(?Send)]
pub trait EntryReader {
    /// Next batch of children; an empty batch signals the end.
    async fn read_entries(&mut self) -> Result<Vec<Box<dyn Entry>>, DropzoneError>;
}

/// Handle returned by a file picker; resolves to a file on demand.
#[async_trait(?Send)]
pub trait FileHandle {
    /// Materialize the underlying file.
    async fn get_file(&self) -> Result<RawFile, DropzoneError>;
}

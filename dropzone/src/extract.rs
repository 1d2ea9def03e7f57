//! Event → file list extraction.
//!
//! Turns whatever the platform hands over (a drag payload, an input's file
//! list, picker handles) into one flat, ordered list of [`FileDescriptor`]s.
//! Directory entries are expanded recursively.
use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{self, LocalBoxFuture, try_join_all};

use crate::core::{DropzoneError, FileDescriptor};
use crate::event::{DropEvent, EventKind, Payload};
use crate::transfer::{DataTransfer, Entry, FileHandle, ItemKind, TransferItem};

#[cfg(feature = "tracing")]
use tracing::trace;

/// Filesystem metadata artifacts never worth reporting.
const FILES_TO_IGNORE: &[&str] = &[".DS_Store", "Thumbs.db"];

/// Input of an extraction.
#[derive(Clone, Copy)]
pub enum FileSource<'a> {
    /// A drag or input-change event.
    Event(&'a DropEvent),
    /// Handles returned by a file picker.
    Handles(&'a [Box<dyn FileHandle>]),
}

/// Replaceable extraction step.
///
/// The default is [`DefaultExtractor`]; hosts may install their own to
/// pre-process files (e.g. unpack archives) before validation.
#[async_trait(?Send)]
pub trait FileExtractor {
    /// Produce a flat, ordered list of files.
    async fn extract(&self, source: FileSource<'_>) -> Result<Vec<FileDescriptor>, DropzoneError>;
}

/// Extractor implementing the standard dispatch rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultExtractor;

#[async_trait(?Send)]
impl FileExtractor for DefaultExtractor {
    async fn extract(&self, source: FileSource<'_>) -> Result<Vec<FileDescriptor>, DropzoneError> {
        extract(source).await
    }
}

/// Extract files from a source.
///
/// - drag events read their data transfer (see [`from_transfer`]);
/// - input-change events map their file list directly;
/// - picker handles resolve concurrently, preserving order;
/// - anything else yields an empty list.
pub async fn extract(source: FileSource<'_>) -> Result<Vec<FileDescriptor>, DropzoneError> {
    let files = match source {
        FileSource::Event(event) => match event.payload() {
            Payload::Transfer(t) => from_transfer(t.as_ref(), event.kind()).await?,
            Payload::InputFiles(files) => files
                .iter()
                .cloned()
                .map(FileDescriptor::from_raw)
                .collect(),
            Payload::None => Vec::new(),
        },
        FileSource::Handles(handles) => from_handles(handles).await?,
    };
    trace_extracted(files.len());
    Ok(files)
}

async fn from_handles(
    handles: &[Box<dyn FileHandle>],
) -> Result<Vec<FileDescriptor>, DropzoneError> {
    let files = try_join_all(handles.iter().map(|h| h.get_file())).await?;
    Ok(files.into_iter().map(FileDescriptor::from_raw).collect())
}

/// Read a data transfer.
///
/// Before the drop only item types are readable, so drag-enter/over return
/// probe descriptors. On drop, items are materialized and directories walked.
pub async fn from_transfer(
    transfer: &dyn DataTransfer,
    kind: EventKind,
) -> Result<Vec<FileDescriptor>, DropzoneError> {
    let Some(items) = transfer.items() else {
        let files = transfer
            .files()
            .into_iter()
            .map(FileDescriptor::from_raw)
            .collect();
        return Ok(without_ignored(files));
    };

    let items: Vec<&dyn TransferItem> = items
        .iter()
        .map(|i| i.as_ref())
        .filter(|i| i.kind() == ItemKind::File)
        .collect();

    if kind != EventKind::Drop {
        return Ok(items
            .iter()
            .map(|i| FileDescriptor::probe(i.mime_type()))
            .collect());
    }

    let nested = try_join_all(items.into_iter().map(from_item)).await?;
    Ok(without_ignored(nested.into_iter().flatten().collect()))
}

fn from_item(
    item: &dyn TransferItem,
) -> LocalBoxFuture<'_, Result<Vec<FileDescriptor>, DropzoneError>> {
    match item.get_as_entry() {
        Some(entry) if entry.is_directory() => from_dir_entry(entry),
        entry => {
            let path = entry.map(|e| e.full_path());
            future::ready(item_file(item, path).map(|f| vec![f])).boxed_local()
        }
    }
}

fn item_file(
    item: &dyn TransferItem,
    path: Option<String>,
) -> Result<FileDescriptor, DropzoneError> {
    let raw = item
        .get_as_file()
        .ok_or_else(|| DropzoneError::NotAFile(format!("transfer item ({})", item.mime_type())))?;
    Ok(match path {
        Some(p) => FileDescriptor::with_path(raw, p),
        None => FileDescriptor::from_raw(raw),
    })
}

/// Resolve one entry: files to a single descriptor, directories recursively.
pub fn from_entry(
    entry: Box<dyn Entry>,
) -> LocalBoxFuture<'static, Result<Vec<FileDescriptor>, DropzoneError>> {
    if entry.is_directory() {
        return from_dir_entry(entry);
    }
    async move {
        let raw = entry.file().await?;
        Ok(vec![FileDescriptor::with_path(raw, entry.full_path())])
    }
    .boxed_local()
}

/// Walk a directory.
///
/// The reader is drained page by page until it returns an empty page. Each
/// page resolves concurrently; pages are joined in read order and the
/// result is flattened regardless of depth. One failed read fails the whole
/// directory.
pub fn from_dir_entry(
    entry: Box<dyn Entry>,
) -> LocalBoxFuture<'static, Result<Vec<FileDescriptor>, DropzoneError>> {
    async move {
        let mut reader = entry.create_reader();
        let mut pages = Vec::new();
        loop {
            let page = reader.read_entries().await?;
            if page.is_empty() {
                break;
            }
            pages.push(try_join_all(page.into_iter().map(from_entry)));
        }
        let resolved = try_join_all(pages).await?;
        trace_dir_walked(&entry.full_path(), resolved.len());
        Ok(resolved.into_iter().flatten().flatten().collect())
    }
    .boxed_local()
}

fn without_ignored(mut files: Vec<FileDescriptor>) -> Vec<FileDescriptor> {
    files.retain(|f| !FILES_TO_IGNORE.contains(&f.name()));
    files
}

#[cfg(feature = "tracing")]
fn trace_extracted(count: usize) {
    trace!(count, "files extracted");
}

#[cfg(not(feature = "tracing"))]
fn trace_extracted(_count: usize) {}

#[cfg(feature = "tracing")]
fn trace_dir_walked(path: &str, pages: usize) {
    trace!(path, pages, "directory walked");
}

#[cfg(not(feature = "tracing"))]
fn trace_dir_walked(_path: &str, _pages: usize) {}

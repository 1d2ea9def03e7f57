//! Transfer capabilities backed by local paths.
//!
//! Desktop windowing libraries report drops as a list of paths. Wrapping them
//! in [`DroppedPaths`] runs them through the same extraction pipeline as a
//! browser drop, including recursive directory expansion.
use std::cell::Cell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::core::{DropzoneError, RawFile};
use crate::event::FILES_TYPE;
use crate::mime;
use crate::transfer::{DataTransfer, DropEffect, Entry, EntryReader, ItemKind, TransferItem};

/// Entries returned per directory read, matching what browsers hand out.
pub const ENTRY_PAGE_SIZE: usize = 100;

/// A set of dropped (or hovering) filesystem paths.
pub struct DroppedPaths {
    items: Vec<Box<dyn TransferItem>>,
    drop_effect: Cell<DropEffect>,
}

impl DroppedPaths {
    /// Wrap paths in drop order.
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let items = paths
            .into_iter()
            .map(|p| Box::new(PathItem { path: p.into() }) as Box<dyn TransferItem>)
            .collect();
        Self {
            items,
            drop_effect: Cell::new(DropEffect::None),
        }
    }

    /// Last drop effect requested by the dropzone.
    pub fn drop_effect(&self) -> DropEffect {
        self.drop_effect.get()
    }
}

impl DataTransfer for DroppedPaths {
    fn types(&self) -> Vec<String> {
        if self.items.is_empty() {
            Vec::new()
        } else {
            vec![FILES_TYPE.to_string()]
        }
    }

    fn items(&self) -> Option<&[Box<dyn TransferItem>]> {
        Some(&self.items)
    }

    fn files(&self) -> Vec<RawFile> {
        self.items.iter().filter_map(|i| i.get_as_file()).collect()
    }

    fn set_drop_effect(&self, effect: DropEffect) {
        self.drop_effect.set(effect);
    }
}

struct PathItem {
    path: PathBuf,
}

impl TransferItem for PathItem {
    fn kind(&self) -> ItemKind {
        ItemKind::File
    }

    fn mime_type(&self) -> String {
        mime::from_file_name(&file_name(&self.path))
            .unwrap_or_default()
            .to_string()
    }

    fn get_as_file(&self) -> Option<RawFile> {
        if self.path.is_dir() {
            return None;
        }
        raw_file(&self.path).ok()
    }

    fn get_as_entry(&self) -> Option<Box<dyn Entry>> {
        let full_path = format!("/{}", file_name(&self.path));
        Some(Box::new(PathEntry::new(self.path.clone(), full_path)))
    }
}

/// A file or directory on the local filesystem, seen as a drop entry.
#[derive(Clone, Debug)]
pub struct PathEntry {
    path: PathBuf,
    full_path: String,
}

impl PathEntry {
    /// Entry for `path`, reported as `full_path` (e.g. `/photos/a.png`).
    pub fn new(path: PathBuf, full_path: String) -> Self {
        Self { path, full_path }
    }
}

#[async_trait(?Send)]
impl Entry for PathEntry {
    fn name(&self) -> String {
        file_name(&self.path)
    }

    fn full_path(&self) -> String {
        self.full_path.clone()
    }

    fn is_directory(&self) -> bool {
        self.path.is_dir()
    }

    async fn file(&self) -> Result<RawFile, DropzoneError> {
        if self.path.is_dir() {
            return Err(DropzoneError::NotAFile(self.full_path.clone()));
        }
        raw_file(&self.path)
    }

    fn create_reader(&self) -> Box<dyn EntryReader> {
        Box::new(PathEntryReader {
            dir: self.path.clone(),
            full_path: self.full_path.clone(),
            pending: None,
        })
    }
}

/// Pages through a directory, children sorted by path.
struct PathEntryReader {
    dir: PathBuf,
    full_path: String,
    pending: Option<VecDeque<PathBuf>>,
}

#[async_trait(?Send)]
impl EntryReader for PathEntryReader {
    async fn read_entries(&mut self) -> Result<Vec<Box<dyn Entry>>, DropzoneError> {
        if self.pending.is_none() {
            let mut children = std::fs::read_dir(&self.dir)?
                .map(|e| e.map(|e| e.path()))
                .collect::<std::io::Result<Vec<_>>>()?;
            children.sort();
            self.pending = Some(children.into());
        }
        let Some(pending) = self.pending.as_mut() else {
            return Ok(Vec::new());
        };
        let n = pending.len().min(ENTRY_PAGE_SIZE);
        let page = pending
            .drain(..n)
            .map(|path| {
                let full_path = format!("{}/{}", self.full_path, file_name(&path));
                Box::new(PathEntry::new(path, full_path)) as Box<dyn Entry>
            })
            .collect();
        Ok(page)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn raw_file(path: &Path) -> Result<RawFile, DropzoneError> {
    let md = std::fs::metadata(path)?;
    Ok(RawFile {
        name: file_name(path),
        size: Some(md.len()),
        mime_type: String::new(),
        relative_path: None,
    })
}

//! In-memory platform fakes for unit tests.
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::core::{DropzoneError, RawFile};
use crate::dialog::{FilePicker, InputElement, PickerOptions, Timer};
use crate::dropzone::RootElement;
use crate::event::TargetId;
use crate::transfer::{DataTransfer, DropEffect, Entry, EntryReader, FileHandle, ItemKind, TransferItem};

pub(crate) struct FakeTransfer {
    types: Vec<String>,
    items: Option<Vec<Box<dyn TransferItem>>>,
    files: Vec<RawFile>,
    pub(crate) drop_effect: Rc<Cell<DropEffect>>,
}

impl FakeTransfer {
    pub(crate) fn with_files(files: Vec<RawFile>) -> Self {
        Self {
            types: vec!["Files".to_string()],
            items: None,
            files,
            drop_effect: Rc::default(),
        }
    }

    pub(crate) fn with_items(items: Vec<FakeItem>) -> Self {
        Self {
            types: vec!["Files".to_string()],
            items: Some(
                items
                    .into_iter()
                    .map(|i| Box::new(i) as Box<dyn TransferItem>)
                    .collect(),
            ),
            files: Vec::new(),
            drop_effect: Rc::default(),
        }
    }

    /// Text being dragged: no files at all.
    pub(crate) fn text() -> Self {
        Self {
            types: vec!["text/plain".to_string()],
            items: Some(vec![Box::new(FakeItem::string("text/plain"))]),
            files: Vec::new(),
            drop_effect: Rc::default(),
        }
    }
}

impl DataTransfer for FakeTransfer {
    fn types(&self) -> Vec<String> {
        self.types.clone()
    }

    fn items(&self) -> Option<&[Box<dyn TransferItem>]> {
        self.items.as_deref()
    }

    fn files(&self) -> Vec<RawFile> {
        self.files.clone()
    }

    fn set_drop_effect(&self, effect: DropEffect) {
        self.drop_effect.set(effect);
    }
}

pub(crate) struct FakeItem {
    kind: ItemKind,
    mime_type: String,
    file: Option<RawFile>,
    entry: Option<FakeEntry>,
}

impl FakeItem {
    pub(crate) fn file(raw: RawFile) -> Self {
        Self {
            kind: ItemKind::File,
            mime_type: raw.mime_type.clone(),
            file: Some(raw),
            entry: None,
        }
    }

    pub(crate) fn string(mime_type: &str) -> Self {
        Self {
            kind: ItemKind::String,
            mime_type: mime_type.to_string(),
            file: None,
            entry: None,
        }
    }

    pub(crate) fn unreadable(mime_type: &str) -> Self {
        Self {
            kind: ItemKind::File,
            mime_type: mime_type.to_string(),
            file: None,
            entry: None,
        }
    }

    pub(crate) fn directory(entry: FakeEntry) -> Self {
        Self {
            kind: ItemKind::File,
            mime_type: String::new(),
            file: None,
            entry: Some(entry),
        }
    }

    pub(crate) fn with_entry(mut self, entry: FakeEntry) -> Self {
        self.entry = Some(entry);
        self
    }
}

impl TransferItem for FakeItem {
    fn kind(&self) -> ItemKind {
        self.kind
    }

    fn mime_type(&self) -> String {
        self.mime_type.clone()
    }

    fn get_as_file(&self) -> Option<RawFile> {
        self.file.clone()
    }

    fn get_as_entry(&self) -> Option<Box<dyn Entry>> {
        self.entry
            .clone()
            .map(|e| Box::new(e) as Box<dyn Entry>)
    }
}

#[derive(Clone)]
pub(crate) struct FakeEntry {
    full_path: String,
    size: u64,
    children: Option<Vec<FakeEntry>>,
    broken: bool,
    failing_reader: bool,
    page_size: usize,
}

impl FakeEntry {
    pub(crate) fn file(full_path: &str, size: u64) -> Self {
        Self {
            full_path: full_path.to_string(),
            size,
            children: None,
            broken: false,
            failing_reader: false,
            page_size: 100,
        }
    }

    pub(crate) fn dir(full_path: &str, children: Vec<FakeEntry>) -> Self {
        Self {
            children: Some(children),
            ..Self::file(full_path, 0)
        }
    }

    pub(crate) fn broken(full_path: &str) -> Self {
        Self {
            broken: true,
            ..Self::file(full_path, 0)
        }
    }

    pub(crate) fn page_size(mut self, n: usize) -> Self {
        self.page_size = n.max(1);
        self
    }

    pub(crate) fn failing_reader(mut self) -> Self {
        self.failing_reader = true;
        self
    }
}

#[async_trait(?Send)]
impl Entry for FakeEntry {
    fn name(&self) -> String {
        self.full_path
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string()
    }

    fn full_path(&self) -> String {
        self.full_path.clone()
    }

    fn is_directory(&self) -> bool {
        self.children.is_some()
    }

    async fn file(&self) -> Result<RawFile, DropzoneError> {
        if self.broken || self.children.is_some() {
            return Err(DropzoneError::Read(self.full_path.clone()));
        }
        Ok(RawFile::new(self.name(), self.size))
    }

    fn create_reader(&self) -> Box<dyn EntryReader> {
        Box::new(FakeReader {
            pending: self.children.clone().unwrap_or_default().into(),
            page_size: self.page_size,
            failing: self.failing_reader,
        })
    }
}

struct FakeReader {
    pending: VecDeque<FakeEntry>,
    page_size: usize,
    failing: bool,
}

#[async_trait(?Send)]
impl EntryReader for FakeReader {
    async fn read_entries(&mut self) -> Result<Vec<Box<dyn Entry>>, DropzoneError> {
        if self.failing {
            return Err(DropzoneError::Read("directory".to_string()));
        }
        let n = self.pending.len().min(self.page_size);
        Ok(self
            .pending
            .drain(..n)
            .map(|e| Box::new(e) as Box<dyn Entry>)
            .collect())
    }
}

pub(crate) struct FakeHandle(Option<RawFile>);

impl FakeHandle {
    pub(crate) fn ok(raw: RawFile) -> Self {
        Self(Some(raw))
    }

    pub(crate) fn failing() -> Self {
        Self(None)
    }
}

#[async_trait(?Send)]
impl FileHandle for FakeHandle {
    async fn get_file(&self) -> Result<RawFile, DropzoneError> {
        self.0
            .clone()
            .ok_or_else(|| DropzoneError::Read("handle".to_string()))
    }
}

/// Hidden input; clones share counters with the one handed to the dropzone.
#[derive(Clone, Default)]
pub(crate) struct FakeInput {
    pub(crate) clears: Rc<Cell<usize>>,
    pub(crate) clicks: Rc<Cell<usize>>,
    pub(crate) files: Rc<RefCell<Vec<RawFile>>>,
}

impl InputElement for FakeInput {
    fn clear_value(&self) {
        self.clears.set(self.clears.get() + 1);
        self.files.borrow_mut().clear();
    }

    fn files(&self) -> Vec<RawFile> {
        self.files.borrow().clone()
    }

    fn click(&self) {
        self.clicks.set(self.clicks.get() + 1);
    }
}

/// Root with id 1; descendants listed in `children`.
#[derive(Clone)]
pub(crate) struct FakeRoot {
    pub(crate) id: TargetId,
    pub(crate) children: Vec<TargetId>,
    pub(crate) focused: Rc<Cell<usize>>,
}

impl FakeRoot {
    pub(crate) fn new(children: &[u64]) -> Self {
        Self {
            id: TargetId::new(1),
            children: children.iter().copied().map(TargetId::new).collect(),
            focused: Rc::default(),
        }
    }
}

impl RootElement for FakeRoot {
    fn is(&self, target: TargetId) -> bool {
        target == self.id
    }

    fn contains(&self, target: TargetId) -> bool {
        target == self.id || self.children.contains(&target)
    }

    fn focus(&self) {
        self.focused.set(self.focused.get() + 1);
    }
}

#[derive(Clone)]
pub(crate) enum PickerOutcome {
    Files(Vec<RawFile>),
    FailingHandle,
    Cancel,
    Security,
    Other,
}

#[derive(Clone)]
pub(crate) struct FakePicker {
    pub(crate) supported: bool,
    pub(crate) secure: bool,
    pub(crate) outcome: PickerOutcome,
    pub(crate) calls: Rc<Cell<usize>>,
    pub(crate) last_options: Rc<RefCell<Option<PickerOptions>>>,
}

impl FakePicker {
    pub(crate) fn new(outcome: PickerOutcome) -> Self {
        Self {
            supported: true,
            secure: true,
            outcome,
            calls: Rc::default(),
            last_options: Rc::default(),
        }
    }
}

#[async_trait(?Send)]
impl FilePicker for FakePicker {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn is_secure_context(&self) -> bool {
        self.secure
    }

    async fn open(&self, options: &PickerOptions) -> Result<Vec<Box<dyn FileHandle>>, DropzoneError> {
        self.calls.set(self.calls.get() + 1);
        *self.last_options.borrow_mut() = Some(options.clone());
        match &self.outcome {
            PickerOutcome::Files(files) => Ok(files
                .iter()
                .cloned()
                .map(|f| Box::new(FakeHandle::ok(f)) as Box<dyn FileHandle>)
                .collect()),
            PickerOutcome::FailingHandle => Ok(vec![Box::new(FakeHandle::failing())]),
            PickerOutcome::Cancel => Err(DropzoneError::Cancelled),
            PickerOutcome::Security => Err(DropzoneError::Security("cross-origin frame".to_string())),
            PickerOutcome::Other => Err(DropzoneError::Internal("picker crashed".to_string())),
        }
    }
}

/// Resolves at once; records requested delays.
#[derive(Clone, Default)]
pub(crate) struct FakeTimer {
    pub(crate) sleeps: Rc<RefCell<Vec<Duration>>>,
}

impl Timer for FakeTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        self.sleeps.borrow_mut().push(duration);
        futures::future::ready(()).boxed_local()
    }
}

/// Delivers a selection into the input while the settle delay elapses, the
/// way browsers populate `input.files` only after focus returns.
#[derive(Clone)]
pub(crate) struct SettlingTimer {
    pub(crate) input: FakeInput,
    pub(crate) selection: Vec<RawFile>,
}

impl Timer for SettlingTimer {
    fn sleep(&self, _duration: Duration) -> LocalBoxFuture<'static, ()> {
        let input = self.input.clone();
        let selection = self.selection.clone();
        async move {
            input.files.borrow_mut().extend(selection);
        }
        .boxed_local()
    }
}

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;

use indexmap::IndexSet;

use crate::accept::{evaluate_batch, probe_batch};
use crate::core::FileDescriptor;
use crate::dialog::{FilePicker, InputElement, Timer};
use crate::event::{DropEvent, Key, KeyEvent, TargetId};
use crate::extract::{DefaultExtractor, FileExtractor, FileSource};
use crate::observers::Observers;
use crate::options::DropzoneOptions;
use crate::state::{Action, InteractionState};
use crate::transfer::DropEffect;

#[cfg(feature = "tracing")]
use tracing::trace;

/// The container element turned into a drop target.
pub trait RootElement {
    /// Whether `target` is the root itself.
    fn is(&self, target: TargetId) -> bool;
    /// Whether `target` is the root or one of its descendants.
    fn contains(&self, target: TargetId) -> bool;
    /// Move keyboard focus to the root.
    fn focus(&self);
}

/// Drag-and-drop and file-dialog behavior for one surface.
///
/// Handlers run their synchronous part immediately (prevent default, track
/// hovered targets, reset state) and return a future for whatever has to wait
/// on file extraction or the picker. Drive those futures on the host's local
/// executor; they only borrow the dropzone and never hold a state borrow
/// across an await, so several can be in flight at once.
///
/// Examples
/// ```
/// use dropzone::{AcceptanceSpec, Dropzone, DropzoneOptions, Observers};
/// let dz = Dropzone::new(
///     DropzoneOptions::new().acceptance(AcceptanceSpec::new().accept([".txt"])),
/// )
/// .with_observers(Observers::new().on_drop_accepted(|files, _| {
///     for f in files {
///         println!("accepted {}", f.relative_path());
///     }
/// }));
/// assert!(!dz.state().is_drag_active);
/// ```
pub struct Dropzone {
    pub(crate) options: DropzoneOptions,
    pub(crate) observers: Observers,
    pub(crate) extractor: Box<dyn FileExtractor>,
    pub(crate) picker: Option<Box<dyn FilePicker>>,
    pub(crate) input: Option<Box<dyn InputElement>>,
    pub(crate) root: Option<Box<dyn RootElement>>,
    pub(crate) timer: Option<Box<dyn Timer>>,
    pub(crate) state: RefCell<InteractionState>,
    drag_targets: RefCell<IndexSet<TargetId>>,
    /// One-way: once the picker fails with a security error it stays off.
    pub(crate) picker_disabled: Cell<bool>,
}

impl Dropzone {
    /// Create a dropzone with default extraction and no platform elements.
    pub fn new(options: DropzoneOptions) -> Self {
        Self {
            options,
            observers: Observers::default(),
            extractor: Box::new(DefaultExtractor),
            picker: None,
            input: None,
            root: None,
            timer: None,
            state: RefCell::new(InteractionState::new()),
            drag_targets: RefCell::new(IndexSet::new()),
            picker_disabled: Cell::new(false),
        }
    }

    /// Install observers.
    pub fn with_observers(mut self, observers: Observers) -> Self {
        self.observers = observers;
        self
    }

    /// Replace the file extractor.
    pub fn with_extractor<E>(mut self, extractor: E) -> Self
    where
        E: FileExtractor + 'static,
    {
        self.extractor = Box::new(extractor);
        self
    }

    /// Provide a programmatic file picker (used with `use_fs_access_api`).
    pub fn with_picker<P>(mut self, picker: P) -> Self
    where
        P: FilePicker + 'static,
    {
        self.picker = Some(Box::new(picker));
        self
    }

    /// Provide the hidden file input.
    pub fn with_input<I>(mut self, input: I) -> Self
    where
        I: InputElement + 'static,
    {
        self.input = Some(Box::new(input));
        self
    }

    /// Provide the root element.
    pub fn with_root<R>(mut self, root: R) -> Self
    where
        R: RootElement + 'static,
    {
        self.root = Some(Box::new(root));
        self
    }

    /// Provide a timer for dialog-cancel detection.
    ///
    /// Without one a cancelled hidden-input dialog is never detected.
    pub fn with_timer<T>(mut self, timer: T) -> Self
    where
        T: Timer + 'static,
    {
        self.timer = Some(Box::new(timer));
        self
    }

    /// Current options.
    pub fn options(&self) -> &DropzoneOptions {
        &self.options
    }

    /// Snapshot of the interaction state.
    pub fn state(&self) -> InteractionState {
        self.state.borrow().clone()
    }

    /// Call once the root is mounted; focuses it when `auto_focus` is set.
    pub fn attach(&self) {
        if self.options.auto_focus {
            if let Some(root) = &self.root {
                root.focus();
            }
        }
    }

    /// Root gained focus.
    pub fn handle_focus(&self) {
        if self.keyboard_enabled() {
            self.dispatch(Action::Focus);
        }
    }

    /// Root lost focus.
    pub fn handle_blur(&self) {
        if self.keyboard_enabled() {
            self.dispatch(Action::Blur);
        }
    }

    /// Enter or Space on the focused root opens the dialog.
    pub fn handle_key_down<'a>(&'a self, event: &KeyEvent) -> impl Future<Output = ()> + use<'a> {
        let activate = self.keyboard_enabled()
            && matches!(event.key, Key::Enter | Key::Space)
            && self.root.as_ref().is_some_and(|r| r.is(event.target));
        if activate {
            event.prevent_default();
        }
        let pending = activate.then(|| self.open());
        async move {
            if let Some(open) = pending {
                open.await;
            }
        }
    }

    /// Click on the root opens the dialog unless `no_click`.
    pub fn handle_click(&self) -> impl Future<Output = ()> + '_ {
        let pending = (!self.options.disabled && !self.options.no_click).then(|| self.open());
        async move {
            if let Some(open) = pending {
                open.await;
            }
        }
    }

    /// `dragenter` on the root or a descendant.
    ///
    /// The hovered target is recorded immediately; the returned future probes
    /// the dragged items against the policy (without the custom validator) and
    /// then fires the enter observer.
    pub fn handle_drag_enter(&self, event: DropEvent) -> impl Future<Output = ()> + '_ {
        let enabled = self.drag_enabled();
        if enabled {
            event.prevent_default();
            self.isolate(&event);
            self.drag_targets.borrow_mut().insert(event.target());
        }
        async move {
            if !enabled || !event.has_files() {
                return;
            }
            let files = match self.extractor.extract(FileSource::Event(&event)).await {
                Ok(files) => files,
                Err(err) => return self.observers.error(&err),
            };
            if self.suppressed(&event) {
                return;
            }
            let is_drag_accept = !files.is_empty() && probe_batch(&files, &self.options.acceptance);
            let is_drag_reject = !files.is_empty() && !is_drag_accept;
            trace_probe(files.len(), is_drag_accept);
            self.dispatch(Action::SetDraggedFiles {
                is_drag_active: true,
                is_drag_accept,
                is_drag_reject,
            });
            self.observers.drag_enter(&event);
        }
    }

    /// `dragover`: request a copy cursor. Never changes state.
    pub fn handle_drag_over(&self, event: &DropEvent) {
        if !self.drag_enabled() {
            return;
        }
        event.prevent_default();
        self.isolate(event);
        if event.has_files() {
            if let Some(t) = event.transfer() {
                t.set_drop_effect(DropEffect::Copy);
            }
            self.observers.drag_over(event);
        }
    }

    /// `dragleave`: clears drag state once the pointer left every hovered target.
    pub fn handle_drag_leave(&self, event: &DropEvent) {
        if !self.drag_enabled() {
            return;
        }
        event.prevent_default();
        self.isolate(event);
        let remaining = {
            let mut targets = self.drag_targets.borrow_mut();
            targets.retain(|t| self.root.as_ref().is_some_and(|r| r.contains(*t)));
            targets.shift_remove(&event.target());
            targets.len()
        };
        if remaining > 0 {
            return;
        }
        self.dispatch(Action::SetDraggedFiles {
            is_drag_active: false,
            is_drag_accept: false,
            is_drag_reject: false,
        });
        if event.has_files() {
            self.observers.drag_leave(event);
        }
    }

    /// `drop`: resets the visual state at once, then extracts and validates.
    pub fn handle_drop(&self, event: DropEvent) -> impl Future<Output = ()> + '_ {
        self.accept_event(event, self.drag_enabled())
    }

    /// `change` of the hidden input; handled like a drop.
    pub fn handle_input_change(&self, event: DropEvent) -> impl Future<Output = ()> + '_ {
        self.accept_event(event, !self.options.disabled)
    }

    /// Document-level `dragover` guard (see `prevent_drop_on_document`).
    pub fn handle_document_drag_over(&self, event: &DropEvent) {
        if self.options.prevent_drop_on_document {
            event.prevent_default();
        }
    }

    /// Document-level `drop` guard: drops outside the root are swallowed.
    pub fn handle_document_drop(&self, event: &DropEvent) {
        if !self.options.prevent_drop_on_document {
            return;
        }
        if self.root.as_ref().is_some_and(|r| r.contains(event.target())) {
            return;
        }
        event.prevent_default();
        self.drag_targets.borrow_mut().clear();
    }

    fn accept_event(&self, event: DropEvent, enabled: bool) -> impl Future<Output = ()> + '_ {
        let has_files = enabled && event.has_files();
        if enabled {
            event.prevent_default();
            self.isolate(&event);
            self.drag_targets.borrow_mut().clear();
            self.dispatch(Action::Reset);
        }
        async move {
            if !has_files {
                return;
            }
            match self.extractor.extract(FileSource::Event(&event)).await {
                Ok(files) => {
                    if self.suppressed(&event) {
                        return;
                    }
                    self.set_files(files, Some(&event));
                }
                Err(err) => self.observers.error(&err),
            }
        }
    }

    /// Validate a finished batch, store the partition and notify observers.
    pub(crate) fn set_files(&self, files: Vec<FileDescriptor>, event: Option<&DropEvent>) {
        let verdict = evaluate_batch(files, &self.options.acceptance);
        self.dispatch(Action::SetFiles {
            accepted_files: verdict.accepted.clone(),
            file_rejections: verdict.rejected.clone(),
        });
        self.observers
            .dropped(&verdict.accepted, &verdict.rejected, event);
    }

    pub(crate) fn dispatch(&self, action: Action) {
        let next = self.state.borrow().reduce(action);
        *self.state.borrow_mut() = next;
    }

    fn drag_enabled(&self) -> bool {
        !self.options.disabled && !self.options.no_drag
    }

    fn keyboard_enabled(&self) -> bool {
        !self.options.disabled && !self.options.no_keyboard
    }

    fn isolate(&self, event: &DropEvent) {
        if self.options.no_drag_events_bubbling {
            event.stop_propagation();
        }
    }

    /// A handler chained before ours stopped propagation: skip the continuation.
    fn suppressed(&self, event: &DropEvent) -> bool {
        event.is_propagation_stopped() && !self.options.no_drag_events_bubbling
    }
}

impl fmt::Debug for Dropzone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dropzone")
            .field("options", &self.options)
            .field("observers", &self.observers)
            .field("state", &self.state.borrow())
            .field("drag_targets", &self.drag_targets.borrow())
            .field("picker_disabled", &self.picker_disabled.get())
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "tracing")]
fn trace_probe(count: usize, accept: bool) {
    trace!(count, accept, "drag probe");
}

#[cfg(not(feature = "tracing"))]
fn trace_probe(_count: usize, _accept: bool) {}

use crate::accept::AcceptanceSpec;

/// Behavior switches for a [`crate::Dropzone`].
///
/// Examples
/// ```
/// use dropzone::{AcceptanceSpec, DropzoneOptions};
/// let opts = DropzoneOptions::new()
///     .acceptance(AcceptanceSpec::new().accept(["image/*"]).multiple(false))
///     .no_click(true)
///     .use_fs_access_api(true);
/// assert!(opts.prevent_drop_on_document);
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DropzoneOptions {
    /// What is accepted.
    pub acceptance: AcceptanceSpec,
    /// Ignore every interaction.
    pub disabled: bool,
    /// Do not open the file dialog when the root is clicked.
    pub no_click: bool,
    /// Ignore focus, blur and Enter/Space.
    pub no_keyboard: bool,
    /// Ignore drag events.
    pub no_drag: bool,
    /// Stop drag events from bubbling to ancestors.
    pub no_drag_events_bubbling: bool,
    /// Keep the platform from opening files dropped outside the root.
    pub prevent_drop_on_document: bool,
    /// Prefer the File System Access picker when available.
    pub use_fs_access_api: bool,
    /// Focus the root when attached.
    pub auto_focus: bool,
}

impl Default for DropzoneOptions {
    fn default() -> Self {
        Self {
            acceptance: AcceptanceSpec::default(),
            disabled: false,
            no_click: false,
            no_keyboard: false,
            no_drag: false,
            no_drag_events_bubbling: false,
            prevent_drop_on_document: true,
            use_fs_access_api: false,
            auto_focus: false,
        }
    }
}

impl DropzoneOptions {
    /// Defaults: everything enabled, any file accepted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the acceptance policy.
    pub fn acceptance(mut self, spec: AcceptanceSpec) -> Self {
        self.acceptance = spec;
        self
    }

    /// Disable every interaction.
    pub fn disabled(mut self, yes: bool) -> Self {
        self.disabled = yes;
        self
    }

    /// Do not open the dialog on click.
    pub fn no_click(mut self, yes: bool) -> Self {
        self.no_click = yes;
        self
    }

    /// Ignore keyboard and focus events.
    pub fn no_keyboard(mut self, yes: bool) -> Self {
        self.no_keyboard = yes;
        self
    }

    /// Ignore drag events.
    pub fn no_drag(mut self, yes: bool) -> Self {
        self.no_drag = yes;
        self
    }

    /// Stop drag events from bubbling.
    pub fn no_drag_events_bubbling(mut self, yes: bool) -> Self {
        self.no_drag_events_bubbling = yes;
        self
    }

    /// Guard the document against stray drops.
    pub fn prevent_drop_on_document(mut self, yes: bool) -> Self {
        self.prevent_drop_on_document = yes;
        self
    }

    /// Opt into the File System Access picker.
    pub fn use_fs_access_api(mut self, yes: bool) -> Self {
        self.use_fs_access_api = yes;
        self
    }

    /// Focus the root on attach.
    pub fn auto_focus(mut self, yes: bool) -> Self {
        self.auto_focus = yes;
        self
    }
}

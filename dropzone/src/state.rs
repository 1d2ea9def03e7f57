use crate::core::{FileDescriptor, FileRejection};

/// Observable state of one dropzone.
///
/// This is intentionally independent of any UI toolkit so the transitions can
/// be tested on their own. It only changes through [`InteractionState::reduce`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InteractionState {
    /// The root element holds keyboard focus.
    pub is_focused: bool,
    /// A drag carrying files hovers the root.
    pub is_drag_active: bool,
    /// Every hovering file would be accepted.
    pub is_drag_accept: bool,
    /// At least one hovering file would be rejected.
    pub is_drag_reject: bool,
    /// A file dialog is open.
    pub is_file_dialog_active: bool,
    /// Files accepted in the last processed batch.
    pub accepted_files: Vec<FileDescriptor>,
    /// Files rejected in the last processed batch.
    pub file_rejections: Vec<FileRejection>,
}

/// Closed set of state transitions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Root gained focus.
    Focus,
    /// Root lost focus.
    Blur,
    /// A file dialog opened; everything else resets.
    OpenDialog,
    /// The file dialog closed.
    CloseDialog,
    /// Drag probe result.
    SetDraggedFiles {
        /// Drag in progress.
        is_drag_active: bool,
        /// All hovering files acceptable.
        is_drag_accept: bool,
        /// Some hovering file unacceptable.
        is_drag_reject: bool,
    },
    /// A batch finished validation.
    SetFiles {
        /// Accepted partition.
        accepted_files: Vec<FileDescriptor>,
        /// Rejected partition.
        file_rejections: Vec<FileRejection>,
    },
    /// Back to the initial state.
    Reset,
}

impl InteractionState {
    /// Initial state: nothing focused, dragged, opened or selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one transition and return the next state.
    pub fn reduce(&self, action: Action) -> Self {
        match action {
            Action::Focus => Self {
                is_focused: true,
                ..self.clone()
            },
            Action::Blur => Self {
                is_focused: false,
                ..self.clone()
            },
            Action::OpenDialog => Self {
                is_file_dialog_active: true,
                ..Self::new()
            },
            Action::CloseDialog => Self {
                is_file_dialog_active: false,
                ..self.clone()
            },
            Action::SetDraggedFiles {
                is_drag_active,
                is_drag_accept,
                is_drag_reject,
            } => Self {
                is_drag_active,
                is_drag_accept,
                is_drag_reject,
                ..self.clone()
            },
            Action::SetFiles {
                accepted_files,
                file_rejections,
            } => Self {
                accepted_files,
                file_rejections,
                ..self.clone()
            },
            Action::Reset => Self::new(),
        }
    }
}

// Modal system for TUI overlays
//
// Forms and prompts live in the admin state; this module only maps keys to
// actions for whichever overlay is on top. The caller applies the action.

use crossterm::event::KeyCode;

/// Actions returned by modal input handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalAction {
    /// Input consumed, no state change needed
    None,
    /// Close the overlay (cancels a form)
    Close,
    /// Validate and send the form
    Submit,
    NextField,
    PrevField,
    Insert(char),
    Backspace,
    /// Move the course picker selection
    Pick { forward: bool },
    /// Answer the yes/no prompt
    Answer(bool),
}

/// Overlay currently capturing input, topmost first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    /// Yes/no prompt guarding a delete or unenroll
    Confirm,
    /// Text form (`picker` is false) or course picker
    Form { picker: bool },
    /// Keyboard shortcuts
    Help,
}

impl Modal {
    /// Handle keyboard input, return action for caller to execute
    pub fn handle_input(&self, key: KeyCode) -> ModalAction {
        match self {
            Modal::Confirm => match key {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    ModalAction::Answer(true)
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    ModalAction::Answer(false)
                }
                _ => ModalAction::None,
            },
            Modal::Form { picker: true } => match key {
                KeyCode::Esc => ModalAction::Close,
                KeyCode::Enter => ModalAction::Submit,
                KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                    ModalAction::Pick { forward: true }
                }
                KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => {
                    ModalAction::Pick { forward: false }
                }
                _ => ModalAction::None,
            },
            Modal::Form { picker: false } => match key {
                KeyCode::Esc => ModalAction::Close,
                KeyCode::Enter => ModalAction::Submit,
                KeyCode::Tab | KeyCode::Down => ModalAction::NextField,
                KeyCode::BackTab | KeyCode::Up => ModalAction::PrevField,
                KeyCode::Backspace => ModalAction::Backspace,
                KeyCode::Char(c) => ModalAction::Insert(c),
                _ => ModalAction::None,
            },
            Modal::Help => match key {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => ModalAction::Close,
                _ => ModalAction::None,
            },
        }
    }
}

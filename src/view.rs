use crate::editor::EditorState;
use crate::session::Session;

/// The screen currently on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Auth,
    Composer,
    List,
}

/// Signed out always shows `Auth`; otherwise the composer flag picks
/// between `Composer` and `List`.
pub fn active_view(session: &Session, editor: &EditorState) -> View {
    if !session.is_authenticated() {
        View::Auth
    } else if editor.is_composing() {
        View::Composer
    } else {
        View::List
    }
}

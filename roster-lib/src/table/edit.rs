//! Inline name editing.

/// Single-slot edit state machine. At most one record is edited at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Idle,
    Editing {
        /// Record being edited.
        id: u64,
        /// In-progress name.
        buffer: String,
    },
}

impl EditState {
    /// Starts editing `id`, discarding any other in-progress edit.
    pub fn begin(&mut self, id: u64, name: impl Into<String>) {
        *self = Self::Editing {
            id,
            buffer: name.into(),
        };
    }

    /// Replaces the buffer. Returns `false` when idle.
    pub fn input(&mut self, text: impl Into<String>) -> bool {
        match self {
            Self::Editing { buffer, .. } => {
                *buffer = text.into();
                true
            }
            Self::Idle => false,
        }
    }

    /// Leaves edit mode, returning the id and buffer if one was active.
    pub fn finish(&mut self) -> Option<(u64, String)> {
        match std::mem::take(self) {
            Self::Editing { id, buffer } => Some((id, buffer)),
            Self::Idle => None,
        }
    }

    pub fn editing_id(&self) -> Option<u64> {
        match self {
            Self::Editing { id, .. } => Some(*id),
            Self::Idle => None,
        }
    }

    pub fn buffer(&self) -> Option<&str> {
        match self {
            Self::Editing { buffer, .. } => Some(buffer),
            Self::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_sets_buffer() {
        let mut edit = EditState::default();
        edit.begin(2, "Bob");

        assert_eq!(edit.editing_id(), Some(2));
        assert_eq!(edit.buffer(), Some("Bob"));
    }

    #[test]
    fn test_begin_replaces_other_edit() {
        let mut edit = EditState::default();
        edit.begin(2, "Bob");
        edit.input("Bobby");
        edit.begin(3, "Cy");

        assert_eq!(edit.editing_id(), Some(3));
        assert_eq!(edit.buffer(), Some("Cy"));
    }

    #[test]
    fn test_input_when_idle_is_ignored() {
        let mut edit = EditState::default();
        assert!(!edit.input("x"));
        assert_eq!(edit, EditState::Idle);
    }

    #[test]
    fn test_finish_returns_to_idle() {
        let mut edit = EditState::default();
        edit.begin(1, "Ann");
        edit.input("Anne");

        assert_eq!(edit.finish(), Some((1, "Anne".to_string())));
        assert_eq!(edit.editing_id(), None);
        assert_eq!(edit.finish(), None);
    }
}

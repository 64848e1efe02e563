/// Failures surfaced by typed state access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::TypeMismatch {
                key,
                expected,
                found,
            } => write!(
                f,
                "state {key:?} type mismatch; expected {expected}, found {found}"
            ),
        }
    }
}

impl std::error::Error for StateError {}

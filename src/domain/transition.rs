use serde::Serialize;

/// Result of an engine operation that may legitimately leave state as it
/// was ("already a member", "not pending", "already approved").
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "record", rename_all = "snake_case")]
pub enum Transition<T> {
    Applied(T),
    Unchanged(T),
}

impl<T> Transition<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied(_))
    }

    pub fn get(&self) -> &T {
        match self {
            Transition::Applied(v) | Transition::Unchanged(v) => v,
        }
    }
}

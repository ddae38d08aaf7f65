use super::model::KnowledgeState;

/// Last known knowledge state.
///
/// Never polls on its own; the orchestrator decides when to refresh.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeStateCache {
    current: KnowledgeState,
}

impl KnowledgeStateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> &KnowledgeState {
        &self.current
    }

    /// Replaces the snapshot wholesale.
    pub fn set(&mut self, state: KnowledgeState) {
        self.current = state;
    }
}

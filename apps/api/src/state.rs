use crate::answer::AnswerComposer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owns the `ChatModel` and `FactExtractor`; both are `Arc`s, so cloning is cheap.
    pub composer: AnswerComposer,
    pub config: Config,
}

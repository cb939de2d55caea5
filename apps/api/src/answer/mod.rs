// Answer Composer: mode/prompt selection, model call, template filter, fact fallback.
// All LLM calls go through llm_client::ChatModel — no direct provider calls here.

pub mod composer;
pub mod facts;
pub mod fallback;
pub mod filter;
pub mod mode;
pub mod prompts;

/// One prior conversation turn. Passed to the model verbatim.
pub type HistoryTurn = crate::llm_client::ChatMessage;

pub use composer::{AnswerComposer, AnswerRequest, Outcome};
pub use mode::Mode;

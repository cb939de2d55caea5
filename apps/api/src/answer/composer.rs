//! Answer composition — selects the prompt, calls the model, filters the reply.
//!
//! Flow: validate question → pick mode/prompt → LLM call →
//!       (resume mode) template filter → accept | fact fallback.
//!
//! Every path ends in an `Answer`. Provider failures are logged and replaced by
//! an opaque message; nothing propagates past `AnswerComposer::compose`.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::answer::facts::FactExtractor;
use crate::answer::fallback::{build_fallback, Fallback};
use crate::answer::filter::{evaluate, Verdict};
use crate::answer::mode::{is_intro_question, Mode, SamplingPolicy};
use crate::answer::prompts::{resume_instruction, GLOBAL_SYSTEM};
use crate::answer::HistoryTurn;
use crate::llm_client::{ChatMessage, ChatModel, ChatRequest};

pub const NO_QUESTION: &str = "No question provided.";

pub const RESUME_UNAVAILABLE: &str = "Could not extract any text from the uploaded resume. \
    If your PDF is a scanned image, try a text-based PDF or upload a .txt file instead.";

pub const PROVIDER_FAILURE: &str = "[Error: Could not generate answer.]";

/// Input to one composition.
#[derive(Debug, Clone, Default)]
pub struct AnswerRequest {
    pub question: String,
    pub resume_text: Option<String>,
    pub mode: Mode,
    pub history: Vec<HistoryTurn>,
}

/// Terminal state that produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Blank question, no model call.
    NoQuestion,
    /// Resume mode without usable resume text, no model call.
    ResumeUnavailable,
    /// The model call failed.
    ProviderFailure,
    /// Global mode: model output returned unfiltered.
    Passthrough,
    /// Resume mode: model output passed the filter.
    Accepted,
    /// Resume mode: rejected, replaced with resume facts.
    FallbackWithFacts,
    /// Resume mode: rejected, and the resume had no usable facts.
    FallbackInsufficient,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::NoQuestion => "no_question",
            Outcome::ResumeUnavailable => "resume_unavailable",
            Outcome::ProviderFailure => "provider_failure",
            Outcome::Passthrough => "passthrough",
            Outcome::Accepted => "accepted",
            Outcome::FallbackWithFacts => "fallback_with_facts",
            Outcome::FallbackInsufficient => "fallback_insufficient",
        }
    }
}

/// The text handed back to the caller, tagged with how it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub outcome: Outcome,
}

impl Answer {
    fn new(text: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            text: text.into(),
            outcome,
        }
    }
}

/// What to do with a request before any I/O happens.
#[derive(Debug, Clone)]
pub enum Plan {
    /// Answer immediately without calling the model.
    ShortCircuit(Answer),
    /// Call the model with this request.
    Call {
        request: ChatRequest,
        is_intro: bool,
    },
}

/// Picks the system instruction and sampling policy, and builds the message
/// sequence: `[system] + history + [user: question]`.
pub fn plan(req: &AnswerRequest) -> Plan {
    if req.question.trim().is_empty() {
        return Plan::ShortCircuit(Answer::new(NO_QUESTION, Outcome::NoQuestion));
    }

    let is_intro = is_intro_question(&req.question);

    let system = match req.mode {
        Mode::Resume => match usable_resume(req) {
            Some(resume) => resume_instruction(resume, is_intro),
            None => {
                return Plan::ShortCircuit(Answer::new(
                    RESUME_UNAVAILABLE,
                    Outcome::ResumeUnavailable,
                ))
            }
        },
        Mode::Global => GLOBAL_SYSTEM.to_string(),
    };

    let mut messages = Vec::with_capacity(req.history.len() + 2);
    messages.push(ChatMessage::system(system));
    messages.extend(req.history.iter().cloned());
    messages.push(ChatMessage::user(req.question.clone()));

    let policy = SamplingPolicy::for_request(req.mode, is_intro);

    Plan::Call {
        request: ChatRequest {
            messages,
            max_tokens: policy.max_tokens,
            temperature: policy.temperature,
        },
        is_intro,
    }
}

fn usable_resume(req: &AnswerRequest) -> Option<&str> {
    req.resume_text
        .as_deref()
        .filter(|text| !text.trim().is_empty())
}

/// Orchestrates one question → answer pass.
#[derive(Clone)]
pub struct AnswerComposer {
    llm: Arc<dyn ChatModel>,
    facts: Arc<dyn FactExtractor>,
}

impl AnswerComposer {
    pub fn new(llm: Arc<dyn ChatModel>, facts: Arc<dyn FactExtractor>) -> Self {
        Self { llm, facts }
    }

    pub async fn compose(&self, req: &AnswerRequest) -> Answer {
        info!(
            mode = req.mode.as_str(),
            resume_len = req.resume_text.as_ref().map(String::len),
            history_turns = req.history.len(),
            "Composing answer"
        );

        let (request, is_intro) = match plan(req) {
            Plan::ShortCircuit(answer) => {
                info!(outcome = answer.outcome.as_str(), "Answered without model call");
                return answer;
            }
            Plan::Call { request, is_intro } => (request, is_intro),
        };

        let raw = match self.llm.complete(&request).await {
            Ok(text) => text,
            Err(e) => {
                error!(model = self.llm.model(), "LLM call failed: {e}");
                return Answer::new(PROVIDER_FAILURE, Outcome::ProviderFailure);
            }
        };

        let answer = match (req.mode, usable_resume(req)) {
            (Mode::Resume, Some(resume)) => self.filter_resume_answer(raw, resume, req, is_intro),
            _ => Answer::new(raw, Outcome::Passthrough),
        };

        info!(outcome = answer.outcome.as_str(), "Answer composed");
        answer
    }

    fn filter_resume_answer(
        &self,
        raw: String,
        resume: &str,
        req: &AnswerRequest,
        is_intro: bool,
    ) -> Answer {
        match evaluate(&raw, resume) {
            Verdict::Accept => Answer::new(raw, Outcome::Accepted),
            Verdict::Reject(rule) => {
                warn!(rule = rule.name(), "Model answer rejected by template filter");
                debug!("Rejected answer: {raw}");

                let facts = self.facts.extract(resume);
                debug!(fact_count = facts.count(), "Extracted resume facts");

                match build_fallback(&facts, &req.question, is_intro) {
                    Fallback::WithFacts(text) => Answer::new(text, Outcome::FallbackWithFacts),
                    insufficient @ Fallback::Insufficient => {
                        Answer::new(insufficient.into_text(), Outcome::FallbackInsufficient)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::{routing::post, Json, Router};
    use serde_json::json;

    use crate::answer::facts::HeuristicFactExtractor;
    use crate::answer::fallback::INSUFFICIENT_RESUME;
    use crate::answer::prompts::RESUME_INTRO_SYSTEM;
    use crate::llm_client::stub::{spawn_provider, StubModel};
    use crate::llm_client::{LlmClient, Role};

    const RESUME: &str = "Name: Jane Doe. Software Engineer with 5 years of experience \
        at Acme Corp. Skills: Python, Go. Bachelor degree.";

    fn composer(model: Arc<StubModel>) -> AnswerComposer {
        AnswerComposer::new(model, Arc::new(HeuristicFactExtractor))
    }

    fn resume_request(question: &str) -> AnswerRequest {
        AnswerRequest {
            question: question.to_string(),
            resume_text: Some(RESUME.to_string()),
            mode: Mode::Resume,
            history: vec![],
        }
    }

    #[tokio::test]
    async fn test_blank_question_short_circuits_in_both_modes() {
        for mode in [Mode::Global, Mode::Resume] {
            for question in ["", "   ", "\n\t"] {
                let model = StubModel::replying("unused");
                let req = AnswerRequest {
                    question: question.to_string(),
                    resume_text: Some(RESUME.to_string()),
                    mode,
                    history: vec![],
                };
                let answer = composer(model.clone()).compose(&req).await;
                assert_eq!(answer.text, NO_QUESTION);
                assert_eq!(answer.outcome, Outcome::NoQuestion);
                assert!(model.calls().is_empty());
            }
        }
    }

    #[tokio::test]
    async fn test_resume_mode_without_resume_short_circuits() {
        for resume_text in [None, Some(String::new()), Some("  \n ".to_string())] {
            let model = StubModel::replying("unused");
            let req = AnswerRequest {
                question: "Tell me about yourself".into(),
                resume_text,
                mode: Mode::Resume,
                history: vec![],
            };
            let answer = composer(model.clone()).compose(&req).await;
            assert_eq!(answer.text, RESUME_UNAVAILABLE);
            assert_eq!(answer.outcome, Outcome::ResumeUnavailable);
            assert!(model.calls().is_empty());
        }
        assert_ne!(RESUME_UNAVAILABLE, NO_QUESTION);
    }

    #[tokio::test]
    async fn test_temperature_ordering_across_modes() {
        let model = StubModel::replying("I write Python at Acme Corp.");
        let c = composer(model.clone());

        c.compose(&resume_request("Tell me about yourself")).await;
        c.compose(&resume_request("What is your strongest language?")).await;
        c.compose(&AnswerRequest {
            question: "What is your strongest language?".into(),
            ..Default::default()
        })
        .await;

        let temps: Vec<f32> = model.calls().iter().map(|r| r.temperature).collect();
        assert_eq!(temps.len(), 3);
        assert!(temps[0] < temps[1]);
        assert!(temps[1] < temps[2]);
    }

    #[tokio::test]
    async fn test_templated_answer_replaced_with_resume_facts() {
        let model = StubModel::replying("Here is a sample answer: I am a motivated professional.");
        let answer = composer(model)
            .compose(&resume_request("Why should we hire you?"))
            .await;

        assert_eq!(answer.outcome, Outcome::FallbackWithFacts);
        assert!(answer.text.contains("Jane Doe"));
        assert!(answer.text.contains("5 years"));
        assert!(answer.text.contains("Acme Corp"));
        assert!(answer.text.contains("Why should we hire you"));
    }

    #[tokio::test]
    async fn test_intro_fallback_omits_question() {
        let model = StubModel::replying("");
        let answer = composer(model.clone())
            .compose(&resume_request("Tell me about yourself"))
            .await;

        assert_eq!(answer.outcome, Outcome::FallbackWithFacts);
        assert!(answer.text.starts_with("My name is Jane Doe."));
        assert!(!answer.text.contains("Tell me about yourself"));
        let system = &model.calls()[0].messages[0];
        assert!(system.content.starts_with(RESUME_INTRO_SYSTEM));
    }

    #[tokio::test]
    async fn test_empty_answer_without_facts_is_insufficient() {
        let model = StubModel::replying("   ");
        let req = AnswerRequest {
            question: "What motivates you?".into(),
            resume_text: Some("hobbies include hiking and chess".into()),
            mode: Mode::Resume,
            history: vec![],
        };
        let answer = composer(model).compose(&req).await;
        assert_eq!(answer.outcome, Outcome::FallbackInsufficient);
        assert_eq!(answer.text, INSUFFICIENT_RESUME);
    }

    #[tokio::test]
    async fn test_enumerated_answer_rejected() {
        let model = StubModel::replying("1. First, review your resume. 2. Then...");
        let answer = composer(model)
            .compose(&resume_request("How do you prepare?"))
            .await;
        assert_eq!(answer.outcome, Outcome::FallbackWithFacts);
        assert!(!answer.text.contains("review your resume"));
    }

    #[tokio::test]
    async fn test_clean_grounded_answer_passes_unmodified() {
        let reply = "I have spent five years writing Python and Go services at Acme Corp.";
        let model = StubModel::replying(reply);
        let answer = composer(model)
            .compose(&resume_request("What do you work on?"))
            .await;
        assert_eq!(answer.outcome, Outcome::Accepted);
        assert_eq!(answer.text, reply);
    }

    #[tokio::test]
    async fn test_global_mode_is_unfiltered() {
        let reply = "Here is a sample list: 1. Arriving late 2. Not researching the company";
        let model = StubModel::replying(&format!("  {reply}\n"));
        let req = AnswerRequest {
            question: "What are common interview mistakes?".into(),
            ..Default::default()
        };
        let answer = composer(model.clone()).compose(&req).await;

        assert_eq!(answer.outcome, Outcome::Passthrough);
        assert_eq!(answer.text, reply);
        assert_eq!(model.calls()[0].messages[0].content, GLOBAL_SYSTEM);
    }

    #[tokio::test]
    async fn test_provider_failure_is_opaque() {
        let model = StubModel::failing();
        let answer = composer(model)
            .compose(&resume_request("What do you work on?"))
            .await;
        assert_eq!(answer.outcome, Outcome::ProviderFailure);
        assert_eq!(answer.text, PROVIDER_FAILURE);
    }

    #[tokio::test]
    async fn test_provider_timeout_is_opaque() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({ "choices": [{ "message": { "content": "too late" } }] }))
            }),
        );
        let base = spawn_provider(router).await;
        let llm = LlmClient::new(
            "test-key".to_string(),
            "gpt-test".to_string(),
            &base,
            Duration::from_millis(300),
        )
        .unwrap();

        let answer = AnswerComposer::new(Arc::new(llm), Arc::new(HeuristicFactExtractor))
            .compose(&resume_request("What do you work on?"))
            .await;
        assert_eq!(answer.outcome, Outcome::ProviderFailure);
        assert_eq!(answer.text, PROVIDER_FAILURE);
    }

    #[test]
    fn test_history_sits_between_system_and_question() {
        let history = vec![
            ChatMessage::user("What is your name?"),
            ChatMessage {
                role: Role::Assistant,
                content: "Jane.".into(),
            },
        ];
        let req = AnswerRequest {
            question: "And your role?".into(),
            history: history.clone(),
            ..Default::default()
        };

        let Plan::Call { request, is_intro } = plan(&req) else {
            panic!("expected a model call");
        };
        assert!(!is_intro);
        assert_eq!(request.messages.len(), 4);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(&request.messages[1..3], history.as_slice());
        assert_eq!(request.messages[3], ChatMessage::user("And your role?"));
    }

    #[test]
    fn test_resume_prompt_embeds_resume() {
        let Plan::Call { request, .. } = plan(&resume_request("What do you work on?")) else {
            panic!("expected a model call");
        };
        assert!(request.messages[0].content.ends_with(RESUME));
    }
}

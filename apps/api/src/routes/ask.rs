//! `POST /ask` — question in, answer out.
//!
//! Accepts either `multipart/form-data` (with an optional resume file) or a
//! JSON body (with resume text inline). Both shapes collapse into one
//! `AnswerRequest` before the composer sees them.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info_span, warn, Instrument};
use uuid::Uuid;

use crate::answer::{AnswerRequest, HistoryTurn, Mode, Outcome};
use crate::errors::AppError;
use crate::resume::extract_resume_text;
use crate::state::AppState;

/// JSON flavour of the request.
#[derive(Debug, Deserialize)]
pub struct AskJsonRequest {
    #[serde(default)]
    pub question: Option<String>,
    /// Raw resume text.
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub history: Option<Vec<HistoryTurn>>,
}

impl From<AskJsonRequest> for AnswerRequest {
    fn from(body: AskJsonRequest) -> Self {
        AnswerRequest {
            question: body.question.unwrap_or_default(),
            resume_text: body.resume,
            mode: body.mode,
            history: body.history.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

/// Extractor that accepts both request shapes.
pub struct AskPayload(pub AnswerRequest);

#[async_trait]
impl<S> FromRequest<S> for AskPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            read_multipart(multipart).await.map(AskPayload)
        } else {
            let Json(body) = Json::<AskJsonRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            Ok(AskPayload(body.into()))
        }
    }
}

/// Reads `question`, `mode`, `history` and the `resume` file from a form.
/// Unknown fields are ignored; a malformed `history` is dropped with a warning.
async fn read_multipart(mut multipart: Multipart) -> Result<AnswerRequest, AppError> {
    let mut request = AnswerRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart field: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "question" => request.question = read_text(field).await?,
            "mode" => request.mode = Mode::parse(&read_text(field).await?),
            "history" => {
                let raw = read_text(field).await?;
                request.history = parse_history(&raw);
            }
            "resume" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read resume: {e}")))?;
                if filename.is_empty() && data.is_empty() {
                    continue;
                }
                request.resume_text = Some(extract_resume_text(&filename, data).await);
            }
            _ => {}
        }
    }

    Ok(request)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read form field: {e}")))
}

fn parse_history(raw: &str) -> Vec<HistoryTurn> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str::<Option<Vec<HistoryTurn>>>(raw)
        .unwrap_or_else(|e| {
            warn!("Ignoring malformed history: {e}");
            None
        })
        .unwrap_or_default()
}

/// POST /ask
///
/// 200 with `{"answer": ...}` for every composed answer, including provider
/// failures and fallbacks. 400 for a missing question, 422 when resume mode
/// has no usable resume text.
pub async fn handle_ask(
    State(state): State<AppState>,
    AskPayload(request): AskPayload,
) -> Result<Json<AskResponse>, AppError> {
    let span = info_span!("ask", request_id = %Uuid::new_v4(), mode = request.mode.as_str());

    async move {
        let answer = state.composer.compose(&request).await;
        match answer.outcome {
            Outcome::NoQuestion => Err(AppError::MissingQuestion),
            Outcome::ResumeUnavailable => Err(AppError::ResumeUnavailable),
            _ => Ok(Json(AskResponse {
                answer: answer.text,
            })),
        }
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::Role;

    #[test]
    fn test_parse_history_accepts_turns() {
        let turns = parse_history(
            r#"[{"role":"user","content":"Hi"},{"role":"assistant","content":"Hello"}]"#,
        );
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].role, Role::Assistant);
    }

    #[test]
    fn test_parse_history_tolerates_garbage() {
        assert!(parse_history("not json").is_empty());
        assert!(parse_history("null").is_empty());
        assert!(parse_history("").is_empty());
        assert!(parse_history(r#"[{"role":"robot","content":"x"}]"#).is_empty());
    }

    #[test]
    fn test_json_request_defaults() {
        let body: AskJsonRequest = serde_json::from_str(r#"{"question":"Hi"}"#).unwrap();
        let req: AnswerRequest = body.into();
        assert_eq!(req.question, "Hi");
        assert_eq!(req.mode, Mode::Global);
        assert!(req.resume_text.is_none());
        assert!(req.history.is_empty());

        let body: AskJsonRequest =
            serde_json::from_str(r#"{"question":"Hi","mode":null,"history":null}"#).unwrap();
        let req: AnswerRequest = body.into();
        assert_eq!(req.mode, Mode::Global);
        assert!(req.history.is_empty());
    }
}

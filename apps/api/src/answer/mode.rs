//! Mode selection and sampling policy.

use std::sync::OnceLock;

use regex::RegexSet;
use serde::{Deserialize, Deserializer};

/// Whether answers are grounded in resume text or given as general advice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Global,
    Resume,
}

impl Mode {
    /// Lenient parse: only `resume` selects resume mode, anything else is global.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("resume") {
            Mode::Resume
        } else {
            Mode::Global
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Global => "global",
            Mode::Resume => "resume",
        }
    }
}

impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Mode::parse).unwrap_or_default())
    }
}

const INTRO_PATTERNS: &[&str] = &[
    r"tell me about yourself",
    r"about yourself",
    r"introduce yourself",
    r"give .* introduction",
    r"self introduction",
    r"yourself",
];

fn intro_patterns() -> &'static RegexSet {
    static SET: OnceLock<RegexSet> = OnceLock::new();
    SET.get_or_init(|| {
        RegexSet::new(INTRO_PATTERNS.iter().map(|p| format!("(?i){p}")))
            .expect("intro patterns are valid regexes")
    })
}

/// True when the question asks the candidate to introduce themselves.
pub fn is_intro_question(question: &str) -> bool {
    intro_patterns().is_match(question)
}

/// Output cap shared by all modes.
pub const MAX_ANSWER_TOKENS: u32 = 512;

const RESUME_INTRO_TEMPERATURE: f32 = 0.3;
const RESUME_TEMPERATURE: f32 = 0.45;
const GLOBAL_TEMPERATURE: f32 = 0.7;

/// Sampling parameters for one model call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingPolicy {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl SamplingPolicy {
    /// resume+intro < resume < global.
    pub fn for_request(mode: Mode, is_intro: bool) -> Self {
        let temperature = match (mode, is_intro) {
            (Mode::Resume, true) => RESUME_INTRO_TEMPERATURE,
            (Mode::Resume, false) => RESUME_TEMPERATURE,
            (Mode::Global, _) => GLOBAL_TEMPERATURE,
        };
        Self {
            max_tokens: MAX_ANSWER_TOKENS,
            temperature,
        }
    }
}

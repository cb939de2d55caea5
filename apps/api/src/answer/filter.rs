//! Template-rejection filter for resume-mode answers.
//!
//! `evaluate` is a pure function over `(answer, resume_text)`. Each rule is an
//! independent predicate; rules run in `RULES` order and the first hit wins,
//! so the reported rule is stable for a given input.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::{Regex, RegexSet};

/// Meta / templating phrases. Matched as case-insensitive substrings.
const FORBIDDEN_PHRASES: &[&str] = &[
    "as an ai language model",
    "as an interview assistant",
    "i'm sorry",
    "i am unable to",
    "i cannot answer",
    "based on the information provided",
    "based on your resume",
    "here is a template",
    "here is a sample",
    "here is an example",
    "template",
    "sample",
    "example",
    "generic",
    "fallback",
    "instructional",
    "structured",
    "let's",
    "in summary",
    "in conclusion",
    "overall",
    "to answer",
    "response:",
];

/// Sentence openers that signal commentary about the answer rather than the answer.
const META_OPENERS: &[&str] = &[
    r"^answer[:\-]",
    r"^template[:\-]",
    r"^sample answer[:\-]",
    r"^example[:\-]",
    r"^suggested answer[:\-]",
    r"^possible answer[:\-]",
    r"^response[:\-]",
    r"^here is",
    r"^this is",
    r"^let's",
    r"^to answer",
    r"^in summary",
    r"^in conclusion",
    r"^overall",
    r"^as an? ",
];

/// Openers of a step list.
const LIST_OPENERS: &[&str] = &[
    r"^1\.",
    r"^step 1",
    r"^first,",
    r"^here's how",
    r"^here are some",
];

/// Openers that could be said by anyone about anything.
const GENERIC_SELF_OPENERS: &[&str] = &["i am", "my name is", "i have", "i possess", "i'm a"];

/// Answers longer than this must share vocabulary with the resume.
const UNGROUNDED_MIN_CHARS: usize = 60;

/// Words shorter than this do not count as shared vocabulary.
const MIN_TOKEN_CHARS: usize = 4;

fn meta_openers() -> &'static RegexSet {
    static SET: OnceLock<RegexSet> = OnceLock::new();
    SET.get_or_init(|| {
        RegexSet::new(META_OPENERS.iter().map(|p| format!("(?i){p}")))
            .expect("meta opener patterns are valid regexes")
    })
}

fn list_openers() -> &'static RegexSet {
    static SET: OnceLock<RegexSet> = OnceLock::new();
    SET.get_or_init(|| {
        RegexSet::new(LIST_OPENERS.iter().map(|p| format!("(?i){p}")))
            .expect("list opener patterns are valid regexes")
    })
}

/// "2." to "4." unless followed by a digit, a line-leading dash/asterisk, or a bullet glyph.
fn enumeration_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)(?:^|\s)[2-4]\.(?:[^0-9]|$)|^\s*[-*]\s|•")
            .expect("enumeration pattern is a valid regex")
    })
}

/// One rejection predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Empty,
    ForbiddenPhrase,
    MetaOpener,
    Enumeration,
    Ungrounded,
    GenericSelfOpener,
}

/// Evaluation order.
pub const RULES: [Rule; 6] = [
    Rule::Empty,
    Rule::ForbiddenPhrase,
    Rule::MetaOpener,
    Rule::Enumeration,
    Rule::Ungrounded,
    Rule::GenericSelfOpener,
];

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Empty => "empty",
            Rule::ForbiddenPhrase => "forbidden_phrase",
            Rule::MetaOpener => "meta_opener",
            Rule::Enumeration => "enumeration",
            Rule::Ungrounded => "ungrounded",
            Rule::GenericSelfOpener => "generic_self_opener",
        }
    }

    /// True if this rule rejects the candidate.
    pub fn rejects(&self, candidate: &Candidate<'_>) -> bool {
        match self {
            Rule::Empty => candidate.trimmed.is_empty(),
            Rule::ForbiddenPhrase => FORBIDDEN_PHRASES
                .iter()
                .any(|phrase| candidate.lower.contains(phrase)),
            Rule::MetaOpener => meta_openers().is_match(candidate.trimmed),
            Rule::Enumeration => {
                list_openers().is_match(candidate.trimmed)
                    || enumeration_marker().is_match(candidate.trimmed)
            }
            Rule::Ungrounded => {
                candidate.trimmed.chars().count() > UNGROUNDED_MIN_CHARS
                    && !candidate.shares_resume_vocabulary
            }
            Rule::GenericSelfOpener => {
                GENERIC_SELF_OPENERS
                    .iter()
                    .any(|opener| candidate.lower.starts_with(opener))
                    && !candidate.shares_resume_vocabulary
            }
        }
    }
}

/// A model answer prepared for rule evaluation.
#[derive(Debug)]
pub struct Candidate<'a> {
    pub trimmed: &'a str,
    pub lower: String,
    pub shares_resume_vocabulary: bool,
}

impl<'a> Candidate<'a> {
    pub fn new(answer: &'a str, resume_text: &str) -> Self {
        let trimmed = answer.trim();
        let resume_tokens = vocabulary(resume_text);
        let shares_resume_vocabulary = vocabulary(trimmed)
            .iter()
            .any(|token| resume_tokens.contains(token));
        Self {
            trimmed,
            lower: trimmed.to_lowercase(),
            shares_resume_vocabulary,
        }
    }
}

/// Lower-cased alphanumeric words of at least `MIN_TOKEN_CHARS` characters.
fn vocabulary(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(Rule),
}

/// Decides whether a resume-mode answer can be returned as is.
pub fn evaluate(answer: &str, resume_text: &str) -> Verdict {
    let candidate = Candidate::new(answer, resume_text);
    RULES
        .iter()
        .find(|rule| rule.rejects(&candidate))
        .map_or(Verdict::Accept, |rule| Verdict::Reject(*rule))
}

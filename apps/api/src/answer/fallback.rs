//! Fallback answer assembled from extracted resume facts.

use crate::answer::facts::ExtractedFacts;

pub const INSUFFICIENT_RESUME: &str =
    "Not enough information in the resume to answer this question.";

/// Result of building a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// At least one fact sentence was assembled.
    WithFacts(String),
    /// Nothing usable in the resume.
    Insufficient,
}

impl Fallback {
    pub fn into_text(self) -> String {
        match self {
            Fallback::WithFacts(text) => text,
            Fallback::Insufficient => INSUFFICIENT_RESUME.to_string(),
        }
    }
}

/// Builds a first-person answer from facts.
///
/// Sentence order: name, role/experience/company, degree, skills. The restated
/// question is appended unless the question asked for an introduction.
pub fn build_fallback(facts: &ExtractedFacts, question: &str, is_intro: bool) -> Fallback {
    let sentences = fact_sentences(facts);
    if sentences.is_empty() {
        return Fallback::Insufficient;
    }

    let mut answer = sentences.join(" ");
    if !is_intro {
        let restated = capitalize(question.trim().trim_end_matches(['?', '.', '!']).trim());
        if !restated.is_empty() {
            answer.push_str(&format!(
                " That is the background I bring to the question \"{restated}\"."
            ));
        }
    }
    Fallback::WithFacts(answer)
}

/// One sentence per fact group, in priority order.
pub fn fact_sentences(facts: &ExtractedFacts) -> Vec<String> {
    let mut sentences = Vec::new();

    if let Some(name) = &facts.name {
        sentences.push(format!("My name is {name}."));
    }
    if let Some(s) = career_sentence(
        facts.role.as_deref(),
        facts.years.as_deref(),
        facts.company.as_deref(),
    ) {
        sentences.push(s);
    }
    if let Some(degree) = &facts.degree {
        sentences.push(format!("I hold {} {degree} degree.", article(degree)));
    }
    if let Some(skills) = &facts.skills {
        sentences.push(format!("My skills include {skills}."));
    }

    sentences
}

fn career_sentence(role: Option<&str>, years: Option<&str>, company: Option<&str>) -> Option<String> {
    let sentence = match (role, years, company) {
        (Some(r), Some(y), Some(c)) => format!(
            "I am {} {r} with {y} years of experience at {c}.",
            article(r)
        ),
        (Some(r), Some(y), None) => {
            format!("I am {} {r} with {y} years of experience.", article(r))
        }
        (Some(r), None, Some(c)) => format!("I am {} {r} at {c}.", article(r)),
        (Some(r), None, None) => format!("I am {} {r}.", article(r)),
        (None, Some(y), Some(c)) => format!("I have {y} years of experience at {c}."),
        (None, Some(y), None) => format!("I have {y} years of experience."),
        (None, None, Some(c)) => format!("I have worked at {c}."),
        (None, None, None) => return None,
    };
    Some(sentence)
}

/// "a" or "an", judged by how the word is spoken. Abbreviations are spelled
/// out letter by letter ("an MBA", "a B.Sc", "an M.Sc").
fn article(word: &str) -> &'static str {
    let first = match word.chars().next() {
        Some(c) => c,
        None => return "a",
    };
    let is_abbreviation = word.contains('.')
        || (word.len() > 1
            && word
                .chars()
                .filter(|c| c.is_alphabetic())
                .all(|c| c.is_uppercase()));
    let vowel_sound = if is_abbreviation {
        "AEFHILMNORSX".contains(first)
    } else {
        "AEIOUaeiou".contains(first)
    };
    if vowel_sound {
        "an"
    } else {
        "a"
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

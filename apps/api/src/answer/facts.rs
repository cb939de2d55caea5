//! Best-effort fact extraction from free-form resume text.
//!
//! The patterns assume loosely labelled resumes (`Name:`, `Skills:`) and common
//! phrasings (`5 years of experience`, `at Acme Corp.`). Anything that looks
//! like a placeholder is dropped rather than echoed back to the user.

use std::sync::OnceLock;

use regex::Regex;

/// Facts pulled from a resume. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFacts {
    pub name: Option<String>,
    pub role: Option<String>,
    /// Digits as written, possibly with a trailing `+` ("5", "10+").
    pub years: Option<String>,
    pub company: Option<String>,
    pub degree: Option<String>,
    pub skills: Option<String>,
}

impl ExtractedFacts {
    pub fn count(&self) -> usize {
        [
            &self.name,
            &self.role,
            &self.years,
            &self.company,
            &self.degree,
            &self.skills,
        ]
        .iter()
        .filter(|f| f.is_some())
        .count()
    }
}

/// Turns resume text into a partial fact set.
///
/// A structured resume parser can replace `HeuristicFactExtractor` without
/// touching the filter or the fallback builder.
pub trait FactExtractor: Send + Sync {
    fn extract(&self, resume_text: &str) -> ExtractedFacts;
}

/// Regex-driven extractor for unstructured resume text.
pub struct HeuristicFactExtractor;

impl FactExtractor for HeuristicFactExtractor {
    fn extract(&self, resume_text: &str) -> ExtractedFacts {
        ExtractedFacts {
            name: extract_name(resume_text),
            role: extract_role(resume_text),
            years: extract_years(resume_text),
            company: extract_company(resume_text),
            degree: extract_degree(resume_text),
            skills: extract_skills(resume_text),
        }
    }
}

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("fact patterns are valid regexes"))
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_name(text: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = regex(&RE, r"(?i)\bname\s*:\s*([^\n.,;|]{1,60})");
    first_capture(re, text).filter(|name| name != "I")
}

fn extract_role(text: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = regex(
        &RE,
        r"(?i)\b((?:(?:senior|junior|lead|principal|staff)\s+)?(?:(?:software|data|backend|frontend|full[- ]stack|devops|machine learning|cloud|qa|test|mobile|web|systems|security|network|product|project)\s+)?(?:engineer|developer|scientist|analyst|architect|designer|manager|consultant|administrator|programmer|intern))\b",
    );
    first_capture(re, text).filter(|role| !role.eq_ignore_ascii_case("engineer"))
}

fn extract_years(text: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = regex(
        &RE,
        r"(?i)\b(\d{1,2}\+?)\s*(?:years?|yrs?)(?:\s+of)?\s+(?:professional\s+)?experience",
    );
    first_capture(re, text)
}

fn extract_company(text: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = regex(
        &RE,
        r"\b[Aa]t\s+([A-Z][\w&'\-]*(?:[ \t]+[A-Z][\w&'\-]*){0,4})\s*(?:[,.\n]|$)",
    );
    first_capture(re, text)
}

fn extract_degree(text: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = regex(
        &RE,
        r"\b((?i:ph\.?d|doctorate|master(?:'s)?|bachelor(?:'s)?|associate(?:'s)?)|MBA|B\.?Sc|M\.?Sc|B\.?Tech|M\.?Tech|B\.?S|M\.?S|B\.?A|M\.?A)\b",
    );
    first_capture(re, text)
}

fn extract_skills(text: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    static SENTENCE_END: OnceLock<Regex> = OnceLock::new();
    let re = regex(&RE, r"(?i)\bskills\s*:\s*([^\n]+)");
    let end = regex(&SENTENCE_END, r"\.(?:\s|$)");

    let line = first_capture(re, text)?;
    let list = match end.find(&line) {
        Some(m) => &line[..m.start()],
        None => line.as_str(),
    };
    let list = list.trim().trim_end_matches([',', ';']).trim();

    if list.is_empty()
        || list.eq_ignore_ascii_case("languages")
        || list.eq_ignore_ascii_case("skills")
    {
        return None;
    }
    Some(list.to_string())
}

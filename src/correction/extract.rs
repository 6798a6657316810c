//! Correction extraction from raw generator output.
//!
//! Model output is unreliable: sometimes a clean JSON object, sometimes prose
//! with numbering, bullets, quotes or explanatory prefixes. Extraction runs an
//! ordered list of strategies (structured parse, freeform heuristics) and
//! stops at the first one that yields candidates; when everything comes up
//! empty the caller still gets a single fallback message, never an error and
//! never an empty list.

use once_cell::sync::Lazy;
use regex::Regex;

/// Sole element of the list returned when no candidate survives.
pub const FALLBACK_MESSAGE: &str = "Unable to generate corrections";

/// How the generator was asked to format its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// A JSON object with a `corrections` array was requested.
    Structured,
    /// Plain text; comma/newline/quote/numbered-list separated.
    Freeform,
}

/// Substrings that betray the model echoing the prompt's example template
/// instead of answering.
const TEMPLATE_ECHOES: &[&str] = &[
    "first corrected",
    "second corrected",
    "third corrected",
    "put the",
    "corrected version",
    "placeholder",
];

/// Substrings that mark an element as an apology, error report or leftover
/// list scaffolding rather than a correction.
const NOISE_MARKERS: &[&str] = &["unable", "cannot", "error", "option"];

static PREAMBLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(here are the corrections?:?\s*|corrected versions?:?\s*|fixed:?\s*|the corrected versions are:?\s*|answer with 3 versions separated by commas:?\s*)",
    )
    .unwrap()
});
static OPTION_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)option \d+[^:]*:?\s*").unwrap());
static LIST_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\.\s*").unwrap());
static TRAILING_CORRECTED_NOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)this is the corrected version[^\n]*$").unwrap());
static TRAILING_HERE_ARE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)here are[^\n]*$").unwrap());
static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]+)""#).unwrap());
static SENTENCE_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\s+[A-Z]").unwrap());
static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s*").unwrap());
static LEADING_DASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-\s*").unwrap());
static LEADING_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[•*]\s*").unwrap());
static LEADING_AND: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^and\s+").unwrap());

/// Extract an ordered list of 1-3 correction candidates from a raw generator
/// response. Total over its input: an absent response, malformed JSON or a
/// response where nothing survives filtering all resolve to the fallback
/// message, never a panic or an empty list.
pub fn extract(raw: Option<&str>, mode: ResponseMode) -> Vec<String> {
    let Some(raw) = raw else {
        return fallback();
    };

    let strategies: &[fn(&str) -> Option<Vec<String>>] = match mode {
        ResponseMode::Structured => &[structured_candidates, freeform_candidates],
        ResponseMode::Freeform => &[freeform_candidates],
    };

    strategies
        .iter()
        .find_map(|strategy| strategy(raw))
        .unwrap_or_else(fallback)
}

fn fallback() -> Vec<String> {
    vec![FALLBACK_MESSAGE.to_string()]
}

/// Parse the response as a JSON object with a `corrections` array.
///
/// A greedy first-`{`-to-last-`}` substring recovers the object when the
/// generator wrapped it in prose. Returns None on parse failure or when no
/// element survives, so the freeform heuristics get their turn.
fn structured_candidates(raw: &str) -> Option<Vec<String>> {
    let trimmed = raw.trim();
    let candidate = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(open), Some(close)) if open < close => &trimmed[open..=close],
        _ => trimmed,
    };

    let value: serde_json::Value = serde_json::from_str(candidate).ok()?;
    let items = value.get("corrections")?.as_array()?;

    let corrections: Vec<String> = items
        .iter()
        .filter_map(|item| item.as_str())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .filter(|text| !echoes_template(text))
        .take(3)
        .map(str::to_string)
        .collect();

    if corrections.is_empty() {
        None
    } else {
        Some(corrections)
    }
}

fn echoes_template(text: &str) -> bool {
    let lower = text.to_lowercase();
    TEMPLATE_ECHOES.iter().any(|echo| lower.contains(echo))
}

/// Heuristic path for plain-text replies: strip boilerplate, pick one
/// splitting strategy, scrub and filter the pieces.
fn freeform_candidates(raw: &str) -> Option<Vec<String>> {
    let cleaned = clean_response(raw);

    let corrections: Vec<String> = split_candidates(&cleaned)
        .iter()
        .map(|element| scrub_element(element))
        .filter(|element| is_viable(element))
        .take(3)
        .collect();

    if !corrections.is_empty() {
        return Some(corrections);
    }

    recover_first_sentence(&cleaned)
}

/// Remove the boilerplate small models wrap around their answers: a leading
/// preamble (once), "Option N:" markers and list numbering (everywhere), and
/// a trailing explanatory sentence.
fn clean_response(raw: &str) -> String {
    let text = raw.trim();
    let text = PREAMBLE.replace(text, "");
    let text = OPTION_MARKER.replace_all(&text, "");
    let text = LIST_NUMBER.replace_all(&text, "");
    let text = TRAILING_CORRECTED_NOTE.replace(&text, "");
    let text = TRAILING_HERE_ARE.replace(&text, "");
    text.trim().to_string()
}

/// Choose exactly one splitting strategy, by delimiter priority: comma, then
/// quoted substrings, then newline, then sentence boundary, else the whole
/// text as a single candidate.
fn split_candidates(cleaned: &str) -> Vec<String> {
    if cleaned.contains(',') {
        cleaned.split(',').map(str::to_string).collect()
    } else if cleaned.contains('"') {
        QUOTED
            .captures_iter(cleaned)
            .map(|captures| captures[1].to_string())
            .collect()
    } else if cleaned.contains('\n') {
        cleaned.split('\n').map(str::to_string).collect()
    } else if SENTENCE_BOUNDARY.is_match(cleaned) {
        split_sentences(cleaned)
    } else {
        vec![cleaned.to_string()]
    }
}

/// Split at `.` + whitespace + uppercase so each sentence keeps its opening
/// letter; the boundary period and whitespace are dropped.
fn split_sentences(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut start = 0;
    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        parts.push(text[start..boundary.start()].to_string());
        // the matched uppercase letter is one byte wide
        start = boundary.end() - 1;
    }
    parts.push(text[start..].to_string());
    parts
}

/// Per-element cleanup: surrounding quotes, leading numbering/dash/bullet,
/// one trailing period, a leading "and".
fn scrub_element(element: &str) -> String {
    let text = element.trim();
    let text = text.strip_prefix(['"', '\'']).unwrap_or(text);
    let text = text.strip_suffix(['"', '\'']).unwrap_or(text);
    let text = LEADING_NUMBER.replace(text, "");
    let text = LEADING_DASH.replace(&text, "");
    let text = LEADING_BULLET.replace(&text, "");
    let text = text.strip_suffix('.').map(str::to_string).unwrap_or_else(|| text.to_string());
    let text = LEADING_AND.replace(&text, "");
    text.trim().to_string()
}

fn is_viable(element: &str) -> bool {
    let length = element.chars().count();
    if length <= 2 || length >= 200 {
        return false;
    }
    let lower = element.to_lowercase();
    !NOISE_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Last resort before the fallback message: take the first sentence of the
/// cleaned text if it has a displayable length.
fn recover_first_sentence(cleaned: &str) -> Option<Vec<String>> {
    let first = cleaned
        .split(['.', '!', '?'])
        .next()
        .unwrap_or_default()
        .trim();
    let length = first.chars().count();
    if length > 0 && length < 200 {
        Some(vec![first.to_string()])
    } else {
        None
    }
}

//! Literal-text intent checks that run before any model call.

use regex::Regex;
use std::sync::LazyLock;

static GREETING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^((hi|hello|hey|hiya|howdy|yo|sup)( there)?|(good morning|good afternoon|good evening|morning|afternoon|evening))([!.,]?)$",
    )
    .expect("valid greeting regex")
});

const FOLLOWUP_WORDS: [&str; 5] = ["yes", "no", "yep", "yeah", "nah"];

static DATE_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(today|tomorrow|yesterday|next week|this week|next month|this month|monday|tuesday|wednesday|thursday|friday|saturday|sunday|jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)\b",
    )
    .expect("valid date word regex")
});

static NUMERIC_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{1,2}[/-]\d{1,2}([/-]\d{2,4})?\b").expect("valid numeric date regex")
});

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d+(\.\d+)?\s*(hours?|hrs?)\b").expect("valid duration regex")
});

static DAY_FRACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(half|full)\s*day\b").expect("valid day fraction regex"));

static LEAVE_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(sick|vacation|pto|personal|bereavement|jury)\b").expect("valid leave type regex")
});

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Whole-message greeting such as "hi", "Hello there!" or "good morning.".
pub fn is_greeting(text: &str) -> bool {
    let text = normalize(text);
    !text.is_empty() && GREETING_RE.is_match(&text)
}

/// Short answer that plausibly continues a pending Workday question:
/// a bare yes/no, a date, a duration, or a leave type.
pub fn looks_like_workday_followup(text: &str) -> bool {
    let text = normalize(text);
    if text.is_empty() {
        return false;
    }
    if FOLLOWUP_WORDS.contains(&text.as_str()) {
        return true;
    }

    [
        &*DATE_WORD_RE,
        &*NUMERIC_DATE_RE,
        &*DURATION_RE,
        &*DAY_FRACTION_RE,
        &*LEAVE_TYPE_RE,
    ]
    .iter()
    .any(|re| re.is_match(&text))
}

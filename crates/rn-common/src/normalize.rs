use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::warn;
use unicode_normalization::UnicodeNormalization;

use crate::RawJobPosting;

static RE_HTML_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?(?:p|div|br|li|ul|ol|span|strong|b|em|h[1-6]|table|a)\b").unwrap());

static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// html2text renders <strong>/<em> as `**x**` / `*x*`.
static RE_EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*{1,2}").unwrap());

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Lower-cased, whitespace-collapsed view of one posting's free-text fields.
///
/// Every classifier reads from this instead of the raw strings so they all
/// see the same normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCorpus {
    pub title: String,
    pub description: String,
    pub location: String,
    pub employment_type: String,
}

impl SearchCorpus {
    pub fn new(title: &str, description: &str, location: &str, employment_type: &str) -> Self {
        Self {
            title: normalize_text(title),
            description: normalize_text(&html_to_text(description)),
            location: normalize_text(location),
            employment_type: normalize_text(employment_type),
        }
    }

    pub fn from_posting(raw: &RawJobPosting) -> Self {
        let mut location = raw.location_text.clone();
        for extra in &raw.additional_locations {
            location.push_str(" | ");
            location.push_str(extra);
        }

        Self::new(
            &raw.title,
            &raw.description,
            &location,
            &raw.employment_type_text(),
        )
    }

    /// Title and location only, the fields employers curate.
    pub fn title_and_location(&self) -> String {
        join_non_empty(&[&self.title, &self.location])
    }

    pub fn combined(&self) -> String {
        join_non_empty(&[
            &self.title,
            &self.description,
            &self.location,
            &self.employment_type,
        ])
    }
}

fn join_non_empty(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

/// NFKC, lower-case, trim, and collapse whitespace runs to one space.
pub fn normalize_text(input: &str) -> String {
    let folded: String = input.nfkc().collect::<String>().to_lowercase();
    RE_WHITESPACE.replace_all(folded.trim(), " ").into_owned()
}

/// Converts an HTML description to plain text. Plain text passes through.
pub fn html_to_text(raw: &str) -> String {
    if !RE_HTML_HINT.is_match(raw) {
        return raw.to_string();
    }

    match html2text::from_read(raw.as_bytes(), usize::MAX) {
        Ok(text) => RE_EMPHASIS.replace_all(&text, "").into_owned(),
        Err(err) => {
            warn!(error = %err, "html2text failed; stripping tags instead");
            RE_TAG.replace_all(raw, " ").into_owned()
        }
    }
}

/// Stable dedup key for postings without a source job id: SHA-256 over the
/// normalized employer, title and location, first 16 hex chars.
pub fn calculate_job_fingerprint(employer: &str, title: &str, location: &str) -> String {
    let key = format!(
        "{}|{}|{}",
        normalize_text(employer),
        normalize_text(title),
        normalize_text(location)
    );
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    let bytes = hasher.finalize();
    let mut hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    hex.truncate(16);
    hex
}

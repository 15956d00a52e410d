use lazy_static::lazy_static;

use crate::classification::Classification;
use crate::normalize::normalize_text;
use crate::rules::{Rule, RuleTable};

lazy_static! {
    /// Titles and time-type fields carry bare words ("ICU RN - Nights").
    pub static ref SHIFT_TITLE_RULES: RuleTable<&'static str> = RuleTable::new(vec![
        Rule::new("rotating", r"\brotat(?:ing|e|ion)\b|\bdays?\s*/\s*nights?\b", "Rotating"),
        Rule::new("night", r"\bnights?\b|\bnoc\b|\bnocturnal\b|\b(?:7|7:00)\s*p(?:m)?\s*-\s*(?:7|7:00)\s*a(?:m)?\b", "Night"),
        Rule::new("evening", r"\bevenings?\b|\bpm\s+shift\b|\bswing\b", "Evening"),
        Rule::new("weekend", r"\bweekends?\b|\bbaylor\b", "Weekend"),
        Rule::new("day", r"\bdays\b|\bday\s+shift\b|\b(?:7|7:00)\s*a(?:m)?\s*-\s*(?:7|7:00)\s*p(?:m)?\b", "Day"),
        Rule::new("variable", r"\bvariable\b|\bvaries\b|\bflexible\s+shifts?\b", "Variable"),
    ]);

    /// Description text only counts when "shift" is spelled out.
    pub static ref SHIFT_TEXT_RULES: RuleTable<&'static str> = RuleTable::new(vec![
        Rule::new("rotating", r"\brotating\s+shifts?\b", "Rotating"),
        Rule::new("night", r"\bnight\s+shifts?\b|\bnoc\s+shifts?\b", "Night"),
        Rule::new("evening", r"\bevening\s+shifts?\b|\bswing\s+shifts?\b", "Evening"),
        Rule::new("weekend", r"\bweekend\s+shifts?\b|\bweekend\s+option\b", "Weekend"),
        Rule::new("day", r"\bday\s+shifts?\b", "Day"),
        Rule::new("variable", r"\bvariable\s+shifts?\b", "Variable"),
    ]);
}

/// Shift type from title, then employment/time-type text, then explicit
/// "<x> shift" phrases in the description.
pub fn classify_shift(title: &str, description: &str, employment_type: &str) -> Classification<String> {
    let title = normalize_text(title);
    let employment_type = normalize_text(employment_type);
    let description = normalize_text(description);

    SHIFT_TITLE_RULES
        .label_for(&title)
        .or_else(|| SHIFT_TITLE_RULES.label_for(&employment_type))
        .or_else(|| SHIFT_TEXT_RULES.label_for(&description))
        .map(str::to_string)
        .into()
}

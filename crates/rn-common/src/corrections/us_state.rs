use std::collections::HashMap;

use lazy_static::lazy_static;

lazy_static! {
    /// Lower-case state name -> USPS code
    pub static ref STATE_NAME_TO_CODE: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("alabama", "AL"); m.insert("alaska", "AK"); m.insert("arizona", "AZ");
        m.insert("arkansas", "AR"); m.insert("california", "CA"); m.insert("colorado", "CO");
        m.insert("connecticut", "CT"); m.insert("delaware", "DE"); m.insert("florida", "FL");
        m.insert("georgia", "GA"); m.insert("hawaii", "HI"); m.insert("idaho", "ID");
        m.insert("illinois", "IL"); m.insert("indiana", "IN"); m.insert("iowa", "IA");
        m.insert("kansas", "KS"); m.insert("kentucky", "KY"); m.insert("louisiana", "LA");
        m.insert("maine", "ME"); m.insert("maryland", "MD"); m.insert("massachusetts", "MA");
        m.insert("michigan", "MI"); m.insert("minnesota", "MN"); m.insert("mississippi", "MS");
        m.insert("missouri", "MO"); m.insert("montana", "MT"); m.insert("nebraska", "NE");
        m.insert("nevada", "NV"); m.insert("new hampshire", "NH"); m.insert("new jersey", "NJ");
        m.insert("new mexico", "NM"); m.insert("new york", "NY"); m.insert("north carolina", "NC");
        m.insert("north dakota", "ND"); m.insert("ohio", "OH"); m.insert("oklahoma", "OK");
        m.insert("oregon", "OR"); m.insert("pennsylvania", "PA"); m.insert("rhode island", "RI");
        m.insert("south carolina", "SC"); m.insert("south dakota", "SD"); m.insert("tennessee", "TN");
        m.insert("texas", "TX"); m.insert("utah", "UT"); m.insert("vermont", "VT");
        m.insert("virginia", "VA"); m.insert("washington", "WA"); m.insert("west virginia", "WV");
        m.insert("wisconsin", "WI"); m.insert("wyoming", "WY");
        m.insert("district of columbia", "DC"); m.insert("washington dc", "DC");
        m.insert("washington d.c.", "DC"); m.insert("puerto rico", "PR");
        m
    };

    /// Every accepted USPS code
    pub static ref STATE_CODES: Vec<&'static str> = {
        let mut codes: Vec<_> = STATE_NAME_TO_CODE.values().copied().collect();
        codes.sort_unstable();
        codes.dedup();
        codes
    };
}

/// State correction: code, full name, or "<X> State" -> USPS code.
///
/// "WA State" and "Washington State" both become "WA". Anything else is None;
/// no guessing from prefixes.
pub fn correct_state(input: &str) -> Option<String> {
    let trimmed = input.trim().trim_end_matches(['.', ',']).trim();
    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_lowercase();
    let base = lower
        .strip_suffix(" state")
        .map(str::trim)
        .unwrap_or(lower.as_str());

    if base.len() == 2 {
        let upper = base.to_ascii_uppercase();
        if STATE_CODES.contains(&upper.as_str()) {
            return Some(upper);
        }
        return None;
    }

    STATE_NAME_TO_CODE.get(base).map(|code| code.to_string())
}

pub fn is_state_code(input: &str) -> bool {
    let trimmed = input.trim();
    trimmed.len() == 2 && STATE_CODES.contains(&trimmed.to_ascii_uppercase().as_str())
}

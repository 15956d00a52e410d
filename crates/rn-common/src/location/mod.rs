pub mod facilities;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::corrections::us_state::correct_state;

pub use facilities::{FacilityDirectory, FacilityLocation, FacilityTables};

/// City placeholder stored for "Remote-XX" postings.
pub const REMOTE_CITY: &str = "Remote";

lazy_static! {
    static ref REMOTE_PREFIX_RE: Regex =
        Regex::new(r"(?i)^\(?remote\)?(?:\s*[-–—:,/|(]\s*(.*?)\)?)?$").unwrap();
    static ref REMOTE_SUFFIX_RE: Regex =
        Regex::new(r"(?i)^(.+?)\s*[-–—:,/|(]\s*remote\)?$").unwrap();
    /// "Seattle, WA - Non-Remote", "Seattle, WA (Not Remote)".
    static ref NEGATED_REMOTE_RE: Regex =
        Regex::new(r"(?i)\s*(?:[-–—:,/|]\s*|\(\s*)?\b(?:non|not|no)[- ]remote\b\s*\)?").unwrap();
    /// Words that name a building or campus, never a city.
    static ref NON_CITY_RE: Regex = Regex::new(
        r"(?i)\b(?:campus|building|bldg|floor|suite|ste|tower|wing|pavilion|annex|hospital|clinic|office|unit|main|facility|site)\b"
    )
    .unwrap();
    static ref MULTI_LOCATION_RE: Regex =
        Regex::new(r"(?i)^(?:\d+|multiple)\s+locations?$").unwrap();
    /// Workday "US-WA-Seattle" / "USA - Washington - Seattle".
    static ref COUNTRY_STATE_CITY_RE: Regex =
        Regex::new(r"(?i)^(?:us|usa|united\s+states)\s*[-,:]\s*([a-z .]+?)\s*[-,:]\s*(.+)$").unwrap();
    static ref DASH_SPLIT_RE: Regex = Regex::new(r"\s*[-–—]\s*").unwrap();
    static ref ZIP_SUFFIX_RE: Regex = Regex::new(r"\s+\d{5}(?:-\d{4})?$").unwrap();
    static ref CITY_NOISE_RE: Regex = Regex::new(r"[\s.,;:]+$").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedLocation {
    pub city: Option<String>,
    pub state: Option<String>,
    pub is_remote: bool,
}

impl ParsedLocation {
    fn place(city: String, state: String) -> Self {
        Self {
            city: Some(city),
            state: Some(state),
            is_remote: false,
        }
    }

    fn remote(place: Option<ParsedLocation>) -> Self {
        match place {
            Some(place) => Self {
                is_remote: true,
                ..place
            },
            None => Self {
                is_remote: true,
                ..Self::default()
            },
        }
    }

    pub fn has_place(&self) -> bool {
        self.city.is_some() && self.state.is_some()
    }
}

/// Secondary signals used when the location text alone is ambiguous.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationHints<'a> {
    pub additional_locations: &'a [String],
    /// Workday `externalPath`, e.g. "/job/Seattle-WA/Registered-Nurse_R123".
    pub external_path: Option<&'a str>,
}

pub fn parse_location(raw: &str, directory: Option<&FacilityDirectory>) -> ParsedLocation {
    parse_location_with_hints(raw, LocationHints::default(), directory)
}

/// Parses free-form location text into city/state.
///
/// City and state are either both set or both `None`. The employer directory
/// is consulted only after the text itself fails to parse.
pub fn parse_location_with_hints(
    raw: &str,
    hints: LocationHints<'_>,
    directory: Option<&FacilityDirectory>,
) -> ParsedLocation {
    let collapsed = WHITESPACE_RE.replace_all(raw.trim(), " ");
    let affirmed = NEGATED_REMOTE_RE.replace_all(&collapsed, " ");
    let text: &str = affirmed.trim();

    if let Some(parsed) = parse_remote(text, directory) {
        return parsed;
    }

    if !text.is_empty() && !MULTI_LOCATION_RE.is_match(text) {
        if let Some(parsed) = parse_place(text, directory) {
            return parsed;
        }
        if let Some(parsed) = lookup_facility(text, directory) {
            return parsed;
        }
    }

    match disambiguate(hints, directory) {
        Some(parsed) => parsed,
        None => {
            debug!(raw = %raw, "location unresolved");
            ParsedLocation::default()
        }
    }
}

/// "Remote", "Remote-CA", "Remote - Washington", "Seattle, WA (Remote)".
fn parse_remote(text: &str, directory: Option<&FacilityDirectory>) -> Option<ParsedLocation> {
    let rest = if let Some(caps) = REMOTE_PREFIX_RE.captures(text) {
        caps.get(1).map(|m| m.as_str()).unwrap_or("")
    } else {
        REMOTE_SUFFIX_RE.captures(text)?.get(1)?.as_str()
    };
    let rest = rest.trim();

    if rest.is_empty() {
        return Some(ParsedLocation::remote(None));
    }

    if let Some(state) = correct_state(rest) {
        return Some(ParsedLocation::remote(Some(ParsedLocation::place(
            REMOTE_CITY.to_string(),
            state,
        ))));
    }

    Some(ParsedLocation::remote(parse_place(rest, directory)))
}

fn parse_place(text: &str, directory: Option<&FacilityDirectory>) -> Option<ParsedLocation> {
    parse_country_state_city(text)
        .or_else(|| parse_comma_separated(text, directory))
        .or_else(|| parse_dash_separated(text, directory))
        .or_else(|| lookup_city(text, directory))
}

fn parse_country_state_city(text: &str) -> Option<ParsedLocation> {
    let caps = COUNTRY_STATE_CITY_RE.captures(text)?;
    let state = correct_state(&caps[1])?;
    let city = tidy_city(&caps[2])?;
    Some(ParsedLocation::place(city, state))
}

/// "City, ST", "City, State 98104", "City, ST, USA", "Facility, City, ST".
fn parse_comma_separated(
    text: &str,
    directory: Option<&FacilityDirectory>,
) -> Option<ParsedLocation> {
    let parts: Vec<&str> = text
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    if parts.len() < 2 {
        return None;
    }

    for pair in parts.windows(2) {
        let candidate = ZIP_SUFFIX_RE.replace(pair[1], "");
        if let Some(state) = correct_state(&candidate) {
            let city = tidy_city(pair[0])?;
            return Some(ParsedLocation::place(city, state));
        }
    }

    lookup_city(parts[0], directory)
}

/// "Seattle-WA", "WA-Seattle", "Seattle - 325 9th Ave".
fn parse_dash_separated(
    text: &str,
    directory: Option<&FacilityDirectory>,
) -> Option<ParsedLocation> {
    let mut pieces = DASH_SPLIT_RE.splitn(text, 2);
    let left = pieces.next()?.trim();
    let right = pieces.next()?.trim();
    if left.is_empty() || right.is_empty() {
        return None;
    }

    if let Some(state) = correct_state(right) {
        return Some(ParsedLocation::place(city_shaped(left)?, state));
    }
    if let Some(state) = correct_state(left) {
        if let Some(city) = city_shaped(right) {
            return Some(ParsedLocation::place(city, state));
        }
    }

    // City-AddressFragment: only the leading city is trusted, and its state
    // has to come from the employer's directory.
    lookup_city(left, directory)
}

fn lookup_city(city: &str, directory: Option<&FacilityDirectory>) -> Option<ParsedLocation> {
    let state = directory?.state_for_city(city)?;
    Some(ParsedLocation::place(tidy_city(city)?, state.to_string()))
}

fn lookup_facility(text: &str, directory: Option<&FacilityDirectory>) -> Option<ParsedLocation> {
    let found = directory?.find_facility(text)?;
    debug!(text = %text, city = %found.city, "location from facility directory");
    Some(ParsedLocation::place(
        tidy_city(&found.city)?,
        found.state.clone(),
    ))
}

/// "N Locations" and empty text: additional locations that all agree, then
/// the Workday path segment.
fn disambiguate(
    hints: LocationHints<'_>,
    directory: Option<&FacilityDirectory>,
) -> Option<ParsedLocation> {
    from_additional_locations(hints.additional_locations, directory)
        .or_else(|| from_external_path(hints.external_path?, directory))
}

fn from_additional_locations(
    locations: &[String],
    directory: Option<&FacilityDirectory>,
) -> Option<ParsedLocation> {
    let mut agreed: Option<ParsedLocation> = None;
    for raw in locations {
        let text = raw.trim();
        if text.is_empty() {
            continue;
        }
        let parsed = parse_place(text, directory).or_else(|| lookup_facility(text, directory))?;
        match &agreed {
            None => agreed = Some(parsed),
            Some(previous) if previous.city == parsed.city && previous.state == parsed.state => {}
            Some(_) => return None,
        }
    }
    agreed
}

fn from_external_path(path: &str, directory: Option<&FacilityDirectory>) -> Option<ParsedLocation> {
    let segment = path
        .split('/')
        .skip_while(|part| !part.eq_ignore_ascii_case("job"))
        .nth(1)?;

    let tokens: Vec<&str> = segment.split('-').filter(|t| !t.is_empty()).collect();
    let (last, head) = tokens.split_last()?;
    if !head.is_empty() && last.len() == 2 {
        if let Some(state) = correct_state(last) {
            return Some(ParsedLocation::place(tidy_city(&head.join(" "))?, state));
        }
    }

    let joined = tokens.join(" ");
    lookup_city(&joined, directory).or_else(|| lookup_facility(&joined, directory))
}

/// A dash-separated side may be a campus or building rather than a city.
fn city_shaped(raw: &str) -> Option<String> {
    if NON_CITY_RE.is_match(raw) {
        return None;
    }
    tidy_city(raw)
}

/// Trims punctuation and title-cases single-case input ("SEATTLE", "seattle").
fn tidy_city(raw: &str) -> Option<String> {
    let collapsed = WHITESPACE_RE.replace_all(raw.trim(), " ");
    let city = CITY_NOISE_RE.replace(&collapsed, "").into_owned();
    if city.is_empty() || city.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let letters = city.chars().filter(|c| c.is_alphabetic());
    let single_case = letters.clone().all(char::is_lowercase) || letters.clone().all(char::is_uppercase);
    if !single_case {
        return Some(city);
    }

    Some(
        city.split(' ')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" "),
    )
}

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use strum::AsRefStr;
use tracing::{debug, warn};

use crate::config::SalaryConfig;

/// Hours in a full-time year; hourly and annual figures convert through it.
pub const HOURS_PER_YEAR: f64 = 2080.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SalaryType {
    Hourly,
    Annual,
    Weekly,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParsedSalary {
    pub min: f64,
    pub max: f64,
    #[serde(rename = "type")]
    pub salary_type: SalaryType,
}

/// Hourly/annual views of a salary. All `None` for weekly rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedSalary {
    pub min_hourly: Option<f64>,
    pub max_hourly: Option<f64>,
    pub min_annual: Option<f64>,
    pub max_annual: Option<f64>,
}

impl ParsedSalary {
    pub fn derived(&self) -> DerivedSalary {
        match self.salary_type {
            SalaryType::Hourly => DerivedSalary {
                min_hourly: Some(round_cents(self.min)),
                max_hourly: Some(round_cents(self.max)),
                min_annual: Some(round_cents(self.min * HOURS_PER_YEAR)),
                max_annual: Some(round_cents(self.max * HOURS_PER_YEAR)),
            },
            SalaryType::Annual => DerivedSalary {
                min_hourly: Some(round_cents(self.min / HOURS_PER_YEAR)),
                max_hourly: Some(round_cents(self.max / HOURS_PER_YEAR)),
                min_annual: Some(round_cents(self.min)),
                max_annual: Some(round_cents(self.max)),
            },
            SalaryType::Weekly => DerivedSalary::default(),
        }
    }
}

lazy_static! {
    static ref DOLLAR_AMOUNT_RE: Regex =
        Regex::new(r"(?i)\$\s*((?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?)(\s*k\b)?").unwrap();
    static ref PLAIN_AMOUNT_RE: Regex =
        Regex::new(r"(?i)\b((?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?)(\s*k\b)?").unwrap();
    /// Text allowed between the two ends of a range: "$30 - $45", "$30/hr to $45/hr".
    static ref RANGE_GAP_RE: Regex = Regex::new(
        r"(?i)^\s*(?:/\s*|per\s+)?(?:hr|hour|hourly|yr|year|annually|wk|week)?\s*(?:-|–|—|to|and)\s*$"
    )
    .unwrap();
    static ref UNIT_RE: Regex = Regex::new(
        r"(?i)\b(?:(?P<hourly>hour(?:ly)?|hrs?)|(?P<weekly>week(?:ly)?|wk|wkly)|(?P<annual>year(?:ly)?|annual(?:ly)?|annum|yr|salaried))\b"
    )
    .unwrap();
    /// What may sit between an amount and the unit describing it: "$45/hr", "$45 per hour".
    static ref ATTACHED_UNIT_GAP_RE: Regex =
        Regex::new(r"(?i)^\s*(?:/|per|an?|each|every)?\s*$").unwrap();
}

/// Parses with the default bounds and threshold.
pub fn parse_salary(text: &str) -> Option<ParsedSalary> {
    parse_salary_with(text, &SalaryConfig::default())
}

/// Extracts `{min, max, type}` from compensation text.
///
/// Dollar-prefixed amounts are preferred; bare numbers are only read when a
/// unit keyword is present. A unit attached to the amounts ("/hr", "per year")
/// is final. Otherwise keywords after the amounts, then anywhere, then the
/// magnitude are tried in turn, and the first whose bounds hold wins, so a
/// schedule note like "(40 hrs/week)" does not retype an annual range.
pub fn parse_salary_with(text: &str, config: &SalaryConfig) -> Option<ParsedSalary> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (amounts, amounts_end) = match extract_amounts(&DOLLAR_AMOUNT_RE, text) {
        Some(found) => found,
        None if UNIT_RE.is_match(text) => extract_amounts(&PLAIN_AMOUNT_RE, text)?,
        None => return None,
    };

    let (min, max) = match amounts {
        (low, Some(high)) if high < low => (high, low),
        (low, Some(high)) => (low, high),
        (only, None) => (only, only),
    };

    let fits = |salary_type: &SalaryType| {
        let (lower, upper) = config.bounds(*salary_type);
        min >= lower && max <= upper
    };

    let salary_type = match attached_unit(text, amounts_end) {
        Some(attached) => Some(attached).filter(fits),
        None => keyword_units(&text[amounts_end..])
            .chain(keyword_units(text))
            .chain(infer_from_magnitude(min, max, config))
            .find(fits),
    };

    let Some(salary_type) = salary_type else {
        warn!(text, min, max, "no plausible salary unit, discarded");
        return None;
    };
    debug!(text, salary_type = salary_type.as_ref(), "salary parsed");

    Some(ParsedSalary {
        min,
        max,
        salary_type,
    })
}

/// First amount, plus a second one if it continues a range. Returns the byte
/// offset where the last used amount ends.
fn extract_amounts(re: &Regex, text: &str) -> Option<((f64, Option<f64>), usize)> {
    let mut matches = re.captures_iter(text);
    let first = matches.next()?;
    let first_value = amount_value(&first)?;
    let first_end = first.get(0)?.end();

    if let Some(second) = matches.next() {
        let second_match = second.get(0)?;
        if RANGE_GAP_RE.is_match(&text[first_end..second_match.start()]) {
            if let Some(second_value) = amount_value(&second) {
                return Some(((first_value, Some(second_value)), second_match.end()));
            }
        }
    }

    Some(((first_value, None), first_end))
}

fn amount_value(caps: &Captures<'_>) -> Option<f64> {
    let digits: String = caps
        .get(1)?
        .as_str()
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let value = digits.parse::<f64>().ok()?;
    let multiplier = if caps.get(2).is_some() { 1_000.0 } else { 1.0 };
    Some(value * multiplier)
}

fn attached_unit(text: &str, offset: usize) -> Option<SalaryType> {
    let rest = &text[offset..];
    let caps = UNIT_RE.captures(rest)?;
    if !ATTACHED_UNIT_GAP_RE.is_match(&rest[..caps.get(0)?.start()]) {
        return None;
    }
    Some(unit_type(&caps))
}

fn keyword_units(text: &str) -> impl Iterator<Item = SalaryType> + '_ {
    UNIT_RE.captures_iter(text).map(|caps| unit_type(&caps))
}

fn unit_type(caps: &Captures<'_>) -> SalaryType {
    if caps.name("hourly").is_some() {
        SalaryType::Hourly
    } else if caps.name("weekly").is_some() {
        SalaryType::Weekly
    } else {
        SalaryType::Annual
    }
}

/// Weekly is never inferred.
fn infer_from_magnitude(min: f64, max: f64, config: &SalaryConfig) -> Option<SalaryType> {
    if max < config.hourly_threshold {
        Some(SalaryType::Hourly)
    } else if min >= config.annual_floor_magnitude {
        Some(SalaryType::Annual)
    } else {
        None
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salary(min: f64, max: f64, salary_type: SalaryType) -> Option<ParsedSalary> {
        Some(ParsedSalary {
            min,
            max,
            salary_type,
        })
    }

    #[test]
    fn hourly_range_with_keyword() {
        assert_eq!(
            parse_salary("$31.66 - $61.35/Hourly"),
            salary(31.66, 61.35, SalaryType::Hourly)
        );
        assert_eq!(
            parse_salary("Pay Range: $45.00/hr to $68.50/hr"),
            salary(45.0, 68.5, SalaryType::Hourly)
        );
    }

    #[test]
    fn weekly_rate_has_no_derived_fields() {
        let parsed = parse_salary("$2,902/week").unwrap();
        assert_eq!(parsed, ParsedSalary { min: 2902.0, max: 2902.0, salary_type: SalaryType::Weekly });
        assert_eq!(parsed.derived(), DerivedSalary::default());
    }

    #[test]
    fn implausible_values_are_discarded() {
        assert_eq!(parse_salary("$5/Hourly"), None);
        assert_eq!(parse_salary("$900/hour"), None);
        assert_eq!(parse_salary("$12,000 per year"), None);
        assert_eq!(parse_salary("$50/week"), None);
    }

    #[test]
    fn single_amount_sets_min_equal_max() {
        assert_eq!(
            parse_salary("$52.10 per hour"),
            salary(52.1, 52.1, SalaryType::Hourly)
        );
    }

    #[test]
    fn magnitude_fallback_without_keyword() {
        assert_eq!(parse_salary("$38 - $55"), salary(38.0, 55.0, SalaryType::Hourly));
        assert_eq!(
            parse_salary("$85,000 - $120,000"),
            salary(85_000.0, 120_000.0, SalaryType::Annual)
        );
        assert_eq!(parse_salary("$450"), None);
    }

    #[test]
    fn threshold_is_configurable() {
        let config = SalaryConfig {
            hourly_threshold: 100.0,
            ..SalaryConfig::default()
        };
        assert_eq!(parse_salary_with("$150", &config), None);
        assert_eq!(parse_salary_with("$90", &config), salary(90.0, 90.0, SalaryType::Hourly));
    }

    #[test]
    fn k_suffix_and_annual_keyword() {
        assert_eq!(
            parse_salary("$85k - $110k annually"),
            salary(85_000.0, 110_000.0, SalaryType::Annual)
        );
    }

    #[test]
    fn plain_numbers_need_a_unit_keyword() {
        assert_eq!(
            parse_salary("42.50 - 60.00 per hour"),
            salary(42.5, 60.0, SalaryType::Hourly)
        );
        assert_eq!(parse_salary("Competitive pay, 403(b) match"), None);
    }

    #[test]
    fn unit_after_amounts_beats_earlier_keyword() {
        assert_eq!(
            parse_salary("Weekly pay schedule. Rate: $48/hour"),
            salary(48.0, 48.0, SalaryType::Hourly)
        );
    }

    #[test]
    fn schedule_hours_do_not_retype_an_annual_range() {
        assert_eq!(
            parse_salary("$85,000 - $110,000 (40 hrs/week)"),
            salary(85_000.0, 110_000.0, SalaryType::Annual)
        );
        assert_eq!(
            parse_salary("$48 - $62, 36 hours per week"),
            salary(48.0, 62.0, SalaryType::Hourly)
        );
    }

    #[test]
    fn attached_unit_is_final_even_when_out_of_bounds() {
        assert_eq!(parse_salary("$95,000/hour (40 hrs/week)"), None);
    }

    #[test]
    fn unrelated_second_amount_is_not_a_range() {
        assert_eq!(
            parse_salary("$40/hr plus $5 night differential"),
            salary(40.0, 40.0, SalaryType::Hourly)
        );
    }

    #[test]
    fn reversed_range_is_ordered() {
        assert_eq!(parse_salary("$60 - $40 hourly"), salary(40.0, 60.0, SalaryType::Hourly));
    }

    #[test]
    fn derived_fields_use_2080_hours() {
        let hourly = parse_salary("$31.66 - $61.35/Hourly").unwrap().derived();
        assert_eq!(hourly.min_annual, Some(65_852.8));
        assert_eq!(hourly.max_annual, Some(127_608.0));
        assert_eq!(hourly.min_hourly, Some(31.66));

        let annual = parse_salary("$104,000/year").unwrap().derived();
        assert_eq!(annual.min_hourly, Some(50.0));
        assert_eq!(annual.max_annual, Some(104_000.0));
    }

    #[test]
    fn empty_text_is_none() {
        assert_eq!(parse_salary(""), None);
        assert_eq!(parse_salary("   "), None);
    }
}

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::AsRefStr;
use tracing::debug;

use crate::classification::Classification;
use crate::normalize::SearchCorpus;
use crate::rules::{Rule, RuleTable};

/// Work arrangement ENUM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WorkArrangement {
    Remote,
    Hybrid,
    Onsite,
}

/// Cascade step that produced a decision, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WorkArrangementRule {
    ExplicitTitleOrLocation,
    StrongRemotePhrase,
    HybridPhrase,
    ExplicitOnsite,
    BedsideInference,
    PotentiallyRemoteRole,
    NoSignal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkArrangementDecision {
    pub arrangement: Classification<WorkArrangement>,
    pub rule: WorkArrangementRule,
    /// Name of the table entry that fired, when the step is table-driven.
    pub matched: Option<&'static str>,
}

impl WorkArrangementDecision {
    fn new(
        arrangement: Classification<WorkArrangement>,
        rule: WorkArrangementRule,
        matched: Option<&'static str>,
    ) -> Self {
        Self {
            arrangement,
            rule,
            matched,
        }
    }
}

lazy_static! {
    /// "remote" in these phrases is not about where the nurse works.
    static ref REMOTE_FALSE_POSITIVES: Regex = Regex::new(
        r"(?i)\bremote\s+(?:patient\s+|cardiac\s+|physiologic(?:al)?\s+|telemetry\s+)?monitor(?:ing|s)?\b(?:\s+tech\w*)?|\bremote\s+telemetry\b|\bremote\s+access\b|\bremote\s+(?:areas?|communit(?:y|ies)|regions?)\b|\b(?:non|not|no)[- ]remote\b"
    )
    .unwrap();

    static ref STRONG_REMOTE_RULES: RuleTable<WorkArrangement> = RuleTable::new(vec![
        Rule::new(
            "fully_remote",
            r"\b(?:100\s?%|fully|completely|entirely|permanently|full[- ]time)\s+remote\b",
            WorkArrangement::Remote,
        ),
        Rule::new(
            "work_from_home",
            r"\bwork(?:ing)?[- ]from[- ]home\b|\bwfh\b",
            WorkArrangement::Remote,
        ),
        Rule::new("telecommute", r"\btele-?commut\w*", WorkArrangement::Remote),
        Rule::new(
            "virtual_position",
            r"\bvirtual\s+(?:position|role|job|opportunity)\b",
            WorkArrangement::Remote,
        ),
        Rule::new(
            "remote_position",
            r"\bremote\s+(?:position|role|job|opportunity)\b|\bremote[- ]based\b",
            WorkArrangement::Remote,
        )
        .unless(r"\b(?:not|never)\s+(?:a\s+|an?\s+)?remote\s+(?:position|role|job|opportunity)\b"),
        Rule::new("work_remotely", r"\bwork\s+remotely\b", WorkArrangement::Remote)
            .unless(r"\b(?:not|cannot|can't|unable\s+to)\s+(?:be\s+)?work(?:ed)?\s+remotely\b"),
        Rule::new("home_based", r"\bhome[- ]based\s+(?:position|role|job|nurse|rn)\b", WorkArrangement::Remote),
    ]);

    static ref HYBRID_RULES: RuleTable<WorkArrangement> = RuleTable::new(vec![
        Rule::new("hybrid", r"\bhybrid\b", WorkArrangement::Hybrid)
            .unless(r"\bhybrid\s+(?:or|operating|suite|cath|lab|room|procedure)\b"),
        Rule::new(
            "partial_remote",
            r"\bpartial(?:ly)?[- ]remote\b|\bremote\s+part\s+of\s+the\s+(?:time|week)\b",
            WorkArrangement::Hybrid,
        ),
        Rule::new(
            "days_in_office",
            r"\b(?:\d|one|two|three|four)\s+days?\s+(?:per|a|each|/)\s*week\s+(?:in|on)[- ]?(?:the\s+)?(?:office|site|campus|person)\b|\bin[- ](?:the\s+)?office\s+(?:\d|one|two|three|four)\s+days?\b",
            WorkArrangement::Hybrid,
        ),
        Rule::new(
            "remote_and_onsite",
            r"\b(?:mix|combination|blend)\s+of\s+(?:remote|home)\s+and\s+(?:on-?site|in[- ]office|in[- ]person)\b|\b(?:on-?site|in[- ]office|in[- ]person)\s+and\s+remote\b",
            WorkArrangement::Hybrid,
        ),
    ]);

    static ref ONSITE_RULES: RuleTable<WorkArrangement> = RuleTable::new(vec![
        Rule::new(
            "onsite_only",
            r"\bon[- ]?site\s+only\b|\b100\s?%\s+on[- ]?site\b|\bfully\s+on[- ]?site\b",
            WorkArrangement::Onsite,
        ),
        Rule::new(
            "in_person_required",
            r"\bmust\s+(?:report|work)\s+(?:in[- ]person|on[- ]?site)\b|\bin[- ]person\s+(?:only|required)\b|\bon[- ]?site\s+(?:presence\s+)?(?:is\s+)?required\b",
            WorkArrangement::Onsite,
        ),
        Rule::new(
            "no_remote",
            r"\bno\s+remote\b|\bnot\s+(?:a\s+)?remote\b|\bnon[- ]remote\b|\bremote\s+work\s+is\s+not\s+(?:available|an\s+option|offered)\b|\bnot\s+eligible\s+for\s+remote\b",
            WorkArrangement::Onsite,
        ),
    ]);

    static ref BEDSIDE_ROLE_RE: Regex =
        Regex::new(r"(?i)\bbedside\b|\bfloor\s+nurse\b|\bcharge\s+nurse\b|\bstaff\s+nurse\b").unwrap();

    static ref BEDSIDE_UNIT_RE: Regex = Regex::new(
        r"(?i)\b(?:icu|nicu|picu|cvicu|sicu|micu|intensive\s+care|critical\s+care|emergency\s+(?:department|room)|er|med[- /]?surg\w*|medical[- ]surgical|operating\s+room|hybrid\s+or|perioperative|labor\s+(?:and|&)\s+delivery|pacu|post[- ]?anesthesia|cath(?:eterization)?\s+lab|telemetry|step[- ]?down|progressive\s+care)\b|\bl\s?&\s?d\b"
    )
    .unwrap();

    /// "OR RN", "RN - OR". Read from the title only: in prose "or" is a conjunction.
    static ref TITLE_OR_UNIT_RE: Regex = Regex::new(
        r"(?i)(?:^|[-,/|(]\s*)or\s+(?:rn|nurse)\b|\b(?:rn|nurse)\s*[-/|(]\s*or\s*(?:$|[-,/|)])"
    )
    .unwrap();

    static ref FACILITY_RE: Regex = Regex::new(
        r"(?i)\bhospitals?\b|\bmedical\s+cent(?:er|re)s?\b|\bclinics?\b|\binfirmary\b|\bsurg(?:ery|ical)\s+cent(?:er|re)\b"
    )
    .unwrap();

    static ref POTENTIALLY_REMOTE_RULES: RuleTable<()> = RuleTable::new(vec![
        Rule::new("case_management", r"\bcase\s+manag\w*", ()),
        Rule::new("utilization_review", r"\butilization\s+(?:review|management)\b", ()),
        Rule::new("telehealth", r"\btele-?health\b|\btele-?medicine\b|\btelephonic\b|\btele-?triage\b", ()),
        Rule::new("clinical_documentation", r"\bclinical\s+documentation\b|\bcdi\b", ()),
        Rule::new("quality_improvement", r"\bquality\s+(?:improvement|assurance|management)\b", ()),
        Rule::new("nurse_educator", r"\b(?:nurse|clinical)\s+educator\b", ()),
        Rule::new("infection_control", r"\binfection\s+(?:control|prevention)\w*", ()),
    ]);
}

/// Classifies remote/hybrid/onsite from the four free-text fields.
///
/// Never fails. `Unknown` means "ask the LLM", not "onsite".
pub fn classify_work_arrangement(
    title: &str,
    description: &str,
    location: &str,
    employment_type: &str,
) -> Classification<WorkArrangement> {
    classify_work_arrangement_traced(title, description, location, employment_type).arrangement
}

pub fn classify_work_arrangement_traced(
    title: &str,
    description: &str,
    location: &str,
    employment_type: &str,
) -> WorkArrangementDecision {
    let corpus = SearchCorpus::new(title, description, location, employment_type);
    decide_work_arrangement(&corpus)
}

/// First matching step wins:
/// 1. "remote" in title/location (false positives stripped first)
/// 2. strong remote phrases
/// 3. hybrid phrases
/// 4. explicit onsite phrases
/// 5. bedside unit/role AND facility context -> onsite
/// 6. potentially-remote role -> Unknown
/// 7. nothing -> Unknown
pub fn decide_work_arrangement(corpus: &SearchCorpus) -> WorkArrangementDecision {
    let decision = run_cascade(corpus);
    debug!(
        rule = decision.rule.as_ref(),
        matched = decision.matched.unwrap_or("-"),
        arrangement = ?decision.arrangement,
        "work arrangement decided"
    );
    decision
}

fn run_cascade(corpus: &SearchCorpus) -> WorkArrangementDecision {
    let title_and_location = strip_remote_false_positives(&corpus.title_and_location());
    if title_and_location.contains("remote") {
        return WorkArrangementDecision::new(
            Classification::Certain(WorkArrangement::Remote),
            WorkArrangementRule::ExplicitTitleOrLocation,
            None,
        );
    }

    let combined = corpus.combined();
    let stripped = strip_remote_false_positives(&combined);

    if let Some(rule) = STRONG_REMOTE_RULES.first_match(&stripped) {
        return WorkArrangementDecision::new(
            Classification::Certain(rule.label),
            WorkArrangementRule::StrongRemotePhrase,
            Some(rule.name),
        );
    }

    if let Some(rule) = HYBRID_RULES.first_match(&stripped) {
        return WorkArrangementDecision::new(
            Classification::Certain(rule.label),
            WorkArrangementRule::HybridPhrase,
            Some(rule.name),
        );
    }

    // Negations like "not a remote position" live in the unstripped text.
    if let Some(rule) = ONSITE_RULES.first_match(&combined) {
        return WorkArrangementDecision::new(
            Classification::Certain(rule.label),
            WorkArrangementRule::ExplicitOnsite,
            Some(rule.name),
        );
    }

    if is_bedside_at_facility(&corpus.title, &combined) {
        return WorkArrangementDecision::new(
            Classification::Certain(WorkArrangement::Onsite),
            WorkArrangementRule::BedsideInference,
            None,
        );
    }

    if let Some(rule) = POTENTIALLY_REMOTE_RULES.first_match(&combined) {
        return WorkArrangementDecision::new(
            Classification::Unknown,
            WorkArrangementRule::PotentiallyRemoteRole,
            Some(rule.name),
        );
    }

    WorkArrangementDecision::new(Classification::Unknown, WorkArrangementRule::NoSignal, None)
}

fn strip_remote_false_positives(text: &str) -> String {
    REMOTE_FALSE_POSITIVES.replace_all(text, " ").into_owned()
}

/// Unit or role keyword alone is not enough; a care facility must co-occur.
fn is_bedside_at_facility(title: &str, text: &str) -> bool {
    let bedside = BEDSIDE_ROLE_RE.is_match(text)
        || BEDSIDE_UNIT_RE.is_match(text)
        || TITLE_OR_UNIT_RE.is_match(title);
    bedside && FACILITY_RE.is_match(text)
}

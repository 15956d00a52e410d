use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::AsRefStr;
use tracing::debug;

use crate::classification::Classification;
use crate::config::NormalizerConfig;
use crate::corrections::{
    classify_job_type, classify_shift, classify_specialty, decide_work_arrangement, JobType,
    WorkArrangement, WorkArrangementDecision,
};
use crate::date::parse_posted_on;
use crate::location::{parse_location_with_hints, LocationHints, ParsedLocation};
use crate::normalize::{calculate_job_fingerprint, SearchCorpus};
use crate::salary::{parse_salary_with, ParsedSalary};
use crate::{NormalizedJob, RawJobPosting};

/// Fields the rules may abstain on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobField {
    Location,
    WorkArrangement,
    Specialty,
    Salary,
    Shift,
    JobType,
}

impl JobField {
    pub const TIER1: [JobField; 3] = [
        JobField::Location,
        JobField::WorkArrangement,
        JobField::Specialty,
    ];
    pub const TIER2: [JobField; 3] = [JobField::Salary, JobField::Shift, JobField::JobType];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecommendedMethod {
    /// Every Tier1 field was decided by a rule.
    RuleCertain,
    /// Hand the posting to the LLM classifier.
    LlmRecommended,
}

/// Tier fill counts for one posting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionQuality {
    pub tier1_extracted: usize,
    pub tier1_total: usize,
    pub tier2_extracted: usize,
    pub tier2_total: usize,
    pub llm_recommended: bool,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedDecision {
    pub recommended_method: RecommendedMethod,
    pub reason: String,
    pub unknown_fields: Vec<JobField>,
}

/// Result of one pass over a posting: the persisted record plus what the
/// review queue needs to know about it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractorOutput {
    pub job: NormalizedJob,
    pub work_arrangement: WorkArrangementDecision,
    pub quality: ExtractionQuality,
    pub decision: RecommendedDecision,
    pub priority: i32,
}

/// Runs every extractor over one posting.
///
/// Pure apart from `base_date`, which only feeds `posted_date`.
pub fn normalize_job(
    raw: &RawJobPosting,
    config: &NormalizerConfig,
    base_date: NaiveDate,
) -> ExtractorOutput {
    let corpus = SearchCorpus::from_posting(raw);

    let work_arrangement = decide_work_arrangement(&corpus);
    let directory = config.facilities.for_employer(raw.employer.as_deref());
    let location = parse_location_with_hints(
        &raw.location_text,
        LocationHints {
            additional_locations: &raw.additional_locations,
            external_path: raw.external_path.as_deref(),
        },
        directory,
    );
    let specialty = classify_specialty(&raw.title, &corpus.description);
    let shift = classify_shift(&raw.title, &corpus.description, &corpus.employment_type);
    let job_type = classify_job_type(&raw.title, &corpus.employment_type);
    let salary = raw
        .compensation_text
        .as_deref()
        .and_then(|text| parse_salary_with(text, &config.salary));

    let unknown_fields = collect_unknown_fields(
        &location,
        &work_arrangement.arrangement,
        &specialty,
        salary.as_ref(),
        &shift,
        &job_type,
    );
    let (quality, decision) = evaluate_quality(unknown_fields);
    let priority = calculate_priority(&work_arrangement.arrangement, &quality);

    let job = build_job(
        raw,
        location,
        work_arrangement.arrangement.clone(),
        specialty,
        shift,
        job_type,
        salary,
        base_date,
    );

    debug!(
        fingerprint = %job.fingerprint,
        method = decision.recommended_method.as_ref(),
        priority,
        "posting normalized"
    );

    ExtractorOutput {
        job,
        work_arrangement,
        quality,
        decision,
        priority,
    }
}

#[allow(clippy::too_many_arguments)]
fn build_job(
    raw: &RawJobPosting,
    location: ParsedLocation,
    work_arrangement: Classification<WorkArrangement>,
    specialty: Classification<String>,
    shift: Classification<String>,
    job_type: Classification<JobType>,
    salary: Option<ParsedSalary>,
    base_date: NaiveDate,
) -> NormalizedJob {
    let work_arrangement = work_arrangement.into_option();
    let derived = salary.map(|s| s.derived()).unwrap_or_default();

    NormalizedJob {
        source: raw.source,
        employer: raw.employer.clone(),
        source_job_id: raw.source_job_id(),
        fingerprint: calculate_job_fingerprint(
            raw.employer.as_deref().unwrap_or(""),
            &raw.title,
            &raw.location_text,
        ),
        url: raw.url.clone(),
        title: raw.title.trim().to_string(),
        is_remote: location.is_remote || work_arrangement == Some(WorkArrangement::Remote),
        city: location.city,
        state: location.state,
        work_arrangement,
        specialty: specialty.into_option(),
        shift_type: shift.into_option(),
        job_type: job_type.into_option(),
        salary_min: salary.map(|s| s.min),
        salary_max: salary.map(|s| s.max),
        salary_type: salary.map(|s| s.salary_type),
        salary_min_hourly: derived.min_hourly,
        salary_max_hourly: derived.max_hourly,
        salary_min_annual: derived.min_annual,
        salary_max_annual: derived.max_annual,
        posted_date: raw
            .posted_on
            .as_deref()
            .and_then(|posted| parse_posted_on(posted, base_date)),
    }
}

fn collect_unknown_fields(
    location: &ParsedLocation,
    work_arrangement: &Classification<WorkArrangement>,
    specialty: &Classification<String>,
    salary: Option<&ParsedSalary>,
    shift: &Classification<String>,
    job_type: &Classification<JobType>,
) -> Vec<JobField> {
    [
        (JobField::Location, location.has_place() || location.is_remote),
        (JobField::WorkArrangement, work_arrangement.is_certain()),
        (JobField::Specialty, specialty.is_certain()),
        (JobField::Salary, salary.is_some()),
        (JobField::Shift, shift.is_certain()),
        (JobField::JobType, job_type.is_certain()),
    ]
    .into_iter()
    .filter(|(_, known)| !known)
    .map(|(field, _)| field)
    .collect()
}

/// Tier fill counts from the fields the rules abstained on.
pub fn calculate_quality(unknown_fields: &[JobField]) -> ExtractionQuality {
    let extracted = |tier: &[JobField]| {
        tier.iter()
            .filter(|field| !unknown_fields.contains(*field))
            .count()
    };

    ExtractionQuality {
        tier1_extracted: extracted(&JobField::TIER1),
        tier1_total: JobField::TIER1.len(),
        tier2_extracted: extracted(&JobField::TIER2),
        tier2_total: JobField::TIER2.len(),
        llm_recommended: false,
        reason: String::new(),
    }
}

/// LLM when the work arrangement is unknown or Tier1 is incomplete.
pub fn decide_recommended_method(
    quality: &ExtractionQuality,
    unknown_fields: Vec<JobField>,
) -> RecommendedDecision {
    if unknown_fields.contains(&JobField::WorkArrangement) {
        return RecommendedDecision {
            recommended_method: RecommendedMethod::LlmRecommended,
            reason: "LLM recommended: work arrangement unknown".to_string(),
            unknown_fields,
        };
    }

    if quality.tier1_extracted < quality.tier1_total {
        return RecommendedDecision {
            recommended_method: RecommendedMethod::LlmRecommended,
            reason: format!(
                "LLM recommended: Tier1 incomplete {}/{}",
                quality.tier1_extracted, quality.tier1_total
            ),
            unknown_fields,
        };
    }

    RecommendedDecision {
        recommended_method: RecommendedMethod::RuleCertain,
        reason: format!(
            "rules certain: Tier1 {}/{}, Tier2 {}/{}",
            quality.tier1_extracted, quality.tier1_total, quality.tier2_extracted, quality.tier2_total
        ),
        unknown_fields,
    }
}

/// Review order, independent of the quality score.
pub fn calculate_priority(
    work_arrangement: &Classification<WorkArrangement>,
    quality: &ExtractionQuality,
) -> i32 {
    if work_arrangement.is_unknown() {
        100
    } else if quality.tier1_extracted < quality.tier1_total {
        50
    } else if quality.tier2_extracted < quality.tier2_total {
        20
    } else {
        10
    }
}

pub fn evaluate_quality(unknown_fields: Vec<JobField>) -> (ExtractionQuality, RecommendedDecision) {
    let mut quality = calculate_quality(&unknown_fields);
    let decision = decide_recommended_method(&quality, unknown_fields);
    quality.llm_recommended = decision.recommended_method == RecommendedMethod::LlmRecommended;
    quality.reason = decision.reason.clone();
    (quality, decision)
}

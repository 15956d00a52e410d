use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use strum::AsRefStr;

use crate::classification::Classification;
use crate::normalize::normalize_text;
use crate::rules::{Rule, RuleTable};

/// Employment type ENUM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    PerDiem,
    Contract,
}

lazy_static! {
    /// Per diem and contract first: Workday pairs "Temporary" with "Full time".
    pub static ref JOB_TYPE_RULES: RuleTable<JobType> = RuleTable::new(vec![
        Rule::new("per_diem", r"\bper[- ]?diem\b|\bprn\b|\bcasual\b", JobType::PerDiem),
        Rule::new(
            "contract",
            r"\bcontract\w*|\btravel(?:er|ing)?\b|\btemp(?:orary)?\b|\blocums?\b|\bagency\b",
            JobType::Contract,
        ),
        Rule::new("part_time", r"\bpart[- ]?time\b", JobType::PartTime),
        Rule::new("full_time", r"\bfull[- ]?time\b", JobType::FullTime),
    ]);
}

/// Employment type from the employment/time-type text, then the title.
pub fn classify_job_type(title: &str, employment_type: &str) -> Classification<JobType> {
    JOB_TYPE_RULES
        .label_for(&normalize_text(employment_type))
        .or_else(|| JOB_TYPE_RULES.label_for(&normalize_text(title)))
        .into()
}

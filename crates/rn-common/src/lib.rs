pub mod classification;
pub mod config;
pub mod corrections;
pub mod date;
pub mod error;
pub mod extraction;
pub mod location;
pub mod logging;
pub mod normalize;
pub mod review;
pub mod rules;
pub mod salary;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::AsRefStr;

pub use classification::Classification;
pub use corrections::{
    classify_job_type, classify_shift, classify_specialty, classify_work_arrangement, JobType,
    WorkArrangement,
};
pub use extraction::{normalize_job, ExtractorOutput};
pub use location::{parse_location, ParsedLocation};
pub use salary::{parse_salary, ParsedSalary, SalaryType};

/// Applicant tracking system a posting was scraped from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AtsSource {
    Workday,
    PageUp,
    TalentBrew,
    Vizi,
    #[default]
    Other,
}

/// Posting as handed over by a scraper. Field shapes vary per ATS, so
/// everything except the title is optional free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawJobPosting {
    pub source: AtsSource,
    pub employer: Option<String>,
    pub title: String,
    /// HTML or plain text.
    pub description: String,
    pub location_text: String,
    pub additional_locations: Vec<String>,
    pub employment_type: Option<String>,
    pub time_type: Option<String>,
    pub compensation_text: Option<String>,
    /// Relative string such as "Posted 3 Days Ago".
    pub posted_on: Option<String>,
    pub external_path: Option<String>,
    pub job_req_id: Option<String>,
    pub url: Option<String>,
}

impl RawJobPosting {
    /// `employmentType` and `timeType` joined; Workday splits them.
    pub fn employment_type_text(&self) -> String {
        [self.employment_type.as_deref(), self.time_type.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Source-side identifier used by persistence for dedup.
    pub fn source_job_id(&self) -> Option<String> {
        if let Some(id) = self.job_req_id.as_deref().map(str::trim) {
            if !id.is_empty() {
                return Some(id.to_string());
            }
        }

        if self.source != AtsSource::Workday {
            return None;
        }

        // Workday paths end in "<slug>_<reqId>".
        let segment = self
            .external_path
            .as_deref()?
            .trim_end_matches('/')
            .rsplit('/')
            .next()?;
        let id = segment.rsplit_once('_').map(|(_, id)| id).unwrap_or(segment);
        if id.is_empty() {
            None
        } else {
            Some(id.to_string())
        }
    }
}

/// Canonical record handed to the persistence layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedJob {
    pub source: AtsSource,
    pub employer: Option<String>,
    pub source_job_id: Option<String>,
    pub fingerprint: String,
    pub url: Option<String>,
    pub title: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub is_remote: bool,
    pub work_arrangement: Option<WorkArrangement>,
    pub specialty: Option<String>,
    pub shift_type: Option<String>,
    pub job_type: Option<JobType>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_type: Option<SalaryType>,
    pub salary_min_hourly: Option<f64>,
    pub salary_max_hourly: Option<f64>,
    pub salary_min_annual: Option<f64>,
    pub salary_max_annual: Option<f64>,
    pub posted_date: Option<NaiveDate>,
}

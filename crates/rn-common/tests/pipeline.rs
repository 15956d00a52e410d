use chrono::NaiveDate;
use rn_common::config::NormalizerConfig;
use rn_common::corrections::WorkArrangementRule;
use rn_common::extraction::RecommendedMethod;
use rn_common::location::{FacilityDirectory, FacilityTables};
use rn_common::review::ReviewQueue;
use rn_common::{
    classify_specialty, classify_work_arrangement, normalize_job, parse_location, parse_salary,
    AtsSource, Classification, RawJobPosting, SalaryType, WorkArrangement,
};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

fn workday_posting() -> RawJobPosting {
    serde_json::from_str(
        r#"{
            "source": "workday",
            "employer": "Cascade Regional Health",
            "title": "Registered Nurse - Med/Surg - Days",
            "description": "<p>Provide bedside care on our 32-bed unit at Cascade Regional Hospital.</p>",
            "locationText": "2 Locations",
            "additionalLocations": ["Tacoma, WA", "Tacoma, Washington"],
            "timeType": "Part time",
            "compensationText": "$52.00 - $80.50/Hourly",
            "postedOn": "Posted 4 Days Ago",
            "externalPath": "/job/Tacoma-WA/Registered-Nurse---Med-Surg---Days_R20441"
        }"#,
    )
    .unwrap()
}

#[test]
fn remote_in_title_or_location_is_remote() {
    let cases = [
        ("Remote RN Case Manager", ""),
        ("Utilization Review Nurse", "Remote-TX"),
        ("Telehealth RN (Remote)", "Seattle, WA"),
        ("Clinical Documentation Specialist", "Remote - Nationwide"),
    ];
    for (title, location) in cases {
        assert_eq!(
            classify_work_arrangement(title, "Onsite orientation at our hospital ICU.", location, ""),
            Classification::Certain(WorkArrangement::Remote),
            "{title} / {location}"
        );
    }
}

#[test]
fn remote_patient_monitoring_guard() {
    let result = classify_work_arrangement("Remote Patient Monitoring Nurse", "...", "", "");
    assert_ne!(result, Classification::Certain(WorkArrangement::Remote));
}

#[test]
fn bedside_unit_at_facility_is_onsite() {
    for unit in ["ICU", "ER", "Med-Surg", "L&D", "NICU", "PACU", "Cath Lab"] {
        let title = format!("{unit} Registered Nurse");
        assert_eq!(
            classify_work_arrangement(&title, "Join our team at Mercy Hospital.", "", ""),
            Classification::Certain(WorkArrangement::Onsite),
            "{unit}"
        );
    }

    // Unit alone is not enough.
    assert_eq!(
        classify_work_arrangement("ICU Registered Nurse", "Great benefits.", "", ""),
        Classification::Unknown
    );
}

#[test]
fn potentially_remote_role_without_evidence_is_unknown() {
    for title in [
        "Case Manager",
        "Utilization Review RN",
        "Telehealth Nurse",
        "Infection Control Nurse",
        "Nurse Educator",
    ] {
        assert_eq!(
            classify_work_arrangement(title, "", "", ""),
            Classification::Unknown,
            "{title}"
        );
    }
}

#[test]
fn remote_location_round_trip() {
    let parsed = parse_location("Remote-CA", None);
    assert_eq!(parsed.city.as_deref(), Some("Remote"));
    assert_eq!(parsed.state.as_deref(), Some("CA"));
    assert!(parsed.is_remote);

    assert_eq!(parse_location("Remote-WA State", None).state.as_deref(), Some("WA"));
}

#[test]
fn salary_examples() {
    let hourly = parse_salary("$31.66 - $61.35/Hourly").unwrap();
    assert_eq!((hourly.min, hourly.max, hourly.salary_type), (31.66, 61.35, SalaryType::Hourly));

    let weekly = parse_salary("$2,902/week").unwrap();
    assert_eq!(weekly.salary_type, SalaryType::Weekly);
    let derived = weekly.derived();
    assert_eq!(derived.min_hourly, None);
    assert_eq!(derived.max_annual, None);

    assert_eq!(parse_salary("$5/Hourly"), None);
}

#[test]
fn specialty_prefers_specific_over_generic() {
    assert_eq!(
        classify_specialty("Utilization Review Nursing Coordinator", ""),
        Classification::Certain("Utilization Review".to_string())
    );
}

#[test]
fn full_workday_posting() {
    let output = normalize_job(&workday_posting(), &NormalizerConfig::default(), base_date());
    let job = &output.job;

    assert_eq!(job.source, AtsSource::Workday);
    assert_eq!(job.source_job_id.as_deref(), Some("R20441"));
    assert_eq!(job.city.as_deref(), Some("Tacoma"));
    assert_eq!(job.state.as_deref(), Some("WA"));
    assert_eq!(job.work_arrangement, Some(WorkArrangement::Onsite));
    assert_eq!(job.specialty.as_deref(), Some("Med-Surg"));
    assert_eq!(job.shift_type.as_deref(), Some("Day"));
    assert_eq!(job.salary_min_annual, Some(108_160.0));
    assert_eq!(job.salary_max_annual, Some(167_440.0));
    assert_eq!(job.posted_date, NaiveDate::from_ymd_opt(2025, 5, 29));
    assert_eq!(output.decision.recommended_method, RecommendedMethod::RuleCertain);
}

#[test]
fn weekly_travel_rate_never_derives() {
    let raw = RawJobPosting {
        title: "Travel RN - Telemetry".into(),
        description: "13-week assignment at St. Joseph Hospital".into(),
        location_text: "Eureka, CA".into(),
        compensation_text: Some("$2,450 weekly".into()),
        ..RawJobPosting::default()
    };
    let job = normalize_job(&raw, &NormalizerConfig::default(), base_date()).job;

    assert_eq!(job.salary_type, Some(SalaryType::Weekly));
    assert_eq!(job.salary_min, Some(2450.0));
    assert_eq!(job.salary_min_hourly, None);
    assert_eq!(job.salary_max_hourly, None);
    assert_eq!(job.salary_min_annual, None);
    assert_eq!(job.salary_max_annual, None);
}

#[test]
fn city_and_state_are_never_half_populated() {
    let locations = [
        "2 Locations",
        "Tacoma",
        "Tacoma-1801 S Union Ave",
        "Remote",
        "Remote-XX",
        "Seattle, WA",
        "Main Campus - Building C",
        "",
    ];
    for location in locations {
        let raw = RawJobPosting {
            title: "RN".into(),
            location_text: location.into(),
            ..RawJobPosting::default()
        };
        let job = normalize_job(&raw, &NormalizerConfig::default(), base_date()).job;
        assert_eq!(job.city.is_some(), job.state.is_some(), "{location}");
    }
}

#[test]
fn is_remote_agrees_with_work_arrangement() {
    let locations = [
        "Seattle, WA - Non-Remote",
        "Seattle, WA (Not Remote)",
        "Remote-TX",
        "Seattle, WA (Remote)",
        "Seattle, WA",
    ];
    for location in locations {
        let raw = RawJobPosting {
            title: "ICU RN".into(),
            location_text: location.into(),
            ..RawJobPosting::default()
        };
        let job = normalize_job(&raw, &NormalizerConfig::default(), base_date()).job;
        assert_eq!(
            job.is_remote,
            job.work_arrangement == Some(WorkArrangement::Remote),
            "{location}"
        );
    }

    let raw = RawJobPosting {
        title: "ICU RN".into(),
        location_text: "Seattle, WA - Non-Remote".into(),
        ..RawJobPosting::default()
    };
    let job = normalize_job(&raw, &NormalizerConfig::default(), base_date()).job;
    assert_eq!(job.work_arrangement, Some(WorkArrangement::Onsite));
    assert_eq!(job.city.as_deref(), Some("Seattle"));
    assert_eq!(job.state.as_deref(), Some("WA"));
}

#[test]
fn employer_facility_table_fills_address_fragments() {
    let mut facilities = FacilityTables::default();
    facilities.insert(
        "Cascade Regional Health",
        FacilityDirectory::default()
            .with_city("Tacoma", "WA")
            .with_facility("Cascade Regional Hospital", "Tacoma", "WA"),
    );
    let config = NormalizerConfig {
        facilities,
        ..NormalizerConfig::default()
    };

    let mut raw = workday_posting();
    raw.location_text = "Tacoma-1801 S Union Ave".into();
    raw.additional_locations.clear();
    raw.external_path = None;
    let job = normalize_job(&raw, &config, base_date()).job;
    assert_eq!(job.city.as_deref(), Some("Tacoma"));
    assert_eq!(job.state.as_deref(), Some("WA"));

    // Same text, different employer: no table, no guess.
    raw.employer = Some("Other Health".into());
    let job = normalize_job(&raw, &config, base_date()).job;
    assert_eq!(job.city, None);
    assert_eq!(job.state, None);
}

#[test]
fn pipeline_is_idempotent() {
    let raw = workday_posting();
    let config = NormalizerConfig::default();

    let first = serde_json::to_string(&normalize_job(&raw, &config, base_date()).job).unwrap();
    let second = serde_json::to_string(&normalize_job(&raw, &config, base_date()).job).unwrap();
    assert_eq!(first, second);
}

#[test]
fn normalized_job_serializes_camel_case() {
    let job = normalize_job(&workday_posting(), &NormalizerConfig::default(), base_date()).job;
    let value = serde_json::to_value(&job).unwrap();

    assert_eq!(value["workArrangement"], "onsite");
    assert_eq!(value["salaryType"], "hourly");
    assert_eq!(value["isRemote"], false);
    assert_eq!(value["postedDate"], "2025-05-29");
    assert!(value["salaryMinHourly"].is_number());
}

#[test]
fn review_queue_collects_only_uncertain_postings() {
    let config = NormalizerConfig::default();
    let mut queue = ReviewQueue::default();

    let certain = normalize_job(&workday_posting(), &config, base_date());
    assert!(!queue.enqueue_output(&certain));

    let case_manager = RawJobPosting {
        title: "RN Case Manager".into(),
        location_text: "Spokane, WA".into(),
        ..RawJobPosting::default()
    };
    let uncertain = normalize_job(&case_manager, &config, base_date());
    assert_eq!(uncertain.work_arrangement.rule, WorkArrangementRule::PotentiallyRemoteRole);
    assert!(queue.enqueue_output(&uncertain));
    assert!(!queue.enqueue_output(&uncertain));

    let drained = queue.drain_by_priority();
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].priority, 100);
    assert_eq!(drained[0].matched_rule.as_deref(), Some("case_management"));
}

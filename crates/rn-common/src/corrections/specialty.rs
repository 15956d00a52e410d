use lazy_static::lazy_static;
use tracing::debug;

use crate::classification::Classification;
use crate::normalize::normalize_text;
use crate::rules::{Rule, RuleTable};

lazy_static! {
    /// Most specific first. Non-bedside roles come before units so that
    /// "Utilization Review RN - ICU background" is Utilization Review.
    pub static ref SPECIALTY_RULES: RuleTable<&'static str> = RuleTable::new(vec![
        Rule::new("utilization_review", r"\butilization\s+(?:review|management)\b|\bur\s+(?:rn|nurse)\b", "Utilization Review"),
        Rule::new("case_management", r"\bcase\s+manag\w*|\bcare\s+manag\w*", "Case Management"),
        Rule::new("clinical_documentation", r"\bclinical\s+documentation\b|\bcdi\b", "Clinical Documentation"),
        Rule::new("infection_control", r"\binfection\s+(?:control|prevention)\w*", "Infection Control"),
        Rule::new("quality", r"\bquality\s+(?:improvement|assurance|management)\b|\bperformance\s+improvement\b", "Quality Improvement"),
        Rule::new("telehealth", r"\btele-?health\b|\btele-?medicine\b|\btelephonic\b|\btele-?triage\b", "Telehealth"),
        Rule::new("informatics", r"\binformatics\b", "Informatics"),
        Rule::new("nurse_educator", r"\b(?:nurse|clinical)\s+educator\b|\bnursing\s+education\b", "Nurse Educator"),
        Rule::new("nicu", r"\bnicu\b|\bneonatal\s+intensive\b", "NICU"),
        Rule::new("picu", r"\bpicu\b|\bpediatric\s+intensive\b", "PICU"),
        Rule::new("icu", r"\b(?:cv|s|m|cc|neuro)?icu\b|\bintensive\s+care\b|\bcritical\s+care\b", "ICU"),
        Rule::new("labor_and_delivery", r"\bl\s?&\s?d\b|\blabor\s+(?:and|&)\s+delivery\b|\bldrp?\b", "Labor & Delivery"),
        Rule::new("mother_baby", r"\bmother[- /]?baby\b|\bpostpartum\b|\bpost[- ]partum\b", "Mother/Baby"),
        Rule::new("pacu", r"\bpacu\b|\bpost[- ]?anesthesia\b", "PACU"),
        Rule::new("operating_room", r"\boperating\s+room\b|\bperi-?op(?:erative)?\b|(?:^|[-,/|(]\s*)or\s+(?:rn|nurse)\b|\b(?:rn|nurse)\s*[-/|(]\s*or\s*(?:$|[-,/|)])|\bsurgical\s+services\b|\bhybrid\s+or\b", "Operating Room"),
        Rule::new("cath_lab", r"\bcath(?:eterization)?\s+lab\b|\binterventional\s+(?:radiology|cardiology)\b", "Cath Lab"),
        Rule::new("emergency", r"\bemergency\s+(?:department|room|services|nurs\w*)\b|\ber\s+(?:rn|nurse)\b|\brn\s*[-,]\s*(?:er|ed)\b|\bed\s+(?:rn|nurse)\b|\btrauma\b", "Emergency"),
        Rule::new("step_down", r"\bstep[- ]?down\b|\bprogressive\s+care\b|\bpcu\b|\bintermediate\s+care\b", "Step-Down"),
        Rule::new("telemetry", r"\btelemetry\b|\btele\b", "Telemetry"),
        Rule::new("med_surg", r"\bmed[- /]?surg\w*|\bmedical[- ]surgical\b", "Med-Surg"),
        Rule::new("oncology", r"\boncology\b|\bhematology\b|\bbone\s+marrow\b|\bbmt\b", "Oncology"),
        Rule::new("pediatrics", r"\bpediatric\w*|\bpeds\b", "Pediatrics"),
        Rule::new("behavioral_health", r"\bbehavioral\s+health\b|\bpsychiatr\w*|\bpsych\b|\bmental\s+health\b", "Behavioral Health"),
        Rule::new("dialysis", r"\bdialysis\b|\bnephrology\b|\brenal\b", "Dialysis"),
        Rule::new("hospice", r"\bhospice\b|\bpalliative\b", "Hospice"),
        Rule::new("home_health", r"\bhome\s+(?:health|care)\b", "Home Health"),
        Rule::new("rehabilitation", r"\brehab\w*", "Rehabilitation"),
        Rule::new("long_term_care", r"\blong[- ]term\s+care\b|\bskilled\s+nursing\b|\bsnf\b", "Long-Term Care"),
        Rule::new("ambulatory", r"\bambulatory\b|\boutpatient\b", "Ambulatory"),
        Rule::new("float_pool", r"\bfloat\s+pool\b|\bresource\s+pool\b", "Float Pool"),
    ]);

    /// Catch-all, checked against the title only and after every specific rule.
    pub static ref GENERIC_NURSING_RULES: RuleTable<&'static str> = RuleTable::new(vec![
        Rule::new("nursing", r"\bregistered\s+nurse\b|\bnursing\b|\brn\b", "Nursing"),
    ]);
}

/// Specialty from the title, then the description, then the generic title
/// catch-all. Unknown when nothing matches.
pub fn classify_specialty(title: &str, description: &str) -> Classification<String> {
    let title = normalize_text(title);
    let description = normalize_text(description);

    let matched = SPECIALTY_RULES
        .first_match(&title)
        .map(|rule| ("title", rule))
        .or_else(|| {
            SPECIALTY_RULES
                .first_match(&description)
                .map(|rule| ("description", rule))
        })
        .or_else(|| {
            GENERIC_NURSING_RULES
                .first_match(&title)
                .map(|rule| ("title_generic", rule))
        });

    match matched {
        Some((field, rule)) => {
            debug!(field, rule = rule.name, "specialty matched");
            Classification::Certain(rule.label.to_string())
        }
        None => Classification::Unknown,
    }
}

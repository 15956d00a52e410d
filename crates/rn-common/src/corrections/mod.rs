pub mod job_type;
pub mod shift;
pub mod specialty;
pub mod us_state;
pub mod work_arrangement;

pub use job_type::{classify_job_type, JobType};
pub use shift::classify_shift;
pub use specialty::classify_specialty;
pub use us_state::correct_state;
pub use work_arrangement::{
    classify_work_arrangement, classify_work_arrangement_traced, decide_work_arrangement,
    WorkArrangement, WorkArrangementDecision, WorkArrangementRule,
};

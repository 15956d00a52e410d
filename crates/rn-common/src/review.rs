use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::corrections::WorkArrangementRule;
use crate::extraction::{ExtractorOutput, JobField, RecommendedMethod};
use crate::{AtsSource, NormalizedJob};

/// One posting waiting for the LLM classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmReviewRequest {
    pub id: u64,
    pub priority: i32,
    pub reason: String,
    pub unknown_fields: Vec<JobField>,
    pub work_arrangement_rule: WorkArrangementRule,
    pub matched_rule: Option<String>,
    pub job: NormalizedJob,
}

impl LlmReviewRequest {
    /// `None` when the rules were certain enough to skip review.
    pub fn from_output(output: &ExtractorOutput) -> Option<Self> {
        if output.decision.recommended_method != RecommendedMethod::LlmRecommended {
            return None;
        }

        Some(Self {
            id: 0,
            priority: output.priority,
            reason: output.decision.reason.clone(),
            unknown_fields: output.decision.unknown_fields.clone(),
            work_arrangement_rule: output.work_arrangement.rule,
            matched_rule: output.work_arrangement.matched.map(str::to_string),
            job: output.job.clone(),
        })
    }

    fn same_posting(&self, other: &LlmReviewRequest) -> bool {
        if self.job.fingerprint == other.job.fingerprint {
            return true;
        }
        same_source_id(&self.job, &other.job)
    }
}

fn same_source_id(a: &NormalizedJob, b: &NormalizedJob) -> bool {
    match (&a.source_job_id, &b.source_job_id) {
        (Some(left), Some(right)) => a.source == b.source && a.source != AtsSource::Other && left == right,
        _ => false,
    }
}

/// In-memory LLM review queue. Duplicate postings are dropped on enqueue;
/// draining yields the highest priority first, FIFO among equals.
#[derive(Debug, Default)]
pub struct ReviewQueue {
    requests: Vec<LlmReviewRequest>,
    next_id: u64,
}

impl ReviewQueue {
    /// Returns false when the posting is already queued.
    pub fn enqueue(&mut self, mut request: LlmReviewRequest) -> bool {
        if self.requests.iter().any(|existing| existing.same_posting(&request)) {
            debug!(fingerprint = %request.job.fingerprint, "duplicate review request dropped");
            return false;
        }

        self.next_id += 1;
        request.id = self.next_id;
        self.requests.push(request);
        true
    }

    /// Queues the output if it needs review. Returns true when something was added.
    pub fn enqueue_output(&mut self, output: &ExtractorOutput) -> bool {
        match LlmReviewRequest::from_output(output) {
            Some(request) => self.enqueue(request),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn drain_by_priority(&mut self) -> Vec<LlmReviewRequest> {
        let mut drained = std::mem::take(&mut self.requests);
        drained.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(fingerprint: &str, source_job_id: Option<&str>, priority: i32) -> LlmReviewRequest {
        LlmReviewRequest {
            id: 0,
            priority,
            reason: "LLM recommended: work arrangement unknown".into(),
            unknown_fields: vec![JobField::WorkArrangement],
            work_arrangement_rule: WorkArrangementRule::NoSignal,
            matched_rule: None,
            job: NormalizedJob {
                source: AtsSource::Workday,
                fingerprint: fingerprint.into(),
                source_job_id: source_job_id.map(str::to_string),
                ..NormalizedJob::default()
            },
        }
    }

    #[test]
    fn dedups_by_fingerprint_or_source_id() {
        let mut queue = ReviewQueue::default();
        assert!(queue.enqueue(request("aaaa", Some("R1"), 100)));
        assert!(!queue.enqueue(request("aaaa", Some("R2"), 100)));
        assert!(!queue.enqueue(request("bbbb", Some("R1"), 50)));
        assert!(queue.enqueue(request("cccc", None, 50)));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn other_source_ids_are_not_trusted_for_dedup() {
        let mut queue = ReviewQueue::default();
        let mut first = request("aaaa", Some("1"), 50);
        first.job.source = AtsSource::Other;
        let mut second = request("bbbb", Some("1"), 50);
        second.job.source = AtsSource::Other;

        assert!(queue.enqueue(first));
        assert!(queue.enqueue(second));
    }

    #[test]
    fn drains_highest_priority_first_then_fifo() {
        let mut queue = ReviewQueue::default();
        queue.enqueue(request("a", None, 50));
        queue.enqueue(request("b", None, 100));
        queue.enqueue(request("c", None, 50));
        queue.enqueue(request("d", None, 100));

        let order: Vec<String> = queue
            .drain_by_priority()
            .into_iter()
            .map(|r| r.job.fingerprint)
            .collect();
        assert_eq!(order, vec!["b", "d", "a", "c"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn ids_are_assigned_in_enqueue_order() {
        let mut queue = ReviewQueue::default();
        queue.enqueue(request("a", None, 10));
        queue.enqueue(request("b", None, 10));
        let ids: Vec<u64> = queue.drain_by_priority().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}

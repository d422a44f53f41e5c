//! Priority classification for incoming feedback.

use crate::models::Priority;

/// Tag that escalates a submission to high priority regardless of rating.
pub const SAFETY_TAG: &str = "safety";

/// Number of reported problems that escalates a submission to medium.
pub const MEDIUM_PROBLEM_THRESHOLD: usize = 3;

/// Classify a submission's severity from its rating and problem tags.
///
/// Rules, in precedence order:
/// 1. rating <= 2, or the problems contain the literal tag `"safety"` -> High
/// 2. rating <= 3, or 3 or more problems reported -> Medium
/// 3. otherwise -> Low
///
/// Pure and deterministic; the result is computed once at submission time
/// and stored, never recomputed on read.
pub fn classify(rating: i64, problems: &[String]) -> Priority {
    if rating <= 2 || problems.iter().any(|p| p == SAFETY_TAG) {
        Priority::High
    } else if rating <= 3 || problems.len() >= MEDIUM_PROBLEM_THRESHOLD {
        Priority::Medium
    } else {
        Priority::Low
    }
}

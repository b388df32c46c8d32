//! Configurable questionnaire templates attached to tasks and the filled
//! responses staff submit against them.

use super::{StaffId, TaskId, TemplateId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single question on a form template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    /// Stable key used in response answer maps.
    pub key: String,
    /// Human-readable prompt.
    pub label: String,
    /// Whether an answer is mandatory.
    pub required: bool,
}

/// A configurable questionnaire that can be attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormTemplate {
    /// Template identifier.
    pub id: TemplateId,
    /// Template title shown to staff.
    pub title: String,
    /// Ordered questions.
    pub fields: Vec<FormField>,
}

/// A staff member's filled answers for one template on one task.
///
/// Responses are keyed by `(task_id, template_id)`; at most one response
/// exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    /// Task the response belongs to.
    pub task_id: TaskId,
    /// Template the answers were filled against.
    pub template_id: TemplateId,
    /// Staff member who submitted the answers.
    pub submitted_by: StaffId,
    /// Answer text keyed by field key.
    pub answers: BTreeMap<String, String>,
    /// Submission timestamp.
    pub submitted_at: DateTime<Utc>,
}

impl FormResponse {
    /// Creates a response stamped with the current clock time.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        template_id: TemplateId,
        submitted_by: StaffId,
        answers: BTreeMap<String, String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            task_id,
            template_id,
            submitted_by,
            answers,
            submitted_at: clock.utc(),
        }
    }
}

//! Request and response carriers for the reservation operations.
//!
//! The contract treats these as opaque; only the fields an in-process
//! transport needs to route and store a call are modelled.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Empty {}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldMask {
    #[serde(default)]
    pub paths: Vec<String>,
}

impl FieldMask {
    pub fn new<S: Into<String>>(paths: impl IntoIterator<Item = S>) -> Self {
        Self { paths: paths.into_iter().map(Into::into).collect() }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|candidate| candidate == path)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Reservation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slot_capacity: i64,
    #[serde(default)]
    pub ignore_idle_slots: bool,
    #[serde(default)]
    pub creation_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
    #[serde(default)]
    pub extensions: BTreeMap<String, JsonValue>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommitmentPlan {
    #[default]
    Unspecified,
    Flex,
    Trial,
    Monthly,
    Annual,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommitmentState {
    #[default]
    Unspecified,
    Pending,
    Active,
    Failed,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CapacityCommitment {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slot_count: i64,
    #[serde(default)]
    pub plan: CommitmentPlan,
    #[serde(default)]
    pub state: CommitmentState,
    #[serde(default)]
    pub renewal_plan: CommitmentPlan,
    #[serde(default)]
    pub commitment_end_time: Option<String>,
    #[serde(default)]
    pub extensions: BTreeMap<String, JsonValue>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    #[default]
    Unspecified,
    Pipeline,
    Query,
    MlExternal,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentState {
    #[default]
    Unspecified,
    Pending,
    Active,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Assignment {
    #[serde(default)]
    pub name: String,
    /// `projects/{id}`, `folders/{id}` or `organizations/{id}`.
    #[serde(default)]
    pub assignee: String,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub state: AssignmentState,
    #[serde(default)]
    pub extensions: BTreeMap<String, JsonValue>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct BiReservation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub update_time: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CreateReservationRequest {
    pub parent: String,
    #[serde(default)]
    pub reservation_id: Option<String>,
    #[serde(default)]
    pub reservation: Option<Reservation>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListReservationsRequest {
    pub parent: String,
    #[serde(default)]
    pub page_size: Option<usize>,
    #[serde(default)]
    pub page_token: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ListReservationsResponse {
    #[serde(default)]
    pub reservations: Vec<Reservation>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GetReservationRequest {
    pub name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteReservationRequest {
    pub name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateReservationRequest {
    #[serde(default)]
    pub reservation: Option<Reservation>,
    #[serde(default)]
    pub update_mask: Option<FieldMask>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CreateCapacityCommitmentRequest {
    pub parent: String,
    #[serde(default)]
    pub capacity_commitment: Option<CapacityCommitment>,
    #[serde(default)]
    pub enforce_single_admin_project_per_org: bool,
    #[serde(default)]
    pub capacity_commitment_id: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListCapacityCommitmentsRequest {
    pub parent: String,
    #[serde(default)]
    pub page_size: Option<usize>,
    #[serde(default)]
    pub page_token: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ListCapacityCommitmentsResponse {
    #[serde(default)]
    pub capacity_commitments: Vec<CapacityCommitment>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GetCapacityCommitmentRequest {
    pub name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteCapacityCommitmentRequest {
    pub name: String,
    /// Also delete reservations still drawing on the commitment.
    #[serde(default)]
    pub force: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateCapacityCommitmentRequest {
    #[serde(default)]
    pub capacity_commitment: Option<CapacityCommitment>,
    #[serde(default)]
    pub update_mask: Option<FieldMask>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SplitCapacityCommitmentRequest {
    pub name: String,
    pub slot_count: i64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SplitCapacityCommitmentResponse {
    #[serde(default)]
    pub first: Option<CapacityCommitment>,
    #[serde(default)]
    pub second: Option<CapacityCommitment>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergeCapacityCommitmentsRequest {
    pub parent: String,
    #[serde(default)]
    pub capacity_commitment_ids: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CreateAssignmentRequest {
    pub parent: String,
    #[serde(default)]
    pub assignment: Option<Assignment>,
    #[serde(default)]
    pub assignment_id: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListAssignmentsRequest {
    pub parent: String,
    #[serde(default)]
    pub page_size: Option<usize>,
    #[serde(default)]
    pub page_token: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ListAssignmentsResponse {
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteAssignmentRequest {
    pub name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchAssignmentsRequest {
    pub parent: String,
    /// `assignee=projects/{id}` style filter.
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub page_size: Option<usize>,
    #[serde(default)]
    pub page_token: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchAssignmentsResponse {
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveAssignmentRequest {
    pub name: String,
    pub destination_id: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GetBiReservationRequest {
    pub name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateBiReservationRequest {
    #[serde(default)]
    pub bi_reservation: Option<BiReservation>,
    #[serde(default)]
    pub update_mask: Option<FieldMask>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn commitment_enums_use_wire_casing() {
        let commitment: CapacityCommitment = serde_json::from_value(json!({
            "name": "projects/p/locations/US/capacityCommitments/c1",
            "slot_count": 500,
            "plan": "FLEX",
            "state": "ACTIVE",
            "renewal_plan": "MONTHLY"
        }))
        .expect("decode commitment");
        assert_eq!(commitment.plan, CommitmentPlan::Flex);
        assert_eq!(commitment.state, CommitmentState::Active);
        assert_eq!(commitment.renewal_plan, CommitmentPlan::Monthly);
    }

    #[test]
    fn missing_optional_fields_default() {
        let assignment: Assignment =
            serde_json::from_value(json!({"assignee": "projects/analytics"})).expect("decode");
        assert_eq!(assignment.job_type, JobType::Unspecified);
        assert!(assignment.name.is_empty());
        assert_eq!(
            serde_json::to_value(JobType::MlExternal).expect("encode"),
            json!("ML_EXTERNAL")
        );
    }
}

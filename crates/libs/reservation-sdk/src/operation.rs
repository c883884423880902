use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const OPERATION_COUNT: usize = 19;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    CreateReservation,
    ListReservations,
    GetReservation,
    DeleteReservation,
    UpdateReservation,
    CreateCapacityCommitment,
    ListCapacityCommitments,
    GetCapacityCommitment,
    DeleteCapacityCommitment,
    UpdateCapacityCommitment,
    SplitCapacityCommitment,
    MergeCapacityCommitments,
    CreateAssignment,
    ListAssignments,
    DeleteAssignment,
    SearchAssignments,
    MoveAssignment,
    GetBiReservation,
    UpdateBiReservation,
}

impl Operation {
    pub const ALL: [Operation; OPERATION_COUNT] = [
        Self::CreateReservation,
        Self::ListReservations,
        Self::GetReservation,
        Self::DeleteReservation,
        Self::UpdateReservation,
        Self::CreateCapacityCommitment,
        Self::ListCapacityCommitments,
        Self::GetCapacityCommitment,
        Self::DeleteCapacityCommitment,
        Self::UpdateCapacityCommitment,
        Self::SplitCapacityCommitment,
        Self::MergeCapacityCommitments,
        Self::CreateAssignment,
        Self::ListAssignments,
        Self::DeleteAssignment,
        Self::SearchAssignments,
        Self::MoveAssignment,
        Self::GetBiReservation,
        Self::UpdateBiReservation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateReservation => "create_reservation",
            Self::ListReservations => "list_reservations",
            Self::GetReservation => "get_reservation",
            Self::DeleteReservation => "delete_reservation",
            Self::UpdateReservation => "update_reservation",
            Self::CreateCapacityCommitment => "create_capacity_commitment",
            Self::ListCapacityCommitments => "list_capacity_commitments",
            Self::GetCapacityCommitment => "get_capacity_commitment",
            Self::DeleteCapacityCommitment => "delete_capacity_commitment",
            Self::UpdateCapacityCommitment => "update_capacity_commitment",
            Self::SplitCapacityCommitment => "split_capacity_commitment",
            Self::MergeCapacityCommitments => "merge_capacity_commitments",
            Self::CreateAssignment => "create_assignment",
            Self::ListAssignments => "list_assignments",
            Self::DeleteAssignment => "delete_assignment",
            Self::SearchAssignments => "search_assignments",
            Self::MoveAssignment => "move_assignment",
            Self::GetBiReservation => "get_bi_reservation",
            Self::UpdateBiReservation => "update_bi_reservation",
        }
    }

    /// Name of the request message the operation takes.
    pub fn request_type(self) -> &'static str {
        match self {
            Self::CreateReservation => "CreateReservationRequest",
            Self::ListReservations => "ListReservationsRequest",
            Self::GetReservation => "GetReservationRequest",
            Self::DeleteReservation => "DeleteReservationRequest",
            Self::UpdateReservation => "UpdateReservationRequest",
            Self::CreateCapacityCommitment => "CreateCapacityCommitmentRequest",
            Self::ListCapacityCommitments => "ListCapacityCommitmentsRequest",
            Self::GetCapacityCommitment => "GetCapacityCommitmentRequest",
            Self::DeleteCapacityCommitment => "DeleteCapacityCommitmentRequest",
            Self::UpdateCapacityCommitment => "UpdateCapacityCommitmentRequest",
            Self::SplitCapacityCommitment => "SplitCapacityCommitmentRequest",
            Self::MergeCapacityCommitments => "MergeCapacityCommitmentsRequest",
            Self::CreateAssignment => "CreateAssignmentRequest",
            Self::ListAssignments => "ListAssignmentsRequest",
            Self::DeleteAssignment => "DeleteAssignmentRequest",
            Self::SearchAssignments => "SearchAssignmentsRequest",
            Self::MoveAssignment => "MoveAssignmentRequest",
            Self::GetBiReservation => "GetBiReservationRequest",
            Self::UpdateBiReservation => "UpdateBiReservationRequest",
        }
    }

    /// Name of the response message the operation returns.
    pub fn response_type(self) -> &'static str {
        match self {
            Self::CreateReservation
            | Self::GetReservation
            | Self::UpdateReservation => "Reservation",
            Self::ListReservations => "ListReservationsResponse",
            Self::DeleteReservation
            | Self::DeleteCapacityCommitment
            | Self::DeleteAssignment => "Empty",
            Self::CreateCapacityCommitment
            | Self::GetCapacityCommitment
            | Self::UpdateCapacityCommitment
            | Self::MergeCapacityCommitments => "CapacityCommitment",
            Self::ListCapacityCommitments => "ListCapacityCommitmentsResponse",
            Self::SplitCapacityCommitment => "SplitCapacityCommitmentResponse",
            Self::CreateAssignment | Self::MoveAssignment => "Assignment",
            Self::ListAssignments => "ListAssignmentsResponse",
            Self::SearchAssignments => "SearchAssignmentsResponse",
            Self::GetBiReservation | Self::UpdateBiReservation => "BiReservation",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown reservation operation `{0}`")]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|operation| operation.as_str() == name)
            .ok_or_else(|| UnknownOperation(name.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn operation_names_are_unique() {
        let names = Operation::ALL.iter().map(|op| op.as_str()).collect::<BTreeSet<_>>();
        assert_eq!(names.len(), Operation::ALL.len());
    }

    #[test]
    fn names_parse_back_to_operations() {
        for op in Operation::ALL {
            assert_eq!(op.as_str().parse::<Operation>(), Ok(op));
        }
        assert!("drop_reservation".parse::<Operation>().is_err());
    }

    #[test]
    fn deletes_acknowledge_with_empty() {
        let empties = Operation::ALL
            .iter()
            .filter(|op| op.response_type() == "Empty")
            .copied()
            .collect::<Vec<_>>();
        assert_eq!(
            empties,
            vec![
                Operation::DeleteReservation,
                Operation::DeleteCapacityCommitment,
                Operation::DeleteAssignment
            ]
        );
    }
}

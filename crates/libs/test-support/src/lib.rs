//! Reference transports for exercising the reservation clients without a
//! network: an in-memory service model and a failure-injecting wrapper.

/// Invokes `$callback!` with one `method => Operation(Request) -> Response;`
/// line per reservation operation.
macro_rules! for_each_operation {
    ($callback:ident) => {
        $callback! {
            create_reservation => CreateReservation(
                reservation_sdk::types::CreateReservationRequest
            ) -> reservation_sdk::types::Reservation;
            list_reservations => ListReservations(
                reservation_sdk::types::ListReservationsRequest
            ) -> reservation_sdk::types::ListReservationsResponse;
            get_reservation => GetReservation(
                reservation_sdk::types::GetReservationRequest
            ) -> reservation_sdk::types::Reservation;
            delete_reservation => DeleteReservation(
                reservation_sdk::types::DeleteReservationRequest
            ) -> reservation_sdk::types::Empty;
            update_reservation => UpdateReservation(
                reservation_sdk::types::UpdateReservationRequest
            ) -> reservation_sdk::types::Reservation;
            create_capacity_commitment => CreateCapacityCommitment(
                reservation_sdk::types::CreateCapacityCommitmentRequest
            ) -> reservation_sdk::types::CapacityCommitment;
            list_capacity_commitments => ListCapacityCommitments(
                reservation_sdk::types::ListCapacityCommitmentsRequest
            ) -> reservation_sdk::types::ListCapacityCommitmentsResponse;
            get_capacity_commitment => GetCapacityCommitment(
                reservation_sdk::types::GetCapacityCommitmentRequest
            ) -> reservation_sdk::types::CapacityCommitment;
            delete_capacity_commitment => DeleteCapacityCommitment(
                reservation_sdk::types::DeleteCapacityCommitmentRequest
            ) -> reservation_sdk::types::Empty;
            update_capacity_commitment => UpdateCapacityCommitment(
                reservation_sdk::types::UpdateCapacityCommitmentRequest
            ) -> reservation_sdk::types::CapacityCommitment;
            split_capacity_commitment => SplitCapacityCommitment(
                reservation_sdk::types::SplitCapacityCommitmentRequest
            ) -> reservation_sdk::types::SplitCapacityCommitmentResponse;
            merge_capacity_commitments => MergeCapacityCommitments(
                reservation_sdk::types::MergeCapacityCommitmentsRequest
            ) -> reservation_sdk::types::CapacityCommitment;
            create_assignment => CreateAssignment(
                reservation_sdk::types::CreateAssignmentRequest
            ) -> reservation_sdk::types::Assignment;
            list_assignments => ListAssignments(
                reservation_sdk::types::ListAssignmentsRequest
            ) -> reservation_sdk::types::ListAssignmentsResponse;
            delete_assignment => DeleteAssignment(
                reservation_sdk::types::DeleteAssignmentRequest
            ) -> reservation_sdk::types::Empty;
            search_assignments => SearchAssignments(
                reservation_sdk::types::SearchAssignmentsRequest
            ) -> reservation_sdk::types::SearchAssignmentsResponse;
            move_assignment => MoveAssignment(
                reservation_sdk::types::MoveAssignmentRequest
            ) -> reservation_sdk::types::Assignment;
            get_bi_reservation => GetBiReservation(
                reservation_sdk::types::GetBiReservationRequest
            ) -> reservation_sdk::types::BiReservation;
            update_bi_reservation => UpdateBiReservation(
                reservation_sdk::types::UpdateBiReservationRequest
            ) -> reservation_sdk::types::BiReservation;
        }
    };
}

pub mod memory;
pub mod scripted;

#[cfg(test)]
mod policy_matrix;

pub use memory::InMemoryTransport;
pub use scripted::ScriptedFailures;

use crate::error::TransportError;
use crate::operation::Operation;
use crate::types::{
    Assignment, BiReservation, CapacityCommitment, CreateAssignmentRequest,
    CreateCapacityCommitmentRequest, CreateReservationRequest, DeleteAssignmentRequest,
    DeleteCapacityCommitmentRequest, DeleteReservationRequest, Empty, GetBiReservationRequest,
    GetCapacityCommitmentRequest, GetReservationRequest, ListAssignmentsRequest,
    ListAssignmentsResponse, ListCapacityCommitmentsRequest, ListCapacityCommitmentsResponse,
    ListReservationsRequest, ListReservationsResponse, MergeCapacityCommitmentsRequest,
    MoveAssignmentRequest, Reservation, SearchAssignmentsRequest, SearchAssignmentsResponse,
    SplitCapacityCommitmentRequest, SplitCapacityCommitmentResponse,
    UpdateBiReservationRequest, UpdateCapacityCommitmentRequest, UpdateReservationRequest,
};

/// Blocking transport for the reservation service.
///
/// Every method defaults to [`ErrorKind::NotImplemented`](crate::ErrorKind),
/// so a transport only overrides what it supports.
pub trait ReservationTransport: Send + Sync {
    fn create_reservation(
        &self,
        _req: CreateReservationRequest,
    ) -> Result<Reservation, TransportError> {
        Err(TransportError::not_implemented(Operation::CreateReservation))
    }

    fn list_reservations(
        &self,
        _req: ListReservationsRequest,
    ) -> Result<ListReservationsResponse, TransportError> {
        Err(TransportError::not_implemented(Operation::ListReservations))
    }

    fn get_reservation(&self, _req: GetReservationRequest) -> Result<Reservation, TransportError> {
        Err(TransportError::not_implemented(Operation::GetReservation))
    }

    fn delete_reservation(&self, _req: DeleteReservationRequest) -> Result<Empty, TransportError> {
        Err(TransportError::not_implemented(Operation::DeleteReservation))
    }

    fn update_reservation(
        &self,
        _req: UpdateReservationRequest,
    ) -> Result<Reservation, TransportError> {
        Err(TransportError::not_implemented(Operation::UpdateReservation))
    }

    fn create_capacity_commitment(
        &self,
        _req: CreateCapacityCommitmentRequest,
    ) -> Result<CapacityCommitment, TransportError> {
        Err(TransportError::not_implemented(Operation::CreateCapacityCommitment))
    }

    fn list_capacity_commitments(
        &self,
        _req: ListCapacityCommitmentsRequest,
    ) -> Result<ListCapacityCommitmentsResponse, TransportError> {
        Err(TransportError::not_implemented(Operation::ListCapacityCommitments))
    }

    fn get_capacity_commitment(
        &self,
        _req: GetCapacityCommitmentRequest,
    ) -> Result<CapacityCommitment, TransportError> {
        Err(TransportError::not_implemented(Operation::GetCapacityCommitment))
    }

    fn delete_capacity_commitment(
        &self,
        _req: DeleteCapacityCommitmentRequest,
    ) -> Result<Empty, TransportError> {
        Err(TransportError::not_implemented(Operation::DeleteCapacityCommitment))
    }

    fn update_capacity_commitment(
        &self,
        _req: UpdateCapacityCommitmentRequest,
    ) -> Result<CapacityCommitment, TransportError> {
        Err(TransportError::not_implemented(Operation::UpdateCapacityCommitment))
    }

    fn split_capacity_commitment(
        &self,
        _req: SplitCapacityCommitmentRequest,
    ) -> Result<SplitCapacityCommitmentResponse, TransportError> {
        Err(TransportError::not_implemented(Operation::SplitCapacityCommitment))
    }

    fn merge_capacity_commitments(
        &self,
        _req: MergeCapacityCommitmentsRequest,
    ) -> Result<CapacityCommitment, TransportError> {
        Err(TransportError::not_implemented(Operation::MergeCapacityCommitments))
    }

    fn create_assignment(
        &self,
        _req: CreateAssignmentRequest,
    ) -> Result<Assignment, TransportError> {
        Err(TransportError::not_implemented(Operation::CreateAssignment))
    }

    fn list_assignments(
        &self,
        _req: ListAssignmentsRequest,
    ) -> Result<ListAssignmentsResponse, TransportError> {
        Err(TransportError::not_implemented(Operation::ListAssignments))
    }

    fn delete_assignment(&self, _req: DeleteAssignmentRequest) -> Result<Empty, TransportError> {
        Err(TransportError::not_implemented(Operation::DeleteAssignment))
    }

    fn search_assignments(
        &self,
        _req: SearchAssignmentsRequest,
    ) -> Result<SearchAssignmentsResponse, TransportError> {
        Err(TransportError::not_implemented(Operation::SearchAssignments))
    }

    fn move_assignment(&self, _req: MoveAssignmentRequest) -> Result<Assignment, TransportError> {
        Err(TransportError::not_implemented(Operation::MoveAssignment))
    }

    fn get_bi_reservation(
        &self,
        _req: GetBiReservationRequest,
    ) -> Result<BiReservation, TransportError> {
        Err(TransportError::not_implemented(Operation::GetBiReservation))
    }

    fn update_bi_reservation(
        &self,
        _req: UpdateBiReservationRequest,
    ) -> Result<BiReservation, TransportError> {
        Err(TransportError::not_implemented(Operation::UpdateBiReservation))
    }
}

/// Async counterpart of [`ReservationTransport`]. Each call is an independent
/// future; dropping it abandons only that call.
#[cfg(feature = "sdk-async")]
#[async_trait::async_trait]
pub trait ReservationTransportAsync: Send + Sync {
    async fn create_reservation(
        &self,
        _req: CreateReservationRequest,
    ) -> Result<Reservation, TransportError> {
        Err(TransportError::not_implemented(Operation::CreateReservation))
    }

    async fn list_reservations(
        &self,
        _req: ListReservationsRequest,
    ) -> Result<ListReservationsResponse, TransportError> {
        Err(TransportError::not_implemented(Operation::ListReservations))
    }

    async fn get_reservation(
        &self,
        _req: GetReservationRequest,
    ) -> Result<Reservation, TransportError> {
        Err(TransportError::not_implemented(Operation::GetReservation))
    }

    async fn delete_reservation(
        &self,
        _req: DeleteReservationRequest,
    ) -> Result<Empty, TransportError> {
        Err(TransportError::not_implemented(Operation::DeleteReservation))
    }

    async fn update_reservation(
        &self,
        _req: UpdateReservationRequest,
    ) -> Result<Reservation, TransportError> {
        Err(TransportError::not_implemented(Operation::UpdateReservation))
    }

    async fn create_capacity_commitment(
        &self,
        _req: CreateCapacityCommitmentRequest,
    ) -> Result<CapacityCommitment, TransportError> {
        Err(TransportError::not_implemented(Operation::CreateCapacityCommitment))
    }

    async fn list_capacity_commitments(
        &self,
        _req: ListCapacityCommitmentsRequest,
    ) -> Result<ListCapacityCommitmentsResponse, TransportError> {
        Err(TransportError::not_implemented(Operation::ListCapacityCommitments))
    }

    async fn get_capacity_commitment(
        &self,
        _req: GetCapacityCommitmentRequest,
    ) -> Result<CapacityCommitment, TransportError> {
        Err(TransportError::not_implemented(Operation::GetCapacityCommitment))
    }

    async fn delete_capacity_commitment(
        &self,
        _req: DeleteCapacityCommitmentRequest,
    ) -> Result<Empty, TransportError> {
        Err(TransportError::not_implemented(Operation::DeleteCapacityCommitment))
    }

    async fn update_capacity_commitment(
        &self,
        _req: UpdateCapacityCommitmentRequest,
    ) -> Result<CapacityCommitment, TransportError> {
        Err(TransportError::not_implemented(Operation::UpdateCapacityCommitment))
    }

    async fn split_capacity_commitment(
        &self,
        _req: SplitCapacityCommitmentRequest,
    ) -> Result<SplitCapacityCommitmentResponse, TransportError> {
        Err(TransportError::not_implemented(Operation::SplitCapacityCommitment))
    }

    async fn merge_capacity_commitments(
        &self,
        _req: MergeCapacityCommitmentsRequest,
    ) -> Result<CapacityCommitment, TransportError> {
        Err(TransportError::not_implemented(Operation::MergeCapacityCommitments))
    }

    async fn create_assignment(
        &self,
        _req: CreateAssignmentRequest,
    ) -> Result<Assignment, TransportError> {
        Err(TransportError::not_implemented(Operation::CreateAssignment))
    }

    async fn list_assignments(
        &self,
        _req: ListAssignmentsRequest,
    ) -> Result<ListAssignmentsResponse, TransportError> {
        Err(TransportError::not_implemented(Operation::ListAssignments))
    }

    async fn delete_assignment(
        &self,
        _req: DeleteAssignmentRequest,
    ) -> Result<Empty, TransportError> {
        Err(TransportError::not_implemented(Operation::DeleteAssignment))
    }

    async fn search_assignments(
        &self,
        _req: SearchAssignmentsRequest,
    ) -> Result<SearchAssignmentsResponse, TransportError> {
        Err(TransportError::not_implemented(Operation::SearchAssignments))
    }

    async fn move_assignment(
        &self,
        _req: MoveAssignmentRequest,
    ) -> Result<Assignment, TransportError> {
        Err(TransportError::not_implemented(Operation::MoveAssignment))
    }

    async fn get_bi_reservation(
        &self,
        _req: GetBiReservationRequest,
    ) -> Result<BiReservation, TransportError> {
        Err(TransportError::not_implemented(Operation::GetBiReservation))
    }

    async fn update_bi_reservation(
        &self,
        _req: UpdateBiReservationRequest,
    ) -> Result<BiReservation, TransportError> {
        Err(TransportError::not_implemented(Operation::UpdateBiReservation))
    }
}

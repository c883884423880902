use reservation_sdk::types::{
    Assignment, AssignmentState, BiReservation, CapacityCommitment, CommitmentPlan,
    CommitmentState, CreateAssignmentRequest, CreateCapacityCommitmentRequest,
    CreateReservationRequest, DeleteAssignmentRequest, DeleteCapacityCommitmentRequest,
    DeleteReservationRequest, Empty, FieldMask, GetBiReservationRequest,
    GetCapacityCommitmentRequest, GetReservationRequest, ListAssignmentsRequest,
    ListAssignmentsResponse, ListCapacityCommitmentsRequest, ListCapacityCommitmentsResponse,
    ListReservationsRequest, ListReservationsResponse, MergeCapacityCommitmentsRequest,
    MoveAssignmentRequest, Reservation, SearchAssignmentsRequest, SearchAssignmentsResponse,
    SplitCapacityCommitmentRequest, SplitCapacityCommitmentResponse,
    UpdateBiReservationRequest, UpdateCapacityCommitmentRequest, UpdateReservationRequest,
};
use reservation_sdk::{ErrorKind, ReservationTransport, TransportError};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

const WILDCARD_RESERVATION: &str = "-";

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    reservations: BTreeMap<String, Reservation>,
    commitments: BTreeMap<String, CapacityCommitment>,
    assignments: BTreeMap<String, Assignment>,
    bi_reservations: BTreeMap<String, BiReservation>,
}

impl State {
    fn allocate_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

/// Reservation service held entirely in memory. Useful as a reference
/// transport for contract tests and for exercising the policy clients.
#[derive(Debug, Default)]
pub struct InMemoryTransport {
    state: Mutex<State>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, TransportError> {
        self.state
            .lock()
            .map_err(|_| TransportError::remote(ErrorKind::Internal, "in-memory state poisoned"))
    }
}

fn not_found(kind: &str, name: &str) -> TransportError {
    TransportError::remote(ErrorKind::NotFound, format!("{kind} {name} not found"))
        .with_detail("name", serde_json::json!(name))
}

fn invalid(message: impl Into<String>) -> TransportError {
    TransportError::remote(ErrorKind::InvalidArgument, message)
}

fn require_non_empty(value: &str, field: &str) -> Result<(), TransportError> {
    if value.trim().is_empty() {
        return Err(invalid(format!("{field} is required")));
    }
    Ok(())
}

fn last_segment(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Parent of `{parent}/{collection}/{id}`.
fn parent_of(name: &str) -> &str {
    name.rsplitn(3, '/').nth(2).unwrap_or_default()
}

fn applies(mask: Option<&FieldMask>, path: &str) -> bool {
    match mask {
        Some(mask) if !mask.paths.is_empty() => mask.contains(path),
        _ => true,
    }
}

fn paginate<T: Clone>(
    items: Vec<T>,
    page_size: Option<usize>,
    page_token: Option<&str>,
) -> Result<(Vec<T>, Option<String>), TransportError> {
    let offset = match page_token.filter(|token| !token.is_empty()) {
        Some(token) => token.parse::<usize>().map_err(|_| invalid("page_token is malformed"))?,
        None => 0,
    };
    let size = page_size.filter(|size| *size > 0).unwrap_or(usize::MAX);
    let page = items.iter().skip(offset).take(size).cloned().collect::<Vec<_>>();
    let consumed = offset.saturating_add(page.len());
    let next = (consumed < items.len()).then(|| consumed.to_string());
    Ok((page, next))
}

impl ReservationTransport for InMemoryTransport {
    fn create_reservation(
        &self,
        req: CreateReservationRequest,
    ) -> Result<Reservation, TransportError> {
        require_non_empty(&req.parent, "parent")?;
        let mut reservation = req.reservation.unwrap_or_default();
        if reservation.slot_capacity < 0 {
            return Err(invalid("slot_capacity must not be negative"));
        }
        let mut state = self.state()?;
        let id = match req.reservation_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id,
            None => state.allocate_id("reservation"),
        };
        let name = format!("{}/reservations/{id}", req.parent);
        if state.reservations.contains_key(&name) {
            return Err(TransportError::remote(
                ErrorKind::AlreadyExists,
                format!("reservation {name} already exists"),
            ));
        }
        reservation.name = name.clone();
        state.reservations.insert(name, reservation.clone());
        Ok(reservation)
    }

    fn list_reservations(
        &self,
        req: ListReservationsRequest,
    ) -> Result<ListReservationsResponse, TransportError> {
        let state = self.state()?;
        let matching = state
            .reservations
            .values()
            .filter(|reservation| parent_of(&reservation.name) == req.parent)
            .cloned()
            .collect::<Vec<_>>();
        let (reservations, next_page_token) =
            paginate(matching, req.page_size, req.page_token.as_deref())?;
        Ok(ListReservationsResponse { reservations, next_page_token })
    }

    fn get_reservation(&self, req: GetReservationRequest) -> Result<Reservation, TransportError> {
        let state = self.state()?;
        state
            .reservations
            .get(&req.name)
            .cloned()
            .ok_or_else(|| not_found("reservation", &req.name))
    }

    fn delete_reservation(&self, req: DeleteReservationRequest) -> Result<Empty, TransportError> {
        let mut state = self.state()?;
        if !state.reservations.contains_key(&req.name) {
            return Err(not_found("reservation", &req.name));
        }
        if state.assignments.values().any(|assignment| parent_of(&assignment.name) == req.name) {
            return Err(TransportError::remote(
                ErrorKind::FailedPrecondition,
                format!("reservation {} still has assignments", req.name),
            ));
        }
        state.reservations.remove(&req.name);
        Ok(Empty::default())
    }

    fn update_reservation(
        &self,
        req: UpdateReservationRequest,
    ) -> Result<Reservation, TransportError> {
        let patch = req.reservation.ok_or_else(|| invalid("reservation is required"))?;
        let mask = req.update_mask.as_ref();
        let mut state = self.state()?;
        let current = state
            .reservations
            .get_mut(&patch.name)
            .ok_or_else(|| not_found("reservation", &patch.name))?;
        if applies(mask, "slot_capacity") {
            if patch.slot_capacity < 0 {
                return Err(invalid("slot_capacity must not be negative"));
            }
            current.slot_capacity = patch.slot_capacity;
        }
        if applies(mask, "ignore_idle_slots") {
            current.ignore_idle_slots = patch.ignore_idle_slots;
        }
        Ok(current.clone())
    }

    fn create_capacity_commitment(
        &self,
        req: CreateCapacityCommitmentRequest,
    ) -> Result<CapacityCommitment, TransportError> {
        require_non_empty(&req.parent, "parent")?;
        let mut commitment = req.capacity_commitment.unwrap_or_default();
        if commitment.plan == CommitmentPlan::Unspecified {
            return Err(invalid("capacity commitment plan is required"));
        }
        if commitment.slot_count <= 0 {
            return Err(invalid("slot_count must be positive"));
        }
        let mut state = self.state()?;
        let id = match req.capacity_commitment_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id,
            None => state.allocate_id("commitment"),
        };
        let name = format!("{}/capacityCommitments/{id}", req.parent);
        if state.commitments.contains_key(&name) {
            return Err(TransportError::remote(
                ErrorKind::AlreadyExists,
                format!("capacity commitment {name} already exists"),
            ));
        }
        commitment.name = name.clone();
        commitment.state = CommitmentState::Active;
        state.commitments.insert(name, commitment.clone());
        Ok(commitment)
    }

    fn list_capacity_commitments(
        &self,
        req: ListCapacityCommitmentsRequest,
    ) -> Result<ListCapacityCommitmentsResponse, TransportError> {
        let state = self.state()?;
        let matching = state
            .commitments
            .values()
            .filter(|commitment| parent_of(&commitment.name) == req.parent)
            .cloned()
            .collect::<Vec<_>>();
        let (capacity_commitments, next_page_token) =
            paginate(matching, req.page_size, req.page_token.as_deref())?;
        Ok(ListCapacityCommitmentsResponse { capacity_commitments, next_page_token })
    }

    fn get_capacity_commitment(
        &self,
        req: GetCapacityCommitmentRequest,
    ) -> Result<CapacityCommitment, TransportError> {
        let state = self.state()?;
        state
            .commitments
            .get(&req.name)
            .cloned()
            .ok_or_else(|| not_found("capacity commitment", &req.name))
    }

    fn delete_capacity_commitment(
        &self,
        req: DeleteCapacityCommitmentRequest,
    ) -> Result<Empty, TransportError> {
        let mut state = self.state()?;
        state
            .commitments
            .remove(&req.name)
            .map(|_| Empty::default())
            .ok_or_else(|| not_found("capacity commitment", &req.name))
    }

    fn update_capacity_commitment(
        &self,
        req: UpdateCapacityCommitmentRequest,
    ) -> Result<CapacityCommitment, TransportError> {
        let patch =
            req.capacity_commitment.ok_or_else(|| invalid("capacity_commitment is required"))?;
        let mask = req.update_mask.as_ref();
        let mut state = self.state()?;
        let current = state
            .commitments
            .get_mut(&patch.name)
            .ok_or_else(|| not_found("capacity commitment", &patch.name))?;
        if applies(mask, "plan") && patch.plan != CommitmentPlan::Unspecified {
            current.plan = patch.plan;
        }
        if applies(mask, "renewal_plan") {
            current.renewal_plan = patch.renewal_plan;
        }
        Ok(current.clone())
    }

    fn split_capacity_commitment(
        &self,
        req: SplitCapacityCommitmentRequest,
    ) -> Result<SplitCapacityCommitmentResponse, TransportError> {
        let mut state = self.state()?;
        let original = state
            .commitments
            .get(&req.name)
            .cloned()
            .ok_or_else(|| not_found("capacity commitment", &req.name))?;
        if req.slot_count <= 0 || req.slot_count >= original.slot_count {
            return Err(invalid(format!(
                "slot_count must be between 1 and {}",
                original.slot_count - 1
            )));
        }

        let mut first = original.clone();
        first.slot_count -= req.slot_count;
        let id = state.allocate_id("commitment");
        let mut second = original;
        second.name = format!("{}/capacityCommitments/{id}", parent_of(&req.name));
        second.slot_count = req.slot_count;

        state.commitments.insert(first.name.clone(), first.clone());
        state.commitments.insert(second.name.clone(), second.clone());
        Ok(SplitCapacityCommitmentResponse { first: Some(first), second: Some(second) })
    }

    fn merge_capacity_commitments(
        &self,
        req: MergeCapacityCommitmentsRequest,
    ) -> Result<CapacityCommitment, TransportError> {
        if req.capacity_commitment_ids.len() < 2 {
            return Err(invalid("at least two capacity commitments are required to merge"));
        }
        let names = req
            .capacity_commitment_ids
            .iter()
            .map(|id| format!("{}/capacityCommitments/{id}", req.parent))
            .collect::<Vec<_>>();
        let distinct = names.iter().collect::<BTreeSet<_>>();
        if distinct.len() != names.len() {
            return Err(invalid("capacity commitment ids must not repeat"));
        }

        let mut state = self.state()?;
        let mut sources = Vec::with_capacity(names.len());
        for name in &names {
            let commitment =
                state.commitments.get(name).ok_or_else(|| not_found("capacity commitment", name))?;
            sources.push(commitment.clone());
        }
        let plan = sources[0].plan;
        if sources.iter().any(|commitment| commitment.plan != plan) {
            return Err(TransportError::remote(
                ErrorKind::FailedPrecondition,
                "capacity commitments with different plans cannot be merged",
            ));
        }

        let mut merged = sources[0].clone();
        merged.slot_count = sources.iter().map(|commitment| commitment.slot_count).sum();
        for name in &names[1..] {
            state.commitments.remove(name);
        }
        state.commitments.insert(merged.name.clone(), merged.clone());
        Ok(merged)
    }

    fn create_assignment(
        &self,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment, TransportError> {
        let mut assignment = req.assignment.unwrap_or_default();
        require_non_empty(&assignment.assignee, "assignment.assignee")?;
        let mut state = self.state()?;
        if !state.reservations.contains_key(&req.parent) {
            return Err(not_found("reservation", &req.parent));
        }
        let id = match req.assignment_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id,
            None => state.allocate_id("assignment"),
        };
        assignment.name = format!("{}/assignments/{id}", req.parent);
        if state.assignments.contains_key(&assignment.name) {
            return Err(TransportError::remote(
                ErrorKind::AlreadyExists,
                format!("assignment {} already exists", assignment.name),
            ));
        }
        assignment.state = AssignmentState::Active;
        state.assignments.insert(assignment.name.clone(), assignment.clone());
        Ok(assignment)
    }

    fn list_assignments(
        &self,
        req: ListAssignmentsRequest,
    ) -> Result<ListAssignmentsResponse, TransportError> {
        let state = self.state()?;
        let wildcard = last_segment(&req.parent) == WILDCARD_RESERVATION;
        let location = parent_of(&req.parent);
        let matching = state
            .assignments
            .values()
            .filter(|assignment| {
                let reservation = parent_of(&assignment.name);
                if wildcard {
                    parent_of(reservation) == location
                } else {
                    reservation == req.parent
                }
            })
            .cloned()
            .collect::<Vec<_>>();
        let (assignments, next_page_token) =
            paginate(matching, req.page_size, req.page_token.as_deref())?;
        Ok(ListAssignmentsResponse { assignments, next_page_token })
    }

    fn delete_assignment(&self, req: DeleteAssignmentRequest) -> Result<Empty, TransportError> {
        let mut state = self.state()?;
        state
            .assignments
            .remove(&req.name)
            .map(|_| Empty::default())
            .ok_or_else(|| not_found("assignment", &req.name))
    }

    fn search_assignments(
        &self,
        req: SearchAssignmentsRequest,
    ) -> Result<SearchAssignmentsResponse, TransportError> {
        let assignee = match req.query.trim() {
            "" => None,
            query => Some(
                query
                    .strip_prefix("assignee=")
                    .ok_or_else(|| invalid(format!("unsupported search query `{query}`")))?,
            ),
        };
        let state = self.state()?;
        let prefix = format!("{}/reservations/", req.parent);
        let matching = state
            .assignments
            .values()
            .filter(|assignment| assignment.name.starts_with(&prefix))
            .filter(|assignment| assignee.map_or(true, |wanted| assignment.assignee == wanted))
            .cloned()
            .collect::<Vec<_>>();
        let (assignments, next_page_token) =
            paginate(matching, req.page_size, req.page_token.as_deref())?;
        Ok(SearchAssignmentsResponse { assignments, next_page_token })
    }

    fn move_assignment(&self, req: MoveAssignmentRequest) -> Result<Assignment, TransportError> {
        let mut state = self.state()?;
        if !state.reservations.contains_key(&req.destination_id) {
            return Err(not_found("reservation", &req.destination_id));
        }
        if !state.assignments.contains_key(&req.name) {
            return Err(not_found("assignment", &req.name));
        }
        let target = format!("{}/assignments/{}", req.destination_id, last_segment(&req.name));
        if target != req.name && state.assignments.contains_key(&target) {
            return Err(TransportError::remote(
                ErrorKind::AlreadyExists,
                format!("assignment {target} already exists"),
            ));
        }
        let mut assignment =
            state.assignments.remove(&req.name).ok_or_else(|| not_found("assignment", &req.name))?;
        assignment.name = target;
        state.assignments.insert(assignment.name.clone(), assignment.clone());
        Ok(assignment)
    }

    fn get_bi_reservation(
        &self,
        req: GetBiReservationRequest,
    ) -> Result<BiReservation, TransportError> {
        require_non_empty(&req.name, "name")?;
        let state = self.state()?;
        Ok(state
            .bi_reservations
            .get(&req.name)
            .cloned()
            .unwrap_or_else(|| BiReservation { name: req.name, ..BiReservation::default() }))
    }

    fn update_bi_reservation(
        &self,
        req: UpdateBiReservationRequest,
    ) -> Result<BiReservation, TransportError> {
        let patch = req.bi_reservation.ok_or_else(|| invalid("bi_reservation is required"))?;
        require_non_empty(&patch.name, "bi_reservation.name")?;
        if patch.size < 0 {
            return Err(invalid("size must not be negative"));
        }
        let mut state = self.state()?;
        let current = state
            .bi_reservations
            .entry(patch.name.clone())
            .or_insert_with(|| BiReservation {
                name: patch.name.clone(),
                ..BiReservation::default()
            });
        if applies(req.update_mask.as_ref(), "size") {
            current.size = patch.size;
        }
        Ok(current.clone())
    }
}

macro_rules! delegate_async {
    ($($method:ident => $operation:ident($request:ty) -> $response:ty;)*) => {
        #[async_trait::async_trait]
        impl reservation_sdk::ReservationTransportAsync for InMemoryTransport {
            $(
                async fn $method(&self, req: $request) -> Result<$response, TransportError> {
                    ReservationTransport::$method(self, req)
                }
            )*
        }
    };
}

for_each_operation!(delegate_async);

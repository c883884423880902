use crate::api::ReservationTransport;
#[cfg(feature = "sdk-async")]
use crate::api::ReservationTransportAsync;
use crate::base::TransportBase;
use crate::error::TransportError;
use crate::operation::Operation;
use crate::policy::{OperationDescriptor, RetryPolicy};
use crate::retry;
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
use std::time::Duration;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum RetrySetting {
    /// Use the operation's entry in the policy table.
    #[default]
    Default,
    Disabled,
    Custom(RetryPolicy),
}

/// Per-call overrides of the policy table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallOptions {
    pub timeout: Option<Duration>,
    pub retry: RetrySetting,
}

impl CallOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = RetrySetting::Custom(policy);
        self
    }

    pub fn without_retry(mut self) -> Self {
        self.retry = RetrySetting::Disabled;
        self
    }
}

/// Effective timeout and retry policy for one call.
#[derive(Clone, Debug, PartialEq)]
pub struct CallPlan {
    pub operation: Operation,
    pub timeout: Duration,
    pub retry: Option<RetryPolicy>,
}

impl CallPlan {
    pub fn resolve(descriptor: &OperationDescriptor, options: &CallOptions) -> Self {
        let retry = match &options.retry {
            RetrySetting::Default => descriptor.retry.clone(),
            RetrySetting::Disabled => None,
            RetrySetting::Custom(policy) => Some(policy.clone()),
        };
        Self {
            operation: descriptor.operation,
            timeout: options.timeout.unwrap_or(descriptor.default_timeout),
            retry,
        }
    }
}

/// Routes blocking calls through each operation's policy.
///
/// Blocking attempts cannot be preempted, so the transport is expected to
/// bound its own I/O by [`CallPlan::timeout`]; the client only guarantees it
/// never sleeps past the retry deadline.
#[derive(Debug)]
pub struct ReservationClient<T> {
    base: TransportBase,
    transport: T,
}

impl<T: ReservationTransport> ReservationClient<T> {
    pub fn new(base: TransportBase, transport: T) -> Self {
        Self { base, transport }
    }

    pub fn base(&self) -> &TransportBase {
        &self.base
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    pub fn plan(&self, operation: Operation, options: &CallOptions) -> CallPlan {
        CallPlan::resolve(self.base.descriptor(operation), options)
    }
}

/// Routes async calls through each operation's policy, bounding every
/// attempt by the call timeout.
#[cfg(feature = "sdk-async")]
#[derive(Debug)]
pub struct AsyncReservationClient<T> {
    base: TransportBase,
    transport: T,
}

#[cfg(feature = "sdk-async")]
impl<T: ReservationTransportAsync> AsyncReservationClient<T> {
    pub fn new(base: TransportBase, transport: T) -> Self {
        Self { base, transport }
    }

    pub fn base(&self) -> &TransportBase {
        &self.base
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    pub fn plan(&self, operation: Operation, options: &CallOptions) -> CallPlan {
        CallPlan::resolve(self.base.descriptor(operation), options)
    }
}

macro_rules! wrapped_operations {
    ($($method:ident / $with_options:ident => $operation:ident($request:ty) -> $response:ty;)*) => {
        impl<T: ReservationTransport> ReservationClient<T> {
            $(
                pub fn $method(&self, req: $request) -> Result<$response, TransportError> {
                    self.$with_options(req, &CallOptions::default())
                }

                pub fn $with_options(
                    &self,
                    req: $request,
                    options: &CallOptions,
                ) -> Result<$response, TransportError> {
                    let plan = self.plan(Operation::$operation, options);
                    let transport = &self.transport;
                    retry::run_blocking(plan.operation, plan.retry.as_ref(), || {
                        transport.$method(req.clone())
                    })
                }
            )*
        }

        #[cfg(feature = "sdk-async")]
        impl<T: ReservationTransportAsync> AsyncReservationClient<T> {
            $(
                pub async fn $method(&self, req: $request) -> Result<$response, TransportError> {
                    self.$with_options(req, &CallOptions::default()).await
                }

                pub async fn $with_options(
                    &self,
                    req: $request,
                    options: &CallOptions,
                ) -> Result<$response, TransportError> {
                    let plan = self.plan(Operation::$operation, options);
                    let transport = &self.transport;
                    retry::run_async(plan.operation, plan.timeout, plan.retry.as_ref(), || {
                        transport.$method(req.clone())
                    })
                    .await
                }
            )*
        }
    };
}

wrapped_operations! {
    create_reservation / create_reservation_with
        => CreateReservation(CreateReservationRequest) -> Reservation;
    list_reservations / list_reservations_with
        => ListReservations(ListReservationsRequest) -> ListReservationsResponse;
    get_reservation / get_reservation_with
        => GetReservation(GetReservationRequest) -> Reservation;
    delete_reservation / delete_reservation_with
        => DeleteReservation(DeleteReservationRequest) -> Empty;
    update_reservation / update_reservation_with
        => UpdateReservation(UpdateReservationRequest) -> Reservation;
    create_capacity_commitment / create_capacity_commitment_with
        => CreateCapacityCommitment(CreateCapacityCommitmentRequest) -> CapacityCommitment;
    list_capacity_commitments / list_capacity_commitments_with
        => ListCapacityCommitments(ListCapacityCommitmentsRequest)
            -> ListCapacityCommitmentsResponse;
    get_capacity_commitment / get_capacity_commitment_with
        => GetCapacityCommitment(GetCapacityCommitmentRequest) -> CapacityCommitment;
    delete_capacity_commitment / delete_capacity_commitment_with
        => DeleteCapacityCommitment(DeleteCapacityCommitmentRequest) -> Empty;
    update_capacity_commitment / update_capacity_commitment_with
        => UpdateCapacityCommitment(UpdateCapacityCommitmentRequest) -> CapacityCommitment;
    split_capacity_commitment / split_capacity_commitment_with
        => SplitCapacityCommitment(SplitCapacityCommitmentRequest)
            -> SplitCapacityCommitmentResponse;
    merge_capacity_commitments / merge_capacity_commitments_with
        => MergeCapacityCommitments(MergeCapacityCommitmentsRequest) -> CapacityCommitment;
    create_assignment / create_assignment_with
        => CreateAssignment(CreateAssignmentRequest) -> Assignment;
    list_assignments / list_assignments_with
        => ListAssignments(ListAssignmentsRequest) -> ListAssignmentsResponse;
    delete_assignment / delete_assignment_with
        => DeleteAssignment(DeleteAssignmentRequest) -> Empty;
    search_assignments / search_assignments_with
        => SearchAssignments(SearchAssignmentsRequest) -> SearchAssignmentsResponse;
    move_assignment / move_assignment_with
        => MoveAssignment(MoveAssignmentRequest) -> Assignment;
    get_bi_reservation / get_bi_reservation_with
        => GetBiReservation(GetBiReservationRequest) -> BiReservation;
    update_bi_reservation / update_bi_reservation_with
        => UpdateBiReservation(UpdateBiReservationRequest) -> BiReservation;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransportOptions;
    use crate::credentials::{CredentialResolver, Credentials, EnvironmentResolver};
    use crate::error::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn base() -> TransportBase {
        let options = TransportOptions::default()
            .with_credentials(Credentials::from_access_token("test-token"));
        let resolver: &dyn CredentialResolver =
            &EnvironmentResolver::with_vars::<String, String>([]);
        TransportBase::with_resolver(options, resolver).expect("construct base")
    }

    /// Fails `get_reservation` with the scripted kind until `failures` runs out.
    struct Flaky {
        failures: AtomicUsize,
        kind: ErrorKind,
        calls: AtomicUsize,
    }

    impl Flaky {
        fn new(failures: usize, kind: ErrorKind) -> Self {
            Self { failures: AtomicUsize::new(failures), kind, calls: AtomicUsize::new(0) }
        }

        fn attempt(&self, name: &str) -> Result<Reservation, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let left = self.failures.load(Ordering::SeqCst);
            if left > 0 {
                self.failures.store(left - 1, Ordering::SeqCst);
                return Err(TransportError::remote(self.kind, "scripted failure"));
            }
            Ok(Reservation { name: name.to_owned(), ..Reservation::default() })
        }
    }

    impl ReservationTransport for Flaky {
        fn get_reservation(
            &self,
            req: GetReservationRequest,
        ) -> Result<Reservation, TransportError> {
            self.attempt(&req.name)
        }

        fn create_reservation(
            &self,
            req: CreateReservationRequest,
        ) -> Result<Reservation, TransportError> {
            self.attempt(&req.parent)
        }
    }

    fn get(name: &str) -> GetReservationRequest {
        GetReservationRequest { name: name.to_owned() }
    }

    #[test]
    fn plan_applies_overrides() {
        let client = ReservationClient::new(base(), Flaky::new(0, ErrorKind::Internal));
        let default_plan = client.plan(Operation::GetReservation, &CallOptions::default());
        assert_eq!(default_plan.timeout, Duration::from_secs(60));
        assert_eq!(default_plan.retry, Some(RetryPolicy::transient()));

        let overridden = client.plan(
            Operation::GetReservation,
            &CallOptions::default().with_timeout(Duration::from_secs(5)).without_retry(),
        );
        assert_eq!(overridden.timeout, Duration::from_secs(5));
        assert_eq!(overridden.retry, None);

        let custom = client.plan(
            Operation::CreateReservation,
            &CallOptions::default().with_retry(RetryPolicy::transient()),
        );
        assert!(custom.retry.is_some());
    }

    #[test]
    fn retryable_operation_recovers_from_unavailable() {
        let client =
            ReservationClient::new(base(), Flaky::new(2, ErrorKind::ServiceUnavailable));
        let reservation = client.get_reservation(get("reservations/r1")).expect("recovers");
        assert_eq!(reservation.name, "reservations/r1");
        assert_eq!(client.transport().calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn unlisted_errors_propagate_immediately() {
        let client = ReservationClient::new(base(), Flaky::new(2, ErrorKind::PermissionDenied));
        let err = client.get_reservation(get("reservations/r1")).expect_err("denied");
        assert_eq!(err.kind, ErrorKind::PermissionDenied);
        assert_eq!(client.transport().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn mutations_do_not_retry_transient_errors() {
        let client =
            ReservationClient::new(base(), Flaky::new(1, ErrorKind::ServiceUnavailable));
        let err = client
            .create_reservation(CreateReservationRequest {
                parent: "projects/p/locations/US".to_owned(),
                ..CreateReservationRequest::default()
            })
            .expect_err("single shot");
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
        assert_eq!(client.transport().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn disabled_retry_makes_reads_single_shot() {
        let client =
            ReservationClient::new(base(), Flaky::new(1, ErrorKind::ServiceUnavailable));
        let err = client
            .get_reservation_with(get("reservations/r1"), &CallOptions::default().without_retry())
            .expect_err("single shot");
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
        assert_eq!(client.transport().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unimplemented_operations_are_not_retried() {
        let client = ReservationClient::new(base(), Flaky::new(0, ErrorKind::Internal));
        let err = client
            .list_reservations(ListReservationsRequest::default())
            .expect_err("not implemented");
        assert_eq!(err.kind, ErrorKind::NotImplemented);
    }
}

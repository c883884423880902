#![cfg(feature = "sdk-async")]

use reservation_sdk::error_code;
use reservation_sdk::{
    build_policy_table, AsyncReservationClient, Credentials, EnvironmentResolver, ErrorKind,
    Operation, ReservationClient, ReservationTransport, ReservationTransportAsync, RetryPolicy,
    TransportBase, TransportError, TransportOptions,
};
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;
use std::time::Duration;

struct Unimplemented;

impl ReservationTransport for Unimplemented {}

#[async_trait::async_trait]
impl ReservationTransportAsync for Unimplemented {}

fn base() -> TransportBase {
    let options =
        TransportOptions::default().with_credentials(Credentials::from_access_token("contract"));
    TransportBase::with_resolver(options, &EnvironmentResolver::with_vars::<String, String>([]))
        .expect("construct base")
}

fn assert_not_implemented(operation: Operation, err: TransportError) {
    assert_eq!(err.kind, ErrorKind::NotImplemented, "{operation}");
    assert_eq!(err.machine_code, error_code::OPERATION_NOT_IMPLEMENTED);
    assert_eq!(
        err.details.get("operation"),
        Some(&JsonValue::String(operation.as_str().to_owned()))
    );
}

macro_rules! every_operation {
    ($check:ident) => {
        $check!(create_reservation, CreateReservation);
        $check!(list_reservations, ListReservations);
        $check!(get_reservation, GetReservation);
        $check!(delete_reservation, DeleteReservation);
        $check!(update_reservation, UpdateReservation);
        $check!(create_capacity_commitment, CreateCapacityCommitment);
        $check!(list_capacity_commitments, ListCapacityCommitments);
        $check!(get_capacity_commitment, GetCapacityCommitment);
        $check!(delete_capacity_commitment, DeleteCapacityCommitment);
        $check!(update_capacity_commitment, UpdateCapacityCommitment);
        $check!(split_capacity_commitment, SplitCapacityCommitment);
        $check!(merge_capacity_commitments, MergeCapacityCommitments);
        $check!(create_assignment, CreateAssignment);
        $check!(list_assignments, ListAssignments);
        $check!(delete_assignment, DeleteAssignment);
        $check!(search_assignments, SearchAssignments);
        $check!(move_assignment, MoveAssignment);
        $check!(get_bi_reservation, GetBiReservation);
        $check!(update_bi_reservation, UpdateBiReservation);
    };
}

#[test]
fn policy_table_covers_every_operation_once() {
    let table = build_policy_table();
    assert_eq!(table.len(), 19);
    let names = table.iter().map(|entry| entry.name()).collect::<BTreeSet<_>>();
    assert_eq!(names.len(), 19);
    for operation in Operation::ALL {
        assert_eq!(table.descriptor(operation).operation, operation);
        assert_eq!(table.descriptor(operation).default_timeout, Duration::from_secs(60));
    }
}

#[test]
fn retrying_operations_share_the_transient_policy() {
    let table = build_policy_table();
    let retrying = table.retryable_operations().collect::<Vec<_>>();
    assert_eq!(
        retrying,
        vec![
            Operation::ListReservations,
            Operation::GetReservation,
            Operation::DeleteReservation,
            Operation::ListCapacityCommitments,
            Operation::GetCapacityCommitment,
            Operation::DeleteCapacityCommitment,
            Operation::ListAssignments,
            Operation::DeleteAssignment,
            Operation::SearchAssignments,
            Operation::GetBiReservation,
        ]
    );

    let expected_conditions =
        BTreeSet::from([ErrorKind::DeadlineExceeded, ErrorKind::ServiceUnavailable]);
    for operation in &retrying {
        let retry = table.descriptor(*operation).retry.as_ref().expect("retry policy");
        assert_eq!(retry.retryable, expected_conditions);
        assert_eq!(retry.initial_backoff, Duration::from_millis(100));
        assert_eq!(retry.max_backoff, Duration::from_secs(60));
        assert_eq!(retry.deadline, Duration::from_secs(60));
        assert!((retry.multiplier - 1.3).abs() < f64::EPSILON);
        assert_eq!(retry, &RetryPolicy::transient());
    }

    let single_shot = table.iter().filter(|entry| entry.retry.is_none()).count();
    assert_eq!(single_shot, 9);
}

#[test]
fn default_transport_rejects_every_blocking_operation() {
    let transport = Unimplemented;
    macro_rules! check {
        ($method:ident, $operation:ident) => {
            let err = ReservationTransport::$method(&transport, Default::default())
                .expect_err(stringify!($method));
            assert_not_implemented(Operation::$operation, err);
        };
    }
    every_operation!(check);
}

#[test]
fn client_surfaces_not_implemented_without_retrying() {
    let client = ReservationClient::new(base(), Unimplemented);
    macro_rules! check {
        ($method:ident, $operation:ident) => {
            let err = client.$method(Default::default()).expect_err(stringify!($method));
            assert_not_implemented(Operation::$operation, err);
        };
    }
    every_operation!(check);
}

#[tokio::test]
async fn default_transport_rejects_every_async_operation() {
    let client = AsyncReservationClient::new(base(), Unimplemented);
    macro_rules! check {
        ($method:ident, $operation:ident) => {
            let err = ReservationTransportAsync::$method(&Unimplemented, Default::default())
                .await
                .expect_err(stringify!($method));
            assert_not_implemented(Operation::$operation, err);

            let err = client.$method(Default::default()).await.expect_err(stringify!($method));
            assert_not_implemented(Operation::$operation, err);
        };
    }
    every_operation!(check);
}

#[test]
fn transport_errors_render_kind_code_and_message() {
    let err = TransportError::not_implemented(Operation::MoveAssignment);
    assert_eq!(
        err.to_string(),
        concat!(
            "not_implemented [SDK_OPERATION_NOT_IMPLEMENTED]: ",
            "transport does not implement move_assignment"
        )
    );
    assert!(!err.kind.is_remote());
    assert!(TransportError::service_unavailable("busy").kind.is_remote());
}

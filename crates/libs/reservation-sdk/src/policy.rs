use crate::error::ErrorKind;
use crate::operation::{Operation, OPERATION_COUNT};
use std::collections::BTreeSet;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(100);
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(60);
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 1.3;
pub const DEFAULT_RETRY_DEADLINE: Duration = Duration::from_secs(60);

const TRANSIENT_CONDITIONS: [ErrorKind; 2] =
    [ErrorKind::DeadlineExceeded, ErrorKind::ServiceUnavailable];

/// Exponential backoff retry policy applied to a single operation.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub multiplier: f64,
    pub retryable: BTreeSet<ErrorKind>,
    /// Upper bound on the whole call, measured from the first attempt.
    pub deadline: Duration,
}

impl RetryPolicy {
    /// Policy shared by every idempotent operation: retry transient remote
    /// failures for up to a minute.
    pub fn transient() -> Self {
        Self {
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
            multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            retryable: TRANSIENT_CONDITIONS.into_iter().collect(),
            deadline: DEFAULT_RETRY_DEADLINE,
        }
    }

    pub fn with_initial_backoff(mut self, initial_backoff: Duration) -> Self {
        self.initial_backoff = initial_backoff;
        self
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_retryable(mut self, kinds: impl IntoIterator<Item = ErrorKind>) -> Self {
        self.retryable = kinds.into_iter().collect();
        self
    }

    pub fn is_retryable(&self, kind: ErrorKind) -> bool {
        self.retryable.contains(&kind)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::transient()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OperationDescriptor {
    pub operation: Operation,
    pub default_timeout: Duration,
    pub retry: Option<RetryPolicy>,
}

impl OperationDescriptor {
    pub fn name(&self) -> &'static str {
        self.operation.as_str()
    }

    pub fn request_type(&self) -> &'static str {
        self.operation.request_type()
    }

    pub fn response_type(&self) -> &'static str {
        self.operation.response_type()
    }

    pub fn is_retryable(&self) -> bool {
        self.retry.is_some()
    }
}

/// Immutable per-operation policy lookup, one entry per [`Operation`].
#[derive(Clone, Debug, PartialEq)]
pub struct PolicyTable {
    entries: [OperationDescriptor; OPERATION_COUNT],
}

impl PolicyTable {
    pub fn descriptor(&self, operation: Operation) -> &OperationDescriptor {
        &self.entries[operation as usize]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.entries.iter()
    }

    pub fn retryable_operations(&self) -> impl Iterator<Item = Operation> + '_ {
        self.entries.iter().filter(|entry| entry.is_retryable()).map(|entry| entry.operation)
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        build_policy_table()
    }
}

pub fn build_policy_table() -> PolicyTable {
    PolicyTable { entries: Operation::ALL.map(default_descriptor) }
}

pub fn default_descriptor(operation: Operation) -> OperationDescriptor {
    OperationDescriptor {
        operation,
        default_timeout: DEFAULT_TIMEOUT,
        retry: retries_by_default(operation).then(RetryPolicy::transient),
    }
}

/// Reads and deletes are safe to replay; creates and mutations are not.
pub fn retries_by_default(operation: Operation) -> bool {
    matches!(
        operation,
        Operation::ListReservations
            | Operation::GetReservation
            | Operation::DeleteReservation
            | Operation::ListCapacityCommitments
            | Operation::GetCapacityCommitment
            | Operation::DeleteCapacityCommitment
            | Operation::ListAssignments
            | Operation::DeleteAssignment
            | Operation::SearchAssignments
            | Operation::GetBiReservation
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_lookup_matches_operation() {
        let table = build_policy_table();
        for op in Operation::ALL {
            assert_eq!(table.descriptor(op).operation, op);
        }
    }

    #[test]
    fn table_covers_every_operation_with_sixty_second_timeout() {
        let table = build_policy_table();
        assert_eq!(table.len(), 19);
        assert!(table.iter().all(|entry| entry.default_timeout == Duration::from_secs(60)));
    }

    #[test]
    fn mutations_are_not_retried() {
        let table = build_policy_table();
        for op in [
            Operation::CreateReservation,
            Operation::UpdateReservation,
            Operation::SplitCapacityCommitment,
            Operation::MergeCapacityCommitments,
            Operation::MoveAssignment,
            Operation::UpdateBiReservation,
        ] {
            assert!(table.descriptor(op).retry.is_none(), "{op} must not retry");
        }
    }

    #[test]
    fn transient_policy_shape() {
        let policy = RetryPolicy::transient();
        assert_eq!(policy.initial_backoff, Duration::from_millis(100));
        assert_eq!(policy.max_backoff, Duration::from_secs(60));
        assert_eq!(policy.deadline, Duration::from_secs(60));
        assert!((policy.multiplier - 1.3).abs() < f64::EPSILON);
        assert!(policy.is_retryable(ErrorKind::ServiceUnavailable));
        assert!(policy.is_retryable(ErrorKind::DeadlineExceeded));
        assert!(!policy.is_retryable(ErrorKind::Internal));
    }
}

use reservation_sdk::{build_policy_table, ErrorKind, Operation, RetryPolicy};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug)]
struct PolicyRow {
    operation: String,
    timeout_secs: String,
    retry: String,
    conditions: String,
}

fn load_policy_matrix() -> String {
    let path =
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../docs/contracts/policy-matrix.md");
    fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()))
}

fn is_separator(line: &str) -> bool {
    line.chars().all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

fn parse_row(line: &str) -> Option<PolicyRow> {
    let cells = line.trim_matches('|').split('|').map(str::trim).collect::<Vec<_>>();
    match cells.as_slice() {
        [operation, timeout_secs, retry, conditions] => Some(PolicyRow {
            operation: operation.trim_matches('`').to_owned(),
            timeout_secs: (*timeout_secs).to_owned(),
            retry: retry.to_ascii_lowercase(),
            conditions: conditions.to_ascii_lowercase(),
        }),
        _ => None,
    }
}

/// Rows of the first table whose header has a `Retry on` column.
fn parse_policy_rows(markdown: &str) -> Vec<PolicyRow> {
    markdown
        .lines()
        .map(str::trim)
        .skip_while(|line| !(line.starts_with('|') && line.contains("| Retry on |")))
        .skip(1)
        .take_while(|line| line.starts_with('|'))
        .filter(|line| !is_separator(line))
        .filter_map(parse_row)
        .collect()
}

fn parse_conditions(raw: &str) -> BTreeSet<ErrorKind> {
    if raw == "-" {
        return BTreeSet::new();
    }
    raw.split(',')
        .map(str::trim)
        .map(|name| match name {
            "deadline_exceeded" => ErrorKind::DeadlineExceeded,
            "service_unavailable" => ErrorKind::ServiceUnavailable,
            other => panic!("unexpected retry condition '{other}' in policy matrix"),
        })
        .collect()
}

fn assert_row_matches_table(row: &PolicyRow, operation: Operation) {
    let table = build_policy_table();
    let descriptor = table.descriptor(operation);

    let timeout = row
        .timeout_secs
        .parse::<u64>()
        .unwrap_or_else(|err| panic!("bad timeout '{}' for {operation}: {err}", row.timeout_secs));
    assert_eq!(
        descriptor.default_timeout,
        Duration::from_secs(timeout),
        "{operation} timeout differs between matrix and policy table"
    );

    match row.retry.as_str() {
        "transient" => {
            let retry = descriptor
                .retry
                .as_ref()
                .unwrap_or_else(|| panic!("{operation} is transient in the matrix only"));
            assert_eq!(retry, &RetryPolicy::transient(), "{operation} uses a non-shared policy");
            assert_eq!(
                retry.retryable,
                parse_conditions(&row.conditions),
                "{operation} retry conditions differ between matrix and policy table"
            );
        }
        "none" => {
            assert!(
                descriptor.retry.is_none(),
                "{operation} marked non-retrying in matrix but the policy table retries it"
            );
            assert!(parse_conditions(&row.conditions).is_empty());
        }
        other => panic!("unknown retry mode '{other}' for {operation}"),
    }
}

#[test]
fn policy_matrix_table_matches_policy_table() {
    let markdown = load_policy_matrix();
    let rows = parse_policy_rows(&markdown);
    assert!(!rows.is_empty(), "policy matrix table is empty");

    let mut seen = HashSet::new();
    for row in &rows {
        let operation = row
            .operation
            .parse::<Operation>()
            .unwrap_or_else(|err| panic!("policy matrix row: {err}"));
        assert!(seen.insert(operation), "{operation} listed twice in policy matrix");
        assert_row_matches_table(row, operation);
    }

    for operation in Operation::ALL {
        assert!(seen.contains(&operation), "policy matrix is missing {operation}");
    }
}

#[test]
fn policy_matrix_parser_ignores_rows_outside_the_table() {
    let markdown = "\
| Kind | Raised by |
|---|---|
| `config` | construction |

| Operation | Timeout (s) | Retry | Retry on |
|---|---|---|---|
| `get_reservation` | 60 | Transient | deadline_exceeded, service_unavailable |

| Operation | Timeout (s) | Retry | Retry on |
| `list_reservations` | 60 | transient | - |
";
    let rows = parse_policy_rows(markdown);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].operation, "get_reservation");
    assert_eq!(rows[0].retry, "transient");
}

#[test]
fn policy_matrix_parser_skips_aligned_separators_and_short_rows() {
    let markdown = "\
| Operation | Timeout (s) | Retry | Retry on |
| :--- | ---: | :---: | --- |
| `get_bi_reservation` | 60 | transient | deadline_exceeded |
| `split_capacity_commitment` | 60 |
| `move_assignment` | 60 | none | - |
";
    let rows = parse_policy_rows(markdown);
    let operations = rows.iter().map(|row| row.operation.as_str()).collect::<Vec<_>>();
    assert_eq!(operations, ["get_bi_reservation", "move_assignment"]);
    assert_eq!(rows[1].conditions, "-");
}

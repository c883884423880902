pub mod api;
pub mod base;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod operation;
pub mod policy;
pub mod retry;
pub mod types;

pub use api::ReservationTransport;
#[cfg(feature = "sdk-async")]
pub use api::ReservationTransportAsync;
pub use base::TransportBase;
#[cfg(feature = "sdk-async")]
pub use client::AsyncReservationClient;
pub use client::{CallOptions, CallPlan, ReservationClient, RetrySetting};
pub use config::{
    normalize_endpoint, resolve_scopes, ClientInfo, TransportConfig, TransportOptions,
    AUTH_SCOPES, DEFAULT_HOST, DEFAULT_PORT,
};
pub use credentials::{
    CredentialDocument, CredentialResolver, CredentialSource, Credentials, EnvironmentResolver,
};
pub use error::{code as error_code, ErrorKind, TransportError};
pub use operation::Operation;
pub use policy::{build_policy_table, OperationDescriptor, PolicyTable, RetryPolicy};

pub const SERVICE_NAME: &str = "google.cloud.bigquery.reservation.v1.ReservationService";

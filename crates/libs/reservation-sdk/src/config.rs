use crate::credentials::{CredentialResolver, Credentials};
use crate::error::{code, TransportError};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_HOST: &str = "bigqueryreservation.googleapis.com";
pub const DEFAULT_PORT: u16 = 443;

pub const AUTH_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/bigquery",
    "https://www.googleapis.com/auth/cloud-platform",
];

pub const API_CLIENT_HEADER: &str = "x-goog-api-client";
pub const USER_AGENT_HEADER: &str = "user-agent";

/// Library identification attached to outgoing calls.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ClientInfo {
    pub library_name: String,
    pub library_version: String,
    pub user_agent_suffix: Option<String>,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            library_name: env!("CARGO_PKG_NAME").to_owned(),
            library_version: env!("CARGO_PKG_VERSION").to_owned(),
            user_agent_suffix: None,
        }
    }
}

impl ClientInfo {
    pub fn user_agent(&self) -> String {
        let base = format!("{}/{}", self.library_name, self.library_version);
        match self.user_agent_suffix.as_deref().map(str::trim) {
            Some(suffix) if !suffix.is_empty() => format!("{base} {suffix}"),
            _ => base,
        }
    }

    pub fn api_client_header(&self) -> String {
        format!("gl-rust gapic/{}", self.library_version)
    }

    pub fn metadata(&self) -> Vec<(&'static str, String)> {
        vec![(API_CLIENT_HEADER, self.api_client_header()), (USER_AGENT_HEADER, self.user_agent())]
    }
}

/// Caller-facing construction inputs. Everything except `credentials` can be
/// read from TOML.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TransportOptions {
    pub host: Option<String>,
    #[serde(skip)]
    pub credentials: Option<Credentials>,
    pub credentials_file: Option<PathBuf>,
    pub scopes: Option<Vec<String>>,
    pub quota_project_id: Option<String>,
    pub client_info: Option<ClientInfo>,
}

impl TransportOptions {
    pub fn from_toml(input: &str) -> Result<Self, TransportError> {
        toml::from_str(input).map_err(|err| {
            TransportError::config(
                code::CONFIG_INVALID,
                format!("invalid transport options: {err}"),
            )
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TransportError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| {
            TransportError::config(
                code::CONFIG_INVALID,
                format!("failed to read transport options: {err}"),
            )
            .with_detail("path", JsonValue::String(path.display().to_string()))
        })?;
        Self::from_toml(&contents)
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_file = Some(path.into());
        self
    }

    pub fn with_scopes<S: Into<String>>(mut self, scopes: impl IntoIterator<Item = S>) -> Self {
        self.scopes = Some(scopes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_quota_project(mut self, quota_project_id: impl Into<String>) -> Self {
        self.quota_project_id = Some(quota_project_id.into());
        self
    }

    pub fn with_client_info(mut self, client_info: ClientInfo) -> Self {
        self.client_info = Some(client_info);
        self
    }
}

/// Appends the default HTTPS port when `host` names none.
pub fn normalize_endpoint(host: &str) -> String {
    let host = host.trim();
    if host.contains(':') {
        host.to_owned()
    } else {
        format!("{host}:{DEFAULT_PORT}")
    }
}

/// Caller scopes win; absent or empty scopes fall back to [`AUTH_SCOPES`].
pub fn resolve_scopes(scopes: Option<&[String]>) -> Vec<String> {
    match scopes {
        Some(scopes) if !scopes.is_empty() => scopes.to_vec(),
        _ => AUTH_SCOPES.iter().map(|scope| (*scope).to_owned()).collect(),
    }
}

/// Fully resolved, immutable transport configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct TransportConfig {
    endpoint: String,
    credentials: Credentials,
    scopes: Vec<String>,
    quota_project_id: Option<String>,
    client_info: ClientInfo,
}

impl TransportConfig {
    pub fn resolve(
        options: TransportOptions,
        resolver: &dyn CredentialResolver,
    ) -> Result<Self, TransportError> {
        let TransportOptions {
            host,
            credentials,
            credentials_file,
            scopes,
            quota_project_id,
            client_info,
        } = options;

        let host = host.unwrap_or_else(|| DEFAULT_HOST.to_owned());
        if host.trim().is_empty() {
            return Err(TransportError::config(code::CONFIG_INVALID, "host must not be empty"));
        }
        let endpoint = normalize_endpoint(&host);
        let scopes = resolve_scopes(scopes.as_deref());
        let quota = quota_project_id.as_deref();

        let credentials = match (credentials, credentials_file) {
            (Some(_), Some(path)) => {
                return Err(TransportError::config(
                    code::CONFIG_DUPLICATE_CREDENTIAL_ARGS,
                    "'credentials_file' and 'credentials' are mutually exclusive",
                )
                .with_detail("credentials_file", JsonValue::String(path.display().to_string())));
            }
            (None, Some(path)) => resolver.load_from_file(&path, &scopes, quota)?,
            (None, None) => resolver.default_credentials(&scopes, quota)?,
            (Some(credentials), None) => credentials,
        };

        Ok(Self {
            endpoint,
            credentials,
            scopes,
            quota_project_id,
            client_info: client_info.unwrap_or_default(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    pub fn quota_project_id(&self) -> Option<&str> {
        self.quota_project_id.as_deref()
    }

    pub fn client_info(&self) -> &ClientInfo {
        &self.client_info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_gets_default_port() {
        assert_eq!(normalize_endpoint("example.com"), "example.com:443");
        assert_eq!(normalize_endpoint("example.com:8443"), "example.com:8443");
        assert_eq!(normalize_endpoint(DEFAULT_HOST), "bigqueryreservation.googleapis.com:443");
    }

    #[test]
    fn scopes_fall_back_to_auth_scopes() {
        assert_eq!(
            resolve_scopes(None),
            vec![
                "https://www.googleapis.com/auth/bigquery".to_owned(),
                "https://www.googleapis.com/auth/cloud-platform".to_owned(),
            ]
        );
        let empty: Vec<String> = Vec::new();
        assert_eq!(resolve_scopes(Some(empty.as_slice())), resolve_scopes(None));
        let caller = vec!["x".to_owned()];
        assert_eq!(resolve_scopes(Some(caller.as_slice())), vec!["x".to_owned()]);
    }

    #[test]
    fn parses_options_from_toml() {
        let input = r#"
host = "bigqueryreservation.mtls.googleapis.com"
credentials_file = "/etc/reservations/sa.json"
scopes = ["https://www.googleapis.com/auth/bigquery"]
quota_project_id = "billing-project"

[client_info]
library_name = "slot-planner"
library_version = "2.3.0"
user_agent_suffix = "nightly-rebalance"
"#;
        let options = TransportOptions::from_toml(input).expect("parse options");
        assert_eq!(options.host.as_deref(), Some("bigqueryreservation.mtls.googleapis.com"));
        assert_eq!(options.credentials_file, Some(PathBuf::from("/etc/reservations/sa.json")));
        assert_eq!(options.quota_project_id.as_deref(), Some("billing-project"));
        let info = options.client_info.expect("client info");
        assert_eq!(info.user_agent(), "slot-planner/2.3.0 nightly-rebalance");
        assert_eq!(info.api_client_header(), "gl-rust gapic/2.3.0");
        assert!(options.credentials.is_none());
    }

    #[test]
    fn unknown_option_keys_are_rejected() {
        let err = TransportOptions::from_toml("hostname = \"x\"").expect_err("unknown key");
        assert_eq!(err.machine_code, code::CONFIG_INVALID);
    }

    #[test]
    fn default_client_info_uses_crate_version() {
        let info = ClientInfo::default();
        assert_eq!(info.library_name, "reservation-sdk");
        assert_eq!(info.library_version, env!("CARGO_PKG_VERSION"));
        assert_eq!(info.metadata()[0].0, API_CLIENT_HEADER);
    }
}

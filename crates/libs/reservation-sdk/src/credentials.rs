use crate::error::{code, TransportError};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use zeroize::Zeroize;

pub const CREDENTIALS_ENV_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";
pub const CLOUDSDK_CONFIG_ENV_VAR: &str = "CLOUDSDK_CONFIG";
pub const WELL_KNOWN_CREDENTIALS_FILE: &str = "application_default_credentials.json";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const SUPPORTED_CREDENTIAL_TYPES: &[&str] = &["service_account", "authorized_user"];

/// String secret wiped from memory on drop and never printed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_owned()
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceAccountKey {
    #[serde(default)]
    pub project_id: Option<String>,
    pub private_key_id: String,
    pub private_key: Secret,
    pub client_email: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub quota_project_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorizedUser {
    pub client_id: String,
    pub client_secret: Secret,
    pub refresh_token: Secret,
    #[serde(default)]
    pub quota_project_id: Option<String>,
}

/// Parsed credential file, tagged by its `type` field.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialDocument {
    ServiceAccount(ServiceAccountKey),
    AuthorizedUser(AuthorizedUser),
}

impl CredentialDocument {
    pub fn from_json(input: &str) -> Result<Self, TransportError> {
        let raw: JsonValue = serde_json::from_str(input).map_err(|err| {
            TransportError::credential_load(
                code::CREDENTIAL_FILE_INVALID,
                format!("credential file is not valid JSON: {err}"),
            )
        })?;
        let kind = raw.get("type").and_then(JsonValue::as_str).unwrap_or_default().to_owned();
        if !SUPPORTED_CREDENTIAL_TYPES.contains(&kind.as_str()) {
            return Err(TransportError::credential_load(
                code::CREDENTIAL_TYPE_UNSUPPORTED,
                "credential file type is not supported",
            )
            .with_detail("type", JsonValue::String(kind))
            .with_detail("supported", serde_json::json!(SUPPORTED_CREDENTIAL_TYPES)));
        }
        serde_json::from_value(raw).map_err(|err| {
            TransportError::credential_load(
                code::CREDENTIAL_FILE_INVALID,
                format!("{kind} credential file is malformed: {err}"),
            )
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, TransportError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            TransportError::credential_load(
                code::CREDENTIAL_FILE_UNREADABLE,
                format!("failed to read credential file: {err}"),
            )
            .with_detail("path", JsonValue::String(path.display().to_string()))
        })?;
        Self::from_json(&contents)
            .map_err(|err| err.with_detail("path", JsonValue::String(path.display().to_string())))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::ServiceAccount(_) => "service_account",
            Self::AuthorizedUser(_) => "authorized_user",
        }
    }

    fn quota_project_id(&self) -> Option<&str> {
        match self {
            Self::ServiceAccount(key) => key.quota_project_id.as_deref(),
            Self::AuthorizedUser(user) => user.quota_project_id.as_deref(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CredentialSource {
    Explicit,
    File(PathBuf),
    EnvironmentVariable(PathBuf),
    WellKnownFile(PathBuf),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CredentialMaterial {
    AccessToken(Secret),
    ServiceAccount(ServiceAccountKey),
    AuthorizedUser(AuthorizedUser),
}

/// Opaque credential handle attached to a transport.
///
/// Token minting and refresh belong to the concrete transport; this type only
/// carries the material plus the scopes and quota project it was resolved for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    source: CredentialSource,
    material: CredentialMaterial,
    scopes: Vec<String>,
    quota_project_id: Option<String>,
}

impl Credentials {
    pub fn from_access_token(token: impl Into<String>) -> Self {
        Self {
            source: CredentialSource::Explicit,
            material: CredentialMaterial::AccessToken(Secret::new(token)),
            scopes: Vec::new(),
            quota_project_id: None,
        }
    }

    pub fn from_document(document: CredentialDocument, source: CredentialSource) -> Self {
        let quota_project_id = document.quota_project_id().map(str::to_owned);
        let material = match document {
            CredentialDocument::ServiceAccount(key) => CredentialMaterial::ServiceAccount(key),
            CredentialDocument::AuthorizedUser(user) => CredentialMaterial::AuthorizedUser(user),
        };
        Self { source, material, scopes: Vec::new(), quota_project_id }
    }

    pub fn with_scopes(mut self, scopes: &[String]) -> Self {
        self.scopes = scopes.to_vec();
        self
    }

    /// Replaces the billing project; `None` keeps the current one.
    pub fn with_quota_project(mut self, quota_project_id: Option<&str>) -> Self {
        if let Some(project) = quota_project_id {
            self.quota_project_id = Some(project.to_owned());
        }
        self
    }

    pub fn source(&self) -> &CredentialSource {
        &self.source
    }

    pub fn material(&self) -> &CredentialMaterial {
        &self.material
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    pub fn quota_project_id(&self) -> Option<&str> {
        self.quota_project_id.as_deref()
    }

    pub fn kind(&self) -> &'static str {
        match self.material {
            CredentialMaterial::AccessToken(_) => "access_token",
            CredentialMaterial::ServiceAccount(_) => "service_account",
            CredentialMaterial::AuthorizedUser(_) => "authorized_user",
        }
    }
}

/// Source of credentials consulted while a transport is constructed.
pub trait CredentialResolver: Send + Sync {
    fn load_from_file(
        &self,
        path: &Path,
        scopes: &[String],
        quota_project_id: Option<&str>,
    ) -> Result<Credentials, TransportError>;

    fn default_credentials(
        &self,
        scopes: &[String],
        quota_project_id: Option<&str>,
    ) -> Result<Credentials, TransportError>;
}

/// Resolves application default credentials from environment variables and
/// the gcloud well-known file. Never touches the network.
#[derive(Clone, Debug, Default)]
pub struct EnvironmentResolver {
    vars: Option<BTreeMap<String, String>>,
}

impl EnvironmentResolver {
    pub fn from_env() -> Self {
        Self { vars: None }
    }

    /// Resolver reading from a fixed variable set instead of the process env.
    pub fn with_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self { vars: Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()) }
    }

    fn var(&self, key: &str) -> Option<String> {
        let value = match &self.vars {
            Some(vars) => vars.get(key).cloned(),
            None => std::env::var(key).ok(),
        };
        value.filter(|value| !value.trim().is_empty())
    }

    pub fn well_known_file(&self) -> Option<PathBuf> {
        let config_dir = match self.var(CLOUDSDK_CONFIG_ENV_VAR) {
            Some(dir) => PathBuf::from(dir),
            None if cfg!(windows) => PathBuf::from(self.var("APPDATA")?).join("gcloud"),
            None => PathBuf::from(self.var("HOME")?).join(".config").join("gcloud"),
        };
        Some(config_dir.join(WELL_KNOWN_CREDENTIALS_FILE))
    }

    fn load_document(
        path: &Path,
        source: CredentialSource,
        scopes: &[String],
        quota_project_id: Option<&str>,
    ) -> Result<Credentials, TransportError> {
        let document = CredentialDocument::from_path(path)?;
        log::debug!("loaded {} credentials from {}", document.type_name(), path.display());
        Ok(Credentials::from_document(document, source)
            .with_scopes(scopes)
            .with_quota_project(quota_project_id))
    }
}

impl CredentialResolver for EnvironmentResolver {
    fn load_from_file(
        &self,
        path: &Path,
        scopes: &[String],
        quota_project_id: Option<&str>,
    ) -> Result<Credentials, TransportError> {
        Self::load_document(
            path,
            CredentialSource::File(path.to_path_buf()),
            scopes,
            quota_project_id,
        )
    }

    fn default_credentials(
        &self,
        scopes: &[String],
        quota_project_id: Option<&str>,
    ) -> Result<Credentials, TransportError> {
        if let Some(path) = self.var(CREDENTIALS_ENV_VAR).map(PathBuf::from) {
            return Self::load_document(
                &path,
                CredentialSource::EnvironmentVariable(path.clone()),
                scopes,
                quota_project_id,
            )
            .map_err(|err| {
                err.with_detail("env_var", JsonValue::String(CREDENTIALS_ENV_VAR.to_owned()))
            });
        }

        if let Some(path) = self.well_known_file().filter(|path| path.is_file()) {
            return Self::load_document(
                &path,
                CredentialSource::WellKnownFile(path.clone()),
                scopes,
                quota_project_id,
            );
        }

        Err(TransportError::credential_load(
            code::CREDENTIAL_DEFAULT_NOT_FOUND,
            "could not automatically determine credentials",
        )
        .with_detail("env_var", JsonValue::String(CREDENTIALS_ENV_VAR.to_owned())))
    }
}

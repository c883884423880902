use crate::config::{ClientInfo, TransportConfig, TransportOptions};
use crate::credentials::{CredentialResolver, Credentials, EnvironmentResolver};
use crate::error::TransportError;
use crate::operation::Operation;
use crate::policy::{build_policy_table, OperationDescriptor, PolicyTable};

/// Construction-time state every concrete transport shares: the resolved
/// configuration and the per-operation policy table. Both are immutable.
#[derive(Clone, Debug, PartialEq)]
pub struct TransportBase {
    config: TransportConfig,
    policies: PolicyTable,
}

impl TransportBase {
    /// Resolves credentials from the process environment when none are given.
    pub fn new(options: TransportOptions) -> Result<Self, TransportError> {
        Self::with_resolver(options, &EnvironmentResolver::from_env())
    }

    pub fn with_resolver(
        options: TransportOptions,
        resolver: &dyn CredentialResolver,
    ) -> Result<Self, TransportError> {
        let config = TransportConfig::resolve(options, resolver)?;
        log::debug!(
            "reservation transport endpoint={} credentials={} scopes={}",
            config.endpoint(),
            config.credentials().kind(),
            config.scopes().join(",")
        );
        Ok(Self { config, policies: build_policy_table() })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        self.config.endpoint()
    }

    pub fn credentials(&self) -> &Credentials {
        self.config.credentials()
    }

    pub fn scopes(&self) -> &[String] {
        self.config.scopes()
    }

    pub fn quota_project_id(&self) -> Option<&str> {
        self.config.quota_project_id()
    }

    pub fn client_info(&self) -> &ClientInfo {
        self.config.client_info()
    }

    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    pub fn descriptor(&self, operation: Operation) -> &OperationDescriptor {
        self.policies.descriptor(operation)
    }
}

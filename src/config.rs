use serde::Deserialize;

use crate::error::Error;
use crate::system::{SystemName, TrustedService};

/// Organization namespace of the trusted service identity.
pub const DEFAULT_ORGANIZATION: &str = "vespa";

/// Root of the node-repository API.
pub const DEFAULT_NODE_API_ROOT: &str = "/nodes/v2";

/// Root of the orchestrator API.
pub const DEFAULT_ORCHESTRATOR_API_ROOT: &str = "/orchestrator/v1";

/// Settings an [`Authorizer`](crate::Authorizer) is built from.
///
/// Every field has a default, so a partial document is enough:
///
/// ```
/// use node_authz::{AuthorizerConfig, SystemName};
///
/// let config: AuthorizerConfig = serde_json::from_str(r#"{ "system": "cd" }"#).unwrap();
/// assert_eq!(config.system, SystemName::Cd);
/// assert_eq!(config.node_api_root, "/nodes/v2");
/// assert_eq!(config.trusted_service().name(), "vespa.vespa.cd.hosting");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthorizerConfig {
    /// The deployment system this service runs in
    pub system: SystemName,
    /// Organization namespace of the trusted service identity
    pub organization: String,
    /// Root of the node-repository API, without trailing `/`
    pub node_api_root: String,
    /// Root of the orchestrator API, without trailing `/`
    pub orchestrator_api_root: String,
}

impl Default for AuthorizerConfig {
    fn default() -> Self {
        Self {
            system: SystemName::default(),
            organization: DEFAULT_ORGANIZATION.to_string(),
            node_api_root: DEFAULT_NODE_API_ROOT.to_string(),
            orchestrator_api_root: DEFAULT_ORCHESTRATOR_API_ROOT.to_string(),
        }
    }
}

impl AuthorizerConfig {
    /// Default configuration for the given system.
    pub fn new(system: SystemName) -> Self {
        Self {
            system,
            ..Self::default()
        }
    }

    /// Sets the organization namespace.
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    /// Sets the node-repository API root.
    pub fn with_node_api_root(mut self, root: impl Into<String>) -> Self {
        self.node_api_root = root.into();
        self
    }

    /// Sets the orchestrator API root.
    pub fn with_orchestrator_api_root(mut self, root: impl Into<String>) -> Self {
        self.orchestrator_api_root = root.into();
        self
    }

    /// Checks that the configuration describes a usable authorizer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the organization is empty or
    /// contains `.`, or if an API root does not start with `/` or ends with `/`.
    pub fn validate(&self) -> Result<(), Error> {
        if self.organization.is_empty() {
            return Err(Error::invalid_config(
                "organization",
                &self.organization,
                "must not be empty",
            ));
        }
        if self.organization.contains('.') {
            return Err(Error::invalid_config(
                "organization",
                &self.organization,
                "must not contain '.'",
            ));
        }
        validate_root("node_api_root", &self.node_api_root)?;
        validate_root("orchestrator_api_root", &self.orchestrator_api_root)?;
        Ok(())
    }

    /// The trusted service identity for this configuration.
    pub fn trusted_service(&self) -> TrustedService {
        TrustedService::new(&self.organization, self.system)
    }
}

fn validate_root(field: &'static str, root: &str) -> Result<(), Error> {
    if !root.starts_with('/') {
        return Err(Error::invalid_config(field, root, "must start with '/'"));
    }
    if root.ends_with('/') {
        return Err(Error::invalid_config(field, root, "must not end with '/'"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AuthorizerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.trusted_service().name(), "vespa.vespa.hosting");
    }

    #[test]
    fn builder_overrides() {
        let config = AuthorizerConfig::new(SystemName::Dev)
            .with_organization("org")
            .with_node_api_root("/node/v2")
            .with_orchestrator_api_root("/orchestrator/v2");

        assert!(config.validate().is_ok());
        assert_eq!(config.trusted_service().name(), "org.org.dev.hosting");
        assert_eq!(config.node_api_root, "/node/v2");
        assert_eq!(config.orchestrator_api_root, "/orchestrator/v2");
    }

    #[test]
    fn root_must_be_absolute() {
        let config = AuthorizerConfig::default().with_node_api_root("nodes/v2");
        assert_eq!(
            config.validate(),
            Err(Error::invalid_config(
                "node_api_root",
                "nodes/v2",
                "must start with '/'"
            ))
        );
    }

    #[test]
    fn root_must_not_end_with_separator() {
        for root in ["/", "/orchestrator/v1/"] {
            let config = AuthorizerConfig::default().with_orchestrator_api_root(root);
            assert!(matches!(
                config.validate(),
                Err(Error::InvalidConfig {
                    field: "orchestrator_api_root",
                    ..
                })
            ));
        }
    }

    #[test]
    fn organization_is_validated() {
        assert!(AuthorizerConfig::default()
            .with_organization("")
            .validate()
            .is_err());
        assert!(AuthorizerConfig::default()
            .with_organization("a.b")
            .validate()
            .is_err());
    }
}

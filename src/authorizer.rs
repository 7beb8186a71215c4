use crate::config::{AuthorizerConfig, DEFAULT_ORGANIZATION};
use crate::decision::Decision;
use crate::error::Error;
use crate::extract::ResourceExtractor;
use crate::inventory::NodeInventory;
use crate::logging::DecisionLog;
use crate::ownership::OwnershipChecker;
use crate::request::{Principal, RequestUri};
use crate::system::{SystemName, TrustedService};

/// Authorizer for the node-repository and orchestrator REST APIs.
///
/// The trusted hosting service may access everything. Any other caller may
/// only access the nodes it owns: itself, and the nodes hosted on it.
///
/// An `Authorizer` holds no per-request state and can be shared between
/// request handlers, e.g. behind an `Arc`.
///
/// # Examples
///
/// ```
/// use node_authz::{Authorizer, MemoryInventory, NodeRecord, Principal, RequestUri, SystemName};
///
/// let inventory = MemoryInventory::new()
///     .with_node(NodeRecord::new("host1.example.com").with_parent("parent1.example.com"));
/// let authorizer = Authorizer::new(SystemName::Main, inventory);
///
/// let uri = RequestUri::parse("/nodes/v2/state/host1.example.com");
/// assert!(authorizer.is_authorized(&Principal::new("parent1.example.com"), &uri));
/// assert!(!authorizer.is_authorized(&Principal::new("stranger.example.com"), &uri));
/// assert!(authorizer.is_authorized(&Principal::new("vespa.vespa.hosting"), &uri));
/// ```
#[derive(Debug, Clone)]
pub struct Authorizer<I> {
    trusted_service: TrustedService,
    extractor: ResourceExtractor,
    ownership: OwnershipChecker<I>,
}

impl<I: NodeInventory> Authorizer<I> {
    /// Creates an authorizer for `system` using the default organization and API roots.
    pub fn new(system: SystemName, inventory: I) -> Self {
        Self {
            trusted_service: TrustedService::new(DEFAULT_ORGANIZATION, system),
            extractor: ResourceExtractor::default(),
            ownership: OwnershipChecker::new(inventory),
        }
    }

    /// Creates an authorizer from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails [`AuthorizerConfig::validate`].
    pub fn from_config(config: &AuthorizerConfig, inventory: I) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            trusted_service: config.trusted_service(),
            extractor: ResourceExtractor::new(
                &config.node_api_root,
                &config.orchestrator_api_root,
            ),
            ownership: OwnershipChecker::new(inventory),
        })
    }

    /// Returns whether `principal` may access `uri`.
    pub fn is_authorized(&self, principal: &Principal, uri: &RequestUri) -> bool {
        self.decide(principal, uri).is_allowed()
    }

    /// Decides whether `principal` may access `uri`, and why.
    pub fn decide(&self, principal: &Principal, uri: &RequestUri) -> Decision {
        let log = DecisionLog::new(principal.name(), uri.path());

        if self.trusted_service.matches(principal) {
            return log.record(Decision::TrustedService);
        }

        let hostnames = self.extractor.hostnames(uri);
        let decision = match self.ownership.check_all(principal, hostnames.as_slice()) {
            Ok(()) => Decision::Owner,
            Err(denial) => Decision::Denied(denial),
        };
        log.record(decision)
    }

    /// Returns the hostnames addressed by `uri`.
    pub fn hostnames(&self, uri: &RequestUri) -> Vec<String> {
        self.extractor.hostnames(uri)
    }

    /// Returns the identity that bypasses ownership checks.
    pub fn trusted_service(&self) -> &TrustedService {
        &self.trusted_service
    }

    /// Returns the node inventory consulted for parent lookups.
    pub fn inventory(&self) -> &I {
        self.ownership.inventory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::Denial;
    use crate::inventory::{MemoryInventory, NodeRecord};

    fn authorizer(system: SystemName) -> Authorizer<MemoryInventory> {
        let inventory = MemoryInventory::new()
            .with_node(NodeRecord::new("host1"))
            .with_node(NodeRecord::new("child1").with_parent("host1"))
            .with_node(NodeRecord::new("child2").with_parent("host2"));
        Authorizer::new(system, inventory)
    }

    fn decide(authorizer: &Authorizer<MemoryInventory>, principal: &str, target: &str) -> Decision {
        authorizer.decide(&Principal::new(principal), &RequestUri::parse(target))
    }

    #[test]
    fn trusted_service_bypasses_everything() {
        let authorizer = authorizer(SystemName::Main);
        for target in ["/", "/nodes/v2/node/", "/nodes/v2/node/..", "/anything/else"] {
            assert_eq!(
                decide(&authorizer, "vespa.vespa.hosting", target),
                Decision::TrustedService
            );
        }
    }

    #[test]
    fn trusted_service_depends_on_system() {
        let authorizer = authorizer(SystemName::Cd);
        assert_eq!(
            authorizer.trusted_service().name(),
            "vespa.vespa.cd.hosting"
        );
        assert!(!decide(&authorizer, "vespa.vespa.hosting", "/nodes/v2/node/host1").is_allowed());
        assert!(decide(&authorizer, "vespa.vespa.cd.hosting", "/nodes/v2/node/host1").is_allowed());
    }

    #[test]
    fn node_accesses_own_resources() {
        let authorizer = authorizer(SystemName::Main);
        assert_eq!(decide(&authorizer, "host1", "/nodes/v2/node/host1"), Decision::Owner);
        assert_eq!(decide(&authorizer, "host1", "/nodes/v2/acl/host1"), Decision::Owner);
        assert_eq!(
            decide(&authorizer, "host1", "/orchestrator/v1/hosts/host1/suspended"),
            Decision::Owner
        );
    }

    #[test]
    fn parent_accesses_children() {
        let authorizer = authorizer(SystemName::Main);
        assert_eq!(decide(&authorizer, "host1", "/nodes/v2/state/child1"), Decision::Owner);
        assert_eq!(
            decide(&authorizer, "host1", "/nodes/v2/state/child2"),
            Decision::Denied(Denial::NotOwner("child2".to_string()))
        );
    }

    #[test]
    fn unknown_paths_are_denied() {
        let authorizer = authorizer(SystemName::Main);
        assert_eq!(
            decide(&authorizer, "host1", "/nodes/v2/maintenance/"),
            Decision::Denied(Denial::NoResources)
        );
        assert_eq!(
            decide(&authorizer, "host1", "/nodes/v2/node/"),
            Decision::Denied(Denial::NoResources)
        );
    }

    #[test]
    fn suspension_of_group_requires_all_hosts() {
        let authorizer = authorizer(SystemName::Main);
        assert!(decide(
            &authorizer,
            "host1",
            "/orchestrator/v1/suspensions/hosts/host1?hostname=child1"
        )
        .is_allowed());
        assert_eq!(
            decide(
                &authorizer,
                "host1",
                "/orchestrator/v1/suspensions/hosts/host1?hostname=child1&hostname=child2"
            ),
            Decision::Denied(Denial::NotOwner("child2".to_string()))
        );
    }

    #[test]
    fn from_config_rejects_invalid_config() {
        let config = AuthorizerConfig::default().with_node_api_root("nodes");
        assert!(Authorizer::from_config(&config, MemoryInventory::new()).is_err());
    }

    #[test]
    fn from_config_uses_roots_and_organization() {
        let config = AuthorizerConfig::new(SystemName::Main)
            .with_organization("org")
            .with_node_api_root("/node/v2");
        let authorizer = Authorizer::from_config(&config, MemoryInventory::new()).unwrap();

        assert_eq!(authorizer.trusted_service().name(), "org.org.hosting");
        assert_eq!(
            authorizer.hostnames(&RequestUri::parse("/node/v2/node/h1")),
            ["h1"]
        );
        assert!(authorizer.inventory().is_empty());
    }
}

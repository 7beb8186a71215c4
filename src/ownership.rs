use crate::decision::Denial;
use crate::inventory::NodeInventory;
use crate::request::Principal;

/// Decides whether a caller owns a node.
///
/// A node owns itself, and a parent node owns the nodes hosted on it.
#[derive(Debug, Clone)]
pub struct OwnershipChecker<I> {
    inventory: I,
}

impl<I: NodeInventory> OwnershipChecker<I> {
    /// Creates a checker that resolves parents through `inventory`.
    pub fn new(inventory: I) -> Self {
        Self { inventory }
    }

    /// Returns the inventory this checker consults.
    pub fn inventory(&self) -> &I {
        &self.inventory
    }

    /// Checks that `principal` owns the node identified by `hostname`.
    ///
    /// The inventory is only consulted when the caller is not the node itself.
    pub fn check(&self, principal: &Principal, hostname: &str) -> Result<(), Denial> {
        // Paths are passed unsanitized further down, so never let `.` or `..` through
        if is_degenerate(hostname) {
            return Err(Denial::MalformedHostname(hostname.to_string()));
        }

        if principal.name() == hostname {
            return Ok(());
        }

        match self.inventory.lookup(hostname) {
            Ok(Some(node)) if node.parent_hostname() == Some(principal.name()) => Ok(()),
            Ok(_) => Err(Denial::NotOwner(hostname.to_string())),
            Err(error) => Err(Denial::InventoryUnavailable {
                hostname: hostname.to_string(),
                message: error.to_string(),
            }),
        }
    }

    /// Checks that `principal` owns every node in `hostnames`.
    ///
    /// An empty list is denied. Stops at the first hostname that fails.
    pub fn check_all<S: AsRef<str>>(
        &self,
        principal: &Principal,
        hostnames: &[S],
    ) -> Result<(), Denial> {
        if hostnames.is_empty() {
            return Err(Denial::NoResources);
        }
        hostnames
            .iter()
            .try_for_each(|hostname| self.check(principal, hostname.as_ref()))
    }

    /// Returns whether `principal` owns the node identified by `hostname`.
    pub fn owns(&self, principal: &Principal, hostname: &str) -> bool {
        self.check(principal, hostname).is_ok()
    }
}

/// Empty hostnames and hostnames made up only of `.`.
fn is_degenerate(hostname: &str) -> bool {
    hostname.chars().all(|c| c == '.')
}

use std::fmt;

/// The outcome of an authorization check, with the rule that decided it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The caller is the trusted hosting service
    TrustedService,
    /// The caller owns every addressed resource
    Owner,
    /// Access is denied
    Denied(Denial),
}

impl Decision {
    /// Returns whether access is granted.
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Decision::Denied(_))
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::TrustedService => write!(f, "allowed: trusted service"),
            Decision::Owner => write!(f, "allowed: owner"),
            Decision::Denied(denial) => write!(f, "denied: {}", denial),
        }
    }
}

/// Why access was denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// The request addresses no known resource
    NoResources,
    /// The hostname is empty or made up of `.` only
    MalformedHostname(String),
    /// The caller is neither the node nor its parent
    NotOwner(String),
    /// The node inventory could not be consulted
    InventoryUnavailable {
        /// The hostname that was being looked up
        hostname: String,
        /// The inventory's failure message
        message: String,
    },
}

impl Denial {
    /// Short label suitable for a structured log field.
    pub fn reason(&self) -> &'static str {
        match self {
            Denial::NoResources => "no_resources",
            Denial::MalformedHostname(_) => "malformed_hostname",
            Denial::NotOwner(_) => "not_owner",
            Denial::InventoryUnavailable { .. } => "inventory_unavailable",
        }
    }

    /// The hostname the denial concerns, if any.
    pub fn hostname(&self) -> Option<&str> {
        match self {
            Denial::NoResources => None,
            Denial::MalformedHostname(hostname)
            | Denial::NotOwner(hostname)
            | Denial::InventoryUnavailable { hostname, .. } => Some(hostname),
        }
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::NoResources => write!(f, "request addresses no known resource"),
            Denial::MalformedHostname(hostname) => write!(f, "malformed hostname '{}'", hostname),
            Denial::NotOwner(hostname) => write!(f, "caller does not own '{}'", hostname),
            Denial::InventoryUnavailable { hostname, message } => {
                write!(f, "could not look up '{}': {}", hostname, message)
            }
        }
    }
}

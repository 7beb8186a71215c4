use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::Error;
use crate::request::Principal;

/// The deployment system this service runs in.
///
/// Only used to derive the trusted service identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum SystemName {
    /// The default production system
    #[default]
    Main,
    /// Continuous deployment system
    Cd,
    /// Development system
    Dev,
    /// Performance testing system
    Perf,
    /// Public system
    Public,
    /// Continuous deployment system for the public system
    PublicCd,
}

impl SystemName {
    /// All known systems.
    pub const ALL: [SystemName; 6] = [
        SystemName::Main,
        SystemName::Cd,
        SystemName::Dev,
        SystemName::Perf,
        SystemName::Public,
        SystemName::PublicCd,
    ];

    /// Returns the lowercase name of this system.
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemName::Main => "main",
            SystemName::Cd => "cd",
            SystemName::Dev => "dev",
            SystemName::Perf => "perf",
            SystemName::Public => "public",
            SystemName::PublicCd => "publiccd",
        }
    }

    /// Returns whether this is the default system.
    pub fn is_main(&self) -> bool {
        matches!(self, SystemName::Main)
    }
}

impl fmt::Display for SystemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SystemName {
    type Err = Error;

    /// Parses a system name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SystemName::ALL
            .into_iter()
            .find(|system| system.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownSystem(s.to_string()))
    }
}

impl TryFrom<String> for SystemName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The identity of the hosting service that may access every resource.
///
/// # Examples
///
/// ```
/// use node_authz::{SystemName, TrustedService};
///
/// assert_eq!(TrustedService::new("vespa", SystemName::Main).name(), "vespa.vespa.hosting");
/// assert_eq!(TrustedService::new("vespa", SystemName::Cd).name(), "vespa.vespa.cd.hosting");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedService {
    name: String,
}

impl TrustedService {
    /// Derives the trusted service identity for `system` under `organization`.
    pub fn new(organization: &str, system: SystemName) -> Self {
        let name = if system.is_main() {
            format!("{organization}.{organization}.hosting")
        } else {
            format!("{organization}.{organization}.{system}.hosting")
        };
        Self { name }
    }

    /// Returns the identity string.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether `principal` is this trusted service.
    pub fn matches(&self, principal: &Principal) -> bool {
        principal.name() == self.name
    }
}

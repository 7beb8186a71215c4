//! Authorization for the node-repository and orchestrator REST APIs.
//!
//! Callers are authenticated upstream; this crate only decides whether an
//! authenticated [`Principal`] may access a [`RequestUri`]. The rules are:
//!
//! - The trusted hosting service may access everything
//! - A node may access its own resources
//! - A parent node may access the resources of the nodes hosted on it
//! - Anything else, including requests that address no known resource, is denied
//!
//! # Core Types
//!
//! - [`Authorizer`]: The decision function
//! - [`ResourceExtractor`]: Resolves the hostnames a request addresses
//! - [`OwnershipChecker`]: Decides whether a caller owns a node
//! - [`NodeInventory`]: The parent lookup the authorizer depends on
//! - [`AuthorizerConfig`]: Deployment system, organization and API roots
//!
//! # Examples
//!
//! ```
//! use node_authz::{Authorizer, AuthorizerConfig, MemoryInventory, NodeRecord, Principal,
//!                  RequestUri, SystemName};
//!
//! let inventory = MemoryInventory::new()
//!     .with_node(NodeRecord::new("h1.example.com").with_parent("p1.example.com"))
//!     .with_node(NodeRecord::new("h2.example.com").with_parent("p1.example.com"));
//!
//! let config = AuthorizerConfig::new(SystemName::Main);
//! let authorizer = Authorizer::from_config(&config, inventory).expect("valid config");
//!
//! let parent = Principal::new("p1.example.com");
//! let uri = RequestUri::parse(
//!     "/orchestrator/v1/suspensions/hosts/p1.example.com?hostname=h1.example.com&hostname=h2.example.com",
//! );
//! assert!(authorizer.is_authorized(&parent, &uri));
//!
//! let child = Principal::new("h1.example.com");
//! assert!(!authorizer.is_authorized(&child, &uri));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod authorizer;
mod config;
mod decision;
mod error;
mod extract;
mod inventory;
mod logging;
mod ownership;
mod request;
mod system;

pub use authorizer::Authorizer;
pub use config::{
    AuthorizerConfig, DEFAULT_NODE_API_ROOT, DEFAULT_ORCHESTRATOR_API_ROOT, DEFAULT_ORGANIZATION,
};
pub use decision::{Decision, Denial};
pub use error::Error;
pub use extract::{ResourceExtractor, HOSTNAME_QUERY_KEYS};
pub use inventory::{MemoryInventory, NodeInventory, NodeRecord};
pub use ownership::OwnershipChecker;
pub use request::{Principal, RequestUri};
pub use system::{SystemName, TrustedService};

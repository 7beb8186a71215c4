/// Errors that can occur while configuring an authorizer or querying the
/// node inventory.
///
/// None of these ever escape [`Authorizer::is_authorized`](crate::Authorizer::is_authorized):
/// a failed inventory lookup is turned into a denial.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The deployment system name is not one this crate knows about
    #[error("unknown system name '{0}'")]
    UnknownSystem(String),

    /// A configuration value failed validation
    #[error("invalid {field} '{value}': {reason}")]
    InvalidConfig {
        /// The configuration field that was rejected
        field: &'static str,
        /// The rejected value
        value: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// The node inventory could not answer a lookup
    #[error("node inventory lookup for '{hostname}' failed: {message}")]
    Inventory {
        /// The hostname that was being looked up
        hostname: String,
        /// Description of the failure, as reported by the inventory
        message: String,
    },
}

impl Error {
    /// Creates an inventory lookup error for the given hostname.
    pub fn inventory(hostname: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Inventory {
            hostname: hostname.into(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_config(
        field: &'static str,
        value: impl Into<String>,
        reason: &'static str,
    ) -> Self {
        Error::InvalidConfig {
            field,
            value: value.into(),
            reason,
        }
    }
}

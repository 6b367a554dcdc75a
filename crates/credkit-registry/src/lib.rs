//! Credential descriptor registry
//!
//! Static definitions of the credential slots an operator is asked for:
//! - [`KeyDescriptor`]: one slot (name, label, format rule, probe target)
//! - [`Registry`]: the ordered, immutable list of slots
//! - [`validate`]: pure format check of raw operator input
//!
//! # Example
//!
//! ```
//! use credkit_registry::{validate, Registry};
//!
//! let registry = Registry::standard();
//! let exa = registry.get("EXA_API_KEY").unwrap();
//! assert!(validate(" 0123abcd-0123-4567-89ab-0123456789ab ", exa.format_rule()));
//! assert!(!validate("", exa.format_rule()));
//! ```

pub mod descriptor;
pub mod error;
pub mod registry;
pub mod validator;

pub use descriptor::{FormatRule, KeyDescriptor, ProbeTarget};
pub use error::RegistryError;
pub use registry::Registry;
pub use validator::{validate, validate_pattern};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Structure-preserving environment files
//!
//! Provides the only component that touches the credentials file on disk:
//! - Load (file → [`EnvDocument`]), keeping comments, blanks and order
//! - Merge ([`EnvDocument`] + [`SessionConfig`] → [`EnvDocument`])
//! - Save ([`EnvDocument`] → file), atomically
//!
//! # Example
//!
//! ```
//! use credkit_envstore::{EnvDocument, SessionConfig};
//!
//! let template = EnvDocument::parse("# keys\nANTHROPIC_API_KEY=your_anthropic_api_key_here\nOTHER_KEY=unchanged\n");
//!
//! let mut values = SessionConfig::new();
//! values.insert("ANTHROPIC_API_KEY", "sk-ant-example");
//! values.insert("NOT_IN_TEMPLATE", "ignored");
//!
//! let merged = template.merge(&values);
//! assert_eq!(merged.render(), "# keys\nANTHROPIC_API_KEY=sk-ant-example\nOTHER_KEY=unchanged\n");
//! ```

pub mod document;
pub mod error;
pub mod session;
pub mod store;

pub use document::{EnvDocument, EnvLine, LineEnding};
pub use error::EnvStoreError;
pub use session::SessionConfig;
pub use store::{load, save, EnvStore};

//! Error types for registry construction

/// Errors raised while assembling a [`Registry`](crate::Registry)
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Format rule does not compile
    #[error("invalid format rule for {name}: {source}")]
    InvalidPattern {
        /// Descriptor name
        name: String,
        #[source]
        source: regex::Error,
    },

    /// Two descriptors share a name
    #[error("duplicate descriptor: {0}")]
    DuplicateName(String),

    /// Name is not an uppercase snake-case environment key
    #[error("descriptor name must be uppercase letters and underscores: '{0}'")]
    InvalidName(String),
}

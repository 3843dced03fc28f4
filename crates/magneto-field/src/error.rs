//! Error type shared by the field-line sampler and the solar-wind field.

/// Errors raised when a generator or simulation is given unusable parameters.
///
/// Every variant is a caller contract violation detected up front, before any
/// geometry is produced or any particle is spawned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    /// A parameter is outside the domain the computation is defined on.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending parameter.
        name: &'static str,
        /// What the parameter must satisfy.
        reason: &'static str,
    },
}

impl FieldError {
    pub(crate) fn invalid(name: &'static str, reason: &'static str) -> Self {
        Self::InvalidArgument { name, reason }
    }

    /// Returns true if this is an [`FieldError::InvalidArgument`].
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

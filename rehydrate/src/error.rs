//! Error types produced by the hydration engine.

use thiserror::Error;

/// Convenient alias for results produced by hydration and coercion.
pub type HydrateResult<T> = Result<T, HydrateError>;

/// Errors that can occur while hydrating an instance.
///
/// The engine is deliberately permissive: absent mapping keys, unreadable
/// source properties and enum lookup misses are all treated as "value
/// absent" rather than reported. Only the failures below surface.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HydrateError {
    /// A declared type that is neither scalar, enum nor hydratable could
    /// not be constructed from the supplied raw value.
    #[error("cannot instantiate `{type_name}` from the supplied value")]
    Uninstantiable {
        /// Name of the declared type that could not be constructed.
        type_name: &'static str,
    },

    /// `create` was handed a source that is neither a mapping nor an
    /// object.
    #[error("unsupported hydration source: expected a mapping or an object, got {kind}")]
    UnsupportedSource {
        /// Kind of the rejected raw value, e.g. `"string"` or `"sequence"`.
        kind: &'static str,
    },
}

impl HydrateError {
    /// Construct an uninstantiable-type error for `type_name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rehydrate::HydrateError;
    /// let err = HydrateError::uninstantiable("demo::Money");
    /// assert!(matches!(err, HydrateError::Uninstantiable { .. }));
    /// ```
    #[must_use]
    pub const fn uninstantiable(type_name: &'static str) -> Self {
        Self::Uninstantiable { type_name }
    }

    /// Construct an unsupported-source error for a raw value of `kind`.
    #[must_use]
    pub const fn unsupported_source(kind: &'static str) -> Self {
        Self::UnsupportedSource { kind }
    }

    /// Returns `true` for [`HydrateError::Uninstantiable`].
    ///
    /// Union coercion uses this to decide whether a failed candidate may be
    /// discarded or the error must propagate.
    #[must_use]
    pub const fn is_uninstantiable(&self) -> bool {
        matches!(self, Self::Uninstantiable { .. })
    }
}

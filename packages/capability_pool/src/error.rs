use thiserror::Error;

/// Errors that can occur when working with capability pools.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The pool policy could not produce a new instance for the pool.
    ///
    /// The pool does not retry; the failure is returned to whoever called `acquire`.
    #[error("failed to create a new instance for capability view '{view}': {reason}")]
    Create {
        /// Name of the capability view the pool serves.
        view: &'static str,

        /// A human-readable description of the problem.
        reason: String,
    },

    /// Two capability views of the same concrete type claim the same property.
    #[error(
        "property '{property}' is claimed by both capability view '{first_view}' and '{second_view}'"
    )]
    OverlappingProperty {
        /// The property that appears in more than one view.
        property: &'static str,

        /// The view that declared the property first.
        first_view: &'static str,

        /// The view that declared the property again.
        second_view: &'static str,
    },
}

impl Error {
    /// Creates an [`Error::Create`] for the capability view `V`.
    ///
    /// Intended for use by custom [`PoolPolicy`][crate::PoolPolicy] implementations.
    #[must_use]
    pub fn create_failed<V: ?Sized>(reason: impl Into<String>) -> Self {
        Self::Create {
            view: std::any::type_name::<V>(),
            reason: reason.into(),
        }
    }
}

/// A specialized `Result` type for capability pool operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;

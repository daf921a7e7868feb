use std::any::type_name;
use std::fmt;

use tracing::debug;

use crate::{Capability, CapabilityPool, CapabilityView, Narrowed, Pooled, Result};

/// Outcome reported by an initializer passed to
/// [`CapabilityPool::acquire_and_initialize()`].
#[non_exhaustive]
pub enum Initialized<V: ?Sized> {
    /// The initializer has set every property of the capability view.
    Done,

    /// The initializer chose not to initialize the instance. The handle is kept exactly as it
    /// was acquired, with the values left over from its previous use.
    ///
    /// An initializer that declines must not have written to the instance.
    Declined,

    /// The initializer substitutes another instance for the acquired one.
    ///
    /// The replacement is narrowed instead of the acquired instance, which is released back
    /// into the pool. The replacement must have every property of the view initialized.
    Replaced(Pooled<V>),
}

impl<V: ?Sized + CapabilityView> fmt::Debug for Initialized<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => f.write_str("Done"),
            Self::Declined => f.write_str("Declined"),
            Self::Replaced(replacement) => f.debug_tuple("Replaced").field(replacement).finish(),
        }
    }
}

impl<V: ?Sized + CapabilityView> CapabilityPool<V> {
    /// Acquires an instance, initializes the properties of `V` and narrows it to `T`.
    ///
    /// This composes the three steps of the reuse case discipline:
    ///
    /// 1. [`acquire()`][Self::acquire] an instance typed as `V`.
    /// 2. Call `initialize` exactly once with it. The initializer is expected to overwrite every
    ///    property of `V` and to leave every other property alone, as those belong to other
    ///    reuse cases. It may return [`Initialized::Declined`] to keep the instance unchanged
    ///    or [`Initialized::Replaced`] to hand over a different instance.
    /// 3. Narrow the resulting instance to its concrete type `T`.
    ///
    /// Nothing is reset outside the initializer.
    ///
    /// Returns `Ok(None)` if the pooled instance is not a `T`. Such an instance is released back
    /// into this pool, since it is still a valid `V`.
    ///
    /// # Errors
    ///
    /// Returns the policy's error if a new instance was needed and could not be created. The
    /// initializer is not called in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use capability_pool::record::{FirstCase, Record, SecondCase};
    /// use capability_pool::{CapabilityPool, Initialized};
    ///
    /// let pool = CapabilityPool::<dyn SecondCase>::with_default_policy::<Record>();
    ///
    /// let record = pool
    ///     .acquire_and_initialize::<Record>(|case| {
    ///         case.set_property3("C0".to_string());
    ///         case.set_property4("D0".to_string());
    ///         Initialized::Done
    ///     })
    ///     .unwrap()
    ///     .expect("the pool only holds records");
    ///
    /// assert_eq!(record.property3(), Some("C0"));
    /// // Properties of the other reuse case are not touched by this pool.
    /// assert_eq!(record.property1(), None);
    ///
    /// pool.release(record);
    /// ```
    pub fn acquire_and_initialize<T>(
        &self,
        initialize: impl FnOnce(&mut V) -> Initialized<V>,
    ) -> Result<Option<Narrowed<T, V>>>
    where
        T: Capability<V>,
    {
        let mut acquired = self.acquire()?;

        let handle = match initialize(&mut *acquired) {
            Initialized::Done => acquired,
            Initialized::Declined => {
                debug!(
                    view = type_name::<V>(),
                    "initializer declined, keeping instance as acquired"
                );
                acquired
            }
            Initialized::Replaced(replacement) => {
                debug!(
                    view = type_name::<V>(),
                    replacement = replacement.concrete_type_name(),
                    "initializer replaced the acquired instance"
                );
                self.release(acquired);
                replacement
            }
        };

        Ok(self.narrow_or_release(handle))
    }

    /// Acquires an instance and narrows it to `T` without initializing it.
    ///
    /// The instance carries the values of its previous use. Use this when the caller wants to
    /// initialize the properties of `V` later, but before any other use.
    ///
    /// Returns `Ok(None)` if the pooled instance is not a `T`, releasing it back into this pool.
    ///
    /// # Errors
    ///
    /// Returns the policy's error if a new instance was needed and could not be created.
    pub fn acquire_narrowed<T>(&self) -> Result<Option<Narrowed<T, V>>>
    where
        T: Capability<V>,
    {
        let handle = self.acquire()?;

        Ok(self.narrow_or_release(handle))
    }

    fn narrow_or_release<T>(&self, handle: Pooled<V>) -> Option<Narrowed<T, V>>
    where
        T: Capability<V>,
    {
        match handle.narrow::<T>() {
            Ok(narrowed) => Some(narrowed),
            Err(handle) => {
                debug!(
                    view = type_name::<V>(),
                    expected = type_name::<T>(),
                    actual = handle.concrete_type_name(),
                    "pooled instance is not of the expected concrete type"
                );

                self.release(handle);
                None
            }
        }
    }
}

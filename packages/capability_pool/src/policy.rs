use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

use crate::{Capability, CapabilityView, Result};

/// Governs how a [`CapabilityPool`][crate::CapabilityPool] creates new instances and whether it
/// keeps instances that are returned to it.
///
/// A policy is bound to one capability view `V` and is shared by every caller of the pool, so
/// it must not carry per-acquisition state.
pub trait PoolPolicy<V: ?Sized>: Send + Sync {
    /// Creates a fully constructed, default-valued instance for a pool miss.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Create`][crate::Error::Create] if no instance can be produced. The pool
    /// passes the error to the caller of `acquire` without retrying.
    fn create(&self) -> Result<Box<V>>;

    /// Decides whether a returned instance is retained (`true`) or dropped (`false`).
    ///
    /// The policy must not modify the instance. Retaining is the default.
    fn accept(&self, returned: &V) -> bool {
        _ = returned;
        true
    }
}

/// The default policy of the reuse case pattern.
///
/// Creates a `T::default()` and hands it out as the capability view `V`. Every returned
/// instance is retained as-is: nothing is reset, because every acquisition overwrites the
/// properties of `V` anyway and the other properties are invisible through `V`.
///
/// # Examples
///
/// ```
/// use capability_pool::record::{FirstCase, Record};
/// use capability_pool::{CapabilityPool, ReuseCasePolicy};
///
/// let pool = CapabilityPool::new(ReuseCasePolicy::<Record, dyn FirstCase>::new());
/// # _ = pool;
/// ```
pub struct ReuseCasePolicy<T, V: ?Sized> {
    _types: PhantomData<fn() -> (T, Box<V>)>,
}

impl<T, V: ?Sized> ReuseCasePolicy<T, V> {
    /// Creates the policy. The policy is zero-sized and stateless.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _types: PhantomData,
        }
    }
}

impl<T, V: ?Sized> Default for ReuseCasePolicy<T, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, V: ?Sized> Clone for ReuseCasePolicy<T, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, V: ?Sized> Copy for ReuseCasePolicy<T, V> {}

impl<T, V: ?Sized> fmt::Debug for ReuseCasePolicy<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("concrete_type", &format_args!("{}", type_name::<T>()))
            .field("view", &format_args!("{}", type_name::<V>()))
            .finish()
    }
}

impl<T, V> PoolPolicy<V> for ReuseCasePolicy<T, V>
where
    T: Capability<V> + Default,
    V: ?Sized + CapabilityView,
{
    fn create(&self) -> Result<Box<V>> {
        Ok(Box::new(T::default()).into_view())
    }
}

/// A policy that creates instances with a caller-supplied factory.
///
/// Use this when new instances need more than `Default::default()`, or when constructing one
/// can fail. Returned instances are always retained.
///
/// # Examples
///
/// ```
/// use capability_pool::record::{FirstCase, Record};
/// use capability_pool::{Capability, CapabilityPool, FnPolicy};
///
/// let pool = CapabilityPool::new(FnPolicy::new(
///     || -> capability_pool::Result<Box<dyn FirstCase>> {
///         Ok(Box::new(Record::default()).into_view())
///     },
/// ));
/// # _ = pool;
/// ```
pub struct FnPolicy<F> {
    factory: F,
}

impl<F> FnPolicy<F> {
    /// Creates a policy that calls `factory` on every pool miss.
    #[must_use]
    pub const fn new(factory: F) -> Self {
        Self { factory }
    }
}

impl<F> fmt::Debug for FnPolicy<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>()).finish_non_exhaustive()
    }
}

impl<V, F> PoolPolicy<V> for FnPolicy<F>
where
    V: ?Sized,
    F: Fn() -> Result<Box<V>> + Send + Sync,
{
    fn create(&self) -> Result<Box<V>> {
        (self.factory)()
    }
}

use std::any::type_name;
use std::fmt;
use std::num::NonZero;

use crate::{CapabilityPool, CapabilityView, PoolPolicy};

/// Builder for creating an instance of [`CapabilityPool`].
///
/// You only need to use this builder if you want to customize the pool configuration.
/// The default configuration used by [`CapabilityPool::new()`][1] retains every instance
/// that is released to it.
///
/// # Examples
///
/// ```
/// use std::num::NonZero;
///
/// use capability_pool::record::{FirstCase, Record};
/// use capability_pool::{CapabilityPool, ReuseCasePolicy};
///
/// let pool = CapabilityPool::builder(ReuseCasePolicy::<Record, dyn FirstCase>::new())
///     .max_retained(NonZero::new(16).unwrap())
///     .build();
///
/// assert_eq!(pool.max_retained(), NonZero::new(16));
/// ```
///
/// [1]: CapabilityPool::new
#[must_use]
pub struct CapabilityPoolBuilder<V: ?Sized + CapabilityView> {
    policy: Box<dyn PoolPolicy<V>>,
    max_retained: Option<NonZero<usize>>,
}

impl<V: ?Sized + CapabilityView> fmt::Debug for CapabilityPoolBuilder<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("max_retained", &self.max_retained)
            .finish_non_exhaustive()
    }
}

impl<V: ?Sized + CapabilityView> CapabilityPoolBuilder<V> {
    pub(crate) fn new(policy: Box<dyn PoolPolicy<V>>) -> Self {
        Self {
            policy,
            max_retained: None,
        }
    }

    /// Sets the maximum number of instances the pool keeps for reuse.
    ///
    /// Instances released while the pool is at this limit are dropped. By default, the pool
    /// keeps every released instance.
    pub fn max_retained(mut self, max: NonZero<usize>) -> Self {
        self.max_retained = Some(max);
        self
    }

    /// Builds the capability pool with the specified configuration.
    ///
    /// The pool starts empty. Use [`CapabilityPool::prepopulate()`] to create instances ahead
    /// of time.
    #[must_use]
    pub fn build(self) -> CapabilityPool<V> {
        CapabilityPool::new_inner(self.policy, self.max_retained)
    }
}

use std::any::type_name;
use std::fmt;
use std::num::NonZero;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::{
    Capability, CapabilityPoolBuilder, CapabilityView, PoolPolicy, Pooled, Result, ReuseCasePolicy,
};

/// A pool of recycled objects, typed and managed per capability view.
///
/// One pool exists per capability view `V` (a trait object such as `dyn FirstCase`). Every
/// object handed out by the pool is seen by the caller only through `V`, and the caller is
/// expected to overwrite all properties of `V` before using it. Nothing is reset on acquire or
/// release, so the properties of other views keep whatever values they last had.
///
/// Several pools may recycle the same concrete type through different views. They are fully
/// independent: nothing coordinates them and no instance moves between them.
///
/// # Thread safety
///
/// The pool is thread-safe and is meant to be shared by reference (or through an `Arc`) between
/// all callers that need the view. Every operation is non-blocking apart from a short critical
/// section around the collection of retained instances. An instance is owned exclusively by
/// its caller between [`acquire()`][Self::acquire] and [`release()`][Self::release].
///
/// # Examples
///
/// ```
/// use capability_pool::CapabilityPool;
/// use capability_pool::record::{FirstCase, Record};
///
/// let pool = CapabilityPool::<dyn FirstCase>::with_default_policy::<Record>();
///
/// let mut case = pool.acquire().unwrap();
/// case.set_property1("A0".to_string());
/// case.set_property2("B0".to_string());
/// pool.release(case);
///
/// // The same instance comes back with the values it was released with.
/// let case = pool.acquire().unwrap();
/// assert_eq!(case.property1(), Some("A0"));
/// ```
pub struct CapabilityPool<V: ?Sized + CapabilityView> {
    /// Instances waiting to be acquired again. Popped from and pushed to the back.
    retained: Mutex<Vec<Box<V>>>,

    policy: Box<dyn PoolPolicy<V>>,

    /// If set, instances released while this many are retained are dropped instead.
    max_retained: Option<NonZero<usize>>,
}

impl<V: ?Sized + CapabilityView> CapabilityPool<V> {
    /// Creates an empty pool that obtains new instances from `policy`.
    #[must_use]
    pub fn new(policy: impl PoolPolicy<V> + 'static) -> Self {
        Self::builder(policy).build()
    }

    /// Creates an empty pool that creates instances of `T` with [`ReuseCasePolicy`].
    #[must_use]
    pub fn with_default_policy<T>() -> Self
    where
        T: Capability<V> + Default,
    {
        Self::new(ReuseCasePolicy::<T, V>::new())
    }

    /// Starts building a pool with a custom configuration.
    pub fn builder(policy: impl PoolPolicy<V> + 'static) -> CapabilityPoolBuilder<V> {
        CapabilityPoolBuilder::new(Box::new(policy))
    }

    pub(crate) fn new_inner(
        policy: Box<dyn PoolPolicy<V>>,
        max_retained: Option<NonZero<usize>>,
    ) -> Self {
        debug!(
            view = type_name::<V>(),
            max_retained = max_retained.map(NonZero::get),
            "capability pool created"
        );

        Self {
            retained: Mutex::new(Vec::new()),
            policy,
            max_retained,
        }
    }

    /// Hands out an instance typed as the capability view.
    ///
    /// Returns a retained instance if there is one, otherwise asks the policy for a new one.
    /// A retained instance carries the values it was released with; no property is reset.
    ///
    /// # Errors
    ///
    /// Returns the policy's error if a new instance was needed and could not be created.
    pub fn acquire(&self) -> Result<Pooled<V>> {
        // The lock guard is a temporary, released before we call into the policy.
        let recycled = self.retained.lock().pop();

        if let Some(item) = recycled {
            trace!(view = type_name::<V>(), "reusing retained instance");
            return Ok(Pooled::new(item));
        }

        let item = self.policy.create()?;
        trace!(view = type_name::<V>(), "created new instance");

        Ok(Pooled::new(item))
    }

    /// Returns an instance to the pool for future [`acquire()`][Self::acquire] calls.
    ///
    /// Accepts both view-typed handles and [`Narrowed`][crate::Narrowed] handles. The instance
    /// is not validated or modified. It is dropped instead of retained if the policy rejects it
    /// or if the pool already retains its maximum number of instances.
    pub fn release(&self, handle: impl Into<Pooled<V>>) {
        let item = handle.into().into_inner();

        if !self.policy.accept(&item) {
            trace!(view = type_name::<V>(), "policy rejected instance, dropping");
            return;
        }

        let overflow = {
            let mut retained = self.retained.lock();

            if self.has_room_for_one_more(retained.len()) {
                retained.push(item);
                None
            } else {
                Some(item)
            }
        };

        if let Some(item) = overflow {
            trace!(view = type_name::<V>(), "pool is full, dropping instance");
            drop(item);
        } else {
            trace!(view = type_name::<V>(), "instance retained");
        }
    }

    /// Creates instances until the pool retains `count` of them (or its maximum).
    ///
    /// Instances already retained count towards `count`. At most `count` instances are created,
    /// even if other callers acquire from the pool meanwhile. Instances created here are
    /// indistinguishable from those created on a pool miss.
    ///
    /// # Errors
    ///
    /// Returns the policy's error on the first failed creation. Instances created before the
    /// failure stay in the pool.
    pub fn prepopulate(&self, count: usize) -> Result<()> {
        let mut created: usize = 0;

        while created < count && self.wants_more(self.retained(), count) {
            // The lock is not held while creating, so others may release in the meantime.
            let item = self.policy.create()?;
            created = created.wrapping_add(1);

            let surplus = {
                let mut retained = self.retained.lock();

                if self.wants_more(retained.len(), count) {
                    retained.push(item);
                    None
                } else {
                    Some(item)
                }
            };

            if let Some(item) = surplus {
                trace!(view = type_name::<V>(), "pool filled up meanwhile, dropping instance");
                drop(item);
                break;
            }
        }

        debug!(view = type_name::<V>(), created, "capability pool prepopulated");

        Ok(())
    }

    /// Number of instances currently waiting in the pool.
    #[must_use]
    pub fn retained(&self) -> usize {
        self.retained.lock().len()
    }

    /// Whether no instances are waiting in the pool.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.retained.lock().is_empty()
    }

    /// The maximum number of instances the pool retains, if limited.
    #[must_use]
    pub fn max_retained(&self) -> Option<NonZero<usize>> {
        self.max_retained
    }

    /// Drops every retained instance. Instances currently acquired are unaffected.
    pub fn clear(&self) {
        let dropped = {
            let mut retained = self.retained.lock();
            std::mem::take(&mut *retained)
        };

        debug!(
            view = type_name::<V>(),
            dropped = dropped.len(),
            "capability pool cleared"
        );
    }

    fn has_room_for_one_more(&self, retained: usize) -> bool {
        self.max_retained.is_none_or(|max| retained < max.get())
    }

    fn wants_more(&self, retained: usize, target: usize) -> bool {
        retained < target && self.has_room_for_one_more(retained)
    }
}

impl<V: ?Sized + CapabilityView> fmt::Debug for CapabilityPool<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("retained", &self.retained())
            .field("max_retained", &self.max_retained)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    use static_assertions::assert_impl_all;

    use super::*;
    use crate::record::{FirstCase, Record, SecondCase};
    use crate::{Error, FnPolicy};

    assert_impl_all!(CapabilityPool<dyn FirstCase>: Send, Sync, fmt::Debug);

    /// Counts creations and optionally rejects returned instances.
    struct CountingPolicy {
        created: Arc<AtomicUsize>,
        accept: bool,
    }

    impl PoolPolicy<dyn FirstCase> for CountingPolicy {
        fn create(&self) -> Result<Box<dyn FirstCase>> {
            self.created.fetch_add(1, Ordering::Relaxed);
            Ok(Box::new(Record::default()).into_view())
        }

        fn accept(&self, _returned: &(dyn FirstCase + 'static)) -> bool {
            self.accept
        }
    }

    fn counting_pool(accept: bool) -> (CapabilityPool<dyn FirstCase>, Arc<AtomicUsize>) {
        let created = Arc::new(AtomicUsize::new(0));
        let pool = CapabilityPool::new(CountingPolicy {
            created: Arc::clone(&created),
            accept,
        });

        (pool, created)
    }

    #[test]
    fn smoke_test() {
        let pool = CapabilityPool::<dyn FirstCase>::with_default_policy::<Record>();

        assert!(pool.is_empty());
        assert_eq!(pool.max_retained(), None);

        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        assert!(pool.is_empty());

        pool.release(a);
        pool.release(b);
        assert_eq!(pool.retained(), 2);
    }

    #[test]
    fn acquire_on_empty_pool_creates() {
        let (pool, created) = counting_pool(true);

        let first = pool.acquire().unwrap();

        assert_eq!(created.load(Ordering::Relaxed), 1);
        assert_eq!(first.property1(), None);
    }

    #[test]
    fn release_then_acquire_reuses_without_reset() {
        let (pool, created) = counting_pool(true);

        let mut case = pool.acquire().unwrap();
        case.set_property1("stale".to_string());
        pool.release(case);

        let case = pool.acquire().unwrap();

        assert_eq!(created.load(Ordering::Relaxed), 1);
        assert_eq!(case.property1(), Some("stale"));
    }

    #[test]
    fn rejected_instance_is_dropped() {
        let (pool, created) = counting_pool(false);

        let case = pool.acquire().unwrap();
        pool.release(case);
        assert!(pool.is_empty());

        _ = pool.acquire().unwrap();
        assert_eq!(created.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn release_beyond_max_retained_drops() {
        let pool = CapabilityPool::<dyn SecondCase>::builder(
            ReuseCasePolicy::<Record, dyn SecondCase>::new(),
        )
        .max_retained(NonZero::new(2).unwrap())
        .build();

        let handles = [
            pool.acquire().unwrap(),
            pool.acquire().unwrap(),
            pool.acquire().unwrap(),
        ];

        for handle in handles {
            pool.release(handle);
        }

        assert_eq!(pool.retained(), 2);
    }

    #[test]
    fn acquire_propagates_create_failure() {
        let pool = CapabilityPool::new(FnPolicy::new(|| -> Result<Box<dyn FirstCase>> {
            Err(Error::create_failed::<dyn FirstCase>("no memory for you"))
        }));

        assert!(matches!(pool.acquire(), Err(Error::Create { .. })));
    }

    #[test]
    fn failure_does_not_hide_retained_instances() {
        let pool = CapabilityPool::new(FnPolicy::new(|| -> Result<Box<dyn FirstCase>> {
            Err(Error::create_failed::<dyn FirstCase>("no memory for you"))
        }));

        let orphan: Box<dyn FirstCase> = Box::new(Record::default()).into_view();
        pool.release(Pooled::new(orphan));

        pool.acquire().unwrap();
        assert!(pool.acquire().is_err());
    }

    #[test]
    fn prepopulate_creates_requested_count() {
        let (pool, created) = counting_pool(true);

        pool.prepopulate(5).unwrap();

        assert_eq!(pool.retained(), 5);
        assert_eq!(created.load(Ordering::Relaxed), 5);
    }

    #[test]
    fn prepopulate_tops_up_existing() {
        let (pool, created) = counting_pool(true);

        pool.prepopulate(2).unwrap();
        pool.prepopulate(5).unwrap();

        assert_eq!(pool.retained(), 5);
        assert_eq!(created.load(Ordering::Relaxed), 5);

        pool.prepopulate(3).unwrap();

        assert_eq!(pool.retained(), 5);
        assert_eq!(created.load(Ordering::Relaxed), 5);
    }

    /// Pauses inside the first `create` call until the test lets it continue.
    struct PausingPolicy {
        calls: AtomicUsize,
        entered: Arc<Barrier>,
        resume: Arc<Barrier>,
    }

    impl PoolPolicy<dyn FirstCase> for PausingPolicy {
        fn create(&self) -> Result<Box<dyn FirstCase>> {
            if self.calls.fetch_add(1, Ordering::Relaxed) == 0 {
                self.entered.wait();
                self.resume.wait();
            }

            Ok(Box::new(Record::default()).into_view())
        }
    }

    #[test]
    fn prepopulate_respects_max_retained_under_concurrent_release() {
        let entered = Arc::new(Barrier::new(2));
        let resume = Arc::new(Barrier::new(2));

        let pool = CapabilityPool::builder(PausingPolicy {
            calls: AtomicUsize::new(0),
            entered: Arc::clone(&entered),
            resume: Arc::clone(&resume),
        })
        .max_retained(NonZero::new(2).unwrap())
        .build();

        thread::scope(|s| {
            let prepopulating = s.spawn(|| pool.prepopulate(2));

            entered.wait();
            for _ in 0..2 {
                let foreign: Box<dyn FirstCase> = Box::new(Record::default()).into_view();
                pool.release(Pooled::new(foreign));
            }
            resume.wait();

            prepopulating.join().unwrap().unwrap();
        });

        assert_eq!(pool.retained(), 2);
    }

    #[test]
    fn prepopulate_respects_max_retained() {
        let pool = CapabilityPool::<dyn FirstCase>::builder(
            ReuseCasePolicy::<Record, dyn FirstCase>::new(),
        )
        .max_retained(NonZero::new(3).unwrap())
        .build();

        pool.prepopulate(10).unwrap();

        assert_eq!(pool.retained(), 3);
    }

    #[test]
    fn prepopulate_propagates_failure() {
        let pool = CapabilityPool::new(FnPolicy::new(|| -> Result<Box<dyn FirstCase>> {
            Err(Error::create_failed::<dyn FirstCase>("nope"))
        }));

        assert!(pool.prepopulate(1).is_err());
        assert!(pool.is_empty());
    }

    #[test]
    fn clear_drops_retained() {
        let pool = CapabilityPool::<dyn FirstCase>::with_default_policy::<Record>();
        pool.prepopulate(4).unwrap();

        pool.clear();

        assert!(pool.is_empty());
    }

    #[test]
    fn debug_shows_retained_count() {
        let pool = CapabilityPool::<dyn FirstCase>::with_default_policy::<Record>();
        pool.prepopulate(1).unwrap();

        let output = format!("{pool:?}");

        assert!(output.contains("retained: 1"));
    }
}

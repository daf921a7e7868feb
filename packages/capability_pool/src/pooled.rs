use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use crate::{Capability, CapabilityView};

/// Exclusive handle to an instance acquired from a [`CapabilityPool`], typed as the pool's
/// capability view `V`.
///
/// Only the properties of `V` are reachable through the handle. The instance carries whatever
/// values it had when it was last released: acquiring does not reset anything.
///
/// Return the instance with [`CapabilityPool::release()`]. Dropping the handle instead simply
/// drops the instance; the pool does not track handles it has given out.
///
/// The handle cannot be copied or cloned, so an instance can never be held by two callers or
/// released twice.
///
/// [`CapabilityPool`]: crate::CapabilityPool
/// [`CapabilityPool::release()`]: crate::CapabilityPool::release
pub struct Pooled<V: ?Sized> {
    item: Box<V>,
}

impl<V: ?Sized + CapabilityView> Pooled<V> {
    pub(crate) fn new(item: Box<V>) -> Self {
        Self { item }
    }

    /// Whether the instance behind the handle is of the concrete type `T`.
    #[must_use]
    pub fn is<T: Capability<V>>(&self) -> bool {
        self.item.as_any().is::<T>()
    }

    /// Narrows the handle to the concrete type `T`.
    ///
    /// # Errors
    ///
    /// If the instance is not a `T`, the unchanged handle is returned as the error value so the
    /// caller may still release it.
    pub fn narrow<T: Capability<V>>(self) -> Result<Narrowed<T, V>, Self> {
        if !self.is::<T>() {
            return Err(self);
        }

        let concrete = self
            .item
            .into_any()
            .downcast::<T>()
            .expect("concrete type was checked immediately before downcasting");

        Ok(Narrowed::new(concrete))
    }

    /// Extracts the boxed instance, detaching it from the pool discipline.
    #[must_use]
    pub fn into_inner(self) -> Box<V> {
        self.item
    }
}

/// Wraps an instance that did not come from a pool, for example to hand it to
/// [`Initialized::Replaced`][crate::Initialized::Replaced] or to seed a pool by releasing it.
impl<V: ?Sized + CapabilityView> From<Box<V>> for Pooled<V> {
    fn from(item: Box<V>) -> Self {
        Self::new(item)
    }
}

impl<V: ?Sized> Deref for Pooled<V> {
    type Target = V;

    fn deref(&self) -> &Self::Target {
        &self.item
    }
}

impl<V: ?Sized> DerefMut for Pooled<V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.item
    }
}

impl<V: ?Sized + CapabilityView> fmt::Debug for Pooled<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field(
                "concrete_type",
                &format_args!("{}", self.item.concrete_type_name()),
            )
            .finish_non_exhaustive()
    }
}

/// Exclusive handle to a pooled instance that has been narrowed to its concrete type `T`.
///
/// All properties of `T` are reachable, including those of other capability views. Writing
/// those is a violation of the reuse case discipline: they belong to the other views' pools.
///
/// Obtained from [`CapabilityPool::acquire_and_initialize()`] or [`Pooled::narrow()`], and
/// released through [`CapabilityPool::release()`] of the pool for `V`.
///
/// [`CapabilityPool::acquire_and_initialize()`]: crate::CapabilityPool::acquire_and_initialize
/// [`CapabilityPool::release()`]: crate::CapabilityPool::release
pub struct Narrowed<T, V: ?Sized> {
    item: Box<T>,

    _view: PhantomData<fn() -> Box<V>>,
}

impl<T, V> Narrowed<T, V>
where
    T: Capability<V>,
    V: ?Sized + CapabilityView,
{
    pub(crate) fn new(item: Box<T>) -> Self {
        Self {
            item,
            _view: PhantomData,
        }
    }

    /// Widens the handle back to the capability view it was acquired through.
    #[must_use]
    pub fn into_view(self) -> Pooled<V> {
        Pooled::new(self.item.into_view())
    }
}

impl<T, V: ?Sized> Deref for Narrowed<T, V> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.item
    }
}

impl<T, V: ?Sized> DerefMut for Narrowed<T, V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.item
    }
}

impl<T, V> From<Narrowed<T, V>> for Pooled<V>
where
    T: Capability<V>,
    V: ?Sized + CapabilityView,
{
    fn from(value: Narrowed<T, V>) -> Self {
        value.into_view()
    }
}

impl<T: fmt::Debug, V: ?Sized> fmt::Debug for Narrowed<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("item", &self.item)
            .finish()
    }
}

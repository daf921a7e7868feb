use std::any::Any;

/// Base trait of every capability view.
///
/// A capability view is a trait that exposes one reuse case of a concrete type: the subset of
/// its properties that must be freshly set whenever the object is acquired for that reuse case.
/// Declare a view by extending this trait:
///
/// ```
/// use capability_pool::CapabilityView;
///
/// pub trait Addressing: CapabilityView {
///     fn host(&self) -> &str;
///     fn set_host(&mut self, value: String);
/// }
/// ```
///
/// Pools are then typed by the trait object, e.g. `CapabilityPool<dyn Addressing>`.
///
/// Concrete types implement this trait through [`impl_capabilities!`], which lists all the
/// views of the type in one place. It provides the runtime type inspection needed to narrow a
/// view-typed handle back to its concrete type.
///
/// [`impl_capabilities!`]: crate::impl_capabilities
pub trait CapabilityView: Any + Send {
    /// Returns the object as [`Any`], for checked downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Returns the object as mutable [`Any`], for checked downcasting to the concrete type.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Converts the boxed object into a boxed [`Any`].
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;

    /// Name of the concrete type behind the view. Diagnostic use only.
    fn concrete_type_name(&self) -> &'static str;
}

/// Declares that a concrete type exposes the capability view `V`.
///
/// The only thing this does is convert a boxed concrete instance into a boxed view, which is
/// an unsizing coercion that cannot be expressed generically. Use [`impl_capabilities!`] to
/// implement it for every view of a type instead of writing the impls by hand.
///
/// [`impl_capabilities!`]: crate::impl_capabilities
pub trait Capability<V: ?Sized + CapabilityView>: CapabilityView {
    /// Converts the boxed concrete instance into a handle typed as the capability view.
    fn into_view(self: Box<Self>) -> Box<V>;
}

/// Implements [`CapabilityView`] for a concrete type and [`Capability`] for each listed view.
///
/// All views of a type must be listed in a single invocation.
///
/// # Examples
///
/// ```
/// use capability_pool::{CapabilityView, impl_capabilities};
///
/// pub trait Naming: CapabilityView {
///     fn name(&self) -> &str;
/// }
///
/// pub trait Sizing: CapabilityView {
///     fn size(&self) -> usize;
/// }
///
/// #[derive(Default)]
/// struct Widget {
///     name: String,
///     size: usize,
/// }
///
/// impl Naming for Widget {
///     fn name(&self) -> &str {
///         &self.name
///     }
/// }
///
/// impl Sizing for Widget {
///     fn size(&self) -> usize {
///         self.size
///     }
/// }
///
/// impl_capabilities!(Widget: dyn Naming, dyn Sizing);
/// ```
#[macro_export]
macro_rules! impl_capabilities {
    ($concrete:ty: $($view:ty),+ $(,)?) => {
        impl $crate::CapabilityView for $concrete {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn into_any(
                self: ::std::boxed::Box<Self>,
            ) -> ::std::boxed::Box<dyn ::std::any::Any + ::std::marker::Send> {
                self
            }

            fn concrete_type_name(&self) -> &'static str {
                ::std::any::type_name::<Self>()
            }
        }

        $(
            impl $crate::Capability<$view> for $concrete {
                fn into_view(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<$view> {
                    self
                }
            }
        )+
    };
}

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Object pools partitioned by capability view.
//!
//! Large objects are expensive to reset, yet a classic object pool has to reset every property
//! of an instance before handing it out again. This crate takes a different approach: the
//! properties of a reusable type are partitioned into *reuse cases*, each exposed through a
//! narrow *capability view* trait, and one [`CapabilityPool`] exists per view. Whoever acquires
//! an instance through a view overwrites exactly the properties of that view. The remaining
//! properties keep whatever values they had and are invisible through the view, so nothing
//! ever needs a full reset.
//!
//! # Building blocks
//!
//! * [`CapabilityView`] is the base trait of every view. A view is a trait object such as
//!   `dyn FirstCase`.
//! * [`impl_capabilities!`] wires a concrete type to each of its views.
//! * [`PoolPolicy`] decides how a pool creates instances and whether it keeps returned ones.
//!   [`ReuseCasePolicy`] creates `T::default()` and keeps everything.
//! * [`CapabilityPool::acquire_and_initialize()`] acquires, initializes the view's properties
//!   and narrows the instance to its concrete type in one step.
//! * [`ViewSchema`] and [`check_disjoint()`] verify that no property belongs to two views.
//!
//! # Example
//!
//! ```
//! use capability_pool::record::{FirstCase, Record, SecondCase};
//! use capability_pool::{CapabilityPool, Initialized};
//!
//! let first_pool = CapabilityPool::<dyn FirstCase>::with_default_policy::<Record>();
//! let second_pool = CapabilityPool::<dyn SecondCase>::with_default_policy::<Record>();
//!
//! for round in 0..3 {
//!     let record = first_pool
//!         .acquire_and_initialize::<Record>(|case| {
//!             case.set_property1(format!("A{round}"));
//!             case.set_property2(format!("B{round}"));
//!             Initialized::Done
//!         })
//!         .unwrap()
//!         .unwrap();
//!
//!     assert_eq!(record.property1(), Some(format!("A{round}").as_str()));
//!     first_pool.release(record);
//!
//!     let record = second_pool
//!         .acquire_and_initialize::<Record>(|case| {
//!             case.set_property3(format!("C{round}"));
//!             case.set_property4(format!("D{round}"));
//!             Initialized::Done
//!         })
//!         .unwrap()
//!         .unwrap();
//!
//!     // This record has only ever been used for the second reuse case.
//!     assert_eq!(record.property1(), None);
//!     second_pool.release(record);
//! }
//! ```
//!
//! # Caller obligations
//!
//! The pools trust the capability contract and check none of the following:
//!
//! * An initializer must overwrite every property of its view before the instance is used.
//! * An initializer must not write properties of other views, even through a narrowed handle.
//! * An instance should be released to the pool it was acquired from.

mod accessor;
mod builder;
mod error;
mod policy;
mod pool;
mod pooled;
pub mod record;
mod schema;
mod view;

pub use accessor::*;
pub use builder::*;
pub use error::*;
pub use policy::*;
pub use pool::*;
pub use pooled::*;
pub use schema::*;
pub use view::*;

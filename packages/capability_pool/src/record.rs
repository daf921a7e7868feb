//! A ready-made reusable type with two reuse cases.
//!
//! [`Record`] carries four string properties. The first two belong to the [`FirstCase`] view and
//! the last two to the [`SecondCase`] view, so a `CapabilityPool<dyn FirstCase>` and a
//! `CapabilityPool<dyn SecondCase>` can recycle records independently of each other.
//!
//! # Examples
//!
//! ```
//! use capability_pool::record::{FirstCase, Record};
//! use capability_pool::{CapabilityPool, Initialized};
//!
//! let pool = CapabilityPool::<dyn FirstCase>::with_default_policy::<Record>();
//!
//! let record = pool
//!     .acquire_and_initialize::<Record>(|case| {
//!         case.set_property1("A0".to_string());
//!         case.set_property2("B0".to_string());
//!         Initialized::Done
//!     })
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(record.property1(), Some("A0"));
//! pool.release(record);
//! ```

use std::fmt;

use crate::{CapabilityView, ReuseCases, ViewSchema, impl_capabilities};

/// The first reuse case of [`Record`]: `property1` and `property2`.
pub trait FirstCase: CapabilityView {
    /// Value of `property1`, if ever set.
    fn property1(&self) -> Option<&str>;

    /// Overwrites `property1`.
    fn set_property1(&mut self, value: String);

    /// Value of `property2`, if ever set.
    fn property2(&self) -> Option<&str>;

    /// Overwrites `property2`.
    fn set_property2(&mut self, value: String);
}

/// The second reuse case of [`Record`]: `property3` and `property4`.
pub trait SecondCase: CapabilityView {
    /// Value of `property3`, if ever set.
    fn property3(&self) -> Option<&str>;

    /// Overwrites `property3`.
    fn set_property3(&mut self, value: String);

    /// Value of `property4`, if ever set.
    fn property4(&self) -> Option<&str>;

    /// Overwrites `property4`.
    fn set_property4(&mut self, value: String);
}

/// Property declaration of [`FirstCase`].
pub const FIRST_CASE: ViewSchema = ViewSchema::new("FirstCase", &["property1", "property2"]);

/// Property declaration of [`SecondCase`].
pub const SECOND_CASE: ViewSchema = ViewSchema::new("SecondCase", &["property3", "property4"]);

const RECORD_VIEWS: &[ViewSchema] = &[FIRST_CASE, SECOND_CASE];

/// Plain data holder implementing both [`FirstCase`] and [`SecondCase`].
///
/// A new record has no properties set. In steady state, records are created by a pool policy
/// on a pool miss rather than by callers.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Record {
    property1: Option<String>,
    property2: Option<String>,
    property3: Option<String>,
    property4: Option<String>,
}

impl FirstCase for Record {
    fn property1(&self) -> Option<&str> {
        self.property1.as_deref()
    }

    fn set_property1(&mut self, value: String) {
        self.property1 = Some(value);
    }

    fn property2(&self) -> Option<&str> {
        self.property2.as_deref()
    }

    fn set_property2(&mut self, value: String) {
        self.property2 = Some(value);
    }
}

impl SecondCase for Record {
    fn property3(&self) -> Option<&str> {
        self.property3.as_deref()
    }

    fn set_property3(&mut self, value: String) {
        self.property3 = Some(value);
    }

    fn property4(&self) -> Option<&str> {
        self.property4.as_deref()
    }

    fn set_property4(&mut self, value: String) {
        self.property4 = Some(value);
    }
}

impl_capabilities!(Record: dyn FirstCase, dyn SecondCase);

impl ReuseCases for Record {
    fn view_schemas() -> &'static [ViewSchema] {
        RECORD_VIEWS
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn show(value: Option<&String>) -> &str {
            value.map_or("null", String::as_str)
        }

        writeln!(
            f,
            "Property1={}\tProperty2={}",
            show(self.property1.as_ref()),
            show(self.property2.as_ref())
        )?;
        write!(
            f,
            "Property3={}\tProperty4={}",
            show(self.property3.as_ref()),
            show(self.property4.as_ref())
        )
    }
}

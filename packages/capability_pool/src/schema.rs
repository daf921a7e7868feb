use std::collections::HashMap;

use crate::{Error, Result};

/// Declares the properties that belong to one capability view.
///
/// Capability views of the same concrete type must not share properties: each property is
/// overwritten by exactly one reuse case. The pools cannot observe which properties an
/// initializer touches, so the declarations are the only machine-checkable form of that rule.
/// Check them with [`check_disjoint()`], typically from a test.
///
/// # Examples
///
/// ```
/// use capability_pool::{ViewSchema, check_disjoint};
///
/// const NAMING: ViewSchema = ViewSchema::new("Naming", &["name", "alias"]);
/// const SIZING: ViewSchema = ViewSchema::new("Sizing", &["width", "height"]);
///
/// check_disjoint(&[NAMING, SIZING]).unwrap();
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ViewSchema {
    name: &'static str,
    properties: &'static [&'static str],
}

impl ViewSchema {
    /// Declares a view named `name` that owns `properties`.
    #[must_use]
    pub const fn new(name: &'static str, properties: &'static [&'static str]) -> Self {
        Self { name, properties }
    }

    /// The name of the capability view.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The properties that the capability view owns.
    #[must_use]
    pub const fn properties(&self) -> &'static [&'static str] {
        self.properties
    }
}

/// Implemented by concrete reusable types to list the schemas of all their capability views.
pub trait ReuseCases {
    /// The schemas of every capability view that the type implements.
    fn view_schemas() -> &'static [ViewSchema];
}

/// Verifies that no property is claimed by more than one of the given views.
///
/// # Errors
///
/// Returns [`Error::OverlappingProperty`] for the first property found in two views.
pub fn check_disjoint(schemas: &[ViewSchema]) -> Result<()> {
    let mut owners: HashMap<&'static str, &'static str> = HashMap::new();

    for schema in schemas {
        for &property in schema.properties {
            if let Some(&first_view) = owners.get(property) {
                return Err(Error::OverlappingProperty {
                    property,
                    first_view,
                    second_view: schema.name,
                });
            }

            owners.insert(property, schema.name);
        }
    }

    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    const LEFT: ViewSchema = ViewSchema::new("Left", &["a", "b"]);
    const RIGHT: ViewSchema = ViewSchema::new("Right", &["c", "d"]);
    const GREEDY: ViewSchema = ViewSchema::new("Greedy", &["d", "e"]);

    #[test]
    fn disjoint_views_pass() {
        check_disjoint(&[LEFT, RIGHT]).unwrap();
    }

    #[test]
    fn empty_set_passes() {
        check_disjoint(&[]).unwrap();
    }

    #[test]
    fn overlap_is_reported_with_both_views() {
        let error = check_disjoint(&[LEFT, RIGHT, GREEDY]).unwrap_err();

        match error {
            Error::OverlappingProperty {
                property,
                first_view,
                second_view,
            } => {
                assert_eq!(property, "d");
                assert_eq!(first_view, "Right");
                assert_eq!(second_view, "Greedy");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_within_one_view_is_an_overlap() {
        const SELFISH: ViewSchema = ViewSchema::new("Selfish", &["x", "x"]);

        assert!(check_disjoint(&[SELFISH]).is_err());
    }
}

//! The per-resource object contract the driver hydrates and mutates.
//!
//! # Design
//! `ObjectContract` is object safe so heterogeneous collections can be
//! committed in one call (`&[&dyn ObjectContract]`). Construction lives in the
//! separate `BoundObject` trait because it needs `Self: Sized`.

use std::collections::HashMap;

use uuid::Uuid;

use crate::driver::ObjectDriver;

/// Field name to string value, already filtered to an object's whitelist.
pub type HydrationMap = HashMap<String, String>;

/// Capabilities a resource type exposes to the driver.
///
/// The driver never inspects concrete fields. It reads the whitelist to
/// filter incoming rows, asks for the dirty diff when committing, and hands
/// filtered rows back through `populate`.
pub trait ObjectContract {
    /// Resource name used for the endpoint file and for join keys.
    fn resource_name(&self) -> &str;

    /// Every field the object accepts from a response row.
    fn field_names(&self) -> &[&str];

    /// Name of the identifying query parameter.
    fn primary_key_name(&self) -> &str {
        "id"
    }

    fn object_id(&self) -> Uuid;

    /// Fields changed since the object was last loaded or saved, in the
    /// order they should appear on the wire.
    fn dirty_fields(&self) -> Vec<(String, String)>;

    /// Apply a whitelisted row. Keys absent from `fields` must be left as is.
    fn populate(&mut self, fields: &HydrationMap);

    fn accepts_field(&self, name: &str) -> bool {
        self.field_names().contains(&name)
    }
}

/// An object type the driver can construct on its own (list and create).
pub trait BoundObject: ObjectContract + Sized {
    /// A blank instance owned by `driver`.
    fn new_bound(driver: &ObjectDriver) -> Self;
}

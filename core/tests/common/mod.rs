//! Resource types shared by the integration tests.

#![allow(dead_code)]

use object_driver::{BoundObject, HydrationMap, ObjectContract, ObjectDriver};
use uuid::Uuid;

/// A resource with two columns and field-level dirty tracking.
#[derive(Debug, Clone, Default)]
pub struct Widget {
    driver: Option<ObjectDriver>,
    pub id: Uuid,
    pub name: String,
    dirty: Vec<(String, String)>,
}

impl Widget {
    pub fn with_id(id: Uuid) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.dirty.retain(|(field, _)| field != "name");
        self.dirty.push(("name".to_string(), name.to_string()));
    }

    /// Gadgets whose `id_Widget` column points at this widget.
    pub fn gadgets(&self) -> Vec<Gadget> {
        match &self.driver {
            Some(driver) => driver.join_table(self, "gadgets"),
            None => Vec::new(),
        }
    }
}

impl ObjectContract for Widget {
    fn resource_name(&self) -> &str {
        "Widget"
    }

    fn field_names(&self) -> &[&str] {
        &["id", "name"]
    }

    fn object_id(&self) -> Uuid {
        self.id
    }

    fn dirty_fields(&self) -> Vec<(String, String)> {
        self.dirty.clone()
    }

    fn populate(&mut self, fields: &HydrationMap) {
        if let Some(id) = fields.get("id").and_then(|raw| raw.parse().ok()) {
            self.id = id;
        }
        if let Some(name) = fields.get("name") {
            self.name = name.clone();
        }
        self.dirty.clear();
    }
}

impl BoundObject for Widget {
    fn new_bound(driver: &ObjectDriver) -> Self {
        Self {
            driver: Some(driver.clone()),
            ..Self::default()
        }
    }
}

/// A resource that belongs to a `Widget`.
#[derive(Debug, Clone, Default)]
pub struct Gadget {
    pub id: Uuid,
    pub label: String,
    pub widget_id: Option<Uuid>,
}

impl ObjectContract for Gadget {
    fn resource_name(&self) -> &str {
        "Gadget"
    }

    fn field_names(&self) -> &[&str] {
        &["id", "label", "id_Widget"]
    }

    fn object_id(&self) -> Uuid {
        self.id
    }

    fn dirty_fields(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    fn populate(&mut self, fields: &HydrationMap) {
        if let Some(id) = fields.get("id").and_then(|raw| raw.parse().ok()) {
            self.id = id;
        }
        if let Some(label) = fields.get("label") {
            self.label = label.clone();
        }
        if let Some(owner) = fields.get("id_Widget") {
            self.widget_id = owner.parse().ok();
        }
    }
}

impl BoundObject for Gadget {
    fn new_bound(_driver: &ObjectDriver) -> Self {
        Self::default()
    }
}

//! Widget-type registry.
//!
//! Read-only reference data describing which widget types can be dropped on
//! the grid and which wizard fields configure them.

use crate::models::attributes::deserialize_optional_scalar;
use crate::models::Attributes;
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Input control of a wizard field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Free text
    #[default]
    Text,
    /// Numeric value
    Number,
}

/// Where a wizard field's value lands in the produced fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTarget<'a> {
    /// Attribute of the widget's content element
    Attribute(&'a str),
    /// Text of a named sub-slot of the content element
    Slot(&'a str),
}

/// One wizard form field.
///
/// Exactly one of `attribute` or `slot` is set (enforced by
/// [`WidgetRegistry::new`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardField {
    /// Field label shown to the user
    pub label: String,
    /// Input control
    #[serde(default)]
    pub input: InputKind,
    /// Pre-filled value
    #[serde(
        default,
        deserialize_with = "deserialize_optional_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,
    /// Target attribute name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Target slot name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
}

impl WizardField {
    /// Field targeting an attribute of the content element.
    pub fn attribute(label: impl Into<String>, input: InputKind, name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            input,
            value: None,
            attribute: Some(name.into()),
            slot: None,
        }
    }

    /// Field targeting a named text sub-slot.
    pub fn slot(label: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            input: InputKind::Text,
            value: None,
            attribute: None,
            slot: Some(name.into()),
        }
    }

    /// Sets the pre-filled value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Resolved target of this field.
    #[must_use]
    pub fn target(&self) -> Option<FieldTarget<'_>> {
        match (&self.attribute, &self.slot) {
            (Some(name), None) => Some(FieldTarget::Attribute(name)),
            (None, Some(name)) => Some(FieldTarget::Slot(name)),
            _ => None,
        }
    }

    /// Name the field is addressed by (attribute or slot name).
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self.target()? {
            FieldTarget::Attribute(name) | FieldTarget::Slot(name) => Some(name),
        }
    }
}

/// A widget type that can be dropped onto the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetType {
    /// Custom element tag of the widget content (also the drag identifier)
    pub tag: String,
    /// Icon URL
    #[serde(default)]
    pub icon: String,
    /// Default attributes of the widget root
    #[serde(default)]
    pub card_attributes: Attributes,
    /// Default attributes of the content element
    #[serde(default)]
    pub widget_attributes: Attributes,
    /// Ordered wizard fields
    #[serde(default)]
    pub wizard: Vec<WizardField>,
}

impl WidgetType {
    /// Creates a widget type with no defaults and no fields.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            icon: String::new(),
            card_attributes: Attributes::new(),
            widget_attributes: Attributes::new(),
            wizard: Vec::new(),
        }
    }

    /// Appends a wizard field.
    #[must_use]
    pub fn with_field(mut self, field: WizardField) -> Self {
        self.wizard.push(field);
        self
    }

    /// Finds a wizard field by the attribute or slot name it targets.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&WizardField> {
        self.wizard.iter().find(|field| field.name() == Some(name))
    }
}

/// Lookup table of widget types keyed by tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WidgetRegistry {
    types: Vec<WidgetType>,
}

impl WidgetRegistry {
    /// Builds a registry, validating every type.
    ///
    /// # Validation
    ///
    /// - tags are valid custom element names (lowercase, start with a letter,
    ///   contain a hyphen) and unique
    /// - every wizard field targets exactly one attribute or slot
    pub fn new(types: Vec<WidgetType>) -> Result<Self> {
        let tag_regex =
            Regex::new(r"^[a-z][a-z0-9._]*-[a-z0-9._-]*$").context("Invalid tag pattern")?;

        for (index, widget_type) in types.iter().enumerate() {
            if !tag_regex.is_match(&widget_type.tag) {
                anyhow::bail!(
                    "Widget type tag '{}' is not a valid custom element name (lowercase with a hyphen)",
                    widget_type.tag
                );
            }

            if types[..index].iter().any(|other| other.tag == widget_type.tag) {
                anyhow::bail!("Duplicate widget type tag '{}'", widget_type.tag);
            }

            for field in &widget_type.wizard {
                if field.target().is_none() {
                    anyhow::bail!(
                        "Wizard field '{}' of '{}' must target exactly one attribute or slot",
                        field.label,
                        widget_type.tag
                    );
                }
            }
        }

        Ok(Self { types })
    }

    /// Looks up a widget type by tag.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&WidgetType> {
        self.types.iter().find(|widget_type| widget_type.tag == tag)
    }

    /// Iterates widget types in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &WidgetType> {
        self.types.iter()
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

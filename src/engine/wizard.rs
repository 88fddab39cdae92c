//! Wizard surface.
//!
//! The wizard turns a widget type into a concrete configuration fragment.
//! The engine only opens and closes it; the fragment comes back as an
//! [`Event::FragmentSubmitted`](crate::engine::Event::FragmentSubmitted).
//! [`FormWizard`] is a headless implementation used by the CLI and tests.

use std::collections::BTreeMap;

use anyhow::{Context, Result};

use crate::constants::CONTENT_SLOT;
use crate::models::{FieldTarget, InputKind, SlotNode, WidgetNode, WidgetType};

/// Surface the external drop controller opens for a new widget type.
pub trait WizardSurface {
    /// Shows the wizard for a widget type, replacing any open one.
    fn open(&mut self, widget_type: &WidgetType);

    /// Hides the wizard.
    fn close(&mut self);

    /// Widget type currently being configured.
    fn current(&self) -> Option<&WidgetType>;

    /// Returns true while the wizard is shown.
    fn is_open(&self) -> bool {
        self.current().is_some()
    }
}

/// Headless wizard collecting field values by name.
#[derive(Debug, Clone, Default)]
pub struct FormWizard {
    widget_type: Option<WidgetType>,
    values: BTreeMap<String, String>,
}

impl FormWizard {
    /// Creates a closed wizard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a field (pre-filled defaults included).
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Sets a field value by the attribute or slot name it targets.
    ///
    /// Number fields must hold a number.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let widget_type = self.widget_type.as_ref().context("Wizard is not open")?;
        let field = widget_type.field(name).with_context(|| {
            let known: Vec<&str> = widget_type.wizard.iter().filter_map(|f| f.name()).collect();
            format!(
                "Unknown field '{}' for '{}'. Fields: {}",
                name,
                widget_type.tag,
                known.join(", ")
            )
        })?;

        let value = value.into();
        if field.input == InputKind::Number && value.trim().parse::<f64>().is_err() {
            anyhow::bail!("Field '{}' expects a number, got '{}'", field.label, value);
        }

        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Builds the configuration fragment from the collected values.
    ///
    /// - card attributes become the widget's attributes
    /// - widget attributes and attribute fields land on a single `content`
    ///   slot whose tag is the widget type's tag
    /// - slot fields become `span` sub-slots of the content slot carrying the
    ///   value as text, in field order
    pub fn build_fragment(&self) -> Result<WidgetNode> {
        let widget_type = self.widget_type.as_ref().context("Wizard is not open")?;

        let mut content = SlotNode::new(CONTENT_SLOT, widget_type.tag.as_str());
        content.attributes = widget_type.widget_attributes.clone();

        for field in &widget_type.wizard {
            let value = field.name().and_then(|name| self.values.get(name));
            match field.target() {
                Some(FieldTarget::Attribute(name)) => {
                    if let Some(value) = value {
                        content.attributes.insert(name, value.as_str());
                    }
                }
                Some(FieldTarget::Slot(name)) => {
                    let text = value.map(String::as_str).unwrap_or_default();
                    content.slots.push(SlotNode::new(name, "span").with_content(text));
                }
                None => {}
            }
        }

        Ok(WidgetNode {
            attributes: widget_type.card_attributes.clone(),
            slots: vec![content],
        })
    }
}

impl WizardSurface for FormWizard {
    fn open(&mut self, widget_type: &WidgetType) {
        self.values = widget_type
            .wizard
            .iter()
            .filter_map(|field| Some((field.name()?.to_string(), field.value.clone()?)))
            .collect();
        self.widget_type = Some(widget_type.clone());
    }

    fn close(&mut self) {
        self.widget_type = None;
        self.values.clear();
    }

    fn current(&self) -> Option<&WidgetType> {
        self.widget_type.as_ref()
    }
}

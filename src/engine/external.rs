//! Dropping new widget types onto the grid.
//!
//! Icon drags carry a widget-type identifier; drags of existing widgets carry
//! none. A recognised identifier opens the wizard, and the widget is only
//! inserted once the wizard submits a completed fragment.

use tracing::{debug, info, warn};

use crate::dom::{Document, NodeId, Point};
use crate::engine::events::GridNotifier;
use crate::engine::reconciler;
use crate::engine::wizard::{FormWizard, WizardSurface};
use crate::models::{WidgetNode, WidgetRegistry, WidgetType};

/// Data transferred by a drag gesture.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DragPayload {
    /// Widget-type identifier, present only for icon drags
    pub widget_type: Option<String>,
}

impl DragPayload {
    /// Payload of a widget-type icon drag.
    pub fn widget_type(tag: impl Into<String>) -> Self {
        Self {
            widget_type: Some(tag.into()),
        }
    }

    /// Payload of an existing widget being reordered.
    #[must_use]
    pub fn reorder() -> Self {
        Self { widget_type: None }
    }

    /// Returns true for icon drags.
    #[must_use]
    pub fn is_new_widget(&self) -> bool {
        self.widget_type.is_some()
    }
}

/// Answer to a drag hovering the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    /// Pointer inside the grid, drop allowed
    Accept,
    /// Pointer outside the grid, no drop affordance
    Reject,
}

/// Result of dropping a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalDrop {
    /// Payload carries no widget type; it is a reorder
    NotExternal,
    /// Unknown widget type, dropped silently
    Ignored(String),
    /// The wizard was opened for this widget type
    WizardOpened(String),
}

/// Handles icon drags and wizard completion for one grid.
#[derive(Debug)]
pub struct ExternalDropController<W: WizardSurface = FormWizard> {
    registry: WidgetRegistry,
    wizard: W,
}

impl<W: WizardSurface> ExternalDropController<W> {
    /// Creates a controller over a registry and a wizard surface.
    #[must_use]
    pub fn new(registry: WidgetRegistry, wizard: W) -> Self {
        Self { registry, wizard }
    }

    /// Widget types accepted by this grid.
    #[must_use]
    pub const fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    /// The wizard surface.
    #[must_use]
    pub const fn wizard(&self) -> &W {
        &self.wizard
    }

    /// The wizard surface, mutably.
    pub fn wizard_mut(&mut self) -> &mut W {
        &mut self.wizard
    }

    /// Accepts the drag only while the pointer is inside the grid's box.
    #[must_use]
    pub fn drag_over(&self, doc: &Document, grid: NodeId, point: Point) -> DropEffect {
        match doc.rect(grid) {
            Some(rect) if rect.contains(point) => DropEffect::Accept,
            _ => DropEffect::Reject,
        }
    }

    /// Handles a drop. Opens the wizard for registered widget types.
    pub fn drop(&mut self, payload: &DragPayload) -> ExternalDrop {
        let Some(tag) = payload.widget_type.as_deref() else {
            return ExternalDrop::NotExternal;
        };

        match self.registry.get(tag) {
            Some(widget_type) => {
                let widget_type: WidgetType = widget_type.clone();
                self.wizard.open(&widget_type);
                debug!(%tag, "Wizard opened");
                ExternalDrop::WizardOpened(tag.to_string())
            }
            None => {
                // A stale payload, nothing the user can fix.
                debug!(%tag, "Dropped unknown widget type");
                ExternalDrop::Ignored(tag.to_string())
            }
        }
    }

    /// Appends a submitted fragment to the grid and closes the wizard.
    ///
    /// Returns `None` when no wizard is open (a late or duplicate submit).
    pub fn complete(
        &mut self,
        doc: &mut Document,
        grid: NodeId,
        fragment: &WidgetNode,
        notifier: &GridNotifier,
    ) -> Option<NodeId> {
        if !self.wizard.is_open() {
            warn!("Fragment submitted without an open wizard, ignoring");
            return None;
        }

        let item = reconciler::append_widget(doc, grid, fragment, notifier);
        self.wizard.close();
        info!(%item, "Widget inserted from wizard");
        Some(item)
    }

    /// Closes the wizard without inserting anything.
    pub fn cancel(&mut self) {
        self.wizard.close();
    }
}

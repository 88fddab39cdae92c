//! Tree ⇄ element reconciliation.
//!
//! [`materialize`] turns a [`WidgetNode`] into live elements, recursing into
//! nested slots; [`dematerialize`] walks a live container and rebuilds the
//! configuration tree from slot assignments, attributes and direct text.
//! Neither direction knows any widget schema: any tag at any depth
//! reconciles.
//!
//! The pair round-trips: `dematerialize` of a container holding
//! `materialize(node)` yields `node` again.

use tracing::debug;

use crate::constants::{DRAG_MARKER_ATTR, WIDGET_ROOT_TAG};
use crate::dom::{Document, NodeId};
use crate::engine::events::GridNotifier;
use crate::models::{Attributes, SlotNode, WidgetNode};

/// Creates the live element tree of a widget.
///
/// Attributes are applied unfiltered. The returned root is detached; use
/// [`append_widget`] to place it in a grid.
pub fn materialize(doc: &mut Document, node: &WidgetNode) -> NodeId {
    let root = doc.create_element(WIDGET_ROOT_TAG);
    for (key, value) in node.attributes.iter() {
        doc.set_attribute(root, key, value);
    }

    for slot in &node.slots {
        let child = materialize_slot(doc, slot);
        doc.append_child(root, child);
    }

    root
}

/// Creates the live element of one slot and its nested slots.
pub fn materialize_slot(doc: &mut Document, slot: &SlotNode) -> NodeId {
    let element = doc.create_element(slot.tag.as_str());
    doc.set_slot(element, slot.name.as_str());
    for (key, value) in slot.attributes.iter() {
        doc.set_attribute(element, key, value);
    }

    if !slot.content.is_empty() {
        doc.append_text(element, slot.content.as_str());
    }

    for nested in &slot.slots {
        let child = materialize_slot(doc, nested);
        doc.append_child(element, child);
    }

    element
}

/// Rebuilds the widget list from a live container.
///
/// Every element child of `container` is one widget, except drop-zone
/// placeholders. Text directly inside the container is ignored. Elements
/// without a slot assignment are captured with an empty name rather than
/// rejected.
#[must_use]
pub fn dematerialize(doc: &Document, container: NodeId) -> Vec<WidgetNode> {
    doc.element_children(container)
        .into_iter()
        .filter(|child| !doc.flags(*child).placeholder)
        .map(|child| WidgetNode {
            attributes: snapshot_attributes(doc, child),
            slots: dematerialize_slots(doc, child),
        })
        .collect()
}

fn dematerialize_slots(doc: &Document, parent: NodeId) -> Vec<SlotNode> {
    doc.element_children(parent)
        .into_iter()
        .filter(|child| !doc.flags(*child).placeholder)
        .map(|child| dematerialize_slot(doc, child))
        .collect()
}

fn dematerialize_slot(doc: &Document, element: NodeId) -> SlotNode {
    SlotNode {
        name: doc.slot(element).unwrap_or_default().to_string(),
        tag: doc.tag(element).unwrap_or_default().to_string(),
        attributes: snapshot_attributes(doc, element),
        content: doc.direct_text(element),
        slots: dematerialize_slots(doc, element),
    }
}

fn snapshot_attributes(doc: &Document, element: NodeId) -> Attributes {
    doc.attributes(element)
        .map(|attrs| {
            attrs
                .iter()
                .filter(|(key, _)| key.as_str() != DRAG_MARKER_ATTR)
                .map(|(key, value)| (key.as_str(), value.as_str()))
                .collect()
        })
        .unwrap_or_default()
}

/// Materializes a widget, appends it to `container` and announces it.
pub fn append_widget(
    doc: &mut Document,
    container: NodeId,
    node: &WidgetNode,
    notifier: &GridNotifier,
) -> NodeId {
    let item = materialize(doc, node);
    doc.append_child(container, item);
    debug!(%item, %container, slots = node.slots.len(), "Widget appended");
    notifier.item_added(container, item);
    item
}

/// Appends every widget of a configuration to `container`.
pub fn mount(
    doc: &mut Document,
    container: NodeId,
    widgets: &[WidgetNode],
    notifier: &GridNotifier,
) -> Vec<NodeId> {
    widgets
        .iter()
        .map(|widget| append_widget(doc, container, widget, notifier))
        .collect()
}

/// Removes the widget at `index` (placeholders not counted) and announces it.
pub fn remove_widget(
    doc: &mut Document,
    container: NodeId,
    index: usize,
    notifier: &GridNotifier,
) -> Option<NodeId> {
    let item = widget_items(doc, container).get(index).copied()?;
    doc.remove(item);
    notifier.item_removed(container, item);
    Some(item)
}

/// Widget elements of a container in order, placeholders excluded.
#[must_use]
pub fn widget_items(doc: &Document, container: NodeId) -> Vec<NodeId> {
    doc.element_children(container)
        .into_iter()
        .filter(|child| !doc.flags(*child).placeholder)
        .collect()
}

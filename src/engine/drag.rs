//! Drag-to-reorder for a collection of widgets.
//!
//! Each collection runs a small state machine:
//!
//! ```text
//! Idle --pointer down on grab handle--> Armed --native drag start--> Dragging
//!  ^                                      |                            |
//!  +------------- pointer leave ----------+                            |
//!  +----------------------- drop (commit) / drag end (cancel) ---------+
//! ```
//!
//! While dragging, a placeholder element carrying the dragged item's layout
//! classes follows the pointer: it is placed immediately before the sibling
//! whose bounding box contains the pointer, or at the end of the collection
//! when no sibling does. Placeholder moves are visual only; the single
//! reorder of a session happens on drop.
//!
//! Items added after setup are wired from [`GridEvent`] notifications,
//! drained at the start of every handler.

use std::collections::BTreeSet;
use std::sync::mpsc::Receiver;

use tracing::debug;

use crate::constants::DROPZONE_CLASS;
use crate::dom::{Document, NodeId, Point, Rect};
use crate::engine::events::GridEvent;

/// Grab handle area, a square inset from the item's top-right corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleRegion {
    /// Side length of the handle
    pub size: f64,
    /// Distance from the item's top and right edges
    pub inset: f64,
}

impl Default for HandleRegion {
    fn default() -> Self {
        Self {
            size: 32.0,
            inset: 8.0,
        }
    }
}

impl HandleRegion {
    /// Handle rectangle of an item occupying `item`.
    #[must_use]
    pub fn locate(&self, item: Rect) -> Rect {
        Rect::new(
            item.right() - self.inset - self.size,
            item.y + self.inset,
            self.size,
            self.size,
        )
    }

    /// Center of the handle, convenient for synthesized gestures.
    #[must_use]
    pub fn center(&self, item: Rect) -> Point {
        let handle = self.locate(item);
        Point::new(handle.x + handle.width / 2.0, handle.y + handle.height / 2.0)
    }
}

/// Ephemeral state of one drag gesture. Never serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    /// The grabbed item
    pub dragged: NodeId,
    /// Drop-zone stand-in for the prospective position
    pub placeholder: NodeId,
    /// Index of the dragged item when the drag began
    pub origin_index: usize,
}

/// Externally visible phase of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// No interaction
    Idle,
    /// An item's grab handle is held
    Armed(NodeId),
    /// A drag session is active
    Dragging(DragSession),
}

/// Result of a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The dragged item moved
    Reordered {
        /// The moved item
        item: NodeId,
        /// Index before the move
        from: usize,
        /// Index after the move
        to: usize,
    },
    /// Dropped where it started, or before the placeholder was ever shown
    Unchanged(NodeId),
    /// The dragged item vanished mid-drag; nothing was moved
    Discarded,
    /// No drag session was active
    NoSession,
}

/// Reorder controller for one collection.
#[derive(Debug)]
pub struct DragReorderController {
    container: NodeId,
    handle: HandleRegion,
    events: Receiver<GridEvent>,
    items: BTreeSet<NodeId>,
    phase: DragPhase,
}

impl DragReorderController {
    /// Creates a controller for `container`, listening on `events`.
    #[must_use]
    pub fn new(container: NodeId, events: Receiver<GridEvent>, handle: HandleRegion) -> Self {
        Self {
            container,
            handle,
            events,
            items: BTreeSet::new(),
            phase: DragPhase::Idle,
        }
    }

    /// The managed collection.
    #[must_use]
    pub const fn container(&self) -> NodeId {
        self.container
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Grab handle geometry.
    #[must_use]
    pub const fn handle(&self) -> HandleRegion {
        self.handle
    }

    /// Returns true if the item is wired for dragging.
    #[must_use]
    pub fn is_wired(&self, item: NodeId) -> bool {
        self.items.contains(&item)
    }

    /// Wires every element currently in the collection (initial setup).
    pub fn attach(&mut self, doc: &Document) {
        for item in doc.element_children(self.container) {
            if !doc.flags(item).placeholder {
                self.items.insert(item);
            }
        }
    }

    /// Applies pending structural-change notifications.
    pub fn pump(&mut self, doc: &mut Document) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                GridEvent::ItemAdded { container, item } if container == self.container => {
                    debug!(%item, "Wiring new drag item");
                    self.items.insert(item);
                }
                GridEvent::ItemRemoved { container, item } if container == self.container => {
                    self.items.remove(&item);
                    if self.phase == DragPhase::Armed(item) {
                        doc.flags_mut(item).draggable = false;
                        self.phase = DragPhase::Idle;
                    }
                }
                _ => {}
            }
        }
    }

    /// Pointer pressed. Arms the item whose grab handle contains `point`.
    ///
    /// Ignored while dragging. Pressing outside every handle disarms.
    pub fn pointer_down(&mut self, doc: &mut Document, point: Point) -> Option<NodeId> {
        self.pump(doc);
        if matches!(self.phase, DragPhase::Dragging(_)) {
            return None;
        }
        self.disarm(doc);

        let hit = doc
            .element_children(self.container)
            .into_iter()
            .filter(|item| self.items.contains(item))
            .find(|item| {
                doc.rect(*item)
                    .is_some_and(|rect| self.handle.locate(rect).contains(point))
            })?;

        doc.flags_mut(hit).draggable = true;
        self.phase = DragPhase::Armed(hit);
        debug!(item = %hit, "Drag armed");
        Some(hit)
    }

    /// Pointer left the grab handle of the armed item.
    pub fn pointer_leave(&mut self, doc: &mut Document) -> bool {
        self.pump(doc);
        self.disarm(doc)
    }

    fn disarm(&mut self, doc: &mut Document) -> bool {
        if let DragPhase::Armed(item) = self.phase {
            doc.flags_mut(item).draggable = false;
            self.phase = DragPhase::Idle;
            return true;
        }
        false
    }

    /// Native drag started on `item`.
    ///
    /// Only the armed candidate can start a drag. A stale session left over
    /// from an earlier gesture is discarded first.
    pub fn drag_start(&mut self, doc: &mut Document, item: NodeId) -> Option<DragSession> {
        self.pump(doc);
        if let DragPhase::Dragging(stale) = self.phase {
            debug!(item = %stale.dragged, "Superseding stale drag session");
            self.finish(doc, stale);
        }

        if self.phase != DragPhase::Armed(item) || !doc.is_attached(item, self.container) {
            return None;
        }

        let origin_index = doc.index_in_parent(item)?;
        let placeholder = doc.create_element("div");
        let mut classes: Vec<String> = doc.class_list(item).into_iter().map(String::from).collect();
        if !classes.iter().any(|class| class == DROPZONE_CLASS) {
            classes.push(DROPZONE_CLASS.to_string());
        }
        doc.set_attribute(placeholder, "class", classes.join(" "));
        doc.flags_mut(placeholder).placeholder = true;
        doc.flags_mut(item).dragging = true;

        let session = DragSession {
            dragged: item,
            placeholder,
            origin_index,
        };
        self.phase = DragPhase::Dragging(session);
        debug!(%item, origin_index, "Drag started");
        Some(session)
    }

    /// Pointer moved during a drag. Returns true if the placeholder moved.
    pub fn drag_move(&mut self, doc: &mut Document, point: Point) -> bool {
        self.pump(doc);
        let DragPhase::Dragging(session) = self.phase else {
            return false;
        };

        if !doc.is_attached(session.dragged, self.container) {
            debug!(item = %session.dragged, "Dragged item vanished, discarding session");
            self.finish(doc, session);
            return false;
        }

        let placeholder = session.placeholder;
        let hit = doc
            .element_children(self.container)
            .into_iter()
            .find(|sibling| doc.rect(*sibling).is_some_and(|rect| rect.contains(point)));

        match hit {
            Some(target) if target == placeholder => false,
            Some(target) => {
                let attached = doc.parent(placeholder) == Some(self.container);
                if attached && doc.next_sibling(placeholder) == Some(target) {
                    return false;
                }
                doc.insert_before(placeholder, target)
            }
            None => {
                let last = doc.children(self.container).last().copied();
                if last == Some(placeholder) {
                    return false;
                }
                doc.append_child(self.container, placeholder)
            }
        }
    }

    /// Drag released over the collection. Commits the session's reorder.
    pub fn drop(&mut self, doc: &mut Document) -> DropOutcome {
        self.pump(doc);
        let DragPhase::Dragging(session) = self.phase else {
            return DropOutcome::NoSession;
        };

        if !doc.is_attached(session.dragged, self.container) {
            debug!(item = %session.dragged, "Drop after dragged item vanished");
            self.finish(doc, session);
            return DropOutcome::Discarded;
        }

        let outcome = if doc.parent(session.placeholder) == Some(self.container) {
            doc.insert_before(session.dragged, session.placeholder);
            doc.remove(session.placeholder);
            match doc.index_in_parent(session.dragged) {
                Some(to) if to != session.origin_index => DropOutcome::Reordered {
                    item: session.dragged,
                    from: session.origin_index,
                    to,
                },
                _ => DropOutcome::Unchanged(session.dragged),
            }
        } else {
            DropOutcome::Unchanged(session.dragged)
        };

        self.finish(doc, session);
        debug!(?outcome, "Drop handled");
        outcome
    }

    /// Drag ended without a drop. Restores the item and discards the
    /// placeholder; the collection order is untouched.
    pub fn drag_end(&mut self, doc: &mut Document) -> bool {
        self.pump(doc);
        let DragPhase::Dragging(session) = self.phase else {
            return false;
        };
        self.finish(doc, session);
        debug!(item = %session.dragged, "Drag cancelled");
        true
    }

    fn finish(&mut self, doc: &mut Document, session: DragSession) {
        doc.remove(session.placeholder);
        let flags = doc.flags_mut(session.dragged);
        flags.dragging = false;
        flags.draggable = false;
        self.phase = DragPhase::Idle;
    }
}

//! Engine events.
//!
//! Two kinds of messages flow through the engine:
//!
//! - [`GridEvent`]: structural-change notifications sent by the reconciler
//!   whenever it adds or removes a widget, so controllers can wire new items
//!   without rescanning the collection
//! - [`Event`]: user input routed by the dashboard to its controllers, with
//!   the result reported as an [`EventOutcome`]

use std::sync::mpsc::{self, Receiver, Sender};

use tracing::debug;

use crate::dom::{NodeId, Point};
use crate::engine::drag::DropOutcome;
use crate::engine::external::{DragPayload, DropEffect, ExternalDrop};
use crate::models::WidgetNode;

/// Structural change of a widget collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEvent {
    /// A widget element was appended to a collection
    ItemAdded {
        /// Collection the item was added to
        container: NodeId,
        /// The new item
        item: NodeId,
    },
    /// A widget element was removed from a collection
    ItemRemoved {
        /// Collection the item was removed from
        container: NodeId,
        /// The removed item
        item: NodeId,
    },
}

/// Sending half of the structural-change channel.
#[derive(Debug, Clone)]
pub struct GridNotifier {
    tx: Sender<GridEvent>,
}

impl GridNotifier {
    /// Creates a notifier and the receiver a controller drains.
    #[must_use]
    pub fn channel() -> (Self, Receiver<GridEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    /// Announces a newly added item.
    pub fn item_added(&self, container: NodeId, item: NodeId) {
        self.send(GridEvent::ItemAdded { container, item });
    }

    /// Announces a removed item.
    pub fn item_removed(&self, container: NodeId, item: NodeId) {
        self.send(GridEvent::ItemRemoved { container, item });
    }

    fn send(&self, event: GridEvent) {
        // No listener left means nobody needs wiring; not an error.
        if self.tx.send(event).is_err() {
            debug!(?event, "Grid event dropped, no listener");
        }
    }
}

/// User input delivered to the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Pointer pressed (possibly on a grab handle)
    PointerDown(Point),
    /// Pointer left the armed item's grab handle
    PointerLeave,
    /// Native drag gesture started on an element
    DragStart(NodeId),
    /// Pointer moved during a drag
    DragMove(Point),
    /// Drag hovering over the grid boundary
    DragOver {
        /// Pointer position
        point: Point,
        /// Transferred data
        payload: DragPayload,
    },
    /// Drag released
    Drop {
        /// Pointer position
        point: Point,
        /// Transferred data
        payload: DragPayload,
    },
    /// Drag ended without a valid drop
    DragEnd,
    /// The wizard produced a completed widget configuration
    FragmentSubmitted(WidgetNode),
}

/// What handling an [`Event`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Nothing happened
    Ignored,
    /// An item was armed by its grab handle
    Armed(NodeId),
    /// The armed item was released without dragging
    Disarmed,
    /// A drag session started for the item
    DragStarted(NodeId),
    /// The placeholder changed position
    PlaceholderMoved,
    /// Answer to a drag-over
    DragOver(DropEffect),
    /// A reorder drop finished
    Reorder(DropOutcome),
    /// A widget-type drop was handled
    External(ExternalDrop),
    /// The drag session was cancelled
    DragCancelled,
    /// A wizard fragment was appended to the grid
    WidgetInserted(NodeId),
}

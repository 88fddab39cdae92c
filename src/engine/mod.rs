//! Layout engine.
//!
//! Keeps a live grid of widget elements in sync with the configuration
//! tree, drives drag-to-reorder and drops of new widget types, and
//! periodically persists the arrangement.

pub mod autosave;
pub mod dashboard;
pub mod drag;
pub mod events;
pub mod external;
pub mod layout;
pub mod reconciler;
pub mod wizard;

pub use autosave::{AutosaveLoop, AutosaveReport};
pub use dashboard::{Dashboard, DashboardOptions};
pub use drag::{DragPhase, DragReorderController, DragSession, DropOutcome, HandleRegion};
pub use events::{Event, EventOutcome, GridEvent, GridNotifier};
pub use external::{DragPayload, DropEffect, ExternalDrop, ExternalDropController};
pub use layout::{flow_layout, GridMetrics};
pub use wizard::{FormWizard, WizardSurface};

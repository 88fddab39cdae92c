//! Dashboard view: one live grid and the controllers attached to it.
//!
//! [`Dashboard::open`] resolves the effective configuration, materializes
//! it into a fresh grid container and wires the reorder and external drop
//! controllers. Input then flows through [`Dashboard::dispatch`]; the
//! persisted record is refreshed by [`Dashboard::autosave_tick`] and
//! immediately after a wizard insertion.

use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::constants::{DEFAULT_AUTOSAVE_SECS, DEFAULT_CONFIG_ID, GRID_TAG};
use crate::dom::{Document, NodeId, Point};
use crate::engine::autosave::AutosaveReport;
use crate::engine::drag::{DragReorderController, DropOutcome, HandleRegion};
use crate::engine::events::{Event, EventOutcome, GridNotifier};
use crate::engine::external::{DragPayload, DropEffect, ExternalDropController};
use crate::engine::layout::{flow_layout, set_element_size, GridMetrics};
use crate::engine::reconciler;
use crate::engine::wizard::{FormWizard, WizardSurface};
use crate::models::{GridConfig, WidgetNode, WidgetRegistry, WidgetSize};
use crate::services::ConfigService;

/// Settings for opening a dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOptions {
    /// Built-in configuration used when no custom record exists
    pub config_id: String,
    /// Grab handle geometry
    pub handle: HandleRegion,
    /// Grid track geometry
    pub metrics: GridMetrics,
    /// Autosave period
    pub autosave: Duration,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            config_id: DEFAULT_CONFIG_ID.to_string(),
            handle: HandleRegion::default(),
            metrics: GridMetrics::default(),
            autosave: Duration::from_secs(DEFAULT_AUTOSAVE_SECS),
        }
    }
}

impl From<&Config> for DashboardOptions {
    fn from(config: &Config) -> Self {
        Self {
            config_id: config.grid.config_id.clone(),
            handle: HandleRegion {
                size: config.grid.handle_size,
                inset: config.grid.handle_inset,
            },
            metrics: GridMetrics {
                columns: config.grid.columns,
                cell: config.grid.cell_size,
                gap: config.grid.gap,
                origin: Point::new(0.0, 0.0),
            },
            autosave: Duration::from_secs(config.autosave.interval_secs),
        }
    }
}

/// A live dashboard.
#[derive(Debug)]
pub struct Dashboard<W: WizardSurface = FormWizard> {
    doc: Document,
    grid: NodeId,
    config: GridConfig,
    notifier: GridNotifier,
    reorder: DragReorderController,
    external: ExternalDropController<W>,
    service: ConfigService,
    metrics: GridMetrics,
    active: watch::Sender<bool>,
}

impl Dashboard {
    /// Opens a dashboard with the headless form wizard.
    pub fn open(service: ConfigService, options: &DashboardOptions) -> Result<Self> {
        Self::open_with(service, options, FormWizard::new())
    }
}

impl<W: WizardSurface> Dashboard<W> {
    /// Opens a dashboard with a caller-provided wizard surface.
    ///
    /// # Arguments
    ///
    /// * `service` - Configuration service, owned by the dashboard from now on
    /// * `options` - Configuration id and geometry
    /// * `wizard` - Surface opened when a widget type is dropped
    ///
    /// # Returns
    ///
    /// * `Ok(Dashboard)` - Active dashboard with every widget materialized
    /// * `Err(...)` - Storage or catalog failure
    pub fn open_with(
        mut service: ConfigService,
        options: &DashboardOptions,
        wizard: W,
    ) -> Result<Self> {
        let config = service.load_grid(&options.config_id)?;
        let registry = service.registry(&options.config_id)?;

        let mut doc = Document::new();
        let grid = doc.create_element(GRID_TAG);
        let (notifier, events) = GridNotifier::channel();
        let mut reorder = DragReorderController::new(grid, events, options.handle);

        reconciler::mount(&mut doc, grid, &config.grid, &notifier);
        reorder.attach(&doc);
        flow_layout(&mut doc, grid, &options.metrics);

        info!(
            id = %config.id,
            widgets = config.grid.len(),
            types = registry.len(),
            "Dashboard opened"
        );

        Ok(Self {
            doc,
            grid,
            config,
            notifier,
            reorder,
            external: ExternalDropController::new(registry, wizard),
            service,
            metrics: options.metrics,
            active: watch::Sender::new(true),
        })
    }

    /// The live element tree.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.doc
    }

    /// The grid container.
    #[must_use]
    pub const fn grid(&self) -> NodeId {
        self.grid
    }

    /// Configuration the dashboard was opened with.
    #[must_use]
    pub const fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Widget types that can be dropped onto the grid.
    #[must_use]
    pub const fn registry(&self) -> &WidgetRegistry {
        self.external.registry()
    }

    /// The reorder controller.
    #[must_use]
    pub const fn reorder(&self) -> &DragReorderController {
        &self.reorder
    }

    /// The wizard surface.
    #[must_use]
    pub const fn wizard(&self) -> &W {
        self.external.wizard()
    }

    /// The wizard surface, mutably (to fill in fields).
    pub fn wizard_mut(&mut self) -> &mut W {
        self.external.wizard_mut()
    }

    /// The configuration service.
    pub fn service_mut(&mut self) -> &mut ConfigService {
        &mut self.service
    }

    /// Widget elements in grid order.
    #[must_use]
    pub fn items(&self) -> Vec<NodeId> {
        reconciler::widget_items(&self.doc, self.grid)
    }

    /// Current widget tree, dematerialized from the live grid.
    #[must_use]
    pub fn snapshot(&self) -> Vec<WidgetNode> {
        reconciler::dematerialize(&self.doc, self.grid)
    }

    /// Returns true while the view is shown.
    #[must_use]
    pub fn is_active(&self) -> bool {
        *self.active.borrow()
    }

    /// Watches the shown/hidden state. Closes when the dashboard is dropped.
    #[must_use]
    pub fn activity(&self) -> watch::Receiver<bool> {
        self.active.subscribe()
    }

    /// Marks the view as shown again. A running autosave loop restarts its
    /// timer from now.
    pub fn activate(&mut self) {
        self.active.send_if_modified(|active| !std::mem::replace(active, true));
    }

    /// Marks the view as hidden. An autosave loop stops its timer until the
    /// view is activated again, and an in-flight drag is cancelled.
    pub fn deactivate(&mut self) {
        if self.reorder.drag_end(&mut self.doc) {
            self.relayout();
        }
        self.external.cancel();
        self.active.send_if_modified(|active| std::mem::replace(active, false));
    }

    /// Recomputes element boxes after a structural change.
    pub fn relayout(&mut self) {
        flow_layout(&mut self.doc, self.grid, &self.metrics);
    }

    /// Routes one input event to the controllers.
    ///
    /// Never fails: gestures that do not apply are reported as
    /// [`EventOutcome::Ignored`], and a failed persist after an insertion
    /// is logged.
    pub fn dispatch(&mut self, event: Event) -> EventOutcome {
        match event {
            Event::PointerDown(point) => self
                .reorder
                .pointer_down(&mut self.doc, point)
                .map_or(EventOutcome::Ignored, EventOutcome::Armed),
            Event::PointerLeave => {
                if self.reorder.pointer_leave(&mut self.doc) {
                    EventOutcome::Disarmed
                } else {
                    EventOutcome::Ignored
                }
            }
            Event::DragStart(item) => self
                .reorder
                .drag_start(&mut self.doc, item)
                .map_or(EventOutcome::Ignored, |session| {
                    EventOutcome::DragStarted(session.dragged)
                }),
            Event::DragMove(point) => self.move_placeholder(point),
            Event::DragOver { point, payload } => {
                if payload.is_new_widget() {
                    EventOutcome::DragOver(self.external.drag_over(&self.doc, self.grid, point))
                } else {
                    self.move_placeholder(point)
                }
            }
            Event::Drop { point, payload } => self.handle_drop(point, &payload),
            Event::DragEnd => {
                if self.reorder.drag_end(&mut self.doc) {
                    self.relayout();
                    EventOutcome::DragCancelled
                } else {
                    EventOutcome::Ignored
                }
            }
            Event::FragmentSubmitted(fragment) => self.insert_fragment(&fragment),
        }
    }

    fn move_placeholder(&mut self, point: Point) -> EventOutcome {
        if self.reorder.drag_move(&mut self.doc, point) {
            self.relayout();
            EventOutcome::PlaceholderMoved
        } else {
            EventOutcome::Ignored
        }
    }

    fn handle_drop(&mut self, point: Point, payload: &DragPayload) -> EventOutcome {
        if payload.is_new_widget() {
            if self.external.drag_over(&self.doc, self.grid, point) == DropEffect::Reject {
                debug!(?point, "Widget-type drop outside the grid");
                return EventOutcome::Ignored;
            }
            return EventOutcome::External(self.external.drop(payload));
        }

        let outcome = self.reorder.drop(&mut self.doc);
        if outcome != DropOutcome::NoSession {
            self.relayout();
        }
        EventOutcome::Reorder(outcome)
    }

    fn insert_fragment(&mut self, fragment: &WidgetNode) -> EventOutcome {
        let Some(item) = self
            .external
            .complete(&mut self.doc, self.grid, fragment, &self.notifier)
        else {
            return EventOutcome::Ignored;
        };

        self.reorder.pump(&mut self.doc);
        self.relayout();
        if let Err(e) = self.persist() {
            warn!(error = %format!("{e:#}"), "Failed to persist after insertion");
        }
        EventOutcome::WidgetInserted(item)
    }

    /// Removes the widget at `index` and returns its element.
    pub fn remove_widget(&mut self, index: usize) -> Option<NodeId> {
        let item = reconciler::remove_widget(&mut self.doc, self.grid, index, &self.notifier)?;
        self.reorder.pump(&mut self.doc);
        self.relayout();
        Some(item)
    }

    /// Sizes offered by this grid's column count.
    #[must_use]
    pub fn available_sizes(&self) -> Vec<WidgetSize> {
        WidgetSize::available(self.metrics.columns)
    }

    /// Changes the size class of the widget at `index` and lays the grid
    /// out again. Returns `None` if there is no such widget or the grid
    /// does not offer `size`.
    pub fn resize_widget(&mut self, index: usize, size: WidgetSize) -> Option<NodeId> {
        if !size.fits(self.metrics.columns) {
            debug!(%size, columns = self.metrics.columns, "Size not offered by grid");
            return None;
        }
        let item = self.items().get(index).copied()?;
        set_element_size(&mut self.doc, item, size);
        self.relayout();
        debug!(%item, %size, "Widget resized");
        Some(item)
    }

    /// Saves the current tree as the custom configuration.
    pub fn persist(&mut self) -> Result<AutosaveReport> {
        let widgets = self.snapshot();
        let count = widgets.len();
        let bytes = self.service.save_grid(&GridConfig::custom(widgets))?;
        Ok(AutosaveReport {
            widgets: count,
            bytes,
            saved_at: Local::now(),
        })
    }

    /// One autosave iteration. Returns `None` without saving while inactive.
    pub fn autosave_tick(&mut self) -> Result<Option<AutosaveReport>> {
        if !self.is_active() {
            return Ok(None);
        }
        self.persist().map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::drag::DragPhase;
    use crate::engine::external::ExternalDrop;
    use crate::models::BuiltinCatalog;
    use crate::services::MemoryStore;

    fn open(store: &MemoryStore) -> Dashboard {
        let service = ConfigService::new(store.clone(), BuiltinCatalog::bundled().unwrap());
        Dashboard::open(service, &DashboardOptions::default()).unwrap()
    }

    fn handle_of(dashboard: &Dashboard, item: NodeId) -> Point {
        let rect = dashboard.document().rect(item).unwrap();
        dashboard.reorder().handle().center(rect)
    }

    fn center_of(dashboard: &Dashboard, item: NodeId) -> Point {
        let rect = dashboard.document().rect(item).unwrap();
        Point::new(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
    }

    #[test]
    fn test_open_materializes_builtin() {
        let store = MemoryStore::new();
        let dashboard = open(&store);

        assert_eq!(dashboard.config().id, "standard");
        assert_eq!(dashboard.snapshot(), BuiltinCatalog::bundled().unwrap().grid("standard").grid);
        assert!(dashboard.items().iter().all(|item| dashboard.reorder().is_wired(*item)));
        assert!(dashboard.is_active());
    }

    #[test]
    fn test_reorder_gesture() {
        let store = MemoryStore::new();
        let mut dashboard = open(&store);
        let items = dashboard.items();
        let before = dashboard.snapshot();

        let press = handle_of(&dashboard, items[0]);
        assert_eq!(dashboard.dispatch(Event::PointerDown(press)), EventOutcome::Armed(items[0]));
        assert_eq!(dashboard.dispatch(Event::DragStart(items[0])), EventOutcome::DragStarted(items[0]));

        let target = center_of(&dashboard, items[1]);
        assert_eq!(dashboard.dispatch(Event::DragMove(target)), EventOutcome::PlaceholderMoved);

        // The placeholder now precedes the second item; move past everything.
        let far = Point::new(5_000.0, 5_000.0);
        dashboard.dispatch(Event::DragMove(far));
        let outcome = dashboard.dispatch(Event::Drop {
            point: far,
            payload: DragPayload::reorder(),
        });

        assert!(matches!(outcome, EventOutcome::Reorder(DropOutcome::Reordered { from: 0, to: 1, .. })));
        assert_eq!(dashboard.snapshot(), vec![before[1].clone(), before[0].clone()]);
        assert_eq!(dashboard.reorder().phase(), DragPhase::Idle);
    }

    #[test]
    fn test_cancelled_drag_is_noop() {
        let store = MemoryStore::new();
        let mut dashboard = open(&store);
        let items = dashboard.items();
        let before = dashboard.snapshot();

        dashboard.dispatch(Event::PointerDown(handle_of(&dashboard, items[1])));
        dashboard.dispatch(Event::DragStart(items[1]));
        dashboard.dispatch(Event::DragMove(center_of(&dashboard, items[0])));

        assert_eq!(dashboard.dispatch(Event::DragEnd), EventOutcome::DragCancelled);
        assert_eq!(dashboard.snapshot(), before);
        assert_eq!(dashboard.document().element_children(dashboard.grid()), items);
    }

    #[test]
    fn test_widget_type_drop_and_insert() {
        let store = MemoryStore::new();
        let mut dashboard = open(&store);
        let inside = Point::new(1.0, 1.0);
        let payload = DragPayload::widget_type("ettdash-map");

        assert_eq!(
            dashboard.dispatch(Event::DragOver { point: inside, payload: payload.clone() }),
            EventOutcome::DragOver(DropEffect::Accept)
        );
        assert_eq!(
            dashboard.dispatch(Event::Drop { point: inside, payload }),
            EventOutcome::External(ExternalDrop::WizardOpened("ettdash-map".to_string()))
        );

        dashboard.wizard_mut().set("zoom", "9").unwrap();
        let fragment = dashboard.wizard().build_fragment().unwrap();
        let outcome = dashboard.dispatch(Event::FragmentSubmitted(fragment.clone()));

        let EventOutcome::WidgetInserted(item) = outcome else {
            panic!("expected insertion, got {outcome:?}");
        };
        assert!(dashboard.reorder().is_wired(item));
        assert_eq!(dashboard.snapshot().last(), Some(&fragment));
        assert!(!dashboard.wizard().is_open());

        // Persisted immediately, without waiting for autosave.
        let saved = GridConfig::from_json(&store.get("config").unwrap()).unwrap();
        assert_eq!(saved.grid.len(), 3);
        assert!(saved.is_custom());
    }

    #[test]
    fn test_unknown_type_drop_changes_nothing() {
        let store = MemoryStore::new();
        let mut dashboard = open(&store);
        let before = dashboard.snapshot();

        let outcome = dashboard.dispatch(Event::Drop {
            point: Point::new(1.0, 1.0),
            payload: DragPayload::widget_type("ettdash-radar"),
        });

        assert_eq!(outcome, EventOutcome::External(ExternalDrop::Ignored("ettdash-radar".to_string())));
        assert!(!dashboard.wizard().is_open());
        assert_eq!(dashboard.snapshot(), before);
        assert!(store.history().is_empty());
    }

    #[test]
    fn test_drop_outside_grid_is_ignored() {
        let store = MemoryStore::new();
        let mut dashboard = open(&store);

        let outcome = dashboard.dispatch(Event::Drop {
            point: Point::new(-50.0, -50.0),
            payload: DragPayload::widget_type("ettdash-map"),
        });

        assert_eq!(outcome, EventOutcome::Ignored);
        assert!(!dashboard.wizard().is_open());
    }

    #[test]
    fn test_autosave_tick_respects_activity() {
        let store = MemoryStore::new();
        let mut dashboard = open(&store);

        let report = dashboard.autosave_tick().unwrap().unwrap();
        assert_eq!(report.widgets, 2);
        assert_eq!(report.bytes, store.get("config").unwrap().len());

        dashboard.deactivate();
        assert!(dashboard.autosave_tick().unwrap().is_none());
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn test_activity_is_observable() {
        let store = MemoryStore::new();
        let mut dashboard = open(&store);
        let mut activity = dashboard.activity();
        assert!(*activity.borrow_and_update());

        dashboard.activate();
        assert!(!activity.has_changed().unwrap());

        dashboard.deactivate();
        assert!(activity.has_changed().unwrap());
        assert!(!*activity.borrow_and_update());

        drop(dashboard);
        assert!(activity.has_changed().is_err());
    }

    #[test]
    fn test_resize_widget_changes_class_and_layout() {
        let store = MemoryStore::new();
        let mut dashboard = open(&store);
        let items = dashboard.items();

        assert_eq!(dashboard.resize_widget(0, WidgetSize::RowSmall), Some(items[0]));

        let widgets = dashboard.snapshot();
        let widget = &widgets[0];
        assert_eq!(widget.attributes.get("class"), Some("row-small"));
        assert_eq!(widget.attributes.get("size"), Some("row-small"));
        let rect = dashboard.document().rect(items[0]).unwrap();
        assert!((rect.width - 512.0).abs() < f64::EPSILON);
        assert!((dashboard.document().rect(items[1]).unwrap().x - 528.0).abs() < f64::EPSILON);

        assert_eq!(dashboard.resize_widget(7, WidgetSize::SquareSmall), None);
    }

    #[test]
    fn test_resize_rejects_sizes_wider_than_grid() {
        let store = MemoryStore::new();
        let service = ConfigService::new(store.clone(), BuiltinCatalog::bundled().unwrap());
        let options = DashboardOptions {
            metrics: GridMetrics {
                columns: 2,
                ..GridMetrics::default()
            },
            ..DashboardOptions::default()
        };
        let mut dashboard = Dashboard::open(service, &options).unwrap();
        let before = dashboard.snapshot();

        assert!(!dashboard.available_sizes().contains(&WidgetSize::RowSmall));
        assert_eq!(dashboard.resize_widget(0, WidgetSize::RowSmall), None);
        assert_eq!(dashboard.snapshot(), before);
        assert!(dashboard.resize_widget(0, WidgetSize::ColumnLarge).is_some());
    }

    #[test]
    fn test_remove_widget_unwires_item() {
        let store = MemoryStore::new();
        let mut dashboard = open(&store);
        let items = dashboard.items();

        assert_eq!(dashboard.remove_widget(0), Some(items[0]));
        assert!(!dashboard.reorder().is_wired(items[0]));
        assert_eq!(dashboard.items(), vec![items[1]]);
        assert_eq!(dashboard.remove_widget(4), None);
    }

    #[test]
    fn test_reopen_uses_custom_record() {
        let store = MemoryStore::new();
        let mut dashboard = open(&store);
        dashboard.remove_widget(1);
        dashboard.persist().unwrap();

        let reopened = open(&store);
        assert_eq!(reopened.config().id, "custom");
        assert_eq!(reopened.snapshot().len(), 1);
        assert_eq!(reopened.snapshot()[0].slot("content").map(|s| s.tag.as_str()), Some("ettdash-map"));
    }
}

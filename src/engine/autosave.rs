//! Periodic autosave.
//!
//! While a dashboard is active its live grid is dematerialized on a fixed
//! interval and persisted as the custom configuration. The timer follows
//! the dashboard's activity: it stops when the view is deactivated and
//! starts over, one full period out, when the view is activated again.
//!
//! The loop runs as a local task on the current thread, so it never
//! overlaps a gesture handler: a tick that finds the dashboard borrowed is
//! skipped.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::engine::dashboard::Dashboard;
use crate::engine::wizard::WizardSurface;

/// Shortest accepted autosave period.
const MIN_PERIOD: Duration = Duration::from_millis(100);

/// What one autosave tick wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutosaveReport {
    /// Number of top-level widgets saved
    pub widgets: usize,
    /// Size of the persisted record
    pub bytes: usize,
    /// Local time of the save
    pub saved_at: DateTime<Local>,
}

/// Handle to a running autosave task. Dropping it stops the loop.
#[derive(Debug)]
pub struct AutosaveLoop {
    task: JoinHandle<()>,
    saves: Rc<Cell<u64>>,
    period: Duration,
}

impl AutosaveLoop {
    /// Starts autosaving `dashboard` every `period`.
    ///
    /// The first save happens one full period after the start, or after
    /// the next activation if the dashboard is inactive. The loop holds
    /// only a weak reference and ends once the dashboard is dropped.
    ///
    /// Must be called from inside a [`tokio::task::LocalSet`], and not
    /// while the dashboard is mutably borrowed.
    pub fn start<W>(dashboard: &Rc<RefCell<Dashboard<W>>>, period: Duration) -> Self
    where
        W: WizardSurface + 'static,
    {
        let period = period.max(MIN_PERIOD);
        let saves = Rc::new(Cell::new(0));
        let target = Rc::downgrade(dashboard);
        let activity = dashboard.borrow().activity();
        let task = tokio::task::spawn_local(run(target, activity, period, Rc::clone(&saves)));
        debug!(?period, "Autosave started");

        Self {
            task,
            saves,
            period,
        }
    }

    /// Interval between saves.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Number of saves completed so far.
    #[must_use]
    pub fn saves(&self) -> u64 {
        self.saves.get()
    }

    /// Returns true until the loop is stopped or its dashboard is gone.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Cancels the loop. A save already in progress completes.
    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for AutosaveLoop {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<W: WizardSurface>(
    target: Weak<RefCell<Dashboard<W>>>,
    mut activity: watch::Receiver<bool>,
    period: Duration,
    saves: Rc<Cell<u64>>,
) {
    'timer: loop {
        while !*activity.borrow_and_update() {
            debug!("Dashboard inactive, autosave timer stopped");
            if activity.changed().await.is_err() {
                debug!("Dashboard dropped, autosave finished");
                return;
            }
        }

        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                changed = activity.changed() => {
                    if changed.is_err() {
                        debug!("Dashboard dropped, autosave finished");
                        return;
                    }
                    continue 'timer;
                }
            }

            let Some(dashboard) = target.upgrade() else {
                debug!("Dashboard dropped, autosave finished");
                return;
            };
            let Ok(mut view) = dashboard.try_borrow_mut() else {
                debug!("Dashboard busy, skipping autosave tick");
                continue;
            };

            match view.autosave_tick() {
                Ok(Some(report)) => {
                    saves.set(saves.get() + 1);
                    debug!(widgets = report.widgets, bytes = report.bytes, "Autosaved");
                }
                Ok(None) => debug!("Dashboard inactive, skipping autosave tick"),
                Err(e) => warn!(error = %format!("{e:#}"), "Autosave failed"),
            }
        }
    }
}

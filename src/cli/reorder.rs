//! `dashgrid move`: reorder a widget with a synthesized drag gesture.

use clap::Args;
use tracing::debug;

use crate::cli::common::{check_index, load_config, open_dashboard, persist, CliError, CliResult};
use crate::dom::{Point, Rect};
use crate::engine::{DragPayload, DropOutcome, Event, EventOutcome};

/// Move the widget at FROM so that it ends up at TO
#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Current position of the widget
    #[arg(value_name = "FROM")]
    from: usize,

    /// Target position
    #[arg(value_name = "TO")]
    to: usize,
}

fn center(rect: Rect) -> Point {
    Point::new(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
}

impl MoveArgs {
    /// Execute move command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let mut dashboard = open_dashboard(&config)?;
        let items = dashboard.items();
        check_index(self.from, items.len())?;
        check_index(self.to, items.len())?;

        if self.from == self.to {
            println!("Widget {} is already at position {}", self.from, self.to);
            return Ok(());
        }

        let dragged = items[self.from];
        let rect_of = |item| {
            dashboard
                .document()
                .rect(item)
                .ok_or_else(|| CliError::io(format!("Widget {item} has no layout box")))
        };

        // The placeholder lands before the item that should follow the
        // dragged one; past the last item it is appended.
        let remaining: Vec<_> = items.iter().copied().filter(|item| *item != dragged).collect();
        let target = match remaining.get(self.to) {
            Some(follower) => center(rect_of(*follower)?),
            None => {
                let grid = rect_of(dashboard.grid())?;
                Point::new(grid.right() + 1.0, grid.bottom() + 1.0)
            }
        };
        let press = dashboard.reorder().handle().center(rect_of(dragged)?);

        let gesture = [
            Event::PointerDown(press),
            Event::DragStart(dragged),
            Event::DragMove(target),
        ];
        for event in gesture {
            let outcome = dashboard.dispatch(event);
            debug!(?outcome, "Gesture step");
            if outcome == EventOutcome::Ignored {
                dashboard.dispatch(Event::DragEnd);
                return Err(CliError::validation(format!(
                    "Drag gesture on widget {} was not accepted",
                    self.from
                )));
            }
        }

        let outcome = dashboard.dispatch(Event::Drop {
            point: target,
            payload: DragPayload::reorder(),
        });
        match outcome {
            EventOutcome::Reorder(DropOutcome::Reordered { from, to, .. }) => {
                persist(&mut dashboard)?;
                println!("Moved widget {from} to position {to}");
                Ok(())
            }
            other => Err(CliError::validation(format!("Reorder failed: {other:?}"))),
        }
    }
}

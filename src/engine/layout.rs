//! Grid flow layout.
//!
//! Assigns bounding boxes to the widgets of a grid the way the dashboard's
//! CSS grid does: fixed column tracks, square cells, a uniform gap, and
//! sparse row-major auto-placement. The placement cursor only moves
//! forward, so holes left behind a wide item are never backfilled and the
//! visual order always follows child order.

use crate::dom::{Document, NodeId, Point, Rect};
use crate::models::WidgetSize;

/// Track geometry of a dashboard grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    /// Number of column tracks
    pub columns: usize,
    /// Side length of one square cell
    pub cell: f64,
    /// Gap between tracks
    pub gap: f64,
    /// Top-left corner of the grid
    pub origin: Point,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            columns: 6,
            cell: 160.0,
            gap: 16.0,
            origin: Point::new(0.0, 0.0),
        }
    }
}

impl GridMetrics {
    /// Pixel extent of `tracks` consecutive tracks.
    #[must_use]
    pub fn extent(&self, tracks: usize) -> f64 {
        if tracks == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let tracks = tracks as f64;
        tracks.mul_add(self.cell, (tracks - 1.0) * self.gap)
    }

    /// Pixel offset of the track at `index`.
    #[must_use]
    pub fn offset(&self, index: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let index = index as f64;
        index * (self.cell + self.gap)
    }

    /// Rectangle covering `cols × rows` cells starting at (`col`, `row`).
    #[must_use]
    pub fn area(&self, col: usize, row: usize, cols: usize, rows: usize) -> Rect {
        Rect::new(
            self.origin.x + self.offset(col),
            self.origin.y + self.offset(row),
            self.extent(cols),
            self.extent(rows),
        )
    }
}

/// Cell occupancy of the packed grid.
struct Occupancy {
    columns: usize,
    rows: Vec<Vec<bool>>,
    /// Auto-placement cursor as (row, col)
    cursor: (usize, usize),
}

impl Occupancy {
    fn new(columns: usize) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            cursor: (0, 0),
        }
    }

    fn is_free(&self, col: usize, row: usize, cols: usize, rows: usize) -> bool {
        (row..row + rows).all(|r| {
            self.rows
                .get(r)
                .is_none_or(|cells| cells[col..col + cols].iter().all(|taken| !taken))
        })
    }

    fn take(&mut self, col: usize, row: usize, cols: usize, rows: usize) {
        while self.rows.len() < row + rows {
            self.rows.push(vec![false; self.columns]);
        }
        for cells in &mut self.rows[row..row + rows] {
            for taken in &mut cells[col..col + cols] {
                *taken = true;
            }
        }
    }

    /// First position at or after the cursor where a `cols × rows` area
    /// fits. The cursor then moves past the placed item.
    fn place(&mut self, cols: usize, rows: usize) -> (usize, usize) {
        let (mut row, mut col) = self.cursor;
        loop {
            if col + cols > self.columns {
                row += 1;
                col = 0;
                continue;
            }
            if self.is_free(col, row, cols, rows) {
                self.take(col, row, cols, rows);
                self.cursor = (row, col + cols);
                return (col, row);
            }
            col += 1;
        }
    }

    fn height(&self) -> usize {
        self.rows.len()
    }
}

/// Size class of a live element, `square-small` when it names none.
#[must_use]
pub fn element_size(doc: &Document, element: NodeId) -> WidgetSize {
    doc.class_list(element)
        .into_iter()
        .find_map(WidgetSize::from_class)
        .unwrap_or_default()
}

/// Replaces the size class of a live element and mirrors it in `size`.
///
/// Other class tokens are kept in order; the new size token goes last.
pub fn set_element_size(doc: &mut Document, element: NodeId, size: WidgetSize) {
    let mut classes: Vec<&str> = doc
        .class_list(element)
        .into_iter()
        .filter(|class| WidgetSize::from_class(class).is_none())
        .collect();
    classes.push(size.as_class());
    let class = classes.join(" ");

    doc.set_attribute(element, "class", class);
    doc.set_attribute(element, "size", size.as_class());
}

/// Lays out the element children of `grid` and sets the grid's own box.
///
/// Spans wider than the grid are clamped to the column count. The grid
/// is always at least one row tall so an empty grid still accepts drops.
pub fn flow_layout(doc: &mut Document, grid: NodeId, metrics: &GridMetrics) {
    let columns = metrics.columns.max(1);
    let mut occupancy = Occupancy::new(columns);

    for item in doc.element_children(grid) {
        let (cols, rows) = element_size(doc, item).span();
        let cols = cols.clamp(1, columns);
        let rows = rows.max(1);
        let (col, row) = occupancy.place(cols, rows);
        doc.set_rect(item, metrics.area(col, row, cols, rows));
    }

    let height = occupancy.height().max(1);
    doc.set_rect(grid, metrics.area(0, 0, columns, height));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> GridMetrics {
        GridMetrics {
            columns: 6,
            cell: 100.0,
            gap: 10.0,
            origin: Point::new(0.0, 0.0),
        }
    }

    fn grid_with(doc: &mut Document, classes: &[&str]) -> (NodeId, Vec<NodeId>) {
        let grid = doc.create_element("dash-grid");
        let items = classes
            .iter()
            .map(|class| {
                let item = doc.create_element("dash-card");
                if !class.is_empty() {
                    doc.set_attribute(item, "class", *class);
                }
                doc.append_child(grid, item);
                item
            })
            .collect();
        (grid, items)
    }

    #[test]
    fn test_extent_includes_gaps() {
        let metrics = metrics();
        assert!((metrics.extent(1) - 100.0).abs() < f64::EPSILON);
        assert!((metrics.extent(3) - 320.0).abs() < f64::EPSILON);
        assert!(metrics.extent(0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_row_major_placement() {
        let mut doc = Document::new();
        let (grid, items) = grid_with(&mut doc, &["square-small", "square-large", "row-small"]);

        flow_layout(&mut doc, grid, &metrics());

        assert_eq!(doc.rect(items[0]), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert_eq!(doc.rect(items[1]), Some(Rect::new(110.0, 0.0, 210.0, 210.0)));
        assert_eq!(doc.rect(items[2]), Some(Rect::new(330.0, 0.0, 320.0, 100.0)));
        assert_eq!(doc.rect(grid), Some(Rect::new(0.0, 0.0, 650.0, 210.0)));
    }

    #[test]
    fn test_fills_beside_tall_items() {
        let mut doc = Document::new();
        let (grid, items) =
            grid_with(&mut doc, &["row-large", "row-small", "square-small", "square-small"]);

        flow_layout(&mut doc, grid, &metrics());

        // Two rows are taken by the first item on the left; the second fills
        // the right half of row 0, the small squares row 1.
        assert_eq!(doc.rect(items[1]).map(|r| (r.x, r.y)), Some((330.0, 0.0)));
        assert_eq!(doc.rect(items[2]).map(|r| (r.x, r.y)), Some((330.0, 110.0)));
        assert_eq!(doc.rect(items[3]).map(|r| (r.x, r.y)), Some((440.0, 110.0)));
    }

    #[test]
    fn test_never_backfills_earlier_holes() {
        let mut doc = Document::new();
        let (grid, items) = grid_with(
            &mut doc,
            &["square-small", "row-small", "row-small", "square-small"],
        );

        flow_layout(&mut doc, grid, &metrics());

        // The second row-small wraps and leaves two free cells in row 0;
        // the last square follows it instead of moving back.
        assert_eq!(doc.rect(items[1]).map(|r| (r.x, r.y)), Some((110.0, 0.0)));
        assert_eq!(doc.rect(items[2]).map(|r| (r.x, r.y)), Some((0.0, 110.0)));
        assert_eq!(doc.rect(items[3]).map(|r| (r.x, r.y)), Some((330.0, 110.0)));
        assert_eq!(doc.rect(grid), Some(Rect::new(0.0, 0.0, 650.0, 210.0)));
    }

    #[test]
    fn test_defaults_and_clamping() {
        let mut doc = Document::new();
        let (grid, items) = grid_with(&mut doc, &["", "row-large"]);
        let narrow = GridMetrics {
            columns: 2,
            ..metrics()
        };

        flow_layout(&mut doc, grid, &narrow);

        assert_eq!(doc.rect(items[0]), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert_eq!(doc.rect(items[1]), Some(Rect::new(0.0, 110.0, 210.0, 210.0)));
    }

    #[test]
    fn test_set_element_size_swaps_only_the_size_token() {
        let mut doc = Document::new();
        let (grid, items) = grid_with(&mut doc, &["highlight square-small pinned"]);

        set_element_size(&mut doc, items[0], WidgetSize::RowLarge);
        flow_layout(&mut doc, grid, &metrics());

        assert_eq!(doc.class_list(items[0]), vec!["highlight", "pinned", "row-large"]);
        assert_eq!(doc.attribute(items[0], "size"), Some("row-large"));
        assert_eq!(element_size(&doc, items[0]), WidgetSize::RowLarge);
        assert_eq!(doc.rect(items[0]), Some(Rect::new(0.0, 0.0, 320.0, 210.0)));
    }

    #[test]
    fn test_empty_grid_keeps_one_row() {
        let mut doc = Document::new();
        let (grid, _) = grid_with(&mut doc, &[]);

        flow_layout(&mut doc, grid, &metrics());

        assert_eq!(doc.rect(grid), Some(Rect::new(0.0, 0.0, 650.0, 100.0)));
    }
}

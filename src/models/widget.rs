//! Widget configuration tree.
//!
//! A [`WidgetNode`] describes one placed widget: its own attributes and an
//! ordered list of [`SlotNode`]s. Slots nest arbitrarily deep, so a chart
//! widget can describe datasets as sub-slots of its content slot without
//! the engine knowing anything about charts.

use crate::models::Attributes;
use serde::{Deserialize, Serialize};

/// One named content region of a widget, possibly containing further slots.
///
/// # Invariants
///
/// - `name` is unique among siblings sharing the same parent (not globally);
///   an empty name means the element had no slot assignment
/// - `content` holds only text that sits directly inside the element; text
///   of nested elements lives in their own `slots` entry
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlotNode {
    /// Named insertion point in the parent
    #[serde(default)]
    pub name: String,
    /// Element type to instantiate
    pub tag: String,
    /// Element attributes
    #[serde(default)]
    pub attributes: Attributes,
    /// Direct text content
    #[serde(default)]
    pub content: String,
    /// Nested slots in render order
    #[serde(default)]
    pub slots: Vec<SlotNode>,
}

impl SlotNode {
    /// Creates an empty slot with the given name and tag.
    pub fn new(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Sets the text content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    /// Appends a nested slot.
    #[must_use]
    pub fn with_slot(mut self, slot: SlotNode) -> Self {
        self.slots.push(slot);
        self
    }

    /// Finds a direct child slot by name.
    #[must_use]
    pub fn slot(&self, name: &str) -> Option<&SlotNode> {
        self.slots.iter().find(|slot| slot.name == name)
    }

    /// Depth of this subtree (a slot without children has depth 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.slots.iter().map(SlotNode::depth).max().unwrap_or(0)
    }

    fn has_attribute_deep(&self, key: &str) -> bool {
        self.attributes.contains_key(key) || self.slots.iter().any(|s| s.has_attribute_deep(key))
    }
}

/// Root-level record for one placed widget.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WidgetNode {
    /// Widget attributes (size class, custom data)
    #[serde(default)]
    pub attributes: Attributes,
    /// Content regions in render order
    #[serde(default)]
    pub slots: Vec<SlotNode>,
}

impl WidgetNode {
    /// Creates an empty widget.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    /// Appends a slot.
    #[must_use]
    pub fn with_slot(mut self, slot: SlotNode) -> Self {
        self.slots.push(slot);
        self
    }

    /// Finds a top-level slot by name.
    #[must_use]
    pub fn slot(&self, name: &str) -> Option<&SlotNode> {
        self.slots.iter().find(|slot| slot.name == name)
    }

    /// Size class of this widget, if its `class` attribute names one.
    #[must_use]
    pub fn size(&self) -> Option<WidgetSize> {
        self.attributes
            .get("class")
            .and_then(|classes| classes.split_whitespace().find_map(WidgetSize::from_class))
    }

    /// Returns true if `key` appears as an attribute anywhere in this tree.
    #[must_use]
    pub fn has_attribute_deep(&self, key: &str) -> bool {
        self.attributes.contains_key(key) || self.slots.iter().any(|s| s.has_attribute_deep(key))
    }

    /// Depth of the tree (a widget without slots has depth 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.slots.iter().map(SlotNode::depth).max().unwrap_or(0)
    }
}

/// Widget footprint on the dashboard grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetSize {
    /// 1 column × 1 row
    #[default]
    SquareSmall,
    /// 2 columns × 2 rows
    SquareLarge,
    /// 3 columns × 1 row
    RowSmall,
    /// 3 columns × 2 rows
    RowLarge,
    /// 1 column × 3 rows
    ColumnSmall,
    /// 2 columns × 3 rows
    ColumnLarge,
}

impl WidgetSize {
    /// All sizes in display order.
    pub const ALL: [Self; 6] = [
        Self::SquareSmall,
        Self::SquareLarge,
        Self::RowSmall,
        Self::RowLarge,
        Self::ColumnSmall,
        Self::ColumnLarge,
    ];

    /// CSS class name of this size.
    #[must_use]
    pub const fn as_class(self) -> &'static str {
        match self {
            Self::SquareSmall => "square-small",
            Self::SquareLarge => "square-large",
            Self::RowSmall => "row-small",
            Self::RowLarge => "row-large",
            Self::ColumnSmall => "column-small",
            Self::ColumnLarge => "column-large",
        }
    }

    /// Parses a CSS class name.
    #[must_use]
    pub fn from_class(class: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.as_class() == class)
    }

    /// Grid span as (columns, rows).
    #[must_use]
    pub const fn span(self) -> (usize, usize) {
        match self {
            Self::SquareSmall => (1, 1),
            Self::SquareLarge => (2, 2),
            Self::RowSmall => (3, 1),
            Self::RowLarge => (3, 2),
            Self::ColumnSmall => (1, 3),
            Self::ColumnLarge => (2, 3),
        }
    }

    /// Sizes a grid of `columns` tracks can show without clamping.
    ///
    /// A six-column desktop grid offers every size, a two-column tablet
    /// grid the square and column sizes, a single column only the small
    /// square and column.
    #[must_use]
    pub fn available(columns: usize) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|size| size.span().0 <= columns.max(1))
            .collect()
    }

    /// Returns true if a grid of `columns` tracks offers this size.
    #[must_use]
    pub fn fits(self, columns: usize) -> bool {
        self.span().0 <= columns.max(1)
    }
}

impl std::fmt::Display for WidgetSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_class())
    }
}

impl std::str::FromStr for WidgetSize {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_class(s).ok_or_else(|| {
            let valid: Vec<&str> = Self::ALL.iter().map(|size| size.as_class()).collect();
            anyhow::anyhow!("Unknown widget size '{}'. Valid sizes: {}", s, valid.join(", "))
        })
    }
}

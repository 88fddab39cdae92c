//! Dashgrid Library
//!
//! This library provides the dashboard layout engine: a configuration tree
//! of widgets and nested slots, its reconciliation with a live element
//! tree, drag-to-reorder, drops of new widget types through a wizard, and
//! periodic autosave of the arrangement.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod dom;
pub mod engine;
pub mod models;
pub mod services;

//! Pin Scene Library
//!
//! Typed graph scene models mapping nodes, pins and edges to widgets,
//! plus snapshot persistence and an egui viewer.

pub mod app;
pub mod persistence;
pub mod scene;
pub mod widget;

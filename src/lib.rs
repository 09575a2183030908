//! Sales Dashboard - spreadsheet viewer for sales representatives
//!
//! Loads a workbook of sales-representative records, filters it by region,
//! and renders tables, bar charts, a pie chart and per-representative metrics.

pub mod charts;
pub mod config;
pub mod data;
pub mod format;
pub mod gui;
pub mod stats;
pub mod view;

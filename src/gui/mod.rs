//! GUI module - User interface components

mod app;
mod control_panel;
mod dashboard_viewer;
mod table_widget;

pub use app::DashboardApp;
pub use control_panel::{ControlPanel, ControlPanelAction, Selection};
pub use dashboard_viewer::DashboardViewer;

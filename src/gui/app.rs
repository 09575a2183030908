//! Dashboard Main Application
//! Main window with control panel and dashboard page.

use crate::charts::StaticChartRenderer;
use crate::config::DashboardConfig;
use crate::data::{DataLoader, LoadCache};
use crate::gui::{ControlPanel, ControlPanelAction, DashboardViewer, Selection};
use crate::view::DashboardView;
use egui::SidePanel;
use tracing::{error, info, warn};

/// Outcome of the latest render pass.
enum ViewState {
    /// File could not be loaded; nothing else is rendered
    LoadFailed(String),
    /// Table loaded but the view could not be built
    Failed(String),
    Ready(DashboardView),
}

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    loader: DataLoader,
    cache: LoadCache,
    control_panel: ControlPanel,
    viewer: DashboardViewer,

    state: ViewState,
    // (cache generation, selection) the current view was built from
    built_for: Option<(u64, Selection)>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        info!("Data source: {}", config.data_path.display());
        Self {
            loader: DataLoader::with_sheet(config.sheet.clone()),
            config,
            cache: LoadCache::new(),
            control_panel: ControlPanel::new(),
            viewer: DashboardViewer::new(),
            state: ViewState::LoadFailed(String::new()),
            built_for: None,
        }
    }

    /// Load (cached) and rebuild the view when the table or selection changed.
    fn refresh(&mut self) {
        let table = match self.cache.get_or_load(&self.config.data_path, &self.loader) {
            Ok(table) => table,
            Err(e) => {
                let message = e.to_string();
                if !matches!(&self.state, ViewState::LoadFailed(m) if *m == message) {
                    error!("{}", message);
                }
                self.state = ViewState::LoadFailed(message);
                self.built_for = None;
                return;
            }
        };

        let key = (self.cache.generation(), self.control_panel.selection.clone());
        if self.built_for.as_ref() == Some(&key) {
            return;
        }

        let selection = &self.control_panel.selection;
        self.state = match DashboardView::build(
            &table,
            &selection.region,
            selection.representative.as_deref(),
        ) {
            Ok(view) => {
                self.control_panel.sync_with(&view);
                ViewState::Ready(view)
            }
            Err(e) => {
                error!("Failed to build dashboard: {}", e);
                ViewState::Failed(e.to_string())
            }
        };

        // Key on the synced selection so fallbacks do not trigger a rebuild.
        self.built_for = Some((self.cache.generation(), self.control_panel.selection.clone()));
    }

    fn handle_reload(&mut self) {
        info!("Reloading {}", self.config.data_path.display());
        self.cache.invalidate();
        self.built_for = None;
        self.control_panel.set_status("Reloaded");
    }

    /// Export the three charts as PNG files into a chosen folder.
    fn handle_export_charts(&mut self) {
        let ViewState::Ready(view) = &self.state else {
            return;
        };
        let Some(charts) = &view.charts else {
            self.control_panel.set_status("No charts to export");
            return;
        };

        let mut dialog = rfd::FileDialog::new();
        if let Some(dir) = &self.config.export_dir {
            dialog = dialog.set_directory(dir);
        }
        let Some(dir) = dialog.pick_folder() else {
            return; // User cancelled
        };

        let [width, height] = self.config.chart_size;
        match StaticChartRenderer::export_all(charts, &dir, width, height) {
            Ok(paths) => {
                self.control_panel.set_status(&format!(
                    "Exported {} charts to {}",
                    paths.len(),
                    dir.display()
                ));
                if let Err(e) = open::that(&dir) {
                    warn!("Could not open {}: {}", dir.display(), e);
                }
            }
            Err(e) => {
                error!("Chart export failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.refresh();

        // Left panel - Control Panel
        let view = match &self.state {
            ViewState::Ready(view) => Some(view),
            _ => None,
        };
        let mut action = ControlPanelAction::None;
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    action = self.control_panel.show(ui, &self.config.data_path, view);
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| match &self.state {
            ViewState::Ready(view) => self.viewer.show(ui, view),
            ViewState::LoadFailed(message) | ViewState::Failed(message) => {
                self.viewer.show_error(ui, message)
            }
        });

        match action {
            ControlPanelAction::Reload => self.handle_reload(),
            ControlPanelAction::SelectionChanged => ctx.request_repaint(),
            ControlPanelAction::ExportCharts => self.handle_export_charts(),
            ControlPanelAction::None => {}
        }
    }
}

use std::path::{Path, PathBuf};
use std::time::Duration;

use eframe::egui;

use crate::automation::engine::AutomationEngine;
use crate::automation::interaction::delay_ms;
use crate::config::ClickerConfig;
use crate::core::input::is_escape_key_down;
use crate::core::window::{activate_window, find_window_by_process};
use crate::settings::AppSettings;

pub struct AutoClickerApp {
    settings: AppSettings,
    engine: AutomationEngine,
}

impl Default for AutoClickerApp {
    fn default() -> Self {
        Self {
            settings: AppSettings::load(),
            engine: AutomationEngine::new(),
        }
    }
}

impl eframe::App for AutoClickerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ESC is the emergency stop; it works without window focus
        if self.engine.is_running() && is_escape_key_down() {
            self.engine.stop();
            self.engine.set_status("Stopped (ESC pressed)");
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Auto Clicker");
            ui.add_space(8.0);

            let is_running = self.engine.is_running();

            ui.horizontal(|ui| {
                ui.label("Config file:");
                ui.add_enabled(
                    !is_running,
                    egui::TextEdit::singleline(&mut self.settings.config_path),
                );
                if ui
                    .add_enabled(!is_running, egui::Button::new("Browse..."))
                    .clicked()
                {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("JSON config", &["json"])
                        .pick_file()
                    {
                        self.settings.config_path = path.display().to_string();
                    }
                }
            });

            ui.horizontal(|ui| {
                ui.label("Process name:");
                ui.add_enabled(
                    !is_running,
                    egui::TextEdit::singleline(&mut self.settings.process_name),
                );
            });

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!is_running, egui::Button::new("Start"))
                    .clicked()
                {
                    self.settings.auto_save();
                    self.start_automation();
                }
                if ui
                    .add_enabled(is_running, egui::Button::new("Stop"))
                    .clicked()
                {
                    self.engine.stop_and_wait(Duration::from_secs(2));
                    self.engine.set_status("Stopped");
                }
            });

            ui.add_space(8.0);
            render_status(ui, &self.engine.status());
        });

        // Keep the status line fresh while the worker runs
        if self.engine.is_running() {
            ctx.request_repaint_after(Duration::from_millis(200));
        }
    }
}

impl AutoClickerApp {
    fn start_automation(&mut self) {
        let config_path = PathBuf::from(self.settings.config_path.trim());
        let config = match ClickerConfig::load(&config_path) {
            Ok(config) => config,
            Err(e) => {
                self.engine.set_status(&format!("Error: {}", e));
                return;
            }
        };

        let process_name = self.settings.process_name.trim().to_string();
        let Some(profile) = config.find_profile(&process_name) else {
            self.engine
                .set_status(&format!("Error: no profile for process '{}'", process_name));
            return;
        };

        let Some(hwnd) = find_window_by_process(&profile.process_name) else {
            self.engine
                .set_status(&format!("Error: process '{}' not found", profile.process_name));
            return;
        };
        if !activate_window(hwnd) {
            self.engine
                .set_status("Error: failed to bring window to foreground");
            return;
        }
        // Give the window a moment to settle in the foreground
        delay_ms(500);

        let config_dir = config_path.parent().unwrap_or(Path::new("."));
        let resource_root = config_dir.join(&profile.resource_path);

        self.engine.set_status("Starting...");
        self.engine.start(profile.clone(), resource_root, hwnd);
    }
}

fn render_status(ui: &mut egui::Ui, status: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Status:").strong());

        let status_color = if status.contains("Running") {
            egui::Color32::from_rgb(100, 255, 100)
        } else if status.contains("Error") {
            egui::Color32::from_rgb(255, 100, 100)
        } else {
            egui::Color32::GRAY
        };

        ui.label(egui::RichText::new(status).color(status_color));
    });
}

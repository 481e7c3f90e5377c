use eframe::egui::*;
use log::info;
use super::ui::{TabPage, badge, card, page_header, GREEN, RED};
use super::app::AppModel;
use super::content::SERVERS;

/// The "Servers" tab. Connecting only records the choice; nothing is dialed.
#[derive(Default)]
pub struct ServersPage {
    custom_address: String,
    selected: Option<String>,
    error: Option<String>,
}

impl ServersPage {
    pub fn connect(&mut self, address: &str) -> bool {
        let address = address.trim();
        if address.is_empty() {
            self.error = Some(String::from("Enter a server address first."));
            return false;
        }
        info!("Selected server {}", address);
        self.error = None;
        self.selected = Some(address.to_string());
        true
    }
}

impl TabPage for ServersPage {
    fn id(&self) -> &'static str { "servers" }
    fn label(&self) -> &'static str { "Servers" }

    fn ui(&mut self, ui: &mut Ui, _model: &mut AppModel) {
        page_header(ui, "Servers", "Join a community server or connect to your own");

        card(ui, |ui| {
            ui.label(RichText::new("Direct Connect").strong());
            ui.horizontal(|ui| {
                let response = ui.add(TextEdit::singleline(&mut self.custom_address).hint_text("play.example.com:25565"));
                let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
                if ui.button("Connect").clicked() || submitted {
                    let address = self.custom_address.clone();
                    self.connect(&address);
                }
            });
            if let Some(error) = &self.error {
                ui.colored_label(RED, error);
            }
            if let Some(selected) = &self.selected {
                ui.colored_label(GREEN, format!("Ready to join {selected}"));
            }
        });
        ui.add_space(12.0);

        let mut chosen = None;
        ScrollArea::vertical().id_salt("servers_scroll").auto_shrink([false; 2]).show(ui, |ui| {
            for server in SERVERS {
                card(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(server.name).size(18.0).strong());
                        badge(ui, server.mode, GREEN);
                        ui.label(RichText::new(format!("👥 {}", server.players)).weak());
                        ui.label(RichText::new(format!("v{}", server.version)).weak());
                    });
                    ui.label(server.description);
                    ui.horizontal(|ui| {
                        ui.monospace(server.address);
                        if ui.button("📋 Copy IP").clicked() {
                            ui.ctx().copy_text(server.address.to_string());
                        }
                        if ui.button("Connect").clicked() {
                            chosen = Some(server.address);
                        }
                    });
                });
                ui.add_space(8.0);
            }
        });

        if let Some(address) = chosen {
            self.connect(address);
        }
    }
}

use eframe::egui::*;
use log::info;
use super::ui::{TabPage, badge, card, page_header, GREEN, BLUE, PURPLE};
use super::app::AppModel;
use super::content::{DownloadItem, DownloadKind, DOWNLOADS};

#[derive(Default)]
pub struct DownloadsPage;

fn kind_color(kind: DownloadKind) -> Color32 {
    match kind {
        DownloadKind::Release => GREEN,
        DownloadKind::Mod => PURPLE,
        DownloadKind::Tool => BLUE,
    }
}

fn download_card(ui: &mut Ui, item: &DownloadItem, title_size: f32) {
    card(ui, |ui| {
        ui.horizontal(|ui| {
            badge(ui, item.kind.label(), kind_color(item.kind));
            ui.label(RichText::new(format!("v{}", item.version)).weak());
            ui.label(RichText::new(item.size).weak());
        });
        ui.label(RichText::new(item.name).size(title_size).strong());
        ui.label(item.description);
        if ui.button("⬇ Download").clicked() {
            // Nothing is hosted anywhere; the button only pretends.
            info!("Download requested: {}", item.file_name());
        }
    });
}

impl TabPage for DownloadsPage {
    fn id(&self) -> &'static str { "downloads" }
    fn label(&self) -> &'static str { "Downloads" }

    fn ui(&mut self, ui: &mut Ui, _model: &mut AppModel) {
        page_header(ui, "Downloads", "Download Minecraft versions and related files");

        ScrollArea::vertical().id_salt("downloads_scroll").auto_shrink([false; 2]).show(ui, |ui| {
            for item in DOWNLOADS.iter().filter(|d| d.featured) {
                download_card(ui, item, 24.0);
                ui.add_space(12.0);
            }
            let regular: Vec<&DownloadItem> = DOWNLOADS.iter().filter(|d| !d.featured).collect();
            for row in regular.chunks(2) {
                ui.columns(2, |columns| {
                    for (ui, item) in columns.iter_mut().zip(row) {
                        download_card(ui, item, 17.0);
                    }
                });
                ui.add_space(8.0);
            }
        });
    }
}

use eframe::egui::{self, Align2, Color32, FontId, Image, RichText, Sense, vec2};

use super::app::AppModel;
use super::profile::Avatar;

/// Trait every dashboard tab implements.
/// Keeping per-tab state inside each struct makes it easy to add tabs.
pub trait TabPage {
    /// Unique, stable ID for the tab.
    fn id(&self) -> &'static str;

    /// Human-readable label shown in the header.
    fn label(&self) -> &'static str;

    /// Draw the main content for this tab.
    fn ui(&mut self, ui: &mut egui::Ui, model: &mut AppModel);
}

pub const GREEN : Color32 = Color32::from_rgb(34, 197, 94);
pub const BLUE : Color32 = Color32::from_rgb(59, 130, 246);
pub const PURPLE : Color32 = Color32::from_rgb(168, 85, 247);
pub const ORANGE : Color32 = Color32::from_rgb(249, 115, 22);
pub const PINK : Color32 = Color32::from_rgb(236, 72, 153);
pub const RED : Color32 = Color32::from_rgb(239, 68, 68);

/// Round profile picture, or the initials on a disc when there is none.
pub fn avatar(ui: &mut egui::Ui, avatar: Option<&Avatar>, initials: &str, size: f32) {
    match avatar {
        Some(a) => {
            ui.add(Image::from_bytes(a.uri.clone(), a.bytes.clone()).fit_to_exact_size(vec2(size, size)));
        }
        None => {
            let (rect, _) = ui.allocate_exact_size(vec2(size, size), Sense::hover());
            let painter = ui.painter();
            painter.circle_filled(rect.center(), size / 2.0, GREEN.gamma_multiply(0.6));
            painter.text(rect.center(), Align2::CENTER_CENTER, initials, FontId::proportional(size * 0.4), Color32::WHITE);
        }
    }
}

pub fn badge(ui: &mut egui::Ui, text: &str, color: Color32) {
    ui.label(RichText::new(format!(" {text} ")).color(color).background_color(color.gamma_multiply(0.2)));
}

pub fn card<R>(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
    egui::Frame::group(ui.style())
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui)
        })
        .inner
}

pub fn page_header(ui: &mut egui::Ui, title: &str, subtitle: &str) {
    ui.heading(RichText::new(title).size(26.0).strong());
    ui.label(RichText::new(subtitle).weak());
    ui.add_space(super::app::APP_HEADER_PADDING);
}

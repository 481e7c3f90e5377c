use eframe::egui::*;
use super::app::{AppModel, APP_NAME, APP_HEADER_PADDING};
use super::launch::version_label;
use super::ui::GREEN;

const PROGRESS_WIDTH : f32 = 420.0;

/// Full-window view while the launch sequencer is in its dwell.
pub fn show(ctx: &Context, model: &AppModel) {
    let Some(frame) = model.launcher.progress(model.clock.as_ref()) else {
        return;
    };

    CentralPanel::default().show(ctx, |ui| {
        ui.add_space(ui.available_height() / 4.0);
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(APP_NAME).size(48.0).strong().color(GREEN));
            ui.label(RichText::new(version_label(&model.selected_version)).weak());
            ui.add_space(APP_HEADER_PADDING * 2.0);

            ui.label(RichText::new(frame.label).size(20.0));
            ui.add_space(8.0);
            ui.add(ProgressBar::new(frame.percent / 100.0).desired_width(PROGRESS_WIDTH));
            ui.label(RichText::new(format!("{}%", frame.percent.round() as u32)).weak());
            ui.add_space(APP_HEADER_PADDING);
            ui.spinner();
        });
    });

    // The bar moves between timer deadlines too.
    ctx.request_repaint();
}

use eframe::egui::*;
use super::app::{AppModel, APP_NAME, APP_HEADER_PADDING};
use super::gate::Route;
use super::ui::GREEN;

const ENTRY_CARD_WIDTH : f32 = 380.0;

/// Login, "connecting" and username screens. Returns true on the frame the
/// user reaches the dashboard.
pub fn show(ctx: &Context, model: &mut AppModel) -> bool {
    let mut entered = false;

    CentralPanel::default().show(ctx, |ui| {
        ui.add_space(ui.available_height() / 5.0);
        ui.vertical_centered(|ui| {
            ui.set_max_width(ENTRY_CARD_WIDTH);
            Frame::group(ui.style()).inner_margin(Margin::same(24)).show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(APP_NAME).size(36.0).strong().color(GREEN));
                });

                let route = model.gate.route();
                if matches!(route, Route::Login(_)) {
                    login_form(ui, model);
                } else if matches!(route, Route::Connecting { .. }) {
                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new("Premium Minecraft Experience").weak());
                        ui.add_space(APP_HEADER_PADDING);
                        ui.spinner();
                        ui.label("Connecting...");
                    });
                } else if matches!(route, Route::Prompt { .. }) {
                    entered = username_form(ui, model);
                }
            });
        });
    });

    entered
}

fn login_form(ui: &mut Ui, model: &mut AppModel) {
    ui.vertical_centered(|ui| ui.label(RichText::new("Premium Minecraft Experience").weak()));
    ui.add_space(APP_HEADER_PADDING);

    let Route::Login(form) = model.gate.route_mut() else {
        return;
    };
    ui.label("Username");
    ui.add(TextEdit::singleline(&mut form.username).hint_text("Enter your username").desired_width(f32::INFINITY));
    ui.label("Password");
    ui.add(TextEdit::singleline(&mut form.password).password(true).hint_text("Enter your password").desired_width(f32::INFINITY));
    ui.add_space(APP_HEADER_PADDING / 2.0);

    let enabled = form.can_submit();
    let launch = Button::new(RichText::new("Launch Game").strong()).min_size(vec2(ui.available_width(), 36.0));
    if ui.add_enabled(enabled, launch).clicked() {
        model.gate.submit_login(model.clock.as_ref());
    }
}

fn username_form(ui: &mut Ui, model: &mut AppModel) -> bool {
    ui.vertical_centered(|ui| ui.label(RichText::new("Enter your username to continue").weak()));
    ui.add_space(APP_HEADER_PADDING);

    let Route::Prompt { draft } = model.gate.route_mut() else {
        return false;
    };
    ui.label("Username");
    let response = ui.add(TextEdit::singleline(draft).hint_text("Enter your username").desired_width(f32::INFINITY));
    let pressed_enter = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
    ui.add_space(APP_HEADER_PADDING / 2.0);

    let enabled = model.gate.can_submit_identity();
    let next = Button::new(RichText::new("Continue").strong()).min_size(vec2(ui.available_width(), 36.0));
    let clicked = ui.add_enabled(enabled, next).clicked();

    (clicked || (pressed_enter && enabled)) && model.submit_identity()
}

use eframe::egui::*;
use super::ui::{TabPage, avatar, card, GREEN, BLUE, PURPLE};
use super::app::{AppModel, APP_HEADER_PADDING};
use super::content::QUICK_STATS;
use super::launch::{VERSION_CATALOG, version_label};
use super::session::format_playtime;

const PLAYER_CARD_WIDTH : f32 = 260.0;
const AVATAR_SIZE : f32 = 96.0;

/// The "Home" tab: player card, version picker and the launch button.
/// Playtime only accumulates while this tab is showing.
#[derive(Default)]
pub struct HomePage;

impl TabPage for HomePage {
    fn id(&self) -> &'static str { "home" }
    fn label(&self) -> &'static str { "Home" }

    fn ui(&mut self, ui: &mut Ui, model: &mut AppModel) {
        let Some(identity) = model.identity().cloned() else {
            return;
        };

        ui.horizontal_top(|ui| {
            ui.allocate_ui(vec2(PLAYER_CARD_WIDTH, 0.0), |ui| {
                card(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        avatar(ui, model.avatar.as_ref(), &identity.initials(), AVATAR_SIZE);
                        ui.add_space(8.0);
                        ui.label(RichText::new(identity.as_str()).size(20.0).strong());
                        ui.label(RichText::new("Premium Player").weak());
                    });
                    ui.add_space(12.0);
                    Grid::new("player_stats").num_columns(2).spacing([24.0, 6.0]).show(ui, |ui| {
                        ui.label("Playtime");
                        ui.colored_label(GREEN, format_playtime(model.playtime_seconds()));
                        ui.end_row();
                        ui.label("Last Played");
                        ui.label(RichText::new(model.last_played_label()).weak());
                        ui.end_row();
                    });
                });
            });

            card(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading(RichText::new("Ready to Play").size(28.0).strong());
                    ui.label(RichText::new("Select your version and launch into the world").weak());
                    ui.add_space(APP_HEADER_PADDING);

                    ComboBox::from_id_salt("version_picker")
                        .selected_text(version_label(&model.selected_version))
                        .width(220.0)
                        .show_ui(ui, |ui| {
                            for version in VERSION_CATALOG {
                                ui.selectable_value(&mut model.selected_version, version.id.to_string(), version.label);
                            }
                        });

                    ui.add_space(APP_HEADER_PADDING);
                    let launch = Button::new(RichText::new("▶  LAUNCH GAME").size(22.0).strong().color(Color32::WHITE))
                        .fill(GREEN)
                        .min_size(vec2(240.0, 56.0));
                    if ui.add(launch).clicked() {
                        model.launch();
                    }
                });
            });
        });

        ui.add_space(APP_HEADER_PADDING);

        ui.columns(QUICK_STATS.len(), |columns| {
            for ((ui, stat), color) in columns.iter_mut().zip(QUICK_STATS).zip([GREEN, BLUE, PURPLE]) {
                card(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new(stat.value).size(28.0).strong().color(color));
                        ui.label(RichText::new(stat.label).weak());
                    });
                });
            }
        });
    }
}

use serde::{Serialize, Deserialize};
use eframe::egui::{self, Color32, ComboBox, RichText, Slider, Visuals};
use log::{debug, info};
use super::app::{AppModel, APP_HEADER_PADDING};
use super::store::{KEY_SETTINGS, Namespace, Store};

const DRAWER_WIDTH : f32 = 360.0;

pub const RENDER_DISTANCE_RANGE : std::ops::RangeInclusive<u32> = 2..=32;
pub const MAX_FPS_RANGE : std::ops::RangeInclusive<u32> = 30..=240;
pub const MAX_FPS_STEP : u32 = 10;
pub const MEMORY_GB_RANGE : std::ops::RangeInclusive<u32> = 1..=16;
pub const UI_SCALE_RANGE : std::ops::RangeInclusive<f32> = 0.8..=2.0;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
    Midnight,
}

impl Theme {
    pub const ALL : [Theme; 3] = [Theme::Dark, Theme::Light, Theme::Midnight];

    pub fn label(self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
            Theme::Midnight => "Midnight",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    #[serde(rename = "1920x1080")]
    FullHd,
    #[serde(rename = "2560x1440")]
    QuadHd,
    #[serde(rename = "3840x2160")]
    UltraHd,
}

impl Resolution {
    pub const ALL : [Resolution; 3] = [Resolution::FullHd, Resolution::QuadHd, Resolution::UltraHd];

    pub fn label(self) -> &'static str {
        match self {
            Resolution::FullHd => "1920x1080",
            Resolution::QuadHd => "2560x1440",
            Resolution::UltraHd => "3840x2160",
        }
    }
}

// ---------- Settings model ----------
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppearanceSettings {
    pub auto_launch: bool,
    pub fullscreen: bool,
    pub vsync: bool,
    #[serde(rename = "showFPS")]
    pub show_fps: bool,
    pub render_distance: u32,
    #[serde(rename = "maxFPS")]
    pub max_fps: u32,
    #[serde(rename = "memory")]
    pub memory_gb: u32,
    pub resolution: Resolution,
    pub theme: Theme,
    pub ui_scale: f32,
}
impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            auto_launch: false,
            fullscreen: true,
            vsync: true,
            show_fps: false,
            render_distance: 12,
            max_fps: 60,
            memory_gb: 4,
            resolution: Resolution::FullHd,
            theme: Theme::Dark,
            ui_scale: 1.2,
        }
    }
}

impl AppearanceSettings {
    /// Pulls every numeric option back into the range its slider allows.
    pub fn clamped(mut self) -> Self {
        self.render_distance = self.render_distance.clamp(*RENDER_DISTANCE_RANGE.start(), *RENDER_DISTANCE_RANGE.end());
        let fps = self.max_fps.clamp(*MAX_FPS_RANGE.start(), *MAX_FPS_RANGE.end());
        self.max_fps = fps - (fps - MAX_FPS_RANGE.start()) % MAX_FPS_STEP;
        self.memory_gb = self.memory_gb.clamp(*MEMORY_GB_RANGE.start(), *MEMORY_GB_RANGE.end());
        self.ui_scale = if self.ui_scale.is_finite() {
            self.ui_scale.clamp(*UI_SCALE_RANGE.start(), *UI_SCALE_RANGE.end())
        } else {
            AppearanceSettings::default().ui_scale
        };
        self
    }

    pub fn presentation(&self) -> PresentationState {
        let (dark, panel_fill, accent) = match self.theme {
            Theme::Dark => (true, None, [34, 197, 94]),
            Theme::Light => (false, None, [22, 163, 74]),
            Theme::Midnight => (true, Some([10, 12, 28]), [99, 102, 241]),
        };
        PresentationState { dark, panel_fill, accent, pixels_per_point: self.ui_scale }
    }
}

/// What the settings turn into on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresentationState {
    pub dark: bool,
    pub panel_fill: Option<[u8; 3]>,
    pub accent: [u8; 3],
    pub pixels_per_point: f32,
}

pub trait PresentationLayer {
    fn apply(&mut self, state: &PresentationState);
}

impl PresentationLayer for egui::Context {
    fn apply(&mut self, state: &PresentationState) {
        let mut visuals = if state.dark { Visuals::dark() } else { Visuals::light() };
        if let Some([r, g, b]) = state.panel_fill {
            visuals.panel_fill = Color32::from_rgb(r, g, b);
            visuals.window_fill = Color32::from_rgb(r, g, b);
            visuals.extreme_bg_color = Color32::from_rgb(r / 2, g / 2, b / 2);
        }
        let [r, g, b] = state.accent;
        visuals.selection.bg_fill = Color32::from_rgb(r, g, b);
        visuals.hyperlink_color = Color32::from_rgb(r, g, b);

        self.set_visuals(visuals);
        self.set_pixels_per_point(state.pixels_per_point);
    }
}

/// The settings record plus its persistence: every change is written whole
/// and pushed to the presentation layer straight away.
#[derive(Debug, Default)]
pub struct Preferences {
    settings: AppearanceSettings,
}

impl Preferences {
    pub fn load(store: &Store) -> Self {
        let settings = store
            .get_json::<AppearanceSettings>(Namespace::Global, KEY_SETTINGS)
            .map(AppearanceSettings::clamped)
            .unwrap_or_default();
        Self { settings }
    }

    pub fn settings(&self) -> &AppearanceSettings {
        &self.settings
    }

    pub fn apply(&self, layer: &mut dyn PresentationLayer) {
        layer.apply(&self.settings.presentation());
    }

    pub fn replace(&mut self, settings: AppearanceSettings, store: &mut Store, layer: &mut dyn PresentationLayer) {
        self.settings = settings.clamped();
        store.set_json(Namespace::Global, KEY_SETTINGS, &self.settings);
        debug!("Settings saved: {:?}", self.settings);
        self.apply(layer);
    }

    pub fn reset(&mut self, store: &mut Store, layer: &mut dyn PresentationLayer) {
        store.remove(Namespace::Global, KEY_SETTINGS);
        self.settings = AppearanceSettings::default();
        info!("Settings reset to defaults");
        self.apply(layer);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerAction {
    None,
    Close,
    SignOut,
}

/// The settings drawer on the right edge of the dashboard.
pub fn show_settings_drawer(ctx: &egui::Context, model: &mut AppModel) -> DrawerAction {
    let mut action = DrawerAction::None;
    let mut draft = model.preferences.settings().clone();
    let mut reset = false;

    egui::SidePanel::right("settings_drawer")
        .exact_width(DRAWER_WIDTH)
        .resizable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Settings");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("✖").clicked() {
                        action = DrawerAction::Close;
                    }
                });
            });
            ui.separator();

            egui::ScrollArea::vertical().auto_shrink([false, true]).show(ui, |ui| {
                section(ui, "Game Settings", |ui| {
                    ui.checkbox(&mut draft.auto_launch, "Auto Launch");
                    ui.checkbox(&mut draft.fullscreen, "Fullscreen");
                    ComboBox::from_label("Resolution")
                        .selected_text(draft.resolution.label())
                        .show_ui(ui, |ui| {
                            for resolution in Resolution::ALL {
                                ui.selectable_value(&mut draft.resolution, resolution, resolution.label());
                            }
                        });
                });

                section(ui, "Performance", |ui| {
                    ui.checkbox(&mut draft.vsync, "V-Sync");
                    ui.checkbox(&mut draft.show_fps, "Show FPS");
                    ui.add(Slider::new(&mut draft.render_distance, RENDER_DISTANCE_RANGE).text("chunks"));
                    ui.add(Slider::new(&mut draft.max_fps, MAX_FPS_RANGE).step_by(MAX_FPS_STEP as f64).text("fps"));
                    ui.add(Slider::new(&mut draft.memory_gb, MEMORY_GB_RANGE).text("GB memory"));
                });

                section(ui, "Appearance", |ui| {
                    ComboBox::from_label("Theme")
                        .selected_text(draft.theme.label())
                        .show_ui(ui, |ui| {
                            for theme in Theme::ALL {
                                ui.selectable_value(&mut draft.theme, theme, theme.label());
                            }
                        });
                    // Only commit the scale once the drag ends, or the slider jumps under the cursor.
                    let mut scale = draft.ui_scale;
                    let response = ui.add(Slider::new(&mut scale, UI_SCALE_RANGE).step_by(0.1).text("UI scale"));
                    if response.drag_stopped() || (response.changed() && !response.dragged()) {
                        draft.ui_scale = scale;
                    }
                    if ui.button("Reset to defaults").clicked() {
                        reset = true;
                    }
                });

                section(ui, "Account", |ui| {
                    if ui.button("Change Skin").clicked() {
                        model.upload_profile_image();
                    }
                    if let Some(message) = &model.profile_message {
                        ui.colored_label(Color32::from_rgb(239, 68, 68), message);
                    }
                    if ui.button(RichText::new("Sign Out").color(Color32::from_rgb(239, 68, 68))).clicked() {
                        action = DrawerAction::SignOut;
                    }
                });
            });
        });

    let mut layer = ctx.clone();
    if reset {
        model.preferences.reset(&mut model.store, &mut layer);
    } else if draft != *model.preferences.settings() {
        model.preferences.replace(draft, &mut model.store, &mut layer);
    }

    action
}

fn section(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    ui.add_space(APP_HEADER_PADDING / 2.0);
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new(title).strong());
        ui.add_space(4.0);
        add_contents(ui);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingLayer {
        applied: Vec<PresentationState>,
    }

    impl PresentationLayer for RecordingLayer {
        fn apply(&mut self, state: &PresentationState) {
            self.applied.push(*state);
        }
    }

    #[test]
    fn absent_record_uses_defaults() {
        let store = Store::in_memory();
        assert_eq!(Preferences::load(&store).settings(), &AppearanceSettings::default());
    }

    #[test]
    fn record_uses_camel_case_field_names() {
        let json = serde_json::to_value(AppearanceSettings::default()).unwrap();
        assert_eq!(json["autoLaunch"], false);
        assert_eq!(json["showFPS"], false);
        assert_eq!(json["maxFPS"], 60);
        assert_eq!(json["renderDistance"], 12);
        assert_eq!(json["memory"], 4);
        assert_eq!(json["resolution"], "1920x1080");
        assert_eq!(json["theme"], "dark");
    }

    #[test]
    fn missing_fields_fall_back_individually() {
        let mut store = Store::in_memory();
        store.set(Namespace::Global, KEY_SETTINGS, r#"{"vsync":false,"theme":"midnight"}"#);
        let prefs = Preferences::load(&store);
        assert!(!prefs.settings().vsync);
        assert_eq!(prefs.settings().theme, Theme::Midnight);
        assert_eq!(prefs.settings().render_distance, 12);
    }

    #[test]
    fn unreadable_record_falls_back_entirely() {
        let mut store = Store::in_memory();
        store.set(Namespace::Global, KEY_SETTINGS, "{{{");
        assert_eq!(Preferences::load(&store).settings(), &AppearanceSettings::default());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let settings = AppearanceSettings {
            render_distance: 99,
            max_fps: 65,
            memory_gb: 0,
            ui_scale: f32::NAN,
            ..Default::default()
        }.clamped();
        assert_eq!(settings.render_distance, 32);
        assert_eq!(settings.max_fps, 60);
        assert_eq!(settings.memory_gb, 1);
        assert_eq!(settings.ui_scale, 1.2);
    }

    #[test]
    fn every_change_persists_and_applies() {
        let mut store = Store::in_memory();
        let mut layer = RecordingLayer::default();
        let mut prefs = Preferences::load(&store);

        let light = AppearanceSettings { theme: Theme::Light, ..prefs.settings().clone() };
        prefs.replace(light, &mut store, &mut layer);
        let stored: AppearanceSettings = store.get_json(Namespace::Global, KEY_SETTINGS).unwrap();
        assert_eq!(stored.theme, Theme::Light);
        assert_eq!(layer.applied.len(), 1);
        assert!(!layer.applied[0].dark);
        assert_eq!(Preferences::load(&store).settings(), prefs.settings());
    }

    #[test]
    fn writing_the_same_record_twice_is_idempotent() {
        let mut store = Store::in_memory();
        let mut layer = RecordingLayer::default();
        let mut prefs = Preferences::load(&store);
        let settings = AppearanceSettings { theme: Theme::Midnight, ui_scale: 1.5, ..Default::default() };

        prefs.replace(settings.clone(), &mut store, &mut layer);
        let first_stored = store.get(Namespace::Global, KEY_SETTINGS);
        prefs.replace(settings, &mut store, &mut layer);

        assert_eq!(layer.applied[0], layer.applied[1]);
        assert_eq!(store.get(Namespace::Global, KEY_SETTINGS), first_stored);
    }

    #[test]
    fn reset_clears_the_record_and_reapplies_defaults() {
        let mut store = Store::in_memory();
        let mut layer = RecordingLayer::default();
        let mut prefs = Preferences::load(&store);

        let roomy = AppearanceSettings { memory_gb: 12, ..Default::default() };
        prefs.replace(roomy, &mut store, &mut layer);
        prefs.reset(&mut store, &mut layer);

        assert_eq!(store.get(Namespace::Global, KEY_SETTINGS), None);
        assert_eq!(prefs.settings(), &AppearanceSettings::default());
        assert_eq!(layer.applied.last(), Some(&AppearanceSettings::default().presentation()));
    }
}

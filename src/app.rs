use std::time::Duration;
use eframe::{egui::{*}, Frame};
use log::{debug, info, warn};

use super::clock::{earliest, Clock};
use super::config::LauncherConfig;
use super::gate::{EntryGate, Route};
use super::launch::{LaunchOutcome, LaunchSequencer, DEFAULT_VERSION};
use super::profile::{pick_image_file, upload_from_path, Avatar};
use super::session::{format_last_played, Identity, SessionClock, SessionRecord};
use super::settings_page::{show_settings_drawer, DrawerAction, Preferences};
use super::store::{StorageBackend, Store};
use super::surface::{DisplaySurface, NativeSurfaces};
use super::ui::*;
use super::home_page::*;
use super::news_page::*;
use super::mods_page::*;
use super::downloads_page::*;
use super::servers_page::*;
use super::{entry_page, loading_screen};

pub const APP_NAME : &str = "MineLauncher";

pub const APP_HEADER_PADDING : f32 = 20.0;
const APP_HEADER_HEIGHT : f32 = 56.0;
const HEADER_AVATAR_SIZE : f32 = 36.0;

/// Everything the screens share: the store, the clock and the three state
/// machines (gate, session clock, launch sequencer).
pub struct AppModel {
    pub config: LauncherConfig,
    pub store: Store,
    pub clock: Box<dyn Clock>,
    pub gate: EntryGate,
    pub preferences: Preferences,
    pub launcher: LaunchSequencer,
    pub session: Option<SessionClock>,
    pub selected_version: String,
    pub avatar: Option<Avatar>,
    pub profile_message: Option<String>,

    /// Last session timestamp as it was when the dashboard opened.
    last_played_at: Option<i64>,
    avatar_revision: u64,
    auto_launch_done: bool,
}

impl AppModel {
    pub fn new(config: LauncherConfig, backend: Box<dyn StorageBackend>, clock: Box<dyn Clock>) -> Self {
        let store = Store::new(backend);
        let gate = EntryGate::resolve(&store, config.show_login);
        let preferences = Preferences::load(&store);
        let launcher = LaunchSequencer::new(config.launch_policy, config.launch_dwell());

        let mut model = Self {
            config,
            store,
            clock,
            gate,
            preferences,
            launcher,
            session: None,
            selected_version: DEFAULT_VERSION.to_string(),
            avatar: None,
            profile_message: None,
            last_played_at: None,
            avatar_revision: 0,
            auto_launch_done: false,
        };
        model.enter_dashboard();
        model
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.gate.identity()
    }

    /// Per-identity data the dashboard shows, read once when it opens.
    fn enter_dashboard(&mut self) {
        let Some(identity) = self.gate.identity().cloned() else {
            return;
        };
        let record = SessionRecord::load(&self.store, &identity);
        self.last_played_at = record.last_session_epoch_millis;
        self.refresh_avatar(&identity);

        if self.preferences.settings().auto_launch && !self.auto_launch_done {
            self.auto_launch_done = true;
            info!("Auto launch enabled");
            self.launch();
        }
    }

    fn refresh_avatar(&mut self, identity: &Identity) {
        self.avatar_revision += 1;
        self.avatar = Avatar::load(&self.store, identity, self.avatar_revision);
    }

    pub fn submit_identity(&mut self) -> bool {
        if !self.gate.submit_identity(&mut self.store) {
            return false;
        }
        self.enter_dashboard();
        true
    }

    /// Starts the session clock if it isn't running yet.
    pub fn mount_home(&mut self) {
        if self.session.is_some() {
            return;
        }
        if let Some(identity) = self.gate.identity().cloned() {
            self.session = Some(SessionClock::start(identity, &self.store, self.clock.as_ref()));
        }
    }

    pub fn unmount_home(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.stop();
        }
    }

    pub fn playtime_seconds(&self) -> u64 {
        match (&self.session, self.identity()) {
            (Some(session), _) => session.accumulated_seconds(),
            (None, Some(identity)) => SessionRecord::load(&self.store, identity).accumulated_seconds,
            (None, None) => 0,
        }
    }

    pub fn last_played_label(&self) -> String {
        format_last_played(self.last_played_at, self.clock.epoch_millis())
    }

    pub fn launch(&mut self) {
        let version = self.selected_version.clone();
        self.launcher.launch(&version, self.clock.as_ref());
    }

    pub fn upload_profile_image(&mut self) {
        let Some(identity) = self.identity().cloned() else {
            return;
        };
        let Some(path) = pick_image_file() else {
            debug!("Profile image upload cancelled");
            return;
        };
        match upload_from_path(&mut self.store, &identity, &path) {
            Ok(()) => {
                self.profile_message = None;
                self.refresh_avatar(&identity);
            }
            Err(e) => {
                warn!("Profile image rejected: {}", e);
                self.profile_message = Some(e.to_string());
            }
        }
    }

    pub fn logout(&mut self) {
        self.unmount_home();
        self.gate.logout(&mut self.store);
        self.avatar = None;
        self.profile_message = None;
        self.last_played_at = None;
    }

    /// Advances every timer. Returns how long until the next one is due.
    pub fn poll(&mut self, surface: &mut dyn DisplaySurface) -> Option<Duration> {
        let clock = self.clock.as_ref();

        if self.gate.poll(clock) {
            debug!("Simulated sign-in finished");
        }
        if let Some(session) = &mut self.session {
            session.poll(&mut self.store, clock);
        }
        if let Some(LaunchOutcome::Unavailable(message)) = self.launcher.poll(clock, surface) {
            info!("{}", message);
        }

        let now = clock.now();
        let next = earliest(
            earliest(self.gate.next_due(), self.session.as_ref().and_then(SessionClock::next_due)),
            self.launcher.next_due(),
        );
        next.map(|due| due.saturating_sub(now))
    }
}

/// Application root: the entry screens, the dashboard tabs and the game windows.
pub struct App {
    pages: Vec<Box<dyn TabPage>>,
    active: usize,
    settings_open: bool,
    surfaces: NativeSurfaces,

    // Handed to every tab through `TabPage::ui`.
    model: AppModel,
}

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, model: AppModel) -> Self {
        // Header order. Home must stay first: sign-in and sign-out land on index 0.
        let pages: Vec<Box<dyn TabPage>> = vec![
            Box::new(HomePage::default()),
            Box::new(NewsPage::default()),
            Box::new(ModsPage::default()),
            Box::new(DownloadsPage::default()),
            Box::new(ServersPage::default()),
        ];

        let mut layer = cc.egui_ctx.clone();
        model.preferences.apply(&mut layer);

        Self {
            pages,
            active: 0,
            settings_open: false,
            surfaces: NativeSurfaces::new(model.config.games_root.clone()),
            model,
        }
    }

    fn home_is_active(&self) -> bool {
        self.pages.get(self.active).is_some_and(|p| p.id() == "home")
    }

    fn header(&mut self, ctx: &Context) {
        TopBottomPanel::top("header")
            .exact_height(APP_HEADER_HEIGHT)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(RichText::new(APP_NAME).size(24.0).strong().color(GREEN));
                    ui.add_space(APP_HEADER_PADDING);

                    for i in 0..self.pages.len() {
                        let label = self.pages[i].label();
                        let resp = ui.selectable_label(self.active == i, label);
                        if resp.clicked() {
                            self.active = i;
                        }
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button("⚙").on_hover_text("Settings").clicked() {
                            self.settings_open = !self.settings_open;
                        }
                        let initials = self.model.identity().map(Identity::initials).unwrap_or_default();
                        avatar(ui, self.model.avatar.as_ref(), &initials, HEADER_AVATAR_SIZE);
                    });
                });
            });
    }

    fn dashboard(&mut self, ctx: &Context) {
        self.header(ctx);

        if self.settings_open {
            match show_settings_drawer(ctx, &mut self.model) {
                DrawerAction::None => {}
                DrawerAction::Close => self.settings_open = false,
                DrawerAction::SignOut => {
                    self.settings_open = false;
                    self.active = 0;
                    self.model.logout();
                    return;
                }
            }
        }

        CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);

            if let Some(page) = self.pages.get_mut(self.active) {
                page.ui(ui, &mut self.model);
            } else {
                ui.label("No page selected.");
            }
        });

        if let Some(message) = self.model.launcher.notice().map(str::to_string) {
            Window::new("Version unavailable")
                .collapsible(false)
                .resizable(false)
                .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.model.launcher.dismiss_notice();
                    }
                });
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        let wake = self.model.poll(&mut self.surfaces);
        self.surfaces.show(ctx);

        let on_dashboard = matches!(self.model.gate.route(), Route::Dashboard(_));
        if on_dashboard && self.model.launcher.is_launching() {
            loading_screen::show(ctx, &self.model);
        } else if on_dashboard {
            self.dashboard(ctx);
        } else if entry_page::show(ctx, &mut self.model) {
            self.active = 0;
        }

        // Only the home tab counts as "playing"; leaving it stops the clock.
        let dashboard_still_up = matches!(self.model.gate.route(), Route::Dashboard(_));
        if dashboard_still_up && self.home_is_active() {
            self.model.mount_home();
        } else {
            self.model.unmount_home();
        }

        if let Some(wake) = wake {
            ctx.request_repaint_after(wake);
        }
    }
}

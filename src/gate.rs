use std::time::Duration;

use log::info;

use crate::clock::{Clock, ScheduledTask};
use crate::session::Identity;
use crate::store::{KEY_IDENTITY, Namespace, Store};

pub const CONNECT_DELAY : Duration = Duration::from_millis(2000);

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn can_submit(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

#[derive(Debug)]
pub enum Route {
    Login(LoginForm),
    Connecting { username: String, timer: ScheduledTask },
    Prompt { draft: String },
    Dashboard(Identity),
}

/// Decides what the user sees before the dashboard, and owns the
/// remembered identity in the store.
#[derive(Debug)]
pub struct EntryGate {
    route: Route,
    show_login: bool,
}

impl EntryGate {
    pub fn resolve(store: &Store, show_login: bool) -> Self {
        let remembered = store.get(Namespace::Global, KEY_IDENTITY)
            .and_then(|name| Identity::parse(&name));
        let route = match remembered {
            Some(identity) => {
                info!("Welcome back, {}", identity);
                Route::Dashboard(identity)
            }
            None => Self::entry_route(show_login),
        };
        Self { route, show_login }
    }

    fn entry_route(show_login: bool) -> Route {
        if show_login {
            Route::Login(LoginForm::default())
        } else {
            Route::Prompt { draft: String::new() }
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn route_mut(&mut self) -> &mut Route {
        &mut self.route
    }

    pub fn identity(&self) -> Option<&Identity> {
        match &self.route {
            Route::Dashboard(identity) => Some(identity),
            _ => None,
        }
    }

    /// Fake sign-in: nothing is checked, the password is dropped.
    pub fn submit_login(&mut self, clock: &dyn Clock) -> bool {
        let Route::Login(form) = &mut self.route else {
            return false;
        };
        if !form.can_submit() {
            return false;
        }
        let username = std::mem::take(&mut form.username);
        self.route = Route::Connecting { username, timer: ScheduledTask::once(clock.now(), CONNECT_DELAY) };
        true
    }

    pub fn can_submit_identity(&self) -> bool {
        matches!(&self.route, Route::Prompt { draft } if Identity::parse(draft).is_some())
    }

    /// Empty or whitespace-only drafts keep the prompt up.
    pub fn submit_identity(&mut self, store: &mut Store) -> bool {
        let Route::Prompt { draft } = &self.route else {
            return false;
        };
        let Some(identity) = Identity::parse(draft) else {
            return false;
        };
        store.set(Namespace::Global, KEY_IDENTITY, identity.as_str());
        info!("Signed in as {}", identity);
        self.route = Route::Dashboard(identity);
        true
    }

    pub fn logout(&mut self, store: &mut Store) {
        if let Route::Dashboard(identity) = &self.route {
            info!("{} signed out", identity);
        }
        store.remove(Namespace::Global, KEY_IDENTITY);
        self.route = Self::entry_route(self.show_login);
    }

    pub fn poll(&mut self, clock: &dyn Clock) -> bool {
        let Route::Connecting { username, timer } = &mut self.route else {
            return false;
        };
        if !timer.poll(clock.now()) {
            return false;
        }
        let draft = std::mem::take(username);
        self.route = Route::Prompt { draft };
        true
    }

    pub fn next_due(&self) -> Option<Duration> {
        match &self.route {
            Route::Connecting { timer, .. } => timer.next_due(),
            _ => None,
        }
    }
}

use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, ScheduledTask, earliest};
use crate::surface::{DisplaySurface, GeneratedDocument, ResourceRegistry, SurfaceRequest, SurfaceTarget};

pub const DEFAULT_DWELL : Duration = Duration::from_millis(3000);
pub const MIN_DWELL : Duration = Duration::from_millis(2000);
pub const MAX_DWELL : Duration = Duration::from_millis(3000);

/// How long a generated document stays addressable after its window opened.
pub const RESOURCE_RELEASE_DELAY : Duration = Duration::from_millis(1000);

const INCREMENTS_PER_STEP : u32 = 20;
const PAUSE_BETWEEN_STEPS_MS : u64 = 200;

pub struct VersionEntry {
    pub id: &'static str,
    pub label: &'static str,
}

pub const VERSION_CATALOG : &[VersionEntry] = &[
    VersionEntry { id: "1.20.4", label: "Minecraft 1.20.4" },
    VersionEntry { id: "1.20.2", label: "Minecraft 1.20.2" },
    VersionEntry { id: "1.19.4", label: "Minecraft 1.19.4" },
    VersionEntry { id: "1.18.2", label: "Minecraft 1.18.2" },
    VersionEntry { id: "1.12.2", label: "Minecraft 1.12.2" },
    VersionEntry { id: "1.8.8", label: "Minecraft 1.8.8" },
    VersionEntry { id: "1.5.2", label: "Minecraft 1.5.2" },
];

pub const DEFAULT_VERSION : &str = "1.20.4";

/// Versions that ship as static pages under `/games`.
pub const STATIC_VERSION_PATHS : &[(&str, &str)] = &[
    ("1.12.2", "/games/1.12.2/index.html"),
    ("1.8.8", "/games/1.8.8/index.html"),
    ("1.5.2", "/games/1.5.2/index.html"),
];

pub fn version_label(id: &str) -> String {
    VERSION_CATALOG.iter()
        .find(|v| v.id == id)
        .map(|v| v.label.to_string())
        .unwrap_or_else(|| format!("Minecraft {id}"))
}

pub fn static_path_for(version: &str) -> Option<&'static str> {
    STATIC_VERSION_PATHS.iter()
        .find(|(id, _)| *id == version)
        .map(|(_, path)| *path)
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LaunchPolicy {
    /// Build a page for the chosen version and show it in a game window.
    #[default]
    #[serde(alias = "generated_document")]
    Generated,
    /// Open a pre-built page mapped from the version, if there is one.
    #[serde(alias = "static_mapping")]
    Static,
}

pub struct LoadingStep {
    pub label: &'static str,
    pub duration_ms: u64,
}

pub const LOADING_STEPS : &[LoadingStep] = &[
    LoadingStep { label: "Initializing...", duration_ms: 500 },
    LoadingStep { label: "Loading game assets...", duration_ms: 800 },
    LoadingStep { label: "Preparing world...", duration_ms: 600 },
    LoadingStep { label: "Starting Minecraft...", duration_ms: 700 },
    LoadingStep { label: "Almost ready...", duration_ms: 500 },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadingFrame {
    pub label: &'static str,
    pub percent: f32,
}

/// Scripted progress for the loading view. Each step fills its share of the
/// bar in equal increments, then pauses before the next one; the whole
/// script is stretched or squeezed to fit the dwell.
#[derive(Debug, Clone, Copy)]
pub struct LoadingScript {
    dwell_ms: u64,
}

impl LoadingScript {
    pub fn fitted_to(dwell: Duration) -> Self {
        Self { dwell_ms: (dwell.as_millis() as u64).max(1) }
    }

    fn script_millis() -> u64 {
        let steps: u64 = LOADING_STEPS.iter().map(|s| s.duration_ms).sum();
        steps + PAUSE_BETWEEN_STEPS_MS * (LOADING_STEPS.len() as u64 - 1)
    }

    pub fn frame_at(&self, elapsed: Duration) -> LoadingFrame {
        let scaled = elapsed.as_millis() * Self::script_millis() as u128 / self.dwell_ms as u128;
        let mut remaining = u64::try_from(scaled).unwrap_or(u64::MAX);
        let share = 100.0 / LOADING_STEPS.len() as f32;

        for (index, step) in LOADING_STEPS.iter().enumerate() {
            let floor = share * index as f32;
            if remaining < step.duration_ms {
                let ticks = remaining * INCREMENTS_PER_STEP as u64 / step.duration_ms;
                let percent = floor + share * ticks as f32 / INCREMENTS_PER_STEP as f32;
                return LoadingFrame { label: step.label, percent };
            }
            remaining -= step.duration_ms;

            let is_last = index + 1 == LOADING_STEPS.len();
            if is_last || remaining < PAUSE_BETWEEN_STEPS_MS {
                return LoadingFrame { label: step.label, percent: floor + share };
            }
            remaining -= PAUSE_BETWEEN_STEPS_MS;
        }

        LoadingFrame { label: LOADING_STEPS[LOADING_STEPS.len() - 1].label, percent: 100.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    Opened(SurfaceRequest),
    Unavailable(String),
}

#[derive(Debug)]
enum LaunchState {
    Idle,
    Launching {
        version: String,
        started_at: Duration,
        dwell: ScheduledTask,
    },
}

struct PendingRelease {
    uri: String,
    task: ScheduledTask,
}

/// Drives the "launching" screen and, when it ends, opens the game surface
/// according to the configured policy.
pub struct LaunchSequencer {
    policy: LaunchPolicy,
    dwell: Duration,
    script: LoadingScript,
    state: LaunchState,
    resources: ResourceRegistry,
    releases: Vec<PendingRelease>,
    notice: Option<String>,
}

impl LaunchSequencer {
    pub fn new(policy: LaunchPolicy, dwell: Duration) -> Self {
        let dwell = dwell.clamp(MIN_DWELL, MAX_DWELL);
        Self {
            policy,
            dwell,
            script: LoadingScript::fitted_to(dwell),
            state: LaunchState::Idle,
            resources: ResourceRegistry::default(),
            releases: Vec::new(),
            notice: None,
        }
    }

    pub fn is_launching(&self) -> bool {
        matches!(self.state, LaunchState::Launching { .. })
    }

    /// Starts the loading screen. Ignored while a launch is in progress.
    pub fn launch(&mut self, version: &str, clock: &dyn Clock) -> bool {
        if self.is_launching() {
            return false;
        }
        let now = clock.now();
        info!("Launching {} ({:?} policy)", version, self.policy);
        self.notice = None;
        self.state = LaunchState::Launching {
            version: version.to_string(),
            started_at: now,
            dwell: ScheduledTask::once(now, self.dwell),
        };
        true
    }

    pub fn progress(&self, clock: &dyn Clock) -> Option<LoadingFrame> {
        match &self.state {
            LaunchState::Launching { started_at, .. } => {
                Some(self.script.frame_at(clock.now().saturating_sub(*started_at)))
            }
            LaunchState::Idle => None,
        }
    }

    /// Advances timers. Returns an outcome on the poll that ends a launch.
    pub fn poll(&mut self, clock: &dyn Clock, surface: &mut dyn DisplaySurface) -> Option<LaunchOutcome> {
        let now = clock.now();
        self.release_due(now);

        let LaunchState::Launching { dwell, .. } = &mut self.state else {
            return None;
        };
        if !dwell.poll(now) {
            return None;
        }
        let LaunchState::Launching { version, .. } = std::mem::replace(&mut self.state, LaunchState::Idle) else {
            return None;
        };

        let outcome = match self.policy {
            LaunchPolicy::Generated => self.open_generated(&version, now, surface),
            LaunchPolicy::Static => self.open_static(&version, surface),
        };
        if let LaunchOutcome::Unavailable(message) = &outcome {
            self.notice = Some(message.clone());
        }
        Some(outcome)
    }

    fn open_generated(&mut self, version: &str, now: Duration, surface: &mut dyn DisplaySurface) -> LaunchOutcome {
        let uri = self.resources.create(game_document(version).to_html());
        let request = SurfaceRequest::game_window(version_label(version), SurfaceTarget::Resource(uri.clone()));

        if let Err(e) = surface.open(&request, &self.resources) {
            warn!("Game window for {} didn't open: {}", version, e);
        }
        self.releases.push(PendingRelease { uri, task: ScheduledTask::once(now, RESOURCE_RELEASE_DELAY) });
        LaunchOutcome::Opened(request)
    }

    fn open_static(&mut self, version: &str, surface: &mut dyn DisplaySurface) -> LaunchOutcome {
        let Some(path) = static_path_for(version) else {
            warn!("No static build mapped for {}", version);
            return LaunchOutcome::Unavailable(format!("Minecraft {version} is not available yet."));
        };
        let request = SurfaceRequest::game_window(version_label(version), SurfaceTarget::Path(path.to_string()));

        if let Err(e) = surface.open(&request, &self.resources) {
            warn!("Couldn't open {}: {}", path, e);
        }
        LaunchOutcome::Opened(request)
    }

    fn release_due(&mut self, now: Duration) {
        let resources = &mut self.resources;
        self.releases.retain_mut(|pending| {
            if pending.task.poll(now) {
                resources.release(&pending.uri);
                false
            } else {
                true
            }
        });
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn next_due(&self) -> Option<Duration> {
        let dwell = match &self.state {
            LaunchState::Launching { dwell, .. } => dwell.next_due(),
            LaunchState::Idle => None,
        };
        self.releases.iter().fold(dwell, |acc, pending| earliest(acc, pending.task.next_due()))
    }
}

pub fn game_document(version: &str) -> GeneratedDocument {
    GeneratedDocument {
        title: version_label(version),
        heading: version_label(version),
        lines: vec![
            String::from("Game is running"),
            format!("Version {version} | simulated session"),
            String::from("Quit the game to return to the launcher."),
        ],
    }
}

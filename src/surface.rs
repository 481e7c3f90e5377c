use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use eframe::egui::{self, RichText, ViewportBuilder, ViewportId};
use log::{info, warn};
use thiserror::Error;

pub const SURFACE_WIDTH : u32 = 1280;
pub const SURFACE_HEIGHT : u32 = 720;

const RESOURCE_SCHEME : &str = "blob:minelauncher/";

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("no in-memory resource at {0}")]
    MissingResource(String),

    #[error("couldn't open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceTarget {
    /// URI handed out by a [`ResourceRegistry`].
    Resource(String),
    /// Site-relative path such as `/games/1.12.2/index.html`.
    Path(String),
}

/// `chrome: false` asks for an undecorated, fixed-size window. The system
/// opener used for static paths ignores both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceRequest {
    pub title: String,
    pub target: SurfaceTarget,
    pub width: u32,
    pub height: u32,
    pub chrome: bool,
}

impl SurfaceRequest {
    /// The fixed game-window shape every launch uses.
    pub fn game_window(title: impl Into<String>, target: SurfaceTarget) -> Self {
        Self {
            title: title.into(),
            target,
            width: SURFACE_WIDTH,
            height: SURFACE_HEIGHT,
            chrome: false,
        }
    }
}

/// Minimal self-contained page standing in for a running game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    pub title: String,
    pub heading: String,
    pub lines: Vec<String>,
}

impl GeneratedDocument {
    pub fn to_html(&self) -> String {
        let body: String = self.lines.iter()
            .map(|line| format!("<p>{}</p>", escape_html(line)))
            .collect();
        format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title>\
             <style>body{{margin:0;height:100vh;display:flex;flex-direction:column;\
             align-items:center;justify-content:center;background:#111827;color:#e5e7eb;\
             font-family:sans-serif}}</style></head><body><h1>{}</h1>{}</body></html>",
            escape_html(&self.title),
            escape_html(&self.heading),
            body,
        )
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

/// Inner text of every `<tag>...</tag>` in `html`, in order. Only handles
/// the attribute-less markup [`GeneratedDocument::to_html`] writes.
fn element_texts(html: &str, tag: &str) -> Vec<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let mut texts = Vec::new();
    let mut rest = html;
    while let Some(start) = rest.find(&open) {
        let inner = &rest[start + open.len()..];
        let Some(end) = inner.find(&close) else {
            break;
        };
        texts.push(unescape_html(&inner[..end]));
        rest = &inner[end + close.len()..];
    }
    texts
}

/// What a game window draws, read back out of a generated page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageText {
    pub heading: String,
    pub paragraphs: Vec<String>,
}

impl PageText {
    pub fn from_html(html: &str) -> Self {
        Self {
            heading: element_texts(html, "h1").into_iter().next().unwrap_or_default(),
            paragraphs: element_texts(html, "p"),
        }
    }
}

/// In-memory HTML pages addressable by `blob:` URI until released.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    next_id: u64,
    entries: HashMap<String, String>,
}

impl ResourceRegistry {
    pub fn create(&mut self, html: String) -> String {
        self.next_id += 1;
        let uri = format!("{RESOURCE_SCHEME}{}", self.next_id);
        self.entries.insert(uri.clone(), html);
        uri
    }

    pub fn resolve(&self, uri: &str) -> Option<&str> {
        self.entries.get(uri).map(String::as_str)
    }

    pub fn release(&mut self, uri: &str) -> bool {
        self.entries.remove(uri).is_some()
    }
}

/// Somewhere launched content can be shown. Opening is fire-and-forget:
/// an `Ok` only means the request was handed off.
pub trait DisplaySurface {
    fn open(&mut self, request: &SurfaceRequest, resources: &ResourceRegistry) -> Result<(), SurfaceError>;
}

struct GameWindow {
    id: ViewportId,
    request: SurfaceRequest,
    page: PageText,
}

/// Generated documents become extra native windows; static paths go to the
/// platform's default handler, resolved under `games_root`.
pub struct NativeSurfaces {
    games_root: PathBuf,
    windows: Vec<GameWindow>,
    opened: u64,
}

impl NativeSurfaces {
    pub fn new(games_root: impl Into<PathBuf>) -> Self {
        Self { games_root: games_root.into(), windows: Vec::new(), opened: 0 }
    }

    pub fn resolve_path(&self, site_path: &str) -> PathBuf {
        self.games_root.join(site_path.trim_start_matches('/'))
    }

    /// Draws every open game window; windows the user closed are dropped.
    pub fn show(&mut self, ctx: &egui::Context) {
        self.windows.retain(|window| {
            ctx.show_viewport_immediate(window.id, viewport_for(&window.request), |ctx, _class| {
                let mut quit = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(ui.available_height() / 3.0);
                        ui.heading(RichText::new(&window.page.heading).size(36.0));
                        ui.add_space(12.0);
                        for line in &window.page.paragraphs {
                            ui.label(line);
                        }
                        ui.add_space(24.0);
                        // Undecorated windows have no close button of their own.
                        quit = ui.button("Quit game").clicked();
                    });
                });
                !quit && !ctx.input(|i| i.viewport().close_requested())
            })
        });
    }
}

fn viewport_for(request: &SurfaceRequest) -> ViewportBuilder {
    let builder = ViewportBuilder::default()
        .with_title(&request.title)
        .with_inner_size([request.width as f32, request.height as f32]);
    if request.chrome {
        return builder;
    }
    builder
        .with_decorations(false)
        .with_resizable(false)
        .with_maximize_button(false)
}

impl DisplaySurface for NativeSurfaces {
    fn open(&mut self, request: &SurfaceRequest, resources: &ResourceRegistry) -> Result<(), SurfaceError> {
        match &request.target {
            SurfaceTarget::Resource(uri) => {
                // The window keeps its own copy, so the resource can go away right after.
                let html = resources.resolve(uri)
                    .ok_or_else(|| SurfaceError::MissingResource(uri.clone()))?;
                self.opened += 1;
                self.windows.push(GameWindow {
                    id: ViewportId::from_hash_of(("game_window", self.opened)),
                    request: request.clone(),
                    page: PageText::from_html(html),
                });
                info!("Opened game window \"{}\" from {}", request.title, uri);
                Ok(())
            }
            SurfaceTarget::Path(site_path) => {
                let path = self.resolve_path(site_path);
                open_with_system(&path).map_err(|source| SurfaceError::Open { path: path.clone(), source })?;
                info!("Handed {} to the system opener", path.display());
                Ok(())
            }
        }
    }
}

/// Open a file with whatever the platform associates with it (platform-specific).
pub fn open_with_system(path: &Path) -> io::Result<()> {
    #[cfg(target_os = "windows")]
    {
        // `start "" <path>` returns immediately and leaves the handler running.
        Command::new("cmd")
            .arg("/C").arg("start").arg("").arg(path)
            .spawn()
            .map(|_| ())
    }

    #[cfg(target_os = "macos")]
    {
        Command::new("open").arg(path).spawn().map(|_| ())
    }

    #[cfg(all(target_family = "unix", not(target_os = "macos")))]
    {
        // xdg-open first, then the GIO fallback some desktops ship instead.
        let tries: &[&dyn Fn() -> io::Result<()>] = &[
            &|| Command::new("xdg-open").arg(path).spawn().map(|_| ()),
            &|| Command::new("gio").arg("open").arg(path).spawn().map(|_| ()),
        ];

        let mut last_err: Option<io::Error> = None;
        for f in tries {
            match f() {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!("Opener failed for {}: {}", path.display(), e);
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "No system opener available")
        }))
    }
}

/// Test double that remembers what it was asked to show.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub opened: Vec<SurfaceRequest>,
    pub pages: Vec<String>,
}

#[cfg(test)]
impl DisplaySurface for RecordingSurface {
    fn open(&mut self, request: &SurfaceRequest, resources: &ResourceRegistry) -> Result<(), SurfaceError> {
        if let SurfaceTarget::Resource(uri) = &request.target {
            let html = resources.resolve(uri)
                .ok_or_else(|| SurfaceError::MissingResource(uri.clone()))?;
            self.pages.push(html.to_string());
        }
        self.opened.push(request.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> GeneratedDocument {
        GeneratedDocument {
            title: String::from("Minecraft 1.20.4"),
            heading: String::from("Minecraft 1.20.4"),
            lines: vec![String::from("Game is running <simulated>")],
        }
    }

    #[test]
    fn registry_hands_out_distinct_uris_until_released() {
        let mut registry = ResourceRegistry::default();
        let first = registry.create(document().to_html());
        let second = registry.create(document().to_html());
        assert_ne!(first, second);
        assert!(first.starts_with("blob:"));

        assert!(registry.release(&first));
        assert!(!registry.release(&first));
        assert!(registry.resolve(&first).is_none());
        assert!(registry.resolve(&second).is_some());
    }

    #[test]
    fn html_is_self_contained_and_escaped() {
        let html = document().to_html();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Minecraft 1.20.4</title>"));
        assert!(html.contains("&lt;simulated&gt;"));
        assert!(!html.contains("src="));
    }

    #[test]
    fn page_text_reads_back_what_to_html_wrote() {
        let page = PageText::from_html(&document().to_html());
        assert_eq!(page.heading, "Minecraft 1.20.4");
        assert_eq!(page.paragraphs, vec![String::from("Game is running <simulated>")]);
    }

    #[test]
    fn page_text_of_unrelated_markup_is_empty() {
        let page = PageText::from_html("<html><body><div>hi</div><p>unterminated</body></html>");
        assert_eq!(page, PageText::default());
    }

    #[test]
    fn game_window_is_fixed_size_without_chrome() {
        let request = SurfaceRequest::game_window("x", SurfaceTarget::Path("/a".into()));
        assert_eq!((request.width, request.height), (1280, 720));
        assert!(!request.chrome);
    }

    #[test]
    fn chromeless_request_drops_window_decorations() {
        let request = SurfaceRequest::game_window("Minecraft", SurfaceTarget::Path("/a".into()));
        let builder = viewport_for(&request);
        assert_eq!(builder.decorations, Some(false));
        assert_eq!(builder.resizable, Some(false));
        assert_eq!(builder.inner_size, Some(egui::vec2(1280.0, 720.0)));

        let framed = viewport_for(&SurfaceRequest { chrome: true, ..request });
        assert_eq!(framed.decorations, None);
    }

    #[test]
    fn static_paths_resolve_under_games_root() {
        let surfaces = NativeSurfaces::new("/srv/launcher");
        assert_eq!(
            surfaces.resolve_path("/games/1.12.2/index.html"),
            PathBuf::from("/srv/launcher/games/1.12.2/index.html"),
        );
    }

    #[test]
    fn native_surface_copies_the_page_on_open() {
        let mut registry = ResourceRegistry::default();
        let uri = registry.create(document().to_html());
        let mut surfaces = NativeSurfaces::new(".");
        let request = SurfaceRequest::game_window("Minecraft", SurfaceTarget::Resource(uri.clone()));

        surfaces.open(&request, &registry).unwrap();
        registry.release(&uri);
        assert_eq!(surfaces.windows.len(), 1);
        assert_eq!(surfaces.windows[0].page.heading, "Minecraft 1.20.4");
        assert_eq!(surfaces.windows[0].page.paragraphs.len(), 1);
    }

    #[test]
    fn released_resource_cannot_be_opened() {
        let registry = ResourceRegistry::default();
        let mut surfaces = NativeSurfaces::new(".");
        let request = SurfaceRequest::game_window("x", SurfaceTarget::Resource("blob:minelauncher/9".into()));
        assert!(matches!(surfaces.open(&request, &registry), Err(SurfaceError::MissingResource(_))));
    }
}

use std::collections::BTreeSet;
use eframe::egui::*;
use log::info;
use super::ui::{TabPage, badge, card, page_header, GREEN};
use super::app::AppModel;
use super::content::{filter_mods, ModCategory, DEFAULT_INSTALLED_MODS, MODS};

const MOD_GRID_COLS : usize = 2;

/// The "Mods" tab. Install state only lives as long as the page does.
pub struct ModsPage {
    search: String,
    category: Option<ModCategory>,
    installed: BTreeSet<u32>,
}

impl Default for ModsPage {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: None,
            installed: DEFAULT_INSTALLED_MODS.into_iter().collect(),
        }
    }
}

impl ModsPage {
    pub fn toggle(&mut self, mod_id: u32) -> bool {
        let now_installed = if self.installed.remove(&mod_id) {
            false
        } else {
            self.installed.insert(mod_id)
        };
        info!("Mod {} {}", mod_id, if now_installed { "installed" } else { "removed" });
        now_installed
    }

    pub fn is_installed(&self, mod_id: u32) -> bool {
        self.installed.contains(&mod_id)
    }
}

impl TabPage for ModsPage {
    fn id(&self) -> &'static str { "mods" }
    fn label(&self) -> &'static str { "Mods" }

    fn ui(&mut self, ui: &mut Ui, _model: &mut AppModel) {
        page_header(ui, "Mods", &format!("{} of {} mods installed", self.installed.len(), MODS.len()));

        ui.horizontal(|ui| {
            ui.add(TextEdit::singleline(&mut self.search).hint_text("🔍 Search mods...").desired_width(260.0));
            ui.selectable_value(&mut self.category, None, "All Mods");
            for category in ModCategory::ALL {
                ui.selectable_value(&mut self.category, Some(category), category.label());
            }
        });
        ui.add_space(12.0);

        let visible = filter_mods(MODS, &self.search, self.category);
        if visible.is_empty() {
            ui.label(RichText::new("No mods match your search.").weak());
            return;
        }

        let mut toggled = None;
        ScrollArea::vertical().id_salt("mods_scroll").auto_shrink([false; 2]).show(ui, |ui| {
            for row in visible.chunks(MOD_GRID_COLS) {
                ui.columns(MOD_GRID_COLS, |columns| {
                    for (ui, entry) in columns.iter_mut().zip(row) {
                        card(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.label(RichText::new(entry.name).size(17.0).strong());
                                badge(ui, entry.category.label(), GREEN);
                            });
                            ui.label(entry.description);
                            ui.label(RichText::new(format!("v{}  ·  {} downloads  ·  ★ {:.1}", entry.version, entry.downloads, entry.rating)).weak());
                            let mut installed = self.is_installed(entry.id);
                            if ui.checkbox(&mut installed, "Installed").changed() {
                                toggled = Some(entry.id);
                            }
                        });
                    }
                });
                ui.add_space(8.0);
            }
        });

        if let Some(id) = toggled {
            self.toggle(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_the_default_install_set() {
        let page = ModsPage::default();
        assert!(page.is_installed(1) && page.is_installed(3) && page.is_installed(5));
        assert!(!page.is_installed(2));
    }

    #[test]
    fn toggle_flips_install_state() {
        let mut page = ModsPage::default();
        assert!(page.toggle(2));
        assert!(page.is_installed(2));
        assert!(!page.toggle(1));
        assert!(!page.is_installed(1));
    }
}

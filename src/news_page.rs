use eframe::egui::*;
use super::ui::{TabPage, badge, card, page_header, GREEN, BLUE, PURPLE, ORANGE, PINK};
use super::app::AppModel;
use super::content::{NewsCategory, NewsItem, NEWS};

#[derive(Default)]
pub struct NewsPage;

fn category_color(category: NewsCategory) -> Color32 {
    match category {
        NewsCategory::Update => GREEN,
        NewsCategory::Mods => PURPLE,
        NewsCategory::Launcher => BLUE,
        NewsCategory::Community => ORANGE,
        NewsCategory::Enhancement => PINK,
    }
}

fn news_card(ui: &mut Ui, item: &NewsItem, title_size: f32) {
    card(ui, |ui| {
        ui.horizontal(|ui| {
            badge(ui, item.category.label(), category_color(item.category));
            ui.label(RichText::new(item.date).weak());
        });
        ui.label(RichText::new(item.title).size(title_size).strong());
        ui.label(item.summary);
    });
}

impl TabPage for NewsPage {
    fn id(&self) -> &'static str { "news" }
    fn label(&self) -> &'static str { "News" }

    fn ui(&mut self, ui: &mut Ui, _model: &mut AppModel) {
        page_header(ui, "Latest News", "Stay updated with the latest Minecraft and launcher news");

        ScrollArea::vertical().id_salt("news_scroll").auto_shrink([false; 2]).show(ui, |ui| {
            for item in NEWS.iter().filter(|n| n.featured) {
                news_card(ui, item, 24.0);
                ui.add_space(12.0);
            }
            for item in NEWS.iter().filter(|n| !n.featured) {
                news_card(ui, item, 17.0);
                ui.add_space(8.0);
            }
        });
    }
}

use anyhow::anyhow;
use clap::Parser;
use eframe::egui;
use egui::{Color32, CornerRadius, RichText, ScrollArea, Stroke, Ui, ViewportBuilder};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod cache;
mod config;
mod hn_client;
mod models;
mod session;
mod sort;

use crate::config::Config;
use crate::hn_client::AlgoliaClient;
use crate::models::{Hit, SearchResponse};
use crate::session::{FetchRequest, SearchSession, FAILURE_NOTICE};
use crate::sort::SortKey;

const THEME_STORAGE_KEY: &str = "is_dark_mode";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    let client = AlgoliaClient::new(&config)?;
    tracing::info!(query = %config.query, hits_per_page = config.hits_per_page, "starting");

    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([720.0, 480.0])
            .with_title("HN Search"),
        ..Default::default()
    };

    eframe::run_native(
        "HN Search",
        options,
        Box::new(move |cc| {
            let is_dark_mode = cc
                .storage
                .and_then(|storage| storage.get_string(THEME_STORAGE_KEY))
                .and_then(|value| value.parse::<bool>().ok())
                .unwrap_or(true);

            Ok(Box::new(SearchApp::new(client, &config.query, is_dark_mode)))
        }),
    )
    .map_err(|e| anyhow!("window closed with error: {}", e))
}

struct AppTheme {
    background: Color32,
    header_background: Color32,
    text: Color32,
    secondary_text: Color32,
    highlight: Color32,
    separator: Color32,
    error: Color32,
    points_high: Color32,
    points_medium: Color32,
    points_low: Color32,
    button_background: Color32,
    button_foreground: Color32,
    button_hover_background: Color32,
}

impl AppTheme {
    fn dark() -> Self {
        Self {
            background: Color32::from_rgb(18, 18, 18),
            header_background: Color32::from_rgb(42, 42, 42),
            text: Color32::from_rgb(240, 240, 240),
            secondary_text: Color32::from_rgb(180, 180, 180),
            highlight: Color32::from_rgb(255, 102, 0), // HN orange
            separator: Color32::from_rgb(60, 60, 60),
            error: Color32::from_rgb(239, 83, 80),
            points_high: Color32::from_rgb(76, 175, 80),
            points_medium: Color32::from_rgb(255, 193, 7),
            points_low: Color32::from_rgb(158, 158, 158),
            button_background: Color32::from_rgb(66, 66, 66),
            button_foreground: Color32::from_rgb(240, 240, 240),
            button_hover_background: Color32::from_rgb(80, 80, 80),
        }
    }

    fn light() -> Self {
        Self {
            background: Color32::from_rgb(245, 245, 245),
            header_background: Color32::from_rgb(235, 235, 235),
            text: Color32::from_rgb(20, 20, 20),
            secondary_text: Color32::from_rgb(90, 90, 90),
            highlight: Color32::from_rgb(235, 92, 0),
            separator: Color32::from_rgb(200, 200, 200),
            error: Color32::from_rgb(198, 40, 40),
            points_high: Color32::from_rgb(30, 110, 40),
            points_medium: Color32::from_rgb(190, 130, 0),
            points_low: Color32::from_rgb(80, 80, 80),
            button_background: Color32::from_rgb(225, 225, 225),
            button_foreground: Color32::from_rgb(20, 20, 20),
            button_hover_background: Color32::from_rgb(210, 210, 210),
        }
    }

    fn apply_to_ctx(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();

        style.visuals.panel_fill = self.background;
        style.visuals.window_stroke = Stroke::new(1.0, self.separator);
        style.visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text);
        style.visuals.widgets.inactive.bg_fill = self.button_background;
        style.visuals.widgets.inactive.weak_bg_fill = self.button_background;
        style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.button_foreground);
        style.visuals.widgets.hovered.bg_fill = self.button_hover_background;
        style.visuals.widgets.hovered.weak_bg_fill = self.button_hover_background;
        style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.button_foreground);
        style.visuals.selection.bg_fill = self.highlight;
        style.visuals.selection.stroke = Stroke::new(1.0, self.highlight);
        style.visuals.faint_bg_color = self.header_background;
        style.visuals.widgets.inactive.corner_radius = CornerRadius::same(4);
        style.visuals.widgets.hovered.corner_radius = CornerRadius::same(4);
        style.visuals.widgets.active.corner_radius = CornerRadius::same(4);

        ctx.set_style(style);
    }

    fn points_color(&self, points: i64) -> Color32 {
        if points >= 300 {
            self.points_high
        } else if points >= 100 {
            self.points_medium
        } else {
            self.points_low
        }
    }
}

// Things the user clicked this frame, applied once rendering is done
enum RowAction {
    Sort(SortKey),
    Dismiss(String),
    Open(String),
}

struct SearchApp {
    client: AlgoliaClient,
    session: SearchSession,
    // Requests still running on worker threads
    pending: Vec<(FetchRequest, Receiver<anyhow::Result<SearchResponse>>)>,
    filter: String,
    theme: AppTheme,
    is_dark_mode: bool,
}

impl SearchApp {
    fn new(client: AlgoliaClient, default_query: &str, is_dark_mode: bool) -> Self {
        let mut app = Self {
            client,
            session: SearchSession::new(default_query),
            pending: Vec::new(),
            filter: String::new(),
            theme: if is_dark_mode { AppTheme::dark() } else { AppTheme::light() },
            is_dark_mode,
        };

        if let Some(request) = app.session.initial_request() {
            app.spawn_fetch(request);
        }
        app
    }

    fn spawn_fetch(&mut self, request: FetchRequest) {
        let client = self.client.clone();
        let (tx, rx) = mpsc::channel();
        let term = request.term.clone();
        let page = request.page;

        thread::spawn(move || {
            let outcome = client.fetch_page(&term, page);
            let _ = tx.send(outcome);
        });

        self.pending.push((request, rx));
    }

    fn check_fetches(&mut self) {
        let mut finished = Vec::new();
        self.pending.retain(|(request, rx)| match rx.try_recv() {
            Ok(outcome) => {
                finished.push((request.clone(), outcome));
                false
            }
            Err(TryRecvError::Empty) => true,
            Err(TryRecvError::Disconnected) => {
                finished.push((request.clone(), Err(anyhow!("fetch worker exited without a result"))));
                false
            }
        });

        for (request, outcome) in finished {
            if let Err(err) = self.session.complete(request, outcome) {
                tracing::error!(error = %err, "discarding out-of-order page");
                self.session.error = Some(FAILURE_NOTICE.to_string());
            }
        }
    }

    fn submit_search(&mut self) {
        if let Some(request) = self.session.submit() {
            self.spawn_fetch(request);
        }
    }

    fn load_more(&mut self) {
        if let Some(request) = self.session.more() {
            self.spawn_fetch(request);
        }
    }

    fn toggle_theme(&mut self) {
        self.is_dark_mode = !self.is_dark_mode;
        self.theme = if self.is_dark_mode { AppTheme::dark() } else { AppTheme::light() };
    }

    fn open_link(&self, url: &str) {
        if let Err(e) = open::that(url) {
            tracing::warn!(%url, error = %e, "failed to open link");
        }
    }

    fn render_search_bar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            let input = ui.add(
                egui::TextEdit::singleline(&mut self.session.search_input)
                    .hint_text("Search stories")
                    .desired_width(320.0),
            );
            let submitted = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            if ui.button("Search").clicked() || submitted {
                self.submit_search();
            }

            ui.add_space(16.0);
            ui.label(RichText::new("Filter").color(self.theme.secondary_text));
            ui.add(egui::TextEdit::singleline(&mut self.filter).desired_width(180.0));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let icon = if self.is_dark_mode { "☀" } else { "🌙" };
                if ui.button(icon).on_hover_text("Toggle theme").clicked() {
                    self.toggle_theme();
                }
            });
        });
    }

    fn render_table(&self, ui: &mut Ui, rows: &[Hit]) -> Option<RowAction> {
        let mut action = None;

        egui::Grid::new("results_table")
            .num_columns(5)
            .striped(true)
            .spacing([16.0, 6.0])
            .show(ui, |ui| {
                for key in SortKey::COLUMNS {
                    let indicator = self.session.sort.indicator(key);
                    let active = self.session.sort.state().key == key;
                    let color = if active { self.theme.highlight } else { self.theme.text };
                    let header = RichText::new(format!("{} {}", key.label(), indicator.symbol())).color(color).strong();

                    if ui.add(egui::Button::new(header).frame(false)).clicked() {
                        action = Some(RowAction::Sort(key));
                    }
                }
                ui.label(RichText::new("Archive").color(self.theme.secondary_text).strong());
                ui.end_row();

                for hit in rows {
                    ui.horizontal(|ui| {
                        let title = ui
                            .add(
                                egui::Label::new(RichText::new(&hit.title).color(self.theme.text))
                                    .sense(egui::Sense::click()),
                            )
                            .on_hover_cursor(egui::CursorIcon::PointingHand);
                        if title.clicked() && !hit.url.is_empty() {
                            action = Some(RowAction::Open(hit.url.clone()));
                        }

                        let domain = hit.domain();
                        if !domain.is_empty() {
                            ui.label(RichText::new(format!("({})", domain)).color(self.theme.secondary_text).italics());
                        }
                    });

                    ui.vertical(|ui| {
                        ui.label(RichText::new(&hit.author).color(self.theme.text));
                        let age = hit.time_ago();
                        if !age.is_empty() {
                            ui.label(RichText::new(age).color(self.theme.secondary_text).small());
                        }
                    });
                    ui.label(RichText::new(hit.num_comments.to_string()).color(self.theme.secondary_text));
                    ui.label(RichText::new(hit.points.to_string()).color(self.theme.points_color(hit.points)).strong());

                    if ui.button("Dismiss").clicked() {
                        action = Some(RowAction::Dismiss(hit.id.clone()));
                    }
                    ui.end_row();
                }
            });

        action
    }

    fn render_footer(&mut self, ui: &mut Ui) {
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if self.session.is_loading() {
                ui.spinner();
                ui.label(RichText::new("Loading ...").color(self.theme.secondary_text));
            } else if self.session.has_more() && ui.button("More").clicked() {
                self.load_more();
            }

            let page = self.session.cache.current_page();
            ui.label(RichText::new(format!("page {}", page + 1)).color(self.theme.secondary_text).small());
        });
    }
}

impl eframe::App for SearchApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        storage.set_string(THEME_STORAGE_KEY, self.is_dark_mode.to_string());
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.theme.apply_to_ctx(ctx);
        self.check_fetches();

        // Keep polling the workers while anything is outstanding
        if !self.pending.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("search_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            self.render_search_bar(ui);
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(error) = &self.session.error {
                ui.label(RichText::new(error).color(self.theme.error).strong());
                ui.separator();
            }

            if self.session.cache.current_result_set().is_none() {
                if self.session.is_loading() {
                    ui.vertical_centered(|ui| {
                        ui.add_space(40.0);
                        ui.spinner();
                    });
                }
                return;
            }

            let rows = self.session.visible_hits(&self.filter);
            let mut action = None;

            ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                action = self.render_table(ui, &rows);
                self.render_footer(ui);
            });

            match action {
                Some(RowAction::Sort(key)) => self.session.toggle_sort(key),
                Some(RowAction::Dismiss(id)) => self.session.dismiss(&id),
                Some(RowAction::Open(url)) => self.open_link(&url),
                None => {}
            }
        });
    }
}

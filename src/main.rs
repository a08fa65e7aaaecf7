//! Iracema - leitor ilustrado do livro com mapas dos locais
//!
//! Aplicação desktop: leitor do PDF, mapas do livro e do autor, detalhes dos locais

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use log::{error, info, warn, LevelFilter};
use simplelog::{Config, WriteLogger};

use iracema::config::AppConfig;
use iracema::discovery::find_pdf;
use iracema::error::ReaderError;
use iracema::export::{save_book_copy, BOOK_COPY_NAME};
use iracema::layout::Viewport;
use iracema::locations::{location_id, LocationKind, LocationTable, MapBounds};
use iracema::notice::{Dismissal, Notice, NoticeBoard};
use iracema::pdf_processor::PdfProcessor;
use iracema::screens::{Screen, ScreenStack};
use iracema::session::ReaderSession;

// Paleta (tons de areia e mata)
#[allow(dead_code)]
struct AppColors;

impl AppColors {
    const BG_MAIN: egui::Color32 = egui::Color32::from_rgb(250, 244, 234);

    // Botões arredondados
    const BUTTON: egui::Color32 = egui::Color32::from_rgb(227, 191, 148);
    const BUTTON_TEXT: egui::Color32 = egui::Color32::from_rgb(60, 40, 20);

    const TITLE: egui::Color32 = egui::Color32::from_rgb(34, 87, 60);
    const TEXT_PRIMARY: egui::Color32 = egui::Color32::from_rgb(40, 32, 24);
    const TEXT_SECONDARY: egui::Color32 = egui::Color32::from_rgb(110, 96, 80);

    const MAP_BG: egui::Color32 = egui::Color32::from_rgb(198, 226, 233);
    const MAP_BORDER: egui::Color32 = egui::Color32::from_rgb(120, 160, 170);
    const MARKER: egui::Color32 = egui::Color32::from_rgb(200, 50, 40);
    const MARKER_HOVER: egui::Color32 = egui::Color32::from_rgb(240, 90, 60);
}

#[derive(Parser, Debug)]
#[command(name = "iracema", about = "Leitor ilustrado de Iracema")]
struct Args {
    /// Arquivo de configuração JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// PDF do livro (pula a busca automática)
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// off, error, warn, info, debug ou trace
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load(path).with_context(|| format!("Falha ao ler {}", path.display()))?,
        None => AppConfig::default(),
    };

    let log_level: LevelFilter = args
        .log_level
        .parse()
        .map_err(|_| anyhow::anyhow!("Nível de log inválido: {}", args.log_level))?;

    WriteLogger::init(
        log_level,
        Config::default(),
        File::create(&config.log_file)
            .with_context(|| format!("Falha ao criar o log {}", config.log_file.display()))?,
    )?;
    info!("Iniciando Iracema");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 800.0])
            .with_min_inner_size([360.0, 560.0])
            .with_title("Iracema")
            .with_resizable(true),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Iracema",
        options,
        Box::new(move |cc| {
            let mut style = (*cc.egui_ctx.style()).clone();

            style.visuals = egui::Visuals::light();
            style.visuals.window_fill = AppColors::BG_MAIN;
            style.visuals.panel_fill = AppColors::BG_MAIN;

            style.spacing.item_spacing = egui::vec2(12.0, 12.0);
            style.spacing.button_padding = egui::vec2(20.0, 12.0);

            style.visuals.widgets.noninteractive.fg_stroke.color = AppColors::TEXT_PRIMARY;

            style.text_styles.insert(
                egui::TextStyle::Heading,
                egui::FontId::new(28.0, egui::FontFamily::Proportional),
            );
            style.text_styles.insert(
                egui::TextStyle::Body,
                egui::FontId::new(16.0, egui::FontFamily::Proportional),
            );
            style.text_styles.insert(
                egui::TextStyle::Button,
                egui::FontId::new(16.0, egui::FontFamily::Proportional),
            );

            cc.egui_ctx.set_style(style);

            Ok(Box::new(IracemaApp::new(config, args.pdf)))
        }),
    );

    info!("Encerrando Iracema");
    result.map_err(|e| anyhow::anyhow!("Erro na interface: {e}"))
}

/// Ações coletadas durante o desenho e aplicadas depois, fora dos closures do egui
enum Action {
    Open(Screen),
    Back,
    Home,
    NextPage,
    PreviousPage,
    ZoomIn,
    ZoomOut,
    PickPdf,
    DownloadBook,
    DismissNotice,
}

struct IracemaApp {
    config: AppConfig,
    explicit_pdf: Option<PathBuf>,
    screens: ScreenStack,
    reader: Option<ReaderSession<PdfProcessor>>,
    locations: Option<LocationTable>,
    notices: NoticeBoard,
    page_texture: Option<(u64, egui::TextureHandle)>,
    detail_texture: Option<(PathBuf, Option<egui::TextureHandle>)>,
}

impl IracemaApp {
    fn new(config: AppConfig, explicit_pdf: Option<PathBuf>) -> Self {
        let mut notices = NoticeBoard::new();
        let locations = match Self::load_locations(&config) {
            Ok(table) => Some(table),
            Err(e) => {
                notices.report(&e);
                None
            }
        };

        Self {
            config,
            explicit_pdf,
            screens: ScreenStack::new(),
            reader: None,
            locations,
            notices,
            page_texture: None,
            detail_texture: None,
        }
    }

    fn load_locations(config: &AppConfig) -> Result<LocationTable, ReaderError> {
        match &config.locations_file {
            Some(path) => LocationTable::from_file(path).or_else(|e| {
                warn!("Tabela de locais {} inválida ({}); usando a embutida", path.display(), e);
                LocationTable::embedded()
            }),
            None => LocationTable::embedded(),
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Open(screen) => {
                let left = self.screens.push(screen);
                self.on_leave(&left);
                self.on_enter();
            }
            Action::Back => {
                let left = self.screens.back();
                self.on_leave(&left);
                self.on_enter();
            }
            Action::Home => {
                let left = self.screens.home();
                self.on_leave(&left);
            }
            Action::NextPage => self.with_reader(|reader| reader.next()),
            Action::PreviousPage => self.with_reader(|reader| reader.previous()),
            Action::ZoomIn => self.with_reader(|reader| reader.zoom_in()),
            Action::ZoomOut => self.with_reader(|reader| reader.zoom_out()),
            Action::PickPdf => self.pick_pdf(),
            Action::DownloadBook => self.download_book(),
            Action::DismissNotice => {
                if let Some(notice) = self.notices.dismiss() {
                    if notice.dismissal(self.screens.current()) == Dismissal::LeaveScreen {
                        self.apply(Action::Back);
                    }
                }
            }
        }
    }

    fn with_reader<F>(&mut self, f: F)
    where
        F: FnOnce(&mut ReaderSession<PdfProcessor>) -> Result<(), ReaderError>,
    {
        if let Some(reader) = self.reader.as_mut() {
            if let Err(e) = f(reader) {
                self.notices.report(&e);
            }
        }
    }

    fn on_enter(&mut self) {
        if *self.screens.current() == Screen::Reader {
            // O leitor só inicializa quando o viewport for medido
            if let Some(reader) = self.reader.as_mut() {
                reader.reset_viewport();
            }
        }
    }

    fn on_leave(&mut self, left: &Screen) {
        match left {
            Screen::Reader => {
                if let Some(reader) = self.reader.as_mut() {
                    reader.close();
                    reader.reset_viewport();
                }
                self.page_texture = None;
            }
            Screen::LocationDetail { .. } => self.detail_texture = None,
            _ => {}
        }
    }

    /// Chamado uma única vez por entrada na tela do leitor, com o layout já medido
    fn init_reader(&mut self) {
        let Some(reader) = self.reader.as_mut() else {
            return;
        };

        let path = match &self.explicit_pdf {
            Some(path) => Some(path.clone()),
            None => find_pdf(self.config.candidate_names.as_slice(), &self.config.search_root, &self.config.keyword)
                .map(|found| found.path),
        };

        let Some(path) = path else {
            self.notices
                .report(&ReaderError::FileNotFound(self.config.search_root.clone()));
            return;
        };

        if let Err(e) = reader.load(&path) {
            error!("Erro ao carregar o livro: {}", e);
            self.notices.report(&e);
        }
    }

    fn ensure_reader(&mut self) -> bool {
        if self.reader.is_some() {
            return true;
        }
        match PdfProcessor::new() {
            Ok(processor) => {
                self.reader = Some(ReaderSession::new(processor));
                true
            }
            Err(e) => {
                self.notices.report(&e);
                false
            }
        }
    }

    fn pick_pdf(&mut self) {
        let Some(path) = rfd::FileDialog::new().add_filter("PDF", &["pdf"]).pick_file() else {
            return;
        };
        self.explicit_pdf = Some(path.clone());
        self.page_texture = None;
        self.with_reader(|reader| reader.load(&path));
    }

    fn book_source(&self) -> Option<PathBuf> {
        if let Some(path) = self.reader.as_ref().and_then(|r| r.path()) {
            return Some(path.to_path_buf());
        }
        self.explicit_pdf.clone().or_else(|| {
            find_pdf(self.config.candidate_names.as_slice(), &self.config.search_root, &self.config.keyword)
                .map(|found| found.path)
        })
    }

    fn download_book(&mut self) {
        let Some(source) = self.book_source() else {
            self.notices
                .report(&ReaderError::FileNotFound(self.config.search_root.clone()));
            return;
        };

        let Some(destination) = rfd::FileDialog::new()
            .add_filter("PDF", &["pdf"])
            .set_file_name(BOOK_COPY_NAME)
            .save_file()
        else {
            return;
        };

        match save_book_copy(&source, &destination) {
            Ok(saved) => {
                let location = saved
                    .canonicalize()
                    .unwrap_or_else(|_| saved.clone());
                let name = saved
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .into_owned();
                self.notices.push(Notice::info(
                    "Download Concluído",
                    format!("O livro foi salvo como:\n{}\n\nLocal: {}", name, location.display()),
                ));
            }
            Err(e) => {
                self.notices.push(Notice::error(
                    "Erro",
                    format!("Ocorreu um erro ao tentar fazer o download: {e:#}"),
                ));
            }
        }
    }
}

impl eframe::App for IracemaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions = Vec::new();

        match self.screens.current().clone() {
            Screen::Main => self.draw_main(ctx, &mut actions),
            Screen::MapSelection => self.draw_map_selection(ctx, &mut actions),
            Screen::BookMap => self.draw_map(ctx, LocationKind::Book, &mut actions),
            Screen::AuthorMap => self.draw_map(ctx, LocationKind::Author, &mut actions),
            Screen::LocationDetail { kind, id } => self.draw_location_detail(ctx, kind, &id, &mut actions),
            Screen::About => self.draw_about(ctx, &mut actions),
            Screen::Reader => self.draw_reader(ctx, &mut actions),
        }

        if self.notices.is_blocking() {
            // Cliques feitos na tela por baixo do aviso são descartados
            actions.clear();
            draw_blocker(ctx);
        }
        self.draw_notice(ctx, &mut actions);

        for action in actions {
            self.apply(action);
        }
    }
}

impl Drop for IracemaApp {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.as_mut() {
            reader.close();
        }
    }
}

fn rounded_button(ui: &mut egui::Ui, text: &str) -> bool {
    let btn = egui::Button::new(
        egui::RichText::new(text).strong().color(AppColors::BUTTON_TEXT),
    )
    .min_size(egui::vec2(ui.available_width(), 48.0))
    .fill(AppColors::BUTTON)
    .rounding(15.0);
    ui.add(btn).clicked()
}

/// Camada translúcida que cobre a tela e engole os cliques
fn draw_blocker(ctx: &egui::Context) {
    egui::Area::new(egui::Id::new("bloqueio_aviso"))
        .order(egui::Order::Middle)
        .fixed_pos(egui::Pos2::ZERO)
        .show(ctx, |ui| {
            let rect = ctx.screen_rect();
            ui.allocate_rect(rect, egui::Sense::click());
            ui.painter()
                .rect_filled(rect, 0.0, egui::Color32::from_black_alpha(96));
        });
}

fn back_button(ui: &mut egui::Ui, actions: &mut Vec<Action>) {
    if ui.button("← Voltar").clicked() {
        actions.push(Action::Back);
    }
}

impl IracemaApp {
    fn draw_main(&mut self, ctx: &egui::Context, actions: &mut Vec<Action>) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.set_max_width(360.0);
                ui.add_space(40.0);
                ui.label(
                    egui::RichText::new("Iracema")
                        .size(44.0)
                        .color(AppColors::TITLE)
                        .strong(),
                );
                ui.label(
                    egui::RichText::new("José de Alencar")
                        .color(AppColors::TEXT_SECONDARY),
                );
                ui.add_space(40.0);

                if rounded_button(ui, "📖 Ler o Livro") {
                    if self.ensure_reader() {
                        actions.push(Action::Open(Screen::Reader));
                    }
                }
                if rounded_button(ui, "🗺 Mapas") {
                    actions.push(Action::Open(Screen::MapSelection));
                }
                if rounded_button(ui, "⬇ Baixar o Livro") {
                    actions.push(Action::DownloadBook);
                }
                if rounded_button(ui, "ℹ Sobre") {
                    actions.push(Action::Open(Screen::About));
                }
            });
        });
    }

    fn draw_map_selection(&mut self, ctx: &egui::Context, actions: &mut Vec<Action>) {
        egui::CentralPanel::default().show(ctx, |ui| {
            back_button(ui, actions);
            ui.vertical_centered(|ui| {
                ui.set_max_width(360.0);
                ui.add_space(30.0);
                ui.heading("Mapas");
                ui.add_space(20.0);
                if rounded_button(ui, "Locais do Livro") {
                    actions.push(Action::Open(Screen::BookMap));
                }
                if rounded_button(ui, "Locais do Autor") {
                    actions.push(Action::Open(Screen::AuthorMap));
                }
            });
        });
    }

    fn draw_map(&mut self, ctx: &egui::Context, kind: LocationKind, actions: &mut Vec<Action>) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                back_button(ui, actions);
                let title = match kind {
                    LocationKind::Book => "Locais do Livro",
                    LocationKind::Author => "Locais do Autor",
                };
                ui.heading(title);
            });

            let Some(table) = &self.locations else {
                ui.label("Os locais não estão disponíveis.");
                return;
            };
            let map = table.map(kind);
            let bounds = MapBounds::around(map);

            let size = ui.available_size();
            let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
            let painter = ui.painter_at(rect);
            painter.rect_filled(rect, 8.0, AppColors::MAP_BG);
            painter.rect_stroke(rect, 8.0, egui::Stroke::new(1.0, AppColors::MAP_BORDER));

            for record in &map.locations {
                let (x, y) = bounds.project(record.position());
                let pos = rect.min + egui::vec2(x * rect.width(), y * rect.height());
                let hit = egui::Rect::from_center_size(pos, egui::vec2(28.0, 28.0));
                let response = ui
                    .interact(hit, ui.id().with(&record.id), egui::Sense::click())
                    .on_hover_text(&record.name);

                let color = if response.hovered() {
                    ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
                    AppColors::MARKER_HOVER
                } else {
                    AppColors::MARKER
                };
                painter.circle_filled(pos, 8.0, color);
                painter.text(
                    pos - egui::vec2(0.0, 12.0),
                    egui::Align2::CENTER_BOTTOM,
                    &record.label,
                    egui::FontId::proportional(14.0),
                    AppColors::TEXT_PRIMARY,
                );

                if response.clicked() {
                    actions.push(Action::Open(Screen::LocationDetail {
                        kind,
                        id: location_id(&record.label),
                    }));
                }
            }
        });
    }

    fn draw_location_detail(
        &mut self,
        ctx: &egui::Context,
        kind: LocationKind,
        id: &str,
        actions: &mut Vec<Action>,
    ) {
        let record = match self.locations.as_ref().map(|table| table.lookup(kind, id)) {
            Some(Ok(record)) => record.clone(),
            Some(Err(e)) => {
                self.notices.report(&e);
                actions.push(Action::Back);
                return;
            }
            None => {
                actions.push(Action::Back);
                return;
            }
        };

        let texture = record
            .image_path
            .as_deref()
            .and_then(|path| self.detail_image(ctx, path));

        egui::CentralPanel::default().show(ctx, |ui| {
            back_button(ui, actions);
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.label(
                    egui::RichText::new(&record.name)
                        .size(26.0)
                        .strong()
                        .color(AppColors::TITLE),
                );
                if let Some(texture) = &texture {
                    let max_width = ui.available_width();
                    let [w, h] = texture.size();
                    let scale = (max_width / w as f32).min(1.0);
                    let size = egui::vec2(w as f32 * scale, h as f32 * scale);
                    ui.add(egui::Image::from_texture(egui::load::SizedTexture::new(texture.id(), size)));
                }
                ui.label(egui::RichText::new(&record.description).color(AppColors::TEXT_PRIMARY));
                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new(&record.reference)
                        .italics()
                        .color(AppColors::TEXT_SECONDARY),
                );
            });
        });
    }

    /// Carrega a imagem do local uma vez; arquivos ausentes ficam sem imagem
    fn detail_image(&mut self, ctx: &egui::Context, path: &Path) -> Option<egui::TextureHandle> {
        if let Some((cached, texture)) = &self.detail_texture {
            if cached == path {
                return texture.clone();
            }
        }

        let texture = match image::open(path) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
                Some(ctx.load_texture(
                    format!("local_{}", path.display()),
                    color_image,
                    egui::TextureOptions::LINEAR,
                ))
            }
            Err(e) => {
                warn!("Imagem do local indisponível {}: {}", path.display(), e);
                None
            }
        };

        self.detail_texture = Some((path.to_path_buf(), texture.clone()));
        texture
    }

    fn draw_about(&mut self, ctx: &egui::Context, actions: &mut Vec<Action>) {
        egui::CentralPanel::default().show(ctx, |ui| {
            back_button(ui, actions);
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Sobre");
                ui.label(
                    "Iracema, de José de Alencar (1865), é um dos romances fundadores do \
                     Romantismo brasileiro. Este aplicativo traz o livro ilustrado e mapas \
                     com os lugares que aparecem na história e na vida do autor.",
                );
                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new("Toque em um marcador no mapa para ver a descrição do local.")
                        .color(AppColors::TEXT_SECONDARY),
                );
            });
        });
    }

    fn draw_reader(&mut self, ctx: &egui::Context, actions: &mut Vec<Action>) {
        let screen = ctx.screen_rect();
        let viewport = Viewport::from_window(screen.width(), screen.height(), self.config.viewport_margin);

        let first_measure = match self.reader.as_mut() {
            Some(reader) => {
                if reader.viewport_ready(viewport) {
                    true
                } else {
                    reader.resize(viewport);
                    false
                }
            }
            None => false,
        };
        if first_measure {
            self.init_reader();
        }

        self.refresh_page_texture(ctx);

        egui::TopBottomPanel::top("reader_top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                back_button(ui, actions);
                if ui.button("📂 Abrir PDF").clicked() {
                    actions.push(Action::PickPdf);
                }
                if ui.button("🏠").clicked() {
                    actions.push(Action::Home);
                }
            });
        });

        egui::TopBottomPanel::bottom("reader_controls").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui.button("◀").clicked() {
                    actions.push(Action::PreviousPage);
                }
                let label = self
                    .reader
                    .as_ref()
                    .map(|reader| reader.page_label())
                    .unwrap_or_default();
                ui.label(egui::RichText::new(label).color(AppColors::TEXT_PRIMARY));
                if ui.button("▶").clicked() {
                    actions.push(Action::NextPage);
                }
                ui.separator();
                if ui.button("−").clicked() {
                    actions.push(Action::ZoomOut);
                }
                if ui.button("+").clicked() {
                    actions.push(Action::ZoomIn);
                }
            });
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(reader) = self.reader.as_ref() else {
                return;
            };
            let Some((_, texture)) = &self.page_texture else {
                if reader.is_loaded() {
                    ui.centered_and_justified(|ui| {
                        ui.label("Não foi possível exibir esta página.");
                    });
                }
                return;
            };

            match reader.display_size() {
                Some(Ok(size)) => {
                    ui.centered_and_justified(|ui| {
                        ui.add(egui::Image::from_texture(egui::load::SizedTexture::new(
                            texture.id(),
                            egui::vec2(size.width, size.height),
                        )));
                    });
                }
                Some(Err(e)) => {
                    ui.label(e.to_string());
                }
                None => {}
            }
        });
    }

    /// Troca a textura só quando a sessão renderizou algo novo
    fn refresh_page_texture(&mut self, ctx: &egui::Context) {
        let Some(reader) = self.reader.as_ref() else {
            self.page_texture = None;
            return;
        };
        let Some(page) = reader.current_rendered_page() else {
            self.page_texture = None;
            return;
        };

        let generation = reader.generation();
        if matches!(&self.page_texture, Some((current, _)) if *current == generation) {
            return;
        }

        let size = [page.width() as usize, page.height() as usize];
        let color_image = egui::ColorImage::from_rgb(size, page.as_rgb_bytes());
        let handle = ctx.load_texture("pagina", color_image, egui::TextureOptions::LINEAR);
        self.page_texture = Some((generation, handle));
    }

    fn draw_notice(&mut self, ctx: &egui::Context, actions: &mut Vec<Action>) {
        let Some(notice) = self.notices.current() else {
            return;
        };

        egui::Window::new(&notice.title)
            .order(egui::Order::Foreground)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_max_width(ctx.screen_rect().width() * 0.6);
                ui.label(&notice.message);
                ui.add_space(8.0);
                ui.vertical_centered_justified(|ui| {
                    if ui.button("OK").clicked() {
                        actions.push(Action::DismissNotice);
                    }
                });
            });
    }
}

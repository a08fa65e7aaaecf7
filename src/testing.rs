//! Documento sintético para testes sem PDFium

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use image::{Rgb, RgbImage};

use crate::error::{ReaderError, Result};
use crate::page_source::{DocumentOpener, PageSource, RenderedPage};

/// Páginas em branco de tamanho fixo, em pontos
pub struct FakeDocument {
    pages: usize,
    failing_page: Option<usize>,
    open: bool,
    closed: Rc<Cell<usize>>,
}

impl FakeDocument {
    pub const BASE_WIDTH: u32 = 60;
    pub const BASE_HEIGHT: u32 = 80;

    pub fn new(pages: usize) -> Self {
        Self {
            pages,
            failing_page: None,
            open: true,
            closed: Rc::new(Cell::new(0)),
        }
    }
}

impl PageSource for FakeDocument {
    fn page_count(&self) -> usize {
        if self.open {
            self.pages
        } else {
            0
        }
    }

    fn render(&self, page: usize, zoom: f32) -> Result<RenderedPage> {
        if !self.open {
            return Err(ReaderError::DocumentClosed);
        }
        if page >= self.pages {
            return Err(ReaderError::IndexOutOfRange {
                page,
                page_count: self.pages,
            });
        }
        if self.failing_page == Some(page) {
            return Err(ReaderError::RenderFailed {
                page,
                reason: "fluxo de conteúdo corrompido".to_string(),
            });
        }

        let width = (Self::BASE_WIDTH as f32 * zoom).round() as u32;
        let height = (Self::BASE_HEIGHT as f32 * zoom).round() as u32;
        Ok(RenderedPage::new(RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))))
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.closed.set(self.closed.get() + 1);
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

#[derive(Default)]
pub struct FakeOpener {
    pages: usize,
    failing_page: Option<usize>,
    fail_open: bool,
    closed: Rc<Cell<usize>>,
}

impl FakeOpener {
    pub fn with_pages(pages: usize) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn failing_open() -> Self {
        Self {
            fail_open: true,
            ..Self::default()
        }
    }

    pub fn failing_page(mut self, page: usize) -> Self {
        self.failing_page = Some(page);
        self
    }

    /// Quantas vezes algum documento aberto por esta fábrica foi fechado
    pub fn closed_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.closed)
    }
}

impl DocumentOpener for FakeOpener {
    type Document = FakeDocument;

    fn open(&self, path: &Path) -> Result<FakeDocument> {
        if self.fail_open {
            return Err(ReaderError::OpenFailed {
                path: path.to_path_buf(),
                reason: "cabeçalho PDF ausente".to_string(),
            });
        }
        Ok(FakeDocument {
            pages: self.pages,
            failing_page: self.failing_page,
            open: true,
            closed: Rc::clone(&self.closed),
        })
    }
}

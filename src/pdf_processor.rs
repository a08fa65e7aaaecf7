//! Módulo para rasterização de PDFs
//! Usa pdfium-render para renderizar páginas como imagens

use std::path::Path;

use log::{debug, info};
use pdfium_render::prelude::*;

use crate::error::{ReaderError, Result};
use crate::page_source::{DocumentOpener, PageSource, RenderedPage};

/// Ponto de entrada do PDFium: abre documentos `PdfBook`
pub struct PdfProcessor {
    pdfium: &'static Pdfium,
}

impl PdfProcessor {
    /// Cria uma nova instância do processador de PDF
    pub fn new() -> Result<Self> {
        // Tenta carregar a biblioteca pdfium de vários locais
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./lib/"))
            .or_else(|_| Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./")))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| ReaderError::LibraryUnavailable(e.to_string()))?;

        // Os documentos precisam de uma referência 'static para viverem na sessão
        let pdfium: &'static Pdfium = Box::leak(Box::new(Pdfium::new(bindings)));
        info!("PDFium carregado");

        Ok(Self { pdfium })
    }

    /// Abre o PDF em `path`
    pub fn open_book(&self, path: &Path) -> Result<PdfBook> {
        if !path.is_file() {
            return Err(ReaderError::FileNotFound(path.to_path_buf()));
        }

        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| ReaderError::OpenFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let page_count = document.pages().len() as usize;
        info!("PDF aberto: {} ({} páginas)", path.display(), page_count);

        Ok(PdfBook {
            document: Some(document),
            page_count,
        })
    }
}

impl DocumentOpener for PdfProcessor {
    type Document = PdfBook;

    fn open(&self, path: &Path) -> Result<PdfBook> {
        self.open_book(path)
    }
}

/// Documento PDF aberto. Fechado explicitamente com `close` ou ao sair de escopo.
pub struct PdfBook {
    document: Option<PdfDocument<'static>>,
    page_count: usize,
}

impl PageSource for PdfBook {
    fn page_count(&self) -> usize {
        if self.document.is_some() {
            self.page_count
        } else {
            0
        }
    }

    fn render(&self, page: usize, zoom: f32) -> Result<RenderedPage> {
        let document = self.document.as_ref().ok_or(ReaderError::DocumentClosed)?;

        if page >= self.page_count {
            return Err(ReaderError::IndexOutOfRange {
                page,
                page_count: self.page_count,
            });
        }

        let pdf_page = document
            .pages()
            .get(page as PdfPageIndex)
            .map_err(|e| ReaderError::RenderFailed {
                page,
                reason: e.to_string(),
            })?;

        // O zoom é uma matriz de ampliação linear aplicada antes da rasterização
        let render_config = PdfRenderConfig::new().scale_page_by_factor(zoom);

        let bitmap = pdf_page
            .render_with_config(&render_config)
            .map_err(|e| ReaderError::RenderFailed {
                page,
                reason: e.to_string(),
            })?;

        let image = bitmap.as_image().into_rgb8();
        debug!(
            "Página {} renderizada em {}x{} (zoom {:.1})",
            page,
            image.width(),
            image.height(),
            zoom
        );

        Ok(RenderedPage::new(image))
    }

    fn close(&mut self) {
        if self.document.take().is_some() {
            debug!("Documento PDF fechado");
        }
    }

    fn is_open(&self) -> bool {
        self.document.is_some()
    }
}

impl Drop for PdfBook {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Uma página de 200x300 pontos, para as dimensões em pixels serem exatas
    fn one_page_pdf(processor: &PdfProcessor, dir: &Path) -> std::path::PathBuf {
        let mut document = processor.pdfium.create_new_pdf().unwrap();
        document
            .pages_mut()
            .create_page_at_end(PdfPagePaperSize::Custom(PdfPoints::new(200.0), PdfPoints::new(300.0)))
            .unwrap();
        let path = dir.join("uma_pagina.pdf");
        document.save_to_file(&path).unwrap();
        path
    }

    // Um único teste: o PDFium só é carregado uma vez por processo
    #[test]
    fn renders_scaled_pages_and_guards_index_and_close() {
        let processor = match PdfProcessor::new() {
            Ok(processor) => processor,
            Err(ReaderError::LibraryUnavailable(reason)) => {
                eprintln!("PDFium indisponível, teste ignorado: {reason}");
                return;
            }
            Err(e) => panic!("erro inesperado ao carregar o PDFium: {e}"),
        };
        let dir = TempDir::new().unwrap();

        let missing = processor.open_book(&dir.path().join("nada.pdf")).err().unwrap();
        assert!(matches!(missing, ReaderError::FileNotFound(_)));

        let mut book = processor.open_book(&one_page_pdf(&processor, dir.path())).unwrap();
        assert!(book.is_open());
        assert_eq!(book.page_count(), 1);

        let normal = book.render(0, 1.0).unwrap();
        let double = book.render(0, 2.0).unwrap();
        assert_eq!((normal.width(), normal.height()), (200, 300));
        assert_eq!(double.width(), normal.width() * 2);
        assert_eq!(double.height(), normal.height() * 2);

        let out_of_range = book.render(1, 1.0).unwrap_err();
        assert!(matches!(out_of_range, ReaderError::IndexOutOfRange { page: 1, page_count: 1 }));

        book.close();
        book.close();
        assert!(!book.is_open());
        assert_eq!(book.page_count(), 0);
        assert!(matches!(book.render(0, 1.0), Err(ReaderError::DocumentClosed)));
    }
}

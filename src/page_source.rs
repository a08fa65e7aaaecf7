//! Abstração sobre documentos paginados que podem ser rasterizados
//!
//! O leitor só conhece estes traits; o PDFium é uma das implementações.

use std::path::Path;

use image::RgbImage;

use crate::error::Result;

/// Página rasterizada (RGB, 8 bits por canal).
///
/// Gerada a cada chamada de `render`; nunca é guardada em cache.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    image: RgbImage,
}

impl RenderedPage {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_rgb_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}

/// Documento aberto, dono dos recursos de decodificação
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Renderiza `page` ampliada por `zoom` nos dois eixos
    fn render(&self, page: usize, zoom: f32) -> Result<RenderedPage>;

    /// Libera os recursos. Chamar de novo não faz nada.
    fn close(&mut self);

    fn is_open(&self) -> bool;
}

/// Fábrica de documentos a partir de um caminho no disco
pub trait DocumentOpener {
    type Document: PageSource;

    fn open(&self, path: &Path) -> Result<Self::Document>;
}

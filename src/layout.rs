//! Dimensionamento da página dentro da área visível

use serde::{Deserialize, Serialize};

use crate::error::{ReaderError, Result};

/// Área disponível na tela para a página
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Espaço ocupado pelos botões e rótulos em volta da página
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportMargin {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportMargin {
    fn default() -> Self {
        Self {
            width: 40.0,
            height: 200.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Janela menos a margem, nunca negativa
    pub fn from_window(width: f32, height: f32, margin: ViewportMargin) -> Self {
        Self {
            width: (width - margin.width).max(0.0),
            height: (height - margin.height).max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySize {
    pub width: f32,
    pub height: f32,
}

/// Reduz a imagem para caber no viewport mantendo a proporção. Nunca amplia.
pub fn fit_to_viewport(image_width: u32, image_height: u32, viewport: Viewport) -> Result<DisplaySize> {
    if image_height == 0 {
        return Err(ReaderError::InvalidImageSize {
            width: image_width,
            height: image_height,
        });
    }

    let width = image_width as f32;
    let height = image_height as f32;

    if width <= viewport.width && height <= viewport.height {
        return Ok(DisplaySize { width, height });
    }

    if viewport.height <= 0.0 {
        return Ok(DisplaySize {
            width: 0.0,
            height: 0.0,
        });
    }

    let ratio = width / height;
    if viewport.width / viewport.height > ratio {
        // viewport mais largo que a imagem: a altura limita
        Ok(DisplaySize {
            width: viewport.height * ratio,
            height: viewport.height,
        })
    } else {
        Ok(DisplaySize {
            width: viewport.width,
            height: viewport.width / ratio,
        })
    }
}

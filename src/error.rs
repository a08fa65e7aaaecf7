//! Erros do leitor de PDF e dos dados de apoio

use std::path::PathBuf;

use thiserror::Error;

use crate::locations::LocationKind;

#[derive(Debug, Error)]
pub enum ReaderError {
    /// Nenhum PDF foi encontrado (ou o caminho informado não existe)
    #[error("arquivo PDF não encontrado: {0}")]
    FileNotFound(PathBuf),

    #[error("não foi possível abrir o PDF {path}: {reason}")]
    OpenFailed { path: PathBuf, reason: String },

    #[error("falha ao renderizar a página {page}: {reason}")]
    RenderFailed { page: usize, reason: String },

    /// Estado de navegação e documento discordam do número de páginas
    #[error("página {page} fora do intervalo (total de páginas: {page_count})")]
    IndexOutOfRange { page: usize, page_count: usize },

    #[error("biblioteca PDFium indisponível: {0}")]
    LibraryUnavailable(String),

    #[error("o documento já foi fechado")]
    DocumentClosed,

    #[error("dimensões de imagem inválidas: {width}x{height}")]
    InvalidImageSize { width: u32, height: u32 },

    #[error("local '{id}' não cadastrado para {kind}")]
    LocationNotFound { kind: LocationKind, id: String },

    #[error("tabela de locais inválida: {0}")]
    LocationData(#[from] serde_json::Error),

    #[error("configuração inválida em {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("erro de E/S: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReaderError>;

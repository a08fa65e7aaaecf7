//! Exportação: páginas como PNG e cópia do livro para o usuário

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::ImageFormat;
use log::info;
use tempfile::NamedTempFile;

use crate::error::ReaderError;
use crate::page_source::PageSource;

/// Nome sugerido para a cópia do livro
pub const BOOK_COPY_NAME: &str = "Iracema_José_de_Alencar.pdf";

/// Salva cada página como `page_{i}.png` em `out_dir`
pub fn export_pages<S: PageSource>(document: &S, out_dir: &Path, zoom: f32) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Falha ao criar o diretório {}", out_dir.display()))?;

    let total_pages = document.page_count();
    let mut written = Vec::with_capacity(total_pages);

    for index in 0..total_pages {
        let page = document
            .render(index, zoom)
            .with_context(|| format!("Falha ao renderizar página {}", index + 1))?;

        let img_path = out_dir.join(format!("page_{}.png", index));
        page.image()
            .save_with_format(&img_path, ImageFormat::Png)
            .with_context(|| format!("Falha ao salvar {}", img_path.display()))?;

        info!("[{}/{}] {}", index + 1, total_pages, img_path.display());
        written.push(img_path);
    }

    Ok(written)
}

/// Copia o PDF para `destination` por um arquivo temporário no mesmo diretório,
/// de modo que o destino nunca fica pela metade
pub fn save_book_copy(source: &Path, destination: &Path) -> Result<PathBuf> {
    if !source.is_file() {
        return Err(ReaderError::FileNotFound(source.to_path_buf()).into());
    }

    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut temp = NamedTempFile::new_in(&dir)
        .with_context(|| format!("Falha ao criar arquivo temporário em {}", dir.display()))?;
    let mut input = File::open(source).with_context(|| format!("Falha ao abrir {}", source.display()))?;
    io::copy(&mut input, temp.as_file_mut()).context("Falha ao copiar o livro")?;

    temp.persist(destination)
        .with_context(|| format!("Falha ao salvar {}", destination.display()))?;

    info!("Livro salvo em {}", destination.display());
    Ok(destination.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDocument;
    use tempfile::TempDir;

    #[test]
    fn writes_one_png_per_page_named_by_index() {
        let dir = TempDir::new().unwrap();
        let written = export_pages(&FakeDocument::new(3), dir.path(), 1.0).unwrap();

        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["page_0.png", "page_1.png", "page_2.png"]);

        let decoded = image::open(&written[0]).unwrap();
        assert_eq!(decoded.width(), FakeDocument::BASE_WIDTH);
        assert_eq!(decoded.height(), FakeDocument::BASE_HEIGHT);
    }

    #[test]
    fn creates_missing_output_directory() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("paginas/livro");
        let written = export_pages(&FakeDocument::new(1), &out, 0.5).unwrap();
        assert!(written[0].starts_with(&out));
        assert!(written[0].is_file());
    }

    #[test]
    fn copy_of_book_matches_source() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("Iracema-Jose-de-Alenquer.pdf");
        fs::write(&source, b"%PDF-1.4 conteudo").unwrap();
        let destination = dir.path().join(BOOK_COPY_NAME);

        let saved = save_book_copy(&source, &destination).unwrap();
        assert_eq!(saved, destination);
        assert_eq!(fs::read(&destination).unwrap(), b"%PDF-1.4 conteudo");
    }

    #[test]
    fn copy_of_missing_book_fails() {
        let dir = TempDir::new().unwrap();
        let err = save_book_copy(&dir.path().join("nada.pdf"), &dir.path().join("copia.pdf")).unwrap_err();
        assert!(matches!(err.downcast_ref::<ReaderError>(), Some(ReaderError::FileNotFound(_))));
        assert!(!dir.path().join("copia.pdf").exists());
    }
}

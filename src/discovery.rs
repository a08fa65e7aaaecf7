//! Localiza o PDF do livro no disco

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

/// Regra que escolheu o arquivo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryRule {
    /// Um dos nomes conhecidos existe
    Candidate,
    /// A busca recursiva achou um PDF com a palavra-chave no caminho
    Keyword,
    /// Nenhum nome bate; primeiro PDF da busca (ordenada por nome)
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovered {
    pub path: PathBuf,
    pub rule: DiscoveryRule,
}

/// Procura o PDF: primeiro os nomes candidatos (em ordem de prioridade, relativos a `search_root`),
/// depois qualquer `.pdf` abaixo de `search_root`, preferindo os que contêm `keyword`.
pub fn find_pdf<S: AsRef<str>>(candidates: &[S], search_root: &Path, keyword: &str) -> Option<Discovered> {
    for name in candidates {
        let path = search_root.join(name.as_ref());
        if path.is_file() {
            info!("PDF encontrado pelo nome: {}", path.display());
            return Some(Discovered {
                path,
                rule: DiscoveryRule::Candidate,
            });
        }
    }

    let pdfs: Vec<PathBuf> = WalkDir::new(search_root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Ignorando entrada ilegível na busca de PDFs: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_pdf(path))
        .collect();
    debug!("{} PDFs encontrados em {}", pdfs.len(), search_root.display());

    let keyword = keyword.to_lowercase();
    if !keyword.is_empty() {
        let matching = pdfs.iter().find(|path| {
            let relative = path.strip_prefix(search_root).unwrap_or(path);
            relative.to_string_lossy().to_lowercase().contains(&keyword)
        });
        if let Some(path) = matching {
            info!("PDF encontrado pela palavra-chave '{}': {}", keyword, path.display());
            return Some(Discovered {
                path: path.clone(),
                rule: DiscoveryRule::Keyword,
            });
        }
    }

    let path = pdfs.into_iter().next()?;
    warn!(
        "Nenhum PDF com '{}' no nome; usando o primeiro encontrado: {}",
        keyword,
        path.display()
    );
    Some(Discovered {
        path,
        rule: DiscoveryRule::Fallback,
    })
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, b"%PDF-1.4\n").unwrap();
        path
    }

    #[test]
    fn candidates_are_checked_in_priority_order() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.pdf");
        let a = touch(dir.path(), "a.pdf");

        let found = find_pdf(&["a.pdf", "b.pdf"], dir.path(), "iracema").unwrap();
        assert_eq!(found.path, a);
        assert_eq!(found.rule, DiscoveryRule::Candidate);
    }

    #[test]
    fn keyword_match_beats_first_scanned_pdf() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "notes.pdf");
        let book = touch(dir.path(), "iracema_final.pdf");

        let found = find_pdf(&["a.pdf", "b.pdf"], dir.path(), "iracema").unwrap();
        assert_eq!(found.path, book);
        assert_eq!(found.rule, DiscoveryRule::Keyword);
    }

    #[test]
    fn keyword_is_case_insensitive_and_searches_subdirectories() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "aaa.pdf");
        let book = touch(dir.path(), "livros/nested/IRACEMA - Alencar.PDF");

        let found = find_pdf::<&str>(&[], dir.path(), "Iracema").unwrap();
        assert_eq!(found.path, book);
        assert_eq!(found.rule, DiscoveryRule::Keyword);
    }

    #[test]
    fn falls_back_to_first_pdf_in_name_order() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "zeta.pdf");
        let alpha = touch(dir.path(), "alpha.pdf");
        fs::write(dir.path().join("readme.txt"), b"texto").unwrap();

        let found = find_pdf(&["iracema.pdf"], dir.path(), "iracema").unwrap();
        assert_eq!(found.path, alpha);
        assert_eq!(found.rule, DiscoveryRule::Fallback);
    }

    #[test]
    fn returns_none_without_any_pdf() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("capa.png"), b"png").unwrap();

        assert!(find_pdf(&["iracema.pdf"], dir.path(), "iracema").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_does_not_hide_other_pdfs() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let locked = dir.path().join("trancado");
        touch(dir.path(), "trancado/iracema.pdf");
        let book = touch(dir.path(), "livro.pdf");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let found = find_pdf::<&str>(&[], dir.path(), "alencar");

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        // O erro de leitura do diretório é registrado e a busca segue
        let found = found.unwrap();
        assert_eq!(found.path, book);
        assert_eq!(found.rule, DiscoveryRule::Fallback);
    }
}

//! Configuração do aplicativo (arquivo JSON opcional)

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{ReaderError, Result};
use crate::layout::ViewportMargin;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Onde procurar o PDF do livro
    pub search_root: PathBuf,
    /// Nomes conhecidos do PDF, em ordem de prioridade
    pub candidate_names: Vec<String>,
    /// Preferida na busca recursiva (sem diferenciar maiúsculas)
    pub keyword: String,
    /// Substitui a tabela de locais embutida
    pub locations_file: Option<PathBuf>,
    pub log_file: PathBuf,
    pub viewport_margin: ViewportMargin,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            search_root: PathBuf::from("."),
            candidate_names: vec![
                "Iracema-Jose-de-Alenquer.pdf".to_string(),
                "Iracema_José_de_Alencar.pdf".to_string(),
                "Iracema.pdf".to_string(),
                "iracema.pdf".to_string(),
            ],
            keyword: "iracema".to_string(),
            locations_file: None,
            log_file: PathBuf::from("iracema.log"),
            viewport_margin: ViewportMargin::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let config = serde_json::from_str(&json).map_err(|e| ReaderError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        info!("Configuração carregada de {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_fields_take_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("iracema.json");
        fs::write(&path, r#"{"keyword": "alencar", "viewport_margin": {"width": 10, "height": 20}}"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.keyword, "alencar");
        assert_eq!(config.viewport_margin, ViewportMargin { width: 10.0, height: 20.0 });
        assert_eq!(config.candidate_names, AppConfig::default().candidate_names);
        assert_eq!(config.search_root, PathBuf::from("."));
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("iracema.json");
        fs::write(&path, "{ keyword: ").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ReaderError::Config { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AppConfig::load(Path::new("/nao/existe/iracema.json")).unwrap_err();
        assert!(matches!(err, ReaderError::Io(_)));
    }
}

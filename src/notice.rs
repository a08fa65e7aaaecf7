//! Canal único de avisos para o usuário

use std::collections::VecDeque;

use log::{error, info};

use crate::error::ReaderError;
use crate::screens::Screen;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub level: NoticeLevel,
    /// Avisos bloqueantes deixam o leitor sem documento; não há nova tentativa
    pub blocking: bool,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: NoticeLevel::Info,
            blocking: false,
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: NoticeLevel::Error,
            blocking: false,
        }
    }

    pub fn from_error(err: &ReaderError) -> Self {
        let (message, blocking) = match err {
            ReaderError::FileNotFound(_) => {
                ("Nenhum arquivo PDF do livro foi encontrado.".to_string(), true)
            }
            ReaderError::OpenFailed { .. } | ReaderError::LibraryUnavailable(_) => {
                (format!("Erro ao carregar o livro: {err}"), true)
            }
            other => (other.to_string(), false),
        };

        Self {
            title: "Erro".to_string(),
            message,
            level: NoticeLevel::Error,
            blocking,
        }
    }
}

/// O que a interface faz depois que o usuário fecha um aviso
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    Stay,
    /// Sem documento não há o que ler: sai do leitor
    LeaveScreen,
}

impl Notice {
    pub fn dismissal(&self, screen: &Screen) -> Dismissal {
        if self.blocking && *screen == Screen::Reader {
            Dismissal::LeaveScreen
        } else {
            Dismissal::Stay
        }
    }
}

/// Fila FIFO; a interface mostra sempre o primeiro aviso
#[derive(Debug, Default)]
pub struct NoticeBoard {
    notices: VecDeque<Notice>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => info!("Aviso: {}", notice.message),
            NoticeLevel::Error => error!("Erro exibido: {}", notice.message),
        }
        self.notices.push_back(notice);
    }

    pub fn report(&mut self, err: &ReaderError) {
        self.push(Notice::from_error(err));
    }

    pub fn current(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn dismiss(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }

    /// Enquanto for `true` a tela por baixo do aviso não recebe cliques
    pub fn is_blocking(&self) -> bool {
        self.current().map(|notice| notice.blocking).unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }
}

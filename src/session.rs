//! Sessão do leitor: documento aberto, navegação e página atual
//!
//! Tudo roda na thread da interface. Cada navegação renderiza a página de novo
//! antes do próximo evento ser processado.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::{ReaderError, Result};
use crate::layout::{fit_to_viewport, DisplaySize, Viewport};
use crate::navigation::Navigation;
use crate::page_source::{DocumentOpener, PageSource, RenderedPage};

pub struct ReaderSession<O: DocumentOpener> {
    opener: O,
    document: Option<O::Document>,
    path: Option<PathBuf>,
    navigation: Navigation,
    current: Option<RenderedPage>,
    viewport: Option<Viewport>,
    generation: u64,
}

impl<O: DocumentOpener> ReaderSession<O> {
    pub fn new(opener: O) -> Self {
        Self {
            opener,
            document: None,
            path: None,
            navigation: Navigation::default(),
            current: None,
            viewport: None,
            generation: 0,
        }
    }

    /// Abre `path`, fechando o documento anterior, e renderiza a primeira página
    pub fn load(&mut self, path: &Path) -> Result<()> {
        self.close();

        let document = self.opener.open(path)?;
        self.navigation.reset(document.page_count());
        self.document = Some(document);
        self.path = Some(path.to_path_buf());
        info!("Livro carregado: {} ({})", path.display(), self.navigation.label());

        self.render_current()
    }

    /// Libera o documento. Seguro chamar várias vezes.
    pub fn close(&mut self) {
        if let Some(mut document) = self.document.take() {
            document.close();
            info!("Leitor fechado");
        }
        self.current = None;
        self.path = None;
        self.navigation = Navigation::default();
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn current_rendered_page(&self) -> Option<&RenderedPage> {
        self.current.as_ref()
    }

    /// Incrementado a cada renderização bem-sucedida
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn page_label(&self) -> String {
        self.navigation.label()
    }

    pub fn next(&mut self) -> Result<()> {
        if self.document.is_some() && self.navigation.next() {
            self.render_current()?;
        }
        Ok(())
    }

    pub fn previous(&mut self) -> Result<()> {
        if self.document.is_some() && self.navigation.previous() {
            self.render_current()?;
        }
        Ok(())
    }

    pub fn zoom_in(&mut self) -> Result<()> {
        if self.navigation.zoom_in() && self.document.is_some() {
            self.render_current()?;
        }
        Ok(())
    }

    pub fn zoom_out(&mut self) -> Result<()> {
        if self.navigation.zoom_out() && self.document.is_some() {
            self.render_current()?;
        }
        Ok(())
    }

    /// Primeira medição do viewport depois que o layout assentou.
    ///
    /// Retorna `true` apenas na primeira chamada; as seguintes são ignoradas.
    pub fn viewport_ready(&mut self, viewport: Viewport) -> bool {
        if self.viewport.is_some() {
            return false;
        }
        self.viewport = Some(viewport);
        true
    }

    /// Atualiza o viewport depois de um redimensionamento
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    /// Rearma `viewport_ready` (quando a tela do leitor é reaberta)
    pub fn reset_viewport(&mut self) {
        self.viewport = None;
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Tamanho de exibição da página atual no viewport atual
    pub fn display_size(&self) -> Option<Result<DisplaySize>> {
        let page = self.current.as_ref()?;
        let viewport = self.viewport?;
        Some(fit_to_viewport(page.width(), page.height(), viewport))
    }

    fn render_current(&mut self) -> Result<()> {
        let document = self.document.as_ref().ok_or(ReaderError::DocumentClosed)?;
        let page = self.navigation.current_page();

        if document.page_count() == 0 {
            warn!("Documento sem páginas");
            self.current = None;
            return Ok(());
        }
        if page >= document.page_count() {
            self.current = None;
            return Err(ReaderError::IndexOutOfRange {
                page,
                page_count: document.page_count(),
            });
        }

        match document.render(page, self.navigation.zoom().factor()) {
            Ok(rendered) => {
                self.current = Some(rendered);
                self.generation += 1;
                Ok(())
            }
            Err(err) => {
                // O documento continua válido; só a imagem antiga sai da tela
                warn!("Falha ao renderizar a página {}: {}", page, err);
                self.current = None;
                Err(err)
            }
        }
    }
}

impl<O: DocumentOpener> Drop for ReaderSession<O> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeDocument, FakeOpener};

    fn session_with(pages: usize) -> ReaderSession<FakeOpener> {
        let mut session = ReaderSession::new(FakeOpener::with_pages(pages));
        session.load(Path::new("iracema.pdf")).unwrap();
        session
    }

    #[test]
    fn load_renders_first_page_at_default_zoom() {
        let session = session_with(10);
        let page = session.current_rendered_page().unwrap();
        assert_eq!((page.width(), page.height()), (FakeDocument::BASE_WIDTH * 2, FakeDocument::BASE_HEIGHT * 2));
        assert_eq!(session.page_label(), "Página 1 de 10");
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn reload_resets_navigation() {
        let mut session = session_with(10);
        session.next().unwrap();
        session.next().unwrap();
        session.zoom_in().unwrap();

        session.load(Path::new("outro.pdf")).unwrap();
        assert_eq!(session.navigation().current_page(), 0);
        assert_eq!(session.navigation().zoom().factor(), 2.0);
        assert_eq!(session.path(), Some(Path::new("outro.pdf")));
    }

    #[test]
    fn reload_closes_previous_document() {
        let opener = FakeOpener::with_pages(3);
        let closed = opener.closed_counter();
        let mut session = ReaderSession::new(opener);
        session.load(Path::new("a.pdf")).unwrap();
        session.load(Path::new("b.pdf")).unwrap();
        assert_eq!(closed.get(), 1);
        drop(session);
        assert_eq!(closed.get(), 2);
    }

    #[test]
    fn navigation_without_change_does_not_render() {
        let mut session = session_with(1);
        session.next().unwrap();
        session.previous().unwrap();
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn failed_open_leaves_session_empty() {
        let mut session = ReaderSession::new(FakeOpener::failing_open());
        let err = session.load(Path::new("ruim.pdf")).unwrap_err();
        assert!(matches!(err, ReaderError::OpenFailed { .. }));
        assert!(!session.is_loaded());
        assert!(session.current_rendered_page().is_none());
    }

    #[test]
    fn render_failure_keeps_document() {
        let mut session = ReaderSession::new(FakeOpener::with_pages(5).failing_page(1));
        session.load(Path::new("iracema.pdf")).unwrap();

        let err = session.next().unwrap_err();
        assert!(matches!(err, ReaderError::RenderFailed { page: 1, .. }));
        assert!(session.is_loaded());
        assert!(session.current_rendered_page().is_none());

        session.next().unwrap();
        assert_eq!(session.navigation().current_page(), 2);
        assert!(session.current_rendered_page().is_some());
    }

    #[test]
    fn viewport_ready_fires_once() {
        let mut session = ReaderSession::new(FakeOpener::with_pages(1));
        assert!(session.viewport_ready(Viewport::new(800.0, 600.0)));
        assert!(!session.viewport_ready(Viewport::new(100.0, 100.0)));
        assert_eq!(session.viewport(), Some(Viewport::new(800.0, 600.0)));

        session.reset_viewport();
        assert!(session.viewport_ready(Viewport::new(100.0, 100.0)));
    }

    #[test]
    fn display_size_fits_viewport() {
        let mut session = session_with(2);
        assert!(session.display_size().is_none());

        session.viewport_ready(Viewport::new(100.0, 100.0));
        let size = session.display_size().unwrap().unwrap();
        assert!(size.width <= 100.0 && size.height <= 100.0);
    }

    #[test]
    fn close_is_idempotent() {
        let mut session = session_with(2);
        session.close();
        session.close();
        assert!(!session.is_loaded());
        assert_eq!(session.page_label(), "Página 0 de 0");
        session.next().unwrap();
    }
}

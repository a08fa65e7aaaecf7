//! Estado de navegação: página atual e zoom

/// Zoom guardado em meios-passos (1 = 0.5x ... 8 = 4.0x) para não acumular erro de ponto flutuante
const MIN_HALF_STEPS: u8 = 1;
const MAX_HALF_STEPS: u8 = 8;
const DEFAULT_HALF_STEPS: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zoom(u8);

impl Zoom {
    pub const MIN: Zoom = Zoom(MIN_HALF_STEPS);
    pub const MAX: Zoom = Zoom(MAX_HALF_STEPS);

    pub fn factor(self) -> f32 {
        f32::from(self.0) / 2.0
    }

    fn increased(self) -> Self {
        Zoom((self.0 + 1).min(MAX_HALF_STEPS))
    }

    fn decreased(self) -> Self {
        Zoom(self.0.saturating_sub(1).max(MIN_HALF_STEPS))
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Zoom(DEFAULT_HALF_STEPS)
    }
}

/// Página e zoom do leitor. Todas as transições são totais.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Navigation {
    current_page: usize,
    total_pages: usize,
    zoom: Zoom,
}

impl Navigation {
    pub fn new(total_pages: usize) -> Self {
        Self {
            current_page: 0,
            total_pages,
            zoom: Zoom::default(),
        }
    }

    /// Volta para a primeira página com zoom 2.0
    pub fn reset(&mut self, total_pages: usize) {
        *self = Self::new(total_pages);
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    /// Retorna `true` se o estado mudou
    pub fn next(&mut self) -> bool {
        if self.current_page + 1 < self.total_pages {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    pub fn previous(&mut self) -> bool {
        if self.current_page > 0 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(self.zoom.increased())
    }

    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom(self.zoom.decreased())
    }

    fn set_zoom(&mut self, zoom: Zoom) -> bool {
        let changed = zoom != self.zoom;
        self.zoom = zoom;
        changed
    }

    /// "Página X de Y", com X contado a partir de 1
    pub fn label(&self) -> String {
        let shown = if self.total_pages == 0 {
            0
        } else {
            self.current_page + 1
        };
        format!("Página {} de {}", shown, self.total_pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_first_page_with_default_zoom() {
        let nav = Navigation::new(10);
        assert_eq!(nav.current_page(), 0);
        assert_eq!(nav.zoom().factor(), 2.0);
    }

    #[test]
    fn next_is_clamped_at_last_page() {
        let mut nav = Navigation::new(10);
        for _ in 0..15 {
            nav.next();
        }
        assert_eq!(nav.current_page(), 9);
        assert!(!nav.next());
    }

    #[test]
    fn previous_is_clamped_at_first_page() {
        let mut nav = Navigation::new(3);
        assert!(!nav.previous());
        assert_eq!(nav.current_page(), 0);
    }

    #[test]
    fn next_then_previous_restores_state() {
        let mut nav = Navigation::new(5);
        nav.next();
        nav.zoom_in();
        let before = nav;
        nav.next();
        nav.previous();
        assert_eq!(nav, before);
    }

    #[test]
    fn zoom_never_leaves_bounds() {
        let mut nav = Navigation::new(1);
        while nav.zoom_out() {}
        assert_eq!(nav.zoom(), Zoom::MIN);
        for _ in 0..8 {
            nav.zoom_in();
            assert!(nav.zoom().factor() <= 4.0);
        }
        assert_eq!(nav.zoom(), Zoom::MAX);
        assert_eq!(nav.zoom().factor(), 4.0);
        for _ in 0..8 {
            nav.zoom_out();
            assert!(nav.zoom().factor() >= 0.5);
        }
        assert_eq!(nav.zoom().factor(), 0.5);
    }

    #[test]
    fn zoom_moves_in_half_steps() {
        let mut nav = Navigation::new(1);
        nav.zoom_in();
        assert_eq!(nav.zoom().factor(), 2.5);
        nav.zoom_out();
        nav.zoom_out();
        assert_eq!(nav.zoom().factor(), 1.5);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut nav = Navigation::new(10);
        nav.next();
        nav.next();
        nav.zoom_in();
        nav.reset(4);
        assert_eq!(nav, Navigation::new(4));
        assert_eq!(nav.total_pages(), 4);
    }

    #[test]
    fn empty_document_never_moves() {
        let mut nav = Navigation::new(0);
        assert!(!nav.next());
        assert!(!nav.previous());
        assert_eq!(nav.label(), "Página 0 de 0");
    }

    #[test]
    fn label_is_one_based() {
        let mut nav = Navigation::new(12);
        nav.next();
        assert_eq!(nav.label(), "Página 2 de 12");
    }
}

//! Telas do aplicativo e histórico de navegação entre elas

use crate::locations::LocationKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Main,
    MapSelection,
    BookMap,
    AuthorMap,
    LocationDetail { kind: LocationKind, id: String },
    About,
    Reader,
}

/// Pilha explícita de telas; `back` sempre tem para onde voltar
#[derive(Debug, Clone)]
pub struct ScreenStack {
    current: Screen,
    history: Vec<Screen>,
}

impl Default for ScreenStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenStack {
    pub fn new() -> Self {
        Self {
            current: Screen::Main,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &Screen {
        &self.current
    }

    /// Abre `screen`, guardando a atual no histórico. Retorna a tela deixada.
    pub fn push(&mut self, screen: Screen) -> Screen {
        let left = std::mem::replace(&mut self.current, screen);
        self.history.push(left.clone());
        left
    }

    /// Volta à tela anterior (ou à principal). Retorna a tela deixada.
    pub fn back(&mut self) -> Screen {
        let previous = self.history.pop().unwrap_or(Screen::Main);
        std::mem::replace(&mut self.current, previous)
    }

    /// Volta direto à tela principal, limpando o histórico
    pub fn home(&mut self) -> Screen {
        self.history.clear();
        std::mem::replace(&mut self.current, Screen::Main)
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_returns_to_the_map_that_opened_the_detail() {
        let mut stack = ScreenStack::new();
        stack.push(Screen::MapSelection);
        stack.push(Screen::AuthorMap);
        stack.push(Screen::LocationDetail {
            kind: LocationKind::Author,
            id: "messejana".into(),
        });

        stack.back();
        assert_eq!(stack.current(), &Screen::AuthorMap);
        stack.back();
        assert_eq!(stack.current(), &Screen::MapSelection);
    }

    #[test]
    fn back_on_empty_history_goes_home() {
        let mut stack = ScreenStack::new();
        let left = stack.back();
        assert_eq!(left, Screen::Main);
        assert_eq!(stack.current(), &Screen::Main);
    }

    #[test]
    fn push_reports_left_screen() {
        let mut stack = ScreenStack::new();
        stack.push(Screen::Reader);
        let left = stack.push(Screen::About);
        assert_eq!(left, Screen::Reader);
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn home_clears_history() {
        let mut stack = ScreenStack::new();
        stack.push(Screen::MapSelection);
        stack.push(Screen::BookMap);
        let left = stack.home();
        assert_eq!(left, Screen::BookMap);
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.current(), &Screen::Main);
    }
}

//! Iracema - leitor ilustrado do romance de José de Alencar
//!
//! Núcleo do leitor: rasterização de páginas, navegação, ajuste à tela e
//! localização do PDF. A interface gráfica fica no binário.

pub mod config;
pub mod discovery;
pub mod error;
pub mod export;
pub mod layout;
pub mod locations;
pub mod navigation;
pub mod notice;
pub mod page_source;
pub mod pdf_processor;
pub mod screens;
pub mod session;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use error::{ReaderError, Result};

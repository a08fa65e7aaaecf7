//! Locais do livro e da biografia do autor, lidos de um arquivo JSON
//!
//! O conteúdo fica fora do código: editar um texto não toca na renderização.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

use crate::error::{ReaderError, Result};

const DEFAULT_TABLE: &str = include_str!("../assets/locations.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationKind {
    Book,
    Author,
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationKind::Book => write!(f, "livro"),
            LocationKind::Author => write!(f, "autor"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LocationRecord {
    pub id: String,
    /// Texto do marcador no mapa
    pub label: String,
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    pub description: String,
    pub reference: String,
    #[serde(rename = "image", default)]
    pub image_path: Option<PathBuf>,
}

impl LocationRecord {
    pub fn position(&self) -> GeoPoint {
        GeoPoint {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapData {
    pub center: GeoPoint,
    pub locations: Vec<LocationRecord>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LocationTable {
    book: MapData,
    author: MapData,
}

impl LocationTable {
    /// Tabela embutida no executável
    pub fn embedded() -> Result<Self> {
        Self::from_json(DEFAULT_TABLE)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let table = Self::from_json(&json)?;
        info!("Tabela de locais carregada de {}", path.display());
        Ok(table)
    }

    pub fn map(&self, kind: LocationKind) -> &MapData {
        match kind {
            LocationKind::Book => &self.book,
            LocationKind::Author => &self.author,
        }
    }

    /// Marcadores na ordem do arquivo
    pub fn markers(&self, kind: LocationKind) -> &[LocationRecord] {
        &self.map(kind).locations
    }

    pub fn lookup(&self, kind: LocationKind, id: &str) -> Result<&LocationRecord> {
        self.markers(kind)
            .iter()
            .find(|record| record.id == id)
            .ok_or_else(|| ReaderError::LocationNotFound {
                kind,
                id: id.to_string(),
            })
    }
}

/// Identificador de um marcador: minúsculas, espaços viram `_`
pub fn location_id(label: &str) -> String {
    label.to_lowercase().replace(' ', "_")
}

/// Janela geográfica de um mapa, usada para posicionar os marcadores num retângulo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl MapBounds {
    const MIN_SPAN_DEG: f64 = 0.5;
    const PADDING: f64 = 0.15;

    /// Caixa que contém o centro e todos os marcadores, com folga nas bordas
    pub fn around(map: &MapData) -> Self {
        let mut bounds = Self {
            min_lat: map.center.lat,
            max_lat: map.center.lat,
            min_lon: map.center.lon,
            max_lon: map.center.lon,
        };
        for record in &map.locations {
            bounds.min_lat = bounds.min_lat.min(record.lat);
            bounds.max_lat = bounds.max_lat.max(record.lat);
            bounds.min_lon = bounds.min_lon.min(record.lon);
            bounds.max_lon = bounds.max_lon.max(record.lon);
        }

        let lat_pad = ((bounds.max_lat - bounds.min_lat) * Self::PADDING).max(Self::MIN_SPAN_DEG / 2.0);
        let lon_pad = ((bounds.max_lon - bounds.min_lon) * Self::PADDING).max(Self::MIN_SPAN_DEG / 2.0);
        bounds.min_lat -= lat_pad;
        bounds.max_lat += lat_pad;
        bounds.min_lon -= lon_pad;
        bounds.max_lon += lon_pad;
        bounds
    }

    /// Projeção equiretangular em coordenadas normalizadas: (0, 0) no canto noroeste
    pub fn project(&self, point: GeoPoint) -> (f32, f32) {
        let x = (point.lon - self.min_lon) / (self.max_lon - self.min_lon);
        let y = (self.max_lat - point.lat) / (self.max_lat - self.min_lat);
        (x as f32, y as f32)
    }
}

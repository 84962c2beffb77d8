//! Types d'erreurs de la conversion

use std::path::PathBuf;

use thiserror::Error;

use crate::crs::Crs;

/// Erreurs pouvant interrompre une conversion.
///
/// Toutes sont fatales: la conversion est abandonnée et aucun fichier
/// partiel n'est laissé à la destination.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Aucune transformation utilisable entre le SCR source et le SCR cible
    #[error("Unsupported CRS transformation {from} -> {to}: {reason}")]
    UnsupportedCrs { from: String, to: String, reason: String },

    /// Identifiant de SCR illisible
    #[error("Invalid CRS identifier: {0}")]
    InvalidCrs(String),

    /// Destination impossible à ouvrir ou à écrire
    #[error("Cannot write output {}: {source}", .path.display())]
    SinkUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Entrée illisible ou invalide
    #[error("Invalid input {}: {reason}", .path.display())]
    InvalidInput { path: PathBuf, reason: String },

    /// Échec de la transformation d'une géométrie
    #[error("Geometry transformation failed for feature {index}: {reason}")]
    Transform { index: usize, reason: String },

    /// Erreur d'encodage du document
    #[error(transparent)]
    Encode(#[from] isoxml::IsoxmlError),

    /// Annulation demandée par l'appelant
    #[error("Conversion cancelled")]
    Cancelled,
}

impl ConvertError {
    /// Crée une erreur de SCR non supporté
    pub fn unsupported_crs(from: &Crs, to: &Crs, reason: impl Into<String>) -> Self {
        Self::UnsupportedCrs {
            from: from.to_string(),
            to: to.to_string(),
            reason: reason.into(),
        }
    }

    /// Crée une erreur d'entrée invalide
    pub fn invalid_input(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Crée une erreur de destination
    pub fn sink(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SinkUnavailable {
            path: path.into(),
            source,
        }
    }
}

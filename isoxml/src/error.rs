//! Types d'erreurs pour le crate isoxml

use thiserror::Error;

/// Erreurs pouvant survenir lors de l'écriture ou de la lecture d'un TASKDATA
#[derive(Debug, Error)]
pub enum IsoxmlError {
    /// Erreur d'I/O sur le flux de sortie
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Erreur remontée par quick-xml
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Attribut XML illisible
    #[error("Invalid XML attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// Sortie non UTF-8
    #[error("Invalid UTF-8 in task data: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Structure de document non conforme au sous-ensemble ISO 11783 supporté
    #[error("Invalid task data at <{element}>: {reason}")]
    InvalidDocument { element: String, reason: String },

    /// Attribut obligatoire absent
    #[error("Missing attribute {attribute} on <{element}>")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
}

impl IsoxmlError {
    /// Crée une erreur de structure avec contexte
    pub fn invalid_document(element: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            element: element.into(),
            reason: reason.into(),
        }
    }
}

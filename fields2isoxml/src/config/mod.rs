//! Configuration de la conversion
//!
//! Ordre de priorité: options CLI > fichier JSON (`--config`) > variables
//! d'environnement > valeurs par défaut.

use std::path::Path;

use anyhow::{Context, Result};
use isoxml::{DocumentHeader, SerializeOptions, TaskDataEncoder};
use serde::{Deserialize, Serialize};

/// Fabricant déclaré dans l'en-tête du document
pub const DEFAULT_MANUFACTURER: &str = "fields2isoxml";

/// Attribut GeoJSON portant le nom des parcelles
pub const DEFAULT_NAME_ATTRIBUTE: &str = "Name";

/// Configuration principale
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Attribut lu pour le designator de chaque parcelle
    pub name_attribute: String,

    /// Préfixe des designators par défaut (`Feld-0`, `Feld-1`...)
    pub designator_prefix: String,

    /// Attribut MSM de l'élément racine
    pub manufacturer: String,

    /// Attribut MSV de l'élément racine
    pub software_version: String,

    /// Indentation de la sortie (aucune par défaut)
    pub indent: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name_attribute: DEFAULT_NAME_ATTRIBUTE.to_string(),
            designator_prefix: TaskDataEncoder::DEFAULT_DESIGNATOR_PREFIX.to_string(),
            manufacturer: DEFAULT_MANUFACTURER.to_string(),
            software_version: env!("CARGO_PKG_VERSION").to_string(),
            indent: None,
        }
    }
}

/// Fichier de configuration: toutes les clés sont optionnelles
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    name_attribute: Option<String>,
    designator_prefix: Option<String>,
    manufacturer: Option<String>,
    software_version: Option<String>,
    indent: Option<usize>,
}

impl Config {
    /// Valeurs par défaut surchargées par l'environnement
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Comme [`Config::from_env`], avec une source de variables arbitraire
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            name_attribute: lookup("ISOXML_NAME_ATTRIBUTE").unwrap_or(defaults.name_attribute),
            manufacturer: lookup("ISOXML_MANUFACTURER").unwrap_or(defaults.manufacturer),
            software_version: lookup("ISOXML_SOFTWARE_VERSION")
                .unwrap_or(defaults.software_version),
            ..defaults
        }
    }

    /// Charge l'environnement puis, si fourni, le fichier JSON
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = Self::from_env();
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .context(format!("Failed to read config file: {}", path.display()))?;
                config.merge_json(&content)
            }
            None => Ok(config),
        }
    }

    /// Applique les clés présentes d'un document JSON
    pub fn merge_json(mut self, json: &str) -> Result<Self> {
        let file: ConfigFile =
            serde_json::from_str(json).context("Failed to parse config JSON")?;

        if let Some(v) = file.name_attribute {
            self.name_attribute = v;
        }
        if let Some(v) = file.designator_prefix {
            self.designator_prefix = v;
        }
        if let Some(v) = file.manufacturer {
            self.manufacturer = v;
        }
        if let Some(v) = file.software_version {
            self.software_version = v;
        }
        if file.indent.is_some() {
            self.indent = file.indent;
        }
        Ok(self)
    }

    pub fn header(&self) -> DocumentHeader {
        DocumentHeader::new(self.manufacturer.clone(), self.software_version.clone())
    }

    pub fn encoder(&self) -> TaskDataEncoder {
        TaskDataEncoder::new(self.header()).with_designator_prefix(self.designator_prefix.clone())
    }

    pub fn serialize_options(&self) -> SerializeOptions {
        SerializeOptions {
            indent: self.indent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert_eq!(config.name_attribute, "Name");
        assert_eq!(config.designator_prefix, "Feld");
        assert_eq!(config.indent, None);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("ISOXML_MANUFACTURER", "Acme FMIS"),
            ("ISOXML_SOFTWARE_VERSION", "2.1"),
            ("ISOXML_NAME_ATTRIBUTE", "Schlag"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.manufacturer, "Acme FMIS");
        assert_eq!(config.software_version, "2.1");
        assert_eq!(config.name_attribute, "Schlag");

        let header = config.header();
        assert_eq!(header.manufacturer, "Acme FMIS");
        assert_eq!(header.software_version, "2.1");
    }

    #[test]
    fn test_file_overrides_env() {
        let config = Config::from_lookup(|key| {
            (key == "ISOXML_MANUFACTURER").then(|| "from env".to_string())
        })
        .merge_json(r#"{"manufacturer": "from file", "indent": 2}"#)
        .unwrap();

        assert_eq!(config.manufacturer, "from file");
        assert_eq!(config.indent, Some(2));
        assert_eq!(config.serialize_options().indent, Some(2));
        assert_eq!(config.name_attribute, "Name");
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::default().merge_json(r#"{"srid": 2154}"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"designator_prefix": "Field"}"#).unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.designator_prefix, "Field");
        assert_eq!(config.encoder().designator(0, None), "Field-0");

        assert!(Config::load(Some(&dir.path().join("missing.json"))).is_err());
    }
}

//! Identifiants de systèmes de coordonnées de référence
//!
//! Un [`Crs`] est normalisé sous la forme `AUTORITÉ:CODE` (`EPSG:4326`,
//! `OGC:CRS84`). La comparaison est stricte sur cet identifiant.

use std::fmt;
use std::str::FromStr;

use crate::ConvertError;

/// Code EPSG du WGS84 géographique
pub const WGS84_EPSG: u32 = 4326;

/// Système de coordonnées de référence identifié par autorité et code
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Crs {
    authority: String,
    code: String,
}

impl Crs {
    /// SCR EPSG
    pub fn epsg(code: u32) -> Self {
        Self {
            authority: "EPSG".to_string(),
            code: code.to_string(),
        }
    }

    /// WGS84 (EPSG:4326), le SCR canonique des fichiers TASKDATA
    pub fn wgs84() -> Self {
        Self::epsg(WGS84_EPSG)
    }

    /// OGC:CRS84 (WGS84 longitude/latitude, SCR par défaut de GeoJSON)
    pub fn crs84() -> Self {
        Self {
            authority: "OGC".to_string(),
            code: "CRS84".to_string(),
        }
    }

    /// Longitude/latitude WGS84 (EPSG:4326 ou OGC:CRS84): mêmes coordonnées
    /// sous deux identifiants
    pub fn is_wgs84_lon_lat(&self) -> bool {
        self.epsg_code() == Some(WGS84_EPSG)
            || (self.authority == "OGC" && self.code == "CRS84")
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Code EPSG numérique si l'autorité est EPSG
    pub fn epsg_code(&self) -> Option<u32> {
        if self.authority == "EPSG" {
            self.code.parse().ok()
        } else {
            None
        }
    }

    /// Identifiant normalisé `AUTORITÉ:CODE`
    pub fn authid(&self) -> String {
        format!("{}:{}", self.authority, self.code)
    }

    /// Parse un identifiant de SCR.
    ///
    /// Formats acceptés: `EPSG:2154`, `2154`, `urn:ogc:def:crs:EPSG::2154`,
    /// `urn:ogc:def:crs:OGC:1.3:CRS84`, `http://www.opengis.net/def/crs/EPSG/0/2154`.
    pub fn parse(value: &str) -> Result<Self, ConvertError> {
        let trimmed = value.trim();
        let invalid = || ConvertError::InvalidCrs(value.to_string());

        let (authority, code) = if let Some(rest) = strip_prefix_ignore_case(trimmed, "urn:ogc:def:crs:")
        {
            // AUTORITÉ:[VERSION]:CODE
            let parts: Vec<&str> = rest.split(':').collect();
            match parts.as_slice() {
                [authority, code] | [authority, _, code] => (*authority, *code),
                _ => return Err(invalid()),
            }
        } else if let Some(rest) =
            strip_prefix_ignore_case(trimmed, "http://www.opengis.net/def/crs/")
        {
            // AUTORITÉ/VERSION/CODE
            let parts: Vec<&str> = rest.split('/').collect();
            match parts.as_slice() {
                [authority, _, code] => (*authority, *code),
                _ => return Err(invalid()),
            }
        } else if let Some((authority, code)) = trimmed.split_once(':') {
            (authority, code)
        } else if trimmed.chars().all(|c| c.is_ascii_digit()) && !trimmed.is_empty() {
            ("EPSG", trimmed)
        } else {
            return Err(invalid());
        };

        let authority = authority.trim().to_uppercase();
        let code = code.trim().to_uppercase();
        if authority.is_empty() || code.is_empty() {
            return Err(invalid());
        }
        if authority == "EPSG" && code.parse::<u32>().is_err() {
            return Err(invalid());
        }

        Ok(Self { authority, code })
    }
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    if value.len() >= prefix.len()
        && value.is_char_boundary(prefix.len())
        && value[..prefix.len()].eq_ignore_ascii_case(prefix)
    {
        Some(&value[prefix.len()..])
    } else {
        None
    }
}

impl FromStr for Crs {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.authority, self.code)
    }
}

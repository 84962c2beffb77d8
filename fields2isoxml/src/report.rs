//! Rapport de conversion
//!
//! Collecte les compteurs et les avertissements d'une conversion pour
//! l'affichage console et l'export JSON (`--report`).

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

/// Statut global de la conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConversionStatus {
    /// Au moins une parcelle écrite
    Success,
    /// Document écrit sans aucune parcelle
    Empty,
    /// Annulée avant l'écriture
    Cancelled,
    /// Abandonnée sur erreur
    Failed,
}

/// Avertissement non bloquant, rattaché à une feature
#[derive(Debug, Clone, Serialize)]
pub struct ConversionWarning {
    /// Position de la feature dans l'entrée
    pub index: usize,
    pub message: String,
}

/// Rapport complet de conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub input: String,
    pub output: String,
    pub source_crs: String,
    pub target_crs: String,
    /// Reprojection appliquée
    pub transformed: bool,
    /// Implémentation de la reprojection (`none`, `lite`, `proj`...)
    pub reprojector: String,
    pub status: ConversionStatus,
    pub duration_secs: f64,

    /// Features lues dans l'entrée
    pub features_read: usize,
    /// Éléments PFD écrits
    pub partfields_written: usize,
    /// Features sans géométrie
    pub features_skipped: usize,
    /// Éléments PNT écrits
    pub points_written: usize,
    /// Taille du fichier écrit
    pub bytes_written: u64,

    pub warnings: Vec<ConversionWarning>,
    /// Message de l'erreur fatale, le cas échéant
    pub error: Option<String>,
}

impl Default for ConversionReport {
    fn default() -> Self {
        Self {
            input: String::new(),
            output: String::new(),
            source_crs: String::new(),
            target_crs: String::new(),
            transformed: false,
            reprojector: "none".to_string(),
            status: ConversionStatus::Success,
            duration_secs: 0.0,
            features_read: 0,
            partfields_written: 0,
            features_skipped: 0,
            points_written: 0,
            bytes_written: 0,
            warnings: Vec::new(),
            error: None,
        }
    }
}

impl ConversionReport {
    pub fn new(input: &str, output: &str) -> Self {
        Self {
            input: input.to_string(),
            output: output.to_string(),
            ..Default::default()
        }
    }

    /// Enregistre une parcelle écrite et ses points
    pub fn record_partfield(&mut self, points: usize) {
        self.features_read += 1;
        self.partfields_written += 1;
        self.points_written += points;
    }

    /// Enregistre une feature ignorée (géométrie absente)
    pub fn record_skipped(&mut self) {
        self.features_read += 1;
        self.features_skipped += 1;
    }

    pub fn record_warning(&mut self, index: usize, message: impl Into<String>) {
        self.warnings.push(ConversionWarning {
            index,
            message: message.into(),
        });
    }

    /// Marque la conversion comme échouée
    pub fn record_failure(&mut self, error: &crate::ConvertError) {
        self.status = match error {
            crate::ConvertError::Cancelled => ConversionStatus::Cancelled,
            _ => ConversionStatus::Failed,
        };
        self.error = Some(error.to_string());
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Détermine le statut final d'une conversion terminée
    pub fn finalize(&mut self) {
        if self.error.is_some() {
            return;
        }
        self.status = if self.partfields_written > 0 {
            ConversionStatus::Success
        } else {
            ConversionStatus::Empty
        };
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("CONVERSION REPORT - {}", self.input);
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);
        println!("Output: {}", self.output);

        println!("\n--- CRS ---");
        println!("Source: {}", self.source_crs);
        println!("Target: {}", self.target_crs);
        if self.transformed {
            println!("Reprojected with: {}", self.reprojector);
        }

        println!("\n--- SUMMARY ---");
        println!(
            "Features: {} read, {} written, {} skipped",
            self.features_read, self.partfields_written, self.features_skipped
        );
        println!(
            "Points: {} ({} bytes)",
            self.points_written, self.bytes_written
        );

        if !self.warnings.is_empty() {
            println!("\n--- WARNINGS ({}) ---", self.warnings.len());
            for w in self.warnings.iter().take(10) {
                println!("  [feature {}] {}", w.index, w.message);
            }
            if self.warnings.len() > 10 {
                println!("  ... and {} more", self.warnings.len() - 10);
            }
        }

        if let Some(ref error) = self.error {
            println!("\n--- ERROR ---");
            println!("  {}", error);
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{}: {} partfields, {} points, {} skipped, {} warnings",
            self.output,
            self.partfields_written,
            self.points_written,
            self.features_skipped,
            self.warnings.len()
        )
    }
}

//! Conversion d'une source de features en fichier TASKDATA
//!
//! Déroulé d'une conversion:
//! 1. contrôle du SCR source par le [`ReferenceSystemGate`]
//! 2. ouverture de la destination (fichier temporaire)
//! 3. encodage des features en une passe, avec progression et annulation
//! 4. écriture unique du document puis renommage atomique

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use geo::Geometry;
use isoxml::{SerializeOptions, TaskData, TaskDataEncoder};
use tracing::{info, warn};

use crate::config::Config;
use crate::export::OutputSink;
use crate::gate::{ReferenceSystemGate, ReprojectionService};
use crate::report::ConversionReport;
use crate::source::FeatureSource;
use crate::ConvertError;

/// Signal d'annulation partagé entre l'appelant et la conversion
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Pilote d'une conversion
#[derive(Debug, Clone)]
pub struct Converter {
    encoder: TaskDataEncoder,
    gate: ReferenceSystemGate,
    options: SerializeOptions,
}

impl Converter {
    pub fn new(config: &Config) -> Self {
        Self {
            encoder: config.encoder(),
            gate: ReferenceSystemGate::default(),
            options: config.serialize_options(),
        }
    }

    pub fn encoder(&self) -> &TaskDataEncoder {
        &self.encoder
    }

    pub fn gate(&self) -> &ReferenceSystemGate {
        &self.gate
    }

    /// Construit le document en mémoire sans l'écrire.
    ///
    /// `progress` reçoit une valeur de 0 à 100. L'annulation est vérifiée
    /// avant chaque feature.
    pub fn build_document<S>(
        &self,
        source: S,
        service: &dyn ReprojectionService,
        progress: &mut dyn FnMut(u8),
        cancel: &CancellationToken,
        report: &mut ConversionReport,
    ) -> Result<TaskData, ConvertError>
    where
        S: FeatureSource,
    {
        report.source_crs = source.source_crs().to_string();
        report.target_crs = self.gate.target().to_string();

        let decision = self.gate.open(source.source_crs(), service)?;
        report.transformed = decision.changes_coordinates();
        report.reprojector = decision.description().to_string();

        let count = source.feature_count().unwrap_or(0);
        let mut doc = self.encoder.new_document();
        let mut features = decision.reproject(source.into_features());

        for index in 0.. {
            // Aucune feature n'est lue après l'annulation
            if cancel.is_cancelled() {
                info!(index, "Conversion cancelled");
                return Err(ConvertError::Cancelled);
            }
            let Some(feature) = features.next() else {
                break;
            };

            let feature = feature?;
            if let Some(kind) = feature.geometry.as_ref().and_then(non_polygonal) {
                warn!(index, geometry = kind, "Non-polygonal geometry encoded as boundary");
                report.record_warning(index, format!("{} geometry encoded as boundary", kind));
            }

            if self.encoder.append_feature(&mut doc, index, &feature) {
                let points = doc.partfields.last().map_or(0, |p| p.point_count());
                report.record_partfield(points);
            } else {
                report.record_skipped();
            }

            if count > 0 {
                progress((index * 100 / count).min(100) as u8);
            }
        }

        progress(100);
        Ok(doc)
    }

    /// Convertit `source` et écrit le document dans `sink_path`.
    ///
    /// En cas d'erreur ou d'annulation, aucun fichier n'est créé à la
    /// destination.
    pub fn run<S, P>(
        &self,
        source: S,
        service: &dyn ReprojectionService,
        sink_path: &Path,
        progress: P,
        cancel: &CancellationToken,
    ) -> Result<ConversionReport, ConvertError>
    where
        S: FeatureSource,
        P: FnMut(u8),
    {
        let mut report = ConversionReport::default();
        self.run_into(source, service, sink_path, progress, cancel, &mut report)?;
        Ok(report)
    }

    /// Comme [`Converter::run`], en remplissant `report` y compris en cas
    /// d'échec: compteurs atteints, SCR, statut et message d'erreur.
    pub fn run_into<S, P>(
        &self,
        source: S,
        service: &dyn ReprojectionService,
        sink_path: &Path,
        mut progress: P,
        cancel: &CancellationToken,
        report: &mut ConversionReport,
    ) -> Result<(), ConvertError>
    where
        S: FeatureSource,
        P: FnMut(u8),
    {
        let start = Instant::now();
        report.output = sink_path.display().to_string();

        let result = self.write_document(source, service, sink_path, &mut progress, cancel, report);
        report.set_duration(start.elapsed());

        match result {
            Ok(bytes) => {
                report.bytes_written = bytes;
                report.finalize();
                info!("{}", report.summary());
                Ok(())
            }
            Err(e) => {
                report.record_failure(&e);
                Err(e)
            }
        }
    }

    fn write_document<S>(
        &self,
        source: S,
        service: &dyn ReprojectionService,
        sink_path: &Path,
        progress: &mut dyn FnMut(u8),
        cancel: &CancellationToken,
        report: &mut ConversionReport,
    ) -> Result<u64, ConvertError>
    where
        S: FeatureSource,
    {
        let sink = OutputSink::create(sink_path)?;
        let doc = self.build_document(source, service, progress, cancel, report)?;

        info!(
            partfields = doc.partfields.len(),
            points = doc.point_count(),
            "Writing TASKDATA file"
        );
        sink.commit(&doc, self.options)
    }
}

/// Nom du type de géométrie s'il n'est pas surfacique
fn non_polygonal(geometry: &Geometry) -> Option<&'static str> {
    match geometry {
        Geometry::Polygon(_) | Geometry::MultiPolygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => {
            None
        }
        Geometry::Point(_) => Some("Point"),
        Geometry::Line(_) => Some("Line"),
        Geometry::LineString(_) => Some("LineString"),
        Geometry::MultiPoint(_) => Some("MultiPoint"),
        Geometry::MultiLineString(_) => Some("MultiLineString"),
        Geometry::GeometryCollection(_) => Some("GeometryCollection"),
    }
}

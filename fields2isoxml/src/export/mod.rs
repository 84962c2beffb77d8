//! Sorties de la conversion (fichier TASKDATA, reprojection PROJ)

#[cfg(feature = "reproject")]
pub mod reproject;
pub mod sink;

#[cfg(feature = "reproject")]
pub use reproject::Reprojector;
pub use sink::OutputSink;

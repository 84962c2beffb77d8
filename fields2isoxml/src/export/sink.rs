//! Écriture atomique du fichier TASKDATA
//!
//! Le document est écrit dans un fichier temporaire du répertoire de
//! destination puis renommé. Une conversion interrompue ne laisse donc
//! jamais de fichier partiel à la destination.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use isoxml::{IsoxmlError, SerializeOptions, TaskData};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::ConvertError;

/// Destination du document, ouverte avant l'encodage
#[derive(Debug)]
pub struct OutputSink {
    path: PathBuf,
    temp: NamedTempFile,
}

impl OutputSink {
    /// Ouvre un fichier temporaire à côté de `path`
    pub fn create(path: &Path) -> Result<Self, ConvertError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let temp = tempfile::Builder::new()
            .prefix(".taskdata-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| ConvertError::sink(path, e))?;

        debug!(temp = %temp.path().display(), "Output sink opened");

        Ok(Self {
            path: path.to_path_buf(),
            temp,
        })
    }

    /// Chemin final du document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sérialise le document en une seule écriture puis le publie
    /// à la destination. Retourne la taille écrite en octets.
    pub fn commit(mut self, doc: &TaskData, options: SerializeOptions) -> Result<u64, ConvertError> {
        let path = self.path.clone();

        let writer = BufWriter::new(self.temp.as_file_mut());
        isoxml::serialize_with(doc, writer, options).map_err(|e| match e {
            IsoxmlError::Io(io) => ConvertError::sink(&path, io),
            other => ConvertError::Encode(other),
        })?;

        let file = self.temp.as_file();
        file.sync_all().map_err(|e| ConvertError::sink(&path, e))?;
        let size = file.metadata().map_err(|e| ConvertError::sink(&path, e))?.len();

        self.temp
            .persist(&path)
            .map_err(|e| ConvertError::sink(&path, e.error))?;

        debug!(path = %path.display(), bytes = size, "Output written");
        Ok(size)
    }
}

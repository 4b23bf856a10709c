//! Loading a [`RailNetwork`] from persisted artefacts.
//!
//! Two interchangeable sources are supported, both revalidated through
//! [`Line::new`] and [`RailNetwork::build`] on the way in so persisted data
//! can never bypass the geometry invariants:
//!
//! - a read-only SQLite database with one row per line and a JSON vertex
//!   payload ([`load_network`] / [`write_network`]);
//! - a packed binary snapshot with a magic header and format version
//!   ([`load_snapshot`] / [`write_snapshot`]).

mod snapshot;
mod sqlite;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Elr, ElrError, Line, LineError, NetworkError, Vertex};

pub use snapshot::{SNAPSHOT_VERSION, load_snapshot, write_snapshot};
pub use sqlite::{load_network, write_network};

/// One line as persisted: the code plus `[easting, northing, chainage]`
/// triples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct LineRecord {
    pub(crate) elr: String,
    pub(crate) vertices: Vec<[f64; 3]>,
}

impl From<&Line> for LineRecord {
    fn from(line: &Line) -> Self {
        Self {
            elr: line.elr().as_str().to_owned(),
            vertices: line
                .vertices()
                .iter()
                .map(|v| [v.coord.x, v.coord.y, v.chainage])
                .collect(),
        }
    }
}

impl LineRecord {
    /// Revalidates a persisted record into a [`Line`].
    pub(crate) fn into_line(self) -> Result<Line, NetworkStoreError> {
        let elr = Elr::new(&self.elr).map_err(|source| NetworkStoreError::InvalidElr {
            code: self.elr.clone(),
            source,
        })?;
        let vertices = self
            .vertices
            .into_iter()
            .map(|[x, y, chainage]| Vertex::new(geo::Coord { x, y }, chainage))
            .collect();
        Ok(Line::new(elr, vertices)?)
    }
}

/// Errors raised while loading a persisted network.
#[derive(Debug, Error)]
pub enum NetworkStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open network database at {path}: {source}")]
    OpenDatabase {
        /// Location of the database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Generic SQLite error while reading line rows.
    #[error("database error: {source}")]
    Database {
        /// Source error raised by the SQLite driver.
        #[from]
        source: rusqlite::Error,
    },
    /// A row's vertex payload was not valid JSON.
    #[error("failed to parse vertices for line {elr}: {source}")]
    InvalidVertices {
        /// ELR of the offending row.
        elr: String,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// A persisted ELR code failed validation.
    #[error("invalid ELR code {code:?} in network data: {source}")]
    InvalidElr {
        /// The rejected code.
        code: String,
        /// Validation failure.
        #[source]
        source: ElrError,
    },
    /// Persisted geometry failed line validation.
    #[error(transparent)]
    InvalidLine(#[from] LineError),
    /// The revalidated lines failed network construction.
    #[error(transparent)]
    Network(#[from] NetworkError),
    /// Reading the snapshot file failed.
    #[error("failed to read network snapshot from {path}: {source}")]
    SnapshotIo {
        /// Location of the snapshot artefact.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The snapshot file did not start with the expected header.
    #[error("invalid network snapshot magic: expected {expected:?}, found {found:?}")]
    InvalidSnapshotMagic {
        /// Expected byte sequence identifying a snapshot file.
        expected: [u8; 4],
        /// Sequence read from the file.
        found: [u8; 4],
    },
    /// The snapshot was written by an unsupported format version.
    #[error("unsupported network snapshot version {found}; supported version is {supported}")]
    UnsupportedSnapshotVersion {
        /// Version present in the file header.
        found: u16,
        /// Latest version supported by this binary.
        supported: u16,
    },
    /// The snapshot payload could not be decoded.
    #[error("failed to decode network snapshot from {path}: {source}")]
    SnapshotDecode {
        /// Location of the snapshot artefact.
        path: PathBuf,
        /// Decoder error returned by `bincode`.
        #[source]
        source: bincode::Error,
    },
}

/// Errors raised while persisting a network artefact.
#[derive(Debug, Error)]
pub enum NetworkWriteError {
    /// Writing bytes to disk failed.
    #[error("failed to write network artefact to {path}: {source}")]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The in-memory representation could not be encoded.
    #[error("failed to encode network artefact for {path}: {source}")]
    Encode {
        /// Destination path.
        path: PathBuf,
        /// Encoder failure from `bincode`.
        #[source]
        source: bincode::Error,
    },
    /// A vertex payload could not be rendered as JSON.
    #[error("failed to encode vertices for line {elr}: {source}")]
    EncodeVertices {
        /// ELR of the offending line.
        elr: String,
        /// JSON encoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// A database write failed.
    #[error("database error: {source}")]
    Database {
        /// Source error raised by the SQLite driver.
        #[from]
        source: rusqlite::Error,
    },
}

//! SQLite-backed network loading.
//!
//! The database holds one row per line: the ELR code and a JSON array of
//! `[easting, northing, chainage]` triples. Rows are revalidated through
//! the normal constructors on the way in.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use super::{LineRecord, NetworkStoreError, NetworkWriteError};
use crate::RailNetwork;

/// Loads and revalidates a network from a SQLite database.
///
/// The database is opened read-only; the engine never writes to its source
/// data.
///
/// # Errors
/// Returns [`NetworkStoreError`] when the database cannot be opened or
/// queried, a vertex payload is not valid JSON, or a row fails geometry
/// validation.
pub fn load_network<P: AsRef<Path>>(path: P) -> Result<RailNetwork, NetworkStoreError> {
    let path = path.as_ref();
    let connection = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|source| NetworkStoreError::OpenDatabase {
            path: path.to_path_buf(),
            source,
        })?;

    let mut statement = connection.prepare("SELECT elr, vertices FROM lines ORDER BY elr")?;
    let mut rows = statement.query([])?;
    let mut lines = Vec::new();
    while let Some(row) = rows.next()? {
        let elr: String = row.get(0)?;
        let payload: String = row.get(1)?;
        let vertices: Vec<[f64; 3]> = serde_json::from_str(&payload).map_err(|source| {
            NetworkStoreError::InvalidVertices {
                elr: elr.clone(),
                source,
            }
        })?;
        lines.push(LineRecord { elr, vertices }.into_line()?);
    }

    if lines.is_empty() {
        log::warn!("network database {} contains no lines", path.display());
    } else {
        log::debug!("loaded {} lines from {}", lines.len(), path.display());
    }
    Ok(RailNetwork::build(lines)?)
}

/// Persists a network to a SQLite database, replacing any existing `lines`
/// table. Intended for preparing fixtures and snapshots, not for runtime
/// use.
///
/// # Errors
/// Returns [`NetworkWriteError`] when table creation or an insert fails.
pub fn write_network<P: AsRef<Path>>(
    path: P,
    network: &RailNetwork,
) -> Result<(), NetworkWriteError> {
    let connection = Connection::open(path.as_ref())?;
    connection.execute("DROP TABLE IF EXISTS lines", [])?;
    connection.execute(
        "CREATE TABLE lines (
            elr TEXT PRIMARY KEY,
            vertices TEXT NOT NULL
        )",
        [],
    )?;
    for line in network.lines() {
        let record = LineRecord::from(line);
        let payload = serde_json::to_string(&record.vertices).map_err(|source| {
            NetworkWriteError::EncodeVertices {
                elr: record.elr.clone(),
                source,
            }
        })?;
        connection.execute(
            "INSERT INTO lines (elr, vertices) VALUES (?1, ?2)",
            rusqlite::params![record.elr, payload],
        )?;
    }
    Ok(())
}

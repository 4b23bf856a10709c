//! Packed binary network snapshots.
//!
//! A snapshot is a bincode payload holding every line record behind a
//! four-byte magic and a format version, so a stale or foreign file is
//! rejected with a typed error rather than a decoder panic deep in the
//! payload.

use std::fs::File;
use std::path::Path;

use bincode::serialize_into;
use serde::{Deserialize, Serialize};

use super::{LineRecord, NetworkStoreError, NetworkWriteError};
use crate::RailNetwork;

/// File identifier for persisted network snapshots.
pub(crate) const SNAPSHOT_MAGIC: [u8; 4] = *b"LRNS";

/// Supported version of the snapshot format.
pub const SNAPSHOT_VERSION: u16 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotFile {
    magic: [u8; 4],
    version: u16,
    lines: Vec<LineRecord>,
}

/// Loads and revalidates a network snapshot.
///
/// # Errors
/// Returns [`NetworkStoreError`] when the file cannot be read, carries the
/// wrong magic or version, fails to decode, or holds geometry that no
/// longer passes validation.
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<RailNetwork, NetworkStoreError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| NetworkStoreError::SnapshotIo {
        path: path.to_path_buf(),
        source,
    })?;

    // Check the header directly before handing the whole payload to the
    // decoder, so a foreign file yields a header error rather than an
    // arbitrary decode failure.
    let mut found = [0_u8; 4];
    let header = bytes.get(..SNAPSHOT_MAGIC.len()).unwrap_or(&bytes);
    found[..header.len()].copy_from_slice(header);
    if found != SNAPSHOT_MAGIC {
        return Err(NetworkStoreError::InvalidSnapshotMagic {
            expected: SNAPSHOT_MAGIC,
            found,
        });
    }
    if let Some(version_bytes) = bytes.get(4..6) {
        let version = u16::from_le_bytes([version_bytes[0], version_bytes[1]]);
        if version != SNAPSHOT_VERSION {
            return Err(NetworkStoreError::UnsupportedSnapshotVersion {
                found: version,
                supported: SNAPSHOT_VERSION,
            });
        }
    }

    let file: SnapshotFile =
        bincode::deserialize(&bytes).map_err(|source| NetworkStoreError::SnapshotDecode {
            path: path.to_path_buf(),
            source,
        })?;

    let lines = file
        .lines
        .into_iter()
        .map(LineRecord::into_line)
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("loaded {} lines from snapshot {}", lines.len(), path.display());
    Ok(RailNetwork::build(lines)?)
}

/// Persists a network as a snapshot artefact.
///
/// # Errors
/// Returns [`NetworkWriteError`] when the file cannot be created, encoded
/// or flushed.
pub fn write_snapshot<P: AsRef<Path>>(
    path: P,
    network: &RailNetwork,
) -> Result<(), NetworkWriteError> {
    let path = path.as_ref();
    let mut file = File::create(path).map_err(|source| NetworkWriteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let payload = SnapshotFile {
        magic: SNAPSHOT_MAGIC,
        version: SNAPSHOT_VERSION,
        lines: network.lines().iter().map(LineRecord::from).collect(),
    };
    serialize_into(&mut file, &payload).map_err(|source| NetworkWriteError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    file.sync_all().map_err(|source| NetworkWriteError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_network;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::TempDir;

    #[rstest]
    fn snapshot_round_trips_the_network() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("network.lrns");
        let network = sample_network();

        write_snapshot(&path, &network).expect("persist snapshot");
        let loaded = load_snapshot(&path).expect("load snapshot");

        assert_eq!(loaded.len(), network.len());
        assert_eq!(loaded.summaries(), network.summaries());
    }

    #[rstest]
    fn rejects_corrupted_magic() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("bogus.lrns");
        std::fs::write(&path, b"BAD!").expect("write corrupt file");

        let error = load_snapshot(&path).expect_err("invalid magic should fail");
        assert!(matches!(
            error,
            NetworkStoreError::InvalidSnapshotMagic { .. }
        ));
    }

    #[rstest]
    fn rejects_unsupported_version() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("future.lrns");
        {
            let mut file = File::create(&path).expect("create snapshot file");
            file.write_all(&SNAPSHOT_MAGIC).expect("write magic");
            let unsupported = SNAPSHOT_VERSION + 1;
            file.write_all(&unsupported.to_le_bytes())
                .expect("write version");
        }

        let error = load_snapshot(&path).expect_err("unsupported version should fail");
        assert!(matches!(
            error,
            NetworkStoreError::UnsupportedSnapshotVersion { found, supported }
                if found == SNAPSHOT_VERSION + 1 && supported == SNAPSHOT_VERSION
        ));
    }

    #[rstest]
    fn rejects_missing_file() {
        let dir = TempDir::new().expect("create temp dir");
        let error = load_snapshot(dir.path().join("absent.lrns"))
            .expect_err("missing file should fail");
        assert!(matches!(error, NetworkStoreError::SnapshotIo { .. }));
    }
}

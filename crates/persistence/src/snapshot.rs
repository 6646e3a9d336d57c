//! Snapshot file format.
//!
//! `[header: 48 bytes][body: JSON TimelineDocument]`. The header carries the
//! body length and its CRC64 so truncation and corruption are caught before
//! the body is parsed.

use crate::document::TimelineDocument;
use crate::error::{PersistenceError, Result};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub magic: [u8; 4],
    pub version: u32,
    pub saved_at: u64,
    pub timeline_len: u32,
    pub pending_len: u32,
    pub checksum: u64,
    pub body_len: u64,
    pub reserved: [u8; 8],
}

impl SnapshotHeader {
    pub const SIZE: usize = 4 + 4 + 8 + 4 + 4 + 8 + 8 + 8; // 48 bytes
    pub const MAGIC: [u8; 4] = *b"GEOT";
    pub const VERSION: u32 = 1;

    pub fn for_body(doc: &TimelineDocument, body: &[u8]) -> Self {
        Self {
            magic: Self::MAGIC,
            version: Self::VERSION,
            saved_at: doc.saved_at,
            timeline_len: doc.timeline.len() as u32,
            pending_len: doc.pending.len() as u32,
            checksum: checksum(body),
            body_len: body.len() as u64,
            reserved: [0; 8],
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..4].copy_from_slice(&self.magic);
        buf[4..8].copy_from_slice(&self.version.to_le_bytes());
        buf[8..16].copy_from_slice(&self.saved_at.to_le_bytes());
        buf[16..20].copy_from_slice(&self.timeline_len.to_le_bytes());
        buf[20..24].copy_from_slice(&self.pending_len.to_le_bytes());
        buf[24..32].copy_from_slice(&self.checksum.to_le_bytes());
        buf[32..40].copy_from_slice(&self.body_len.to_le_bytes());
        buf[40..48].copy_from_slice(&self.reserved);
        buf
    }

    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut buf = [0u8; Self::SIZE];
        reader.read_exact(&mut buf)?;
        Self::from_bytes(&buf)
    }

    pub fn from_bytes(buf: &[u8; Self::SIZE]) -> Result<Self> {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&buf[0..4]);
        if magic != Self::MAGIC {
            return Err(PersistenceError::InvalidMagic);
        }

        let version = u32::from_le_bytes(le4(&buf[4..8]));
        if version != Self::VERSION {
            return Err(PersistenceError::UnsupportedVersion(version));
        }

        let mut reserved = [0u8; 8];
        reserved.copy_from_slice(&buf[40..48]);

        Ok(Self {
            magic,
            version,
            saved_at: u64::from_le_bytes(le8(&buf[8..16])),
            timeline_len: u32::from_le_bytes(le4(&buf[16..20])),
            pending_len: u32::from_le_bytes(le4(&buf[20..24])),
            checksum: u64::from_le_bytes(le8(&buf[24..32])),
            body_len: u64::from_le_bytes(le8(&buf[32..40])),
            reserved,
        })
    }
}

pub fn checksum(body: &[u8]) -> u64 {
    let mut digest = crc64fast::Digest::new();
    digest.write(body);
    digest.sum64()
}

pub fn encode(doc: &TimelineDocument) -> Result<Vec<u8>> {
    let body = serde_json::to_vec(doc)?;
    let header = SnapshotHeader::for_body(doc, &body);
    let mut out = Vec::with_capacity(SnapshotHeader::SIZE + body.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(&body);
    Ok(out)
}

pub fn decode(bytes: &[u8]) -> Result<(SnapshotHeader, TimelineDocument)> {
    if bytes.len() < SnapshotHeader::SIZE {
        return Err(PersistenceError::Truncated {
            expected: SnapshotHeader::SIZE as u64,
            found: bytes.len() as u64,
        });
    }
    let (head, body) = bytes.split_at(SnapshotHeader::SIZE);
    let mut raw = [0u8; SnapshotHeader::SIZE];
    raw.copy_from_slice(head);
    let header = SnapshotHeader::from_bytes(&raw)?;

    if body.len() as u64 != header.body_len {
        return Err(PersistenceError::Truncated {
            expected: header.body_len,
            found: body.len() as u64,
        });
    }

    let found = checksum(body);
    if found != header.checksum {
        return Err(PersistenceError::ChecksumMismatch {
            expected: header.checksum,
            found,
        });
    }

    let doc: TimelineDocument = serde_json::from_slice(body)?;
    if doc.timeline.len() != header.timeline_len as usize || doc.pending.len() != header.pending_len as usize {
        return Err(PersistenceError::InvalidFormat(format!(
            "header claims {} timeline / {} pending samples, body has {} / {}",
            header.timeline_len,
            header.pending_len,
            doc.timeline.len(),
            doc.pending.len()
        )));
    }
    Ok((header, doc))
}

/// Writes through a `.tmp` file and renames it into place. The file being
/// replaced is kept as `.prev`.
pub fn write_to(path: impl AsRef<Path>, doc: &TimelineDocument) -> Result<()> {
    let path = path.as_ref();
    let bytes = encode(doc)?;
    let tmp_path = path.with_extension("tmp");
    {
        let mut file = File::create(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_data()?;
    }

    if path.exists() {
        let prev_path = path.with_extension("prev");
        if let Err(e) = fs::rename(path, &prev_path) {
            tracing::warn!("Could not keep previous snapshot {:?}: {}", prev_path, e);
        }
    }

    fs::rename(tmp_path, path)?;
    Ok(())
}

pub fn read_header(path: impl AsRef<Path>) -> Result<SnapshotHeader> {
    let file = File::open(path)?;
    SnapshotHeader::read_from(file)
}

pub fn read_snapshot(path: impl AsRef<Path>) -> Result<(SnapshotHeader, TimelineDocument)> {
    let bytes = fs::read(path)?;
    decode(&bytes)
}

fn le4(b: &[u8]) -> [u8; 4] {
    let mut out = [0u8; 4];
    out.copy_from_slice(b);
    out
}

fn le8(b: &[u8]) -> [u8; 8] {
    let mut out = [0u8; 8];
    out.copy_from_slice(b);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotrail_kernel::{Origin, Sample};
    use tempfile::tempdir;

    fn doc() -> TimelineDocument {
        let timeline = vec![
            Sample::new(10.0, 1.0, 2.0).unwrap(),
            Sample::new(20.0, -3.5, 4.25).unwrap().with_origin(Origin::Synced),
        ];
        let pending = vec![Sample::new(5.0, 0.0, 0.0).unwrap().with_origin(Origin::Offline)];
        TimelineDocument::new("alice", timeline, pending)
    }

    #[test]
    fn test_snapshot_header_serialization() {
        let d = doc();
        let header = SnapshotHeader::for_body(&d, b"{}");
        let bytes = header.to_bytes();

        let mut reader = &bytes[..];
        let decoded = SnapshotHeader::read_from(&mut reader).unwrap();

        assert_eq!(header, decoded);
        assert_eq!(decoded.timeline_len, 2);
        assert_eq!(decoded.pending_len, 1);
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = [0u8; SnapshotHeader::SIZE];
        bytes[0..4].copy_from_slice(b"BADM");
        let mut reader = &bytes[..];
        let result = SnapshotHeader::read_from(&mut reader);
        assert!(matches!(result, Err(PersistenceError::InvalidMagic)));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = encode(&doc()).unwrap();
        bytes[4..8].copy_from_slice(&99u32.to_le_bytes());
        assert!(matches!(decode(&bytes), Err(PersistenceError::UnsupportedVersion(99))));
    }

    #[test]
    fn test_roundtrip_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alice.geot");
        let d = doc();

        write_to(&path, &d).unwrap();
        let (header, loaded) = read_snapshot(&path).unwrap();
        assert_eq!(loaded, d);
        assert_eq!(header.saved_at, d.saved_at);
        assert_eq!(read_header(&path).unwrap(), header);
    }

    #[test]
    fn test_previous_version_kept() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alice.geot");
        let first = doc();
        write_to(&path, &first).unwrap();

        let mut second = doc();
        second.pending.clear();
        write_to(&path, &second).unwrap();

        let (_, prev) = read_snapshot(path.with_extension("prev")).unwrap();
        assert_eq!(prev, first);
        let (_, current) = read_snapshot(&path).unwrap();
        assert_eq!(current, second);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_corruption_detected() {
        let mut bytes = encode(&doc()).unwrap();
        let last = bytes.len() - 2;
        bytes[last] ^= 0x01;
        assert!(matches!(decode(&bytes), Err(PersistenceError::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_truncation_detected() {
        let mut bytes = encode(&doc()).unwrap();
        bytes.truncate(bytes.len() / 2);
        assert!(matches!(decode(&bytes), Err(PersistenceError::Truncated { .. })));

        assert!(matches!(decode(&bytes[..10]), Err(PersistenceError::Truncated { .. })));
    }

    #[test]
    fn test_count_mismatch_detected() {
        let d = doc();
        let body = serde_json::to_vec(&d).unwrap();
        let mut header = SnapshotHeader::for_body(&d, &body);
        header.timeline_len = 7;
        let mut bytes = header.to_bytes().to_vec();
        bytes.extend_from_slice(&body);
        assert!(matches!(decode(&bytes), Err(PersistenceError::InvalidFormat(_))));
    }
}

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::record::TaskRecord;

/// Persistence seam for the record store. The store only needs an opaque
/// blob that round-trips; swapping in an in-memory backend keeps tests off
/// the filesystem.
pub trait Backend {
    fn load(&self) -> anyhow::Result<Option<String>>;
    fn save(&self, blob: &str) -> anyhow::Result<()>;
}

#[derive(Debug)]
pub struct FileBackend {
    pub data_dir: PathBuf,
    pub records_path: PathBuf,
}

impl FileBackend {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let records_path = data_dir.join("records.data");

        info!(
            data_dir = %data_dir.display(),
            records = %records_path.display(),
            "opened datastore"
        );

        Ok(Self {
            data_dir,
            records_path,
        })
    }
}

impl Backend for FileBackend {
    fn load(&self) -> anyhow::Result<Option<String>> {
        if !self.records_path.exists() {
            debug!(file = %self.records_path.display(), "no blob on disk yet");
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.records_path)
            .with_context(|| format!("failed reading {}", self.records_path.display()))?;
        Ok(Some(raw))
    }

    fn save(&self, blob: &str) -> anyhow::Result<()> {
        debug!(file = %self.records_path.display(), bytes = blob.len(), "saving blob atomically");

        let dir = self
            .records_path
            .parent()
            .unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(blob.as_bytes())?;
        temp.flush()?;

        temp.persist(&self.records_path)
            .map_err(|err| anyhow!("failed to persist {}: {}", self.records_path.display(), err))?;

        Ok(())
    }
}

/// One JSON object per line. A blob that does not parse in full degrades to
/// the empty collection: the caller never sees a corrupt store as an error.
pub fn decode_records(blob: &str) -> Vec<TaskRecord> {
    let mut out = Vec::new();
    for (idx, line) in blob.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<TaskRecord>(trimmed) {
            Ok(record) => out.push(record),
            Err(err) => {
                warn!(line = idx + 1, error = %err, "corrupt record blob, starting empty");
                return Vec::new();
            }
        }
    }

    debug!(count = out.len(), "decoded records from blob");
    out
}

pub fn encode_records(records: &[TaskRecord]) -> anyhow::Result<String> {
    let mut blob = String::new();
    for record in records {
        blob.push_str(&serde_json::to_string(record)?);
        blob.push('\n');
    }
    Ok(blob)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;
    use uuid::Uuid;

    use super::{Backend, FileBackend, decode_records, encode_records};
    use crate::record::{Status, TaskRecord};

    fn sample(title: &str) -> TaskRecord {
        TaskRecord {
            uuid: Uuid::new_v4(),
            title: title.to_string(),
            date: "2025-05-01".to_string(),
            client: "Acme".to_string(),
            owner: "Lee".to_string(),
            status: Status::InProgress,
            completed: false,
        }
    }

    #[test]
    fn file_backend_roundtrips_blob() {
        let temp = tempdir().expect("tempdir");
        let backend = FileBackend::open(temp.path()).expect("open backend");

        assert!(backend.load().expect("load").is_none());

        backend.save("hello\n").expect("save");
        assert_eq!(backend.load().expect("load"), Some("hello\n".to_string()));

        backend.save("replaced\n").expect("save again");
        assert_eq!(backend.load().expect("load"), Some("replaced\n".to_string()));
    }

    #[test]
    fn encode_decode_roundtrips_all_fields() {
        let records = vec![sample("one"), sample("two")];
        let blob = encode_records(&records).expect("encode");
        assert_eq!(decode_records(&blob), records);
    }

    #[test]
    fn corrupt_blob_decodes_to_empty() {
        let mut blob = encode_records(&[sample("ok")]).expect("encode");
        blob.push_str("{ not json\n");
        assert!(decode_records(&blob).is_empty());
    }

    #[test]
    fn blank_lines_are_ignored() {
        let records = vec![sample("one")];
        let blob = format!("\n{}\n\n", encode_records(&records).expect("encode"));
        assert_eq!(decode_records(&blob), records);
    }
}

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::application::VectorRepository;
use crate::domain::{records, ChunkRecord, DeletionReport, DomainError};

/// Vector store persisted as one pretty-printed JSON array of chunk records.
///
/// Every mutation reads the whole file, changes it in memory and writes the
/// whole file back. The write goes to a sibling `.tmp` file that is synced and
/// renamed over the store, so readers only ever see complete files. Mutations
/// are serialized by a per-repository lock; separate processes sharing one
/// file are not coordinated and can still overwrite each other.
pub struct JsonVectorRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonVectorRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_records(&self) -> Result<Vec<ChunkRecord>, DomainError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(vec![]);
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            DomainError::storage(format!(
                "Failed to parse vector store {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    async fn write_records(&self, records: &[ChunkRecord]) -> Result<(), DomainError> {
        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| DomainError::storage(format!("Failed to serialize vector store: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp_path = self.tmp_path();
        if let Err(e) = self.replace_with(&tmp_path, &json).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp_path).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!("Failed to remove {}: {}", tmp_path.display(), cleanup);
                }
            }
            return Err(e.into());
        }

        debug!(
            "Wrote {} records ({} bytes) to {}",
            records.len(),
            json.len(),
            self.path.display()
        );
        Ok(())
    }

    async fn replace_with(&self, tmp_path: &Path, json: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::File::create(tmp_path).await?;
        file.write_all(json).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(tmp_path, &self.path).await
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name: OsString = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl VectorRepository for JsonVectorRepository {
    async fn load(&self) -> Result<Vec<ChunkRecord>, DomainError> {
        self.read_records().await
    }

    async fn append(&self, incoming: Vec<ChunkRecord>) -> Result<(), DomainError> {
        if incoming.is_empty() {
            return Ok(());
        }

        let _guard = self.write_lock.lock().await;

        let mut stored = self.read_records().await?;
        records::validate_append(&stored, &incoming)?;

        let added = incoming.len();
        stored.extend(incoming);
        self.write_records(&stored).await?;

        debug!("Appended {} records, store now holds {}", added, stored.len());
        Ok(())
    }

    async fn delete_by_source(&self, source: &str) -> Result<DeletionReport, DomainError> {
        let _guard = self.write_lock.lock().await;

        let mut stored = self.read_records().await?;
        let report = records::remove_source(&mut stored, source)?;
        self.write_records(&stored).await?;

        Ok(report)
    }
}

use crate::domain::track::{StorageError, TrackRecord, TrackSummary};
use std::path::PathBuf;
use uuid::Uuid;

/// Track records stored as one JSON file per track
pub struct FileTrackRepository {
    dir: PathBuf,
}

impl FileTrackRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    /// Save a record, replacing any previous version
    pub async fn save(&self, record: &TrackRecord) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let json = serde_json::to_vec_pretty(record)?;
        let path = self.path_for(record.id);
        let tmp = path.with_extension("json.tmp");

        // Write then rename so a crash never leaves a half-written record
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::info!(
            track_id = %record.id,
            path = %path.display(),
            size_bytes = json.len(),
            "Track record saved"
        );
        Ok(())
    }

    /// Get a record by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TrackRecord>, StorageError> {
        match tokio::fs::read(self.path_for(id)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn load(&self, id: Uuid) -> Result<TrackRecord, StorageError> {
        self.find_by_id(id).await?.ok_or(StorageError::NotFound(id))
    }

    /// All stored tracks, newest first. Unreadable files are skipped.
    pub async fn list(&self) -> Result<Vec<TrackSummary>, StorageError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut summaries = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let parsed = tokio::fs::read(&path)
                .await
                .map_err(StorageError::from)
                .and_then(|bytes| {
                    serde_json::from_slice::<TrackRecord>(&bytes).map_err(StorageError::from)
                });
            match parsed {
                Ok(record) => summaries.push(record.summary()),
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Skipping unreadable track record"
                    );
                }
            }
        }

        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    /// Returns whether a record was deleted
    pub async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        match tokio::fs::remove_file(self.path_for(id)).await {
            Ok(()) => {
                tracing::info!(track_id = %id, "Track record deleted");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

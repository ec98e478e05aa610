use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use super::{ResultSource, ResultStore, StoreError};
use crate::models::job::JobId;
use crate::models::result::ResultRecord;

/// One pretty-printed `<job_id>.json` file per result under a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, job_id: &JobId) -> PathBuf {
        self.dir.join(format!("{job_id}.json"))
    }
}

#[async_trait]
impl ResultSource for FileStore {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn get(&self, job_id: &JobId) -> Result<Option<ResultRecord>, StoreError> {
        let bytes = match fs::read(self.path_for(job_id)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut body: serde_json::Value = serde_json::from_slice(&bytes)?;
        // The file name is authoritative when the content omits the id.
        if let Some(obj) = body.as_object_mut() {
            obj.entry("job_id")
                .or_insert_with(|| serde_json::Value::String(job_id.to_string()));
        }
        Ok(Some(serde_json::from_value(body)?))
    }

    /// Write and remove a probe file in the results directory, or in its
    /// nearest existing ancestor when the directory has not been created yet.
    async fn health(&self) -> Result<(), StoreError> {
        let mut target = self.dir.as_path();
        while !fs::try_exists(target).await? {
            target = match target.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
        }

        let probe = target.join(format!(".health.{}.tmp", Uuid::new_v4().simple()));
        fs::write(&probe, b"ok").await?;
        fs::remove_file(&probe).await?;
        Ok(())
    }
}

#[async_trait]
impl ResultStore for FileStore {
    async fn put(&self, record: &ResultRecord) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).await?;

        let body = serde_json::to_vec_pretty(record)?;
        // Write beside the target and rename so readers never see a partial file.
        let tmp = self
            .dir
            .join(format!(".{}.{}.tmp", record.job_id, Uuid::new_v4().simple()));
        fs::write(&tmp, body).await?;

        if let Err(e) = fs::rename(&tmp, self.path_for(&record.job_id)).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

//! One JSON file per key.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use super::{CacheIoError, CacheRecord, CacheStore};
use crate::cache::keys::CacheKey;

/// Backend de disco: `<dir>/<key>.json` con contenido `[payload, storedAt]`.
///
/// No mantiene indice en memoria; cada lookup lee el archivo.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Abre el store, creando el directorio si no existe.
    pub async fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    /// Directorio raiz del store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path del archivo para una key.
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

#[async_trait]
impl CacheStore for FileStore {
    async fn read(&self, key: &CacheKey) -> Result<Option<CacheRecord>, CacheIoError> {
        let bytes = match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheIoError::io(key, e)),
        };

        let (payload, stored_at): (Value, f64) =
            serde_json::from_slice(&bytes).map_err(|e| CacheIoError::corrupt(key, e.to_string()))?;

        Ok(Some(CacheRecord {
            key: key.clone(),
            payload,
            stored_at,
        }))
    }

    async fn write(&self, record: &CacheRecord) -> Result<(), CacheIoError> {
        let key = &record.key;
        let body = serde_json::to_vec(&(&record.payload, record.stored_at))
            .map_err(|e| CacheIoError::corrupt(key, e.to_string()))?;

        // Escribir a un temporal y renombrar: un lector concurrente nunca ve
        // un archivo a medio escribir.
        let target = self.path_for(key);
        let tmp = self
            .dir
            .join(format!(".{}.{}.tmp", key.file_name(), Uuid::new_v4()));

        if let Err(e) = tokio::fs::write(&tmp, &body).await {
            return Err(CacheIoError::io(key, e));
        }
        if let Err(e) = tokio::fs::rename(&tmp, &target).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(CacheIoError::io(key, e));
        }

        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> Result<(), CacheIoError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheIoError::io(key, e)),
        }
    }

    fn backend(&self) -> &'static str {
        "file"
    }
}

//! JSON-file backed document store.

use crate::tables::Tables;
use crate::{Condition, ConditionalUpdate, DbError, Document, DocumentStore, Filter};
use async_trait::async_trait;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

/// Durable store that keeps every collection in one JSON file.
///
/// The file is the only copy of the data. Every call takes an advisory lock
/// on a sidecar `.lock` file (shared for reads, exclusive for writes) and
/// re-reads the file under it. Mutations rewrite the file through a temp
/// file and a rename before the lock is released, so handles in other tasks
/// or processes always check conditions against the last committed state.
///
/// Calls run on the blocking pool. A caller that stops waiting, for example
/// on a timeout, does not stop a write that has already started: a
/// timed-out mutation may still be committed.
#[derive(Debug, Clone)]
pub struct JsonFileDb {
    files: Arc<Files>,
}

#[derive(Debug)]
struct Files {
    data: PathBuf,
    lock: PathBuf,
    tmp: PathBuf,
}

#[derive(Debug, Clone, Copy)]
enum LockMode {
    Shared,
    Exclusive,
}

/// Held advisory lock; released on drop.
struct FileLock(File);

impl FileLock {
    fn acquire(path: &Path, mode: LockMode) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        match mode {
            LockMode::Shared => FileExt::lock_shared(&file)?,
            LockMode::Exclusive => FileExt::lock_exclusive(&file)?,
        }
        Ok(Self(file))
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.0);
    }
}

impl Files {
    fn load(&self) -> Result<Tables, DbError> {
        match fs::read(&self.data) {
            Ok(bytes) if bytes.is_empty() => Ok(Tables::default()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| DbError::OpenError(format!("{}: {}", self.data.display(), e))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Tables::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, tables: &Tables) -> Result<(), DbError> {
        let bytes = serde_json::to_vec_pretty(tables)?;
        let mut tmp = File::create(&self.tmp)?;
        tmp.write_all(&bytes)?;
        tmp.sync_all()?;
        fs::rename(&self.tmp, &self.data)?;
        trace!(path = %self.data.display(), bytes = bytes.len(), "document store flushed");
        Ok(())
    }
}

impl JsonFileDb {
    /// Open the database file. A missing file is an empty database; a file
    /// that does not parse fails with [`DbError::OpenError`].
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, DbError> {
        let data = path.into();
        if let Some(parent) = data.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DbError::OpenError(format!("{}: {}", parent.display(), e)))?;
        }

        let db = Self {
            files: Arc::new(Files {
                lock: data.with_extension("json.lock"),
                tmp: data.with_extension("json.tmp"),
                data,
            }),
        };
        db.read(|_| ()).await?;

        debug!(path = %db.files.data.display(), "document store opened");
        Ok(db)
    }

    /// Run `op` on the current tables under a shared lock.
    async fn read<T, F>(&self, op: F) -> Result<T, DbError>
    where
        F: FnOnce(&Tables) -> T + Send + 'static,
        T: Send + 'static,
    {
        self.blocking(move |files| {
            let _lock = FileLock::acquire(&files.lock, LockMode::Shared)?;
            Ok(op(&files.load()?))
        })
        .await
    }

    /// Run `op` under the exclusive lock. `op` returns its result and
    /// whether it changed the tables; only changed tables are written back.
    async fn write<T, F>(&self, op: F) -> Result<T, DbError>
    where
        F: FnOnce(&mut Tables) -> Result<(T, bool), DbError> + Send + 'static,
        T: Send + 'static,
    {
        self.blocking(move |files| {
            let _lock = FileLock::acquire(&files.lock, LockMode::Exclusive)?;
            let mut tables = files.load()?;
            let (value, changed) = op(&mut tables)?;
            if changed {
                files.store(&tables)?;
            }
            Ok(value)
        })
        .await
    }

    async fn blocking<T, F>(&self, job: F) -> Result<T, DbError>
    where
        F: FnOnce(&Files) -> Result<T, DbError> + Send + 'static,
        T: Send + 'static,
    {
        let files = Arc::clone(&self.files);
        tokio::task::spawn_blocking(move || job(&files))
            .await
            .map_err(|e| DbError::Unavailable(format!("storage task failed: {}", e)))?
    }
}

#[async_trait]
impl DocumentStore for JsonFileDb {
    async fn insert(&self, collection: &str, id: &str, doc: Document) -> Result<(), DbError> {
        let (collection, id) = (collection.to_string(), id.to_string());
        self.write(move |tables| {
            tables.insert(&collection, &id, doc)?;
            Ok(((), true))
        })
        .await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DbError> {
        let (collection, id) = (collection.to_string(), id.to_string());
        self.read(move |tables| tables.get(&collection, &id)).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, DbError> {
        let (collection, id) = (collection.to_string(), id.to_string());
        self.write(move |tables| {
            let removed = tables.delete(&collection, &id);
            Ok((removed, removed))
        })
        .await
    }

    async fn update_if(
        &self,
        collection: &str,
        id: &str,
        condition: &Condition,
        changes: Document,
    ) -> Result<ConditionalUpdate, DbError> {
        let (collection, id) = (collection.to_string(), id.to_string());
        let condition = condition.clone();
        self.write(move |tables| {
            let outcome = tables.update_if(&collection, &id, &condition, changes);
            let applied = matches!(outcome, ConditionalUpdate::Applied(_));
            Ok((outcome, applied))
        })
        .await
    }

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, DbError> {
        let collection = collection.to_string();
        let filter = filter.clone();
        self.read(move |tables| tables.find(&collection, &filter))
            .await
    }
}

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, PoisonError};

use async_trait::async_trait;
use manup_host::{CacheError, CacheStore};
use tokio::sync::Mutex;

type WriteLock = Arc<Mutex<()>>;

/// One write lock per cache file in this process, so stores for different
/// namespaces sharing a file do not drop each other's keys.
fn write_lock_for(path: &Path) -> WriteLock {
    static WRITE_LOCKS: OnceLock<std::sync::Mutex<HashMap<PathBuf, WriteLock>>> =
        OnceLock::new();

    let mut locks = WRITE_LOCKS
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    Arc::clone(locks.entry(path.to_path_buf()).or_default())
}

/// Key-value cache kept as one JSON object on disk.
///
/// Writers in this process are serialized per path as given; two spellings
/// of the same file, or other processes, are not coordinated.
pub struct FileCacheStore {
    path: PathBuf,
    write_lock: WriteLock,
}

impl FileCacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            write_lock: write_lock_for(&path),
            path,
        }
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>, CacheError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(error) => Err(error.into()),
        }
    }
}

#[async_trait]
impl CacheStore for FileCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.read_entries().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        let _guard = self.write_lock.lock().await;
        // An unreadable file is replaced rather than blocking every write.
        let mut entries = self.read_entries().await.unwrap_or_default();
        entries.insert(key.to_string(), value);
        let data = serde_json::to_vec(&entries)?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &data))
            .await
            .map_err(|error| CacheError::backend(error.to_string()))??;
        Ok(())
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "cache path has no parent")
    })?;
    std::fs::create_dir_all(parent)?;

    let file_name = path
        .file_name()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("cache");
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    let pid = std::process::id();

    let mut tmp_path = None;
    for attempt in 0..16_u8 {
        let candidate = parent.join(format!(".{file_name}.{pid}.{timestamp}.{attempt}.tmp"));
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(mut file) => {
                file.write_all(data)?;
                file.sync_all()?;
                tmp_path = Some(candidate);
                break;
            }
            Err(error) if error.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(error) => return Err(error),
        }
    }

    let Some(tmp_path) = tmp_path else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "failed to create unique cache temp file",
        ));
    };

    if let Err(error) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(error);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use manup_host::{CacheError, CacheStore};

    use super::FileCacheStore;

    #[tokio::test]
    async fn missing_file_has_no_entries() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let cache = FileCacheStore::new(temp_dir.path().join("manup-cache.json"));

        assert_eq!(cache.get("app.manup").await, Ok(None));
    }

    #[tokio::test]
    async fn set_then_get_round_trips_and_keeps_other_keys() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let path = temp_dir.path().join("cache").join("manup-cache.json");
        let cache = FileCacheStore::new(&path);

        cache
            .set("one.manup", "{\"a\":1}".to_string())
            .await
            .expect("first write should succeed");
        cache
            .set("two.manup", "{}".to_string())
            .await
            .expect("second write should succeed");

        let reopened = FileCacheStore::new(&path);
        assert_eq!(
            reopened.get("one.manup").await,
            Ok(Some("{\"a\":1}".to_string()))
        );
        assert_eq!(reopened.get("two.manup").await, Ok(Some("{}".to_string())));
    }

    #[tokio::test]
    async fn set_overwrites_corrupt_file() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let path = temp_dir.path().join("manup-cache.json");
        std::fs::write(&path, "{not-valid-json").expect("invalid file should be written");
        let cache = FileCacheStore::new(&path);

        assert!(matches!(
            cache.get("app.manup").await,
            Err(CacheError::Serialize(_))
        ));
        cache
            .set("app.manup", "{}".to_string())
            .await
            .expect("write should replace corrupt file");
        assert_eq!(cache.get("app.manup").await, Ok(Some("{}".to_string())));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn stores_sharing_a_file_keep_each_others_keys() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let path = temp_dir.path().join("manup-cache.json");

        let writers: Vec<_> = (0..8)
            .map(|index| {
                let cache = FileCacheStore::new(&path);
                tokio::spawn(async move {
                    cache
                        .set(&format!("app{index}.manup"), "{}".to_string())
                        .await
                })
            })
            .collect();
        for writer in writers {
            writer
                .await
                .expect("writer task should finish")
                .expect("write should succeed");
        }

        let cache = FileCacheStore::new(&path);
        for index in 0..8 {
            assert_eq!(
                cache.get(&format!("app{index}.manup")).await,
                Ok(Some("{}".to_string()))
            );
        }
    }

    #[tokio::test]
    async fn write_leaves_no_temp_files_behind() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let cache = FileCacheStore::new(temp_dir.path().join("manup-cache.json"));

        cache
            .set("app.manup", "{}".to_string())
            .await
            .expect("write should succeed");

        let names: Vec<_> = std::fs::read_dir(temp_dir.path())
            .expect("temp dir should be readable")
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["manup-cache.json".to_string()]);
    }
}

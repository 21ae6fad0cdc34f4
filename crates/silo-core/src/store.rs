//! Filesystem-backed object storage.
//!
//! All state lives under a single data directory:
//!
//! ```text
//! DATA_DIR/<bucket>/<key>                                      - objects
//! DATA_DIR/.multipart/<bucket>/<key-namespace>/<upload-id>/<n> - part files
//! ```
//!
//! Slashes in object keys map to directory separators. Multipart scratch
//! space lives under the reserved dot-prefixed `.multipart` tree, keyed by
//! the SHA-256 of the object key (`_root` for the empty key): scratch data
//! can never collide with a user key and never shows up in bucket listings,
//! which skip dot-prefixed names.
//!
//! Every object write goes through a temp file in the destination's parent
//! directory followed by an atomic rename, so readers observe either the
//! previous content or the complete new content - never a torn write. Each
//! multipart session owns its own `<upload-id>` directory; completing or
//! aborting one session touches nothing belonging to a sibling session on
//! the same key.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use md5::Md5;
use sha2::{Digest, Sha256};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// Reserved top-level directory for multipart scratch space.
const MULTIPART_DIR: &str = ".multipart";

/// Key namespace used for multipart sessions on the empty key.
const ROOT_KEY_NAMESPACE: &str = "_root";

/// Metadata for a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    /// The object key, slash-delimited.
    pub key: String,
    /// Size in bytes.
    pub size: u64,
    /// Last-modified time.
    pub last_modified: DateTime<Utc>,
}

/// Filesystem-backed object store rooted at a data directory.
///
/// The store is cheap to clone and safe to share across request workers: it
/// holds no in-memory state, only the root path. All coordination between
/// concurrent requests happens through the filesystem (atomic renames and
/// per-session directories).
///
/// # Examples
///
/// ```
/// use silo_core::store::FsStore;
///
/// # tokio_test::block_on(async {
/// let dir = tempfile::tempdir().unwrap();
/// let store = FsStore::new(dir.path());
///
/// store.put_object("my-bucket", "hello.txt", b"hello").await.unwrap();
/// let (_, meta) = store.open_object("my-bucket", "hello.txt").await.unwrap();
/// assert_eq!(meta.size, 5);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create a store rooted at `root`. The directory is created lazily.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The filesystem path of an object.
    fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        let mut path = self.root.join(bucket);
        for segment in key.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path
    }

    /// The scratch directory of a multipart session.
    fn session_dir(&self, bucket: &str, key: &str, upload_id: &str) -> PathBuf {
        self.root
            .join(MULTIPART_DIR)
            .join(bucket)
            .join(key_namespace(key))
            .join(upload_id)
    }

    // -----------------------------------------------------------------------
    // Objects
    // -----------------------------------------------------------------------

    /// Write an object atomically, overwriting any previous content.
    ///
    /// Returns the hex MD5 of the body (the ETag).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the write or rename fails. The temp file
    /// is removed on every failure path.
    pub async fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> StoreResult<String> {
        let dest = self.object_path(bucket, key);
        write_atomic(&dest, data).await?;

        let etag = hex::encode(Md5::digest(data));
        trace!(bucket, key, size = data.len(), "stored object");
        Ok(etag)
    }

    /// Open an object for streaming reads.
    ///
    /// Returns the open file handle together with the object's metadata. The
    /// handle refers to one rename generation of the object: a concurrent
    /// overwrite does not affect a reader that already holds the handle.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the object does not exist, or
    /// [`StoreError::Io`] for any other filesystem failure.
    pub async fn open_object(&self, bucket: &str, key: &str) -> StoreResult<(File, ObjectMeta)> {
        let path = self.object_path(bucket, key);
        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(not_found(bucket, key));
            }
            Err(e) => return Err(e.into()),
        };

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(not_found(bucket, key));
        }

        let meta = ObjectMeta {
            key: key.to_owned(),
            size: metadata.len(),
            last_modified: DateTime::<Utc>::from(metadata.modified()?),
        };
        Ok((file, meta))
    }

    /// Fetch object metadata without opening the content.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the object does not exist.
    pub async fn stat_object(&self, bucket: &str, key: &str) -> StoreResult<ObjectMeta> {
        let path = self.object_path(bucket, key);
        let metadata = match fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(not_found(bucket, key));
            }
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_file() {
            return Err(not_found(bucket, key));
        }

        Ok(ObjectMeta {
            key: key.to_owned(),
            size: metadata.len(),
            last_modified: DateTime::<Utc>::from(metadata.modified()?),
        })
    }

    /// Delete an object. Deleting an absent object succeeds (S3 semantics).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] only for unexpected filesystem failures.
    pub async fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<()> {
        let path = self.object_path(bucket, key);
        match fs::metadata(&path).await {
            // A directory is a key prefix, not an object.
            Ok(m) if !m.is_file() => return Ok(()),
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        }

        match fs::remove_file(&path).await {
            Ok(()) => trace!(bucket, key, "deleted object"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        if let Some(parent) = path.parent() {
            self.prune_empty_dirs(parent, &self.root.join(bucket)).await;
        }
        Ok(())
    }

    /// List objects in a bucket whose key starts with `prefix`, sorted by
    /// key ascending.
    ///
    /// Dot-prefixed names (in-flight temp files) are skipped at every level;
    /// multipart scratch space lives outside the bucket tree entirely. An
    /// absent bucket directory lists as empty - buckets are implicit.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the walk fails mid-way.
    pub async fn list_objects(&self, bucket: &str, prefix: &str) -> StoreResult<Vec<ObjectMeta>> {
        let bucket_root = self.root.join(bucket);
        let mut pending = vec![bucket_root.clone()];
        let mut objects = Vec::new();

        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            while let Some(entry) = entries.next_entry().await? {
                if entry.file_name().to_string_lossy().starts_with('.') {
                    continue;
                }

                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                    continue;
                }
                if !file_type.is_file() {
                    continue;
                }

                let Some(key) = relative_key(&entry.path(), &bucket_root) else {
                    continue;
                };
                if !key.starts_with(prefix) {
                    continue;
                }

                let metadata = entry.metadata().await?;
                objects.push(ObjectMeta {
                    key,
                    size: metadata.len(),
                    last_modified: DateTime::<Utc>::from(metadata.modified()?),
                });
            }
        }

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }

    // -----------------------------------------------------------------------
    // Multipart uploads
    // -----------------------------------------------------------------------

    /// Start a multipart session and return its upload ID.
    ///
    /// The ID is 16 random bytes rendered as 32 lowercase hex characters.
    /// Two initiations on the same key produce two independent sessions.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the session directory cannot be created.
    pub async fn create_upload(&self, bucket: &str, key: &str) -> StoreResult<String> {
        let upload_id = hex::encode(rand::random::<[u8; 16]>());
        let session = self.session_dir(bucket, key, &upload_id);
        fs::create_dir_all(&session).await?;

        debug!(bucket, key, %upload_id, "created multipart session");
        Ok(upload_id)
    }

    /// Write one part of a multipart session, atomically.
    ///
    /// Re-uploading a part number replaces the previous content. Returns the
    /// hex MD5 of the part body (the part's ETag).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoSuchUpload`] if the session does not exist,
    /// or [`StoreError::Io`] if the write fails.
    pub async fn put_part(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number: u32,
        data: &[u8],
    ) -> StoreResult<String> {
        let session = self.session_dir(bucket, key, upload_id);
        if fs::metadata(&session).await.is_err() {
            return Err(StoreError::NoSuchUpload {
                upload_id: upload_id.to_owned(),
            });
        }

        write_atomic(&session.join(part_number.to_string()), data).await?;

        let etag = hex::encode(Md5::digest(data));
        trace!(bucket, key, upload_id, part_number, size = data.len(), "stored part");
        Ok(etag)
    }

    /// Assemble a multipart session into the final object.
    ///
    /// The part list is deduplicated and sorted ascending. Parts are
    /// stream-copied in order into a temp file next to the destination, then
    /// renamed over it. Until that rename, any failure leaves the session and
    /// all its parts intact for a retry. After the rename the session
    /// directory is removed and empty ancestors are pruned - only this
    /// session's directory; sibling sessions on the same key are untouched.
    ///
    /// Returns the assembled object's size.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NoSuchUpload`] if the session does not exist.
    /// - [`StoreError::InvalidPart`] if the part list is empty, contains a
    ///   non-positive number, or references a part that was never uploaded.
    /// - [`StoreError::Io`] if assembly or the final rename fails.
    pub async fn complete_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_numbers: &[u32],
    ) -> StoreResult<u64> {
        let session = self.session_dir(bucket, key, upload_id);
        if fs::metadata(&session).await.is_err() {
            return Err(StoreError::NoSuchUpload {
                upload_id: upload_id.to_owned(),
            });
        }

        let mut parts: Vec<u32> = part_numbers.to_vec();
        parts.sort_unstable();
        parts.dedup();
        if parts.is_empty() || parts[0] == 0 {
            return Err(StoreError::InvalidPart);
        }

        let dest = self.object_path(bucket, key);
        let parent = dest
            .parent()
            .ok_or_else(|| std::io::Error::other("destination has no parent directory"))?;
        fs::create_dir_all(parent).await?;
        let tmp = parent.join(format!(".tmp-{}", Uuid::new_v4()));

        let size = match assemble_parts(&session, &parts, &tmp).await {
            Ok(size) => size,
            Err(e) => {
                let _ = fs::remove_file(&tmp).await;
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&tmp, &dest).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        debug!(bucket, key, upload_id, parts = parts.len(), size, "completed multipart upload");
        self.cleanup_session(&session).await;
        Ok(size)
    }

    /// Abort a multipart session, discarding all its parts.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoSuchUpload`] if the session does not exist.
    pub async fn abort_upload(&self, bucket: &str, key: &str, upload_id: &str) -> StoreResult<()> {
        let session = self.session_dir(bucket, key, upload_id);
        if fs::metadata(&session).await.is_err() {
            return Err(StoreError::NoSuchUpload {
                upload_id: upload_id.to_owned(),
            });
        }

        debug!(bucket, key, upload_id, "aborting multipart session");
        self.cleanup_session(&session).await;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// Remove a session directory and prune now-empty ancestors.
    ///
    /// Ancestors are removed with plain `remove_dir`, whose not-empty failure
    /// is the "only if empty" guard: a sibling session keeps the shared key
    /// namespace (and everything above it) alive.
    async fn cleanup_session(&self, session: &Path) {
        if let Err(e) = fs::remove_dir_all(session).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(error = %e, "failed to remove multipart session directory");
            }
        }

        let mut current = session.parent();
        while let Some(dir) = current {
            if dir == self.root.as_path() || !dir.starts_with(&self.root) {
                break;
            }
            if fs::remove_dir(dir).await.is_err() {
                break;
            }
            current = dir.parent();
        }
    }

    /// Remove empty directories from `start` up to (but excluding) `stop`.
    async fn prune_empty_dirs(&self, start: &Path, stop: &Path) {
        let mut current = start.to_path_buf();
        while current.starts_with(stop) && current != stop {
            if fs::remove_dir(&current).await.is_err() {
                break;
            }
            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }
    }
}

/// The multipart key namespace for an object key.
fn key_namespace(key: &str) -> String {
    if key.is_empty() {
        ROOT_KEY_NAMESPACE.to_owned()
    } else {
        hex::encode(Sha256::digest(key.as_bytes()))
    }
}

fn not_found(bucket: &str, key: &str) -> StoreError {
    StoreError::NotFound {
        bucket: bucket.to_owned(),
        key: key.to_owned(),
    }
}

/// The slash-delimited key of a file relative to its bucket root.
fn relative_key(path: &Path, bucket_root: &Path) -> Option<String> {
    let relative = path.strip_prefix(bucket_root).ok()?;
    let segments: Vec<String> = relative
        .iter()
        .map(|c| c.to_string_lossy().into_owned())
        .collect();
    Some(segments.join("/"))
}

/// Write `data` to `dest` through a uniquely named temp file in the
/// destination's parent directory, then rename over the destination.
///
/// The temp file is unlinked on every failure path.
async fn write_atomic(dest: &Path, data: &[u8]) -> StoreResult<()> {
    let parent = dest
        .parent()
        .ok_or_else(|| std::io::Error::other("destination has no parent directory"))?;
    fs::create_dir_all(parent).await?;

    let tmp = parent.join(format!(".tmp-{}", Uuid::new_v4()));
    let result = write_and_rename(&tmp, dest, data).await;
    if result.is_err() {
        let _ = fs::remove_file(&tmp).await;
    }
    result.map_err(StoreError::from)
}

async fn write_and_rename(tmp: &Path, dest: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(tmp).await?;
    file.write_all(data).await?;
    file.flush().await?;
    file.sync_all().await?;
    fs::rename(tmp, dest).await
}

/// Stream-copy the listed parts, in order, into `tmp`. Returns total bytes.
async fn assemble_parts(session: &Path, parts: &[u32], tmp: &Path) -> StoreResult<u64> {
    let mut out = File::create(tmp).await?;
    let mut total: u64 = 0;

    for part_number in parts {
        let part_path = session.join(part_number.to_string());
        let mut part = match File::open(&part_path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::InvalidPart);
            }
            Err(e) => return Err(e.into()),
        };
        total += tokio::io::copy(&mut part, &mut out).await?;
    }

    out.flush().await?;
    out.sync_all().await?;
    Ok(total)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

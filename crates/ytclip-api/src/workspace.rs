//! Per-request workspaces and their publication.
//!
//! Each request gets a fresh, uniquely named directory under the work root.
//! Publication exposes a workspace under the public root that the `/clips`
//! retrieval path serves from, preferring a symlink and falling back to a
//! recursive copy on filesystems that refuse links. Publication status is an
//! explicit id -> link map behind a mutex, so repeat and racing publish calls
//! are idempotent rather than error-driven.
//!
//! Workspaces are never deleted here; retention is an external policy.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// Directory-name prefix for request workspaces.
const WORKSPACE_PREFIX: &str = "ytclip_";

/// An isolated working directory owned by exactly one request.
#[derive(Debug, Clone)]
pub struct Workspace {
    id: String,
    root: PathBuf,
}

impl Workspace {
    /// Opaque directory name, used in retrieval URLs.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Filesystem root of this workspace.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Allocates workspaces and maintains their public links.
pub struct WorkspaceManager {
    work_root: PathBuf,
    public_root: PathBuf,
    published: Mutex<HashMap<String, PathBuf>>,
}

impl WorkspaceManager {
    /// Create a manager, ensuring both roots exist.
    pub fn new(work_root: impl Into<PathBuf>, public_root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let work_root = work_root.into();
        let public_root = public_root.into();
        std::fs::create_dir_all(&work_root)?;
        std::fs::create_dir_all(&public_root)?;
        Ok(Self {
            work_root,
            public_root,
            published: Mutex::new(HashMap::new()),
        })
    }

    /// Directory the retrieval path serves from.
    pub fn public_root(&self) -> &Path {
        &self.public_root
    }

    /// Allocate a fresh, uniquely named workspace.
    ///
    /// Uniqueness holds under concurrent allocations: `create_dir` is the
    /// atomic claim, not a check-then-create.
    pub async fn allocate(&self) -> ApiResult<Workspace> {
        loop {
            let id = format!("{}{}", WORKSPACE_PREFIX, Uuid::new_v4().simple());
            let root = self.work_root.join(&id);
            match fs::create_dir(&root).await {
                Ok(()) => {
                    debug!(workspace = %id, root = %root.display(), "Allocated workspace");
                    return Ok(Workspace { id, root });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(ApiError::internal(format!(
                        "failed to allocate workspace: {}",
                        e
                    )))
                }
            }
        }
    }

    /// Expose a workspace under the public root, returning the link path.
    ///
    /// Idempotent: the second caller (including one racing on the same id)
    /// observes the first's link and does no redundant work.
    pub async fn publish(&self, id: &str) -> ApiResult<PathBuf> {
        if !is_valid_workspace_id(id) {
            return Err(ApiError::validation(format!(
                "invalid workspace identifier: {:?}",
                id
            )));
        }

        let mut published = self.published.lock().await;
        if let Some(link) = published.get(id) {
            return Ok(link.clone());
        }

        let target = self.work_root.join(id);
        if !target.is_dir() {
            return Err(ApiError::NotFound(format!("no such workspace: {}", id)));
        }

        let link = self.public_root.join(id);
        match symlink_dir(&target, &link).await {
            Ok(()) => {
                info!(workspace = %id, link = %link.display(), "Published workspace via symlink");
            }
            // A link from an earlier process incarnation counts as published.
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(workspace = %id, "Public link already present");
            }
            Err(link_err) => {
                // Filesystem refuses symlinks: fall back to a full copy.
                debug!(workspace = %id, error = %link_err, "Symlink refused, copying workspace");
                copy_dir_recursive(&target, &link).await.map_err(|copy_err| {
                    ApiError::Publish(format!(
                        "symlink failed ({}), copy failed ({})",
                        link_err, copy_err
                    ))
                })?;
                info!(workspace = %id, link = %link.display(), "Published workspace via copy");
            }
        }

        published.insert(id.to_string(), link.clone());
        Ok(link)
    }
}

/// Workspace ids are single path components of the allocator's alphabet.
/// Anything else (separators, traversal) is rejected before touching the
/// filesystem.
fn is_valid_workspace_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(unix)]
async fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    fs::symlink(target, link).await
}

#[cfg(windows)]
async fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    fs::symlink_dir(target, link).await
}

/// Copy a directory tree, iteratively to keep the future `Send`-simple.
async fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    let mut stack = vec![(src.to_path_buf(), dst.to_path_buf())];
    while let Some((from, to)) = stack.pop() {
        fs::create_dir_all(&to).await?;
        let mut entries = fs::read_dir(&from).await?;
        while let Some(entry) = entries.next_entry().await? {
            let child_to = to.join(entry.file_name());
            if entry.file_type().await?.is_dir() {
                stack.push((entry.path(), child_to));
            } else {
                fs::copy(entry.path(), child_to).await?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager(dir: &TempDir) -> WorkspaceManager {
        WorkspaceManager::new(dir.path().join("work"), dir.path().join("public")).unwrap()
    }

    #[tokio::test]
    async fn test_allocate_creates_unique_directories() {
        let dir = TempDir::new().unwrap();
        let mgr = manager(&dir);

        let a = mgr.allocate().await.unwrap();
        let b = mgr.allocate().await.unwrap();

        assert_ne!(a.id(), b.id());
        assert!(a.root().is_dir());
        assert!(b.root().is_dir());
        assert!(a.id().starts_with("ytclip_"));
    }

    #[tokio::test]
    async fn test_publish_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mgr = manager(&dir);

        let ws = mgr.allocate().await.unwrap();
        tokio::fs::write(ws.root().join("clip_01.mp4"), b"data")
            .await
            .unwrap();

        let first = mgr.publish(ws.id()).await.unwrap();
        let second = mgr.publish(ws.id()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_published_files_resolve_through_public_root() {
        let dir = TempDir::new().unwrap();
        let mgr = manager(&dir);

        let ws = mgr.allocate().await.unwrap();
        tokio::fs::write(ws.root().join("clip_01.mp4"), b"not really mp4")
            .await
            .unwrap();

        mgr.publish(ws.id()).await.unwrap();

        // The retrieval URL /clips/{id}/{file} maps onto the public root
        let served = mgr.public_root().join(ws.id()).join("clip_01.mp4");
        let meta = tokio::fs::metadata(&served).await.unwrap();
        assert!(meta.len() > 0);
    }

    #[tokio::test]
    async fn test_publish_unknown_workspace_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mgr = manager(&dir);

        let err = mgr.publish("ytclip_does_not_exist").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_publish_rejects_path_traversal() {
        let dir = TempDir::new().unwrap();
        let mgr = manager(&dir);

        assert!(matches!(
            mgr.publish("../etc").await.unwrap_err(),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            mgr.publish("a/b").await.unwrap_err(),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            mgr.publish("").await.unwrap_err(),
            ApiError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_concurrent_publish_same_workspace() {
        let dir = TempDir::new().unwrap();
        let mgr = std::sync::Arc::new(manager(&dir));

        let ws = mgr.allocate().await.unwrap();
        tokio::fs::write(ws.root().join("clip_01.mp4"), b"data")
            .await
            .unwrap();

        let id = ws.id().to_string();
        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let mgr = std::sync::Arc::clone(&mgr);
                let id = id.clone();
                tokio::spawn(async move { mgr.publish(&id).await })
            })
            .collect();

        let mut links = Vec::new();
        for t in tasks {
            links.push(t.await.unwrap().unwrap());
        }
        assert!(links.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_workspace_id_validation() {
        assert!(is_valid_workspace_id("ytclip_0123abcd"));
        assert!(is_valid_workspace_id("abc-DEF_123"));
        assert!(!is_valid_workspace_id(""));
        assert!(!is_valid_workspace_id("../x"));
        assert!(!is_valid_workspace_id("a/b"));
        assert!(!is_valid_workspace_id("a b"));
    }
}

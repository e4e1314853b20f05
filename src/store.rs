use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::TrackedRepository;

/// Default location: ~/.local/share/repotrack/repos.json (Linux) or
/// ~/Library/Application Support/repotrack/repos.json (macOS)
pub fn default_path() -> Option<PathBuf> {
    Some(dirs::data_dir()?.join("repotrack").join("repos.json"))
}

/// The tracked repositories, mirrored to a JSON file.
///
/// Every mutation rewrites the whole file before returning, so the in-memory
/// sequence and the file never drift apart. Write failures are logged and
/// otherwise ignored.
#[derive(Debug)]
pub struct TrackedStore {
    path: Option<PathBuf>,
    repos: Vec<TrackedRepository>,
}

impl TrackedStore {
    /// Read the persisted sequence. Missing or corrupt files start empty.
    pub fn load(path: Option<PathBuf>) -> Self {
        let repos = match path.as_deref().map(read) {
            Some(Ok(Some(repos))) => repos,
            Some(Ok(None)) | None => Vec::new(),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "ignoring unreadable tracked repository file");
                Vec::new()
            }
        };
        tracing::debug!(count = repos.len(), "loaded tracked repositories");
        Self { path, repos }
    }

    /// A store that never touches the filesystem.
    #[cfg(test)]
    pub fn in_memory(repos: Vec<TrackedRepository>) -> Self {
        Self { path: None, repos }
    }

    pub fn repos(&self) -> &[TrackedRepository] {
        &self.repos
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.repos.iter().any(|r| r.name == name)
    }

    pub fn get(&self, index: usize) -> Option<&TrackedRepository> {
        self.repos.get(index)
    }

    /// Append `repo` and persist. The caller guarantees uniqueness.
    pub fn push(&mut self, repo: TrackedRepository) {
        self.repos.push(repo);
        self.persist();
    }

    /// Remove every entry named `name` and persist. Returns whether anything
    /// was removed; nothing is written when it wasn't.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.repos.len();
        self.repos.retain(|r| r.name != name);
        if self.repos.len() == before {
            return false;
        }
        self.persist();
        true
    }

    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = write(path, &self.repos) {
            tracing::warn!(error = %e, path = %path.display(), "failed to save tracked repositories");
        }
    }
}

fn read(path: &Path) -> Result<Option<Vec<TrackedRepository>>> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&data)?))
}

fn write(path: &Path, repos: &[TrackedRepository]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string(repos)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_disk() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("repos.json");
        (dir, path)
    }

    #[test]
    fn missing_file_starts_empty() {
        let (_dir, path) = on_disk();
        let store = TrackedStore::load(Some(path.clone()));
        assert!(store.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let (_dir, path) = on_disk();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();
        assert!(TrackedStore::load(Some(path)).is_empty());
    }

    #[test]
    fn mutations_round_trip_through_disk() {
        let (_dir, path) = on_disk();
        let mut store = TrackedStore::load(Some(path.clone()));
        store.push(TrackedRepository::new("facebook/react"));
        store.push(TrackedRepository::new("rust-lang/rust"));
        store.push(TrackedRepository::new("tokio-rs/tokio"));
        assert!(store.remove("rust-lang/rust"));

        let reloaded = TrackedStore::load(Some(path));
        assert_eq!(reloaded.repos(), store.repos());
        assert_eq!(
            reloaded.repos(),
            [
                TrackedRepository::new("facebook/react"),
                TrackedRepository::new("tokio-rs/tokio"),
            ]
        );
    }

    #[test]
    fn file_holds_json_array_of_names() {
        let (_dir, path) = on_disk();
        let mut store = TrackedStore::load(Some(path.clone()));
        store.push(TrackedRepository::new("facebook/react"));
        let raw = std::fs::read_to_string(path).unwrap();
        assert_eq!(raw, r#"[{"name":"facebook/react"}]"#);
    }

    #[test]
    fn removing_absent_name_is_noop() {
        let mut store = TrackedStore::in_memory(vec![TrackedRepository::new("a/b")]);
        assert!(!store.remove("c/d"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_is_exact_match() {
        let mut store = TrackedStore::in_memory(vec![TrackedRepository::new("a/b")]);
        assert!(!store.remove("A/B"));
        assert!(store.remove("a/b"));
        assert!(store.is_empty());
    }
}

use std::path::{Component, Path, PathBuf};

#[async_trait::async_trait]
pub trait FileStorage: Send + Sync {
    async fn exists(&self, path: &str) -> bool;
    fn url(&self, path: &str) -> String;
}

/// Files stored under a local directory and served from `base_url`.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// Relative paths only, no `..` escapes out of the root.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }

        Some(self.root.join(relative))
    }
}

#[async_trait::async_trait]
impl FileStorage for LocalStorage {
    async fn exists(&self, path: &str) -> bool {
        let Some(full) = self.resolve(path) else {
            return false;
        };

        tokio::fs::try_exists(full).await.unwrap_or(false)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

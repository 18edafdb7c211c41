//! Content-addressed artifact storage for generated files.

use std::path::PathBuf;

use sha2::{Digest, Sha256};
use tracing::instrument;

use ton_error::{StoreError, StoreErrorKind, TonResult};

/// Writes generated artifacts (magazine PDFs) under a local root and hands
/// back the public URL they are served from.
///
/// Files are content-addressed by SHA-256, so re-uploading identical bytes
/// is idempotent and nothing ever needs invalidation.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
    public_base: String,
}

impl ArtifactStore {
    /// Create an artifact store rooted at `root`, served under `public_base`.
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Persist a magazine PDF and return its public URL.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub async fn store_magazine_pdf(&self, bytes: &[u8]) -> TonResult<String> {
        self.store("magazines", "pdf", bytes).await
    }

    async fn store(&self, prefix: &str, extension: &str, bytes: &[u8]) -> TonResult<String> {
        let digest = Sha256::digest(bytes);
        let name = format!("{:x}.{extension}", digest);
        let dir = self.root.join(prefix);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StoreError::new(StoreErrorKind::Artifact(e.to_string())))?;
        tokio::fs::write(dir.join(&name), bytes)
            .await
            .map_err(|e| StoreError::new(StoreErrorKind::Artifact(e.to_string())))?;
        Ok(format!("{}/{prefix}/{name}", self.public_base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn identical_bytes_land_at_the_same_url() {
        let dir = std::env::temp_dir().join(format!("ton-artifacts-{}", uuid::Uuid::new_v4()));
        let store = ArtifactStore::new(&dir, "https://static.talkofnations.co.ke/");
        let a = store.store_magazine_pdf(b"%PDF-1.7 sample").await.unwrap();
        let b = store.store_magazine_pdf(b"%PDF-1.7 sample").await.unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with("https://static.talkofnations.co.ke/magazines/"));
        assert!(a.ends_with(".pdf"));
        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}

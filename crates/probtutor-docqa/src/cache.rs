//! Process-lifetime cache of built chains, keyed by document path.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

use crate::chain::RetrievalChain;
use crate::DocQaError;

type Slot = Arc<OnceCell<Arc<RetrievalChain>>>;

/// Builds each document's chain at most once.
///
/// Paths are canonicalized first, so `./lecture.txt` and its absolute form
/// share an entry. Concurrent callers for the same path wait on one build;
/// a failed build leaves the slot empty and the next caller retries.
#[derive(Default)]
pub struct PipelineCache {
    slots: Mutex<HashMap<PathBuf, Slot>>,
}

impl PipelineCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_build<F, Fut>(
        &self,
        path: &Path,
        build: F,
    ) -> Result<Arc<RetrievalChain>, DocQaError>
    where
        F: FnOnce(PathBuf) -> Fut,
        Fut: Future<Output = Result<RetrievalChain, DocQaError>>,
    {
        let key = std::fs::canonicalize(path)
            .map_err(|_| DocQaError::DocumentNotFound(path.to_path_buf()))?;

        let slot = {
            let mut slots = self.slots.lock().await;
            slots.entry(key.clone()).or_default().clone()
        };

        let chain = slot
            .get_or_try_init(|| {
                debug!(path = %key.display(), "building retrieval chain");
                let pending = build(key.clone());
                async move { pending.await.map(Arc::new) }
            })
            .await?;
        Ok(chain.clone())
    }

    /// Number of paths with a built chain.
    pub async fn len(&self) -> usize {
        self.slots
            .lock()
            .await
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::chain::tests::{lecture_file, KeywordEmbedder, RecordingChat};
    use crate::{PipelineSettings, SlidingWindowSplitter, TextDocumentLoader};

    async fn build_chain(path: PathBuf, builds: &AtomicUsize) -> Result<RetrievalChain, DocQaError> {
        builds.fetch_add(1, Ordering::SeqCst);
        RetrievalChain::build(
            &path,
            &PipelineSettings::default(),
            &TextDocumentLoader::new(),
            &SlidingWindowSplitter::new(),
            Arc::new(KeywordEmbedder),
            Arc::new(RecordingChat::default()),
        )
        .await
    }

    #[tokio::test]
    async fn builds_once_per_path() {
        let file = lecture_file();
        let cache = PipelineCache::new();
        let builds = AtomicUsize::new(0);

        let first = cache
            .get_or_build(file.path(), |p| build_chain(p, &builds))
            .await
            .unwrap();
        let second = cache
            .get_or_build(file.path(), |p| build_chain(p, &builds))
            .await
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_build() {
        let file = lecture_file();
        let cache = PipelineCache::new();
        let builds = AtomicUsize::new(0);

        let (a, b) = tokio::join!(
            cache.get_or_build(file.path(), |p| build_chain(p, &builds)),
            cache.get_or_build(file.path(), |p| build_chain(p, &builds)),
        );
        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_path_is_not_found_and_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PipelineCache::new();
        let builds = AtomicUsize::new(0);

        let err = cache
            .get_or_build(&dir.path().join("gone.txt"), |p| build_chain(p, &builds))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, DocQaError::DocumentNotFound(_)));
        assert_eq!(builds.load(Ordering::SeqCst), 0);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn failed_build_is_retried() {
        let file = lecture_file();
        let cache = PipelineCache::new();
        let builds = AtomicUsize::new(0);

        let failed = cache
            .get_or_build(file.path(), |_| async {
                builds.fetch_add(1, Ordering::SeqCst);
                Err(DocQaError::Network("connection refused".into()))
            })
            .await;
        assert!(failed.is_err());

        cache
            .get_or_build(file.path(), |p| build_chain(p, &builds))
            .await
            .unwrap();
        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }
}

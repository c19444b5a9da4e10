//! Cache-or-fetch coordination for sheet images.

use worksafe_client::SheetCapturer;
use worksafe_core::{Error, Scope, SdsProduct, SheetStore, sheet_file_name};

/// Return the PNG bytes for a product's sheet, fetching and caching on miss.
///
/// Concurrent misses on the same key each fetch; last write wins and the
/// copies are identical, so no per-key lock is held.
pub async fn resolve_sheet(
    store: &SheetStore, capturer: &dyn SheetCapturer, product: &SdsProduct, scope: &Scope,
) -> Result<Vec<u8>, Error> {
    product.validate()?;
    let key = sheet_file_name(&product.name, &product.manufacturer);

    if store.exists(&key, scope).await {
        tracing::debug!(%key, "sheet cached, reading");
        return store.read(&key, scope).await;
    }

    tracing::debug!(%key, url = %product.url, "sheet not cached, capturing");
    let bytes = capturer.capture(&product.url).await.map_err(|e| Error::Fetch(e.to_string()))?;
    store.write(&key, scope, &bytes).await?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use worksafe_client::ScrapeError;

    struct StubCapturer {
        bytes: Vec<u8>,
        calls: AtomicUsize,
    }

    impl StubCapturer {
        fn new(bytes: Vec<u8>) -> Self {
            Self { bytes, calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl SheetCapturer for StubCapturer {
        async fn capture(&self, _url: &str) -> Result<Vec<u8>, ScrapeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.bytes.clone())
        }
    }

    struct FailingCapturer;

    #[async_trait]
    impl SheetCapturer for FailingCapturer {
        async fn capture(&self, _url: &str) -> Result<Vec<u8>, ScrapeError> {
            Err(ScrapeError::Capture("boom".into()))
        }
    }

    fn product() -> SdsProduct {
        SdsProduct {
            name: "Liquid Bleach".into(),
            manufacturer: "Acme Chemical".into(),
            url: "https://example.com/sheet".into(),
        }
    }

    #[tokio::test]
    async fn test_miss_fetches_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        let store = SheetStore::new(dir.path());
        let capturer = StubCapturer::new(b"png-bytes".to_vec());

        let bytes = resolve_sheet(&store, &capturer, &product(), &Scope::Global).await.unwrap();
        assert_eq!(bytes, b"png-bytes");
        assert!(store.exists("Liquid-Bleach_Acme-Chemical.png", &Scope::Global).await);
    }

    #[tokio::test]
    async fn test_hit_skips_capture() {
        let dir = tempfile::tempdir().unwrap();
        let store = SheetStore::new(dir.path());
        let capturer = StubCapturer::new(b"first".to_vec());

        resolve_sheet(&store, &capturer, &product(), &Scope::Global).await.unwrap();
        let bytes = resolve_sheet(&store, &capturer, &product(), &Scope::Global).await.unwrap();

        assert_eq!(bytes, b"first");
        assert_eq!(capturer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_validation_precedes_capture() {
        let dir = tempfile::tempdir().unwrap();
        let store = SheetStore::new(dir.path());
        let capturer = StubCapturer::new(vec![]);

        let bad = SdsProduct { name: "".into(), manufacturer: "m".into(), url: "u".into() };
        let err = resolve_sheet(&store, &capturer, &bad, &Scope::Global).await.unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(capturer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_capture_failure_surfaces_as_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let store = SheetStore::new(dir.path());

        let err = resolve_sheet(&store, &FailingCapturer, &product(), &Scope::Global).await.unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));
        assert!(!store.exists("Liquid-Bleach_Acme-Chemical.png", &Scope::Global).await);
    }

    #[tokio::test]
    async fn test_concurrent_misses_both_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let store = SheetStore::new(dir.path());
        let first = StubCapturer::new(b"payload-a".to_vec());
        let second = StubCapturer::new(b"payload-b".to_vec());
        let p = product();

        let (a, b) = tokio::join!(
            resolve_sheet(&store, &first, &p, &Scope::Global),
            resolve_sheet(&store, &second, &p, &Scope::Global),
        );

        // Both callers get valid bytes whether they fetched or read the
        // other's write.
        let a = a.unwrap();
        let b = b.unwrap();
        assert!(a == b"payload-a" || a == b"payload-b");
        assert!(b == b"payload-a" || b == b"payload-b");

        // Last write wins: the cached copy is one of the two payloads,
        // never a blend.
        let cached =
            store.read("Liquid-Bleach_Acme-Chemical.png", &Scope::Global).await.unwrap();
        assert!(cached == b"payload-a" || cached == b"payload-b");
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;

use crate::{
    forms::UploadedFile,
    models::{MediaImage, StoredFile},
};

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("CDN request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("CDN rejected request: {0}")]
    Rejected(String),
    #[error("Object storage error: {0}")]
    Storage(String),
}

/// What the CDN hands back for a stored asset.
#[derive(Debug, Clone, Deserialize)]
pub struct CdnAsset {
    pub secure_url: String,
    pub public_id: String,
}

#[async_trait]
pub trait MediaCdn: Send + Sync {
    async fn upload(&self, file: &UploadedFile, folder: &str) -> Result<CdnAsset, MediaError>;

    async fn destroy(&self, public_id: &str) -> Result<(), MediaError>;
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(&self, path: &str, file: &UploadedFile) -> Result<(), MediaError>;

    async fn remove(&self, paths: &[String]) -> Result<(), MediaError>;

    fn public_url(&self, path: &str) -> String;

    /// Maps a client reference (bare path or public URL) back to a storage path.
    fn resolve_path(&self, reference: &str) -> Option<String> {
        let base = self.public_url("");
        if let Some(path) = reference.strip_prefix(&base) {
            return (!path.is_empty()).then(|| path.to_string());
        }
        if reference.contains("://") || reference.is_empty() {
            return None;
        }
        Some(reference.trim_start_matches('/').to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaRef {
    Cdn(String),
    Storage(String),
}

/// Provider-side effects of one request.
///
/// Uploads land in `attached` as soon as they succeed and removals are only
/// staged in `detached`. After the document is written, `commit` deletes the
/// detached media; if anything fails first, `rollback` deletes the attached
/// media instead. Both are best effort.
#[derive(Debug, Default)]
pub struct MediaChanges {
    attached: Vec<MediaRef>,
    detached: Vec<MediaRef>,
}

impl MediaChanges {
    pub fn attached(&self) -> &[MediaRef] {
        &self.attached
    }

    pub fn detached(&self) -> &[MediaRef] {
        &self.detached
    }

    pub fn detach(&mut self, media: MediaRef) {
        self.detached.push(media);
    }

    pub async fn commit(self, media: &MediaServices) {
        media.discard(&self.detached).await;
    }

    pub async fn rollback(self, media: &MediaServices) {
        if !self.attached.is_empty() {
            tracing::warn!(
                "Rolling back {} uploaded media object(s)",
                self.attached.len()
            );
        }
        media.discard(&self.attached).await;
    }
}

#[derive(Clone)]
pub struct MediaServices {
    pub cdn: Arc<dyn MediaCdn>,
    pub storage: Arc<dyn ObjectStorage>,
}

impl MediaServices {
    pub fn new(cdn: Arc<dyn MediaCdn>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { cdn, storage }
    }

    /// Sends every file to the CDN at once and waits for the whole batch.
    pub async fn upload_images(
        &self,
        files: &[UploadedFile],
        folder: &str,
        changes: &mut MediaChanges,
    ) -> Result<Vec<MediaImage>, MediaError> {
        let results = join_all(files.iter().map(|file| self.cdn.upload(file, folder))).await;

        let mut images = Vec::with_capacity(results.len());
        let mut failure = None;

        for result in results {
            match result {
                Ok(asset) => {
                    changes
                        .attached
                        .push(MediaRef::Cdn(asset.public_id.clone()));
                    images.push(MediaImage {
                        url: asset.secure_url,
                        public_id: asset.public_id,
                    });
                }
                Err(e) => {
                    tracing::error!("CDN upload to {} failed: {}", folder, e);
                    if failure.is_none() {
                        failure = Some(e);
                    }
                }
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(images),
        }
    }

    /// Uploads to the object store one file at a time.
    ///
    /// Every file of the batch gets a later stamp than the one before it, so
    /// equal names never share an object path.
    pub async fn upload_files(
        &self,
        files: &[UploadedFile],
        folder: &str,
        changes: &mut MediaChanges,
    ) -> Result<Vec<StoredFile>, MediaError> {
        let mut stored = Vec::with_capacity(files.len());
        let mut last_stamp = i64::MIN;

        for file in files {
            let stamp = chrono::Utc::now()
                .timestamp_millis()
                .max(last_stamp.saturating_add(1));
            last_stamp = stamp;

            let path = storage_path(folder, &file.file_name, stamp);
            self.storage.upload(&path, file).await?;
            changes.attached.push(MediaRef::Storage(path.clone()));

            stored.push(StoredFile {
                url: self.storage.public_url(&path),
                path,
            });
        }

        Ok(stored)
    }

    async fn discard(&self, refs: &[MediaRef]) {
        let mut paths = Vec::new();

        for media in refs {
            match media {
                MediaRef::Cdn(public_id) => {
                    if let Err(e) = self.cdn.destroy(public_id).await {
                        tracing::warn!("CDN delete failed for {}: {}", public_id, e);
                    }
                }
                MediaRef::Storage(path) => paths.push(path.clone()),
            }
        }

        if paths.is_empty() {
            return;
        }

        match self.storage.remove(&paths).await {
            Ok(()) => tracing::info!("Removed storage objects: {:?}", paths),
            Err(e) => tracing::warn!("Storage delete failed for {:?}: {}", paths, e),
        }
    }
}

/// `{folder}/{unix millis}-{file name}`
pub fn storage_path(folder: &str, file_name: &str, stamp: i64) -> String {
    let name = file_name
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("file");

    format!("{}/{}-{}", folder, stamp, name)
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[tokio::test]
    async fn failed_image_batch_records_the_successful_uploads() {
        let (media, cdn, _) = services(
            FakeCdn {
                fail_on: Some("b.png".into()),
                ..Default::default()
            },
            FakeStorage::default(),
        );
        let files = vec![
            file("images", "a.png", "image/png"),
            file("images", "b.png", "image/png"),
            file("images", "c.png", "image/png"),
        ];
        let mut changes = MediaChanges::default();

        let result = media.upload_images(&files, "products/images/lamp", &mut changes).await;

        assert!(matches!(result, Err(MediaError::Rejected(_))));
        assert_eq!(
            changes.attached(),
            &[
                MediaRef::Cdn("products/images/lamp/a.png".into()),
                MediaRef::Cdn("products/images/lamp/c.png".into()),
            ]
        );

        changes.rollback(&media).await;
        assert_eq!(
            *cdn.destroyed.lock().unwrap(),
            vec![
                "products/images/lamp/a.png".to_string(),
                "products/images/lamp/c.png".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn sequential_upload_stops_at_first_failure() {
        let (media, _, storage) = services(
            FakeCdn::default(),
            FakeStorage {
                fail_on: Some("two.mp4".into()),
                ..Default::default()
            },
        );
        let files = vec![
            file("videos", "one.mp4", "video/mp4"),
            file("videos", "two.mp4", "video/mp4"),
            file("videos", "three.mp4", "video/mp4"),
        ];
        let mut changes = MediaChanges::default();

        let result = media.upload_files(&files, "products/lamp/videos", &mut changes).await;

        assert!(result.is_err());
        let objects = storage.objects.lock().unwrap().clone();
        assert_eq!(objects.len(), 1);
        assert!(objects[0].starts_with("products/lamp/videos/"));
        assert!(objects[0].ends_with("-one.mp4"));
        assert_eq!(changes.attached().len(), 1);
    }

    #[tokio::test]
    async fn same_named_files_get_distinct_paths() {
        let (media, _, storage) = services(FakeCdn::default(), FakeStorage::default());
        let files = vec![
            file("downloadpdfs", "manual.pdf", "application/pdf"),
            file("downloadpdfs", "manual.pdf", "application/pdf"),
            file("downloadpdfs", "manual.pdf", "application/pdf"),
        ];
        let mut changes = MediaChanges::default();

        let stored = media
            .upload_files(&files, "products/desk-lamp/download", &mut changes)
            .await
            .unwrap();

        let paths: Vec<_> = stored.iter().map(|f| f.path.clone()).collect();
        assert_ne!(paths[0], paths[1]);
        assert_ne!(paths[1], paths[2]);
        assert_ne!(paths[0], paths[2]);
        assert_eq!(*storage.objects.lock().unwrap(), paths);
        assert!(paths.iter().all(|p| p.ends_with("-manual.pdf")));
    }

    #[tokio::test]
    async fn commit_swallows_delete_failures() {
        let (media, _, storage) = services(
            FakeCdn {
                fail_destroy: true,
                ..Default::default()
            },
            FakeStorage::default(),
        );
        let mut changes = MediaChanges::default();
        changes.detach(MediaRef::Cdn("gone".into()));
        changes.detach(MediaRef::Storage("products/lamp/videos/1-a.mp4".into()));

        changes.commit(&media).await;

        assert_eq!(
            *storage.removed.lock().unwrap(),
            vec!["products/lamp/videos/1-a.mp4".to_string()]
        );
    }

    #[test]
    fn storage_path_keeps_only_the_base_name() {
        let path = storage_path("products/lamp/download", "../../etc/manual.pdf", 1700000000000);

        assert_eq!(path, "products/lamp/download/1700000000000-manual.pdf");
    }

    #[test]
    fn resolve_path_accepts_paths_and_public_urls() {
        let storage = FakeStorage::default();

        assert_eq!(
            storage.resolve_path("https://storage.test/public/products/lamp/videos/1-a.mp4"),
            Some("products/lamp/videos/1-a.mp4".to_string())
        );
        assert_eq!(
            storage.resolve_path("products/lamp/videos/1-a.mp4"),
            Some("products/lamp/videos/1-a.mp4".to_string())
        );
        assert_eq!(storage.resolve_path("https://elsewhere.test/x.mp4"), None);
    }
}

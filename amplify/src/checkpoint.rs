use std::path::{Path, PathBuf};

use async_trait::async_trait;

use amplify_core::{CheckpointSink, CheckpointTag, stamp};
use amplify_types::{AmplifyError, ChunkedListing};

/// Checkpoint sink writing one JSON file per save into a directory.
///
/// Periodic saves are named `{pages}_{account}_following_data_post_{YYYYMMDD}.json`
/// and the save made when a run stops is named
/// `{account}_following_data_post_{YYYYMMDD}_all.json`, where the date is the
/// run's anchor day. Files hold the listing as a JSON object keyed by cursor.
#[derive(Debug, Clone)]
pub struct JsonDirCheckpoint {
    dir: PathBuf,
}

impl JsonDirCheckpoint {
    /// Write checkpoints under `dir`, creating it on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name used for `tag`.
    #[must_use]
    pub fn file_name(tag: &CheckpointTag<'_>) -> String {
        let account: String = tag
            .account
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        let day = stamp(tag.anchor);
        if tag.last {
            format!("{account}_following_data_post_{day}_all.json")
        } else {
            format!("{}_{account}_following_data_post_{day}.json", tag.pages)
        }
    }

    /// Full path used for `tag`.
    #[must_use]
    pub fn path_for(&self, tag: &CheckpointTag<'_>) -> PathBuf {
        self.dir.join(Self::file_name(tag))
    }

    /// Read a listing back from a checkpoint file.
    ///
    /// # Errors
    /// Returns `Checkpoint` if the file cannot be read and `Data` if it does
    /// not hold a listing.
    pub async fn load(path: impl AsRef<Path>) -> Result<ChunkedListing, AmplifyError> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl CheckpointSink for JsonDirCheckpoint {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "amplify::checkpoint::save",
            skip_all,
            fields(account = tag.account, pages = tag.pages, last = tag.last),
        )
    )]
    async fn save(
        &self,
        tag: CheckpointTag<'_>,
        listing: &ChunkedListing,
    ) -> Result<(), AmplifyError> {
        let body = serde_json::to_vec(listing)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(&tag);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &body).await?;
        tokio::fs::rename(&tmp, &path).await?;

        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.display(), bytes = body.len(), "checkpoint written");

        Ok(())
    }
}

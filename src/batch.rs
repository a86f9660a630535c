use std::path::{Path, PathBuf};

use anyhow::anyhow;
use futures::{StreamExt, stream};

use crate::{
    input,
    sss::{self, Reconstruction, ReconstructionError, ReconstructionSettings},
};

/// Loads the share file at `path` and reconstructs its secret.
pub fn reconstruct_file(
    path: &Path,
    settings: &ReconstructionSettings,
) -> Result<Reconstruction, ReconstructionError> {
    let file = input::load_share_file(path)?;
    tracing::info!(
        n = file.n,
        k = file.k,
        shares = file.shares.len(),
        rejected = file.rejected.len(),
        "Loaded share file"
    );
    sss::reconstruct_share_file(&file, settings)
}

pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<Reconstruction, anyhow::Error>,
}

/// Reconstructs every file independently, at most `concurrency` at a time.
///
/// Each reconstruction runs on the blocking thread pool. Outcomes are returned in
/// the order of `paths`, and a failing file never affects the others.
pub async fn reconstruct_files(
    paths: Vec<PathBuf>,
    settings: ReconstructionSettings,
    concurrency: usize,
) -> Vec<FileOutcome> {
    stream::iter(paths)
        .map(move |path| async move {
            let span = tracing::info_span!("reconstruction", path = %path.display());
            let task_path = path.clone();
            let result = tokio::task::spawn_blocking(move || {
                let _guard = span.enter();
                reconstruct_file(&task_path, &settings)
            })
            .await
            .map_err(|e| anyhow!("reconstruction task failed: {e}"))
            .and_then(|r| r.map_err(anyhow::Error::from));
            FileOutcome { path, result }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

use anyhow::Result;
use futures::stream::{Stream, StreamExt};
use glob::{glob, Pattern};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::pairing::source_path_for;

/// Configuration for file-pair discovery
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Method whose output files are searched for
    pub primary_method: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            primary_method: "seams".to_string(),
        }
    }
}

/// Source document and the primary method's output for it
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FilePair {
    pub source: PathBuf,
    pub primary: PathBuf,
}

/// Discovers every `**/*_<primary>.txt` under the root and pairs it with `<stem>.txt`
///
/// The source document is not checked here; a missing one is reported when the pair is read.
pub fn discover_pairs(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> impl Stream<Item = Result<FilePair>> {
    let root_path = root_dir.as_ref().to_path_buf();

    // WHY: using async_stream would be cleaner but adds dependency;
    // futures::stream provides sufficient async iteration capabilities
    futures::stream::unfold(DiscoveryState::new(root_path, config), |mut state| async move {
        state.next_pair().await.map(|result| (result, state))
    })
}

/// Internal state for pair discovery iteration
struct DiscoveryState {
    root_dir: PathBuf,
    config: DiscoveryConfig,
    glob_iter: Option<glob::Paths>,
}

impl DiscoveryState {
    fn new(root_dir: PathBuf, config: DiscoveryConfig) -> Self {
        Self {
            root_dir,
            config,
            glob_iter: None,
        }
    }

    async fn next_pair(&mut self) -> Option<Result<FilePair>> {
        if self.glob_iter.is_none() {
            let root = Pattern::escape(&self.root_dir.to_string_lossy());
            let method = Pattern::escape(&self.config.primary_method);
            let pattern = format!("{}/**/*_{}.txt", root, method);
            debug!("Starting pair discovery with pattern: {}", pattern);

            match glob(&pattern) {
                Ok(paths) => {
                    self.glob_iter = Some(paths);
                    info!("Pair discovery initialized for root: {}", self.root_dir.display());
                }
                Err(e) => {
                    return Some(Err(anyhow::anyhow!("Failed to create glob pattern: {}", e)));
                }
            }
        }

        loop {
            let next = self.glob_iter.as_mut()?.next()?;
            match next {
                Ok(path) => {
                    if let Some(pair) = self.pair_for(path).await {
                        return Some(Ok(pair));
                    }
                }
                // WHY: an unreadable directory entry must not stop discovery of the rest
                Err(e) => warn!("Glob iteration error (continuing): {}", e),
            }
        }
    }

    async fn pair_for(&self, primary: PathBuf) -> Option<FilePair> {
        match fs::metadata(&primary).await {
            Ok(metadata) if metadata.is_file() => {}
            Ok(_) => {
                debug!("Not a file, skipping: {}", primary.display());
                return None;
            }
            Err(e) => {
                warn!("Cannot access {}: {}", primary.display(), e);
                return None;
            }
        }

        let source = source_path_for(&primary, &self.config.primary_method)?;
        debug!("Found pair: {} ↔ {}", source.display(), primary.display());
        Some(FilePair { source, primary })
    }
}

/// Collect all discovered pairs, sorted by path
pub async fn collect_pairs(root_dir: impl AsRef<Path>, config: DiscoveryConfig) -> Result<Vec<FilePair>> {
    let mut pairs = Vec::new();
    let mut stream = Box::pin(discover_pairs(root_dir, config));

    while let Some(result) = stream.next().await {
        pairs.push(result?);
    }

    pairs.sort();
    info!("Discovered {} file pairs", pairs.len());
    Ok(pairs)
}

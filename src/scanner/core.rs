use super::directory::enumerate_files;
use super::ocr::OcrEngine;
use super::types::{
    Fingerprint, ScanHit, ScanPhase, ScanResult, ScanStats, ScanTask, ScannerConfig,
};
use super::worker::Worker;
use crate::parallel::ExecutionStrategy;
use anyhow::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Seen fingerprints plus accepted paths, owned by the collecting thread.
///
/// No two accepted paths share a fingerprint. When copies of one picture
/// match, whichever copy finished first wins.
#[derive(Debug, Default)]
pub struct MatchSet {
    seen: HashSet<Fingerprint>,
    accepted: Vec<PathBuf>,
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `hit`; returns `false` if its fingerprint was already seen
    pub fn offer(&mut self, hit: ScanHit) -> bool {
        if !self.seen.insert(hit.fingerprint) {
            return false;
        }
        self.accepted.push(hit.path);
        true
    }

    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    pub fn into_paths(self) -> Vec<PathBuf> {
        self.accepted
    }
}

/// Scan orchestrator: enumerate, dispatch, collect, de-duplicate
#[derive(Clone)]
pub struct Scanner {
    pub(crate) config: ScannerConfig,
    worker: Worker,
}

impl Scanner {
    pub fn new(config: ScannerConfig, engine: Arc<dyn OcrEngine>) -> Self {
        let worker = Worker::new(&config, engine);
        Self { config, worker }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Scan every file under `root` for `phrase`.
    ///
    /// The caller is responsible for checking that `root` is a directory.
    /// Individual file failures never abort the scan; only a panicking worker
    /// thread makes this return an error.
    pub fn scan(&self, root: &Path, phrase: &str) -> Result<ScanResult> {
        let span = tracing::info_span!("scan", root = %root.display(), phrase);
        let _entered = span.enter();
        let start_time = Instant::now();

        let mut phase = ScanPhase::Enumerating;
        tracing::debug!(?phase, "scan phase");
        let (files, warnings) = enumerate_files(root, self.config.follow_symlinks);

        let max_workers =
            ExecutionStrategy::calculate_optimal_workers(self.config.max_threads, self.config.thread_percentage);
        let strategy = ExecutionStrategy::for_workload(files.len(), max_workers);
        let mut stats = ScanStats {
            files_discovered: files.len(),
            workers: strategy.workers(),
            ..ScanStats::default()
        };
        tracing::info!("Starting scan of {} files using {} workers", files.len(), strategy.workers());

        let tasks: Vec<ScanTask> = files.into_iter().map(|path| ScanTask::new(path, phrase)).collect();

        phase = ScanPhase::Dispatching;
        tracing::debug!(?phase, "scan phase");

        let mut match_set = MatchSet::new();
        strategy.execute(
            tasks,
            |task, _worker_id| span.in_scope(|| self.worker.process(task)),
            |outcome| {
                if phase != ScanPhase::Collecting {
                    phase = ScanPhase::Collecting;
                    tracing::debug!(?phase, "scan phase");
                }
                stats.record(&outcome);
                if let Some(hit) = outcome.into_hit() {
                    let path = hit.path.clone();
                    if match_set.offer(hit) {
                        tracing::info!("Match: {}", path.display());
                    } else {
                        stats.duplicates_dropped += 1;
                        tracing::debug!("Duplicate content skipped: {}", path.display());
                    }
                }
            },
        )?;

        phase = ScanPhase::Complete;
        tracing::debug!(?phase, "scan phase");

        stats.matches = match_set.len();
        stats.scan_duration_ms = start_time.elapsed().as_millis() as u64;

        Ok(ScanResult {
            matches: match_set.into_paths(),
            stats,
            warnings,
        })
    }
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner").field("config", &self.config).finish_non_exhaustive()
    }
}

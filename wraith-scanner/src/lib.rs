//! # WRAITH Scanner
//!
//! Efficient batch scanning of announcements to discover payments.
//!
//! ## Features
//!
//! - **Batch Processing**: Scans announcements in configurable batches
//! - **View Tags**: Rejects ~255/256 of foreign announcements cheaply
//! - **Progress Reporting**: Callbacks for UI progress updates
//! - **Resumable Scans**: Track position to resume interrupted scans
//! - **Concurrent Scanning**: Batches fanned out to blocking worker tasks
//!
//! ## Example
//!
//! ```rust
//! use wraith_scanner::{Scanner, ScannerConfig};
//! use wraith_stealth::{create_stealth_payment, StealthWallet};
//!
//! let wallet = StealthWallet::generate()?;
//! let announcements = vec![create_stealth_payment(wallet.meta_address())?.announcement];
//!
//! let scanner = Scanner::from_wallet(&wallet);
//! let discoveries = scanner.scan(&announcements)?;
//! assert_eq!(discoveries.len(), 1);
//! # Ok::<(), wraith_core::WraithError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, instrument, warn};

use wraith_core::config::SuiteConfig;
use wraith_core::constants::{DEFAULT_SCAN_BATCH_SIZE, MAX_SCAN_BATCH_SIZE};
use wraith_core::error::{Result, WraithError};
use wraith_core::types::{Announcement, SecretScalar, ViewOnlyKeys};
use wraith_crypto::{suite_for, StealthProtocol};
use wraith_stealth::discovery::{scan_announcement_with, DiscoveryResult, ScanResult, ScanStats};
use wraith_stealth::{StealthWallet, WalletExport};

/// Progress is reported every this many announcements.
const PROGRESS_INTERVAL: u64 = 100;

/// Scanner configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Batch size for scanning
    pub batch_size: usize,
    /// Whether to stop on first discovery
    pub stop_on_first: bool,
    /// Whether to reject on view tag before the full check
    pub use_view_tags: bool,
    /// Number of concurrent workers for parallel scans
    pub workers: usize,
    /// Minimum announcement id to scan (inclusive)
    pub from_id: Option<u64>,
    /// Maximum announcement id to scan (inclusive)
    pub to_id: Option<u64>,
    /// Minimum timestamp to scan from (inclusive)
    pub from_timestamp: Option<u64>,
    /// Maximum timestamp to scan to (inclusive)
    pub to_timestamp: Option<u64>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_SCAN_BATCH_SIZE,
            stop_on_first: false,
            use_view_tags: true,
            workers: std::thread::available_parallelism().map_or(1, |n| n.get()),
            from_id: None,
            to_id: None,
            from_timestamp: None,
            to_timestamp: None,
        }
    }
}

impl ScannerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the batch size.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Enables stopping on first discovery.
    pub fn stop_on_first(mut self) -> Self {
        self.stop_on_first = true;
        self
    }

    /// Disables view tag filtering; every announcement gets the full check.
    pub fn ignore_view_tags(mut self) -> Self {
        self.use_view_tags = false;
        self
    }

    /// Sets the worker count for parallel scans.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the announcement id range.
    pub fn id_range(mut self, from: u64, to: u64) -> Self {
        self.from_id = Some(from);
        self.to_id = Some(to);
        self
    }

    /// Sets the time range filter.
    pub fn time_range(mut self, from: u64, to: u64) -> Self {
        self.from_timestamp = Some(from);
        self.to_timestamp = Some(to);
        self
    }

    /// Continues after a previously saved position.
    pub fn resume_from(mut self, position: &ScanPosition) -> Self {
        if position.total_scanned > 0 {
            self.from_id = Some(position.last_id.saturating_add(1));
        }
        self
    }

    /// Checks the configuration for values the scanner cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 || self.batch_size > MAX_SCAN_BATCH_SIZE {
            return Err(WraithError::ConfigError(format!(
                "batch size must be between 1 and {MAX_SCAN_BATCH_SIZE}, got {}",
                self.batch_size
            )));
        }
        if self.workers == 0 {
            return Err(WraithError::ConfigError("worker count must be at least 1".into()));
        }
        if let (Some(from), Some(to)) = (self.from_id, self.to_id) {
            if from > to {
                return Err(WraithError::ConfigError(format!("empty id range {from}..={to}")));
            }
        }
        Ok(())
    }

    /// Returns true if the announcement passes the id and time filters.
    pub fn includes(&self, announcement: &Announcement) -> bool {
        let id = announcement.id;
        let ts = announcement.timestamp;
        self.from_id.map_or(true, |from| id >= from)
            && self.to_id.map_or(true, |to| id <= to)
            && self.from_timestamp.map_or(true, |from| ts >= from)
            && self.to_timestamp.map_or(true, |to| ts <= to)
    }
}

/// Progress callback type.
pub type ProgressCallback = Box<dyn Fn(ScanProgress) + Send + Sync>;

/// Scan progress information.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Total announcements to scan
    pub total: u64,
    /// Announcements scanned so far
    pub scanned: u64,
    /// Discoveries found so far
    pub discoveries: u64,
    /// Current scan rate (announcements per second)
    pub rate: f64,
    /// Estimated time remaining in seconds
    pub eta_seconds: Option<f64>,
    /// Percentage complete (0-100)
    pub percent: f64,
}

impl ScanProgress {
    /// Creates a new progress tracker.
    pub fn new(total: u64) -> Self {
        Self {
            total,
            scanned: 0,
            discoveries: 0,
            rate: 0.0,
            eta_seconds: None,
            percent: 0.0,
        }
    }

    /// Updates progress with new values.
    pub fn update(&mut self, scanned: u64, discoveries: u64, elapsed_ms: u64) {
        self.scanned = scanned;
        self.discoveries = discoveries;

        if elapsed_ms > 0 {
            self.rate = (scanned as f64 / elapsed_ms as f64) * 1000.0;
        }

        if self.total > 0 {
            self.percent = (scanned as f64 / self.total as f64) * 100.0;

            if self.rate > 0.0 {
                let remaining = self.total.saturating_sub(scanned);
                self.eta_seconds = Some(remaining as f64 / self.rate);
            }
        } else {
            self.percent = 100.0;
        }
    }
}

/// Scan position for resumable scanning.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScanPosition {
    /// Highest scanned announcement ID
    pub last_id: u64,
    /// Latest scanned timestamp
    pub last_timestamp: u64,
    /// Total announcements scanned in this session
    pub total_scanned: u64,
    /// Total discoveries in this session
    pub total_discoveries: u64,
}

impl ScanPosition {
    /// Creates a new scan position.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates position after scanning an announcement.
    ///
    /// Parallel batches finish out of order, so this keeps the maximum.
    pub fn update(&mut self, announcement: &Announcement, discovered: bool) {
        self.last_id = self.last_id.max(announcement.id);
        self.last_timestamp = self.last_timestamp.max(announcement.timestamp);
        self.total_scanned += 1;
        if discovered {
            self.total_discoveries += 1;
        }
    }
}

/// Main scanner for discovering payments.
pub struct Scanner {
    /// View secret and spend public key
    keys: ViewOnlyKeys,
    /// Spend secret (for one-time key recovery); `None` for watch-only scans
    spend_secret: Option<SecretScalar>,
    suite: Arc<dyn StealthProtocol>,
    config: ScannerConfig,
    /// Current scan position
    position: RwLock<ScanPosition>,
    /// Scan statistics
    stats: RwLock<ScanStats>,
}

impl Scanner {
    /// Creates a watch-only scanner with the default suite.
    pub fn new(keys: ViewOnlyKeys) -> Self {
        Self {
            keys,
            spend_secret: None,
            suite: suite_for(&SuiteConfig::default()),
            config: ScannerConfig::default(),
            position: RwLock::new(ScanPosition::new()),
            stats: RwLock::new(ScanStats::new()),
        }
    }

    /// Creates a scanner that also recovers one-time keys.
    pub fn from_wallet(wallet: &StealthWallet) -> Self {
        Self::from_export(&wallet.export_full())
    }

    /// Creates a scanner from a key file; watch-only if the file is.
    pub fn from_export(export: &WalletExport) -> Self {
        let mut scanner = Self::new(export.view_only_keys()).with_suite(&export.suite);
        scanner.spend_secret = export.spend_secret.clone();
        scanner
    }

    /// Enables one-time key recovery.
    pub fn with_spend_secret(mut self, spend_secret: SecretScalar) -> Self {
        self.spend_secret = Some(spend_secret);
        self
    }

    /// Selects the hash and address format.
    pub fn with_suite(mut self, config: &SuiteConfig) -> Self {
        self.suite = suite_for(config);
        self
    }

    /// Replaces the scanner configuration.
    pub fn with_config(mut self, config: ScannerConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the scanner configuration.
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Returns the current scan position.
    pub fn position(&self) -> ScanPosition {
        self.position.read().clone()
    }

    /// Returns the current statistics.
    pub fn stats(&self) -> ScanStats {
        self.stats.read().clone()
    }

    /// Resets the scan position.
    pub fn reset_position(&self) {
        *self.position.write() = ScanPosition::new();
        *self.stats.write() = ScanStats::new();
    }

    /// Scans a single announcement.
    pub fn scan_one(&self, announcement: &Announcement) -> ScanResult {
        let result = self.evaluate(announcement);
        self.record(announcement, &result);
        result
    }

    /// Runs the check without touching position or statistics.
    fn evaluate(&self, announcement: &Announcement) -> ScanResult {
        let result = scan_announcement_with(
            self.suite.as_ref(),
            announcement,
            &self.keys,
            self.spend_secret.as_ref(),
            self.config.use_view_tags,
        );

        if let ScanResult::Failed(e) = &result {
            warn!(id = announcement.id, error = %e, "Skipping malformed announcement");
        }
        result
    }

    fn record(&self, announcement: &Announcement, result: &ScanResult) {
        self.stats.write().record(result);
        self.position.write().update(announcement, result.is_discovered());
    }

    /// Scans announcements sequentially.
    pub fn scan(&self, announcements: &[Announcement]) -> Result<Vec<DiscoveryResult>> {
        self.scan_inner(announcements, None)
    }

    /// Scans announcements sequentially with progress reporting.
    pub fn scan_with_progress(
        &self,
        announcements: &[Announcement],
        progress_callback: ProgressCallback,
    ) -> Result<Vec<DiscoveryResult>> {
        self.scan_inner(announcements, Some(&progress_callback))
    }

    #[instrument(skip_all, fields(total = announcements.len(), suite = %self.suite.config()))]
    fn scan_inner(
        &self,
        announcements: &[Announcement],
        progress_callback: Option<&ProgressCallback>,
    ) -> Result<Vec<DiscoveryResult>> {
        self.config.validate()?;

        let start = Instant::now();
        let mut discoveries = Vec::new();
        let mut progress = ScanProgress::new(announcements.len() as u64);
        let mut seen = 0u64;

        info!(batch_size = self.config.batch_size, "Starting scan");

        'batches: for (batch_idx, batch) in announcements.chunks(self.config.batch_size).enumerate() {
            let offset = batch_idx * self.config.batch_size;
            debug!(batch = batch_idx, count = batch.len(), "Scanning batch");

            for (i, announcement) in batch.iter().enumerate() {
                seen += 1;

                if self.config.includes(announcement) {
                    if let ScanResult::Discovered(payment) = self.scan_one(announcement) {
                        discoveries.push(DiscoveryResult {
                            announcement: announcement.clone(),
                            payment,
                            index: offset + i,
                        });

                        if self.config.stop_on_first {
                            info!("Stopping on first discovery");
                            break 'batches;
                        }
                    }
                }

                if let Some(callback) = progress_callback {
                    if seen % PROGRESS_INTERVAL == 0 {
                        progress.update(seen, discoveries.len() as u64, start.elapsed().as_millis() as u64);
                        callback(progress.clone());
                    }
                }
            }
        }

        if let Some(callback) = progress_callback {
            progress.update(seen, discoveries.len() as u64, start.elapsed().as_millis() as u64);
            callback(progress);
        }

        self.finish(start, discoveries.len());
        Ok(discoveries)
    }

    /// Scans announcements on blocking worker tasks, one batch per task.
    ///
    /// Results are returned in input order, and position and statistics
    /// end up as a sequential [`scan`](Self::scan) would leave them. With
    /// `stop_on_first`, workers share the lowest matching index found so
    /// far and stop once they pass it; anything scanned beyond it is
    /// discarded.
    #[instrument(skip_all, fields(total = announcements.len(), workers = self.config.workers))]
    pub async fn scan_parallel(
        self: &Arc<Self>,
        announcements: Arc<[Announcement]>,
    ) -> Result<Vec<DiscoveryResult>> {
        self.config.validate()?;

        let start = Instant::now();
        let batch_size = self.config.batch_size;
        let permits = Arc::new(Semaphore::new(self.config.workers));
        let first_match = Arc::new(AtomicUsize::new(usize::MAX));
        let mut tasks = JoinSet::new();

        info!(batch_size, "Starting parallel scan");

        for offset in (0..announcements.len()).step_by(batch_size) {
            let permit = permits
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| WraithError::WorkerFailed(format!("worker pool closed: {e}")))?;

            let scanner = Arc::clone(self);
            let announcements = Arc::clone(&announcements);
            let first_match = Arc::clone(&first_match);
            let end = (offset + batch_size).min(announcements.len());

            tasks.spawn_blocking(move || {
                let _permit = permit;
                scanner.scan_range(&announcements, offset, end, &first_match)
            });
        }

        let mut outcomes = Vec::with_capacity(announcements.len());
        while let Some(joined) = tasks.join_next().await {
            outcomes.extend(joined.map_err(worker_failure)?);
        }

        outcomes.sort_unstable_by_key(|(index, _)| *index);
        if self.config.stop_on_first {
            let cutoff = first_match.load(Ordering::Acquire);
            outcomes.retain(|(index, _)| *index <= cutoff);
        }

        let mut discoveries = Vec::new();
        for (index, result) in outcomes {
            let announcement = &announcements[index];
            self.record(announcement, &result);
            if let ScanResult::Discovered(payment) = result {
                discoveries.push(DiscoveryResult {
                    announcement: announcement.clone(),
                    payment,
                    index,
                });
            }
        }

        self.finish(start, discoveries.len());
        Ok(discoveries)
    }

    /// Evaluates `announcements[start..end]`, returning `(index, result)`
    /// for every announcement that passed the filters.
    fn scan_range(
        &self,
        announcements: &[Announcement],
        start: usize,
        end: usize,
        first_match: &AtomicUsize,
    ) -> Vec<(usize, ScanResult)> {
        debug!(start, end, "Scanning batch");

        let mut outcomes = Vec::new();
        for (index, announcement) in announcements.iter().enumerate().take(end).skip(start) {
            if self.config.stop_on_first && index > first_match.load(Ordering::Acquire) {
                break;
            }
            if !self.config.includes(announcement) {
                continue;
            }

            let result = self.evaluate(announcement);
            if result.is_discovered() {
                first_match.fetch_min(index, Ordering::AcqRel);
            }
            outcomes.push((index, result));
        }
        outcomes
    }

    fn finish(&self, start: Instant, discovered: usize) {
        let mut stats = self.stats.write();
        stats.duration_ms += start.elapsed().as_millis() as u64;

        info!(
            discoveries = discovered,
            scanned = stats.total_scanned,
            filtered = stats.filtered,
            duration_ms = stats.duration_ms,
            rate = format!("{:.2}/s", stats.rate()),
            "Scan complete"
        );
    }
}

/// Maps a panicked or cancelled worker task to a scan error.
fn worker_failure(err: JoinError) -> WraithError {
    let reason = if err.is_panic() { "panicked" } else { "was cancelled" };
    WraithError::WorkerFailed(format!("scan worker {reason}: {err}"))
}

/// Scan result summary.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Number of announcements scanned
    pub total_scanned: u64,
    /// Number rejected by view tag
    pub filtered: u64,
    /// Number of payments discovered
    pub discoveries: u64,
    /// Number of errors
    pub errors: u64,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Scan rate (announcements per second)
    pub rate: f64,
    /// Filter efficiency (% filtered by view tag)
    pub filter_efficiency: f64,
}

impl From<ScanStats> for ScanSummary {
    fn from(stats: ScanStats) -> Self {
        Self {
            total_scanned: stats.total_scanned,
            filtered: stats.filtered,
            discoveries: stats.discoveries,
            errors: stats.errors,
            duration_ms: stats.duration_ms,
            rate: stats.rate(),
            filter_efficiency: stats.filter_efficiency(),
        }
    }
}

// ⚙️ Pipeline configuration
// Every path and endpoint the stages touch is passed in explicitly

use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// FILE NAMES
// ============================================================================

pub const POKEMON_RAW_FILE: &str = "pokemon_raw.jsonl";
pub const MOVES_RAW_FILE: &str = "moves_raw.jsonl";
pub const TYPES_RAW_FILE: &str = "types_raw.jsonl";

pub const POKEMON_CSV: &str = "pokemon.csv";
pub const POKEMON_STATS_CSV: &str = "pokemon_stats.csv";
pub const POKEMON_TYPES_CSV: &str = "pokemon_types.csv";
pub const POKEMON_MOVES_CSV: &str = "pokemon_moves.csv";
pub const MOVES_CSV: &str = "moves.csv";
pub const TYPE_EFFECTIVENESS_CSV: &str = "type_effectiveness.csv";

pub const RUN_MANIFEST_FILE: &str = "run_manifest.json";

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

// ============================================================================
// RETRY POLICY
// ============================================================================

/// How the fetcher reacts to a failed request.
///
/// Attempt `i` (0-based) that fails is followed by a sleep of
/// `base_delay * (1 + i)`. Once `max_attempts` are used up, one final
/// request is issued and its failure is fatal.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,

    /// When false, 4xx answers other than 408/429 fail on the spot.
    pub retry_client_errors: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            retry_client_errors: false,
        }
    }
}

impl RetryPolicy {
    /// Policy that never sleeps (tests, local mirrors)
    pub fn immediate(max_attempts: u32) -> Self {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::ZERO,
            retry_client_errors: false,
        }
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * (1 + attempt)
    }

    /// Whether a non-success status is worth another attempt.
    pub fn is_retryable_status(&self, status: u16) -> bool {
        match status {
            408 | 429 => true,
            400..=499 => self.retry_client_errors,
            _ => true,
        }
    }
}

// ============================================================================
// ETL CONFIG
// ============================================================================

#[derive(Debug, Clone)]
pub struct EtlConfig {
    pub base_url: String,
    pub raw_dir: PathBuf,
    pub silver_dir: PathBuf,

    // List page sizes (limit=...)
    pub pokemon_page_size: usize,
    pub move_page_size: usize,
    pub type_page_size: usize,

    pub request_timeout: Duration,
    pub retry: RetryPolicy,

    /// Print a progress line every N detail fetches (0 = never)
    pub progress_every: usize,
}

impl Default for EtlConfig {
    fn default() -> Self {
        EtlConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            raw_dir: PathBuf::from("data/raw"),
            silver_dir: PathBuf::from("data/silver"),
            pokemon_page_size: 2000,
            move_page_size: 2000,
            type_page_size: 200,
            request_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            progress_every: 100,
        }
    }
}

impl EtlConfig {
    /// Builder pattern: put `raw/` and `silver/` under one data root
    pub fn with_data_dir(mut self, root: &Path) -> Self {
        self.raw_dir = root.join("raw");
        self.silver_dir = root.join("silver");
        self
    }

    /// Builder pattern: point at another API host (mirror, test server)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_progress_every(mut self, every: usize) -> Self {
        self.progress_every = every;
        self
    }

    pub fn raw_path(&self, file: &str) -> PathBuf {
        self.raw_dir.join(file)
    }

    pub fn silver_path(&self, file: &str) -> PathBuf {
        self.silver_dir.join(file)
    }

    /// The manifest sits next to `raw/` (the parent of the raw directory)
    pub fn manifest_path(&self) -> PathBuf {
        self.raw_dir
            .parent()
            .map(|p| p.join(RUN_MANIFEST_FILE))
            .unwrap_or_else(|| PathBuf::from(RUN_MANIFEST_FILE))
    }
}

//! Load request and progress bookkeeping.

/// One logical asset with its primary location and a mirror.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    /// Primary location.
    pub url: String,
    /// Mirror of the primary payload.
    pub fallback_url: String,
    /// Set once the single fallback attempt has been spent.
    pub attempted_fallback: bool,
}

impl LoadRequest {
    /// Creates a request that starts on the primary location.
    #[must_use]
    pub fn new(url: impl Into<String>, fallback_url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            fallback_url: fallback_url.into(),
            attempted_fallback: false,
        }
    }

    /// Location the current attempt targets.
    #[must_use]
    pub fn current_url(&self) -> &str {
        if self.attempted_fallback {
            &self.fallback_url
        } else {
            &self.url
        }
    }

    /// Spends the fallback. Returns `false` if it was already spent.
    pub fn switch_to_fallback(&mut self) -> bool {
        if self.attempted_fallback {
            return false;
        }
        self.attempted_fallback = true;
        true
    }
}

/// Transfer progress of one attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadProgress {
    /// Bytes received so far.
    pub bytes_loaded: u64,
    /// Announced size; `0` when unknown.
    pub bytes_total: u64,
}

impl LoadProgress {
    /// Creates a progress sample.
    #[must_use]
    pub const fn new(bytes_loaded: u64, bytes_total: u64) -> Self {
        Self {
            bytes_loaded,
            bytes_total,
        }
    }

    /// Percentage in `[0, 100]`.
    ///
    /// An unknown total reads as 0 %; a server that under-reports the total
    /// cannot push the value past 100 %.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> f32 {
        if self.bytes_total == 0 {
            return 0.0;
        }
        let pct = self.bytes_loaded as f64 / self.bytes_total as f64 * 100.0;
        #[allow(clippy::cast_possible_truncation)]
        let pct = pct as f32;
        pct.clamp(0.0, 100.0)
    }

    /// True once the transfer reports completion.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.percent() >= 100.0
    }
}

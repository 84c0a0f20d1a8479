/// Worker count used when the caller does not pick one.
pub const DEFAULT_WORKERS: usize = 4;

/// Which grid each level reads its blocks from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reduction {
    /// Level `k + 1` reads 2-wide blocks from level `k`.
    ///
    /// Levels are dispatched one after the other.
    #[default]
    Cascade,
    /// Every level reads blocks of the base grid with the cumulative span of
    /// all halvings so far, so a coarse cell is the mode of every base cell
    /// it covers.
    ///
    /// Levels do not depend on each other and run as one batch.
    FromBase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownsampleConfig {
    pub workers: usize,
    pub reduction: Reduction,
}

impl DownsampleConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_reduction(mut self, reduction: Reduction) -> Self {
        self.reduction = reduction;
        self
    }
}

impl Default for DownsampleConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            reduction: Reduction::Cascade,
        }
    }
}

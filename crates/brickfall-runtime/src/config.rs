use brickfall_engine::PieceSeed;

/// Options for [`GameRuntime::spawn`](crate::GameRuntime::spawn).
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// Seed for piece generation. A random seed is drawn when `None`.
    pub seed: Option<PieceSeed>,
    /// Whether to send `GameTick` automatically at the current level's interval.
    pub auto_tick: bool,
    /// Start with sounds muted.
    pub muted: bool,
}

impl RuntimeConfig {
    #[must_use]
    pub fn with_seed(mut self, seed: PieceSeed) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_auto_tick(mut self, auto_tick: bool) -> Self {
        self.auto_tick = auto_tick;
        self
    }

    #[must_use]
    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }
}

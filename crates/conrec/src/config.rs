/// Settings shared by both contouring entry points.
///
/// Neither setting changes which points are produced: `parallel` only affects scheduling, and
/// `chain_order` only reorders chains within a level in sorted mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ContourConfig {
    /// Process levels on the rayon thread pool.
    ///
    /// Every level is extracted and assembled independently into its own buffer. The results
    /// are concatenated in level order, so the output is identical to a sequential run.
    pub parallel: bool,

    /// How chains of one level are ordered in sorted mode.
    pub chain_order: ChainOrder,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            chain_order: ChainOrder::default(),
        }
    }
}

impl ContourConfig {
    /// Enable or disable processing levels in parallel.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the chain ordering used in sorted mode.
    #[must_use]
    pub fn with_chain_order(mut self, chain_order: ChainOrder) -> Self {
        self.chain_order = chain_order;
        self
    }
}

/// Ordering of assembled chains within one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum ChainOrder {
    /// Chains appear in the order their first segment was emitted.
    #[default]
    Encounter,
    /// Closed polygons first, then open polylines. Each group keeps encounter order.
    ClosedFirst,
}

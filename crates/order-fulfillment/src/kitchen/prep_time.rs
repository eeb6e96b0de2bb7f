//! How long the kitchen spends on an order.

use crate::model::Order;
use std::time::Duration;

/// Computes the simulated cook time for an order.
///
/// Implementations may return anything; the kitchen clamps the result to its configured
/// maximum. A panicking implementation fails only the ticket it was called for.
pub trait PrepTimePolicy: Send + Sync + 'static {
    fn preparation_time(&self, order: &Order) -> Duration;
}

/// Sums each item's preparation hint, stretched by 10% per complexity level, then scales
/// the result. A scale of `0.01` turns a 10 minute hint into 6 seconds.
#[derive(Debug, Clone, Copy)]
pub struct HintedPrepTime {
    scale: f64,
}

impl HintedPrepTime {
    /// Non-finite or negative scales are treated as zero.
    pub fn new(scale: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            0.0
        };
        Self { scale }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Default for HintedPrepTime {
    fn default() -> Self {
        Self::new(0.01)
    }
}

impl PrepTimePolicy for HintedPrepTime {
    fn preparation_time(&self, order: &Order) -> Duration {
        let secs: f64 = order
            .items()
            .iter()
            .map(|item| item.prep_time().as_secs_f64() * (1.0 + 0.1 * item.complexity() as f64))
            .sum();
        Duration::try_from_secs_f64(secs * self.scale).unwrap_or(Duration::MAX)
    }
}

/// The same delay for every order. Handy in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedPrepTime(pub Duration);

impl PrepTimePolicy for FixedPrepTime {
    fn preparation_time(&self, _order: &Order) -> Duration {
        self.0
    }
}

use super::Rtp;
use crate::MULTIPLIER_MAX;
use crate::MULTIPLIER_MIN;
use crate::Multiplier;
use crate::Probability;
use rand::Rng;

/// Two-regime mixture over [MULTIPLIER_MIN, MULTIPLIER_MAX].
///
/// The boundary splits the range into a low and a high sub-interval.
/// With probability `rtp` the draw comes from the high side, otherwise
/// from the low side. As `rtp → 1` the boundary slides down to the minimum,
/// so the high side covers everything; as `rtp → 0` it slides up to the
/// maximum and the low side covers everything. Both extremes degenerate
/// gracefully into a uniform draw over the full range.
///
/// Holds no generator of its own: callers bring one, and [`Sampler::sample`]
/// uses the calling thread's generator, so concurrent requests never contend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampler {
    rtp: Rtp,
}

impl From<Rtp> for Sampler {
    fn from(rtp: Rtp) -> Self {
        Self { rtp }
    }
}

impl Sampler {
    pub fn rtp(&self) -> Rtp {
        self.rtp
    }

    /// Point partitioning the range into [min, boundary) and [boundary, max].
    pub fn boundary(&self) -> Multiplier {
        MULTIPLIER_MIN + (MULTIPLIER_MAX - MULTIPLIER_MIN) * (1. - self.rtp.inner())
    }

    /// Draw one multiplier from the thread-local generator.
    pub fn sample(&self) -> Multiplier {
        self.sample_with(&mut rand::rng())
    }

    /// Draw one multiplier from the given generator.
    pub fn sample_with<R>(&self, rng: &mut R) -> Multiplier
    where
        R: Rng + ?Sized,
    {
        let p = rng.random::<Probability>();
        let boundary = self.boundary();
        if p < self.rtp.inner() {
            uniform(rng, boundary, MULTIPLIER_MAX)
        } else {
            uniform(rng, MULTIPLIER_MIN, boundary)
        }
    }
}

/// Half-open uniform draw over [lo, hi). Collapses to `lo` when the interval is a point.
fn uniform<R>(rng: &mut R, lo: Multiplier, hi: Multiplier) -> Multiplier
where
    R: Rng + ?Sized,
{
    lo + rng.random::<f64>() * (hi - lo)
}

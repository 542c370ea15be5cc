mod rtp;
mod sampler;

pub use rtp::*;
pub use sampler::*;

use crate::Probability;

/// Errors rejecting a candidate bias parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RtpError {
    OutOfRange(f64),
    NotANumber,
}

impl std::fmt::Display for RtpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange(x) => write!(f, "invalid rtp value, must be within [0, 1]: {}", x),
            Self::NotANumber => write!(f, "invalid rtp value, must be a number"),
        }
    }
}

impl std::error::Error for RtpError {}

/// Return-to-player ratio.
/// Probability mass given to the high branch of the multiplier distribution.
/// Only constructible inside [0, 1], so downstream sampling never re-checks it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Rtp(Probability);

impl Rtp {
    pub fn inner(&self) -> Probability {
        self.0
    }
}

impl TryFrom<f64> for Rtp {
    type Error = RtpError;
    fn try_from(x: f64) -> Result<Self, Self::Error> {
        match x {
            x if x.is_nan() => Err(RtpError::NotANumber),
            x if (0.0..=1.0).contains(&x) => Ok(Self(x)),
            x => Err(RtpError::OutOfRange(x)),
        }
    }
}

impl From<Rtp> for f64 {
    fn from(rtp: Rtp) -> Self {
        rtp.0
    }
}

impl std::fmt::Display for Rtp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

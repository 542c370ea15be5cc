use crate::sampler::Rtp;
use crate::sampler::RtpError;
use clap::Parser;
use std::path::PathBuf;

/// Process inputs. Every flag can also be supplied through the environment.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Return-to-player ratio within [0, 1]
    #[arg(long, env = "RTP", allow_negative_numbers = true)]
    pub rtp: f64,
    /// Interface the listener binds to
    #[arg(long, env = "HTTP_HOST", default_value = "0.0.0.0")]
    pub host: String,
    /// Port the listener binds to
    #[arg(long, env = "HTTP_PORT", default_value_t = 8080)]
    pub port: u16,
    /// Worker threads serving requests (defaults to one per core)
    #[arg(long, env = "HTTP_WORKERS")]
    pub workers: Option<usize>,
    /// Terminal log level: error, warn, info, debug or trace
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
    /// Directory receiving the per-run debug log file
    #[arg(long, env = "LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,
}

impl Config {
    /// Validated bias parameter. Anything outside [0, 1] refuses startup.
    pub fn rtp(&self) -> Result<Rtp, RtpError> {
        Rtp::try_from(self.rtp)
    }

    pub fn level(&self) -> anyhow::Result<log::LevelFilter> {
        self.log_level
            .trim()
            .parse::<log::LevelFilter>()
            .map_err(|_| anyhow::anyhow!("invalid log level: {}", self.log_level))
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

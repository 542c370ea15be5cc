//! Server-authoritative random multipliers.
//!
//! A single HTTP endpoint hands out one sampled multiplier per request.
//! The distribution is skewed by a return-to-player ratio fixed at startup.
//!
//! ## Submodules
//!
//! - [`sampler`] — Validated bias parameter and the weighted draw
//! - [`hosting`] — Listener, route handlers, and the shutdown lifecycle

pub mod hosting;
pub mod sampler;

#[cfg(test)]
mod capture;

pub use hosting::Config;
pub use hosting::Host;
pub use sampler::Rtp;
pub use sampler::Sampler;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Sampled payout multiplier returned to callers.
pub type Multiplier = f64;
/// Branch selection probabilities and the bias parameter itself.
pub type Probability = f64;

// ============================================================================
// SAMPLING RANGE
// Every multiplier lies in [MULTIPLIER_MIN, MULTIPLIER_MAX].
// ============================================================================
/// Smallest multiplier ever produced.
pub const MULTIPLIER_MIN: Multiplier = 1.0;
/// Largest multiplier ever produced.
pub const MULTIPLIER_MAX: Multiplier = 10000.0;

// ============================================================================
// SERVICE PARAMETERS
// ============================================================================
/// Time in-flight requests are given to finish once a termination signal arrives.
pub const SHUTDOWN_GRACE: std::time::Duration = std::time::Duration::from_secs(30);
/// Access log line: request line, response status, seconds elapsed.
pub const ACCESS_LOG_FORMAT: &str = "%r %s %Ts";

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with a timestamped log file.
/// Creates `dir` if needed and writes DEBUG level to file, `level` to terminal.
pub fn log(level: log::LevelFilter, dir: &std::path::Path) -> anyhow::Result<()> {
    use anyhow::Context;
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .context("time moves slow")?
        .as_secs();
    let path = dir.join(format!("{}.log", time));
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(&path).with_context(|| format!("create {}", path.display()))?,
    );
    let term = simplelog::TermLogger::new(
        level,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).context("initialize logger")?;
    Ok(())
}

/// Resolves once the process receives SIGINT, SIGTERM or SIGQUIT.
/// Handlers are installed on call, so signals arriving before the
/// returned future is first polled are still observed.
#[cfg(unix)]
pub fn terminated() -> impl std::future::Future<Output = ()> {
    use tokio::signal::unix::SignalKind;
    let mut int = listen(SignalKind::interrupt(), "SIGINT");
    let mut term = listen(SignalKind::terminate(), "SIGTERM");
    let mut quit = listen(SignalKind::quit(), "SIGQUIT");
    async move {
        tokio::select! {
            Some(()) = recv(&mut int) => log::debug!("SIGINT received"),
            Some(()) = recv(&mut term) => log::debug!("SIGTERM received"),
            Some(()) = recv(&mut quit) => log::debug!("SIGQUIT received"),
            else => log::warn!("signal streams closed"),
        }
    }
}

#[cfg(unix)]
fn listen(
    kind: tokio::signal::unix::SignalKind,
    name: &str,
) -> Option<tokio::signal::unix::Signal> {
    tokio::signal::unix::signal(kind)
        .inspect_err(|e| log::warn!("cannot listen for {}: {}", name, e))
        .ok()
}

#[cfg(unix)]
async fn recv(signal: &mut Option<tokio::signal::unix::Signal>) -> Option<()> {
    match signal {
        Some(s) => s.recv().await,
        None => std::future::pending().await,
    }
}

/// Only Ctrl+C is observable off unix.
#[cfg(not(unix))]
pub fn terminated() -> impl std::future::Future<Output = ()> {
    async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => log::debug!("SIGINT received"),
            Err(e) => {
                log::error!("cannot listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await
            }
        }
    }
}

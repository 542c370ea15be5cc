//! Multiplier Server Binary
//!
//! Serves `GET /get` on HTTP_HOST:HTTP_PORT until SIGINT, SIGTERM or SIGQUIT,
//! then drains in-flight requests for up to thirty seconds.

use clap::Parser;
use multiplier::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    let host = Host::try_from(&config)?;
    log(config.level()?, &config.log_dir)?;
    let lifecycle = hosting::Lifecycle::default();
    let stop = terminated();
    let shutdown = host.bind()?.serve(stop, &lifecycle).await?;
    log::info!("stopping http server on {}", config.addr());
    match shutdown {
        hosting::Shutdown::Graceful => log::info!("application shutdown completed successfully"),
        hosting::Shutdown::Forced => log::warn!("application shutdown completed after dropping connections"),
    }
    Ok(())
}

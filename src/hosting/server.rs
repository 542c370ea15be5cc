use super::Config;
use super::handlers;
use super::lifecycle;
use super::lifecycle::Lifecycle;
use super::lifecycle::Shutdown;
use crate::ACCESS_LOG_FORMAT;
use crate::SHUTDOWN_GRACE;
use crate::Sampler;
use actix_web::App;
use actix_web::HttpServer;
use actix_web::dev::Server;
use actix_web::middleware::Logger;
use actix_web::web;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

/// Owns the listener and hands every `GET /get` to the sampler.
pub struct Host {
    sampler: Sampler,
    addr: String,
    workers: Option<usize>,
    grace: Duration,
}

impl Host {
    pub fn new(sampler: Sampler, addr: impl Into<String>) -> Self {
        Self {
            sampler,
            addr: addr.into(),
            workers: None,
            grace: SHUTDOWN_GRACE,
        }
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Bind the listener. Nothing is served until [`Listening::serve`] is awaited.
    pub fn bind(self) -> std::io::Result<Listening> {
        let sampler = web::Data::new(self.sampler);
        let server = HttpServer::new(move || {
            App::new()
                .wrap(Logger::new(ACCESS_LOG_FORMAT))
                .app_data(sampler.clone())
                .configure(handlers::routes)
        })
        .disable_signals()
        .shutdown_timeout(lifecycle::drain_timeout(self.grace));
        let server = match self.workers {
            Some(n) => server.workers(n),
            None => server,
        };
        let server = server
            .bind(self.addr.as_str())
            .inspect_err(|e| log::error!("cannot start http server on {}: {}", self.addr, e))?;
        let addrs = server.addrs();
        log::info!(
            "starting http server on {} (rtp {})",
            addrs.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", "),
            self.sampler.rtp()
        );
        Ok(Listening {
            server: server.run(),
            addrs,
            grace: self.grace,
        })
    }
}

impl TryFrom<&Config> for Host {
    type Error = anyhow::Error;
    fn try_from(config: &Config) -> Result<Self, Self::Error> {
        let host = Self::new(Sampler::from(config.rtp()?), config.addr());
        Ok(match config.workers {
            Some(n) => host.workers(n),
            None => host,
        })
    }
}

/// A bound host, ready to serve until told to stop.
pub struct Listening {
    server: Server,
    addrs: Vec<SocketAddr>,
    grace: Duration,
}

impl Listening {
    pub fn addrs(&self) -> &[SocketAddr] {
        &self.addrs
    }

    /// Serve until `signal` resolves, then drain within the grace period.
    pub async fn serve<F>(self, signal: F, lifecycle: &Lifecycle) -> std::io::Result<Shutdown>
    where
        F: Future<Output = ()>,
    {
        lifecycle::supervise(self.server, signal, self.grace, lifecycle).await
    }
}

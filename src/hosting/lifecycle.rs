use actix_web::dev::Server;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;

/// Service lifecycle. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accepting and serving requests.
    Running,
    /// Listener closed; in-flight requests finishing within the grace period.
    Draining,
    /// All connections closed.
    Stopped,
}

/// How the drain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// Every in-flight request completed within the grace period.
    Graceful,
    /// The grace period elapsed and remaining connections were dropped.
    Forced,
}

/// Publishes the current [`Phase`] to any number of observers.
#[derive(Debug)]
pub struct Lifecycle {
    tx: watch::Sender<Phase>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            tx: watch::Sender::new(Phase::Running),
        }
    }
}

impl Lifecycle {
    pub fn phase(&self) -> Phase {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.tx.subscribe()
    }

    /// Step to the next phase. Stopped is terminal.
    pub fn advance(&self) -> Phase {
        self.tx.send_modify(|phase| {
            *phase = match phase {
                Phase::Running => Phase::Draining,
                Phase::Draining => Phase::Stopped,
                Phase::Stopped => Phase::Stopped,
            }
        });
        let phase = self.phase();
        log::debug!("lifecycle entered {:?}", phase);
        phase
    }
}

/// Drive `server` until `signal` resolves, then drain it.
///
/// The server stops accepting as soon as the signal arrives. In-flight
/// requests get `grace` to finish; past that the drain is reported as
/// [`Shutdown::Forced`] and the server's own shutdown timeout drops
/// whatever connections remain. A server that exits before any signal
/// (e.g. a failed listener) surfaces its error here.
pub async fn supervise<F>(
    server: Server,
    signal: F,
    grace: Duration,
    lifecycle: &Lifecycle,
) -> std::io::Result<Shutdown>
where
    F: Future<Output = ()>,
{
    let handle = server.handle();
    let mut server = server;
    tokio::select! {
        served = &mut server => {
            lifecycle.advance();
            lifecycle.advance();
            return served.map(|()| Shutdown::Graceful);
        }
        _ = signal => log::info!("received shutdown signal"),
    }
    lifecycle.advance();
    let draining = async {
        match tokio::time::timeout(grace, handle.stop(true)).await {
            Ok(()) => Shutdown::Graceful,
            Err(_) => {
                log::error!(
                    "cannot shutdown http server: grace period of {:?} elapsed, closing remaining connections",
                    grace
                );
                Shutdown::Forced
            }
        }
    };
    let (served, shutdown) = tokio::join!(&mut server, draining);
    lifecycle.advance();
    served.map(|()| shutdown)
}

/// Whole seconds the server waits for connections before dropping them.
/// Rounded up so the supervisor's timer always expires first.
pub fn drain_timeout(grace: Duration) -> u64 {
    grace.as_secs() + u64::from(grace.subsec_nanos() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::App;
    use actix_web::HttpResponse;
    use actix_web::HttpServer;
    use actix_web::web;
    use std::net::SocketAddr;
    use tokio::io::AsyncReadExt;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    #[test]
    fn phases_only_move_forward() {
        let lifecycle = Lifecycle::default();
        assert_eq!(lifecycle.phase(), Phase::Running);
        assert_eq!(lifecycle.advance(), Phase::Draining);
        assert_eq!(lifecycle.advance(), Phase::Stopped);
        assert_eq!(lifecycle.advance(), Phase::Stopped);
    }

    #[test]
    fn observers_see_latest_phase() {
        let lifecycle = Lifecycle::default();
        let mut rx = lifecycle.subscribe();
        assert_eq!(*rx.borrow_and_update(), Phase::Running);
        lifecycle.advance();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Phase::Draining);
    }

    #[test]
    fn drain_timeout_rounds_up() {
        assert_eq!(drain_timeout(Duration::from_secs(30)), 30);
        assert_eq!(drain_timeout(Duration::from_millis(300)), 1);
        assert_eq!(drain_timeout(Duration::from_millis(2500)), 3);
    }

    async fn pause(delay: web::Data<Duration>) -> HttpResponse {
        tokio::time::sleep(**delay).await;
        HttpResponse::Ok().body("done")
    }

    fn server(delay: Duration, grace: Duration) -> (Server, SocketAddr) {
        let delay = web::Data::new(delay);
        let server = HttpServer::new(move || {
            App::new()
                .app_data(delay.clone())
                .route("/pause", web::get().to(pause))
        })
        .workers(1)
        .disable_signals()
        .shutdown_timeout(drain_timeout(grace))
        .bind("127.0.0.1:0")
        .unwrap();
        let addr = server.addrs()[0];
        (server.run(), addr)
    }

    /// Raw HTTP/1.1 request; returns whatever arrived before the connection closed.
    async fn request(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let head = format!(
            "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
            path, addr
        );
        stream.write_all(head.as_bytes()).await.unwrap();
        let mut buffer = Vec::new();
        let _ = stream.read_to_end(&mut buffer).await;
        String::from_utf8_lossy(&buffer).into_owned()
    }

    #[actix_web::test]
    async fn in_flight_request_finishes_within_grace() {
        let grace = Duration::from_secs(5);
        let (server, addr) = server(Duration::from_millis(500), grace);
        let (tx, rx) = oneshot::channel::<()>();
        let lifecycle = Lifecycle::default();
        let mut phases = lifecycle.subscribe();
        let signal = async {
            let _ = rx.await;
        };
        let scenario = async {
            let client = tokio::spawn(request(addr, "/pause"));
            tokio::time::sleep(Duration::from_millis(100)).await;
            assert_eq!(*phases.borrow_and_update(), Phase::Running);
            tx.send(()).unwrap();
            client.await.unwrap()
        };
        let (shutdown, response) = tokio::join!(supervise(server, signal, grace, &lifecycle), scenario);
        assert_eq!(shutdown.unwrap(), Shutdown::Graceful);
        assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
        assert!(response.ends_with("done"));
        assert_eq!(lifecycle.phase(), Phase::Stopped);
    }

    #[actix_web::test]
    async fn overrunning_request_is_dropped() {
        let grace = Duration::from_millis(300);
        let (server, addr) = server(Duration::from_secs(30), grace);
        let (tx, rx) = oneshot::channel::<()>();
        let lifecycle = Lifecycle::default();
        let signal = async {
            let _ = rx.await;
        };
        let scenario = async {
            let client = tokio::spawn(request(addr, "/pause"));
            tokio::time::sleep(Duration::from_millis(100)).await;
            tx.send(()).unwrap();
            tokio::time::timeout(Duration::from_secs(10), client)
                .await
                .unwrap()
                .unwrap()
        };
        let (shutdown, response) = tokio::join!(supervise(server, signal, grace, &lifecycle), scenario);
        assert_eq!(shutdown.unwrap(), Shutdown::Forced);
        assert!(!response.starts_with("HTTP/1.1 200"), "{}", response);
        assert_eq!(lifecycle.phase(), Phase::Stopped);
    }

    #[actix_web::test]
    async fn idle_server_stops_gracefully() {
        let grace = Duration::from_secs(1);
        let (server, _) = server(Duration::ZERO, grace);
        let lifecycle = Lifecycle::default();
        let shutdown = supervise(server, async {}, grace, &lifecycle).await;
        assert_eq!(shutdown.unwrap(), Shutdown::Graceful);
        assert_eq!(lifecycle.phase(), Phase::Stopped);
    }
}

//! Silo - S3-compatible object storage on a local filesystem.
//!
//! Clients talk to silo with standard S3 SDKs and CLIs (AWS CLI, s5cmd,
//! MinIO SDK, Boto3) over path-style addressing, authenticated with AWS
//! Signature V4.
//!
//! # Usage
//!
//! ```text
//! LISTEN=0.0.0.0:9000 DATA_DIR=/var/lib/silo CREDENTIALS=akid:secret silo-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LISTEN` | `0.0.0.0:9000` | Bind address |
//! | `DATA_DIR` | `./data` | Storage root |
//! | `CREDENTIALS` | *(empty)* | `akid:secret[,akid:secret...]` |
//! | `MAX_REQUEST_SIZE` | `5368709120` | Request body cap in bytes |
//! | `CLOCK_SKEW_SECONDS` | `900` | Signature timestamp tolerance |
//! | `MAX_PRESIGN_EXPIRES` | `604800` | `X-Amz-Expires` ceiling |
//! | `ALLOW_HOST_CANDIDATE_FALLBACKS` | `false` | Proxied-host matching |
//! | `ALLOW_LEGACY_ACCESS_KEY_ONLY` | `false` | Allow-listed keys skip SigV4 |
//! | `ALLOWED_ACCESS_KEYS` | *(empty)* | Legacy-mode allow-list |
//! | `AUTH_DEBUG_LOG` | *(empty)* | Signature-mismatch trace file |
//! | `LOG_LEVEL` | `info` | Log filter (`RUST_LOG` overrides) |

use std::net::SocketAddr;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use silo_core::SiloConfig;
use silo_http::{S3Dispatcher, SiloHttpService};

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Run the accept loop, serving connections until a shutdown signal arrives.
async fn serve(listener: TcpListener, service: SiloHttpService) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        // Mid-stream disconnects land here; they are routine.
                        warn!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = SiloConfig::from_env();

    init_tracing(&config.log_level)?;
    config.validate()?;

    info!(
        listen = %config.listen,
        data_dir = %config.data_dir,
        credentials = config.credentials.len(),
        allow_host_candidate_fallbacks = config.allow_host_candidate_fallbacks,
        allow_legacy_access_key_only = config.allow_legacy_access_key_only,
        version = VERSION,
        "starting silo",
    );

    let dispatcher = S3Dispatcher::new(&config);
    let service = SiloHttpService::new(dispatcher);

    let addr: SocketAddr = config
        .listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, "listening for connections");

    if let Err(e) = serve(listener, service).await {
        error!(error = %e, "server terminated with error");
        return Err(e);
    }

    Ok(())
}

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use sub_recoded_types::{ProxyError, ProxyResult, PROXY_PATH, TARGET_PARAM};
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use super::handlers::{handle, ApiState};
use crate::config::ProxyConfig;
use crate::fetcher::ResourceFetcher;

pub struct ProxyServer {
    listener: TcpListener,
    state: Arc<ApiState>,
}

impl ProxyServer {
    /// Binds the listen socket. Port 0 picks an ephemeral port.
    pub async fn bind(config: &ProxyConfig, fetcher: Arc<dyn ResourceFetcher>) -> ProxyResult<Self> {
        let addr = config.listen_addr();
        Self::bind_addr(addr, config, fetcher).await
    }

    pub async fn bind_addr(
        addr: SocketAddr,
        config: &ProxyConfig,
        fetcher: Arc<dyn ResourceFetcher>,
    ) -> ProxyResult<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ProxyError::Network(format!("Failed to bind proxy server on {}: {}", addr, e)))?;

        let local_addr = listener
            .local_addr()
            .map_err(|e| ProxyError::Network(format!("Failed to read local address: {}", e)))?;

        Ok(Self {
            listener,
            state: Arc::new(ApiState::new(fetcher, &config.server, local_addr)),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.state.local_addr
    }

    pub async fn serve(self) -> ProxyResult<()> {
        self.run_until(std::future::pending()).await
    }

    /// Accepts connections until `shutdown` resolves. Each connection runs on
    /// its own task so a slow upstream never blocks other clients.
    pub async fn run_until<F>(self, shutdown: F) -> ProxyResult<()>
    where
        F: Future<Output = ()>,
    {
        info!(
            "SUB Recoded proxy listening on http://{} - {}?{}=<encodedUrl>",
            self.state.local_addr, PROXY_PATH, TARGET_PARAM
        );

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Proxy server stopped");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            debug!("Connection from {}", peer);
                            let state = self.state.clone();
                            tokio::spawn(async move {
                                let io = TokioIo::new(stream);
                                let service = service_fn(move |req| {
                                    let state = state.clone();
                                    async move { Ok::<_, Infallible>(handle(req, &state).await) }
                                });
                                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                                    debug!("Connection error from {}: {}", peer, e);
                                }
                            });
                        }
                        Err(e) => {
                            error!("Accept error: {}", e);
                        }
                    }
                }
            }
        }
    }
}

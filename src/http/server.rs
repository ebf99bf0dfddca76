use std::{io, net::SocketAddr, sync::Arc};

use axum::{Router, ServiceExt, extract::Request};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

use super::{build_router, into_app};
use crate::api::PhyBackend;

/// Serves `router` on `listener` until `shutdown` resolves, letting in-flight
/// requests finish.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = into_app(router);
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown)
        .await
}

/// A throwaway server on an ephemeral loopback port, for tests of API
/// clients. Dropping the handle stops the server without waiting for it.
pub struct TestServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: JoinHandle<io::Result<()>>,
}

impl TestServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL without a trailing slash, e.g. `http://127.0.0.1:41234`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) -> io::Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        (&mut self.join).await.map_err(io::Error::other)?
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Binds `127.0.0.1:0` and serves `backend` on a background task.
pub async fn spawn(backend: Arc<dyn PhyBackend>) -> io::Result<TestServer> {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
    let addr = listener.local_addr()?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let join = tokio::spawn(serve(listener, build_router(backend), async move {
        let _ = shutdown_rx.await;
    }));

    Ok(TestServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
        join,
    })
}

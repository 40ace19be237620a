use crate::state::State;
use crate::store::{SharedStore, StoreError};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("could not connect to the post store: {0}")]
    Store(#[from] StoreError),

    #[error("could not listen on port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("server stopped with an error: {0}")]
    Serve(std::io::Error),

    #[error("server task panicked")]
    Panicked,
}

/// A running server. Dropping it without calling [`Server::stop`] leaves the
/// listener running until the runtime shuts down.
#[derive(Debug)]
pub struct Server {
    local_addr: SocketAddr,
    store: SharedStore,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

/// Connects to the store, then binds `port` on all interfaces.
///
/// Returns once the listener is bound, so a port of `0` can be inspected with
/// [`Server::local_addr`].
pub async fn run_server(database_url: &str, port: u16) -> Result<Server, ServerError> {
    let store = crate::store::connect(database_url).await?;

    let listener =
        match tokio::net::TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port))).await {
            Ok(it) => it,
            Err(source) => {
                if let Err(err) = store.close().await {
                    tracing::warn!("error closing post store after failed bind: {err}");
                }
                return Err(ServerError::Bind { port, source });
            }
        };
    let local_addr = listener.local_addr().map_err(ServerError::Serve)?;

    let app = crate::routes::app(Arc::new(State::new(store.clone())));
    let (shutdown, shutdown_signal) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        axum::serve(
            listener,
            axum::ServiceExt::<axum::extract::Request>::into_make_service(app),
        )
        .with_graceful_shutdown(async move {
            let _ = shutdown_signal.await;
        })
        .await
    });

    tracing::info!("listening on {local_addr}");

    Ok(Server {
        local_addr,
        store,
        shutdown,
        task,
    })
}

impl Server {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting connections, waits for in-flight requests, then closes the store.
    pub async fn stop(self) -> Result<(), ServerError> {
        tracing::info!("closing server");
        let _ = self.shutdown.send(());

        let served = match self.task.await {
            Ok(it) => it.map_err(ServerError::Serve),
            Err(_) => Err(ServerError::Panicked),
        };

        self.store.close().await?;
        served
    }
}

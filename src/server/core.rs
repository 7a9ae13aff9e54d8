use log::{error, info, warn};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;

use crate::config::FileManagerConfig;
use crate::server::router::build_router;
use crate::server::state::AppState;

pub struct Server {
    listener: TcpListener,
    state: AppState,
}

impl Server {
    /// Prepares the UserData root and binds the listener.
    pub async fn new(config: FileManagerConfig) -> std::io::Result<Self> {
        let root = config.prepare_root().inspect_err(|e| {
            error!(
                "Failed to prepare UserData directory {}: {}",
                config.userdata_path, e
            );
        })?;
        info!("UserData directory: {}", root.display());

        let socket = config.listen_socket();
        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => {
                info!("Server bound to {}", socket);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(e);
            }
        };

        Ok(Self {
            listener,
            state: AppState::new(config, root),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves requests until Ctrl+C or SIGTERM.
    pub async fn start(self) -> std::io::Result<()> {
        info!(
            "Starting file manager on {} (body limit {} MB)",
            self.local_addr()?,
            self.state.config.body_limit_mb
        );

        let app = build_router(self.state);
        axum::serve(
            self.listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

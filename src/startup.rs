use crate::configuration::Settings;
use crate::routes::{authenticate, health_check, publish_post, publish_post_with_image};
use axum::Router;
use axum::routing::{get, post};
use std::net::TcpListener;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    settings: Settings,
}

impl Application {
    pub fn build(settings: Settings) -> Result<Self, anyhow::Error> {
        let address = format!("{}:{}", settings.app_host, settings.app_port);
        let listener = TcpListener::bind(address)?;
        listener.set_nonblocking(true)?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            settings,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        let state = AppState {
            settings: self.settings,
        };

        let app = Router::new()
            .route("/health_check", get(health_check))
            .route("/api/auth", post(authenticate))
            .route("/api/publish", post(publish_post))
            .route("/api/publish-with-image", post(publish_post_with_image))
            .with_state(state)
            .layer(TraceLayer::new_for_http().make_span_with(
                |request: &axum::extract::Request| {
                    tracing::info_span!(
                        "request",
                        request_id = %Uuid::new_v4(),
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                },
            ));

        let listener = tokio::net::TcpListener::from_std(self.listener)?;
        axum::serve(listener, app).await?;
        Ok(())
    }
}

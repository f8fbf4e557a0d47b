use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::proxy::record;
use crate::proxy::sink::{TrafficSink, WriterSink};
use crate::proxy::{ProxyService, UpstreamTarget};

/// Main application struct that coordinates all components
pub struct Application {
    settings: Settings,
    upstream: UpstreamTarget,
    sink: Arc<dyn TrafficSink>,
}

impl Application {
    /// Validate the upstream and open the traffic log destination.
    ///
    /// Both are startup-fatal on failure; no requests are served.
    pub async fn new(settings: Settings) -> Result<Self> {
        let upstream = UpstreamTarget::from_url(&settings.upstream.url)?;

        let sink: Arc<dyn TrafficSink> = match &settings.logging.file {
            Some(path) => {
                info!("Writing traffic log to {}", path.display());
                Arc::new(
                    WriterSink::create(path)
                        .await
                        .map_err(Error::LogDestination)?,
                )
            }
            None => Arc::new(WriterSink::stdout()),
        };

        Ok(Self {
            settings,
            upstream,
            sink,
        })
    }

    #[instrument(skip(self))]
    pub async fn run(self) -> Result<()> {
        let addr = format!(
            "{}:{}",
            self.settings.application.host, self.settings.application.port
        );
        let listener = TcpListener::bind(&addr).await?;
        let local_addr = listener.local_addr()?;

        info!(
            "Starting proxy server on {}, forwarding to {}",
            local_addr, self.upstream
        );
        self.sink
            .write_block(&record::startup_entry(&local_addr, &self.upstream))
            .await;

        let service = ProxyService::new(self.upstream, self.sink);
        axum::serve(listener, service.into_router()).await?;

        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliOverrides;

    fn settings(log_file: Option<std::path::PathBuf>) -> Settings {
        Settings::load(&CliOverrides {
            port: Some(0),
            upstream: Some("http://upstream.test".to_string()),
            log_file,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_application_can_be_created() {
        let app = Application::new(settings(None))
            .await
            .expect("Failed to create application");
        assert_eq!(app.settings().upstream.url.as_ref(), "http://upstream.test");
    }

    #[tokio::test]
    async fn test_unwritable_log_destination_is_fatal() {
        let path = std::path::PathBuf::from("/nonexistent-dir/traffic.log");
        let result = Application::new(settings(Some(path))).await;
        assert!(matches!(result, Err(Error::LogDestination(_))));
    }
}

// Teddy - HTTP daemon mode
// JSON API over the analysis pipeline and journal store

mod handlers;

pub use handlers::create_router;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::analysis::AnalysisPipeline;
use crate::notify::NotificationTracker;
use crate::providers::ChatProvider;
use crate::store::JournalStore;

/// Shared state behind every handler
pub struct TeddyServer {
    pipeline: AnalysisPipeline,
    tracker: NotificationTracker,
    model: String,
}

impl TeddyServer {
    pub fn new(
        store: Arc<JournalStore>,
        provider: Arc<dyn ChatProvider>,
        model: String,
    ) -> Self {
        let pipeline = AnalysisPipeline::new(Arc::clone(&store), provider);
        let tracker = NotificationTracker::new(store);
        Self {
            pipeline,
            tracker,
            model,
        }
    }

    /// Start the HTTP server
    pub async fn serve(self, bind_address: &str) -> Result<()> {
        let addr: SocketAddr = bind_address.parse()?;

        let app_state = Arc::new(self);
        let app = create_router(app_state).layer(TraceLayer::new_for_http());

        tracing::info!("Starting Teddy server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    pub fn pipeline(&self) -> &AnalysisPipeline {
        &self.pipeline
    }

    pub fn store(&self) -> &Arc<JournalStore> {
        self.pipeline.store()
    }

    pub fn tracker(&self) -> &NotificationTracker {
        &self.tracker
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

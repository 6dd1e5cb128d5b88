pub mod ask;
pub mod chat;
pub mod probe;
pub mod show_config;

/// Resolves when the user presses Ctrl-C.
pub(crate) async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

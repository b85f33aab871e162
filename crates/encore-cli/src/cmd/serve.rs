use anyhow::Context;
use encore_core::config::WarnLevel;
use encore_server::AppState;
use std::path::Path;

pub fn run(root: &Path, port: Option<u16>, open: bool) -> anyhow::Result<()> {
    let state = AppState::load(root).context("failed to load project")?;
    for w in state.config.validate() {
        match w.level {
            WarnLevel::Warning => tracing::warn!("config: {}", w.message),
            WarnLevel::Error => anyhow::bail!("config: {}", w.message),
        }
    }
    let port = port.unwrap_or(state.config.server.port);
    let name = state.config.project.name.clone();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let url = format!("http://localhost:{}", listener.local_addr()?.port());
        println!("encore API for '{name}' → {url}");

        tokio::select! {
            res = encore_server::serve_on(state, listener, open) => res,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                Ok(())
            }
        }
    })
}

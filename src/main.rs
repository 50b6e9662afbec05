use std::sync::Arc;

use modserve::config::{AppState, Config};
use modserve::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;

    // Size the Tokio runtime from the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let backlog = cfg.server.backlog;
    let state = Arc::new(AppState::new(cfg)?);

    let listener = server::bind_listener(addr, backlog)?;
    logger::log_server_start(&addr, &state);

    server::run(listener, state).await?;
    Ok(())
}

use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;

    // Build the Tokio runtime, sizing the thread pool from the workers
    // setting when present
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        println!("[CONFIG] Using {workers} worker threads");
    } else {
        println!("[CONFIG] Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    // Page data and version are resolved once; handlers only ever read them
    let app = config::AppContext::resolve();

    logger::log_server_start(&addr, &cfg);
    println!("[CONFIG] App version: {}", app.version);

    let state = Arc::new(config::AppState::new(&cfg, app));

    // LocalSet for spawn_local support in the connection handler
    let local = tokio::task::LocalSet::new();
    local.run_until(server::run(listener, state)).await
}

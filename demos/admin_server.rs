//! Runs the coordinator admin endpoint.
//!
//! Usage: `cargo run --example admin_server -- <client-config-file> [server-config.json]`
//!
//! Try it with:
//!
//! ```text
//! curl -i http://127.0.0.1:8080/admin
//! curl -i -X POST -H 'Transfer-Encoding: chunked' --data 'x' http://127.0.0.1:8080/admin
//! curl -i -X PATCH http://127.0.0.1:8080/admin
//! ```

use coordinator_admin::{
    logging, AdminServer, ErrorFormat, FileConfigProvider, RestErrorResponder, ServerConfig,
};
use log::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let client_configs = args.next().unwrap_or_else(|| "config/clients.xml".to_string());
    let config = match args.next() {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };

    info!("Serving store client configs from {client_configs}");

    let server = AdminServer::new(
        config,
        FileConfigProvider::new(client_configs),
        RestErrorResponder::new(ErrorFormat::Json),
    );
    server.start().await?;

    Ok(())
}

//! Table Server Binary
//!
//! Runs the HTTP server for realtime multi-table Hold'em.
//! Clients attach over WebSocket at /ws; the admin surface lives under /api.

use cardroom::config::Config;

#[tokio::main]
async fn main() {
    cardroom::init();
    let config = Config::from_env();
    cardroom::hosting::Server::run(config).await.expect("server failed");
}

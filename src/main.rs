use clap::Parser;

use thirteen_tourney::dispatcher::Context;
use thirteen_tourney::servers::{WsConfig, WsServer};
use thirteen_tourney::setup_logging;

#[derive(Parser, Debug)]
#[command(name = "thirteen_tourney")]
struct Config {
    /// Interface to bind the WebSocket server on.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to bind the WebSocket server on.
    #[arg(short = 'p', long, default_value_t = 7878)]
    port: u16,

    /// Points a seat must reach to win the tournament.
    #[arg(long, default_value_t = 21)]
    target_score: u32,

    /// `RUST_LOG`-style level for the file logger (overridden by the
    /// `RUST_LOG` environment variable when set).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Directory the rotating log files are written to.
    #[arg(long, default_value = "/var/log/thirteen_tourney/")]
    log_dir: String,
}

#[tokio::main]
async fn main() -> thirteen_tourney::Result<()> {
    let config = Config::parse();

    setup_logging(&config.log_dir, &config.log_level);

    log::info!(
        "starting thirteen_tourney: target_score={} host={} port={}",
        config.target_score,
        config.host,
        config.port
    );

    let ctx = Context::new(config.target_score);
    let server = WsServer::new(
        WsConfig {
            host: config.host,
            port: config.port,
        },
        ctx,
    );

    server.start().await
}

use clap::Parser;
use rpc_latency_bench::{app::App, cli::Cli};

#[tokio::main]
async fn main() {
    // Load .env before parsing so clap's env-backed flags see it
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let use_color = cli.use_colors();

    let outcome = match App::from_cli(&cli) {
        Ok(app) => app.run().await,
        Err(e) => Err(e),
    };

    if let Err(e) = outcome {
        eprintln!("{}", e.format_for_console(use_color));
        std::process::exit(e.exit_code());
    }
}

use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = waypoint::cli::Cli::parse();
    if let Err(e) = waypoint::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

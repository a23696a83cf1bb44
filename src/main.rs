use std::net::{IpAddr, SocketAddr};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use compound::api::{self, CalcArgs};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "compound",
    about = "Compound interest calculator with daily simulation, monthly plan and milestones"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API over HTTP.
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: IpAddr,
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Run one calculation and print the report.
    Calculate {
        #[command(flatten)]
        args: CalcArgs,
        #[arg(long, help = "Print the full report as JSON")]
        json: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { host, port } => {
            if let Err(e) = api::run_http_server(SocketAddr::new(host, port)).await {
                error!("server error: {e}");
                return ExitCode::FAILURE;
            }
        }
        Command::Calculate { args, json } => {
            let request = match api::build_request(args) {
                Ok(request) => request,
                Err(e) => {
                    error!("{e}");
                    return ExitCode::FAILURE;
                }
            };
            let report = api::calculate(&request);
            if json {
                match serde_json::to_string_pretty(&report) {
                    Ok(text) => println!("{text}"),
                    Err(e) => {
                        error!("failed to serialize report: {e}");
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                print!("{}", api::render_summary(&report, request.lang));
            }
        }
    }
    ExitCode::SUCCESS
}

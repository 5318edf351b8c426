use clap::Parser;
use dotenv::dotenv;
use statarb::cli::{AnalyzeCliConfig, Cli, Commands, PriceInput};
use statarb::commands::run_analyze;
use statarb::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from the .env file (RUST_LOG, etc.)
    dotenv().ok();

    let cli = Cli::parse();

    init_tracing(&cli.verbose).map_err(|e| e as Box<dyn std::error::Error>)?;

    match cli.command {
        Commands::Analyze {
            csv,
            synthetic,
            tickers,
            observations,
            seed,
            exclusionary,
            correlation_threshold,
            top_n,
            workers,
            config,
            output,
        } => {
            let input = match (csv, synthetic) {
                (Some(path), false) => PriceInput::Csv(path),
                (None, true) => PriceInput::Synthetic {
                    tickers,
                    observations,
                    seed,
                },
                _ => return Err("provide either --csv <path> or --synthetic".into()),
            };

            run_analyze(AnalyzeCliConfig {
                input,
                config_path: config,
                exclusionary,
                correlation_threshold,
                top_n,
                workers,
                output,
            })
            .await?;
        }
    }

    Ok(())
}

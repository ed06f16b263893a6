mod args;
mod config;
mod main_lib;

use clap::Parser;
use moneywords_engine::{Appearance, CurrencyService, ReportOptions};

use args::{Cli, Command};
use config::{split_codes, Config};
use main_lib::{build_service, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env();
    init_tracing();

    let service = build_service(&config)?;
    let result = run(&service, &config, cli.cmd).await;
    service.close();
    result
}

async fn run(service: &CurrencyService, config: &Config, cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::Parse(args) => match service.extract_with_mode(&args.text, args.mode) {
            Some(token) => println!("{}", serde_json::to_string_pretty(&token)?),
            None => anyhow::bail!("No amount with a currency found in '{}'", args.text),
        },
        Command::Convert(args) => {
            let targets = match &args.to {
                Some(list) => split_codes(list),
                None => config.default_targets.clone(),
            };
            let options = ReportOptions {
                mode: args.mode,
                selector: args.source,
                appearance: Appearance {
                    compact: args.compact,
                    ..Appearance::default()
                },
                debug: args.debug,
            };
            match service.convert_text(&args.text, &targets, &options).await {
                Some(report) => println!("{}", report),
                None => anyhow::bail!("Nothing to convert in '{}'", args.text),
            }
        }
        Command::Rates(args) => {
            let snapshot = service
                .get_exchange_rates(&args.base.trim().to_uppercase(), &args.source)
                .await;
            println!("{}", serde_json::to_string_pretty(snapshot.as_ref())?);
        }
        Command::Calc(args) => match service.calculate(&args.text) {
            Some(result) => println!("{}", result),
            None => anyhow::bail!("Cannot evaluate '{}'", args.text),
        },
        Command::Health(args) => {
            if let Some(id) = &args.reset {
                if !service.reset_provider(id) {
                    tracing::warn!("Unknown provider '{}'", id);
                }
            }
            println!("{}", serde_json::to_string_pretty(&service.provider_health())?);
        }
    }
    Ok(())
}

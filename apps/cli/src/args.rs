use clap::{Args, Parser, Subcommand};
use moneywords_engine::ProcessingMode;
use moneywords_rates::SourceSelector;

#[derive(Parser)]
#[command(author, version, about = "Find money in text and convert it")]
pub struct Cli {
    #[command(subcommand)]
    pub(crate) cmd: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Print the amount and currency found in a text as JSON
    Parse(ParseArgs),

    /// Convert the amount found in a text into other currencies
    Convert(ConvertArgs),

    /// Print the exchange-rate table for a base currency as JSON
    Rates(RatesArgs),

    /// Evaluate an arithmetic expression, e.g. "(20 + 5) * 4 $"
    Calc(CalcArgs),

    /// Show circuit-breaker state per rate provider
    Health(HealthArgs),
}

#[derive(Args)]
pub(crate) struct ParseArgs {
    pub(crate) text: String,

    #[arg(long, default_value_t = ProcessingMode::Advanced)]
    pub(crate) mode: ProcessingMode,
}

#[derive(Args)]
pub(crate) struct ConvertArgs {
    pub(crate) text: String,

    /// Comma-separated target codes; MONEYWORDS_TARGETS when omitted
    #[arg(long)]
    pub(crate) to: Option<String>,

    /// Provider id, or "auto" for priority order
    #[arg(long, default_value = "auto")]
    pub(crate) source: SourceSelector,

    #[arg(long, default_value_t = ProcessingMode::Advanced)]
    pub(crate) mode: ProcessingMode,

    /// Crypto amounts with two decimals
    #[arg(long)]
    pub(crate) compact: bool,

    /// Show which table priced each line
    #[arg(long)]
    pub(crate) debug: bool,
}

#[derive(Args)]
pub(crate) struct RatesArgs {
    #[arg(default_value = "USD")]
    pub(crate) base: String,

    #[arg(long, default_value = "auto")]
    pub(crate) source: SourceSelector,
}

#[derive(Args)]
pub(crate) struct CalcArgs {
    pub(crate) text: String,
}

#[derive(Args)]
pub(crate) struct HealthArgs {
    /// Close the circuit of this provider first
    #[arg(long)]
    pub(crate) reset: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_args() {
        let cli = Cli::try_parse_from([
            "moneywords",
            "convert",
            "10кк баксов",
            "--to",
            "eur,rub",
            "--source",
            "NBRB",
            "--debug",
        ])
        .unwrap();
        let Command::Convert(args) = cli.cmd else {
            panic!("expected convert");
        };
        assert_eq!(args.text, "10кк баксов");
        assert_eq!(args.to.as_deref(), Some("eur,rub"));
        assert_eq!(args.source, SourceSelector::pinned("nbrb"));
        assert_eq!(args.mode, ProcessingMode::Advanced);
        assert!(args.debug);
        assert!(!args.compact);
    }

    #[test]
    fn test_parse_mode() {
        let cli =
            Cli::try_parse_from(["moneywords", "parse", "5$", "--mode", "simplified"]).unwrap();
        let Command::Parse(args) = cli.cmd else {
            panic!("expected parse");
        };
        assert_eq!(args.mode, ProcessingMode::Simplified);

        assert!(Cli::try_parse_from(["moneywords", "parse", "5$", "--mode", "turbo"]).is_err());
    }

    #[test]
    fn test_rates_defaults() {
        let cli = Cli::try_parse_from(["moneywords", "rates"]).unwrap();
        let Command::Rates(args) = cli.cmd else {
            panic!("expected rates");
        };
        assert_eq!(args.base, "USD");
        assert!(args.source.is_auto());
    }
}

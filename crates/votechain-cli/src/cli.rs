use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "votechain",
    about = "VoteChain: tamper-evident, hash-chained vote ledger",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Election config (TOML). Defaults to the built-in ballot.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run an interactive voting session
    Session(SessionArgs),
    /// Cast a single vote into a ledger file
    Cast(CastArgs),
    /// Show vote counts and the winner or tie
    Results(ResultsArgs),
    /// Verify ledger chain integrity
    Verify(VerifyArgs),
    /// Print every record in the ledger
    Show(ShowArgs),
    /// List the candidate symbols
    Candidates(CandidatesArgs),
}

#[derive(Args)]
pub struct SessionArgs {
    /// Ledger file to resume from and save to
    #[arg(long)]
    pub ledger: Option<PathBuf>,
}

#[derive(Args)]
pub struct CastArgs {
    pub voter_id: String,
    pub name: String,
    pub symbol: String,
    #[arg(long)]
    pub ledger: PathBuf,
}

#[derive(Args)]
pub struct ResultsArgs {
    #[arg(long)]
    pub ledger: PathBuf,
}

#[derive(Args)]
pub struct VerifyArgs {
    #[arg(long)]
    pub ledger: PathBuf,
    /// Report every violation instead of stopping at the first
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    #[arg(long)]
    pub ledger: PathBuf,
    /// Print full digests
    #[arg(long)]
    pub full: bool,
}

#[derive(Args)]
pub struct CandidatesArgs {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_session() {
        let cli = Cli::try_parse_from(["votechain", "session"]).unwrap();
        if let Command::Session(args) = cli.command {
            assert!(args.ledger.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_cast() {
        let cli = Cli::try_parse_from([
            "votechain", "cast", "V101", "Asha", "$", "--ledger", "l.json",
        ])
        .unwrap();
        if let Command::Cast(args) = cli.command {
            assert_eq!(args.voter_id, "V101");
            assert_eq!(args.name, "Asha");
            assert_eq!(args.symbol, "$");
            assert_eq!(args.ledger, PathBuf::from("l.json"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn cast_requires_ledger() {
        assert!(Cli::try_parse_from(["votechain", "cast", "V101", "Asha", "$"]).is_err());
    }

    #[test]
    fn parse_verify_all() {
        let cli = Cli::try_parse_from(["votechain", "verify", "--ledger", "x", "--all"]).unwrap();
        if let Command::Verify(args) = cli.command {
            assert!(args.all);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_show_full() {
        let cli = Cli::try_parse_from(["votechain", "show", "--ledger", "x", "--full"]).unwrap();
        if let Command::Show(args) = cli.command {
            assert!(args.full);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_globals() {
        let cli = Cli::try_parse_from([
            "votechain", "--verbose", "--format", "json", "--config", "e.toml", "candidates",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("e.toml")));
        assert!(matches!(cli.command, Command::Candidates(_)));
    }
}

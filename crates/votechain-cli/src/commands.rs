use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use serde_json::json;
use votechain_ledger::{
    AuditReport, JsonFileStore, Ledger, LedgerReader, Record, SystemClock,
};
use votechain_registry::{CandidateTable, ElectionConfig, Outcome, Registry, Tally, VoteCounts};

use crate::cli::*;
use crate::session::Session;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let format = cli.format;
    match cli.command {
        Command::Session(args) => cmd_session(&config, args, format),
        Command::Cast(args) => cmd_cast(&config, args, format),
        Command::Results(args) => cmd_results(&config, args, format),
        Command::Verify(args) => cmd_verify(args, format),
        Command::Show(args) => cmd_show(args, format),
        Command::Candidates(_) => cmd_candidates(&config, format),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ElectionConfig> {
    match path {
        Some(path) => ElectionConfig::load(path)
            .with_context(|| format!("loading election config {}", path.display())),
        None => Ok(ElectionConfig::default()),
    }
}

/// Restore the ledger at `path`, or start a fresh one if the file does not exist.
fn open_or_create(path: &Path) -> anyhow::Result<Ledger> {
    let store = JsonFileStore::new(path);
    let restored = Ledger::restore(&store, Arc::new(SystemClock))
        .with_context(|| format!("opening ledger {}", path.display()))?;
    Ok(restored.unwrap_or_default())
}

fn open_existing(path: &Path) -> anyhow::Result<Ledger> {
    let store = JsonFileStore::new(path);
    match Ledger::restore(&store, Arc::new(SystemClock))
        .with_context(|| format!("opening ledger {}", path.display()))?
    {
        Some(ledger) => Ok(ledger),
        None => bail!("no ledger at {}", path.display()),
    }
}

fn save(ledger: &Ledger, path: &Path) -> anyhow::Result<()> {
    ledger
        .persist(&JsonFileStore::new(path))
        .with_context(|| format!("saving ledger {}", path.display()))
}

/// Refuse to add votes on top of a chain that no longer verifies.
fn ensure_intact(ledger: &Ledger) -> anyhow::Result<()> {
    ledger.verify().context("ledger failed integrity check")
}

fn registry_for(config: &ElectionConfig, ledger: Ledger) -> anyhow::Result<Registry> {
    let table = config.candidate_table()?;
    Ok(Registry::resume(
        Arc::new(ledger),
        table,
        config.voter_id.clone(),
    ))
}

fn cmd_session(config: &ElectionConfig, args: SessionArgs, format: OutputFormat) -> anyhow::Result<()> {
    let ledger = match &args.ledger {
        Some(path) => open_or_create(path)?,
        None => Ledger::new(),
    };
    ensure_intact(&ledger)?;
    let registry = registry_for(config, ledger)?;

    let stdin = io::stdin();
    let summary = Session::new(&registry, stdin.lock(), io::stdout()).run()?;
    println!(
        "\n{} accepted, {} refused",
        summary.accepted.to_string().green(),
        summary.refused.to_string().red()
    );

    let ledger = registry.ledger();
    if let Some(path) = &args.ledger {
        save(ledger, path)?;
    }

    let (counts, outcome) = Tally::new(&**ledger, registry.candidates()).outcome()?;
    print_results(registry.candidates(), &counts, &outcome, format)?;
    print_chain(&ledger.export(), false, format)
}

fn cmd_cast(config: &ElectionConfig, args: CastArgs, format: OutputFormat) -> anyhow::Result<()> {
    let ledger = open_or_create(&args.ledger)?;
    ensure_intact(&ledger)?;
    let registry = registry_for(config, ledger)?;

    let candidate = registry.cast_vote(&args.voter_id, &args.name, &args.symbol)?;
    save(registry.ledger(), &args.ledger)?;

    let record = registry.ledger().head();
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "candidate": candidate,
                "record": record,
            }))?
        ),
        OutputFormat::Text => {
            println!(
                "{} Vote recorded for {} ({}) by {} (ID: {})",
                "✓".green().bold(),
                candidate.bold(),
                args.symbol,
                args.name,
                args.voter_id
            );
            println!("  Record: #{} {}", record.index(), record.digest().short_hex().yellow());
        }
    }
    Ok(())
}

fn cmd_results(config: &ElectionConfig, args: ResultsArgs, format: OutputFormat) -> anyhow::Result<()> {
    let ledger = open_existing(&args.ledger)?;
    if let Err(err) = ledger.verify() {
        eprintln!("{} {}", "warning:".yellow().bold(), err);
    }
    let table = config.candidate_table()?;
    let (counts, outcome) = Tally::new(&ledger, &table).outcome()?;
    print_results(&table, &counts, &outcome, format)
}

fn cmd_verify(args: VerifyArgs, format: OutputFormat) -> anyhow::Result<()> {
    let ledger = open_existing(&args.ledger)?;

    if args.all {
        let report = ledger.audit();
        print_audit(&report, format)?;
        if let Some(index) = report.first_tampered() {
            bail!("ledger tampered at index {index}");
        }
        return Ok(());
    }

    let result = ledger.verify();
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "valid": result.is_ok(),
                "records": ledger.record_count(),
                "tampered_at": result.as_ref().err().map(|e| e.index()),
            }))?
        ),
        OutputFormat::Text => match &result {
            Ok(()) => println!(
                "{} Ledger integrity verified ({} records)",
                "✓".green().bold(),
                ledger.record_count()
            ),
            Err(err) => println!("{} {}", "✗".red().bold(), err),
        },
    }
    result.map_err(Into::into)
}

fn cmd_show(args: ShowArgs, format: OutputFormat) -> anyhow::Result<()> {
    let ledger = open_existing(&args.ledger)?;
    print_chain(&ledger.export(), args.full, format)
}

fn cmd_candidates(config: &ElectionConfig, format: OutputFormat) -> anyhow::Result<()> {
    let table = config.candidate_table()?;
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "candidates": table.iter().collect::<Vec<_>>(),
                "exit_symbol": table.exit_symbol(),
                "voter_id_example": config.voter_id.example(),
            }))?
        ),
        OutputFormat::Text => {
            for c in &table {
                println!("Symbol: {} → Candidate: {}", c.symbol.yellow(), c.name);
            }
            println!("Symbol: {} → Exit voting", table.exit_symbol().yellow());
        }
    }
    Ok(())
}

fn print_results(
    table: &CandidateTable,
    counts: &VoteCounts,
    outcome: &Outcome,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "counts": counts,
                "total": counts.total(),
                "result": outcome,
            }))?
        ),
        OutputFormat::Text => {
            println!("\n{}", "Final vote count:".bold());
            for c in counts.iter() {
                let symbol = table.symbol_for(&c.name).unwrap_or("?");
                println!("  {} ({}): {}", c.name, symbol.yellow(), c.votes);
            }
            match outcome {
                Outcome::Winner { candidate, votes } => println!(
                    "{} Winner: {} with {} votes",
                    "🏆".bold(),
                    candidate.green().bold(),
                    votes
                ),
                Outcome::Tie { candidates, votes } => println!(
                    "It's a tie between {} at {} votes",
                    candidates.join(", ").yellow().bold(),
                    votes
                ),
            }
        }
    }
    Ok(())
}

fn print_chain(records: &[Record], full: bool, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
        OutputFormat::Text => {
            println!("\n{}", "Ledger:".bold());
            for r in records {
                let (digest, previous) = if full {
                    (r.digest().to_hex(), r.previous_digest().to_hex())
                } else {
                    (r.digest().short_hex(), r.previous_digest().short_hex())
                };
                let data: Vec<String> = r
                    .payload()
                    .iter()
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect();
                println!("Index: {}", r.index().to_string().bold());
                println!("Timestamp: {}", r.timestamp());
                println!("Data: {{{}}}", data.join(", "));
                println!("Hash: {}", digest.yellow());
                println!("Previous Hash: {}\n", previous.dimmed());
            }
        }
    }
    Ok(())
}

fn print_audit(report: &AuditReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "valid": report.is_valid(),
                "records": report.record_count,
                "hash_chain_valid": report.hash_chain_valid,
                "sequence_contiguous": report.sequence_contiguous,
                "timestamps_monotonic": report.timestamps_monotonic,
                "genesis_intact": report.genesis_intact,
                "violations": report
                    .violations
                    .iter()
                    .map(|v| json!({ "index": v.index(), "detail": v.to_string() }))
                    .collect::<Vec<_>>(),
            }))?
        ),
        OutputFormat::Text => {
            let mark = |ok: bool| if ok { "valid".green() } else { "BROKEN".red().bold() };
            println!("Audited {} records", report.record_count);
            println!("  Hash chain: {}", mark(report.hash_chain_valid));
            println!("  Sequence: {}", mark(report.sequence_contiguous));
            println!("  Timestamps: {}", mark(report.timestamps_monotonic));
            println!("  Genesis: {}", mark(report.genesis_intact));
            for v in &report.violations {
                println!("  {} {}", "✗".red(), v);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use votechain_registry::VoteError;

    use super::*;

    fn cast(path: &Path, id: &str, symbol: &str) -> anyhow::Result<()> {
        cmd_cast(
            &ElectionConfig::default(),
            CastArgs {
                voter_id: id.into(),
                name: format!("voter {id}"),
                symbol: symbol.into(),
                ledger: path.to_path_buf(),
            },
            OutputFormat::Text,
        )
    }

    #[test]
    fn cast_creates_and_extends_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        cast(&path, "V101", "@").unwrap();
        cast(&path, "V102", "#").unwrap();

        let ledger = open_existing(&path).unwrap();
        assert_eq!(ledger.record_count(), 3);
        assert!(ledger.verify().is_ok());
    }

    #[test]
    fn cast_refuses_duplicate_across_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        cast(&path, "V101", "@").unwrap();
        let err = cast(&path, "V101", "$").unwrap_err();
        assert_eq!(
            err.downcast_ref::<VoteError>(),
            Some(&VoteError::DuplicateVote("V101".into()))
        );
        assert_eq!(open_existing(&path).unwrap().record_count(), 2);
    }

    #[test]
    fn cast_refuses_to_extend_tampered_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        cast(&path, "V101", "@").unwrap();
        let text = fs::read_to_string(&path).unwrap();
        fs::write(&path, text.replace("Dinesh", "Rahul")).unwrap();

        assert!(cast(&path, "V102", "#").is_err());
        let args = VerifyArgs {
            ledger: path.clone(),
            all: false,
        };
        assert!(cmd_verify(args, OutputFormat::Json).is_err());
    }

    #[test]
    fn verify_all_passes_clean_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        cast(&path, "V101", "@").unwrap();
        let args = VerifyArgs { ledger: path, all: true };
        assert!(cmd_verify(args, OutputFormat::Text).is_ok());
    }

    #[test]
    fn results_and_show_read_existing_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        cast(&path, "V101", "$").unwrap();
        let config = ElectionConfig::default();
        assert!(cmd_results(&config, ResultsArgs { ledger: path.clone() }, OutputFormat::Json).is_ok());
        assert!(cmd_show(ShowArgs { ledger: path, full: true }, OutputFormat::Text).is_ok());
    }

    #[test]
    fn missing_ledger_is_an_error_for_readers() {
        let dir = tempfile::tempdir().unwrap();
        let args = ShowArgs {
            ledger: dir.path().join("nope.json"),
            full: false,
        };
        assert!(cmd_show(args, OutputFormat::Text).is_err());
    }
}

use std::io::{self, BufRead, Write};

use colored::Colorize;
use votechain_ledger::{Ledger, LedgerReader, LedgerWriter};
use votechain_registry::{Registry, VoteError};

/// What happened during an interactive session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub accepted: usize,
    pub refused: usize,
}

/// Prompt loop that feeds votes into a [`Registry`].
///
/// Reads voter id, name, and symbol in turn. Entering the exit symbol at the
/// voter id or symbol prompt, or closing the input, ends the session.
pub struct Session<'a, R, W, L = Ledger> {
    registry: &'a Registry<L>,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write, L: LedgerWriter + LedgerReader> Session<'a, R, W, L> {
    pub fn new(registry: &'a Registry<L>, input: R, output: W) -> Self {
        Self {
            registry,
            input,
            output,
        }
    }

    pub fn run(&mut self) -> io::Result<SessionSummary> {
        let registry = self.registry;
        let table = registry.candidates();
        let exit = table.exit_symbol();
        let mut summary = SessionSummary::default();
        self.banner()?;

        loop {
            let Some(voter_id) =
                self.prompt(&format!("Enter your Voter ID (or '{exit}' to exit): "))?
            else {
                break;
            };
            if table.is_exit(&voter_id) {
                break;
            }
            if registry.validate_identifier(&voter_id).is_err() {
                writeln!(
                    self.output,
                    "{} Invalid Voter ID format! Must be like '{}'.\n",
                    "✗".red(),
                    registry.format().example()
                )?;
                summary.refused += 1;
                continue;
            }

            let Some(name) = self.prompt("Enter your Name: ")? else {
                break;
            };

            let mut symbols: Vec<&str> = table.symbols().collect();
            symbols.push(exit);
            writeln!(self.output, "Available symbols: {}", symbols.join(" "))?;
            let Some(symbol) = self.prompt("Enter the symbol of your chosen candidate: ")? else {
                break;
            };
            if table.is_exit(&symbol) {
                break;
            }

            match registry.cast_vote(&voter_id, &name, &symbol) {
                Ok(candidate) => {
                    writeln!(
                        self.output,
                        "{} Vote recorded for {} ({}) by {} (ID: {})\n",
                        "✓".green().bold(),
                        candidate.bold(),
                        symbol,
                        name,
                        voter_id
                    )?;
                    summary.accepted += 1;
                }
                Err(err) => {
                    let message = match &err {
                        VoteError::DuplicateVote(id) => format!("Voter ID {id} has already voted."),
                        VoteError::UnknownCandidate(_) => "Invalid symbol! Vote not counted.".into(),
                        VoteError::InvalidIdentifierFormat(_) => err.to_string(),
                    };
                    writeln!(self.output, "{} {}\n", "✗".red(), message)?;
                    summary.refused += 1;
                }
            }
        }

        writeln!(self.output, "Exiting voting session.")?;
        Ok(summary)
    }

    fn banner(&mut self) -> io::Result<()> {
        let table = self.registry.candidates();
        writeln!(self.output, "{}\n", "VoteChain voting session".bold())?;
        writeln!(self.output, "Candidate symbols:")?;
        for c in table {
            writeln!(self.output, "  {} → {}", c.symbol.yellow(), c.name)?;
        }
        writeln!(self.output, "  {} → exit voting\n", table.exit_symbol().yellow())
    }

    /// Print `label` and read one trimmed line, or `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use votechain_ledger::ManualClock;
    use votechain_registry::ElectionConfig;

    use super::*;

    fn registry() -> Registry {
        let config = ElectionConfig::default();
        let ledger = Arc::new(Ledger::with_clock(Arc::new(ManualClock::new(0))));
        Registry::new(ledger, config.candidate_table().unwrap(), config.voter_id)
    }

    fn run(registry: &Registry, script: &str) -> (SessionSummary, String) {
        colored::control::set_override(false);
        let mut out = Vec::new();
        let summary = Session::new(registry, Cursor::new(script.to_string()), &mut out)
            .run()
            .unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn records_votes_until_exit() {
        let reg = registry();
        let (summary, out) = run(&reg, "V101\nAsha\n#\nV102\nRavi\n$\n.\n");
        assert_eq!(summary, SessionSummary { accepted: 2, refused: 0 });
        assert!(out.contains("Vote recorded for Seetha (#) by Asha (ID: V101)"));
        assert!(out.contains("Vote recorded for Rahul ($) by Ravi (ID: V102)"));
        assert!(out.ends_with("Exiting voting session.\n"));
        assert_eq!(reg.ledger().record_count(), 3);
    }

    #[test]
    fn reports_refusals_and_keeps_going() {
        let reg = registry();
        let script = "V101\nAsha\n@\nV101\nAsha\n#\nV1\nV103\nMina\n%\nV103\nMina\n@\n";
        let (summary, out) = run(&reg, script);
        assert_eq!(summary, SessionSummary { accepted: 2, refused: 3 });
        assert!(out.contains("Voter ID V101 has already voted."));
        assert!(out.contains("Invalid Voter ID format! Must be like 'V101'."));
        assert!(out.contains("Invalid symbol! Vote not counted."));
        assert_eq!(reg.ledger().record_count(), 3);
    }

    #[test]
    fn exit_at_symbol_prompt_discards_pending_vote() {
        let reg = registry();
        let (summary, _) = run(&reg, "V101\nAsha\n.\n");
        assert_eq!(summary, SessionSummary::default());
        assert!(!reg.has_voted("V101"));
        assert_eq!(reg.ledger().record_count(), 1);
    }

    #[test]
    fn end_of_input_ends_session() {
        let reg = registry();
        let (summary, out) = run(&reg, "V101\n");
        assert_eq!(summary, SessionSummary::default());
        assert!(out.contains("Exiting voting session."));
    }

    #[test]
    fn banner_lists_candidates() {
        let reg = registry();
        let (_, out) = run(&reg, "");
        assert!(out.contains("@ → Dinesh"));
        assert!(out.contains(". → exit voting"));
    }
}

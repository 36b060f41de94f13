use std::path::PathBuf;

use anyhow::Context;
use colored::Colorize;
use quill_commit::{CommitCoordinator, CommitReport};
use quill_doc::{DocumentSet, DocumentWriter};
use quill_journal::{JournalEngine, JournalSummary};
use quill_tree::Interner;
use tracing::{error, info};

use crate::cli::{Cli, OutputFormat};

/// Everything one run produced, for reporting.
struct RunOutcome {
    summary: JournalSummary,
    commit: Option<CommitReport>,
    skipped: Vec<PathBuf>,
    failed_documents: Vec<(PathBuf, String)>,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let mut interner = Interner::new();
    let mut set = DocumentSet::new();
    let mut failed_documents = Vec::new();

    for path in &cli.documents {
        match set.load(&mut interner, path) {
            Ok(entry) => {
                info!(id = %entry.id, path = %path.display(), "document loaded");
            }
            Err(err) => {
                error!(path = %path.display(), error = %err, "document not loaded");
                failed_documents.push((path.clone(), err.to_string()));
            }
        }
    }
    if set.is_empty() {
        anyhow::bail!("no documents could be loaded");
    }

    let mut engine = if cli.fix_checksums {
        JournalEngine::with_fix_checksums()
    } else {
        JournalEngine::new()
    };
    let summary = engine
        .process(&cli.journal, &mut set, &mut interner)
        .with_context(|| format!("processing journal {}", cli.journal.display()))?;

    let commit = if cli.dry_run {
        None
    } else {
        let writer = DocumentWriter::with_indent(cli.indent);
        let report = CommitCoordinator::new()
            .commit(&set, &writer, &interner, &cli.journal)
            .context("committing updated documents")?;
        Some(report)
    };

    // Loaded but unmodified documents were deliberately not committed.
    let committed: Vec<&PathBuf> = commit.iter().flat_map(|r| r.committed.iter()).collect();
    let skipped = set
        .entries()
        .filter(|entry| !committed.contains(&&entry.path))
        .map(|entry| entry.path.clone())
        .collect();

    let outcome = RunOutcome {
        summary,
        commit,
        skipped,
        failed_documents,
    };
    match cli.format {
        OutputFormat::Text => print_text(&outcome),
        OutputFormat::Json => print_json(&outcome)?,
    }
    Ok(())
}

fn print_text(outcome: &RunOutcome) {
    let summary = &outcome.summary;
    println!(
        "Journal: {} lines read, {} applied, {} rejected ({} transactions)",
        summary.lines_read.to_string().bold(),
        summary.lines_applied.to_string().green(),
        if summary.lines_rejected > 0 {
            summary.lines_rejected.to_string().red()
        } else {
            summary.lines_rejected.to_string().normal()
        },
        summary.transactions_applied
    );
    if summary.duplicate_lines > 0 {
        println!(
            "{} {} line(s) contained duplicate attribute paths",
            "warning:".yellow(),
            summary.duplicate_lines
        );
    }
    if summary.checksums_fixed > 0 {
        println!("Fixed checksums: {}", summary.checksums_fixed);
    }

    match &outcome.commit {
        Some(report) => {
            for path in &report.committed {
                println!("  {} {}", "committed:".green(), path.display());
            }
            for path in &outcome.skipped {
                println!("  {} {} (unchanged)", "skipped:".dimmed(), path.display());
            }
        }
        None => println!("{} no files were written", "dry run:".yellow()),
    }

    for (path, reason) in &outcome.failed_documents {
        println!("  {} {}: {}", "not loaded:".red(), path.display(), reason);
    }
}

fn print_json(outcome: &RunOutcome) -> anyhow::Result<()> {
    let value = serde_json::json!({
        "summary": outcome.summary,
        "commit": outcome.commit,
        "skipped": outcome.skipped,
        "failed_documents": outcome
            .failed_documents
            .iter()
            .map(|(path, reason)| {
                serde_json::json!({ "path": path, "error": reason })
            })
            .collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_journal::{format_checksum, line_checksum};
    use std::path::Path;

    fn cli(journal: &Path, documents: Vec<PathBuf>) -> Cli {
        Cli {
            journal: journal.to_path_buf(),
            documents,
            fix_checksums: false,
            dry_run: false,
            indent: 4,
            verbose: false,
            format: OutputFormat::Text,
        }
    }

    fn checksummed(line: &str) -> String {
        format!("{line} {}\n", format_checksum(line_checksum(line)))
    }

    #[test]
    fn end_to_end_apply_and_commit() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("players.data");
        std::fs::write(&doc, "id = players\nscore = 10\n").unwrap();
        let journal = dir.path().join("test.journal");
        std::fs::write(&journal, checksummed("players.score = 42")).unwrap();

        run(cli(&journal, vec![doc.clone()])).unwrap();

        let contents = std::fs::read_to_string(&doc).unwrap();
        assert!(contents.contains("score = 42"));
        assert!(!contents.contains("score = 10"));

        // The commit left no working files behind.
        assert!(!dir.path().join("players.data.new").exists());
        assert!(!dir.path().join("players.data.old").exists());
        assert!(!journal.exists());
        assert!(!dir.path().join("test.journal.processed").exists());
    }

    #[test]
    fn dry_run_leaves_everything_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("players.data");
        std::fs::write(&doc, "id = players\nscore = 10\n").unwrap();
        let journal = dir.path().join("test.journal");
        std::fs::write(&journal, checksummed("players.score = 42")).unwrap();

        let mut args = cli(&journal, vec![doc.clone()]);
        args.dry_run = true;
        run(args).unwrap();

        assert_eq!(
            std::fs::read_to_string(&doc).unwrap(),
            "id = players\nscore = 10\n"
        );
        assert!(journal.exists());
    }

    #[test]
    fn unloadable_document_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("players.data");
        std::fs::write(&good, "id = players\nscore = 10\n").unwrap();
        let broken = dir.path().join("broken.data");
        std::fs::write(&broken, "x = {\n").unwrap();
        let journal = dir.path().join("test.journal");
        std::fs::write(&journal, checksummed("players.score = 1")).unwrap();

        run(cli(&journal, vec![good.clone(), broken.clone()])).unwrap();

        assert!(std::fs::read_to_string(&good).unwrap().contains("score = 1"));
        // The broken document was left exactly as it was.
        assert_eq!(std::fs::read_to_string(&broken).unwrap(), "x = {\n");
    }

    #[test]
    fn no_loadable_documents_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.data");
        std::fs::write(&broken, "}\n").unwrap();
        let journal = dir.path().join("test.journal");
        std::fs::write(&journal, checksummed("players.score = 1")).unwrap();

        assert!(run(cli(&journal, vec![broken])).is_err());
    }

    #[test]
    fn missing_journal_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("players.data");
        std::fs::write(&doc, "id = players\nscore = 10\n").unwrap();

        let err = run(cli(&dir.path().join("absent.journal"), vec![doc])).unwrap_err();
        assert!(err.to_string().contains("processing journal"));
    }

    #[test]
    fn rejected_lines_leave_other_documents_committed() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("players.data");
        std::fs::write(&doc, "id = players\nscore = 10\n").unwrap();
        let journal = dir.path().join("test.journal");
        let mut text = checksummed("players.score = 3");
        text.push_str("ghost.x = 1 0000\n");
        std::fs::write(&journal, text).unwrap();

        run(cli(&journal, vec![doc.clone()])).unwrap();

        assert!(std::fs::read_to_string(&doc).unwrap().contains("score = 3"));
        assert!(!journal.exists());
    }

    #[test]
    fn json_format_runs_clean() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("players.data");
        std::fs::write(&doc, "id = players\nscore = 10\n").unwrap();
        let journal = dir.path().join("test.journal");
        std::fs::write(&journal, checksummed("players.score = 42")).unwrap();

        let mut args = cli(&journal, vec![doc]);
        args.format = OutputFormat::Json;
        run(args).unwrap();
    }
}

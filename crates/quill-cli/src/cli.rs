use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "quill",
    about = "Apply checksummed journal updates to attribute/value documents",
    version,
)]
pub struct Cli {
    /// Journal file of updates to apply
    pub journal: PathBuf,

    /// Document files addressed by the journal
    #[arg(required = true)]
    pub documents: Vec<PathBuf>,

    /// Recompute and report '****' checksums instead of rejecting them
    #[arg(long)]
    pub fix_checksums: bool,

    /// Apply updates in memory but do not write or replace any file
    #[arg(long)]
    pub dry_run: bool,

    /// Spaces per nesting level in rewritten documents
    #[arg(long, default_value = "4")]
    pub indent: usize,

    #[arg(short, long)]
    pub verbose: bool,

    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_journal_and_documents() {
        let cli = Cli::try_parse_from(["quill", "test.journal", "players.data", "layer.data"])
            .unwrap();
        assert_eq!(cli.journal, PathBuf::from("test.journal"));
        assert_eq!(cli.documents.len(), 2);
        assert!(!cli.fix_checksums);
        assert!(!cli.dry_run);
        assert_eq!(cli.indent, 4);
    }

    #[test]
    fn documents_are_required() {
        assert!(Cli::try_parse_from(["quill", "test.journal"]).is_err());
    }

    #[test]
    fn parse_fix_checksums() {
        let cli =
            Cli::try_parse_from(["quill", "--fix-checksums", "j", "d"]).unwrap();
        assert!(cli.fix_checksums);
    }

    #[test]
    fn parse_dry_run_and_indent() {
        let cli =
            Cli::try_parse_from(["quill", "--dry-run", "--indent", "2", "j", "d"]).unwrap();
        assert!(cli.dry_run);
        assert_eq!(cli.indent, 2);
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["quill", "-v", "j", "d"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["quill", "--format", "json", "j", "d"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}

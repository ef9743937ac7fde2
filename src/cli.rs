use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use rayon::prelude::*;
use ropey::Rope;

use crate::completions::{self, CursorPosition, Suggestion};
use crate::document::LineSource;
use crate::labels;
use crate::mode::CompletionMode;
use crate::workspace;

/// A label inferred from a file on disk.
#[derive(Debug)]
pub struct FileLabel {
    pub file: String,
    pub label: String,
}

/// Escape a value for CSV output. Wraps in quotes if the value contains
/// commas, quotes, or newlines. Doubles any existing quotes.
fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

pub fn format_suggestions_csv(suggestions: &[Suggestion]) -> String {
    let mut out = String::from("value,score,meta\n");
    for s in suggestions {
        out.push_str(&csv_escape(&s.value));
        out.push(',');
        out.push_str(&s.score.to_string());
        out.push(',');
        out.push_str(s.meta.as_str());
        out.push('\n');
    }
    out
}

pub fn format_labels_csv(labels: &[FileLabel]) -> String {
    let mut out = String::from("file,label\n");
    for l in labels {
        out.push_str(&csv_escape(&l.file));
        out.push(',');
        out.push_str(&csv_escape(&l.label));
        out.push('\n');
    }
    out
}

/// Infer the labels of a single file.
pub fn labels_in_file(path: &Path) -> anyhow::Result<Vec<FileLabel>> {
    let source = workspace::read_asm_file(path)?;
    let lines: Vec<&str> = source.lines().collect();
    let file = path.display().to_string();
    Ok(labels::infer_labels(&lines, "")
        .into_iter()
        .map(|label| FileLabel {
            file: file.clone(),
            label,
        })
        .collect())
}

/// Resolve paths into `.asm` files and infer their labels in parallel.
/// Unreadable files are reported on stderr and skipped.
pub fn labels_in_paths(paths: &[PathBuf]) -> Vec<FileLabel> {
    let files = workspace::collect_asm_files(paths);

    let mut per_file: Vec<(String, Vec<FileLabel>)> = files
        .par_iter()
        .filter_map(|path| match labels_in_file(path) {
            Ok(found) => Some((path.display().to_string(), found)),
            Err(e) => {
                eprintln!("{e:#}");
                None
            }
        })
        .collect();

    // Files sorted by name; labels keep first-occurrence order within a file
    per_file.sort_by(|a, b| a.0.cmp(&b.0));
    per_file.into_iter().flat_map(|(_, found)| found).collect()
}

/// Entry point for CLI `labels` subcommand. Returns exit code.
pub fn run_labels(args: &[String]) -> i32 {
    if args.is_empty() {
        eprintln!("Usage: lc3-lsp labels <files-or-dirs>...");
        return 2;
    }

    let paths: Vec<PathBuf> = args.iter().map(PathBuf::from).collect();
    let found = labels_in_paths(&paths);
    print!("{}", format_labels_csv(&found));
    0
}

/// Parsed `complete` arguments: `<file> <line> <column> [mode] [prefix]`.
#[derive(Debug, PartialEq)]
struct CompleteArgs {
    file: PathBuf,
    row: usize,
    column: usize,
    mode: CompletionMode,
    prefix: Option<String>,
}

fn parse_complete_args(args: &[String]) -> anyhow::Result<CompleteArgs> {
    if args.len() < 3 || args.len() > 5 {
        bail!("expected <file> <line> <column> [mode] [prefix]");
    }
    let line: usize = args[1]
        .parse()
        .with_context(|| format!("invalid line number: {}", args[1]))?;
    if line == 0 {
        bail!("line numbers start at 1");
    }
    let column: usize = args[2]
        .parse()
        .with_context(|| format!("invalid column: {}", args[2]))?;

    Ok(CompleteArgs {
        file: PathBuf::from(&args[0]),
        row: line - 1,
        column,
        mode: args
            .get(3)
            .map(|m| CompletionMode::parse_lenient(m))
            .unwrap_or(CompletionMode::Full),
        prefix: args.get(4).cloned(),
    })
}

fn complete_file(args: &CompleteArgs) -> anyhow::Result<Vec<Suggestion>> {
    let source = workspace::read_asm_file(&args.file)?;
    let rope = Rope::from_str(&source);
    let prefix = match &args.prefix {
        Some(p) => p.clone(),
        None => {
            let line = LineSource::line(&rope, args.row).unwrap_or_default();
            completions::word_before(&line, args.column).to_string()
        }
    };
    let position = CursorPosition::new(args.row, args.column);
    let suggestions = completions::generate(args.mode, &rope, position, &prefix)
        .with_context(|| format!("cannot complete in {}", args.file.display()))?;
    Ok(suggestions)
}

/// Entry point for CLI `complete` subcommand. Returns exit code.
pub fn run_complete(args: &[String]) -> i32 {
    let parsed = match parse_complete_args(args) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("Usage: lc3-lsp complete <file> <line> <column> [mode] [prefix]");
            return 2;
        }
    };

    match complete_file(&parsed) {
        Ok(suggestions) => {
            print!("{}", format_suggestions_csv(&suggestions));
            0
        }
        Err(e) => {
            eprintln!("{e:#}");
            1
        }
    }
}

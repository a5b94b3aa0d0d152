//! pathfind - Find and replace in path over a project tree.
//!
//! Usage:
//!   pathfind find <PATTERN> [PATH]                 Search a directory
//!   pathfind replace <PATTERN> <REPLACEMENT> [PATH] Preview a replacement
//!   pathfind history [--clear]                     Show remembered searches
//!   pathfind --help                                Show help

use std::collections::HashMap;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, eyre};
use tracing_subscriber::EnvFilter;

use pathfind_core::{ContentSource, FsContentSource};
use pathfind_scan::{JwalkScanner, ScanConfig};
use pathfind_search::{
    ResultKind, ResultNode, ScopeRegistry, SearchEvent, SearchHandle, SearchProgress,
    SearchReport, apply_to_line, spawn_search_with_registry,
};
use pathfind_settings::{ScopeChoice, SearchForm, SearchSessionDefaults};

#[derive(Parser)]
#[command(
    name = "pathfind",
    version,
    about = "Find and replace in path",
    long_about = "pathfind searches every file under a directory for a literal or \
                  regular expression pattern and prints the matches grouped by \
                  directory.\n\n\
                  Set RUST_LOG to see diagnostics on stderr."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find occurrences of a pattern
    Find {
        /// Text or regular expression to search for
        pattern: String,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Preview replacing occurrences of a pattern
    Replace {
        /// Text or regular expression to search for
        pattern: String,

        /// Replacement text (`$1`, `${name}` expand groups in regex mode)
        replacement: String,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Show or clear the remembered search history
    History {
        /// Forget all remembered inputs
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// Project root (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Match case
    #[arg(short = 'c', long)]
    case_sensitive: bool,

    /// Match whole words only (ignored with --regex)
    #[arg(short = 'w', long)]
    whole_words: bool,

    /// Treat the pattern as a regular expression
    #[arg(short = 'r', long)]
    regex: bool,

    /// File name masks separated by ';' (e.g. "*.rs;*.toml")
    #[arg(short = 'm', long)]
    masks: Option<String>,

    /// Search only this directory of the project
    #[arg(short = 'd', long, conflicts_with = "scope")]
    directory: Option<String>,

    /// Search only a named scope
    #[arg(short = 's', long)]
    scope: Option<String>,

    /// Define a named scope as NAME=DIR (repeatable)
    #[arg(long = "define-scope", value_name = "NAME=DIR", value_parser = parse_scope_definition)]
    scopes: Vec<(String, PathBuf)>,

    /// Include hidden files and directories
    #[arg(long)]
    hidden: bool,

    /// Extra name patterns to skip (repeatable)
    #[arg(long = "ignore", value_name = "GLOB")]
    ignore: Vec<String>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Do not remember this search
    #[arg(long)]
    no_history: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Find { pattern, search } => {
            run_search(pattern, None, search).await?;
        }
        Command::Replace {
            pattern,
            replacement,
            search,
        } => {
            run_search(pattern, Some(replacement), search).await?;
        }
        Command::History { clear } => {
            run_history(clear)?;
        }
    }

    Ok(())
}

/// Scan the project, run the search on a worker and print the results.
async fn run_search(pattern: String, replacement: Option<String>, args: SearchArgs) -> Result<()> {
    let root = args.path.canonicalize().context("Invalid path")?;
    let form = build_form(pattern, replacement, &args, &root);
    let request = form.to_request()?;

    eprintln!("Scanning {}...", root.display());

    let config = scan_config(&root, &args)?;
    let scanner = JwalkScanner::new();
    let tree = scanner.scan(&config).context("Scan failed")?;
    for warning in &tree.warnings {
        tracing::warn!(path = %warning.path.display(), "{}", warning.message);
    }
    eprintln!(
        "Searching {} files ({})...",
        tree.total_files(),
        format_size(tree.stats.total_size)
    );

    let registry: Option<Arc<dyn ScopeRegistry>> = if args.scopes.is_empty() {
        None
    } else {
        let scopes: HashMap<String, PathBuf> = args
            .scopes
            .iter()
            .map(|(name, dir)| (name.clone(), resolve_dir(&root, dir)))
            .collect();
        let registry: Arc<dyn ScopeRegistry> = Arc::new(scopes);
        Some(registry)
    };

    let source: Arc<dyn ContentSource> = Arc::new(FsContentSource::new());
    let handle = spawn_search_with_registry(Arc::new(tree), request, source, registry);
    let report = drive(handle).await?;

    if !args.no_history {
        let mut defaults = SearchSessionDefaults::load();
        defaults.record(&form);
        if let Err(e) = defaults.save() {
            tracing::warn!(error = %e, "could not save search history");
        }
    }

    match args.format {
        OutputFormat::Text => print_report(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

/// Pump worker events until the final report, cancelling on Ctrl-C.
async fn drive(mut handle: SearchHandle) -> Result<SearchReport> {
    let cancel = handle.cancellation_token();
    let interactive = std::io::stderr().is_terminal();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut interrupted = false;

    let result = loop {
        tokio::select! {
            event = handle.next_event() => match event {
                Some(SearchEvent::Progress(progress)) => {
                    if interactive {
                        show_progress(&progress);
                    }
                }
                Some(SearchEvent::Finished(result)) => break result,
                None => return Err(eyre!("search worker exited without a result")),
            },
            _ = &mut ctrl_c, if !interrupted => {
                interrupted = true;
                cancel.cancel();
            }
        }
    };

    if interactive {
        eprint!("\r\x1b[2K");
    }
    result.context("Search failed")
}

fn show_progress(progress: &SearchProgress) {
    eprint!(
        "\r\x1b[2K[{}/{}] {} ({} found)",
        progress.done,
        progress.total,
        truncate(&progress.label, 50),
        progress.matches_found
    );
}

fn build_form(
    pattern: String,
    replacement: Option<String>,
    args: &SearchArgs,
    root: &Path,
) -> SearchForm {
    let (scope, directory, scope_name) = match (&args.directory, &args.scope) {
        (Some(dir), _) => (
            ScopeChoice::Directory,
            resolve_dir(root, Path::new(dir)).display().to_string(),
            String::new(),
        ),
        (None, Some(name)) => (ScopeChoice::Scope, String::new(), name.clone()),
        (None, None) => (ScopeChoice::Project, String::new(), String::new()),
    };

    SearchForm {
        pattern,
        replacement,
        case_sensitive: args.case_sensitive,
        whole_words: args.whole_words,
        regex: args.regex,
        scope,
        directory,
        scope_name,
        mask_enabled: args.masks.is_some(),
        masks: args.masks.clone().unwrap_or_default(),
    }
}

fn scan_config(root: &Path, args: &SearchArgs) -> Result<ScanConfig> {
    let defaults = ScanConfig::new(root);
    let mut ignore_patterns = defaults.ignore_patterns;
    ignore_patterns.extend(args.ignore.iter().cloned());

    ScanConfig::builder()
        .root(root)
        .include_hidden(args.hidden)
        .ignore_patterns(ignore_patterns)
        .build()
        .map_err(|e| eyre!("Invalid scan options: {e}"))
}

/// Resolve a directory given relative to the project root.
fn resolve_dir(root: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        root.join(dir)
    }
}

fn parse_scope_definition(s: &str) -> Result<(String, PathBuf), String> {
    let (name, dir) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=DIR, got '{s}'"))?;
    if name.trim().is_empty() || dir.trim().is_empty() {
        return Err(format!("expected NAME=DIR, got '{s}'"));
    }
    Ok((name.trim().to_string(), PathBuf::from(dir.trim())))
}

/// Print the result tree and a summary.
fn print_report(report: &SearchReport) {
    let results = &report.results;

    println!();
    println!("{}", "─".repeat(70));
    println!(" {}", results.headline());
    println!(
        " {} of {} files searched in {:.2}s ({})",
        report.files_searched,
        report.files_total,
        report.duration.as_secs_f64(),
        report.status
    );
    println!("{}", "─".repeat(70));
    println!();

    for child in &results.root().children {
        print_result_node(child, 0);
    }

    if !report.warnings.is_empty() {
        println!();
        println!("{} warning(s) during search", report.warnings.len());
        for warning in &report.warnings {
            println!("   {}: {}", warning.path.display(), warning.message);
        }
    }
}

/// Print a result node and its children.
fn print_result_node(node: &ResultNode, depth: usize) {
    let indent = "  ".repeat(depth);

    match node.kind {
        ResultKind::Info => println!("{}{}", indent, node.label),
        ResultKind::Directory => {
            println!("{}▼ {}/ ({})", indent, node.label, node.match_count);
            for child in &node.children {
                print_result_node(child, depth + 1);
            }
        }
        ResultKind::File => {
            println!("{}  {} ({})", indent, node.label, node.match_count);
            print_file_matches(node, &indent);
        }
    }
}

fn print_file_matches(node: &ResultNode, indent: &str) {
    let mut matches = node.matches.iter().peekable();
    while let Some(first) = matches.next() {
        let mut on_line = vec![first];
        while let Some(next) = matches.next_if(|m| m.line == first.line) {
            on_line.push(next);
        }

        println!(
            "{}    {:>5}:{:<4} {}",
            indent,
            first.line,
            first.column + 1,
            first.line_text.trim_end()
        );

        if first.replacement.is_some() {
            let edits = on_line.iter().map(|m| {
                (
                    m.byte_range.clone(),
                    m.replacement.as_deref().unwrap_or_default(),
                )
            });
            println!(
                "{}    {:>10} {}",
                indent,
                "→",
                apply_to_line(&first.line_text, edits).trim_end()
            );
        }
    }
}

/// Show or clear remembered searches.
fn run_history(clear: bool) -> Result<()> {
    let mut defaults = SearchSessionDefaults::load();

    if clear {
        defaults = SearchSessionDefaults::default();
        defaults.save()?;
        eprintln!("Search history cleared");
        return Ok(());
    }

    let sections = [
        ("Searches", &defaults.search_history),
        ("Replacements", &defaults.replace_history),
        ("Masks", &defaults.mask_history),
        ("Directories", &defaults.directory_history),
    ];
    for (title, history) in sections {
        if history.is_empty() {
            continue;
        }
        println!("{title}:");
        for entry in history.iter() {
            println!("   {entry}");
        }
    }

    let form = defaults.restore();
    println!();
    println!(
        "Options: case={} words={} regex={} scope={}",
        form.case_sensitive, form.whole_words, form.regex, form.scope
    );
    if let Some(path) = SearchSessionDefaults::config_path() {
        println!("Stored in {}", path.display());
    }

    Ok(())
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Truncate a string to max length in characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scope_definition() {
        assert_eq!(
            parse_scope_definition("tests = crates/tests").unwrap(),
            ("tests".to_string(), PathBuf::from("crates/tests"))
        );
        assert!(parse_scope_definition("tests").is_err());
        assert!(parse_scope_definition("=dir").is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééé", 3), "éé…");
    }

    #[test]
    fn test_resolve_dir() {
        let root = Path::new("/project");
        assert_eq!(resolve_dir(root, Path::new("sub")), PathBuf::from("/project/sub"));
        assert_eq!(resolve_dir(root, Path::new("/abs")), PathBuf::from("/abs"));
    }
}

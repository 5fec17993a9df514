//! mergedoc: merge Javadoc HTML reference pages into Java source comments.
//!
//! Two modes:
//!
//! - **stdin mode**: `mergedoc -d docs/api < Widget.java > Widget.merged.java`
//! - **file mode**: `mergedoc -d docs/api -o out src/main/java`

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use mergedoc::{ListingCache, MergeOptions, Merger};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "mergedoc",
    version,
    about = "Merge Javadoc HTML reference pages back into Java source doc comments"
)]
struct Cli {
    /// Java sources, directories (searched recursively) or glob patterns.
    /// If omitted, reads one source from stdin and writes it to stdout.
    files: Vec<String>,

    /// Root directory of the Javadoc pages
    #[arg(short = 'd', long, env = "MERGEDOC_DOCS")]
    docs: PathBuf,

    /// Output directory; sources are written below it by package
    #[arg(short = 'o', long, conflicts_with = "in_place")]
    output: Option<PathBuf>,

    /// Rewrite the input files
    #[arg(long)]
    in_place: bool,

    /// Rewrite <code> runs as {@code} tags
    #[arg(long)]
    code_tags: bool,

    /// More logging (-v, -vv). RUST_LOG overrides.
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut merger = Merger::new(&cli.docs)
        .with_options(MergeOptions {
            code_tags: cli.code_tags,
        })
        .with_listing(Arc::new(ListingCache::new()));

    if !merger.doc_root().is_dir() {
        warn!(docs = %merger.doc_root().display(), "doc root is not a directory; sources pass through unchanged");
    }

    if cli.files.is_empty() {
        return stdin_mode(&mut merger);
    }

    file_mode(&cli, &mut merger)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// stdin mode: merge one source from stdin to stdout.
fn stdin_mode(merger: &mut Merger) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let merged = merger.merge(&input).context("failed to merge stdin")?;
    print!("{}", merged);
    Ok(())
}

/// file mode: merge every input file, writing to --output or back in place.
fn file_mode(cli: &Cli, merger: &mut Merger) -> Result<()> {
    let target = match (&cli.output, cli.in_place) {
        (Some(dir), _) => {
            fs::create_dir_all(dir).with_context(|| {
                format!("failed to create output directory: {}", dir.display())
            })?;
            Some(dir.as_path())
        }
        (None, true) => None,
        (None, false) => anyhow::bail!("--output or --in-place is required when files are given"),
    };

    let input_files = expand_globs(&cli.files)?;
    let mut failed = 0usize;

    for path in &input_files {
        let merged = match merger.merge_file(path) {
            Ok(merged) => merged,
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                failed += 1;
                continue;
            }
        };

        let out_path = match target {
            Some(dir) => output_path(dir, merger.merged_class_name(), path),
            None => path.clone(),
        };
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&out_path, &merged)
            .with_context(|| format!("failed to write {}", out_path.display()))?;

        info!(
            source = %path.display(),
            class = merger.merged_class_name().unwrap_or("-"),
            kind = merger.class_kind().map_or("-", |k| k.keyword()),
            output = %out_path.display(),
            "merged"
        );
    }

    if failed > 0 {
        anyhow::bail!("{} of {} files could not be merged", failed, input_files.len());
    }
    Ok(())
}

/// `out/` + `a.b.C` + `src/C.java` → `out/a/b/C.java`. Files without a
/// package land directly in `out/`.
fn output_path(output_dir: &Path, class_name: Option<&str>, source: &Path) -> PathBuf {
    let file_name = source.file_name().unwrap_or(source.as_os_str());
    let mut path = output_dir.to_path_buf();
    if let Some((package, _)) = class_name.and_then(|c| c.rsplit_once('.')) {
        path.extend(package.split('.'));
    }
    path.push(file_name);
    path
}

/// Compilation units without a type declaration.
const SKIPPED_FILES: &[&str] = &["package-info.java", "module-info.java"];

/// Expand glob patterns into a list of Java source files.
/// Directories are searched recursively.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            collect_sources(path, &mut files)?;
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn collect_sources(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;
    for entry in entries.flatten() {
        let p = entry.path();
        if p.is_dir() {
            collect_sources(&p, files)?;
        } else if is_java_source(&p) {
            files.push(p);
        }
    }
    Ok(())
}

fn is_java_source(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".java") && !SKIPPED_FILES.contains(&name)
}

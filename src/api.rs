use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::error::SqlsplitError;
use crate::report::{FileResult, FileStatus, Report};
use crate::settings::Settings;
use crate::splitter::Statement;
use crate::token::LexMode;

/// Split a SQL script according to the given settings.
/// This is the core API function.
pub fn split_string(source: &str, settings: &Settings) -> Result<Vec<Statement>, SqlsplitError> {
    check_terminated(source, settings)?;
    split_unchecked(source, settings)
}

fn split_unchecked(source: &str, settings: &Settings) -> Result<Vec<Statement>, SqlsplitError> {
    let dialect = settings.dialect()?;
    let scanner = dialect.scanner(settings.line_comment_end());

    let statements = scanner
        .statements(source)
        .into_iter()
        .map(|statement| {
            if dialect.strips_line_breaks() {
                Statement::new(
                    statement.index,
                    &dialect.prepare(&statement.text),
                    statement.span,
                )
            } else {
                statement
            }
        })
        .collect();
    Ok(statements)
}

/// Remove comments from SQL text according to the given settings.
pub fn strip_string(source: &str, settings: &Settings) -> Result<String, SqlsplitError> {
    let scanner = settings.scanner()?;
    check_terminated(source, settings)?;
    Ok(scanner.remove_comments(source))
}

/// Render statements as a script, one terminated statement per block.
pub fn render_statements(statements: &[Statement]) -> String {
    let mut result = String::new();
    for statement in statements {
        result.push_str(&statement.text);
        result.push_str(";\n");
    }
    result
}

/// Fail in strict mode, warn otherwise, when input ends inside a quote or
/// block comment.
fn check_terminated(source: &str, settings: &Settings) -> Result<(), SqlsplitError> {
    let scanner = settings.scanner()?;
    if settings.strict {
        return scanner.validate(source);
    }
    match scanner.final_mode(source) {
        LexMode::Normal | LexMode::LineComment => {}
        mode => warn!("input ends inside an unterminated {}", mode),
    }
    Ok(())
}

/// Run the splitter on a collection of files.
pub fn run(files: &[PathBuf], settings: &Settings) -> Report {
    let matching_paths = get_matching_paths(files, settings);
    let mut report = Report::new();
    debug!("processing {} file(s)", matching_paths.len());

    let progress = if settings.no_progressbar || settings.quiet || matching_paths.len() <= 1 {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(matching_paths.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} {wide_msg}") {
            bar.set_style(style);
        }
        bar
    };

    let process = |path: &PathBuf| {
        let result = process_file(path, settings);
        progress.inc(1);
        result
    };

    let results: Vec<FileResult> = if settings.single_process || matching_paths.len() <= 1 {
        matching_paths.iter().map(process).collect()
    } else {
        // Parallel processing with rayon
        use rayon::prelude::*;

        match rayon::ThreadPoolBuilder::new()
            .num_threads(settings.threads)
            .build()
        {
            Ok(pool) => {
                pool.install(|| matching_paths.par_iter().map(process).collect::<Vec<_>>())
            }
            Err(e) => {
                warn!("falling back to a single thread: {}", e);
                matching_paths.iter().map(process).collect()
            }
        }
    };
    progress.finish_and_clear();

    for result in results {
        report.add(result);
    }
    report
}

/// Split or strip a single file.
fn process_file(path: &Path, settings: &Settings) -> FileResult {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => return FileResult::error(path.to_path_buf(), format!("Read error: {}", e)),
    };

    let stripped = match strip_string(&source, settings) {
        Ok(s) => s,
        Err(e) => return FileResult::error(path.to_path_buf(), e.to_string()),
    };
    // Termination was already checked while stripping.
    let statements = match split_unchecked(&source, settings) {
        Ok(s) => s,
        Err(e) => return FileResult::error(path.to_path_buf(), e.to_string()),
    };
    debug!(
        "{}: {} statement(s), {} comment byte(s)",
        path.display(),
        statements.len(),
        source.len() - stripped.len()
    );

    let status = if stripped == source {
        FileStatus::Unchanged
    } else {
        FileStatus::Changed
    };

    if settings.diff && status == FileStatus::Changed {
        if let Err(e) = print_diff(path, &source, &stripped, settings.color()) {
            warn!("could not print diff for {}: {}", path.display(), e);
        }
    }

    let output = if !settings.prints_output() {
        None
    } else if settings.strip {
        Some(stripped)
    } else {
        Some(render_statements(&statements))
    };

    FileResult {
        path: path.to_path_buf(),
        status,
        statements: statements.len(),
        output,
        error: None,
    }
}

/// Get all SQL file paths that match the given inputs.
pub fn get_matching_paths(paths: &[PathBuf], settings: &Settings) -> Vec<PathBuf> {
    let extensions = settings.sql_extensions();
    let exclude = build_exclude_set(&settings.exclude);
    let mut result = HashSet::new();

    for path in expand_patterns(paths) {
        if path.is_file() {
            if !is_excluded(&path, &exclude) {
                result.insert(path);
            }
        } else if path.is_dir() {
            collect_sql_files(&path, extensions, &exclude, &mut result);
        }
    }

    let mut sorted: Vec<PathBuf> = result.into_iter().collect();
    sorted.sort();
    sorted
}

/// Expand arguments containing glob wildcards that do not name a real path.
fn expand_patterns(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut expanded = Vec::new();
    for path in paths {
        let text = path.to_string_lossy();
        let is_pattern = text.contains(['*', '?', '[']);
        if path.exists() || !is_pattern {
            expanded.push(path.clone());
            continue;
        }
        match glob::glob(&text) {
            Ok(entries) => expanded.extend(entries.flatten()),
            Err(e) => warn!("invalid pattern {}: {}", text, e),
        }
    }
    expanded
}

fn build_exclude_set(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => warn!("ignoring exclude pattern {}: {}", pattern, e),
        }
    }
    builder.build().unwrap_or_else(|e| {
        warn!("ignoring exclude patterns: {}", e);
        GlobSet::empty()
    })
}

fn is_excluded(path: &Path, exclude: &GlobSet) -> bool {
    exclude.is_match(path) || path.file_name().is_some_and(|name| exclude.is_match(name))
}

/// Check if a file has a SQL extension.
fn is_sql_file(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.contains(&ext.as_str()))
}

/// Recursively collect SQL files from a directory.
fn collect_sql_files(
    dir: &Path,
    extensions: &[&str],
    exclude: &GlobSet,
    result: &mut HashSet<PathBuf>,
) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            warn!("cannot read {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        // Skip hidden directories and excluded patterns
        if name.starts_with('.') || is_excluded(&path, exclude) {
            continue;
        }

        if path.is_dir() {
            collect_sql_files(&path, extensions, exclude, result);
        } else if is_sql_file(&path, extensions) {
            result.insert(path);
        }
    }
}

/// Print a diff between the original and comment-free content.
fn print_diff(path: &Path, original: &str, stripped: &str, color: bool) -> std::io::Result<()> {
    use similar::{ChangeTag, TextDiff};

    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let stream = StandardStream::stderr(choice);
    let mut out = stream.lock();

    writeln!(out, "--- {}", path.display())?;
    writeln!(out, "+++ {}", path.display())?;

    let diff = TextDiff::from_lines(original, stripped);
    for change in diff.iter_all_changes() {
        let (sign, fg) = match change.tag() {
            ChangeTag::Delete => ("-", Some(Color::Red)),
            ChangeTag::Insert => ("+", Some(Color::Green)),
            ChangeTag::Equal => (" ", None),
        };
        out.set_color(ColorSpec::new().set_fg(fg))?;
        write!(out, "{}{}", sign, change)?;
        if change.missing_newline() {
            writeln!(out)?;
        }
    }
    out.reset()
}

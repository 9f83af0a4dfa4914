use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use sqlsplit::report::{FileStatus, Report};
use sqlsplit::settings::Settings;

/// sqlsplit - Split SQL scripts into statements and strip comments.
#[derive(Parser, Debug)]
#[command(name = "sqlsplit", version, about)]
struct Cli {
    /// Files, directories or glob patterns. Use "-" to read from stdin.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// SQL dialect: generic, mysql, postgresql, oracle, db2, cache.
    #[arg(short = 'd', long)]
    dialect: Option<String>,

    /// Print the input with comments removed instead of statements.
    #[arg(long)]
    strip: bool,

    /// Exit with 1 if any file contains comments; print nothing.
    #[arg(long)]
    check: bool,

    /// Show what stripping comments would remove.
    #[arg(long)]
    diff: bool,

    /// Fail on input ending inside a quote or block comment.
    #[arg(long)]
    strict: bool,

    /// Keep the line break that ends a `--` comment.
    #[arg(long)]
    keep_newlines: bool,

    /// Glob patterns to exclude.
    #[arg(long)]
    exclude: Vec<String>,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only).
    #[arg(short, long)]
    quiet: bool,

    /// Disable progress bar.
    #[arg(long)]
    no_progressbar: bool,

    /// Force color output.
    #[arg(long)]
    force_color: bool,

    /// Disable color output.
    #[arg(long)]
    no_color: bool,

    /// Number of threads for parallel processing (0 = all cores).
    #[arg(short = 't', long, default_value_t = 0)]
    threads: usize,

    /// Disable multi-threaded processing.
    #[arg(long)]
    single_process: bool,

    /// Path to config file (sqlsplit.toml).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let is_stdin = cli.files.len() == 1 && cli.files[0].to_string_lossy() == "-";

    let base = match sqlsplit::load_config(&cli.files, cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    let settings = Settings {
        dialect_name: cli.dialect.unwrap_or(base.dialect_name),
        keep_newlines: cli.keep_newlines || base.keep_newlines,
        strict: cli.strict || base.strict,
        strip: cli.strip,
        check: cli.check,
        diff: cli.diff,
        exclude: if cli.exclude.is_empty() {
            base.exclude
        } else {
            cli.exclude
        },
        verbose: cli.verbose,
        quiet: cli.quiet,
        no_progressbar: cli.no_progressbar,
        no_color: cli.no_color,
        force_color: cli.force_color,
        threads: cli.threads,
        single_process: cli.single_process,
    };

    if is_stdin {
        if let Err(e) = run_stdin(&settings) {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    } else {
        let report = sqlsplit::run(&cli.files, &settings);

        print_outputs(&report);
        if !settings.quiet {
            print_verbose_results(&report, &settings);
            eprintln!("{}", report.summary());
        }

        report.print_errors();

        if report.has_errors() {
            std::process::exit(2);
        } else if settings.check && report.has_changes() {
            std::process::exit(1);
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_target(false)
        .init();
}

fn run_stdin(settings: &Settings) -> anyhow::Result<()> {
    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .context("reading stdin")?;

    if settings.check {
        let scanner = settings.scanner()?;
        if scanner.has_comments(&source) {
            std::process::exit(1);
        }
        return Ok(());
    }

    if settings.strip {
        print!("{}", sqlsplit::strip_string(&source, settings)?);
    } else {
        let statements = sqlsplit::split_string(&source, settings)?;
        print!("{}", sqlsplit::api::render_statements(&statements));
    }
    Ok(())
}

fn print_outputs(report: &Report) {
    let with_headers = report.total() > 1;
    for result in &report.results {
        if let Some(ref output) = result.output {
            if with_headers {
                println!("-- {}", result.path.display());
            }
            print!("{}", output);
        }
    }
}

fn print_verbose_results(report: &Report, settings: &Settings) {
    if !settings.verbose {
        return;
    }
    for result in &report.results {
        match result.status {
            FileStatus::Changed => {
                eprintln!(
                    "{}: {} statement(s), has comments",
                    result.path.display(),
                    result.statements
                );
            }
            FileStatus::Unchanged => {
                eprintln!(
                    "{}: {} statement(s)",
                    result.path.display(),
                    result.statements
                );
            }
            // Reported by print_errors
            FileStatus::Error => {}
        }
    }
}

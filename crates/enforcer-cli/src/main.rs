//! CLI entry point for enforcer.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, logging setup, and exit
//! codes. All business logic lives in the `enforcer-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use enforcer_app::{
    CheckInput, ExplainOutput, SchemaKind, parse_report_json, render_annotations, render_markdown,
    render_schema, run_check, run_explain, run_tree, runtime_error_report, serialize_report,
    to_renderable, verdict_exit_code,
};
use enforcer_settings::Overrides;
use enforcer_types::{EnforcerReport, Severity};
use std::collections::BTreeMap;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "enforcer.toml";

#[derive(Parser, Debug)]
#[command(
    name = "enforcer",
    version,
    about = "Build-time policy enforcement over a project's resolved dependency graph"
)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug). `ENFORCER_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve the dependency graph, run every configured rule, and write the report.
    Check {
        /// Project file, or a directory containing one.
        #[arg(long, default_value = ".")]
        project: Utf8PathBuf,

        /// Path to the enforcer config TOML (defaults to enforcer.toml next to the project).
        #[arg(long)]
        config: Option<Utf8PathBuf>,

        /// User property, highest precedence (repeatable).
        #[arg(short = 'D', value_name = "KEY=VALUE", value_parser = parse_property)]
        define: Vec<(String, String)>,

        /// Override profile (strict|warn).
        #[arg(long)]
        profile: Option<String>,

        /// Stop at the first failing rule; the rest are reported as skipped.
        #[arg(long)]
        fail_fast: bool,

        /// Run rules in parallel.
        #[arg(long)]
        parallel: bool,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/enforcer/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/enforcer/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Print the resolved dependency tree.
    Tree {
        /// Project file, or a directory containing one.
        #[arg(long, default_value = ".")]
        project: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/enforcer/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/enforcer/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Explain a rule id with remediation guidance.
    Explain {
        /// The rule id (e.g. "dependency_convergence").
        identifier: String,
    },

    /// Print the JSON Schema of the config file or the report.
    Schema {
        #[arg(value_enum)]
        kind: SchemaArg,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SchemaArg {
    Config,
    Report,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Commands::Check {
            project,
            config,
            define,
            profile,
            fail_fast,
            parallel,
            report_out,
            write_markdown,
            markdown_out,
        } => {
            let overrides = Overrides {
                profile,
                fail_fast: fail_fast.then_some(true),
                parallel: parallel.then_some(true),
                properties: define.into_iter().collect::<BTreeMap<_, _>>(),
            };
            cmd_check(
                &project,
                config.as_deref(),
                overrides,
                &report_out,
                write_markdown.then_some(markdown_out.as_path()),
            )
        }
        Commands::Tree { project } => cmd_tree(&project),
        Commands::Md { report, output } => cmd_md(report, output),
        Commands::Annotations { report, max } => cmd_annotations(report, max),
        Commands::Explain { identifier } => cmd_explain(&identifier),
        Commands::Schema { kind } => cmd_schema(kind),
    }
}

/// Logs go to stderr; stdout is reserved for command output.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("ENFORCER_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_property(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty property name in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn cmd_check(
    project: &Utf8Path,
    config: Option<&Utf8Path>,
    overrides: Overrides,
    report_out: &Utf8Path,
    markdown_out: Option<&Utf8Path>,
) -> anyhow::Result<()> {
    let started_at = OffsetDateTime::now_utc();

    let result = (|| -> anyhow::Result<i32> {
        let cfg_text = read_config(project, config)?;

        let output = run_check(CheckInput {
            project_path: project,
            config_text: &cfg_text,
            overrides,
        })?;

        write_report_file(report_out, &output.report).context("write report json")?;
        if let Some(markdown_out) = markdown_out {
            let renderable = to_renderable(&output.report, Some(output.project_file.as_str()));
            write_text_file(markdown_out, &render_markdown(&renderable))
                .context("write markdown")?;
        }

        print_summary(&output.report);
        Ok(verdict_exit_code(output.report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let report = runtime_error_report(&format!("{err:#}"), started_at);
            if let Err(write_err) = write_report_file(report_out, &report) {
                let chain = format!("{write_err:#}");
                tracing::error!(error = %chain, "could not write error report");
            }
            eprintln!("enforcer error: {err:#}");
            std::process::exit(1);
        }
    }
}

/// An explicit `--config` must exist; the implicit one next to the project is optional.
fn read_config(project: &Utf8Path, explicit: Option<&Utf8Path>) -> anyhow::Result<String> {
    if let Some(path) = explicit {
        return std::fs::read_to_string(path).with_context(|| format!("read config: {path}"));
    }
    let dir = if project.is_dir() {
        project
    } else {
        project.parent().unwrap_or_else(|| Utf8Path::new("."))
    };
    let implicit = dir.join(DEFAULT_CONFIG);
    if implicit.is_file() {
        tracing::debug!(path = %implicit, "using config");
        std::fs::read_to_string(&implicit).with_context(|| format!("read config: {implicit}"))
    } else {
        Ok(String::new())
    }
}

fn print_summary(report: &EnforcerReport) {
    let verdict = match report.verdict {
        enforcer_types::Verdict::Pass => "pass",
        enforcer_types::Verdict::Warn => "warn",
        enforcer_types::Verdict::Fail => "fail",
    };
    println!(
        "enforcer: {verdict} ({} rules, {} fail, {} warn)",
        report.rules.len(),
        report.counts.fail,
        report.counts.warn
    );
    for v in &report.violations {
        let label = match v.severity {
            Severity::Fail => "FAIL",
            Severity::Warn => "WARN",
        };
        let headline = v.message.lines().next().unwrap_or_default();
        println!("  [{label}] {}: {headline}", v.rule_id);
    }
}

fn write_report_file(path: &Utf8Path, report: &EnforcerReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    let data = serialize_report(report).context("serialize report")?;
    std::fs::write(path, data).with_context(|| format!("write report: {path}"))?;
    Ok(())
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, text).with_context(|| format!("write text: {path}"))?;
    Ok(())
}

fn cmd_tree(project: &Utf8Path) -> anyhow::Result<()> {
    print!("{}", run_tree(project)?);
    Ok(())
}

fn read_report(report_path: &Utf8Path) -> anyhow::Result<EnforcerReport> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {report_path}"))?;
    parse_report_json(&report_text)
}

fn cmd_md(report_path: Utf8PathBuf, output: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let report = read_report(&report_path)?;
    let md = render_markdown(&to_renderable(&report, None));

    if let Some(out_path) = output {
        write_text_file(&out_path, &md).context("write markdown output")?;
    } else {
        print!("{md}");
    }

    Ok(())
}

fn cmd_annotations(report_path: Utf8PathBuf, max: usize) -> anyhow::Result<()> {
    let report = read_report(&report_path)?;
    for annotation in render_annotations(&to_renderable(&report, None), max) {
        println!("{annotation}");
    }
    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", enforcer_app::format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_rule_ids,
        } => {
            eprint!(
                "{}",
                enforcer_app::format_not_found(&identifier, available_rule_ids)
            );
            std::process::exit(1);
        }
    }
}

fn cmd_schema(kind: SchemaArg) -> anyhow::Result<()> {
    let kind = match kind {
        SchemaArg::Config => SchemaKind::Config,
        SchemaArg::Report => SchemaKind::Report,
    };
    println!("{}", render_schema(kind)?);
    Ok(())
}

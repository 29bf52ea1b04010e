use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use walkdir::WalkDir;

use schemalint_core::{Config, EntityKind, ExportFormat, IndexType, Project, Severity, ValidationReport};
use schemalint_engine::{
    apply_fixes, generate_index_name, plan_fixes, suggest_name, validate_column_name, validate_index_name,
    validate_table_name, ProjectValidator,
};
use schemalint_export::{export_project, ExportOptions};

const DEFAULT_CONFIG: &str = "schemalint.toml";

/// schemalint - naming and consistency checks for MSSQL schema models
#[derive(Parser)]
#[command(name = "schemalint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: schemalint.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one project file, or every project file under a directory
    Check {
        /// Project JSON file or directory
        path: PathBuf,

        /// Output file for report.json
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Also output markdown report
        #[arg(short, long)]
        markdown: Option<PathBuf>,
    },

    /// Render a project as DDL or documentation
    Export {
        /// Project JSON file
        project: PathBuf,

        /// Output format (default: [export] format from the config)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Directory to write into
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Leave out descriptions
        #[arg(long)]
        no_comments: bool,

        /// Leave out indexes
        #[arg(long)]
        no_indexes: bool,

        /// Leave out foreign keys
        #[arg(long)]
        no_constraints: bool,

        /// Append the current local time to the filename
        #[arg(long)]
        timestamp: bool,
    },

    /// Suggest a conforming name
    Suggest {
        /// Name to check
        name: String,

        /// Entity kind
        #[arg(short, long, value_enum, default_value = "column")]
        kind: KindArg,

        /// Owning table (columns and indexes)
        #[arg(short, long)]
        table: Option<String>,

        /// Treat the column as a primary key
        #[arg(long)]
        primary_key: bool,

        /// Index key columns, comma separated
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Index is clustered
        #[arg(long)]
        clustered: bool,

        /// Index is unique
        #[arg(long)]
        unique: bool,
    },

    /// Propose renames for rejected names
    Fix {
        /// Project JSON file
        project: PathBuf,

        /// Write the renamed project back to the file
        #[arg(short, long)]
        write: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Sql,
    Json,
    Markdown,
    Html,
    Csv,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Sql => ExportFormat::Sql,
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Markdown => ExportFormat::Markdown,
            FormatArg::Html => ExportFormat::Html,
            FormatArg::Csv => ExportFormat::Csv,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Table,
    Column,
    Index,
}

impl From<KindArg> for EntityKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Table => EntityKind::Table,
            KindArg::Column => EntityKind::Column,
            KindArg::Index => EntityKind::Index,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = load_config(cli.config.as_deref(), cli.verbose)?;

    match cli.command {
        Commands::Check { path, output, markdown } => check_command(&config, &path, &output, markdown.as_deref(), cli.verbose),
        Commands::Export {
            project,
            format,
            out_dir,
            no_comments,
            no_indexes,
            no_constraints,
            timestamp,
        } => {
            let mut options = ExportOptions::from_defaults(&config.export);
            if let Some(format) = format {
                options.format = format.into();
            }
            options.include_comments &= !no_comments;
            options.include_indexes &= !no_indexes;
            options.include_constraints &= !no_constraints;
            if timestamp {
                options = options.with_timestamp(chrono::Local::now().format("%Y%m%d_%H%M%S").to_string());
            }
            export_command(&project, &options, &out_dir, cli.verbose)
        }
        Commands::Suggest {
            name,
            kind,
            table,
            primary_key,
            columns,
            clustered,
            unique,
        } => {
            let index_type = if clustered { IndexType::Clustered } else { IndexType::Nonclustered };
            suggest_command(&config, &name, kind.into(), table.as_deref(), primary_key, &columns, index_type, unique)
        }
        Commands::Fix { project, write } => fix_command(&config, &project, write, cli.verbose),
    }
}

/// Explicit path, else `schemalint.toml` in the working directory, else defaults
fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    let config = if let Some(path) = path {
        Config::from_file(path).with_context(|| format!("Failed to load config {}", path.display()))?
    } else if Path::new(DEFAULT_CONFIG).exists() {
        Config::from_file(Path::new(DEFAULT_CONFIG))?
    } else {
        if verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };
    Ok(config)
}

fn load_project(path: &Path) -> Result<Project> {
    Project::from_file(path).with_context(|| format!("Failed to load project {}", path.display()))
}

/// Project files to check: the file itself, or every `*.json` under a directory
fn project_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(anyhow::anyhow!("{} does not exist", path.display()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "json") {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Check command - validate projects and write the report
fn check_command(config: &Config, path: &Path, output: &Path, markdown: Option<&Path>, verbose: bool) -> Result<()> {
    let validator = ProjectValidator::from_config(config);
    let timestamp = chrono::Utc::now().to_rfc3339();
    let directory = path.is_dir();

    let mut reports = Vec::new();
    for file in project_files(path)? {
        // A directory may hold reports and other JSON next to the projects
        let project = match load_project(&file) {
            Ok(project) => project,
            Err(e) if directory => {
                tracing::warn!("Skipping {}: {:#}", file.display(), e);
                continue;
            }
            Err(e) => return Err(e),
        };

        if verbose {
            eprintln!("  {} {}...", "Checking".cyan(), file.display());
        }
        reports.push(validator.validate(&project).with_timestamp(timestamp.clone()));
    }

    if reports.is_empty() {
        return Err(anyhow::anyhow!("No project files found under {}", path.display()));
    }

    match reports.as_slice() {
        [report] => report.save_to_file(output)?,
        _ => std::fs::write(output, serde_json::to_string_pretty(&reports)?)?,
    }
    if verbose {
        eprintln!("{} {}", "Report saved to:".green(), output.display());
    }

    if let Some(md_path) = markdown {
        let content: Vec<String> = reports.iter().map(generate_markdown_report).collect();
        std::fs::write(md_path, content.join("\n---\n\n"))?;
        if verbose {
            eprintln!("{} {}", "Markdown report saved to:".green(), md_path.display());
        }
    }

    for report in &reports {
        print_report_summary(report);
    }

    if reports.iter().any(ValidationReport::has_errors) {
        std::process::exit(1);
    }

    Ok(())
}

/// Export command - render and write one document
fn export_command(project_path: &Path, options: &ExportOptions, out_dir: &Path, verbose: bool) -> Result<()> {
    let project = load_project(project_path)?;
    let output = export_project(&project, options)
        .with_context(|| format!("Failed to export {} as {}", project.name, options.format))?;

    std::fs::create_dir_all(out_dir)?;
    let target = out_dir.join(&output.filename);
    std::fs::write(&target, &output.content)?;

    if verbose {
        eprintln!("{} {} ({})", "Exported".cyan(), project.name, output.mime_type);
    }
    println!("{} {}", "✓ Written".green(), target.display());

    Ok(())
}

/// Suggest command - validate one name and print a conforming alternative
#[allow(clippy::too_many_arguments)]
fn suggest_command(
    config: &Config,
    name: &str,
    kind: EntityKind,
    table: Option<&str>,
    primary_key: bool,
    columns: &[String],
    index_type: IndexType,
    unique: bool,
) -> Result<()> {
    let rules = config.naming.as_ref();

    let result = match kind {
        EntityKind::Table => validate_table_name(name, rules)?,
        EntityKind::Column => {
            let table = table.ok_or_else(|| anyhow::anyhow!("--table is required for column names"))?;
            validate_column_name(name, table, primary_key, rules)?
        }
        _ => {
            let table = table.ok_or_else(|| anyhow::anyhow!("--table is required for index names"))?;
            validate_index_name(name, table, index_type, unique, columns, rules)?
        }
    };

    let suggestion = match (&result.suggestion, kind, table) {
        (Some(suggestion), _, _) => suggestion.clone(),
        (None, EntityKind::Index, Some(table)) if !columns.is_empty() => {
            generate_index_name(table, columns, index_type, unique)
        }
        _ => suggest_name(name, kind, rules, table),
    };

    if result.is_valid {
        println!("{} {}", "✓".green(), name.green());
    } else {
        println!("{} {}: {}", "✗".red(), name.red(), result.message);
    }
    if let Some(rule) = result.rule.filter(|_| result.is_valid) {
        println!("  {} {}: {}", "WARN".yellow().bold(), rule, result.message);
    }
    if suggestion != name {
        println!("  {} {}", "Suggestion:".bold(), suggestion.cyan());
    }

    Ok(())
}

/// Fix command - print the planned renames, optionally write them back
fn fix_command(config: &Config, project_path: &Path, write: bool, verbose: bool) -> Result<()> {
    let project = load_project(project_path)?;
    let rules = config.resolve_rules(project.naming_rules.as_ref());

    if verbose {
        eprintln!("{} {}", "Planning renames for".cyan(), project.name);
    }

    let renames = plan_fixes(&project, rules)?;
    if renames.is_empty() {
        println!("{}", "✓ Nothing to rename".green().bold());
        return Ok(());
    }

    println!("{}", format!("{} rename(s):", renames.len()).bold());
    for rename in &renames {
        println!("  {}", rename);
    }

    if write {
        let fixed = apply_fixes(&project, &renames);
        std::fs::write(project_path, fixed.to_json()?)?;
        println!("{} {}", "✓ Written".green(), project_path.display());
    } else {
        println!();
        println!("{}", "Run with --write to apply".yellow());
    }

    Ok(())
}

/// Print report summary to stdout
fn print_report_summary(report: &ValidationReport) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", format!("Validation Report: {}", report.project).bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    if let Some(timestamp) = &report.generated_at {
        println!("Timestamp: {}", timestamp);
    }
    println!();

    let summary = &report.summary;
    println!("{}", "Summary:".bold());
    println!(
        "  Checked:  {} table(s), {} column(s), {} index(es)",
        summary.tables_checked, summary.columns_checked, summary.indexes_checked
    );

    if summary.errors > 0 {
        println!("  Errors:   {}", summary.errors.to_string().red().bold());
    } else {
        println!("  Errors:   {}", summary.errors.to_string().green());
    }

    if summary.warnings > 0 {
        println!("  Warnings: {}", summary.warnings.to_string().yellow());
    } else {
        println!("  Warnings: {}", summary.warnings.to_string().green());
    }

    let score = summary.compliance_score.to_string();
    let score = match summary.compliance_score {
        90..=100 => score.green(),
        70..=89 => score.yellow(),
        _ => score.red(),
    };
    println!("  Score:    {}", score);
    println!();

    if report.errors.is_empty() && report.warnings.is_empty() {
        println!("{}", "✓ No issues found!".green().bold());
    } else {
        println!("{}", "Findings:".bold());
        for issue in report.issues() {
            let severity = match issue.severity {
                Severity::Error => "ERROR".red().bold(),
                Severity::Warn => "WARN".yellow().bold(),
            };

            println!("  [{}] {}", severity, issue.to_message());

            if let Some(suggestion) = &issue.suggestion {
                println!("    Suggestion: {}", suggestion);
            }
            if let Some(expected) = &issue.expected {
                println!("    Expected: {}", expected);
            }
            if let Some(actual) = &issue.actual {
                println!("    Actual:   {}", actual);
            }
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}

/// Generate markdown report
fn generate_markdown_report(report: &ValidationReport) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Validation Report: {}\n\n", report.project));
    md.push_str(&format!("**Version:** {}\n\n", report.version));
    if let Some(timestamp) = &report.generated_at {
        md.push_str(&format!("**Timestamp:** {}\n\n", timestamp));
    }

    let summary = &report.summary;
    md.push_str("## Summary\n\n");
    md.push_str(&format!("- Tables checked: {}\n", summary.tables_checked));
    md.push_str(&format!("- Columns checked: {}\n", summary.columns_checked));
    md.push_str(&format!("- Indexes checked: {}\n", summary.indexes_checked));
    md.push_str(&format!("- Errors: {}\n", summary.errors));
    md.push_str(&format!("- Warnings: {}\n", summary.warnings));
    md.push_str(&format!("- Compliance score: {}\n", summary.compliance_score));
    md.push('\n');

    if report.errors.is_empty() && report.warnings.is_empty() {
        md.push_str("✅ **No issues found!**\n");
        return md;
    }

    md.push_str("## Findings\n\n");
    for issue in report.issues() {
        let emoji = match issue.severity {
            Severity::Error => "❌",
            Severity::Warn => "⚠️",
        };

        md.push_str(&format!("### {} {} - {}\n\n", emoji, issue.severity, issue.rule));
        md.push_str(&format!("{}\n\n", issue.to_message()));

        if let Some(suggestion) = &issue.suggestion {
            md.push_str(&format!("**Suggestion:** `{}`\n\n", suggestion));
        }
        if let Some(expected) = &issue.expected {
            md.push_str(&format!("**Expected:** `{}`\n\n", expected));
        }
        if let Some(actual) = &issue.actual {
            md.push_str(&format!("**Actual:** `{}`\n\n", actual));
        }
    }

    md
}

//! `formbuilder` renders form spec documents as HTML and runs submit attempts
//! against them from the command line.
//!
//! ```text
//! formbuilder render --spec form.yaml
//! formbuilder submit --spec form.json --set name=Alice --set age=30
//! formbuilder schema
//! ```

use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use formbuilder::{
    DocumentFormat, FormBuilder, FormOptions, MountedForm, OutputDestination, OutputOptions, Page,
    SubmitOutcome, ValidatorRegistry, emit, form_spec_schema, parse_document_any,
    parse_form_spec,
};

const CONTAINER: &str = "#app";

#[derive(Debug, Parser)]
#[command(
    name = "formbuilder",
    version,
    about = "Render declarative form specs and run submit attempts"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the HTML of a freshly rendered form
    Render(RenderArgs),
    /// Fill fields, submit, and print the collected result
    Submit(SubmitArgs),
    /// Print the JSON Schema that spec documents are checked against
    Schema {
        /// Emit compact JSON rather than pretty formatting
        #[arg(long = "no-pretty")]
        no_pretty: bool,
    },
}

#[derive(Debug, Args)]
struct SpecArgs {
    /// Spec document: file path, inline payload, or "-" for stdin
    #[arg(short = 's', long = "spec", value_name = "SPEC")]
    spec: String,

    /// Render labels in Title Case
    #[arg(long = "title-case")]
    title_case: bool,

    /// Label of the submit button
    #[arg(long = "submit-label", value_name = "TEXT")]
    submit_label: Option<String>,
}

#[derive(Debug, Args)]
struct RenderArgs {
    #[command(flatten)]
    spec: SpecArgs,

    /// Write the markup to this file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Option<PathBuf>,

    /// Overwrite the output file if it already exists
    #[arg(short = 'f', long = "force")]
    force: bool,
}

#[derive(Debug, Args)]
struct SubmitArgs {
    #[command(flatten)]
    spec: SpecArgs,

    /// Field value as NAME=VALUE; checkboxes accept true/false
    #[arg(long = "set", value_name = "NAME=VALUE", action = ArgAction::Append)]
    values: Vec<String>,

    /// Print application/x-www-form-urlencoded instead of a document
    #[arg(long = "urlencoded", conflicts_with_all = ["outputs", "no_pretty"])]
    urlencoded: bool,

    /// Output destinations ("-" writes to stdout)
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
    outputs: Vec<String>,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Overwrite output files even if they already exist
    #[arg(short = 'f', long = "force")]
    force: bool,
}

#[derive(Debug)]
enum InputSource {
    File(PathBuf),
    Stdin,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match Cli::parse().command {
        Command::Render(args) => render(args),
        Command::Submit(args) => submit(args),
        Command::Schema { no_pretty } => {
            let options = OutputOptions::default().with_pretty(!no_pretty);
            emit(form_spec_schema(), &options).map_err(Report::msg)
        }
    }
}

fn render(args: RenderArgs) -> Result<()> {
    let builder = load_builder(&args.spec)?;
    let html = builder.to_html();
    match args.output {
        None => {
            println!("{html}");
            Ok(())
        }
        Some(path) => {
            let mut diagnostics = DiagnosticCollector::default();
            ensure_output_paths_available(
                std::slice::from_ref(&path),
                args.force,
                &mut diagnostics,
            );
            diagnostics.into_result()?;
            fs::write(&path, format!("{html}\n"))
                .wrap_err_with(|| format!("failed to write {}", path.display()))
        }
    }
}

fn submit(args: SubmitArgs) -> Result<()> {
    let mut diagnostics = DiagnosticCollector::default();
    let assignments = parse_assignments(&args.values, &mut diagnostics);
    let output = if args.urlencoded {
        None
    } else {
        build_output_options(&args, &mut diagnostics)
    };
    diagnostics.into_result()?;

    let builder = load_builder(&args.spec)?;
    let page = Page::with_containers(&[CONTAINER]);
    let form = builder.render(&page, CONTAINER)?;

    let mut diagnostics = DiagnosticCollector::default();
    for (name, value) in &assignments {
        if form.field(name).is_none() {
            diagnostics.push_input(name, "no such field in the form");
        } else if !form.fill(name, value) {
            diagnostics.push_input(name, format!("'{value}' is not accepted by this field"));
        }
    }
    diagnostics.into_result()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .wrap_err("failed to start the async runtime")?;
    match runtime.block_on(form.submit()) {
        SubmitOutcome::Completed(result) => {
            debug!(fields = result.len(), "submit completed");
            match output {
                None => {
                    println!("{}", result.to_urlencoded());
                    Ok(())
                }
                Some(options) => emit(&result, &options).map_err(Report::msg),
            }
        }
        SubmitOutcome::Invalid { fields } => Err(invalid_report(&form, &fields)),
        SubmitOutcome::Failed { error, .. } => Err(eyre!("submit failed: {error}")),
        SubmitOutcome::Ignored => Err(eyre!("submit was ignored")),
    }
}

fn load_builder(args: &SpecArgs) -> Result<FormBuilder> {
    let format = resolve_format_hint(&args.spec)?;
    let document = load_value(&args.spec, format)?;
    let spec = parse_form_spec(&document, &ValidatorRegistry::builtin())
        .wrap_err("spec document rejected")?;

    let mut options = FormOptions::default().with_title_case_labels(args.title_case);
    if let Some(label) = &args.submit_label {
        options = options.with_submit_label(label.clone());
    }
    Ok(FormBuilder::new(spec)?.with_options(options))
}

fn invalid_report(form: &MountedForm, fields: &[String]) -> Report {
    let mut body = String::from("form is invalid:\n");
    for name in fields {
        let message = form.error_text(name).unwrap_or_default();
        let _ = writeln!(body, "  {name}: {message}");
    }
    eyre!(body)
}

fn parse_assignments(
    raw: &[String],
    diagnostics: &mut DiagnosticCollector,
) -> Vec<(String, String)> {
    raw.iter()
        .filter_map(|entry| match entry.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                Some((name.trim().to_string(), value.to_string()))
            }
            _ => {
                diagnostics.push_input("set", format!("expected NAME=VALUE, got '{entry}'"));
                None
            }
        })
        .collect()
}

fn resolve_format_hint(spec: &str) -> Result<DocumentFormat> {
    if spec == "-" {
        return Ok(DocumentFormat::default());
    }
    match format_from_extension(Path::new(spec)) {
        ExtensionFormat::Known(format) => Ok(format),
        ExtensionFormat::UnsupportedFeature {
            format_name,
            feature_flag,
        } => Err(eyre!(
            "spec '{spec}' requires {format_name} support, but this build lacks the '{feature_flag}' feature"
        )),
        ExtensionFormat::Unknown => Ok(DocumentFormat::default()),
    }
}

fn load_value(spec: &str, format: DocumentFormat) -> Result<Value> {
    if spec == "-" {
        let contents = read_from_source(&InputSource::Stdin)?;
        return parse_contents(&contents, format, "spec");
    }

    let path = PathBuf::from(spec);
    match read_from_source(&InputSource::File(path.clone())) {
        Ok(contents) => parse_contents(&contents, format, "spec"),
        Err(err) => {
            if is_not_found(&err) {
                return parse_contents(spec, format, "inline spec");
            }
            Err(err.wrap_err(format!("failed to load spec from {}", path.display())))
        }
    }
}

fn read_from_source(source: &InputSource) -> Result<String> {
    match source {
        InputSource::Stdin => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .wrap_err("failed to read from stdin")?;
            Ok(buffer)
        }
        InputSource::File(path) => fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read file {}", path.display())),
    }
}

fn is_not_found(err: &Report) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound)
}

fn parse_contents(contents: &str, format: DocumentFormat, label: &str) -> Result<Value> {
    parse_document_any(contents, format)
        .map_err(Report::msg)
        .wrap_err_with(|| format!("failed to parse {label}: tried {}", format_list()))
}

fn format_list() -> String {
    let items: Vec<String> = DocumentFormat::available_formats()
        .into_iter()
        .map(|fmt| fmt.to_string())
        .collect();
    items.join(", ")
}

#[derive(Default)]
struct DiagnosticCollector {
    messages: Vec<String>,
}

impl DiagnosticCollector {
    fn push_input(&mut self, label: &str, message: impl Into<String>) {
        self.messages
            .push(format!("input ({label}): {}", message.into()));
    }

    fn push_output(&mut self, message: impl Into<String>) {
        self.messages.push(format!("output: {}", message.into()));
    }

    fn len(&self) -> usize {
        self.messages.len()
    }

    fn into_result(self) -> Result<()> {
        if self.messages.is_empty() {
            return Ok(());
        }
        let mut body = String::from("encountered input/output issues:\n");
        for (idx, msg) in self.messages.iter().enumerate() {
            let _ = writeln!(body, "  {}. {}", idx + 1, msg);
        }
        Err(eyre!(body))
    }
}

fn build_output_options(
    args: &SubmitArgs,
    diagnostics: &mut DiagnosticCollector,
) -> Option<OutputOptions> {
    let mut destinations = Vec::new();
    for raw in &args.outputs {
        if raw.trim().is_empty() {
            diagnostics.push_output("output destination cannot be empty");
        } else if raw == "-" {
            destinations.push(OutputDestination::Stdout);
        } else {
            destinations.push(OutputDestination::file(raw));
        }
    }
    if destinations.is_empty() {
        destinations.push(OutputDestination::Stdout);
    }

    let file_paths: Vec<PathBuf> = destinations
        .iter()
        .filter_map(|dest| match dest {
            OutputDestination::File(path) => Some(path.clone()),
            OutputDestination::Stdout => None,
        })
        .collect();
    ensure_output_paths_available(&file_paths, args.force, diagnostics);

    let start = diagnostics.len();
    let format = infer_format_from_files(&file_paths, diagnostics).unwrap_or_default();
    if diagnostics.len() > start {
        return None;
    }

    Some(
        OutputOptions::new(format)
            .with_pretty(!args.no_pretty)
            .with_destinations(destinations),
    )
}

fn infer_format_from_files(
    file_paths: &[PathBuf],
    diagnostics: &mut DiagnosticCollector,
) -> Option<DocumentFormat> {
    let mut detected: Option<DocumentFormat> = None;
    for path in file_paths {
        match format_from_extension(path) {
            ExtensionFormat::Known(format) => match detected {
                Some(existing) if existing != format => diagnostics.push_output(format!(
                    "output file {} uses {format} but other destinations use {existing}; align extensions",
                    path.display()
                )),
                Some(_) => {}
                None => detected = Some(format),
            },
            ExtensionFormat::UnsupportedFeature {
                format_name,
                feature_flag,
            } => diagnostics.push_output(format!(
                "output file {} requires {format_name} support, but this build was compiled without the '{feature_flag}' feature",
                path.display()
            )),
            ExtensionFormat::Unknown => diagnostics.push_output(format!(
                "cannot infer format from output file {}; use .json/.yaml/.toml",
                path.display()
            )),
        }
    }
    detected
}

fn format_from_extension(path: &Path) -> ExtensionFormat {
    if let Some(format) = DocumentFormat::from_path(path) {
        return ExtensionFormat::Known(format);
    }
    let Some(ext) = path.extension() else {
        return ExtensionFormat::Unknown;
    };
    match ext.to_string_lossy().to_ascii_lowercase().as_str() {
        "yaml" | "yml" => ExtensionFormat::UnsupportedFeature {
            format_name: "yaml",
            feature_flag: "yaml",
        },
        "toml" => ExtensionFormat::UnsupportedFeature {
            format_name: "toml",
            feature_flag: "toml",
        },
        _ => ExtensionFormat::Unknown,
    }
}

#[derive(Debug)]
enum ExtensionFormat {
    Known(DocumentFormat),
    UnsupportedFeature {
        format_name: &'static str,
        feature_flag: &'static str,
    },
    Unknown,
}

fn ensure_output_paths_available(
    paths: &[PathBuf],
    force: bool,
    diagnostics: &mut DiagnosticCollector,
) {
    if force {
        return;
    }
    for path in paths {
        if path.exists() {
            diagnostics.push_output(format!(
                "file {} already exists (pass --force to overwrite)",
                path.display()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_assignments_on_the_first_equals_sign() {
        let mut diagnostics = DiagnosticCollector::default();
        let parsed = parse_assignments(
            &["name=Alice".into(), "query=a=b".into(), "broken".into()],
            &mut diagnostics,
        );
        assert_eq!(
            parsed,
            vec![
                ("name".to_string(), "Alice".to_string()),
                ("query".to_string(), "a=b".to_string()),
            ]
        );
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn json_extension_is_recognised() {
        assert!(matches!(
            format_from_extension(Path::new("form.json")),
            ExtensionFormat::Known(DocumentFormat::Json)
        ));
        assert!(matches!(
            format_from_extension(Path::new("form.txt")),
            ExtensionFormat::Unknown
        ));
    }
}

use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, MietteHandlerOpts, NamedSource, Result};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;
use typeassist_parser::parse_program_with_source;
use typeassist_resolver::{
    offset_at, resolve_type_at, suggest_assignment, AssignmentError, AssistConfig, AssistError,
    DeclarationKeyword, TypeReport,
};

mod repl;
mod sexpr;

const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts"];

#[derive(Parser)]
#[command(
    name = "typeassist",
    version,
    about = "Type annotations for curried, generic function chains",
    long_about = "Resolves the type an expression would have after partial application of a curried, generic function, and rewrites the expression into a typed declaration."
)]
struct Cli {
    /// Log resolver decisions to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct Position {
    /// 1-based line of the cursor
    #[arg(long, requires = "column", conflicts_with = "offset")]
    line: Option<usize>,

    /// 1-based column of the cursor, in characters
    #[arg(long, requires = "line")]
    column: Option<usize>,

    /// Byte offset of the cursor
    #[arg(long)]
    offset: Option<usize>,
}

impl Position {
    fn offset_in(&self, source: &str) -> Result<usize> {
        match (self.offset, self.line, self.column) {
            (Some(offset), _, _) if offset <= source.len() => Ok(offset),
            (Some(offset), _, _) => Err(miette::miette!(
                "Offset {} is past the end of the source ({} bytes)",
                offset,
                source.len()
            )),
            (None, Some(line), Some(column)) => offset_at(source, line, column)
                .ok_or_else(|| AssignmentError::PositionOutOfRange { line, column }.into()),
            _ => Err(miette::miette!(
                "Give the cursor as --offset or as --line and --column"
            )),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the expression statement at the cursor with a typed declaration
    Assign {
        /// TypeScript source file (use '-' to read from stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        position: Position,

        /// Configuration file (defaults to typeassist.toml next to FILE)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Declaration keyword: const, let or var
        #[arg(long, value_name = "KW")]
        declaration: Option<DeclarationKeyword>,

        /// Do not end the declaration with a semicolon
        #[arg(long)]
        no_semicolon: bool,

        /// Rewrite FILE in place instead of printing the declaration
        #[arg(short, long)]
        write: bool,
    },

    /// Show how the expression at the cursor resolves
    Resolve {
        /// TypeScript source file (use '-' to read from stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        position: Position,

        /// Configuration file (defaults to typeassist.toml next to FILE)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Parse TypeScript source files and display their AST (debug only)
    Parse {
        /// Source files to parse (use '-' to read from stdin)
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Show detailed span information in output
        #[arg(short, long)]
        spans: bool,
    },

    /// Resolve expressions interactively against a file's declarations
    Repl {
        /// TypeScript source file providing the declarations
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Configuration file (defaults to typeassist.toml next to FILE)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);
    setup_miette_handler();

    let outcome = match cli.command {
        Some(Commands::Assign {
            file,
            position,
            config,
            declaration,
            no_semicolon,
            write,
        }) => handle_assign_command(
            &file,
            &position,
            config.as_deref(),
            declaration,
            no_semicolon,
            write,
        ),
        Some(Commands::Resolve {
            file,
            position,
            config,
        }) => handle_resolve_command(&file, &position, config.as_deref()),
        Some(Commands::Parse { files, spans }) => {
            handle_parse_command(files, spans);
            Ok(())
        }
        Some(Commands::Repl { file, config }) => handle_repl_command(file, config),
        None => {
            // No subcommand provided, show help
            Cli::parse_from(["typeassist", "--help"]);
            Ok(())
        }
    };

    if let Err(report) = outcome {
        eprintln!("{report:?}");
        process::exit(1);
    }
}

/// `RUST_LOG` wins unless -v was given
fn setup_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Configure miette for error reporting with syntax highlighting
fn setup_miette_handler() {
    use miette::highlighters::SyntectHighlighter;
    use syntect::highlighting::ThemeSet;
    use syntect::parsing::SyntaxSet;

    let theme_set = ThemeSet::load_defaults();
    let highlighter = theme_set.themes.get("base16-ocean.dark").map(|theme| {
        SyntectHighlighter::new(SyntaxSet::load_defaults_newlines(), theme.clone(), true)
    });

    miette::set_hook(Box::new(move |_| {
        let mut options = MietteHandlerOpts::new()
            .terminal_links(true)
            .unicode(true)
            .color(true)
            .tab_width(4)
            .with_cause_chain();
        if let Some(highlighter) = &highlighter {
            options = options.with_syntax_highlighting(highlighter.clone());
        }
        Box::new(options.build())
    }))
    .ok();
}

fn handle_assign_command(
    file: &Path,
    position: &Position,
    config_path: Option<&Path>,
    declaration: Option<DeclarationKeyword>,
    no_semicolon: bool,
    write: bool,
) -> Result<()> {
    let (source, source_name) = read_source(file)?;
    let mut config = load_config(config_path, file)?;
    if let Some(declaration) = declaration {
        config.format.declaration = declaration;
    }
    if no_semicolon {
        config.format.end_with_semicolon = false;
    }

    let offset = position.offset_in(&source)?;
    let edit = suggest_assignment(&source, offset, &config)
        .map_err(|error| with_source(error, &source_name, &source))?;

    if write {
        if is_stdin(file) {
            return Err(miette::miette!("--write needs a file, not stdin"));
        }
        fs::write(file, edit.apply(&source)).into_diagnostic()?;
        println!("✅ {}: {}", source_name, edit.replacement);
    } else {
        println!("{}", edit.replacement);
    }
    Ok(())
}

fn handle_resolve_command(file: &Path, position: &Position, config_path: Option<&Path>) -> Result<()> {
    let (source, source_name) = read_source(file)?;
    let config = load_config(config_path, file)?;
    let offset = position.offset_in(&source)?;

    let report = resolve_type_at(&source, offset, &config)
        .map_err(|error| with_source(error, &source_name, &source))?;
    println!("{}", format_type_report(&report));
    Ok(())
}

fn handle_repl_command(file: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_deref(), &file)?;
    let mut session = repl::ReplSession::with_config(file, config, repl::ReplConfig::default())?;
    session.run()?;
    Ok(())
}

fn handle_parse_command(files: Vec<PathBuf>, spans: bool) {
    let mut success = true;
    let multiple_files = files.len() > 1;

    for file_path in files {
        let display_name = if is_stdin(&file_path) {
            "<stdin>".to_string()
        } else {
            file_path.display().to_string()
        };

        match parse_single_file(&file_path, spans) {
            Ok(()) => {
                if multiple_files {
                    println!("✅ {}", display_name);
                }
            }
            Err(e) => {
                eprintln!("{:?}", e);
                success = false;
            }
        }
    }

    if !success {
        process::exit(1);
    }
}

fn parse_single_file(file_path: &Path, spans: bool) -> Result<()> {
    let (source, source_name) = read_source(file_path)?;
    let program = parse_program_with_source(&source, Some(source_name))?;

    if spans {
        // Show full AST with span information for debugging
        println!("{:#?}", program);
    } else {
        println!("{}", sexpr::format_program_as_sexpr(&program));
    }
    Ok(())
}

fn is_stdin(path: &Path) -> bool {
    path.to_str() == Some("-")
}

/// Source text and display name; `-` reads stdin
fn read_source(file_path: &Path) -> Result<(String, String)> {
    if is_stdin(file_path) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).into_diagnostic()?;
        return Ok((buffer, "<stdin>".to_string()));
    }

    if !file_path.exists() {
        return Err(miette::miette!("File not found: {}", file_path.display()));
    }

    let extension = file_path.extension().and_then(|s| s.to_str());
    if !extension.is_some_and(|extension| SOURCE_EXTENSIONS.contains(&extension)) {
        return Err(miette::miette!(
            "Expected a TypeScript file ({}), got: {}",
            SOURCE_EXTENSIONS.join(", "),
            file_path.display()
        ));
    }

    let source = fs::read_to_string(file_path).into_diagnostic()?;
    Ok((source, file_path.display().to_string()))
}

/// An explicit path, else `typeassist.toml` beside the source file, else defaults
fn load_config(explicit: Option<&Path>, file: &Path) -> Result<AssistConfig> {
    let config = match explicit {
        Some(path) => AssistConfig::load(path)?,
        None => {
            let dir = match file.parent() {
                Some(parent) if !is_stdin(file) && !parent.as_os_str().is_empty() => {
                    parent.to_path_buf()
                }
                _ => std::env::current_dir().into_diagnostic()?,
            };
            AssistConfig::discover(&dir)?
        }
    };
    tracing::debug!(?config, "configuration");
    Ok(config)
}

fn with_source(error: AssistError, name: &str, source: &str) -> miette::Report {
    miette::Report::new(error).with_source_code(NamedSource::new(name, source.to_string()))
}

pub(crate) fn format_type_report(report: &TypeReport) -> String {
    let mut lines = vec![format!("expression:   {}", report.expression)];

    match report.resolution.type_text() {
        Some(type_text) => lines.push(format!("type:         {type_text}")),
        None => lines.push("type:         <untyped>".to_string()),
    }
    if let Some(source) = report.resolution.source() {
        lines.push(format!("rule:         {source}"));
    }
    if let Some(evaluator) = report.evaluator {
        lines.push(format!("evaluator:    {evaluator}"));
    }
    if report.alias_path.len() > 1 {
        lines.push(format!("alias path:   {}", report.alias_path.join(" -> ")));
    }
    if !report.call_sites.is_empty() {
        lines.push(format!("call chain:   {}", report.call_sites.join(" ")));
    }
    if !report.declared_generic_names.is_empty() || !report.generic_arguments.is_empty() {
        lines.push(format!(
            "generics:     <{}> = <{}>",
            report.declared_generic_names.join(", "),
            report.generic_arguments.join(", ")
        ));
    }
    if !report.all_return_types.is_empty() {
        lines.push("return types:".to_string());
        for (calls, type_text) in report.all_return_types.iter().enumerate() {
            lines.push(format!("  {calls}: {type_text}"));
        }
    }

    lines.join("\n")
}

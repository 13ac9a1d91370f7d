//! REPL for resolving expressions against a TypeScript file
//!
//! The file's top-level declarations are parsed once and every entered
//! expression is resolved against them, so curried calls can be explored
//! one application at a time:
//! - Multi-line input while brackets are unbalanced
//! - `/reload` to pick up edits to the file and its `typeassist.toml`
//! - History support and line editing with rustyline

use miette::Diagnostic;
use rustyline::{DefaultEditor, error::ReadlineError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use typeassist_parser::{ParseError, Program, parse_program_with_source};
use typeassist_resolver::{AssistConfig, AssistError, ConfigError, SourceIndex, TypeReport, resolve_expression_in};

/// Errors that can occur in the REPL
#[derive(Debug, Error, Diagnostic)]
pub enum ReplError {
    #[error("Parse error: {source}")]
    Parse {
        #[from]
        source: ParseError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolve(#[from] AssistError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Readline error: {source}")]
    Readline {
        #[from]
        source: ReadlineError,
    },

    #[error("REPL command error: {message}")]
    Command { message: String },
}

/// REPL session holding the parsed declarations file
pub struct ReplSession {
    /// Interactive line editor with history
    editor: DefaultEditor,

    /// File the declarations come from
    file: PathBuf,

    /// Parsed declarations, replaced on `/reload`
    program: Program,

    /// Resolver and formatting settings
    assist_config: AssistConfig,

    /// REPL configuration
    config: ReplConfig,

    /// Session statistics
    stats: ReplStats,
}

/// REPL configuration options
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Show the alias path, call chain and return types with each type
    pub show_details: bool,

    /// Prompt string for input
    pub prompt: String,

    /// Enable history persistence
    pub persist_history: bool,

    /// History file path
    pub history_file: Option<String>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_details: true,
            prompt: "typeassist> ".to_string(),
            persist_history: true,
            history_file: Some(".typeassist_history".to_string()),
        }
    }
}

/// REPL session statistics
#[derive(Debug, Clone, Default)]
pub struct ReplStats {
    /// Number of expressions resolved
    pub expressions_resolved: usize,

    /// Number of errors encountered
    pub errors_encountered: usize,

    /// Total REPL commands executed
    pub commands_executed: usize,
}

/// Result of evaluating a line in the REPL
#[derive(Debug)]
pub enum ReplResult {
    /// Successfully resolved expression
    Type { report: TypeReport },

    /// Executed a REPL command
    Command { message: String },

    /// Empty line or comment
    Empty,

    /// Exit request
    Exit,
}

impl ReplSession {
    /// Create a session over `file` with custom configuration
    pub fn with_config(
        file: PathBuf,
        assist_config: AssistConfig,
        config: ReplConfig,
    ) -> Result<Self, ReplError> {
        let mut editor = DefaultEditor::new()?;

        // Load history if configured
        if config.persist_history {
            if let Some(ref history_file) = config.history_file {
                let _ = editor.load_history(history_file); // Ignore errors for new sessions
            }
        }

        let program = load_program(&file)?;

        Ok(Self {
            editor,
            file,
            program,
            assist_config,
            config,
            stats: ReplStats::default(),
        })
    }

    /// Start the REPL main loop
    pub fn run(&mut self) -> Result<(), ReplError> {
        self.print_welcome();

        while let Some(line) = self.read_line()? {
            match self.evaluate_line(&line) {
                Ok(ReplResult::Exit) => break,
                Ok(result) => self.display_result(result),
                Err(error) => {
                    self.stats.errors_encountered += 1;
                    self.display_error(error);
                }
            }
        }

        self.print_goodbye();
        self.save_history()?;
        Ok(())
    }

    /// Read a line from the user with prompt, supporting multi-line input
    fn read_line(&mut self) -> Result<Option<String>, ReplError> {
        let mut complete_input = String::new();
        let mut line_count = 0;

        loop {
            let prompt = if line_count == 0 {
                &self.config.prompt
            } else {
                "... "
            };

            match self.editor.readline(prompt) {
                Ok(line) => {
                    line_count += 1;

                    if line_count == 1 && line.trim().is_empty() {
                        return Ok(Some(String::new()));
                    }

                    if !complete_input.is_empty() {
                        complete_input.push('\n');
                    }
                    complete_input.push_str(&line);

                    if is_input_complete(&complete_input) {
                        // Add the complete multi-line input to history as a single entry
                        if !complete_input.trim().is_empty() {
                            self.editor.add_history_entry(complete_input.clone())?;
                        }
                        return Ok(Some(complete_input));
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Cancels any multi-line input and starts over
                    println!("^C");
                    return Ok(Some(String::new()));
                }
                Err(ReadlineError::Eof) => return Ok(None),
                Err(err) => return Err(ReplError::Readline { source: err }),
            }
        }
    }

    /// Evaluate a line of input
    pub fn evaluate_line(&mut self, line: &str) -> Result<ReplResult, ReplError> {
        let trimmed = line.trim();

        // Handle empty lines and comments
        if trimmed.is_empty() || trimmed.starts_with("//") {
            return Ok(ReplResult::Empty);
        }

        // Handle REPL commands
        if trimmed.starts_with('/') {
            return self.execute_command(trimmed);
        }

        let expression = trimmed.trim_end_matches(';');
        let report = resolve_expression_in(&self.program, expression, &self.assist_config)?;
        self.stats.expressions_resolved += 1;
        Ok(ReplResult::Type { report })
    }

    /// Execute a REPL command
    fn execute_command(&mut self, command: &str) -> Result<ReplResult, ReplError> {
        self.stats.commands_executed += 1;

        let parts: Vec<&str> = command.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(ReplResult::Empty);
        }

        match parts[0] {
            "/help" | "/h" => Ok(ReplResult::Command {
                message: self.help_message(),
            }),

            "/decls" | "/declarations" => Ok(ReplResult::Command {
                message: self.format_declarations(),
            }),

            "/reload" => {
                self.program = load_program(&self.file)?;
                if let Some(dir) = self.file.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                    self.assist_config = AssistConfig::discover(dir)?;
                }
                Ok(ReplResult::Command {
                    message: format!(
                        "Reloaded {} ({} top-level declarations)",
                        self.file.display(),
                        SourceIndex::new(&self.program).top_level_values().count()
                    ),
                })
            }

            "/stats" => Ok(ReplResult::Command {
                message: self.format_stats(),
            }),

            "/config" => Ok(ReplResult::Command {
                message: self.format_config(),
            }),

            "/details" => match parts.get(1) {
                Some(&"on") => {
                    self.config.show_details = true;
                    Ok(ReplResult::Command {
                        message: "Resolution details enabled".to_string(),
                    })
                }
                Some(&"off") => {
                    self.config.show_details = false;
                    Ok(ReplResult::Command {
                        message: "Resolution details disabled".to_string(),
                    })
                }
                _ => Ok(ReplResult::Command {
                    message: format!(
                        "Resolution details are {}",
                        if self.config.show_details { "on" } else { "off" }
                    ),
                }),
            },

            "/quit" | "/q" | "/exit" => Ok(ReplResult::Exit),

            unknown => Err(ReplError::Command {
                message: format!("Unknown command: {unknown}. Type /help for available commands."),
            }),
        }
    }

    /// Display the result of evaluation
    fn display_result(&self, result: ReplResult) {
        match result {
            ReplResult::Type { report } => {
                if self.config.show_details {
                    println!("{}", crate::format_type_report(&report));
                } else {
                    println!("{}", report.resolution.type_text().unwrap_or("<untyped>"));
                }
            }

            ReplResult::Command { message } => {
                println!("{message}");
            }

            ReplResult::Empty => {}

            ReplResult::Exit => {} // Handled by caller
        }
    }

    /// Display an error with appropriate formatting
    fn display_error(&self, error: ReplError) {
        match error {
            ReplError::Parse { source } => {
                // ParseError carries its own source code
                eprintln!("{:?}", miette::Report::new(source));
            }
            ReplError::Io { .. } | ReplError::Readline { .. } => {
                eprintln!("Error: {error}");
            }
            error => {
                eprintln!("{:?}", miette::Report::new(error));
            }
        }
    }

    fn print_welcome(&self) {
        println!("typeassist REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Resolving against {}", self.file.display());
        println!("Type /help for commands, /quit to exit");
        println!();
    }

    fn print_goodbye(&self) {
        println!("Goodbye!");
    }

    /// Save history to file
    fn save_history(&mut self) -> Result<(), ReplError> {
        if self.config.persist_history {
            if let Some(ref history_file) = self.config.history_file {
                self.editor.save_history(history_file)?;
            }
        }
        Ok(())
    }

    fn help_message(&self) -> String {
        r#"typeassist REPL Commands:
  /help, /h            Show this help message
  /decls               List the file's top-level declarations
  /reload              Re-read the file and its typeassist.toml
  /stats               Show session statistics
  /config              Show current configuration
  /details [on|off]    Toggle alias path and call chain display
  /quit, /q, /exit     Exit the REPL

Examples:
  add                  # The full signature of a function
  add(1)               # What is left after one application
  add<string>(1)(2)    # Explicit type arguments are bound

Multi-line input continues while brackets are unbalanced.
Use Ctrl+C to interrupt, Ctrl+D to exit."#
            .to_string()
    }

    fn format_declarations(&self) -> String {
        let index = SourceIndex::new(&self.program);
        let lines: Vec<String> = index
            .top_level_values()
            .map(|declaration| format!("  {} ({})", declaration.name(), declaration.kind_name()))
            .collect();

        if lines.is_empty() {
            "No declarations".to_string()
        } else {
            format!("Declarations:\n{}", lines.join("\n"))
        }
    }

    fn format_stats(&self) -> String {
        format!(
            r#"Session Statistics:
  Expressions resolved: {}
  Errors encountered: {}
  Commands executed: {}"#,
            self.stats.expressions_resolved,
            self.stats.errors_encountered,
            self.stats.commands_executed
        )
    }

    fn format_config(&self) -> String {
        let format = &self.assist_config.format;
        let resolver = &self.assist_config.resolver;
        format!(
            r#"REPL Configuration:
  File: {}
  Show details: {}
  Prompt: "{}"
  Persist history: {}
  History file: {}
Resolver:
  Placeholder type: {}
  Max alias depth: {}
  Generic arguments: {:?}
Format:
  Declaration: {}
  End with semicolon: {}
  Placeholder name: {}"#,
            self.file.display(),
            self.config.show_details,
            self.config.prompt,
            self.config.persist_history,
            self.config.history_file.as_deref().unwrap_or("<none>"),
            resolver.placeholder_type,
            resolver.max_alias_depth,
            resolver.generic_arguments,
            format.declaration,
            format.end_with_semicolon,
            format.placeholder_name
        )
    }
}

fn load_program(file: &Path) -> Result<Program, ReplError> {
    let source = std::fs::read_to_string(file)?;
    Ok(parse_program_with_source(
        &source,
        Some(file.display().to_string()),
    )?)
}

/// Balanced brackets outside string literals and `//` comments
fn is_input_complete(input: &str) -> bool {
    let mut depth: i32 = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];

        if escaped {
            escaped = false;
            i += 1;
            continue;
        }

        match (quote, ch) {
            (Some(_), '\\') => escaped = true,
            (Some(open), _) if ch == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'' | '`') => quote = Some(ch),
            (None, '{' | '[' | '(') => depth += 1,
            (None, '}' | ']' | ')') => depth -= 1,
            (None, '/') if chars.get(i + 1) == Some(&'/') => {
                // Skip rest of line (comment)
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
                continue;
            }
            _ => {}
        }

        i += 1;
    }

    depth <= 0 && quote.is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const DECLARATIONS: &str = r#"
declare function add(a: number): (b: number) => (c: number) => number;
declare function wrap<T>(value: T): (other: T) => T[];
const partial = add(1);
"#;

    fn create_test_repl(source: &str) -> (ReplSession, tempfile::NamedTempFile) {
        let mut file = tempfile::Builder::new().suffix(".ts").tempfile().unwrap();
        file.write_all(source.as_bytes()).unwrap();

        let config = ReplConfig {
            persist_history: false, // Don't save history in tests
            history_file: None,
            ..Default::default()
        };
        let session =
            ReplSession::with_config(file.path().to_path_buf(), AssistConfig::default(), config)
                .expect("Failed to create test REPL");
        (session, file)
    }

    fn resolved_type(result: ReplResult) -> Option<String> {
        match result {
            ReplResult::Type { report } => report.resolution.type_text().map(str::to_string),
            other => panic!("Expected a type, got {:?}", other),
        }
    }

    #[test]
    fn test_repl_creation() {
        let (repl, _file) = create_test_repl(DECLARATIONS);
        assert_eq!(repl.stats.expressions_resolved, 0);
        assert_eq!(repl.stats.errors_encountered, 0);
        assert_eq!(repl.program.statements.len(), 3);
    }

    #[test]
    fn test_partial_application() {
        let (mut repl, _file) = create_test_repl(DECLARATIONS);

        let result = repl.evaluate_line("add(1)").unwrap();
        assert_eq!(
            resolved_type(result),
            Some("(b: number) => (c: number) => number".to_string())
        );
        assert_eq!(repl.stats.expressions_resolved, 1);
    }

    #[test]
    fn test_alias_from_file_continues_chain() {
        let (mut repl, _file) = create_test_repl(DECLARATIONS);

        let result = repl.evaluate_line("partial(2);").unwrap();
        assert_eq!(
            resolved_type(result),
            Some("(c: number) => number".to_string())
        );
    }

    #[test]
    fn test_generic_arguments() {
        let (mut repl, _file) = create_test_repl(DECLARATIONS);

        let result = repl.evaluate_line("wrap<string>(\"a\")").unwrap();
        assert_eq!(
            resolved_type(result),
            Some("(other: string) => string[]".to_string())
        );
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let (mut repl, _file) = create_test_repl(DECLARATIONS);

        assert!(matches!(
            repl.evaluate_line("missing(1)"),
            Err(ReplError::Resolve(_))
        ));
    }

    #[test]
    fn test_empty_line_handling() {
        let (mut repl, _file) = create_test_repl(DECLARATIONS);

        assert!(matches!(repl.evaluate_line("").unwrap(), ReplResult::Empty));
        assert!(matches!(
            repl.evaluate_line("// a comment").unwrap(),
            ReplResult::Empty
        ));
    }

    #[test]
    fn test_help_command() {
        let (mut repl, _file) = create_test_repl(DECLARATIONS);

        match repl.evaluate_line("/help").unwrap() {
            ReplResult::Command { message } => {
                assert!(message.contains("/reload"));
                assert!(message.contains("/quit"));
            }
            other => panic!("Expected command result, got {:?}", other),
        }
        assert_eq!(repl.stats.commands_executed, 1);
    }

    #[test]
    fn test_declarations_command() {
        let (mut repl, _file) = create_test_repl(DECLARATIONS);

        match repl.evaluate_line("/decls").unwrap() {
            ReplResult::Command { message } => {
                assert!(message.contains("add (function)"));
                assert!(message.contains("partial (variable)"));
            }
            other => panic!("Expected command result, got {:?}", other),
        }
    }

    #[test]
    fn test_reload_picks_up_edits() {
        let (mut repl, file) = create_test_repl(DECLARATIONS);
        assert!(repl.evaluate_line("later").is_err());

        std::fs::write(
            file.path(),
            format!("{DECLARATIONS}declare function later(x: string): boolean;\n"),
        )
        .unwrap();

        match repl.evaluate_line("/reload").unwrap() {
            ReplResult::Command { message } => assert!(message.contains("4 top-level")),
            other => panic!("Expected command result, got {:?}", other),
        }
        assert_eq!(
            resolved_type(repl.evaluate_line("later(\"x\")").unwrap()),
            Some("boolean".to_string())
        );
    }

    #[test]
    fn test_quit_command() {
        let (mut repl, _file) = create_test_repl(DECLARATIONS);

        assert!(matches!(repl.evaluate_line("/quit").unwrap(), ReplResult::Exit));
        assert!(matches!(repl.evaluate_line("/q").unwrap(), ReplResult::Exit));
    }

    #[test]
    fn test_unknown_command() {
        let (mut repl, _file) = create_test_repl(DECLARATIONS);

        assert!(matches!(
            repl.evaluate_line("/frobnicate"),
            Err(ReplError::Command { .. })
        ));
    }

    #[test]
    fn test_multi_line_input_detection() {
        assert!(is_input_complete("add(1)"));
        assert!(!is_input_complete("add("));
        assert!(!is_input_complete("wrap<string>({"));
        assert!(is_input_complete("add(\")\")"));
        assert!(is_input_complete("add(1) // trailing ("));
        assert!(!is_input_complete("\"unterminated"));
    }

    #[test]
    fn test_repl_config_defaults() {
        let config = ReplConfig::default();
        assert!(config.show_details);
        assert!(config.persist_history);
        assert_eq!(config.prompt, "typeassist> ");
    }
}

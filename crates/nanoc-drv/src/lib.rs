//! The `nanoc` compiler driver: reads a single source file, runs it through
//! the requested pipeline stage, and reports the result.
//!
//! There is no multi-file build, no incremental cache, and no codegen
//! backend here — this front end only lexes, parses, and type-checks a
//! single translation unit, matching the three driver modes below.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use nanoc_lex::Lexer;

/// Which stage of the pipeline to run and report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Tokenize only, printing the resulting token list.
    Lex,
    /// Tokenize and parse, printing the pretty-printed parse tree.
    Parse,
    /// Tokenize, parse, and type-check, printing nothing on success.
    Compile,
}

/// The driver's configuration, populated by hand-rolled argument parsing in
/// `main` rather than a derive-based framework.
#[derive(Debug, Clone)]
pub struct Config {
    pub input_file: PathBuf,
    pub mode: Mode,
    pub verbose: bool,
    /// Batches errors instead of stopping at the first one. Only meaningful
    /// in `Mode::Compile`; `lex`/`parse` always run to completion on their
    /// own terms.
    pub recover: bool,
}

impl Config {
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut input_file = None;
        let mut mode = Mode::Compile;
        let mut verbose = false;
        let mut recover = false;

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--lex" => mode = Mode::Lex,
                "--parse" => mode = Mode::Parse,
                "--compile" => mode = Mode::Compile,
                "--verbose" | "-v" => verbose = true,
                "--recover" => recover = true,
                other if !other.starts_with('-') => {
                    if input_file.is_some() {
                        bail!("argumento inesperado: '{other}'");
                    }
                    input_file = Some(PathBuf::from(other));
                }
                other => bail!("opción desconocida: '{other}'"),
            }
        }

        Ok(Config {
            input_file: input_file.context("se esperaba la ruta de un archivo fuente")?,
            mode,
            verbose,
            recover,
        })
    }
}

/// The outcome of a full `Session::run`: either a rendered artifact for the
/// requested mode, or the diagnostics collected while trying to produce it.
pub enum Outcome {
    Lexed(String),
    Parsed(String),
    Compiled,
}

/// One invocation's worth of state: the config plus whatever the pipeline
/// stages produce along the way.
pub struct Session {
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Session { config }
    }

    /// Runs the configured mode end to end. Returns `Ok` with the rendered
    /// output on success; `Err` carries the first diagnostic (single-shot
    /// mode) or the first of several batched diagnostics (recovery mode),
    /// already formatted as the exact wire-format message.
    pub fn run(&self) -> Result<Outcome> {
        if self.config.verbose {
            eprintln!("Configuration: {:?}", self.config);
        }

        let source = std::fs::read_to_string(&self.config.input_file)
            .with_context(|| format!("no se pudo leer '{}'", self.config.input_file.display()))?;

        let (tokens, lex_errors) = Lexer::tokenize(&source);
        if self.config.verbose {
            eprintln!("lexed {} tokens", tokens.len());
        }
        if let Some(first) = lex_errors.first() {
            bail!("{first}");
        }

        if self.config.mode == Mode::Lex {
            return Ok(Outcome::Lexed(render_tokens(&tokens)));
        }

        let (tree, parse_errors) = nanoc_par::parse(tokens, self.config.recover);
        if self.config.verbose {
            if let Some(tree) = &tree {
                eprintln!("parsed a complete parse tree rooted at {:?}", tree.root());
            }
        }
        if let Some(first) = parse_errors.first() {
            bail!("{first}");
        }
        let tree = tree.expect("no parse errors implies a finished tree");

        match self.config.mode {
            Mode::Lex => unreachable!("handled above"),
            Mode::Parse => Ok(Outcome::Parsed(tree.pretty_print())),
            Mode::Compile => Ok(Outcome::Compiled),
        }
    }
}

fn render_tokens(tokens: &[nanoc_lex::Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        out.push_str(&format!(
            "{:?} '{}' ({}:{})\n",
            token.kind, token.lexeme, token.line, token.column
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_source(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn lex_mode_renders_every_token() {
        let file = write_source("void main() {}");
        let config = Config {
            input_file: file.path().to_path_buf(),
            mode: Mode::Lex,
            verbose: false,
            recover: false,
        };
        let outcome = Session::new(config).run().unwrap();
        match outcome {
            Outcome::Lexed(rendered) => {
                assert!(rendered.contains("Void"));
                assert!(rendered.contains("main"));
            }
            _ => panic!("expected Outcome::Lexed"),
        }
    }

    #[test]
    fn parse_mode_renders_a_tree() {
        let file = write_source("void main() { int x = 0; printInt(x); }");
        let config = Config {
            input_file: file.path().to_path_buf(),
            mode: Mode::Parse,
            verbose: false,
            recover: false,
        };
        let outcome = Session::new(config).run().unwrap();
        match outcome {
            Outcome::Parsed(rendered) => assert!(rendered.starts_with("Program\n")),
            _ => panic!("expected Outcome::Parsed"),
        }
    }

    #[test]
    fn compile_mode_surfaces_the_first_diagnostic() {
        let file = write_source("void main() { x = 10; }");
        let config = Config {
            input_file: file.path().to_path_buf(),
            mode: Mode::Compile,
            verbose: false,
            recover: false,
        };
        let err = Session::new(config).run().unwrap_err();
        assert!(err.to_string().contains("no declarada"));
    }

    #[test]
    fn missing_file_is_an_io_error_not_a_panic() {
        let config = Config {
            input_file: PathBuf::from("/nonexistent/path/to/nowhere.nc"),
            mode: Mode::Compile,
            verbose: false,
            recover: false,
        };
        assert!(Session::new(config).run().is_err());
    }
}

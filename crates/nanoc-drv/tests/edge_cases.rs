//! Edge-case tests for the driver: empty programs, comments, recovery mode,
//! and other corners the main scenario list doesn't exercise directly.

use nanoc_drv::{Config, Mode, Outcome, Session};
use std::io::Write;
use std::path::PathBuf;

fn source_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp source file");
    write!(file, "{contents}").expect("write temp source file");
    file
}

fn config(path: PathBuf, mode: Mode, recover: bool) -> Config {
    Config {
        input_file: path,
        mode,
        verbose: false,
        recover,
    }
}

#[test]
fn empty_program_is_a_syntactic_error() {
    let file = source_file("");
    let err = Session::new(config(file.path().to_path_buf(), Mode::Compile, false))
        .run()
        .unwrap_err();
    assert!(err.to_string().contains("vacío"));
}

#[test]
fn comments_and_whitespace_are_transparent_to_parsing() {
    let file = source_file(
        "// a leading comment\n/* a block comment */ void main() { int x = 0; /* inline */ printInt(x); }",
    );
    let outcome = Session::new(config(file.path().to_path_buf(), Mode::Compile, false)).run();
    assert!(matches!(outcome, Ok(Outcome::Compiled)));
}

#[test]
fn global_variables_are_visible_inside_every_function() {
    let file = source_file("int counter = 0; void main() { counter = counter + 1; printInt(counter); }");
    let outcome = Session::new(config(file.path().to_path_buf(), Mode::Compile, false)).run();
    assert!(matches!(outcome, Ok(Outcome::Compiled)));
}

#[test]
fn shadowing_a_parameter_in_a_nested_block_is_allowed() {
    let file = source_file(
        "void f(int x) { if (x > 0) { int x = 5; printInt(x); } } void main() { f(1); }",
    );
    let outcome = Session::new(config(file.path().to_path_buf(), Mode::Compile, false)).run();
    assert!(matches!(outcome, Ok(Outcome::Compiled)));
}

#[test]
fn duplicate_declaration_in_the_same_scope_is_an_error() {
    let file = source_file("void main() { int x = 0; int x = 1; }");
    let err = Session::new(config(file.path().to_path_buf(), Mode::Compile, false))
        .run()
        .unwrap_err();
    assert!(err.to_string().contains("ya declarada"));
}

#[test]
fn recovery_mode_reports_the_first_of_several_batched_errors() {
    let file = source_file("void main() { x = 1; y = 2; z = 3; }");
    let err = Session::new(config(file.path().to_path_buf(), Mode::Compile, true))
        .run()
        .unwrap_err();
    // `run` only ever surfaces the first diagnostic even in recovery mode —
    // the full batch is available from `nanoc_par::parse` directly.
    assert!(err.to_string().contains("no declarada"));
}

#[test]
fn wrong_argument_count_is_a_semantic_error() {
    let file = source_file("int add(int a, int b) { return a + b; } void main() { printInt(add(1)); }");
    let err = Session::new(config(file.path().to_path_buf(), Mode::Compile, false))
        .run()
        .unwrap_err();
    assert!(err.to_string().contains("Número incorrecto de argumentos"));
}

#[test]
fn do_while_loop_compiles() {
    let file = source_file("void main() { int i = 0; do { i = i + 1; } while (i < 3); printInt(i); }");
    let outcome = Session::new(config(file.path().to_path_buf(), Mode::Compile, false)).run();
    assert!(matches!(outcome, Ok(Outcome::Compiled)));
}

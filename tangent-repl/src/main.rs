//! Interactive front end: reads expressions, prints their simplified derivatives.
//!
//! With a file argument (or piped stdin), every line is processed in order. Without one, a
//! readline loop starts. Two commands exist besides bare expressions: `:tex <expr>` prints a
//! LaTeX document deriving the expression, and `:dot <expr>` prints the parsed tree as a
//! Graphviz graph.

mod error;

use error::Error;
use rustyline::{error::ReadlineError, DefaultEditor};
use std::fs::File;
use std::io::{self, BufReader, IsTerminal, Read};
use tangent_compute::symbolic::{derivative, optimize};
use tangent_parser::parser::Parser;
use tangent_parser::tree::verify::verify;
use tangent_parser::tree::ExprTree;
use tangent_render::{dot, latex::TexDocument, render_derivative_annotation, render_expression};

/// Parses one expression and builds its optimized derivative. Returns the source tree, the
/// variable differentiated against (the first one the expression mentions, `x` for constant
/// expressions), and the derivative tree.
fn differentiate_line(input: &str) -> Result<(ExprTree, String, ExprTree), Error> {
    let tree = Parser::new(input)?.parse()?;
    if let Err(err) = verify(&tree) {
        eprintln!("warning: {err}");
    }

    let var = tree.vars().names().next().unwrap_or("x").to_owned();
    let mut derived = derivative(&tree, &var)?;
    optimize(&mut derived)?;
    Ok((tree, var, derived))
}

fn run_derivative(input: &str) -> Result<(), Error> {
    let (tree, var, derived) = differentiate_line(input)?;
    let root = tree.root().expect("parsed trees have a root");
    let derived_root = derived.root().expect("derivative trees have a root");
    println!(
        "d/d{var}: {}{}",
        render_derivative_annotation(&tree, root),
        render_expression(&derived, derived_root),
    );
    Ok(())
}

fn run_tex(input: &str) -> Result<(), Error> {
    let (tree, _, derived) = differentiate_line(input)?;
    let mut doc = TexDocument::new(io::stdout().lock())?;
    doc.derivative(
        &tree,
        tree.root().expect("parsed trees have a root"),
        &derived,
        derived.root().expect("derivative trees have a root"),
    )?;
    doc.finish()?;
    Ok(())
}

fn run_dot(input: &str) -> Result<(), Error> {
    let tree = Parser::new(input)?.parse()?;
    let mut stdout = io::stdout().lock();
    dot::write_dot(&tree, tree.root().expect("parsed trees have a root"), &mut stdout)?;
    Ok(())
}

fn run_line(line: &str) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    let (source, result) = if let Some(expr) = line.strip_prefix(":tex ") {
        (expr, run_tex(expr))
    } else if let Some(expr) = line.strip_prefix(":dot ") {
        (expr, run_dot(expr))
    } else {
        (line, run_derivative(line))
    };

    if let Err(err) = result {
        err.report_to_stderr(source);
    }
}

fn main() {
    let mut args = std::env::args();
    args.next();

    if let Some(filename) = args.next() {
        // process a source file line by line
        let mut input = String::new();
        BufReader::new(File::open(filename).unwrap())
            .read_to_string(&mut input)
            .unwrap();
        input.lines().for_each(run_line);
    } else if !io::stdin().is_terminal() {
        // read expressions from piped stdin
        let mut input = String::new();
        io::stdin().read_to_string(&mut input).unwrap();
        input.lines().for_each(run_line);
    } else {
        // interactive mode
        let mut rl = DefaultEditor::new().unwrap();

        fn process_line(rl: &mut DefaultEditor) -> Result<(), ReadlineError> {
            let input = rl.readline("> ")?;
            if input.trim().is_empty() {
                return Ok(());
            }

            rl.add_history_entry(&input)?;
            run_line(&input);
            Ok(())
        }

        loop {
            if let Err(err) = process_line(&mut rl) {
                match err {
                    ReadlineError::Eof | ReadlineError::Interrupted => (),
                    _ => eprintln!("{}", err),
                }
                break;
            }
        }
    }
}

use ariadne::Source;
use std::io;
use tangent_compute::symbolic::{DerivativeError, OptimizeError};
use tangent_parser::parser::error::Error as ParseError;

/// Utility enum packaging the errors that can occur while processing one input line.
pub enum Error {
    /// A tokenization or parse error.
    Parse(ParseError),

    /// The derivative could not be built.
    Derivative(DerivativeError),

    /// Simplification failed (division by a literal zero).
    Optimize(OptimizeError),

    /// Writing the rendered output failed.
    Io(io::Error),
}

impl Error {
    /// Report the error to stderr. Parse errors carry source spans and render as full reports;
    /// the rest print as plain lines.
    ///
    /// The `ariadne` crate's report type has no `Display` implementation, so its `eprint` method
    /// is the only way to get it onto stderr.
    pub fn report_to_stderr(&self, input: &str) {
        match self {
            Self::Parse(err) => {
                let report = err.build_report("input");
                report.eprint(("input", Source::from(input))).unwrap();
            }
            Self::Derivative(err) => eprintln!("error: {err}"),
            Self::Optimize(err) => eprintln!("error: {err}"),
            Self::Io(err) => eprintln!("error: {err}"),
        }
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<DerivativeError> for Error {
    fn from(err: DerivativeError) -> Self {
        Self::Derivative(err)
    }
}

impl From<OptimizeError> for Error {
    fn from(err: OptimizeError) -> Self {
        Self::Optimize(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

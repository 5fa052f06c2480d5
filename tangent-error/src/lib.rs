//! Contains the common [`ErrorKind`] trait used by all errors that point at regions of the source
//! expression.

use ariadne::{Color, Report};
use std::{any::Any, fmt::Debug, ops::Range};

/// The color used to highlight expression fragments in reports.
pub const EXPR: Color = Color::RGB(121, 205, 255);

/// Represents any kind of error that can occur while processing an expression.
pub trait ErrorKind: Debug + Send {
    /// Returns this error kind as a [`dyn Any`](Any), allowing callers to downcast it to the
    /// concrete kind.
    fn as_any(&self) -> &dyn Any;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of the source expression that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source expression that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }
}

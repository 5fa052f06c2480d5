//! Assembling LaTeX documents out of rendered trees.

use std::io::{self, Write};
use tangent_parser::tree::{ExprTree, Latex, NodeId};

/// An incrementally written LaTeX document. Expressions and derivative annotations are appended
/// as display math; [`TexDocument::finish`] closes the document body.
pub struct TexDocument<W: Write> {
    out: W,
}

impl<W: Write> TexDocument<W> {
    /// Writes the document preamble and returns the writer.
    pub fn new(mut out: W) -> io::Result<Self> {
        writeln!(out, "\\documentclass{{article}}")?;
        writeln!(out, "\\title{{Symbolic differentiation report}}")?;
        writeln!(out, "\\begin{{document}}")?;
        writeln!(out, "\\maketitle")?;
        Ok(Self { out })
    }

    /// Appends a line of prose.
    pub fn text(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        writeln!(self.out)
    }

    /// Appends a rendered expression as display math.
    pub fn expression(&mut self, tree: &ExprTree, id: NodeId) -> io::Result<()> {
        writeln!(self.out, "$ {} $", tree.display(id).as_latex())?;
        writeln!(self.out)
    }

    /// Appends `(f)' = g` as display math, reading the two sides from their own trees.
    pub fn derivative(
        &mut self,
        source: &ExprTree,
        source_id: NodeId,
        derived: &ExprTree,
        derived_id: NodeId,
    ) -> io::Result<()> {
        writeln!(
            self.out,
            "$ ({})' = {} $",
            source.display(source_id).as_latex(),
            derived.display(derived_id).as_latex(),
        )?;
        writeln!(self.out)
    }

    /// Closes the document and hands the writer back.
    pub fn finish(mut self) -> io::Result<W> {
        writeln!(self.out, "\\end{{document}}")?;
        Ok(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tangent_parser::parser::Parser;

    #[test]
    fn document_structure() {
        let tree = Parser::new("1 / x").unwrap().parse().unwrap();
        let root = tree.root().unwrap();

        let mut doc = TexDocument::new(Vec::new()).unwrap();
        doc.text("The expression:").unwrap();
        doc.expression(&tree, root).unwrap();
        let out = doc.finish().unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "\\documentclass{article}\n\
             \\title{Symbolic differentiation report}\n\
             \\begin{document}\n\
             \\maketitle\n\
             The expression:\n\
             \n\
             $ \\frac{1}{x} $\n\
             \n\
             \\end{document}\n"
        );
    }

    #[test]
    fn derivative_annotation() {
        let source = Parser::new("x ^ 2").unwrap().parse().unwrap();
        let derived = Parser::new("2 * x").unwrap().parse().unwrap();

        let mut doc = TexDocument::new(Vec::new()).unwrap();
        doc.derivative(
            &source,
            source.root().unwrap(),
            &derived,
            derived.root().unwrap(),
        )
        .unwrap();
        let text = String::from_utf8(doc.finish().unwrap()).unwrap();

        assert!(text.contains("$ (x^{2})' = 2 \\cdot x $"));
    }
}

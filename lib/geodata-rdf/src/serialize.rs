use crate::Vocabulary;
use oxrdf::Triple;
use oxrdfio::{RdfFormat, RdfSerializer};
use std::io::{self, Write};

/// The layout of the written Turtle document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OutputStyle {
    /// One `<s> <p> o .` statement per line with full IRIs.
    ///
    /// This is the N-Triples subset of Turtle and can be processed line by line.
    #[default]
    Statements,
    /// Turtle with prefix declarations and grouped subjects.
    Pretty,
}

/// Writes `triples` as Turtle to `writer`.
///
/// Literals are escaped according to the Turtle grammar.
pub fn write_turtle<'a, W: Write>(
    writer: W,
    triples: impl IntoIterator<Item = &'a Triple>,
    style: OutputStyle,
    vocabulary: &Vocabulary,
) -> io::Result<W> {
    let mut serializer = turtle_serializer(style, vocabulary)?.for_writer(writer);
    for triple in triples {
        serializer.serialize_triple(triple)?;
    }
    serializer.finish()
}

fn turtle_serializer(style: OutputStyle, vocabulary: &Vocabulary) -> io::Result<RdfSerializer> {
    match style {
        OutputStyle::Statements => Ok(RdfSerializer::from_format(RdfFormat::NTriples)),
        OutputStyle::Pretty => {
            let mut serializer = RdfSerializer::from_format(RdfFormat::Turtle);
            for (name, iri) in vocabulary.prefixes() {
                serializer = serializer
                    .with_prefix(name, iri)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            }
            Ok(serializer)
        }
    }
}

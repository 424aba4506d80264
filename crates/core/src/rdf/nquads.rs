//! N-Quads codec.
//!
//! Line-based parser and canonical serializer for the
//! [N-Quads](https://www.w3.org/TR/n-quads/) syntax. The serializer
//! produces the canonical form required by URDNA2015: single space
//! separators, `\n` line terminator, literal escapes limited to
//! `\\`, `\"`, `\n`, `\r` and `\t`, lowercased language tags, and no
//! datatype IRI for `xsd:string` literals.

use super::{Dataset, Literal, Quad, ValidId, Value, RDF_LANGSTRING, XSD_STRING};
use crate::LenientLangTagBuf;
use iref::IriBuf;
use rdf_types::BlankIdBuf;
use std::fmt;

/// N-Quads parse error.
#[derive(Debug, thiserror::Error)]
#[error("invalid N-Quads at line {line}: {message}")]
pub struct ParseError {
	pub line: usize,
	pub message: String,
}

impl ParseError {
	fn new(line: usize, message: impl Into<String>) -> Self {
		Self {
			line,
			message: message.into(),
		}
	}
}

/// Parses an N-Quads document into a dataset.
///
/// Duplicate quads are dropped. Empty lines and `#` comment lines are
/// ignored.
pub fn parse_dataset(input: &str) -> Result<Dataset, ParseError> {
	let mut dataset = Dataset::new();

	for (i, line) in input.lines().enumerate() {
		let number = i + 1;
		let line = line.trim_matches([' ', '\t']);
		if line.is_empty() || line.starts_with('#') {
			continue;
		}

		dataset.insert(parse_quad(line, number)?);
	}

	Ok(dataset)
}

fn parse_quad(line: &str, number: usize) -> Result<Quad, ParseError> {
	let mut chars = Cursor::new(line, number);

	let subject = chars.parse_id()?;
	chars.skip_whitespace();
	let predicate = chars.parse_id()?;
	chars.skip_whitespace();
	let object = chars.parse_value()?;
	chars.skip_whitespace();

	let graph = if chars.peek() == Some('.') {
		None
	} else {
		let graph = chars.parse_id()?;
		chars.skip_whitespace();
		Some(graph)
	};

	if chars.next() != Some('.') {
		return Err(chars.error("expected `.`"));
	}

	chars.skip_whitespace();
	if chars.peek().is_some() {
		return Err(chars.error("trailing characters"));
	}

	Ok(rdf_types::Quad(subject, predicate, object, graph))
}

struct Cursor<'a> {
	chars: std::iter::Peekable<std::str::Chars<'a>>,
	line: usize,
}

impl<'a> Cursor<'a> {
	fn new(line: &'a str, number: usize) -> Self {
		Self {
			chars: line.chars().peekable(),
			line: number,
		}
	}

	fn error(&self, message: impl Into<String>) -> ParseError {
		ParseError::new(self.line, message)
	}

	fn peek(&mut self) -> Option<char> {
		self.chars.peek().copied()
	}

	fn next(&mut self) -> Option<char> {
		self.chars.next()
	}

	fn skip_whitespace(&mut self) {
		while matches!(self.peek(), Some(' ' | '\t')) {
			self.next();
		}
	}

	fn parse_iri(&mut self) -> Result<IriBuf, ParseError> {
		// opening `<` already consumed by the caller
		let mut iri = String::new();
		loop {
			match self.next() {
				Some('>') => break,
				Some(c) => iri.push(c),
				None => return Err(self.error("unterminated IRI")),
			}
		}

		IriBuf::new(iri).map_err(|e| self.error(format!("invalid IRI `{}`", e.0)))
	}

	fn parse_blank(&mut self) -> Result<BlankIdBuf, ParseError> {
		// leading `_` already consumed by the caller
		if self.next() != Some(':') {
			return Err(self.error("expected `:` after `_`"));
		}

		let mut label = String::from("_:");
		while let Some(c) = self.peek() {
			if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
				label.push(c);
				self.next();
			} else {
				break;
			}
		}

		BlankIdBuf::new(label).map_err(|e| self.error(format!("invalid blank node `{}`", e.0)))
	}

	fn parse_id(&mut self) -> Result<ValidId, ParseError> {
		match self.next() {
			Some('<') => Ok(ValidId::Iri(self.parse_iri()?)),
			Some('_') => Ok(ValidId::Blank(self.parse_blank()?)),
			_ => Err(self.error("expected IRI or blank node")),
		}
	}

	fn parse_value(&mut self) -> Result<Value, ParseError> {
		match self.next() {
			Some('<') => Ok(Value::Id(ValidId::Iri(self.parse_iri()?))),
			Some('_') => Ok(Value::Id(ValidId::Blank(self.parse_blank()?))),
			Some('"') => Ok(Value::Literal(self.parse_literal()?)),
			_ => Err(self.error("expected IRI, blank node or literal")),
		}
	}

	fn parse_literal(&mut self) -> Result<Literal, ParseError> {
		// opening `"` already consumed
		let mut value = String::new();
		loop {
			match self.next() {
				Some('"') => break,
				Some('\\') => match self.next() {
					Some('t') => value.push('\t'),
					Some('n') => value.push('\n'),
					Some('r') => value.push('\r'),
					Some('"') => value.push('"'),
					Some('\\') => value.push('\\'),
					_ => return Err(self.error("invalid escape sequence")),
				},
				Some(c) => value.push(c),
				None => return Err(self.error("unterminated literal")),
			}
		}

		match self.peek() {
			Some('^') => {
				self.next();
				if self.next() != Some('^') || self.next() != Some('<') {
					return Err(self.error("expected `^^<`"));
				}
				let datatype = self.parse_iri()?;
				if datatype.as_iri() == RDF_LANGSTRING {
					return Err(self.error("`rdf:langString` literal without language tag"));
				}
				Ok(Literal::typed(value, datatype))
			}
			Some('@') => {
				self.next();
				let mut tag = String::new();
				while let Some(c) = self.peek() {
					if c.is_ascii_alphanumeric() || c == '-' {
						tag.push(c);
						self.next();
					} else {
						break;
					}
				}

				if tag.is_empty() {
					return Err(self.error("empty language tag"));
				}

				Ok(Literal::lang_string(value, LenientLangTagBuf::new(tag)))
			}
			_ => Ok(Literal::string(value)),
		}
	}
}

pub(crate) fn fmt_id(id: &ValidId, f: &mut fmt::Formatter) -> fmt::Result {
	match id {
		ValidId::Iri(iri) => write!(f, "<{iri}>"),
		ValidId::Blank(b) => write!(f, "{b}"),
	}
}

pub(crate) fn fmt_literal(literal: &Literal, f: &mut fmt::Formatter) -> fmt::Result {
	write!(f, "\"")?;
	for c in literal.value.chars() {
		match c {
			'\\' => write!(f, "\\\\")?,
			'"' => write!(f, "\\\"")?,
			'\n' => write!(f, "\\n")?,
			'\r' => write!(f, "\\r")?,
			'\t' => write!(f, "\\t")?,
			c => write!(f, "{c}")?,
		}
	}
	write!(f, "\"")?;

	if literal.datatype.as_iri() == RDF_LANGSTRING {
		if let Some(language) = &literal.language {
			write!(f, "@{}", language.to_lowercase())?;
		}
	} else if literal.datatype.as_iri() != XSD_STRING {
		write!(f, "^^<{}>", literal.datatype)?;
	}

	Ok(())
}

struct DisplayQuad<'a>(&'a Quad);

impl<'a> fmt::Display for DisplayQuad<'a> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let rdf_types::Quad(subject, predicate, object, graph) = self.0;
		fmt_id(subject, f)?;
		write!(f, " ")?;
		fmt_id(predicate, f)?;
		write!(f, " ")?;
		object.fmt(f)?;
		if let Some(graph) = graph {
			write!(f, " ")?;
			fmt_id(graph, f)?;
		}
		writeln!(f, " .")
	}
}

/// Serializes a single quad as a canonical N-Quads line, including the
/// terminating newline.
pub fn quad_to_string(quad: &Quad) -> String {
	DisplayQuad(quad).to_string()
}

/// Serializes a dataset as canonical N-Quads, quads sorted by their
/// serialized form.
pub fn serialize_dataset(dataset: &Dataset) -> String {
	let mut lines: Vec<String> = dataset.iter().map(quad_to_string).collect();
	lines.sort();
	lines.concat()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_and_serialize() {
		let input = "_:b0 <http://example.org/p> \"a\\nb\" .\n\
			<http://example.org/s> <http://example.org/p> \"x\"@EN-us <http://example.org/g> .\n\
			<http://example.org/s> <http://example.org/p> \"1\"^^<http://www.w3.org/2001/XMLSchema#integer> _:g0 .\n";

		let dataset = parse_dataset(input).unwrap();
		assert_eq!(dataset.len(), 3);

		let output = serialize_dataset(&dataset);
		// language tag is lowercased on output
		assert!(output.contains("\"x\"@en-us"));
		assert!(output.contains("\"a\\nb\""));
		assert!(output.contains("_:g0 ."));
	}

	#[test]
	fn string_datatype_is_implicit() {
		let input = "<http://a/s> <http://a/p> \"v\"^^<http://www.w3.org/2001/XMLSchema#string> .\n";
		let dataset = parse_dataset(input).unwrap();
		let output = serialize_dataset(&dataset);
		assert_eq!(output, "<http://a/s> <http://a/p> \"v\" .\n");
	}

	#[test]
	fn duplicate_quads_are_dropped() {
		let input = "<http://a/s> <http://a/p> \"v\" .\n<http://a/s> <http://a/p> \"v\" .\n";
		assert_eq!(parse_dataset(input).unwrap().len(), 1);
	}

	#[test]
	fn rejects_garbage() {
		assert!(parse_dataset("not a quad .\n").is_err());
		assert!(parse_dataset("<http://a/s> <http://a/p> \"v\"\n").is_err());
	}
}

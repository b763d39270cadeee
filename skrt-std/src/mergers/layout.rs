use serde_json::ser::Formatter;
use std::io;

/// A `serde_json` formatter with configurable indentation and separators.
///
/// With `indent` set, every array element and object member starts on its
/// own line, indented by that many spaces per level. Without it the whole
/// document is written on one line. Empty containers are always `[]`/`{}`.
/// With `ensure_ascii` every non-ASCII character in a string is written as
/// `\uXXXX` escapes, using surrogate pairs outside the BMP.
#[derive(Debug, Clone)]
pub struct LayoutFormatter<'a> {
	indent: Option<Vec<u8>>,
	ensure_ascii: bool,
	item_separator: &'a [u8],
	key_separator: &'a [u8],
	current_indent: usize,
	has_value: bool,
}

impl<'a> LayoutFormatter<'a> {
	pub fn new(indent: Option<usize>, item_separator: &'a str, key_separator: &'a str) -> Self {
		Self {
			indent: indent.map(|width| vec![b' '; width]),
			ensure_ascii: false,
			item_separator: item_separator.as_bytes(),
			key_separator: key_separator.as_bytes(),
			current_indent: 0,
			has_value: false,
		}
	}

	pub fn ensure_ascii(mut self, ensure_ascii: bool) -> Self {
		self.ensure_ascii = ensure_ascii;
		self
	}

	fn newline<W: ?Sized + io::Write>(&self, writer: &mut W) -> io::Result<()> {
		if let Some(unit) = &self.indent {
			writer.write_all(b"\n")?;
			for _ in 0..self.current_indent {
				writer.write_all(unit)?;
			}
		}
		Ok(())
	}

	fn begin_container<W: ?Sized + io::Write>(&mut self, writer: &mut W, open: &[u8]) -> io::Result<()> {
		self.current_indent += 1;
		self.has_value = false;
		writer.write_all(open)
	}

	fn end_container<W: ?Sized + io::Write>(&mut self, writer: &mut W, close: &[u8]) -> io::Result<()> {
		self.current_indent -= 1;
		if self.has_value {
			self.newline(writer)?;
		}
		writer.write_all(close)
	}

	fn begin_member<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
		if !first {
			writer.write_all(self.item_separator)?;
		}
		self.newline(writer)
	}
}

impl Formatter for LayoutFormatter<'_> {
	fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
		self.begin_container(writer, b"[")
	}

	fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
		self.end_container(writer, b"]")
	}

	fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
		self.begin_member(writer, first)
	}

	fn end_array_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
		self.has_value = true;
		Ok(())
	}

	fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
		self.begin_container(writer, b"{")
	}

	fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
		self.end_container(writer, b"}")
	}

	fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
		self.begin_member(writer, first)
	}

	fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
		writer.write_all(self.key_separator)
	}

	fn end_object_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
		self.has_value = true;
		Ok(())
	}

	fn write_string_fragment<W: ?Sized + io::Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
		if !self.ensure_ascii || fragment.is_ascii() {
			return writer.write_all(fragment.as_bytes());
		}
		let mut units = [0u16; 2];
		for c in fragment.chars() {
			if c.is_ascii() {
				writer.write_all(&[c as u8])?;
			} else {
				for unit in c.encode_utf16(&mut units).iter() {
					write!(writer, "\\u{unit:04x}")?;
				}
			}
		}
		Ok(())
	}
}

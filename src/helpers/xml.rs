//! XML reading utilities shared by the xlsx and ods readers.
//! Wraps the quick-xml pull reader and adds helpers for attribute and text extraction.

use crate::error::SheetGridError;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::BytesRef;
use quick_xml::events::BytesStart;
use quick_xml::events::BytesText;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;
use std::io::BufRead;
use std::str::FromStr;
use thiserror::Error;

/// Errors specific to XML parsing operations
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("Parse entity '{0}' failed")]
    ParseEntityError(String),

    #[error("Parse attribute value '{0}' failed")]
    ParseAttributeValueError(String),
}

/// Pull reader over a spreadsheet part, configured for lenient parsing.
pub(crate) struct XmlReader<R: BufRead> {
    reader: Reader<R>,
    buffer: Vec<u8>,
}

impl<R: BufRead> XmlReader<R> {
    pub(crate) fn new(buf_reader: R) -> XmlReader<R> {
        let mut reader = Reader::from_reader(buf_reader);
        let config = reader.config_mut();
        config.check_comments = false;
        config.check_end_names = false;
        config.expand_empty_elements = true;
        config.trim_text(false);

        let buffer = Vec::with_capacity(1024);
        XmlReader { reader, buffer }
    }

    /// Reads the next XML event, `None` at end of document.
    pub(crate) fn next(&'_ mut self) -> Result<Option<Event<'_>>, SheetGridError> {
        self.buffer.clear();
        match self.reader.read_event_into(&mut self.buffer) {
            Ok(Event::Eof) => Ok(None),
            Ok(event) => Ok(Some(event)),
            Err(error) => Err(SheetGridError::XmlError(error)),
        }
    }
}

pub(crate) trait XmlAttributeHelper<'a> {
    fn get_value(&self) -> Result<Cow<'a, str>, SheetGridError>;

    fn parse_value<T: FromStr>(&self) -> Result<T, SheetGridError>;
}

impl<'a> XmlAttributeHelper<'a> for Attribute<'a> {
    fn get_value(&self) -> Result<Cow<'a, str>, SheetGridError> {
        Ok(self.unescape_value()?)
    }

    fn parse_value<T: FromStr>(&self) -> Result<T, SheetGridError> {
        self.get_value()?
            .parse()
            .map_err(|_| match std::str::from_utf8(&self.value) {
                Ok(value) => SheetGridError::XmlHelperError(XmlError::ParseAttributeValueError(value.to_string())),
                Err(error) => SheetGridError::StringEncodingError(error),
            })
    }
}

pub(crate) trait XmlNodeHelper<'a> {
    /// Gets an attribute value by its qualified name
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, SheetGridError>;

    /// Parses an attribute value to the specified type
    fn parse_attribute_value<T: FromStr>(&self, name: &str) -> Result<Option<T>, SheetGridError>;
}

impl<'a> XmlNodeHelper<'a> for BytesStart<'a> {
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, SheetGridError> {
        self.try_get_attribute(name)?
            .map(|attribute| attribute.get_value())
            .transpose()
    }

    fn parse_attribute_value<T: FromStr>(&self, name: &str) -> Result<Option<T>, SheetGridError> {
        self.try_get_attribute(name)?
            .map(|attribute| attribute.parse_value())
            .transpose()
    }
}

/// Accumulates cell text from text events and entity references.
pub(crate) trait XmlTextContextHelper {
    fn push_bytes_text(&mut self, text: &BytesText) -> Result<(), SheetGridError>;

    /// Resolves `&amp;`-style entities and `&#NN;` / `&#xNN;` character references
    fn push_bytes_ref(&mut self, bytes: &BytesRef) -> Result<(), SheetGridError>;
}

impl XmlTextContextHelper for String {
    fn push_bytes_text(&mut self, text: &BytesText) -> Result<(), SheetGridError> {
        self.push_str(&text.xml_content()?);
        Ok(())
    }

    fn push_bytes_ref(&mut self, bytes: &BytesRef) -> Result<(), SheetGridError> {
        let raw = bytes.xml_content()?;
        if let Some(number) = raw.strip_prefix('#') {
            let code = if let Some(hex) = number.strip_prefix('x') {
                u32::from_str_radix(hex, 16)?
            } else {
                number.parse::<u32>()?
            };
            if let Some(character) = std::char::from_u32(code) {
                self.push(character);
            }
        } else if let Some(entity) = resolve_xml_entity(&raw) {
            self.push_str(entity);
        } else {
            Err(XmlError::ParseEntityError(raw.to_string()))?;
        }

        Ok(())
    }
}

/// Drives an `XmlReader` to the end of the document, dispatching events to the given match arms.
#[macro_export]
macro_rules! match_xml_events {
    ($reader:expr => { $($arms:tt)* }) => {
        while let Some(result) = $reader.next()? {
            match result {
                Event::Eof => break,
                $($arms)*
                _ => (),
            }
        }
    };
}

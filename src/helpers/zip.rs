//! ZIP archive helpers for the Office Open XML (.xlsx) and OpenDocument (.ods) containers

use crate::error::SheetGridError;
use crate::helpers::xml::XmlReader;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use zip::read::ZipFile;
use zip::result::ZipError;
use zip::ZipArchive;

pub(crate) trait ZipHelper<RS: Read + Seek> {
    /// Gets a file from the ZIP archive by name (case-insensitive, path separator agnostic)
    fn file(&'_ mut self, name: &str) -> Result<Option<ZipFile<'_, RS>>, SheetGridError>;

    /// Creates an XML reader for a file within the ZIP archive
    fn xml_reader(
        &'_ mut self,
        name: &str,
    ) -> Result<Option<XmlReader<BufReader<ZipFile<'_, RS>>>>, SheetGridError>;
}

impl<RS: Read + Seek> ZipHelper<RS> for ZipArchive<RS> {
    fn file(&'_ mut self, name: &str) -> Result<Option<ZipFile<'_, RS>>, SheetGridError> {
        let pattern = name.replace('\\', "/");
        let path = self.file_names()
            .find(|file_name| pattern.eq_ignore_ascii_case(&file_name.replace('\\', "/")))
            .map(|file_name| file_name.to_owned());
        match path.map(|file_name| self.by_name(&file_name)).transpose() {
            Ok(Some(file)) => Ok(Some(file)),
            Ok(None) | Err(ZipError::FileNotFound) => Ok(None),
            Err(error) => Err(error)?,
        }
    }

    fn xml_reader(
        &'_ mut self,
        name: &str,
    ) -> Result<Option<XmlReader<BufReader<ZipFile<'_, RS>>>>, SheetGridError> {
        let reader = self
            .file(name)?
            .map(|file| XmlReader::new(BufReader::new(file)));
        Ok(reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn archive() -> ZipArchive<Cursor<Vec<u8>>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file("xl/Workbook.xml", SimpleFileOptions::default()).unwrap();
        writer.write_all(b"<workbook/>").unwrap();
        let cursor = writer.finish().unwrap();
        ZipArchive::new(cursor).unwrap()
    }

    #[test]
    fn file_lookup_ignores_case_and_separators() {
        let mut zip = archive();
        assert!(zip.file("xl/workbook.xml").unwrap().is_some());
        assert!(zip.file("XL\\WORKBOOK.XML").unwrap().is_some());
        assert!(zip.file("xl/styles.xml").unwrap().is_none());
    }

    #[test]
    fn xml_reader_for_missing_part_is_none() {
        let mut zip = archive();
        assert!(zip.xml_reader("content.xml").unwrap().is_none());
        assert!(zip.xml_reader("xl/workbook.xml").unwrap().is_some());
    }
}

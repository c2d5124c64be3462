use crate::error::{FixtureError, Result};
use crate::pdf::objects::{Dictionary, Object, ObjectId};
use crate::pdf::{PdfDocument, PdfPage};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::io::{BufWriter, Write};
use std::path::Path;

const PRODUCER: &str = concat!("scanfix ", env!("CARGO_PKG_VERSION"));

pub struct PdfWriter<W: Write> {
    writer: W,
    xref_positions: HashMap<ObjectId, u64>,
    current_position: u64,
}

impl PdfWriter<BufWriter<std::fs::File>> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new_with_writer(BufWriter::new(file)))
    }
}

impl<W: Write> PdfWriter<W> {
    pub fn new_with_writer(writer: W) -> Self {
        Self {
            writer,
            xref_positions: HashMap::new(),
            current_position: 0,
        }
    }

    pub fn write_document(&mut self, document: &PdfDocument) -> Result<()> {
        if document.pages().is_empty() {
            return Err(FixtureError::EmptyPdf);
        }

        self.write_header()?;

        let catalog_id = self.write_catalog()?;
        self.write_pages(document)?;
        let info_id = self.write_info(document)?;

        let xref_position = self.current_position;
        self.write_xref()?;
        self.write_trailer(catalog_id, info_id, xref_position)?;

        self.writer.flush()?;
        Ok(())
    }

    fn write_header(&mut self) -> Result<()> {
        self.write_bytes(b"%PDF-1.7\n")?;
        // Binary comment so the file is treated as binary
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])?;
        Ok(())
    }

    fn write_catalog(&mut self) -> Result<ObjectId> {
        let catalog_id = ObjectId::new(1, 0);
        let pages_id = ObjectId::new(2, 0);

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name("Catalog".to_string()));
        catalog.set("Pages", Object::Reference(pages_id));

        self.write_object(catalog_id, Object::Dictionary(catalog))?;
        Ok(catalog_id)
    }

    // Each page consumes three object numbers: the page, its content
    // stream, and its image XObject.
    fn page_object_id(index: usize) -> ObjectId {
        ObjectId::new(3 + index as u32 * 3, 0)
    }

    fn write_pages(&mut self, document: &PdfDocument) -> Result<ObjectId> {
        let pages_id = ObjectId::new(2, 0);

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::Name("Pages".to_string()));
        pages_dict.set("Count", Object::Integer(document.pages().len() as i64));

        let kids = (0..document.pages().len())
            .map(|i| Object::Reference(Self::page_object_id(i)))
            .collect();
        pages_dict.set("Kids", Object::Array(kids));

        self.write_object(pages_id, Object::Dictionary(pages_dict))?;

        for (i, page) in document.pages().iter().enumerate() {
            let page_id = Self::page_object_id(i);
            let content_id = ObjectId::new(page_id.number() + 1, 0);
            let image_id = ObjectId::new(page_id.number() + 2, 0);

            self.write_page(page_id, pages_id, content_id, image_id, page)?;
            self.write_page_content(content_id, page)?;
            self.write_object(image_id, page.image_object())?;
        }

        Ok(pages_id)
    }

    fn write_page(
        &mut self,
        page_id: ObjectId,
        parent_id: ObjectId,
        content_id: ObjectId,
        image_id: ObjectId,
        page: &PdfPage,
    ) -> Result<()> {
        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name("Page".to_string()));
        page_dict.set("Parent", Object::Reference(parent_id));
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(page.width_pt()),
                Object::Real(page.height_pt()),
            ]),
        );
        page_dict.set("Contents", Object::Reference(content_id));

        let mut xobject_dict = Dictionary::new();
        xobject_dict.set("Im0", Object::Reference(image_id));

        let mut resources = Dictionary::new();
        resources.set("XObject", Object::Dictionary(xobject_dict));
        page_dict.set("Resources", Object::Dictionary(resources));

        self.write_object(page_id, Object::Dictionary(page_dict))?;
        Ok(())
    }

    fn write_page_content(&mut self, content_id: ObjectId, page: &PdfPage) -> Result<()> {
        // Draw the page image scaled over the full MediaBox
        let content = format!(
            "q\n{:.2} 0 0 {:.2} 0 0 cm\n/Im0 Do\nQ\n",
            page.width_pt(),
            page.height_pt()
        )
        .into_bytes();

        let mut stream_dict = Dictionary::new();
        stream_dict.set("Length", Object::Integer(content.len() as i64));

        self.write_object(content_id, Object::Stream(stream_dict, content))?;
        Ok(())
    }

    fn write_info(&mut self, document: &PdfDocument) -> Result<ObjectId> {
        let info_id = ObjectId::new(3 + document.pages().len() as u32 * 3, 0);

        let mut info_dict = Dictionary::new();
        info_dict.set("Producer", Object::String(PRODUCER.to_string()));
        info_dict.set(
            "CreationDate",
            Object::String(format_pdf_date(document.creation_date())),
        );

        self.write_object(info_id, Object::Dictionary(info_dict))?;
        Ok(info_id)
    }

    fn write_object(&mut self, id: ObjectId, object: Object) -> Result<()> {
        self.xref_positions.insert(id, self.current_position);

        let header = format!("{} {} obj\n", id.number(), id.generation());
        self.write_bytes(header.as_bytes())?;
        self.write_object_value(&object)?;
        self.write_bytes(b"\nendobj\n")?;
        Ok(())
    }

    fn write_object_value(&mut self, object: &Object) -> Result<()> {
        match object {
            Object::Integer(i) => self.write_bytes(i.to_string().as_bytes())?,
            Object::Real(f) => self.write_bytes(
                format!("{f:.6}")
                    .trim_end_matches('0')
                    .trim_end_matches('.')
                    .as_bytes(),
            )?,
            Object::String(s) => {
                self.write_bytes(b"(")?;
                self.write_bytes(s.as_bytes())?;
                self.write_bytes(b")")?;
            }
            Object::Name(n) => {
                self.write_bytes(b"/")?;
                self.write_bytes(n.as_bytes())?;
            }
            Object::Array(arr) => {
                self.write_bytes(b"[")?;
                for (i, obj) in arr.iter().enumerate() {
                    if i > 0 {
                        self.write_bytes(b" ")?;
                    }
                    self.write_object_value(obj)?;
                }
                self.write_bytes(b"]")?;
            }
            Object::Dictionary(dict) => {
                self.write_bytes(b"<<")?;
                for (key, value) in dict.entries() {
                    self.write_bytes(b"\n/")?;
                    self.write_bytes(key.as_bytes())?;
                    self.write_bytes(b" ")?;
                    self.write_object_value(value)?;
                }
                self.write_bytes(b"\n>>")?;
            }
            Object::Stream(dict, data) => {
                self.write_object_value(&Object::Dictionary(dict.clone()))?;
                self.write_bytes(b"\nstream\n")?;
                self.write_bytes(data)?;
                self.write_bytes(b"\nendstream")?;
            }
            Object::Reference(id) => {
                let ref_str = format!("{} {} R", id.number(), id.generation());
                self.write_bytes(ref_str.as_bytes())?;
            }
        }
        Ok(())
    }

    fn write_xref(&mut self) -> Result<()> {
        self.write_bytes(b"xref\n")?;

        let mut entries: Vec<_> = self
            .xref_positions
            .iter()
            .map(|(id, pos)| (*id, *pos))
            .collect();
        entries.sort_by_key(|(id, _)| id.number());

        let max_obj_num = entries.iter().map(|(id, _)| id.number()).max().unwrap_or(0);

        self.write_bytes(b"0 ")?;
        self.write_bytes((max_obj_num + 1).to_string().as_bytes())?;
        self.write_bytes(b"\n")?;

        // Free object entry
        self.write_bytes(b"0000000000 65535 f \n")?;

        for obj_num in 1..=max_obj_num {
            if let Some((_, position)) = entries.iter().find(|(id, _)| id.number() == obj_num) {
                let entry = format!("{:010} {:05} n \n", position, 0);
                self.write_bytes(entry.as_bytes())?;
            } else {
                self.write_bytes(b"0000000000 00000 f \n")?;
            }
        }

        Ok(())
    }

    fn write_trailer(
        &mut self,
        catalog_id: ObjectId,
        info_id: ObjectId,
        xref_position: u64,
    ) -> Result<()> {
        let max_obj_num = self
            .xref_positions
            .keys()
            .map(|id| id.number())
            .max()
            .unwrap_or(0);

        let mut trailer = Dictionary::new();
        trailer.set("Size", Object::Integer((max_obj_num + 1) as i64));
        trailer.set("Root", Object::Reference(catalog_id));
        trailer.set("Info", Object::Reference(info_id));

        self.write_bytes(b"trailer\n")?;
        self.write_object_value(&Object::Dictionary(trailer))?;
        self.write_bytes(b"\nstartxref\n")?;
        self.write_bytes(xref_position.to_string().as_bytes())?;
        self.write_bytes(b"\n%%EOF\n")?;

        Ok(())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.current_position += data.len() as u64;
        Ok(())
    }
}

/// Format a DateTime as a PDF date string (D:YYYYMMDDHHmmSS+00'00)
fn format_pdf_date(date: DateTime<Utc>) -> String {
    format!("{}+00'00", date.format("D:%Y%m%d%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use chrono::TimeZone;

    fn one_page_document() -> PdfDocument {
        let mut doc = PdfDocument::new();
        doc.push_page(&Canvas::compose("Writer Test", 400, 300))
            .unwrap();
        doc
    }

    #[test]
    fn test_writer_starts_at_zero() {
        let writer = PdfWriter::new_with_writer(Vec::new());
        assert_eq!(writer.current_position, 0);
        assert!(writer.xref_positions.is_empty());
    }

    #[test]
    fn test_empty_document_rejected() {
        let doc = PdfDocument::new();
        let mut writer = PdfWriter::new_with_writer(Vec::new());
        assert!(matches!(
            writer.write_document(&doc),
            Err(FixtureError::EmptyPdf)
        ));
    }

    #[test]
    fn test_written_document_structure() {
        let doc = one_page_document();
        let mut buffer = Vec::new();
        {
            let mut writer = PdfWriter::new_with_writer(&mut buffer);
            writer.write_document(&doc).unwrap();
        }

        assert!(buffer.starts_with(b"%PDF-1.7\n"));
        assert!(buffer.windows(5).any(|w| w == b"%%EOF"));

        let text = String::from_utf8_lossy(&buffer);
        assert!(text.contains("/Type /Catalog"));
        assert!(text.contains("/Count 1"));
        assert!(text.contains("/Filter /DCTDecode"));
        assert!(text.contains("startxref"));
    }

    #[test]
    fn test_multi_page_count() {
        let mut doc = PdfDocument::new();
        for i in 0..3 {
            doc.push_page(&Canvas::compose(&format!("Page {}", i + 1), 400, 300))
                .unwrap();
        }

        let mut buffer = Vec::new();
        {
            let mut writer = PdfWriter::new_with_writer(&mut buffer);
            writer.write_document(&doc).unwrap();
        }

        let text = String::from_utf8_lossy(&buffer);
        assert!(text.contains("/Count 3"));
    }

    #[test]
    fn test_format_pdf_date() {
        let date = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(format_pdf_date(date), "D:20250314092653+00'00");
    }

    #[test]
    fn test_pinned_creation_date_in_info() {
        let mut doc = one_page_document();
        doc.set_creation_date(Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap());

        let mut buffer = Vec::new();
        {
            let mut writer = PdfWriter::new_with_writer(&mut buffer);
            writer.write_document(&doc).unwrap();
        }

        let text = String::from_utf8_lossy(&buffer);
        assert!(text.contains("(D:20250102030405+00'00)"));
    }
}

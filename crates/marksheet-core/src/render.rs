//! Marksheet page rendering
//!
//! Builds a one-page PDF from scratch with lopdf: the template PNG is placed
//! full-bleed as an image XObject, then each text placement is drawn with a
//! standard Type1 font.

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use std::io::{Cursor, Write};
use std::path::Path;

use crate::error::MarksheetError;
use crate::layout::{TemplateLayout, TextPlacement};
use crate::record::StudentRecord;
use crate::summary::ScoreSummary;

const FONT_RESOURCE: &str = "F1";
const IMAGE_RESOURCE: &str = "Im0";

/// Decoded template image, stored as zlib-compressed 8-bit RGB
#[derive(Debug, Clone)]
pub struct BackgroundImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl BackgroundImage {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MarksheetError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            MarksheetError::Template(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_png_bytes(&bytes)
    }

    pub fn from_png_bytes(bytes: &[u8]) -> Result<Self, MarksheetError> {
        let mut decoder = png::Decoder::new(Cursor::new(bytes));
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
        let mut reader = decoder
            .read_info()
            .map_err(|e| MarksheetError::Template(format!("Invalid PNG: {}", e)))?;

        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader
            .next_frame(&mut buf)
            .map_err(|e| MarksheetError::Template(format!("Invalid PNG: {}", e)))?;
        let pixels = &buf[..info.buffer_size()];

        let rgb = to_rgb(pixels, info.color_type)?;
        let data = zlib_compress(&rgb)
            .map_err(|e| MarksheetError::Template(format!("Compression failed: {}", e)))?;

        Ok(Self {
            width: info.width,
            height: info.height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn to_xobject(&self) -> Stream {
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => self.width as i64,
            "Height" => self.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        };
        // Already deflated
        Stream::new(dict, self.data.clone()).with_compression(false)
    }
}

/// Convert expanded 8-bit PNG pixels to RGB, compositing alpha over white
fn to_rgb(pixels: &[u8], color_type: png::ColorType) -> Result<Vec<u8>, MarksheetError> {
    let blend = |c: u8, a: u8| -> u8 {
        let (c, a) = (c as u32, a as u32);
        ((c * a + 255 * (255 - a)) / 255) as u8
    };

    let rgb = match color_type {
        png::ColorType::Rgb => pixels.to_vec(),
        png::ColorType::Rgba => pixels
            .chunks_exact(4)
            .flat_map(|p| [blend(p[0], p[3]), blend(p[1], p[3]), blend(p[2], p[3])])
            .collect(),
        png::ColorType::Grayscale => pixels.iter().flat_map(|&g| [g, g, g]).collect(),
        png::ColorType::GrayscaleAlpha => pixels
            .chunks_exact(2)
            .flat_map(|p| {
                let g = blend(p[0], p[1]);
                [g, g, g]
            })
            .collect(),
        png::ColorType::Indexed => {
            return Err(MarksheetError::Template(
                "Indexed PNG was not expanded to RGB".into(),
            ))
        }
    };
    Ok(rgb)
}

fn zlib_compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Encode text for a WinAnsi-encoded standard font; unmappable chars become `?`
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u8,
            _ => b'?',
        })
        .collect()
}

pub struct MarksheetRenderer {
    layout: TemplateLayout,
    background: BackgroundImage,
}

impl MarksheetRenderer {
    pub fn new(layout: TemplateLayout, background: BackgroundImage) -> Self {
        Self { layout, background }
    }

    pub fn layout(&self) -> &TemplateLayout {
        &self.layout
    }

    /// Build the single-page marksheet for one student
    pub fn render(
        &self,
        record: &StudentRecord,
        summary: &ScoreSummary,
    ) -> Result<Document, MarksheetError> {
        let page_size = self.layout.page;
        let placements = self.layout.placements(record, summary);

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => Object::Name(self.layout.font.base_font.clone().into_bytes()),
            "Encoding" => "WinAnsiEncoding",
        });
        let image_id = doc.add_object(self.background.to_xobject());

        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { FONT_RESOURCE => font_id },
            "XObject" => dictionary! { IMAGE_RESOURCE => image_id },
        });

        let content = self.page_content(&placements);
        let encoded = content
            .encode()
            .map_err(|e| MarksheetError::Render(format!("Content encoding failed: {}", e)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), page_size.width.into(), page_size.height.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        Ok(doc)
    }

    pub fn render_to_bytes(
        &self,
        record: &StudentRecord,
        summary: &ScoreSummary,
    ) -> Result<Vec<u8>, MarksheetError> {
        let mut doc = self.render(record, summary)?;
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| MarksheetError::Render(format!("Save failed: {}", e)))?;
        Ok(buffer)
    }

    pub fn render_to_file(
        &self,
        record: &StudentRecord,
        summary: &ScoreSummary,
        path: &Path,
    ) -> Result<(), MarksheetError> {
        let bytes = self.render_to_bytes(record, summary)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn page_content(&self, placements: &[TextPlacement]) -> Content {
        let page = self.layout.page;
        let font_size = self.layout.font.size;

        let mut operations = vec![
            // Background, stretched over the whole page
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    page.width.into(),
                    0.into(),
                    0.into(),
                    page.height.into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(FONT_RESOURCE.as_bytes().to_vec()),
                    font_size.into(),
                ],
            ),
        ];

        for placement in placements {
            // Absolute positioning via the text matrix
            operations.push(Operation::new(
                "Tm",
                vec![
                    1.into(),
                    0.into(),
                    0.into(),
                    1.into(),
                    placement.x.into(),
                    placement.y.into(),
                ],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(
                    encode_win_ansi(&placement.text),
                    StringFormat::Literal,
                )],
            ));
        }

        operations.push(Operation::new("ET", vec![]));
        Content { operations }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SubjectMark;
    use crate::summary::{summarize, GradingPolicy};

    fn png_bytes(color: png::ColorType, width: u32, height: u32, pixel: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            let data: Vec<u8> = pixel
                .iter()
                .copied()
                .cycle()
                .take(pixel.len() * (width * height) as usize)
                .collect();
            writer.write_image_data(&data).unwrap();
        }
        out
    }

    fn student() -> StudentRecord {
        StudentRecord {
            name: "Asha (K)".to_string(),
            mother_name: "Latha".to_string(),
            father_name: "Kumar".to_string(),
            register_number: "20231045".to_string(),
            secondary_id: String::new(),
            subject_marks: (0..6)
                .map(|i| SubjectMark {
                    subject: format!("S{}", i),
                    mark: 40 + i,
                })
                .collect(),
        }
    }

    #[test]
    fn test_background_from_rgb_png() {
        let bg = BackgroundImage::from_png_bytes(&png_bytes(png::ColorType::Rgb, 4, 3, &[255, 0, 0]))
            .unwrap();
        assert_eq!((bg.width(), bg.height()), (4, 3));
    }

    #[test]
    fn test_rgba_alpha_composited_over_white() {
        let rgb = to_rgb(&[0, 0, 0, 0, 10, 20, 30, 255], png::ColorType::Rgba).unwrap();
        assert_eq!(rgb, vec![255, 255, 255, 10, 20, 30]);
    }

    #[test]
    fn test_grayscale_expands_to_rgb() {
        let rgb = to_rgb(&[7, 200], png::ColorType::Grayscale).unwrap();
        assert_eq!(rgb, vec![7, 7, 7, 200, 200, 200]);
    }

    #[test]
    fn test_invalid_png_is_template_error() {
        let err = BackgroundImage::from_png_bytes(b"GIF89a").unwrap_err();
        assert!(matches!(err, MarksheetError::Template(_)));
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("Ravi é"), b"Ravi \xe9".to_vec());
        assert_eq!(encode_win_ansi("ರವಿ"), b"???".to_vec());
    }

    #[test]
    fn test_render_produces_single_a4_page() {
        let bg = BackgroundImage::from_png_bytes(&png_bytes(
            png::ColorType::Rgba,
            2,
            2,
            &[255, 255, 255, 255],
        ))
        .unwrap();
        let renderer = MarksheetRenderer::new(TemplateLayout::default(), bg);
        let record = student();
        let summary = summarize(&record.marks(), &GradingPolicy::default());

        let bytes = renderer.render_to_bytes(&record, &summary).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);

        let page_id = *pages.get(&1).unwrap();
        let content = doc.get_and_decode_page_content(page_id).unwrap();
        let shown: Vec<Vec<u8>> = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| op.operands.first()?.as_str().ok().map(|s| s.to_vec()))
            .collect();
        assert!(shown.contains(&b"Asha (K)".to_vec()));
        assert!(shown.contains(&b"Two Hundred Fifty Five".to_vec()));
        assert!(shown.contains(&b"PASS".to_vec()));
        assert!(content.operations.iter().any(|op| op.operator == "Do"));
    }
}

//! PDF fixtures built with lopdf.

#![allow(dead_code)]

use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// One line of text: content, font size, baseline in PDF user space.
pub type Line<'a> = (&'a str, f32, f32);

/// Build a US Letter PDF with one Helvetica line per entry on each page.
pub fn build_pdf(pages: &[&[Line<'_>]], title: Option<&str>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut content = String::new();
        for (text, size, baseline) in lines.iter() {
            content.push_str(&format!(
                "BT /F1 {} Tf 72 {} Td ({}) Tj ET\n",
                size, baseline, text
            ));
        }

        let stream = Stream::new(lopdf::Dictionary::new(), content.into_bytes());
        let content_id = doc.add_object(Object::Stream(stream));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => Object::Dictionary(dictionary! {
                "Font" => Object::Dictionary(dictionary! {
                    "F1" => font_id,
                }),
            }),
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if let Some(title) = title {
        let mut info = lopdf::Dictionary::new();
        info.set("Title", Object::string_literal(title));
        let info_id = doc.add_object(Object::Dictionary(info));
        doc.trailer.set("Info", Object::Reference(info_id));
    }

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}

/// Two-page quarterly report.
pub fn quarterly_report() -> Vec<u8> {
    build_pdf(
        &[
            &[
                ("Quarterly Results Review", 24.0, 700.0),
                ("Introduction", 14.0, 650.0),
                ("Revenue grew across all regions this quarter.", 10.0, 620.0),
            ],
            &[
                ("1.1. Regional Breakdown", 14.0, 700.0),
                ("Europe and Asia led the growth.", 10.0, 680.0),
            ],
        ],
        None,
    )
}

/// Build a one-page PDF that shows `text` through a Type0 font with
/// Identity-H encoding. Each distinct character gets a two-byte glyph code
/// starting at 1, and a ToUnicode CMap maps the codes back.
pub fn build_identity_h_pdf(text: &str, size: f32) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id: ObjectId = doc.new_object_id();

    let mut glyphs: Vec<char> = Vec::new();
    let mut codes = String::new();
    for c in text.chars() {
        let code = match glyphs.iter().position(|&g| g == c) {
            Some(idx) => idx + 1,
            None => {
                glyphs.push(c);
                glyphs.len()
            }
        };
        codes.push_str(&format!("{:04X}", code));
    }

    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n12 dict begin\nbegincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n/CMapType 2 def\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );
    cmap.push_str(&format!("{} beginbfchar\n", glyphs.len()));
    for (idx, c) in glyphs.iter().enumerate() {
        cmap.push_str(&format!("<{:04X}> <{:04X}>\n", idx + 1, *c as u32));
    }
    cmap.push_str("endbfchar\nendcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    let to_unicode_id = doc.add_object(Object::Stream(Stream::new(
        lopdf::Dictionary::new(),
        cmap.into_bytes(),
    )));

    let descendant_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => "ABCDEF+Calibri",
        "CIDSystemInfo" => Object::Dictionary(dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0i64,
        }),
    });

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "ABCDEF+Calibri",
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::from(descendant_id)],
        "ToUnicode" => to_unicode_id,
    });

    let content = format!("BT /F1 {} Tf 72 700 Td <{}> Tj ET\n", size, codes);
    let content_id = doc.add_object(Object::Stream(Stream::new(
        lopdf::Dictionary::new(),
        content.into_bytes(),
    )));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => content_id,
        "Resources" => Object::Dictionary(dictionary! {
            "Font" => Object::Dictionary(dictionary! {
                "F1" => font_id,
            }),
        }),
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::from(page_id)],
            "Count" => 1i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}

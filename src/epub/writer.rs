//! EPUB 2 writer.
//!
//! Everything is held in memory until [`Packager::write`], which lays out:
//!
//! ```text
//! mimetype                    (stored, first)
//! META-INF/container.xml
//! OEBPS/content.opf
//! OEBPS/toc.ncx
//! OEBPS/styles/*.css
//! OEBPS/images/*
//! OEBPS/text/*.xhtml
//! ```

use std::fmt::Write as _;
use std::io::{Seek, Write};
use std::path::Path;

use tracing::info;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::xhtml::{escape_xml, to_xhtml};
use super::{media_type, Packager, StylesheetRef};
use crate::error::{Error, Result};
use crate::images::asset_href;
use crate::url_utils::path_extension;

const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

const COVER_PAGE: &str = "text/cover.xhtml";

/// A file inside `OEBPS/`.
#[derive(Debug, Clone)]
struct Item {
    href: String,
    data: Vec<u8>,
}

impl Item {
    fn id(&self) -> String {
        self.href.replace(['/', '.', ' ', '-'], "_")
    }
}

#[derive(Debug, Clone)]
struct ChapterDoc {
    title: String,
    item: Item,
}

/// In-memory EPUB 2 book.
///
/// # Example
///
/// ```no_run
/// use seirei_epub::{EpubPackager, Packager};
///
/// let mut book = EpubPackager::new("My Novel", "Someone");
/// let css = book.add_stylesheet(b"p { margin: 0; }")?;
/// book.add_chapter("Chapter 1", "<p>Once upon a time</p>", Some(&css))?;
/// book.write("novel.epub".as_ref())?;
/// # Ok::<(), seirei_epub::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct EpubPackager {
    title: String,
    author: String,
    language: String,
    cover: Option<Item>,
    stylesheets: Vec<Item>,
    images: Vec<Item>,
    chapters: Vec<ChapterDoc>,
}

impl EpubPackager {
    #[must_use]
    pub fn new(title: &str, author: &str) -> Self {
        Self {
            title: title.to_string(),
            author: author.to_string(),
            language: "en".to_string(),
            cover: None,
            stylesheets: Vec::new(),
            images: Vec::new(),
            chapters: Vec::new(),
        }
    }

    /// Deterministic identifier derived from title and author.
    #[must_use]
    pub fn identifier(&self) -> String {
        let mut hasher = sha1_smol::Sha1::new();
        hasher.update(self.title.as_bytes());
        hasher.update(b"\0");
        hasher.update(self.author.as_bytes());
        format!("urn:sha1:{}", hasher.digest())
    }

    /// Write the book to any seekable destination.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let stored = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        zip.start_file("mimetype", stored)?;
        zip.write_all(b"application/epub+zip")?;

        zip.start_file("META-INF/container.xml", deflated)?;
        zip.write_all(CONTAINER_XML.as_bytes())?;

        let identifier = self.identifier();
        zip.start_file("OEBPS/content.opf", deflated)?;
        zip.write_all(self.opf(&identifier).as_bytes())?;

        zip.start_file("OEBPS/toc.ncx", deflated)?;
        zip.write_all(self.ncx(&identifier).as_bytes())?;

        for item in self.items() {
            zip.start_file(format!("OEBPS/{}", item.href), deflated)?;
            zip.write_all(&item.data)?;
        }

        zip.finish()?;
        Ok(())
    }

    /// Manifest items in package order, cover page first.
    fn items(&self) -> Vec<Item> {
        let mut items: Vec<Item> = self.stylesheets.clone();
        if let Some(cover) = &self.cover {
            items.push(cover.clone());
            items.push(Item {
                href: COVER_PAGE.to_string(),
                data: self.cover_page(cover).into_bytes(),
            });
        }
        items.extend(self.images.iter().cloned());
        items.extend(self.chapters.iter().map(|c| c.item.clone()));
        items
    }

    fn spine(&self) -> Vec<String> {
        let mut spine = Vec::new();
        if self.cover.is_some() {
            spine.push(COVER_PAGE.to_string());
        }
        spine.extend(self.chapters.iter().map(|c| c.item.href.clone()));
        spine
    }

    fn cover_page(&self, cover: &Item) -> String {
        let body = format!(
            "<div class=\"cover\"><img src=\"../{}\" alt=\"{}\"/></div>",
            escape_xml(&cover.href),
            escape_xml(&self.title)
        );
        self.document(&self.title, &body, self.stylesheets.first().map(|s| format!("../{}", s.href)).as_deref())
    }

    fn document(&self, title: &str, body: &str, stylesheet_href: Option<&str>) -> String {
        let link = stylesheet_href
            .map(|href| format!("\n    <link rel=\"stylesheet\" type=\"text/css\" href=\"{}\"/>", escape_xml(href)))
            .unwrap_or_default();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="{lang}">
  <head>
    <title>{title}</title>{link}
  </head>
  <body>
{body}
  </body>
</html>
"#,
            lang = escape_xml(&self.language),
            title = escape_xml(title),
        )
    }

    fn opf(&self, identifier: &str) -> String {
        let mut opf = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="BookId">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
"#,
        );

        let _ = writeln!(opf, "    <dc:title>{}</dc:title>", escape_xml(&self.title));
        let _ = writeln!(opf, "    <dc:creator opf:role=\"aut\">{}</dc:creator>", escape_xml(&self.author));
        let _ = writeln!(opf, "    <dc:language>{}</dc:language>", escape_xml(&self.language));
        let _ = writeln!(opf, "    <dc:identifier id=\"BookId\">{}</dc:identifier>", escape_xml(identifier));
        let _ = writeln!(opf, "    <dc:date>{}</dc:date>", chrono::Utc::now().format("%Y-%m-%d"));
        if let Some(cover) = &self.cover {
            let _ = writeln!(opf, "    <meta name=\"cover\" content=\"{}\"/>", cover.id());
        }

        opf.push_str("  </metadata>\n  <manifest>\n");
        opf.push_str("    <item id=\"ncx\" href=\"toc.ncx\" media-type=\"application/x-dtbncx+xml\"/>\n");
        for item in self.items() {
            let _ = writeln!(
                opf,
                "    <item id=\"{}\" href=\"{}\" media-type=\"{}\"/>",
                item.id(),
                escape_xml(&item.href),
                media_type(&item.href)
            );
        }

        opf.push_str("  </manifest>\n  <spine toc=\"ncx\">\n");
        for href in self.spine() {
            let _ = writeln!(opf, "    <itemref idref=\"{}\"/>", href.replace(['/', '.', ' ', '-'], "_"));
        }
        opf.push_str("  </spine>\n");

        if self.cover.is_some() {
            let _ = writeln!(
                opf,
                "  <guide>\n    <reference type=\"cover\" title=\"Cover\" href=\"{COVER_PAGE}\"/>\n  </guide>"
            );
        }
        opf.push_str("</package>\n");
        opf
    }

    fn ncx(&self, identifier: &str) -> String {
        let mut ncx = String::new();
        let _ = write!(
            ncx,
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE ncx PUBLIC "-//NISO//DTD ncx 2005-1//EN" "http://www.daisy.org/z3986/2005/ncx-2005-1.dtd">
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
    <meta name="dtb:uid" content="{}"/>
    <meta name="dtb:depth" content="1"/>
    <meta name="dtb:totalPageCount" content="0"/>
    <meta name="dtb:maxPageNumber" content="0"/>
  </head>
  <docTitle>
    <text>{}</text>
  </docTitle>
  <navMap>
"#,
            escape_xml(identifier),
            escape_xml(&self.title)
        );

        for (index, chapter) in self.chapters.iter().enumerate() {
            let order = index + 1;
            let _ = write!(
                ncx,
                "    <navPoint id=\"navpoint-{order}\" playOrder=\"{order}\">\n      <navLabel>\n        <text>{}</text>\n      </navLabel>\n      <content src=\"{}\"/>\n    </navPoint>\n",
                escape_xml(&chapter.title),
                escape_xml(&chapter.item.href)
            );
        }

        ncx.push_str("  </navMap>\n</ncx>\n");
        ncx
    }
}

impl Packager for EpubPackager {
    fn set_cover(&mut self, bytes: Vec<u8>, source_url: &str) -> Result<()> {
        if bytes.is_empty() {
            return Err(Error::Package("cover image is empty".to_string()));
        }
        let ext = match path_extension(source_url) {
            ext if ext.is_empty() => ".jpg".to_string(),
            ext => ext,
        };
        self.cover = Some(Item {
            href: format!("images/cover{ext}"),
            data: bytes,
        });
        Ok(())
    }

    fn add_stylesheet(&mut self, css: &[u8]) -> Result<StylesheetRef> {
        let href = match self.stylesheets.len() {
            0 => "styles/stylesheet.css".to_string(),
            n => format!("styles/stylesheet_{}.css", n + 1),
        };
        self.stylesheets.push(Item {
            href: href.clone(),
            data: css.to_vec(),
        });
        Ok(StylesheetRef::new(format!("../{href}")))
    }

    fn add_image(&mut self, name: &str, bytes: Vec<u8>) -> Result<String> {
        let href = format!("images/{name}");
        if self.images.iter().any(|i| i.href == href) || self.cover.as_ref().is_some_and(|c| c.href == href) {
            return Err(Error::Package(format!("duplicate image name {name}")));
        }
        self.images.push(Item { href, data: bytes });
        Ok(asset_href(name))
    }

    fn add_chapter(&mut self, title: &str, body: &str, stylesheet: Option<&StylesheetRef>) -> Result<()> {
        let href = format!("text/chapter_{:04}.xhtml", self.chapters.len() + 1);
        let body = format!("<h2>{}</h2>\n{}", escape_xml(title), to_xhtml(body));
        let document = self.document(title, &body, stylesheet.map(StylesheetRef::href));

        self.chapters.push(ChapterDoc {
            title: title.to_string(),
            item: Item {
                href,
                data: document.into_bytes(),
            },
        });
        Ok(())
    }

    fn write(&mut self, output: &Path) -> Result<()> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(output)?;
        self.write_to(file)?;
        info!(
            path = %output.display(),
            chapters = self.chapters.len(),
            images = self.images.len(),
            "EPUB written"
        );
        Ok(())
    }
}

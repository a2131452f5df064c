mod common;

use std::io::{Cursor, Read};

use common::{chapter_page, quiet_options, MemoryFetcher};
use seirei_epub::{
    parse_entries, BookSpec, DebugDump, EpubPackager, ImageResolver, Normalizer, Options, PageContext, Packager,
    Pipeline,
};

fn read_zip(path: &std::path::Path) -> zip::ZipArchive<std::fs::File> {
    zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap()
}

fn entry_text(archive: &mut zip::ZipArchive<std::fs::File>, name: &str) -> String {
    let mut text = String::new();
    archive.by_name(name).unwrap().read_to_string(&mut text).unwrap();
    text
}

#[test]
fn full_run_writes_a_readable_epub() {
    let dir = std::env::temp_dir().join(format!("seirei_epub_run_{}", std::process::id()));
    let output = dir.join("book.epub");

    let fetcher = MemoryFetcher::new()
        .with("https://img.example/cover.jpg", "cover-bytes")
        .with("https://img.example/map.png", "map-bytes")
        .with(
            "http://x/1",
            &chapter_page("Chapter 1", r#"<p>First &amp; best</p><p><img src="https://img.example/map.png"></p>"#),
        )
        .with("http://x/2", &chapter_page("Chapter 1 (cont.)", "<p>Second half</p>"))
        .with("http://x/3", &chapter_page("Chapter 2", "<p>Next one<br>with a break</p>"));
    let entries = parse_entries("Chapter 1::http://x/1\nChapter 1::http://x/2\nChapter 2::http://x/3\n");

    let options = Options {
        include_sources: true,
        ..quiet_options()
    };
    let mut packager = EpubPackager::new("Spirit Chronicles", "Seirei");
    let report = Pipeline::new(options, fetcher)
        .run(
            BookSpec {
                cover_url: "https://img.example/cover.jpg",
                output: &output,
            },
            &entries,
            &mut packager,
        )
        .unwrap();
    assert_eq!(report.chapters, 2);
    assert_eq!(report.images, 1);

    let mut archive = read_zip(&output);
    assert_eq!(archive.by_index(0).unwrap().name(), "mimetype");
    assert!(archive.by_name("OEBPS/images/cover.jpg").is_ok());
    assert!(archive.by_name("OEBPS/images/image_0001.png").is_ok());
    assert!(archive.by_name("OEBPS/styles/stylesheet.css").is_ok());

    let sources = entry_text(&mut archive, "OEBPS/text/chapter_0001.xhtml");
    assert!(sources.contains("<h2>Attribution and Sources</h2>"));
    assert!(sources.contains("https://ko-fi.com/seireitranslations"));
    assert!(sources.contains("http://x/3"));

    let first = entry_text(&mut archive, "OEBPS/text/chapter_0002.xhtml");
    assert!(first.contains("<h2>Chapter 1</h2>"));
    assert!(first.contains("First &amp; best"));
    assert!(first.contains("Second half"));
    assert!(first.contains(r#"src="../images/image_0001.png""#));
    assert!(first.contains("/>"));

    let second = entry_text(&mut archive, "OEBPS/text/chapter_0003.xhtml");
    assert!(second.contains("<br/>"));

    let ncx = entry_text(&mut archive, "OEBPS/toc.ncx");
    assert_eq!(ncx.matches("<navPoint").count(), 3);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn scripts_and_styles_never_reach_chapter_documents() {
    let fetcher = MemoryFetcher::new();
    let mut resolver = ImageResolver::new(&fetcher);
    let page = PageContext {
        url: "http://x/1",
        line: 1,
    };
    let fragment = Normalizer::new(&Options::default(), DebugDump::disabled()).normalize(
        r#"<p>Story</p><script>if (a < b && c) { x(); }</script><style>p > b { color: red; }</style>"#,
        page,
        &mut resolver,
    );

    let mut packager = EpubPackager::new("T", "A");
    packager.add_chapter("Chapter 1", &fragment.html, None).unwrap();
    let mut buffer = Cursor::new(Vec::new());
    packager.write_to(&mut buffer).unwrap();

    let mut archive = zip::ZipArchive::new(Cursor::new(buffer.into_inner())).unwrap();
    let mut chapter = String::new();
    archive
        .by_name("OEBPS/text/chapter_0001.xhtml")
        .unwrap()
        .read_to_string(&mut chapter)
        .unwrap();

    assert!(chapter.contains("<p>Story</p>"));
    assert!(!chapter.contains("<script"));
    assert!(!chapter.contains("<style"));
    assert!(!chapter.contains("a < b"));
}

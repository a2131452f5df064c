use seirei_epub::{parse_entries, read_entries, Error, SourceEntry};

#[test]
fn records_survive_display_and_parse() {
    let records = [
        SourceEntry::new("Chapter 1", "https://seireitranslations.blogspot.com/2019/01/ch-1.html"),
        SourceEntry::new("Side Story: The Festival", "http://localhost:8080/a?b=c"),
        SourceEntry::new("第一章", "https://example.com/%E7%AC%AC"),
    ];
    for record in records {
        assert_eq!(SourceEntry::parse(&record.to_string()), Some(record));
    }
}

#[test]
fn whitespace_around_fields_is_trimmed() {
    let entries = parse_entries("\t Chapter 2 \t::\t https://x/2 \r\n");
    assert_eq!(entries, vec![SourceEntry::new("Chapter 2", "https://x/2")]);
}

#[test]
fn order_and_duplicates_are_preserved() {
    let entries = parse_entries("A::http://x/1\nA::http://x/2\nB::http://x/3\nA::http://x/4\n");
    let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "A", "B", "A"]);
}

#[test]
fn malformed_lines_are_skipped() {
    let entries = parse_entries(
        "Chapter 1::http://x/1\n\
         just a title\n\
         too::many::fields\n\
         \n\
         Chapter 2::http://x/2\n",
    );
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].url, "http://x/2");
}

#[test]
fn read_entries_from_file() {
    let path = std::env::temp_dir().join(format!("seirei_entries_{}.txt", std::process::id()));
    std::fs::write(&path, "Ch1::http://x/a\n\nCh2::http://x/b\n").unwrap();

    let entries = read_entries(&path).unwrap();
    assert_eq!(entries.len(), 2);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn unreadable_list_is_fatal() {
    let err = read_entries(std::path::Path::new("/definitely/not/here.txt")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(err.is_fatal());
}

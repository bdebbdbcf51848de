//! Reader and writer behaviour seen from outside the crate.

use crate::common::*;
use doclens::dom::names::*;
use doclens::formats::WordFormat;
use doclens::inspect::{treeviz, TreevizOptions};
use doclens::xml::{parse_html, parse_xml, serialize_xml, ParseOptions, WriteOptions};
use doclens::{ConvertOptions, DocError, Format};

const SMALL_WORD: &str = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>Hi</w:t></w:r></w:p><w:sectPr/></w:body></w:document>"#;

#[test]
fn test_abstract_view_of_a_small_document() {
    let concrete = parse_xml(SMALL_WORD, &ParseOptions::data()).unwrap();
    let abstract_doc = WordFormat.get(&concrete, &ConvertOptions::default()).unwrap();

    insta::assert_snapshot!(serialize_xml(&abstract_doc, &WriteOptions::html()), @r###"
    <html xmlns="http://www.w3.org/1999/xhtml">
      <head/>
      <body id="word2">
        <p id="word3"><span id="word4">Hi</span></p>
      </body>
    </html>
    "###);
}

#[test]
fn test_treeviz_of_a_small_document() {
    let concrete = parse_xml(SMALL_WORD, &ParseOptions::data()).unwrap();

    insta::assert_snapshot!(treeviz(&concrete, &TreevizOptions::default()), @r###"
    └─ w:document #1
      └─ w:body #2
        ├─ w:p #3
        │ └─ w:r #4
        │   └─ w:t #5
        │     └─ "Hi"
        └─ w:sectPr #7
    "###);
}

#[test]
fn test_compact_output_keeps_prefixes_and_preserved_space() {
    let doc = word_fixture();
    let out = compact(&doc);
    assert!(out.starts_with(
        "<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body><w:p>"
    ));
    assert!(out.contains("<w:t xml:space=\"preserve\">Plain text and </w:t>"));
    assert!(out.contains("<w:pgSz w:w=\"11906\" w:h=\"16838\"/>"));
    assert_eq!(out.lines().count(), 1);
}

#[test]
fn test_unknown_namespaces_survive_a_round_trip() {
    let source = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006" mc:Ignorable="w14"><w:body/></w:document>"#;
    let doc = parse_xml(source, &ParseOptions::data()).unwrap();
    let options = WriteOptions {
        xml_declaration: false,
        ..WriteOptions::default()
    };

    let out = serialize_xml(&doc, &options);
    let again = serialize_xml(&parse_xml(&out, &ParseOptions::data()).unwrap(), &options);
    assert_eq!(out, again);
    assert!(out.contains("xmlns:mc=\"http://schemas.openxmlformats.org/markup-compatibility/2006\""));
    assert!(out.contains("mc:Ignorable=\"w14\""));
}

#[test]
fn test_declaration_is_written_by_default() {
    let doc = word_fixture();
    let out = serialize_xml(&doc, &WriteOptions::default());
    assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<w:document"));
}

#[test]
fn test_html_reader_puts_unprefixed_names_in_the_html_namespace() {
    let doc = parse_html(r#"<html><body><p class="Quote" style="color: red">x</p></body></html>"#)
        .unwrap();
    let body = html_body(&doc);
    let p = doc.children(body)[0];
    assert_eq!(doc.tag(p), HTML_P);
    assert_eq!(doc.get_attribute(p, HTML_CLASS), Some("Quote"));
    assert_eq!(doc.get_attribute(p, HTML_STYLE), Some("color: red"));
}

#[test]
fn test_malformed_input_is_a_parse_error() {
    let err = parse_xml("<w:document><w:body>", &ParseOptions::data()).unwrap_err();
    assert!(matches!(err, DocError::Parse(_)));
}

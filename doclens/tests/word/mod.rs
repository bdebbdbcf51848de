//! Word body format: get, put and create against a small `document.xml`.

use crate::common::*;
use doclens::dom::names::*;
use doclens::formats::word::properties::{paragraph_style, run_style};
use doclens::formats::WordFormat;
use doclens::identity::IdScheme;
use doclens::xml::parse_html;
use doclens::{ConvertOptions, Document, Format, FormatError, FormatRegistry, NodeId};

fn get(concrete: &Document) -> Document {
    WordFormat.get(concrete, &ConvertOptions::default()).unwrap()
}

fn abstract_blocks(doc: &Document) -> Vec<NodeId> {
    doc.children(html_body(doc)).to_vec()
}

fn raw() -> ConvertOptions {
    ConvertOptions {
        normalize: false,
        ..ConvertOptions::default()
    }
}

#[test]
fn test_get_maps_paragraphs_and_headings() {
    let concrete = word_fixture();
    let abstract_doc = get(&concrete);
    let blocks = abstract_blocks(&abstract_doc);

    let tags: Vec<_> = blocks.iter().map(|b| abstract_doc.tag(*b)).collect();
    assert_eq!(tags, vec![HTML_H1, HTML_P, HTML_P, HTML_P]);
    assert_eq!(abstract_doc.text_content(blocks[0]), "Introduction");
    assert_eq!(abstract_doc.text_content(blocks[1]), "Plain text and bold");
    assert_eq!(abstract_doc.get_attribute(blocks[2], HTML_CLASS), Some("Quote"));
    assert_eq!(abstract_doc.tag(abstract_doc.children(blocks[3])[0]), HTML_BR);
}

#[test]
fn test_get_stamps_seq_no_ids() {
    let concrete = word_fixture();
    let abstract_doc = get(&concrete);
    let ids = IdScheme::default();

    for (block, paragraph) in abstract_blocks(&abstract_doc)
        .iter()
        .zip(word_paragraphs(&concrete))
    {
        assert_eq!(
            abstract_doc.get_attribute(*block, HTML_ID),
            Some(ids.encode(paragraph).as_str())
        );
    }
    let body = html_body(&abstract_doc);
    assert_eq!(
        abstract_doc.get_attribute(body, HTML_ID),
        Some(ids.encode(word_body(&concrete)).as_str())
    );
}

#[test]
fn test_get_reads_run_properties_and_links() {
    let concrete = word_fixture();
    let abstract_doc = get(&concrete);
    let blocks = abstract_blocks(&abstract_doc);

    let bold = abstract_doc.children(blocks[1])[1];
    assert_eq!(
        abstract_doc.get_attribute(bold, HTML_STYLE),
        Some("font-size: 14pt; font-weight: bold")
    );

    let quote = abstract_doc.children(blocks[2]);
    assert_eq!(quote.len(), 2);
    let tab = abstract_doc.children(quote[0])[1];
    assert_eq!(abstract_doc.get_attribute(tab, HTML_CLASS), Some("doclens-tab"));
    assert_eq!(abstract_doc.tag(quote[1]), HTML_A);
    assert_eq!(abstract_doc.get_attribute(quote[1], HTML_HREF), Some("#intro"));
}

#[test]
fn test_get_requires_a_word_body() {
    let doc = parse_html("<html><body/></html>").unwrap();
    let err = WordFormat.get(&doc, &ConvertOptions::default()).unwrap_err();
    assert_eq!(err, FormatError::MissingElement("w:document".to_string()));
}

#[test]
fn test_unedited_put_is_byte_identical() {
    let mut concrete = word_fixture();
    let before = compact(&concrete);
    let abstract_doc = get(&concrete);

    let stats = WordFormat.put(&mut concrete, &abstract_doc, &raw()).unwrap();

    assert_eq!(compact(&concrete), before);
    assert_eq!(stats.created + stats.removed, 0);
}

#[test]
fn test_unedited_put_with_normalization_is_byte_identical() {
    let mut concrete = word_fixture();
    let before = compact(&concrete);
    let abstract_doc = get(&concrete);

    let stats = WordFormat
        .put(&mut concrete, &abstract_doc, &ConvertOptions::default())
        .unwrap();

    assert_eq!(compact(&concrete), before);
    assert_eq!(stats.created + stats.removed, 0);
}

#[test]
fn test_edited_text_lands_in_the_same_run() {
    let mut concrete = word_fixture();
    let mut abstract_doc = get(&concrete);
    let heading = abstract_blocks(&abstract_doc)[0];
    let text = first_text(&abstract_doc, heading);
    abstract_doc.set_value(text, "Overview");

    WordFormat
        .put(&mut concrete, &abstract_doc, &ConvertOptions::default())
        .unwrap();

    let paragraphs = word_paragraphs(&concrete);
    assert_eq!(concrete.text_content(paragraphs[0]), "Overview");
    assert_eq!(paragraph_style(&concrete, paragraphs[0]), Some("Heading1"));
    let body = word_body(&concrete);
    assert_eq!(concrete.tag(concrete.children(body)[2]), WORD_TBL);
    assert_eq!(concrete.last_child(body).map(|n| concrete.tag(n)), Some(WORD_SECTPR));
}

#[test]
fn test_style_edit_adds_run_properties() {
    let mut concrete = word_fixture();
    let mut abstract_doc = get(&concrete);
    let plain = abstract_doc.children(abstract_blocks(&abstract_doc)[1])[0];
    abstract_doc.set_attribute(plain, HTML_STYLE, "font-style: italic");

    WordFormat
        .put(&mut concrete, &abstract_doc, &ConvertOptions::default())
        .unwrap();

    let paragraph = word_paragraphs(&concrete)[1];
    let runs: Vec<NodeId> = concrete
        .children(paragraph)
        .iter()
        .copied()
        .filter(|c| concrete.tag(*c) == WORD_R)
        .collect();
    assert!(run_style(&concrete, runs[0]).is_italic());
    assert!(run_style(&concrete, runs[1]).is_bold());
    assert!(compact(&concrete).contains("<w:r><w:rPr><w:i/></w:rPr><w:t xml:space=\"preserve\">Plain text and </w:t></w:r>"));
}

#[test]
fn test_class_edit_changes_paragraph_style() {
    let mut concrete = word_fixture();
    let mut abstract_doc = get(&concrete);
    let blocks = abstract_blocks(&abstract_doc);
    abstract_doc.set_attribute(blocks[2], HTML_CLASS, "Subtitle");

    WordFormat
        .put(&mut concrete, &abstract_doc, &ConvertOptions::default())
        .unwrap();

    let paragraphs = word_paragraphs(&concrete);
    assert_eq!(paragraph_style(&concrete, paragraphs[2]), Some("Subtitle"));
    assert_eq!(paragraph_style(&concrete, paragraphs[0]), Some("Heading1"));
}

#[test]
fn test_cleared_class_drops_paragraph_properties() {
    let mut concrete = word_fixture();
    let mut abstract_doc = get(&concrete);
    let quote = abstract_blocks(&abstract_doc)[2];
    abstract_doc.remove_attribute(quote, HTML_CLASS);

    WordFormat
        .put(&mut concrete, &abstract_doc, &ConvertOptions::default())
        .unwrap();

    let paragraph = word_paragraphs(&concrete)[2];
    assert_eq!(concrete.child_with_tag(paragraph, WORD_PPR), None);
}

#[test]
fn test_new_paragraph_is_created_in_place() {
    let mut concrete = word_fixture();
    let mut abstract_doc = get(&concrete);
    let blocks = abstract_blocks(&abstract_doc);
    let body = html_body(&abstract_doc);
    let fresh = abstract_doc.create_element(HTML_P);
    abstract_doc.append_text(fresh, "New");
    abstract_doc.insert_before(body, fresh, Some(blocks[2]));

    let stats = WordFormat
        .put(&mut concrete, &abstract_doc, &ConvertOptions::default())
        .unwrap();

    assert!(stats.created >= 1);
    let cbody = word_body(&concrete);
    let tags: Vec<_> = concrete
        .children(cbody)
        .iter()
        .map(|c| concrete.tag(*c))
        .collect();
    assert_eq!(
        tags,
        vec![WORD_P, WORD_P, WORD_TBL, WORD_P, WORD_P, WORD_P, WORD_SECTPR]
    );
    assert_eq!(concrete.text_content(concrete.children(cbody)[3]), "New");
    assert!(compact(&concrete).contains("<w:p><w:r><w:t>New</w:t></w:r></w:p>"));
}

#[test]
fn test_deleted_paragraph_takes_its_bookmarks_along() {
    let mut concrete = word_fixture();
    let mut abstract_doc = get(&concrete);
    let doomed = abstract_blocks(&abstract_doc)[1];
    abstract_doc.remove_node(doomed);

    let stats = WordFormat
        .put(&mut concrete, &abstract_doc, &ConvertOptions::default())
        .unwrap();

    assert_eq!(stats.removed, 1);
    let texts: Vec<String> = word_paragraphs(&concrete)
        .iter()
        .map(|p| concrete.text_content(*p))
        .collect();
    assert_eq!(texts, vec!["Introduction", "Beforeafterback", ""]);
    assert!(!compact(&concrete).contains("bookmarkStart"));
}

#[test]
fn test_reordered_paragraphs_keep_their_markup() {
    let mut concrete = word_fixture();
    let quote_before = compact_paragraph(&concrete, 2);
    let mut abstract_doc = get(&concrete);
    let blocks = abstract_blocks(&abstract_doc);
    let body = html_body(&abstract_doc);
    abstract_doc.insert_before(body, blocks[2], Some(blocks[0]));

    let stats = WordFormat
        .put(&mut concrete, &abstract_doc, &ConvertOptions::default())
        .unwrap();

    assert_eq!(stats.created + stats.removed, 0);
    let texts: Vec<String> = word_paragraphs(&concrete)
        .iter()
        .map(|p| concrete.text_content(*p))
        .collect();
    assert_eq!(
        texts,
        vec!["Beforeafterback", "Introduction", "Plain text and bold", ""]
    );
    assert_eq!(compact_paragraph(&concrete, 0), quote_before);
    let cbody = word_body(&concrete);
    assert_eq!(concrete.tag(concrete.children(cbody)[0]), WORD_TBL);
}

fn compact_paragraph(doc: &Document, index: usize) -> String {
    let options = doclens::xml::WriteOptions {
        xml_declaration: false,
        ..doclens::xml::WriteOptions::default()
    };
    doclens::xml::serialize_node(doc, word_paragraphs(doc)[index], &options)
}

#[test]
fn test_create_builds_a_new_document() {
    let abstract_doc = parse_html(
        "<html><body><h2>Title</h2><p>Hello <b>world</b></p><ul><li>dropped</li></ul></body></html>",
    )
    .unwrap();

    let concrete = WordFormat
        .create(&abstract_doc, &ConvertOptions::default())
        .unwrap();

    let paragraphs = word_paragraphs(&concrete);
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(paragraph_style(&concrete, paragraphs[0]), Some("Heading2"));
    let out = compact(&concrete);
    assert!(out.starts_with("<w:document xmlns:w="));
    assert!(out.contains("<w:t xml:space=\"preserve\">Hello </w:t>"));
    assert!(out.contains("<w:r><w:rPr><w:b/></w:rPr><w:t>world</w:t></w:r>"));
    for run in concrete.descendants(concrete.root().unwrap()) {
        if concrete.tag(run) == WORD_R && concrete.child_with_tag(run, WORD_RPR).is_some() {
            assert_eq!(concrete.first_child(run).map(|c| concrete.tag(c)), Some(WORD_RPR));
        }
    }
}

#[test]
fn test_typing_into_an_empty_styled_paragraph_keeps_properties_first() {
    let source = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr></w:p></w:body></w:document>"#;
    let mut concrete = doclens::xml::parse_xml(source, &doclens::xml::ParseOptions::data()).unwrap();
    let mut abstract_doc = get(&concrete);
    let heading = abstract_blocks(&abstract_doc)[0];
    assert_eq!(abstract_doc.tag(heading), HTML_H1);
    abstract_doc.remove_all_children(heading);
    let span = abstract_doc.append_element(heading, HTML_SPAN);
    abstract_doc.append_text(span, "Typed");

    let stats = WordFormat.put(&mut concrete, &abstract_doc, &raw()).unwrap();

    assert_eq!(stats.created, 2);
    assert_eq!(
        compact_paragraph(&concrete, 0),
        r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Typed</w:t></w:r></w:p>"#
    );
}

#[test]
fn test_styled_run_created_in_an_existing_paragraph_has_properties_first() {
    let mut concrete = word_fixture();
    let mut abstract_doc = get(&concrete);
    let heading = abstract_blocks(&abstract_doc)[0];
    let span = abstract_doc.append_element(heading, HTML_SPAN);
    abstract_doc.set_attribute(span, HTML_STYLE, "font-style: italic");
    abstract_doc.append_text(span, "!");

    WordFormat.put(&mut concrete, &abstract_doc, &raw()).unwrap();

    let paragraph = word_paragraphs(&concrete)[0];
    assert_eq!(concrete.first_child(paragraph).map(|c| concrete.tag(c)), Some(WORD_PPR));
    let run = concrete.last_child(paragraph).unwrap();
    assert_eq!(concrete.tag(run), WORD_R);
    assert_eq!(concrete.first_child(run).map(|c| concrete.tag(c)), Some(WORD_RPR));
    assert!(run_style(&concrete, run).is_italic());
    assert_eq!(concrete.text_content(paragraph), "Introduction!");
}

#[test]
fn test_registry_round_trip() {
    let registry = FormatRegistry::with_defaults();
    let options = ConvertOptions::default();
    let mut concrete = word_fixture();
    let before = compact(&concrete);

    let abstract_doc = registry.get_abstract(&concrete, "word", &options).unwrap();
    registry
        .put_abstract(&mut concrete, &abstract_doc, "word", &options)
        .unwrap();

    assert_eq!(compact(&concrete), before);
    assert!(matches!(
        registry.get_abstract(&concrete, "odt", &options),
        Err(FormatError::FormatNotFound(_))
    ));
}

#[test]
fn test_put_through_serialized_html() {
    let mut concrete = word_fixture();
    let before = compact(&concrete);
    let html = doclens::xml::serialize_xml(&get(&concrete), &doclens::xml::WriteOptions::html());
    let reparsed = parse_html(&html).unwrap();

    let stats = WordFormat
        .put(&mut concrete, &reparsed, &ConvertOptions::default())
        .unwrap();

    assert_eq!(stats.created + stats.removed, 0);
    assert_eq!(compact(&concrete), before);
}

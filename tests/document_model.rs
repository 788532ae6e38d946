use cfr_tally::document::{DocumentError, TitleDocument};

fn parse(xml: &str) -> TitleDocument {
    TitleDocument::from_bytes(xml.as_bytes()).expect("document should parse")
}

#[test]
fn nodes_are_stored_in_document_order() {
    let doc = parse(r#"<ROOT><A TYPE="PART" N="1"><B/><C/></A><D/></ROOT>"#);

    let tags: Vec<&str> = (0..doc.len()).map(|i| doc.node(i).tag.as_str()).collect();
    assert_eq!(tags, vec!["ROOT", "A", "B", "C", "D"]);

    assert_eq!(doc.descendants(doc.root()), 1..5);
    assert_eq!(doc.descendants(1), 2..4);
    assert_eq!(doc.subtree(1).len(), 3);
    assert!(doc.descendants(2).is_empty());
}

#[test]
fn type_and_label_attributes_are_captured() {
    let doc = parse(r#"<ROOT><DIV5 N="100" TYPE="PART" ID="x"/></ROOT>"#);
    let node = doc.node(1);

    assert_eq!(node.kind.as_deref(), Some("PART"));
    assert_eq!(node.label.as_deref(), Some("100"));
    assert!(node.matches("PART", "100"));
    assert!(!node.matches("PART", "101"));
    assert!(!node.is_section());
}

#[test]
fn text_and_tail_follow_element_tree_placement() {
    let doc = parse("<R>lead<A>inner<B>deep</B>after-b</A>after-a<C/>after-c</R>");

    assert_eq!(doc.node(0).text.as_deref(), Some("lead"));
    assert_eq!(doc.node(1).text.as_deref(), Some("inner"));
    assert_eq!(doc.node(2).text.as_deref(), Some("deep"));
    assert_eq!(doc.node(2).tail.as_deref(), Some("after-b"));
    assert_eq!(doc.node(1).tail.as_deref(), Some("after-a"));
    assert_eq!(doc.node(3).text, None);
    assert_eq!(doc.node(3).tail.as_deref(), Some("after-c"));
}

#[test]
fn entities_and_cdata_become_text() {
    let doc = parse("<R><P>a &amp; b &#167; <![CDATA[<raw>]]></P></R>");
    assert_eq!(doc.node(1).text.as_deref(), Some("a & b \u{a7} <raw>"));
}

#[test]
fn comments_and_declarations_are_dropped() {
    let doc = parse("<?xml version=\"1.0\"?>\n<!-- header --><R><!-- note --><P>x</P></R>");
    assert_eq!(doc.len(), 2);
    assert_eq!(doc.node(1).text.as_deref(), Some("x"));
}

#[test]
fn section_requires_div_tag_and_section_type() {
    let doc = parse(r#"<R><DIV8 TYPE="SECTION" N="1"/><SECTION TYPE="SECTION" N="2"/><DIV8 TYPE="APPENDIX" N="3"/></R>"#);
    assert!(doc.node(1).is_section());
    assert!(!doc.node(2).is_section());
    assert!(!doc.node(3).is_section());
}

#[test]
fn malformed_documents_are_rejected() {
    let unclosed = TitleDocument::from_bytes(b"<R><A></R>");
    assert!(matches!(unclosed, Err(DocumentError::Malformed(_))));

    let open_root = TitleDocument::from_bytes(b"<R><A></A>");
    assert!(matches!(open_root, Err(DocumentError::Malformed(_))));

    let two_roots = TitleDocument::from_bytes(b"<R/><S/>");
    assert!(matches!(two_roots, Err(DocumentError::Malformed(_))));

    let empty = TitleDocument::from_bytes(b"   ");
    assert!(matches!(empty, Err(DocumentError::Empty)));
}

#[test]
fn digest_depends_only_on_body_bytes() {
    let a = parse("<R><P>same</P></R>");
    let b = parse("<R><P>same</P></R>");
    let c = parse("<R><P>other</P></R>");

    assert_eq!(a.digest(), b.digest());
    assert_ne!(a.digest(), c.digest());
    assert!(a.digest().as_str().starts_with("sha256:"));
    assert_eq!(a.digest().as_str().len(), "sha256:".len() + 64);
}

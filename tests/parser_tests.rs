//! Object and dictionary parser tests


use pdf_xref::*;
use test_utils::*;

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn test_parse_name() {
    let mut cursor = cursor_over(b"/Catalog");
    let obj = Parser::new(&mut cursor).parse_object().unwrap();
    assert_eq!(obj, PDFObject::Name("Catalog".to_string()));
}

#[test]
fn test_parse_integer_before_delimiter() {
    let mut cursor = cursor_over(b"42/Next");
    let mut parser = Parser::new(&mut cursor);
    assert_eq!(parser.parse_object().unwrap(), PDFObject::Integer(42));
    assert_eq!(
        parser.parse_object().unwrap(),
        PDFObject::Name("Next".to_string())
    );
}

#[test]
fn test_parse_integer_at_end_of_data() {
    let mut cursor = cursor_over(b"  17  ");
    let obj = Parser::new(&mut cursor).parse_object().unwrap();
    assert_eq!(obj.as_integer(), Some(17));
}

#[test]
fn test_parse_real() {
    let mut cursor = cursor_over(b"3.25 >>");
    let obj = Parser::new(&mut cursor).parse_object().unwrap();
    assert_eq!(obj, PDFObject::Real(3.25));
    assert_eq!(obj.as_number(), Some(3.25));
    assert_eq!(obj.as_integer(), None);
}

// ============================================================================
// References
// ============================================================================

#[test]
fn test_parse_reference() {
    let mut cursor = cursor_over(b"12 0 R");
    let obj = Parser::new(&mut cursor).parse_object().unwrap();
    assert_eq!(obj.as_reference(), Some(ObjectReference::new(12, 0)));
    assert_eq!(obj.as_reference().unwrap().to_string(), "12 0 R");
}

#[test]
fn test_integer_pair_without_r_is_rejected() {
    let mut cursor = cursor_over(b"12 0 obj");
    let err = Parser::new(&mut cursor).parse_object().unwrap_err();
    assert!(matches!(
        err,
        PDFError::UnexpectedToken { expected: "R", ref found, .. } if found == "obj"
    ));
    assert_eq!(err.class(), ErrorClass::Parse);
}

// ============================================================================
// Dictionaries
// ============================================================================

#[test]
fn test_parse_catalog_dictionary() {
    let mut cursor = cursor_over(b"<< /Type /Catalog /Pages 3 0 R >>");
    let dict = Parser::new(&mut cursor).parse_dictionary().unwrap();

    assert_eq!(dict.len(), 2);
    assert_eq!(dict.get("Type").and_then(PDFObject::as_name), Some("Catalog"));
    assert_eq!(
        dict.get("Pages").and_then(PDFObject::as_reference),
        Some(ObjectReference::new(3, 0))
    );
}

#[test]
fn test_parse_nested_dictionary() {
    let data = b"<</Font<</F1 5 0 R/F2 6 0 R>>/ProcSet/PDF/Count 2>>";
    let mut cursor = cursor_over(data);
    let obj = Parser::new(&mut cursor).parse_object().unwrap();

    let dict = obj.as_dict().unwrap();
    let fonts = dict.get("Font").and_then(PDFObject::as_dict).unwrap();
    assert_eq!(
        fonts.get("F2").and_then(PDFObject::as_reference),
        Some(ObjectReference::new(6, 0))
    );
    assert_eq!(dict.get("ProcSet").and_then(PDFObject::as_name), Some("PDF"));
    assert_eq!(dict.get("Count").and_then(PDFObject::as_integer), Some(2));
}

#[test]
fn test_parse_empty_dictionary() {
    let mut cursor = cursor_over(b"<<>>");
    let dict = Parser::new(&mut cursor).parse_dictionary().unwrap();
    assert!(dict.is_empty());
}

#[test]
fn test_parser_leaves_cursor_after_dictionary() {
    let mut cursor = cursor_over(b"<< /A 1 >> startxref");
    Parser::new(&mut cursor).parse_dictionary().unwrap();
    assert!(cursor.next_token().unwrap().is("startxref"));
}

#[test]
fn test_parse_dictionary_requires_open_brackets() {
    let mut cursor = cursor_over(b"/Type /Catalog");
    let err = Parser::new(&mut cursor).parse_dictionary().unwrap_err();
    assert!(matches!(err, PDFError::UnexpectedToken { expected: "<<", .. }));
}

#[test]
fn test_unsupported_values_are_errors() {
    for input in [&b"[1 2 3]"[..], b"(hello)", b"<48656C6C6F>", b"true", b"null", b"-5"] {
        let mut cursor = cursor_over(input);
        let err = Parser::new(&mut cursor).parse_object().unwrap_err();
        assert!(
            matches!(err, PDFError::UnsupportedObjectSyntax { .. }),
            "{:?} gave {:?}",
            String::from_utf8_lossy(input),
            err
        );
    }
}

#[test]
fn test_unsupported_value_inside_dictionary() {
    let mut cursor = cursor_over(b"<< /MediaBox [0 0 612 792] >>");
    let err = Parser::new(&mut cursor).parse_dictionary().unwrap_err();
    assert!(matches!(err, PDFError::UnsupportedObjectSyntax { ref found, .. } if found == "["));
}

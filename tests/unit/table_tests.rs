/*!
 * Tests for table location, tokenizing and span-preserving splicing
 */

use std::collections::BTreeMap;

use tablecheck::errors::TableError;
use tablecheck::table::links::{rewrite_link, text_content};
use tablecheck::table::patch::splice;
use tablecheck::table::{apply_document, apply_row, apply_table_body, extract_href, locate, split_cells, split_rows};
use crate::common;

const ODD_TABLE: &str = "<html>\r\n<TABLE>\r\n<tbody CLASS=\"x\">\r\n  <TR id=\"r0\"><TH>0001-A</TH>\r\n    <td class='c'><a  HREF = \"https://docs.test/a.pdf\" >a.pdf</a></td >\r\n  </TR>\r\n\t<tr><td>0002-B</td><td></td></tr>\r\n</tbody>\r\n</TABLE>\r\n</html>";

#[test]
fn test_locate_withoutTbody_shouldFail() {
    assert_eq!(locate("<table><tr><td>x</td></tr></table>"), Err(TableError::TableBodyNotFound));
}

#[test]
fn test_locate_withIrregularMarkup_shouldReturnExactInnerRange() {
    let span = locate(ODD_TABLE).unwrap();
    assert_eq!(&ODD_TABLE[span.inner_range.clone()], span.inner);
    assert!(ODD_TABLE[span.start..span.end].starts_with("<tbody CLASS=\"x\">"));
    assert!(ODD_TABLE[span.start..span.end].ends_with("</tbody>"));
}

#[test]
fn test_split_rows_withIrregularMarkup_shouldFindEveryRow() {
    let span = locate(ODD_TABLE).unwrap();
    let rows = split_rows(&span.inner);
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(&span.inner[row.span()], row.text);
    }

    let cells = rows[0].cells();
    assert_eq!(cells.len(), 2);
    assert_eq!(cells[0].tag, "TH");
    assert_eq!(cells[0].inner, "0001-A");
    assert_eq!(cells[1].close_tag, "</td >");
    assert_eq!(extract_href(&cells[1].inner).unwrap().raw, "https://docs.test/a.pdf");
}

#[test]
fn test_split_cells_withEmptyCell_shouldKeepPosition() {
    let cells = split_cells("<tr><td>0002-B</td><td></td></tr>");
    assert_eq!(cells.len(), 2);
    assert_eq!(cells[1].index, 1);
    assert_eq!(cells[1].inner, "");
}

#[test]
fn test_extract_href_withPlaceholderTargets_shouldFlagThem() {
    assert!(extract_href("<a href=\"#\">soon</a>").unwrap().placeholder);
    assert!(extract_href("<a href=\"\">soon</a>").unwrap().placeholder);
    assert!(extract_href("<a href=\"#top\">top</a>").unwrap().placeholder);
    assert!(!extract_href("<a href=\"x.pdf\">x</a>").unwrap().placeholder);
    assert_eq!(extract_href("<span>none</span>"), None);
}

#[test]
fn test_extract_href_withTwoLinks_shouldTakeFirst() {
    let link = extract_href("<a href=\"one.pdf\">1</a> <a href=\"two.pdf\">2</a>").unwrap();
    assert_eq!(link.raw, "one.pdf");
    assert_eq!(link.file_name(), Some("one.pdf"));
}

#[test]
fn test_extract_href_withDataHrefFirst_shouldTakeRealHref() {
    let inner = r##"<a data-href="#" href="https://x.test/a.pdf">a.pdf</a>"##;
    let link = extract_href(inner).unwrap();
    assert_eq!(link.raw, "https://x.test/a.pdf");
    assert!(!link.placeholder);
    assert_eq!(&inner[link.value_range.clone()], "https://x.test/a.pdf");

    assert_eq!(extract_href(r#"<span data-href="x.pdf">x</span>"#), None);
}

#[test]
fn test_rewrite_link_withFileNameText_shouldUpdateHrefAndText() {
    let inner = "<a href=\"https://docs.test/5000-g/5000-g-22e.pdf\">5000-g-22e.pdf</a>";
    let link = extract_href(inner).unwrap();
    assert_eq!(
        rewrite_link(inner, &link, "5100-g-22e.pdf"),
        "<a href=\"https://docs.test/5000-g/5100-g-22e.pdf\">5100-g-22e.pdf</a>"
    );
}

#[test]
fn test_rewrite_link_withDescriptiveText_shouldOnlyUpdateHref() {
    let inner = "<a class=\"pdf\" href=\"/5000-g/5000-g-22e.pdf\">Download (PDF)</a>";
    let link = extract_href(inner).unwrap();
    assert_eq!(
        rewrite_link(inner, &link, "5000g-22e.pdf"),
        "<a class=\"pdf\" href=\"/5000-g/5000g-22e.pdf\">Download (PDF)</a>"
    );
}

#[test]
fn test_text_content_withEntities_shouldDecode() {
    assert_eq!(text_content("<b>R&amp;D</b>&#160;form"), "R&D form");
}

#[test]
fn test_splice_withNoReplacements_shouldReturnSource() {
    let source = "abc";
    assert_eq!(splice(source, Vec::<(std::ops::Range<usize>, &str)>::new()), "abc");
    assert_eq!(splice(source, [(1..2, "XYZ")]), "aXYZc");
}

#[test]
fn test_apply_document_withOneCellReplaced_shouldOnlyChangeThatCell() {
    let span = locate(ODD_TABLE).unwrap();
    let rows = split_rows(&span.inner);
    let cells = rows[0].cells();

    let new_inner = "<span class=\"text-muted\">Not available</span>";
    let row_text = apply_row(&rows[0].text, &cells, &BTreeMap::from([(1, new_inner.to_string())]));
    let body = apply_table_body(&span.inner, &rows, &BTreeMap::from([(0, row_text)]));
    let document = apply_document(ODD_TABLE, &span, &body);

    let original_inner = &cells[1].inner;
    let expected = ODD_TABLE.replacen(original_inner.as_str(), new_inner, 1);
    assert_eq!(document, expected);
}

#[test]
fn test_apply_document_withNoChanges_shouldBeIdentical() {
    let html = common::table_document("en", &[vec!["1234-a".to_string(), common::link_cell("1234-a/1234-a-e.pdf")]]);
    let span = locate(&html).unwrap();
    let rows = split_rows(&span.inner);
    let body = apply_table_body(&span.inner, &rows, &BTreeMap::new());
    assert_eq!(apply_document(&html, &span, &body), html);
}

/*!
 * Tests for document generation from templates
 */

use anyhow::Result;
use std::fs;

use tablecheck::templates::{find_template, TemplateGenerator, DEFAULT_TOKEN};
use crate::common;

#[test]
fn test_generate_pairs_withTwoLanguages_shouldWriteEveryDocument() -> Result<()> {
    let templates = common::create_temp_dir()?;
    let out = common::create_temp_dir()?;
    common::create_test_file(templates.path(), "template-en.html", "<h1>Form {{CODE}}</h1>\r\n")?;
    common::create_test_bytes(templates.path(), "template-fr.htm", b"<h1>Formulaire {{CODE}} \xE9t\xE9</h1>\n")?;

    let items = vec!["1234-a".to_string(), "5000-g".to_string()];
    let written = TemplateGenerator::default().generate_pairs(templates.path(), &items, &["en", "fr"], out.path())?;

    assert_eq!(written.len(), 4);
    assert_eq!(
        fs::read_to_string(out.path().join("5000-g-table-en.html"))?,
        "<h1>Form 5000-g</h1>\r\n"
    );
    // Windows-1252 templates produce Windows-1252 documents
    assert_eq!(
        fs::read(out.path().join("1234-a-table-fr.htm"))?,
        b"<h1>Formulaire 1234-a \xE9t\xE9</h1>\n".to_vec()
    );
    Ok(())
}

#[test]
fn test_generate_pairs_withExistingDocument_shouldKeepItUnlessForced() -> Result<()> {
    let templates = common::create_temp_dir()?;
    let out = common::create_temp_dir()?;
    common::create_test_file(templates.path(), "template-en.html", "[[ID]]")?;
    common::create_test_file(out.path(), "1234-a-table-en.html", "hand edited")?;
    let items = vec!["1234-a".to_string()];

    let written = TemplateGenerator::new("[[ID]]", false).generate_pairs(templates.path(), &items, &["en"], out.path())?;
    assert!(written.is_empty());
    assert_eq!(fs::read_to_string(out.path().join("1234-a-table-en.html"))?, "hand edited");

    let written = TemplateGenerator::new("[[ID]]", true).generate_pairs(templates.path(), &items, &["en"], out.path())?;
    assert_eq!(written.len(), 1);
    assert_eq!(fs::read_to_string(out.path().join("1234-a-table-en.html"))?, "1234-a");
    Ok(())
}

#[test]
fn test_generate_pairs_withMissingTemplate_shouldFail() -> Result<()> {
    let templates = common::create_temp_dir()?;
    let out = common::create_temp_dir()?;
    common::create_test_file(templates.path(), "template-en.html", DEFAULT_TOKEN)?;

    let result = TemplateGenerator::default().generate_pairs(templates.path(), &["x".to_string()], &["en", "fr"], out.path());
    assert!(result.is_err());
    assert!(find_template(templates.path(), "fr").is_none());
    assert_eq!(find_template(templates.path(), "en").map(|(_, ext)| ext), Some("html"));
    Ok(())
}

mod common;

use std::fs;

use odk_transformer::{Error, StylesheetKind, Stylesheets, transformer_version};
use tempfile::TempDir;

#[test]
fn test_load_from_disk() {
    let dir = TempDir::new().unwrap();
    let form = dir.path().join("openrosa2html5form.xsl");
    let model = dir.path().join("openrosa2xmlmodel.xsl");
    fs::write(&form, common::FORM_XSL).unwrap();
    fs::write(&model, common::MODEL_XSL).unwrap();

    let stylesheets = Stylesheets::load(&form, &model).unwrap();
    assert_eq!(stylesheets.form.kind(), StylesheetKind::Form);
    assert_eq!(stylesheets.model.kind(), StylesheetKind::Model);
    assert_eq!(stylesheets.form.text(), common::FORM_XSL);
    assert!(stylesheets.form.declares("xmlns:jr"));
    assert!(!stylesheets.model.declares("xmlns:jr"));
    assert_eq!(
        stylesheets.version(),
        transformer_version(common::FORM_XSL, common::MODEL_XSL)
    );
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = Stylesheets::load(dir.path().join("a.xsl"), dir.path().join("b.xsl")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_malformed_stylesheet() {
    let err = Stylesheets::new("<xsl:stylesheet", common::MODEL_XSL).unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    assert!(err.to_string().contains("form stylesheet"));
}

#[test]
fn test_version_tracks_content() {
    let a = Stylesheets::new(common::FORM_XSL, common::MODEL_XSL).unwrap();
    let b = Stylesheets::new(common::FORM_XSL.replace("Survey", "Other"), common::MODEL_XSL).unwrap();
    assert_ne!(a.version(), b.version());
    assert_eq!(a.version(), a.version());
}

//! Tests for the literal patcher.

#![expect(clippy::expect_used, reason = "tests use expect for clarity")]

use rstest::rstest;

use crate::{RewriteError, patch};

const THREE_LINE_FILE: &str = "class C {\n  string expected = @\"old\";\n}";

#[test]
fn patch_replaces_single_declaration() {
    let patched = patch(THREE_LINE_FILE, 2, "new").expect("patch");
    assert_eq!(patched, "class C {\n  new\n}");
}

#[test]
fn patch_preserves_leading_whitespace() {
    let content = "fn t() {\n\t\tvar expected = @\"old\";\n}";
    let patched = patch(content, 2, "var expected = @\"new\";").expect("patch");
    assert_eq!(patched, "fn t() {\n\t\tvar expected = @\"new\";\n}");
}

#[test]
fn patch_touches_nothing_outside_the_declaration() {
    let content = "before();\n  string expected = @\"old\";\nafter();\n";
    let patched = patch(content, 2, "string expected = @\"new\";").expect("patch");
    assert_eq!(patched, "before();\n  string expected = @\"new\";\nafter();\n");
}

#[rstest]
#[case("var expected = @\"old\";", "var keyword")]
#[case("string expected = @\"old\";", "string keyword")]
#[case("string expected=@\"old\";", "no spaces around assignment")]
#[case("string   expected   =   @\"old\";", "extra whitespace")]
#[case("string expected = @\"say \"\"hi\"\"\";", "doubled-quote escape")]
fn patch_matches_declaration_variants(#[case] declaration: &str, #[case] description: &str) {
    let content = format!("header\n{declaration}\nfooter\n");
    let patched = patch(&content, 2, "X").expect(description);
    assert_eq!(patched, "header\nX\nfooter\n");
}

#[test]
fn patch_handles_literal_spanning_lines() {
    let content = "one\nstring expected = @\"first\nsecond\";\nlast\n";
    let patched = patch(content, 2, "Y").expect("patch");
    assert_eq!(patched, "one\nY\nlast\n");
}

#[test]
fn patch_picks_nearest_declaration_at_or_above_line() {
    let content = concat!(
        "string expected = @\"a\";\n", // line 1
        "middle();\n",                 // line 2
        "string expected = @\"b\";\n", // line 3
        "assert();\n",                 // line 4
        "string expected = @\"c\";\n", // line 5
    );
    let patched = patch(content, 4, "PATCHED").expect("patch");
    assert_eq!(
        patched,
        "string expected = @\"a\";\nmiddle();\nPATCHED\nassert();\nstring expected = @\"c\";\n",
    );
}

#[test]
fn patch_never_selects_a_declaration_below_the_line() {
    let content = "assert();\nstring expected = @\"below\";\n";
    let error = patch(content, 1, "X").expect_err("no declaration above line 1");
    assert!(matches!(error, RewriteError::PatternNotFound { line: 1 }));
}

#[test]
fn patch_fails_when_line_exceeds_file() {
    let content = "l1\nl2\nl3\nl4\nl5\nl6\nl7\nl8\nl9\nl10";
    let error = patch(content, 50, "X").expect_err("line 50 of a 10-line file");
    assert!(matches!(
        error,
        RewriteError::LineOutOfRange {
            line: 50,
            total: 10
        }
    ));
}

#[test]
fn patch_fails_without_any_declaration() {
    let content = "fn main() {\n    run();\n}\n";
    let error = patch(content, 2, "X").expect_err("pattern-free file");
    assert!(matches!(error, RewriteError::PatternNotFound { line: 2 }));
}

#[rstest]
#[case("string expectedValue = @\"x\";", "identifier must be exactly expected")]
#[case("string expected = \"x\";", "literal must be verbatim")]
#[case("strings expected = @\"x\";", "keyword must be var or string")]
#[case("string expected = @\"x\"", "terminator is required")]
#[case("string expected @\"x\";", "assignment is required")]
fn patch_rejects_lookalike_declarations(#[case] declaration: &str, #[case] description: &str) {
    let content = format!("{declaration}\n");
    let error = patch(&content, 1, "X").expect_err(description);
    assert!(matches!(error, RewriteError::PatternNotFound { .. }));
}

#[test]
fn patch_supports_crlf_line_endings() {
    let content = "class C {\r\n  string expected = @\"old\";\r\n}\r\n";
    let patched = patch(content, 2, "NEW").expect("patch");
    assert_eq!(patched, "class C {\r\n  NEW\r\n}\r\n");
}

#[test]
fn patch_accepts_declaration_mid_file_without_indentation() {
    let content = "x\nvar expected = @\"v\";\ny\n";
    let patched = patch(content, 3, "Z").expect("declaration above target line");
    assert_eq!(patched, "x\nZ\ny\n");
}

#[test]
fn patch_rejects_line_zero() {
    let error = patch("string expected = @\"x\";\n", 0, "X").expect_err("line numbers are 1-based");
    assert!(matches!(error, RewriteError::LineOutOfRange { line: 0, .. }));
}

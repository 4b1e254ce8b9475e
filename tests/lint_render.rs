//! Lint: detect bracket-key text (`[X]`) drawn without click registration.
//!
//! Any `[X]`-style hint drawn on the page must be registered as a click
//! target via `push_clickable()`, otherwise it is unreachable on touch
//! screens where the keyboard shortcut does not exist.
//!
//! This test scans the drawing modules and flags `push(` calls whose
//! arguments contain bracket-key patterns.

use std::fs;
use std::path::Path;

/// Files that build `ClickableList`s.
const DRAWING_SOURCES: &[&str] = &["src/view.rs", "src/widgets.rs", "src/main.rs"];

/// Check if a string contains a bracket-key pattern like `[R]` or `[1]`.
fn contains_bracket_key(s: &str) -> bool {
    s.as_bytes().windows(3).any(|w| {
        w[0] == b'[' && w[2] == b']' && (w[1].is_ascii_alphanumeric() || b"-=!~|".contains(&w[1]))
    })
}

/// Text of the `.push(...)` call starting at `start` in `lines`, up to the
/// matching close paren, joined across lines.
fn push_call(lines: &[&str], start: usize) -> String {
    let mut call = String::new();
    let mut depth = 0i32;
    let first = &lines[start][lines[start].find(".push(").unwrap_or(0)..];

    for line in std::iter::once(first).chain(lines[start + 1..].iter().copied()) {
        for ch in line.chars() {
            call.push(ch);
            match ch {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return call;
                    }
                }
                _ => {}
            }
        }
        call.push('\n');
    }
    call
}

/// Scan source for non-clickable `push(` calls containing bracket-key
/// patterns, including hints on the lines after the call opens.
fn find_bracket_key_in_push(source: &str) -> Vec<(usize, String)> {
    let lines: Vec<&str> = source.lines().collect();
    (0..lines.len())
        .filter(|&i| {
            let trimmed = lines[i].trim();
            !trimmed.starts_with("//") && lines[i].contains(".push(")
        })
        .filter(|&i| contains_bracket_key(&push_call(&lines, i)))
        .map(|i| (i + 1, lines[i].trim().to_string()))
        .collect()
}

#[test]
fn no_bracket_keys_in_non_clickable_push() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut msg = String::new();

    for file in DRAWING_SOURCES {
        let source = fs::read_to_string(root.join(file))
            .unwrap_or_else(|e| panic!("cannot read {}: {}", file, e));
        for (line_num, line) in find_bracket_key_in_push(&source) {
            msg.push_str(&format!("  {}:{}: {}\n", file, line_num, line));
        }
    }

    assert!(
        msg.is_empty(),
        "Found bracket-key text [X] in non-clickable push() calls.\n\
         Use push_clickable() so the hint can be tapped.\n\n{}",
        msg
    );
}

#[test]
fn detects_bracket_key_in_push() {
    let source = r#"cl.push(Line::from("Not connected. [R] Retry"));"#;
    assert_eq!(find_bracket_key_in_push(source).len(), 1);
}

#[test]
fn allows_push_clickable() {
    let source = r#"cl.push_clickable(Line::from("Not connected. [R] Retry"), RETRY_BOOTSTRAP);"#;
    assert!(find_bracket_key_in_push(source).is_empty());
}

#[test]
fn detects_bracket_key_on_a_later_line() {
    let source = r#"
        cl.push(
            Line::from(Span::styled(
                "Not connected. [R] Retry",
                Style::default().fg(Color::Red),
            )),
        );
        cl.push(Line::from("Synced with server"));
    "#;
    let violations = find_bracket_key_in_push(source);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].0, 2);
}

#[test]
fn allows_multi_line_push_clickable() {
    let source = r#"
        cl.push_clickable(
            Line::from(Span::styled(
                "Not connected. [R] Retry",
                Style::default().fg(Color::Red),
            )),
            RETRY_BOOTSTRAP,
        );
    "#;
    assert!(find_bracket_key_in_push(source).is_empty());
}

#[test]
fn ignores_comments() {
    let source = r#"// cl.push(Line::from("[R] Retry"));"#;
    assert!(find_bracket_key_in_push(source).is_empty());
}

#[test]
fn bracket_key_detection() {
    assert!(contains_bracket_key("[R]"));
    assert!(contains_bracket_key("[1]"));
    assert!(contains_bracket_key("[-]"));
    assert!(!contains_bracket_key("[]"));
    assert!(!contains_bracket_key("[RR]"));
    assert!(!contains_bracket_key("abc"));
}

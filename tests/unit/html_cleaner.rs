//! HTML cleaning policy tests

use pretty_assertions::assert_eq;
use test_log::test;

use crate::common::fixtures::quote_page;
use stock_fixture_tools::html_cleaner::{clean_html, CleanerPolicy};

fn clean(input: &str) -> String {
    clean_with(input, &CleanerPolicy::fixture())
}

fn clean_with(input: &str, policy: &CleanerPolicy) -> String {
    let cleaned = clean_html(input.as_bytes(), policy).unwrap();
    String::from_utf8(cleaned).unwrap()
}

/// Policy with every option turned off
fn nothing() -> CleanerPolicy {
    CleanerPolicy {
        javascript: false,
        style: false,
        meta: false,
        comments: false,
        links: false,
        embedded: false,
        frames: false,
        forms: false,
        annoying_tags: false,
        page_structure: false,
        safe_attrs_only: false,
        remove_unknown_tags: false,
    }
}

#[test]
fn test_style_and_handlers_removed_custom_tag_kept() {
    let cleaned = clean(
        r#"<html><head><style>.a{}</style></head><body onclick="x()">hi<custom-tag>y</custom-tag></body></html>"#,
    );

    assert!(!cleaned.contains("<style"));
    assert!(!cleaned.contains(".a{}"));
    assert!(!cleaned.contains("onclick"));
    assert!(cleaned.contains("<custom-tag>y</custom-tag>"));
    assert_eq!(cleaned, "<div><body>hi<custom-tag>y</custom-tag></body></div>");
}

#[test]
fn test_quote_page_stripped() {
    let cleaned = clean(quote_page());

    for removed in [
        "<script",
        "window.root",
        "<style",
        "color: red",
        "<meta",
        "<link",
        "<html",
        "<head",
        "<title",
        "style=",
        "onload",
        "onclick",
        "javascript:",
        "data-symbol",
        "quote table",
    ] {
        assert!(!cleaned.contains(removed), "found {:?} in {}", removed, cleaned);
    }

    assert!(cleaned.contains("SPY quote"));
    assert!(cleaned.contains(r#"<div id="quote-header">SPDR S&amp;P 500 ETF</div>"#));
    assert!(cleaned.contains(r#"<fin-streamer value="452.1">452.10</fin-streamer>"#));
    assert!(cleaned.contains(r#"<a href="">Watchlist</a>"#));
    assert!(cleaned.contains(r#"<td class="price">452.10</td>"#));
}

#[test]
fn test_embedded_frames_forms_and_links_stripped() {
    let cleaned = clean(concat!(
        r#"<link rel="preload" href="a.js">"#,
        r#"<iframe src="x"></iframe><object data="y"></object><embed src="z">"#,
        r#"<blink>b</blink>"#,
        r#"<form action="/q"><input name="s"><button>Go</button></form>"#,
        r#"<p data-foo="1">t</p>"#,
        r#"<applet code="A">applet body</applet>"#,
    ));

    assert_eq!(cleaned, "b<p>t</p>");
}

#[test]
fn test_frames_removed() {
    let cleaned = clean(r#"<frameset cols="50%,50%"><frame src="left.html"><frame src="right.html"></frameset>"#);

    assert!(!cleaned.contains("<frame"));
    assert!(!cleaned.contains("left.html"));
}

#[test]
fn test_marquee_unwrapped_keeps_text() {
    assert_eq!(clean("<p><marquee>SPY up</marquee></p>"), "<p>SPY up</p>");
}

#[test]
fn test_cleaning_is_deterministic_and_idempotent() {
    let first = clean(quote_page());
    let second = clean(quote_page());
    assert_eq!(first, second);

    let again = clean(&first);
    assert_eq!(again, first);
}

#[test]
fn test_disabled_options_leave_markup() {
    let policy = CleanerPolicy {
        meta: true,
        ..nothing()
    };
    let input = r#"<head><meta charset="utf-8"><script>go()</script></head><p style="x" onclick="y()" data-k="v"><!-- c -->text</p><iframe src="f"></iframe>"#;
    let cleaned = clean_with(input, &policy);

    assert!(!cleaned.contains("<meta"));
    assert!(cleaned.contains("<head>"));
    assert!(cleaned.contains("<script>go()</script>"));
    assert!(cleaned.contains(r#"style="x""#));
    assert!(cleaned.contains(r#"onclick="y()""#));
    assert!(cleaned.contains(r#"data-k="v""#));
    assert!(cleaned.contains("<!-- c -->"));
    assert!(cleaned.contains(r#"<iframe src="f"></iframe>"#));
}

#[test]
fn test_stylesheet_links_removed_when_links_kept() {
    let policy = CleanerPolicy {
        style: true,
        ..nothing()
    };
    let cleaned = clean_with(
        r#"<link rel="stylesheet" href="a.css"><link rel="canonical" href="/spy">"#,
        &policy,
    );

    assert_eq!(cleaned, r#"<link rel="canonical" href="/spy">"#);
}

#[test]
fn test_remove_unknown_tags_keeps_content() {
    let policy = CleanerPolicy {
        remove_unknown_tags: true,
        ..CleanerPolicy::fixture()
    };

    assert_eq!(
        clean_with("<div><custom-tag>y</custom-tag></div>", &policy),
        "<div>y</div>"
    );
}

#[test]
fn test_plain_markup_passes_through() {
    let input = r#"<body><p class="quote">SPY 452.10</p></body>"#;
    assert_eq!(clean(input), input);
}

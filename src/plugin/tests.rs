//! End-to-end rendering through an engine with the plugin installed.

use super::*;
use crate::engine::{EngineOptions, QuoteGlyphs};
use crate::typography::{typographer, typographer_with};

const SENTENCE: &str = "Some \"text\" that's containing smart quotes(tm)";

fn engine() -> Engine {
    Engine::new(EngineOptions::typographic())
        .with_plugin(AttrTypographer::new(AttrTypographerOptions { html: true }))
}

fn french_quotes() -> QuoteGlyphs {
    QuoteGlyphs::new(["«\u{a0}", "\u{a0}»", "‹\u{a0}", "\u{a0}›"]).unwrap()
}

// ============================================================================
// Exposed callable
// ============================================================================

#[test]
fn test_standalone_typographer() {
    assert_eq!(
        typographer(SENTENCE),
        "Some “text” that’s containing smart quotes™"
    );
}

#[test]
fn test_engine_callable() {
    assert_eq!(
        engine().typographic_transform(SENTENCE),
        "Some “text” that’s containing smart quotes™"
    );
}

#[test]
fn test_typographer_off_is_identity() {
    let engine = Engine::default().with_plugin(AttrTypographer::default());
    assert_eq!(engine.typographer_mode(), TypographerMode::Identity);
    assert_eq!(engine.typographic_transform(SENTENCE), SENTENCE);
    assert!(!engine.core().contains(RULE_NAME));
}

#[test]
fn test_french_quotes() {
    let expected = "Some «\u{a0}text\u{a0}» that’s containing ‹\u{a0}smart\u{a0}› quotes™";
    let input = "Some \"text\" that's containing 'smart' quotes(tm)";

    assert_eq!(typographer_with(input, &french_quotes()), expected);

    let engine = Engine::new(EngineOptions::typographic().with_quotes(french_quotes()))
        .with_plugin(AttrTypographer::default());
    assert_eq!(engine.typographic_transform(input), expected);
}

// ============================================================================
// Link and image attributes
// ============================================================================

#[test]
fn test_link_title() {
    assert_eq!(
        engine().render("Some [link](/whatever \"With it's title(tm)\")"),
        "<p>Some <a href=\"/whatever\" title=\"With it’s title™\">link</a></p>\n"
    );
}

#[test]
fn test_link_title_untouched_without_typographer() {
    let engine = Engine::default().with_plugin(AttrTypographer::default());
    assert_eq!(
        engine.render("Some [link](/whatever \"With it's title(tm)\")"),
        "<p>Some <a href=\"/whatever\" title=\"With it's title(tm)\">link</a></p>\n"
    );
}

#[test]
fn test_image_alt_and_title() {
    assert_eq!(
        engine().render("Some ![Image(tm) with \"quotes\"](/whatever \"With it's title(tm)\")"),
        "<p>Some <img src=\"/whatever\" alt=\"Image™ with “quotes”\" title=\"With it’s title™\"></p>\n"
    );
}

#[test]
fn test_image_alt_with_markup() {
    assert_eq!(
        engine().render(
            "Some ![Image(tm) with \"quotes\" and *garbage* [in](/link) alt](/whatever \"With it's title(tm)\")"
        ),
        "<p>Some <img src=\"/whatever\" alt=\"Image™ with “quotes” and garbage in alt\" title=\"With it’s title™\"></p>\n"
    );
}

#[test]
fn test_reference_link_titles() {
    let engine = engine();
    assert_eq!(
        engine.render("Some [link] reference\n\n[link]: /link \"With it's title(tm)\""),
        "<p>Some <a href=\"/link\" title=\"With it’s title™\">link</a> reference</p>\n"
    );
    assert_eq!(
        engine.render("Some [link] reference\n\n[link]: /link 'With \"quoted\" title(tm)'"),
        "<p>Some <a href=\"/link\" title=\"With “quoted” title™\">link</a> reference</p>\n"
    );
    assert_eq!(
        engine.render("Some [link] reference\n\n[link]: /link (With parens' and \"quotes\" title)"),
        "<p>Some <a href=\"/link\" title=\"With parens’ and “quotes” title\">link</a> reference</p>\n"
    );
}

#[test]
fn test_autolink_href_untouched() {
    assert_eq!(
        engine().render("<https://example.com/(c)>"),
        "<p><a href=\"https://example.com/(c)\">https://example.com/(c)</a></p>\n"
    );
}

// ============================================================================
// Raw HTML
// ============================================================================

#[test]
fn test_inline_html_entities() {
    assert_eq!(
        engine().render(
            "Some <a href=\"/link\" title=\"With &quot;quoted&quot; title(tm)\">link</a>"
        ),
        "<p>Some <a href=\"/link\" title=\"With “quoted” title™\">link</a></p>\n"
    );
}

#[test]
fn test_raw_html_untouched_without_html_option() {
    let engine =
        Engine::new(EngineOptions::typographic()).with_plugin(AttrTypographer::default());
    let src = "Some <a href=\"/link\" title=\"With parens' and &quot;quotes&quot; title(tm)\">link</a>";
    assert_eq!(
        engine.render(src),
        "<p>Some <a href=\"/link\" title=\"With parens' and &quot;quotes&quot; title(tm)\">link</a></p>\n"
    );
}

#[test]
fn test_html_block_mixed_quotes() {
    let engine = engine();
    assert_eq!(
        engine.render(
            "<figure class=\"whatever\"><img alt='Image(tm) with \"quotes\"' title=Hello(tm) src=\"/whatever\"></figure>"
        ),
        "<figure class=\"whatever\"><img alt='Image™ with “quotes”' title=Hello™ src=\"/whatever\"></figure>"
    );
    assert_eq!(
        engine.render(
            "<figure class=\"whatever\"><img alt=\"Image(tm) with &quot;quotes&quot;\" title=Hello(tm) src=\"/whatever\"></figure>"
        ),
        "<figure class=\"whatever\"><img alt=\"Image™ with “quotes”\" title=Hello™ src=\"/whatever\"></figure>"
    );
}

#[test]
fn test_markdown_inside_html_block() {
    let engine = engine();
    assert_eq!(
        engine.render("<div class=\"whatever\">\n\nSome [link](/whatever \"With it's title(tm)\")\n\n</div>"),
        "<div class=\"whatever\">\n<p>Some <a href=\"/whatever\" title=\"With it’s title™\">link</a></p>\n</div>"
    );
    assert_eq!(
        engine.render(
            "<div class=\"whatever\">\n\nSome <abbr title='Abbreviation(tm) with \"quotes\"'>*AWQ(tm)*</abbr>\n\n</div>"
        ),
        "<div class=\"whatever\">\n<p>Some <abbr title='Abbreviation™ with “quotes”'><em>AWQ™</em></abbr></p>\n</div>"
    );
}

#[test]
fn test_heading_with_small() {
    let engine = engine();
    let expected =
        "<h1>Title <small><a href=\"/whatever\" title=\"With it’s title™\">link</a></small></h1>\n";
    assert_eq!(
        engine.render("# Title <small>[link](/whatever \"With it's title(tm)\")</small>"),
        expected
    );
    assert_eq!(
        engine.render(
            "# Title <small><a href=\"/whatever\" title=\"With it's title(tm)\">link</a></small>"
        ),
        expected
    );
}

#[test]
fn test_comments_untouched() {
    assert_eq!(
        engine().render("# Title(tm)\n\n<!-- Don't mess with comments! -->\n\nHello \"world\""),
        "<h1>Title™</h1>\n<!-- Don't mess with comments! -->\n<p>Hello “world”</p>\n"
    );
}

// ============================================================================
// Installation
// ============================================================================

#[test]
fn test_rule_runs_last() {
    let engine = engine();
    assert_eq!(
        engine.core().names().collect::<Vec<_>>(),
        ["replacements", "smartquotes", RULE_NAME]
    );
}

#[test]
fn test_reinstall_is_noop() {
    let mut engine = engine();
    engine.use_plugin(AttrTypographer::default());
    assert_eq!(engine.core().len(), 3);

    // The first installation's `html` option still applies.
    assert_eq!(
        engine.render("<abbr title=\"x(tm)\">X</abbr>"),
        "<p><abbr title=\"x™\">X</abbr></p>\n"
    );
}

#[test]
fn test_live_options_after_install() {
    let mut engine = engine();
    let src = "[link](/x \"it's(tm)\")";
    assert_eq!(
        engine.render(src),
        "<p><a href=\"/x\" title=\"it’s™\">link</a></p>\n"
    );

    engine.options_mut().typographer = false;
    assert_eq!(
        engine.render(src),
        "<p><a href=\"/x\" title=\"it's(tm)\">link</a></p>\n"
    );
    assert_eq!(engine.typographic_transform("(tm)"), "(tm)");

    engine.options_mut().typographer = true;
    engine.options_mut().quotes = french_quotes();
    assert_eq!(
        engine.typographic_transform("\"q\""),
        "«\u{a0}q\u{a0}»"
    );
}

#[test]
fn test_parse_keeps_token_shape() {
    let plain = Engine::new(EngineOptions::typographic());
    let src = "Some ![a *b* \"c\"](/x \"t(tm)\") and <abbr title=\"y(tm)\">Y</abbr>";

    let before = plain.parse(src);
    let after = engine().parse(src);

    assert_eq!(before.len(), after.len());
    let shape = |tokens: &[crate::token::Token]| {
        tokens
            .iter()
            .flat_map(|t| std::iter::once(t).chain(t.children.iter()))
            .map(|t| (t.kind, t.children.len(), t.attrs.len()))
            .collect::<Vec<_>>()
    };
    assert_eq!(shape(&before), shape(&after));
}

//! Markdown to token stream conversion using pulldown-cmark.
//!
//! pulldown-cmark yields a flat event stream; this module folds it into the
//! token layout the core rules expect:
//!
//! ```text
//! paragraph_open
//! inline  { content: "Some *text*", children: [text, em_open, text, em_close] }
//! paragraph_close
//! ```
//!
//! Image alt text is parsed into the image token's own `children`, with
//! nesting levels starting from zero again.

use std::ops::Range;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, LinkType, Options, Parser, Tag};

use crate::engine::EngineOptions;
use crate::token::{Attrs, Token, TokenKind, plain_text};

/// Characters percent-encoded in link targets. `%` is kept so existing
/// escapes survive.
const LINK_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Convert Markdown source to a block-level token list.
pub fn tokenize(src: &str, options: &EngineOptions) -> Vec<Token> {
    TokenBuilder::new(src, options.html).convert()
}

/// Percent-encode unsafe characters in a link target.
pub fn normalize_link(url: &str) -> String {
    utf8_percent_encode(url, LINK_ENCODE_SET).to_string()
}

// =============================================================================
// Builder State
// =============================================================================

/// What to do when the matching `End` event arrives.
enum Frame {
    /// Block wrapper: emit this close token.
    Block(TokenKind, &'static str),
    /// Inline wrapper: emit this close token.
    Inline(TokenKind, &'static str, &'static str),
    Image,
    Code(Option<String>),
    HtmlBlock,
    /// Construct without a token of its own; contents still flow through.
    Transparent,
}

/// Child list being filled, with its own nesting level.
#[derive(Default)]
struct Sink {
    children: Vec<Token>,
    level: u32,
}

/// Inline container under construction.
struct InlineBuf {
    /// Source span covered so far.
    span: Range<usize>,
    /// Root sink, then one sink per open image.
    sinks: Vec<Sink>,
    /// Image tokens waiting for their alt children.
    images: Vec<Token>,
}

impl InlineBuf {
    fn new(span: Range<usize>) -> Self {
        Self {
            span,
            sinks: vec![Sink::default()],
            images: Vec::new(),
        }
    }

    fn sink(&mut self) -> &mut Sink {
        // Never empty: the root sink is only taken in `into_token`.
        let last = self.sinks.len() - 1;
        &mut self.sinks[last]
    }

    fn into_token(mut self, src: &str) -> Token {
        // Unterminated images keep whatever alt text they collected.
        while let Some(image) = self.images.pop() {
            let sink = self.sinks.pop().unwrap_or_default();
            let mut image = finish_image(image, sink.children);
            if let Some(parent) = self.sinks.last_mut() {
                image.level = parent.level;
                parent.children.push(image);
            }
        }
        let children = self.sinks.pop().map(|s| s.children).unwrap_or_default();
        let content = src.get(self.span.clone()).unwrap_or_default();
        Token::inline(content.trim_end(), children)
    }
}

/// Markdown to token converter
struct TokenBuilder<'s> {
    src: &'s str,
    /// Keep raw HTML as HTML tokens (otherwise it becomes text).
    html: bool,
    tokens: Vec<Token>,
    frames: Vec<Frame>,
    inline: Option<InlineBuf>,
    /// Text of the code block or HTML block being collected.
    raw: Option<String>,
}

impl<'s> TokenBuilder<'s> {
    fn new(src: &'s str, html: bool) -> Self {
        Self {
            src,
            html,
            tokens: Vec::new(),
            frames: Vec::new(),
            inline: None,
            raw: None,
        }
    }

    fn convert(mut self) -> Vec<Token> {
        let parser = Parser::new_ext(self.src, Options::ENABLE_STRIKETHROUGH).into_offset_iter();

        for (event, range) in parser {
            self.handle_event(event, range);
        }

        self.flush_inline();
        self.tokens
    }

    /// Handle a single pulldown-cmark event
    fn handle_event(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => self.start_tag(tag, range),
            Event::End(_) => self.end_tag(),
            Event::Text(text) => match self.raw.as_mut() {
                Some(raw) => raw.push_str(&text),
                None => self.add_text(&text, range),
            },
            Event::Html(html) => match self.raw.as_mut() {
                Some(raw) => raw.push_str(&html),
                None => self.add_raw_html(&html, range),
            },
            Event::InlineHtml(html) => self.add_raw_html(&html, range),
            Event::Code(code) => {
                let token = Token::new(TokenKind::CodeInline, "code").with_content(code.to_string());
                self.add_inline(token, range);
            }
            Event::SoftBreak => self.add_inline(Token::new(TokenKind::Softbreak, ""), range),
            Event::HardBreak => self.add_inline(Token::new(TokenKind::Hardbreak, "br"), range),
            Event::Rule => {
                self.flush_inline();
                self.tokens.push(Token::new(TokenKind::Hr, "hr"));
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.add_text(marker, range);
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                let src = self.src;
                self.add_text(&src[range.clone()], range);
            }
        }
    }

    /// Start a new tag (push onto frame stack)
    fn start_tag(&mut self, tag: Tag<'_>, range: Range<usize>) {
        let frame = match tag {
            Tag::Paragraph => self.open_block(TokenKind::ParagraphOpen, "p", Attrs::new()),
            Tag::Heading { level, .. } => {
                self.open_block(TokenKind::HeadingOpen, heading_tag(level), Attrs::new())
            }
            Tag::BlockQuote(_) => {
                self.open_block(TokenKind::BlockquoteOpen, "blockquote", Attrs::new())
            }
            Tag::List(Some(start)) => {
                let attrs = if start != 1 {
                    Attrs::from([("start", start.to_string())])
                } else {
                    Attrs::new()
                };
                self.open_block(TokenKind::OrderedListOpen, "ol", attrs)
            }
            Tag::List(None) => self.open_block(TokenKind::BulletListOpen, "ul", Attrs::new()),
            Tag::Item => self.open_block(TokenKind::ListItemOpen, "li", Attrs::new()),
            Tag::CodeBlock(kind) => {
                self.flush_inline();
                self.raw = Some(String::new());
                match kind {
                    CodeBlockKind::Fenced(info) => Frame::Code(Some(info.to_string())),
                    CodeBlockKind::Indented => Frame::Code(None),
                }
            }
            Tag::HtmlBlock => {
                self.flush_inline();
                self.raw = Some(String::new());
                Frame::HtmlBlock
            }
            Tag::Emphasis => self.open_inline(TokenKind::EmOpen, "em", Attrs::new(), "", range),
            Tag::Strong => {
                self.open_inline(TokenKind::StrongOpen, "strong", Attrs::new(), "", range)
            }
            Tag::Strikethrough => {
                self.open_inline(TokenKind::StrikethroughOpen, "s", Attrs::new(), "", range)
            }
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                let (href, info) = match link_type {
                    LinkType::Email => (format!("mailto:{dest_url}"), "auto"),
                    LinkType::Autolink => (dest_url.to_string(), "auto"),
                    _ => (dest_url.to_string(), ""),
                };
                let mut attrs = Attrs::from([("href", normalize_link(&href))]);
                if !title.is_empty() {
                    attrs.set("title", title.to_string());
                }
                self.open_inline(TokenKind::LinkOpen, "a", attrs, info, range)
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let mut attrs = Attrs::from([("src", normalize_link(&dest_url)), ("alt", String::new())]);
                if !title.is_empty() {
                    attrs.set("title", title.to_string());
                }
                let inline = self.inline_at(range);
                inline
                    .images
                    .push(Token::new(TokenKind::Image, "img").with_attrs(attrs));
                inline.sinks.push(Sink::default());
                Frame::Image
            }
            _ => Frame::Transparent,
        };
        self.frames.push(frame);
    }

    /// End a tag (pop from frame stack)
    fn end_tag(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };

        match frame {
            Frame::Block(kind, tag) => {
                self.flush_inline();
                self.tokens.push(Token::new(kind, tag));
            }
            Frame::Inline(kind, tag, info) => {
                if let Some(inline) = self.inline.as_mut() {
                    let sink = inline.sink();
                    sink.level = sink.level.saturating_sub(1);
                    let mut token = Token::new(kind, tag).with_level(sink.level);
                    token.info = info.to_string();
                    sink.children.push(token);
                }
            }
            Frame::Image => {
                let Some(inline) = self.inline.as_mut() else {
                    return;
                };
                if let (Some(image), Some(alt)) = (inline.images.pop(), inline.sinks.pop()) {
                    let sink = inline.sink();
                    let image = finish_image(image, alt.children).with_level(sink.level);
                    sink.children.push(image);
                }
            }
            Frame::Code(info) => {
                let content = self.raw.take().unwrap_or_default();
                let token = match info {
                    Some(info) => {
                        let mut token = Token::new(TokenKind::Fence, "code").with_content(content);
                        token.info = info;
                        token
                    }
                    None => Token::new(TokenKind::CodeBlock, "code").with_content(content),
                };
                self.tokens.push(token);
            }
            Frame::HtmlBlock => {
                let content = self.raw.take().unwrap_or_default();
                self.push_html_block(content);
            }
            Frame::Transparent => {}
        }
    }

    fn open_block(&mut self, kind: TokenKind, tag: &'static str, attrs: Attrs) -> Frame {
        self.flush_inline();
        self.tokens.push(Token::new(kind, tag).with_attrs(attrs));
        let close = match kind {
            TokenKind::ParagraphOpen => TokenKind::ParagraphClose,
            TokenKind::HeadingOpen => TokenKind::HeadingClose,
            TokenKind::BlockquoteOpen => TokenKind::BlockquoteClose,
            TokenKind::OrderedListOpen => TokenKind::OrderedListClose,
            TokenKind::BulletListOpen => TokenKind::BulletListClose,
            _ => TokenKind::ListItemClose,
        };
        Frame::Block(close, tag)
    }

    fn open_inline(
        &mut self,
        kind: TokenKind,
        tag: &'static str,
        attrs: Attrs,
        info: &'static str,
        range: Range<usize>,
    ) -> Frame {
        let close = match kind {
            TokenKind::EmOpen => TokenKind::EmClose,
            TokenKind::StrongOpen => TokenKind::StrongClose,
            TokenKind::StrikethroughOpen => TokenKind::StrikethroughClose,
            _ => TokenKind::LinkClose,
        };

        let sink = self.inline_at(range).sink();
        let mut token = Token::new(kind, tag).with_attrs(attrs).with_level(sink.level);
        token.info = info.to_string();
        sink.children.push(token);
        sink.level += 1;

        Frame::Inline(close, tag, info)
    }

    /// Add text content, merging with a directly preceding text token.
    fn add_text(&mut self, text: &str, range: Range<usize>) {
        if text.is_empty() {
            return;
        }
        let sink = self.inline_at(range).sink();
        match sink.children.last_mut() {
            Some(last) if last.kind == TokenKind::Text && last.level == sink.level => {
                last.content.push_str(text);
            }
            _ => {
                let token = Token::text(text).with_level(sink.level);
                sink.children.push(token);
            }
        }
    }

    /// Add raw HTML met outside an HTML block.
    fn add_raw_html(&mut self, html: &str, range: Range<usize>) {
        if self.html {
            let token = Token::new(TokenKind::HtmlInline, "").with_content(html);
            self.add_inline(token, range);
        } else {
            self.add_text(html, range);
        }
    }

    fn add_inline(&mut self, token: Token, range: Range<usize>) {
        let sink = self.inline_at(range).sink();
        let token = token.with_level(sink.level);
        sink.children.push(token);
    }

    /// Emit a finished HTML block, as text when raw HTML is disabled.
    fn push_html_block(&mut self, content: String) {
        if self.html {
            self.tokens
                .push(Token::new(TokenKind::HtmlBlock, "").with_content(content));
            return;
        }

        let text = content.trim_end().to_string();
        self.tokens.push(Token::new(TokenKind::ParagraphOpen, "p"));
        self.tokens
            .push(Token::inline(text.clone(), vec![Token::text(text)]));
        self.tokens.push(Token::new(TokenKind::ParagraphClose, "p"));
    }

    /// Open inline container, creating it on first use and widening its span.
    fn inline_at(&mut self, range: Range<usize>) -> &mut InlineBuf {
        let inline = self
            .inline
            .get_or_insert_with(|| InlineBuf::new(range.clone()));
        inline.span.start = inline.span.start.min(range.start);
        inline.span.end = inline.span.end.max(range.end);
        inline
    }

    /// Close the open inline container, if any.
    fn flush_inline(&mut self) {
        if let Some(inline) = self.inline.take() {
            self.tokens.push(inline.into_token(self.src));
        }
    }
}

/// Attach alt children to an image token.
fn finish_image(mut image: Token, children: Vec<Token>) -> Token {
    image.content = plain_text(&children);
    image.children = children;
    image
}

/// Convert heading level to tag name
fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Vec<Token> {
        tokenize(src, &EngineOptions::typographic())
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_paragraph() {
        let tokens = parse("Hello *world*");
        assert_eq!(
            kinds(&tokens),
            [TokenKind::ParagraphOpen, TokenKind::Inline, TokenKind::ParagraphClose]
        );
        assert_eq!(tokens[1].content, "Hello *world*");
        assert_eq!(
            kinds(&tokens[1].children),
            [TokenKind::Text, TokenKind::EmOpen, TokenKind::Text, TokenKind::EmClose]
        );
        assert_eq!(tokens[1].children[2].level, 1);
        assert_eq!(tokens[1].children[3].level, 0);
    }

    #[test]
    fn test_adjacent_text_merged() {
        let tokens = parse("Image(tm) with \"quotes\" [not a link");
        assert_eq!(tokens[1].children.len(), 1);
        assert_eq!(
            tokens[1].children[0].content,
            "Image(tm) with \"quotes\" [not a link"
        );
    }

    #[test]
    fn test_link_attrs() {
        let tokens = parse("[link](/whatever \"With it's title(tm)\")");
        let link = &tokens[1].children[0];
        assert_eq!(link.kind, TokenKind::LinkOpen);
        assert_eq!(link.attrs.get("href"), Some("/whatever"));
        assert_eq!(link.attrs.get("title"), Some("With it's title(tm)"));
    }

    #[test]
    fn test_reference_link_title() {
        let tokens = parse("Some [link] reference\n\n[link]: /link 'With \"quoted\" title(tm)'");
        let link = &tokens[1].children[1];
        assert_eq!(link.attrs.get("title"), Some("With \"quoted\" title(tm)"));
    }

    #[test]
    fn test_autolink_info() {
        let tokens = parse("<https://example.com>");
        let children = &tokens[1].children;
        assert!(children[0].is_autolink());
        assert!(children[2].is_autolink());

        let tokens = parse("<me@example.com>");
        assert_eq!(
            tokens[1].children[0].attrs.get("href"),
            Some("mailto:me@example.com")
        );
    }

    #[test]
    fn test_image_children() {
        let tokens = parse("![Image(tm) *garbage* [in](/link)](/x.png \"t\")");
        let image = &tokens[1].children[0];
        assert_eq!(image.kind, TokenKind::Image);
        assert_eq!(image.attrs.iter().map(|(k, _)| k).collect::<Vec<_>>(), ["src", "alt", "title"]);
        assert_eq!(image.content, "Image(tm) garbage in");
        assert_eq!(image.children[0].level, 0);
        assert!(image.children.iter().any(|t| t.kind == TokenKind::EmOpen));
        assert!(image.children.iter().any(|t| t.kind == TokenKind::LinkOpen));
    }

    #[test]
    fn test_html_tokens() {
        let tokens = parse("<div class=\"x\">\n\nSome <abbr title='t'>A</abbr>\n\n</div>");
        assert_eq!(tokens[0].kind, TokenKind::HtmlBlock);
        assert_eq!(tokens[0].content, "<div class=\"x\">\n");
        let children = &tokens[2].children;
        assert_eq!(children[1].kind, TokenKind::HtmlInline);
        assert_eq!(children[1].content, "<abbr title='t'>");
    }

    #[test]
    fn test_html_disabled_becomes_text() {
        let tokens = tokenize("Some <b>bold</b>", &EngineOptions::default());
        assert!(tokens[1].children.iter().all(|t| t.kind == TokenKind::Text));
    }

    #[test]
    fn test_tight_list_has_inline_in_item() {
        let tokens = parse("- one\n- two");
        assert_eq!(
            kinds(&tokens)[..4],
            [
                TokenKind::BulletListOpen,
                TokenKind::ListItemOpen,
                TokenKind::Inline,
                TokenKind::ListItemClose
            ]
        );
    }

    #[test]
    fn test_fence() {
        let tokens = parse("```rust\nlet x = \"y\";\n```");
        assert_eq!(tokens[0].kind, TokenKind::Fence);
        assert_eq!(tokens[0].info, "rust");
        assert_eq!(tokens[0].content, "let x = \"y\";\n");
    }

    #[test]
    fn test_normalize_link() {
        assert_eq!(normalize_link("/a b"), "/a%20b");
        assert_eq!(normalize_link("/ü?x=1&y=%20"), "/%C3%BC?x=1&y=%20");
    }
}

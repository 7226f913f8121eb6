//! Reference linking for markdown content.
//!
//! Markdown is parsed with pulldown-cmark and every text event is run through
//! the [`ReferenceScanner`]. Text with references becomes inline HTML: the
//! untouched pieces escaped, each reference wrapped in an anchor. Everything
//! else is emitted as pulldown-cmark would render it.
//!
//! Text is left alone inside links, images, blockquotes and code, and inside
//! raw `<a>`, `<button>` and `<blockquote>` elements. A reference there is
//! already interactive or is quoted material.
//!
//! The anchor carries `data-*` attributes so a client-side preview can fetch
//! the passage without parsing the link:
//!
//! ```html
//! <a class="bible-ref" href="/biblia/ara/joao/3#v16"
//!    data-book="joao" data-chapter="3" data-verses="16-18">Jo 3:16-18</a>
//! ```

use crate::config::ReferencesConfig;
use crate::reference::{Reference, ReferenceScanner, Segment};
use maud::{Markup, html};
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, TextMergeStream, html as md_html};

/// Raw HTML elements whose content is never linked.
const OPAQUE_HTML_TAGS: [&str; 3] = ["a", "button", "blockquote"];

/// Link target for a reference: the first chapter, anchored at its first
/// selected verse.
pub fn reference_href(reference: &Reference, config: &ReferencesConfig) -> String {
    let base = config.link_base.trim_end_matches('/');
    let mut href = format!("{base}/{}/{}", config.version, reference.book_slug);
    if let Some(first) = reference.chapters.first() {
        href.push_str(&format!("/{}", first.chapter));
        if let Some(verse) = first.first_verse() {
            href.push_str(&format!("#v{verse}"));
        }
    }
    href
}

/// Anchor element for one reference.
pub fn render_reference(reference: &Reference, config: &ReferencesConfig) -> Markup {
    let first = reference.chapters.first();
    let chapter = first.map(|c| c.chapter);
    let verses = first.and_then(|c| {
        let canonical = c.to_string();
        canonical.split_once(':').map(|(_, items)| items.to_string())
    });
    html! {
        a.bible-ref
            href=(reference_href(reference, config))
            data-book=(reference.book_slug)
            data-chapter=[chapter]
            data-verses=[verses] { (reference.full_match) }
    }
}

/// Render markdown to HTML with references linked.
///
/// Returns the HTML and the number of anchors emitted. References left
/// alone inside links, quotes and code are not counted.
pub fn render_markdown(
    markdown: &str,
    scanner: &ReferenceScanner<'_>,
    config: &ReferencesConfig,
) -> (String, usize) {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = TextMergeStream::new(Parser::new_ext(markdown, options));

    let mut opaque_depth: usize = 0;
    let mut linked = 0;
    let events = parser.map(|event| match event {
        Event::Start(
            Tag::Link { .. } | Tag::Image { .. } | Tag::BlockQuote(_) | Tag::CodeBlock(_),
        ) => {
            opaque_depth += 1;
            event
        }
        Event::End(TagEnd::Link | TagEnd::Image | TagEnd::BlockQuote(_) | TagEnd::CodeBlock) => {
            opaque_depth = opaque_depth.saturating_sub(1);
            event
        }
        Event::Html(ref raw) | Event::InlineHtml(ref raw) => {
            let delta = opaque_tag_delta(raw);
            opaque_depth = opaque_depth.saturating_add_signed(delta);
            event
        }
        Event::Text(text) if opaque_depth == 0 => {
            let (event, count) = link_text(text, scanner, config);
            linked += count;
            event
        }
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    md_html::push_html(&mut out, events);
    (out, linked)
}

/// Replace a text event with inline HTML when it contains references.
fn link_text<'a>(
    text: CowStr<'a>,
    scanner: &ReferenceScanner<'_>,
    config: &ReferencesConfig,
) -> (Event<'a>, usize) {
    let segments = scanner.segments(&text);
    let count = segments
        .iter()
        .filter(|s| matches!(s, Segment::Reference(_)))
        .count();
    if count == 0 {
        return (Event::Text(text), 0);
    }
    let markup = html! {
        @for segment in &segments {
            @match segment {
                Segment::Text(plain) => { (plain) }
                Segment::Reference(reference) => { (render_reference(reference, config)) }
            }
        }
    };
    (Event::InlineHtml(CowStr::from(markup.into_string())), count)
}

/// Net change in opaque element nesting for a chunk of raw HTML.
fn opaque_tag_delta(raw: &str) -> isize {
    let mut delta = 0;
    for chunk in raw.split('<').skip(1) {
        let (closing, rest) = match chunk.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, chunk),
        };
        let name: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        if !OPAQUE_HTML_TAGS.contains(&name.as_str()) {
            continue;
        }
        let self_closing = rest
            .split('>')
            .next()
            .is_some_and(|tag| tag.trim_end().ends_with('/'));
        match (closing, self_closing) {
            (true, _) => delta -= 1,
            (false, false) => delta += 1,
            (false, true) => {}
        }
    }
    delta
}

//! HTML page generation.
//!
//! Wraps linked markdown and rendered timelines in a complete document.
//!
//! ## Generated Pages
//!
//! - **Reference pages**: a markdown file rendered with every scripture
//!   reference turned into a `bible-ref` anchor
//! - **Timeline pages**: a dataset laid out into lanes, one positioned bar
//!   per event
//!
//! ## CSS
//!
//! Every page inlines the same stylesheet: color and timeline custom
//! properties generated from `config.toml`, followed by `static/style.css`
//! embedded at compile time.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Interpolated text is escaped; the only pre-escaped input is the HTML
//! produced by the markdown linker.

use crate::config::{self, SiteConfig};
use crate::linker;
use crate::reference::ReferenceScanner;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Full page stylesheet for a site configuration.
pub fn site_css(config: &SiteConfig) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        config::generate_color_css(&config.colors),
        config::generate_timeline_css(&config.timeline),
        CSS_STATIC
    )
}

/// Title from the first `# heading`, if any.
pub fn page_title(markdown: &str) -> Option<String> {
    markdown
        .lines()
        .find(|line| line.starts_with("# "))
        .map(|line| line.trim_start_matches("# ").trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Render a markdown file to a standalone HTML page.
///
/// Returns the number of references linked.
pub fn generate_reference_page(
    source: &Path,
    output: &Path,
    scanner: &ReferenceScanner<'_>,
    config: &SiteConfig,
) -> Result<usize, GenerateError> {
    let markdown = fs::read_to_string(source)?;
    let fallback = source
        .file_stem()
        .map(|s| s.to_string_lossy().replace('-', " "))
        .unwrap_or_default();
    let title = page_title(&markdown).unwrap_or(fallback);

    let (body_html, count) = linker::render_markdown(&markdown, scanner, &config.references);
    let page = render_reference_page(&title, &body_html, &site_css(config));

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, page.into_string())?;
    debug!(source = %source.display(), output = %output.display(), count, "generated page");
    Ok(count)
}

/// Write a rendered timeline as a standalone page.
pub fn generate_timeline_page(
    title: &str,
    timeline: Markup,
    output: &Path,
    config: &SiteConfig,
) -> Result<(), GenerateError> {
    let page = render_timeline_page(title, timeline, &site_css(config));
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, page.into_string())?;
    Ok(())
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

/// Renders a page around HTML produced by the markdown linker
pub fn render_reference_page(title: &str, body_html: &str, css: &str) -> Markup {
    let content = html! {
        main.reference-page {
            article.content {
                (PreEscaped(body_html))
            }
        }
    };
    base_document(title, css, None, content)
}

/// Renders a page around a timeline
pub fn render_timeline_page(title: &str, timeline: Markup, css: &str) -> Markup {
    let content = html! {
        main.timeline-page {
            h1 { (title) }
            (timeline)
        }
    };
    base_document(title, css, Some("timeline-view"), content)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn base_document_includes_doctype() {
        let content = html! { p { "test" } };
        let doc = base_document("Test", "body {}", None, content).into_string();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains(r#"<html lang="pt-BR">"#));
    }

    #[test]
    fn base_document_applies_body_class() {
        let content = html! { p { "test" } };
        let doc = base_document("Test", "", Some("timeline-view"), content).into_string();
        assert!(doc.contains(r#"<body class="timeline-view">"#));
    }

    #[test]
    fn base_document_keeps_css_unescaped() {
        let doc = base_document("T", "a > b { color: red; }", None, html! {}).into_string();
        assert!(doc.contains("a > b { color: red; }"));
    }

    #[test]
    fn site_css_includes_generated_properties() {
        let css = site_css(&SiteConfig::default());
        assert!(css.contains("--color-reference:"));
        assert!(css.contains("--track-height: 40px;"));
        assert!(css.contains("a.bible-ref"));
    }

    // =========================================================================
    // Titles
    // =========================================================================

    #[test]
    fn title_from_first_heading() {
        assert_eq!(
            page_title("intro\n# Estudo de João\n# Outro").as_deref(),
            Some("Estudo de João")
        );
    }

    #[test]
    fn no_heading_no_title() {
        assert_eq!(page_title("## Sub\ntexto"), None);
        assert_eq!(page_title("# \ntexto"), None);
    }

    // =========================================================================
    // Page renderers
    // =========================================================================

    #[test]
    fn reference_page_embeds_linked_html() {
        let html =
            render_reference_page("Estudo", "<p><a class=\"bible-ref\">Jo 3:16</a></p>", "")
                .into_string();
        assert!(html.contains("<title>Estudo</title>"));
        assert!(html.contains("reference-page"));
        assert!(html.contains("<a class=\"bible-ref\">Jo 3:16</a>"));
    }

    #[test]
    fn timeline_page_has_heading() {
        let html =
            render_timeline_page("Vida de Jesus", html! { div.timeline {} }, "").into_string();
        assert!(html.contains("<h1>Vida de Jesus</h1>"));
        assert!(html.contains(r#"<div class="timeline">"#));
    }

    #[test]
    fn html_escape_in_maud() {
        let html =
            render_timeline_page("<script>alert('xss')</script>", html! {}, "").into_string();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn generate_reference_page_writes_file() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("estudo-de-joao.md");
        fs::write(&source, "# Estudo\n\nLeia Jo 3:16 e Gn 1:1.\n").unwrap();
        let output = tmp.path().join("dist/estudo.html");

        let index = sample_index();
        let scanner = ReferenceScanner::new(&index).unwrap();
        let count =
            generate_reference_page(&source, &output, &scanner, &SiteConfig::default()).unwrap();

        assert_eq!(count, 2);
        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains("<title>Estudo</title>"));
        assert!(html.contains(r#"href="/biblia/ara/joao/3#v16""#));
    }

    #[test]
    fn generate_reference_page_counts_linked_references_only() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("citacoes.md");
        fs::write(
            &source,
            "[Jo 3:16](https://example.org)\n\n> Gn 1:1\n\n`Jo 1:1`\n\nLeia Gn 2:7.\n",
        )
        .unwrap();
        let output = tmp.path().join("citacoes.html");

        let index = sample_index();
        let scanner = ReferenceScanner::new(&index).unwrap();
        let count =
            generate_reference_page(&source, &output, &scanner, &SiteConfig::default()).unwrap();

        assert_eq!(count, 1);
        let html = fs::read_to_string(&output).unwrap();
        assert_eq!(html.matches(r#"class="bible-ref""#).count(), 1);
    }

    #[test]
    fn generate_reference_page_falls_back_to_file_name() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("notas-de-estudo.md");
        fs::write(&source, "Sem título.").unwrap();
        let output = tmp.path().join("out.html");

        let index = sample_index();
        let scanner = ReferenceScanner::new(&index).unwrap();
        generate_reference_page(&source, &output, &scanner, &SiteConfig::default()).unwrap();
        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains("<title>notas de estudo</title>"));
    }

    #[test]
    fn generate_reference_page_missing_source_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let index = sample_index();
        let scanner = ReferenceScanner::new(&index).unwrap();
        let result = generate_reference_page(
            &tmp.path().join("nada.md"),
            &tmp.path().join("out.html"),
            &scanner,
            &SiteConfig::default(),
        );
        assert!(matches!(result, Err(GenerateError::Io(_))));
    }
}

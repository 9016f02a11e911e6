//! Markdown/MDX rendering with syntax highlighting and custom element handlers

use anyhow::Result;
use lazy_static::lazy_static;
use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd,
};
use regex::Regex;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::helpers::{html_escape, link_attrs};

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref NON_WORD: Regex = Regex::new(r"[^A-Za-z0-9_\-]+").unwrap();
    static ref HYPHENS: Regex = Regex::new(r"-{2,}").unwrap();
}

/// Turn heading text into an element id.
///
/// Lowercases, maps whitespace to `-` and `&` to `-and-`, drops anything
/// outside `[A-Za-z0-9_-]`, then collapses runs of hyphens.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let s = WHITESPACE.replace_all(lower.trim(), "-");
    let s = s.replace('&', "-and-");
    let s = NON_WORD.replace_all(&s, "");
    HYPHENS.replace_all(&s, "-").into_owned()
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

/// A heading whose inner events are held back until its id is known
struct PendingHeading<'a> {
    level: HeadingLevel,
    id: Option<String>,
    text: String,
    events: Vec<Event<'a>>,
}

struct PendingImage {
    src: String,
    title: String,
    alt: String,
}

struct PendingCode {
    lang: Option<String>,
    content: String,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", false)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
        }
    }

    /// Render a post body to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_MATH
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut heading: Option<PendingHeading> = None;
        let mut image: Option<PendingImage> = None;
        let mut code: Option<PendingCode> = None;

        for event in parser {
            // Code block and image bodies are consumed whole
            if let Some(block) = code.as_mut() {
                match event {
                    Event::Text(text) => block.content.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        let html = self.highlight(&block.content, block.lang.as_deref());
                        code = None;
                        emit(&mut events, &mut heading, Event::Html(CowStr::from(html)));
                    }
                    _ => {}
                }
                continue;
            }

            if let Some(img) = image.as_mut() {
                match event {
                    Event::Text(text) | Event::Code(text) => img.alt.push_str(&text),
                    Event::End(TagEnd::Image) => {
                        let html = render_image(img);
                        image = None;
                        emit(&mut events, &mut heading, Event::Html(CowStr::from(html)));
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|l| l.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code = Some(PendingCode {
                        lang,
                        content: String::new(),
                    });
                }
                Event::Start(Tag::Image {
                    dest_url, title, ..
                }) => {
                    image = Some(PendingImage {
                        src: dest_url.to_string(),
                        title: title.to_string(),
                        alt: String::new(),
                    });
                }
                Event::Start(Tag::Heading { level, id, .. }) => {
                    heading = Some(PendingHeading {
                        level,
                        id: id.map(|i| i.to_string()),
                        text: String::new(),
                        events: Vec::new(),
                    });
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some(h) = heading.take() {
                        let id = h.id.unwrap_or_else(|| slugify(&h.text));
                        let id = html_escape(&id);
                        let tag = heading_tag(h.level);
                        events.push(Event::Html(CowStr::from(format!(
                            r##"<{tag} id="{id}"><a href="#{id}" class="anchor"></a>"##
                        ))));
                        events.extend(h.events);
                        events.push(Event::Html(CowStr::from(format!("</{tag}>"))));
                    }
                }
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    ..
                }) => {
                    let html = open_link(link_type, &dest_url, &title);
                    emit(&mut events, &mut heading, Event::Html(CowStr::from(html)));
                }
                Event::End(TagEnd::Link) => {
                    emit(&mut events, &mut heading, Event::Html(CowStr::from("</a>")));
                }
                Event::Start(Tag::Table(alignments)) => {
                    events.push(Event::Html(CowStr::from("<div class=\"table-wrapper\">\n")));
                    events.push(Event::Start(Tag::Table(alignments)));
                }
                Event::End(TagEnd::Table) => {
                    events.push(Event::End(TagEnd::Table));
                    events.push(Event::Html(CowStr::from("</div>")));
                }
                Event::InlineMath(tex) => {
                    let html = format!(
                        r#"<span class="math math-inline">{}</span>"#,
                        html_escape(&tex)
                    );
                    emit(&mut events, &mut heading, Event::InlineHtml(CowStr::from(html)));
                }
                Event::DisplayMath(tex) => {
                    let html = format!(
                        r#"<div class="math math-display">{}</div>"#,
                        html_escape(&tex)
                    );
                    emit(&mut events, &mut heading, Event::Html(CowStr::from(html)));
                }
                Event::Text(text) => {
                    if let Some(h) = heading.as_mut() {
                        h.text.push_str(&text);
                    }
                    emit(&mut events, &mut heading, Event::Text(text));
                }
                Event::Code(text) => {
                    if let Some(h) = heading.as_mut() {
                        h.text.push_str(&text);
                    }
                    emit(&mut events, &mut heading, Event::Code(text));
                }
                Event::SoftBreak | Event::HardBreak => {
                    if let Some(h) = heading.as_mut() {
                        h.text.push(' ');
                    }
                    emit(&mut events, &mut heading, event);
                }
                other => emit(&mut events, &mut heading, other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Highlight a code block for the given language tag.
    ///
    /// Unknown languages render as escaped plain text.
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let highlighted = theme.and_then(|theme| {
            highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
        });

        match highlighted {
            Some(highlighted) => {
                let class = html_escape(lang);
                if self.line_numbers {
                    add_line_numbers(&highlighted, code.lines().count(), &class)
                } else {
                    format!(r#"<figure class="highlight {}">{}</figure>"#, class, highlighted)
                }
            }
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                html_escape(lang),
                html_escape(code)
            ),
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Route an event into the open heading, if any, else into the output
fn emit<'a>(
    events: &mut Vec<Event<'a>>,
    heading: &mut Option<PendingHeading<'a>>,
    event: Event<'a>,
) {
    match heading {
        Some(h) => h.events.push(event),
        None => events.push(event),
    }
}

/// Put a line-number gutter beside highlighted code
fn add_line_numbers(highlighted: &str, line_count: usize, lang: &str) -> String {
    let gutter = (1..=line_count)
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        lang, gutter, highlighted
    )
}

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

/// Opening `<a>` tag. Site paths and in-page anchors navigate in place;
/// everything else opens a new tab. Email autolinks get a `mailto:` href.
fn open_link(link_type: LinkType, href: &str, title: &str) -> String {
    let href = match link_type {
        LinkType::Email => format!("mailto:{}", href),
        _ => href.to_string(),
    };
    let href = href.as_str();

    let title_attr = if title.is_empty() {
        String::new()
    } else {
        format!(r#" title="{}""#, html_escape(title))
    };

    format!(
        r#"<a href="{}"{}{}>"#,
        html_escape(href),
        title_attr,
        link_attrs(href)
    )
}

fn render_image(img: &PendingImage) -> String {
    let title_attr = if img.title.is_empty() {
        String::new()
    } else {
        format!(r#" title="{}""#, html_escape(&img.title))
    };
    format!(
        r#"<img src="{}" alt="{}"{} loading="lazy" decoding="async">"#,
        html_escape(&img.src),
        html_escape(&img.alt),
        title_attr
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(
            slugify("Understanding PyTorch: Graphs & Autograd"),
            "understanding-pytorch-graphs-and-autograd"
        );
        assert_eq!(slugify("  Hello   World  "), "hello-world");
        assert_eq!(slugify("C++ -- the good parts"), "c-the-good-parts");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
    }

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("Some *text* here.").unwrap();
        assert!(html.contains("<p>Some <em>text</em> here.</p>"));
    }

    #[test]
    fn test_heading_gets_anchor() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("## Graphs & `Autograd`").unwrap();
        assert!(html.contains(r##"<h2 id="graphs-and-autograd">"##), "{}", html);
        assert!(html.contains(r##"<a href="#graphs-and-autograd" class="anchor"></a>"##));
        assert!(html.contains("<code>Autograd</code></h2>"));
    }

    #[test]
    fn test_heading_custom_id() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Intro {#start}").unwrap();
        assert!(html.contains(r#"<h1 id="start">"#), "{}", html);
    }

    #[test]
    fn test_links() {
        let renderer = MarkdownRenderer::new();
        let html = renderer
            .render("[home](/blog) [top](#intro) [rust](https://www.rust-lang.org)")
            .unwrap();
        assert!(html.contains(r#"<a href="/blog">home</a>"#), "{}", html);
        assert!(html.contains(r##"<a href="#intro">top</a>"##));
        assert!(html.contains(
            r#"<a href="https://www.rust-lang.org" target="_blank" rel="noopener noreferrer">rust</a>"#
        ));
    }

    #[test]
    fn test_email_autolink() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("Mail <me@example.com> now").unwrap();
        assert!(html.contains(r#"<a href="mailto:me@example.com""#), "{}", html);
        assert!(html.contains(">me@example.com</a>"));
    }

    #[test]
    fn test_multiline_heading_id() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("Foo\nBar\n===\n").unwrap();
        assert!(html.contains(r#"<h1 id="foo-bar">"#), "{}", html);
    }

    #[test]
    fn test_image() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("![A cat](/cat.png \"Cat\")").unwrap();
        assert!(
            html.contains(
                r#"<img src="/cat.png" alt="A cat" title="Cat" loading="lazy" decoding="async">"#
            ),
            "{}",
            html
        );
    }

    #[test]
    fn test_table_is_wrapped() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("| a | b |\n|---|---|\n| 1 | 2 |\n").unwrap();
        assert!(html.contains("<div class=\"table-wrapper\">\n<table>"), "{}", html);
        assert!(html.contains("</table>\n</div>") || html.contains("</table></div>"));
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```").unwrap();
        assert!(html.contains(r#"<figure class="highlight rust">"#), "{}", html);
        assert!(html.contains("main"));
    }

    #[test]
    fn test_code_block_line_numbers() {
        let renderer = MarkdownRenderer::with_options("base16-ocean.dark", true);
        let html = renderer.render("```python\na = 1\nb = 2\n```").unwrap();
        assert!(html.contains(r#"<span class="line-number">2</span>"#), "{}", html);
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain_text() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.highlight("<x>", Some("nosuchlang"));
        assert!(html.contains("&lt;x&gt;"), "{}", html);
    }

    #[test]
    fn test_math() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("Euler: $e^{i\\pi} + 1 = 0$\n\n$$\na < b\n$$").unwrap();
        assert!(
            html.contains(r#"<span class="math math-inline">e^{i\pi} + 1 = 0</span>"#),
            "{}",
            html
        );
        assert!(html.contains(r#"<div class="math math-display">"#));
        assert!(html.contains("a &lt; b"));
    }
}

//! # Markup Renderer
//!
//! A deliberately small markdown dialect for previewing notes: fenced and
//! inline code, ATX headings, bold, italic, links, flat `-` lists and
//! paragraphs. Anything else is shown literally.
//!
//! Rendering is a fixed pipeline over one working string:
//!
//! 1. normalize line endings
//! 2. escape HTML-sensitive characters
//! 3. apply [`RULES`] in order
//! 4. wrap the remaining blocks in paragraphs
//!
//! Escaping runs before any rule, so the only markup in the output is markup
//! produced by the rules themselves. Rule order is load-bearing: headings run
//! from `######` down to `#`, and bold runs before italic. `rule_names`
//! exposes the order so tests can pin it.
//!
//! Code is set aside as soon as it is matched and put back at the very end,
//! so no later rule can rewrite it and blank lines inside a fence don't split
//! paragraphs.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const PLACEHOLDER_OPEN: char = '\u{E000}';
const PLACEHOLDER_CLOSE: char = '\u{E001}';
const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto", "ftp", "file"];

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^&(?:[A-Za-z][A-Za-z0-9]{1,31}|#[0-9]{1,7}|#[xX][0-9A-Fa-f]{1,6});")
        .expect("entity regex")
});
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x{E000}(\d+)\x{E001}").expect("placeholder regex"));
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").expect("blank line regex"));
static BLOCK_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*<(?:h[1-6]|ul|pre|p|code)[\s>]").expect("block regex"));

type Transform = fn(&Captures<'_>, &mut Stash) -> String;

struct Rule {
    name: &'static str,
    pattern: Regex,
    transform: Transform,
}

impl Rule {
    fn new(name: &'static str, pattern: &str, transform: Transform) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("render rule regex"),
            transform,
        }
    }

    fn apply(&self, text: &str, stash: &mut Stash) -> String {
        self.pattern
            .replace_all(text, |caps: &Captures<'_>| (self.transform)(caps, stash))
            .into_owned()
    }
}

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        // Lazy body: each opening fence pairs with the nearest closing one, so
        // an odd trailing fence stays literal.
        Rule::new("code_block", r"(?s)```(.*?)```", |c, stash| {
            stash.put(format!("<pre><code>{}</code></pre>", &c[1]))
        }),
        Rule::new("inline_code", r"`([^`]+)`", |c, stash| {
            stash.put(format!("<code>{}</code>", &c[1]))
        }),
        Rule::new("h6", r"(?m)^######[ \t]+(.+)$", |c, _| format!("<h6>{}</h6>", &c[1])),
        Rule::new("h5", r"(?m)^#####[ \t]+(.+)$", |c, _| format!("<h5>{}</h5>", &c[1])),
        Rule::new("h4", r"(?m)^####[ \t]+(.+)$", |c, _| format!("<h4>{}</h4>", &c[1])),
        Rule::new("h3", r"(?m)^###[ \t]+(.+)$", |c, _| format!("<h3>{}</h3>", &c[1])),
        Rule::new("h2", r"(?m)^##[ \t]+(.+)$", |c, _| format!("<h2>{}</h2>", &c[1])),
        Rule::new("h1", r"(?m)^#[ \t]+(.+)$", |c, _| format!("<h1>{}</h1>", &c[1])),
        Rule::new("bold", r"\*\*([^*]+)\*\*", |c, _| {
            format!("<strong>{}</strong>", &c[1])
        }),
        Rule::new("italic", r"\*([^*]+)\*", |c, _| format!("<em>{}</em>", &c[1])),
        Rule::new("link", r"\[([^\]]+)\]\(([^)]+)\)", |c, _| render_link(c)),
        Rule::new("list", r"(?m)^(?:-[ \t]+[^\n]+\n?)+", |c, _| render_list(&c[0])),
    ]
});

/// Names of the substitution rules, in application order.
pub fn rule_names() -> Vec<&'static str> {
    RULES.iter().map(|rule| rule.name).collect()
}

/// Renders note content to HTML. Never fails; unrecognized syntax is shown
/// as escaped text.
pub fn render(source: &str) -> String {
    let mut stash = Stash::default();
    let mut working = escape_html(&normalize(source));

    for rule in RULES.iter() {
        working = rule.apply(&working, &mut stash);
    }

    let html = paragraphs(&working, &stash);
    stash.restore(&html)
}

/// Escapes `& < > " '`. Existing character references are kept as they are,
/// so escaped text is never escaped twice.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, ch) in text.char_indices() {
        match ch {
            '&' if ENTITY.is_match(&text[i..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

fn normalize(source: &str) -> String {
    source
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .chars()
        .filter(|&c| c != PLACEHOLDER_OPEN && c != PLACEHOLDER_CLOSE)
        .collect()
}

fn render_link(c: &Captures<'_>) -> String {
    let (text, url) = (&c[1], &c[2]);
    if !is_safe_href(url) {
        return c[0].to_string();
    }
    format!(r#"<a href="{url}" target="_blank" rel="noreferrer noopener">{text}</a>"#)
}

/// Relative URLs and a short list of schemes. A character reference before
/// the first path separator could hide a colon, so that is rejected too.
fn is_safe_href(url: &str) -> bool {
    let head_end = url.find(['/', '?', '#']).unwrap_or(url.len());
    let head = &url[..head_end];
    match head.split_once(':') {
        Some((scheme, _)) => SAFE_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str()),
        None => !head.contains('&'),
    }
}

fn render_list(block: &str) -> String {
    let items: String = block
        .trim_end_matches('\n')
        .split('\n')
        .map(|line| {
            let item = line
                .strip_prefix('-')
                .unwrap_or(line)
                .trim_start_matches([' ', '\t']);
            format!("<li>{item}</li>")
        })
        .collect();
    let tail = if block.ends_with('\n') { "\n" } else { "" };
    format!("<ul>{items}</ul>{tail}")
}

fn paragraphs(text: &str, stash: &Stash) -> String {
    BLANK_LINES
        .split(text)
        .map(|block| block.trim_matches('\n'))
        .filter(|block| !block.trim().is_empty())
        .map(|block| {
            if BLOCK_START.is_match(block) || stash.starts_with_fragment(block) {
                block.to_string()
            } else {
                format!("<p>{}</p>", block.replace('\n', "<br/>"))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rendered code, held out of the working string until the end.
#[derive(Default)]
struct Stash {
    fragments: Vec<String>,
}

impl Stash {
    fn put(&mut self, html: String) -> String {
        let id = self.fragments.len();
        self.fragments.push(html);
        format!("{PLACEHOLDER_OPEN}{id}{PLACEHOLDER_CLOSE}")
    }

    fn get(&self, caps: &Captures<'_>) -> Option<&String> {
        caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|id| self.fragments.get(id))
    }

    /// Every fragment is a `<pre>` or `<code>` element, so a block opening
    /// with one is already markup.
    fn starts_with_fragment(&self, block: &str) -> bool {
        PLACEHOLDER
            .captures(block.trim_start())
            .filter(|caps| caps.get(0).is_some_and(|m| m.start() == 0))
            .and_then(|caps| self.get(&caps))
            .is_some()
    }

    // Fragments can contain earlier placeholders (a fence inside inline code).
    fn restore(&self, text: &str) -> String {
        PLACEHOLDER
            .replace_all(text, |caps: &Captures<'_>| match self.get(caps) {
                Some(fragment) => self.restore(fragment),
                None => String::new(),
            })
            .into_owned()
    }
}

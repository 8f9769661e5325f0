//! Rendering threads to markdown, plain text, and HTML files

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};
use tracing::debug;

use crate::error::{ArchiveError, Result};
use crate::models::Thread;
use crate::rewrite::UrlRewriter;
use crate::sink::LatchedWriter;

/// Which documents are produced per issue
///
/// The markdown file is always written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub html: bool,
    pub text: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            html: true,
            text: false,
        }
    }
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Emit the markdown document of a thread
pub fn write_markdown<W: Write>(thread: &Thread, w: &mut LatchedWriter<W>) {
    w.write_str("***\n");
    w.write_str(&format!(
        "# ISSUE {} {} {} \n",
        thread.number,
        thread.author,
        timestamp(&thread.created_at)
    ));
    w.write_str(&format!("{}\n", thread.title));
    w.write_str("***\n");
    w.write_str(&format!("{}\n\n", thread.body));

    for comment in &thread.comments {
        w.write_str("***\n");
        w.write_str(&format!(
            "# REPLY {} {} \n",
            comment.author,
            timestamp(&comment.created_at)
        ));
        w.write_str("***\n");
        w.write_str(&format!("{}\n\n", comment.body));
    }
}

/// Emit the plain-text document of a thread
pub fn write_text<W: Write>(thread: &Thread, w: &mut LatchedWriter<W>) {
    let bar = "=".repeat(10);
    w.write_str(&format!(
        "{bar} ISSUE {} {} {} {bar}\n",
        thread.number,
        thread.author,
        timestamp(&thread.created_at)
    ));
    w.write_str(&format!("{}\n", thread.title));
    w.write_str(&format!("{}\n", "=".repeat(60)));
    w.write_str(&format!("{}\n\n", thread.body));

    for comment in &thread.comments {
        w.write_str(&format!(
            "{bar} REPLY {} {} {bar}\n",
            comment.author,
            timestamp(&comment.created_at)
        ));
        w.write_str(&format!("{}\n\n", comment.body));
    }
}

fn render_to_string(thread: &Thread, emit: fn(&Thread, &mut LatchedWriter<Vec<u8>>)) -> String {
    let mut w = LatchedWriter::new(Vec::new());
    emit(thread, &mut w);
    // Writes into a Vec cannot fail
    let bytes = w.finish().unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}

pub fn render_markdown(thread: &Thread) -> String {
    render_to_string(thread, write_markdown)
}

pub fn render_text(thread: &Thread) -> String {
    render_to_string(thread, write_text)
}

/// Lowercased, dash-separated heading anchor
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Give every heading without an explicit id one derived from its text
fn with_heading_ids(mut events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut used: HashMap<String, usize> = HashMap::new();
    let mut i = 0;

    while i < events.len() {
        let needs_id = matches!(&events[i], Event::Start(Tag::Heading { id: None, .. }));
        if needs_id {
            let mut text = String::new();
            for event in &events[i + 1..] {
                match event {
                    Event::End(TagEnd::Heading(_)) => break,
                    Event::Text(t) | Event::Code(t) => text.push_str(t),
                    _ => {}
                }
            }

            let base = slugify(&text);
            let base = if base.is_empty() { "heading".to_string() } else { base };
            let count = used.entry(base.clone()).or_insert(0);
            let slug = if *count == 0 {
                base
            } else {
                format!("{}-{}", base, count)
            };
            *count += 1;

            if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
                *id = Some(CowStr::from(slug));
            }
        }
        i += 1;
    }

    events
}

/// Render markdown to HTML
///
/// Tables, footnotes, strikethrough and task lists are enabled, headings get
/// generated anchors, and links open in a new browsing context.
pub fn render_html(markdown: &[u8]) -> Vec<u8> {
    let source = String::from_utf8_lossy(markdown);

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

    let events = with_blank_targets(with_heading_ids(Parser::new_ext(&source, options).collect()));

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out.into_bytes()
}

/// Open rendered links as `<a target="_blank" ...>`
///
/// Raw HTML from the source and links inside image alt text are left alone.
fn with_blank_targets(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut image_depth = 0usize;
    events
        .into_iter()
        .map(|event| match event {
            Event::Start(link @ Tag::Link { .. }) if image_depth == 0 => {
                let mut opening = String::new();
                html::push_html(&mut opening, std::iter::once(Event::Start(link)));
                Event::InlineHtml(CowStr::from(opening.replacen("<a ", "<a target=\"_blank\" ", 1)))
            }
            Event::Start(Tag::Image { .. }) => {
                image_depth += 1;
                event
            }
            Event::End(TagEnd::Image) => {
                image_depth = image_depth.saturating_sub(1);
                event
            }
            other => other,
        })
        .collect()
}

fn create_file(path: &Path) -> Result<LatchedWriter<BufWriter<File>>> {
    let file = File::create(path).map_err(|e| ArchiveError::fs("creating", path, e))?;
    Ok(LatchedWriter::new(BufWriter::new(file)))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).map_err(|e| ArchiveError::fs("writing", path, e))
}

fn document_path(out_dir: &Path, number: u64, extension: &str) -> PathBuf {
    out_dir.join(format!("issue_{}.{}", number, extension))
}

/// Write the documents of one thread into `out_dir`
///
/// The markdown file comes first; the HTML file is rendered from the same
/// markdown after asset URLs are rewritten to their local copies.
pub fn write_thread(
    thread: &Thread,
    out_dir: &Path,
    options: RenderOptions,
    rewriter: &UrlRewriter,
) -> Result<()> {
    let markdown = render_markdown(thread);
    write_file(&document_path(out_dir, thread.number, "md"), markdown.as_bytes())?;

    if options.html {
        let local = rewriter.rewrite(&markdown);
        let html = render_html(local.as_bytes());
        write_file(&document_path(out_dir, thread.number, "html"), &html)?;
    }

    if options.text {
        let path = document_path(out_dir, thread.number, "txt");
        let mut w = create_file(&path)?;
        write_text(thread, &mut w);
        w.finish().map_err(|e| ArchiveError::fs("writing", &path, e))?;
    }

    debug!(issue = thread.number, "wrote documents");
    Ok(())
}

//! Markdown renderer with inline and math extension hooks.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::env::RenderEnv;
use crate::error::RenderError;
use crate::math::MathProcessor;
use crate::node::{InlineNode, InlineProcessor};
use crate::state::{
    CodeBlockState, ImageState, InlineState, ParagraphState, TableState, escape_html,
};
use crate::util::{fence_language, heading_level_to_num};

/// Markdown renderer producing an HTML fragment.
///
/// The renderer holds configuration only; every render call gets fresh
/// state, so one renderer can serve any number of calls with different
/// environments.
///
/// # Inline Processors
///
/// Processors added via [`with_inline_processor`](Self::with_inline_processor)
/// are offered each `em`/`strong` element whose content is plain text.
/// Processors are checked in order; the first returning `Some` wins.
///
/// # Math
///
/// A processor added via [`with_math_processor`](Self::with_math_processor)
/// enables `$…$` and `$$…$$` parsing and renders the math content.
pub struct MarkdownRenderer {
    gfm: bool,
    inline_processors: Vec<Box<dyn InlineProcessor>>,
    math: Option<Box<dyn MathProcessor>>,
}

impl MarkdownRenderer {
    /// Create a new renderer with GFM enabled by default.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gfm: true,
            inline_processors: Vec::new(),
            math: None,
        }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Add an inline processor.
    #[must_use]
    pub fn with_inline_processor<P: InlineProcessor + 'static>(mut self, processor: P) -> Self {
        self.inline_processors.push(Box::new(processor));
        self
    }

    /// Set the math processor, replacing any previous one.
    #[must_use]
    pub fn with_math_processor<M: MathProcessor + 'static>(mut self, processor: M) -> Self {
        self.math = Some(Box::new(processor));
        self
    }

    /// Get parser options based on configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.gfm {
            options |=
                Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
        }
        if self.math.is_some() {
            options |= Options::ENABLE_MATH;
        }
        options
    }

    /// Create a configured parser for the given markdown text.
    #[must_use]
    pub fn create_parser<'a>(&self, markdown: &'a str) -> Parser<'a> {
        Parser::new_ext(markdown, self.parser_options())
    }

    /// Render markdown text with an empty environment.
    pub fn render_markdown(&self, markdown: &str) -> Result<String, RenderError> {
        self.render_markdown_with_env(markdown, &RenderEnv::new())
    }

    /// Render markdown text with the given environment.
    pub fn render_markdown_with_env(
        &self,
        markdown: &str,
        env: &RenderEnv,
    ) -> Result<String, RenderError> {
        self.render(self.create_parser(markdown), env)
    }

    /// Render markdown events and return the HTML fragment.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Math`] if the math processor fails. Rendering
    /// stops at the failing span.
    pub fn render<'a, I>(&self, events: I, env: &RenderEnv) -> Result<String, RenderError>
    where
        I: Iterator<Item = Event<'a>>,
    {
        let mut writer = HtmlWriter::new(self, env);
        for event in events {
            writer.process_event(event)?;
        }
        Ok(writer.output)
    }

    fn transform_inline(&self, node: &InlineNode, env: &RenderEnv) -> Option<InlineNode> {
        self.inline_processors
            .iter()
            .find_map(|processor| processor.process(node, env))
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-call rendering state.
struct HtmlWriter<'r> {
    renderer: &'r MarkdownRenderer,
    env: &'r RenderEnv,
    output: String,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    inline: InlineState,
    paragraph: ParagraphState,
    pending_image: Option<(String, String)>,
}

impl<'r> HtmlWriter<'r> {
    fn new(renderer: &'r MarkdownRenderer, env: &'r RenderEnv) -> Self {
        Self {
            renderer,
            env,
            output: String::with_capacity(4096),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            inline: InlineState::default(),
            paragraph: ParagraphState::default(),
            pending_image: None,
        }
    }

    fn process_event(&mut self, event: Event<'_>) -> Result<(), RenderError> {
        if self.paragraph.is_open() && !matches!(event, Event::End(TagEnd::Paragraph)) {
            self.paragraph
                .note(matches!(event, Event::DisplayMath(_)));
        }
        if !matches!(
            event,
            Event::Text(_)
                | Event::Start(Tag::Emphasis | Tag::Strong)
                | Event::End(TagEnd::Emphasis | TagEnd::Strong)
        ) {
            self.inline.taint();
        }

        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => return self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::InlineMath(math) => return self.math(&math, false),
            Event::DisplayMath(math) => return self.math(&math, true),
            Event::Html(html) | Event::InlineHtml(html) => self.output.push_str(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.output.push_str("<br>\n"),
            Event::Rule => {
                self.ensure_newline();
                self.output.push_str("<hr>\n");
            }
            Event::TaskListMarker(checked) => self.task_list_marker(checked),
            Event::FootnoteReference(_) => {
                // Not supported
            }
        }
        Ok(())
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.ensure_newline();
                self.paragraph.open(self.output.len());
                self.output.push_str("<p>");
            }
            Tag::Heading { level, .. } => {
                self.ensure_newline();
                write!(self.output, "<h{}>", heading_level_to_num(level)).unwrap();
            }
            Tag::BlockQuote(_) => {
                self.ensure_newline();
                self.output.push_str("<blockquote>\n");
            }
            Tag::CodeBlock(kind) => {
                self.ensure_newline();
                match kind {
                    CodeBlockKind::Fenced(info) => self.code.start(&info),
                    CodeBlockKind::Indented => self.code.start(""),
                }
            }
            Tag::List(start) => {
                self.ensure_newline();
                match start {
                    Some(1) => self.output.push_str("<ol>\n"),
                    Some(n) => writeln!(self.output, "<ol start=\"{n}\">").unwrap(),
                    None => self.output.push_str("<ul>\n"),
                }
            }
            Tag::Item => self.output.push_str("<li>"),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => {
                self.ensure_newline();
                self.output.push_str("<dl>\n");
            }
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.ensure_newline();
                self.table.start(alignments);
                self.output.push_str("<table>\n");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead>\n<tr>\n");
            }
            Tag::TableRow => {
                if self.table.start_row() {
                    self.output.push_str("<tbody>\n");
                }
                self.output.push_str("<tr>\n");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let tag = if self.table.is_in_head() { "th" } else { "td" };
                write!(self.output, "<{tag}{align}>").unwrap();
            }
            Tag::Emphasis => self.open_inline("em"),
            Tag::Strong => self.open_inline("strong"),
            Tag::Strikethrough => self.output.push_str("<s>"),
            Tag::Superscript => self.output.push_str("<sup>"),
            Tag::Subscript => self.output.push_str("<sub>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                write!(self.output, r#"<a href="{}""#, escape_html(&dest_url)).unwrap();
                if !title.is_empty() {
                    write!(self.output, r#" title="{}""#, escape_html(&title)).unwrap();
                }
                self.output.push('>');
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Alt text is collected until the end tag
                self.image.start();
                self.pending_image = Some((dest_url.to_string(), title.to_string()));
            }
        }
    }

    fn end_tag(&mut self, tag: TagEnd) -> Result<(), RenderError> {
        match tag {
            TagEnd::Paragraph => {
                if let Some((start, block_math)) = self.paragraph.close() {
                    if block_math {
                        self.output.replace_range(start..start + "<p>".len(), "");
                        self.output.push('\n');
                    } else {
                        self.output.push_str("</p>\n");
                    }
                }
            }
            TagEnd::Heading(level) => {
                writeln!(self.output, "</h{}>", heading_level_to_num(level)).unwrap();
            }
            TagEnd::BlockQuote(_) => {
                self.ensure_newline();
                self.output.push_str("</blockquote>\n");
            }
            TagEnd::CodeBlock => return self.end_code_block(),
            TagEnd::List(ordered) => {
                self.ensure_newline();
                self.output
                    .push_str(if ordered { "</ol>\n" } else { "</ul>\n" });
            }
            TagEnd::Item => self.output.push_str("</li>\n"),
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::DefinitionList => {
                self.ensure_newline();
                self.output.push_str("</dl>\n");
            }
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>\n"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>\n"),
            TagEnd::Table => {
                if self.table.end() {
                    self.output.push_str("</tbody>\n");
                }
                self.output.push_str("</table>\n");
            }
            TagEnd::TableHead => {
                self.output.push_str("</tr>\n</thead>\n");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>\n"),
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>\n"
                } else {
                    "</td>\n"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis | TagEnd::Strong => self.close_inline(),
            TagEnd::Strikethrough => self.output.push_str("</s>"),
            TagEnd::Superscript => self.output.push_str("</sup>"),
            TagEnd::Subscript => self.output.push_str("</sub>"),
            TagEnd::Link => self.output.push_str("</a>"),
            TagEnd::Image => {
                let alt = self.image.end();
                if let Some((src, title)) = self.pending_image.take() {
                    write!(
                        self.output,
                        r#"<img src="{}" alt="{}""#,
                        escape_html(&src),
                        escape_html(&alt)
                    )
                    .unwrap();
                    if !title.is_empty() {
                        write!(self.output, r#" title="{}""#, escape_html(&title)).unwrap();
                    }
                    self.output.push('>');
                }
            }
        }
        Ok(())
    }

    fn end_code_block(&mut self) -> Result<(), RenderError> {
        let (info, content) = self.code.end();
        let renderer = self.renderer;

        if !info.is_empty()
            && let Some(math) = renderer.math.as_deref()
            && math.handles_fence(&info)
        {
            tracing::trace!(info = %info, "Delegating math fence");
            let html = math
                .render(&content, true, self.env)
                .map_err(|source| RenderError::Math {
                    display_mode: true,
                    source,
                })?;
            self.output.push_str(&html);
            self.output.push('\n');
            return Ok(());
        }

        if let Some(lang) = fence_language(&info) {
            write!(
                self.output,
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(&lang),
                escape_html(&content)
            )
            .unwrap();
        } else {
            write!(self.output, "<pre><code>{}</code></pre>", escape_html(&content)).unwrap();
        }
        self.output.push('\n');
        Ok(())
    }

    fn open_inline(&mut self, tag: &'static str) {
        if self.image.is_active() {
            return;
        }
        self.inline.open(tag, self.output.len());
        write!(self.output, "<{tag}>").unwrap();
    }

    fn close_inline(&mut self) {
        if self.image.is_active() {
            return;
        }
        let Some(frame) = self.inline.close() else {
            return;
        };
        if frame.plain {
            let node = InlineNode::new(frame.tag, frame.text);
            if let Some(replacement) = self.renderer.transform_inline(&node, self.env) {
                self.output.truncate(frame.start);
                replacement.write_html(&mut self.output);
                return;
            }
        }
        write!(self.output, "</{}>", frame.tag).unwrap();
    }

    fn math(&mut self, source: &str, display_mode: bool) -> Result<(), RenderError> {
        if self.image.is_active() {
            self.image.push_str(source);
            return Ok(());
        }

        let renderer = self.renderer;
        if let Some(math) = renderer.math.as_deref() {
            tracing::trace!(display_mode, "Delegating math span");
            let html = math
                .render(source, display_mode, self.env)
                .map_err(|source| RenderError::Math {
                    display_mode,
                    source,
                })?;
            self.output.push_str(&html);
        } else {
            let delimiter = if display_mode { "$$" } else { "$" };
            write!(
                self.output,
                "{delimiter}{}{delimiter}",
                escape_html(source)
            )
            .unwrap();
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if self.code.is_active() {
            self.code.push_str(text);
        } else if self.image.is_active() {
            self.image.push_str(text);
        } else {
            self.inline.push_text(text);
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.is_active() {
            self.image.push_str(code);
        } else {
            write!(self.output, "<code>{}</code>", escape_html(code)).unwrap();
        }
    }

    fn soft_break(&mut self) {
        if self.code.is_active() {
            self.code.push_newline();
        } else if self.image.is_active() {
            self.image.push_str(" ");
        } else {
            self.output.push('\n');
        }
    }

    fn task_list_marker(&mut self, checked: bool) {
        if checked {
            self.output
                .push_str(r#"<input type="checkbox" checked disabled> "#);
        } else {
            self.output.push_str(r#"<input type="checkbox" disabled> "#);
        }
    }

    /// Start block output on a fresh line.
    fn ensure_newline(&mut self) {
        if !self.output.is_empty() && !self.output.ends_with('\n') {
            self.output.push('\n');
        }
    }
}

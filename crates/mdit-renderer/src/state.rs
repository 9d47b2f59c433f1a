//! State structs tracking context during event processing.

use pulldown_cmark::Alignment;

/// State for tracking code block rendering.
#[derive(Default)]
pub struct CodeBlockState {
    /// Whether we're inside a code block.
    active: bool,
    /// Trimmed info string of the current code block, empty when indented.
    info: String,
    /// Buffer for code block content.
    buffer: String,
}

impl CodeBlockState {
    /// Start a new code block with its fence info string.
    pub fn start(&mut self, info: &str) {
        self.active = true;
        info.trim().clone_into(&mut self.info);
        self.buffer.clear();
    }

    /// End the current code block and return (info, content).
    pub fn end(&mut self) -> (String, String) {
        self.active = false;
        (
            std::mem::take(&mut self.info),
            std::mem::take(&mut self.buffer),
        )
    }

    /// Check if we're inside a code block.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Append text to the code block buffer.
    pub fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Append a newline to the code block buffer.
    pub fn push_newline(&mut self) {
        self.buffer.push('\n');
    }
}

/// State for tracking table rendering.
#[derive(Default)]
pub struct TableState {
    /// Whether we're inside the table header row.
    in_head: bool,
    /// Whether `<tbody>` has been opened.
    body_open: bool,
    /// Column alignments for current table.
    alignments: Vec<Alignment>,
    /// Current column index in table row.
    cell_index: usize,
}

impl TableState {
    /// Start a new table with column alignments.
    pub fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.body_open = false;
        self.cell_index = 0;
    }

    /// Start the table header row.
    pub fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    /// End the table header row.
    pub fn end_head(&mut self) {
        self.in_head = false;
    }

    /// Start a new body row. Returns `true` for the first body row.
    pub fn start_row(&mut self) -> bool {
        self.cell_index = 0;
        !std::mem::replace(&mut self.body_open, true)
    }

    /// End the table. Returns `true` if a body was opened.
    pub fn end(&mut self) -> bool {
        std::mem::take(&mut self.body_open)
    }

    /// Move to the next cell.
    pub fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    /// Check if we're in the table header.
    pub fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Get the alignment style for the current cell.
    pub fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// State for tracking image alt text capture.
#[derive(Default)]
pub struct ImageState {
    /// Whether we're inside an image tag.
    active: bool,
    /// Buffer for alt text.
    alt_text: String,
}

impl ImageState {
    /// Start capturing image alt text.
    pub fn start(&mut self) {
        self.active = true;
        self.alt_text.clear();
    }

    /// End image capture and return the alt text.
    pub fn end(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.alt_text)
    }

    /// Check if we're inside an image.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Append text to the alt text buffer.
    pub fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// An open `em` or `strong` element.
pub struct InlineFrame {
    /// Element name.
    pub tag: &'static str,
    /// Output offset of the opening tag.
    pub start: usize,
    /// Raw text collected inside the element.
    pub text: String,
    /// Whether the element has contained only text so far.
    pub plain: bool,
}

/// State for tracking open emphasis elements.
#[derive(Default)]
pub struct InlineState {
    frames: Vec<InlineFrame>,
}

impl InlineState {
    /// Open an element whose opening tag starts at `start`.
    ///
    /// Enclosing elements stop being plain.
    pub fn open(&mut self, tag: &'static str, start: usize) {
        self.taint();
        self.frames.push(InlineFrame {
            tag,
            start,
            text: String::new(),
            plain: true,
        });
    }

    /// Close the innermost element.
    pub fn close(&mut self) -> Option<InlineFrame> {
        self.frames.pop()
    }

    /// Record text inside the innermost element.
    pub fn push_text(&mut self, text: &str) {
        if let Some(frame) = self.frames.last_mut() {
            frame.text.push_str(text);
        }
    }

    /// Mark every open element as containing non-text content.
    pub fn taint(&mut self) {
        for frame in &mut self.frames {
            frame.plain = false;
        }
    }
}

/// What an open paragraph has contained so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ParagraphContent {
    Empty,
    DisplayMath,
    Mixed,
}

/// State for tracking the open paragraph.
///
/// A paragraph holding a single display math span is rendered as a block,
/// without the `<p>` wrapper.
pub struct ParagraphState {
    /// Output offset of the `<p>` tag.
    start: Option<usize>,
    content: ParagraphContent,
}

impl Default for ParagraphState {
    fn default() -> Self {
        Self {
            start: None,
            content: ParagraphContent::Empty,
        }
    }
}

impl ParagraphState {
    /// Open a paragraph whose `<p>` tag starts at `start`.
    pub fn open(&mut self, start: usize) {
        self.start = Some(start);
        self.content = ParagraphContent::Empty;
    }

    /// Check if a paragraph is open.
    pub fn is_open(&self) -> bool {
        self.start.is_some()
    }

    /// Record one event inside the paragraph.
    pub fn note(&mut self, display_math: bool) {
        self.content = match (self.content, display_math) {
            (ParagraphContent::Empty, true) => ParagraphContent::DisplayMath,
            _ => ParagraphContent::Mixed,
        };
    }

    /// Close the paragraph.
    ///
    /// Returns the `<p>` offset and whether the paragraph held only display math.
    pub fn close(&mut self) -> Option<(usize, bool)> {
        let start = self.start.take()?;
        Some((start, self.content == ParagraphContent::DisplayMath))
    }
}

/// Escape HTML special characters.
///
/// Single quotes are left as-is; attribute values are always double-quoted.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

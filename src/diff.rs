//! Side-by-side HTML diff tables.
//!
//! Renders two decoded line sequences into a two-column, line-aligned table
//! with inline change highlighting, collapsed context around changes, cell
//! wrapping at a fixed column, and in-page change navigation. Output is a
//! pure function of the inputs: no timestamps or random IDs, so identical
//! inputs produce byte-identical markup and report diffs stay meaningful
//! across runs.
use difference::{Changeset, Difference};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpanKind {
    Plain,
    /// Present only on the right side.
    Add,
    /// Present only on the left side.
    Sub,
    /// Replaced region, highlighted on both sides.
    Chg,
}

impl SpanKind {
    fn css_class(self) -> Option<&'static str> {
        match self {
            SpanKind::Plain => None,
            SpanKind::Add => Some("diff_add"),
            SpanKind::Sub => Some("diff_sub"),
            SpanKind::Chg => Some("diff_chg"),
        }
    }
}

#[derive(Debug, Clone)]
struct Span {
    kind: SpanKind,
    text: String,
}

impl Span {
    fn new(kind: SpanKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }

    fn plain(text: &str) -> Self {
        Self::new(SpanKind::Plain, text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowKind {
    Context,
    Change,
}

/// One aligned row pair; either side may be absent (pure insert/delete).
#[derive(Debug, Clone)]
struct Row {
    kind: RowKind,
    left: Option<(usize, Vec<Span>)>,
    right: Option<(usize, Vec<Span>)>,
}

impl Row {
    fn context(line_a: usize, line_b: usize, text: &str) -> Self {
        Self {
            kind: RowKind::Context,
            left: Some((line_a, vec![Span::plain(text)])),
            right: Some((line_b, vec![Span::plain(text)])),
        }
    }

    fn delete(line_a: usize, text: &str) -> Self {
        Self {
            kind: RowKind::Change,
            left: Some((line_a, vec![Span::new(SpanKind::Sub, text)])),
            right: None,
        }
    }

    fn insert(line_b: usize, text: &str) -> Self {
        Self {
            kind: RowKind::Change,
            left: None,
            right: Some((line_b, vec![Span::new(SpanKind::Add, text)])),
        }
    }

    fn replace(line_a: usize, left: Vec<Span>, line_b: usize, right: Vec<Span>) -> Self {
        Self {
            kind: RowKind::Change,
            left: Some((line_a, left)),
            right: Some((line_b, right)),
        }
    }
}

#[derive(Debug)]
enum OutRow {
    Line(Row),
    /// Run of unchanged lines collapsed away; carries the hidden count.
    Skip(usize),
}

#[derive(Debug, Clone)]
pub struct DiffRenderer {
    context_lines: usize,
    wrap_column: usize,
}

impl DiffRenderer {
    pub fn new(context_lines: usize, wrap_column: usize) -> Self {
        Self {
            context_lines,
            wrap_column,
        }
    }

    /// Render one diff table. `anchor` must be unique per table within the
    /// report; change anchors are derived from it as `{anchor}__{n}`.
    pub fn render(
        &self,
        label_a: &str,
        lines_a: &[String],
        label_b: &str,
        lines_b: &[String],
        anchor: &str,
    ) -> String {
        let rows = build_rows(lines_a, lines_b);
        let has_changes = rows.iter().any(|row| row.kind == RowKind::Change);
        if !has_changes {
            return self.render_clean_table(label_a, label_b, anchor);
        }
        let out_rows = collapse_context(rows, self.context_lines);
        let block_starts = change_block_starts(&out_rows);

        let mut html = String::new();
        html.push_str(&format!("<table class=\"diff\" id=\"{anchor}\">\n"));
        html.push_str("<thead><tr>");
        html.push_str(&format!(
            "<th class=\"diff_next\"><a href=\"#{anchor}__0\">f</a></th>"
        ));
        html.push_str(&format!(
            "<th class=\"diff_header\" colspan=\"2\">{}</th>",
            escape_html(label_a)
        ));
        html.push_str(&format!(
            "<th class=\"diff_header\" colspan=\"2\">{}</th>",
            escape_html(label_b)
        ));
        html.push_str("</tr></thead>\n<tbody>\n");

        let mut block = 0usize;
        for (pos, out_row) in out_rows.iter().enumerate() {
            match out_row {
                OutRow::Skip(hidden) => {
                    html.push_str(&format!(
                        "<tr><td class=\"diff_next\">&nbsp;</td>\
                         <td class=\"diff_skip\" colspan=\"4\">{hidden} unchanged \
                         line(s) hidden</td></tr>\n"
                    ));
                }
                OutRow::Line(row) => {
                    let nav = if block_starts.get(block) == Some(&pos) {
                        let link = if block + 1 < block_starts.len() {
                            format!("<a href=\"#{anchor}__{}\">n</a>", block + 1)
                        } else {
                            "<a href=\"#top\">t</a>".to_string()
                        };
                        let cell = format!("<a id=\"{anchor}__{block}\"></a>{link}");
                        block += 1;
                        cell
                    } else {
                        "&nbsp;".to_string()
                    };
                    self.push_row(&mut html, row, &nav);
                }
            }
        }
        html.push_str("</tbody>\n</table>\n");
        html
    }

    fn render_clean_table(&self, label_a: &str, label_b: &str, anchor: &str) -> String {
        format!(
            "<table class=\"diff\" id=\"{anchor}\">\n<thead><tr>\
             <th class=\"diff_next\">&nbsp;</th>\
             <th class=\"diff_header\" colspan=\"2\">{}</th>\
             <th class=\"diff_header\" colspan=\"2\">{}</th>\
             </tr></thead>\n<tbody>\n\
             <tr><td class=\"diff_next\">&nbsp;</td>\
             <td class=\"diff_skip\" colspan=\"4\">No differences</td></tr>\n\
             </tbody>\n</table>\n",
            escape_html(label_a),
            escape_html(label_b)
        )
    }

    /// Emit one logical row, wrapping each cell at the configured column.
    /// Continuation rows carry no line number and no nav cell content.
    fn push_row(&self, html: &mut String, row: &Row, nav: &str) {
        let left_wrapped = wrap_side(&row.left, self.wrap_column);
        let right_wrapped = wrap_side(&row.right, self.wrap_column);
        let height = left_wrapped.len().max(right_wrapped.len()).max(1);

        for i in 0..height {
            html.push_str("<tr>");
            if i == 0 {
                html.push_str(&format!("<td class=\"diff_next\">{nav}</td>"));
            } else {
                html.push_str("<td class=\"diff_next\">&nbsp;</td>");
            }
            push_side(html, &row.left, left_wrapped.get(i), i == 0);
            push_side(html, &row.right, right_wrapped.get(i), i == 0);
            html.push_str("</tr>\n");
        }
    }
}

fn push_side(html: &mut String, side: &Option<(usize, Vec<Span>)>, chunk: Option<&Vec<Span>>, first: bool) {
    let number = match (side, first) {
        (Some((number, _)), true) => number.to_string(),
        _ => String::new(),
    };
    html.push_str(&format!("<td class=\"diff_header\">{number}</td>"));
    let body = match chunk {
        Some(spans) => spans_html(spans),
        None => String::new(),
    };
    html.push_str(&format!("<td nowrap=\"nowrap\">{body}</td>"));
}

fn spans_html(spans: &[Span]) -> String {
    let mut out = String::new();
    for span in spans {
        if span.text.is_empty() {
            continue;
        }
        let escaped = escape_html(&span.text);
        match span.kind.css_class() {
            Some(class) => out.push_str(&format!("<span class=\"{class}\">{escaped}</span>")),
            None => out.push_str(&escaped),
        }
    }
    out
}

fn wrap_side(side: &Option<(usize, Vec<Span>)>, width: usize) -> Vec<Vec<Span>> {
    match side {
        Some((_, spans)) => wrap_spans(spans, width),
        None => Vec::new(),
    }
}

/// Split a span sequence into rows of at most `width` characters, keeping
/// each chunk's highlight kind.
fn wrap_spans(spans: &[Span], width: usize) -> Vec<Vec<Span>> {
    if width == 0 {
        return vec![spans.to_vec()];
    }
    let mut rows: Vec<Vec<Span>> = Vec::new();
    let mut current: Vec<Span> = Vec::new();
    let mut column = 0usize;
    for span in spans {
        let chars: Vec<char> = span.text.chars().collect();
        let mut index = 0usize;
        while index < chars.len() {
            if column == width {
                rows.push(std::mem::take(&mut current));
                column = 0;
            }
            let take = (chars.len() - index).min(width - column);
            let piece: String = chars[index..index + take].iter().collect();
            current.push(Span {
                kind: span.kind,
                text: piece,
            });
            index += take;
            column += take;
        }
    }
    rows.push(current);
    rows
}

/// Pair the two line sequences into aligned rows via a line-level changeset,
/// with a second char-level pass highlighting replaced regions in-line.
fn build_rows(lines_a: &[String], lines_b: &[String]) -> Vec<Row> {
    let a_text = lines_a.join("\n");
    let b_text = lines_b.join("\n");
    let changeset = Changeset::new(&a_text, &b_text, "\n");

    let mut rows = Vec::new();
    let mut line_a = 0usize;
    let mut line_b = 0usize;
    let mut diffs = changeset.diffs.iter().peekable();
    while let Some(diff) = diffs.next() {
        match diff {
            Difference::Same(block) => {
                for line in block.split('\n') {
                    line_a += 1;
                    line_b += 1;
                    rows.push(Row::context(line_a, line_b, line));
                }
            }
            Difference::Rem(block) => {
                let removed: Vec<&str> = block.split('\n').collect();
                if matches!(diffs.peek(), Some(Difference::Add(_))) {
                    let Some(Difference::Add(added_block)) = diffs.next() else {
                        unreachable!("peeked an Add");
                    };
                    let added: Vec<&str> = added_block.split('\n').collect();
                    let paired = removed.len().min(added.len());
                    for i in 0..paired {
                        line_a += 1;
                        line_b += 1;
                        let (left, right) = intraline(removed[i], added[i]);
                        rows.push(Row::replace(line_a, left, line_b, right));
                    }
                    for line in &removed[paired..] {
                        line_a += 1;
                        rows.push(Row::delete(line_a, line));
                    }
                    for line in &added[paired..] {
                        line_b += 1;
                        rows.push(Row::insert(line_b, line));
                    }
                } else {
                    for line in removed {
                        line_a += 1;
                        rows.push(Row::delete(line_a, line));
                    }
                }
            }
            Difference::Add(block) => {
                for line in block.split('\n') {
                    line_b += 1;
                    rows.push(Row::insert(line_b, line));
                }
            }
        }
    }
    rows
}

/// Char-level markup for one replaced line pair. A removed region directly
/// followed by an added region is a change (highlighted on both sides);
/// lone regions are plain deletions/insertions.
fn intraline(old: &str, new: &str) -> (Vec<Span>, Vec<Span>) {
    let changeset = Changeset::new(old, new, "");
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut diffs = changeset.diffs.iter().peekable();
    while let Some(diff) = diffs.next() {
        match diff {
            Difference::Same(text) => {
                left.push(Span::plain(text));
                right.push(Span::plain(text));
            }
            Difference::Rem(text) => {
                if matches!(diffs.peek(), Some(Difference::Add(_))) {
                    let Some(Difference::Add(added)) = diffs.next() else {
                        unreachable!("peeked an Add");
                    };
                    left.push(Span::new(SpanKind::Chg, text));
                    right.push(Span::new(SpanKind::Chg, added));
                } else {
                    left.push(Span::new(SpanKind::Sub, text));
                }
            }
            Difference::Add(text) => right.push(Span::new(SpanKind::Add, text)),
        }
    }
    (left, right)
}

/// Keep `context` unchanged rows around each change, collapse the rest.
fn collapse_context(rows: Vec<Row>, context: usize) -> Vec<OutRow> {
    let mut keep = vec![false; rows.len()];
    for (i, row) in rows.iter().enumerate() {
        if row.kind == RowKind::Change {
            let lo = i.saturating_sub(context);
            let hi = (i + context).min(rows.len().saturating_sub(1));
            for flag in &mut keep[lo..=hi] {
                *flag = true;
            }
        }
    }
    let mut out = Vec::new();
    let mut hidden = 0usize;
    for (i, row) in rows.into_iter().enumerate() {
        if keep[i] {
            if hidden > 0 {
                out.push(OutRow::Skip(hidden));
                hidden = 0;
            }
            out.push(OutRow::Line(row));
        } else {
            hidden += 1;
        }
    }
    if hidden > 0 {
        out.push(OutRow::Skip(hidden));
    }
    out
}

/// Positions (into the output row list) where a change block begins.
fn change_block_starts(out_rows: &[OutRow]) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut in_block = false;
    for (pos, out_row) in out_rows.iter().enumerate() {
        match out_row {
            OutRow::Line(row) if row.kind == RowKind::Change => {
                if !in_block {
                    starts.push(pos);
                    in_block = true;
                }
            }
            _ => in_block = false,
        }
    }
    starts
}

/// Escape text for embedding in HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

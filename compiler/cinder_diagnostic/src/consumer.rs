//! Diagnostic consumers: the stream renderer and the error-tracking wrapper.
//!
//! The stream consumer is the layout engine. For each collection it prints
//! a header and locator, then for each message: the source line with
//! control characters escaped and every surviving span colored, a caret row
//! (`^~` underlines, `+` inserts, `-` removes), and a message canvas where
//! suggestion texts are placed right-to-left, slid downward on collision,
//! and connected to their anchor columns with `|` and `/` leader lines.
//!
//! Overlapping suggestion spans are resolved before layout: the more severe
//! level keeps the shared bytes and the other span is truncated, repeated
//! until the span list is disjoint.

use std::io::{self, Write};

use crate::diagnostic::{
    Diagnostic, DiagnosticCollection, DiagnosticLevel, DiagnosticLocation, DiagnosticMessage,
    DiagnosticPatchKind, Suggestion,
};
use crate::span::Span;

/// Receives finished diagnostics.
///
/// Consumers may render immediately or buffer and re-emit on `flush`.
pub trait DiagnosticConsumer {
    fn consume(&mut self, diagnostic: Diagnostic);

    fn flush(&mut self) {}
}

/// Terminal colors used by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Yellow,
    Blue,
    Green,
    Magenta,
    White,
}

impl Color {
    fn ansi(self, bold: bool) -> &'static str {
        match (self, bold) {
            (Color::Red, false) => "\x1b[31m",
            (Color::Red, true) => "\x1b[1;31m",
            (Color::Yellow, false) => "\x1b[33m",
            (Color::Yellow, true) => "\x1b[1;33m",
            (Color::Blue, false) => "\x1b[34m",
            (Color::Blue, true) => "\x1b[1;34m",
            (Color::Green, false) => "\x1b[32m",
            (Color::Green, true) => "\x1b[1;32m",
            (Color::Magenta, false) => "\x1b[35m",
            (Color::Magenta, true) => "\x1b[1;35m",
            (Color::White, false) => "\x1b[37m",
            (Color::White, true) => "\x1b[1;37m",
        }
    }
}

const COLOR_RESET: &str = "\x1b[0m";

/// Color output mode, resolved against terminal detection by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Use colors when the output is a TTY.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    #[must_use]
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

fn level_color(level: DiagnosticLevel) -> Color {
    match level {
        DiagnosticLevel::Error => Color::Red,
        DiagnosticLevel::Note => Color::Blue,
        DiagnosticLevel::Warning => Color::Yellow,
        DiagnosticLevel::Info => Color::Green,
    }
}

fn get_digits(mut number: u32) -> u32 {
    let mut digits = 0;
    while number != 0 {
        number /= 10;
        digits += 1;
    }
    digits
}

fn max_line_number_width(collection: &DiagnosticCollection) -> u32 {
    collection
        .messages
        .iter()
        .map(|message| get_digits(message.location.line_number))
        .max()
        .unwrap_or(0)
}

/// Byte-slice a rendered line, clamping both ends.
fn slice_line(line: &[u8], start: u32, end: u32) -> &[u8] {
    let s = (start as usize).min(line.len());
    let e = (end as usize).min(line.len()).max(s);
    &line[s..e]
}

/// A disjoint rendered span with the suggestion indices it absorbed.
#[derive(Clone, Debug)]
struct NormalizedSpan {
    span: Span,
    level: DiagnosticLevel,
    patch_kind: DiagnosticPatchKind,
    ids: Vec<usize>,
}

/// A placed suggestion text: its row, anchor column, and leader span.
struct SuggestionPosition {
    row: usize,
    col: usize,
    span: Span,
    level: DiagnosticLevel,
}

/// One cell of the message canvas.
#[derive(Clone, Copy)]
struct Cell {
    c: u8,
    color: Color,
    bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            c: 0,
            color: Color::White,
            bold: false,
        }
    }
}

/// Writer wrapper carrying the color switch.
struct Painter<'w> {
    out: &'w mut dyn Write,
    colors: bool,
}

impl Painter<'_> {
    fn set_color(&mut self, color: Color, bold: bool) -> io::Result<()> {
        if self.colors {
            self.out.write_all(color.ansi(bold).as_bytes())?;
        }
        Ok(())
    }

    fn reset_color(&mut self) -> io::Result<()> {
        if self.colors {
            self.out.write_all(COLOR_RESET.as_bytes())?;
        }
        Ok(())
    }

    fn indent(&mut self, count: u32) -> io::Result<()> {
        for _ in 0..count {
            self.out.write_all(b" ")?;
        }
        Ok(())
    }
}

/// Escape `\n`, `\r`, `\t` in a source line, recording which byte indices
/// expanded by one extra column so spans can be remapped.
fn escaped_string(line: &str) -> (String, Vec<u8>) {
    let count = line
        .bytes()
        .filter(|&b| b == b'\n' || b == b'\r' || b == b'\t')
        .count();
    if count == 0 {
        return (line.to_string(), Vec::new());
    }

    let mut out = Vec::with_capacity(line.len() + count * 2);
    let mut positions = vec![0u8; line.len()];
    for (i, b) in line.bytes().enumerate() {
        match b {
            b'\n' => {
                out.extend_from_slice(b"\\n");
                positions[i] = 1;
            }
            b'\r' => {
                out.extend_from_slice(b"\\r");
                positions[i] = 1;
            }
            b'\t' => {
                out.extend_from_slice(b"\\t");
                positions[i] = 1;
            }
            _ => out.push(b),
        }
    }
    (String::from_utf8_lossy(&out).into_owned(), positions)
}

/// Normalize a message's suggestion spans for rendering.
///
/// Sorts by `(start, patch kind)` with inserts first, substitutes the
/// message's own span for empty ones, resolves relative spans against the
/// message column, remaps through the escape-offset table, and accumulates
/// the shift introduced by insert patches. Returns the message's default
/// span.
fn normalize_suggestions(message: &mut DiagnosticMessage, offsets: &[u8]) -> Span {
    let line_len = message.location.line.len() as u32;
    let column = message.location.column_number;
    let mut len = message.location.length;
    if line_len >= column {
        len = len.min(line_len - column);
    }
    let default_span = Span::new(column, column + len);

    message.suggestions.sort_by(|lhs, rhs| {
        lhs.span
            .start()
            .cmp(&rhs.span.start())
            .then_with(|| rhs.patch_kind.cmp(&lhs.patch_kind))
    });

    let offset_at = |i: u32| -> u32 { offsets.get(i as usize).map_or(0, |&o| u32::from(o)) };

    let mut shift = 0u32;
    for suggestion in &mut message.suggestions {
        if suggestion.span.is_empty() {
            suggestion.span = default_span;
            continue;
        }

        if suggestion.span.is_relative() {
            suggestion.span.set_offset(i64::from(column));
        }

        if !offsets.is_empty() {
            let mut start = suggestion.span.raw().start();
            let leading: u32 = offsets
                .iter()
                .take(start as usize)
                .map(|&o| u32::from(o))
                .sum();
            let mut size = suggestion.span.size();
            let old_shift = suggestion.span.shift();

            start += leading;
            if offset_at(start) != 0 {
                start += offset_at(start);
            }

            let grow = offset_at(start);
            let mut i = start;
            while i < start + size {
                if offset_at(i) != 0 {
                    size += grow;
                }
                i += 1;
            }

            suggestion.span = Span::from_size(start, size).with_shift(old_shift);
        }

        if suggestion.patch_kind == DiagnosticPatchKind::Insert {
            let size = suggestion.patch_content.len() as u32;
            suggestion.span = Span::from_size(suggestion.span.start(), size).with_shift(shift);
            shift += size;
        } else {
            suggestion.span = suggestion.span.with_shift(shift);
        }
    }

    default_span
}

/// Resolve overlapping suggestion spans into a disjoint, sorted list.
///
/// The more severe (numerically lower) level keeps shared bytes; the other
/// span is truncated to what remains. Insert spans never interact here.
fn fix_and_construct_unique_sorted_span(message: &mut DiagnosticMessage) -> Vec<NormalizedSpan> {
    let mut unique: Vec<NormalizedSpan> = Vec::new();
    if message.suggestions.is_empty() || message.location.line.is_empty() {
        return unique;
    }

    if message.suggestions.len() > 2 {
        let mut no_overlap = false;
        while !no_overlap {
            no_overlap = true;
            message.suggestions.sort_by(|lhs, rhs| {
                (lhs.span.start(), lhs.span.end(), lhs.level).cmp(&(
                    rhs.span.start(),
                    rhs.span.end(),
                    rhs.level,
                ))
            });

            for i in 0..message.suggestions.len() - 1 {
                let (lhs_span, lhs_level, lhs_kind) = {
                    let s = &message.suggestions[i];
                    (s.span, s.level, s.patch_kind)
                };
                let (rhs_span, rhs_kind) = {
                    let s = &message.suggestions[i + 1];
                    (s.span, s.patch_kind)
                };
                if lhs_kind == DiagnosticPatchKind::Insert || rhs_kind == DiagnosticPatchKind::Insert
                {
                    continue;
                }

                let raw_lhs = lhs_span.raw();
                let raw_rhs = rhs_span.raw();

                no_overlap = lhs_span.outside_of(rhs_span) && no_overlap;

                if lhs_level <= message.suggestions[i + 1].level {
                    message.suggestions[i].span =
                        Span::new(raw_lhs.start(), raw_lhs.end()).with_shift(lhs_span.shift());
                    message.suggestions[i + 1].span =
                        Span::new(raw_rhs.start().max(raw_lhs.end()), raw_rhs.end())
                            .with_shift(rhs_span.shift());
                } else {
                    message.suggestions[i].span =
                        Span::new(raw_lhs.start(), raw_lhs.end().min(raw_rhs.start()))
                            .with_shift(lhs_span.shift());
                    message.suggestions[i + 1].span =
                        Span::new(raw_rhs.start(), raw_rhs.end()).with_shift(rhs_span.shift());
                }
            }
        }
    }

    let first = &message.suggestions[0];
    unique.push(NormalizedSpan {
        span: first.span,
        level: first.level,
        patch_kind: first.patch_kind,
        ids: vec![0],
    });

    for i in 1..message.suggestions.len() {
        let el = &message.suggestions[i];
        let Some(mut top) = unique.pop() else {
            unique.push(NormalizedSpan {
                span: el.span,
                level: el.level,
                patch_kind: el.patch_kind,
                ids: vec![i],
            });
            continue;
        };

        let (lhs, rhs) = top.span.split_if_intersect(el.span);
        let level = top.level.min(el.level);

        if lhs.is_valid() && rhs.is_valid() {
            unique.push(NormalizedSpan {
                span: lhs,
                level: top.level,
                patch_kind: top.patch_kind,
                ids: top.ids,
            });
            unique.push(NormalizedSpan {
                span: rhs,
                level: el.level,
                patch_kind: el.patch_kind,
                ids: vec![i],
            });
        } else if lhs.is_valid() {
            top.span = lhs;
            top.level = level;
            top.ids.push(i);
            unique.push(top);
        } else {
            top.span = rhs;
            top.level = level;
            top.ids.push(i);
            unique.push(top);
        }
    }

    unique
}

fn print_line_number(painter: &mut Painter<'_>, line_number: u32, width: u32) -> io::Result<()> {
    painter.set_color(Color::Magenta, false)?;
    if line_number == 0 {
        painter.indent(width)?;
        painter.out.write_all(b" | ")?;
        painter.reset_color()?;
        return Ok(());
    }
    painter.indent(width.saturating_sub(get_digits(line_number)))?;
    painter.set_color(Color::Magenta, true)?;
    write!(painter.out, "{line_number}")?;
    painter.set_color(Color::Magenta, false)?;
    painter.out.write_all(b" | ")?;
    painter.reset_color()?;
    Ok(())
}

/// Print the escaped source line with colored spans and the caret row.
fn highlight_context(
    painter: &mut Painter<'_>,
    location: &DiagnosticLocation,
    width: u32,
    suggestions: &[Suggestion],
    unique_spans: &mut Vec<NormalizedSpan>,
    default_context: NormalizedSpan,
) -> io::Result<()> {
    let line = location.line.trim_end();
    let line_bytes = line.as_bytes();
    print_line_number(painter, location.line_number, width)?;

    if line.is_empty() {
        return Ok(());
    }

    let mut is_error_pushed = false;
    if unique_spans.is_empty() {
        if default_context.span.is_empty() {
            painter.out.write_all(line_bytes)?;
            painter.out.write_all(b"\n")?;
            return Ok(());
        }
        unique_spans.push(default_context);
        is_error_pushed = true;
    }

    let mut last_end = 0u32;
    for suggestion in unique_spans.iter() {
        let span = suggestion.span.raw();
        if span.is_empty() {
            continue;
        }
        let prefix = slice_line(line_bytes, last_end, span.start());

        let highlight: &[u8] = if suggestion.patch_kind == DiagnosticPatchKind::Insert {
            let content = &suggestions[suggestion.ids[0]].patch_content;
            last_end = span.start();
            content.as_bytes()
        } else {
            last_end = span.end();
            slice_line(line_bytes, span.start(), span.end())
        };

        if !prefix.is_empty() {
            painter.out.write_all(prefix)?;
        }

        if !highlight.is_empty() {
            painter.set_color(level_color(suggestion.level), true)?;
            painter.out.write_all(highlight)?;
            painter.reset_color()?;
        }
    }

    if (last_end as usize) < line_bytes.len() {
        painter.out.write_all(slice_line(
            line_bytes,
            last_end,
            line_bytes.len() as u32,
        ))?;
    }
    painter.out.write_all(b"\n")?;

    print_line_number(painter, 0, width)?;

    let mut last_end = 0u32;
    for suggestion in unique_spans.iter() {
        let span = suggestion.span;
        if span.is_empty() {
            continue;
        }
        painter.indent(span.start().saturating_sub(last_end))?;
        painter.set_color(level_color(suggestion.level), true)?;
        for i in 0..span.size() {
            let c = match suggestion.patch_kind {
                DiagnosticPatchKind::Insert => b'+',
                DiagnosticPatchKind::Remove => b'-',
                DiagnosticPatchKind::None => {
                    if i == 0 {
                        b'^'
                    } else {
                        b'~'
                    }
                }
            };
            painter.out.write_all(&[c])?;
        }
        painter.reset_color()?;
        last_end = span.end();
    }
    painter.out.write_all(b"\n")?;

    if is_error_pushed {
        unique_spans.pop();
    }
    Ok(())
}

/// Paint leader lines for rows above each placed suggestion.
///
/// `|` when the leader is still at the anchor column, `/` when it has
/// drifted left. Leader painting never overwrites text; an occupied cell
/// pushes the anchor one column left, and the drift is remembered for the
/// rows above.
fn add_span_path(
    buffer: &mut [Cell],
    positions: &mut [SuggestionPosition],
    current_row: isize,
) {
    for el in positions.iter_mut() {
        if current_row >= el.row as isize {
            continue;
        }
        let start = el.col;
        let mut c = if el.span.start() as usize == start {
            b'|'
        } else {
            b'/'
        };

        let mut has_offset_applied = false;
        loop {
            let idx = el.span.start() as usize;
            if idx >= buffer.len() || buffer[idx].c == 0 || idx == 0 {
                break;
            }
            el.span.set_offset(-1);
            has_offset_applied = true;
            c = if el.span.start() as usize == start {
                b'|'
            } else {
                b'/'
            };
        }

        let idx = el.span.start() as usize;
        if idx < buffer.len() {
            buffer[idx] = Cell {
                c,
                color: level_color(el.level),
                bold: false,
            };
        }
        if has_offset_applied && c != b'|' {
            el.span.set_offset(-1);
        }
    }
}

const TEXT_PADDING: usize = 4;

/// Lay the suggestion texts out on the canvas and print it.
///
/// Spans are processed right to left. Each first text sits at its span's
/// start column, sliding down a row while it collides with placed text.
/// Additional messages on the same span either stack in a `|-` list (when
/// there is no room to spill left) or staircase two columns left per row.
fn print_suggestions_message(
    painter: &mut Painter<'_>,
    width: u32,
    col_count: usize,
    unique_spans: &mut [NormalizedSpan],
    suggestions: &[Suggestion],
) -> io::Result<()> {
    let row_count = suggestions.len().max(20) + 1;
    let mut cells = vec![Cell::default(); row_count * col_count];

    let mut max_line_index = 0usize;
    let mut line_index = 0usize;
    let mut positions: Vec<SuggestionPosition> = Vec::new();
    positions.reserve(unique_spans.len());

    for idx in (0..unique_spans.len()).rev() {
        let second_last_col = if idx == 0 {
            0usize
        } else {
            unique_spans[idx - 1].span.start() as usize
        };
        let el = &mut unique_spans[idx];

        let kept: Vec<usize> = el
            .ids
            .iter()
            .copied()
            .filter(|&i| !suggestions[i].message.is_empty())
            .collect();
        if kept.is_empty() {
            continue;
        }

        let first = &suggestions[kept[0]];
        let remaining = el.ids.len() - 1;
        let first_text = first.message.as_bytes();
        let mut col_start = first.span.start() as usize;

        // Slide down until the first text's row is free.
        loop {
            let mut collision = false;
            let end = (first_text.len() + TEXT_PADDING + col_start).min(col_count);
            for i in col_start..end {
                if cells[line_index * col_count + i].c != 0 {
                    line_index += 1;
                    collision = true;
                    break;
                }
            }
            if !collision {
                break;
            }
            if line_index >= row_count {
                line_index = row_count - 1;
                break;
            }
        }
        debug_assert!(line_index < row_count);

        // How many stacked messages could staircase to the left of here.
        let mut total_fit = 0usize;
        loop {
            if total_fit > remaining {
                total_fit -= 1;
                break;
            }
            if col_start < total_fit * 2 {
                break;
            }
            total_fit += 1;
        }

        let diff = col_start.wrapping_sub(second_last_col);
        let mut need_list = false;
        if remaining != 0 {
            need_list = (total_fit > remaining) || (diff <= total_fit * 2);
        }

        positions.push(SuggestionPosition {
            row: line_index,
            col: col_start,
            span: first.span,
            level: first.level,
        });

        if need_list {
            put_list_index(&mut cells, col_count, line_index, col_start, first.level);
        }

        {
            let text_col_start = col_start + 2 * usize::from(need_list);
            let n = first_text
                .len()
                .min(col_count.saturating_sub(col_start + 1));
            for (i, &b) in first_text[..n].iter().enumerate() {
                let col = text_col_start + i;
                if col < col_count {
                    cells[line_index * col_count + col] = Cell {
                        c: b,
                        color: level_color(first.level),
                        bold: false,
                    };
                }
            }
        }

        for (col, &suggestion_idx) in kept.iter().enumerate().skip(1) {
            let suggestion = &suggestions[suggestion_idx];
            let text = suggestion.message.as_bytes();
            let row = line_index + col;
            if row >= row_count {
                break;
            }

            let current_col;
            if need_list {
                put_list_index(&mut cells, col_count, row, col_start, suggestion.level);
                current_col = col_start + 2;
            } else {
                col_start = col_start.saturating_sub(2);
                current_col = col_start;
                positions.push(SuggestionPosition {
                    row,
                    col: current_col,
                    span: suggestion.span,
                    level: suggestion.level,
                });
            }

            let n = text.len().min(col_count.saturating_sub(current_col + 1));
            for (i, &b) in text[..n].iter().enumerate() {
                let cell_col = current_col + i;
                if cell_col < col_count {
                    cells[row * col_count + cell_col] = Cell {
                        c: b,
                        color: level_color(suggestion.level),
                        bold: false,
                    };
                }
            }

            max_line_index = max_line_index.max(row);
        }

        el.ids.clear();
        max_line_index = max_line_index.max(line_index);
    }

    // Leader row above all message rows.
    {
        let mut buffer = vec![Cell::default(); col_count];
        add_span_path(&mut buffer, &mut positions, -1);
        print_line_number(painter, 0, width)?;
        let mut max_col = 0usize;
        for (col, cell) in buffer.iter().enumerate() {
            if cell.c != 0 {
                max_col = col;
            }
        }
        for cell in &buffer[..=max_col] {
            painter.set_color(cell.color, cell.bold)?;
            painter
                .out
                .write_all(&[if cell.c == 0 { b' ' } else { cell.c }])?;
        }
        painter.out.write_all(b"\n")?;
    }

    for row in 0..=max_line_index.min(row_count - 1) {
        let mut max_col = 0usize;
        for col in 0..col_count {
            if cells[row * col_count + col].c != 0 {
                max_col = col;
            }
        }

        let line = &mut cells[row * col_count..row * col_count + max_col + 1];
        add_span_path(line, &mut positions, row as isize);

        print_line_number(painter, 0, width)?;
        for cell in line.iter() {
            painter.set_color(cell.color, cell.bold)?;
            painter
                .out
                .write_all(&[if cell.c == 0 { b' ' } else { cell.c }])?;
        }
        painter.reset_color()?;
        painter.out.write_all(b"\n")?;
    }

    Ok(())
}

fn put_list_index(
    cells: &mut [Cell],
    col_count: usize,
    row: usize,
    col: usize,
    level: DiagnosticLevel,
) {
    let color = level_color(level);
    if col < col_count {
        cells[row * col_count + col] = Cell {
            c: b'|',
            color,
            bold: false,
        };
    }
    if col + 1 < col_count {
        cells[row * col_count + col + 1] = Cell {
            c: b'-',
            color,
            bold: false,
        };
    }
}

/// Renders diagnostics to a byte stream, optionally with ANSI colors.
pub struct StreamDiagnosticConsumer<W: Write> {
    stream: W,
    colors: bool,
    has_printed: bool,
}

impl<W: Write> StreamDiagnosticConsumer<W> {
    /// A colorless renderer.
    pub fn new(stream: W) -> Self {
        StreamDiagnosticConsumer {
            stream,
            colors: false,
            has_printed: false,
        }
    }

    /// A renderer with colors resolved from `mode` and `is_tty`.
    pub fn with_color_mode(stream: W, mode: ColorMode, is_tty: bool) -> Self {
        StreamDiagnosticConsumer {
            stream,
            colors: mode.should_use_colors(is_tty),
            has_printed: false,
        }
    }

    /// Forget that anything was printed, suppressing the next separator.
    pub fn reset(&mut self) {
        self.has_printed = false;
    }

    fn render(&mut self, mut diagnostic: Diagnostic) -> io::Result<()> {
        let mut painter = Painter {
            out: &mut self.stream,
            colors: self.colors,
        };

        if self.has_printed {
            painter.out.write_all(b"\n")?;
        }
        self.has_printed = true;

        for collection in &mut diagnostic.collections {
            let width = max_line_number_width(collection) + 1;
            if collection.messages.is_empty() {
                continue;
            }

            painter.set_color(level_color(collection.level), true)?;
            painter.out.write_all(collection.level.name().as_bytes())?;
            painter.set_color(Color::White, true)?;
            painter.out.write_all(b": ")?;
            painter.reset_color()?;
            writeln!(painter.out, "{}", collection.formatter.format())?;

            {
                let location = &collection.messages[0].location;
                if location.can_be_printed() {
                    painter.set_color(Color::Magenta, false)?;
                    painter.out.write_all(b"  --> ")?;
                    painter.reset_color()?;
                    writeln!(painter.out, "{location}")?;
                }
            }

            for message in &mut collection.messages {
                let (fixed_line, offsets) = escaped_string(&message.location.line);
                message.location.line = fixed_line;

                let default_span = normalize_suggestions(message, &offsets);
                let mut unique_spans = fix_and_construct_unique_sorted_span(message);

                if !message.location.line.is_empty() {
                    highlight_context(
                        &mut painter,
                        &message.location,
                        width,
                        &message.suggestions,
                        &mut unique_spans,
                        NormalizedSpan {
                            span: default_span,
                            level: collection.level,
                            patch_kind: DiagnosticPatchKind::None,
                            ids: Vec::new(),
                        },
                    )?;
                }

                if !unique_spans.is_empty() {
                    let last_span = unique_spans[unique_spans.len() - 1].span;
                    let line_size = message.location.line.len() as u32;
                    let (_lhs, rhs) = Span::new(0, line_size).split_if_intersect(last_span);

                    let extra_space = (if rhs.is_empty() {
                        last_span.size()
                    } else {
                        rhs.size()
                    }) as usize
                        + 10;
                    let col_count = (message.location.line.len() + extra_space).max(100);
                    print_suggestions_message(
                        &mut painter,
                        width,
                        col_count,
                        &mut unique_spans,
                        &message.suggestions,
                    )?;
                }
            }

            for context in &collection.contexts {
                painter.set_color(level_color(context.level), true)?;
                painter.out.write_all(context.level.name().as_bytes())?;
                painter.set_color(Color::White, true)?;
                painter.out.write_all(b": ")?;
                painter.reset_color()?;
                writeln!(painter.out, "{}", context.message)?;
            }
        }

        Ok(())
    }
}

impl<W: Write> DiagnosticConsumer for StreamDiagnosticConsumer<W> {
    fn consume(&mut self, diagnostic: Diagnostic) {
        let _ = self.render(diagnostic);
    }

    fn flush(&mut self) {
        let _ = self.stream.flush();
    }
}

/// Forwards diagnostics while remembering whether any had level `Error`.
pub struct ErrorTrackingDiagnosticConsumer<'c> {
    consumer: &'c mut dyn DiagnosticConsumer,
    seen_error: bool,
}

impl<'c> ErrorTrackingDiagnosticConsumer<'c> {
    pub fn new(consumer: &'c mut dyn DiagnosticConsumer) -> Self {
        ErrorTrackingDiagnosticConsumer {
            consumer,
            seen_error: false,
        }
    }

    #[must_use]
    pub fn seen_error(&self) -> bool {
        self.seen_error
    }

    pub fn reset(&mut self) {
        self.seen_error = false;
    }
}

impl DiagnosticConsumer for ErrorTrackingDiagnosticConsumer<'_> {
    fn consume(&mut self, diagnostic: Diagnostic) {
        self.seen_error |= diagnostic.level == DiagnosticLevel::Error;
        self.consumer.consume(diagnostic);
    }

    fn flush(&mut self) {
        self.consumer.flush();
    }
}

#[cfg(test)]
mod tests;

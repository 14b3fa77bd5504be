//! Joining per-run decompositions into one list of rows.
//!
//! Each run after the first starts on the previous run's last row, so its
//! first row and that row are the same visual line. The merger fuses the
//! two, then appends the rest of the run's rows.

use crate::line::{LineRecord, LineSpan};

/// Stateless helpers that stitch runs together.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanMerger;

impl SpanMerger {
    /// Fuse the first row of a run into the last row of the previous one.
    ///
    /// Width only grows when the new row draws something: an empty anchor
    /// row left by a run that wrapped immediately adds nothing.
    #[must_use]
    pub fn merge_boundary(current_first: LineRecord, previous_last: LineRecord) -> LineRecord {
        let width = if current_first.has_visible_content() {
            previous_last.width + current_first.width
        } else {
            previous_last.width
        };
        let mut value = previous_last.value;
        value.push_str(&current_first.value);
        let mut spans = previous_last.spans;
        spans.extend(current_first.spans);
        LineRecord {
            value,
            spans,
            width,
            height: previous_last.height.max(current_first.height),
            is_new_paragraph: previous_last.is_new_paragraph,
            is_last_in_paragraph: current_first.is_last_in_paragraph,
            bounds: previous_last.bounds,
            baseline: previous_last.baseline,
        }
    }

    /// Append a run's rows to the rows accumulated so far.
    pub fn append_run(accumulated: &mut Vec<LineRecord>, lines: Vec<LineRecord>) {
        let mut lines = lines.into_iter();
        let Some(first) = lines.next() else {
            return;
        };
        match accumulated.pop() {
            Some(previous) => accumulated.push(Self::merge_boundary(first, previous)),
            None => accumulated.push(first),
        }
        accumulated.extend(lines);
    }

    /// Recompute paragraph-end flags from the paragraph-start flags.
    pub fn finish(lines: &mut [LineRecord]) {
        let next_starts: Vec<bool> = lines
            .iter()
            .skip(1)
            .map(|line| line.is_new_paragraph)
            .chain(std::iter::once(true))
            .collect();
        for (line, ends) in lines.iter_mut().zip(next_starts) {
            line.is_last_in_paragraph = ends;
        }
    }

    /// Drop one trailing space from every row but the last.
    ///
    /// The removed width is the last glyph's advance when positions are
    /// known; shaped spans are re-measured through `remeasure`.
    pub fn trim_trailing_spaces(
        lines: &mut [LineRecord],
        mut remeasure: impl FnMut(&LineSpan) -> f32,
    ) {
        let Some((_, body)) = lines.split_last_mut() else {
            return;
        };
        for line in body {
            let Some(span) = line.spans.iter_mut().rev().find(|span| !span.embedded) else {
                continue;
            };
            if !span.text.ends_with(' ') {
                continue;
            }
            let _ = span.text.pop();
            let removed = match span.glyphs.as_mut() {
                Some(glyphs) => glyphs.pop().map_or(0.0, |glyph| glyph.width),
                None => {
                    let before = span.size.width;
                    before - remeasure(span)
                }
            };
            span.size.width = (span.size.width - removed).max(0.0);
            if line.value.ends_with(' ') {
                let _ = line.value.pop();
            }
            line.width = (line.width - removed).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::spans::RunId;

    fn span(text: &str, run: u32, width: f32) -> LineSpan {
        LineSpan {
            text: text.to_string(),
            run: Some(RunId(run)),
            glyphs: None,
            needs_shaping: false,
            needs_bidi: false,
            embedded: false,
            size: Size::new(width, 10.0),
        }
    }

    fn row(text: &str, run: u32, width: f32) -> LineRecord {
        LineRecord::with_span(span(text, run, width), 12.0, true)
    }

    #[test]
    fn test_merge_boundary_concatenates() {
        let previous = row("Hello ", 0, 36.0);
        let mut current = row("World", 1, 30.0);
        current.is_new_paragraph = false;
        current.is_last_in_paragraph = true;

        let merged = SpanMerger::merge_boundary(current, previous);
        assert_eq!(merged.value, "Hello World");
        assert_eq!(merged.spans.len(), 2);
        assert!((merged.width - 66.0).abs() < 1e-4);
        assert!(merged.is_new_paragraph);
        assert!(merged.is_last_in_paragraph);
    }

    #[test]
    fn test_empty_anchor_keeps_previous_width() {
        let previous = row("full", 0, 60.0);
        let anchor = LineRecord::placeholder(14.0, false);
        let merged = SpanMerger::merge_boundary(anchor, previous);
        assert!((merged.width - 60.0).abs() < 1e-4);
        assert!((merged.height - 14.0).abs() < 1e-4);
    }

    #[test]
    fn test_append_run_merges_only_the_boundary() {
        let mut lines = vec![row("a", 0, 6.0)];
        let mut second = vec![row("b", 1, 6.0), row("c", 1, 6.0)];
        second[0].is_new_paragraph = false;
        second[1].is_new_paragraph = false;
        SpanMerger::append_run(&mut lines, second);
        SpanMerger::finish(&mut lines);

        let values: Vec<_> = lines.iter().map(|line| line.value.as_str()).collect();
        assert_eq!(values, vec!["ab", "c"]);
        assert!(!lines[0].is_last_in_paragraph);
        assert!(lines[1].is_last_in_paragraph);
    }

    #[test]
    fn test_trim_trailing_spaces_skips_last_line() {
        let mut lines = vec![row("one ", 0, 24.0), row("two ", 0, 24.0)];
        SpanMerger::trim_trailing_spaces(&mut lines, |_| 18.0);
        assert_eq!(lines[0].value, "one");
        assert!((lines[0].width - 18.0).abs() < 1e-4);
        assert_eq!(lines[1].value, "two ");
    }
}

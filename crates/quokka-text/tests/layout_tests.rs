//! Integration tests for labels: truncation, run merging, auto-size and
//! justification.

use std::sync::Arc;

use quokka_text::display_list::DrawCommand;
use quokka_text::{
    ApproximateFace, AutoSizeMode, HorizontalAlignment, LineBreakMode, Rect, RunStyle, SpanList,
    StyledRun, TextContext, TextLabel, TextLayoutConfig,
};

/// Context whose face advances every character by `0.6 × size`.
fn ctx() -> Arc<TextContext> {
    Arc::new(TextContext::new(ApproximateFace::new("approx").into_handle()))
}

/// Size 10: 6 px per character, 12 px rows.
fn config() -> TextLayoutConfig {
    TextLayoutConfig {
        font_size: 10.0,
        ..TextLayoutConfig::default()
    }
}

fn glyph_xs(commands: &[DrawCommand]) -> Vec<Vec<f32>> {
    commands
        .iter()
        .filter_map(|command| match command {
            DrawCommand::Glyphs { glyphs, .. } => Some(glyphs.iter().map(|glyph| glyph.x).collect()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_tail_truncation_ends_with_trail() {
    let label = TextLabel::new(ctx(), "The quick brown fox jumps over the lazy dog").with_config(
        TextLayoutConfig {
            line_break_mode: LineBreakMode::TailTruncation,
            ..config()
        },
    );
    let prepared = label.prepare(90.0, f32::INFINITY, 1.0);
    assert!(prepared.was_cut);
    assert_eq!(prepared.lines.len(), 1);
    let last = &prepared.lines[0];
    assert!(last.value.ends_with(".."), "got {:?}", last.value);
    assert!(last.width <= 90.0 + 0.01);
}

#[test]
fn test_tail_truncation_with_two_lines() {
    let label = TextLabel::new(ctx(), "aaaa bbbb cccc dddd eeee").with_config(TextLayoutConfig {
        line_break_mode: LineBreakMode::TailTruncation,
        max_lines: Some(2),
        ..config()
    });
    let prepared = label.prepare(60.0, f32::INFINITY, 1.0);
    let values: Vec<_> = prepared.lines.iter().map(|line| line.value.as_str()).collect();
    assert_eq!(values, vec!["aaaa bbbb ", "cccc ddd.."]);
    assert!(prepared.was_cut);
}

#[test]
fn test_trail_survives_run_without_room() {
    let mut spans = SpanList::new();
    let _ = spans.attach(StyledRun::text("aaaaaaaa"));
    let _ = spans.attach(StyledRun::text("bbbb"));
    let label = TextLabel::rich(ctx(), spans).with_config(TextLayoutConfig {
        line_break_mode: LineBreakMode::TailTruncation,
        ..config()
    });
    // 48 px of "a" leave 8 px, less than the 12 px trail.
    let prepared = label.prepare(56.0, f32::INFINITY, 1.0);
    assert!(prepared.was_cut);
    assert_eq!(prepared.lines.len(), 1);
    let last = &prepared.lines[0];
    assert_eq!(last.value, "aaaaaaa..");
    assert!(last.width <= 56.0 + 0.01);
}

#[test]
fn test_custom_trail() {
    let label = TextLabel::new(ctx(), "abcdefghijklmnop").with_config(TextLayoutConfig {
        line_break_mode: LineBreakMode::TailTruncation,
        truncation_trail: "…".to_string(),
        ..config()
    });
    let _ = label.measure(36.0, f32::INFINITY, 1.0);
    assert_eq!(label.lines()[0].value, "abcde…");
}

#[test]
fn test_two_runs_merge_into_one_line() {
    let mut spans = SpanList::new();
    let _ = spans.attach(StyledRun::text("Hello "));
    let _ = spans.attach(StyledRun::text("World").with_style(RunStyle {
        underline: true,
        ..RunStyle::default()
    }));
    let label = TextLabel::rich(ctx(), spans).with_config(config());
    let _ = label.measure(300.0, f32::INFINITY, 1.0);

    let lines = label.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].value, "Hello World");
    assert_eq!(lines[0].spans.len(), 2);
    assert!((lines[0].width - 66.0).abs() < 1e-3);
    assert!(lines[0].is_new_paragraph);
    assert!(lines[0].is_last_in_paragraph);
}

#[test]
fn test_second_run_wraps_after_first() {
    let mut spans = SpanList::new();
    let _ = spans.attach(StyledRun::text("aaaa "));
    let _ = spans.attach(StyledRun::text("bbbb cccc"));
    let label = TextLabel::rich(ctx(), spans).with_config(config());
    let _ = label.measure(60.0, f32::INFINITY, 1.0);

    let values: Vec<_> = label.lines().iter().map(|line| line.value.clone()).collect();
    assert_eq!(values, vec!["aaaa bbbb ", "cccc"]);
    let lines = label.lines();
    assert_eq!(lines[0].spans.len(), 2);
    assert_eq!(lines[1].spans.len(), 1);
    assert!(!lines[1].is_new_paragraph);
}

#[test]
fn test_run_with_newline_starts_paragraph() {
    let mut spans = SpanList::new();
    let _ = spans.attach(StyledRun::text("one"));
    let _ = spans.attach(StyledRun::text(" two\nthree"));
    let label = TextLabel::rich(ctx(), spans).with_config(config());
    let _ = label.measure(300.0, f32::INFINITY, 1.0);

    let lines = label.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].value, "one two");
    assert!(lines[0].is_last_in_paragraph);
    assert!(lines[1].is_new_paragraph);
}

#[test]
fn test_run_font_size_override_raises_row() {
    let mut spans = SpanList::new();
    let _ = spans.attach(StyledRun::text("small "));
    let _ = spans.attach(StyledRun::text("BIG").with_style(RunStyle {
        font_size: Some(20.0),
        ..RunStyle::default()
    }));
    let label = TextLabel::rich(ctx(), spans).with_config(config());
    let size = label.measure(300.0, f32::INFINITY, 1.0);
    assert!((size.width - (36.0 + 36.0)).abs() < 1e-3);
    assert!((label.lines()[0].height - 24.0).abs() < 1e-3);
}

#[test]
fn test_baseline_clears_larger_run() {
    let mut spans = SpanList::new();
    let _ = spans.attach(StyledRun::text("small "));
    let _ = spans.attach(StyledRun::text("BIG").with_style(RunStyle {
        font_size: Some(20.0),
        ..RunStyle::default()
    }));
    let label = TextLabel::rich(ctx(), spans).with_config(config());
    let _ = label.draw(Rect::new(0.0, 0.0, 300.0, 100.0), 1.0);

    let line = &label.lines()[0];
    // Ascent 16 and descent 4 of the 20 px run centered in the 24 px row.
    assert!((line.baseline - 18.0).abs() < 1e-3);
    assert!(line.baseline - 16.0 >= line.bounds.y);
    assert!(line.baseline + 4.0 <= line.bounds.bottom() + 1e-3);
}

#[test]
fn test_max_lines_across_runs() {
    let mut spans = SpanList::new();
    let _ = spans.attach(StyledRun::text("aaaa bbbb "));
    let _ = spans.attach(StyledRun::text("cccc dddd eeee ffff"));
    let label = TextLabel::rich(ctx(), spans).with_config(TextLayoutConfig {
        max_lines: Some(2),
        ..config()
    });
    let prepared = label.prepare(30.0, f32::INFINITY, 1.0);
    assert_eq!(prepared.lines.len(), 2);
    assert!(prepared.was_cut);
}

#[test]
fn test_fit_horizontal_converges() {
    let label = TextLabel::new(ctx(), "a sentence that is too wide").with_config(TextLayoutConfig {
        auto_size: AutoSizeMode::FitHorizontal,
        line_break_mode: LineBreakMode::NoWrap,
        ..config()
    });
    let prepared = label.prepare(100.0, f32::INFINITY, 1.0);
    assert!(!prepared.was_cut);
    assert_eq!(prepared.lines.len(), 1);
    assert!(prepared.font_size < 10.0);
    assert!(prepared.size.width <= 100.0 + 0.01);
}

#[test]
fn test_fit_horizontal_stops_at_floor() {
    let label = TextLabel::new(ctx(), "unbreakable").with_config(TextLayoutConfig {
        auto_size: AutoSizeMode::FitHorizontal,
        min_font_size: 4.0,
        ..config()
    });
    let prepared = label.prepare(5.0, f32::INFINITY, 1.0);
    assert!(prepared.was_cut);
    assert!((prepared.font_size - 4.0).abs() < 1e-4);
    assert!(quokka_common::warning::was_warned(
        "Text",
        "auto-size reached the minimum font size 4; text may overflow"
    ));
}

#[test]
fn test_fill_vertical_grows_into_height() {
    let label = TextLabel::new(ctx(), "a\nb").with_config(TextLayoutConfig {
        auto_size: AutoSizeMode::FillVertical,
        ..config()
    });
    let prepared = label.prepare(f32::INFINITY, 100.0, 1.0);
    assert!(!prepared.was_cut);
    assert!(prepared.font_size > 10.0);
    assert!(prepared.size.height <= 100.0 + 0.01);
    assert!(100.0 - prepared.size.height < 3.0 + 2.4 * 0.1 + 0.01);
}

#[test]
fn test_mask_drives_size_for_changing_text() {
    let make = |text: &str| {
        TextLabel::new(ctx(), text).with_config(TextLayoutConfig {
            auto_size: AutoSizeMode::FitHorizontal,
            line_break_mode: LineBreakMode::NoWrap,
            auto_size_text: Some("00000".to_string()),
            ..config()
        })
    };
    let short = make("1").prepare(15.0, f32::INFINITY, 1.0);
    let long = make("12345").prepare(15.0, f32::INFINITY, 1.0);
    assert!((short.font_size - long.font_size).abs() < 1e-4);
    assert_eq!(long.lines[0].value, "12345");
}

#[test]
fn test_fill_words_splits_slack_over_interior_spaces() {
    let label = TextLabel::new(ctx(), "a b c dddd").with_config(TextLayoutConfig {
        horizontal_alignment: HorizontalAlignment::FillWords,
        ..config()
    });
    let destination = Rect::new(0.0, 0.0, 40.0, 100.0);
    let _ = label.measure(destination.width, destination.height, 1.0);
    assert_eq!(label.lines()[0].value, "a b c ");

    let list = label.draw(destination, 1.0);
    let rows = glyph_xs(list.commands());
    // 10 px of slack once the trailing space is ignored, two interior spaces.
    let first = &rows[0];
    assert_eq!(first.len(), 6);
    assert!((first[2] - 17.0).abs() < 1e-4);
    assert!((first[4] - 34.0).abs() < 1e-4);
    assert!((first[4] + 6.0 - destination.right()).abs() < 1e-4);
    // Last line of the paragraph keeps its natural spacing.
    assert!((rows[1][1] - 6.0).abs() < 1e-4);
}

#[test]
fn test_center_alignment_in_draw() {
    let label = TextLabel::new(ctx(), "abcd").with_config(TextLayoutConfig {
        horizontal_alignment: HorizontalAlignment::Center,
        ..config()
    });
    let list = label.draw(Rect::new(0.0, 0.0, 100.0, 20.0), 1.0);
    let rows = glyph_xs(list.commands());
    assert!((rows[0][0] - 38.0).abs() < 1e-4);
}

#[test]
fn test_underline_run_emits_decoration() {
    let mut spans = SpanList::new();
    let _ = spans.attach(StyledRun::text("plain "));
    let underlined = spans.attach(StyledRun::text("link").with_style(RunStyle {
        underline: true,
        ..RunStyle::default()
    }));
    let label = TextLabel::rich(ctx(), spans).with_config(config());
    let list = label.draw(Rect::new(0.0, 0.0, 200.0, 20.0), 1.0);
    let decoration = list
        .commands()
        .iter()
        .find_map(|command| match command {
            DrawCommand::Decoration { run, x, width, .. } => Some((*run, *x, *width)),
            _ => None,
        })
        .expect("underline");
    assert_eq!(decoration.0, Some(underlined));
    assert!((decoration.1 - 36.0).abs() < 1e-4);
    assert!((decoration.2 - 24.0).abs() < 1e-4);
}

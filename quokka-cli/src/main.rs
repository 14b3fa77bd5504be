//! Quokka text layout CLI
//!
//! Lays out a piece of text in a box and prints the resulting rows, the
//! draw list, or both as JSON.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use quokka_common::warning::warn_once;
use quokka_fonts::{FontRegistrar, registrar::SANS_SERIF};
use quokka_text::{
    ApproximateFace, AutoSizeMode, DrawList, HorizontalAlignment, LineBreakMode, LineRecord, Rect,
    Size, TextContext, TextLabel, TextLayoutConfig, VerticalAlignment,
};
use serde::Serialize;

/// Lay out text in a box.
#[derive(Debug, Parser)]
#[command(name = "quokka", version, about)]
struct Args {
    /// Text to lay out (`\n` separates paragraphs).
    #[arg(required_unless_present = "file")]
    text: Option<String>,

    /// Read the text from a file instead.
    #[arg(long, short = 'f')]
    file: Option<PathBuf>,

    /// JSON layout configuration; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Font file to use as the default face.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Skip font discovery and measure with fixed advance ratios.
    #[arg(long)]
    approximate: bool,

    /// Box width (unbounded when omitted).
    #[arg(long, short = 'w')]
    width: Option<f32>,

    /// Box height (unbounded when omitted).
    #[arg(long)]
    height: Option<f32>,

    /// Display scale.
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Font size.
    #[arg(long, short = 's')]
    font_size: Option<f32>,

    /// Maximum number of lines.
    #[arg(long)]
    max_lines: Option<usize>,

    /// word-wrap, character-wrap, no-wrap or tail-truncation.
    #[arg(long)]
    break_mode: Option<LineBreakMode>,

    /// start, center, end, fill-words(-full) or fill-characters(-full).
    #[arg(long)]
    align: Option<HorizontalAlignment>,

    /// start, center or end.
    #[arg(long)]
    valign: Option<VerticalAlignment>,

    /// Auto-size mode, e.g. fit-horizontal or fill-vertical.
    #[arg(long)]
    auto_size: Option<AutoSizeMode>,

    /// Print the draw list after the rows.
    #[arg(long)]
    draw: bool,

    /// Emit JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    font_size: f32,
    size: Size,
    was_cut: bool,
    lines: &'a [LineRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    draw_list: Option<&'a DrawList>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let text = match &args.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => args.text.clone().unwrap_or_default(),
    };
    let config = layout_config(&args)?;
    let ctx = Arc::new(text_context(&args)?);

    let width = args.width.unwrap_or(f32::INFINITY);
    let height = args.height.unwrap_or(f32::INFINITY);
    let label = TextLabel::new(ctx, text).with_config(config);
    let prepared = label.prepare(width, height, args.scale);

    let draw_list = args.draw.then(|| {
        let destination = Rect::new(
            0.0,
            0.0,
            args.width.unwrap_or(prepared.size.width),
            args.height.unwrap_or(prepared.size.height),
        );
        let _ = label.apply(prepared.clone());
        label.draw(destination, args.scale)
    });

    if args.json {
        let report = Report {
            font_size: prepared.font_size,
            size: prepared.size,
            was_cut: prepared.was_cut,
            lines: &prepared.lines,
            draw_list: draw_list.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {:.2}px  {} {:.1} x {:.1}{}",
        "font".dimmed(),
        prepared.font_size,
        "extent".dimmed(),
        prepared.size.width,
        prepared.size.height,
        if prepared.was_cut {
            format!("  {}", "cut".yellow().bold())
        } else {
            String::new()
        }
    );
    for (index, line) in prepared.lines.iter().enumerate() {
        let marker = if line.is_new_paragraph { "¶" } else { " " };
        println!(
            "{:>3} {} {:>8.2}  {}",
            index.dimmed(),
            marker.cyan(),
            line.width,
            format!("{:?}", line.value).bold()
        );
    }
    if let Some(list) = &draw_list {
        println!("\n{} ({} commands)", "draw list".dimmed(), list.len());
        for command in list.commands() {
            println!("  {command:?}");
        }
    }

    Ok(())
}

/// Config from the JSON file (if any) with flags layered on top.
fn layout_config(args: &Args) -> Result<TextLayoutConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("invalid layout config {}", path.display()))?
        }
        None => TextLayoutConfig::default(),
    };
    if let Some(size) = args.font_size {
        config.font_size = size;
    }
    if let Some(max_lines) = args.max_lines {
        config.max_lines = Some(max_lines);
    }
    if let Some(mode) = args.break_mode {
        config.line_break_mode = mode;
    }
    if let Some(align) = args.align {
        config.horizontal_alignment = align;
    }
    if let Some(valign) = args.valign {
        config.vertical_alignment = valign;
    }
    if let Some(mode) = args.auto_size {
        config.auto_size = mode;
    }
    Ok(config)
}

/// Context from an explicit font, the system fonts, or the approximate face.
fn text_context(args: &Args) -> Result<TextContext> {
    if args.approximate {
        return Ok(approximate_context());
    }
    if let Some(path) = &args.font {
        let mut registrar = FontRegistrar::new();
        let _ = registrar.load_file(SANS_SERIF, path, 400, false)?;
        let _ = registrar.load_system_fonts();
        return Ok(registrar.into_context()?);
    }
    Ok(FontRegistrar::bootstrap().unwrap_or_else(|_| {
        warn_once("Fonts", "falling back to approximate glyph metrics");
        approximate_context()
    }))
}

fn approximate_context() -> TextContext {
    TextContext::new(ApproximateFace::new("approximate").into_handle())
}

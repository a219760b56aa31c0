//! `bitmap-text`: inspect bitmap font resources and render text with them.

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use common::{Color, Rect};
use font::FontMetrics;
use layout::Align;
use paint::{Framebuffer, RenderMode, TextPainter};

#[derive(Parser)]
#[command(version, about = "Bitmap font inspector and text renderer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print font metrics and, optionally, every glyph record
    Inspect {
        /// Font resource file
        font: PathBuf,

        /// List each glyph record
        #[arg(long)]
        glyphs: bool,
    },

    /// Render text into a PPM image
    Render {
        /// Font resource file
        font: PathBuf,

        /// Output image (binary PPM)
        out: PathBuf,

        /// Text to draw; `\n` starts a new line
        text: String,

        /// Point size (defaults to the font's design size)
        #[arg(long)]
        size: Option<f32>,

        /// Baseline-to-baseline distance (defaults to the font's leading)
        #[arg(long)]
        leading: Option<f32>,

        #[arg(long, default_value = "left", value_parser = parse_align)]
        align: Align,

        #[arg(long, default_value = "geometry", value_parser = parse_mode)]
        mode: RenderMode,

        #[arg(long, default_value_t = 512)]
        width: u32,

        #[arg(long, default_value_t = 128)]
        height: u32,

        /// Pen x, or the box's left edge with `--box`
        #[arg(long, default_value_t = 0.0)]
        x: f32,

        /// First baseline (defaults to the ascent), or the box's top edge with `--box`
        #[arg(long)]
        y: Option<f32>,

        /// Wrap into a box of this size, e.g. `300x200`
        #[arg(long = "box", value_name = "WxH", value_parser = parse_box)]
        bounds: Option<(f32, f32)>,

        /// Text color
        #[arg(long, default_value = "000000", value_parser = parse_color)]
        color: Color,

        #[arg(long, default_value = "FFFFFF", value_parser = parse_color)]
        background: Color,
    },
}

fn parse_align(s: &str) -> Result<Align, String> {
    match s.to_ascii_lowercase().as_str() {
        "left" => Ok(Align::Left),
        "center" | "centre" => Ok(Align::Center),
        "right" => Ok(Align::Right),
        _ => Err(format!("unknown alignment \"{s}\": expected left, center or right")),
    }
}

fn parse_mode(s: &str) -> Result<RenderMode, String> {
    match s.to_ascii_lowercase().as_str() {
        "geometry" => Ok(RenderMode::Geometry),
        "pixel" => Ok(RenderMode::Pixel),
        _ => Err(format!("unknown render mode \"{s}\": expected geometry or pixel")),
    }
}

fn parse_box(s: &str) -> Result<(f32, f32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("box \"{s}\" is not of the form WxH"))?;
    let w: f32 = w.trim().parse().map_err(|e| format!("box width: {e}"))?;
    let h: f32 = h.trim().parse().map_err(|e| format!("box height: {e}"))?;
    Ok((w, h))
}

fn parse_color(s: &str) -> Result<Color, String> {
    Color::from_hex(s).map_err(|e| format!("color \"{s}\": {e}"))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Inspect { font, glyphs } => inspect(&font, glyphs),
        Command::Render {
            font,
            out,
            text,
            size,
            leading,
            align,
            mode,
            width,
            height,
            x,
            y,
            bounds,
            color,
            background,
        } => {
            let table = load(&font)?;
            let mut painter = TextPainter::new(&table);
            // Mode first: entering pixel space resets size and leading.
            painter.set_render_mode(mode);
            if let Some(size) = size {
                painter.set_size(size);
                painter.reset_leading();
            }
            if let Some(leading) = leading {
                painter.set_leading(leading);
            }
            painter.set_align(align);

            let mut fb = Framebuffer::new(width, height);
            fb.clear(background);
            fb.set_fill(color);

            let text = text.replace("\\n", "\n");
            match bounds {
                Some((w, h)) => {
                    let rect = Rect::new(x, y.unwrap_or(0.0), w, h);
                    painter.draw_text_in_box(&text, rect, 0.0, &mut fb);
                }
                None => {
                    let baseline = y.unwrap_or_else(|| painter.ascent());
                    painter.draw_text(&text, x, baseline, 0.0, &mut fb);
                }
            }

            let file = fs::File::create(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            fb.write_ppm(BufWriter::new(file))
                .with_context(|| format!("failed to write {}", out.display()))?;
            log::info!("wrote {}x{} image to {}", width, height, out.display());
            Ok(())
        }
    }
}

fn load(path: &Path) -> Result<font::GlyphTable> {
    let data = fs::read(path).with_context(|| format!("failed to read font {}", path.display()))?;
    font::decode(&data).with_context(|| format!("failed to load font {}", path.display()))
}

fn inspect(path: &Path, list_glyphs: bool) -> Result<()> {
    let table = load(path)?;
    let metrics = FontMetrics::new(&table);
    let size = table.design_box() as f32;

    println!("font:          {}", path.display());
    println!("glyphs:        {}", table.len());
    println!("design box:    {}", table.design_box());
    println!("texture side:  {}", table.texture_side());
    println!("ascent:        {}", table.ascent_units());
    println!("descent:       {}", table.descent_units());
    println!("leading:       {:.3}", metrics.default_leading(size));
    println!("space width:   {}", metrics.char_width(' ', size));

    if list_glyphs {
        println!();
        println!("{:>8}  {:>4}  {:>7}  {:>7}  {:>4}  {:>4}", "code", "ch", "size", "advance", "top", "left");
        for rec in table.records() {
            let ch = rec.char().filter(|c| !c.is_control()).unwrap_or('?');
            println!(
                "{:>#8x}  {:>4}  {:>3}x{:<3}  {:>7}  {:>4}  {:>4}",
                rec.code, ch, rec.bitmap_width, rec.bitmap_height, rec.advance_width, rec.top_extent, rec.left_extent
            );
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

use std::io::{self, Stdout, Write};

use image::{imageops::FilterType, DynamicImage, GenericImageView, Rgb};
use termion::{
    color::{Bg, Fg, Reset, Rgb as TermRgb},
    input::TermRead,
};

use super::{ImageRenderer, RenderOptions, RenderStyle};
use crate::error::FlowError;

const DEFAULT_WIDTH: u32 = 80;
const AXIS_TICK: u32 = 10;

/// Draws images with escape codes into any writer, usually stdout.
pub struct TerminalRenderer<W: Write> {
    out: W,
    style: RenderStyle,
    max_width: u32,
    wait_for_key: bool,
    /// Check for a terminal and take its width right before drawing.
    attached: bool,
}

impl TerminalRenderer<Stdout> {
    /// Draws to the process stdout. Rendering fails when stdout is not
    /// attached to a terminal.
    pub fn stdout(style: RenderStyle) -> Self {
        Self {
            attached: true,
            ..Self::new(io::stdout(), style)
        }
    }
}

fn terminal_width() -> Result<u32, FlowError> {
    if !termion::is_tty(&io::stdout()) {
        return Err(FlowError::display("stdout is not a terminal"));
    }
    let (cols, _) = termion::terminal_size()
        .map_err(|err| FlowError::display_caused("reading terminal size", err))?;
    log::debug!("terminal is {cols} columns wide");
    Ok(cols as u32)
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, style: RenderStyle) -> Self {
        Self {
            out,
            style,
            max_width: DEFAULT_WIDTH,
            wait_for_key: false,
            attached: false,
        }
    }

    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = max_width.max(1);
        self
    }

    /// Block after drawing until a line is read from stdin.
    pub fn with_wait_for_key(mut self, wait_for_key: bool) -> Self {
        self.wait_for_key = wait_for_key;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, image: &DynamicImage, options: &RenderOptions) -> io::Result<()> {
        let (orig_w, orig_h) = image.dimensions();
        let margin = if options.show_axes {
            orig_h.to_string().len() as u32 + 1
        } else {
            0
        };
        let (w, h) = fit((orig_w, orig_h), self.max_width.saturating_sub(margin).max(1));
        let img = if (w, h) == (orig_w, orig_h) {
            image.to_rgb8()
        } else {
            image.resize_exact(w, h, FilterType::Triangle).to_rgb8()
        };

        if options.show_axes {
            writeln!(self.out, "{:margin$}{}", "", x_axis(w, orig_w), margin = margin as usize)?;
        }

        for y in (0..h).step_by(2) {
            if options.show_axes {
                let label = y as u64 * orig_h as u64 / h as u64;
                write!(self.out, "{label:>width$} ", width = margin as usize - 1)?;
            }

            let lower_row = y + 1 < h;
            for x in 0..w {
                let upper = img.get_pixel(x, y);
                let lower = lower_row.then(|| img.get_pixel(x, y + 1));
                match self.style {
                    RenderStyle::Color => {
                        write!(self.out, "{}", Fg(term_rgb(upper)))?;
                        match lower {
                            Some(lower) => write!(self.out, "{}", Bg(term_rgb(lower)))?,
                            None => write!(self.out, "{}", Bg(Reset))?,
                        }
                        write!(self.out, "▀")?;
                    }
                    RenderStyle::Ascii => {
                        write!(self.out, "{}", eval_pixel(upper, lower.unwrap_or(upper)))?;
                    }
                }
            }

            match self.style {
                RenderStyle::Color => writeln!(self.out, "{}{}", Fg(Reset), Bg(Reset))?,
                RenderStyle::Ascii => writeln!(self.out)?,
            }
        }
        self.out.flush()
    }

    fn wait(&mut self) -> io::Result<()> {
        write!(self.out, "press enter to close")?;
        self.out.flush()?;
        io::stdin().keys().next().transpose()?;
        writeln!(self.out)
    }
}

impl<W: Write> ImageRenderer for TerminalRenderer<W> {
    fn render(&mut self, image: &DynamicImage, options: &RenderOptions) -> Result<(), FlowError> {
        if self.attached {
            self.max_width = terminal_width()?.max(1);
        }
        self.draw(image, options)
            .map_err(|err| FlowError::display_caused("drawing to terminal", err))?;
        if self.wait_for_key {
            self.wait()
                .map_err(|err| FlowError::display_caused("waiting for a key", err))?;
        }
        Ok(())
    }
}

/// Scales down to `max_width` keeping the aspect ratio; never scales up.
fn fit((w, h): (u32, u32), max_width: u32) -> (u32, u32) {
    if w <= max_width {
        return (w, h);
    }
    let h = (h as u64 * max_width as u64 / w as u64).max(1) as u32;
    (max_width, h)
}

fn x_axis(w: u32, orig_w: u32) -> String {
    let mut line = vec![' '; w as usize];
    for x in (0..w).step_by(AXIS_TICK as usize) {
        let label = (x as u64 * orig_w as u64 / w as u64).to_string();
        let start = x as usize;
        if start + label.len() > line.len() {
            break;
        }
        for (i, c) in label.chars().enumerate() {
            line[start + i] = c;
        }
    }
    line.into_iter().collect()
}

fn term_rgb(pixel: &Rgb<u8>) -> TermRgb {
    TermRgb(pixel[0], pixel[1], pixel[2])
}

fn eval_pixel(upper: &Rgb<u8>, lower: &Rgb<u8>) -> &'static str {
    let sum = upper.0.iter().chain(lower.0.iter()).map(|x| *x as f64).sum::<f64>();
    let c = sum / (6.0 * 255.0);
    let c = (c * 4.0) as i32;
    match c {
        1 => ".",
        2 => "×",
        3 | 4 => "#",
        _ => " ",
    }
}

#[cfg(test)]
mod tests {
    use image::RgbImage;

    use super::*;

    fn solid(w: u32, h: u32, rgb: [u8; 3]) -> DynamicImage {
        RgbImage::from_pixel(w, h, Rgb(rgb)).into()
    }

    fn render(image: &DynamicImage, style: RenderStyle, max_width: u32, show_axes: bool) -> String {
        let mut renderer = TerminalRenderer::new(Vec::new(), style).with_max_width(max_width);
        renderer
            .render(image, &RenderOptions { show_axes })
            .unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn stdout_without_terminal_fails_at_render_time() {
        if termion::is_tty(&io::stdout()) {
            return;
        }
        let mut renderer = TerminalRenderer::stdout(RenderStyle::Ascii);
        let result = renderer.render(&solid(2, 2, [0, 0, 0]), &RenderOptions::default());
        assert!(matches!(result, Err(FlowError::Display { .. })));
    }

    #[test]
    fn fit_never_upscales() {
        assert_eq!(fit((4, 4), 80), (4, 4));
        assert_eq!(fit((200, 100), 50), (50, 25));
        assert_eq!(fit((1000, 1), 10), (10, 1));
    }

    #[test]
    fn color_uses_half_blocks() {
        let out = render(&solid(4, 4, [255, 0, 0]), RenderStyle::Color, 80, false);
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert_eq!(out.matches('▀').count(), 8);
        assert!(out.contains("\x1b[38;2;255;0;0m"));
        assert!(out.contains("\x1b[48;2;255;0;0m"));
        for line in lines {
            assert!(line.ends_with("\x1b[39m\x1b[49m"));
        }
    }

    #[test]
    fn odd_height_resets_last_background() {
        let out = render(&solid(2, 3, [0, 0, 255]), RenderStyle::Color, 80, false);
        let last = out.lines().last().unwrap();
        assert!(last.starts_with("\x1b[38;2;0;0;255m\x1b[49m▀"));
    }

    #[test]
    fn wide_images_are_scaled_to_width() {
        let out = render(&solid(200, 100, [10, 20, 30]), RenderStyle::Color, 50, false);
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 13);
        assert!(lines.iter().all(|line| line.matches('▀').count() == 50));
    }

    #[test]
    fn ascii_ramp() {
        let dark = render(&solid(3, 2, [0, 0, 0]), RenderStyle::Ascii, 80, false);
        assert_eq!(dark, "   \n");
        let bright = render(&solid(3, 2, [255, 255, 255]), RenderStyle::Ascii, 80, false);
        assert_eq!(bright, "###\n");
        let mid = render(&solid(3, 2, [128, 128, 128]), RenderStyle::Ascii, 80, false);
        assert_eq!(mid, "×××\n");
    }

    #[test]
    fn axes_only_when_asked() {
        let image = solid(20, 4, [255, 255, 255]);
        let plain = render(&image, RenderStyle::Ascii, 80, false);
        assert_eq!(plain.lines().count(), 2);

        let with_axes = render(&image, RenderStyle::Ascii, 80, true);
        let lines = with_axes.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], format!("  0{}10{}", " ".repeat(9), " ".repeat(8)));
        assert_eq!(lines[1], format!("0 {}", "#".repeat(20)));
        assert_eq!(lines[2], format!("2 {}", "#".repeat(20)));
    }
}

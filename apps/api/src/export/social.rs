// Social post image compositing: square canvas, background, darkened lower
// half, centred title and up to five lines of wrapped post text.

use std::io::Cursor;

use ab_glyph::{FontVec, PxScale};
use image::{imageops, imageops::FilterType, DynamicImage, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};

pub const SIDE: u32 = 1080;
pub const WRAP_COLUMNS: usize = 30;
pub const MAX_LINES: usize = 5;

const TITLE_Y: i32 = 100;
const TITLE_SIZE: f32 = 60.0;
const BODY_Y: i32 = (SIDE / 2) as i32;
const BODY_SIZE: f32 = 40.0;
const LINE_STEP: i32 = 50;
const FLAT: Rgb<u8> = Rgb([240, 240, 240]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

pub enum Backdrop {
    /// A fetched photo, cover-cropped onto the canvas.
    Photo(DynamicImage),
    /// No image was provided.
    Gradient,
    /// An image was provided but could not be fetched or decoded.
    Flat,
}

/// Greedy word wrap at `width` columns. Words longer than a line are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        loop {
            let used = line.chars().count();
            let sep = usize::from(used > 0);
            if used + sep + word.len() <= width {
                if sep == 1 {
                    line.push(' ');
                }
                line.extend(word.iter());
                break;
            }
            if used > 0 {
                lines.push(std::mem::take(&mut line));
                continue;
            }
            // Empty line and the word still does not fit: hard split.
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Lines drawn for a post: wrapped at 30 columns, at most five.
pub fn post_lines(post: &str) -> Vec<String> {
    let mut lines = wrap_text(post, WRAP_COLUMNS);
    lines.truncate(MAX_LINES);
    lines
}

/// Scales to cover a `side`×`side` square preserving aspect ratio, then centre-crops.
pub fn cover_square(img: &DynamicImage, side: u32) -> RgbImage {
    let (w, h) = (img.width().max(1), img.height().max(1));
    let ratio = w as f64 / h as f64;
    let (new_w, new_h) = if ratio > 1.0 {
        (((side as f64 * ratio) as u32).max(side), side)
    } else {
        (side, ((side as f64 / ratio) as u32).max(side))
    };

    let resized = img.resize_exact(new_w, new_h, FilterType::Lanczos3).to_rgb8();
    let left = (new_w - side) / 2;
    let top = (new_h - side) / 2;
    imageops::crop_imm(&resized, left, top, side, side).to_image()
}

fn gradient(side: u32) -> RgbImage {
    RgbImage::from_fn(side, side, |_, y| {
        let t = y as f32 / side as f32;
        let rg = (220.0 + t * 35.0) as u8;
        let b = (240.0 - t * 40.0) as u8;
        Rgb([rg, rg, b])
    })
}

/// Composites a black overlay at 128/255 alpha over the lower half.
fn darken_lower_half(canvas: &mut RgbImage) {
    let start = canvas.height() / 2;
    for (_, y, pixel) in canvas.enumerate_pixels_mut() {
        if y >= start {
            for c in pixel.0.iter_mut() {
                *c = ((*c as u16 * 127) / 255) as u8;
            }
        }
    }
}

fn draw_centered(canvas: &mut RgbImage, font: &FontVec, size: f32, center_y: i32, text: &str) {
    let scale = PxScale::from(size);
    let (w, h) = text_size(scale, font, text);
    let x = (canvas.width() as i32 - w as i32) / 2;
    let y = center_y - h as i32 / 2;
    draw_text_mut(canvas, WHITE, x, y, scale, font, text);
}

pub fn compose_social_image(
    backdrop: &Backdrop,
    business_name: &str,
    post: Option<&str>,
    font: Option<&FontVec>,
) -> RgbImage {
    let mut canvas = match backdrop {
        Backdrop::Photo(img) => cover_square(img, SIDE),
        Backdrop::Gradient => gradient(SIDE),
        Backdrop::Flat => RgbImage::from_pixel(SIDE, SIDE, FLAT),
    };

    darken_lower_half(&mut canvas);

    if let Some(font) = font {
        draw_centered(&mut canvas, font, TITLE_SIZE, TITLE_Y, business_name);

        let lines = post.map(post_lines).unwrap_or_default();
        for (i, line) in lines.iter().enumerate() {
            draw_centered(&mut canvas, font, BODY_SIZE, BODY_Y + i as i32 * LINE_STEP, line);
        }
    }

    canvas
}

pub fn encode_png(canvas: RgbImage) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(canvas).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_width() {
        let text = "Fresh sourdough, flaky croissants and seasonal pies baked every single morning";
        let lines = wrap_text(text, 30);

        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 30));
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_short_text_is_one_line() {
        assert_eq!(wrap_text("  Open   today ", 30), vec!["Open today"]);
        assert!(wrap_text("", 30).is_empty());
    }

    #[test]
    fn test_long_word_is_split() {
        let word = "a".repeat(65);
        let lines = wrap_text(&word, 30);
        assert_eq!(lines.iter().map(|l| l.len()).collect::<Vec<_>>(), vec![30, 30, 5]);
    }

    #[test]
    fn test_post_lines_caps_at_five() {
        let post = "word ".repeat(100);
        let lines = post_lines(&post);
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| l.len() <= 30));
    }

    #[test]
    fn test_cover_square_crops_wide_and_tall() {
        let wide = DynamicImage::new_rgb8(400, 100);
        let tall = DynamicImage::new_rgb8(90, 300);
        assert_eq!(cover_square(&wide, 120).dimensions(), (120, 120));
        assert_eq!(cover_square(&tall, 120).dimensions(), (120, 120));
    }

    #[test]
    fn test_gradient_and_overlay_colours() {
        let img = compose_social_image(&Backdrop::Gradient, "Shop", None, None);
        assert_eq!(img.dimensions(), (SIDE, SIDE));
        assert_eq!(img.get_pixel(0, 0).0, [220, 220, 240]);

        // Lower half: gradient value at y darkened by the overlay.
        let y = SIDE - 1;
        let t = y as f32 / SIDE as f32;
        let rg = (220.0 + t * 35.0) as u8;
        let b = (240.0 - t * 40.0) as u8;
        let dark = |c: u8| ((c as u16 * 127) / 255) as u8;
        assert_eq!(img.get_pixel(0, y).0, [dark(rg), dark(rg), dark(b)]);
    }

    #[test]
    fn test_flat_backdrop() {
        let img = compose_social_image(&Backdrop::Flat, "Shop", Some("hello"), None);
        assert_eq!(img.get_pixel(10, 10).0, [240, 240, 240]);
        assert_eq!(img.get_pixel(10, SIDE - 10).0, [119, 119, 119]);
    }

    /// Font from `SOCIAL_FONT_PATH` or the system candidates; tests that draw
    /// text are skipped when neither exists.
    fn test_font() -> Option<FontVec> {
        let configured = std::env::var_os("SOCIAL_FONT_PATH").map(std::path::PathBuf::from);
        let font = super::super::load_font(configured.as_deref());
        if font.is_none() {
            eprintln!("no TrueType font available, skipping text rendering test");
        }
        font
    }

    /// Runs of consecutive rows in `rows` that contain any pixel other than `base`.
    fn ink_bands(img: &RgbImage, rows: std::ops::Range<u32>, base: [u8; 3]) -> usize {
        let mut bands = 0;
        let mut inside = false;
        for y in rows {
            let inked = (0..img.width()).any(|x| img.get_pixel(x, y).0 != base);
            if inked && !inside {
                bands += 1;
            }
            inside = inked;
        }
        bands
    }

    #[test]
    fn test_long_post_draws_at_most_five_centered_lines() {
        let Some(font) = test_font() else {
            return;
        };
        let post = "word ".repeat(100);
        let img = compose_social_image(&Backdrop::Flat, "Shop", Some(&post), Some(&font));
        let base = [119, 119, 119];

        assert_eq!(ink_bands(&img, SIDE / 2..SIDE, base), MAX_LINES);

        // Each line is centred: ink starts and ends the same distance from the edges.
        let row = (BODY_Y..BODY_Y + 10)
            .map(|y| y as u32)
            .find(|&y| (0..SIDE).any(|x| img.get_pixel(x, y).0 != base))
            .unwrap();
        let inked: Vec<u32> = (0..SIDE).filter(|&x| img.get_pixel(x, row).0 != base).collect();
        let left = inked[0];
        let right = SIDE - 1 - inked[inked.len() - 1];
        assert!(left.abs_diff(right) <= 20, "left {left} right {right}");
    }

    #[test]
    fn test_post_over_one_line_wraps() {
        let Some(font) = test_font() else {
            return;
        };
        let post = "Fresh sourdough and croissants every morning";
        assert!(post.chars().count() > WRAP_COLUMNS);

        let img = compose_social_image(&Backdrop::Flat, "Shop", Some(post), Some(&font));
        assert_eq!(
            ink_bands(&img, SIDE / 2..SIDE, [119, 119, 119]),
            post_lines(post).len()
        );
        // Title drawn in the upper half.
        assert!(ink_bands(&img, 0..SIDE / 2, [240, 240, 240]) >= 1);
    }

    #[test]
    fn test_png_encoding_has_signature() {
        let png = encode_png(RgbImage::new(4, 4)).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}

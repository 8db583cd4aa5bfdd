//! Card and modal artwork: decoded once, kept in memory, drawn with half blocks

use std::collections::HashMap;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use serde::{Deserialize, Serialize};

/// Longest edge kept after decoding; the largest art box is well below this
const MAX_EDGE: u32 = 64;
/// Terminal cells are about twice as tall as they are wide
const CELL_ASPECT: f32 = 2.0;
const ALPHA_CUTOFF: u8 = 128;

/// Downscaled RGBA pixels of one image
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    pub width: u32,
    pub height: u32,
    #[serde(with = "rgba_base64")]
    rgba: Vec<u8>,
}

impl Artwork {
    /// Decodes PNG/GIF/JPEG bytes, trims transparent margins and downscales
    pub fn decode(bytes: &[u8]) -> Result<Self, String> {
        let image = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
        let image = if image.width() > MAX_EDGE || image.height() > MAX_EDGE {
            image.thumbnail(MAX_EDGE, MAX_EDGE)
        } else {
            image
        }
        .to_rgba8();

        let (x, y, width, height) = opaque_bounds(&image).unwrap_or((0, 0, 0, 0));
        if width == 0 || height == 0 {
            return Err("image has no visible pixels".to_string());
        }
        let cropped = image::imageops::crop_imm(&image, x, y, width, height).to_image();
        let (width, height) = cropped.dimensions();
        Ok(Self {
            width,
            height,
            rgba: cropped.into_raw(),
        })
    }

    fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y * self.width + x) * 4) as usize;
        let [r, g, b, a]: [u8; 4] = self.rgba.get(offset..offset + 4)?.try_into().ok()?;
        (a >= ALPHA_CUTOFF).then_some(Color::Rgb(r, g, b))
    }

    /// Largest (cols, rows) inside the box that keeps the aspect ratio
    pub fn fit(&self, max_cols: u16, max_rows: u16) -> (u16, u16) {
        if max_cols == 0 || max_rows == 0 || self.height == 0 {
            return (max_cols, max_rows);
        }
        let ratio = self.width as f32 / self.height as f32;
        let cols_for_max_rows = ratio * f32::from(max_rows) * CELL_ASPECT;
        if cols_for_max_rows <= f32::from(max_cols) {
            let cols = cols_for_max_rows.max(1.0).round() as u16;
            return (cols.max(1), max_rows);
        }
        let rows = (f32::from(max_cols) / (ratio * CELL_ASPECT)).max(1.0).round() as u16;
        (max_cols, rows.min(max_rows).max(1))
    }

    /// Samples the image into `rows` lines of `cols` cells. Each cell shows
    /// two vertically stacked pixels: `▀` in the upper colour over the lower.
    pub fn lines(&self, cols: u16, rows: u16) -> Vec<Line<'static>> {
        let sample = |col: u16, subrow: u32| {
            let x = u32::from(col) * self.width / u32::from(cols.max(1));
            let y = subrow * self.height / (u32::from(rows.max(1)) * 2);
            self.pixel(x, y)
        };

        (0..rows)
            .map(|row| {
                let spans = (0..cols)
                    .map(|col| {
                        let top = sample(col, u32::from(row) * 2);
                        let bottom = sample(col, u32::from(row) * 2 + 1);
                        match (top, bottom) {
                            (None, None) => Span::raw(" "),
                            (Some(top), None) => Span::styled("▀", Style::default().fg(top)),
                            (None, Some(bottom)) => {
                                Span::styled("▄", Style::default().fg(bottom))
                            }
                            (Some(top), Some(bottom)) => {
                                Span::styled("▀", Style::default().fg(top).bg(bottom))
                            }
                        }
                    })
                    .collect::<Vec<_>>();
                Line::from(spans)
            })
            .collect()
    }
}

/// Bounding box (x, y, width, height) of the pixels above the alpha cutoff
fn opaque_bounds(image: &image::RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0[3] < ALPHA_CUTOFF {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds.map(|(x0, y0, x1, y1)| (x0, y0, x1 - x0 + 1, y1 - y0 + 1))
}

mod rgba_base64 {
    use base64::{engine::general_purpose, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(rgba: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&general_purpose::STANDARD.encode(rgba))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        general_purpose::STANDARD
            .decode(encoded)
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Slot {
    Loading,
    Ready(Artwork),
    Missing,
}

/// What an art box should show for one record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtworkView<'a> {
    /// The record has no image URL
    NoImage,
    Loading,
    Ready(&'a Artwork),
    /// Download or decode failed
    Missing,
}

/// Session-lifetime artwork keyed by image URL
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArtworkCache {
    slots: HashMap<String, Slot>,
}

impl ArtworkCache {
    /// Marks `url` as loading. Returns false when it is already known, so
    /// each image is fetched at most once per session.
    pub fn request(&mut self, url: &str) -> bool {
        if self.slots.contains_key(url) {
            return false;
        }
        self.slots.insert(url.to_string(), Slot::Loading);
        true
    }

    pub fn store(&mut self, url: String, artwork: Artwork) {
        self.slots.insert(url, Slot::Ready(artwork));
    }

    pub fn mark_missing(&mut self, url: String) {
        self.slots.insert(url, Slot::Missing);
    }

    pub fn view(&self, url: Option<&str>) -> ArtworkView<'_> {
        let Some(url) = url else {
            return ArtworkView::NoImage;
        };
        match self.slots.get(url) {
            None | Some(Slot::Loading) => ArtworkView::Loading,
            Some(Slot::Ready(artwork)) => ArtworkView::Ready(artwork),
            Some(Slot::Missing) => ArtworkView::Missing,
        }
    }

    pub fn ready_count(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    /// PNG of a red square over a blue square, framed by transparent padding
    pub(crate) fn sample_png() -> Vec<u8> {
        let image = RgbaImage::from_fn(12, 12, |x, y| {
            if !(2..10).contains(&x) || !(2..10).contains(&y) {
                Rgba([0, 0, 0, 0])
            } else if y < 6 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_trims_transparent_margin() {
        let artwork = Artwork::decode(&sample_png()).unwrap();
        assert_eq!((artwork.width, artwork.height), (8, 8));
        assert_eq!(artwork.pixel(0, 0), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(artwork.pixel(0, 7), Some(Color::Rgb(0, 0, 255)));
    }

    #[test]
    fn test_decode_rejects_garbage_and_blank_images() {
        assert!(Artwork::decode(b"not an image").is_err());

        let mut blank = Vec::new();
        image::DynamicImage::ImageRgba8(RgbaImage::new(4, 4))
            .write_to(&mut Cursor::new(&mut blank), ImageFormat::Png)
            .unwrap();
        assert!(Artwork::decode(&blank).is_err());
    }

    #[test]
    fn test_decode_downscales_large_images() {
        let image = RgbaImage::from_pixel(256, 128, Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let artwork = Artwork::decode(&bytes).unwrap();
        assert_eq!((artwork.width, artwork.height), (64, 32));
    }

    #[test]
    fn test_fit_keeps_aspect_ratio() {
        let artwork = Artwork::decode(&sample_png()).unwrap();
        // Square image: twice as many columns as rows
        assert_eq!(artwork.fit(40, 8), (16, 8));
        assert_eq!(artwork.fit(6, 8), (6, 3));
        assert_eq!(artwork.fit(0, 8), (0, 8));
    }

    #[test]
    fn test_lines_stack_two_pixels_per_cell() {
        let artwork = Artwork::decode(&sample_png()).unwrap();
        let lines = artwork.lines(2, 2);
        assert_eq!(lines.len(), 2);

        let top = &lines[0].spans[0];
        assert_eq!(top.content, "▀");
        assert_eq!(top.style.fg, Some(Color::Rgb(255, 0, 0)));
        assert_eq!(top.style.bg, Some(Color::Rgb(255, 0, 0)));

        let bottom = &lines[1].spans[1];
        assert_eq!(bottom.style.fg, Some(Color::Rgb(0, 0, 255)));
    }

    #[test]
    fn test_cache_requests_each_url_once() {
        let mut cache = ArtworkCache::default();
        assert_eq!(cache.view(None), ArtworkView::NoImage);
        assert_eq!(cache.view(Some("a")), ArtworkView::Loading);

        assert!(cache.request("a"));
        assert!(!cache.request("a"));

        cache.mark_missing("a".into());
        assert_eq!(cache.view(Some("a")), ArtworkView::Missing);
        assert!(!cache.request("a"));

        let artwork = Artwork::decode(&sample_png()).unwrap();
        cache.store("b".into(), artwork.clone());
        assert_eq!(cache.view(Some("b")), ArtworkView::Ready(&artwork));
        assert_eq!(cache.ready_count(), 1);
    }

    #[test]
    fn test_artwork_serializes_pixels_as_base64() {
        let artwork = Artwork::decode(&sample_png()).unwrap();
        let json = serde_json::to_value(&artwork).unwrap();
        assert!(json["rgba"].is_string());
        let back: Artwork = serde_json::from_value(json).unwrap();
        assert_eq!(back, artwork);
    }
}

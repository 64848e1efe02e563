//! Font collection keyed by family name.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::AssetError;

const SFNT_TRUETYPE: [u8; 4] = [0x00, 0x01, 0x00, 0x00];
const SFNT_APPLE: [u8; 4] = *b"true";
const SFNT_CFF: [u8; 4] = *b"OTTO";
const COLLECTION: [u8; 4] = *b"ttcf";

/// Font metrics as fractions of the font size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontMetrics {
    /// Average horizontal advance of a glyph.
    pub advance_ratio: f32,
    pub ascent_ratio: f32,
    /// Positive distance below the baseline.
    pub descent_ratio: f32,
    pub line_gap_ratio: f32,
}

impl FontMetrics {
    /// Metrics used when no font is available.
    pub const FALLBACK: FontMetrics = FontMetrics {
        advance_ratio: 0.6,
        ascent_ratio: 0.9,
        descent_ratio: 0.3,
        line_gap_ratio: 0.0,
    };

    pub fn line_height_ratio(&self) -> f32 {
        self.ascent_ratio + self.descent_ratio + self.line_gap_ratio
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::FALLBACK
    }
}

#[derive(Debug)]
struct LoadedFont {
    bytes: Vec<u8>,
    metrics: FontMetrics,
}

/// Registered fonts, in registration order.
#[derive(Debug, Default)]
pub struct FontCollection {
    fonts: IndexMap<String, LoadedFont>,
}

impl FontCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `bytes` under `family`, replacing any previous font.
    pub fn register(&mut self, family: impl Into<String>, bytes: Vec<u8>) -> Result<(), AssetError> {
        let family = family.into();
        let metrics = match read_metrics(&bytes) {
            Ok(metrics) => metrics,
            Err(reason) => return Err(AssetError::InvalidFont { family, reason }),
        };
        log::debug!("registered font family {family:?} ({} bytes)", bytes.len());
        self.fonts.insert(family, LoadedFont { bytes, metrics });
        Ok(())
    }

    /// Registers the font at `path` under `family`.
    pub fn load_file(&mut self, family: impl Into<String>, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.register(family, bytes)
    }

    /// Registers every `.ttf`, `.otf` and `.ttc` file in `dir`, named by file
    /// stem. Unreadable fonts are skipped with a warning. Returns how many
    /// fonts were registered.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize, AssetError> {
        let dir = dir.as_ref();
        let io_error = |source| AssetError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut paths: Vec<_> = fs::read_dir(dir)
            .map_err(io_error)?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
            })
            .collect();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            let Some(family) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            match self.load_file(family.to_owned(), &path) {
                Ok(()) => loaded += 1,
                Err(err) => log::warn!("skipping font: {err}"),
            }
        }
        Ok(loaded)
    }

    pub fn contains(&self, family: &str) -> bool {
        self.fonts.contains_key(family)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    pub fn bytes(&self, family: &str) -> Option<&[u8]> {
        self.fonts.get(family).map(|font| font.bytes.as_slice())
    }

    /// Metrics for `family`; the first registered font when `family` is
    /// `None`. Falls back to [`FontMetrics::FALLBACK`] with a warning when the
    /// requested family is unknown.
    pub fn resolve(&self, family: Option<&str>) -> FontMetrics {
        match family {
            Some(family) => match self.fonts.get(family) {
                Some(font) => font.metrics,
                None => {
                    log::warn!("font family {family:?} not registered; using fallback metrics");
                    self.default_metrics()
                }
            },
            None => self.default_metrics(),
        }
    }

    fn default_metrics(&self) -> FontMetrics {
        self.fonts
            .first()
            .map_or(FontMetrics::FALLBACK, |(_, font)| font.metrics)
    }
}

fn read_u16(bytes: &[u8], at: usize) -> Option<u16> {
    bytes
        .get(at..at + 2)
        .map(|raw| u16::from_be_bytes([raw[0], raw[1]]))
}

fn read_i16(bytes: &[u8], at: usize) -> Option<i16> {
    read_u16(bytes, at).map(|value| value as i16)
}

fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    bytes
        .get(at..at + 4)
        .map(|raw| u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

/// Offset and length of the table tagged `tag`.
fn find_table(bytes: &[u8], tag: &[u8; 4]) -> Option<(usize, usize)> {
    let count = read_u16(bytes, 4)? as usize;
    (0..count).find_map(|index| {
        let record = 12 + index * 16;
        if bytes.get(record..record + 4)? != tag {
            return None;
        }
        let offset = read_u32(bytes, record + 8)? as usize;
        let length = read_u32(bytes, record + 12)? as usize;
        bytes.get(offset..offset + length)?;
        Some((offset, length))
    })
}

/// Reads layout metrics from the `head`, `hhea` and `hmtx` tables.
/// Collections are accepted with fallback metrics.
fn read_metrics(bytes: &[u8]) -> Result<FontMetrics, &'static str> {
    let magic: [u8; 4] = bytes
        .get(..4)
        .and_then(|raw| raw.try_into().ok())
        .ok_or("file too short")?;
    match magic {
        COLLECTION => return Ok(FontMetrics::FALLBACK),
        SFNT_TRUETYPE | SFNT_APPLE | SFNT_CFF => {}
        _ => return Err("unrecognized font signature"),
    }

    let (head, _) = find_table(bytes, b"head").ok_or("missing head table")?;
    let (hhea, _) = find_table(bytes, b"hhea").ok_or("missing hhea table")?;
    let units = read_u16(bytes, head + 18).ok_or("truncated head table")?;
    if units == 0 {
        return Err("zero units per em");
    }
    let units = units as f32;
    let ascent = read_i16(bytes, hhea + 4).ok_or("truncated hhea table")?;
    let descent = read_i16(bytes, hhea + 6).ok_or("truncated hhea table")?;
    let line_gap = read_i16(bytes, hhea + 8).ok_or("truncated hhea table")?;
    let metric_count = read_u16(bytes, hhea + 34).ok_or("truncated hhea table")? as usize;

    let advance_ratio = find_table(bytes, b"hmtx")
        .and_then(|(hmtx, _)| {
            let advances: Vec<u16> = (0..metric_count)
                .filter_map(|index| read_u16(bytes, hmtx + index * 4))
                .filter(|advance| *advance > 0)
                .collect();
            if advances.is_empty() {
                return None;
            }
            let total: f32 = advances.iter().map(|advance| *advance as f32).sum();
            Some(total / advances.len() as f32 / units)
        })
        .unwrap_or(FontMetrics::FALLBACK.advance_ratio);

    Ok(FontMetrics {
        advance_ratio,
        ascent_ratio: ascent as f32 / units,
        descent_ratio: (descent as f32).abs() / units,
        line_gap_ratio: (line_gap.max(0)) as f32 / units,
    })
}

#[cfg(test)]
#[path = "tests/fonts_tests.rs"]
mod tests;

//! Indexed palettes.
//!
//! Limited-palette sources (ZX Spectrum screens, Game Boy tiles) are stored
//! as palette indices. [`IndexedPalette`] is a [`Metric`] over those indices:
//! two indices are different exactly when their palette colors are, so
//! entries that share a color (ZX black and bright black) never produce an
//! edge.

use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::color::{PackedColor, Rgb};
use crate::grid::Grid;
use crate::hqx::{FilterOptions, Hq4x};
use crate::metric::Metric;

/// Largest palette addressable by a `u8` index.
pub const MAX_ENTRIES: usize = 256;

/// List of all available built-in palette names.
const BUILTIN_NAMES: &[&str] = &["zx-spectrum", "gameboy", "nes", "pico8", "grayscale", "1bit"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("unknown palette '{0}'")]
    Unknown(String),
    #[error("palette has no entries")]
    Empty,
    #[error("palette has {0} entries, at most 256 are addressable")]
    TooManyEntries(usize),
    /// A source pixel refers to a missing entry
    #[error("pixel ({x}, {y}) uses index {index}, but the palette has {len} entries")]
    IndexOutOfRange { x: usize, y: usize, index: u8, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    pub name: String,
    pub rgb: Rgb,
}

/// An ordered list of named colors addressed by `u8` index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedPalette {
    name: String,
    entries: Vec<PaletteEntry>,
    #[serde(skip)]
    packed: Vec<PackedColor>,
}

impl IndexedPalette {
    pub fn new<S: Into<String>>(name: S, entries: Vec<PaletteEntry>) -> Result<Self, PaletteError> {
        if entries.is_empty() {
            return Err(PaletteError::Empty);
        }
        if entries.len() > MAX_ENTRIES {
            return Err(PaletteError::TooManyEntries(entries.len()));
        }
        let packed = entries.iter().map(|e| e.rgb.pack()).collect();
        Ok(Self { name: name.into(), entries, packed })
    }

    /// Build a palette from bare colors, naming entries by index.
    pub fn from_colors<S: Into<String>>(name: S, colors: &[Rgb]) -> Result<Self, PaletteError> {
        let entries = colors
            .iter()
            .enumerate()
            .map(|(i, &rgb)| PaletteEntry { name: i.to_string(), rgb })
            .collect();
        Self::new(name, entries)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; construction rejects empty palettes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn rgb(&self, index: u8) -> Option<Rgb> {
        self.entries.get(usize::from(index)).map(|e| e.rgb)
    }

    pub fn packed(&self, index: u8) -> Option<PackedColor> {
        self.packed.get(usize::from(index)).copied()
    }

    /// Index of the entry called `name`.
    pub fn index_of(&self, name: &str) -> Option<u8> {
        self.entries.iter().position(|e| e.name == name).map(|i| i as u8)
    }

    /// Check that every cell of `grid` names an existing entry.
    pub fn check_indices(&self, grid: &Grid<u8>) -> Result<(), PaletteError> {
        let width = grid.width();
        match grid.cells().iter().position(|&i| usize::from(i) >= self.len()) {
            Some(pos) => Err(PaletteError::IndexOutOfRange {
                x: pos % width,
                y: pos / width,
                index: grid.cells()[pos],
                len: self.len(),
            }),
            None => Ok(()),
        }
    }

    /// Resolve every index to its packed color.
    pub fn to_packed_grid(&self, grid: &Grid<u8>) -> Result<Grid<PackedColor>, PaletteError> {
        self.check_indices(grid)?;
        Ok(grid.map(|i| self.resolve(i)))
    }
}

impl Metric for IndexedPalette {
    type Pixel = u8;

    fn differs(&self, a: u8, b: u8) -> bool {
        self.rgb(a) != self.rgb(b)
    }

    /// Out-of-range indices resolve to black; [`filter_indexed`] rejects them
    /// before filtering.
    fn resolve(&self, pixel: u8) -> PackedColor {
        self.packed(pixel).unwrap_or(PackedColor::BLACK)
    }
}

/// Magnify an indexed image, comparing pixels by palette color.
pub fn filter_indexed(
    grid: &Grid<u8>,
    palette: &IndexedPalette,
    options: FilterOptions,
) -> Result<Grid<PackedColor>, PaletteError> {
    palette.check_indices(grid)?;
    debug!("filtering {}x{} indexed image with palette '{}'", grid.width(), grid.height(), palette.name());
    Ok(Hq4x::with_options(palette, options).filter(grid))
}

/// Returns a list of all available built-in palette names.
pub fn list_builtins() -> Vec<&'static str> {
    BUILTIN_NAMES.to_vec()
}

/// Returns a built-in palette by name, or None if not found.
pub fn get_builtin(name: &str) -> Option<IndexedPalette> {
    let entries = match name {
        "zx-spectrum" => zx_spectrum(),
        "gameboy" => gameboy(),
        "nes" => nes(),
        "pico8" => pico8(),
        "grayscale" => grayscale(),
        "1bit" => one_bit(),
        _ => return None,
    };
    IndexedPalette::new(name, entries).ok()
}

/// Like [`get_builtin`], with an error naming the missing palette.
pub fn builtin(name: &str) -> Result<IndexedPalette, PaletteError> {
    get_builtin(name).ok_or_else(|| PaletteError::Unknown(name.to_string()))
}

fn entries(colors: &[(&str, [u8; 3])]) -> Vec<PaletteEntry> {
    colors
        .iter()
        .map(|&(name, [r, g, b])| PaletteEntry { name: name.to_string(), rgb: Rgb::new(r, g, b) })
        .collect()
}

/// ZX Spectrum 16-color palette, index = bright << 3 | G R B.
///
/// Components are 180 (240 when bright) for a set bit, clipped to 16..=240,
/// so plain and bright black are both (16, 16, 16).
fn zx_spectrum() -> Vec<PaletteEntry> {
    const NAMES: [&str; 8] = ["black", "blue", "red", "magenta", "green", "cyan", "yellow", "white"];

    let level = |bit: u8, bright: u8| (u16::from(bit) * (u16::from(bright) + 3) * 60).clamp(16, 240) as u8;

    (0u8..16)
        .map(|i| {
            let bright = i >> 3;
            let (b, r, g) = (i & 1, (i >> 1) & 1, (i >> 2) & 1);
            let base = NAMES[usize::from(i & 7)];
            PaletteEntry {
                name: if bright == 1 { format!("bright_{}", base) } else { base.to_string() },
                rgb: Rgb::new(level(r, bright), level(g, bright), level(b, bright)),
            }
        })
        .collect()
}

/// Game Boy 4-color green palette, darkest first.
/// Reference: https://lospec.com/palette-list/nintendo-gameboy-bgb
fn gameboy() -> Vec<PaletteEntry> {
    entries(&[
        ("darkest", [0x0f, 0x38, 0x0f]),
        ("dark", [0x30, 0x62, 0x30]),
        ("light", [0x8b, 0xac, 0x0f]),
        ("lightest", [0x9b, 0xbc, 0x0f]),
    ])
}

/// NES-inspired palette with key representative colors.
/// Reference: https://lospec.com/palette-list/nintendo-entertainment-system
fn nes() -> Vec<PaletteEntry> {
    entries(&[
        ("black", [0x00, 0x00, 0x00]),
        ("white", [0xfc, 0xfc, 0xfc]),
        ("red", [0xa8, 0x00, 0x20]),
        ("green", [0x00, 0xa8, 0x00]),
        ("blue", [0x00, 0x58, 0xf8]),
        ("cyan", [0x00, 0xb8, 0xd8]),
        ("yellow", [0xf8, 0xd8, 0x00]),
        ("orange", [0xf8, 0x38, 0x00]),
        ("pink", [0xf8, 0x78, 0xf8]),
        ("brown", [0x50, 0x30, 0x00]),
        ("gray", [0x7c, 0x7c, 0x7c]),
        ("skin", [0xfc, 0xb8, 0xb8]),
    ])
}

/// PICO-8 16-color palette, in PICO-8 index order.
/// Reference: https://lospec.com/palette-list/pico-8
fn pico8() -> Vec<PaletteEntry> {
    entries(&[
        ("black", [0x00, 0x00, 0x00]),
        ("dark_blue", [0x1d, 0x2b, 0x53]),
        ("dark_purple", [0x7e, 0x25, 0x53]),
        ("dark_green", [0x00, 0x87, 0x51]),
        ("brown", [0xab, 0x52, 0x36]),
        ("dark_gray", [0x5f, 0x57, 0x4f]),
        ("light_gray", [0xc2, 0xc3, 0xc7]),
        ("white", [0xff, 0xf1, 0xe8]),
        ("red", [0xff, 0x00, 0x4d]),
        ("orange", [0xff, 0xa3, 0x00]),
        ("yellow", [0xff, 0xec, 0x27]),
        ("green", [0x00, 0xe4, 0x36]),
        ("blue", [0x29, 0xad, 0xff]),
        ("indigo", [0x83, 0x76, 0x9c]),
        ("pink", [0xff, 0x77, 0xa8]),
        ("peach", [0xff, 0xcc, 0xaa]),
    ])
}

/// 8-shade grayscale palette from white to black.
fn grayscale() -> Vec<PaletteEntry> {
    entries(&[
        ("white", [0xff, 0xff, 0xff]),
        ("gray1", [0xdf, 0xdf, 0xdf]),
        ("gray2", [0xbf, 0xbf, 0xbf]),
        ("gray3", [0x9f, 0x9f, 0x9f]),
        ("gray4", [0x7f, 0x7f, 0x7f]),
        ("gray5", [0x5f, 0x5f, 0x5f]),
        ("gray6", [0x3f, 0x3f, 0x3f]),
        ("black", [0x00, 0x00, 0x00]),
    ])
}

/// 1-bit black and white palette.
fn one_bit() -> Vec<PaletteEntry> {
    entries(&[("black", [0x00, 0x00, 0x00]), ("white", [0xff, 0xff, 0xff])])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zx() -> IndexedPalette {
        get_builtin("zx-spectrum").expect("zx-spectrum palette should exist")
    }

    #[test]
    fn test_list_builtins() {
        let builtins = list_builtins();
        assert!(builtins.contains(&"zx-spectrum"));
        assert!(builtins.contains(&"gameboy"));
        assert!(builtins.contains(&"nes"));
        assert!(builtins.contains(&"pico8"));
        assert!(builtins.contains(&"grayscale"));
        assert!(builtins.contains(&"1bit"));
        assert_eq!(builtins.len(), 6);
    }

    #[test]
    fn test_every_listed_builtin_loads() {
        for name in list_builtins() {
            let palette = get_builtin(name).expect("all listed builtins should exist");
            assert_eq!(palette.name(), name);
            assert!(!palette.is_empty());
        }
    }

    #[test]
    fn test_get_builtin_gameboy() {
        let palette = get_builtin("gameboy").expect("gameboy palette should exist");
        assert_eq!(palette.len(), 4);
        assert_eq!(palette.rgb(0).map(Rgb::to_hex), Some("#0F380F".to_string()));
        assert_eq!(palette.index_of("lightest"), Some(3));
        assert_eq!(palette.rgb(3).map(Rgb::to_hex), Some("#9BBC0F".to_string()));
    }

    #[test]
    fn test_get_builtin_pico8() {
        let palette = get_builtin("pico8").expect("pico8 palette should exist");
        assert_eq!(palette.len(), 16);
        assert_eq!(palette.rgb(7), Some(Rgb::new(0xff, 0xf1, 0xe8)));
        assert_eq!(palette.index_of("peach"), Some(15));
    }

    #[test]
    fn test_get_builtin_nonexistent() {
        assert!(get_builtin("nonexistent").is_none());
        assert!(get_builtin("").is_none());
        assert!(get_builtin("Gameboy").is_none()); // case-sensitive
        assert_eq!(builtin("zx81"), Err(PaletteError::Unknown("zx81".to_string())));
    }

    #[test]
    fn test_zx_spectrum_colors() {
        let expected = [
            (16, 16, 16), (16, 16, 180), (180, 16, 16), (180, 16, 180),
            (16, 180, 16), (16, 180, 180), (180, 180, 16), (180, 180, 180),
            (16, 16, 16), (16, 16, 240), (240, 16, 16), (240, 16, 240),
            (16, 240, 16), (16, 240, 240), (240, 240, 16), (240, 240, 240),
        ];
        let palette = zx();
        for (i, &(r, g, b)) in expected.iter().enumerate() {
            assert_eq!(palette.rgb(i as u8), Some(Rgb::new(r, g, b)), "index {}", i);
        }
        assert_eq!(palette.index_of("bright_cyan"), Some(13));
    }

    #[test]
    fn test_zx_spectrum_packed_values() {
        let expected: [u32; 16] = [
            0x1008_0200, 0x22bd_21cb, 0x4116_4748, 0x53cb_6713,
            0x7044_9ced, 0x82f9_bcb8, 0xa152_e235, 0xb408_0200,
            0x1008_0200, 0x299f_01b7, 0x5305_a7c0, 0x6c8c_a777,
            0x9383_5c89, 0xad0a_5c40, 0xd671_0249, 0xf008_0200,
        ];
        let palette = zx();
        let packed: Vec<u32> = (0..16).map(|i| palette.packed(i).map_or(0, |c| c.raw())).collect();
        assert_eq!(packed, expected);
    }

    #[test]
    fn test_shared_color_indices_are_equal() {
        let palette = zx();
        assert!(!palette.differs(0, 8));
        assert!(palette.differs(0, 1));
        assert!(palette.differs(7, 15));
        assert!(!palette.differs(5, 5));
    }

    #[test]
    fn test_empty_and_oversized_palettes_rejected() {
        assert_eq!(IndexedPalette::from_colors("none", &[]), Err(PaletteError::Empty));
        let many = vec![Rgb::new(0, 0, 0); 257];
        assert_eq!(IndexedPalette::from_colors("many", &many), Err(PaletteError::TooManyEntries(257)));
        assert!(IndexedPalette::from_colors("full", &many[..256]).is_ok());
    }

    #[test]
    fn test_index_out_of_range() {
        let palette = get_builtin("1bit").expect("1bit palette should exist");
        let grid = Grid::from_rows(vec![vec![0, 1], vec![1, 2]]).unwrap();
        let err = filter_indexed(&grid, &palette, FilterOptions::default()).unwrap_err();
        assert_eq!(err, PaletteError::IndexOutOfRange { x: 1, y: 1, index: 2, len: 2 });
    }

    #[test]
    fn test_filter_indexed_zx() {
        let grid = Grid::from_rows(vec![vec![0, 8, 7], vec![8, 15, 7], vec![1, 1, 0]]).unwrap();
        let out = filter_indexed(&grid, &zx(), FilterOptions::default()).unwrap();
        assert_eq!(out.dimensions(), (12, 12));

        let (black, white, bright_white, blue) = (0x1008_0200, 0xb408_0200, 0xf008_0200, 0x22bd_21cb);
        let mut expected: Vec<Vec<u32>> = Vec::new();
        for _ in 0..4 {
            expected.push([vec![black; 8], vec![white; 4]].concat());
        }
        expected.push([vec![black; 4], vec![0x8008_0200], vec![bright_white; 3], vec![white; 4]].concat());
        for _ in 0..3 {
            expected.push([vec![black; 4], vec![bright_white; 4], vec![white; 4]].concat());
        }
        for _ in 0..4 {
            expected.push([vec![blue; 8], vec![black; 4]].concat());
        }

        let actual: Vec<Vec<u32>> = out.rows().map(|r| r.iter().map(|c| c.raw()).collect()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_to_packed_grid() {
        let palette = get_builtin("1bit").expect("1bit palette should exist");
        let grid = Grid::from_rows(vec![vec![0u8, 1]]).unwrap();
        let packed = palette.to_packed_grid(&grid).unwrap();
        assert_eq!(packed.cells(), &[Rgb::new(0, 0, 0).pack(), Rgb::new(255, 255, 255).pack()]);
    }
}

//! Golden output tests for the hq4x filter
//!
//! These run whole images through the public API and compare against
//! reference output, either pixel by pixel or by SHA-256 of the packed words.

use std::collections::HashSet;

use hqscale::hqx::{hq4x, FilterOptions, Hq4x, SCALE};
use hqscale::palettes::{builtin, filter_indexed};
use hqscale::screen::{ZxScreen, BITMAP_LEN, HEIGHT, SCREEN_LEN, WIDTH};
use hqscale::{pack, Grid, PackedColor, YuvThreshold};
use sha2::{Digest, Sha256};

const SPRITE_PALETTE: [(u8, u8, u8); 4] = [(24, 20, 40), (230, 200, 60), (60, 140, 220), (250, 250, 250)];

/// A 24x16 four-color sprite with enough structure to hit most table rows.
fn sprite() -> Grid<PackedColor> {
    let (w, h) = (24, 16);
    let cells = (0..h)
        .flat_map(|y| (0..w).map(move |x| (x, y)))
        .map(|(x, y)| {
            let index = ((x * x + 3 * y) / 5 + x * y + (x / 3) * (y / 2)) % 4;
            let (r, g, b) = SPRITE_PALETTE[index];
            pack(r, g, b)
        })
        .collect();
    Grid::new(w, h, cells).unwrap()
}

fn sha256_hex(grid: &Grid<PackedColor>) -> String {
    let bytes: Vec<u8> = grid.cells().iter().flat_map(|c| c.raw().to_le_bytes()).collect();
    format!("{:x}", Sha256::digest(&bytes))
}

#[test]
fn test_sprite_digest() {
    let out = hq4x(&sprite());
    assert_eq!(out.dimensions(), (96, 64));
    assert_eq!(sha256_hex(&out), "48d085a8cf526eabd4cbce78363599216b75540b6795bc4ad917fd73a8642e28");
}

#[test]
fn test_sprite_sample_pixels() {
    let out = hq4x(&sprite());
    assert_eq!(out.get(0, 0).unwrap().raw(), 0x1788_9601);
    assert_eq!(out.get(95, 63).unwrap().raw(), 0x1788_9601);
    assert_eq!(out.get(17, 10).unwrap().raw(), 0xc103_526a);
}

#[test]
fn test_sprite_blends_new_colors() {
    let out = hq4x(&sprite());
    let distinct: HashSet<u32> = out.cells().iter().map(|c| c.raw()).collect();
    assert_eq!(distinct.len(), 22);
    for &(r, g, b) in &SPRITE_PALETTE {
        assert!(distinct.contains(&pack(r, g, b).raw()));
    }
}

#[test]
fn test_sprite_sequential_digest_matches() {
    let filter = Hq4x::with_options(YuvThreshold::default(), FilterOptions { parallel: false });
    assert_eq!(sha256_hex(&filter.filter(&sprite())), sha256_hex(&hq4x(&sprite())));
}

#[test]
fn test_uniform_image_stays_uniform() {
    let color = pack(90, 30, 200);
    let out = hq4x(&Grid::filled(7, 5, color).unwrap());
    assert_eq!(out.dimensions(), (28, 20));
    assert!(out.cells().iter().all(|&c| c == color));
}

#[test]
fn test_near_colors_are_not_edges() {
    // Within every threshold, so the filter treats the image as flat and
    // each output pixel is a blend that never leaves the pair's range.
    let a = pack(100, 100, 100);
    let b = pack(102, 101, 100);
    let grid = Grid::from_rows(vec![vec![a, b, a], vec![b, a, b], vec![a, b, a]]).unwrap();
    let out = hq4x(&grid);
    let (lo, hi) = (a.luma().min(b.luma()), a.luma().max(b.luma()));
    assert!(out.cells().iter().all(|c| c.luma() >= lo && c.luma() <= hi));
}

fn screen_bytes(attr: u8, ink_block: bool) -> Vec<u8> {
    let mut bytes = vec![0u8; SCREEN_LEN];
    bytes[BITMAP_LEN..].fill(attr);
    if ink_block {
        // Top-left character cell fully inked; its 8 pixel rows are 256
        // bytes apart in the interleaved bitmap.
        for line in 0..8 {
            bytes[line * 256] = 0xff;
        }
    }
    bytes
}

#[test]
fn test_blank_screen_magnifies_to_paper() {
    // Paper 1 (blue), ink 7 (white), no bitmap bits set.
    let screen = ZxScreen::from_bytes(&screen_bytes(0b0000_1111, false)).unwrap();
    let palette = builtin("zx-spectrum").unwrap();
    let out = filter_indexed(&screen.to_index_grid(), &palette, FilterOptions::default()).unwrap();

    assert_eq!(out.dimensions(), (WIDTH * SCALE, HEIGHT * SCALE));
    let blue = palette.packed(1).unwrap();
    assert!(out.cells().iter().all(|&c| c == blue));
}

#[test]
fn test_screen_ink_block_is_sharp_inside() {
    let screen = ZxScreen::from_bytes(&screen_bytes(0b0000_1111, true)).unwrap();
    let palette = builtin("zx-spectrum").unwrap();
    let out = filter_indexed(&screen.to_index_grid(), &palette, FilterOptions::default()).unwrap();

    let white = palette.packed(7).unwrap();
    let blue = palette.packed(1).unwrap();
    // Interior of the 8x8 ink cell, away from its edges.
    for y in 4..28 {
        for x in 4..28 {
            assert_eq!(out.get(x, y), Some(white), "({}, {})", x, y);
        }
    }
    // Far from the cell the paper is untouched.
    assert_eq!(out.get(100, 100), Some(blue));
    // The cell's outer corner pixel at the image border stays pure ink.
    assert_eq!(out.get(0, 0), Some(white));
}

#[test]
fn test_indexed_and_packed_agree_on_two_color_art() {
    // With two colors far apart, index equality and the YUV thresholds give
    // the same edge patterns, so both paths produce identical output.
    let palette = builtin("1bit").unwrap();
    let indices = Grid::new(6, 6, (0..36).map(|i: usize| ((i * 7 + i / 6) % 3 == 0) as u8).collect()).unwrap();
    let indexed = filter_indexed(&indices, &palette, FilterOptions::default()).unwrap();
    let packed = hq4x(&palette.to_packed_grid(&indices).unwrap());
    assert_eq!(indexed, packed);
}

//! ZX Spectrum screen memory decoding
//!
//! A screen dump is 6144 bytes of 1-bit bitmap followed by 768 attribute
//! bytes, one per 8x8 character cell. Bitmap rows are interleaved: the
//! address of pixel row `y` is built from the character row's third, the
//! pixel line within the character and the character row within the third.

use log::warn;
use thiserror::Error;

use crate::grid::Grid;

pub const WIDTH: usize = 256;
pub const HEIGHT: usize = 192;
pub const BITMAP_LEN: usize = WIDTH * HEIGHT / 8;
pub const ATTR_LEN: usize = (WIDTH / 8) * (HEIGHT / 8);
/// Size of a complete screen dump.
pub const SCREEN_LEN: usize = BITMAP_LEN + ATTR_LEN;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScreenError {
    #[error("screen dump is {0} bytes, expected at least 6912")]
    TooShort(usize),
}

/// A decoded-on-demand ZX Spectrum screen.
#[derive(Clone, PartialEq, Eq)]
pub struct ZxScreen {
    bitmap: Vec<u8>,
    attributes: Vec<u8>,
}

impl ZxScreen {
    /// Read a screen dump; bytes past the first 6912 are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ScreenError> {
        if bytes.len() < SCREEN_LEN {
            return Err(ScreenError::TooShort(bytes.len()));
        }
        if bytes.len() > SCREEN_LEN {
            warn!("ignoring {} trailing bytes after screen data", bytes.len() - SCREEN_LEN);
        }
        Ok(Self {
            bitmap: bytes[..BITMAP_LEN].to_vec(),
            attributes: bytes[BITMAP_LEN..SCREEN_LEN].to_vec(),
        })
    }

    /// Palette index (`bright << 3 | color`) of pixel (x, y), or `None`
    /// outside 256x192. Flash is ignored.
    pub fn color_index(&self, x: usize, y: usize) -> Option<u8> {
        (x < WIDTH && y < HEIGHT).then(|| self.index_at(x, y))
    }

    fn index_at(&self, x: usize, y: usize) -> u8 {
        let cy = y / 8;
        let attr = self.attributes[cy * (WIDTH / 8) + x / 8];
        let ink = attr & 0b111;
        let paper = (attr >> 3) & 0b111;
        let bright = (attr >> 6) & 1;

        let row = ((cy & 0b11000) | (y & 7)) << 3 | (cy & 7);
        let byte = self.bitmap[row * (WIDTH / 8) + x / 8];
        let set = byte & (0x80 >> (x & 7)) != 0;

        (bright << 3) | if set { ink } else { paper }
    }

    /// The whole screen as palette indices.
    pub fn to_index_grid(&self) -> Grid<u8> {
        let cells = (0..HEIGHT)
            .flat_map(|y| (0..WIDTH).map(move |x| (x, y)))
            .map(|(x, y)| self.index_at(x, y))
            .collect();
        Grid::from_parts(WIDTH, HEIGHT, cells)
    }
}

impl std::fmt::Debug for ZxScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ZxScreen({}x{})", WIDTH, HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(attr: u8) -> Vec<u8> {
        let mut bytes = vec![0u8; SCREEN_LEN];
        bytes[BITMAP_LEN..].fill(attr);
        bytes
    }

    #[test]
    fn test_short_dump_rejected() {
        assert_eq!(ZxScreen::from_bytes(&[0; 100]), Err(ScreenError::TooShort(100)));
        assert!(ZxScreen::from_bytes(&vec![0; SCREEN_LEN - 1]).is_err());
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut bytes = blank(0b0011_1000);
        let exact = ZxScreen::from_bytes(&bytes).unwrap();
        bytes.extend_from_slice(&[0xff; 10]);
        assert_eq!(ZxScreen::from_bytes(&bytes).unwrap(), exact);
    }

    #[test]
    fn test_paper_and_ink() {
        // paper white (7), ink blue (1)
        let mut bytes = blank(0b0011_1001);
        bytes[0] = 0b1000_0001;
        let screen = ZxScreen::from_bytes(&bytes).unwrap();
        assert_eq!(screen.color_index(0, 0), Some(1));
        assert_eq!(screen.color_index(1, 0), Some(7));
        assert_eq!(screen.color_index(7, 0), Some(1));
        assert_eq!(screen.color_index(8, 0), Some(7));
    }

    #[test]
    fn test_bright_bit() {
        let screen = ZxScreen::from_bytes(&blank(0b0101_0000)).unwrap();
        // paper red (2) + bright
        assert_eq!(screen.color_index(100, 100), Some(10));
    }

    #[test]
    fn test_flash_ignored() {
        let screen = ZxScreen::from_bytes(&blank(0b1000_0110)).unwrap();
        assert_eq!(screen.color_index(0, 0), Some(0));
    }

    #[test]
    fn test_interleaved_rows() {
        let mut bytes = blank(0b0000_0111);
        // Row address 1 is pixel row 8: first line of character row 1.
        bytes[32] = 0xff;
        // Row address 8 is pixel row 1: second line of character row 0.
        bytes[8 * 32] = 0xff;
        // Row address 64 * 32 starts the middle third, pixel row 64.
        bytes[64 * 32] = 0xff;
        let screen = ZxScreen::from_bytes(&bytes).unwrap();

        assert_eq!(screen.color_index(0, 8), Some(7));
        assert_eq!(screen.color_index(0, 1), Some(7));
        assert_eq!(screen.color_index(0, 64), Some(7));
        assert_eq!(screen.color_index(0, 2), Some(0));
        assert_eq!(screen.color_index(0, 9), Some(0));
    }

    #[test]
    fn test_attribute_cells() {
        let mut bytes = blank(0);
        // Cell (3, 2) gets paper cyan.
        bytes[BITMAP_LEN + 2 * 32 + 3] = 0b0010_1000;
        let screen = ZxScreen::from_bytes(&bytes).unwrap();
        assert_eq!(screen.color_index(24, 16), Some(5));
        assert_eq!(screen.color_index(31, 23), Some(5));
        assert_eq!(screen.color_index(32, 16), Some(0));
        assert_eq!(screen.color_index(24, 24), Some(0));
    }

    #[test]
    fn test_color_index_outside_screen() {
        let screen = ZxScreen::from_bytes(&blank(0b0011_1000)).unwrap();
        assert_eq!(screen.color_index(255, 191), Some(7));
        assert_eq!(screen.color_index(256, 0), None);
        assert_eq!(screen.color_index(0, 192), None);
    }

    #[test]
    fn test_index_grid() {
        let mut bytes = blank(0b0100_0010);
        bytes[0] = 0x80;
        let grid = ZxScreen::from_bytes(&bytes).unwrap().to_index_grid();
        assert_eq!(grid.dimensions(), (256, 192));
        assert_eq!(grid.get(0, 0), Some(10));
        assert_eq!(grid.get(1, 0), Some(8));
    }
}

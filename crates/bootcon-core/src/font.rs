//! Pre-decoded bitmap font model.
//!
//! Fonts arrive already unpacked into a packed-row glyph table; no file
//! parsing happens here. The table's in-memory bit order varies between
//! sources, so each [`Font`] resolves a row-decode strategy once at
//! construction and the rasterizer's inner loop stays branch-free: decoded
//! rows always carry the leftmost pixel in bit 63.

pub const MAX_GLYPH_WIDTH: u32 = 64;

/// How a glyph row's pixels are ordered in storage.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BitOrder {
    /// Byte 0 holds the leftmost pixels, most significant bit first
    /// (PSF-style storage).
    LeftToRight,
    /// The row reads as a little-endian-significant word; bit `width - 1`
    /// is the leftmost pixel.
    RightToLeft,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FontError {
    /// Width zero or above [`MAX_GLYPH_WIDTH`].
    WidthOutOfRange(u32),
    ZeroHeight,
    /// Glyph table shorter than `glyph_count * glyph_size`.
    TruncatedGlyphTable { needed: usize, actual: usize },
}

/// Code point beyond the font's glyph table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OutOfRangeGlyph {
    pub code: u32,
}

type RowDecode = fn(&[u8], u32) -> u64;

/// A fixed-cell bitmap font over a caller-owned glyph table.
#[derive(Clone, Copy)]
pub struct Font<'a> {
    name: &'a str,
    width: u32,
    height: u32,
    glyph_count: u32,
    glyphs: &'a [u8],
    decode: RowDecode,
}

impl<'a> Font<'a> {
    pub fn new(
        name: &'a str,
        width: u32,
        height: u32,
        order: BitOrder,
        glyph_count: u32,
        glyphs: &'a [u8],
    ) -> Result<Self, FontError> {
        if width == 0 || width > MAX_GLYPH_WIDTH {
            return Err(FontError::WidthOutOfRange(width));
        }
        if height == 0 {
            return Err(FontError::ZeroHeight);
        }

        let glyph_size = row_stride(width) * height as usize;
        let needed = glyph_count as usize * glyph_size;
        if glyphs.len() < needed {
            return Err(FontError::TruncatedGlyphTable {
                needed,
                actual: glyphs.len(),
            });
        }

        let decode = match order {
            BitOrder::LeftToRight => decode_left_to_right,
            BitOrder::RightToLeft => decode_right_to_left,
        };

        Ok(Self {
            name,
            width,
            height,
            glyph_count,
            glyphs,
            decode,
        })
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn glyph_count(&self) -> u32 {
        self.glyph_count
    }

    /// Bytes per glyph row.
    pub fn stride(&self) -> usize {
        row_stride(self.width)
    }

    /// Bytes per glyph.
    pub fn glyph_size(&self) -> usize {
        self.stride() * self.height as usize
    }

    /// Looks up the glyph for `code`. Out-of-table codes are reported, never
    /// used to index the table.
    pub fn glyph(&self, code: u32) -> Result<Glyph<'a>, OutOfRangeGlyph> {
        if code >= self.glyph_count {
            return Err(OutOfRangeGlyph { code });
        }

        let start = code as usize * self.glyph_size();
        Ok(Glyph {
            rows: &self.glyphs[start..start + self.glyph_size()],
            stride: self.stride(),
            width: self.width,
            decode: self.decode,
        })
    }
}

/// One glyph's packed raster rows.
#[derive(Clone, Copy)]
pub struct Glyph<'a> {
    rows: &'a [u8],
    stride: usize,
    width: u32,
    decode: RowDecode,
}

impl Glyph<'_> {
    /// Row pixels normalized so bit 63 is the leftmost pixel; only the top
    /// `width` bits are meaningful. `None` past the glyph's last row.
    pub fn row(&self, row: u32) -> Option<u64> {
        let start = row as usize * self.stride;
        let bytes = self.rows.get(start..start + self.stride)?;
        Some((self.decode)(bytes, self.width))
    }
}

fn row_stride(width: u32) -> usize {
    (width as usize + 7) / 8
}

fn decode_left_to_right(bytes: &[u8], _width: u32) -> u64 {
    let mut word = 0u64;
    for (i, byte) in bytes.iter().enumerate() {
        word |= (*byte as u64) << (56 - 8 * i);
    }
    word
}

fn decode_right_to_left(bytes: &[u8], width: u32) -> u64 {
    let mut word = 0u64;
    for (i, byte) in bytes.iter().enumerate() {
        word |= (*byte as u64) << (8 * i);
    }
    word << (64 - width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_to_right_rows_keep_byte_zero_leftmost() {
        // One 16x2 glyph: row 0 = 0b10000000_00000001, row 1 = all off.
        let table = [0b1000_0000u8, 0b0000_0001, 0, 0];
        let font = Font::new("t", 16, 2, BitOrder::LeftToRight, 1, &table).unwrap();
        let glyph = font.glyph(0).unwrap();

        let row = glyph.row(0).unwrap();
        assert_ne!(row & (1 << 63), 0, "leftmost pixel on");
        assert_ne!(row & (1 << (63 - 15)), 0, "rightmost pixel on");
        assert_eq!(row & (1 << (63 - 1)), 0);
        assert_eq!(glyph.row(1).unwrap() >> (64 - 16), 0);
    }

    #[test]
    fn rows_past_the_glyph_decode_to_none() {
        let table = [0xFFu8; 2];
        let font = Font::new("t", 8, 2, BitOrder::LeftToRight, 1, &table).unwrap();
        let glyph = font.glyph(0).unwrap();

        assert!(glyph.row(1).is_some());
        assert_eq!(glyph.row(2), None);
        assert_eq!(glyph.row(u32::MAX / 2), None);
    }

    #[test]
    fn right_to_left_rows_mirror_storage() {
        // 8-wide row stored right to left: bit 7 of the byte is leftmost.
        let table = [0b1000_0001u8];
        let font = Font::new("t", 8, 1, BitOrder::RightToLeft, 1, &table).unwrap();
        let row = font.glyph(0).unwrap().row(0).unwrap();

        assert_ne!(row & (1 << 63), 0);
        assert_ne!(row & (1 << (63 - 7)), 0);
        assert_eq!(row & (1 << (63 - 3)), 0);
    }

    #[test]
    fn strides_pad_partial_bytes() {
        let font = Font::new("t", 9, 2, BitOrder::LeftToRight, 1, &[0u8; 4]).unwrap();
        assert_eq!(font.stride(), 2);
        assert_eq!(font.glyph_size(), 4);
    }

    #[test]
    fn out_of_table_codes_are_rejected() {
        let font = Font::new("t", 8, 1, BitOrder::LeftToRight, 2, &[0u8; 2]).unwrap();
        assert!(font.glyph(1).is_ok());
        assert_eq!(font.glyph(2).err(), Some(OutOfRangeGlyph { code: 2 }));
    }

    #[test]
    fn construction_validates_the_descriptor() {
        assert_eq!(
            Font::new("t", 65, 1, BitOrder::LeftToRight, 1, &[0u8; 16]).err(),
            Some(FontError::WidthOutOfRange(65))
        );
        assert_eq!(
            Font::new("t", 8, 0, BitOrder::LeftToRight, 1, &[]).err(),
            Some(FontError::ZeroHeight)
        );
        assert_eq!(
            Font::new("t", 8, 2, BitOrder::LeftToRight, 2, &[0u8; 3]).err(),
            Some(FontError::TruncatedGlyphTable {
                needed: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn widest_supported_glyph_decodes() {
        let mut table = [0u8; 8];
        table[0] = 0x01;
        table[7] = 0x80;
        let font = Font::new("t", 64, 1, BitOrder::RightToLeft, 1, &table).unwrap();
        let row = font.glyph(0).unwrap().row(0).unwrap();

        assert_ne!(row & (1 << 63), 0);
        assert_ne!(row & 1, 0);
    }
}

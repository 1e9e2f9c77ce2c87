pub const GLYPH_COLUMNS: i32 = 3;
pub const GLYPH_ROWS: i32 = 5;
const FALLBACK_CHAR: char = '*';

// Printable ASCII, 3x5 cells packed top row first; bit 2 of a row is its leftmost column.
const ASCII_GLYPHS: [u16; 95] = [
    0x0000, 0x2482, 0x5a00, 0x5f7d, 0x7ddf, 0x52a5, 0x2aab, 0x2400, // ' ' .. '\''
    0x1491, 0x4494, 0x0aa8, 0x05d0, 0x0014, 0x01c0, 0x0002, 0x12a4, // '(' .. '/'
    0x7b6f, 0x2c97, 0x73e7, 0x73cf, 0x5bc9, 0x79cf, 0x79ef, 0x7292, // '0' .. '7'
    0x7bef, 0x7bcf, 0x0410, 0x0414, 0x1511, 0x0e38, 0x4454, 0x72c2, // '8' .. '?'
    0x7be7, 0x2bed, 0x6bae, 0x7927, 0x6b6e, 0x79a7, 0x79a4, 0x796f, // '@' .. 'G'
    0x5bed, 0x7497, 0x726f, 0x5bad, 0x4927, 0x5fed, 0x5ffd, 0x7b6f, // 'H' .. 'O'
    0x6ba4, 0x7b79, 0x6bad, 0x79cf, 0x7492, 0x5b6f, 0x5b6a, 0x5bfd, // 'P' .. 'W'
    0x5aad, 0x5a92, 0x72a7, 0x6926, 0x4889, 0x324b, 0x2a00, 0x0007, // 'X' .. '_'
    0x4400, 0x0e7f, 0x49ae, 0x0f27, 0x13ef, 0x0fa7, 0x39a4, 0x0f79, // '`' .. 'g'
    0x49ad, 0x2092, 0x106a, 0x4bad, 0x4927, 0x0ded, 0x0d6d, 0x0f6f, // 'h' .. 'o'
    0x0d74, 0x0f79, 0x0d64, 0x0f8f, 0x2e93, 0x0b6f, 0x0b6a, 0x0b7a, // 'p' .. 'w'
    0x0a95, 0x0b79, 0x0e57, 0x3593, 0x2492, 0x64d6, 0x0780, // 'x' .. '~'
];

fn packed_glyph(ch: char) -> Option<u16> {
    match ch {
        ' '..='~' => ASCII_GLYPHS.get(ch as usize - ' ' as usize).copied(),
        _ => None,
    }
}

pub fn glyph_rows(ch: char) -> [u8; GLYPH_ROWS as usize] {
    let packed = packed_glyph(ch)
        .or_else(|| packed_glyph(FALLBACK_CHAR))
        .unwrap_or(0);
    let mut rows = [0u8; GLYPH_ROWS as usize];
    for (row, bits) in rows.iter_mut().enumerate() {
        *bits = ((packed >> (12 - 3 * row)) & 0b111) as u8;
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_printable_ascii_char_has_a_glyph() {
        for code in 32u8..=126u8 {
            assert!(packed_glyph(char::from(code)).is_some(), "code={code}");
        }
    }

    #[test]
    fn rows_unpack_top_first() {
        assert_eq!(glyph_rows('!'), [0b010, 0b010, 0b010, 0b000, 0b010]);
        assert_eq!(glyph_rows('#'), [0b101, 0b111, 0b101, 0b111, 0b101]);
        assert_eq!(glyph_rows('_'), [0, 0, 0, 0, 0b111]);
        assert_eq!(glyph_rows(' '), [0; 5]);
    }

    #[test]
    fn non_ascii_uses_fallback() {
        assert_eq!(glyph_rows('ѡ'), glyph_rows('*'));
    }
}

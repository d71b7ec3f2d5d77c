//! Advance widths for the built-in Helvetica faces, in 1/1000 em.

/// Printable ASCII (0x20..=0x7E), Helvetica.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

/// Printable ASCII (0x20..=0x7E), Helvetica-Bold.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

pub fn helvetica_width(ch: char, bold: bool) -> u16 {
    let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
    match ch {
        ' '..='~' => table[ch as usize - 0x20],
        '€' => 556,
        '•' => 350,
        '°' => 400,
        '–' => 556,
        '—' => 1000,
        _ => 556,
    }
}

/// Map a character to its WinAnsiEncoding byte, as used by the built-in faces.
pub fn unicode_to_winansi(ch: char) -> Option<u8> {
    let cp = ch as u32;
    if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
        return Some(cp as u8);
    }
    match cp {
        0x20AC => Some(0x80), // euro
        0x201A => Some(0x82),
        0x201E => Some(0x84),
        0x2026 => Some(0x85), // ellipsis
        0x2018 => Some(0x91),
        0x2019 => Some(0x92),
        0x201C => Some(0x93),
        0x201D => Some(0x94),
        0x2022 => Some(0x95), // bullet
        0x2013 => Some(0x96),
        0x2014 => Some(0x97),
        0x2122 => Some(0x99),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_widths_line_up_with_table() {
        assert_eq!(helvetica_width(' ', false), 278);
        assert_eq!(helvetica_width('0', false), 556);
        assert_eq!(helvetica_width('A', false), 667);
        assert_eq!(helvetica_width('A', true), 722);
        assert_eq!(helvetica_width('W', false), 944);
        assert_eq!(helvetica_width('i', false), 222);
        assert_eq!(helvetica_width('m', true), 889);
        assert_eq!(helvetica_width('~', true), 584);
    }

    #[test]
    fn winansi_specials() {
        assert_eq!(unicode_to_winansi('€'), Some(0x80));
        assert_eq!(unicode_to_winansi('•'), Some(0x95));
        assert_eq!(unicode_to_winansi('°'), Some(0xB0));
        assert_eq!(unicode_to_winansi('a'), Some(b'a'));
        assert_eq!(unicode_to_winansi('漢'), None);
    }
}

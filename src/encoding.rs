use thiserror::Error;

/// Code 128 symbol widths, indexed by symbol value 0..=105.
///
/// Each symbol is six alternating bar/space widths starting with a bar,
/// eleven modules in total. Values 0..=102 are data symbols, 103..=105
/// are the start symbols for code sets A, B, and C.
///
/// Source: the published Code 128 symbology table (ISO/IEC 15417).
#[rustfmt::skip]
const SYMBOL_WIDTHS: [[u8; 6]; 106] = [
    [2,1,2,2,2,2], [2,2,2,1,2,2], [2,2,2,2,2,1], [1,2,1,2,2,3], [1,2,1,3,2,2],
    [1,3,1,2,2,2], [1,2,2,2,1,3], [1,2,2,3,1,2], [1,3,2,2,1,2], [2,2,1,2,1,3],
    [2,2,1,3,1,2], [2,3,1,2,1,2], [1,1,2,2,3,2], [1,2,2,1,3,2], [1,2,2,2,3,1],
    [1,1,3,2,2,2], [1,2,3,1,2,2], [1,2,3,2,2,1], [2,2,3,2,1,1], [2,2,1,1,3,2],
    [2,2,1,2,3,1], [2,1,3,2,1,2], [2,2,3,1,1,2], [3,1,2,1,3,1], [3,1,1,2,2,2],
    [3,2,1,1,2,2], [3,2,1,2,2,1], [3,1,2,2,1,2], [3,2,2,1,1,2], [3,2,2,2,1,1],
    [2,1,2,1,2,3], [2,1,2,3,2,1], [2,3,2,1,2,1], [1,1,1,3,2,3], [1,3,1,1,2,3],
    [1,3,1,3,2,1], [1,1,2,3,1,3], [1,3,2,1,1,3], [1,3,2,3,1,1], [2,1,1,3,1,3],
    [2,3,1,1,1,3], [2,3,1,3,1,1], [1,1,2,1,3,3], [1,1,2,3,3,1], [1,3,2,1,3,1],
    [1,1,3,1,2,3], [1,1,3,3,2,1], [1,3,3,1,2,1], [3,1,3,1,2,1], [2,1,1,3,3,1],
    [2,3,1,1,3,1], [2,1,3,1,1,3], [2,1,3,3,1,1], [2,1,3,1,3,1], [3,1,1,1,2,3],
    [3,1,1,3,2,1], [3,3,1,1,2,1], [3,1,2,1,1,3], [3,1,2,3,1,1], [3,3,2,1,1,1],
    [3,1,4,1,1,1], [2,2,1,4,1,1], [4,3,1,1,1,1], [1,1,1,2,2,4], [1,1,1,4,2,2],
    [1,2,1,1,2,4], [1,2,1,4,2,1], [1,4,1,1,2,2], [1,4,1,2,2,1], [1,1,2,2,1,4],
    [1,1,2,4,1,2], [1,2,2,1,1,4], [1,2,2,4,1,1], [1,4,2,1,1,2], [1,4,2,2,1,1],
    [2,4,1,2,1,1], [2,2,1,1,1,4], [4,1,3,1,1,1], [2,4,1,1,1,2], [1,3,4,1,1,1],
    [1,1,1,2,4,2], [1,2,1,1,4,2], [1,2,1,2,4,1], [1,1,4,2,1,2], [1,2,4,1,1,2],
    [1,2,4,2,1,1], [4,1,1,2,1,2], [4,2,1,1,1,2], [4,2,1,2,1,1], [2,1,2,1,4,1],
    [2,1,4,1,2,1], [4,1,2,1,2,1], [1,1,1,1,4,3], [1,1,1,3,4,1], [1,3,1,1,4,1],
    [1,1,4,1,1,3], [1,1,4,3,1,1], [4,1,1,1,1,3], [4,1,1,3,1,1], [1,1,3,1,4,1],
    [1,1,4,1,3,1], [3,1,1,1,4,1], [4,1,1,1,3,1], [2,1,1,4,1,2], [2,1,1,2,1,4],
    [2,1,1,2,3,2],
];

/// The stop symbol: seven widths, thirteen modules, ends on a bar.
const STOP_WIDTHS: [u8; 7] = [2, 3, 3, 1, 1, 1, 2];

const START_B: usize = 104;
const START_C: usize = 105;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("character '{0}' (U+{1:04X}) cannot be encoded as Code 128")]
    Unsupported(char, u32),
    #[error("cannot encode an empty code")]
    Empty,
}

/// The module sequence of one encoded barcode: alternating bar/space
/// widths, starting and ending on a bar. Quiet zones are not included;
/// the rasterizer adds them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePattern {
    widths: Vec<u8>,
}

impl ModulePattern {
    pub fn widths(&self) -> &[u8] {
        &self.widths
    }

    /// Total width in modules, quiet zones excluded.
    pub fn total_modules(&self) -> u32 {
        self.widths.iter().map(|w| u32::from(*w)).sum()
    }
}

/// Code 128 symbol encoder.
///
/// Code set selection is deliberately simple: a code consisting only of
/// ASCII digits with even length encodes in set C (two digits per
/// symbol); anything else encodes in set B, which covers the printable
/// ASCII range 32..=126. Characters outside that range are rejected
/// rather than silently mis-encoded.
pub struct Code128;

impl Code128 {
    pub fn encode(text: &str) -> Result<ModulePattern, EncodeError> {
        if text.is_empty() {
            return Err(EncodeError::Empty);
        }
        let values = Self::symbol_values(text)?;
        let mut checksum = values[0];
        for (weight, value) in values[1..].iter().enumerate() {
            checksum += value * (weight + 1);
        }
        let check_symbol = checksum % 103;

        let mut widths = Vec::with_capacity((values.len() + 1) * 6 + STOP_WIDTHS.len());
        for value in values.iter().chain(std::iter::once(&check_symbol)) {
            widths.extend_from_slice(&SYMBOL_WIDTHS[*value]);
        }
        widths.extend_from_slice(&STOP_WIDTHS);
        Ok(ModulePattern { widths })
    }

    fn symbol_values(text: &str) -> Result<Vec<usize>, EncodeError> {
        let bytes = text.as_bytes();
        let all_digits = bytes.iter().all(|b| b.is_ascii_digit());
        if all_digits && bytes.len() >= 2 && bytes.len() % 2 == 0 {
            let mut values = vec![START_C];
            for pair in bytes.chunks(2) {
                values.push(usize::from(pair[0] - b'0') * 10 + usize::from(pair[1] - b'0'));
            }
            return Ok(values);
        }
        let mut values = vec![START_B];
        for ch in text.chars() {
            let cp = ch as u32;
            if !(32..=126).contains(&cp) {
                return Err(EncodeError::Unsupported(ch, cp));
            }
            values.push(cp as usize - 32);
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_symbol_is_eleven_modules() {
        for (value, widths) in SYMBOL_WIDTHS.iter().enumerate() {
            let total: u32 = widths.iter().map(|w| u32::from(*w)).sum();
            assert_eq!(total, 11, "symbol {value}");
        }
        let stop: u32 = STOP_WIDTHS.iter().map(|w| u32::from(*w)).sum();
        assert_eq!(stop, 13);
    }

    #[test]
    fn single_letter_uses_set_b_with_expected_checksum() {
        // Start B (104) + 'A' (33), check = (104 + 33*1) % 103 = 34.
        let pattern = Code128::encode("A").unwrap();
        let mut expected = Vec::new();
        expected.extend_from_slice(&SYMBOL_WIDTHS[104]);
        expected.extend_from_slice(&SYMBOL_WIDTHS[33]);
        expected.extend_from_slice(&SYMBOL_WIDTHS[34]);
        expected.extend_from_slice(&STOP_WIDTHS);
        assert_eq!(pattern.widths(), expected.as_slice());
        assert_eq!(pattern.total_modules(), 11 * 3 + 13);
    }

    #[test]
    fn even_digit_string_uses_set_c() {
        // Start C (105) + 12 + 34, check = (105 + 12*1 + 34*2) % 103 = 82.
        let pattern = Code128::encode("1234").unwrap();
        let mut expected = Vec::new();
        for value in [105usize, 12, 34, 82] {
            expected.extend_from_slice(&SYMBOL_WIDTHS[value]);
        }
        expected.extend_from_slice(&STOP_WIDTHS);
        assert_eq!(pattern.widths(), expected.as_slice());
    }

    #[test]
    fn odd_digit_string_falls_back_to_set_b() {
        // Three digits cannot pair up in set C.
        let b = Code128::encode("123").unwrap();
        assert_eq!(b.total_modules(), 11 * 5 + 13);
        let c = Code128::encode("1234").unwrap();
        assert_eq!(c.total_modules(), 11 * 4 + 13);
    }

    #[test]
    fn mixed_code_total_length_is_structural() {
        // start + 8 data + check = 10 symbols.
        let pattern = Code128::encode("M4018-29").unwrap();
        assert_eq!(pattern.total_modules(), 11 * 10 + 13);
    }

    #[test]
    fn rejects_non_ascii_and_control_characters() {
        assert_eq!(
            Code128::encode("caf\u{e9}"),
            Err(EncodeError::Unsupported('\u{e9}', 0xE9))
        );
        assert!(matches!(
            Code128::encode("a\tb"),
            Err(EncodeError::Unsupported('\t', _))
        ));
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(Code128::encode(""), Err(EncodeError::Empty));
    }

    #[test]
    fn pattern_starts_and_ends_on_a_bar() {
        let pattern = Code128::encode("XYZ-0099").unwrap();
        // An odd width count means the sequence starts and ends with a bar.
        assert_eq!(pattern.widths().len() % 2, 1);
    }
}

//! Linguistic word counting for mixed CJK, Latin and numeric text.
//!
//! Each character is classified into a [`CharClass`], then one left-to-right
//! pass merges runs into countable units:
//!
//! | Text            | Units | Why                                     |
//! |-----------------|-------|-----------------------------------------|
//! | `hello world`   | 2     | Latin letter runs                       |
//! | `well-known`    | 1     | inner hyphen continues a word           |
//! | `你好`          | 2     | case-less letters count one each        |
//! | `0x1F + 007`    | 2     | numeric literals with prefixes          |
//! | `3.14`          | 1     | decimal point continues a number        |
//! | `, . !`         | 0     | separators never count                  |

use super::WordCounter;

/// Per-character class used by [`StrictWordCounter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// Not a letter, digit, space or punctuation (symbols, controls).
    Unknown,
    /// Whitespace.
    Blank,
    /// Punctuation.
    Punctuation,
    /// The digit `0`, which may open a prefixed literal.
    Zero,
    /// Inside a literal prefix such as `0x`, `0b`, `0o` or `00`.
    NumberPrefix,
    /// Digits other than `0`, and the run state of a number.
    Number,
    /// A letter without case, e.g. a CJK ideograph or kana.
    Character,
    /// A letter with case, e.g. Latin, Greek, Cyrillic.
    Word,
}

impl CharClass {
    /// Classify one character.
    ///
    /// Digits are decimal digits only. Letter-like numerals such as `Ⅻ`,
    /// `〇` or `½` are neither words nor numbers and classify as
    /// [`CharClass::Unknown`].
    #[must_use]
    pub fn of(ch: char) -> Self {
        if ch.is_whitespace() {
            Self::Blank
        } else if ch == '0' {
            Self::Zero
        } else if is_decimal_digit(ch) {
            Self::Number
        } else if ch.is_numeric() {
            Self::Unknown
        } else if has_case(ch) {
            Self::Word
        } else if is_punctuation(ch) {
            Self::Punctuation
        } else if ch.is_alphabetic() {
            Self::Character
        } else {
            Self::Unknown
        }
    }

    /// Separators close a run without counting anything themselves.
    #[must_use]
    pub fn is_separator(self) -> bool {
        matches!(self, Self::Unknown | Self::Blank | Self::Punctuation)
    }
}

/// Upper, lower or title case letters.
///
/// Uses the derived case properties, so a few cased symbols such as circled
/// letters (`Ⓐ`) also count as word characters.
fn has_case(ch: char) -> bool {
    ch.is_lowercase() || ch.is_uppercase() || !ch.to_lowercase().eq(ch.to_uppercase())
}

/// First code point of each run of ten decimal digits.
const DIGIT_ZEROS: &[u32] = &[
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66,
    0x0CE6, 0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946,
    0x19D0, 0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0,
    0xA9F0, 0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x10D30, 0x11066, 0x110F0, 0x11136, 0x111D0,
    0x112F0, 0x11450, 0x114D0, 0x11650, 0x116C0, 0x11730, 0x118E0, 0x11950, 0x11C50, 0x11D50,
    0x11DA0, 0x16A60, 0x16AC0, 0x16B50, 0x1E140, 0x1E2F0, 0x1E950, 0x1FBF0,
];

/// Decimal digits (general category Nd).
///
/// Covers the digit runs listed in [`DIGIT_ZEROS`] plus the mathematical
/// alphanumeric digits; digit sets added to Unicode later fall through to
/// [`CharClass::Unknown`].
fn is_decimal_digit(ch: char) -> bool {
    if ch.is_ascii_digit() {
        return true;
    }
    let cp = u32::from(ch);
    if (0x1D7CE..=0x1D7FF).contains(&cp) {
        return true;
    }
    DIGIT_ZEROS
        .iter()
        .any(|&zero| (zero..zero + 10).contains(&cp))
}

/// Punctuation in the ASCII range and the common Unicode punctuation blocks.
///
/// The table is approximate: it covers general, supplemental, CJK, small
/// form and fullwidth punctuation plus the common marks of a few other
/// scripts. Anything it misses falls through to [`CharClass::Unknown`].
/// Symbols such as `+` or `$` are Unknown by design. Both classes are
/// separators, so the split never changes a count.
fn is_punctuation(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_punctuation() && !matches!(ch, '$' | '+' | '<' | '=' | '>' | '^' | '`' | '|' | '~');
    }
    matches!(ch,
        '\u{00A1}' | '\u{00A7}' | '\u{00AB}' | '\u{00B6}' | '\u{00B7}' | '\u{00BB}' | '\u{00BF}'
        | '\u{055A}'..='\u{055F}' | '\u{0589}' | '\u{058A}'
        | '\u{05BE}' | '\u{05C0}' | '\u{05C3}' | '\u{05C6}' | '\u{05F3}' | '\u{05F4}'
        | '\u{060C}' | '\u{060D}' | '\u{061B}' | '\u{061F}' | '\u{066A}'..='\u{066D}' | '\u{06D4}'
        | '\u{0964}' | '\u{0965}' | '\u{0E4F}' | '\u{0E5A}' | '\u{0E5B}'
        | '\u{2010}'..='\u{2027}'
        | '\u{2030}'..='\u{205E}'
        | '\u{2E00}'..='\u{2E4F}'
        | '\u{3001}'..='\u{3003}'
        | '\u{3008}'..='\u{3011}'
        | '\u{3014}'..='\u{301F}'
        | '\u{3030}' | '\u{303D}' | '\u{30A0}' | '\u{30FB}'
        | '\u{FE10}'..='\u{FE19}'
        | '\u{FE30}'..='\u{FE4F}'
        | '\u{FE50}'..='\u{FE61}' | '\u{FE63}' | '\u{FE68}' | '\u{FE6A}' | '\u{FE6B}'
        | '\u{FF01}'..='\u{FF03}'
        | '\u{FF05}'..='\u{FF0A}'
        | '\u{FF0C}'..='\u{FF0F}'
        | '\u{FF1A}' | '\u{FF1B}' | '\u{FF1F}' | '\u{FF20}'
        | '\u{FF3B}'..='\u{FF3D}'
        | '\u{FF3F}' | '\u{FF5B}' | '\u{FF5D}'
        | '\u{FF5F}'..='\u{FF65}'
    )
}

/// Counts words, CJK characters and numeric literals as units.
#[derive(Clone, Copy, Debug, Default)]
pub struct StrictWordCounter;

impl StrictWordCounter {
    /// Create a counter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Shorthand for [`CharClass::of`].
    #[must_use]
    pub fn classify(ch: char) -> CharClass {
        CharClass::of(ch)
    }
}

impl WordCounter for StrictWordCounter {
    fn count_all(&self, text: &str) -> usize {
        let mut count = 0;
        let mut state = CharClass::Unknown;
        // Set while inside a 0x literal, where a-f also continue the number.
        let mut hex = false;

        for ch in text.chars() {
            let class = CharClass::of(ch);
            let hex_digit = hex && ch.is_ascii_hexdigit();

            let next = match state {
                CharClass::Unknown | CharClass::Blank | CharClass::Punctuation => class,
                CharClass::Zero => {
                    if matches!(ch, 'b' | 'B' | 'o' | 'x' | 'X') || class == CharClass::Zero {
                        hex = matches!(ch, 'x' | 'X');
                        CharClass::NumberPrefix
                    } else if ch == '.' || class == CharClass::Number {
                        CharClass::Number
                    } else {
                        count += 1;
                        class
                    }
                }
                CharClass::NumberPrefix => {
                    if matches!(class, CharClass::Zero | CharClass::Number)
                        || ch == '.'
                        || hex_digit
                    {
                        CharClass::Number
                    } else if class.is_separator() {
                        count += 1;
                        class
                    } else {
                        // The prefix and what follows are one malformed literal.
                        class
                    }
                }
                CharClass::Number => {
                    if matches!(class, CharClass::Zero | CharClass::Number)
                        || ch == '.'
                        || hex_digit
                    {
                        CharClass::Number
                    } else {
                        count += 1;
                        class
                    }
                }
                CharClass::Character => {
                    count += 1;
                    class
                }
                CharClass::Word => {
                    if class == CharClass::Word || ch == '-' {
                        CharClass::Word
                    } else {
                        count += 1;
                        class
                    }
                }
            };

            if !matches!(next, CharClass::NumberPrefix | CharClass::Number) {
                hex = false;
            }
            state = next;
        }

        if !state.is_separator() {
            count += 1;
        }
        count
    }
}

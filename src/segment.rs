use unicode_segmentation::UnicodeSegmentation;

/// How a string is split into comparable units.
///
/// `Grapheme` is the default and matches what the user perceives as one
/// character (a composed Korean syllable, an emoji with ZWJ joins, a base
/// letter plus combining marks). `CodePoint` is a documented degraded mode
/// that splits on scalar values; it exists as an explicit fallback policy,
/// not as an error path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Granularity {
    #[default]
    Grapheme,
    CodePoint,
}

impl Granularity {
    /// Split `text` into an ordered sequence of units. Deterministic and
    /// side-effect-free; the same input always yields the same sequence.
    pub fn segment(&self, text: &str) -> Vec<String> {
        match self {
            Granularity::Grapheme => graphemes_of(text),
            Granularity::CodePoint => code_points_of(text),
        }
    }
}

/// Extended grapheme clusters, in order.
pub fn graphemes_of(text: &str) -> Vec<String> {
    text.graphemes(true).map(str::to_owned).collect()
}

/// Code-point split, the degraded fallback.
pub fn code_points_of(text: &str) -> Vec<String> {
    text.chars().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_splits_per_character() {
        assert_eq!(graphemes_of("hello"), vec!["h", "e", "l", "l", "o"]);
    }

    #[test]
    fn empty_string_yields_no_units() {
        assert!(graphemes_of("").is_empty());
        assert!(code_points_of("").is_empty());
    }

    #[test]
    fn precomposed_korean_syllables_are_single_units() {
        let units = graphemes_of("수고했어요");
        assert_eq!(units.len(), 5);
        assert_eq!(units[0], "수");
        assert_eq!(units[2], "했");
    }

    #[test]
    fn decomposed_jamo_forms_one_cluster() {
        // U+1112 U+1161 U+11AB is "한" spelled with conjoining jamo
        let decomposed = "\u{1112}\u{1161}\u{11AB}";
        assert_eq!(graphemes_of(decomposed).len(), 1);
        // the degraded mode sees three scalars, which is the documented
        // misalignment it trades away
        assert_eq!(code_points_of(decomposed).len(), 3);
    }

    #[test]
    fn combining_mark_stays_with_its_base() {
        let cafe = "cafe\u{0301}"; // e + combining acute
        assert_eq!(graphemes_of(cafe).len(), 4);
        assert_eq!(code_points_of(cafe).len(), 5);
    }

    #[test]
    fn zwj_emoji_is_one_grapheme() {
        let family = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F466}";
        assert_eq!(graphemes_of(family).len(), 1);
    }

    #[test]
    fn segmentation_is_deterministic() {
        let text = "오늘도 참 잘했어요 🌟";
        assert_eq!(graphemes_of(text), graphemes_of(text));
        assert_eq!(
            Granularity::Grapheme.segment(text),
            Granularity::Grapheme.segment(text)
        );
    }

    #[test]
    fn granularity_default_is_grapheme() {
        assert_eq!(Granularity::default(), Granularity::Grapheme);
    }
}

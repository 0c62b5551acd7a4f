//! Text directionality.

use std::fmt;

/// Language subtags written right to left.
pub const RTL_LANGUAGES: &[&str] = &[
    "ar", "arc", "ckb", "dv", "fa", "he", "khw", "ks", "ku", "prs", "ps", "sd", "syr", "ug", "ur",
    "yi",
];

/// Writing direction of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }

    /// Direction for a language tag and a sample of text written in it.
    ///
    /// Known right-to-left subtags decide on their own. Anything else is
    /// right-to-left only when the sample has more strong right-to-left
    /// characters than strong left-to-right ones.
    pub fn detect(tag: &str, sample: &str) -> Self {
        let subtag = tag.split('-').next().unwrap_or(tag);
        if RTL_LANGUAGES
            .iter()
            .any(|rtl| rtl.eq_ignore_ascii_case(subtag))
        {
            return Self::Rtl;
        }
        Self::of_text(sample)
    }

    /// Dominant direction of a piece of text. Neutral text is left to right.
    pub fn of_text(text: &str) -> Self {
        let (rtl, ltr) = text
            .chars()
            .filter(|c| c.is_alphabetic())
            .fold((0usize, 0usize), |(rtl, ltr), c| {
                if is_strong_rtl(c) {
                    (rtl + 1, ltr)
                } else {
                    (rtl, ltr + 1)
                }
            });
        if rtl > ltr { Self::Rtl } else { Self::Ltr }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hebrew, Arabic, Syriac, Thaana, N'Ko, Samaritan, Mandaic and the
/// Hebrew/Arabic presentation forms.
fn is_strong_rtl(c: char) -> bool {
    matches!(
        c as u32,
        0x0590..=0x08FF | 0xFB1D..=0xFDFF | 0xFE70..=0xFEFF | 0x10800..=0x10FFF | 0x1E800..=0x1EFFF
    )
}

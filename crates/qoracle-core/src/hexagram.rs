//! Hexagram and trigram identities.
//!
//! A [`Hexagram`] is six lines, index 0 at the bottom. The lower trigram is
//! lines `[0, 3)`, the upper trigram lines `[3, 6)`. Names come from two
//! static tables: eight trigrams keyed by their three lines, and the 64
//! hexagrams of the King Wen sequence keyed by (upper, lower) trigram.
//!
//! ```
//! use qoracle_core::{Hexagram, Trigram};
//!
//! let h = Hexagram::new([1, 0, 1, 1, 0, 1]).unwrap();
//! assert_eq!(h.lower_trigram(), Trigram::Li);
//! assert_eq!(h.upper_trigram(), Trigram::Li);
//! assert_eq!(h.name(), "离");
//! assert_eq!(h.display_name(), "离（上离下离）");
//! assert_eq!(Hexagram::from_int(h.to_int()).unwrap(), h);
//! ```

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HexagramError {
    #[error("a hexagram has 6 lines, got {0}")]
    LineCount(usize),

    #[error("line {index} must be 0 or 1, got {value}")]
    NonBinaryLine { index: usize, value: u8 },

    #[error("hexagram value must be below 64, got {0}")]
    ValueOutOfRange(u8),

    #[error("line index must be below 6, got {0}")]
    LineIndex(usize),
}

// ---------------------------------------------------------------------------
// Trigrams
// ---------------------------------------------------------------------------

/// The eight trigrams (八卦).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigram {
    Qian,
    Dui,
    Li,
    Zhen,
    Xun,
    Kan,
    Gen,
    Kun,
}

/// Trigram by its lines packed as `bottom | middle << 1 | top << 2`.
/// Every 3-bit pattern is present, so lookup cannot fail.
const TRIGRAM_BY_LINES: [Trigram; 8] = [
    Trigram::Kun,  // 0 0 0
    Trigram::Zhen, // 1 0 0
    Trigram::Kan,  // 0 1 0
    Trigram::Dui,  // 1 1 0
    Trigram::Gen,  // 0 0 1
    Trigram::Li,   // 1 0 1
    Trigram::Xun,  // 0 1 1
    Trigram::Qian, // 1 1 1
];

impl Trigram {
    /// Fu Xi order.
    pub const ALL: [Trigram; 8] = [
        Self::Qian,
        Self::Dui,
        Self::Li,
        Self::Zhen,
        Self::Xun,
        Self::Kan,
        Self::Gen,
        Self::Kun,
    ];

    /// Trigram for `[bottom, middle, top]`. Only the lowest bit of each
    /// line is looked at.
    pub fn from_lines(lines: [u8; 3]) -> Self {
        let packed = (lines[0] & 1) | (lines[1] & 1) << 1 | (lines[2] & 1) << 2;
        TRIGRAM_BY_LINES[packed as usize]
    }

    /// `[bottom, middle, top]`, 1 for a solid line.
    pub fn lines(self) -> [u8; 3] {
        let packed = TRIGRAM_BY_LINES
            .iter()
            .position(|t| *t == self)
            .unwrap_or_default() as u8;
        [packed & 1, (packed >> 1) & 1, (packed >> 2) & 1]
    }

    /// Chinese name, as used in hexagram titles.
    pub fn name(self) -> &'static str {
        match self {
            Self::Qian => "乾",
            Self::Dui => "兑",
            Self::Li => "离",
            Self::Zhen => "震",
            Self::Xun => "巽",
            Self::Kan => "坎",
            Self::Gen => "艮",
            Self::Kun => "坤",
        }
    }

    pub fn pinyin(self) -> &'static str {
        match self {
            Self::Qian => "qián",
            Self::Dui => "duì",
            Self::Li => "lí",
            Self::Zhen => "zhèn",
            Self::Xun => "xùn",
            Self::Kan => "kǎn",
            Self::Gen => "gèn",
            Self::Kun => "kūn",
        }
    }

    /// Natural image: heaven, lake, fire, thunder, wind, water, mountain, earth.
    pub fn image(self) -> &'static str {
        match self {
            Self::Qian => "天",
            Self::Dui => "泽",
            Self::Li => "火",
            Self::Zhen => "雷",
            Self::Xun => "风",
            Self::Kan => "水",
            Self::Gen => "山",
            Self::Kun => "地",
        }
    }

    /// Unicode trigram symbol, ☰ (Qian) through ☷ (Kun).
    pub fn symbol(self) -> char {
        match self {
            Self::Qian => '☰',
            Self::Dui => '☱',
            Self::Li => '☲',
            Self::Zhen => '☳',
            Self::Xun => '☴',
            Self::Kan => '☵',
            Self::Gen => '☶',
            Self::Kun => '☷',
        }
    }
}

impl fmt::Display for Trigram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// King Wen table
// ---------------------------------------------------------------------------

/// One row of the King Wen sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexagramEntry {
    /// Position in the King Wen sequence, 1-64.
    pub number: u8,
    pub name: &'static str,
    pub upper: Trigram,
    pub lower: Trigram,
}

const fn entry(number: u8, name: &'static str, upper: Trigram, lower: Trigram) -> HexagramEntry {
    HexagramEntry {
        number,
        name,
        upper,
        lower,
    }
}

/// All 64 hexagrams in King Wen order.
pub static KING_WEN: [HexagramEntry; 64] = {
    use Trigram::*;
    [
        entry(1, "乾", Qian, Qian),
        entry(2, "坤", Kun, Kun),
        entry(3, "屯", Kan, Zhen),
        entry(4, "蒙", Gen, Kan),
        entry(5, "需", Kan, Qian),
        entry(6, "讼", Qian, Kan),
        entry(7, "师", Kun, Kan),
        entry(8, "比", Kan, Kun),
        entry(9, "小畜", Xun, Qian),
        entry(10, "履", Qian, Dui),
        entry(11, "泰", Kun, Qian),
        entry(12, "否", Qian, Kun),
        entry(13, "同人", Qian, Li),
        entry(14, "大有", Li, Qian),
        entry(15, "谦", Kun, Gen),
        entry(16, "豫", Zhen, Kun),
        entry(17, "随", Dui, Zhen),
        entry(18, "蛊", Gen, Xun),
        entry(19, "临", Kun, Dui),
        entry(20, "观", Xun, Kun),
        entry(21, "噬嗑", Li, Zhen),
        entry(22, "贲", Gen, Li),
        entry(23, "剥", Gen, Kun),
        entry(24, "复", Kun, Zhen),
        entry(25, "无妄", Qian, Zhen),
        entry(26, "大畜", Gen, Qian),
        entry(27, "颐", Gen, Zhen),
        entry(28, "大过", Dui, Xun),
        entry(29, "坎", Kan, Kan),
        entry(30, "离", Li, Li),
        entry(31, "咸", Dui, Gen),
        entry(32, "恒", Zhen, Xun),
        entry(33, "遁", Qian, Gen),
        entry(34, "大壮", Zhen, Qian),
        entry(35, "晋", Li, Kun),
        entry(36, "明夷", Kun, Li),
        entry(37, "家人", Xun, Li),
        entry(38, "睽", Li, Dui),
        entry(39, "蹇", Kan, Gen),
        entry(40, "解", Zhen, Kan),
        entry(41, "损", Gen, Dui),
        entry(42, "益", Xun, Zhen),
        entry(43, "夬", Dui, Qian),
        entry(44, "姤", Qian, Xun),
        entry(45, "萃", Dui, Kun),
        entry(46, "升", Kun, Xun),
        entry(47, "困", Dui, Kan),
        entry(48, "井", Kan, Xun),
        entry(49, "革", Dui, Li),
        entry(50, "鼎", Li, Xun),
        entry(51, "震", Zhen, Zhen),
        entry(52, "艮", Gen, Gen),
        entry(53, "渐", Xun, Gen),
        entry(54, "归妹", Zhen, Dui),
        entry(55, "丰", Zhen, Li),
        entry(56, "旅", Li, Gen),
        entry(57, "巽", Xun, Xun),
        entry(58, "兑", Dui, Dui),
        entry(59, "涣", Xun, Kan),
        entry(60, "节", Kan, Dui),
        entry(61, "中孚", Xun, Dui),
        entry(62, "小过", Zhen, Gen),
        entry(63, "既济", Kan, Li),
        entry(64, "未济", Li, Kan),
    ]
};

/// Canonical hexagram for an (upper, lower) trigram pair.
pub fn lookup(upper: Trigram, lower: Trigram) -> Option<&'static HexagramEntry> {
    KING_WEN
        .iter()
        .find(|e| e.upper == upper && e.lower == lower)
}

// ---------------------------------------------------------------------------
// Hexagram
// ---------------------------------------------------------------------------

/// Six lines, bottom to top. Each line is 0 (broken) or 1 (solid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hexagram {
    bits: [u8; 6],
}

impl Hexagram {
    pub const LINES: usize = 6;

    pub fn new(bits: [u8; 6]) -> Result<Self, HexagramError> {
        if let Some((index, &value)) = bits.iter().enumerate().find(|(_, b)| **b > 1) {
            return Err(HexagramError::NonBinaryLine { index, value });
        }
        Ok(Self { bits })
    }

    /// From a slice that must hold exactly six 0/1 values.
    pub fn from_bits(bits: &[u8]) -> Result<Self, HexagramError> {
        let bits: [u8; 6] = bits
            .try_into()
            .map_err(|_| HexagramError::LineCount(bits.len()))?;
        Self::new(bits)
    }

    /// Bit `i` of `value` is line `i`.
    pub fn from_int(value: u8) -> Result<Self, HexagramError> {
        if value >= 64 {
            return Err(HexagramError::ValueOutOfRange(value));
        }
        let mut bits = [0u8; 6];
        for (i, bit) in bits.iter_mut().enumerate() {
            *bit = (value >> i) & 1;
        }
        Ok(Self { bits })
    }

    pub fn from_trigrams(upper: Trigram, lower: Trigram) -> Self {
        let [l0, l1, l2] = lower.lines();
        let [u0, u1, u2] = upper.lines();
        Self {
            bits: [l0, l1, l2, u0, u1, u2],
        }
    }

    /// Lines bottom to top.
    pub fn bits(&self) -> [u8; 6] {
        self.bits
    }

    /// Inverse of [`from_int`](Self::from_int), in `[0, 64)`.
    pub fn to_int(&self) -> u8 {
        self.bits
            .iter()
            .enumerate()
            .fold(0, |acc, (i, bit)| acc | (bit & 1) << i)
    }

    pub fn lower_trigram(&self) -> Trigram {
        Trigram::from_lines([self.bits[0], self.bits[1], self.bits[2]])
    }

    pub fn upper_trigram(&self) -> Trigram {
        Trigram::from_lines([self.bits[3], self.bits[4], self.bits[5]])
    }

    pub fn entry(&self) -> Option<&'static HexagramEntry> {
        lookup(self.upper_trigram(), self.lower_trigram())
    }

    pub fn king_wen_number(&self) -> Option<u8> {
        self.entry().map(|e| e.number)
    }

    /// `上{upper}下{lower}`, e.g. `上坤下乾`.
    pub fn composite_name(&self) -> String {
        format!("上{}下{}", self.upper_trigram(), self.lower_trigram())
    }

    /// Canonical King Wen name, or the composite name if the pair were
    /// ever missing from the table.
    pub fn name(&self) -> Cow<'static, str> {
        match self.entry() {
            Some(e) => Cow::Borrowed(e.name),
            None => Cow::Owned(self.composite_name()),
        }
    }

    /// Canonical name decorated with both trigrams, e.g. `泰（上坤下乾）`.
    pub fn display_name(&self) -> String {
        match self.entry() {
            Some(e) => format!("{}（{}）", e.name, self.composite_name()),
            None => self.composite_name(),
        }
    }

    /// Unicode hexagram symbol (U+4DC0 block, King Wen order).
    pub fn symbol(&self) -> Option<char> {
        self.king_wen_number()
            .and_then(|n| char::from_u32(0x4DC0 + u32::from(n) - 1))
    }

    /// Copy with the line at `index` (0 = bottom) inverted.
    pub fn flip(&self, index: usize) -> Result<Self, HexagramError> {
        if index >= Self::LINES {
            return Err(HexagramError::LineIndex(index));
        }
        let mut bits = self.bits;
        bits[index] ^= 1;
        Ok(Self { bits })
    }
}

impl TryFrom<&[u8]> for Hexagram {
    type Error = HexagramError;

    fn try_from(bits: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bits(bits)
    }
}

/// Lines as a bottom-to-top digit string, e.g. `101101`.
impl fmt::Display for Hexagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits {
            write!(f, "{bit}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn trigram_table_is_a_bijection() {
        let mut seen = HashSet::new();
        for packed in 0u8..8 {
            let lines = [packed & 1, (packed >> 1) & 1, (packed >> 2) & 1];
            let t = Trigram::from_lines(lines);
            assert_eq!(t.lines(), lines, "{t:?}");
            seen.insert(t);
        }
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn trigram_lines_follow_tradition() {
        assert_eq!(Trigram::Qian.lines(), [1, 1, 1]);
        assert_eq!(Trigram::Kun.lines(), [0, 0, 0]);
        // Zhen: one solid line at the bottom.
        assert_eq!(Trigram::Zhen.lines(), [1, 0, 0]);
        // Gen: one solid line on top.
        assert_eq!(Trigram::Gen.lines(), [0, 0, 1]);
        // Dui: broken line on top.
        assert_eq!(Trigram::Dui.lines(), [1, 1, 0]);
        // Xun: broken line at the bottom.
        assert_eq!(Trigram::Xun.lines(), [0, 1, 1]);
        assert_eq!(Trigram::Kan.lines(), [0, 1, 0]);
        assert_eq!(Trigram::Li.lines(), [1, 0, 1]);
    }

    #[test]
    fn trigram_metadata() {
        let described: Vec<_> = Trigram::ALL
            .iter()
            .map(|t| (t.name(), t.pinyin(), t.image()))
            .collect();
        assert_eq!(described[0], ("乾", "qián", "天"));
        assert_eq!(described[5], ("坎", "kǎn", "水"));
        assert_eq!(Trigram::Zhen.pinyin(), "zhèn");
        assert_eq!(Trigram::Gen.image(), "山");

        let images: HashSet<_> = Trigram::ALL.iter().map(|t| t.image()).collect();
        assert_eq!(images.len(), 8);
    }

    #[test]
    fn king_wen_table_covers_every_pair_once() {
        let mut pairs = HashSet::new();
        for (i, e) in KING_WEN.iter().enumerate() {
            assert_eq!(usize::from(e.number), i + 1);
            pairs.insert((e.upper, e.lower));
        }
        assert_eq!(pairs.len(), 64);
        for upper in Trigram::ALL {
            for lower in Trigram::ALL {
                assert!(lookup(upper, lower).is_some(), "{upper:?}/{lower:?}");
            }
        }
    }

    #[test]
    fn well_known_hexagrams() {
        let cases = [
            (Trigram::Qian, Trigram::Qian, 1, "乾"),
            (Trigram::Kun, Trigram::Kun, 2, "坤"),
            (Trigram::Kun, Trigram::Qian, 11, "泰"),
            (Trigram::Qian, Trigram::Kun, 12, "否"),
            (Trigram::Li, Trigram::Li, 30, "离"),
            (Trigram::Zhen, Trigram::Li, 55, "丰"),
            (Trigram::Kan, Trigram::Li, 63, "既济"),
            (Trigram::Li, Trigram::Kan, 64, "未济"),
        ];
        for (upper, lower, number, name) in cases {
            let h = Hexagram::from_trigrams(upper, lower);
            assert_eq!(h.upper_trigram(), upper);
            assert_eq!(h.lower_trigram(), lower);
            assert_eq!(h.king_wen_number(), Some(number));
            assert_eq!(h.name(), name);
        }
    }

    #[test]
    fn int_round_trip_is_a_bijection() {
        let mut names = HashSet::new();
        for v in 0u8..64 {
            let h = Hexagram::from_int(v).unwrap();
            assert_eq!(h.to_int(), v);
            names.insert(h.name().into_owned());
        }
        assert_eq!(names.len(), 64);
        assert_eq!(Hexagram::from_int(64), Err(HexagramError::ValueOutOfRange(64)));
    }

    #[test]
    fn bit_i_of_int_is_line_i() {
        let h = Hexagram::from_int(0b10_0001).unwrap();
        assert_eq!(h.bits(), [1, 0, 0, 0, 0, 1]);
        assert_eq!(Hexagram::new([1, 0, 1, 1, 0, 1]).unwrap().to_int(), 0x2D);
    }

    #[test]
    fn constructors_validate_lines() {
        assert_eq!(
            Hexagram::from_bits(&[1, 0, 1]),
            Err(HexagramError::LineCount(3))
        );
        assert_eq!(
            Hexagram::from_bits(&[0, 0, 0, 0, 2, 0]),
            Err(HexagramError::NonBinaryLine { index: 4, value: 2 })
        );
        let h = Hexagram::try_from(&[0u8, 1, 0, 1, 0, 1][..]).unwrap();
        assert_eq!(h.to_string(), "010101");
    }

    #[test]
    fn names_and_symbols() {
        let tai = Hexagram::from_trigrams(Trigram::Kun, Trigram::Qian);
        assert_eq!(tai.composite_name(), "上坤下乾");
        assert_eq!(tai.display_name(), "泰（上坤下乾）");
        assert_eq!(tai.symbol(), Some('䷊'));
        assert_eq!(Hexagram::from_int(63).unwrap().symbol(), Some('䷀'));
        assert_eq!(Hexagram::from_int(0).unwrap().symbol(), Some('䷁'));
    }

    #[test]
    fn flip_changes_exactly_one_line() {
        let h = Hexagram::new([1, 0, 1, 1, 0, 1]).unwrap();
        for i in 0..6 {
            let f = h.flip(i).unwrap();
            let diff: Vec<_> = (0..6).filter(|&j| f.bits()[j] != h.bits()[j]).collect();
            assert_eq!(diff, vec![i]);
            assert_eq!(f.flip(i).unwrap(), h);
        }
        assert_eq!(h.flip(6), Err(HexagramError::LineIndex(6)));
    }
}

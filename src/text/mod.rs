//! Character normalization utilities
//!
//! Catalog pages mix full-width and half-width forms freely; everything is
//! normalized before validation and persistence so the natural-key dedup
//! compares like with like. All functions here are pure.

/// Half-width katakana digraphs (base + voicing mark) that must be replaced
/// before single-character mapping.
const HANKAKU_DIGRAPHS: &[(&str, &str)] = &[
    ("ｳﾞ", "ヴ"),
    ("ｶﾞ", "ガ"),
    ("ｷﾞ", "ギ"),
    ("ｸﾞ", "グ"),
    ("ｹﾞ", "ゲ"),
    ("ｺﾞ", "ゴ"),
    ("ｻﾞ", "ザ"),
    ("ｼﾞ", "ジ"),
    ("ｽﾞ", "ズ"),
    ("ｾﾞ", "ゼ"),
    ("ｿﾞ", "ゾ"),
    ("ﾀﾞ", "ダ"),
    ("ﾁﾞ", "ヂ"),
    ("ﾂﾞ", "ヅ"),
    ("ﾃﾞ", "デ"),
    ("ﾄﾞ", "ド"),
    ("ﾊﾞ", "バ"),
    ("ﾋﾞ", "ビ"),
    ("ﾌﾞ", "ブ"),
    ("ﾍﾞ", "ベ"),
    ("ﾎﾞ", "ボ"),
    ("ﾊﾟ", "パ"),
    ("ﾋﾟ", "ピ"),
    ("ﾌﾟ", "プ"),
    ("ﾍﾟ", "ペ"),
    ("ﾎﾟ", "ポ"),
];

/// Normalizes a string to the canonical form used for persistence
///
/// - full-width ASCII variants (digits, letters, symbols) become ASCII
/// - full-width space becomes a plain space
/// - half-width katakana (including voiced digraphs) becomes full-width
pub fn normalize(input: &str) -> String {
    let mut s = input.to_string();
    for (from, to) in HANKAKU_DIGRAPHS {
        if s.contains(from) {
            s = s.replace(from, to);
        }
    }

    s.chars().map(normalize_char).collect()
}

/// Removes embedded newlines, trims outer whitespace, and normalizes
pub fn clean(input: &str) -> String {
    let stripped: String = input.chars().filter(|c| *c != '\n' && *c != '\r').collect();
    normalize(stripped.trim())
}

/// Converts katakana characters to their hiragana counterparts
///
/// Non-katakana characters pass through unchanged.
pub fn katakana_to_hiragana(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if ('ァ'..='ヶ').contains(&c) {
                // Katakana and hiragana blocks are parallel, 0x60 apart
                char::from_u32(c as u32 - 0x60).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

fn normalize_char(c: char) -> char {
    match c {
        // Full-width ASCII block (！..～) sits a fixed offset above ASCII
        '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
        '　' => ' ',
        '｡' => '。',
        '｢' => '「',
        '｣' => '」',
        '､' => '、',
        '･' => '・',
        'ｰ' => 'ー',
        _ => hankaku_kana(c).unwrap_or(c),
    }
}

/// Maps a single half-width katakana character to its full-width form
fn hankaku_kana(c: char) -> Option<char> {
    let mapped = match c {
        'ｱ' => 'ア', 'ｲ' => 'イ', 'ｳ' => 'ウ', 'ｴ' => 'エ', 'ｵ' => 'オ',
        'ｶ' => 'カ', 'ｷ' => 'キ', 'ｸ' => 'ク', 'ｹ' => 'ケ', 'ｺ' => 'コ',
        'ｻ' => 'サ', 'ｼ' => 'シ', 'ｽ' => 'ス', 'ｾ' => 'セ', 'ｿ' => 'ソ',
        'ﾀ' => 'タ', 'ﾁ' => 'チ', 'ﾂ' => 'ツ', 'ﾃ' => 'テ', 'ﾄ' => 'ト',
        'ﾅ' => 'ナ', 'ﾆ' => 'ニ', 'ﾇ' => 'ヌ', 'ﾈ' => 'ネ', 'ﾉ' => 'ノ',
        'ﾊ' => 'ハ', 'ﾋ' => 'ヒ', 'ﾌ' => 'フ', 'ﾍ' => 'ヘ', 'ﾎ' => 'ホ',
        'ﾏ' => 'マ', 'ﾐ' => 'ミ', 'ﾑ' => 'ム', 'ﾒ' => 'メ', 'ﾓ' => 'モ',
        'ﾔ' => 'ヤ', 'ﾕ' => 'ユ', 'ﾖ' => 'ヨ',
        'ﾗ' => 'ラ', 'ﾘ' => 'リ', 'ﾙ' => 'ル', 'ﾚ' => 'レ', 'ﾛ' => 'ロ',
        'ﾜ' => 'ワ', 'ｦ' => 'ヲ', 'ﾝ' => 'ン',
        'ｧ' => 'ァ', 'ｨ' => 'ィ', 'ｩ' => 'ゥ', 'ｪ' => 'ェ', 'ｫ' => 'ォ',
        'ｬ' => 'ャ', 'ｭ' => 'ュ', 'ｮ' => 'ョ',
        'ｯ' => 'ッ',
        _ => return None,
    };
    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fullwidth_digits() {
        assert_eq!(normalize("０１２３４５６７８９"), "0123456789");
    }

    #[test]
    fn test_fullwidth_alphabet() {
        assert_eq!(normalize("ａｂｃＸＹＺ"), "abcXYZ");
    }

    #[test]
    fn test_fullwidth_symbols() {
        assert_eq!(normalize("（！？＆）"), "(!?&)");
    }

    #[test]
    fn test_fullwidth_space() {
        assert_eq!(normalize("あ　い"), "あ い");
    }

    #[test]
    fn test_hankaku_katakana_singles() {
        assert_eq!(normalize("ｶﾗｵｹ"), "カラオケ");
    }

    #[test]
    fn test_hankaku_katakana_digraphs() {
        assert_eq!(normalize("ﾊﾞﾗｰﾄﾞ"), "バラード");
        assert_eq!(normalize("ﾎﾟｯﾌﾟｽ"), "ポップス");
    }

    #[test]
    fn test_hankaku_punctuation() {
        assert_eq!(normalize("｢うた｣､ｰ"), "「うた」、ー");
    }

    #[test]
    fn test_normalize_passthrough() {
        assert_eq!(normalize("ひらがな漢字ABC"), "ひらがな漢字ABC");
    }

    #[test]
    fn test_clean_strips_newlines_and_trims() {
        assert_eq!(clean("  曲名\nその2  "), "曲名その2");
        assert_eq!(clean("\n\n  Title  \n"), "Title");
    }

    #[test]
    fn test_katakana_to_hiragana() {
        assert_eq!(katakana_to_hiragana("カラオケ"), "からおけ");
        assert_eq!(katakana_to_hiragana("テスト test"), "てすと test");
    }

    #[test]
    fn test_katakana_to_hiragana_leaves_prolonged_mark() {
        // The prolonged sound mark has no hiragana counterpart
        assert_eq!(katakana_to_hiragana("バラード"), "ばらーど");
    }
}

//! Normalized ligand-identifier keys.
//!
//! Docking artifacts and the auxiliary descriptor table spell ligand names
//! independently (case, accents, separators, stray punctuation), so the join
//! between them runs over a normalized key instead of the raw strings. The
//! normalization is deliberately lossy: two names that differ only in
//! decoration are the same ligand.

use phf::phf_map;

/// ASCII approximations for accented Latin letters, keyed by the lowercase
/// form (uppercase input is lowered before the fold).
static LATIN_FOLD: phf::Map<char, &'static str> = phf_map! {
    'à' => "a", 'á' => "a", 'â' => "a", 'ã' => "a", 'ä' => "a", 'å' => "a",
    'ā' => "a", 'ă' => "a", 'ą' => "a",
    'æ' => "ae",
    'ç' => "c", 'ć' => "c", 'ĉ' => "c", 'ċ' => "c", 'č' => "c",
    'ď' => "d", 'đ' => "d", 'ð' => "d",
    'è' => "e", 'é' => "e", 'ê' => "e", 'ë' => "e", 'ē' => "e", 'ĕ' => "e",
    'ė' => "e", 'ę' => "e", 'ě' => "e",
    'ĝ' => "g", 'ğ' => "g", 'ġ' => "g", 'ģ' => "g",
    'ĥ' => "h", 'ħ' => "h",
    'ì' => "i", 'í' => "i", 'î' => "i", 'ï' => "i", 'ĩ' => "i", 'ī' => "i",
    'ĭ' => "i", 'į' => "i", 'ı' => "i",
    'ĵ' => "j",
    'ķ' => "k",
    'ĺ' => "l", 'ļ' => "l", 'ľ' => "l", 'ł' => "l",
    'ñ' => "n", 'ń' => "n", 'ņ' => "n", 'ň' => "n",
    'ò' => "o", 'ó' => "o", 'ô' => "o", 'õ' => "o", 'ö' => "o", 'ø' => "o",
    'ō' => "o", 'ŏ' => "o", 'ő' => "o",
    'œ' => "oe",
    'ŕ' => "r", 'ŗ' => "r", 'ř' => "r",
    'ś' => "s", 'ŝ' => "s", 'ş' => "s", 'š' => "s", 'ß' => "ss",
    'ţ' => "t", 'ť' => "t", 'ŧ' => "t",
    'ù' => "u", 'ú' => "u", 'û' => "u", 'ü' => "u", 'ũ' => "u", 'ū' => "u",
    'ŭ' => "u", 'ů' => "u", 'ű' => "u", 'ų' => "u",
    'ŵ' => "w",
    'ý' => "y", 'ÿ' => "y", 'ŷ' => "y",
    'ź' => "z", 'ż' => "z", 'ž' => "z",
    'þ' => "th",
};

/// Collapses a ligand identifier to its join key: lowercase, fold accented
/// Latin letters to ASCII, then keep only `[a-z0-9]`.
///
/// Characters with no ASCII approximation (Greek letters, punctuation,
/// whitespace) are dropped. The result may be empty for names made entirely
/// of such characters; callers treat an empty key as unjoinable.
pub fn normalize_key(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    for ch in raw.chars() {
        for lowered in ch.to_lowercase() {
            if lowered.is_ascii_alphanumeric() {
                key.push(lowered);
            } else if let Some(folded) = LATIN_FOLD.get(&lowered) {
                key.push_str(folded);
            }
        }
    }
    key
}

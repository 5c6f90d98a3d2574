//! Keyword-based game tagging for ingested articles. The first game
//! whose keyword list matches wins; unmatched articles are discarded
//! by the cron path.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const GAME_KEYWORDS: &[(&str, &[&str])] = &[
    ("Free Fire", &["free fire", "garena ff"]),
    ("Liên Quân Mobile", &["lien quan", "arena of valor", "aov"]),
    ("PUBG Mobile", &["pubg"]),
    ("Genshin Impact", &["genshin"]),
    (
        "Liên Minh Huyền Thoại",
        &["lien minh huyen thoai", "lmht", "league of legends"],
    ),
    ("Valorant", &["valorant"]),
    ("FC Online", &["fc online", "fifa online"]),
    ("Roblox", &["roblox"]),
    ("Honkai: Star Rail", &["star rail", "honkai"]),
    ("Tốc Chiến", &["toc chien", "wild rift"]),
];

/// Lowercase and strip diacritics so "Liên Quân" matches "lien quan".
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| match c {
            'đ' => 'd',
            _ => c,
        })
        .collect()
}

pub fn classify_game(text: &str) -> Option<&'static str> {
    let haystack = normalize(text);
    for (game, keywords) in GAME_KEYWORDS {
        if keywords.iter().any(|kw| haystack.contains(kw)) {
            return Some(game);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_with_diacritics() {
        assert_eq!(
            classify_game("Liên Quân Mobile cập nhật mùa mới"),
            Some("Liên Quân Mobile")
        );
    }

    #[test]
    fn matches_free_fire() {
        assert_eq!(
            classify_game("Free Fire ra mắt sự kiện mới"),
            Some("Free Fire")
        );
    }

    #[test]
    fn first_match_wins() {
        // "lien quan" appears before the Valorant keyword in the table
        assert_eq!(
            classify_game("Liên Quân và Valorant cùng có giải đấu"),
            Some("Liên Quân Mobile")
        );
    }

    #[test]
    fn unmatched_is_none() {
        assert_eq!(classify_game("Tin tức thời tiết hôm nay"), None);
    }
}

//! Response normalization shared by every catalog source.

use std::collections::HashSet;

use crate::record::AnimeRecord;

/// First candidate that is present and not blank.
pub fn first_non_empty<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
}

/// Display title in `userPreferred → english → romaji → native` order.
///
/// A record with no usable title resolves to an empty string rather than
/// failing the batch it came in.
pub fn resolve_title(
    user_preferred: Option<&str>,
    english: Option<&str>,
    romaji: Option<&str>,
    native: Option<&str>,
) -> String {
    first_non_empty([user_preferred, english, romaji, native])
        .map(str::to_string)
        .unwrap_or_default()
}

/// Cover image in `extraLarge → large → medium` order.
pub fn resolve_cover(
    extra_large: Option<&str>,
    large: Option<&str>,
    medium: Option<&str>,
) -> Option<String> {
    first_non_empty([extra_large, large, medium]).map(str::to_string)
}

/// Strip HTML from a catalog description.
///
/// Line breaks (`<br>`, `<br/>`, `<br />`) become `\n`; every other tag is
/// dropped. An unterminated trailing tag is dropped as well.
pub fn sanitize_description(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let tag = &rest[start + 1..];
        match tag.find('>') {
            // `<>` is not a tag.
            Some(0) => {
                out.push_str("<>");
                rest = &tag[1..];
            }
            Some(end) => {
                if is_line_break(&tag[..end]) {
                    out.push('\n');
                }
                rest = &tag[end + 1..];
            }
            None => {
                if tag.is_empty() {
                    out.push('<');
                }
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

fn is_line_break(tag: &str) -> bool {
    tag.trim()
        .trim_end_matches('/')
        .trim_end()
        .eq_ignore_ascii_case("br")
}

/// Trending first, then popular entries not already trending, truncated to `limit`.
pub fn merge_trending_popular(
    trending: Vec<AnimeRecord>,
    popular: Vec<AnimeRecord>,
    limit: usize,
) -> Vec<AnimeRecord> {
    let trending_ids: HashSet<u64> = trending.iter().map(|r| r.id).collect();
    trending
        .into_iter()
        .chain(
            popular
                .into_iter()
                .filter(|r| !trending_ids.contains(&r.id)),
        )
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64) -> AnimeRecord {
        AnimeRecord {
            id,
            title: format!("Anime {id}"),
            ..Default::default()
        }
    }

    #[test]
    fn test_title_preference_order() {
        assert_eq!(
            resolve_title(Some("Preferred"), Some("English"), Some("Romaji"), Some("Native")),
            "Preferred"
        );
        assert_eq!(
            resolve_title(None, Some("English"), Some("Romaji"), None),
            "English"
        );
        assert_eq!(resolve_title(None, None, Some("Romaji"), Some("Native")), "Romaji");
        assert_eq!(resolve_title(None, None, None, Some("葬送のフリーレン")), "葬送のフリーレン");
    }

    #[test]
    fn test_title_skips_blank_variants() {
        assert_eq!(resolve_title(Some(""), Some("  "), Some("Romaji"), None), "Romaji");
    }

    #[test]
    fn test_title_missing_everywhere_is_empty() {
        assert_eq!(resolve_title(None, None, None, None), "");
        assert_eq!(resolve_title(Some(""), None, Some(""), None), "");
    }

    #[test]
    fn test_cover_preference_order() {
        assert_eq!(
            resolve_cover(Some("xl.jpg"), Some("l.jpg"), Some("m.jpg")).as_deref(),
            Some("xl.jpg")
        );
        assert_eq!(resolve_cover(None, Some("l.jpg"), Some("m.jpg")).as_deref(), Some("l.jpg"));
        assert_eq!(resolve_cover(None, None, Some("m.jpg")).as_deref(), Some("m.jpg"));
        assert_eq!(resolve_cover(None, None, None), None);
    }

    #[test]
    fn test_sanitize_description() {
        assert_eq!(
            sanitize_description("Line1<br>Line2<b>bold</b>"),
            "Line1\nLine2bold"
        );
    }

    #[test]
    fn test_sanitize_line_break_variants() {
        assert_eq!(sanitize_description("a<br/>b<BR />c<br >d"), "a\nb\nc\nd");
    }

    #[test]
    fn test_sanitize_keeps_plain_text() {
        assert_eq!(sanitize_description("No tags here."), "No tags here.");
        assert_eq!(sanitize_description(""), "");
        assert_eq!(sanitize_description("a <> b"), "a <> b");
    }

    #[test]
    fn test_sanitize_drops_unterminated_tag() {
        assert_eq!(sanitize_description("Source: Crunchyroll<i"), "Source: Crunchyroll");
        assert_eq!(sanitize_description("ends with <"), "ends with <");
    }

    #[test]
    fn test_sanitize_nested_markup() {
        assert_eq!(
            sanitize_description("<i>(Source: <a href=\"x\">Wiki</a>)</i>"),
            "(Source: Wiki)"
        );
    }

    #[test]
    fn test_merge_trending_first_without_duplicates() {
        let trending = vec![record(1), record(2)];
        let popular = vec![record(2), record(3), record(4)];
        let ids: Vec<u64> = merge_trending_popular(trending, popular, 4)
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_merge_truncates_to_limit() {
        let trending = vec![record(1), record(2), record(3)];
        let popular = vec![record(4), record(5)];
        let ids: Vec<u64> = merge_trending_popular(trending, popular, 2)
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }
}

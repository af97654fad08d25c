use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use super::types::ParsedQuery;

static SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[._\-]").unwrap());
static BRACKETED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(.*?\)|\[.*?\]").unwrap());
static STRAY_BRACKET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[()\[\]]").unwrap());
static RESOLUTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d{3,4}p|4K)").unwrap());
static RESOLUTION_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{3,4}p|4K)\b").unwrap());
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(19|20)\d{2}$").unwrap());

/// Strip the trailing extension, if the name has one.
fn file_stem(filename: &str) -> &str {
    match Path::new(filename).extension() {
        Some(ext) => &filename[..filename.len() - ext.len() - 1],
        None => filename,
    }
}

/// Probable movie title from a raw filename, used as the lookup query.
///
/// Separators are normalized before the year is removed: the year is looked
/// up among space-delimited tokens. Only the last year-like token after the
/// first word is dropped, so titles such as "1917" or "2001 A Space Odyssey"
/// survive.
pub fn clean_movie_name(filename: &str) -> String {
    let stem = file_stem(filename.trim());
    let name = SEPARATOR_RE.replace_all(stem, " ");
    let name = BRACKETED_RE.replace_all(&name, " ");
    let name = STRAY_BRACKET_RE.replace_all(&name, " ");
    let name = RESOLUTION_TOKEN_RE.replace_all(&name, " ");

    let tokens: Vec<&str> = name.split_whitespace().collect();
    let year_at = tokens
        .iter()
        .rposition(|t| YEAR_RE.is_match(t))
        .filter(|i| *i > 0);
    tokens
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != year_at)
        .map(|(_, t)| *t)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First resolution tag (e.g. "720p", "2160p", "4K") found in the filename.
pub fn extract_resolution(filename: &str) -> Option<String> {
    RESOLUTION_RE
        .find(filename)
        .map(|m| m.as_str().to_string())
}

pub fn parse_query(filename: &str) -> ParsedQuery {
    ParsedQuery {
        title: clean_movie_name(filename),
        resolution: extract_resolution(filename),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn dotted_scene_name() {
        assert_eq!(clean_movie_name("The.Matrix.1999.1080p.mkv"), "The Matrix");
        assert_eq!(extract_resolution("The.Matrix.1999.1080p.mkv").as_deref(), Some("1080p"));
    }

    #[test]
    fn bracketed_annotations() {
        assert_eq!(clean_movie_name("Inception (2010) [4K].mp4"), "Inception");
        assert_eq!(extract_resolution("Inception (2010) [4K].mp4").as_deref(), Some("4K"));
    }

    #[test]
    fn underscores_and_hyphens() {
        assert_eq!(clean_movie_name("blade_runner_2049-2017_720P.avi"), "blade runner 2049");
        assert_eq!(extract_resolution("blade_runner_2049-2017_720P.avi").as_deref(), Some("720P"));
    }

    #[test]
    fn numeric_titles_survive() {
        assert_eq!(clean_movie_name("1917.2019.1080p.mkv"), "1917");
        assert_eq!(clean_movie_name("2001.A.Space.Odyssey.1968.mkv"), "2001 A Space Odyssey");
        assert_eq!(clean_movie_name("1999.1080p.mkv"), "1999");
    }

    #[test]
    fn resolution_keeps_original_case() {
        assert_eq!(extract_resolution("Heat.1995.4k.mkv").as_deref(), Some("4k"));
        assert_eq!(extract_resolution("Heat.1995.2160p.mkv").as_deref(), Some("2160p"));
    }

    #[test]
    fn no_resolution() {
        assert_eq!(extract_resolution("Amelie.2001.mkv"), None);
        assert_eq!(extract_resolution("Alien.x264.mkv"), None);
    }

    #[test]
    fn no_extension() {
        assert_eq!(clean_movie_name("Memento 2000"), "Memento");
    }

    #[test]
    fn unbalanced_bracket() {
        assert_eq!(clean_movie_name("Up (2009.mkv"), "Up");
    }

    #[test]
    fn degenerate_names() {
        assert_eq!(clean_movie_name(""), "");
        assert_eq!(clean_movie_name(".mkv"), "mkv");
        assert_eq!(clean_movie_name("1080p.mkv"), "");
        assert_eq!(clean_movie_name("(2019) [4K].mkv"), "");
    }

    #[test]
    fn parse_query_combines_both() {
        let q = parse_query("Dune.Part.Two.2024.2160p.mkv");
        assert_eq!(q.title, "Dune Part Two");
        assert_eq!(q.resolution.as_deref(), Some("2160p"));
    }

    proptest! {
        #[test]
        fn never_keeps_extension_or_annotations(
            words in proptest::collection::vec("[A-Za-z]{1,8}", 1..5),
            note in "[A-Za-z0-9 ]{0,10}",
            ext in prop::sample::select(vec!["mp4", "mkv", "avi", "mov", "wmv"]),
        ) {
            let filename = format!("{} ({}) [{}].{}", words.join("."), note, note, ext);
            let cleaned = clean_movie_name(&filename);
            prop_assert!(!cleaned.contains('('));
            prop_assert!(!cleaned.contains('['));
            prop_assert!(!cleaned.contains('.'));
            prop_assert_eq!(cleaned, words.join(" "));
        }

        #[test]
        fn finds_resolution_token(
            title in "[A-Za-z]{1,10}",
            res in prop::sample::select(vec!["480p", "576p", "720p", "1080p", "2160p", "4K", "4k", "1080P"]),
        ) {
            let filename = format!("{title}.{res}.mkv");
            prop_assert_eq!(extract_resolution(&filename), Some(res.to_string()));
        }

        #[test]
        fn absent_without_resolution(title in "[A-Za-z ]{0,20}") {
            prop_assert_eq!(extract_resolution(&format!("{title}.mkv")), None);
        }

        #[test]
        fn deterministic(name in "\\PC{0,40}") {
            prop_assert_eq!(clean_movie_name(&name), clean_movie_name(&name));
        }
    }
}

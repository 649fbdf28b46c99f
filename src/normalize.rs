use regex::Regex;

pub const UNTITLED: &str = "Untitled Track";

/// Clean a noisy video-platform title into a display- and filename-safe form.
///
/// Strips promotional decorations, a redundant leading artist restatement, and
/// trailing quality tags, then collapses whitespace. The result is a fixed
/// point: cleaning an already-clean title returns it unchanged.
pub fn clean_title(title: &str, author: Option<&str>) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return UNTITLED.to_string();
    }

    let mut out = strip_decorations(trimmed);
    // Dropping a leading segment can expose another author restatement, so
    // the two prefix rules iterate together until they stabilize.
    loop {
        let mut next = out.clone();
        if let Some(author) = author {
            next = strip_author_prefix(&next, author);
        }
        next = strip_leading_artist(&next);
        if next == out {
            break;
        }
        out = next;
    }
    // Stripping a dangling dash can expose another trailing tag and vice
    // versa, so run the tail cleanup until it stabilizes.
    loop {
        let next = collapse(&strip_trailing_tag(&out));
        if next == out {
            break;
        }
        out = next;
    }

    if out.is_empty() {
        UNTITLED.to_string()
    } else {
        out
    }
}

/// Clean an attributed-author string, dropping channel decorations like a
/// trailing "VEVO" or " - Topic"
pub fn clean_author(author: &str) -> String {
    let vevo = Regex::new(r"(?i)\s*vevo\s*$").unwrap();
    let topic = Regex::new(r"(?i)\s*-\s*topic\s*$").unwrap();

    let mut out = author.trim().to_string();
    out = vevo.replace(&out, "").trim().to_string();
    out = topic.replace(&out, "").trim().to_string();

    if out.is_empty() {
        author.trim().to_string()
    } else {
        out
    }
}

/// Remove the fixed set of promotional decorations wherever they appear
fn strip_decorations(title: &str) -> String {
    let patterns = [
        r"(?i)[(\[]\s*official(?:\s+music)?\s+video\s*[)\]]",
        r"(?i)[(\[]\s*official(?:\s+hd)?\s+(?:audio|lyric(?:s)?(?:\s+video)?)\s*[)\]]",
        r"(?i)[(\[]\s*(?:full\s+)?hd(?:\s+quality)?\s*[)\]]",
        r"(?i)[(\[]\s*lyric(?:s)?\s+video\s*[)\]]",
    ];

    let mut out = title.to_string();
    for pattern in patterns {
        let re = Regex::new(pattern).unwrap();
        out = re.replace_all(&out, " ").to_string();
    }
    out
}

/// Lowercased, alphanumeric-only form used for fuzzy author comparison
fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Drop a leading "<artist> - " restatement when it matches the attributed author
fn strip_author_prefix(title: &str, author: &str) -> String {
    let author = squash(&clean_author(author));
    if author.is_empty() {
        return title.to_string();
    }

    let mut out = title.to_string();
    while let Some((head, rest)) = out.split_once('-') {
        if squash(head) == author && !rest.trim().is_empty() {
            out = rest.trim().to_string();
        } else {
            break;
        }
    }
    out
}

/// With two or more literal dashes, everything before the first one is a
/// redundant artist restatement. Applied to a fixed point so cleaning stays
/// idempotent on titles that keep two dashes after one pass.
fn strip_leading_artist(title: &str) -> String {
    let mut out = title.to_string();
    while out.matches('-').count() >= 2 {
        match out.split_once('-') {
            Some((_, rest)) if !rest.trim().is_empty() => out = rest.trim().to_string(),
            _ => break,
        }
    }
    out
}

/// Remove any trailing bracketed segment that looks like a quality or version tag
fn strip_trailing_tag(title: &str) -> String {
    let re = Regex::new(r"(?i)\s*[(\[][^)\]]*(?:video|audio|hd|official|4k|quality)[^)\]]*[)\]]\s*$")
        .unwrap();

    let mut out = title.to_string();
    loop {
        let next = re.replace(&out, "").to_string();
        if next == out {
            break;
        }
        out = next;
    }
    out
}

/// Collapse whitespace runs, strip a dangling trailing dash, trim
fn collapse(title: &str) -> String {
    let ws = Regex::new(r"\s+").unwrap();
    let mut out = ws.replace_all(title, " ").trim().to_string();
    while out.ends_with('-') {
        out.pop();
        out = out.trim_end().to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_official_video_decoration() {
        assert_eq!(
            clean_title("Never Gonna Give You Up (Official Music Video)", None),
            "Never Gonna Give You Up"
        );
        assert_eq!(
            clean_title("Some Song [Official Video]", None),
            "Some Song"
        );
        assert_eq!(
            clean_title("Some Song (official hd audio)", None),
            "Some Song"
        );
    }

    #[test]
    fn strips_quality_tags() {
        assert_eq!(clean_title("Track (HD)", None), "Track");
        assert_eq!(clean_title("Track [Full HD]", None), "Track");
        assert_eq!(clean_title("Track (HD Quality)", None), "Track");
        assert_eq!(clean_title("Track (Lyric Video)", None), "Track");
    }

    #[test]
    fn catch_all_removes_trailing_tagged_segment() {
        assert_eq!(clean_title("Track (4K Remaster)", None), "Track");
        assert_eq!(clean_title("Track [remastered audio]", None), "Track");
        // Plain parenthetical content survives
        assert_eq!(clean_title("Track (Acoustic)", None), "Track (Acoustic)");
    }

    #[test]
    fn drops_leading_artist_with_two_dashes() {
        assert_eq!(clean_title("Artist - Song - Live", None), "Song - Live");
    }

    #[test]
    fn drops_author_matching_prefix() {
        // Scenario: oembed attributes to "RickAstleyVEVO", title restates "Rick Astley"
        assert_eq!(
            clean_title(
                "Rick Astley - Never Gonna Give You Up (Official Music Video)",
                Some("RickAstleyVEVO"),
            ),
            "Never Gonna Give You Up"
        );
    }

    #[test]
    fn author_vevo_and_topic_suffixes() {
        assert_eq!(clean_author("RickAstleyVEVO"), "RickAstley");
        assert_eq!(clean_author("Daft Punk - Topic"), "Daft Punk");
        assert_eq!(clean_author("  Plain Channel  "), "Plain Channel");
    }

    #[test]
    fn empty_input_yields_placeholder() {
        assert_eq!(clean_title("", None), UNTITLED);
        assert_eq!(clean_title("   ", None), UNTITLED);
        assert_eq!(clean_title("(Official Video)", None), UNTITLED);
    }

    #[test]
    fn trailing_dash_is_stripped() {
        assert_eq!(clean_title("Song -", None), "Song");
        assert_eq!(clean_title("Song (Audio) -", None), "Song");
    }

    #[test]
    fn clean_is_idempotent() {
        let inputs = [
            "Rick Astley - Never Gonna Give You Up (Official Music Video)",
            "Artist - Song - Live",
            "a - b - c - d",
            "Track (HD) [Official Audio]",
            "Track (Acoustic)",
            "plain title",
            " spaced   out \t title ",
            "Song -",
            "Song (Audio) -",
            "Song (Audio) - [Video]",
            "Someone - Artist - Song",
            "Artist - (Audio)",
            "",
            "(Official Video)",
            "state-of-the-art",
        ];
        for input in inputs {
            let once = clean_title(input, Some("Artist"));
            let twice = clean_title(&once, Some("Artist"));
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }
}

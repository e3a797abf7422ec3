//! Windows drive-letter canonicalization for `file:` URIs.
//!
//! Clients commonly send `file:///D:/proj/a.md` while servers built on
//! `vscode-uri` key documents by `file:///d%3A/proj/a.md`. Only that shape is
//! rewritten; every other URI is left alone.

const FILE_SCHEME: &str = "file:";

/// Canonicalize a Windows `file:` URI to `file:///<drive>%3A/<path>`.
///
/// Returns `None` when no normalization applies: non-`file:` schemes, POSIX
/// paths, and input that is already percent-encoded.
pub fn normalize_file_uri(uri: &str) -> Option<String> {
    let rest = uri.strip_prefix(FILE_SCHEME)?.trim_start_matches('/');

    let mut chars = rest.chars();
    let drive = chars.next().filter(char::is_ascii_alphabetic)?;
    let path = chars.as_str().strip_prefix(':')?;

    let separator = if path.starts_with('/') { "" } else { "/" };
    Some(format!(
        "file:///{}%3A{separator}{path}",
        drive.to_ascii_lowercase()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("file:///D:/proj/a.md", "file:///d%3A/proj/a.md")]
    #[case("file:///d:/proj/a.md", "file:///d%3A/proj/a.md")]
    #[case("file:/C:/x", "file:///c%3A/x")]
    #[case("file:C:/x", "file:///c%3A/x")]
    #[case("file://///Z:/deep/path", "file:///z%3A/deep/path")]
    #[case("file:///E:", "file:///e%3A/")]
    #[case("file:///E:rel", "file:///e%3A/rel")]
    fn drive_letters_are_canonicalized(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_file_uri(input).as_deref(), Some(expected));
    }

    #[rstest]
    #[case("file:///home/user/a.md")]
    #[case("file:///d%3A/proj/a.md")]
    #[case("untitled:Untitled-1")]
    #[case("https://example.com/C:/x")]
    #[case("file:///")]
    #[case("file:///1:/x")]
    #[case("")]
    fn other_shapes_are_not_applicable(#[case] input: &str) {
        assert_eq!(normalize_file_uri(input), None);
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        let once = normalize_file_uri("file:///D:/proj/a.md").unwrap();
        let twice = normalize_file_uri(&once).unwrap_or_else(|| once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn non_ascii_path_is_kept_verbatim() {
        assert_eq!(
            normalize_file_uri("file:///Q:/ünï/cödé.md").as_deref(),
            Some("file:///q%3A/ünï/cödé.md")
        );
    }
}

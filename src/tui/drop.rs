//! Turning pasted text into dropped file paths
//!
//! Dragging files onto a terminal window pastes their paths. Depending on the
//! emulator they arrive quoted, with backslash-escaped spaces, or as
//! `file://` URIs, separated by spaces or newlines.

use std::path::PathBuf;

use url::Url;

/// Split pasted text into file paths; blank text yields no paths
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    tokenize(text.trim())
        .into_iter()
        .filter(|token| !token.is_empty())
        .map(|token| to_path(&token))
        .collect()
}

fn to_path(token: &str) -> PathBuf {
    if token.starts_with("file://") {
        if let Some(path) = Url::parse(token)
            .ok()
            .and_then(|url| url.to_file_path().ok())
        {
            return path;
        }
    }
    PathBuf::from(token)
}

fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => quote = Some(c),
            (None, '\\') => match chars.peek() {
                // Escapes only for characters a shell-style drop would escape,
                // so Windows separators survive
                Some(&next) if next.is_whitespace() || matches!(next, '\\' | '\'' | '"') => {
                    current.push(next);
                    chars.next();
                }
                _ => current.push('\\'),
            },
            (None, c) if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            (None, c) => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_paste_has_no_paths() {
        assert!(parse_dropped_paths("").is_empty());
        assert!(parse_dropped_paths("   \n").is_empty());
        assert!(parse_dropped_paths("''").is_empty());
    }

    #[test]
    fn test_single_plain_path() {
        assert_eq!(
            parse_dropped_paths("/home/me/report.pdf\n"),
            vec![PathBuf::from("/home/me/report.pdf")]
        );
    }

    #[test]
    fn test_quoted_path_with_spaces() {
        assert_eq!(
            parse_dropped_paths("'/home/me/My Report.pdf' "),
            vec![PathBuf::from("/home/me/My Report.pdf")]
        );
        assert_eq!(
            parse_dropped_paths("\"/tmp/a b.docx\""),
            vec![PathBuf::from("/tmp/a b.docx")]
        );
    }

    #[test]
    fn test_escaped_spaces() {
        assert_eq!(
            parse_dropped_paths("/tmp/My\\ Report.pdf"),
            vec![PathBuf::from("/tmp/My Report.pdf")]
        );
    }

    #[test]
    fn test_windows_separators_kept() {
        assert_eq!(
            parse_dropped_paths("C:\\docs\\a.pdf"),
            vec![PathBuf::from("C:\\docs\\a.pdf")]
        );
    }

    #[test]
    fn test_multiple_paths() {
        assert_eq!(
            parse_dropped_paths("/tmp/a.pdf /tmp/b.pdf\n/tmp/c.pdf"),
            vec![
                PathBuf::from("/tmp/a.pdf"),
                PathBuf::from("/tmp/b.pdf"),
                PathBuf::from("/tmp/c.pdf"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_file_uri() {
        assert_eq!(
            parse_dropped_paths("file:///tmp/My%20Report.pdf"),
            vec![PathBuf::from("/tmp/My Report.pdf")]
        );
    }
}

use unicode_normalization::UnicodeNormalization;

use super::types::Destination;

/// Make a metadata title safe to use as a single path component.
pub fn sanitize_component<S: AsRef<str>>(s: S) -> String {
    let mut out = String::with_capacity(s.as_ref().len());
    let mut last_space = false;
    for ch in s.as_ref().nfc() {
        let replacement: &str = match ch {
            ':' => " -",
            '/' | '\\' | '*' | '?' | '"' | '<' | '>' | '|' => "",
            c if c.is_whitespace() => " ",
            c if c.is_control() => "",
            _ => {
                last_space = false;
                out.push(ch);
                continue;
            }
        };
        for r in replacement.chars() {
            if r == ' ' {
                if !last_space && !out.is_empty() {
                    out.push(' ');
                }
                last_space = true;
            } else {
                last_space = false;
                out.push(r);
            }
        }
    }
    out.trim_end_matches(['.', ' ']).to_string()
}

/// Folder and file name for a resolved movie.
///
/// `extension` is the original file extension without the leading dot; its
/// case is preserved. `None` when nothing of the title is left once sanitized.
pub fn build_destination(
    title: &str,
    year: u16,
    resolution: Option<&str>,
    extension: &str,
) -> Option<Destination> {
    let title = sanitize_component(title);
    if title.is_empty() {
        return None;
    }
    let folder_name = format!("{} ({})", title, year);

    let mut file_name = folder_name.clone();
    if let Some(res) = resolution {
        file_name.push(' ');
        file_name.push_str(res);
    }
    if !extension.is_empty() {
        file_name.push('.');
        file_name.push_str(extension);
    }

    Some(Destination {
        folder_name,
        file_name,
    })
}

//! Label to filename derivation.

/// Characters besides ASCII word characters that may appear in a filename.
const EXTRA_ALLOWED: &[char] = &[' ', ':', '(', ')', '&', '-'];

/// Check whether a label character survives sanitization.
fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || EXTRA_ALLOWED.contains(&c)
}

/// Filter a label down to the whitelisted characters and trim it.
///
/// # Examples
/// ```
/// use stanza_splitter::filename::sanitize_label;
///
/// assert_eq!(sanitize_label("  Sample: Database (A&B)! "), "Sample: Database (A&B)");
/// assert_eq!(sanitize_label("Foo/Bar"), "FooBar");
/// assert_eq!(sanitize_label("!!!***"), "");
/// ```
pub fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .filter(|&c| is_allowed(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Derive a stanza filename from its label.
///
/// Returns `None` when nothing usable is left after sanitization, in which
/// case the stanza must not be written at all. Different labels can map to
/// the same filename; callers open with truncation, so the later stanza wins.
///
/// # Examples
/// ```
/// use stanza_splitter::filename::label_to_filename;
///
/// assert_eq!(label_to_filename("Other (Test)", ".stz"), Some("Other (Test).stz".to_string()));
/// assert_eq!(label_to_filename("Foo!", ".stz"), label_to_filename("Foo?", ".stz"));
/// assert_eq!(label_to_filename("!!!***", ".stz"), None);
/// ```
pub fn label_to_filename(label: &str, extension: &str) -> Option<String> {
    let stem = sanitize_label(label);
    if stem.is_empty() {
        None
    } else {
        Some(stem + extension)
    }
}

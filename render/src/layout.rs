//! Two-column row alignment for help sections.

use console::measure_text_width;

/// Aligns `(term, description)` rows into two columns.
///
/// Each row is indented by `indent` spaces; descriptions start `gutter`
/// spaces after the widest term. Terms are measured with
/// [`measure_text_width`], so ANSI escapes and wide characters do not skew
/// the gutter. Rows with an empty description carry no trailing padding.
///
/// # Examples
///
/// ```
/// use cmdtree_render::two_column;
///
/// let rows = vec![
///     ("-v, --verbose".to_string(), "Verbose output".to_string()),
///     ("-o <FILE>".to_string(), "Output path".to_string()),
/// ];
/// let text = two_column(&rows, 2, 2);
/// assert_eq!(text, "  -v, --verbose  Verbose output\n  -o <FILE>      Output path\n");
/// ```
pub fn two_column(rows: &[(String, String)], indent: usize, gutter: usize) -> String {
    let width = rows
        .iter()
        .map(|(term, _)| measure_text_width(term))
        .max()
        .unwrap_or(0);

    let pad = " ".repeat(indent);
    let mut out = String::new();
    for (term, description) in rows {
        if description.is_empty() {
            out.push_str(&format!("{pad}{term}\n"));
        } else {
            let fill = " ".repeat(width - measure_text_width(term) + gutter);
            out.push_str(&format!("{pad}{term}{fill}{description}\n"));
        }
    }
    out
}

//! Line/column to byte offset mapping.

use proc_macro2::LineColumn;

/// Byte offsets of line starts for one file.
///
/// `proc_macro2` reports positions as 1-based lines and 0-based columns
/// counted in chars; slicing needs byte offsets.
#[derive(Debug, Clone)]
pub(crate) struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_starts }
    }

    /// Byte offset of `pos` in `text`, clamped to the end of its line.
    pub fn offset(&self, text: &str, pos: LineColumn) -> usize {
        let Some(&start) = pos
            .line
            .checked_sub(1)
            .and_then(|line| self.line_starts.get(line))
        else {
            return text.len();
        };

        let rest = &text[start..];
        let line_len = rest.find('\n').map_or(rest.len(), |i| i + 1);
        rest[..line_len]
            .char_indices()
            .nth(pos.column)
            .map_or(start + line_len, |(i, _)| start + i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lc(line: usize, column: usize) -> LineColumn {
        LineColumn { line, column }
    }

    #[test]
    fn test_offsets_ascii() {
        let text = "fn a() {}\nfn b() {}\n";
        let index = LineIndex::new(text);

        assert_eq!(index.offset(text, lc(1, 0)), 0);
        assert_eq!(index.offset(text, lc(1, 9)), 9);
        assert_eq!(index.offset(text, lc(2, 3)), 13);
    }

    #[test]
    fn test_columns_count_chars() {
        let text = "// héllo\nfn a() {}";
        let index = LineIndex::new(text);

        // 'é' is two bytes, one column
        assert_eq!(index.offset(text, lc(1, 8)), 9);
        assert_eq!(&text[index.offset(text, lc(2, 0))..], "fn a() {}");
    }

    #[test]
    fn test_end_of_file_without_newline() {
        let text = "fn a() {}";
        let index = LineIndex::new(text);
        assert_eq!(index.offset(text, lc(1, 9)), 9);
        assert_eq!(index.offset(text, lc(7, 0)), 9);
    }
}

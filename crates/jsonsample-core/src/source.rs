use std::fmt;

use serde::{Deserialize, Serialize};

/// 1-based line and column of a location in declaration text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Maps byte offsets of a source text to line/column positions.
#[derive(Debug, Clone)]
pub struct SourceMap<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> SourceMap<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, byte)| *byte == b'\n')
                .map(|(idx, _)| idx + 1),
        );
        Self {
            source,
            line_starts,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Columns count characters, not bytes.
    pub fn position(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.source.len());
        while !self.source.is_char_boundary(offset) {
            offset -= 1;
        }
        let line_idx = self
            .line_starts
            .partition_point(|start| *start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts[line_idx];
        let column = self.source[line_start..offset].chars().count() + 1;
        Position::new(line_idx + 1, column)
    }

    /// Position just past the last character.
    pub fn end(&self) -> Position {
        self.position(self.source.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_one_based() {
        let map = SourceMap::new("type A struct {\n\tName string\n}");
        assert_eq!(map.position(0), Position::new(1, 1));
        assert_eq!(map.position(5), Position::new(1, 6));
        assert_eq!(map.position(17), Position::new(2, 2));
        assert_eq!(map.end(), Position::new(3, 2));
    }

    #[test]
    fn columns_count_characters() {
        let map = SourceMap::new("// é\nX");
        assert_eq!(map.position(5), Position::new(1, 5));
        assert_eq!(map.position(6), Position::new(2, 1));
    }
}

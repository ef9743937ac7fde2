use std::borrow::Cow;

use ropey::Rope;

/// Read-only, line-indexed access to document text.
///
/// Lines are returned without their trailing line terminator.
pub trait LineSource {
    fn line_count(&self) -> usize;

    fn line(&self, row: usize) -> Option<Cow<'_, str>>;

    fn all_lines(&self) -> Vec<Cow<'_, str>> {
        (0..self.line_count()).filter_map(|row| self.line(row)).collect()
    }
}

fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

impl LineSource for Rope {
    fn line_count(&self) -> usize {
        self.len_lines()
    }

    fn line(&self, row: usize) -> Option<Cow<'_, str>> {
        if row >= self.len_lines() {
            return None;
        }
        let slice = self.line(row);
        let text = match slice.as_str() {
            Some(s) => Cow::Borrowed(strip_terminator(s)),
            None => Cow::Owned(strip_terminator(&slice.to_string()).to_string()),
        };
        Some(text)
    }
}

impl LineSource for [String] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, row: usize) -> Option<Cow<'_, str>> {
        self.get(row).map(|l| Cow::Borrowed(strip_terminator(l)))
    }
}

impl LineSource for [&str] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, row: usize) -> Option<Cow<'_, str>> {
        self.get(row).map(|l| Cow::Borrowed(strip_terminator(l)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rope_lines_drop_terminators() {
        let rope = Rope::from_str("ADD R1, R1, #1\r\nHALT\n");
        assert_eq!(rope.line_count(), 3);
        assert_eq!(LineSource::line(&rope, 0).as_deref(), Some("ADD R1, R1, #1"));
        assert_eq!(LineSource::line(&rope, 1).as_deref(), Some("HALT"));
        assert_eq!(LineSource::line(&rope, 2).as_deref(), Some(""));
        assert_eq!(LineSource::line(&rope, 3), None);
    }

    #[test]
    fn empty_rope_has_one_empty_line() {
        let rope = Rope::from_str("");
        assert_eq!(rope.line_count(), 1);
        assert_eq!(LineSource::line(&rope, 0).as_deref(), Some(""));
    }

    #[test]
    fn str_slice_lines() {
        let lines: &[&str] = &["LOOP ADD R1, R1, #1", "BRnzp LOOP"];
        assert_eq!(lines.line_count(), 2);
        assert_eq!(lines.line(1).as_deref(), Some("BRnzp LOOP"));
        assert_eq!(lines.line(2), None);
        assert_eq!(lines.all_lines().len(), 2);
    }

    #[test]
    fn empty_document_has_no_lines() {
        let lines: &[String] = &[];
        assert_eq!(lines.line_count(), 0);
        assert!(lines.all_lines().is_empty());
    }
}

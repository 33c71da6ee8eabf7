//! Bulk student import from newline-delimited text.
//!
//! The text usually comes from a file picked by the user; reading it is the
//! caller's job. This module only decides which lines become students.

/// Yields one trimmed, non-empty student name per input line.
///
/// Accepts `\n` and `\r\n` line endings. Duplicate names are kept.
pub fn parse_student_lines(raw: &str) -> impl Iterator<Item = &str> + '_ {
    raw.lines().map(str::trim).filter(|line| !line.is_empty())
}

#[cfg(test)]
mod tests {
    use super::parse_student_lines;

    #[test]
    fn skips_blank_lines_and_trims() {
        let names: Vec<_> = parse_student_lines("  Ann \r\n\r\n\tBob\n   \nAnn\n").collect();
        assert_eq!(names, vec!["Ann", "Bob", "Ann"]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(parse_student_lines("").count(), 0);
        assert_eq!(parse_student_lines("\n\n  \n").count(), 0);
    }
}

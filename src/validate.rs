use serde::{Deserialize, Serialize};

/// A rejected code together with its position in the pasted list.
///
/// `line_number` is 1-based and counted over nonblank lines only, so it
/// matches what the user sees after blank lines are discarded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationIssue {
    pub line_number: usize,
    pub code: String,
    pub message: String,
}

/// Split raw pasted text into codes: one per line, trimmed, blank lines
/// discarded. Order is preserved.
pub fn split_codes(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Classify every code in `codes`, returning one issue per rejected
/// code. The full batch is always collected; callers report all issues
/// together and must not start rendering while any exist.
///
/// Pure function of its input: no side effects, identical output on
/// identical input.
pub fn validate(codes: &[String]) -> Vec<ValidationIssue> {
    codes
        .iter()
        .enumerate()
        .filter(|(_, code)| has_leading_zero(code))
        .map(|(idx, code)| ValidationIssue {
            line_number: idx + 1,
            code: code.clone(),
            message: format!("code '{code}' has a leading zero and cannot be used"),
        })
        .collect()
}

/// A code is rejected only when an ASCII `0` at the absolute start of
/// the string is immediately followed by another ASCII digit. A zero
/// after any delimiter (`M4018-028`), a lone `0`, and `0x...` all pass.
fn has_leading_zero(code: &str) -> bool {
    let mut chars = code.chars();
    chars.next() == Some('0') && chars.next().is_some_and(|ch| ch.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flags_leading_zero_with_position() {
        let issues = validate(&codes(&["04018-28", "M4018-29"]));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line_number, 1);
        assert_eq!(issues[0].code, "04018-28");
        assert!(issues[0].message.contains("04018-28"));
    }

    #[test]
    fn zeros_after_delimiters_pass() {
        let issues = validate(&codes(&["M4018-028", "ABC-001", "XYZ-0099"]));
        assert_eq!(issues, vec![]);
    }

    #[test]
    fn lone_zero_and_zero_letter_pass() {
        assert_eq!(validate(&codes(&["0"])), vec![]);
        assert_eq!(validate(&codes(&["0x"])), vec![]);
    }

    #[test]
    fn every_offender_is_reported() {
        let issues = validate(&codes(&["01", "OK-1", "09-X", "00"]));
        let lines: Vec<usize> = issues.iter().map(|i| i.line_number).collect();
        assert_eq!(lines, vec![1, 3, 4]);
    }

    #[test]
    fn empty_input_yields_no_issues() {
        assert_eq!(validate(&[]), vec![]);
    }

    #[test]
    fn validation_is_idempotent() {
        let input = codes(&["042", "A-1", "007"]);
        assert_eq!(validate(&input), validate(&input));
    }

    #[test]
    fn split_drops_blanks_and_trims() {
        let raw = "  A-1  \n\n\t\nB-2\n   \nC-3\n";
        assert_eq!(split_codes(raw), codes(&["A-1", "B-2", "C-3"]));
    }

    #[test]
    fn line_numbers_count_nonblank_lines_only() {
        let raw = "\nM-1\n\n042\n";
        let issues = validate(&split_codes(raw));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line_number, 2);
    }
}

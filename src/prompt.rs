//! Yes/no confirmation prompt

use std::io::{self, BufRead, Write};

/// Interpret one line of user input. Empty input means yes.
pub fn parse_answer(input: &str) -> bool {
    let answer = input.trim();
    answer.is_empty() || answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

/// Ask `question` on `output` and read a single answer from `input`.
///
/// End of input counts as the default answer.
pub fn confirm(
    input: &mut impl BufRead,
    output: &mut impl Write,
    question: &str,
) -> io::Result<bool> {
    write!(output, "{} [Y/n] ", question)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(parse_answer(&line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ask(answer: &str) -> (bool, String) {
        let mut input = Cursor::new(answer.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = confirm(&mut input, &mut output, "Proceed?").unwrap();
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_parse_answer() {
        assert!(parse_answer(""));
        assert!(parse_answer("   \n"));
        assert!(parse_answer("y"));
        assert!(parse_answer("YES\n"));
        assert!(parse_answer(" Yes "));
        assert!(!parse_answer("n"));
        assert!(!parse_answer("no"));
        assert!(!parse_answer("yep"));
    }

    #[test]
    fn test_confirm_writes_question() {
        let (result, output) = ask("n\n");
        assert!(!result);
        assert_eq!(output, "Proceed? [Y/n] ");
    }

    #[test]
    fn test_confirm_default_yes() {
        assert!(ask("\n").0);
        assert!(ask("").0);
    }
}

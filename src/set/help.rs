use crate::error::Result;
use crate::set::ParameterSet;

/// Separator between the parameter column and its description.
const DELIMITER: &str = "- ";

impl ParameterSet {
    /// Renders help rows for the listed parameters:
    ///
    /// ```text
    ///   --input file - Input files.
    /// ```
    ///
    /// `header` is the width of everything before the description; longer
    /// descriptions wrap at `row_width` and continue under the description
    /// column. Parameters without help text are skipped.
    pub fn help_to_string(
        &self,
        names: &str,
        indent: usize,
        header: usize,
        row_width: usize,
    ) -> Result<String> {
        let mut out = String::new();
        for i in self.resolve(names)? {
            let parameter = &self.parameters()[i];
            let Some(help) = parameter.help() else {
                continue;
            };

            let mut left = format!("{}{}", " ".repeat(indent), parameter.print_name());
            if let Some(arg) = &help.arg {
                left.push(' ');
                left.push_str(arg);
            }
            let column = header.saturating_sub(DELIMITER.len()).max(left.len() + 1);
            out.push_str(&format!("{:<width$}{}", left, DELIMITER, width = column));

            let start = column + DELIMITER.len();
            wrap_into(&mut out, &help.text, start, row_width);
        }
        Ok(out)
    }
}

/// Appends `text` word by word, breaking lines before `row_width`.
fn wrap_into(out: &mut String, text: &str, start: usize, row_width: usize) {
    let mut position = start;
    let mut first = true;
    for word in text.split_whitespace() {
        let needed = if first { word.len() } else { word.len() + 1 };
        if !first && position + needed > row_width {
            out.push('\n');
            out.push_str(&" ".repeat(start));
            position = start;
            first = true;
        }
        if !first {
            out.push(' ');
            position += 1;
        }
        out.push_str(word);
        position += word.len();
        first = false;
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use crate::set::ParameterSet;

    #[test]
    fn test_help_rows() {
        let mut set = ParameterSet::new("{a}{input}{q}").unwrap();
        set.set_help_text("a", None, "parameter A.").unwrap();
        set.set_help_text("input", Some("file"), "Input file.").unwrap();

        let help = set.help_to_string("a,input,q", 2, 17, 80).unwrap();
        let expected = format!("  -a{}- parameter A.\n  --input file - Input file.\n", " ".repeat(11));
        assert_eq!(help, expected);
    }

    #[test]
    fn test_help_wraps_long_text() {
        let mut set = ParameterSet::new("{a}").unwrap();
        set.set_help_text("a", None, "one two three four").unwrap();

        let help = set.help_to_string("a", 0, 5, 15).unwrap();
        assert_eq!(help, "-a - one two\n     three four\n");
    }
}

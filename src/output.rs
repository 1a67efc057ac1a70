/// Marker the renderer puts in front of validation messages, e.g.
/// `Line 8 of <stdin> (mj-text) ... Attribute foo is illegal`.
const WARNING_LINE_PREFIX: &str = "Line";

/// Renderer stdout split into the rendered document and validation warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedOutput {
    /// Non-warning lines in their original order, line terminators intact.
    pub result: String,
    /// Warning lines without terminators, joined with `\n`.
    pub warnings: String,
}

/// Separates validation warnings from rendered output.
///
/// This is the only place that knows the renderer's diagnostic format.
pub fn classify(stdout: &str) -> ClassifiedOutput {
    let mut result = String::with_capacity(stdout.len());
    let mut warnings: Vec<&str> = Vec::new();

    for line in stdout.split_inclusive('\n') {
        if is_warning(line) {
            warnings.push(line.trim_end_matches(['\r', '\n']));
        } else {
            result.push_str(line);
        }
    }

    ClassifiedOutput {
        result,
        warnings: warnings.join("\n"),
    }
}

fn is_warning(line: &str) -> bool {
    line.trim().starts_with(WARNING_LINE_PREFIX)
}

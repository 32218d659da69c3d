//! Types produced by the command splitter and consumed by the eval layer.

/// Shell operator separating consecutive segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `&&`: run next only if previous succeeded
    And,
    /// `||`: run next only if previous failed
    Or,
    /// `;`: run next unconditionally
    Semi,
    /// `|`: pipe stdout
    Pipe,
    /// `|&`: pipe stdout+stderr
    PipeErr,
    /// `&`: run previous in the background, continue immediately
    Background,
    /// Unquoted line break, same meaning as `;`
    Newline,
}

impl Operator {
    /// The operator's shell syntax.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Semi => ";",
            Operator::Pipe => "|",
            Operator::PipeErr => "|&",
            Operator::Background => "&",
            Operator::Newline => "\\n",
        }
    }
}

/// A fully decomposed command line.
///
/// For `a && b | c` there are three segments and two operators (`&&`, `|`).
/// Command substitutions (`$(...)`, backticks, `<(...)`) are lifted out of
/// the outer text, replaced by `__SUBST__`, and their own segments are
/// collected (recursively) in `substitutions`.
#[derive(Debug, Clone, Default)]
pub struct ParsedPipeline {
    pub segments: Vec<String>,
    pub operators: Vec<Operator>,
    pub substitutions: Vec<String>,
}

impl ParsedPipeline {
    /// Every segment the checkers should see: outer segments first, then
    /// the segments found inside substitutions.
    pub fn all_segments(&self) -> impl Iterator<Item = &str> {
        self.segments
            .iter()
            .chain(self.substitutions.iter())
            .map(String::as_str)
    }

    pub fn is_compound(&self) -> bool {
        self.segments.len() > 1 || !self.substitutions.is_empty()
    }

    /// Operators in order, space-separated, for log lines.
    pub fn operator_summary(&self) -> String {
        self.operators
            .iter()
            .map(|op| op.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

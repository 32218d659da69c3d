use super::types::{Operator, ParsedPipeline};

/// Nesting cap for recursive substitution parsing.
const MAX_SUBST_DEPTH: usize = 8;

/// Split a command at shell operators (&&, ||, ;, |, |&, &, newline),
/// respecting single/double quotes, backslash escapes and here-documents.
///
/// Returns segments and the operators between them. An unterminated quote
/// leaves the rest of the input in the final segment.
fn split_compound_command(command: &str) -> (Vec<String>, Vec<Operator>) {
    let mut parts = Vec::new();
    let mut operators = Vec::new();
    let mut buf = String::new();
    let mut heredocs: Vec<String> = Vec::new();

    let chars: Vec<char> = command.chars().collect();
    let len = chars.len();
    let mut i = 0;
    let (mut sq, mut dq, mut esc) = (false, false, false);

    while i < len {
        let c = chars[i];

        if esc {
            buf.push(c);
            esc = false;
            i += 1;
            continue;
        }
        if c == '\\' && !sq {
            esc = true;
            buf.push(c);
            i += 1;
            continue;
        }
        if c == '\'' && !dq {
            sq = !sq;
            buf.push(c);
            i += 1;
            continue;
        }
        if c == '"' && !sq {
            dq = !dq;
            buf.push(c);
            i += 1;
            continue;
        }
        if sq || dq {
            buf.push(c);
            i += 1;
            continue;
        }

        // Here-document: remember the delimiter, the body follows the next newline
        if c == '<'
            && chars.get(i + 1) == Some(&'<')
            && chars.get(i + 2) != Some(&'<')
            && (i == 0 || chars[i - 1] != '<')
        {
            i = read_heredoc_start(&chars, i, &mut buf, &mut heredocs);
            continue;
        }

        if c == '\n' && !heredocs.is_empty() {
            buf.push(c);
            i += 1;
            i = consume_heredoc_bodies(&chars, i, &mut buf, &mut heredocs);
            continue;
        }

        // Two-char operators
        if let Some(&next) = chars.get(i + 1) {
            let op = match (c, next) {
                ('&', '&') => Some(Operator::And),
                ('|', '|') => Some(Operator::Or),
                ('|', '&') => Some(Operator::PipeErr),
                _ => None,
            };
            if let Some(op) = op {
                parts.push(buf.trim().to_string());
                operators.push(op);
                buf.clear();
                i += 2;
                continue;
            }
        }

        // Single-char operators
        let op = match c {
            '|' => Some(Operator::Pipe),
            ';' => Some(Operator::Semi),
            '\n' => Some(Operator::Newline),
            '&' if !is_redirection_amp(&chars, i) => Some(Operator::Background),
            _ => None,
        };
        if let Some(op) = op {
            parts.push(buf.trim().to_string());
            operators.push(op);
            buf.clear();
            i += 1;
            continue;
        }

        buf.push(c);
        i += 1;
    }

    let tail = buf.trim().to_string();
    if !tail.is_empty() {
        parts.push(tail);
    }

    // Filter empties (leading operators, blank lines, `a ;; b`)
    parts.retain(|p| !p.is_empty());

    (parts, operators)
}

/// `&` that belongs to a redirection (`&>`, `>&`, `2>&1`, `<&3`) rather
/// than backgrounding a command.
fn is_redirection_amp(chars: &[char], i: usize) -> bool {
    let prev = if i > 0 { chars.get(i - 1) } else { None };
    matches!(prev, Some('>') | Some('<')) || chars.get(i + 1) == Some(&'>')
}

/// Copy a `<<DELIM` / `<<-DELIM` redirection into `buf` and record the
/// unquoted delimiter. Returns the index just past the delimiter word.
fn read_heredoc_start(chars: &[char], start: usize, buf: &mut String, heredocs: &mut Vec<String>) -> usize {
    let len = chars.len();
    let mut i = start + 2;
    buf.push_str("<<");
    if chars.get(i) == Some(&'-') {
        buf.push('-');
        i += 1;
    }
    while i < len && (chars[i] == ' ' || chars[i] == '\t') {
        buf.push(chars[i]);
        i += 1;
    }

    let mut delim = String::new();
    while i < len {
        let c = chars[i];
        if c.is_whitespace() || matches!(c, ';' | '&' | '|' | '<' | '>' | '(' | ')') {
            break;
        }
        buf.push(c);
        if !matches!(c, '\'' | '"' | '\\') {
            delim.push(c);
        }
        i += 1;
    }

    if !delim.is_empty() {
        heredocs.push(delim);
    }
    i
}

/// Copy here-document bodies into `buf` verbatim, one per pending delimiter.
///
/// Returns the index of the newline that terminates the last delimiter line
/// (or the end of input), so the caller treats that newline as a separator.
fn consume_heredoc_bodies(chars: &[char], start: usize, buf: &mut String, heredocs: &mut Vec<String>) -> usize {
    let len = chars.len();
    let mut i = start;
    let pending: Vec<String> = std::mem::take(heredocs);
    let count = pending.len();

    for (n, delim) in pending.iter().enumerate() {
        loop {
            let line_start = i;
            while i < len && chars[i] != '\n' {
                i += 1;
            }
            let line: String = chars[line_start..i].iter().collect();
            buf.push_str(&line);
            if line.trim() == delim || i >= len {
                break;
            }
            buf.push('\n');
            i += 1;
        }
        if n + 1 < count && i < len {
            buf.push('\n');
            i += 1;
        }
    }
    i
}

/// Drop here-document bodies from a segment, keeping the command line and
/// its `<<DELIM` redirections. Body text is data, not arguments.
pub fn strip_heredoc_bodies(segment: &str) -> String {
    if !segment.contains("<<") {
        return segment.to_string();
    }
    let chars: Vec<char> = segment.chars().collect();
    let len = chars.len();
    let mut out = String::new();
    let mut heredocs: Vec<String> = Vec::new();
    let mut i = 0;
    let (mut sq, mut dq, mut esc) = (false, false, false);

    while i < len {
        let c = chars[i];
        if esc {
            out.push(c);
            esc = false;
            i += 1;
            continue;
        }
        if c == '\\' && !sq {
            esc = true;
        } else if c == '\'' && !dq {
            sq = !sq;
        } else if c == '"' && !sq {
            dq = !dq;
        } else if !sq && !dq {
            if c == '<'
                && chars.get(i + 1) == Some(&'<')
                && chars.get(i + 2) != Some(&'<')
                && (i == 0 || chars[i - 1] != '<')
            {
                i = read_heredoc_start(&chars, i, &mut out, &mut heredocs);
                continue;
            }
            if c == '\n' && !heredocs.is_empty() {
                let mut body = String::new();
                i = consume_heredoc_bodies(&chars, i + 1, &mut body, &mut heredocs);
                continue;
            }
        }
        out.push(c);
        i += 1;
    }
    out
}

/// Collect the text inside a balanced `(...)` starting just past the opening
/// paren. Returns the inner text and the index past the closing paren.
fn take_balanced(chars: &[char], start: usize) -> (String, usize) {
    let len = chars.len();
    let mut depth: u32 = 1;
    let mut inner = String::new();
    let (mut sq, mut dq, mut esc) = (false, false, false);
    let mut i = start;

    while i < len {
        let c = chars[i];
        if esc {
            inner.push(c);
            esc = false;
            i += 1;
            continue;
        }
        if c == '\\' && !sq {
            esc = true;
            inner.push(c);
            i += 1;
            continue;
        }
        if c == '\'' && !dq {
            sq = !sq;
        } else if c == '"' && !sq {
            dq = !dq;
        } else if !sq && !dq {
            if c == '(' {
                depth += 1;
            } else if c == ')' {
                depth -= 1;
                if depth == 0 {
                    return (inner, i + 1);
                }
            }
        }
        inner.push(c);
        i += 1;
    }

    (inner, i)
}

/// Extract command substitution contents from `$(...)`, backticks and
/// process substitutions `<(...)` / `>(...)`.
///
/// Returns the outer command with substitutions replaced by `__SUBST__`
/// placeholders, plus the extracted inner command strings.
/// `$()` is extracted even inside double quotes (the shell expands it there);
/// single quotes block all substitution.
fn extract_substitutions(command: &str) -> (String, Vec<String>) {
    let chars: Vec<char> = command.chars().collect();
    let len = chars.len();
    let mut outer = String::new();
    let mut inners = Vec::new();
    let mut i = 0;
    let (mut sq, mut dq, mut esc) = (false, false, false);

    while i < len {
        let c = chars[i];

        if esc {
            outer.push(c);
            esc = false;
            i += 1;
            continue;
        }
        if c == '\\' && !sq {
            esc = true;
            outer.push(c);
            i += 1;
            continue;
        }
        if c == '\'' && !dq {
            sq = !sq;
            outer.push(c);
            i += 1;
            continue;
        }
        if c == '"' && !sq {
            dq = !dq;
            outer.push(c);
            i += 1;
            continue;
        }
        if sq {
            outer.push(c);
            i += 1;
            continue;
        }

        let next = chars.get(i + 1).copied();

        // $( but not $(( arithmetic
        if c == '$' && next == Some('(') && chars.get(i + 2) != Some(&'(') {
            let (inner, end) = take_balanced(&chars, i + 2);
            push_inner(&mut inners, inner);
            outer.push_str("__SUBST__");
            i = end;
            continue;
        }

        // Backtick, no nesting
        if c == '`' {
            let mut inner = String::new();
            i += 1;
            while i < len && chars[i] != '`' {
                if chars[i] == '\\' && i + 1 < len {
                    inner.push(chars[i]);
                    inner.push(chars[i + 1]);
                    i += 2;
                    continue;
                }
                inner.push(chars[i]);
                i += 1;
            }
            if i < len {
                i += 1;
            }
            push_inner(&mut inners, inner);
            outer.push_str("__SUBST__");
            continue;
        }

        // Process substitution; the < or > prefix is dropped with it
        if (c == '<' || c == '>') && next == Some('(') && !dq {
            let (inner, end) = take_balanced(&chars, i + 2);
            push_inner(&mut inners, inner);
            outer.push_str("__SUBST__");
            i = end;
            continue;
        }

        outer.push(c);
        i += 1;
    }

    (outer, inners)
}

fn push_inner(inners: &mut Vec<String>, inner: String) {
    let trimmed = inner.trim();
    if !trimmed.is_empty() {
        inners.push(trimmed.to_string());
    }
}

/// Split a raw command line into its constituent simple commands.
///
/// Segments are trimmed, non-empty and keep their quoting verbatim.
/// Empty input yields an empty vector.
pub fn split_segments(command: &str) -> Vec<String> {
    split_compound_command(command).0
}

/// Parse a full command string into a [`ParsedPipeline`].
///
/// Substitutions are extracted first and parsed recursively; the outer
/// text is then split at compound operators.
pub fn parse(command: &str) -> ParsedPipeline {
    parse_at_depth(command, 0)
}

fn parse_at_depth(command: &str, depth: usize) -> ParsedPipeline {
    let (outer, inners) = extract_substitutions(command);

    // Without substitutions the outer text is the command itself
    let (segments, operators) = if inners.is_empty() {
        split_compound_command(command)
    } else {
        split_compound_command(&outer)
    };

    let mut substitutions = Vec::new();
    if depth < MAX_SUBST_DEPTH {
        for inner in &inners {
            let nested = parse_at_depth(inner, depth + 1);
            substitutions.extend(nested.segments);
            substitutions.extend(nested.substitutions);
        }
    } else {
        substitutions.extend(inners);
    }

    ParsedPipeline {
        segments,
        operators,
        substitutions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_empty() {
        assert!(split_segments("").is_empty());
        assert!(split_segments("   ").is_empty());
    }

    #[test]
    fn split_simple() {
        let (parts, ops) = split_compound_command("ls -la");
        assert_eq!(parts, vec!["ls -la"]);
        assert!(ops.is_empty());
    }

    #[test]
    fn split_and() {
        let (parts, ops) = split_compound_command("ls && pwd");
        assert_eq!(parts, vec!["ls", "pwd"]);
        assert_eq!(ops, vec![Operator::And]);
    }

    #[test]
    fn split_all_operators() {
        let (parts, ops) = split_compound_command("a && b || c; d | e |& f");
        assert_eq!(parts, vec!["a", "b", "c", "d", "e", "f"]);
        assert_eq!(
            ops,
            vec![
                Operator::And,
                Operator::Or,
                Operator::Semi,
                Operator::Pipe,
                Operator::PipeErr
            ]
        );
    }

    #[test]
    fn split_pipe() {
        let (parts, ops) = split_compound_command("cat file | grep pat");
        assert_eq!(parts, vec!["cat file", "grep pat"]);
        assert_eq!(ops, vec![Operator::Pipe]);
    }

    #[test]
    fn split_background() {
        let (parts, ops) = split_compound_command("sleep 1 & rm -rf x");
        assert_eq!(parts, vec!["sleep 1", "rm -rf x"]);
        assert_eq!(ops, vec![Operator::Background]);
        assert_eq!(split_segments("server --port 80 &"), vec!["server --port 80"]);
    }

    #[test]
    fn redirection_ampersand_does_not_split() {
        assert_eq!(split_segments("make 2>&1 | tee log"), vec!["make 2>&1", "tee log"]);
        assert_eq!(split_segments("cargo build &> out.txt"), vec!["cargo build &> out.txt"]);
        assert_eq!(split_segments("echo err >&2"), vec!["echo err >&2"]);
        assert_eq!(split_segments("read line <&3"), vec!["read line <&3"]);
        assert_eq!(split_segments("echo 'a & b'"), vec!["echo 'a & b'"]);
    }

    #[test]
    fn split_quoted_operator() {
        assert_eq!(split_segments("echo 'a && b'"), vec!["echo 'a && b'"]);
        assert_eq!(
            split_segments("git commit -m \"fix; then | more\""),
            vec!["git commit -m \"fix; then | more\""]
        );
    }

    #[test]
    fn split_escaped_separator() {
        assert_eq!(split_segments("echo a\\;b"), vec!["echo a\\;b"]);
    }

    #[test]
    fn split_unterminated_quote_keeps_tail() {
        assert_eq!(
            split_segments("ls && echo 'oops && rm x"),
            vec!["ls", "echo 'oops && rm x"]
        );
    }

    #[test]
    fn split_newlines() {
        assert_eq!(split_segments("ls\nrm foo\n"), vec!["ls", "rm foo"]);
    }

    #[test]
    fn split_drops_empty_segments() {
        assert_eq!(split_segments("; ls ;; pwd ;"), vec!["ls", "pwd"]);
    }

    #[test]
    fn heredoc_body_stays_in_segment() {
        let cmd = "cat <<'EOF' > notes.txt\nrm everything\nEOF\nls";
        let parts = split_segments(cmd);
        assert_eq!(parts.len(), 2);
        assert!(parts[0].starts_with("cat <<'EOF'"));
        assert!(parts[0].contains("rm everything"));
        assert_eq!(parts[1], "ls");
    }

    #[test]
    fn strip_heredoc_keeps_command_line() {
        let seg = "cat <<EOF > notes.md\nload values from .env\nEOF";
        assert_eq!(strip_heredoc_bodies(seg), "cat <<EOF > notes.md");
        assert_eq!(strip_heredoc_bodies("cat .env"), "cat .env");
        // Quoted text mentioning << is not a here-document
        assert_eq!(strip_heredoc_bodies("echo '<<x\ny'"), "echo '<<x\ny'");
    }

    #[test]
    fn heredoc_dash_and_herestring() {
        let parts = split_segments("cat <<-END\n\tbody\n\tEND\npwd");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1], "pwd");
        // <<< is a here-string, not a here-document
        assert_eq!(split_segments("cat <<< hi\nls"), vec!["cat <<< hi", "ls"]);
    }

    #[test]
    fn extract_dollar_paren() {
        let (outer, inners) = extract_substitutions("ls $(which cargo)");
        assert_eq!(outer, "ls __SUBST__");
        assert_eq!(inners, vec!["which cargo"]);
    }

    #[test]
    fn extract_backtick() {
        let (outer, inners) = extract_substitutions("echo `whoami`");
        assert_eq!(outer, "echo __SUBST__");
        assert_eq!(inners, vec!["whoami"]);
    }

    #[test]
    fn extract_single_quoted_suppressed() {
        let (_, inners) = extract_substitutions("echo '$(rm -rf /)'");
        assert!(inners.is_empty());
    }

    #[test]
    fn extract_double_quoted_expanded() {
        let (_, inners) = extract_substitutions("echo \"$(cat .env)\"");
        assert_eq!(inners, vec!["cat .env"]);
    }

    #[test]
    fn extract_process_substitution() {
        let (outer, inners) = extract_substitutions("diff <(sort a) <(sort b)");
        assert!(!outer.contains('<'));
        assert_eq!(inners, vec!["sort a", "sort b"]);
    }

    #[test]
    fn arithmetic_is_not_substitution() {
        let (outer, inners) = extract_substitutions("echo $((1 + 2))");
        assert_eq!(outer, "echo $((1 + 2))");
        assert!(inners.is_empty());
    }

    #[test]
    fn parse_nested_substitutions() {
        let p = parse("echo $(cat $(ls .env) && pwd)");
        assert_eq!(p.segments, vec!["echo __SUBST__"]);
        assert_eq!(p.substitutions, vec!["cat __SUBST__", "pwd", "ls .env"]);
        assert!(p.is_compound());
    }

    #[test]
    fn parse_plain_command_is_verbatim() {
        let p = parse("git commit -m \"x\"");
        assert_eq!(p.segments, vec!["git commit -m \"x\""]);
        assert!(!p.is_compound());
        assert_eq!(p.all_segments().count(), 1);
    }

    #[test]
    fn operator_summary_lists_separators() {
        let p = parse("make 2>&1 | tee log && sleep 1 & ls; pwd");
        assert_eq!(p.operator_summary(), "| && & ;");
        assert_eq!(parse("ls").operator_summary(), "");
    }
}

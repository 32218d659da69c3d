/// True for a `KEY=value` shell assignment word.
fn is_assignment(word: &str) -> bool {
    let Some((key, _)) = word.split_once('=') else {
        return false;
    };
    !key.is_empty()
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && key
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
}

/// Tokenize a command segment into words using shlex (POSIX word splitting).
pub fn tokenize(command: &str) -> Vec<String> {
    shlex::split(command).unwrap_or_else(|| {
        // Fallback: simple whitespace splitting if shlex can't parse
        command.split_whitespace().map(String::from).collect()
    })
}

/// Extract leading KEY=VALUE pairs from a tokenized command.
pub fn env_vars(words: &[String]) -> Vec<(String, String)> {
    words
        .iter()
        .take_while(|w| is_assignment(w))
        .filter_map(|w| w.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Extract the first real command word, skipping leading VAR=value
/// assignments, and reduce it to its basename: `/usr/bin/rm` → `rm`.
pub fn base_command(words: &[String]) -> String {
    let word = words
        .iter()
        .find(|w| !is_assignment(w))
        .map(String::as_str)
        .unwrap_or("");
    // `\rm` bypasses aliases but is still rm
    let word = word.trim_start_matches('\\');
    match word.rsplit_once('/') {
        Some((_, name)) if !name.is_empty() => name.to_string(),
        _ => word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(cmd: &str) -> String {
        base_command(&tokenize(cmd))
    }

    #[test]
    fn base_command_simple() {
        assert_eq!(base("ls -la"), "ls");
    }

    #[test]
    fn base_command_with_env() {
        assert_eq!(base("GIT_CONFIG_GLOBAL=~/.gitconfig.ai git push"), "git");
    }

    #[test]
    fn base_command_absolute_path() {
        assert_eq!(base("/bin/rm file.txt"), "rm");
        assert_eq!(base("/usr/bin/rm -rf dir/"), "rm");
    }

    #[test]
    fn base_command_relative_path() {
        assert_eq!(base("./script.sh --flag"), "script.sh");
    }

    #[test]
    fn base_command_escaped_alias() {
        assert_eq!(base_command(&["\\rm".to_string(), "x".to_string()]), "rm");
    }

    #[test]
    fn base_command_empty() {
        assert_eq!(base(""), "");
    }

    #[test]
    fn env_vars_multiple() {
        let vars = env_vars(&tokenize("A=1 B=2 cmd C=3"));
        assert_eq!(
            vars,
            vec![("A".into(), "1".into()), ("B".into(), "2".into())]
        );
    }

    #[test]
    fn env_vars_quoted_value() {
        let vars = env_vars(&tokenize("FOO=\"bar baz\" cmd"));
        assert_eq!(vars, vec![("FOO".into(), "bar baz".into())]);
    }

    #[test]
    fn env_vars_none() {
        assert!(env_vars(&tokenize("cmd --flag")).is_empty());
    }

    #[test]
    fn tokenize_quoted() {
        assert_eq!(tokenize("echo 'hello world'"), vec!["echo", "hello world"]);
        assert_eq!(tokenize("echo \"hello world\""), vec!["echo", "hello world"]);
    }

    #[test]
    fn tokenize_unbalanced_falls_back() {
        assert_eq!(tokenize("echo 'oops"), vec!["echo", "'oops"]);
    }
}

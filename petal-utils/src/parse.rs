/// Strip a mention of `user_id` from the start of `content`.
pub fn strip_mention_prefix(content: &str, user_id: u64) -> Option<&str> {
    let rest = content.strip_prefix("<@")?;
    let rest = rest.strip_prefix('!').unwrap_or(rest);
    let rest = rest.strip_prefix(user_id.to_string().as_str())?;

    rest.strip_prefix('>')
}

/// Split invocation text into a lowercase command name and its argument tail.
///
/// Whitespace between the prefix and the name is ignored.
pub fn split_invocation(rest: &str) -> Option<(String, &str)> {
    let rest = rest.trim_start();
    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().filter(|name| !name.is_empty())?;
    let args = parts.next().unwrap_or_default().trim();

    Some((name.to_lowercase(), args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_both_mention_forms() {
        assert_eq!(strip_mention_prefix("<@7> help", 7), Some(" help"));
        assert_eq!(strip_mention_prefix("<@!7>ping", 7), Some("ping"));
        assert_eq!(strip_mention_prefix("<@70> help", 7), None);
        assert_eq!(strip_mention_prefix("help", 7), None);
    }

    #[test]
    fn splits_name_and_arguments() {
        assert_eq!(
            split_invocation("  HeLp  prefix "),
            Some(("help".to_owned(), "prefix"))
        );
        assert_eq!(split_invocation("ping"), Some(("ping".to_owned(), "")));
        assert_eq!(split_invocation("   "), None);
    }
}

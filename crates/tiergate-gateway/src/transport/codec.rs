//! Decode-once command parsing.
//!
//! Message content => `ParsedCommand` (lower-cased name + raw argument tokens).
//! Anything that is not a prefixed command decodes to `None`.

/// A prefixed command split into its name and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub args: Vec<String>,
}

impl ParsedCommand {
    pub fn arg(&self, i: usize) -> Option<&str> {
        self.args.get(i).map(String::as_str)
    }

    /// Arguments that are not platform mentions (`<@..>`, `<@&..>`, `<#..>`).
    pub fn plain_args(&self) -> Vec<&str> {
        self.args
            .iter()
            .map(String::as_str)
            .filter(|a| !is_mention(a))
            .collect()
    }
}

pub fn decode(content: &str, prefix: &str) -> Option<ParsedCommand> {
    let body = content.strip_prefix(prefix)?.trim();
    let mut tokens = body.split(' ').filter(|t| !t.is_empty()).map(str::to_string);

    let name = tokens.next()?.to_lowercase();
    let mut args: Vec<String> = tokens.collect();
    let name = collapse_alias(name, &mut args);

    Some(ParsedCommand { name, args })
}

/// `add cargo` / `rem cargo` are spelled as two words by some users.
fn collapse_alias(name: String, args: &mut Vec<String>) -> String {
    let joined = match (name.as_str(), args.first().map(|a| a.to_lowercase())) {
        ("add", Some(next)) if next == "cargo" => "addcargo",
        ("rem", Some(next)) if next == "cargo" => "remcargo",
        _ => return name,
    };
    args.remove(0);
    joined.to_string()
}

pub fn is_mention(token: &str) -> bool {
    token.starts_with("<@") || token.starts_with("<#")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(c: &ParsedCommand) -> Vec<&str> {
        c.args.iter().map(String::as_str).collect()
    }

    #[test]
    fn requires_prefix() {
        assert!(decode("setup list", "!").is_none());
        assert!(decode("!", "!").is_none());
        assert!(decode("!   ", "!").is_none());
    }

    #[test]
    fn lowercases_name_only() {
        let c = decode("!Setup CreateTier Mods 3", "!").unwrap();
        assert_eq!(c.name, "setup");
        assert_eq!(args(&c), vec!["CreateTier", "Mods", "3"]);
    }

    #[test]
    fn collapses_repeated_spaces() {
        let c = decode("!!  ban   <@1>  spam ", "!!").unwrap();
        assert_eq!(c.name, "ban");
        assert_eq!(args(&c), vec!["<@1>", "spam"]);
        assert_eq!(c.plain_args(), vec!["spam"]);
    }

    #[test]
    fn two_word_cargo_aliases() {
        let c = decode("!add Cargo <@&5> <@9>", "!").unwrap();
        assert_eq!(c.name, "addcargo");
        assert_eq!(args(&c), vec!["<@&5>", "<@9>"]);

        let c = decode("!rem cargo <@&5> <@9>", "!").unwrap();
        assert_eq!(c.name, "remcargo");

        let c = decode("!add <@&5>", "!").unwrap();
        assert_eq!(c.name, "add");
    }

    #[test]
    fn mentions() {
        assert!(is_mention("<@123>"));
        assert!(is_mention("<@&123>"));
        assert!(is_mention("<#123>"));
        assert!(!is_mention("10m"));
    }
}

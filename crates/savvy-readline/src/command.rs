//! REPL input parsing.

/// What a line of REPL input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    /// `/prefs` with no arguments.
    OpenPreferences,
    ClosePreferences,
    ClearPreferences,
    /// `/prefs key=value ...`, assignments left unparsed.
    SetPreferences(String),
    Guided,
    Back,
    Toggle,
    Reset,
    /// `/key` with no argument shows whether a key is configured.
    Key(Option<String>),
    SignIn { email: String, password: String },
    SignOut,
    /// A bare number picks a pending option (1-based).
    Pick(usize),
    Chat(String),
    Unknown(String),
}

pub const COMMANDS: [&str; 11] = [
    "/prefs", "/guided", "/back", "/toggle", "/reset", "/key", "/signin", "/signout", "/help",
    "quit", "exit",
];

pub fn parse(line: &str) -> Command {
    let line = line.trim();
    if line == "quit" || line == "exit" {
        return Command::Quit;
    }
    if let Ok(n) = line.parse::<usize>() {
        return Command::Pick(n);
    }
    if !line.starts_with('/') {
        return Command::Chat(line.to_string());
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    match name {
        "/help" => Command::Help,
        "/prefs" if rest.is_empty() => Command::OpenPreferences,
        "/prefs" if rest == "close" => Command::ClosePreferences,
        "/prefs" if rest == "clear" => Command::ClearPreferences,
        "/prefs" => Command::SetPreferences(rest.to_string()),
        "/guided" => Command::Guided,
        "/back" => Command::Back,
        "/toggle" => Command::Toggle,
        "/reset" => Command::Reset,
        "/key" if rest.is_empty() => Command::Key(None),
        "/key" => Command::Key(Some(rest.to_string())),
        "/signin" => match rest.split_once(char::is_whitespace) {
            Some((email, password)) => Command::SignIn {
                email: email.to_string(),
                password: password.trim().to_string(),
            },
            None => Command::Unknown(line.to_string()),
        },
        "/signout" => Command::SignOut,
        _ => Command::Unknown(line.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slash_commands() {
        assert_eq!(parse("/prefs"), Command::OpenPreferences);
        assert_eq!(parse("/prefs clear"), Command::ClearPreferences);
        assert_eq!(parse("/prefs close"), Command::ClosePreferences);
        assert_eq!(
            parse("/prefs category=Haute Couture"),
            Command::SetPreferences("category=Haute Couture".to_string())
        );
        assert_eq!(parse("/key"), Command::Key(None));
        assert_eq!(parse("/key abc123"), Command::Key(Some("abc123".to_string())));
        assert_eq!(
            parse("/signin ana@example.com secret1"),
            Command::SignIn {
                email: "ana@example.com".to_string(),
                password: "secret1".to_string()
            }
        );
        assert!(matches!(parse("/signin ana@example.com"), Command::Unknown(_)));
        assert!(matches!(parse("/dance"), Command::Unknown(_)));
    }

    #[test]
    fn test_parse_plain_input() {
        assert_eq!(parse(" quit "), Command::Quit);
        assert_eq!(parse("2"), Command::Pick(2));
        assert_eq!(
            parse("what's trending?"),
            Command::Chat("what's trending?".to_string())
        );
    }
}

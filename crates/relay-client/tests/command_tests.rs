//! Command parser tests.

#[cfg(test)]
mod tests {
    use relay_client::Command;

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(Command::parse("PING"), Some(Command::Ping));
        assert_eq!(Command::parse("Help"), Some(Command::Help));
        assert_eq!(Command::parse("QUIT"), Some(Command::Quit));
    }

    #[test]
    fn help_aliases() {
        assert_eq!(Command::parse("help"), Some(Command::Help));
        assert_eq!(Command::parse("commands"), Some(Command::Help));
    }

    #[test]
    fn quit_aliases() {
        assert_eq!(Command::parse("quit"), Some(Command::Quit));
        assert_eq!(Command::parse("exit"), Some(Command::Quit));
    }

    #[test]
    fn broadcast_keeps_message_casing() {
        assert_eq!(
            Command::parse("BROADCAST Hello World"),
            Some(Command::Broadcast("Hello World".into()))
        );
    }

    #[test]
    fn broadcast_alias() {
        assert_eq!(
            Command::parse("bc hi"),
            Some(Command::Broadcast("hi".into()))
        );
    }

    #[test]
    fn broadcast_without_message_is_usage() {
        assert_eq!(
            Command::parse("broadcast"),
            Some(Command::Usage("Usage: broadcast <message>"))
        );
    }

    #[test]
    fn private_splits_target_and_message() {
        assert_eq!(
            Command::parse("private abc-123 hello over there"),
            Some(Command::Private {
                target_id: "abc-123".into(),
                message: "hello over there".into(),
            })
        );
    }

    #[test]
    fn pm_alias() {
        assert_eq!(
            Command::parse("pm abc hi"),
            Some(Command::Private {
                target_id: "abc".into(),
                message: "hi".into(),
            })
        );
    }

    #[test]
    fn private_without_message_is_usage() {
        assert_eq!(
            Command::parse("private abc-123"),
            Some(Command::Usage("Usage: private <connectionId> <message>"))
        );
        assert_eq!(
            Command::parse("private"),
            Some(Command::Usage("Usage: private <connectionId> <message>"))
        );
    }

    #[test]
    fn echo_without_message_is_usage() {
        assert_eq!(
            Command::parse("echo"),
            Some(Command::Usage("Usage: echo <message>"))
        );
    }

    #[test]
    fn extra_whitespace_is_tolerated() {
        assert_eq!(
            Command::parse("  broadcast   spaced  out  "),
            Some(Command::Broadcast("spaced  out".into()))
        );
    }

    #[test]
    fn blank_lines_parse_to_none() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   "), None);
    }

    #[test]
    fn unknown_keyword() {
        assert_eq!(Command::parse("frobnicate"), Some(Command::Unknown));
    }
}

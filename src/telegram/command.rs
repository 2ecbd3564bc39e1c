#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    Balance,
    Unknown(String),
}

impl BotCommand {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();

        let Some(command) = text.strip_prefix('/') else {
            return BotCommand::Unknown(text.to_string());
        };

        // group chats address commands as /balance@MyBot
        let command = command.split_whitespace().next().unwrap_or_default();
        let command = command.split('@').next().unwrap_or_default();

        match command.to_lowercase().as_str() {
            "start" => BotCommand::Start,
            "help" => BotCommand::Help,
            "balance" => BotCommand::Balance,
            _ => BotCommand::Unknown(text.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(BotCommand::parse("/start"), BotCommand::Start);
        assert_eq!(BotCommand::parse("/help"), BotCommand::Help);
        assert_eq!(BotCommand::parse("  /balance  "), BotCommand::Balance);
        assert_eq!(BotCommand::parse("/Balance"), BotCommand::Balance);
        assert_eq!(BotCommand::parse("/balance@BalanceBot"), BotCommand::Balance);
        assert_eq!(BotCommand::parse("/balance now"), BotCommand::Balance);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            BotCommand::parse("/portfolio"),
            BotCommand::Unknown("/portfolio".to_string())
        );
        assert_eq!(
            BotCommand::parse("balance"),
            BotCommand::Unknown("balance".to_string())
        );
        assert!(matches!(BotCommand::parse("/"), BotCommand::Unknown(_)));
    }
}

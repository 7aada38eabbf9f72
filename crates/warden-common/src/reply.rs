//! Helpers for building chat reply messages.

use crate::types::Author;

const SUCCESS_EMOJI: &str = "\u{2705}";
const ERROR_EMOJI: &str = "\u{274c}";

/// Prefixes the message with the author's mention: `@DisplayName message`.
#[must_use]
pub fn mention(message: &str, author: &Author) -> String {
    format!("{} {message}", author.mention())
}

/// Prefixes the message with a checkmark emoji, indicating success.
#[must_use]
pub fn success(message: &str) -> String {
    format!("{SUCCESS_EMOJI} {message}")
}

/// Prefixes the message with a cross mark emoji, indicating failure.
#[must_use]
pub fn failure(message: &str) -> String {
    format!("{ERROR_EMOJI} {message}")
}

/// Combines [`success`] and [`mention`].
#[must_use]
pub fn success_mention(message: &str, author: &Author) -> String {
    success(&mention(message, author))
}

/// Combines [`failure`] and [`mention`].
#[must_use]
pub fn failure_mention(message: &str, author: &Author) -> String {
    failure(&mention(message, author))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> Author {
        Author {
            login: "sep".to_string(),
            display_name: "Sep".to_string(),
            user_id: None,
            is_moderator: false,
            is_subscriber: false,
        }
    }

    #[test]
    fn test_mention() {
        assert_eq!(mention("Pong!", &author()), "@Sep Pong!");
    }

    #[test]
    fn test_decorated_replies() {
        assert_eq!(
            success_mention("Added global command: hug", &author()),
            "\u{2705} @Sep Added global command: hug"
        );
        assert_eq!(
            failure_mention("Invalid format for command add.", &author()),
            "\u{274c} @Sep Invalid format for command add."
        );
    }
}

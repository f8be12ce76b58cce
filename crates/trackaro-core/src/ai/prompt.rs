//! Classification prompt shared by all HTTP backends

/// Placeholder replaced with the user's message
const MESSAGE_PLACEHOLDER: &str = "{{message}}";

const CLASSIFY_MESSAGE_TEMPLATE: &str = r#"You classify messages sent to a personal expense tracker.

Decide whether the message reports an expense or asks about past spending.

Reply with exactly one JSON object and nothing else, using one of these shapes:
{"type": "expense", "amount": <number>, "category": "<short category or null>", "description": "<what was bought or null>"}
{"type": "query", "category": "<category asked about or null>", "days": <look-back days or null>}

Amounts are plain numbers without currency symbols. Categories are one or two lowercase words such as "food", "travel" or "rent".

Message: {{message}}"#;

/// Render the classification prompt for `message`
pub fn classify_message_prompt(message: &str) -> String {
    CLASSIFY_MESSAGE_TEMPLATE.replace(MESSAGE_PLACEHOLDER, message.trim())
}

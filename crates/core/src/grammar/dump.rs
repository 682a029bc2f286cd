use super::ast::Message;

/// Serialize a message to a pretty-printed JSON string.
pub fn to_pretty_json(msg: &Message) -> String {
    serde_json::to_string_pretty(msg).expect("Message serialization cannot fail")
}

/// Serialize a message to a `serde_json::Value`.
pub fn to_json_value(msg: &Message) -> serde_json::Value {
    serde_json::to_value(msg).expect("Message serialization cannot fail")
}

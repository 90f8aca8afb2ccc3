//! System notice texts shown in the message list.

/// First line of an empty visitor conversation.
pub const VISITOR_WELCOME: &str = "Welcome! An agent will be with you shortly.";

/// Agent view of a conversation with an empty history.
pub const AGENT_EMPTY_HISTORY: &str = "No messages in this conversation yet.";

/// Agent view of a customer who has never chatted.
pub const AGENT_NEW_CHAT: &str = "This user has no chat history. Send a message to begin.";

/// Appended when the channel drops.
pub const CONNECTION_LOST: &str = "Connection lost. Trying to reconnect...";

/// Appended when the channel could not be established.
pub const CHANNEL_FAILED: &str = "Unable to reach the chat server.";

/// Appended when a history push could not be read.
pub const HISTORY_FAILED: &str = "Failed to load conversation history.";

/// Handler modules for Discord events
mod command;
mod game;
mod reply;

// Re-export main handler functions
pub use command::handle_message;
pub use game::handle_reaction_add;

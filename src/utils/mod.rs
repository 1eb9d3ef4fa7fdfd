/// Utility modules for common functionality
pub mod channel_utils;
pub mod emotes;
pub mod templates;

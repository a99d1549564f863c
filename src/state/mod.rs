/// State management module
///
/// This module handles all screen state:
/// - Shared data structures (data.rs)
/// - Search result groups, most recent first (results.rs)
/// - The single expanded photo (selection.rs)

pub mod data;
pub mod results;
pub mod selection;

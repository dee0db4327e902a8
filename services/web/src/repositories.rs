//! Repositories for database operations

pub mod movie;
pub mod review;
pub mod user;
pub mod vote;

pub use movie::MovieRepository;
pub use review::ReviewRepository;
pub use user::UserRepository;
pub use vote::VoteRepository;

/// Escape `LIKE` wildcards so user input matches literally
fn escape_like(fragment: &str) -> String {
    fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Pattern matching titles that contain the fragment
pub(crate) fn like_pattern(fragment: &str) -> String {
    format!("%{}%", escape_like(fragment))
}

/// Pattern matching titles that start with the fragment
pub(crate) fn prefix_pattern(fragment: &str) -> String {
    format!("{}%", escape_like(fragment))
}

//! Root greeting.

/// Message returned by `GET /`.
pub const ROOT_MESSAGE: &str = "Hello from lamina on Lambda via Github Actions!";

/// Returns the greeting served at the API root.
pub fn root_message() -> &'static str {
    ROOT_MESSAGE
}

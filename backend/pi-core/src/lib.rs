pub mod api;
pub mod config;
pub mod error;
pub mod high_score;
pub mod sequential;

#[cfg(test)]
mod tests;

pub const PI_BACKEND_HOSTNAME: &str = "localhost";
pub const PI_BACKEND_PORT: u16 = 8000;
pub const DEFAULT_API_BASE_URL: &str =
    const_format::concatcp!("http://", PI_BACKEND_HOSTNAME, ":", PI_BACKEND_PORT, "/api/");

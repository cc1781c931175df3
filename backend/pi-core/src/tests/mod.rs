mod config;
mod sequential;

mod api;
mod config;
mod high_score;
mod sequential;

mod digit;
mod game;

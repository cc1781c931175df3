mod game;
mod helpers;
mod http;

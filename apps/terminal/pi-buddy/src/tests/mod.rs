mod command;
mod logger;
mod view;

mod api;
mod logger;

// tests/integration/main.rs

mod config_loading;
mod real_notify;

// tests/property/main.rs

mod change_mask;
mod subscription_table;

/// Integration test crate root
mod basic_integration;

/// Unit test crate root
mod analytics_tests;

//! Integration tests for kgen-lib: generation end to end over manifest
//! trees written to temporary directories.

mod common;
mod generate_tests;
mod property_tests;

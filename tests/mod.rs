mod common;
mod recipient_tests;

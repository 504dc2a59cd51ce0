/// Unit test target: library behavior exercised through the public API
mod basic_tests;
mod streak_properties;

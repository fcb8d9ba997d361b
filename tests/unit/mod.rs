/// Unit tests of the public domain and service API
mod basic_tests;
mod streak_properties;

/// Integration tests against a real SQLite database file
mod basic_integration;
mod http_workflow;

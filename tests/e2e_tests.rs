//! End-to-end tests driving the wingetup binary

mod e2e;

//! Read-only movie catalog.

pub mod handlers;

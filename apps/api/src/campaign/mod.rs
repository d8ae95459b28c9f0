// Campaign generation, history, and social-post bookkeeping.
// Copy is produced through `generator`; engagement comes through `social`.

pub mod handlers;
pub mod models;
pub mod service;

//! Multipart forms accepted by the HTTP layer.

pub mod clients;

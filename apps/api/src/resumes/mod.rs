// Résumé uploads: generated storage names, byte storage backends, HTTP handlers.

pub mod handlers;
pub mod naming;
pub mod storage;

pub mod ingest;
pub mod integrations;

pub mod accs;
pub mod auth;
pub mod games;
pub mod posts;
pub mod reviews;
pub mod settings;
pub mod shops;
pub mod stats;

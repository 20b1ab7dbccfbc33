pub mod analytics;
pub mod exchange;
pub mod export;
pub mod master_data;
pub mod pairing;
pub mod participant;
pub mod roster;
pub mod session;
pub mod settings;
pub mod validation;

pub mod billing;
pub mod clients;
pub mod health;
pub mod leads;
pub mod security;
pub mod users;
pub mod workspace;

//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_account_repository;
mod in_memory_crm_repository;
mod postgres_client_repository;
mod postgres_errors;
mod postgres_invoice_repository;
mod postgres_lead_repository;
mod postgres_user_repository;
mod postgres_workspace_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_account_repository::InMemoryAccountRepository;
pub use in_memory_crm_repository::InMemoryCrmRepository;
pub use postgres_client_repository::PostgresClientRepository;
pub use postgres_invoice_repository::PostgresInvoiceRepository;
pub use postgres_lead_repository::PostgresLeadRepository;
pub use postgres_user_repository::PostgresUserRepository;
pub use postgres_workspace_repository::PostgresWorkspaceRepository;

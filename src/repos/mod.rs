pub mod error;
pub mod expense_repo;
pub mod memory_repo;

pub use error::RepoError;
pub use expense_repo::{ExpenseRepo, PgExpenseRepo};
pub use memory_repo::MemoryExpenseRepo;

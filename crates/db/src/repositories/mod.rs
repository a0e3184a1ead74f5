//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every call runs under the repository's deadline and reports failures as
//! [`RepositoryError`].

pub mod beneficiary;
pub mod category;
pub mod distribution;
pub mod donor;
pub mod error;
pub mod program;
pub mod receipt;
pub mod report;
pub mod user;

mod references;
mod search;

pub use beneficiary::{BeneficiaryFilter, BeneficiaryRepository, BeneficiaryView};
pub use category::{CategoryFilter, CategoryRepository};
pub use distribution::{
    DistributionDetail, DistributionFilter, DistributionItemView, DistributionRepository,
    DistributionSummary,
};
pub use donor::{DonorFilter, DonorRepository};
pub use error::RepositoryError;
pub use program::{ProgramFilter, ProgramRepository};
pub use receipt::{ReceiptDetail, ReceiptFilter, ReceiptRepository, ReceiptSummary};
pub use report::ReportRepository;
pub use user::{UserFilter, UserRepository};

//! Repository abstractions for data access.
//!
//! Every write takes the owning organization id and the acting user id
//! explicitly; repositories never read them from ambient state. Reads
//! exclude soft-deleted rows.

mod bank;
mod category;
mod customer;
mod e_wallet;
mod invoice;
mod organization;
mod ownership;
mod password_reset;
mod payment;
mod payment_term;
mod photo;
mod product;
mod purchase;
mod supplier;
mod token;
mod unit;
mod user;

#[cfg(test)]
mod registration_integration_tests;
#[cfg(test)]
mod settlement_integration_tests;

pub use bank::{BankInput, BankRepository};
pub use category::{CategoryInput, CategoryRepository};
pub use customer::{CustomerInput, CustomerRepository};
pub use e_wallet::{EWalletInput, EWalletRepository};
pub use invoice::{InvoiceRepository, InvoiceSettingInput};
pub use organization::{OrganizationInput, OrganizationRepository};
pub use ownership::{OwnershipChecker, RefEntity};
pub use password_reset::PasswordResetRepository;
pub use payment::PaymentRepository;
pub use payment_term::{PaymentTermInput, PaymentTermRepository};
pub use photo::{PhotoRecord, PhotoRepository};
pub use product::{ProductInput, ProductRepository, ProductTaxInput};
pub use purchase::PurchaseRepository;
pub use supplier::{SupplierInput, SupplierRepository};
pub use token::AccessTokenRepository;
pub use unit::{UnitInput, UnitRepository};
pub use user::{ADMINISTRATOR_ROLE, NewRegistration, UserRepository};

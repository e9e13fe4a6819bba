pub mod analytics;
pub mod billing;
pub mod catalog;
pub mod ledger;
pub mod market;
pub mod sessions;
pub mod users;
pub mod wallet;

pub use analytics::{MarketplaceStats, SellerStats, StatsReporter};
pub use billing::BillingQuote;
pub use catalog::{ContentCatalog, ContentLookup, ContentSnapshot};
pub use ledger::TransactionLedger;
pub use market::Marketplace;
pub use sessions::SessionStore;
pub use users::UserStore;
pub use wallet::WalletStore;

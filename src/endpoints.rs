//! The API endpoint URIs.

/// The health check route.
pub const HEALTHZ: &str = "/api/healthz";
/// The route to create and list categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to get, update or delete a single category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// The route to create and list transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to get, update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route for the per-category monthly spending/income summary.
pub const TRANSACTIONS_SUMMARY: &str = "/api/reports/transactions-summary";
/// The route for the net monthly savings view.
pub const MONTHLY_SAVINGS: &str = "/api/reports/monthly-savings";

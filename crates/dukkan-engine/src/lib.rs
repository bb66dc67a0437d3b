//! # dukkan-engine: Checkout & Access Control for Dukkan POS
//!
//! The orchestration layer store terminals talk to.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Terminal (cashier / warehouse / manager screens — out of scope)    │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌────────────────────────────────────────────────────────────────┐ │
//! │  │                 dukkan-engine (THIS CRATE)                     │ │
//! │  │                                                                │ │
//! │  │  ┌──────────────────┐   ┌──────────────────┐   ┌────────────┐  │ │
//! │  │  │  CheckoutEngine  │   │  AccessControl   │   │  Session   │  │ │
//! │  │  │  add_item        │   │  authenticate    │   │  explicit, │  │ │
//! │  │  │  finalize        │   │  register        │   │  threaded  │  │ │
//! │  │  │  cancel          │   │  change creds    │   │  by value  │  │ │
//! │  │  └──────────────────┘   └──────────────────┘   └────────────┘  │ │
//! │  └────────────────────────────┬───────────────────────────────────┘ │
//! │                               ▼                                     │
//! │        dukkan-db (repositories, sequencer)  +  dukkan-core          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reporting queries are read-side only and exposed directly by
//! [`dukkan_db::ReportRepository`]; the engine adds nothing on top of
//! them.
//!
//! ## Example
//! ```rust,ignore
//! let db = Database::new(DbConfig::new("store.db")).await?;
//! let access = AccessControl::new(db.clone());
//! let engine = CheckoutEngine::new(db);
//!
//! let session = access.authenticate("cashier", "456").await?;
//! let mut cart = Cart::new();
//! engine.add_item(&mut cart, "Milk", 2).await?;
//! let receipt = engine.finalize(&session, &cart, DiscountRate::zero()).await?;
//! cart.clear();
//! ```

pub mod auth;
pub mod checkout;
pub mod error;
pub mod session;

pub use auth::{hash_password, AccessControl};
pub use checkout::{AddedLine, CheckoutEngine, Receipt, ReceiptLine};
pub use error::{EngineError, EngineResult};
pub use session::Session;

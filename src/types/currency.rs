//! Currency definitions issued by banks

use serde::{Deserialize, Serialize};

/// Currency identifier
pub type CurrencyId = String;

/// A currency known to the ledger
///
/// Currencies are created out-of-band together with the seed data and never
/// change afterwards. Every balance in the model must reference one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Currency {
    pub currency_id: CurrencyId,
    pub name: String,
    pub symbol: String,
    /// Bank that issued the currency
    pub bank_id: String,
    pub created_at: String,
}

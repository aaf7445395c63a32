//! TOML statement configuration.
//!
//! A statement file names the total price, the parties with their shares
//! (decimal, `"25%"`, or `"1/3"` text) and itemized expenses keyed by
//! category, and optional labels for the free-text "other" slots:
//!
//! ```toml
//! total = 18300000
//! other_labels = ["Cleaning"]
//!
//! [[party]]
//! name = "Alice"
//! share = "1/4"
//!
//! [party.expenses]
//! agency_fee = 100000
//! other = [2000]
//! ```

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use splitsheet_engine::engine::{
    AllocationError, Distribution, ExpenseCategory, ExpenseSlot, MAX_OTHER_SLOTS, Money, Party,
    Share,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("party {party}: too many \"other\" expense entries: {count} (at most {limit})")]
    TooManyOtherEntries {
        party: String,
        count: usize,
        limit: usize,
    },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    total: i64,
    #[serde(default)]
    other_labels: Vec<String>,
    #[serde(default, rename = "party")]
    parties: Vec<PartyConfig>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PartyConfig {
    name: String,
    #[serde(default)]
    share: Option<ShareValue>,
    #[serde(default)]
    expenses: ExpensesConfig,
}

/// A share is either a bare fraction (`0.25`) or text (`"25%"`, `"1/4"`).
#[derive(Deserialize)]
#[serde(untagged)]
enum ShareValue {
    Fraction(f64),
    Text(String),
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ExpensesConfig {
    agency_fee: Option<i64>,
    land_value_increment_tax: Option<i64>,
    tax_remittance_fee: Option<i64>,
    land_value_tax: Option<i64>,
    house_tax: Option<i64>,
    tax_proration: Option<i64>,
    second_mortgage: Option<i64>,
    utilities: Option<i64>,
    scrivener_fee: Option<i64>,
    bank_loan: Option<i64>,
    #[serde(default)]
    other: Vec<i64>,
}

impl ExpensesConfig {
    fn fixed(&self, category: ExpenseCategory) -> Option<i64> {
        match category {
            ExpenseCategory::AgencyFee => self.agency_fee,
            ExpenseCategory::LandValueIncrementTax => self.land_value_increment_tax,
            ExpenseCategory::TaxRemittanceFee => self.tax_remittance_fee,
            ExpenseCategory::LandValueTax => self.land_value_tax,
            ExpenseCategory::HouseTax => self.house_tax,
            ExpenseCategory::TaxProration => self.tax_proration,
            ExpenseCategory::SecondMortgage => self.second_mortgage,
            ExpenseCategory::Utilities => self.utilities,
            ExpenseCategory::ScrivenerFee => self.scrivener_fee,
            ExpenseCategory::BankLoan => self.bank_loan,
        }
    }
}

/// Load a distribution from a TOML file.
pub fn load(path: &Path) -> Result<Distribution, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

/// Parse a distribution from TOML text.
pub fn parse(content: &str) -> Result<Distribution, ConfigError> {
    let config: ConfigFile = toml::from_str(content)?;

    let mut parties = Vec::with_capacity(config.parties.len());
    for party_config in config.parties {
        let mut party = Party::new(&party_config.name);

        if let Some(value) = &party_config.share {
            let share = match value {
                ShareValue::Fraction(f) => Share::new(*f)?,
                ShareValue::Text(t) => Share::parse(t)?,
            };
            party = party.with_share(share);
        }

        for category in ExpenseCategory::ALL {
            if let Some(amount) = party_config.expenses.fixed(category) {
                party = party.with_expense(ExpenseSlot::Fixed(category), Money::new(amount));
            }
        }

        let other = &party_config.expenses.other;
        if other.len() > MAX_OTHER_SLOTS {
            return Err(ConfigError::TooManyOtherEntries {
                party: party_config.name,
                count: other.len(),
                limit: MAX_OTHER_SLOTS,
            });
        }
        for (slot, amount) in other.iter().enumerate() {
            party = party.with_expense(ExpenseSlot::Other(slot), Money::new(*amount));
        }

        parties.push(party);
    }

    let distribution = Distribution::new(Money::new(config.total), parties)?
        .with_other_labels(config.other_labels)?;
    Ok(distribution)
}

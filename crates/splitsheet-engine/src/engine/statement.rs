//! Distribution statements: inputs and derived results.
//!
//! A [`Distribution`] holds the user-supplied inputs (total price, ordered
//! parties with optional shares and itemized expenses); [`Statement`] is
//! the pure function of those inputs that the document layer renders.
//! A blank share means "no data yet for this party" - every derived value
//! for that party is reported as blank (`None`), never zero, so a
//! partially filled statement cannot show misleading totals.

use super::allocate::allocate;
use super::error::AllocationError;
use super::money::Money;
use super::share::Share;

/// Fixed expense categories, in statement row order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExpenseCategory {
    AgencyFee,
    LandValueIncrementTax,
    TaxRemittanceFee,
    LandValueTax,
    HouseTax,
    TaxProration,
    SecondMortgage,
    Utilities,
    ScrivenerFee,
    BankLoan,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 10] = [
        ExpenseCategory::AgencyFee,
        ExpenseCategory::LandValueIncrementTax,
        ExpenseCategory::TaxRemittanceFee,
        ExpenseCategory::LandValueTax,
        ExpenseCategory::HouseTax,
        ExpenseCategory::TaxProration,
        ExpenseCategory::SecondMortgage,
        ExpenseCategory::Utilities,
        ExpenseCategory::ScrivenerFee,
        ExpenseCategory::BankLoan,
    ];

    /// Display label for the statement's item column.
    pub fn label(self) -> &'static str {
        match self {
            ExpenseCategory::AgencyFee => "Agency fee",
            ExpenseCategory::LandValueIncrementTax => "Land value increment tax",
            ExpenseCategory::TaxRemittanceFee => "Tax remittance fee",
            ExpenseCategory::LandValueTax => "Land value tax",
            ExpenseCategory::HouseTax => "House tax",
            ExpenseCategory::TaxProration => "Tax proration",
            ExpenseCategory::SecondMortgage => "Second mortgage",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::ScrivenerFee => "Scrivener fee",
            ExpenseCategory::BankLoan => "Bank loan",
        }
    }

    /// Stable snake_case key used by configuration files.
    pub fn key(self) -> &'static str {
        match self {
            ExpenseCategory::AgencyFee => "agency_fee",
            ExpenseCategory::LandValueIncrementTax => "land_value_increment_tax",
            ExpenseCategory::TaxRemittanceFee => "tax_remittance_fee",
            ExpenseCategory::LandValueTax => "land_value_tax",
            ExpenseCategory::HouseTax => "house_tax",
            ExpenseCategory::TaxProration => "tax_proration",
            ExpenseCategory::SecondMortgage => "second_mortgage",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::ScrivenerFee => "scrivener_fee",
            ExpenseCategory::BankLoan => "bank_loan",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|&c| c == self).unwrap_or(0)
    }
}

/// Number of free-text "other" expense slots per statement.
pub const MAX_OTHER_SLOTS: usize = 3;

/// Total expense rows: fixed categories plus the "other" slots.
pub const EXPENSE_ROW_COUNT: usize = ExpenseCategory::ALL.len() + MAX_OTHER_SLOTS;

/// Addresses one expense row: a fixed category or an "other" slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpenseSlot {
    Fixed(ExpenseCategory),
    Other(usize),
}

impl ExpenseSlot {
    /// All slots in statement row order.
    pub fn all() -> impl Iterator<Item = ExpenseSlot> {
        ExpenseCategory::ALL
            .into_iter()
            .map(ExpenseSlot::Fixed)
            .chain((0..MAX_OTHER_SLOTS).map(ExpenseSlot::Other))
    }

    /// Row-order index in `0..EXPENSE_ROW_COUNT`.
    pub fn index(self) -> usize {
        match self {
            ExpenseSlot::Fixed(category) => category.index(),
            ExpenseSlot::Other(slot) => ExpenseCategory::ALL.len() + slot.min(MAX_OTHER_SLOTS - 1),
        }
    }
}

/// Per-party expense amounts, indexed by [`ExpenseSlot`].
///
/// A missing entry is a blank input cell and is treated as 0 when summing;
/// unlike a blank share, blank expenses carry no special meaning.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseEntries {
    amounts: [Option<Money>; EXPENSE_ROW_COUNT],
}

impl ExpenseEntries {
    pub fn set(&mut self, slot: ExpenseSlot, amount: Money) {
        self.amounts[slot.index()] = Some(amount);
    }

    pub fn get(&self, slot: ExpenseSlot) -> Option<Money> {
        self.amounts[slot.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.iter().all(|a| a.is_none())
    }
}

/// One party to the distribution.
#[derive(Clone, Debug)]
pub struct Party {
    name: String,
    share: Option<Share>,
    expenses: ExpenseEntries,
}

impl Party {
    /// A party with no share entered yet. Derived values stay blank until
    /// a share is supplied.
    pub fn new(name: impl Into<String>) -> Party {
        Party {
            name: name.into(),
            share: None,
            expenses: ExpenseEntries::default(),
        }
    }

    pub fn with_share(mut self, share: Share) -> Party {
        self.share = Some(share);
        self
    }

    pub fn with_expense(mut self, slot: ExpenseSlot, amount: Money) -> Party {
        self.expenses.set(slot, amount);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn share(&self) -> Option<Share> {
        self.share
    }

    pub fn expenses(&self) -> &ExpenseEntries {
        &self.expenses
    }
}

/// Statement inputs: total price, ordered parties, "other" slot labels.
#[derive(Clone, Debug)]
pub struct Distribution {
    total: Money,
    parties: Vec<Party>,
    other_labels: Vec<String>,
}

impl Distribution {
    pub fn new(total: Money, parties: Vec<Party>) -> Result<Distribution, AllocationError> {
        if parties.is_empty() {
            return Err(AllocationError::EmptyPartySet);
        }
        if total.is_negative() {
            return Err(AllocationError::NegativeAmount {
                subject: "total".to_string(),
                amount: total.units(),
            });
        }
        Ok(Distribution {
            total,
            parties,
            other_labels: Vec::new(),
        })
    }

    /// Replace the default "Other N" labels with user-supplied ones.
    pub fn with_other_labels(
        mut self,
        labels: Vec<String>,
    ) -> Result<Distribution, AllocationError> {
        if labels.len() > MAX_OTHER_SLOTS {
            return Err(AllocationError::TooManyOtherLabels {
                count: labels.len(),
                limit: MAX_OTHER_SLOTS,
            });
        }
        self.other_labels = labels;
        Ok(self)
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn parties(&self) -> &[Party] {
        &self.parties
    }

    /// Display label for an expense slot, including custom "other" labels.
    pub fn slot_label(&self, slot: ExpenseSlot) -> String {
        match slot {
            ExpenseSlot::Fixed(category) => category.label().to_string(),
            ExpenseSlot::Other(i) => self
                .other_labels
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("Other {}", i + 1)),
        }
    }

    /// Derive the statement: per-party outcomes plus cross-check totals.
    ///
    /// Parties with blank shares are excluded from allocation and their
    /// derived values stay blank; the shares that are entered must still
    /// sum to 1. Pure and deterministic - recomputed on every call.
    pub fn compute(&self) -> Result<Statement, AllocationError> {
        for party in &self.parties {
            for slot in ExpenseSlot::all() {
                if let Some(amount) = party.expenses.get(slot) {
                    if amount.is_negative() {
                        return Err(AllocationError::NegativeAmount {
                            subject: format!("{}: {}", party.name, self.slot_label(slot)),
                            amount: amount.units(),
                        });
                    }
                }
            }
        }

        let entered: Vec<Share> = self.parties.iter().filter_map(|p| p.share).collect();
        if entered.is_empty() {
            return Err(AllocationError::InvalidShareSum { actual: 0.0 });
        }
        let allocations = allocate(self.total, &entered)?;

        let mut outcomes = Vec::with_capacity(self.parties.len());
        let mut next_allocation = 0usize;
        for party in &self.parties {
            let allocated = party.share.map(|_| {
                let amount = allocations[next_allocation];
                next_allocation += 1;
                amount
            });
            let expense_total = party.share.map(|_| {
                ExpenseSlot::all()
                    .filter_map(|slot| party.expenses.get(slot))
                    .sum()
            });
            let balance = match (allocated, expense_total) {
                (Some(a), Some(e)) => Some(a - e),
                _ => None,
            };
            outcomes.push(PartyOutcome {
                name: party.name.clone(),
                share: party.share,
                allocated,
                expense_total,
                balance,
            });
        }

        let mut expenses = [Money::ZERO; EXPENSE_ROW_COUNT];
        for slot in ExpenseSlot::all() {
            // Raw inputs: blank-share parties still contribute the values
            // they have entered.
            expenses[slot.index()] = self
                .parties
                .iter()
                .filter_map(|p| p.expenses.get(slot))
                .sum();
        }

        let totals = StatementTotals {
            share: entered.iter().map(|s| s.fraction()).sum(),
            allocated: outcomes.iter().filter_map(|o| o.allocated).sum(),
            expenses,
            expense_total: outcomes.iter().filter_map(|o| o.expense_total).sum(),
            balance: outcomes.iter().filter_map(|o| o.balance).sum(),
        };

        Ok(Statement {
            parties: outcomes,
            totals,
        })
    }
}

/// Derived values for one party. `None` is the explicit blank marker.
#[derive(Clone, Debug, PartialEq)]
pub struct PartyOutcome {
    pub name: String,
    pub share: Option<Share>,
    pub allocated: Option<Money>,
    pub expense_total: Option<Money>,
    pub balance: Option<Money>,
}

/// Cross-check totals across all parties. Display values only; nothing
/// downstream computes from them.
#[derive(Clone, Debug, PartialEq)]
pub struct StatementTotals {
    pub share: f64,
    pub allocated: Money,
    pub expenses: [Money; EXPENSE_ROW_COUNT],
    pub expense_total: Money,
    pub balance: Money,
}

/// A computed distribution statement.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub parties: Vec<PartyOutcome>,
    pub totals: StatementTotals,
}

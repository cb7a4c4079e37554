use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, Choice};
use crate::selection::{AttributeSelection, SelectionError};

/// Wire form: attribute key -> option label -> price delta.
pub type RawPriceTable = BTreeMap<String, BTreeMap<String, i32>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("No price entry for {0}")]
    UnknownOption(Choice),

    #[error("Price total overflowed")]
    Overflow,
}

/// Price delta for each attribute option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPriceTable", into = "RawPriceTable")]
pub struct PriceTable {
    prices: HashMap<Choice, i32>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, choice: impl Into<Choice>, price: i32) -> Self {
        self.insert(choice, price);
        self
    }

    /// Returns the previous price of the option, if any.
    pub fn insert(&mut self, choice: impl Into<Choice>, price: i32) -> Option<i32> {
        self.prices.insert(choice.into(), price)
    }

    pub fn price_of(&self, choice: Choice) -> Option<i32> {
        self.prices.get(&choice).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Choice, i32)> + '_ {
        self.prices.iter().map(|(choice, price)| (*choice, *price))
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl TryFrom<RawPriceTable> for PriceTable {
    type Error = SelectionError;

    fn try_from(raw: RawPriceTable) -> Result<Self, Self::Error> {
        let mut table = PriceTable::new();
        for (key, options) in raw {
            let attribute: Attribute = key.parse()?;
            for (label, price) in options {
                table.insert(Choice::parse(attribute, &label)?, price);
            }
        }
        Ok(table)
    }
}

impl From<PriceTable> for RawPriceTable {
    fn from(table: PriceTable) -> Self {
        let mut raw = RawPriceTable::new();
        for (choice, price) in table.prices {
            raw.entry(choice.attribute().key().to_string())
                .or_default()
                .insert(choice.label().to_string(), price);
        }
        raw
    }
}

/// Sum the price deltas of every set attribute.
///
/// Unset attributes contribute nothing. A set option missing from the table is
/// an error rather than a zero.
pub fn compute_price(selection: &AttributeSelection, table: &PriceTable) -> Result<i32, PricingError> {
    selection.choices().try_fold(0i32, |total, choice| {
        let delta = table
            .price_of(choice)
            .ok_or(PricingError::UnknownOption(choice))?;
        total.checked_add(delta).ok_or(PricingError::Overflow)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{FrameType, RimColor, Wheels};
    use proptest::prelude::*;

    fn road_table() -> PriceTable {
        PriceTable::new()
            .with_price(FrameType::Diamond, 90)
            .with_price(FrameType::FullSuspension, 130)
            .with_price(Wheels::Road, 80)
            .with_price(RimColor::Black, 15)
    }

    #[test]
    fn test_sums_present_attributes() {
        let selection = AttributeSelection::new()
            .with(FrameType::Diamond)
            .with(Wheels::Road);

        assert_eq!(compute_price(&selection, &road_table()), Ok(170));
    }

    #[test]
    fn test_empty_selection_is_free() {
        assert_eq!(compute_price(&AttributeSelection::new(), &PriceTable::new()), Ok(0));
    }

    #[test]
    fn test_missing_entry_is_unknown_option() {
        let selection = AttributeSelection::new().with(FrameType::StepThrough);

        assert_eq!(
            compute_price(&selection, &road_table()),
            Err(PricingError::UnknownOption(Choice::FrameType(FrameType::StepThrough)))
        );
    }

    #[test]
    fn test_overflow_is_reported() {
        let table = PriceTable::new()
            .with_price(FrameType::Diamond, i32::MAX)
            .with_price(Wheels::Road, 1);
        let selection = AttributeSelection::new()
            .with(FrameType::Diamond)
            .with(Wheels::Road);

        assert_eq!(compute_price(&selection, &table), Err(PricingError::Overflow));
    }

    #[test]
    fn test_raw_table_checks_domains() {
        let raw: RawPriceTable = serde_json::from_str(r#"{"frameType": {"Diamond": 90}}"#).unwrap();
        let table = PriceTable::try_from(raw).unwrap();
        assert_eq!(table.price_of(Choice::FrameType(FrameType::Diamond)), Some(90));

        let raw: RawPriceTable = serde_json::from_str(r#"{"frameType": {"Carbon": 200}}"#).unwrap();
        assert!(PriceTable::try_from(raw).is_err());
    }

    proptest! {
        #[test]
        fn prop_price_ignores_enumeration_order(
            pairs in Just(vec![
                ("frameType", "Full-Suspension"),
                ("frameFinish", "Shiny"),
                ("wheels", "Mountain Wheels"),
                ("rimColor", "Blue"),
                ("chain", "Single-Speed Chain"),
            ])
            .prop_shuffle(),
            keep in 0usize..=5,
        ) {
            let catalog = crate::Catalog::default();
            let subset = &pairs[..keep];

            let shuffled = AttributeSelection::from_pairs(subset.iter().copied()).unwrap();
            let mut reversed_pairs = subset.to_vec();
            reversed_pairs.reverse();
            let reversed = AttributeSelection::from_pairs(reversed_pairs).unwrap();

            prop_assert_eq!(
                compute_price(&shuffled, catalog.prices()),
                compute_price(&reversed, catalog.prices())
            );
        }
    }
}

use serde::Serialize;

use crate::attribute::{Chain, Choice, FrameFinish, FrameType, RimColor, Wheels};
use crate::pricing::{compute_price, PriceTable, PricingError};
use crate::restriction::RestrictionTable;
use crate::selection::AttributeSelection;
use crate::validator::{validate_with_report, Validation};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Missing price for {0}")]
    MissingPrice(Choice),

    #[error("Negative price {price} for {choice}")]
    NegativePrice { choice: Choice, price: i32 },
}

/// Read-only snapshot of prices and restrictions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    prices: PriceTable,
    restrictions: RestrictionTable,
}

impl Catalog {
    /// Every domain option must carry a non-negative price.
    pub fn new(prices: PriceTable, restrictions: RestrictionTable) -> Result<Self, CatalogError> {
        for choice in Choice::all() {
            match prices.price_of(choice) {
                None => return Err(CatalogError::MissingPrice(choice)),
                Some(price) if price < 0 => return Err(CatalogError::NegativePrice { choice, price }),
                Some(_) => {}
            }
        }

        Ok(Self { prices, restrictions })
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    pub fn restrictions(&self) -> &RestrictionTable {
        &self.restrictions
    }

    pub fn validate(&self, selection: &AttributeSelection) -> Validation {
        validate_with_report(selection, &self.restrictions)
    }

    pub fn price(&self, selection: &AttributeSelection) -> Result<i32, PricingError> {
        compute_price(selection, &self.prices)
    }
}

impl Default for Catalog {
    /// The reference bicycle catalog.
    fn default() -> Self {
        let prices = PriceTable::new()
            .with_price(FrameType::FullSuspension, 130)
            .with_price(FrameType::Diamond, 90)
            .with_price(FrameType::StepThrough, 70)
            .with_price(FrameFinish::Matte, 50)
            .with_price(FrameFinish::Shiny, 30)
            .with_price(Wheels::Road, 80)
            .with_price(Wheels::Mountain, 100)
            .with_price(Wheels::FatBike, 120)
            .with_price(RimColor::Red, 20)
            .with_price(RimColor::Black, 15)
            .with_price(RimColor::Blue, 20)
            .with_price(Chain::SingleSpeed, 43)
            .with_price(Chain::EightSpeed, 50);

        let restrictions = RestrictionTable::new()
            .allow_frame_types(Wheels::Mountain, [FrameType::FullSuspension])
            .allow_frame_types(Wheels::FatBike, [FrameType::Diamond, FrameType::StepThrough])
            .forbid_rim_colors(Wheels::FatBike, [RimColor::Red]);

        Self { prices, restrictions }
    }
}

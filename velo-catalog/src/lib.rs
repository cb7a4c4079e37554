pub mod attribute;
pub mod selection;
pub mod pricing;
pub mod restriction;
pub mod validator;
pub mod catalog;

pub use attribute::{Attribute, Chain, Choice, FrameFinish, FrameType, RimColor, Wheels};
pub use selection::{AttributeSelection, RawSelection, SelectionError};
pub use pricing::{compute_price, PriceTable, PricingError, RawPriceTable};
pub use restriction::{RestrictionTable, UnlistedWheels};
pub use validator::{validate, validate_with_report, Clearance, Validation};
pub use catalog::{Catalog, CatalogError};

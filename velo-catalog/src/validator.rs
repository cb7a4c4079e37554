use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, FrameType, RimColor, Wheels};
use crate::restriction::RestrictionTable;
use crate::selection::AttributeSelection;

/// Why the validator dropped a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum Clearance {
    IncompatibleFrameType {
        wheels: Wheels,
        #[serde(rename = "frameType")]
        frame_type: FrameType,
    },
    UnavailableRimColor {
        wheels: Wheels,
        #[serde(rename = "rimColor")]
        rim_color: RimColor,
    },
}

impl Clearance {
    /// The attribute that was cleared.
    pub fn attribute(&self) -> Attribute {
        match self {
            Clearance::IncompatibleFrameType { .. } => Attribute::FrameType,
            Clearance::UnavailableRimColor { .. } => Attribute::RimColor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub selection: AttributeSelection,
    pub cleared: Vec<Clearance>,
}

/// Drop dependent choices the restrictions rule out.
///
/// Incompatible choices become unset so the caller can choose again; nothing
/// here is an error. All restrictions hang off `wheels`, so a selection
/// without wheels passes through untouched.
pub fn validate(selection: &AttributeSelection, restrictions: &RestrictionTable) -> AttributeSelection {
    validate_with_report(selection, restrictions).selection
}

/// Same as [`validate`], also reporting which restriction cleared what.
pub fn validate_with_report(selection: &AttributeSelection, restrictions: &RestrictionTable) -> Validation {
    let mut validated = *selection;
    let mut cleared = Vec::new();

    let Some(wheels) = selection.wheels else {
        return Validation { selection: validated, cleared };
    };

    if let Some(frame_type) = selection.frame_type {
        if !restrictions.is_frame_type_compatible(wheels, frame_type) {
            validated.clear(Attribute::FrameType);
            cleared.push(Clearance::IncompatibleFrameType { wheels, frame_type });
        }
    }

    if let Some(rim_color) = selection.rim_color {
        if restrictions.is_rim_color_unavailable(wheels, rim_color) {
            validated.clear(Attribute::RimColor);
            cleared.push(Clearance::UnavailableRimColor { wheels, rim_color });
        }
    }

    Validation { selection: validated, cleared }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{Chain, FrameFinish};
    use crate::restriction::UnlistedWheels;
    use crate::Catalog;
    use proptest::prelude::*;

    fn restrictions() -> RestrictionTable {
        Catalog::default().restrictions().clone()
    }

    #[test]
    fn test_mountain_wheels_need_full_suspension() {
        for frame_type in [FrameType::Diamond, FrameType::StepThrough] {
            let selection = AttributeSelection::new()
                .with(Wheels::Mountain)
                .with(frame_type);
            assert_eq!(validate(&selection, &restrictions()).frame_type, None);
        }

        let selection = AttributeSelection::new()
            .with(Wheels::Mountain)
            .with(FrameType::FullSuspension);
        assert_eq!(validate(&selection, &restrictions()), selection);
    }

    #[test]
    fn test_fat_bike_wheels_rim_colors() {
        let red = AttributeSelection::new().with(Wheels::FatBike).with(RimColor::Red);
        assert_eq!(validate(&red, &restrictions()).rim_color, None);

        for rim_color in [RimColor::Black, RimColor::Blue] {
            let selection = AttributeSelection::new().with(Wheels::FatBike).with(rim_color);
            assert_eq!(validate(&selection, &restrictions()).rim_color, Some(rim_color));
        }
    }

    #[test]
    fn test_no_wheels_no_restrictions() {
        let selection = AttributeSelection::new()
            .with(FrameType::Diamond)
            .with(RimColor::Red);

        assert_eq!(validate(&selection, &restrictions()), selection);
    }

    #[test]
    fn test_road_wheels_clear_frame_type() {
        let selection = AttributeSelection::new()
            .with(Wheels::Road)
            .with(FrameType::Diamond)
            .with(RimColor::Red);

        let report = validate_with_report(&selection, &restrictions());

        assert_eq!(report.selection, AttributeSelection::new().with(Wheels::Road).with(RimColor::Red));
        assert_eq!(
            report.cleared,
            vec![Clearance::IncompatibleFrameType {
                wheels: Wheels::Road,
                frame_type: FrameType::Diamond,
            }]
        );
    }

    #[test]
    fn test_road_wheels_keep_frame_when_unlisted_fit_any() {
        let table = restrictions().with_unlisted_wheels(UnlistedWheels::FitAnyFrame);
        let selection = AttributeSelection::new()
            .with(Wheels::Road)
            .with(FrameType::StepThrough)
            .with(RimColor::Red);

        assert_eq!(validate(&selection, &table), selection);
    }

    #[test]
    fn test_report_names_each_clearance() {
        let selection = AttributeSelection::new()
            .with(Wheels::FatBike)
            .with(FrameType::FullSuspension)
            .with(RimColor::Red)
            .with(Chain::EightSpeed);

        let report = validate_with_report(&selection, &restrictions());

        assert_eq!(
            report.cleared,
            vec![
                Clearance::IncompatibleFrameType {
                    wheels: Wheels::FatBike,
                    frame_type: FrameType::FullSuspension,
                },
                Clearance::UnavailableRimColor {
                    wheels: Wheels::FatBike,
                    rim_color: RimColor::Red,
                },
            ]
        );
        assert_eq!(report.cleared[1].attribute(), Attribute::RimColor);
        assert_eq!(report.selection.wheels, Some(Wheels::FatBike));
        assert_eq!(report.selection.chain, Some(Chain::EightSpeed));
        // input is untouched
        assert_eq!(selection.frame_type, Some(FrameType::FullSuspension));
    }

    #[test]
    fn test_clearance_wire_shape() {
        let json = serde_json::to_value(Clearance::UnavailableRimColor {
            wheels: Wheels::FatBike,
            rim_color: RimColor::Red,
        })
        .unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "reason": "unavailableRimColor", "wheels": "Fat Bike Wheels", "rimColor": "Red" })
        );
    }

    fn arb_selection() -> impl Strategy<Value = AttributeSelection> {
        (
            proptest::option::of(proptest::sample::select(FrameType::ALL.to_vec())),
            proptest::option::of(proptest::sample::select(FrameFinish::ALL.to_vec())),
            proptest::option::of(proptest::sample::select(Wheels::ALL.to_vec())),
            proptest::option::of(proptest::sample::select(RimColor::ALL.to_vec())),
            proptest::option::of(proptest::sample::select(Chain::ALL.to_vec())),
        )
            .prop_map(|(frame_type, frame_finish, wheels, rim_color, chain)| AttributeSelection {
                frame_type,
                frame_finish,
                wheels,
                rim_color,
                chain,
            })
    }

    proptest! {
        #[test]
        fn prop_validate_is_idempotent(selection in arb_selection()) {
            let table = restrictions();
            let once = validate(&selection, &table);
            prop_assert_eq!(validate(&once, &table), once);
        }

        #[test]
        fn prop_validate_matches_report(selection in arb_selection()) {
            let table = restrictions();
            let report = validate_with_report(&selection, &table);
            prop_assert_eq!(validate(&selection, &table), report.selection);
            for clearance in &report.cleared {
                prop_assert!(report.selection.get(clearance.attribute()).is_none());
            }
        }

        #[test]
        fn prop_mountain_wheels_clear_other_frames(selection in arb_selection()) {
            let selection = selection.with(Wheels::Mountain);
            let validated = validate(&selection, &restrictions());
            if selection.frame_type != Some(FrameType::FullSuspension) {
                prop_assert_eq!(validated.frame_type, None);
            }
        }
    }
}

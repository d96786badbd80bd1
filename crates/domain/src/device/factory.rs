//! Device factory — picks the variant matching a device's control shape.
//!
//! Dispatch is an exact match of the feature mask against a fixed table:
//! a device declaring one feature more or less than a known shape is not
//! promoted to the nearest variant. Anything unmatched is still usable as a
//! status-only device, and comes with a [`Diagnostic`] describing why.

use std::fmt;

use super::{Cover, Device, DeviceKind, Dimmer, Fan, Lock, SetPoint, Switch};
use crate::control::{ControlPair, ControlUse, DeviceControls};
use crate::feature::{FeatureMask, classify, resolve_range, resolve_value};
use crate::id::DeviceRef;
use crate::record::DeviceRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Switch,
    Dimmer,
    Cover,
    CoverNoDim,
    Fan,
    Lock,
    SetPoint,
}

const SWITCH: FeatureMask = FeatureMask::ON.union(FeatureMask::OFF);

const DISPATCH: [(FeatureMask, Shape); 7] = [
    (SWITCH, Shape::Switch),
    (SWITCH.union(FeatureMask::DIM), Shape::Dimmer),
    (
        SWITCH.union(FeatureMask::DIM).union(FeatureMask::STOP),
        Shape::Cover,
    ),
    (SWITCH.union(FeatureMask::STOP), Shape::CoverNoDim),
    (SWITCH.union(FeatureMask::FAN), Shape::Fan),
    (FeatureMask::LOCK.union(FeatureMask::UNLOCK), Shape::Lock),
    (FeatureMask::SETPOINT, Shape::SetPoint),
];

/// Why a device was built as status-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticReason {
    /// The feature mask matches no known shape.
    UnsupportedShape,
    /// The shape is known but the pair for this use carries no control value.
    MissingControlValue(ControlUse),
}

/// Everything needed to report an unrecognized device upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub device_ref: DeviceRef,
    pub mask: FeatureMask,
    pub reason: DiagnosticReason,
    pub record: DeviceRecord,
    pub control_pairs: Vec<ControlPair>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "device {} ({:?}, type {:?}) ",
            self.device_ref,
            self.record.name,
            self.record.device_type_string.as_deref().unwrap_or("virtual"),
        )?;
        match self.reason {
            DiagnosticReason::UnsupportedShape => {
                write!(f, "has unsupported control shape {}", self.mask)?;
            }
            DiagnosticReason::MissingControlValue(control_use) => write!(
                f,
                "declares {} but its {control_use:?} pair has no control value",
                self.mask
            )?,
        }
        write!(
            f,
            "; RAW: ({:?}) CONTROL: ({:?})",
            self.record, self.control_pairs
        )
    }
}

/// Result of building a device.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildOutcome {
    Recognized(Device),
    /// Built as status-only; the diagnostic says why.
    Unrecognized(Device, Diagnostic),
}

impl BuildOutcome {
    #[must_use]
    pub fn device(&self) -> &Device {
        match self {
            Self::Recognized(device) | Self::Unrecognized(device, _) => device,
        }
    }

    #[must_use]
    pub fn is_recognized(&self) -> bool {
        matches!(self, Self::Recognized(_))
    }

    #[must_use]
    pub fn into_parts(self) -> (Device, Option<Diagnostic>) {
        match self {
            Self::Recognized(device) => (device, None),
            Self::Unrecognized(device, diagnostic) => (device, Some(diagnostic)),
        }
    }
}

/// Build a device from its record and control pairs.
#[must_use]
pub fn build(record: DeviceRecord, control_pairs: Vec<ControlPair>) -> BuildOutcome {
    let mask = classify(&control_pairs);
    let shape = DISPATCH
        .iter()
        .find(|(known, _)| *known == mask)
        .map(|(_, shape)| *shape);

    let reason = match shape.map(|shape| kind_for(shape, &control_pairs)) {
        Some(Ok(kind)) => {
            return BuildOutcome::Recognized(Device::new(record, control_pairs, kind));
        }
        Some(Err(missing)) => DiagnosticReason::MissingControlValue(missing),
        None if mask.is_empty() => {
            return BuildOutcome::Recognized(Device::new(
                record,
                control_pairs,
                DeviceKind::Status,
            ));
        }
        None => DiagnosticReason::UnsupportedShape,
    };

    let diagnostic = Diagnostic {
        device_ref: record.device_ref,
        mask,
        reason,
        record: record.clone(),
        control_pairs: control_pairs.clone(),
    };
    BuildOutcome::Unrecognized(
        Device::new(record, control_pairs, DeviceKind::Status),
        diagnostic,
    )
}

/// Build every device of a snapshot, pairing records with their controls by ref.
///
/// A record with no matching controls entry is built from an empty pair list.
#[must_use]
pub fn build_snapshot(
    records: impl IntoIterator<Item = DeviceRecord>,
    controls: &[DeviceControls],
) -> Vec<BuildOutcome> {
    records
        .into_iter()
        .map(|record| {
            let pairs = controls
                .iter()
                .find(|entry| entry.device_ref == record.device_ref)
                .map(|entry| entry.pairs().to_vec())
                .unwrap_or_default();
            build(record, pairs)
        })
        .collect()
}

fn kind_for(shape: Shape, pairs: &[ControlPair]) -> Result<DeviceKind, ControlUse> {
    let kind = match shape {
        Shape::Switch => DeviceKind::Switchable(switch(pairs)?),
        Shape::Dimmer => DeviceKind::Dimmable(Dimmer::new(
            switch(pairs)?,
            resolve_range(pairs, ControlUse::Dim),
        )),
        Shape::Cover | Shape::CoverNoDim => {
            // Without a Dim pair the range resolves to (0, 0): dimming unsupported.
            let dimmer = Dimmer::new(switch(pairs)?, resolve_range(pairs, ControlUse::Dim));
            DeviceKind::Cover(Cover::new(dimmer, required(pairs, ControlUse::Stop)?))
        }
        Shape::Fan => DeviceKind::Fan(Fan::new(switch(pairs)?)),
        Shape::Lock => DeviceKind::Lockable(Lock::new(
            required(pairs, ControlUse::Lock)?,
            required(pairs, ControlUse::Unlock)?,
        )),
        Shape::SetPoint => {
            let range = [ControlUse::CoolSetpoint, ControlUse::HeatSetpoint]
                .into_iter()
                .find_map(|control_use| {
                    pairs
                        .iter()
                        .find(|pair| pair.control_use == control_use)
                        .map(|_| resolve_range(pairs, control_use))
                })
                .unwrap_or_default();
            DeviceKind::SetPoint(SetPoint::new(range))
        }
    };
    Ok(kind)
}

fn switch(pairs: &[ControlPair]) -> Result<Switch, ControlUse> {
    Ok(Switch::new(
        required(pairs, ControlUse::On)?,
        required(pairs, ControlUse::Off)?,
    ))
}

fn required(pairs: &[ControlPair], control_use: ControlUse) -> Result<f64, ControlUse> {
    resolve_value(pairs, control_use).ok_or(control_use)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::ControlRange;
    use crate::record::DeviceValue;

    fn record(device_ref: i64) -> DeviceRecord {
        DeviceRecord::builder(device_ref)
            .name("Device")
            .value(0)
            .build()
    }

    fn on_off() -> Vec<ControlPair> {
        vec![
            ControlPair::value(ControlUse::On, 255.0),
            ControlPair::value(ControlUse::Off, 0.0),
        ]
    }

    fn kind_of(pairs: Vec<ControlPair>) -> DeviceKind {
        build(record(1), pairs).device().kind().clone()
    }

    #[test]
    fn should_build_switch() {
        assert_eq!(
            kind_of(on_off()),
            DeviceKind::Switchable(Switch::new(255.0, 0.0))
        );
    }

    #[test]
    fn should_build_dimmer_with_dim_range() {
        let mut pairs = on_off();
        pairs.push(ControlPair::range(ControlUse::Dim, 0.0, 99.0));
        let DeviceKind::Dimmable(dimmer) = kind_of(pairs) else {
            panic!("expected a dimmer");
        };
        assert_eq!(dimmer.range(), ControlRange::new(0.0, 99.0));
        assert_eq!(dimmer.target(50.0).unwrap(), Some(DeviceValue::Int(49)));
    }

    #[test]
    fn should_build_cover_with_and_without_dim() {
        let mut pairs = on_off();
        pairs.push(ControlPair::value(ControlUse::Stop, 254.0));
        let DeviceKind::Cover(cover) = kind_of(pairs.clone()) else {
            panic!("expected a cover");
        };
        assert!(!cover.dimmer().is_supported());
        assert_eq!(cover.stop_value(), DeviceValue::Int(254));

        pairs.push(ControlPair::range(ControlUse::Dim, 0.0, 99.0));
        let DeviceKind::Cover(cover) = kind_of(pairs) else {
            panic!("expected a cover");
        };
        assert!(cover.dimmer().is_supported());
    }

    #[test]
    fn should_build_fan() {
        let mut pairs = on_off();
        pairs.push(ControlPair::range(ControlUse::Fan, 0.0, 99.0));
        assert!(matches!(kind_of(pairs), DeviceKind::Fan(_)));
    }

    #[test]
    fn should_build_lock() {
        let pairs = vec![
            ControlPair::value(ControlUse::Unlock, 0.0),
            ControlPair::value(ControlUse::Lock, 255.0),
        ];
        assert_eq!(
            kind_of(pairs),
            DeviceKind::Lockable(Lock::new(255.0, 0.0))
        );
    }

    #[test]
    fn should_prefer_cooling_setpoint_range() {
        let pairs = vec![
            ControlPair::range(ControlUse::HeatSetpoint, 5.0, 30.0),
            ControlPair::range(ControlUse::CoolSetpoint, 10.0, 35.0),
        ];
        let DeviceKind::SetPoint(setpoint) = kind_of(pairs) else {
            panic!("expected a setpoint");
        };
        assert!((setpoint.min() - 10.0).abs() < f64::EPSILON);
        assert!((setpoint.max() - 35.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_fall_back_to_heating_setpoint_range() {
        let pairs = vec![ControlPair::range(ControlUse::HeatSetpoint, 5.0, 30.0)];
        let DeviceKind::SetPoint(setpoint) = kind_of(pairs) else {
            panic!("expected a setpoint");
        };
        assert!((setpoint.min() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_build_status_without_diagnostic_when_no_controls() {
        let outcome = build(record(1), Vec::new());
        assert!(outcome.is_recognized());
        assert_eq!(outcome.device().kind(), &DeviceKind::Status);
    }

    #[test]
    fn should_not_promote_superset_shapes() {
        let mut pairs = on_off();
        pairs.push(ControlPair::range(ControlUse::Dim, 0.0, 99.0));
        pairs.push(ControlPair::range(ControlUse::Fan, 0.0, 99.0));
        let (device, diagnostic) = build(record(9), pairs).into_parts();
        assert_eq!(device.kind(), &DeviceKind::Status);
        let diagnostic = diagnostic.unwrap();
        assert_eq!(diagnostic.device_ref, DeviceRef::new(9));
        assert_eq!(diagnostic.reason, DiagnosticReason::UnsupportedShape);
        assert_eq!(diagnostic.control_pairs.len(), 4);
    }

    #[test]
    fn should_not_promote_subset_shapes() {
        let pairs = vec![ControlPair::value(ControlUse::On, 255.0)];
        let outcome = build(record(2), pairs);
        assert!(!outcome.is_recognized());
        assert_eq!(outcome.device().kind(), &DeviceKind::Status);
    }

    #[test]
    fn should_report_missing_control_value() {
        let pairs = vec![
            ControlPair::range(ControlUse::On, 1.0, 99.0),
            ControlPair::value(ControlUse::Off, 0.0),
        ];
        let (device, diagnostic) = build(record(3), pairs).into_parts();
        assert_eq!(device.kind(), &DeviceKind::Status);
        assert_eq!(
            diagnostic.unwrap().reason,
            DiagnosticReason::MissingControlValue(ControlUse::On)
        );
    }

    #[test]
    fn should_ignore_unknown_uses_when_dispatching() {
        let mut pairs = on_off();
        pairs.push(ControlPair::value(ControlUse::Other(42), 7.0));
        assert!(matches!(kind_of(pairs), DeviceKind::Switchable(_)));
    }

    #[test]
    fn should_describe_diagnostic() {
        let pairs = vec![ControlPair::value(ControlUse::ThermModeHeat, 1.0)];
        let (_, diagnostic) = build(record(30), pairs).into_parts();
        let text = diagnostic.unwrap().to_string();
        assert!(text.contains("device 30"));
        assert!(text.contains("THERM_MODES"));
    }

    #[test]
    fn should_include_raw_record_and_control_pairs_in_diagnostic() {
        let record = DeviceRecord::builder(77)
            .name("Odd")
            .value(13)
            .status("Weird-Status")
            .location("Attic", "Top Floor")
            .build();
        let pairs =
            vec![ControlPair::value(ControlUse::ThermModeHeat, 13.0).with_label("HeatLabel")];
        let (_, diagnostic) = build(record, pairs).into_parts();
        let text = diagnostic.unwrap().to_string();
        assert!(text.contains("RAW: ("));
        assert!(text.contains("Weird-Status"));
        assert!(text.contains("Attic"));
        assert!(text.contains("CONTROL: ("));
        assert!(text.contains("HeatLabel"));
        assert!(text.contains("ThermModeHeat"));
        assert!(text.contains("13.0"));
    }

    #[test]
    fn should_pair_snapshot_records_with_controls() {
        let controls = vec![DeviceControls::new(DeviceRef::new(2), on_off())];
        let outcomes = build_snapshot([record(1), record(2)], &controls);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].device().kind(), &DeviceKind::Status);
        assert!(matches!(
            outcomes[1].device().kind(),
            DeviceKind::Switchable(_)
        ));
    }
}

//! Demo device set — one device of every supported shape, plus a thermostat.

use hslink_domain::control::{ControlPair, ControlUse, DeviceControls};
use hslink_domain::id::DeviceRef;
use hslink_domain::record::{DeviceRecord, Relationship};

pub const THERMOSTAT_ROOT: i64 = 100;

const LAST_CHANGE: &str = "/Date(1590000000000)/";

fn record(device_ref: i64, name: &str, location: &str, device_type: &str) -> DeviceRecord {
    DeviceRecord::builder(device_ref)
        .name(name)
        .location(location, "Main Floor")
        .device_type(device_type)
        .last_change(LAST_CHANGE)
        .interface("Z-Wave")
        .build()
}

fn on_off(on: f64) -> Vec<ControlPair> {
    vec![
        ControlPair::value(ControlUse::On, on).with_label("On"),
        ControlPair::value(ControlUse::Off, 0.0).with_label("Off"),
    ]
}

fn thermostat_child(device_ref: i64, name: &str, device_type: &str, value: f64) -> DeviceRecord {
    DeviceRecord::builder(device_ref)
        .name(name)
        .location("Hallway", "Main Floor")
        .device_type(device_type)
        .value(value)
        .status(value.to_string())
        .last_change(LAST_CHANGE)
        .relationship(Relationship::Child)
        .associated([DeviceRef::new(THERMOSTAT_ROOT)])
        .interface("Z-Wave")
        .build()
}

/// Records and control pairs of the demo hub.
#[must_use]
pub fn snapshot() -> (Vec<DeviceRecord>, Vec<DeviceControls>) {
    let mut records = Vec::new();
    let mut controls = Vec::new();
    let mut add = |record: DeviceRecord, pairs: Vec<ControlPair>| {
        if !pairs.is_empty() {
            controls.push(DeviceControls::new(record.device_ref, pairs));
        }
        records.push(record);
    };

    let mut light = record(1, "Porch Light", "Porch", "Z-Wave Switch Binary");
    light.status = "Off".to_string();
    add(light, on_off(255.0));

    let mut dimmer = record(2, "Kitchen Ceiling", "Kitchen", "Z-Wave Switch Multilevel");
    dimmer.status = "Off".to_string();
    let mut pairs = on_off(255.0);
    pairs.push(ControlPair::range(ControlUse::Dim, 0.0, 99.0).with_label("Dim"));
    add(dimmer, pairs);

    let mut garage = record(3, "Garage Door", "Garage", "Z-Wave Barrier Operator");
    garage.status = "Closed".to_string();
    let mut pairs = on_off(255.0);
    pairs.push(ControlPair::value(ControlUse::Stop, 254.0).with_label("Stop"));
    add(garage, pairs);

    let mut blinds = record(4, "Bedroom Blinds", "Bedroom", "Z-Wave Switch Multilevel");
    blinds.status = "Off".to_string();
    let mut pairs = on_off(255.0);
    pairs.push(ControlPair::range(ControlUse::Dim, 0.0, 99.0).with_label("Position"));
    pairs.push(ControlPair::value(ControlUse::Stop, 254.0).with_label("Stop"));
    add(blinds, pairs);

    let mut fan = record(5, "Ceiling Fan", "Living Room", "Z-Wave Switch Multilevel");
    fan.status = "Off".to_string();
    let mut pairs = on_off(99.0);
    pairs.push(ControlPair::range(ControlUse::Fan, 1.0, 99.0).with_label("Speed"));
    add(fan, pairs);

    let mut lock = record(6, "Front Door", "Entry", "Z-Wave Door Lock");
    lock.value = 255.into();
    lock.status = "Locked".to_string();
    add(
        lock,
        vec![
            ControlPair::value(ControlUse::Lock, 255.0).with_label("Lock"),
            ControlPair::value(ControlUse::Unlock, 0.0).with_label("Unlock"),
        ],
    );

    let mut patio = record(7, "Patio Temperature", "Patio", "Z-Wave Temperature");
    patio.value = 18.5.into();
    patio.status = "18.5 C".to_string();
    add(patio, Vec::new());

    let mut scene = record(8, "Scene Controller", "Entry", "Z-Wave Central Scene");
    scene.status = "Idle".to_string();
    add(
        scene,
        vec![ControlPair::value(ControlUse::On, 1.0).with_label("Activate")],
    );

    let children = [101, 102, 103, 104, 105, 106, 107];
    let mut root = record(THERMOSTAT_ROOT, "Hallway Thermostat", "Hallway", "Z-Wave Thermostat");
    root.relationship = Relationship::Root;
    root.associated_devices = children.map(DeviceRef::new).to_vec();
    add(root, Vec::new());

    add(
        thermostat_child(101, "Mode", "Z-Wave Mode", 1.0),
        vec![
            ControlPair::value(ControlUse::ThermModeOff, 0.0).with_label("Off"),
            ControlPair::value(ControlUse::ThermModeHeat, 1.0).with_label("Heat"),
            ControlPair::value(ControlUse::ThermModeCool, 2.0).with_label("Cool"),
        ],
    );
    add(
        thermostat_child(102, "Heater", "Z-Wave Switch", 0.0),
        on_off(255.0),
    );
    add(
        thermostat_child(103, "Heating Setpoint", "Z-Wave Heating  Setpoint", 21.0),
        vec![ControlPair::range(ControlUse::HeatSetpoint, 5.0, 30.0)],
    );
    add(
        thermostat_child(104, "Cooling Setpoint", "Z-Wave Cooling  Setpoint", 25.0),
        vec![ControlPair::range(ControlUse::CoolSetpoint, 10.0, 35.0)],
    );
    add(
        thermostat_child(105, "Energy Save Setpoint", "Z-Wave Energy Save Heating Setpoint", 17.0),
        vec![ControlPair::range(ControlUse::HeatSetpoint, 5.0, 30.0)],
    );
    add(
        thermostat_child(106, "Thermostat Air Temperature", "Z-Wave Temperature", 20.5),
        Vec::new(),
    );
    add(
        thermostat_child(107, "Floor Temperature", "Z-Wave Temperature", 19.0),
        Vec::new(),
    );

    (records, controls)
}

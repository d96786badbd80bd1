//! End-to-end tests for the full hslink stack.
//!
//! Each test seeds a virtual hub with the demo devices, builds the device
//! table on top of it and drives devices through their typed handles. The
//! hub echoes every request as a push update, which the test applies to the
//! table the way `hslinkd` does.

use std::sync::{Arc, Mutex};

use hslink_adapter_virtual::{VirtualHub, demo};
use hslink_app::device::Control;
use hslink_app::registry::DeviceTable;
use hslink_app::update::{Delivery, PushUpdate, UpdateKind};
use hslink_domain::device::Device;
use hslink_domain::error::HsLinkError;
use hslink_domain::id::DeviceRef;
use hslink_domain::payload::{parse_control, parse_status};
use hslink_domain::record::DeviceValue;
use hslink_domain::thermostat::HvacMode;
use tokio::sync::mpsc;

fn stack() -> (DeviceTable<VirtualHub>, mpsc::UnboundedReceiver<PushUpdate>) {
    let (records, controls) = demo::snapshot();
    let (hub, updates) = VirtualHub::from_snapshot(records.clone(), &controls);
    let table = DeviceTable::from_snapshot(Arc::new(hub), records, &controls);
    (table, updates)
}

fn drain(
    table: &mut DeviceTable<VirtualHub>,
    updates: &mut mpsc::UnboundedReceiver<PushUpdate>,
) -> usize {
    let mut applied = 0;
    while let Ok(update) = updates.try_recv() {
        if table.apply_update(update) {
            applied += 1;
        }
    }
    applied
}

fn device(table: &DeviceTable<VirtualHub>, device_ref: i64) -> &Device {
    table.get(DeviceRef::new(device_ref)).unwrap().device()
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

#[test]
fn should_build_table_from_demo_snapshot() {
    let (table, _) = stack();
    assert_eq!(table.len(), 16);
    let unrecognized: Vec<i64> = table
        .diagnostics()
        .iter()
        .map(|diagnostic| diagnostic.device_ref.get())
        .collect();
    assert_eq!(unrecognized, vec![8, 101]);
}

#[test]
fn should_build_table_from_hub_payloads() {
    let status = r#"{"Name": "HomeSeer Devices", "Version": "1.0", "Devices": [
        {"ref": 1, "name": "Lamp", "location": "Den", "location2": "Main", "value": 0,
         "status": "Off", "device_type_string": "Z-Wave Switch", "last_change": "/Date(1590000000000)/",
         "relationship": 3, "associated_devices": []}
    ]}"#;
    let control = r#"[{"ref": 1, "ControlPairs": [
        {"Label": "On", "ControlUse": 1, "ControlValue": 255},
        {"Label": "Off", "ControlUse": 2, "ControlValue": 0}
    ]}]"#;
    let status = parse_status(status).unwrap();
    let controls = parse_control(control).unwrap();
    let (hub, _updates) = VirtualHub::from_snapshot(status.devices.clone(), &controls);
    let table = DeviceTable::from_snapshot(Arc::new(hub), status.devices, &controls);
    assert!(matches!(
        table.get(DeviceRef::new(1)).unwrap().control(),
        Control::Switchable(_)
    ));
}

// ---------------------------------------------------------------------------
// Round trips through the hub
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_reflect_switch_command_after_echo() {
    let (mut table, mut updates) = stack();
    let Control::Switchable(light) = table.get(DeviceRef::new(1)).unwrap().control() else {
        panic!("expected a switch");
    };
    assert!(!light.is_on());
    light.on().await.unwrap();

    // the command alone does not touch cached state
    assert_eq!(device(&table, 1).value(), DeviceValue::Int(0));

    assert_eq!(drain(&mut table, &mut updates), 1);
    assert_eq!(device(&table, 1).value(), DeviceValue::Int(255));
    assert_eq!(device(&table, 1).status(), "On");
}

#[tokio::test]
async fn should_dim_to_floor_of_range() {
    let (mut table, mut updates) = stack();
    let Control::Dimmable(dimmer) = table.get(DeviceRef::new(2)).unwrap().control() else {
        panic!("expected a dimmer");
    };
    dimmer.dim(50.0).await.unwrap();
    drain(&mut table, &mut updates);
    assert_eq!(device(&table, 2).value(), DeviceValue::Int(49));
}

#[tokio::test]
async fn should_send_nothing_on_invalid_dim() {
    let (table, mut updates) = stack();
    let Control::Dimmable(dimmer) = table.get(DeviceRef::new(2)).unwrap().control() else {
        panic!("expected a dimmer");
    };
    let err = dimmer.dim(101.0).await.unwrap_err();
    assert!(matches!(err, HsLinkError::Validation(_)));
    assert!(updates.try_recv().is_err());
}

#[tokio::test]
async fn should_stop_cover_and_ignore_unsupported_dim() {
    let (mut table, mut updates) = stack();
    let Control::Cover(garage) = table.get(DeviceRef::new(3)).unwrap().control() else {
        panic!("expected a cover");
    };
    assert!(garage.is_closed());
    garage.stop().await.unwrap();
    garage.dim(30.0).await.unwrap();
    assert_eq!(drain(&mut table, &mut updates), 1);
    assert_eq!(device(&table, 3).status(), "Stop");
}

#[tokio::test]
async fn should_unlock_front_door() {
    let (mut table, mut updates) = stack();
    let Control::Lockable(lock) = table.get(DeviceRef::new(6)).unwrap().control() else {
        panic!("expected a lock");
    };
    assert!(lock.is_locked());
    lock.unlock().await.unwrap();
    drain(&mut table, &mut updates);
    assert_eq!(device(&table, 6).status(), "Unlock");
}

// ---------------------------------------------------------------------------
// Observers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_notify_observer_once_per_update() {
    let (mut table, mut updates) = stack();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    table
        .get_mut(DeviceRef::new(5))
        .unwrap()
        .subscribe(Delivery::DataOnly, move |device, kind| {
            log.lock().unwrap().push((device.value(), kind));
        });

    table.notify_connection();
    {
        let Control::Fan(fan) = table.get(DeviceRef::new(5)).unwrap().control() else {
            panic!("expected a fan");
        };
        fan.speed(50.0).await.unwrap();
        fan.off().await.unwrap();
    }
    drain(&mut table, &mut updates);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (DeviceValue::Int(49), UpdateKind::DataUpdate),
            (DeviceValue::Int(0), UpdateKind::DataUpdate),
        ]
    );
}

#[tokio::test]
async fn should_apply_forwarded_updates_until_channel_closes() {
    let (mut table, mut updates) = stack();
    {
        let Control::Dimmable(dimmer) = table.get(DeviceRef::new(2)).unwrap().control() else {
            panic!("expected a dimmer");
        };
        dimmer.on().await.unwrap();
        dimmer.dim(25.0).await.unwrap();
    }
    // the hub keeps its sender alive, so relay into a channel that can close
    let (forward, receiver) = mpsc::unbounded_channel();
    while let Ok(update) = updates.try_recv() {
        forward.send(update).unwrap();
    }
    let mut stray = PushUpdate::data(device(&table, 1).record().clone());
    stray.device_ref = DeviceRef::new(2);
    forward.send(stray).unwrap();
    drop(forward);

    assert_eq!(table.run_updates(receiver).await, 2);
    assert_eq!(device(&table, 2).value(), DeviceValue::Int(24));
    assert_eq!(device(&table, 2).name(), "Kitchen Ceiling");
}

// ---------------------------------------------------------------------------
// Thermostat
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_drive_thermostat_through_children() {
    let (mut table, mut updates) = stack();
    {
        let thermostats = table.thermostats();
        assert_eq!(thermostats.len(), 1);
        let thermostat = &thermostats[0];
        assert_eq!(thermostat.layout().root, DeviceRef::new(demo::THERMOSTAT_ROOT));
        assert_eq!(thermostat.hvac_mode(), Some(HvacMode::Heat));
        assert_eq!(thermostat.current_temperature(), Some(20.5));
        assert_eq!(thermostat.floor_temperature(), Some(19.0));
        assert_eq!(thermostat.target_temperature(), Some(21.0));
        thermostat.set_temperature(22.5).await.unwrap();
        thermostat.set_hvac_mode(HvacMode::Cool).await.unwrap();
    }
    assert_eq!(drain(&mut table, &mut updates), 2);

    let thermostat = table.thermostat(DeviceRef::new(demo::THERMOSTAT_ROOT)).unwrap();
    assert_eq!(thermostat.hvac_mode(), Some(HvacMode::Cool));
    assert_eq!(thermostat.target_temperature(), Some(25.0));
    assert_eq!(device(&table, 103).value(), DeviceValue::Float(22.5));
}

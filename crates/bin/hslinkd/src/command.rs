//! Console commands — one line of stdin, one device operation.

use std::str::FromStr;

use hslink_app::device::{Control, ManagedDevice};
use hslink_app::ports::RequestSender;
use hslink_app::registry::DeviceTable;
use hslink_domain::error::HsLinkError;
use hslink_domain::id::DeviceRef;
use hslink_domain::thermostat::HvacMode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Value(DeviceRef, f64),
    On(DeviceRef),
    Off(DeviceRef),
    Stop(DeviceRef),
    Lock(DeviceRef),
    Unlock(DeviceRef),
    Dim(DeviceRef, f64),
    Speed(DeviceRef, f64),
    SetPoint(DeviceRef, f64),
    Mode(DeviceRef, HvacMode),
    Temp(DeviceRef, f64),
    List,
    Quit,
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command {0:?}")]
    Unknown(String),
    #[error("missing {0}")]
    MissingArgument(&'static str),
    #[error("invalid device ref {0:?}")]
    InvalidRef(String),
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
    #[error("{0}")]
    InvalidMode(String),
    #[error("device {device_ref} ({kind}) does not support {operation}")]
    Unsupported {
        device_ref: DeviceRef,
        kind: &'static str,
        operation: &'static str,
    },
    #[error("device {0} is not a thermostat")]
    NotThermostat(DeviceRef),
    #[error(transparent)]
    Device(#[from] HsLinkError),
}

impl Command {
    /// Console keyword of the command.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Value(..) => "value",
            Self::On(_) => "on",
            Self::Off(_) => "off",
            Self::Stop(_) => "stop",
            Self::Lock(_) => "lock",
            Self::Unlock(_) => "unlock",
            Self::Dim(..) => "dim",
            Self::Speed(..) => "speed",
            Self::SetPoint(..) => "setpoint",
            Self::Mode(..) => "mode",
            Self::Temp(..) => "temp",
            Self::List => "list",
            Self::Quit => "quit",
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?;
        let mut device_ref = || -> Result<DeviceRef, CommandError> {
            let word = words.next().ok_or(CommandError::MissingArgument("device ref"))?;
            word.parse()
                .map_err(|_| CommandError::InvalidRef(word.to_string()))
        };
        let command = match name {
            "list" => Self::List,
            "quit" | "exit" => Self::Quit,
            "on" => Self::On(device_ref()?),
            "off" => Self::Off(device_ref()?),
            "stop" => Self::Stop(device_ref()?),
            "lock" => Self::Lock(device_ref()?),
            "unlock" => Self::Unlock(device_ref()?),
            "value" | "dim" | "speed" | "setpoint" | "temp" => {
                let target = device_ref()?;
                let number = number(words.next())?;
                match name {
                    "value" => Self::Value(target, number),
                    "dim" => Self::Dim(target, number),
                    "speed" => Self::Speed(target, number),
                    "setpoint" => Self::SetPoint(target, number),
                    _ => Self::Temp(target, number),
                }
            }
            "mode" => {
                let target = device_ref()?;
                let mode = words
                    .next()
                    .ok_or(CommandError::MissingArgument("mode"))?
                    .parse()
                    .map_err(CommandError::InvalidMode)?;
                Self::Mode(target, mode)
            }
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn number(word: Option<&str>) -> Result<f64, CommandError> {
    let word = word.ok_or(CommandError::MissingArgument("number"))?;
    word.parse()
        .map_err(|_| CommandError::InvalidNumber(word.to_string()))
}

/// Run a device command against the table. `List` and `Quit` are handled by the caller.
///
/// # Errors
///
/// Returns an error when the device is unknown, does not support the
/// operation, or the request fails.
pub async fn execute<S: RequestSender>(
    table: &DeviceTable<S>,
    command: Command,
) -> Result<(), CommandError> {
    match command {
        Command::Value(target, value) => table.require(target)?.set_value(value).await?,
        Command::On(target)
        | Command::Off(target)
        | Command::Stop(target)
        | Command::Dim(target, _)
        | Command::Speed(target, _)
        | Command::Lock(target)
        | Command::Unlock(target)
        | Command::SetPoint(target, _) => {
            run_control(table.require(target)?, command).await?;
        }
        Command::Mode(root, mode) => thermostat(table, root)?.set_hvac_mode(mode).await?,
        Command::Temp(root, temperature) => {
            thermostat(table, root)?
                .set_temperature(temperature)
                .await?;
        }
        Command::List | Command::Quit => {}
    }
    Ok(())
}

fn thermostat<S: RequestSender>(
    table: &DeviceTable<S>,
    root: DeviceRef,
) -> Result<hslink_app::thermostat::Thermostat<'_, S>, CommandError> {
    table.require(root)?;
    table
        .thermostat(root)
        .filter(|thermostat| thermostat.layout().mode.is_some())
        .ok_or(CommandError::NotThermostat(root))
}

async fn run_control<S: RequestSender>(
    device: &ManagedDevice<S>,
    command: Command,
) -> Result<(), CommandError> {
    match (device.control(), command) {
        (Control::Switchable(switch), Command::On(_)) => switch.on().await?,
        (Control::Switchable(switch), Command::Off(_)) => switch.off().await?,
        (Control::Dimmable(dimmer), Command::On(_)) => dimmer.on().await?,
        (Control::Dimmable(dimmer), Command::Off(_)) => dimmer.off().await?,
        (Control::Dimmable(dimmer), Command::Dim(_, percent)) => dimmer.dim(percent).await?,
        (Control::Cover(cover), Command::On(_)) => cover.on().await?,
        (Control::Cover(cover), Command::Off(_)) => cover.off().await?,
        (Control::Cover(cover), Command::Stop(_)) => cover.stop().await?,
        (Control::Cover(cover), Command::Dim(_, percent)) => cover.dim(percent).await?,
        (Control::Fan(fan), Command::On(_)) => fan.on().await?,
        (Control::Fan(fan), Command::Off(_)) => fan.off().await?,
        (Control::Fan(fan), Command::Speed(_, percent)) => fan.speed(percent).await?,
        (Control::Lockable(lock), Command::Lock(_)) => lock.lock().await?,
        (Control::Lockable(lock), Command::Unlock(_)) => lock.unlock().await?,
        (Control::SetPoint(setpoint), Command::SetPoint(_, target)) => {
            setpoint.set_setpoint(target).await?;
        }
        (_, command) => return Err(unsupported(device, command)),
    }
    Ok(())
}

fn unsupported<S>(device: &ManagedDevice<S>, command: Command) -> CommandError {
    CommandError::Unsupported {
        device_ref: device.device().device_ref(),
        kind: device.device().kind().name(),
        operation: command.name(),
    }
}

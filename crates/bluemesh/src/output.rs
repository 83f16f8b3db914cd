use std::io::{IsTerminal, Write};

use bluemesh_wire::kinds::{config_type_name, hub_message_name};
use bluemesh_wire::{
    Address, ConfigRecord, Frame, HubBody, HubMessage, MeshCommand, ScannedDevice,
    TrackedDevice,
};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// A decoded or encoded value ready for printing.
pub trait View: Serialize {
    fn kind(&self) -> &'static str;
    fn rows(&self) -> Vec<(&'static str, String)>;
    /// Bytes written by `--format raw`.
    fn raw(&self) -> Vec<u8>;
}

#[derive(Serialize)]
struct Tagged<'a, V: Serialize> {
    kind: &'static str,
    #[serde(flatten)]
    view: &'a V,
}

pub fn print_view<V: View>(view: &V, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let tagged = Tagged {
                kind: view.kind(),
                view,
            };
            println!(
                "{}",
                serde_json::to_string(&tagged).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"]);
            table.add_row(vec!["kind".to_string(), view.kind().to_string()]);
            for (field, value) in view.rows() {
                table.add_row(vec![field.to_string(), value]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let fields = view
                .rows()
                .into_iter()
                .map(|(field, value)| format!("{field}={value}"))
                .collect::<Vec<_>>()
                .join(" ");
            println!("{} {fields}", view.kind());
        }
        OutputFormat::Raw => print_raw(&view.raw()),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

#[derive(Serialize)]
pub struct AddressView {
    address: String,
    broadcast: bool,
    wire: String,
}

impl From<&Address> for AddressView {
    fn from(address: &Address) -> Self {
        Self {
            address: address.to_string(),
            broadcast: address.is_broadcast(),
            wire: hex::encode(address.encode()),
        }
    }
}

impl View for AddressView {
    fn kind(&self) -> &'static str {
        "address"
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("address", self.address.clone()),
            ("broadcast", self.broadcast.to_string()),
            ("wire", self.wire.clone()),
        ]
    }

    fn raw(&self) -> Vec<u8> {
        format!("{}\n", self.address).into_bytes()
    }
}

#[derive(Serialize)]
pub struct FrameView {
    opcode: u8,
    handle: u16,
    data_length: u8,
    data_size: usize,
    length_consistent: bool,
    data: String,
    #[serde(skip)]
    bytes: Vec<u8>,
}

impl From<&Frame> for FrameView {
    fn from(frame: &Frame) -> Self {
        Self {
            opcode: frame.opcode,
            handle: frame.handle,
            data_length: frame.data_length,
            data_size: frame.data.len(),
            length_consistent: frame.is_length_consistent(),
            data: hex::encode(&frame.data),
            bytes: frame.data.to_vec(),
        }
    }
}

impl View for FrameView {
    fn kind(&self) -> &'static str {
        "frame"
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("opcode", format!("{:#04x}", self.opcode)),
            ("handle", format!("{:#06x}", self.handle)),
            ("data_length", self.data_length.to_string()),
            ("data_size", self.data_size.to_string()),
            ("length_consistent", self.length_consistent.to_string()),
            ("data", self.data.clone()),
        ]
    }

    fn raw(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

#[derive(Serialize)]
pub struct ScannedDeviceView {
    address: String,
    rssi: i8,
    occurrences: u16,
}

impl From<&ScannedDevice> for ScannedDeviceView {
    fn from(device: &ScannedDevice) -> Self {
        Self {
            address: device.address.to_string(),
            rssi: device.rssi,
            occurrences: device.occurrences,
        }
    }
}

#[derive(Serialize)]
pub struct HubView {
    opcode: u8,
    handle: u16,
    source: String,
    broadcast: bool,
    message_type: u16,
    message_name: &'static str,
    payload: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    devices: Option<Vec<ScannedDeviceView>>,
    #[serde(skip)]
    bytes: Vec<u8>,
}

impl HubView {
    /// Build the view, interpreting the payload of known message types.
    pub fn new(message: &HubMessage, body: &HubBody) -> Self {
        let devices = match body {
            HubBody::ScanResult(result) => {
                Some(result.devices.iter().map(ScannedDeviceView::from).collect())
            }
            HubBody::Raw { .. } => None,
        };
        Self {
            opcode: message.opcode,
            handle: message.handle,
            source: message.source.to_string(),
            broadcast: message.is_broadcast(),
            message_type: message.message_type,
            message_name: hub_message_name(message.message_type),
            payload: hex::encode(&message.payload),
            devices,
            bytes: message.payload.to_vec(),
        }
    }
}

impl View for HubView {
    fn kind(&self) -> &'static str {
        "hub"
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("opcode", format!("{:#04x}", self.opcode)),
            ("handle", format!("{:#06x}", self.handle)),
            ("source", self.source.clone()),
            ("broadcast", self.broadcast.to_string()),
            ("message_type", format!("{} ({})", self.message_type, self.message_name)),
            ("payload", self.payload.clone()),
        ];
        for device in self.devices.iter().flatten() {
            rows.push((
                "device",
                format!(
                    "{} rssi={} seen={}",
                    device.address, device.rssi, device.occurrences
                ),
            ));
        }
        rows
    }

    fn raw(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

#[derive(Serialize)]
pub struct ConfigView {
    config_type: u8,
    name: &'static str,
    length: u16,
    payload: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<u32>,
    #[serde(skip)]
    bytes: Vec<u8>,
}

impl From<&ConfigRecord> for ConfigView {
    fn from(record: &ConfigRecord) -> Self {
        Self {
            config_type: record.kind,
            name: config_type_name(record.kind),
            length: record.length,
            payload: hex::encode(&record.payload),
            value: record.value(),
            bytes: record.payload.to_vec(),
        }
    }
}

impl View for ConfigView {
    fn kind(&self) -> &'static str {
        "config"
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("type", format!("{:#04x} ({})", self.config_type, self.name)),
            ("length", self.length.to_string()),
            ("payload", self.payload.clone()),
        ];
        if let Some(value) = self.value {
            rows.push(("value", value.to_string()));
        }
        rows
    }

    fn raw(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

#[derive(Serialize)]
pub struct TrackedView {
    address: String,
    rssi: i8,
}

impl From<&TrackedDevice> for TrackedView {
    fn from(device: &TrackedDevice) -> Self {
        Self {
            address: device.address.to_string(),
            rssi: device.rssi,
        }
    }
}

impl View for TrackedView {
    fn kind(&self) -> &'static str {
        "tracked"
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("address", self.address.clone()),
            ("rssi", self.rssi.to_string()),
        ]
    }

    fn raw(&self) -> Vec<u8> {
        Vec::new()
    }
}

#[derive(Serialize)]
pub struct TrackedListView {
    devices: Vec<TrackedView>,
}

impl From<&[TrackedDevice]> for TrackedListView {
    fn from(devices: &[TrackedDevice]) -> Self {
        Self {
            devices: devices.iter().map(TrackedView::from).collect(),
        }
    }
}

impl View for TrackedListView {
    fn kind(&self) -> &'static str {
        "tracked-list"
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        self.devices
            .iter()
            .map(|d| ("device", format!("{} rssi={}", d.address, d.rssi)))
            .collect()
    }

    fn raw(&self) -> Vec<u8> {
        Vec::new()
    }
}

#[derive(Serialize)]
pub struct CommandView {
    channel: u8,
    target: String,
    broadcast: bool,
    message_type: u16,
    payload: String,
    #[serde(skip)]
    bytes: Vec<u8>,
}

impl From<&MeshCommand> for CommandView {
    fn from(command: &MeshCommand) -> Self {
        Self {
            channel: command.channel,
            target: command.target.to_string(),
            broadcast: command.is_broadcast(),
            message_type: command.message_type,
            payload: hex::encode(&command.payload),
            bytes: command.payload.to_vec(),
        }
    }
}

impl View for CommandView {
    fn kind(&self) -> &'static str {
        "command"
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("channel", self.channel.to_string()),
            ("target", self.target.clone()),
            ("broadcast", self.broadcast.to_string()),
            ("message_type", self.message_type.to_string()),
            ("payload", self.payload.clone()),
        ]
    }

    fn raw(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

/// Output of the `encode` subcommands.
#[derive(Serialize)]
pub struct EncodedView {
    record: &'static str,
    size: usize,
    hex: String,
    #[serde(skip)]
    bytes: Vec<u8>,
}

impl EncodedView {
    pub fn new(record: &'static str, bytes: &[u8]) -> Self {
        Self {
            record,
            size: bytes.len(),
            hex: hex::encode(bytes),
            bytes: bytes.to_vec(),
        }
    }
}

impl View for EncodedView {
    fn kind(&self) -> &'static str {
        "encoded"
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("record", self.record.to_string()),
            ("size", self.size.to_string()),
            ("hex", self.hex.clone()),
        ]
    }

    fn raw(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

#[derive(Serialize)]
pub struct ReconstructView {
    pub reference: i64,
    pub partial: u16,
    pub utc_offset_secs: i32,
    pub reconstructed: i64,
}

impl View for ReconstructView {
    fn kind(&self) -> &'static str {
        "timestamp"
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("reference", self.reference.to_string()),
            ("partial", format!("{} ({:#06x})", self.partial, self.partial)),
            ("utc_offset_secs", self.utc_offset_secs.to_string()),
            ("reconstructed", self.reconstructed.to_string()),
        ]
    }

    fn raw(&self) -> Vec<u8> {
        format!("{}\n", self.reconstructed).into_bytes()
    }
}

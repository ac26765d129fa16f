use serialport::SerialPortInfo;

/// Information about one enumerable serial device.
#[derive(Debug, Clone)]
pub struct PortInfo {
    pub name: String,
    pub port_type: String,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
}

impl From<SerialPortInfo> for PortInfo {
    fn from(info: SerialPortInfo) -> Self {
        let (port_type, vid, pid, manufacturer, product) = match &info.port_type {
            serialport::SerialPortType::UsbPort(usb) => (
                "USB".to_string(),
                Some(usb.vid),
                Some(usb.pid),
                usb.manufacturer.clone(),
                usb.product.clone(),
            ),
            serialport::SerialPortType::PciPort => ("PCI".to_string(), None, None, None, None),
            serialport::SerialPortType::BluetoothPort => {
                ("Bluetooth".to_string(), None, None, None, None)
            }
            serialport::SerialPortType::Unknown => ("Unknown".to_string(), None, None, None, None),
        };
        Self {
            name: info.port_name,
            port_type,
            vid,
            pid,
            manufacturer,
            product,
        }
    }
}

/// Enumerate serial devices visible to the OS.
pub fn list_ports() -> Vec<PortInfo> {
    serialport::available_ports()
        .unwrap_or_default()
        .into_iter()
        .map(PortInfo::from)
        .collect()
}

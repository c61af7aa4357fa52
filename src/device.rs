use std::fs::File;
use std::io;
use std::time::Duration;

/// Timeout for sending USB messages
pub const TIMEOUT: u64 = 400;

/// USB vendor ID of the receipt printer board.
pub const VENDOR_ID: u16 = 0x0416;
/// USB product ID of the receipt printer board.
pub const PRODUCT_ID: u16 = 0x5011;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("USB error: {0}")]
    Usb(#[from] rusb::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("printer not found")]
    NotFound,

    #[error("unable to locate expected endpoints")]
    InvalidEndpoints,

    #[error("operation timeout")]
    Timeout,
}

/// Write-only byte channel to a printer. The encoder needs nothing else
/// from the hardware: no read path, no status line.
pub trait DeviceSink {
    fn write(&mut self, data: &[u8]) -> Result<usize, Error>;
}

/// A claimed USB printer: handle, interface and its bulk OUT endpoint.
pub struct UsbDevice {
    handle: rusb::DeviceHandle<rusb::GlobalContext>,
    interface: u8,
    out_ep: u8,
    timeout: Duration,
}

impl UsbDevice {
    /// Scan the bus for the first device matching `vid`/`pid`, open it and
    /// claim its default interface.
    ///
    /// The bulk OUT endpoint is discovered from the interface descriptors
    /// rather than hardcoded; on the 0416:5011 board that is endpoint 1.
    pub fn open(vid: u16, pid: u16) -> Result<Self, Error> {
        let device = rusb::devices()?
            .iter()
            .find(|d| {
                d.device_descriptor()
                    .map(|desc| desc.vendor_id() == vid && desc.product_id() == pid)
                    .unwrap_or(false)
            })
            .ok_or(Error::NotFound)?;

        let mut handle = device.open()?;
        let _ = handle.set_auto_detach_kernel_driver(true);

        let config_desc = device.config_descriptor(0)?;
        let interface = config_desc
            .interfaces()
            .next()
            .ok_or(Error::InvalidEndpoints)?;

        let mut out_ep = None;
        for interface_desc in interface.descriptors() {
            for endpoint_desc in interface_desc.endpoint_descriptors() {
                if let (rusb::TransferType::Bulk, rusb::Direction::Out) =
                    (endpoint_desc.transfer_type(), endpoint_desc.direction())
                {
                    out_ep = Some(endpoint_desc.address());
                }
            }
        }
        let out_ep = out_ep.ok_or(Error::InvalidEndpoints)?;

        handle.claim_interface(interface.number())?;
        log::debug!(
            "claimed interface {} with bulk OUT endpoint {:#04x}",
            interface.number(),
            out_ep
        );

        Ok(UsbDevice {
            handle,
            interface: interface.number(),
            out_ep,
            timeout: Duration::from_millis(TIMEOUT),
        })
    }
}

impl Drop for UsbDevice {
    fn drop(&mut self) {
        let _ = self.handle.release_interface(self.interface);
    }
}

impl DeviceSink for UsbDevice {
    fn write(&mut self, data: &[u8]) -> Result<usize, Error> {
        let n_bytes = self.handle.write_bulk(self.out_ep, data, self.timeout)?;
        if n_bytes != data.len() {
            return Err(Error::Timeout);
        }

        Ok(n_bytes)
    }
}

/// Printer character devices (`/dev/usb/lp0` and friends) take the same
/// byte stream as the raw endpoint.
impl DeviceSink for File {
    fn write(&mut self, data: &[u8]) -> Result<usize, Error> {
        io::Write::write_all(self, data)?;
        Ok(data.len())
    }
}

/// In-memory sink for tests and dry runs.
impl DeviceSink for Vec<u8> {
    fn write(&mut self, data: &[u8]) -> Result<usize, Error> {
        self.extend_from_slice(data);
        Ok(data.len())
    }
}

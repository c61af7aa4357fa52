use crate::device::{DeviceSink, Error};

/// ESC/POS encoder for a receipt printer behind any [`DeviceSink`].
///
/// Maps each semantic action to its exact byte sequence and pushes it at
/// the sink. Session lifecycle (one init before a batch, one power-down
/// after) belongs to the caller; the encoder holds no state of its own.
pub struct Printer<D: DeviceSink> {
    device: D,
}

impl<D: DeviceSink> Printer<D> {
    pub fn new(device: D) -> Self {
        Printer { device }
    }

    /// Consume the printer and hand back the underlying sink.
    pub fn into_inner(self) -> D {
        self.device
    }

    /// Write raw bytes to the device.
    ///
    /// Writing an empty slice performs no device write at all; it is
    /// logged and reported as zero bytes written.
    pub fn write_raw(&mut self, data: &[u8]) -> Result<usize, Error> {
        if data.is_empty() {
            log::debug!("wrote no bytes");
            return Ok(0);
        }

        log::debug!("writing {} bytes", data.len());
        self.device.write(data)
    }

    /// ESC @ - Initialize printer, clear data in print buffer and set print
    /// mode to the default mode when powered on.
    ///
    /// ASCII    ESC   @
    /// Hex      1b   40
    /// Decimal  27   64
    ///
    /// Resets width/height, underline, emphasis, upside-down and rotation
    /// to their power-on defaults. Call once per session before content.
    pub fn hwinit(&mut self) -> Result<usize, Error> {
        self.write_raw(&[0x1b, 0x40])
    }
    pub fn chain_hwinit(&mut self) -> Result<&mut Self, Error> {
        self.hwinit().map(|_| self)
    }

    /// Print the literal bytes of `content`, unmodified.
    ///
    /// No codepage translation and no framing. The output only becomes
    /// visible once a form feed and cut follow.
    pub fn print(&mut self, content: &str) -> Result<usize, Error> {
        self.write_raw(content.as_bytes())
    }
    pub fn chain_print(&mut self, content: &str) -> Result<&mut Self, Error> {
        self.print(content).map(|_| self)
    }

    /// ESC d n - Print and feed n lines
    ///
    /// ASCII    ESC   d  n
    /// Hex      1b   64  n
    /// Decimal  27  100  n
    /// Range: 0 <= n <= 255
    ///
    /// n is encoded as a single raw byte, so the range is enforced by the
    /// parameter type.
    pub fn form_feed_n(&mut self, n: u8) -> Result<usize, Error> {
        self.write_raw(&[0x1b, 0x64, n])
    }
    pub fn chain_form_feed_n(&mut self, n: u8) -> Result<&mut Self, Error> {
        self.form_feed_n(n).map(|_| self)
    }

    /// Feed the default two lines.
    pub fn form_feed(&mut self) -> Result<usize, Error> {
        self.form_feed_n(2)
    }
    pub fn chain_form_feed(&mut self) -> Result<&mut Self, Error> {
        self.form_feed().map(|_| self)
    }

    /// GS V m n - Cut paper
    ///
    /// ASCII    GS   V  m  n
    /// Hex      1d  56  41  30
    /// Decimal  29  86  65  48
    ///
    /// m = 0x41 feeds to the cutting position, then performs a full cut;
    /// n is the extra feed in vertical motion units.
    pub fn full_cut(&mut self) -> Result<usize, Error> {
        self.write_raw(&[0x1d, 0x56, 0x41, 0x30])
    }
    pub fn chain_full_cut(&mut self) -> Result<&mut Self, Error> {
        self.full_cut().map(|_| self)
    }

    /// Power down the print head.
    ///
    /// Hex  fa
    ///
    /// Not part of the standard ESC/POS set; the 0416:5011 board accepts a
    /// single-byte power-down marker. Should be the last bytes written in
    /// a session.
    pub fn power_down(&mut self) -> Result<usize, Error> {
        self.write_raw(&[0xfa])
    }
    pub fn chain_power_down(&mut self) -> Result<&mut Self, Error> {
        self.power_down().map(|_| self)
    }
}

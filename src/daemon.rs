use std::thread;
use std::time::Duration;

use crate::api::{self, MessageApi};
use crate::device::{self, DeviceSink};
use crate::printer::Printer;

/// Pause between polling cycles.
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// The two failures that take the daemon down. Everything else a cycle can
/// run into is degraded or logged instead.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("authentication failed: {0}")]
    Auth(#[source] api::Error),

    #[error("failed to acknowledge printed messages: {0}")]
    Acknowledge(#[source] api::Error),
}

/// Poll forever. Returns only on a fatal error.
pub fn run<A: MessageApi, D: DeviceSink>(api: &A, printer: &mut Printer<D>) -> Result<(), Error> {
    loop {
        cycle(api, printer)?;
        log::debug!("sleeping {:?}", POLL_INTERVAL);
        thread::sleep(POLL_INTERVAL);
    }
}

/// One polling cycle: authenticate, fetch, print, acknowledge.
///
/// Fetch failures degrade to an empty batch and print failures are logged;
/// acknowledgment runs exactly once per cycle either way. Unacknowledged
/// messages may be reprinted on the next cycle, never silently lost.
pub fn cycle<A: MessageApi, D: DeviceSink>(api: &A, printer: &mut Printer<D>) -> Result<(), Error> {
    let token = api.login().map_err(Error::Auth)?;

    let messages = match api.messages(&token) {
        Ok(messages) => messages,
        Err(err) => {
            log::warn!("fetching messages failed: {}", err);
            Vec::new()
        }
    };

    if !messages.is_empty() {
        if let Err(err) = print_batch(printer, &messages) {
            log::warn!("printing failed: {}", err);
        }
    }

    api.delete_messages(&token).map_err(Error::Acknowledge)?;

    Ok(())
}

/// Each message is torn off as its own receipt: text, feed, cut. Init and
/// power-down bracket the batch, not the individual messages.
fn print_batch<D: DeviceSink>(
    printer: &mut Printer<D>,
    messages: &[String],
) -> Result<(), device::Error> {
    printer.chain_hwinit()?;

    for message in messages {
        log::info!("{}", message);
        printer
            .chain_print(message)?
            .chain_form_feed()?
            .chain_full_cut()?;
    }

    printer.power_down()?;
    Ok(())
}

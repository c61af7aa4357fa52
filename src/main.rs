use std::fs::OpenOptions;
use std::process;

use todo_printer::api::HttpApi;
use todo_printer::config::Config;
use todo_printer::daemon;
use todo_printer::device::{self, UsbDevice};
use todo_printer::printer::Printer;

fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    // Single fatal-error handler: collaborators return errors, only this
    // spot terminates the process.
    if let Err(err) = run() {
        log::error!("{}", err);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let api = HttpApi::new(&config)?;

    match &config.device {
        Some(path) => {
            log::info!("printing to device file {}", path);
            let file = OpenOptions::new().read(true).write(true).open(path)?;
            daemon::run(&api, &mut Printer::new(file))?;
        }
        None => {
            let usb = UsbDevice::open(device::VENDOR_ID, device::PRODUCT_ID)?;
            daemon::run(&api, &mut Printer::new(usb))?;
        }
    }

    Ok(())
}

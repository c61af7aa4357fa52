//! A receipt-printer daemon: polls a to-do/message API and prints every
//! pending message as its own receipt on an ESC/POS thermal printer.
//!
//! The moving parts stay swappable: the encoder in [`printer`] writes
//! through any [`device::DeviceSink`], and the polling loop in [`daemon`]
//! talks to any [`api::MessageApi`].

pub mod api;
pub mod config;
pub mod daemon;
pub mod device;
pub mod printer;

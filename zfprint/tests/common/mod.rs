//! Simulated ZFP printer on the far end of an in-memory duplex stream

#![allow(dead_code)]

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::task::JoinHandle;

use zfprint::{Printer, PrinterConfig};
use zfprint_core::constants::{logo, ACK, ANTIECHO, BUSY, END, LENGTH_OFFSET, PING, STX};
use zfprint_core::{checksum, Command, Frame};

/// How the simulated device behaves
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Normal,
    /// Answers probes, never answers a command
    Silent,
    /// Leaves the first command unanswered, then behaves normally
    MuteOnce,
    /// Answers data queries with the wrong sequence number
    WrongSequence,
    /// Acknowledges every command with this device error byte
    AckError(u8),
    /// Loops back every byte, like a misconfigured line
    Echo,
}

/// What the device saw during a run
#[derive(Debug, Default)]
pub struct Record {
    pub frames: Vec<Frame>,
    pub logo: Option<Vec<u8>>,
    /// Bytes seen outside of frames, probes included
    pub control: Vec<u8>,
}

impl Record {
    pub fn commands(&self) -> Vec<u8> {
        self.frames.iter().map(|f| f.command).collect()
    }
}

pub fn config() -> PrinterConfig {
    PrinterConfig {
        probe_timeout: Duration::from_millis(100),
        probe_retries: 3,
        response_timeout: Duration::from_millis(200),
    }
}

/// Printer wired to a simulated device; the record is returned once the
/// printer closes its end
pub fn spawn(mode: Mode) -> (Printer, JoinHandle<Record>) {
    let (client, device) = tokio::io::duplex(8192);
    let printer = Printer::stream(client, "simulated").with_config(config());
    let handle = tokio::spawn(Device::new(mode).run(device));
    (printer, handle)
}

struct Device {
    mode: Mode,
    total: f64,
    receipt_open: bool,
    record: Record,
}

impl Device {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            total: 0.0,
            receipt_open: false,
            record: Record::default(),
        }
    }

    async fn run(mut self, mut stream: DuplexStream) -> Record {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            let n = match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => n,
            };

            if self.mode == Mode::Echo {
                if stream.write_all(&chunk[..n]).await.is_err() {
                    break;
                }
                continue;
            }

            buf.extend_from_slice(&chunk[..n]);
            let out = self.process(&mut buf);
            if !out.is_empty() && stream.write_all(&out).await.is_err() {
                break;
            }
        }

        self.record
    }

    /// Consume complete units from `buf` and return the bytes to send back
    fn process(&mut self, buf: &mut Vec<u8>) -> Vec<u8> {
        let mut out = Vec::new();

        while let Some(&first) = buf.first() {
            match first {
                PING | BUSY => {
                    out.push(first);
                    self.record.control.push(first);
                    buf.remove(0);
                }
                STX => {
                    if buf.len() < logo::HEADER.len() {
                        break;
                    }
                    if buf.starts_with(&logo::HEADER) {
                        if buf.len() < logo::FRAME_SIZE {
                            break;
                        }
                        let block: Vec<u8> = buf.drain(..logo::FRAME_SIZE).collect();
                        self.record.logo = Some(block[logo::HEADER.len()..].to_vec());
                        continue;
                    }

                    let size = usize::from(buf[1].saturating_sub(LENGTH_OFFSET)) + Frame::OVERHEAD;
                    if buf.len() < size {
                        break;
                    }
                    let raw: Vec<u8> = buf.drain(..size).collect();
                    match Frame::decode(&raw) {
                        Ok(frame) => out.extend(self.respond(frame)),
                        Err(_) => out.push(0x15),
                    }
                }
                other => {
                    if other == ANTIECHO {
                        self.record.control.push(other);
                    }
                    buf.remove(0);
                }
            }
        }

        out
    }

    fn respond(&mut self, frame: Frame) -> Vec<u8> {
        self.record.frames.push(frame.clone());

        match self.mode {
            Mode::Silent => return Vec::new(),
            Mode::MuteOnce if self.record.frames.len() == 1 => return Vec::new(),
            Mode::AckError(code) => return ack(code),
            _ => {}
        }

        let sequence = if self.mode == Mode::WrongSequence {
            frame.sequence.wrapping_add(1)
        } else {
            frame.sequence
        };

        match frame.command() {
            Ok(Command::OpenFiscalReceipt) => {
                self.total = 0.0;
                self.receipt_open = true;
                ack(0)
            }
            Ok(Command::SellFree) => match sale_amount(&frame.payload) {
                Some(amount) => {
                    self.total += amount;
                    ack(0)
                }
                // syntax error
                None => ack(0x04),
            },
            Ok(Command::Subtotal) => data(sequence, frame.command, format!("{:.2}", self.total).as_bytes()),
            Ok(Command::CloseFiscalReceipt) => {
                self.receipt_open = false;
                ack(0)
            }
            Ok(Command::GetStatus) => {
                let receipt = if self.receipt_open { 0x82 } else { 0x80 };
                data(sequence, frame.command, &[0x80, 0x80, receipt, 0x80, 0xC0, 0x80])
            }
            Ok(Command::GetVersion) => data(sequence, frame.command, b"ZFP-SIM 1.0"),
            Ok(Command::GetSerialNumbers) => data(sequence, frame.command, b"ZK123456;36012345"),
            _ => ack(0),
        }
    }
}

/// `name36;G;price*qty[,disc%]` to price * quantity
fn sale_amount(payload: &[u8]) -> Option<f64> {
    let text = String::from_utf8_lossy(payload);
    let (price, rest) = text.rsplit(';').next()?.split_once('*')?;
    let quantity = rest.split(',').next()?;
    Some(price.trim().parse::<f64>().ok()? * quantity.trim().parse::<f64>().ok()?)
}

pub fn ack(status: u8) -> Vec<u8> {
    let mut buf = vec![ACK, 0x20];
    buf.extend(format!("{:02X}", status).bytes());
    let cs = checksum::calculate(&buf[1..]);
    buf.extend_from_slice(&cs);
    buf.push(END);
    buf
}

pub fn data(sequence: u8, command: u8, payload: &[u8]) -> Vec<u8> {
    Frame::with_raw_command(sequence, command, payload.to_vec())
        .encode()
        .expect("test payload fits a frame")
        .to_vec()
}

//! GSMTAP sink: hands classified frames to a UDP writer thread
//!
//! The L1SAP only ever calls `GsmtapTap::send`, which never blocks. Encoding
//! and socket i/o happen on the writer thread.

use std::net::UdpSocket;
use std::thread;

use crossbeam_channel::{Receiver, Sender, unbounded};

use gsm_pdus::gsmtap::GsmtapHeader;

/// One captured frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GsmtapRecord {
    /// ARFCN, with the uplink flag for received frames
    pub arfcn: u16,
    pub tn: u8,
    /// GSMTAP channel category, with the ACCH flag where applicable
    pub chan_type: u8,
    pub ss: u8,
    pub fn_nr: u32,
    pub signal_dbm: i8,
    pub snr_db: i8,
    pub payload: Vec<u8>,
}

impl GsmtapRecord {
    /// GSMTAP header followed by the payload
    pub fn encode(&self) -> Vec<u8> {
        let hdr = GsmtapHeader {
            timeslot: self.tn,
            arfcn: self.arfcn,
            signal_dbm: self.signal_dbm,
            snr_db: self.snr_db,
            frame_number: self.fn_nr,
            sub_type: self.chan_type,
            antenna_nr: 0,
            sub_slot: self.ss,
        };
        hdr.encapsulate(&self.payload)
    }
}

/// Sending side of the capture channel
#[derive(Debug, Clone)]
pub struct GsmtapTap {
    sender: Sender<GsmtapRecord>,
}

impl GsmtapTap {
    pub fn new(sender: Sender<GsmtapRecord>) -> Self {
        Self { sender }
    }

    /// Queues a record for the writer. Dropped if the writer is gone.
    pub fn send(&self, record: GsmtapRecord) {
        if self.sender.try_send(record).is_err() {
            tracing::trace!("gsmtap writer gone, record dropped");
        }
    }
}

/// Starts the writer thread sending to `host:port`. The thread ends once
/// all taps are dropped.
pub fn spawn_udp_writer(host: &str, port: u16) -> std::io::Result<(GsmtapTap, thread::JoinHandle<()>)> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect((host, port))?;
    let (sender, receiver) = unbounded::<GsmtapRecord>();

    let handle = thread::Builder::new()
        .name("gsmtap-writer".to_string())
        .spawn(move || writer_loop(socket, receiver))?;

    tracing::info!("gsmtap: sending to {}:{}", host, port);
    Ok((GsmtapTap::new(sender), handle))
}

fn writer_loop(socket: UdpSocket, receiver: Receiver<GsmtapRecord>) {
    let mut num_errors: u64 = 0;
    for record in receiver.iter() {
        if let Err(e) = socket.send(&record.encode()) {
            // Receiver may not be listening yet, complain once in a while
            if num_errors % 1000 == 0 {
                tracing::warn!("gsmtap: send failed: {}", e);
            }
            num_errors += 1;
        }
    }
    tracing::debug!("gsmtap writer done");
}

use clap::Parser;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use as_any::AsAny;

use gsm_config::{PhyBackend, SharedConfig, toml_config};
use gsm_core::debug;
use gsm_core::gsm_time::GSM_HYPERFRAME;
use gsm_entities::L1sapBs;
use gsm_entities::gsmtap::spawn_udp_writer;
use gsm_entities::phy::{VirtualPhy, create_phy_link};
use gsm_entities::services::LoggingServices;

/// Duration of one TDMA frame, 120/26 ms
const FRAME_DURATION: Duration = Duration::from_nanos(4_615_385);

/// Load configuration file
fn load_config_from_toml(cfg_path: &str) -> SharedConfig {
    match toml_config::from_file(cfg_path) {
        Ok(c) => c,
        Err(e) => {
            println!("Failed to load configuration from {}: {}", cfg_path, e);
            std::process::exit(1);
        }
    }
}

/// Wire the L1SAP to the configured PHY and to the logging collaborators
fn build_bts(cfg: &SharedConfig) -> L1sapBs {
    let phy = match create_phy_link(&cfg.config()) {
        Ok(phy) => phy,
        Err(e) => {
            panic!("Unsupported phy_link backend {:?}: {}", cfg.config().phy_link.backend, e);
        }
    };
    let mut l1sap = L1sapBs::new(cfg.clone(), phy, Box::new(LoggingServices::default()));

    let tap_cfg = cfg.config().gsmtap.clone();
    if tap_cfg.enabled {
        match spawn_udp_writer(&tap_cfg.remote_host, tap_cfg.remote_port) {
            Ok((tap, _handle)) => {
                l1sap.set_gsmtap(tap);
                eprintln!(" -> GSMTAP capture to {}:{}", tap_cfg.remote_host, tap_cfg.remote_port);
            }
            Err(e) => tracing::error!("gsmtap: cannot open socket: {}", e),
        }
    }
    l1sap
}

/// Drives the virtual PHY from a local frame clock until `running` clears
fn run_virtual(l1sap: &mut L1sapBs, running: &AtomicBool) {
    let mut fn_nr: u32 = 0;
    let mut next_frame = Instant::now();

    while running.load(Ordering::SeqCst) {
        let Some(phy) = l1sap.phy_mut().as_any_mut().downcast_mut::<VirtualPhy>() else {
            tracing::error!("phy is not the virtual backend, frame clock stopped");
            return;
        };
        let indications = phy.frame_indications(fn_nr);
        for (trx, prim) in indications {
            // Failures are already logged by the L1SAP
            let _ = l1sap.up(trx, prim);
        }

        // Confirms produced by the requests of this frame
        loop {
            let Some(phy) = l1sap.phy_mut().as_any_mut().downcast_mut::<VirtualPhy>() else {
                break;
            };
            let pending = phy.take_pending_up();
            if pending.is_empty() {
                break;
            }
            for (trx, prim) in pending {
                let _ = l1sap.up(trx, prim);
            }
        }

        fn_nr = (fn_nr + 1) % GSM_HYPERFRAME;
        next_frame += FRAME_DURATION;
        let now = Instant::now();
        if next_frame > now {
            std::thread::sleep(next_frame - now);
        } else if now - next_frame > FRAME_DURATION * 26 {
            tracing::warn!("frame clock lagging by {:?}, resyncing", now - next_frame);
            next_frame = now;
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "GSM BTS L1SAP",
    long_about = "Runs the GSM BTS layer 1 service access point using the provided TOML configuration file"
)]

struct Args {
    /// Config file (required)
    #[arg(help = "TOML config with BTS, TRX and PHY link parameters")]
    config: String,
}

fn main() {
    eprintln!(" -> gsm-bts {}\n", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let cfg = load_config_from_toml(&args.config);
    let _log_guard = debug::setup_logging_default(cfg.config().debug_log.clone());

    let mut l1sap = build_bts(&cfg);

    // Set up Ctrl+C handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("failed to set Ctrl+C handler");

    match cfg.config().phy_link.backend {
        PhyBackend::Virtual => run_virtual(&mut l1sap, &running),
        backend => {
            tracing::info!("phy_link backend {:?} has no frame clock, idling", backend);
            while running.load(Ordering::SeqCst) {
                std::thread::sleep(Duration::from_millis(100));
            }
        }
    }

    if let Some(svc) = l1sap.services().as_any().downcast_ref::<LoggingServices>() {
        tracing::info!("shutting down after {} upcalls", svc.num_upcalls);
    }
}

use pppoe_sim_capture::{list_capture_interfaces, list_interfaces, PcapTransport};
use pppoe_sim_cli::menu;
use pppoe_sim_cli::{Cli, Commands};
use pppoe_sim_core::util::{clock_now, CLOCK_FORMAT};
use pppoe_sim_core::{FrameTransport, Result};
use pppoe_sim_server::{SessionEngine, SessionOutcome};
use std::io::{self, Write};
use tracing::{debug, error, info, warn};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::new(CLOCK_FORMAT.to_string()))
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse_args();
    init_tracing(&cli);

    if let Err(e) = run(&cli) {
        error!(error = %e, "Fatal error");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Interfaces) => print_all_interfaces(),
        None => serve_forever(cli),
    }
}

fn print_all_interfaces() -> Result<()> {
    let interfaces = list_interfaces()?;
    let mut out = io::stdout().lock();
    for iface in &interfaces {
        let status = match (iface.is_up, iface.is_loopback) {
            (_, true) => "loopback",
            (true, false) => "up",
            (false, false) => "down",
        };
        writeln!(out, "{:<4} {:<8} {}", iface.index, status, iface)?;
    }
    Ok(())
}

fn serve_forever(cli: &Cli) -> Result<()> {
    let config = cli.simulator_config();
    config.validate()?;
    let capture = cli.capture_config();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    writeln!(out, "PPPoE authentication simulator")?;

    loop {
        let name = match &cli.interface {
            Some(name) => name.clone(),
            None => {
                let interfaces = list_capture_interfaces()?;
                match menu::choose_interface(&interfaces, &mut input, &mut out)? {
                    Some(iface) => iface.name,
                    None => return Ok(()),
                }
            }
        };

        let transport = match PcapTransport::open(&name, &capture) {
            Ok(transport) => transport,
            Err(e) if cli.interface.is_none() => {
                error!(interface = %name, error = %e, "Cannot listen on interface");
                continue;
            }
            Err(e) => return Err(e),
        };
        info!(interface = transport.interface(), mac = %transport.local_mac(), "Listening");

        let mut engine = SessionEngine::new(transport, config.clone());
        let report = engine.run();
        let state = engine.state();
        let mut transport = engine.into_transport();

        match &report.outcome {
            SessionOutcome::Completed => info!(
                received = report.stats.frames_received,
                sent = report.stats.frames_sent,
                "Session completed"
            ),
            SessionOutcome::TransportClosed(reason) => {
                warn!(reason = %reason, %state, "Session ended before teardown")
            }
        }
        if report.stats.send_failures > 0 || report.stats.frames_malformed > 0 {
            warn!(
                send_failures = report.stats.send_failures,
                malformed = report.stats.frames_malformed,
                "Session had transport problems"
            );
        }
        match transport.stats() {
            Ok(stats) => debug!("Capture statistics:\n{}", stats.format()),
            Err(e) => debug!(error = %e, "Capture statistics unavailable"),
        }
        drop(transport);

        if let Some(banner) = menu::credential_banner(&report.credentials, &clock_now()) {
            writeln!(out, "{}", banner)?;
        }

        if cli.once || !menu::wait_for_enter(&mut input, &mut out)? {
            return Ok(());
        }
    }
}

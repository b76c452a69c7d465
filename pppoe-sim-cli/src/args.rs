//! CLI argument parsing

use clap::{Parser, Subcommand};
use pppoe_sim_capture::CaptureConfig;
use pppoe_sim_core::MacAddr;
use pppoe_sim_server::config::{DEFAULT_AC_NAME, DEFAULT_MRU, DEFAULT_SESSION_ID};
use pppoe_sim_server::SimulatorConfig;

#[derive(Parser, Debug)]
#[command(name = "pppoe-sim")]
#[command(
    version,
    about = "PPPoE access concentrator simulator that captures PAP credentials",
    long_about = None
)]
pub struct Cli {
    /// Network interface to listen on (skips the interactive menu)
    #[arg(short = 'I', long, global = true)]
    pub interface: Option<String>,

    /// Exit after the first session
    #[arg(long)]
    pub once: bool,

    /// AC-Name advertised in offers
    #[arg(long, value_name = "NAME", default_value = DEFAULT_AC_NAME)]
    pub ac_name: String,

    /// Session id assigned to the client
    #[arg(long, value_name = "ID", default_value_t = DEFAULT_SESSION_ID)]
    pub session_id: u16,

    /// MRU proposed when the client does not announce one
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MRU)]
    pub mru: u16,

    /// Ignore frames from this station (repeatable)
    #[arg(long = "ignore-mac", value_name = "MAC")]
    pub ignore_mac: Vec<MacAddr>,

    /// Maximum bytes captured per frame
    #[arg(long, value_name = "BYTES", default_value_t = 65535)]
    pub snaplen: i32,

    /// Put the interface in promiscuous mode
    #[arg(long)]
    pub promiscuous: bool,

    /// Verbose output (-v, -vv for increasing verbosity)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// List available network interfaces
    Interfaces,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn simulator_config(&self) -> SimulatorConfig {
        self.ignore_mac.iter().fold(
            SimulatorConfig::default()
                .with_ac_name(self.ac_name.clone())
                .with_session_id(self.session_id)
                .with_default_mru(self.mru),
            |config, mac| config.with_ignored_source(*mac),
        )
    }

    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            snaplen: self.snaplen,
            promiscuous: self.promiscuous,
            ..CaptureConfig::default()
        }
    }

    /// Default log directive for the requested verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

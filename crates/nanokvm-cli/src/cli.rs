//! Clap derive structures for the `nanokvm` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use clap::{Args, Parser, Subcommand, ValueEnum};

use nanokvm_core::{ButtonType, ToggleKind};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// nanokvm -- command-line control for Sipeed NanoKVM devices
#[derive(Debug, Parser)]
#[command(
    name = "nanokvm",
    version,
    about = "Monitor and control Sipeed NanoKVM devices from the command line",
    long_about = "Talks to a NanoKVM over its local REST API: read device status,\n\
        press the attached machine's power and reset buttons, paste text\n\
        through the emulated keyboard, and wake machines via Wake-on-LAN.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Device profile to use
    #[arg(long, short = 'p', env = "NANOKVM_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Device host or IP (overrides profile)
    #[arg(long, short = 'H', env = "NANOKVM_HOST", global = true)]
    pub host: Option<String>,

    /// Login username (overrides profile)
    #[arg(long, short = 'u', env = "NANOKVM_USERNAME", global = true)]
    pub username: Option<String>,

    /// Login password
    #[arg(long, env = "NANOKVM_PASSWORD", global = true, hide_env = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NANOKVM_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds
    #[arg(long, env = "NANOKVM_TIMEOUT", default_value = "10", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one `key=value` per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Commands that operate on a device over an authenticated session.
    #[command(flatten)]
    Device(DeviceCommand),

    /// Send a Wake-on-LAN magic packet
    #[command(alias = "wol")]
    WakeOnLan(WakeOnLanArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Commands that need a device session. Kept as their own enum so
/// dispatch is exhaustive: local-only commands (wake-on-lan, config,
/// completions) cannot reach it by construction.
#[derive(Debug, Subcommand)]
pub enum DeviceCommand {
    /// Show device status and entity values
    #[command(alias = "st")]
    Status,

    /// Poll the device and stream state changes until interrupted
    Watch(WatchArgs),

    /// Press the attached machine's power or reset button
    #[command(alias = "btn")]
    PushButton(PushButtonArgs),

    /// Type text on the attached machine via the emulated keyboard
    Paste(PasteArgs),

    /// Switch a device feature on or off
    Toggle(ToggleArgs),

    /// Reboot the NanoKVM itself (not the attached machine)
    Reboot,

    /// Re-initialize the HDMI capture chain (PCIE hardware only)
    ResetHdmi,

    /// Re-initialize the emulated keyboard/mouse
    ResetHid,

    /// Invoke a named service with JSON parameters
    Call(CallArgs),
}

// ── Command Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Poll interval in seconds
    #[arg(long, short = 'i', default_value = "30")]
    pub interval: u64,
}

#[derive(Debug, Args)]
pub struct PushButtonArgs {
    /// Which button to press
    #[arg(value_enum)]
    pub button: ButtonArg,

    /// How long to hold the button, in milliseconds (100-5000)
    #[arg(long, short = 'd', default_value = "100")]
    pub duration: u64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ButtonArg {
    Power,
    Reset,
}

impl From<ButtonArg> for ButtonType {
    fn from(arg: ButtonArg) -> Self {
        match arg {
            ButtonArg::Power => ButtonType::Power,
            ButtonArg::Reset => ButtonType::Reset,
        }
    }
}

#[derive(Debug, Args)]
pub struct PasteArgs {
    /// Text to type (printable ASCII only)
    pub text: String,
}

#[derive(Debug, Args)]
pub struct ToggleArgs {
    /// Which feature to switch
    #[arg(value_enum)]
    pub target: ToggleArg,

    /// Desired state
    #[arg(value_enum)]
    pub state: SwitchState,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ToggleArg {
    /// SSH daemon on the NanoKVM
    Ssh,
    /// mDNS advertisement
    Mdns,
    /// USB network (RNDIS/ECM) gadget
    VirtualNetwork,
    /// USB mass storage gadget
    VirtualDisk,
}

impl From<ToggleArg> for ToggleKind {
    fn from(arg: ToggleArg) -> Self {
        match arg {
            ToggleArg::Ssh => ToggleKind::Ssh,
            ToggleArg::Mdns => ToggleKind::Mdns,
            ToggleArg::VirtualNetwork => ToggleKind::VirtualNetwork,
            ToggleArg::VirtualDisk => ToggleKind::VirtualDisk,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SwitchState {
    On,
    Off,
}

impl SwitchState {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

#[derive(Debug, Args)]
pub struct WakeOnLanArgs {
    /// Target MAC address (aa:bb:cc:dd:ee:ff)
    pub mac: String,
}

#[derive(Debug, Args)]
pub struct CallArgs {
    /// Service name (e.g. push_button, paste_text, wake_on_lan)
    pub service: String,

    /// Service parameters as a JSON object
    #[arg(long, short = 'P')]
    pub params: Option<String>,
}

// ── Config Subcommands ───────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display the resolved configuration (passwords redacted)
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

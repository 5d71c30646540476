use std::fs;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::copy::DEFAULT_BUF_SIZE;
use crate::error::RelayError;
use crate::utils::conversion::{parse_port, parse_size};
use crate::utils::logger::LogLevel;

pub const DEFAULT_PORT: u16 = 5000;

/// relay copies a file, stdin or inbound TCP connections to stdout or an outbound TCP connection
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// input IP address; accept clients here instead of reading FILE
    #[arg(short = 'i', value_name = "IP", conflicts_with = "file")]
    pub ip_in: Option<String>,
    /// output IP address; connect here instead of writing to stdout
    #[arg(short = 'o', value_name = "IP")]
    pub ip_out: Option<String>,
    /// input port [default: 5000]
    #[arg(short = 'p', value_name = "PORT", value_parser = parse_port)]
    pub port_in: Option<u16>,
    /// output port [default: 5000]
    #[arg(short = 'P', value_name = "PORT", value_parser = parse_port)]
    pub port_out: Option<u16>,
    /// size of the read/write buffer [default: 1024]
    #[arg(short = 'b', value_name = "SIZE", value_parser = parse_size)]
    pub buffer_size: Option<usize>,
    /// verbose
    #[arg(short = 'v')]
    pub verbose: bool,
    /// JSON file with defaults for any of the options above
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// file to read; stdin when omitted
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// Contents of a `--config` file. Every field is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileOption {
    pub in_addr: Option<String>,
    pub out_addr: Option<String>,
    pub in_port: Option<u16>,
    pub out_port: Option<u16>,
    pub buffer_size: Option<usize>,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default = "loglevel_default")]
    pub log_level: String,
    pub file: Option<PathBuf>,
}

impl Default for FileOption {
    fn default() -> Self {
        FileOption {
            in_addr: None,
            out_addr: None,
            in_port: None,
            out_port: None,
            buffer_size: None,
            verbose: false,
            log_level: loglevel_default(),
            file: None,
        }
    }
}

impl FileOption {
    pub fn load(path: &Path) -> Result<Self, RelayError> {
        let content = fs::read_to_string(path).map_err(|source| RelayError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content)
            .map_err(|e| RelayError::Config(format!("invalid config file {}: {}", path.display(), e)))
    }
}

fn loglevel_default() -> String {
    String::from("warn")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    OneShot,
    Server,
}

/// Fully resolved settings handed to the relay.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayOption {
    pub file: Option<PathBuf>,
    pub in_addr: Option<Ipv4Addr>,
    pub out_addr: Option<Ipv4Addr>,
    pub in_port: u16,
    pub out_port: u16,
    pub buffer_size: usize,
    pub verbose: bool,
    #[serde(skip)]
    pub log_level: LogLevel,
}

impl RelayOption {
    /// Layers built-in defaults, the optional config file and the command line.
    pub fn resolve(args: Args) -> Result<Self, RelayError> {
        let file_opts = match &args.config {
            Some(path) => FileOption::load(path)?,
            None => FileOption::default(),
        };
        Self::merge(args, file_opts)
    }

    fn merge(args: Args, file_opts: FileOption) -> Result<Self, RelayError> {
        let file = args.file.or(file_opts.file);
        let ip_in = args.ip_in.or(file_opts.in_addr);
        let ip_out = args.ip_out.or(file_opts.out_addr);

        if file.is_some() && ip_in.is_some() {
            return Err(RelayError::Config("can't pass -i and a filename".into()));
        }

        let buffer_size = args.buffer_size.or(file_opts.buffer_size).unwrap_or(DEFAULT_BUF_SIZE);
        if buffer_size == 0 {
            return Err(RelayError::Config("buffer size must be greater than 0".into()));
        }

        let log_level = file_opts.log_level.parse::<LogLevel>().map_err(RelayError::Config)?;

        Ok(RelayOption {
            file,
            in_addr: ip_in.as_deref().map(parse_ip).transpose()?,
            out_addr: ip_out.as_deref().map(parse_ip).transpose()?,
            in_port: args.port_in.or(file_opts.in_port).unwrap_or(DEFAULT_PORT),
            out_port: args.port_out.or(file_opts.out_port).unwrap_or(DEFAULT_PORT),
            buffer_size,
            verbose: args.verbose || file_opts.verbose,
            log_level,
        })
    }

    pub fn mode(&self) -> Mode {
        if self.in_addr.is_some() {
            Mode::Server
        } else {
            Mode::OneShot
        }
    }

    pub fn inbound(&self) -> Option<SocketAddr> {
        self.in_addr.map(|ip| SocketAddr::from((ip, self.in_port)))
    }

    pub fn outbound(&self) -> Option<SocketAddr> {
        self.out_addr.map(|ip| SocketAddr::from((ip, self.out_port)))
    }
}

fn parse_ip(ip: &str) -> Result<Ipv4Addr, RelayError> {
    ip.parse()
        .map_err(|_| RelayError::Config(format!("{}: not a valid IPv4 address", ip)))
}

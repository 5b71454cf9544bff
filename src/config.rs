//! CLI arguments and upload rehearsal defaults.

use axo_upload::{DEFAULT_BLOCK_SIZE, DEFAULT_CALLBACK_SIZE};
use clap::Parser;
use shadow_rs::formatcp;
use std::path::PathBuf;

use crate::build;

const VERSION_INFO: &str = formatcp!(
    r#"{}\ncommit_hash: {}\nbuild_time: {}\nbuild_env: {},{}"#,
    build::PKG_VERSION,
    build::SHORT_COMMIT,
    build::BUILD_TIME,
    build::RUST_VERSION,
    build::RUST_CHANNEL
);

/// httplib 未强制块大小时每次读取的字节数。
pub const DEFAULT_READ_SIZE: i64 = 8192;
pub const DEFAULT_PASSES: u32 = 1;

/// CLI arguments and environment configuration for the rehearsal tool.
#[derive(Parser, Debug)]
#[command(
    name = "axo-upload",
    version = VERSION_INFO,
    about = "Rehearse a WebDAV upload body locally"
)]
pub struct Args {
    #[arg(help = "File to upload")]
    pub path: PathBuf,
    #[arg(
        short = 'f',
        long,
        env = "AXO_UPLOAD_FORCE_SIZE",
        default_value_t = 0,
        help = "Force every read to this many bytes (0 to disable)"
    )]
    pub force_size: usize,
    #[arg(
        short = 'c',
        long,
        env = "AXO_UPLOAD_CALLBACK_SIZE",
        default_value_t = DEFAULT_CALLBACK_SIZE,
        help = "Progress step in percent (0 is treated as 1)"
    )]
    pub callback_size: u32,
    #[arg(
        short = 'r',
        long,
        env = "AXO_UPLOAD_READ_SIZE",
        default_value_t = DEFAULT_READ_SIZE,
        allow_negative_numbers = true,
        help = "Bytes requested per read (negative reads everything)"
    )]
    pub read_size: i64,
    #[arg(long, env = "AXO_UPLOAD_CHUNKED", help = "Send the body as chunked blocks")]
    pub chunked: bool,
    #[arg(
        long,
        env = "AXO_UPLOAD_BLOCK_SIZE",
        default_value_t = DEFAULT_BLOCK_SIZE,
        help = "Block size for chunked mode"
    )]
    pub block_size: usize,
    #[arg(
        long,
        env = "AXO_UPLOAD_CHUNKS",
        help = "Max blocks per chunked pass (unlimited when unset)"
    )]
    pub chunks: Option<usize>,
    #[arg(
        short = 'n',
        long,
        env = "AXO_UPLOAD_PASSES",
        default_value_t = DEFAULT_PASSES,
        help = "How many times the body is sent, e.g. 2 for an auth retry"
    )]
    pub passes: u32,
    #[arg(
        long,
        env = "AXO_UPLOAD_BUFFER_SIZE",
        help = "Read buffer capacity in bytes (0 for unbuffered)"
    )]
    pub buffer_size: Option<usize>,
    #[arg(
        short = 'o',
        long,
        env = "AXO_UPLOAD_OUTPUT",
        help = "Write every sent pass to this file instead of discarding it"
    )]
    pub output: Option<PathBuf>,
}

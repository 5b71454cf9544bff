//! axo-upload rehearsal binary.
//!
//! Opens a file through [`FileWrapper`] and sends its body one or more times
//! the way an HTTP client does during an authentication retry, logging the
//! progress samples reported by the wrapper.

mod config;
mod logging;

use axo_upload::transfer::{send_body, send_chunked};
use axo_upload::{Buffering, FileWrapper, ReadSize, WrapperOptions};
use clap::Parser;
use shadow_rs::shadow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use tracing::info;

use crate::config::Args;

shadow!(build);

fn main() -> Result<(), std::io::Error> {
    logging::init_logging();

    let args = Args::parse();
    let mut wrapper = build_options(&args).open(&args.path)?;
    info!(
        path = wrapper.name(),
        size = wrapper.file_size(),
        passes = args.passes,
        chunked = args.chunked,
        "📤 Rehearsing upload"
    );

    let mut sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::sink()),
    };

    for pass in 1..=args.passes {
        let sent = send_pass(&mut wrapper, &args, &mut sink)?;
        info!(pass, sent, "body pass complete");
    }

    wrapper.close();
    Ok(())
}

fn build_options(args: &Args) -> WrapperOptions {
    let mut last_percent = None;
    let mut options = WrapperOptions::new()
        .force_size(args.force_size)
        .callback_size(args.callback_size)
        .callback(move |percent| {
            // 相邻重复的采样只记录一次。
            if last_percent != Some(percent) {
                info!(percent, "upload progress");
                last_percent = Some(percent);
            }
        });
    if let Some(capacity) = args.buffer_size {
        options = options.buffering(match capacity {
            0 => Buffering::Unbuffered,
            capacity => Buffering::Capacity(capacity),
        });
    }
    options
}

fn send_pass<W: Write>(wrapper: &mut FileWrapper, args: &Args, sink: &mut W) -> io::Result<u64> {
    if args.chunked {
        // 分块读取不会回绕，每一轮由调用方自行回到起点。
        wrapper.rewind()?;
        send_chunked(wrapper, args.block_size, args.chunks, sink)
    } else {
        send_body(wrapper, ReadSize::from_signed(args.read_size), sink)
    }
}

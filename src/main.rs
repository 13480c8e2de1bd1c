//! # Batch Transfer
//!
//! Sends several native transfers as one EIP-7702 delegated transaction.
use batch_transfer::cli::Args;
use clap::Parser;

fn main() {
    // Enable backtraces unless a RUST_BACKTRACE value has already been explicitly provided.
    if std::env::var_os("RUST_BACKTRACE").is_none() {
        // SAFETY: the runtime is built below, so this is still the only thread.
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    }

    let args = Args::parse();
    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Error: failed to start the async runtime: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = runtime.block_on(args.run()) {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

//! Drop the paths given on the command line onto a dropzone and print the verdict.
//!
//! Run: `RUST_LOG=dropzone=trace cargo run -p dropzone --example drop_paths -- <paths>... [--accept image/*,.pdf] [--max-size N]`
use dropzone::fs::DroppedPaths;
use dropzone::{AcceptanceSpec, DropEvent, Dropzone, DropzoneOptions, EventKind, Observers, TargetId};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut spec = AcceptanceSpec::new();
    let mut paths = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--accept" => {
                let list = args.next().unwrap_or_default();
                spec = spec.accept(list.split(',').map(str::to_string));
            }
            "--max-size" => {
                let n = args.next().and_then(|s| s.parse().ok()).unwrap_or(u64::MAX);
                spec = spec.max_size(n);
            }
            _ => paths.push(arg),
        }
    }

    let observers = Observers::new()
        .on_drop(|accepted, rejected, _| {
            for f in accepted {
                println!("accepted  {} ({} bytes)", f.relative_path(), f.size().unwrap_or(0));
            }
            for r in rejected {
                let reasons: Vec<String> = r.errors.iter().map(|e| e.to_string()).collect();
                println!("rejected  {}: {}", r.file.relative_path(), reasons.join("; "));
            }
        })
        .on_error(|err| eprintln!("drop failed: {err}"));
    let dz = Dropzone::new(DropzoneOptions::new().acceptance(spec)).with_observers(observers);

    let root = TargetId::new(1);
    pollster::block_on(dz.handle_drag_enter(DropEvent::drag(
        EventKind::DragEnter,
        root,
        DroppedPaths::new(&paths),
    )));
    let hover = dz.state();
    println!(
        "hover: accept={} reject={}",
        hover.is_drag_accept, hover.is_drag_reject
    );
    pollster::block_on(dz.handle_drop(DropEvent::drag(
        EventKind::Drop,
        root,
        DroppedPaths::new(&paths),
    )));
}

use clap::Parser;
use crop_cli::{CliArgs, CliResult, Registry, Session};
use crop_core::{init_thread_pool, CropConfig};
use std::io::Write;
use std::num::NonZeroUsize;

fn main() {
    env_logger::init();

    let args = CliArgs::parse();
    if let Err(err) = run(&args) {
        eprintln!("ERROR: {err}");
        eprintln!("Exiting");
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> CliResult<()> {
    init_thread_pool(
        args.threads
            .map(NonZeroUsize::get)
            .unwrap_or_else(|| CropConfig::default().n_threads),
    )?;

    let function = Registry::function(&args.function, &args.function_args)?;
    let source = Registry::input(&args.input, &args.input_args)?;
    let annotations = match &args.annotations {
        Some(name) => Some(Registry::annotations(name, &args.annotation_args)?),
        None => None,
    };

    println!("Loaded:");
    println!("- Function: {}", args.function);
    println!("- Image Source: {}", args.input);
    println!("- Annotations: {}", args.annotations.as_deref().unwrap_or("None"));

    let mut session = Session::new(function, source).silent(args.silent);
    if let Some(provider) = annotations {
        session = session.with_annotations(provider);
    }
    if let Some(dir) = &args.output_dir {
        session = session.with_output_dir(dir);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = session.run(&mut out)?;
    out.flush()?;

    log::info!(
        "done: {} frames, {} proposals",
        summary.frames,
        summary.proposals
    );
    Ok(())
}

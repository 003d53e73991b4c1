// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use autocodec_gen::CodecModuleWriter;
use std::env;
use std::path::PathBuf;

fn main() {
    // Initialize tracing for diagnostics
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        return;
    }

    let result = match args[1].as_str() {
        "generate" => generate(&args[2..]),
        "check" => check(&args[2..]),
        "--help" | "-h" | "help" => {
            print_help();
            Ok(true)
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_help();
            std::process::exit(1);
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("[ERROR] {:#}", e);
            std::process::exit(1);
        }
    }
}

fn manifest_arg(args: &[String]) -> anyhow::Result<PathBuf> {
    args.iter()
        .find(|arg| !arg.starts_with("--"))
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("missing <MANIFEST> argument"))
}

fn generate(args: &[String]) -> anyhow::Result<bool> {
    let mut manifest = None;
    let mut out = None;
    let mut print = false;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--out" | "-o" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--out needs a path"))?;
                out = Some(PathBuf::from(path));
            }
            "--print" => print = true,
            _ if manifest.is_none() => manifest = Some(PathBuf::from(arg)),
            _ => anyhow::bail!("unexpected argument: {}", arg),
        }
    }
    let manifest = manifest.ok_or_else(|| anyhow::anyhow!("missing <MANIFEST> argument"))?;

    // Output defaults to ./autocodec_generated.rs, override with AUTOCODEC_OUT env var
    let out = out.unwrap_or_else(|| {
        PathBuf::from(env::var("AUTOCODEC_OUT").unwrap_or_else(|_| "autocodec_generated.rs".into()))
    });

    tracing::info!("Generating codecs from {:?}", manifest);
    let writer = CodecModuleWriter::open(&manifest)?;
    let report = writer.write(&out)?;
    if print {
        println!("{}", report.source);
    }
    report.summary();
    Ok(report.is_success())
}

fn check(args: &[String]) -> anyhow::Result<bool> {
    let manifest = manifest_arg(args)?;
    tracing::info!("Checking {:?}", manifest);
    let report = CodecModuleWriter::open(&manifest)?.check()?;
    report.summary();
    Ok(report.is_success())
}

fn print_help() {
    println!("autocodec-gen v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("USAGE:");
    println!("    autocodec-gen <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    generate <MANIFEST> [--out <FILE>] [--print]");
    println!("                   Generate codecs for every type in a YAML manifest");
    println!("    check <MANIFEST> Validate a manifest without writing anything");
    println!("    help           Print this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    AUTOCODEC_OUT  Default output file (autocodec_generated.rs)");
    println!();
    println!("EXAMPLES:");
    println!("    autocodec-gen generate codecs.yaml --out src/codecs.rs");
    println!("    autocodec-gen check codecs.yaml");
    println!();
}

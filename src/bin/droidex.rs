//! Android evidence collector (droidex) - Main binary entry point

use clap::Parser;
use droidex::cli::args::{
    CliArgs, Command, EvaluateArgs, ExtractArgs, FilterArgs, GlobalArgs, JsonArgs, MetadataArgs,
    ScanArgs, ViewArgs, WhatsappArgs, wants_version,
};
use droidex::cli::output::{
    format_calls_text, format_device_text, format_evaluation_text, format_extraction_text,
    format_json, format_metadata_text, format_scan_text, format_whatsapp_text,
};
use droidex::device::adb::AdbShell;
use droidex::models::ProgressSnapshot;
use droidex::services::aggregate::{SortBy, sort_and_limit};
use droidex::{EvaluationOptions, ExtractOptions, ExtractorConfig, ScanOptions};
use std::process;
use std::str::FromStr;
use std::sync::Arc;

fn main() {
    // Initialize logger (controlled by RUST_LOG environment variable)
    // Example: RUST_LOG=debug droidex scan --category images
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if wants_version(&args) {
        print_version();
        return;
    }

    let cli_args = match CliArgs::try_parse_from(&args) {
        Ok(a) => a,
        Err(e) => {
            let _ = e.print();
            process::exit(if e.use_stderr() { 2 } else { 0 });
        }
    };

    let config = match load_config(&cli_args.global) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    };

    let exit_code = match &cli_args.command {
        Command::Device(a) => handle_device(&config, a),
        Command::Scan(a) => handle_scan(&config, a),
        Command::Extract(a) => handle_extract(&config, &cli_args.global, a),
        Command::Metadata(a) => handle_metadata(a),
        Command::Calls(a) => handle_calls(&config, a),
        Command::Whatsapp(a) => handle_whatsapp(&config, a),
        Command::Evaluate(a) => handle_evaluate(&config, &cli_args.global, a),
        Command::View(a) => handle_view(a),
    };

    process::exit(exit_code);
}

fn load_config(global: &GlobalArgs) -> droidex::Result<ExtractorConfig> {
    let mut config = match &global.config {
        Some(path) => ExtractorConfig::from_toml_file(path)?,
        None => ExtractorConfig::default(),
    }
    .with_env();

    if let Some(adb) = &global.adb {
        config.adb_path.clone_from(adb);
    }
    if let Some(serial) = &global.serial {
        config.serial = Some(serial.clone());
    }
    Ok(config)
}

fn connect(config: &ExtractorConfig) -> Result<AdbShell, i32> {
    AdbShell::connect(&config.adb_path, config.serial.as_deref()).map_err(|e| {
        eprintln!("Error: {e}");
        4
    })
}

fn exit_code_for(error: &droidex::Error) -> i32 {
    match error {
        droidex::Error::InvalidInput(_) | droidex::Error::Config(_) => 2,
        _ => 4,
    }
}

fn scan_options(config: &ExtractorConfig, filter: &FilterArgs) -> ScanOptions {
    ScanOptions {
        paths: filter.paths.clone(),
        categories: filter.categories.clone(),
        default_roots: config.default_roots.clone(),
    }
}

fn extract_options(
    config: &ExtractorConfig,
    global: &GlobalArgs,
    filter: &FilterArgs,
    dest: Option<&std::path::Path>,
) -> ExtractOptions {
    let progress_notifier: Option<droidex::services::progress::ProgressNotifier> =
        if global.quiet {
            None
        } else {
            Some(Arc::new(|snapshot: &ProgressSnapshot| {
                #[allow(clippy::cast_precision_loss)]
                let elapsed_secs = snapshot.elapsed_ms as f64 / 1000.0;
                eprintln!(
                    "[{elapsed_secs:6.1}s] {}/{} pulled, {} failed",
                    snapshot.downloaded, snapshot.total, snapshot.failed
                );
            }))
        };

    ExtractOptions {
        scan: scan_options(config, filter),
        destination: dest.map_or_else(|| config.destination.clone(), std::path::Path::to_path_buf),
        progress_notifier,
    }
}

fn handle_device(config: &ExtractorConfig, args: &JsonArgs) -> i32 {
    let shell = match connect(config) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match droidex::device::device_info(&shell) {
        Ok(info) => {
            if args.json {
                println!("{}", format_json(&info));
            } else {
                print!("{}", format_device_text(&info));
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {e}");
            4
        }
    }
}

fn handle_scan(config: &ExtractorConfig, args: &ScanArgs) -> i32 {
    let Ok(sort_by) = SortBy::from_str(&args.sort) else {
        eprintln!("Invalid sort: {}. Use 'size', 'name' or 'modified'", args.sort);
        return 2;
    };

    let shell = match connect(config) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let result = match droidex::scan(&shell, &scan_options(config, &args.filter)) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            return exit_code_for(&e);
        }
    };

    if args.json {
        println!("{}", format_json(&result));
    } else {
        let shown = sort_and_limit(result.entries.clone(), sort_by, args.top);
        print!("{}", format_scan_text(&result, &shown));
    }

    if result.errors.is_empty() { 0 } else { 3 }
}

fn handle_extract(config: &ExtractorConfig, global: &GlobalArgs, args: &ExtractArgs) -> i32 {
    let shell = match connect(config) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let opts = extract_options(config, global, &args.filter, args.dest.as_deref());
    let result = match droidex::extract_files(&shell, &opts) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            return exit_code_for(&e);
        }
    };

    if args.json {
        println!("{}", format_json(&result));
    } else {
        print!("{}", format_extraction_text(&result));
    }

    if result.failed == 0 && result.errors.is_empty() { 0 } else { 3 }
}

fn handle_metadata(args: &MetadataArgs) -> i32 {
    let mut missing = false;
    let mut records = Vec::with_capacity(args.files.len());

    for path in &args.files {
        if !path.is_file() {
            eprintln!("Error: not a file: {}", path.display());
            missing = true;
            continue;
        }
        records.push((path, droidex::extract_file_metadata(path)));
    }

    if args.json {
        let by_path: std::collections::BTreeMap<String, _> = records
            .iter()
            .map(|(p, r)| (p.display().to_string(), r))
            .collect();
        println!("{}", format_json(&by_path));
    } else {
        for (path, record) in &records {
            print!("{}", format_metadata_text(path, record));
        }
    }

    if missing { 3 } else { 0 }
}

fn handle_calls(config: &ExtractorConfig, args: &JsonArgs) -> i32 {
    let shell = match connect(config) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let calls =
        droidex::services::calls::extract_calls(&shell, config.call_log_utc_offset_hours);
    if args.json {
        println!("{}", format_json(&calls));
    } else {
        print!("{}", format_calls_text(&calls));
    }
    0
}

fn handle_whatsapp(config: &ExtractorConfig, args: &WhatsappArgs) -> i32 {
    let shell = match connect(config) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let dest = args.dest.clone().unwrap_or_else(|| config.destination.clone());
    let result =
        match droidex::services::whatsapp::extract_backups(&shell, &config.whatsapp_roots, &dest)
        {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Error: {e}");
                return 4;
            }
        };

    if args.json {
        println!("{}", format_json(&result));
    } else {
        print!("{}", format_whatsapp_text(&result));
    }

    if result.failed == 0 { 0 } else { 3 }
}

fn handle_evaluate(config: &ExtractorConfig, global: &GlobalArgs, args: &EvaluateArgs) -> i32 {
    let shell = match connect(config) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let mut opts = EvaluationOptions::from_config(config);
    opts.extract = extract_options(config, global, &args.filter, args.dest.as_deref());
    opts.include_calls = !args.no_calls;
    if args.no_whatsapp {
        opts.whatsapp_roots = None;
    }
    opts.notes = args.notes.iter().cloned().collect();

    let evaluation = match droidex::evaluate(&shell, &opts) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {e}");
            return exit_code_for(&e);
        }
    };

    if let Err(e) = droidex::io::snapshot::write_snapshot(&args.snapshot, &evaluation) {
        eprintln!("Error: Failed to save snapshot: {e}");
        return 4;
    }

    if !global.quiet {
        eprintln!(
            "Snapshot saved: {} ({} files, {} calls)",
            args.snapshot.display(),
            evaluation.files.len(),
            evaluation.calls.len()
        );
    }

    let whatsapp_failed = evaluation.whatsapp.as_ref().map_or(0, |w| w.failed);
    if evaluation.extraction.failed == 0
        && evaluation.extraction.errors.is_empty()
        && whatsapp_failed == 0
    {
        0
    } else {
        3
    }
}

fn handle_view(args: &ViewArgs) -> i32 {
    let evaluation = match droidex::io::snapshot::read_snapshot(&args.from_snapshot) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error reading snapshot: {e}");
            return 4;
        }
    };

    if args.json {
        println!("{}", format_json(&evaluation));
    } else {
        print!("{}", format_evaluation_text(&evaluation, args.top));
    }
    0
}

fn print_version() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_DATE: &str = env!("GIT_DATE");
    const BUILD_TARGET: &str = env!("BUILD_TARGET");

    println!("droidex {VERSION}");
    println!("Commit: {GIT_HASH} ({GIT_DATE})");
    println!("Target: {BUILD_TARGET}");

    #[cfg(debug_assertions)]
    println!("Build: debug");
    #[cfg(not(debug_assertions))]
    println!("Build: release");
}

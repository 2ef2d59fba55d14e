use paulstretch::io::wav;
use paulstretch::stretch::params::{read_profile_json, write_profile_json};
use paulstretch::{StretchConfig, Stretcher, WindowShape};
use std::path::Path;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        print_usage();
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = &args[2];

    // Parse remaining arguments
    let mut stretch_factor: Option<f64> = None;
    let mut window_secs: Option<f64> = None;
    let mut workers: Option<usize> = None;
    let mut seed: Option<u64> = None;
    let mut shape: Option<WindowShape> = None;
    let mut profile: Option<String> = None;
    let mut save_profile: Option<String> = None;
    let mut format_float = false;
    let mut verbose = false;

    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--stretch" | "-s" => {
                i += 1;
                stretch_factor = Some(parse_f64(&args, i, "stretch"));
            }
            "--window" | "-w" => {
                i += 1;
                window_secs = Some(parse_f64(&args, i, "window"));
            }
            "--workers" => {
                i += 1;
                workers = Some(parse_usize(&args, i, "workers"));
            }
            "--seed" => {
                i += 1;
                seed = Some(parse_u64(&args, i, "seed"));
            }
            "--shape" => {
                i += 1;
                shape = Some(parse_shape(&args, i));
            }
            "--profile" => {
                i += 1;
                profile = Some(required_value(&args, i, "profile").to_string());
            }
            "--save-profile" => {
                i += 1;
                save_profile = Some(required_value(&args, i, "save-profile").to_string());
            }
            "--float" | "-f" => format_float = true,
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    // A profile supplies the base config; explicit flags override it.
    let mut config = match profile {
        Some(path) => match read_profile_json(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error reading profile: {}", e);
                std::process::exit(1);
            }
        },
        None => StretchConfig::new(8.0),
    };
    if let Some(factor) = stretch_factor {
        config.stretch_factor = factor;
    }
    if let Some(secs) = window_secs {
        config.window_secs = secs;
    }
    if let Some(n) = workers {
        config.workers = Some(n);
    }
    if let Some(s) = seed {
        config.seed = Some(s);
    }
    if let Some(sh) = shape {
        config.shape = sh;
    }

    if let Some(path) = save_profile {
        if let Err(e) = write_profile_json(Path::new(&path), &config) {
            eprintln!("Error writing profile: {}", e);
            std::process::exit(1);
        }
        if verbose {
            println!("Saved profile to {}", path);
        }
    }

    let input = match wav::read_wav_file(input_path) {
        Ok(block) => block,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    if verbose {
        println!(
            "Input: {} channels, {} frames at {} Hz ({:.2} s)",
            input.channel_count(),
            input.frame_count(),
            input.sample_rate,
            input.duration_secs()
        );
        println!(
            "Stretching by {:.2}x with a {:.3} s window",
            config.stretch_factor, config.window_secs
        );
    }

    let mut stretcher = match Stretcher::new(config) {
        Ok(stretcher) => stretcher,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut last_percent = -1i32;
    let result = stretcher.stretch_with_progress(&input, |fraction| {
        if verbose {
            let percent = (fraction * 100.0) as i32;
            if percent > last_percent {
                last_percent = percent;
                print!("\rProcessing: {}%", percent);
                use std::io::Write;
                let _ = std::io::stdout().flush();
            }
        }
    });
    if verbose {
        println!();
    }

    let output = match result {
        Ok(block) => block,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let write_result = if format_float {
        wav::write_wav_file_float(output_path, &output)
    } else {
        wav::write_wav_file_16bit(output_path, &output)
    };
    if let Err(e) = write_result {
        eprintln!("Error writing {}: {}", output_path, e);
        std::process::exit(1);
    }

    if verbose {
        println!(
            "Wrote {} frames ({:.2} s) to {}",
            output.frame_count(),
            output.duration_secs(),
            output_path
        );
    }
}

fn required_value<'a>(args: &'a [String], i: usize, name: &str) -> &'a str {
    match args.get(i) {
        Some(value) => value,
        None => {
            eprintln!("Missing value for --{}", name);
            std::process::exit(1);
        }
    }
}

fn parse_f64(args: &[String], i: usize, name: &str) -> f64 {
    let value = required_value(args, i, name);
    value.parse().unwrap_or_else(|_| {
        eprintln!("Invalid {} value: {}", name, value);
        std::process::exit(1);
    })
}

fn parse_usize(args: &[String], i: usize, name: &str) -> usize {
    let value = required_value(args, i, name);
    value.parse().unwrap_or_else(|_| {
        eprintln!("Invalid {} value: {}", name, value);
        std::process::exit(1);
    })
}

fn parse_u64(args: &[String], i: usize, name: &str) -> u64 {
    let value = required_value(args, i, name);
    value.parse().unwrap_or_else(|_| {
        eprintln!("Invalid {} value: {}", name, value);
        std::process::exit(1);
    })
}

fn shape_from_str(value: &str) -> Option<WindowShape> {
    match value {
        "hann" => Some(WindowShape::Hann),
        "paul" => Some(WindowShape::Paul),
        _ => None,
    }
}

fn parse_shape(args: &[String], i: usize) -> WindowShape {
    let value = required_value(args, i, "shape");
    shape_from_str(value).unwrap_or_else(|| {
        eprintln!("Unknown window shape: {} (expected hann or paul)", value);
        std::process::exit(1);
    })
}

fn print_usage() {
    println!("paulstretch - extreme audio time stretching");
    println!();
    println!("Usage: paulstretch <input.wav> <output.wav> [options]");
    println!();
    println!("Options:");
    println!("  --stretch, -s <factor>   Stretch factor (default: 8.0)");
    println!("  --window, -w <secs>      Analysis window length in seconds (default: 0.25)");
    println!("  --workers <n>            Worker thread count (default: all cores)");
    println!("  --seed <n>               Seed the phase randomizer for reproducible output");
    println!("  --shape <hann|paul>      Window shape (default: hann)");
    println!("  --profile <file.json>    Load settings from a stretch profile");
    println!("  --save-profile <file>    Save the effective settings as a profile");
    println!("  --float, -f              Write 32-bit float WAV instead of 16-bit PCM");
    println!("  --verbose, -v            Print progress");
    println!();
    println!("Examples:");
    println!("  paulstretch in.wav out.wav --stretch 8");
    println!("  paulstretch in.wav out.wav -s 30 -w 0.25 --seed 42 -v");
}

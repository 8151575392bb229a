// FILE: src/cli/handlers.rs
use crate::{generate_file_with_options, CollagenError, GenerationStats, GeneratorOptions, Result};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::time::{Duration, Instant};

/// Events arriving this close together trigger a single rebuild
const DEBOUNCE: Duration = Duration::from_millis(50);

pub fn handle_generate(matches: &clap::ArgMatches, options: GeneratorOptions) -> Result<()> {
    let in_folder = required(matches, "in-folder")?;
    let out_file = required(matches, "out-file")?;

    if matches.get_flag("watch") {
        watch_and_generate(in_folder, out_file, &options)
    } else {
        generate_once(in_folder, out_file, &options, matches.get_flag("stats"))
    }
}

fn required<'a>(matches: &'a clap::ArgMatches, id: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .ok_or_else(|| CollagenError::Config {
            message: format!("Missing required argument --{}", id),
        })
}

fn generate_once(in_folder: &str, out_file: &str, options: &GeneratorOptions, show_stats: bool) -> Result<()> {
    println!("🔨 Generating {} -> {}", in_folder, out_file);

    let start = Instant::now();
    let stats = generate_file_with_options(in_folder, out_file, options)?;
    let elapsed = start.elapsed();

    println!("✅ Generation successful!");
    println!("   Output: {} bytes", stats.output_size);
    println!("   Time: {}ms", elapsed.as_millis());

    if show_stats {
        print_detailed_stats(&stats);
    }

    Ok(())
}

fn watch_and_generate(in_folder: &str, out_file: &str, options: &GeneratorOptions) -> Result<()> {
    println!("👀 Watching {} for changes...", in_folder);

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(e) = tx.send(event) {
                    log::warn!("Watch channel closed: {}", e);
                }
            }
            Err(e) => log::warn!("Watch error: {}", e),
        },
        notify::Config::default(),
    )
    .map_err(|e| watch_error("Failed to create file watcher", e))?;

    watcher
        .watch(Path::new(in_folder), RecursiveMode::Recursive)
        .map_err(|e| watch_error("Failed to watch folder", e))?;

    let out_path = absolute(Path::new(out_file));

    match generate_file_with_options(in_folder, out_file, options) {
        Ok(_) => println!("✅ Initial generation successful"),
        Err(e) => eprintln!("❌ Initial generation failed: {}", e),
    }

    loop {
        let event = match rx.recv() {
            Ok(event) => event,
            Err(e) => {
                log::warn!("Watcher stopped: {}", e);
                break;
            }
        };

        let mut relevant = touches_inputs(&event, &out_path);
        loop {
            match rx.recv_timeout(DEBOUNCE) {
                Ok(event) => relevant |= touches_inputs(&event, &out_path),
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        if !relevant {
            continue;
        }

        println!("🔄 Skeleton changed, regenerating...");
        match generate_file_with_options(in_folder, out_file, options) {
            Ok(stats) => println!(
                "✅ Regenerated successfully ({} bytes, {}ms)",
                stats.output_size, stats.generate_time_ms
            ),
            Err(e) => {
                log::error!("error[{}]: {}", e.kind(), e);
                eprintln!("❌ Generation failed: {}", e);
            }
        }
    }

    Ok(())
}

fn watch_error(context: &str, e: notify::Error) -> CollagenError {
    CollagenError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("{}: {}", context, e),
    ))
}

fn absolute(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    // the output file may not exist yet; resolve its folder instead
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() { Path::new(".") } else { parent };
            parent
                .canonicalize()
                .map(|dir| dir.join(name))
                .unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}

/// Whether an event concerns anything besides the generated file itself.
fn touches_inputs(event: &Event, out_path: &Path) -> bool {
    event.paths.is_empty() || event.paths.iter().any(|path| absolute(path) != out_path)
}

fn print_detailed_stats(stats: &GenerationStats) {
    println!("\n📊 Detailed Generation Statistics:");
    println!("   Manifest size: {} bytes", stats.source_size);
    println!("   Output size: {} bytes", stats.output_size);
    println!("   Generate time: {}ms", stats.generate_time_ms);
    println!("\n   Breakdown:");
    println!("     Elements: {}", stats.resolve.element_count);
    println!("     Text nodes: {}", stats.resolve.text_count);
    println!("     Images: {}", stats.resolve.image_count);
    println!("     Font faces: {}", stats.resolve.font_face_count);
    println!("     Nested SVGs: {}", stats.resolve.nested_svg_count);
    println!("     Interpolations: {}", stats.resolve.interpolation_count);
    println!("     Embedded bytes: {}", stats.resolve.embedded_bytes);
    if stats.resolve.include_count > 0 {
        println!("     Includes: {}", stats.resolve.include_count);
    }
}

// FILE: src/cli/mod.rs

mod config;
mod handlers;

use crate::error::{CollagenError, Result};
use crate::fonts::BundledFonts;
use crate::template::JsonnetCommand;
use crate::GeneratorOptions;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::sync::Arc;

pub struct Cli {
    config: config::ConfigFile,
}

impl Cli {
    pub fn new() -> Self {
        Self {
            config: config::ConfigFile::default(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let matches = build_cli().get_matches();
        self.run_with_matches(&matches)
    }

    pub fn run_with_matches(&mut self, matches: &ArgMatches) -> Result<()> {
        setup_logging(matches.get_count("verbose"))?;

        if let Some(config_path) = matches.get_one::<String>("config") {
            self.config = config::load(config_path)?;
        }

        let options = self.build_generator_options(matches)?;
        handlers::handle_generate(matches, options)
    }

    pub fn build_generator_options(&self, matches: &ArgMatches) -> Result<GeneratorOptions> {
        let mut options = GeneratorOptions {
            debug_mode: matches.get_flag("debug") || self.config.debug.unwrap_or(false),
            ..Default::default()
        };

        if let Some(depth) = matches
            .get_one::<usize>("max-depth")
            .copied()
            .or(self.config.max_include_depth)
        {
            options.max_include_depth = depth;
        }

        let jsonnet = matches
            .get_one::<String>("jsonnet")
            .cloned()
            .or_else(|| self.config.jsonnet_command.clone());
        if let Some(program) = jsonnet {
            options.template_compiler = Some(Arc::new(JsonnetCommand::new(program)));
        }

        let fonts_dir = matches
            .get_one::<String>("fonts-dir")
            .cloned()
            .or_else(|| self.config.fonts_dir.clone());
        if let Some(dir) = fonts_dir {
            let mut fonts = (*BundledFonts::builtin()).clone();
            let loaded = fonts.extend_from_dir(&dir)?;
            log::info!("Loaded {} bundled fonts from {}", loaded, dir);
            options.fonts = Arc::new(fonts);
        }

        // command-line definitions first so they win over config values
        if let Some(defines) = matches.get_many::<String>("define") {
            for define in defines {
                let (name, value) = define.split_once('=').ok_or_else(|| CollagenError::Config {
                    message: format!("Invalid variable definition: {}. Use NAME=VALUE format.", define),
                })?;
                options.custom_variables.push((name.to_string(), value.to_string()));
            }
        }
        if let Some(config_vars) = &self.config.variables {
            for (name, value) in config_vars {
                if !options.custom_variables.iter().any(|(defined, _)| defined == name) {
                    options.custom_variables.push((name.clone(), value.clone()));
                }
            }
        }

        Ok(options)
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_cli() -> Command {
    Command::new(crate::NAME)
        .version(crate::VERSION)
        .about(crate::DESCRIPTION)
        .author("Collagen Development Team")
        .arg(
            Arg::new("in-folder")
                .short('i')
                .long("in-folder")
                .value_name("DIR")
                .help("Skeleton folder containing collagen.json or collagen.jsonnet")
                .required(true),
        )
        .arg(
            Arg::new("out-file")
                .short('o')
                .long("out-file")
                .value_name("FILE")
                .help("Path of the SVG file to write")
                .required(true),
        )
        .arg(
            Arg::new("watch")
                .short('w')
                .long("watch")
                .help("Watch the skeleton folder and regenerate on changes")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path (.toml or .json)")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase verbosity (can be used multiple times)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("define")
                .short('D')
                .long("define")
                .value_name("NAME=VALUE")
                .help("Define a variable for the top-level manifest")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("fonts-dir")
                .long("fonts-dir")
                .value_name("DIR")
                .help("Folder of <Name>.woff2 files usable as bundled fonts"),
        )
        .arg(
            Arg::new("jsonnet")
                .long("jsonnet")
                .value_name("CMD")
                .help("Jsonnet executable used for collagen.jsonnet manifests"),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .value_name("N")
                .value_parser(clap::value_parser!(usize))
                .help("Maximum nesting of included skeletons"),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .help("Show detailed generation statistics")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help("Log every generation phase")
                .action(ArgAction::SetTrue),
        )
}

fn setup_logging(verbose_count: u8) -> Result<()> {
    let log_level = match verbose_count {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    // RUST_LOG directives still refine the level picked here
    env_logger::Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .format_timestamp_secs()
        .try_init()
        .map_err(|e| CollagenError::Config {
            message: format!("Cannot initialise logging: {}", e),
        })
}

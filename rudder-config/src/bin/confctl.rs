//! confctl: inspect and edit a rudder configuration file
//!
//! Loads a configuration file into the standard parameter registry,
//! runs one config command against it, and for `set` writes the result
//! back with the file's structure preserved.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use rudder_config::{
    config_get, load_config, rewrite_config, set_params, BoolParam, ConfigEnum, ConfigRegistry,
    EnumParam, IntKind, NumericEncoding, NumericParam, ParamDescriptor, ParamFlags, StringParam,
    TupleParam,
};
use rudder_utils::{Result, RudderError};

/// Configuration file tool for rudder
#[derive(Parser, Debug)]
#[command(name = "confctl")]
#[command(about = "Inspect and edit rudder configuration files")]
#[command(version)]
struct Cli {
    /// Configuration file to operate on
    #[arg(short, long, env = "RUDDER_CONFIG")]
    config: Option<PathBuf>,

    /// Print results as JSON instead of plain text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show parameters matching the given glob patterns
    Get {
        /// Glob patterns (e.g. 'max*' or 'appendonly')
        #[arg(required = true)]
        patterns: Vec<String>,
    },

    /// Set parameters and rewrite the file
    Set {
        /// Alternating name value pairs
        #[arg(required = true)]
        args: Vec<String>,
    },

    /// Rewrite the file from current values, preserving its structure
    Rewrite,

    /// Dump every parameter with its current value
    Dump,
}

/// The standard parameter set confctl operates on.
fn default_registry() -> Result<ConfigRegistry> {
    let mut reg = ConfigRegistry::new();
    reg.register(
        ParamDescriptor::new(
            "port",
            Box::new(NumericParam::new(IntKind::I32, 6379, 0, 65535)),
        )
        .with_flags(ParamFlags::IMMUTABLE),
    )?;
    reg.register(ParamDescriptor::new(
        "maxclients",
        Box::new(NumericParam::new(IntKind::U32, 10000, 1, 1 << 20)),
    ))?;
    reg.register(ParamDescriptor::new(
        "maxmemory",
        Box::new(
            NumericParam::new(IntKind::I64, 0, -100, i64::MAX)
                .with_encoding(NumericEncoding::MEMORY_OR_PERCENT),
        ),
    ))?;
    reg.register(ParamDescriptor::new(
        "appendonly",
        Box::new(BoolParam::new(false)),
    ))?;
    reg.register(
        ParamDescriptor::new(
            "replica-read-only",
            Box::new(BoolParam::new(true)),
        )
        .with_alias("slave-read-only"),
    )?;
    reg.register(ParamDescriptor::new(
        "loglevel",
        Box::new(EnumParam::new(
            ConfigEnum::new(&[("debug", 0), ("verbose", 1), ("notice", 2), ("warning", 3)]),
            2,
        )),
    ))?;
    reg.register(ParamDescriptor::new(
        "logfile",
        Box::new(StringParam::new(None).empty_is_none()),
    ))?;
    reg.register(
        ParamDescriptor::new("requirepass", Box::new(StringParam::new(None).empty_is_none()))
            .with_flags(ParamFlags::SENSITIVE),
    )?;
    reg.register(
        ParamDescriptor::new(
            "unixsocketperm",
            Box::new(
                NumericParam::new(IntKind::U32, 0, 0, 0o777)
                    .with_encoding(NumericEncoding::OCTAL),
            ),
        )
        .with_flags(ParamFlags::IMMUTABLE),
    )?;
    reg.register(
        ParamDescriptor::new(
            "save",
            Box::new(TupleParam::new(2, &[&["3600", "1"], &["300", "100"]])),
        )
        .with_flags(ParamFlags::MULTI_ARG),
    )?;
    Ok(reg)
}

fn run(cli: Cli) -> Result<()> {
    // Without --config, fall back to the XDG default when present.
    let config = cli.config.clone().or_else(|| {
        let default = rudder_utils::config_file();
        default.exists().then_some(default)
    });

    let mut registry = default_registry()?;
    load_config(&mut registry, config.as_deref(), "")?;

    match cli.command {
        Command::Get { patterns } => {
            let values = config_get(&registry, &patterns);
            if cli.json {
                let json = serde_json::to_string_pretty(&values)
                    .map_err(|e| RudderError::internal(e.to_string()))?;
                println!("{}", json);
            } else {
                for value in values {
                    println!("{} {}", value.name, value.value);
                }
            }
        }
        Command::Set { args } => {
            if args.len() % 2 != 0 {
                return Err(RudderError::validation(
                    "set requires an even number of arguments (name value pairs)",
                ));
            }
            let pairs: Vec<(String, String)> = args
                .chunks(2)
                .map(|pair| (pair[0].clone(), pair[1].clone()))
                .collect();
            set_params(&mut registry, &pairs)?;
            if let Some(path) = &config {
                rewrite_config(&registry, path)?;
            }
            println!("OK");
        }
        Command::Rewrite => {
            let path = config.as_deref().ok_or_else(|| {
                RudderError::validation("rewrite requires a configuration file (--config)")
            })?;
            rewrite_config(&registry, path)?;
            println!("OK");
        }
        Command::Dump => {
            for desc in registry.iter() {
                println!("{} {}", desc.name(), desc.type_iface().get());
            }
        }
    }
    Ok(())
}

fn main() {
    if let Err(e) = rudder_utils::init_logging() {
        eprintln!("{}", e);
    }

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

mod schema;

use anyhow::{Context, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use fs_err as fs;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;
use splash_fieldtypes::{FakeOptions, FieldTypeRegistry, fake_block};
use splash_hash::{checksum, md5_hex};
use splash_render::{render_console, render_fields_md};
use splash_runtime::Runtime;
use splash_runtime::adapters::FsBlobStore;
use splash_runtime::config::{load_config, load_or_default};
use splash_runtime::ports::{BlobStore, LogSink};
use splash_types::price::Price;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "splash",
    version,
    about = "Utilities for Splash connector schemas and data."
)]
struct Cli {
    /// Configuration file (default: ./splash.toml when present).
    #[arg(long, global = true, env = "SPLASH_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Keep debug entries in the protocol log.
    #[arg(long, global = true, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List registered field types.
    Types(TypesArgs),
    /// Validate a JSON value against a field type.
    Validate(ValidateArgs),
    /// Generate a fake value for a field type.
    Fake(FakeArgs),
    /// Checksum of a JSON object or array of scalars.
    Checksum(ChecksumArgs),
    /// Build a price record from one amount and a VAT rate.
    Price(PriceArgs),
    /// Inspect a published schema (JSON array of field descriptors).
    #[command(subcommand)]
    Schema(SchemaCommand),
    /// Local file store operations.
    #[command(subcommand)]
    File(FileCommand),
}

#[derive(Debug, Args)]
struct TypesArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Field type, composite forms included (`int@list`, `objectid::Product`).
    #[arg(long = "type")]
    field_type: String,

    /// JSON encoded value.
    value: String,
}

#[derive(Debug, Args)]
struct FakeArgs {
    #[arg(long = "type")]
    field_type: String,

    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Generation constraint as `key=value`; values are parsed as JSON when possible.
    #[arg(long = "option")]
    options: Vec<String>,
}

#[derive(Debug, Args)]
struct ChecksumArgs {
    /// JSON object or array of scalar values.
    input: String,

    /// Print the readable `key|value` string instead of its hash.
    #[arg(long, default_value_t = false)]
    debug: bool,
}

#[derive(Debug, Args)]
struct PriceArgs {
    #[arg(long, conflicts_with = "tax_incl", required_unless_present = "tax_incl")]
    tax_excl: Option<f64>,

    #[arg(long)]
    tax_incl: Option<f64>,

    /// VAT rate in percent.
    #[arg(long)]
    vat: f64,

    /// ISO currency code.
    #[arg(long)]
    code: String,

    #[arg(long, default_value = "")]
    symbol: String,

    #[arg(long, default_value = "")]
    name: String,
}

#[derive(Debug, Subcommand)]
enum SchemaCommand {
    /// Check types, list encodings and id uniqueness, and optionally a data block.
    Check {
        schema: Utf8PathBuf,
        /// JSON object to validate against the schema.
        #[arg(long)]
        data: Option<Utf8PathBuf>,
    },
    /// Render the schema as a markdown table.
    Render {
        schema: Utf8PathBuf,
        #[arg(long, default_value = "Object")]
        object_type: String,
    },
    /// Generate a write request for every writable field.
    Fake {
        schema: Utf8PathBuf,
        /// Items generated per list.
        #[arg(long, default_value_t = 2)]
        items: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Debug, Args)]
struct FileTarget {
    /// Directory (default: `files_dir` from the configuration).
    #[arg(long)]
    dir: Option<Utf8PathBuf>,

    file: String,
}

#[derive(Debug, Subcommand)]
enum FileCommand {
    /// Show owner, size, checksum and modification time.
    Stat(FileTarget),
    /// Print the file as a base64 record.
    Read(FileTarget),
    /// Store a local file and verify its checksum.
    Write {
        #[command(flatten)]
        target: FileTarget,
        /// Local file to upload.
        #[arg(long)]
        from: Utf8PathBuf,
    },
    Delete(FileTarget),
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        error!("{:?}", e);
        eprintln!("error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => load_config(path).context("load splash.toml config")?,
        None => load_or_default(Utf8Path::new(".")).context("load splash.toml config")?,
    };
    config.debug |= cli.debug;
    debug!("config: {:?}", config);
    let runtime = Runtime::from_config(config)?;

    let result = match cli.cmd {
        Command::Types(args) => cmd_types(args),
        Command::Validate(args) => cmd_validate(&runtime, args),
        Command::Fake(args) => cmd_fake(args),
        Command::Checksum(args) => cmd_checksum(args),
        Command::Price(args) => cmd_price(&runtime, args),
        Command::Schema(cmd) => cmd_schema(cmd),
        Command::File(cmd) => cmd_file(&runtime, cmd),
    };

    let log = runtime.logger.take();
    if !log.is_empty() {
        eprintln!("{}", render_console(&log));
    }
    result
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_json(input: &str) -> anyhow::Result<Value> {
    serde_json::from_str(input).with_context(|| format!("`{input}` is not valid JSON"))
}

fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn cmd_types(args: TypesArgs) -> anyhow::Result<()> {
    let registry = FieldTypeRegistry::builtin();
    match args.format {
        OutputFormat::Text => {
            for name in registry.names() {
                println!("{name}");
            }
        }
        OutputFormat::Json => {
            let names: Vec<&str> = registry.names().collect();
            print_json(&names)?;
        }
    }
    Ok(())
}

fn cmd_validate(runtime: &Runtime, args: ValidateArgs) -> anyhow::Result<()> {
    let registry = FieldTypeRegistry::builtin();
    let value = parse_json(&args.value)?;
    if let Err(e) = registry.validate(&value, &args.field_type) {
        let reason = e.to_string();
        runtime
            .logger
            .err(e.key(), &[args.field_type.as_str(), reason.as_str()]);
        bail!("{e}");
    }
    print_json(&serde_json::json!({ "type": args.field_type, "valid": true }))
}

fn cmd_fake(args: FakeArgs) -> anyhow::Result<()> {
    let registry = FieldTypeRegistry::builtin();
    let mut options = FakeOptions::new();
    for option in &args.options {
        let Some((key, raw)) = option.split_once('=') else {
            bail!("option `{option}` must look like key=value");
        };
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        options.insert(key.to_string(), value);
    }
    let mut rng = rng(args.seed);
    let value = registry.fake(&args.field_type, &options, &mut rng)?;
    print_json(&value)
}

fn cmd_checksum(args: ChecksumArgs) -> anyhow::Result<()> {
    let input = parse_json(&args.input)?;
    let sum = match (&input, args.debug) {
        (Value::Object(map), false) => checksum::from_map(map),
        (Value::Object(map), true) => checksum::debug_from_map(map),
        (Value::Array(values), false) => checksum::from_values(values),
        (Value::Array(_), true) => bail!("--debug needs a JSON object"),
        _ => bail!("checksum input must be a JSON object or array"),
    };
    match sum {
        Some(sum) => {
            println!("{sum}");
            Ok(())
        }
        None => bail!("checksum input may only hold scalar values"),
    }
}

fn cmd_price(runtime: &Runtime, args: PriceArgs) -> anyhow::Result<()> {
    let price = Price::encode(
        args.tax_excl,
        args.vat,
        args.tax_incl,
        &args.code,
        &args.symbol,
        &args.name,
    );
    match price {
        Ok(price) => print_json(&price),
        Err(e) => {
            runtime.logger.err(e.key(), &["price"]);
            bail!("{e}")
        }
    }
}

fn cmd_schema(cmd: SchemaCommand) -> anyhow::Result<()> {
    let registry = FieldTypeRegistry::builtin();
    match cmd {
        SchemaCommand::Check { schema: path, data } => {
            let fields = schema::load_schema(&path)?;
            let mut problems = schema::check_schema(&registry, &fields);
            if let Some(data) = data {
                let data = schema::load_data(&data)?;
                problems.extend(schema::check_data(&registry, &fields, &data));
            }
            print_json(&serde_json::json!({
                "schema": path,
                "fields": fields.len(),
                "problems": problems,
            }))?;
            if !problems.is_empty() {
                bail!("{} problems found in {}", problems.len(), path);
            }
            Ok(())
        }
        SchemaCommand::Render { schema: path, object_type } => {
            let fields = schema::load_schema(&path)?;
            print!("{}", render_fields_md(&object_type, &fields));
            Ok(())
        }
        SchemaCommand::Fake { schema: path, items, seed } => {
            let fields = schema::load_schema(&path)?;
            let mut rng = rng(seed);
            let block = fake_block(&registry, &fields, items, &mut rng)?;
            print_json(&block)
        }
    }
}

fn files_dir(runtime: &Runtime, target: &FileTarget) -> anyhow::Result<Utf8PathBuf> {
    match (&target.dir, &runtime.config.files_dir) {
        (Some(dir), _) | (None, Some(dir)) => Ok(dir.clone()),
        (None, None) => bail!("no --dir given and no files_dir configured"),
    }
}

fn cmd_file(runtime: &Runtime, cmd: FileCommand) -> anyhow::Result<()> {
    let store = FsBlobStore::new(runtime.log());
    match cmd {
        FileCommand::Stat(target) => {
            let dir = files_dir(runtime, &target)?;
            print_json(&store.stat(&dir, &target.file)?)
        }
        FileCommand::Read(target) => {
            let dir = files_dir(runtime, &target)?;
            print_json(&store.read(&dir, &target.file)?)
        }
        FileCommand::Write { target, from } => {
            let dir = files_dir(runtime, &target)?;
            let bytes = fs::read(&from)?;
            let md5 = md5_hex(&bytes);
            store.write(&dir, &target.file, &md5, &STANDARD.encode(&bytes))?;
            print_json(&serde_json::json!({ "file": target.file, "md5": md5 }))
        }
        FileCommand::Delete(target) => {
            let dir = files_dir(runtime, &target)?;
            store.delete(&dir, &target.file)?;
            Ok(())
        }
    }
}

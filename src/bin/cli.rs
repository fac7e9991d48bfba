use clap::{Parser, Subcommand, ValueEnum};
use hospital_schema::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hospital-schema")]
#[command(about = "Inspect hospital entity schemas and validate records against them")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List every entity and the schema variants it provides
    List,
    /// Show the fields of one schema
    Describe {
        /// Entity name (e.g. Patient, reservation-lit)
        #[arg(short, long)]
        entity: String,
        /// Schema variant (base, create, update, with-relations)
        #[arg(short, long, default_value = "base")]
        variant: String,
    },
    /// Validate a JSON record
    Validate {
        /// Entity name
        #[arg(short, long)]
        entity: String,
        /// Schema variant
        #[arg(short, long, default_value = "create")]
        variant: String,
        /// Path to the JSON record
        #[arg(short, long)]
        input: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
        /// Validator configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a form submission given as key=value pairs
    Form {
        /// Entity name
        #[arg(short, long)]
        entity: String,
        /// Schema variant
        #[arg(short, long, default_value = "create")]
        variant: String,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
        /// Submitted fields
        #[arg(value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog = SchemaCatalog::build()?;

    let passed = match cli.command {
        Commands::List => {
            list_entities(&catalog);
            true
        }
        Commands::Describe { entity, variant } => {
            let schema = resolve(&catalog, &entity, &variant)?;
            println!("{}", serde_json::to_string_pretty(&schema.describe())?);
            true
        }
        Commands::Validate {
            entity,
            variant,
            input,
            format,
            config,
        } => {
            let schema = resolve(&catalog, &entity, &variant)?;
            let config = match config {
                Some(path) => ValidatorConfig::from_json_file(path)?,
                None => ValidatorConfig::default(),
            };
            let content = std::fs::read_to_string(&input)?;
            let data: serde_json::Value = serde_json::from_str(&content)?;

            let engine = SchemaValidationEngine::with_config(config);
            report(&schema, engine.validate_json(&schema, &data), format)?
        }
        Commands::Form {
            entity,
            variant,
            format,
            fields,
        } => {
            let schema = resolve(&catalog, &entity, &variant)?;
            let pairs = fields
                .iter()
                .map(|field| parse_pair(field))
                .collect::<Result<Vec<_>>>()?;
            report(&schema, validate_form_data(&schema, pairs), format)?
        }
    };

    if !passed {
        std::process::exit(1);
    }
    Ok(())
}

fn list_entities(catalog: &SchemaCatalog) {
    for (entity, schemas) in catalog.entities() {
        let variants = schemas
            .variants()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{entity:<16} {} fields  [{variants}]",
            schemas.base.len()
        );
    }
}

fn resolve(
    catalog: &SchemaCatalog,
    entity: &str,
    variant: &str,
) -> Result<std::sync::Arc<Schema>> {
    let entity: Entity = entity.parse()?;
    let variant: SchemaVariant = variant.parse()?;
    catalog.schema(entity, variant).ok_or_else(|| {
        HospitalSchemaError::unknown_variant(format!("{entity} has no {variant} schema"))
    })
}

fn parse_pair(field: &str) -> Result<(String, String)> {
    let (key, value) = field.split_once('=').ok_or_else(|| {
        HospitalSchemaError::config(format!("expected KEY=VALUE, got '{field}'"))
    })?;
    Ok((key.to_string(), value.to_string()))
}

/// Print the outcome; returns whether validation passed.
fn report(
    schema: &Schema,
    outcome: std::result::Result<Record, ValidationError>,
    format: OutputFormat,
) -> Result<bool> {
    match (format, outcome) {
        (OutputFormat::Json, Ok(record)) => {
            let payload = serde_json::json!({
                "schema": schema.name(),
                "valid": true,
                "data": record_to_json(&record),
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(true)
        }
        (OutputFormat::Json, Err(err)) => {
            let mut payload = err.to_json();
            payload["valid"] = serde_json::Value::Bool(false);
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(false)
        }
        (OutputFormat::Text, Ok(record)) => {
            println!("✅ {} is valid", schema.name());
            println!("{}", serde_json::to_string_pretty(&record_to_json(&record))?);
            Ok(true)
        }
        (OutputFormat::Text, Err(err)) => {
            println!(
                "❌ {} failed validation with {} violations:\n",
                schema.name(),
                err.len()
            );
            for violation in err.violations() {
                println!("  [{}] {}", code_label(violation.code), violation);
            }
            Ok(false)
        }
    }
}

fn code_label(code: ViolationCode) -> String {
    serde_json::to_value(code)
        .ok()
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_default()
}

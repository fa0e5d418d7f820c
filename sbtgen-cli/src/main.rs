use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::{debug, info};

use sbtgen::{
    compose,
    dispatch::{TextureMacros, Variant},
    table::SbtTable,
};

/// Generates shader binding table dispatch functions and appends them to a
/// shader source file
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Shader binding table (JSON)
    #[clap(short, long, default_value = "sbt.json")]
    table: PathBuf,

    /// Base shader source, copied to the start of the output
    #[clap(short, long, default_value = "shader.cl")]
    shader: PathBuf,

    /// Name of the combined shader source to write
    #[clap(short, long, default_value = "tmp.cl")]
    out: PathBuf,

    /// Dispatch variant
    #[clap(short, long, value_enum, default_value_t = VariantMode::Textured)]
    variant: VariantMode,

    /// Macro appended to dispatch function parameters (textured variant)
    #[clap(long, default_value = "TEXTURE_TYPE")]
    texture_type_macro: String,

    /// Macro appended to shader call arguments (textured variant)
    #[clap(long, default_value = "TEXTURE_PARAM")]
    texture_param_macro: String,
}

#[derive(ValueEnum, Clone)]
enum VariantMode {
    /// Hit and miss dispatch, reporting unbound indices at runtime
    Legacy,

    /// Any-hit, hit, and miss dispatch with texture parameters
    Textured,
}

impl Args {
    fn variant(&self) -> Variant {
        match self.variant {
            VariantMode::Legacy => Variant::legacy(),
            VariantMode::Textured => Variant {
                texture: Some(TextureMacros {
                    ty: self.texture_type_macro.clone(),
                    param: self.texture_param_macro.clone(),
                }),
                ..Variant::textured()
            },
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .init();

    let args = Args::parse();

    let now = Instant::now();
    let table = SbtTable::load(&args.table)
        .with_context(|| format!("failed to load table {:?}", args.table))?;
    for (i, record) in table.iter().enumerate() {
        info!("[{i}] {record}");
    }
    info!("Loaded {} records in {:?}", table.len(), now.elapsed());

    let base = compose::read_source(&args.shader)
        .with_context(|| format!("failed to read shader {:?}", args.shader))?;

    let start = Instant::now();
    let functions = compose::generate(&table, &args.variant());
    for f in &functions {
        debug!("Generated {} dispatch:\n{f}", f.kind().name());
    }
    let out = compose::compose(&base, &functions);
    info!(
        "Generated {} dispatch functions in {:?}",
        functions.len(),
        start.elapsed()
    );

    info!("Writing shader to {:?}", args.out);
    compose::write_artifact(&args.out, &out)
        .with_context(|| format!("failed to write {:?}", args.out))?;
    Ok(())
}

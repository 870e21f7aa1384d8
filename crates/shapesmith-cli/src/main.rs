//! Shapesmith CLI - build shapes from JSON descriptors and export meshes

mod document;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use document::{Document, ShapeRegistry};
use shapesmith_core::builder::{Built, build};
use shapesmith_core::config::{KernelConfig, MAX_MESH_RESOLUTION};
use shapesmith_core::descriptor::{Descriptor, ShapeKind};
use shapesmith_core::export::MeshExport;
use shapesmith_core::kernel::KernelIntrospect;
use shapesmith_core::primitive::required_parameters;
use shapesmith_core::sdf::SdfKernel;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shapesmith")]
#[command(
    about = "Declarative CSG: JSON shape descriptors to solids and meshes",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Log build stages (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Kernel sampling options shared by the build commands
#[derive(clap::Args)]
struct KernelArgs {
    /// Mesh resolution (cells along the longest axis)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_MESH_RESOLUTION))
    )]
    resolution: Option<u32>,

    /// JSON file with kernel settings
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a single shape descriptor
    Build {
        /// Descriptor file
        input: PathBuf,

        /// Output mesh file (format auto-detected from extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        kernel: KernelArgs,
    },

    /// Build a design document whose booleans refer to shapes by id
    Document {
        /// Document file
        input: PathBuf,

        /// Output mesh file (format auto-detected from extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        kernel: KernelArgs,
    },

    /// List the supported shape kinds and their required parameters
    Kinds,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Build {
            input,
            output,
            kernel,
        } => {
            run_build(&input, output.as_deref(), &kernel)?;
        }
        Commands::Document {
            input,
            output,
            kernel,
        } => {
            run_document(&input, output.as_deref(), &kernel)?;
        }
        Commands::Kinds => {
            print_kinds();
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_kernel(args: &KernelArgs) -> Result<SdfKernel> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str::<KernelConfig>(&text)
                .with_context(|| format!("Invalid kernel config in {}", path.display()))?
        }
        None => KernelConfig::default(),
    };
    if let Some(resolution) = args.resolution {
        config = config.with_mesh_resolution(resolution);
    }
    let kernel = SdfKernel::new(config);
    info!(config = ?kernel.config(), "Kernel configured");
    Ok(kernel)
}

fn run_build(input: &Path, output: Option<&Path>, args: &KernelArgs) -> Result<()> {
    let kernel = load_kernel(args)?;
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let descriptor = Descriptor::from_str_json(&text)
        .with_context(|| format!("In {}", input.display()))?;

    if descriptor.kind().is_boolean() {
        bail!(
            "'{}' needs operand shapes; use `shapesmith document` instead",
            descriptor.kind()
        );
    }

    println!("Building {} from {}...", descriptor.kind(), input.display());
    let built = build(&kernel, &descriptor)?;
    report(&kernel, &built, output)
}

fn run_document(input: &Path, output: Option<&Path>, args: &KernelArgs) -> Result<()> {
    let kernel = load_kernel(args)?;
    let document = Document::load(input)?;
    let output_id = document.output_id()?;

    println!("Building {} shapes from {}...", document.shapes.len(), input.display());
    let registry = ShapeRegistry::build_document(&kernel, &document)?;
    info!(shapes = registry.len(), output = %output_id, "Document built");

    let Some(built) = registry.get(&output_id) else {
        bail!("Output shape '{output_id}' was not built");
    };
    println!("Output shape: {output_id}");
    report(&kernel, built, output)
}

/// Print a summary of the result and write its mesh if asked to
fn report(kernel: &SdfKernel, built: &Built<SdfKernel>, output: Option<&Path>) -> Result<()> {
    println!("  Dimension: {:?}", built.dimension());
    match kernel.bounds(built.shape()) {
        Some(b) => println!(
            "  Bounds:    [{:.3}, {:.3}, {:.3}] .. [{:.3}, {:.3}, {:.3}]",
            b.min.x, b.min.y, b.min.z, b.max.x, b.max.y, b.max.z
        ),
        None => println!("  Bounds:    empty"),
    }
    println!("  Volume:    {:.4}", kernel.volume(built.shape()));

    if let Some(mesh) = built.mesh() {
        println!(
            "  Mesh:      {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        );
    }

    if let Some(path) = output {
        let Some(mesh) = built.mesh() else {
            bail!("A curve has no mesh to export");
        };
        let format = mesh.export(path)?;
        println!("Exported {} to {}", format.name(), path.display());
    }

    Ok(())
}

fn print_kinds() {
    println!("Shape kinds:");
    for kind in ShapeKind::all() {
        if kind.is_boolean() {
            println!("  {:<10} shapes: [id, ...]", kind.tag());
        } else {
            println!("  {:<10} {}", kind.tag(), required_parameters(kind).join(", "));
        }
    }
}

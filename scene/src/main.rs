//! scene-inspect - glTF scene inspection tool
//!
//! Loads a glTF/GLB scene through nether-scene and reports what a renderer
//! would receive: scene structure, per-frame drawdata and primitive buffers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glam::Mat4;
use std::path::{Path, PathBuf};

use nether_scene::{AnimationKey, AnimationSelector, Document, LoadConfig, Model};

#[derive(Parser)]
#[command(name = "scene-inspect")]
#[command(about = "Inspect glTF scenes as render data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print scene structure: nodes, meshes, skins, animations
    Info {
        /// Input glTF/GLB file
        input: PathBuf,

        /// Load configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the drawdata for one frame
    Draw {
        /// Input glTF/GLB file
        input: PathBuf,

        /// Animation to apply, by name or index
        #[arg(short, long)]
        animation: Option<String>,

        /// Animation time in seconds
        #[arg(short, long, default_value_t = 0.0)]
        time: f32,

        /// Load configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write per-primitive vertex (.vtx), index (.idx) and shadow (.svtx, .sidx) blobs
    Export {
        /// Input glTF/GLB file
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Load configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info { input, config } => {
            let model = load_model(&input, config.as_deref())?;
            print_info(&input, &model);
        }

        Commands::Draw {
            input,
            animation,
            time,
            config,
        } => {
            let model = load_model(&input, config.as_deref())?;
            let keys: Vec<AnimationKey> = animation
                .map(|selector| AnimationKey::new(parse_selector(&selector), time))
                .into_iter()
                .collect();
            let overrides = model
                .evaluate_animations(&keys)
                .context("Failed to evaluate animation")?;
            print_frame(&model, &overrides);
        }

        Commands::Export {
            input,
            output,
            config,
        } => {
            let model = load_model(&input, config.as_deref())?;
            tracing::info!("Exporting {:?} -> {:?}", input, output);
            export_buffers(&model, &output)?;
            tracing::info!("Done!");
        }
    }

    Ok(())
}

fn load_model(input: &Path, config: Option<&Path>) -> Result<Model> {
    let config = match config {
        Some(path) => LoadConfig::load(path)
            .with_context(|| format!("Failed to load config: {:?}", path))?,
        None => LoadConfig::default(),
    };
    let document =
        Document::from_path(input).with_context(|| format!("Failed to load glTF: {:?}", input))?;
    Model::load(&document, &config, None).map_err(|e| anyhow::anyhow!("{}", e.trace()))
}

/// A selector that parses as an integer is an index, anything else a name.
fn parse_selector(selector: &str) -> AnimationSelector {
    match selector.parse::<usize>() {
        Ok(index) => AnimationSelector::Index(index),
        Err(_) => AnimationSelector::Name(selector.to_owned()),
    }
}

fn print_info(input: &Path, model: &Model) {
    tracing::info!("Scene {:?}:", input);
    tracing::info!(
        "  {} nodes ({} renderable), roots {:?}",
        model.nodes.len(),
        model.topology.renderable.iter().filter(|&&r| r).count(),
        model.roots
    );

    tracing::info!("Meshes:");
    for (i, mesh) in model.meshes.iter().enumerate() {
        let name = mesh.name.as_deref().unwrap_or("unnamed");
        tracing::info!("  [{}] '{}': {} primitives", i, name, mesh.primitives.len());
        for (p, primitive) in mesh.primitives.iter().enumerate() {
            let bounds = primitive.bounds();
            tracing::info!(
                "    #{}: {} vertices, {} indices, material {:?}, skinned {}, bounds {:?}..{:?}",
                p,
                primitive.vertex_count(),
                primitive.indices().len(),
                primitive.material(),
                primitive.is_skinned(),
                bounds.min,
                bounds.max
            );
        }
    }

    if !model.skins.is_empty() {
        tracing::info!("Skins:");
        for (i, skin) in model.skins.skins.iter().enumerate() {
            tracing::info!("  [{}] {} joints at offset {}", i, skin.len, skin.offset);
        }
    }

    if !model.animations.is_empty() {
        tracing::info!("Animations:");
        for (i, animation) in model.animations.iter().enumerate() {
            let name = animation.name.as_deref().unwrap_or("unnamed");
            tracing::info!(
                "  [{}] '{}': {} channels, {:.3}s",
                i,
                name,
                animation.channels.len(),
                animation.duration()
            );
        }
    }
}

fn print_frame(model: &Model, overrides: &[nether_scene::TransformOverride]) {
    let frame = model.generate_frame(Mat4::IDENTITY, overrides);
    tracing::info!(
        "{} draws, {} joint matrices",
        frame.drawdata.len(),
        frame.joint_matrices.len()
    );
    for (i, draw) in frame.drawdata.iter().enumerate() {
        let (scale, rotation, translation) = draw.world_matrix.to_scale_rotation_translation();
        tracing::info!(
            "  [{}] mesh {} primitive {} material {:?} joints {:?} t={:?} r={:?} s={:?}",
            i,
            draw.primitive.mesh,
            draw.primitive.primitive,
            draw.material,
            draw.joint_offset,
            translation,
            rotation,
            scale
        );
    }
}

fn export_buffers(model: &Model, output: &Path) -> Result<()> {
    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {:?}", output))?;

    for (primitive, buffers) in model.primitive_buffers() {
        let stem = format!("mesh{}_prim{}", primitive.mesh, primitive.primitive);
        let vtx = output.join(format!("{}.vtx", stem));
        let idx = output.join(format!("{}.idx", stem));

        std::fs::write(&vtx, &buffers.vertex_bytes)
            .with_context(|| format!("Failed to write {:?}", vtx))?;
        std::fs::write(&idx, &buffers.index_bytes)
            .with_context(|| format!("Failed to write {:?}", idx))?;

        let shadow_vtx = output.join(format!("{}.svtx", stem));
        let shadow_idx = output.join(format!("{}.sidx", stem));
        std::fs::write(&shadow_vtx, &buffers.shadow_vertex_bytes)
            .with_context(|| format!("Failed to write {:?}", shadow_vtx))?;
        std::fs::write(&shadow_idx, &buffers.shadow_index_bytes)
            .with_context(|| format!("Failed to write {:?}", shadow_idx))?;

        tracing::info!(
            "  {}: {} bytes vertices ({}), {} indices, {} shadow indices",
            stem,
            buffers.vertex_bytes.len(),
            if buffers.skinned { "skinned" } else { "static" },
            buffers.index_count,
            buffers.shadow_index_count
        );
    }

    Ok(())
}

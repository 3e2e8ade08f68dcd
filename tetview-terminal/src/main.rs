/// tetview - spin a tetrahedral VTK mesh as a terminal wireframe
///
/// Controls:
///   - Arrow keys / WASD: Rotate the mesh
///   - Space: Pause the spin
///   - P: Toggle perspective / orthographic
///   - Q/ESC: Quit
use std::path::PathBuf;

use clap::Parser;
use log::info;
use nalgebra::Vector3;
use tetview_core::{TetMesh, VtkReader};
use tetview_terminal::{FaceOrderSetting, Viewer, ViewerConfig, ViewerError};

#[derive(Parser)]
#[command(name = "tetview")]
#[command(version, about = "Spin a tetrahedral VTK mesh in the terminal")]
struct Cli {
    /// Legacy VTK ASCII file with POINTS and CELLS sections.
    mesh: Option<PathBuf>,

    /// Viewer config (TOML). Flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// World-space translation of the mesh.
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    offset: Option<Vec<f64>>,

    /// Spin rate around the vertical axis.
    #[arg(long)]
    degrees_per_second: Option<f32>,

    /// Target frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Reject VTK sections other than POINTS and CELLS.
    #[arg(long)]
    strict: bool,

    /// Wind every face outward instead of the legacy face order.
    #[arg(long)]
    outward_faces: bool,

    /// Show the built-in cube instead of loading a file.
    #[arg(long)]
    demo: bool,

    /// Print mesh statistics and exit without opening the viewer.
    #[arg(long)]
    info: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<ViewerConfig, ViewerError> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::load(path)?,
            None => ViewerConfig::default(),
        };

        if let Some(mesh) = &self.mesh {
            config.mesh = mesh.clone();
        }
        if let Some([x, y, z]) = self.offset.as_deref() {
            config.offset = [*x, *y, *z];
        }
        if let Some(rate) = self.degrees_per_second {
            config.degrees_per_second = rate;
        }
        if let Some(fps) = self.fps {
            config.target_fps = fps;
        }
        config.strict |= self.strict;
        if self.outward_faces {
            config.face_order = FaceOrderSetting::Outward;
        }
        Ok(config)
    }
}

fn load_mesh(cli: &Cli, config: &ViewerConfig) -> Result<(TetMesh, String), ViewerError> {
    let offset: Vector3<f64> = config.offset_vector();
    if cli.demo {
        return Ok((TetMesh::cube(2.0, offset), "demo cube".to_string()));
    }

    info!("loading {}", config.mesh.display());
    let mesh = VtkReader::new()
        .strict(config.strict)
        .read_file(&config.mesh, offset)?;
    Ok((mesh, config.mesh.display().to_string()))
}

fn print_info(name: &str, mesh: &TetMesh) {
    println!("{name}");
    println!("  points:      {}", mesh.num_points());
    println!("  tetrahedra:  {}", mesh.num_tetras());
    println!("  indices:     {}", mesh.num_indices());
    if let Some((min, max)) = mesh.bounds() {
        println!("  bounds min:  {:.4} {:.4} {:.4}", min.x, min.y, min.z);
        println!("  bounds max:  {:.4} {:.4} {:.4}", max.x, max.y, max.z);
    }
}

fn run(cli: Cli) -> Result<(), ViewerError> {
    let config = cli.resolve_config()?;
    let (mesh, name) = load_mesh(&cli, &config)?;

    if cli.info {
        print_info(&name, &mesh);
        return Ok(());
    }

    let buffers = mesh.draw_buffers(config.face_order.into());
    info!(
        "uploading {} points and {} indices",
        buffers.num_points(),
        buffers.num_indices()
    );

    let mut viewer = Viewer::new(buffers, &config, name)?;
    viewer.run()?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

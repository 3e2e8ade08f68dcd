use tetview_core::{read_vtk_file, FaceOrder};
use tetview_terminal::{RenderContext, ViewerConfig};

const SAMPLE_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../resources/tetview.toml");
const RESOURCES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/..");

#[test]
fn test_sample_config_matches_defaults() {
    let config = ViewerConfig::load(SAMPLE_CONFIG).unwrap();
    assert_eq!(config, ViewerConfig::default());
}

#[test]
fn test_configured_mesh_renders() {
    let config = ViewerConfig::load(SAMPLE_CONFIG).unwrap();
    let mesh = read_vtk_file(
        format!("{RESOURCES}/{}", config.mesh.display()),
        config.offset_vector(),
    )
    .unwrap();

    let buffers = mesh.draw_buffers(FaceOrder::from(config.face_order));
    let camera = config.camera.to_camera(100, 50);
    let mut context = RenderContext::new(buffers, camera, config.degrees_per_second, 100, 50);

    for _ in 0..12 {
        context.update(1.0 / config.target_fps as f32);
        assert_eq!(context.render(), 30);
    }
    assert!(context.renderer().lit_cells() > 0);
}

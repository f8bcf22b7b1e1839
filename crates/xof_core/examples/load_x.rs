//! Example: Load and inspect a DirectX .x file.
//!
//! Run with: cargo run --example load_x -- assets/test_cube.x

use std::env;

use xof_core::scene::{Frame, SceneNode};
use xof_core::xfile::load_x;
use xof_math::ImportConfig;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: load_x <path-to-x-file> [more files...]");
        println!("\nExamples:");
        println!("  cargo run --example load_x -- assets/test_cube.x");
        println!("  cargo run --example load_x -- a.x b.x c.x");
        return;
    }

    let config = ImportConfig::default();

    for path in &args[1..] {
        println!("Loading X file: {}", path);

        match load_x(path, config) {
            Ok(scene) => {
                println!("\n=== Scene: {} ===", scene.name);
                println!("Frames: {}", scene.frame_count());
                println!("Meshes: {}", scene.mesh_count());
                println!("Total faces: {}", scene.total_face_count());
                println!("Named materials: {}", scene.materials.len());

                println!("\n--- Nodes ---");
                for node in &scene.nodes {
                    match node {
                        SceneNode::Frame(frame) => print_frame(frame, 1),
                        SceneNode::Mesh(mesh) => {
                            println!(
                                "  Mesh - {} vertices, {} faces",
                                mesh.vertex_count(),
                                mesh.face_count()
                            );
                        }
                    }
                }

                let world_bounds = scene.world_bounds();
                println!("\n--- World Bounds ---");
                println!(
                    "  Min: ({:.2}, {:.2}, {:.2})",
                    world_bounds.x.min, world_bounds.y.min, world_bounds.z.min
                );
                println!(
                    "  Max: ({:.2}, {:.2}, {:.2})",
                    world_bounds.x.max, world_bounds.y.max, world_bounds.z.max
                );
            }
            Err(e) => {
                eprintln!("Error loading X file: {}", e);
            }
        }
        println!();
    }
}

fn print_frame(frame: &Frame, depth: usize) {
    let indent = "  ".repeat(depth);
    let name = frame.name.as_deref().unwrap_or("<unnamed>");
    match &frame.mesh {
        Some(mesh) => println!(
            "{}Frame {} - mesh with {} vertices, {} faces",
            indent,
            name,
            mesh.vertex_count(),
            mesh.face_count()
        ),
        None => println!("{}Frame {}", indent, name),
    }
    for child in &frame.children {
        print_frame(child, depth + 1);
    }
}

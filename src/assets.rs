//! Model loading collaborator and procedural fallback geometry.
//!
//! Loads decode on a worker thread and are polled once per frame — no
//! completion callbacks. A failed or timed-out load is non-fatal: the caller
//! swaps in fallback geometry and the simulation never notices, since float
//! and interaction logic do not depend on the visual mesh.

use std::f32::consts::TAU;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use log::warn;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),
    #[error("model parse error: {0}")]
    Parse(String),
    #[error("model load exceeded {0:?}")]
    Timeout(Duration),
    #[error("loader thread disappeared")]
    WorkerGone,
}

/// Vertex format shared by loaded and procedural meshes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct BodyVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Opaque renderable geometry attached at a body's transform.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub vertices: Vec<BodyVertex>,
    pub indices: Vec<u32>,
}

/// Poll result for an in-flight model load.
pub enum LoadPoll {
    Pending,
    Ready(MeshData),
    Failed(AssetError),
}

/// One in-flight model load. Poll once per frame; after `Ready`/`Failed`
/// the handle is spent and keeps reporting `Failed(WorkerGone)`.
pub struct ModelLoad {
    rx: Receiver<Result<MeshData, AssetError>>,
    started: Instant,
    timeout: Duration,
    done: bool,
}

impl ModelLoad {
    /// Read and decode `path` on a worker thread.
    pub fn spawn(path: impl Into<PathBuf>, timeout: Duration) -> Self {
        let path = path.into();
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let result = std::fs::read_to_string(&path)
                .map_err(AssetError::from)
                .and_then(|text| parse_obj(&text));
            // Receiver may be gone if the host dropped the handle; fine.
            let _ = tx.send(result);
        });
        Self {
            rx,
            started: Instant::now(),
            timeout,
            done: false,
        }
    }

    pub fn poll(&mut self) -> LoadPoll {
        if self.done {
            return LoadPoll::Failed(AssetError::WorkerGone);
        }
        match self.rx.try_recv() {
            Ok(Ok(mesh)) => {
                self.done = true;
                LoadPoll::Ready(mesh)
            }
            Ok(Err(e)) => {
                self.done = true;
                LoadPoll::Failed(e)
            }
            Err(TryRecvError::Empty) => {
                if self.started.elapsed() > self.timeout {
                    self.done = true;
                    warn!("model load timed out after {:?}", self.timeout);
                    LoadPoll::Failed(AssetError::Timeout(self.timeout))
                } else {
                    LoadPoll::Pending
                }
            }
            Err(TryRecvError::Disconnected) => {
                self.done = true;
                LoadPoll::Failed(AssetError::WorkerGone)
            }
        }
    }
}

/// Minimal OBJ decode: `v`, `vn`, and triangulated `f` records with
/// `v`, `v//vn`, or `v/vt/vn` references. Texture coordinates are ignored.
pub fn parse_obj(text: &str) -> Result<MeshData, AssetError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut vertices: Vec<BodyVertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    let parse_f32 = |s: &str, line: usize| {
        s.parse::<f32>()
            .map_err(|_| AssetError::Parse(format!("bad number '{}' on line {}", s, line)))
    };

    for (line_no, line) in text.lines().enumerate() {
        let line_no = line_no + 1;
        let mut fields = line.split_whitespace();
        match fields.next() {
            Some(tag @ ("v" | "vn")) => {
                let mut take = |_label| {
                    fields
                        .next()
                        .ok_or_else(|| {
                            AssetError::Parse(format!("short {} record on line {}", tag, line_no))
                        })
                        .and_then(|s| parse_f32(s, line_no))
                };
                let v = Vec3::new(take("x")?, take("y")?, take("z")?);
                if tag == "v" {
                    positions.push(v);
                } else {
                    normals.push(v);
                }
            }
            Some("f") => {
                let mut corner_indices = Vec::new();
                for corner in fields {
                    let mut refs = corner.split('/');
                    let pos_index = refs
                        .next()
                        .and_then(|s| s.parse::<usize>().ok())
                        .ok_or_else(|| {
                            AssetError::Parse(format!("bad face corner on line {}", line_no))
                        })?;
                    let normal_index = refs.nth(1).and_then(|s| s.parse::<usize>().ok());

                    let position = *positions.get(pos_index - 1).ok_or_else(|| {
                        AssetError::Parse(format!("face references missing vertex {}", pos_index))
                    })?;
                    let normal = normal_index
                        .and_then(|n| normals.get(n - 1).copied())
                        .unwrap_or(Vec3::Y);

                    corner_indices.push(vertices.len() as u32);
                    vertices.push(BodyVertex {
                        position: position.to_array(),
                        normal: normal.to_array(),
                    });
                }
                if corner_indices.len() < 3 {
                    return Err(AssetError::Parse(format!(
                        "face with fewer than 3 corners on line {}",
                        line_no
                    )));
                }
                // Fan triangulation
                for i in 1..corner_indices.len() - 1 {
                    indices.push(corner_indices[0]);
                    indices.push(corner_indices[i]);
                    indices.push(corner_indices[i + 1]);
                }
            }
            _ => {} // comments, groups, materials: ignored
        }
    }

    if vertices.is_empty() {
        return Err(AssetError::Parse("no faces in model".to_string()));
    }
    Ok(MeshData { vertices, indices })
}

/// Axis-aligned box with flat-shaded faces, centered on the origin.
pub fn box_mesh(extents: Vec3) -> MeshData {
    let h = extents * 0.5;
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (-Vec3::X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (-Vec3::Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (-Vec3::Z, Vec3::Y, Vec3::X),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let base = vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let corner = (normal + u * su + v * sv) * h;
            vertices.push(BodyVertex {
                position: corner.to_array(),
                normal: normal.to_array(),
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    MeshData { vertices, indices }
}

/// Open cylinder with slightly tapered base, used for the fallback buoy.
pub fn cylinder_mesh(radius_top: f32, radius_bottom: f32, height: f32, segments: usize) -> MeshData {
    let mut vertices = Vec::with_capacity(segments * 2 + 2);
    let mut indices = Vec::new();
    let half = height * 0.5;

    for i in 0..segments {
        let angle = i as f32 / segments as f32 * TAU;
        let (sin_a, cos_a) = angle.sin_cos();
        let normal = [cos_a, 0.0, sin_a];
        vertices.push(BodyVertex {
            position: [cos_a * radius_bottom, -half, sin_a * radius_bottom],
            normal,
        });
        vertices.push(BodyVertex {
            position: [cos_a * radius_top, half, sin_a * radius_top],
            normal,
        });
    }
    for i in 0..segments {
        let a = (i * 2) as u32;
        let b = ((i + 1) % segments * 2) as u32;
        indices.extend_from_slice(&[a, a + 1, b, b, a + 1, b + 1]);
    }

    // Top cap fan
    let cap_center = vertices.len() as u32;
    vertices.push(BodyVertex {
        position: [0.0, half, 0.0],
        normal: [0.0, 1.0, 0.0],
    });
    for i in 0..segments {
        let a = (i * 2 + 1) as u32;
        let b = ((i + 1) % segments * 2 + 1) as u32;
        indices.extend_from_slice(&[cap_center, b, a]);
    }

    MeshData { vertices, indices }
}

/// Low-poly UV sphere, used for buoy glow shells.
pub fn sphere_mesh(radius: f32, rings: usize, sectors: usize) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for r in 0..=rings {
        let phi = r as f32 / rings as f32 * std::f32::consts::PI;
        for s in 0..=sectors {
            let theta = s as f32 / sectors as f32 * TAU;
            let n = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            vertices.push(BodyVertex {
                position: (n * radius).to_array(),
                normal: n.to_array(),
            });
        }
    }
    let stride = (sectors + 1) as u32;
    for r in 0..rings as u32 {
        for s in 0..sectors as u32 {
            let a = r * stride + s;
            indices.extend_from_slice(&[a, a + stride, a + 1, a + 1, a + stride, a + stride + 1]);
        }
    }

    MeshData { vertices, indices }
}

/// Fallback boat: an elongated hull box.
pub fn fallback_boat() -> MeshData {
    box_mesh(Vec3::new(2.0, 0.5, 6.0))
}

/// Fallback buoy: tapered body with a marker post on top.
pub fn fallback_buoy() -> MeshData {
    let mut body = cylinder_mesh(1.0, 1.2, 3.0, 8);
    let marker = cylinder_mesh(0.3, 0.3, 0.5, 6);
    let base = body.vertices.len() as u32;
    body.vertices.extend(marker.vertices.into_iter().map(|mut v| {
        v.position[1] += 1.75;
        v
    }));
    body.indices.extend(marker.indices.iter().map(|i| i + base));
    body
}

/// Fallback glow shell around a buoy.
pub fn glow_shell() -> MeshData {
    sphere_mesh(6.0, 6, 6)
}

/// Convenience: spawn a load with a float-seconds timeout.
pub fn load_model(path: &Path, timeout_s: f32) -> ModelLoad {
    ModelLoad::spawn(path, Duration::from_secs_f32(timeout_s))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE_OBJ: &str = "\
# simple wedge
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1
";

    #[test]
    fn parses_a_minimal_obj() {
        let mesh = parse_obj(TRIANGLE_OBJ).unwrap();
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn triangulates_quads_as_fans() {
        let obj = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";
        let mesh = parse_obj(obj).unwrap();
        assert_eq!(mesh.indices.len(), 6);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_obj("v 1 2").is_err());
        assert!(parse_obj("f 1 2 9").is_err());
        assert!(parse_obj("").is_err());
    }

    #[test]
    fn fallback_meshes_are_well_formed() {
        for mesh in [fallback_boat(), fallback_buoy(), glow_shell()] {
            assert!(!mesh.vertices.is_empty());
            assert_eq!(mesh.indices.len() % 3, 0);
            let max = *mesh.indices.iter().max().unwrap() as usize;
            assert!(max < mesh.vertices.len());
        }
    }

    #[test]
    fn load_reports_missing_file() {
        let mut load = ModelLoad::spawn("definitely/not/here.obj", Duration::from_secs(2));
        // Worker finishes quickly; poll until it reports
        let deadline = Instant::now() + Duration::from_secs(1);
        loop {
            match load.poll() {
                LoadPoll::Pending => {
                    assert!(Instant::now() < deadline, "load never resolved");
                    std::thread::sleep(Duration::from_millis(5));
                }
                LoadPoll::Failed(AssetError::Io(_)) => break,
                LoadPoll::Failed(other) => panic!("unexpected error: {}", other),
                LoadPoll::Ready(_) => panic!("missing file cannot load"),
            }
        }
    }

    #[test]
    fn timeout_fails_the_load() {
        // Channel never written: fabricate by holding the receiver open via
        // a load against a FIFO-less path with zero timeout
        let mut load = ModelLoad::spawn("also/not/here.obj", Duration::from_secs(0));
        std::thread::sleep(Duration::from_millis(10));
        // Either the IO error or the timeout may win the race; both are
        // terminal failures, which is what the caller relies on.
        match load.poll() {
            LoadPoll::Failed(_) => {}
            _ => panic!("expected a terminal failure"),
        }
    }
}

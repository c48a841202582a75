use glam::{Vec2, Vec3};

/// Errors from building terrain surfaces.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    #[error("index count {0} is not a multiple of three")]
    RaggedIndices(usize),
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("surface {0:?} contains non-finite vertices")]
    NonFinite(String),
    #[error("height grid needs at least 2x2 samples, got {0}x{1}")]
    GridTooSmall(usize, usize),
}

/// A static surface the character can stand on.
pub trait TerrainSurface {
    /// Cast a ray straight down from `origin`. Returns the elevation of the
    /// highest hit at or below `origin.y`, or `None` over a gap.
    fn cast_down(&self, origin: Vec3) -> Option<f32>;

    fn name(&self) -> &str;
}

/// Horizontal plane at a fixed height, optionally limited to a square footprint.
#[derive(Debug, Clone)]
pub struct GroundPlane {
    pub height: f32,
    /// Half the side length of the footprint; `f32::INFINITY` for an unbounded plane.
    pub half_extent: f32,
}

impl GroundPlane {
    pub fn infinite(height: f32) -> Self {
        Self {
            height,
            half_extent: f32::INFINITY,
        }
    }

    pub fn square(height: f32, half_extent: f32) -> Self {
        Self {
            height,
            half_extent: half_extent.abs(),
        }
    }
}

impl TerrainSurface for GroundPlane {
    fn cast_down(&self, origin: Vec3) -> Option<f32> {
        let inside = origin.x.abs() <= self.half_extent && origin.z.abs() <= self.half_extent;
        (inside && self.height <= origin.y).then_some(self.height)
    }

    fn name(&self) -> &str {
        "ground_plane"
    }
}

/// Static triangle soup, queried with vertical rays.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    name: String,
    triangles: Vec<[Vec3; 3]>,
    min_xz: Vec2,
    max_xz: Vec2,
}

impl TriangleMesh {
    /// Build from explicit triangles.
    pub fn from_triangles(
        name: impl Into<String>,
        triangles: Vec<[Vec3; 3]>,
    ) -> Result<Self, TerrainError> {
        let name = name.into();
        let mut min_xz = Vec2::splat(f32::INFINITY);
        let mut max_xz = Vec2::splat(f32::NEG_INFINITY);
        for v in triangles.iter().flatten() {
            if !v.is_finite() {
                return Err(TerrainError::NonFinite(name));
            }
            let xz = Vec2::new(v.x, v.z);
            min_xz = min_xz.min(xz);
            max_xz = max_xz.max(xz);
        }
        Ok(Self {
            name,
            triangles,
            min_xz,
            max_xz,
        })
    }

    /// Build from vertex and index buffers, placing every vertex at
    /// `vertex * scale + offset`.
    pub fn from_indexed(
        name: impl Into<String>,
        vertices: &[Vec3],
        indices: &[u32],
        scale: f32,
        offset: Vec3,
    ) -> Result<Self, TerrainError> {
        if indices.len() % 3 != 0 {
            return Err(TerrainError::RaggedIndices(indices.len()));
        }
        let fetch = |i: u32| {
            vertices
                .get(i as usize)
                .map(|v| *v * scale + offset)
                .ok_or(TerrainError::IndexOutOfRange {
                    index: i,
                    vertex_count: vertices.len(),
                })
        };
        let triangles = indices
            .chunks_exact(3)
            .map(|tri| -> Result<[Vec3; 3], TerrainError> {
                Ok([fetch(tri[0])?, fetch(tri[1])?, fetch(tri[2])?])
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_triangles(name, triangles)
    }

    /// Build a regular grid from a row-major height table. `heights[row][col]`
    /// sits at `min + (col, row) * cell_size` on the XZ plane.
    pub fn from_height_grid(
        name: impl Into<String>,
        min: Vec2,
        cell_size: f32,
        heights: &[Vec<f32>],
    ) -> Result<Self, TerrainError> {
        let rows = heights.len();
        let cols = heights.iter().map(Vec::len).min().unwrap_or(0);
        if rows < 2 || cols < 2 {
            return Err(TerrainError::GridTooSmall(rows, cols));
        }
        let at = |row: usize, col: usize| {
            Vec3::new(
                min.x + col as f32 * cell_size,
                heights[row][col],
                min.y + row as f32 * cell_size,
            )
        };
        let mut triangles = Vec::with_capacity((rows - 1) * (cols - 1) * 2);
        for row in 0..rows - 1 {
            for col in 0..cols - 1 {
                let a = at(row, col);
                let b = at(row, col + 1);
                let c = at(row + 1, col);
                let d = at(row + 1, col + 1);
                triangles.push([a, b, c]);
                triangles.push([b, d, c]);
            }
        }
        Self::from_triangles(name, triangles)
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

impl TerrainSurface for TriangleMesh {
    fn cast_down(&self, origin: Vec3) -> Option<f32> {
        let p = Vec2::new(origin.x, origin.z);
        if p.cmplt(self.min_xz).any() || p.cmpgt(self.max_xz).any() {
            return None;
        }
        self.triangles
            .iter()
            .filter_map(|tri| vertical_hit(tri, p))
            .filter(|y| *y <= origin.y)
            .reduce(f32::max)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Elevation where a vertical line through `p` (XZ) crosses the triangle.
/// Triangles with no XZ footprint (walls) are never hit.
fn vertical_hit(tri: &[Vec3; 3], p: Vec2) -> Option<f32> {
    const EPS: f32 = 1e-6;
    let [a, b, c] = *tri;
    let a2 = Vec2::new(a.x, a.z);
    let v0 = Vec2::new(b.x, b.z) - a2;
    let v1 = Vec2::new(c.x, c.z) - a2;
    let v2 = p - a2;
    let den = v0.perp_dot(v1);
    if den.abs() < EPS {
        return None;
    }
    let u = v2.perp_dot(v1) / den;
    let v = v0.perp_dot(v2) / den;
    if u < -EPS || v < -EPS || u + v > 1.0 + EPS {
        return None;
    }
    Some(a.y + u * (b.y - a.y) + v * (c.y - a.y))
}

/// Ground height queries over every registered surface.
///
/// Surfaces may be registered at any point (terrain streams in after
/// startup); until then every query misses.
pub struct TerrainSampler {
    surfaces: Vec<Box<dyn TerrainSurface>>,
    ray_origin_height: f32,
}

impl TerrainSampler {
    /// `ray_origin_height` is the fixed elevation rays start from in
    /// [`TerrainSampler::sample_ground_height`].
    pub fn new(ray_origin_height: f32) -> Self {
        Self {
            surfaces: Vec::new(),
            ray_origin_height,
        }
    }

    pub fn register<S: TerrainSurface + 'static>(&mut self, surface: S) {
        tracing::debug!(name = surface.name(), "terrain surface registered");
        self.surfaces.push(Box::new(surface));
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Highest ground under `xz`, casting from the sampler's fixed origin height.
    pub fn sample_ground_height(&self, xz: Vec2) -> Option<f32> {
        self.sample_ground_height_below(xz, self.ray_origin_height)
    }

    /// Highest ground under `xz` at or below `ceiling`.
    pub fn sample_ground_height_below(&self, xz: Vec2, ceiling: f32) -> Option<f32> {
        let origin = Vec3::new(xz.x, ceiling, xz.y);
        self.surfaces
            .iter()
            .filter_map(|s| s.cast_down(origin))
            .reduce(f32::max)
    }
}

impl std::fmt::Debug for TerrainSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.surfaces.iter().map(|s| s.name()).collect();
        f.debug_struct("TerrainSampler")
            .field("surfaces", &names)
            .field("ray_origin_height", &self.ray_origin_height)
            .finish()
    }
}

/// Dense row-major 2D buffer, one value per texel.
///
/// Texel `(i, j)` covers the field point
/// `((i + 0.5) / width * 2 - 1, (j + 0.5) / height * 2 - 1)`, so row 0 sits at
/// `y = -1` and matches texture coordinate `v = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Copy> Raster<T> {
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wraps `data`; `None` unless it holds exactly `width * height` values
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == width * height).then_some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        self.data[y * self.width + x] = value;
    }

    /// Value at the nearest texel inside the raster
    pub fn get_clamped(&self, x: isize, y: isize) -> T {
        let x = x.clamp(0, self.width as isize - 1) as usize;
        let y = y.clamp(0, self.height as isize - 1) as usize;
        self.get(x, y)
    }

    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> Raster<U> {
        Raster {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}

impl Raster<f32> {
    /// Bilinear sample in texel units (integer coordinates hit texel centres),
    /// clamped at the edges
    pub fn sample_bilinear(&self, x: f32, y: f32) -> f32 {
        let x0 = x.floor();
        let y0 = y.floor();
        let tx = x - x0;
        let ty = y - y0;
        let (x0, y0) = (x0 as isize, y0 as isize);

        let top = self.get_clamped(x0, y0) * (1.0 - tx) + self.get_clamped(x0 + 1, y0) * tx;
        let bottom = self.get_clamped(x0, y0 + 1) * (1.0 - tx) + self.get_clamped(x0 + 1, y0 + 1) * tx;
        top * (1.0 - ty) + bottom * ty
    }
}

/// Field coordinate of a texel centre along an axis of `resolution` texels
pub fn texel_to_field(index: usize, resolution: usize) -> f32 {
    (index as f32 + 0.5) / resolution as f32 * 2.0 - 1.0
}

/// Continuous texel coordinate of a field coordinate; texel centres sit at `i + 0.5`
pub fn field_to_texel(coord: f32, resolution: usize) -> f32 {
    (coord + 1.0) / 2.0 * resolution as f32
}

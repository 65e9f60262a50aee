use rayon::iter::{IndexedParallelIterator, IntoParallelRefMutIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Half-width of the square region of the complex plane that is sampled at `zoom == 1`.
pub const VIEWPORT_HALF_EXTENT: f64 = 1.5;

/**
 * Rectangular region of the complex plane that is sampled onto the pixel grid.
 * Both ranges are closed: the first and last samples land exactly on the bounds.
 */
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub real_range: [f64; 2],
    pub imag_range: [f64; 2],
}

impl Viewport {
    /// Square viewport `[-1.5 * zoom, 1.5 * zoom]` on both axes, regardless of
    /// the aspect ratio of the pixel grid that it is later sampled onto.
    pub fn from_zoom(zoom: f64) -> Viewport {
        let half_extent = VIEWPORT_HALF_EXTENT * zoom;
        Viewport {
            real_range: [-half_extent, half_extent],
            imag_range: [-half_extent, half_extent],
        }
    }

    /// `[real_min, real_max, imag_min, imag_max]`, the layout used by image
    /// display tools for axis extents.
    pub fn extent(&self) -> [f64; 4] {
        [
            self.real_range[0],
            self.real_range[1],
            self.imag_range[0],
            self.imag_range[1],
        ]
    }
}

#[derive(Clone, Debug)]
/**
 * Used to map from pixel index into evenly spaced samples of a closed interval.
 */
pub struct LinearPixelMap {
    count: u32,
    x0: f64,
    x1: f64,
    slope: f64,
}

impl LinearPixelMap {
    /**
     * @param n: number of pixels spanned by [x0,x1]
     * @param x0: output of the map at 0
     * @param x1: output of the map at n-1 (ignored when n == 1)
     */
    pub fn new(n: u32, x0: f64, x1: f64) -> LinearPixelMap {
        assert!(n > 0);
        let slope = if n > 1 {
            (x1 - x0) / ((n - 1) as f64)
        } else {
            0.0
        };
        LinearPixelMap {
            count: n,
            x0,
            x1,
            slope,
        }
    }

    // Map from pixel (integer) to point (float)
    pub fn map(&self, index: u32) -> f64 {
        if self.count > 1 && index + 1 == self.count {
            return self.x1;
        }
        self.x0 + self.slope * (index as f64)
    }

    #[cfg(test)]
    pub fn samples(&self) -> Vec<f64> {
        (0..self.count).map(|i| self.map(i)).collect()
    }
}

/// Maps pixel coordinates `(x, y)` onto the real and imaginary axes of a viewport.
/// `y == 0` is the lowest imaginary sample.
#[derive(Clone, Debug)]
pub struct PixelMapper {
    pub real: LinearPixelMap,
    pub imag: LinearPixelMap,
}

impl PixelMapper {
    pub fn new(resolution: &[u32; 2], viewport: &Viewport) -> PixelMapper {
        PixelMapper {
            real: LinearPixelMap::new(
                resolution[0],
                viewport.real_range[0],
                viewport.real_range[1],
            ),
            imag: LinearPixelMap::new(
                resolution[1],
                viewport.imag_range[0],
                viewport.imag_range[1],
            ),
        }
    }
}

pub fn create_buffer<T: Clone>(value: T, resolution: &[u32; 2]) -> Vec<Vec<T>> {
    vec![vec![value; resolution[1] as usize]; resolution[0] as usize]
}

/**
 * Given a pixel grid and a viewport into the complex plane, evaluate `pixel_renderer`
 * at the sample point of every pixel. The outer buffer index is `x` (real axis),
 * the inner index is `y` (imaginary axis). Columns are evaluated in parallel; each
 * cell is written exactly once, so the result does not depend on scheduling.
 */
pub fn generate_scalar_image_in_place<T, F>(
    resolution: &[u32; 2],
    viewport: &Viewport,
    pixel_renderer: F,
    raw_data: &mut Vec<Vec<T>>,
) where
    T: Send,
    F: Fn(f64, f64) -> T + Sync,
{
    assert_eq!(
        raw_data.len(),
        resolution[0] as usize,
        "Outer dimension mismatch"
    );
    let pixel_mapper = PixelMapper::new(resolution, viewport);
    raw_data.par_iter_mut().enumerate().for_each(|(x, column)| {
        assert_eq!(
            column.len(),
            resolution[1] as usize,
            "Inner dimension mismatch"
        );
        let re = pixel_mapper.real.map(x as u32);
        column.iter_mut().enumerate().for_each(|(y, elem)| {
            *elem = pixel_renderer(re, pixel_mapper.imag.map(y as u32));
        });
    });
}

pub fn write_image_to_file<F, T, E>(filename: &Path, save_lambda: F) -> Result<T, E>
where
    F: FnOnce(&Path) -> Result<T, E>,
    E: std::fmt::Display,
{
    match save_lambda(filename) {
        Ok(value) => {
            log::info!("Wrote image file to: {}", filename.display());
            Ok(value)
        }
        Err(err) => {
            log::error!("Unable to write image file {}: {}", filename.display(), err);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_pixel_map_domain_bounds_pos() {
        let n = 7;
        let x0 = 1.23;
        let x1 = 56.2;

        let pixel_map = LinearPixelMap::new(n, x0, x1);

        assert_eq!(pixel_map.map(0), x0);
        assert_eq!(pixel_map.map(n - 1), x1);
        assert_relative_eq!(pixel_map.map(3), 0.5 * (x0 + x1), epsilon = 1e-9);
    }

    #[test]
    fn test_linear_pixel_map_domain_bounds_neg() {
        let n = 11;
        let x0 = 1.23;
        let x1 = -0.05;

        let pixel_map = LinearPixelMap::new(n, x0, x1);

        assert_eq!(pixel_map.map(0), x0);
        assert_eq!(pixel_map.map(n - 1), x1);
    }

    #[test]
    fn test_linear_pixel_map_single_sample_sits_at_lower_bound() {
        let pixel_map = LinearPixelMap::new(1, -1.5, 1.5);
        assert_eq!(pixel_map.samples(), vec![-1.5]);
    }

    #[test]
    fn test_three_samples_are_exact() {
        let pixel_map = LinearPixelMap::new(3, -1.5, 1.5);
        assert_eq!(pixel_map.samples(), vec![-1.5, 0.0, 1.5]);
    }

    #[test]
    fn test_viewport_from_zoom() {
        let viewport = Viewport::from_zoom(2.0);
        assert_eq!(viewport.extent(), [-3.0, 3.0, -3.0, 3.0]);
    }

    #[test]
    fn test_generate_scalar_image_layout() {
        let resolution = [4, 2];
        let viewport = Viewport {
            real_range: [0.0, 3.0],
            imag_range: [10.0, 20.0],
        };
        let mut data = create_buffer((0.0, 0.0), &resolution);
        generate_scalar_image_in_place(&resolution, &viewport, |re, im| (re, im), &mut data);

        assert_eq!(data.len(), 4);
        for (x, column) in data.iter().enumerate() {
            assert_eq!(column.len(), 2);
            assert_eq!(column[0], (x as f64, 10.0));
            assert_eq!(column[1], (x as f64, 20.0));
        }
    }
}

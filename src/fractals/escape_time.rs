use std::io::{self, Write};

use num::complex::Complex64;

use crate::core::{
    error::ParameterError,
    image_utils::{create_buffer, generate_scalar_image_in_place, Viewport},
};

use super::recurrence::Recurrence;

/// A point is considered escaped once its magnitude reaches this radius.
pub const ESCAPE_RADIUS: f64 = 2.0;

/**
 * Number of times `rule` is applied to `z0` before the iterate reaches the escape
 * radius, capped at `max_iter_count`. The iteration starts from the sample point
 * itself, so a point that is already outside the radius returns zero.
 *
 * Iterates that overflow to infinity or NaN fail the `< ESCAPE_RADIUS` test and
 * are counted as escaped.
 */
#[inline]
pub fn count_escape_iterations<R>(rule: &R, z0: Complex64, c: Complex64, max_iter_count: u32) -> u32
where
    R: Recurrence + ?Sized,
{
    let mut z = z0;
    let mut iteration = 0;
    while z.norm() < ESCAPE_RADIUS && iteration < max_iter_count {
        z = rule.step(z, c);
        iteration += 1;
    }
    iteration
}

/**
 * Escape iteration count for every sample of a viewport. Indexed as `[x][y]`:
 * `x` walks the real axis from its lower bound, `y` walks the imaginary axis
 * from its lower bound. Every value is on `[0, max_iter_count]`.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapeTimeField {
    max_iter_count: u32,
    cells: Vec<Vec<u32>>,
}

impl EscapeTimeField {
    pub fn width(&self) -> u32 {
        self.cells.len() as u32
    }

    pub fn height(&self) -> u32 {
        self.cells.first().map_or(0, |column| column.len() as u32)
    }

    pub fn max_iter_count(&self) -> u32 {
        self.max_iter_count
    }

    /// Panics if `x >= width()` or `y >= height()`.
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.cells[x as usize][y as usize]
    }

    pub fn columns(&self) -> &[Vec<u32>] {
        &self.cells
    }

    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        self.cells.iter().flat_map(|column| column.iter().copied())
    }

    /// `[min, max]` over all cells.
    pub fn value_range(&self) -> [u32; 2] {
        self.values().fold([u32::MAX, u32::MIN], |[low, upp], value| {
            [low.min(value), upp.max(value)]
        })
    }

    pub fn statistics(&self) -> FieldStatistics {
        let [min_value, max_value] = self.value_range();
        let cell_count = (self.width() as u64) * (self.height() as u64);
        let (sum, bounded_count) = self.values().fold((0u64, 0u64), |(sum, bounded), value| {
            (
                sum + value as u64,
                bounded + (value == self.max_iter_count) as u64,
            )
        });
        FieldStatistics {
            cell_count,
            bounded_count,
            min_value,
            max_value,
            mean_value: sum as f64 / cell_count as f64,
        }
    }
}

/// Summary of a field, written into the diagnostics file of a render.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldStatistics {
    pub cell_count: u64,
    /// Cells that never escaped within the iteration limit.
    pub bounded_count: u64,
    pub min_value: u32,
    pub max_value: u32,
    pub mean_value: f64,
}

impl FieldStatistics {
    pub fn display<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "Escape-time field:")?;
        writeln!(writer, "  cell count: {}", self.cell_count)?;
        writeln!(
            writer,
            "  bounded (never escaped): {} ({:.2}%)",
            self.bounded_count,
            100.0 * (self.bounded_count as f64) / (self.cell_count as f64)
        )?;
        writeln!(
            writer,
            "  iterations: min {}, max {}, mean {:.3}",
            self.min_value, self.max_value, self.mean_value
        )?;
        writeln!(writer)
    }
}

/**
 * Samples `width` points along the real axis and `height` points along the
 * imaginary axis, both evenly spaced over `[-1.5 * zoom, 1.5 * zoom]`, and
 * counts the escape iterations of `rule` for each of them.
 *
 * The viewport is square in the complex plane even when `width != height`.
 */
pub fn generate_escape_time_field<R>(
    rule: &R,
    constant_term: Complex64,
    width: u32,
    height: u32,
    zoom: f64,
    max_iter_count: u32,
) -> Result<EscapeTimeField, ParameterError>
where
    R: Recurrence + ?Sized,
{
    if width == 0 || height == 0 {
        return Err(ParameterError::invalid_argument(format!(
            "grid dimensions must be positive, got {} x {}",
            width, height
        )));
    }
    if !zoom.is_finite() || zoom <= 0.0 {
        return Err(ParameterError::invalid_argument(format!(
            "zoom must be finite and positive, got {}",
            zoom
        )));
    }

    let resolution = [width, height];
    let mut cells = create_buffer(0u32, &resolution);
    generate_scalar_image_in_place(
        &resolution,
        &Viewport::from_zoom(zoom),
        |re, im| {
            count_escape_iterations(rule, Complex64::new(re, im), constant_term, max_iter_count)
        },
        &mut cells,
    );

    Ok(EscapeTimeField {
        max_iter_count,
        cells,
    })
}

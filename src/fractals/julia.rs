use image::{Rgb, RgbImage};
use num::complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::core::{
    color_map::{ColorMap, ColorMapLookUpTable, ColorMapSource, ColorMapper},
    error::ParameterError,
    file_io::{serialize_to_json, FilePrefix},
    histogram::{CumulativeDistributionFunction, Histogram},
    image_utils::{write_image_to_file, Viewport},
    stopwatch::Stopwatch,
};

use super::{
    escape_time::{generate_escape_time_field, EscapeTimeField},
    recurrence::RecurrenceRule,
};

/// Gap, in pixels, between the fractal and the colorbar.
const COLORBAR_GAP: u32 = 8;
const COLORBAR_GAP_RGB: [u8; 3] = [255, 255, 255];

/// Everything needed to compute the escape-time field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FieldParams {
    pub resolution: [u32; 2], // [width, height]
    pub zoom: f64,
    pub constant_term: [f64; 2], // [re, im]
    pub max_iter_count: u32,
    pub recurrence: RecurrenceRule,
}

impl Default for FieldParams {
    fn default() -> Self {
        FieldParams {
            resolution: [800, 800],
            zoom: 1.0,
            constant_term: [-0.8, 0.156],
            max_iter_count: 300,
            recurrence: RecurrenceRule::Quadratic,
        }
    }
}

impl FieldParams {
    pub fn constant(&self) -> Complex64 {
        Complex64::new(self.constant_term[0], self.constant_term[1])
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::from_zoom(self.zoom)
    }

    pub fn generate(&self) -> Result<EscapeTimeField, ParameterError> {
        self.recurrence.validate()?;
        generate_escape_time_field(
            &self.recurrence,
            self.constant(),
            self.resolution[0],
            self.resolution[1],
            self.zoom,
            self.max_iter_count,
        )
    }
}

/// How iteration counts are mapped onto the [0, 1] query of the color map.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScaling {
    /// Linear over the [min, max] range of the field.
    Linear,
    /// Through the empirical CDF of the field, spreading colors evenly over the population.
    HistogramEqualized { histogram_bin_count: usize },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ColorMapParams {
    pub source: ColorMapSource,
    pub lookup_table_count: usize,
    pub scaling: ColorScaling,
}

impl Default for ColorMapParams {
    fn default() -> Self {
        ColorMapParams {
            source: ColorMapSource::default(),
            lookup_table_count: 1024,
            scaling: ColorScaling::Linear,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RenderOptions {
    /// Width in pixels of the colorbar drawn to the right of the image. Zero disables it.
    pub colorbar_width: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions { colorbar_width: 40 }
    }
}

impl RenderOptions {
    /// Total width of the output image for a field that is `field_width` pixels wide.
    pub fn image_width(&self, field_width: u32) -> Result<u32, ParameterError> {
        if self.colorbar_width == 0 {
            return Ok(field_width);
        }
        field_width
            .checked_add(COLORBAR_GAP)
            .and_then(|width| width.checked_add(self.colorbar_width))
            .ok_or_else(|| {
                ParameterError::invalid_argument(format!(
                    "image width overflows: field width {} plus colorbar width {}",
                    field_width, self.colorbar_width
                ))
            })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct JuliaParams {
    pub field: FieldParams,
    pub color_map: ColorMapParams,
    pub render_options: RenderOptions,
}

impl JuliaParams {
    /// Checks the parts of the parameters that are not checked by the field
    /// generator itself.
    pub fn validate(&self) -> Result<(), ParameterError> {
        self.field.recurrence.validate()?;
        if self.color_map.lookup_table_count < 2 {
            return Err(ParameterError::invalid_argument(
                "lookup_table_count must be at least 2",
            ));
        }
        if let ColorScaling::HistogramEqualized {
            histogram_bin_count: 0,
        } = self.color_map.scaling
        {
            return Err(ParameterError::invalid_argument(
                "histogram_bin_count must be positive",
            ));
        }
        ColorMap::from_source(&self.color_map.source)?;
        self.render_options.image_width(self.field.resolution[0])?;
        Ok(())
    }
}

/// Labels and ranges that accompany the rendered image.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DisplayMetadata {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub colorbar_label: String,
    pub color_map_name: String,
    /// [real_min, real_max, imag_min, imag_max]
    pub extent: [f64; 4],
    /// [min, max] iteration count over the field
    pub value_range: [u32; 2],
}

impl DisplayMetadata {
    pub fn new(params: &JuliaParams, field: &EscapeTimeField) -> DisplayMetadata {
        DisplayMetadata {
            title: format!(
                "Julia Set for c = {} and f(z) = {}",
                params.field.constant(),
                params.field.recurrence.formula()
            ),
            x_label: "Re(z)".to_owned(),
            y_label: "Im(z)".to_owned(),
            colorbar_label: "Iterations".to_owned(),
            color_map_name: params.color_map.source.name(),
            extent: params.field.viewport().extent(),
            value_range: field.value_range(),
        }
    }
}

/// Maps an iteration count onto the [0, 1] query of the color map.
enum ValueNormalizer {
    Linear { offset: f32, span: f32 },
    Equalized(CumulativeDistributionFunction),
}

impl ValueNormalizer {
    fn normalize(&self, value: u32) -> f32 {
        match self {
            ValueNormalizer::Linear { offset, span } => {
                if *span > 0.0 {
                    (value as f32 - offset) / span
                } else {
                    0.0
                }
            }
            ValueNormalizer::Equalized(cdf) => cdf.percentile(value as f32),
        }
    }
}

/// Result of rendering a parameter set, before anything is written to disk.
pub struct JuliaRender {
    pub field: EscapeTimeField,
    pub metadata: DisplayMetadata,
    pub image: RgbImage,
    pub histogram: Option<Histogram>,
}

/**
 * Computes the escape-time field and colors it. The fractal occupies the left
 * `width` columns of the image with the imaginary axis increasing upwards; the
 * colorbar (if enabled) runs from the minimum value at the bottom to the
 * maximum value at the top.
 */
pub fn compute_julia_render(
    params: &JuliaParams,
    stopwatch: &mut Stopwatch,
) -> Result<JuliaRender, ParameterError> {
    params.validate()?;

    let field = params.field.generate()?;
    stopwatch.record_split("compute escape-time field");

    let metadata = DisplayMetadata::new(params, &field);
    let [min_value, max_value] = metadata.value_range;

    let (normalizer, histogram) = match params.color_map.scaling {
        ColorScaling::Linear => (
            ValueNormalizer::Linear {
                offset: min_value as f32,
                span: (max_value - min_value) as f32,
            },
            None,
        ),
        ColorScaling::HistogramEqualized {
            histogram_bin_count,
        } => {
            let samples: Vec<f32> = field.values().map(|value| value as f32).collect();
            let histogram = Histogram::from_samples(
                histogram_bin_count,
                field.max_iter_count().max(1) as f32,
                &samples,
            );
            let cdf = CumulativeDistributionFunction::new(&histogram);
            (ValueNormalizer::Equalized(cdf), Some(histogram))
        }
    };

    let color_map = ColorMapLookUpTable::from_color_map(
        &ColorMap::from_source(&params.color_map.source)?,
        params.color_map.lookup_table_count,
    );
    stopwatch.record_split("build color map");

    let image_width = params.render_options.image_width(field.width())?;
    let image = colorize_field(&field, &normalizer, &color_map, image_width);
    stopwatch.record_split("color image");

    Ok(JuliaRender {
        field,
        metadata,
        image,
        histogram,
    })
}

fn colorize_field<M: ColorMapper>(
    field: &EscapeTimeField,
    normalizer: &ValueNormalizer,
    color_map: &M,
    image_width: u32,
) -> RgbImage {
    let width = field.width();
    let height = field.height();
    let colorbar_start = width.saturating_add(COLORBAR_GAP);
    let colorbar_span = height.saturating_sub(1).max(1) as f32;

    RgbImage::from_fn(image_width, height, |px, py| {
        // image rows run top-down, the imaginary axis runs bottom-up
        let y = height - 1 - py;
        if px < width {
            color_map.compute_pixel(normalizer.normalize(field.get(px, y)))
        } else if px < colorbar_start {
            Rgb(COLORBAR_GAP_RGB)
        } else {
            color_map.compute_pixel((y as f32) / colorbar_span)
        }
    })
}

#[derive(Serialize)]
struct RenderRecord<'a> {
    params: &'a JuliaParams,
    metadata: &'a DisplayMetadata,
}

/**
 * Renders the Julia set described by `params`, writing:
 * - `<prefix>.png`: the color-mapped field (and colorbar)
 * - `<prefix>.json`: the parameters and display metadata
 * - `<prefix>_diagnostics.txt`: timing, field statistics, and histogram data
 */
pub fn render_julia_set(
    params: &JuliaParams,
    file_prefix: &FilePrefix,
) -> Result<JuliaRender, Box<dyn std::error::Error>> {
    let mut stopwatch = Stopwatch::new("Julia Render Stopwatch");

    let render = compute_julia_render(params, &mut stopwatch)?;
    log::info!("{}", render.metadata.title);

    write_image_to_file(&file_prefix.full_path_with_suffix(".png"), |path| {
        render.image.save(path)
    })?;
    stopwatch.record_split("write PNG");

    serialize_to_json(
        &file_prefix.full_path_with_suffix(".json"),
        &RenderRecord {
            params,
            metadata: &render.metadata,
        },
    )?;

    let mut diagnostics_file = file_prefix.create_file_with_suffix("_diagnostics.txt")?;
    stopwatch.display(&mut diagnostics_file)?;
    render.field.statistics().display(&mut diagnostics_file)?;
    if let Some(histogram) = &render.histogram {
        histogram.display(&mut diagnostics_file)?;
        CumulativeDistributionFunction::new(histogram).display(&mut diagnostics_file)?;
    }

    Ok(render)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color_map::NamedColorMap;

    fn tiny_params() -> JuliaParams {
        JuliaParams {
            field: FieldParams {
                resolution: [5, 4],
                max_iter_count: 20,
                ..FieldParams::default()
            },
            color_map: ColorMapParams {
                source: ColorMapSource::Named(NamedColorMap::Grayscale),
                ..ColorMapParams::default()
            },
            render_options: RenderOptions { colorbar_width: 3 },
        }
    }

    #[test]
    fn test_default_params_match_reference_scene() {
        let params = JuliaParams::default();
        assert_eq!(params.field.resolution, [800, 800]);
        assert_eq!(params.field.zoom, 1.0);
        assert_eq!(params.field.constant(), Complex64::new(-0.8, 0.156));
        assert_eq!(params.field.max_iter_count, 300);
        assert_eq!(params.field.recurrence, RecurrenceRule::Quadratic);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let params: JuliaParams =
            serde_json::from_str(r#"{ "field": { "max_iter_count": 50 } }"#).unwrap();
        assert_eq!(params.field.max_iter_count, 50);
        assert_eq!(params.field.resolution, [800, 800]);
        assert_eq!(params.color_map, ColorMapParams::default());
    }

    #[test]
    fn test_validate_rejects_bad_color_params() {
        let mut params = tiny_params();
        params.color_map.lookup_table_count = 1;
        assert!(params.validate().is_err());

        let mut params = tiny_params();
        params.color_map.scaling = ColorScaling::HistogramEqualized {
            histogram_bin_count: 0,
        };
        assert!(params.validate().is_err());

        let mut params = tiny_params();
        params.field.recurrence = RecurrenceRule::Multibrot { exponent: 0 };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_oversized_colorbar_is_rejected() {
        let mut params = tiny_params();
        params.field.resolution = [4, 4];
        params.render_options.colorbar_width = u32::MAX;
        assert!(matches!(
            params.validate(),
            Err(ParameterError::InvalidArgument(_))
        ));

        let mut stopwatch = Stopwatch::new("test");
        assert!(matches!(
            compute_julia_render(&params, &mut stopwatch),
            Err(ParameterError::InvalidArgument(_))
        ));

        params.render_options.colorbar_width = 0;
        assert_eq!(params.render_options.image_width(u32::MAX), Ok(u32::MAX));
        params.render_options.colorbar_width = 3;
        assert_eq!(params.render_options.image_width(5), Ok(5 + COLORBAR_GAP + 3));
    }

    #[test]
    fn test_display_metadata() {
        let params = tiny_params();
        let field = params.field.generate().unwrap();
        let metadata = DisplayMetadata::new(&params, &field);

        assert_eq!(
            metadata.title,
            "Julia Set for c = -0.8+0.156i and f(z) = z^2 + c"
        );
        assert_eq!(metadata.x_label, "Re(z)");
        assert_eq!(metadata.y_label, "Im(z)");
        assert_eq!(metadata.colorbar_label, "Iterations");
        assert_eq!(metadata.color_map_name, "grayscale");
        assert_eq!(metadata.extent, [-1.5, 1.5, -1.5, 1.5]);
        assert_eq!(metadata.value_range, field.value_range());
    }

    #[test]
    fn test_image_layout_and_orientation() {
        let params = tiny_params();
        let mut stopwatch = Stopwatch::new("test");
        let render = compute_julia_render(&params, &mut stopwatch).unwrap();

        assert_eq!(render.image.width(), 5 + COLORBAR_GAP + 3);
        assert_eq!(render.image.height(), 4);
        assert!(render.histogram.is_none());

        // grayscale + linear scaling: the minimum value is black, the maximum white
        let [min_value, max_value] = render.metadata.value_range;
        assert!(max_value > min_value);
        for x in 0..5 {
            for y in 0..4 {
                let value = render.field.get(x, y);
                let pixel = render.image.get_pixel(x, 3 - y);
                if value == min_value {
                    assert_eq!(*pixel, Rgb([0, 0, 0]));
                }
                if value == max_value {
                    assert_eq!(*pixel, Rgb([255, 255, 255]));
                }
            }
        }

        // colorbar: bright at the top, dark at the bottom, gap in between
        let colorbar_x = 5 + COLORBAR_GAP;
        assert_eq!(*render.image.get_pixel(colorbar_x, 0), Rgb([255, 255, 255]));
        assert_eq!(*render.image.get_pixel(colorbar_x, 3), Rgb([0, 0, 0]));
        assert_eq!(*render.image.get_pixel(5, 0), Rgb(COLORBAR_GAP_RGB));
    }

    #[test]
    fn test_histogram_equalized_render() {
        let mut params = tiny_params();
        params.render_options.colorbar_width = 0;
        params.color_map.scaling = ColorScaling::HistogramEqualized {
            histogram_bin_count: 8,
        };
        let mut stopwatch = Stopwatch::new("test");
        let render = compute_julia_render(&params, &mut stopwatch).unwrap();

        assert_eq!(render.image.width(), 5);
        let histogram = render.histogram.unwrap();
        assert_eq!(histogram.total_count(), 20);
    }
}

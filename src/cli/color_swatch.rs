use image::RgbImage;

use crate::core::{
    color_map::{ColorMap, ColorMapSource, ColorMapper, NamedColorMap},
    error::ParameterError,
    file_io::{build_output_path_with_date_time, FilePrefix},
    image_utils::write_image_to_file,
};

use super::args::ColorSwatchArgs;

/// Paints the color map left (query 0) to right (query 1), constant down each column.
pub fn color_swatch_image<M: ColorMapper>(
    color_map: &M,
    width: u32,
    height: u32,
) -> Result<RgbImage, ParameterError> {
    if width < 2 || height == 0 {
        return Err(ParameterError::invalid_argument(format!(
            "color swatch must be at least 2 x 1 pixels, got {} x {}",
            width, height
        )));
    }
    let span = (width - 1) as f32;
    Ok(RgbImage::from_fn(width, height, |x, _| {
        color_map.compute_pixel(x as f32 / span)
    }))
}

pub fn generate_color_swatch(args: &ColorSwatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let named = NamedColorMap::from_name(&args.color_map).ok_or_else(|| {
        ParameterError::invalid_argument(format!("unknown color map: {}", args.color_map))
    })?;
    let color_map = ColorMap::from_source(&ColorMapSource::Named(named))?;
    let image = color_swatch_image(&color_map, args.width, args.height)?;

    let file_prefix = FilePrefix {
        directory_path: build_output_path_with_date_time(
            &args.output_dir,
            "color_swatch",
            named.name(),
            &None,
        )?,
        file_base: named.name().to_owned(),
    };
    write_image_to_file(&file_prefix.full_path_with_suffix(".png"), |path| {
        image.save(path)
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_grayscale_swatch_runs_black_to_white() {
        let color_map =
            ColorMap::from_source(&ColorMapSource::Named(NamedColorMap::Grayscale)).unwrap();
        let image = color_swatch_image(&color_map, 3, 2).unwrap();
        assert_eq!(*image.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*image.get_pixel(1, 1), Rgb([128, 128, 128]));
        assert_eq!(*image.get_pixel(2, 0), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_swatch_rejects_degenerate_size() {
        let color_map =
            ColorMap::from_source(&ColorMapSource::Named(NamedColorMap::Inferno)).unwrap();
        assert!(color_swatch_image(&color_map, 1, 10).is_err());
        assert!(color_swatch_image(&color_map, 10, 0).is_err());
    }
}

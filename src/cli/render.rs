use crate::core::file_io::{
    build_output_path_with_date_time, extract_base_name, maybe_date_time_string, FilePrefix,
    DEFAULT_BASE_NAME,
};
use crate::fractals::julia::{render_julia_set, JuliaParams};

use super::args::RenderArgs;

/// Output sub-directory for all Julia set renders.
pub const RENDER_PROJECT: &str = "julia";

/// Reads a parameter file, or falls back to the default scene when no path is given.
pub fn load_params(params_path: Option<&str>) -> Result<JuliaParams, Box<dyn std::error::Error>> {
    let params: JuliaParams = match params_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|err| format!("Unable to read param file {}: {}", path, err))?;
            serde_json::from_str(&text)
                .map_err(|err| format!("Unable to parse param file {}: {}", path, err))?
        }
        None => {
            log::info!("No parameter file given; rendering the default scene.");
            JuliaParams::default()
        }
    };
    params.validate()?;
    Ok(params)
}

pub fn render_fractal(args: &RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let params = load_params(args.params_path.as_deref())?;
    let base_name = args
        .params_path
        .as_deref()
        .map_or(DEFAULT_BASE_NAME, extract_base_name);

    let file_prefix = FilePrefix {
        directory_path: build_output_path_with_date_time(
            &args.output_dir,
            RENDER_PROJECT,
            base_name,
            &maybe_date_time_string(args.date_time_out),
        )?,
        file_base: base_name.to_owned(),
    };

    let render = render_julia_set(&params, &file_prefix)?;
    let statistics = render.field.statistics();
    log::info!(
        "Rendered {} x {} field; {} of {} points stayed bounded.",
        render.field.width(),
        render.field.height(),
        statistics.bounded_count,
        statistics.cell_count
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_params() {
        assert_eq!(load_params(None).unwrap(), JuliaParams::default());
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let err = load_params(Some("does/not/exist.json")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}

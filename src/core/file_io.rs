use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Base name used for outputs when no parameter file was given.
pub const DEFAULT_BASE_NAME: &str = "default";

/// Extracts the file stem (`"spiral"` from `"demos/julia/spiral.json"`).
pub fn extract_base_name(path: &str) -> &str {
    Path::new(path)
        .file_stem()
        .and_then(|name| name.to_str())
        .unwrap_or(DEFAULT_BASE_NAME)
}

/// Builds (and creates) `<root>/<project>/<base_name>[/<datetime>]`.
pub fn build_output_path_with_date_time(
    root: &Path,
    project: &str,
    base_name: &str,
    datetime: &Option<String>,
) -> std::io::Result<PathBuf> {
    let mut directory_path = root.join(project).join(base_name);
    if let Some(inner_datetime_str) = datetime {
        directory_path.push(inner_datetime_str);
    }
    std::fs::create_dir_all(&directory_path)?;
    Ok(directory_path)
}

pub fn date_time_string() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

pub fn maybe_date_time_string(enable: bool) -> Option<String> {
    if enable {
        Some(date_time_string())
    } else {
        None
    }
}

/**
 * Store a path and prefix together, making it easy to quickly generate
 * a collection of files with the same prefix, but separate suffixes.
 */
#[derive(Debug, Clone)]
pub struct FilePrefix {
    pub directory_path: PathBuf,
    pub file_base: String,
}

impl FilePrefix {
    pub fn full_path_with_suffix(&self, suffix: &str) -> PathBuf {
        self.directory_path
            .join(format!("{}{}", self.file_base, suffix))
    }

    pub fn create_file_with_suffix(&self, suffix: &str) -> std::io::Result<BufWriter<File>> {
        let file = File::create(self.full_path_with_suffix(suffix))?;
        Ok(BufWriter::new(file))
    }
}

pub fn serialize_to_json<T: Serialize>(
    path: &Path,
    data: &T,
) -> Result<(), Box<dyn std::error::Error>> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, data)?;
    log::info!("Wrote parameter file to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_base_name() {
        assert_eq!(extract_base_name("demos/julia/spiral.json"), "spiral");
        assert_eq!(extract_base_name("params.json"), "params");
        assert_eq!(extract_base_name(""), DEFAULT_BASE_NAME);
    }

    #[test]
    fn test_maybe_date_time_string() {
        assert_eq!(maybe_date_time_string(false), None);
        let stamp = maybe_date_time_string(true).unwrap();
        assert_eq!(stamp.len(), "20240101_120000".len());
        assert_eq!(stamp.chars().nth(8), Some('_'));
    }

    #[test]
    fn test_file_prefix_suffixes() {
        let prefix = FilePrefix {
            directory_path: PathBuf::from("out").join("julia"),
            file_base: "spiral".to_owned(),
        };
        assert_eq!(
            prefix.full_path_with_suffix(".png"),
            PathBuf::from("out").join("julia").join("spiral.png")
        );
    }
}

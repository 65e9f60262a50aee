use image::Rgb;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::core::error::ParameterError;
use crate::core::interpolation::{
    InterpolationKeyframe, Interpolator, KeyframeInterpolator, LinearInterpolator,
};
use crate::core::lookup_table::LookupTable;

/**
 * Represents a single "keyframe" of the color map, pairing a
 * "query" with the color that should be produced at that query point.
 */
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ColorMapKeyFrame {
    pub query: f32,       // specify location of this color within the map; on [0,1]
    pub rgb_raw: [u8; 3], // [R, G, B]
}

pub trait ColorMapper {
    fn compute_pixel(&self, query: f32) -> Rgb<u8>;
}

/// Color maps that ship with the renderer, sampled from the perceptually uniform
/// maps popularized by matplotlib.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedColorMap {
    Inferno,
    Viridis,
    Grayscale,
}

const INFERNO_RGB: [[u8; 3]; 9] = [
    [0, 0, 4],
    [31, 12, 72],
    [85, 15, 109],
    [136, 34, 106],
    [186, 54, 85],
    [227, 89, 51],
    [249, 140, 10],
    [249, 201, 50],
    [252, 255, 164],
];

const VIRIDIS_RGB: [[u8; 3]; 9] = [
    [68, 1, 84],
    [71, 44, 122],
    [59, 81, 139],
    [44, 113, 142],
    [33, 144, 141],
    [39, 173, 129],
    [92, 200, 99],
    [170, 220, 50],
    [253, 231, 37],
];

const GRAYSCALE_RGB: [[u8; 3]; 2] = [[0, 0, 0], [255, 255, 255]];

impl NamedColorMap {
    pub fn name(&self) -> &'static str {
        match self {
            NamedColorMap::Inferno => "inferno",
            NamedColorMap::Viridis => "viridis",
            NamedColorMap::Grayscale => "grayscale",
        }
    }

    pub fn from_name(name: &str) -> Option<NamedColorMap> {
        [
            NamedColorMap::Inferno,
            NamedColorMap::Viridis,
            NamedColorMap::Grayscale,
        ]
        .iter()
        .copied()
        .find(|map| map.name().eq_ignore_ascii_case(name))
    }

    pub fn keyframes(&self) -> Vec<ColorMapKeyFrame> {
        let colors: &[[u8; 3]] = match self {
            NamedColorMap::Inferno => &INFERNO_RGB,
            NamedColorMap::Viridis => &VIRIDIS_RGB,
            NamedColorMap::Grayscale => &GRAYSCALE_RGB,
        };
        with_uniform_spacing(colors)
    }
}

/// Where the keyframes of a color map come from: either one of the built-in
/// maps or an explicit list from the parameter file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ColorMapSource {
    Named(NamedColorMap),
    Keyframes(Vec<ColorMapKeyFrame>),
}

impl Default for ColorMapSource {
    fn default() -> Self {
        ColorMapSource::Named(NamedColorMap::Inferno)
    }
}

impl ColorMapSource {
    pub fn name(&self) -> String {
        match self {
            ColorMapSource::Named(map) => map.name().to_owned(),
            ColorMapSource::Keyframes(_) => "custom".to_owned(),
        }
    }

    pub fn keyframes(&self) -> Vec<ColorMapKeyFrame> {
        match self {
            ColorMapSource::Named(map) => map.keyframes(),
            ColorMapSource::Keyframes(keyframes) => keyframes.clone(),
        }
    }
}

/**
 * Create a keyframe vector from a list of colors, with queries uniformly
 * spaced on [0, 1].
 */
pub fn with_uniform_spacing(colors: &[[u8; 3]]) -> Vec<ColorMapKeyFrame> {
    let scale = if colors.len() > 1 {
        1.0 / ((colors.len() - 1) as f32)
    } else {
        0.0
    };
    colors
        .iter()
        .enumerate()
        .map(|(i, rgb)| ColorMapKeyFrame {
            // pin the last query to exactly 1.0 to survive rounding
            query: if i + 1 == colors.len() {
                1.0
            } else {
                scale * (i as f32)
            },
            rgb_raw: *rgb,
        })
        .collect()
}

/**
 * Simple implementation of a "piecewise linear" color map, where the colors
 * are represented by simple linear interpolation in RGB color space. This is
 * not "strictly correct" from a color standpoint, but it works well enough in
 * practice.
 */
pub struct ColorMap<F>
where
    F: Interpolator<f32, Vector3<f32>>,
{
    interpolator: KeyframeInterpolator<f32, Vector3<f32>, F>,
}

impl<F> ColorMap<F>
where
    F: Interpolator<f32, Vector3<f32>>,
{
    pub fn new(keyframes: &[ColorMapKeyFrame], interpolator: F) -> Result<Self, ParameterError> {
        let internal_keyframes: Vec<InterpolationKeyframe<f32, Vector3<f32>>> = keyframes
            .iter()
            .map(|kf| InterpolationKeyframe {
                input: kf.query,
                output: Vector3::new(
                    kf.rgb_raw[0] as f32,
                    kf.rgb_raw[1] as f32,
                    kf.rgb_raw[2] as f32,
                ),
            })
            .collect();

        Ok(Self {
            interpolator: KeyframeInterpolator::new(&internal_keyframes, interpolator)?,
        })
    }
}

impl ColorMap<LinearInterpolator> {
    pub fn from_source(source: &ColorMapSource) -> Result<Self, ParameterError> {
        ColorMap::new(&source.keyframes(), LinearInterpolator)
    }
}

impl<F> ColorMapper for ColorMap<F>
where
    F: Interpolator<f32, Vector3<f32>>,
{
    fn compute_pixel(&self, query: f32) -> Rgb<u8> {
        let color: Vector3<f32> = self.interpolator.evaluate(query);
        Rgb([
            color[0].round().clamp(0.0, 255.0) as u8,
            color[1].round().clamp(0.0, 255.0) as u8,
            color[2].round().clamp(0.0, 255.0) as u8,
        ])
    }
}

/**
 * Wrapper around a color map that precomputes a look-up table mapping from query
 * to the resulting color. This makes evaluation much faster.
 */
pub struct ColorMapLookUpTable {
    pub table: LookupTable<Rgb<u8>>,
}

impl ColorMapLookUpTable {
    pub fn from_color_map<M: ColorMapper>(
        color_map: &M,
        entry_count: usize,
    ) -> ColorMapLookUpTable {
        ColorMapLookUpTable::new(entry_count, [0.0, 1.0], &|query: f32| {
            color_map.compute_pixel(query)
        })
    }

    pub fn new<F>(entry_count: usize, query_domain: [f32; 2], color_map: &F) -> ColorMapLookUpTable
    where
        F: Fn(f32) -> Rgb<u8>,
    {
        ColorMapLookUpTable {
            table: LookupTable::new(query_domain, entry_count, color_map),
        }
    }
}

impl ColorMapper for ColorMapLookUpTable {
    fn compute_pixel(&self, query: f32) -> Rgb<u8> {
        self.table.lookup(query)
    }
}

//! Top-down PNG export of placed tiles with automatic cropping

use crate::io::error::{Result, WorldError};
use crate::world::chunk::TilePlacement;
use image::{ImageBuffer, Rgba};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug)]
struct BoundingBox {
    min_x: i32,
    max_x: i32,
    min_z: i32,
    max_z: i32,
}

// Minimal rectangle containing every placed column
fn calculate_bounding_box(placements: &[TilePlacement]) -> Option<BoundingBox> {
    let first = placements.first()?;
    let mut bbox = BoundingBox {
        min_x: first.position[0],
        max_x: first.position[0],
        min_z: first.position[2],
        max_z: first.position[2],
    };
    for placement in placements {
        let [x, _, z] = placement.position;
        bbox.min_x = bbox.min_x.min(x);
        bbox.max_x = bbox.max_x.max(x);
        bbox.min_z = bbox.min_z.min(z);
        bbox.max_z = bbox.max_z.max(z);
    }
    Some(bbox)
}

/// Distinct opaque colour for a tile index
///
/// Hues are spread with the golden angle so neighbouring indices differ.
pub fn tile_color(tile: usize) -> [u8; 4] {
    let hue = (tile as f64 * 137.507_764).rem_euclid(360.0);
    let sector = hue / 60.0;
    let fraction = sector.fract();
    let high = 230.0;
    let low = 60.0;
    let rising = fraction.mul_add(high - low, low);
    let falling = (1.0 - fraction).mul_add(high - low, low);
    let (r, g, b) = match sector as u32 {
        0 => (high, rising, low),
        1 => (falling, high, low),
        2 => (low, high, rising),
        3 => (low, falling, high),
        4 => (rising, low, high),
        _ => (high, low, falling),
    };
    [r as u8, g as u8, b as u8, 255]
}

/// Highest placement in every `[x, z]` column
fn top_down(placements: &[TilePlacement]) -> HashMap<(i32, i32), TilePlacement> {
    let mut columns: HashMap<(i32, i32), TilePlacement> = HashMap::new();
    for placement in placements {
        let key = (placement.position[0], placement.position[2]);
        columns
            .entry(key)
            .and_modify(|current| {
                if placement.position[1] > current.position[1] {
                    *current = *placement;
                }
            })
            .or_insert(*placement);
    }
    columns
}

/// Export placements as a top-down PNG with a transparent background
///
/// Each pixel is one world column coloured by its highest tile. North is up.
///
/// # Errors
///
/// Returns an error if:
/// - There are no placements to draw
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_placements_as_png(placements: &[TilePlacement], output_path: &Path) -> Result<()> {
    let bbox = calculate_bounding_box(placements).ok_or_else(|| WorldError::InvalidParameter {
        parameter: "placements",
        value: "0".to_string(),
        reason: "No tiles have been placed".to_string(),
    })?;

    let width = (bbox.max_x - bbox.min_x + 1) as u32;
    let height = (bbox.max_z - bbox.min_z + 1) as u32;
    let mut img = ImageBuffer::from_pixel(width, height, Rgba([0, 0, 0, 0]));

    for ((x, z), placement) in top_down(placements) {
        let pixel_x = (x - bbox.min_x) as u32;
        let pixel_y = (bbox.max_z - z) as u32;
        if pixel_x < width && pixel_y < height {
            img.put_pixel(pixel_x, pixel_y, Rgba(tile_color(placement.tile)));
        }
    }

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| WorldError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path)
        .map_err(|e| WorldError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}

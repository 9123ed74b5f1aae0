//! Export mock catalogs to JSON, CSV and projected density images

use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};

use image::{GrayImage, ImageBuffer, Luma};

use crate::mock::MockCatalog;

/// Write the full mock catalog as pretty JSON.
pub fn export_mock_json(mock: &MockCatalog, path: &str) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), mock)?;
    Ok(())
}

/// Write the catalog summary as pretty JSON.
pub fn export_summary_json(mock: &MockCatalog, path: &str) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &mock.summary())?;
    Ok(())
}

/// Write the galaxy table as CSV.
pub fn export_mock_csv(mock: &MockCatalog, path: &str) -> Result<(), std::io::Error> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "gal_type,halo_id,halo_mass,x,y,z,vx,vy,vz")?;
    for galaxy in &mock.galaxies {
        writeln!(
            writer,
            "{},{},{:e},{:.6},{:.6},{:.6},{:.3},{:.3},{:.3}",
            galaxy.gal_type,
            galaxy.halo_id,
            galaxy.halo_mass,
            galaxy.position[0],
            galaxy.position[1],
            galaxy.position[2],
            galaxy.velocity[0],
            galaxy.velocity[1],
            galaxy.velocity[2],
        )?;
    }
    writer.flush()
}

/// Bin galaxies into an x-y projected count grid.
pub fn density_grid(mock: &MockCatalog, bins: usize) -> Vec<u32> {
    let mut grid = vec![0u32; bins * bins];
    if mock.box_size <= 0.0 || bins == 0 {
        return grid;
    }
    let scale = bins as f64 / mock.box_size;
    for galaxy in &mock.galaxies {
        let ix = ((galaxy.position[0] * scale) as usize).min(bins - 1);
        let iy = ((galaxy.position[1] * scale) as usize).min(bins - 1);
        grid[iy * bins + ix] += 1;
    }
    grid
}

/// Export the projected galaxy density as a log-scaled grayscale PNG.
pub fn export_density_map(
    mock: &MockCatalog,
    bins: usize,
    path: &str,
) -> Result<(), image::ImageError> {
    let grid = density_grid(mock, bins);
    let max_count = grid.iter().copied().max().unwrap_or(0).max(1);
    let log_max = (1.0 + max_count as f64).ln();

    let mut img: GrayImage = ImageBuffer::new(bins as u32, bins as u32);
    for y in 0..bins {
        for x in 0..bins {
            let count = grid[y * bins + x];
            let level = ((1.0 + count as f64).ln() / log_max * 255.0) as u8;
            img.put_pixel(x as u32, y as u32, Luma([level]));
        }
    }

    img.save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGalaxy;

    fn small_mock() -> MockCatalog {
        MockCatalog {
            galaxies: vec![
                MockGalaxy {
                    gal_type: "centrals".to_string(),
                    halo_id: 0,
                    halo_mass: 1.0e13,
                    position: [10.0, 10.0, 5.0],
                    velocity: [0.0, 0.0, 0.0],
                },
                MockGalaxy {
                    gal_type: "satellites".to_string(),
                    halo_id: 0,
                    halo_mass: 1.0e13,
                    position: [10.5, 10.5, 6.0],
                    velocity: [0.0, 0.0, 0.0],
                },
                MockGalaxy {
                    gal_type: "centrals".to_string(),
                    halo_id: 1,
                    halo_mass: 5.0e12,
                    position: [90.0, 90.0, 50.0],
                    velocity: [0.0, 0.0, 0.0],
                },
            ],
            box_size: 100.0,
            redshift: 0.0,
            seed: 0,
        }
    }

    #[test]
    fn test_density_grid_counts_galaxies() {
        let mock = small_mock();
        let grid = density_grid(&mock, 10);
        // Two galaxies land in the (1, 1) cell, one in (9, 9)
        assert_eq!(grid[1 * 10 + 1], 2);
        assert_eq!(grid[9 * 10 + 9], 1);
        assert_eq!(grid.iter().sum::<u32>(), 3);
    }

    #[test]
    fn test_density_grid_clamps_box_edge() {
        let mut mock = small_mock();
        mock.galaxies[0].position = [100.0, 100.0, 0.0];
        let grid = density_grid(&mock, 10);
        assert_eq!(grid.iter().sum::<u32>(), 3);
    }

    #[test]
    fn test_csv_row_count_matches_catalog() {
        let mock = small_mock();
        let dir = std::env::temp_dir().join("galaxy_populator_csv_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("mock.csv");
        export_mock_csv(&mock, path.to_str().unwrap()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        // header + one line per galaxy
        assert_eq!(contents.lines().count(), 1 + mock.galaxies.len());
        assert!(contents.starts_with("gal_type,"));
    }
}

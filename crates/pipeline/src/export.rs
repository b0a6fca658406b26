//! Prediction export: CSV and GeoTIFF
//!
//! Exports are derived, disposable artifacts. There is no partial-failure
//! handling: a failed export leaves an invalid file that callers must
//! discard.

use droughtrisk_core::io::{write_geotiff, GeoTiffOptions};
use droughtrisk_core::{Error, Raster, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a probability raster as CSV, one row per valid pixel with columns
/// `row,col,probability`. Masked (NaN / no-data) pixels are excluded.
///
/// Returns the number of data rows written, which always equals the
/// raster's valid pixel count.
pub fn write_probability_csv<W: Write>(prediction: &Raster<f32>, writer: W) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(["row", "col", "probability"])
        .map_err(|e| Error::Export(format!("Cannot write CSV header: {}", e)))?;

    let mut written = 0;
    for ((row, col), &p) in prediction.data().indexed_iter() {
        if prediction.is_nodata(p) {
            continue;
        }
        csv.write_record(&[row.to_string(), col.to_string(), p.to_string()])
            .map_err(|e| Error::Export(format!("Cannot write CSV row: {}", e)))?;
        written += 1;
    }

    csv.flush()
        .map_err(|e| Error::Export(format!("Cannot flush CSV: {}", e)))?;
    Ok(written)
}

/// Write the probability CSV to a file path.
pub fn write_probability_csv_file<P: AsRef<Path>>(
    prediction: &Raster<f32>,
    path: P,
) -> Result<usize> {
    let file = File::create(path.as_ref())
        .map_err(|e| Error::Export(format!("Cannot create {}: {}", path.as_ref().display(), e)))?;
    write_probability_csv(prediction, BufWriter::new(file))
}

/// Write the probability raster as a single-band float GeoTIFF carrying the
/// input scene's georeferencing.
pub fn write_prediction_geotiff<P: AsRef<Path>>(prediction: &Raster<f32>, path: P) -> Result<()> {
    write_geotiff(prediction, path, Some(GeoTiffOptions::default())).map_err(|e| match e {
        // Disk failures during export are export errors to the caller
        Error::Io(io) => Error::Export(io.to_string()),
        other => other,
    })
}

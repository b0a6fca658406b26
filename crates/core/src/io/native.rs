//! Native GeoTIFF reading/writing (without GDAL dependency)
//!
//! Uses the `tiff` crate. Multi-band scenes are read from pixel-interleaved
//! TIFFs; prediction rasters are written as single-band 32-bit float with
//! GeoTIFF georeferencing tags.

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement, Scene};
use crate::MIN_BAND_COUNT;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

// GeoTIFF / GDAL private tags
const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
const TAG_MODEL_TIEPOINT: u16 = 33922;
const TAG_GEO_KEY_DIRECTORY: u16 = 34735;
const TAG_GDAL_NODATA: u16 = 42113;

// GeoKey ids
const KEY_GT_MODEL_TYPE: u16 = 1024;
const KEY_GT_RASTER_TYPE: u16 = 1025;
const KEY_GEOGRAPHIC_TYPE: u32 = 2048;
const KEY_PROJECTED_CS_TYPE: u32 = 3072;

/// Options for writing GeoTIFF files
#[derive(Debug, Clone, Default)]
pub struct GeoTiffOptions {
    /// No-data value written as the GDAL_NODATA tag; defaults to the
    /// raster's own no-data value.
    pub nodata: Option<f32>,
}

/// Read a multi-band GeoTIFF file into a Scene.
///
/// Fails with [`Error::BandCount`] when the file carries fewer than
/// [`MIN_BAND_COUNT`] bands, and [`Error::InputFormat`] when the file is not
/// a decodable raster.
pub fn read_scene<T, P>(path: P) -> Result<Scene<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    let scene = decode_scene(file)?;
    validate_band_count(&scene)?;
    Ok(scene)
}

/// Read a multi-band GeoTIFF from an in-memory buffer into a Scene.
///
/// Same as [`read_scene`] but operates on a byte slice, for uploaded files.
pub fn read_scene_from_buffer<T>(data: &[u8]) -> Result<Scene<T>>
where
    T: RasterElement,
{
    let scene = decode_scene(Cursor::new(data))?;
    validate_band_count(&scene)?;
    Ok(scene)
}

/// Read a single-band GeoTIFF (e.g. an exported prediction raster).
///
/// Fails with [`Error::InputFormat`] if the file carries more than one band.
pub fn read_raster<T, P>(path: P) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    scene_to_raster(decode_scene(file)?)
}

/// Read a single-band GeoTIFF from an in-memory buffer.
pub fn read_raster_from_buffer<T>(data: &[u8]) -> Result<Raster<T>>
where
    T: RasterElement,
{
    scene_to_raster(decode_scene(Cursor::new(data))?)
}

fn scene_to_raster<T: RasterElement>(scene: Scene<T>) -> Result<Raster<T>> {
    if scene.band_count() != 1 {
        return Err(Error::InputFormat(format!(
            "Expected a single-band raster, found {} bands",
            scene.band_count()
        )));
    }
    let mut raster = Raster::from_vec(
        scene.band(1)?.iter().copied().collect(),
        scene.rows(),
        scene.cols(),
    )?;
    raster.set_transform(*scene.transform());
    raster.set_crs(scene.crs().cloned());
    raster.set_nodata(scene.nodata());
    Ok(raster)
}

fn validate_band_count<T: RasterElement>(scene: &Scene<T>) -> Result<()> {
    if scene.band_count() < MIN_BAND_COUNT {
        return Err(Error::BandCount {
            found: scene.band_count(),
            required: MIN_BAND_COUNT,
        });
    }
    Ok(())
}

/// Internal: decode a GeoTIFF from any `Read + Seek` source
fn decode_scene<T, R>(reader: R) -> Result<Scene<T>>
where
    T: RasterElement,
    R: std::io::Read + std::io::Seek,
{
    let mut decoder =
        Decoder::new(reader).map_err(|e| Error::InputFormat(format!("TIFF decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| Error::InputFormat(format!("Cannot read dimensions: {}", e)))?;

    let rows = height as usize;
    let cols = width as usize;

    let bands = decoder
        .get_tag_u32(Tag::SamplesPerPixel)
        .unwrap_or(1) as usize;
    if bands == 0 {
        return Err(Error::InputFormat("Zero samples per pixel".into()));
    }

    let result = decoder
        .read_image()
        .map_err(|e| Error::InputFormat(format!("Cannot read image data: {}", e)))?;

    // Pixel-interleaved samples, cast to the requested element type
    let interleaved: Vec<T> = match result {
        DecodingResult::F32(buf) => cast_samples(&buf),
        DecodingResult::F64(buf) => cast_samples(&buf),
        DecodingResult::U8(buf) => cast_samples(&buf),
        DecodingResult::U16(buf) => cast_samples(&buf),
        DecodingResult::U32(buf) => cast_samples(&buf),
        DecodingResult::I8(buf) => cast_samples(&buf),
        DecodingResult::I16(buf) => cast_samples(&buf),
        DecodingResult::I32(buf) => cast_samples(&buf),
        _ => {
            return Err(Error::InputFormat(
                "Unsupported TIFF pixel format".to_string(),
            ))
        }
    };

    if interleaved.len() != rows * cols * bands {
        return Err(Error::InputFormat(format!(
            "Expected {} samples ({} bands x {} x {}), found {}",
            rows * cols * bands,
            bands,
            rows,
            cols,
            interleaved.len()
        )));
    }

    // Reorder to band-sequential (band, row, col)
    let mut sequential = vec![T::zero(); interleaved.len()];
    for pixel in 0..rows * cols {
        for band in 0..bands {
            sequential[band * rows * cols + pixel] = interleaved[pixel * bands + band];
        }
    }

    let mut scene = Scene::from_vec(sequential, bands, rows, cols)?;

    if let Ok(transform) = read_geotransform(&mut decoder) {
        scene.set_transform(transform);
    }
    scene.set_crs(read_crs(&mut decoder));
    scene.set_nodata(read_nodata(&mut decoder));

    Ok(scene)
}

fn cast_samples<T: RasterElement, S: Copy + num_traits::NumCast>(buf: &[S]) -> Vec<T> {
    buf.iter()
        .map(|&v| num_traits::cast(v).unwrap_or(T::default_nodata()))
        .collect()
}

/// Attempt to read GeoTransform from TIFF tags
/// (ModelPixelScaleTag + ModelTiepointTag)
fn read_geotransform<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> Result<GeoTransform> {
    let scale = decoder
        .get_tag_f64_vec(Tag::ModelPixelScaleTag)
        .map_err(|_| Error::Other("No pixel scale tag".into()))?;

    let tiepoint = decoder
        .get_tag_f64_vec(Tag::ModelTiepointTag)
        .map_err(|_| Error::Other("No tiepoint tag".into()))?;

    if scale.len() >= 2 && tiepoint.len() >= 6 {
        // tiepoint: [I, J, K, X, Y, Z]
        // scale: [ScaleX, ScaleY, ScaleZ]
        let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
        let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
        let pixel_width = scale[0];
        let pixel_height = -scale[1]; // Negative for north-up

        return Ok(GeoTransform::new(
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
        ));
    }

    Err(Error::Other("Cannot determine geotransform".into()))
}

/// Recover an EPSG code from the GeoKey directory, if present.
fn read_crs<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<Crs> {
    let keys = decoder
        .get_tag_u32_vec(Tag::GeoKeyDirectoryTag)
        .ok()?;

    // Entries of four shorts after the 4-short header: [key, location, count, value].
    // Only inline values (location == 0) can be interpreted here.
    let mut epsg = None;
    for entry in keys[4.min(keys.len())..].chunks_exact(4) {
        let (key, location, value) = (entry[0], entry[1], entry[3]);
        if location != 0 {
            continue;
        }
        match key {
            KEY_PROJECTED_CS_TYPE => return Some(Crs::from_epsg(value)),
            KEY_GEOGRAPHIC_TYPE => epsg = Some(value),
            _ => {}
        }
    }
    epsg.map(Crs::from_epsg)
}

/// Parse the GDAL_NODATA ASCII tag, if present.
fn read_nodata<T: RasterElement, R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> Option<T> {
    let text = decoder
        .get_tag_ascii_string(Tag::GdalNodata)
        .ok()?;
    let value: f64 = text.trim().trim_end_matches('\0').parse().ok()?;
    if value.is_nan() {
        return Some(T::default_nodata());
    }
    num_traits::cast(value)
}

/// Write a Raster to a GeoTIFF file.
///
/// Single-band 32-bit float output carrying the raster's geotransform and,
/// when known, its EPSG code.
pub fn write_geotiff<T, P>(raster: &Raster<T>, path: P, options: Option<GeoTiffOptions>) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())?;
    encode_geotiff(raster, file, options.unwrap_or_default())
}

/// Write a Raster to an in-memory GeoTIFF buffer.
pub fn write_geotiff_to_buffer<T>(
    raster: &Raster<T>,
    options: Option<GeoTiffOptions>,
) -> Result<Vec<u8>>
where
    T: RasterElement,
{
    let mut buf = Vec::new();
    encode_geotiff(raster, Cursor::new(&mut buf), options.unwrap_or_default())?;
    Ok(buf)
}

/// Internal: encode a Raster as GeoTIFF into any `Write + Seek` sink
fn encode_geotiff<T, W>(raster: &Raster<T>, writer: W, options: GeoTiffOptions) -> Result<()>
where
    T: RasterElement,
    W: std::io::Write + std::io::Seek,
{
    let mut encoder = TiffEncoder::new(writer)
        .map_err(|e| Error::Export(format!("TIFF encoder error: {}", e)))?;

    let (rows, cols) = raster.shape();

    // Convert data to f32
    let data: Vec<f32> = raster
        .data()
        .iter()
        .map(|&v| num_traits::cast(v).unwrap_or(f32::NAN))
        .collect();

    let mut image = encoder
        .new_image::<Gray32Float>(cols as u32, rows as u32)
        .map_err(|e| Error::Export(format!("Cannot create TIFF image: {}", e)))?;

    let gt = raster.transform();

    // ModelPixelScaleTag
    let scale = vec![gt.pixel_width, gt.pixel_height.abs(), 0.0];
    image
        .encoder()
        .write_tag(Tag::Unknown(TAG_MODEL_PIXEL_SCALE), scale.as_slice())
        .map_err(|e| Error::Export(format!("Cannot write scale tag: {}", e)))?;

    // ModelTiepointTag
    let tiepoint = vec![0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    image
        .encoder()
        .write_tag(Tag::Unknown(TAG_MODEL_TIEPOINT), tiepoint.as_slice())
        .map_err(|e| Error::Export(format!("Cannot write tiepoint tag: {}", e)))?;

    // GeoKeyDirectoryTag: GTModelTypeGeoKey=1 (Projected),
    // GTRasterTypeGeoKey=1 (RasterPixelIsArea), plus ProjectedCSTypeGeoKey
    // when the EPSG code is known.
    let mut geokeys: Vec<u16> = vec![
        1, 1, 0, 2,
        KEY_GT_MODEL_TYPE, 0, 1, 1,
        KEY_GT_RASTER_TYPE, 0, 1, 1,
    ];
    if let Some(epsg) = raster.crs().and_then(|c| c.epsg()) {
        if epsg <= u16::MAX as u32 {
            geokeys[3] = 3;
            geokeys.extend_from_slice(&[KEY_PROJECTED_CS_TYPE as u16, 0, 1, epsg as u16]);
        }
    }
    image
        .encoder()
        .write_tag(Tag::Unknown(TAG_GEO_KEY_DIRECTORY), geokeys.as_slice())
        .map_err(|e| Error::Export(format!("Cannot write geokey tag: {}", e)))?;

    // GDAL_NODATA
    let nodata = options
        .nodata
        .or_else(|| raster.nodata().and_then(|v| num_traits::cast(v)));
    if let Some(nd) = nodata {
        let text = if nd.is_nan() {
            "nan".to_string()
        } else {
            format!("{}", nd)
        };
        image
            .encoder()
            .write_tag(Tag::Unknown(TAG_GDAL_NODATA), text.as_str())
            .map_err(|e| Error::Export(format!("Cannot write nodata tag: {}", e)))?;
    }

    image
        .write_data(&data)
        .map_err(|e| Error::Export(format!("Cannot write image data: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probability_raster() -> Raster<f32> {
        let mut r = Raster::from_vec(vec![0.0, 0.25, 0.5, 1.0], 2, 2).unwrap();
        r.set_transform(GeoTransform::new(500_000.0, 3_600_000.0, 5.0, -5.0));
        r.set_crs(Some(Crs::from_epsg(32636)));
        r.set_nodata(Some(f32::NAN));
        r
    }

    #[test]
    fn single_band_file_is_rejected_as_scene() {
        let buf = write_geotiff_to_buffer(&probability_raster(), None).unwrap();
        let err = read_scene_from_buffer::<f32>(&buf).unwrap_err();
        match err {
            Error::BandCount { found, required } => {
                assert_eq!(found, 1);
                assert_eq!(required, MIN_BAND_COUNT);
            }
            other => panic!("expected BandCount error, got {:?}", other),
        }
    }

    #[test]
    fn garbage_is_an_input_format_error() {
        let err = read_scene_from_buffer::<f32>(b"not a tiff at all").unwrap_err();
        assert!(matches!(err, Error::InputFormat(_)));
    }

    #[test]
    fn georeferencing_survives_encoding() {
        let raster = probability_raster();
        let buf = write_geotiff_to_buffer(&raster, None).unwrap();

        // Single band, so decode below the scene validation layer
        let scene: Scene<f32> = decode_scene(Cursor::new(&buf)).unwrap();
        assert_eq!(scene.band_count(), 1);
        assert_eq!(scene.shape(), (2, 2));
        assert_eq!(scene.transform(), raster.transform());
        assert_eq!(scene.crs().unwrap().epsg(), Some(32636));

        let band = scene.band(1).unwrap();
        assert_eq!(band[(0, 1)], 0.25);
        assert_eq!(band[(1, 1)], 1.0);
    }

    #[test]
    fn nodata_tag_roundtrip() {
        let mut raster = probability_raster();
        raster.set_nodata(Some(-9999.0));
        let buf = write_geotiff_to_buffer(&raster, None).unwrap();
        let scene: Scene<f32> = decode_scene(Cursor::new(&buf)).unwrap();
        assert_eq!(scene.nodata(), Some(-9999.0));
    }
}

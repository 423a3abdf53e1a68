//! EXIFからの位置・方位・撮影日時の抽出
//!
//! 抽出は失敗しない。タグが欠けていれば該当項目を省くだけ。

use exif::{Field, In, Tag, Value};
use log::debug;
use photo_annotate_common::{GeoCoordinate, PhotoMetadata};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// 写真1枚からメタデータを取り出す
pub trait MetadataExtractor {
    fn extract(&self, path: &Path) -> PhotoMetadata;
}

/// kamadak-exif による実装（JPEG / PNG / HEIC / TIFF）
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifExtractor;

impl MetadataExtractor for ExifExtractor {
    fn extract(&self, path: &Path) -> PhotoMetadata {
        match read_exif(path) {
            Ok(exif) => metadata_from_fields(exif.fields()),
            Err(e) => {
                debug!("EXIFなし {}: {}", path.display(), e);
                PhotoMetadata::default()
            }
        }
    }
}

fn read_exif(path: &Path) -> Result<exif::Exif, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let mut bufreader = BufReader::new(file);
    let exif_reader = exif::Reader::new();
    Ok(exif_reader.read_from_container(&mut bufreader)?)
}

/// EXIFフィールド群からメタデータを組み立てる
///
/// 座標は緯度・緯度参照・経度・経度参照の4つが揃った場合のみ。
/// 方位は座標の有無と無関係に読む。日時は DateTimeDigitized のみを文字列のまま使う。
pub fn metadata_from_fields<'a, I>(fields: I) -> PhotoMetadata
where
    I: IntoIterator<Item = &'a Field>,
{
    let fields: Vec<&Field> = fields
        .into_iter()
        .filter(|f| f.ifd_num == In::PRIMARY)
        .collect();

    let heading = find_field(&fields, Tag::GPSImgDirection).and_then(|f| first_number(&f.value));

    let timestamp = find_field(&fields, Tag::DateTimeDigitized)
        .and_then(|f| ascii(&f.value))
        .unwrap_or_default();

    PhotoMetadata {
        coordinate: coordinate(&fields),
        heading,
        timestamp,
    }
}

fn find_field<'a>(fields: &[&'a Field], tag: Tag) -> Option<&'a Field> {
    fields.iter().copied().find(|f| f.tag == tag)
}

fn coordinate(fields: &[&Field]) -> Option<GeoCoordinate> {
    let mut latitude = degrees(&find_field(fields, Tag::GPSLatitude)?.value)?;
    let lat_ref = ascii(&find_field(fields, Tag::GPSLatitudeRef)?.value)?;
    let mut longitude = degrees(&find_field(fields, Tag::GPSLongitude)?.value)?;
    let lon_ref = ascii(&find_field(fields, Tag::GPSLongitudeRef)?.value)?;

    if lat_ref == "S" {
        latitude = -latitude;
    }
    if lon_ref == "W" {
        longitude = -longitude;
    }
    Some(GeoCoordinate::new(latitude, longitude))
}

/// 度分秒の有理数（または十進度1要素）を十進度に変換
fn degrees(value: &Value) -> Option<f64> {
    let parts: Vec<f64> = match value {
        Value::Rational(v) => {
            if v.iter().any(|r| r.denom == 0) {
                return None;
            }
            v.iter().map(|r| r.to_f64()).collect()
        }
        Value::Double(v) => v.clone(),
        Value::Float(v) => v.iter().map(|&x| x as f64).collect(),
        _ => return None,
    };

    let deg = *parts.first()?;
    let min = parts.get(1).copied().unwrap_or(0.0);
    let sec = parts.get(2).copied().unwrap_or(0.0);
    Some(deg + min / 60.0 + sec / 3600.0)
}

fn first_number(value: &Value) -> Option<f64> {
    match value {
        Value::Rational(v) => v.first().filter(|r| r.denom != 0).map(|r| r.to_f64()),
        Value::SRational(v) => v.first().filter(|r| r.denom != 0).map(|r| r.to_f64()),
        Value::Double(v) => v.first().copied(),
        Value::Float(v) => v.first().map(|&x| x as f64),
        other => other.get_uint(0).map(f64::from),
    }
}

fn ascii(value: &Value) -> Option<String> {
    match value {
        Value::Ascii(v) => {
            let raw = v.first()?;
            let text = String::from_utf8_lossy(raw)
                .trim_end_matches('\0')
                .trim()
                .to_string();
            if text.is_empty() {
                None
            } else {
                Some(text)
            }
        }
        _ => None,
    }
}

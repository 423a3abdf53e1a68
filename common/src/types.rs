//! 写真メタデータと地図表示範囲の型定義
//!
//! - PhotoMetadata: EXIFから抽出した位置・方位・撮影日時
//! - MapSpan / MapRegion: 地図の表示範囲（写真を切り替えても維持する）

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 緯度経度（十進度、南緯・西経は負）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// 写真1枚分のメタデータ
///
/// 座標は緯度・経度が揃った場合のみ存在する。撮影日時が不明な場合は空文字。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoMetadata {
    #[serde(default)]
    pub coordinate: Option<GeoCoordinate>,

    /// 撮影方位（度）。正規化はしない
    #[serde(default)]
    pub heading: Option<f64>,

    /// EXIF DateTimeDigitized の文字列そのまま
    #[serde(default)]
    pub timestamp: String,
}

impl PhotoMetadata {
    /// 緯度経度の表示文字列（小数6桁、カンマ区切り）。座標がなければ空文字
    pub fn lat_lon_display(&self) -> String {
        match self.coordinate {
            Some(c) => format!("{:11.6}, {:11.6}", c.latitude, c.longitude),
            None => String::new(),
        }
    }

    /// 方位の表示文字列（小数2桁）
    pub fn heading_display(&self) -> Option<String> {
        self.heading.map(|h| format!("{:6.2}", h))
    }
}

/// 地図の表示スパン（度）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSpan {
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl MapSpan {
    pub fn new(latitude_delta: f64, longitude_delta: f64) -> Result<Self> {
        if !(latitude_delta > 0.0 && longitude_delta > 0.0) {
            return Err(Error::InvalidSpan(format!(
                "{} x {}",
                latitude_delta, longitude_delta
            )));
        }
        Ok(Self {
            latitude_delta,
            longitude_delta,
        })
    }
}

impl Default for MapSpan {
    fn default() -> Self {
        Self {
            latitude_delta: 0.02,
            longitude_delta: 0.02,
        }
    }
}

/// 地図の表示領域
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapRegion {
    pub center: GeoCoordinate,
    pub span: MapSpan,
}

impl Default for MapRegion {
    fn default() -> Self {
        Self {
            center: GeoCoordinate::new(45.0, -90.0),
            span: MapSpan::default(),
        }
    }
}

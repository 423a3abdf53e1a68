//! フォルダ内の写真一覧（メタデータ＋注記）
//!
//! 抽出は写真ごとに独立しているため rayon で並列に行う。セッションの状態には触れない。

use crate::annotation::AnnotationStore;
use crate::scanner::MetadataExtractor;
use indicatif::ProgressBar;
use photo_annotate_common::PhotoMetadata;
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoListing {
    pub file_name: String,
    pub file_path: String,
    pub metadata: PhotoMetadata,
    pub annotation: String,
}

impl PhotoListing {
    /// 一覧表示用の1行
    pub fn summary_line(&self) -> String {
        let heading = self.metadata.heading_display().unwrap_or_default();
        let annotation = self.annotation.lines().next().unwrap_or("");
        format!(
            "{:<24} {:<19} {:<24} {:>6}  {}",
            self.file_name,
            self.metadata.timestamp,
            self.metadata.lat_lon_display(),
            heading,
            annotation
        )
    }
}

/// 写真ごとにメタデータと注記を集める。結果は入力と同じ順序
pub fn list_photos<M, S>(
    photos: &[PathBuf],
    extractor: &M,
    store: &S,
    progress: Option<&ProgressBar>,
) -> Vec<PhotoListing>
where
    M: MetadataExtractor + Sync,
    S: AnnotationStore + Sync,
{
    photos
        .par_iter()
        .map(|path| {
            let listing = PhotoListing {
                file_name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
                file_path: path.to_string_lossy().to_string(),
                metadata: extractor.extract(path),
                annotation: store.load(path),
            };
            if let Some(pb) = progress {
                pb.inc(1);
            }
            listing
        })
        .collect()
}

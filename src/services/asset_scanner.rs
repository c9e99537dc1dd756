//! 资产目录扫描 - 业务能力层
//!
//! 深度优先遍历根目录，按排除规则决定哪些目录参与匹配，哪些文件需要分发。
//!
//! 排除规则只抑制"匹配"，不抑制"遍历"：被跳过的目录仍会被访问，
//! 只是其中的文件不会产生 [`ScanMatch`]

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{AppResult, FileError};
use crate::models::{IgnoreSet, ScanMatch};

/// 遍历过程中遇到的异常（无法读取的目录、损坏的链接等）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanAnomaly {
    pub path: Option<PathBuf>,
    pub message: String,
}

/// 资产目录扫描器
#[derive(Debug, Clone)]
pub struct AssetTreeScanner {
    material_marker: String,
}

impl AssetTreeScanner {
    pub fn new(material_marker: impl Into<String>) -> Self {
        Self {
            material_marker: material_marker.into(),
        }
    }

    /// 开始一次新的遍历
    ///
    /// 根目录下的每个条目名（去掉被忽略的）都是已知条目；
    /// 遍历到与之同名的目录时，它成为后续命中的条目上下文
    pub fn scan(&self, root: &Path, ignore: &IgnoreSet, filter: &str) -> AppResult<AssetScan> {
        let entries = fs::read_dir(root).map_err(|source| FileError::ReadDirFailed {
            path: root.to_path_buf(),
            source,
        })?;

        let mut anomalies = Vec::new();
        let known_items = collect_known_items(
            root,
            entries.map(|entry| entry.map(|e| e.file_name())),
            ignore,
            &mut anomalies,
        );
        debug!("已知条目 {} 个: {:?}", known_items.len(), known_items);

        // 同一目录内文件排在子目录之前，保证某个目录的文件在进入其子树之前全部产出
        let walker = WalkDir::new(root)
            .sort_by(|a, b| a.file_type().is_dir().cmp(&b.file_type().is_dir()))
            .into_iter();

        Ok(AssetScan {
            walker,
            known_items,
            ignore: ignore.clone(),
            material_marker: self.material_marker.clone(),
            filter: filter.to_string(),
            current_item: None,
            next_ordinal: 0,
            anomalies,
        })
    }
}

/// 根目录条目名去掉被忽略的；读取失败的条目记为异常后跳过
fn collect_known_items(
    root: &Path,
    names: impl Iterator<Item = io::Result<OsString>>,
    ignore: &IgnoreSet,
    anomalies: &mut Vec<ScanAnomaly>,
) -> BTreeSet<String> {
    let mut known_items = BTreeSet::new();
    for name in names {
        match name {
            Ok(name) => {
                let name = name.to_string_lossy().into_owned();
                if !ignore.contains(&name) {
                    known_items.insert(name);
                }
            }
            Err(e) => {
                warn!("⚠️ 无法读取根目录条目, 已跳过 {}: {}", root.display(), e);
                anomalies.push(ScanAnomaly {
                    path: Some(root.to_path_buf()),
                    message: e.to_string(),
                });
            }
        }
    }
    known_items
}

/// 一次遍历，按文件系统顺序惰性产出 [`ScanMatch`]
pub struct AssetScan {
    walker: walkdir::IntoIter,
    known_items: BTreeSet<String>,
    ignore: IgnoreSet,
    material_marker: String,
    filter: String,
    current_item: Option<String>,
    next_ordinal: usize,
    anomalies: Vec<ScanAnomaly>,
}

impl AssetScan {
    /// 目前为止记录到的遍历异常
    pub fn anomalies(&self) -> &[ScanAnomaly] {
        &self.anomalies
    }

    /// 目录是否被排除在匹配之外
    fn is_suppressed(&self, dir: &Path) -> bool {
        let text = dir.to_string_lossy();
        text.contains(self.material_marker.as_str()) || self.ignore.matches_path(&text)
    }

    fn enter_directory(&mut self, dir: &Path) {
        if self.is_suppressed(dir) {
            debug!("跳过目录匹配: {}", dir.display());
            return;
        }
        let Some(name) = dir.file_name().map(|n| n.to_string_lossy()) else {
            return;
        };
        if self.known_items.contains(&*name) {
            debug!("切换条目上下文: {}", name);
            self.current_item = Some(name.into_owned());
        }
    }

    fn record_anomaly(&mut self, err: walkdir::Error) {
        let path = err.path().map(Path::to_path_buf);
        warn!(
            "⚠️ 遍历异常, 已跳过 {}: {}",
            path.as_deref().map(|p| p.display().to_string()).unwrap_or_default(),
            err
        );
        self.anomalies.push(ScanAnomaly {
            path,
            message: err.to_string(),
        });
    }

    fn try_match(&mut self, entry: &DirEntry) -> Option<ScanMatch> {
        // 指向目录的符号链接不跟随，也不当作文件
        if entry.path_is_symlink() && entry.path().is_dir() {
            return None;
        }
        let file_name = entry.file_name().to_string_lossy();
        if !file_name.contains(self.filter.as_str()) {
            return None;
        }
        let directory = entry.path().parent()?;
        if self.is_suppressed(directory) {
            return None;
        }

        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        Some(ScanMatch {
            ordinal,
            directory: directory.to_path_buf(),
            file_name: file_name.into_owned(),
            item: self.current_item.clone(),
        })
    }
}

impl Iterator for AssetScan {
    type Item = ScanMatch;

    fn next(&mut self) -> Option<ScanMatch> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    self.record_anomaly(err);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                self.enter_directory(entry.path());
                continue;
            }

            if let Some(found) = self.try_match(&entry) {
                return Some(found);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    fn scan_all(root: &Path, ignore: &IgnoreSet, filter: &str) -> Vec<ScanMatch> {
        AssetTreeScanner::new("Material")
            .scan(root, ignore, filter)
            .unwrap()
            .collect()
    }

    fn tree(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            touch(dir.path(), file);
        }
        dir
    }

    #[test]
    fn test_reference_scenario_yields_single_match() {
        let dir = tree(&["CharA/model.fbx", "CharA/Material/tex.fbx", "Barbara/model.fbx"]);
        let matches = scan_all(dir.path(), &IgnoreSet::new(["Barbara"]), ".fbx");

        assert_eq!(matches.len(), 1);
        let only = &matches[0];
        assert_eq!(only.item.as_deref(), Some("CharA"));
        assert_eq!(only.file_name, "model.fbx");
        assert_eq!(only.directory, dir.path().join("CharA"));
        assert_eq!(only.ordinal, 0);
    }

    #[test]
    fn test_ignored_item_never_becomes_context() {
        let dir = tree(&[
            "Barbara/model.fbx",
            "Barbara/Sub/deep.fbx",
            "CharA/a.fbx",
            "CharB/b.fbx",
        ]);
        let matches = scan_all(dir.path(), &IgnoreSet::new(["Barbara"]), "fbx");

        assert_eq!(matches.len(), 2);
        assert!(matches
            .iter()
            .all(|m| m.item.as_deref() != Some("Barbara")));
        assert!(matches
            .iter()
            .all(|m| !m.directory.to_string_lossy().contains("Barbara")));
    }

    #[test]
    fn test_material_subtree_is_suppressed_but_siblings_match() {
        let dir = tree(&[
            "CharA/Material/tex.fbx",
            "CharA/Material/Nested/more.fbx",
            "CharA/Meshes/body.fbx",
            "CharA/root.fbx",
        ]);
        let matches = scan_all(dir.path(), &IgnoreSet::default(), ".fbx");

        let mut names: Vec<_> = matches.iter().map(|m| m.file_name.as_str()).collect();
        names.sort();
        assert_eq!(names, ["body.fbx", "root.fbx"]);
        assert!(matches.iter().all(|m| m.item.as_deref() == Some("CharA")));
    }

    #[test]
    fn test_filter_is_substring_not_suffix() {
        let dir = tree(&["CharA/thing.fbx.meta", "CharA/thing.obj"]);
        let matches = scan_all(dir.path(), &IgnoreSet::default(), "fbx");

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].file_name, "thing.fbx.meta");
    }

    #[test]
    fn test_nested_item_name_supersedes_context() {
        let dir = tree(&["CharA/Outfits/CharB/alt.fbx", "CharB/main.fbx"]);
        let matches = scan_all(dir.path(), &IgnoreSet::default(), ".fbx");

        let alt = matches.iter().find(|m| m.file_name == "alt.fbx").unwrap();
        assert_eq!(alt.item.as_deref(), Some("CharB"));
    }

    #[test]
    fn test_files_of_a_directory_precede_its_subtree() {
        let dir = tree(&["CharA/Sub/inner.fbx", "CharA/outer.fbx"]);
        let matches = scan_all(dir.path(), &IgnoreSet::default(), ".fbx");

        let names: Vec<_> = matches.iter().map(|m| m.file_name.as_str()).collect();
        assert_eq!(names, ["outer.fbx", "inner.fbx"]);
        let ordinals: Vec<_> = matches.iter().map(|m| m.ordinal).collect();
        assert_eq!(ordinals, [0, 1]);
    }

    #[test]
    fn test_scan_is_restartable() {
        let dir = tree(&["CharA/a.fbx", "CharB/b.fbx"]);
        let first = scan_all(dir.path(), &IgnoreSet::default(), ".fbx");
        let second = scan_all(dir.path(), &IgnoreSet::default(), ".fbx");
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_root_is_filesystem_error() {
        let dir = TempDir::new().unwrap();
        let result = AssetTreeScanner::new("Material").scan(
            &dir.path().join("absent"),
            &IgnoreSet::default(),
            ".fbx",
        );
        assert!(matches!(
            result,
            Err(crate::error::AppError::File(FileError::ReadDirFailed { .. }))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_recorded_and_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tree(&["CharA/a.fbx", "CharB/Locked/hidden.fbx", "CharC/c.fbx"]);
        let locked = dir.path().join("CharB/Locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // root 用户可以无视权限读取目录，此时没有异常可测
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            eprintln!("skipped: running with permission to read mode-000 directories");
            return;
        }

        let mut scan = AssetTreeScanner::new("Material")
            .scan(dir.path(), &IgnoreSet::default(), ".fbx")
            .unwrap();
        let matches: Vec<_> = scan.by_ref().collect();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(scan.anomalies().len(), 1);
    }

    #[test]
    fn test_directory_vanishing_mid_scan_is_recorded() {
        let dir = tree(&["CharA/a.fbx", "CharA/Sub/b.fbx"]);

        let mut scan = AssetTreeScanner::new("Material")
            .scan(dir.path(), &IgnoreSet::default(), ".fbx")
            .unwrap();

        // 同一目录内文件先于子目录产出，此时 Sub 尚未被打开
        let first = scan.next().unwrap();
        assert_eq!(first.file_name, "a.fbx");
        fs::remove_dir_all(dir.path().join("CharA/Sub")).unwrap();

        let rest: Vec<_> = scan.by_ref().collect();
        assert!(rest.is_empty());
        assert_eq!(scan.anomalies().len(), 1);
        let anomaly = &scan.anomalies()[0];
        assert_eq!(anomaly.path.as_deref(), Some(dir.path().join("CharA/Sub").as_path()));
    }

    #[test]
    fn test_unreadable_root_entry_is_recorded() {
        let names = vec![
            Ok(OsString::from("CharA")),
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "entry unreadable")),
            Ok(OsString::from("Barbara")),
        ];
        let mut anomalies = Vec::new();

        let known = collect_known_items(
            Path::new("/chars"),
            names.into_iter(),
            &IgnoreSet::new(["Barbara"]),
            &mut anomalies,
        );

        assert_eq!(known.into_iter().collect::<Vec<_>>(), ["CharA"]);
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].path.as_deref(), Some(Path::new("/chars")));
        assert!(anomalies[0].message.contains("entry unreadable"));
    }
}

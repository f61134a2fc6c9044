//! # 文件扫描器
//!
//! 按扩展名收集待处理的 ROM 文件列表，深度受限。
//!
//! ## 功能
//! - 深度优先、前序、确定性遍历（目录项排序）
//! - 深度 0 = 仅根目录的直接子项
//! - 不可读目录/文件静默跳过，返回部分结果
//!
//! ## 依赖关系
//! - 被 `commands/` 模块调用
//! - 使用 `walkdir` 遍历目录

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 收集 `root` 下扩展名匹配的文件，按确定性顺序返回绝对路径
///
/// `max_depth = 0` 只扫描根目录的直接子项；`max_depth = d` 额外深入
/// d 层子目录。根目录不存在时返回空列表而非错误。
pub fn scan(root: &Path, max_depth: usize, extensions: &[&str]) -> Vec<PathBuf> {
    // 任务路径要作为 nsz 的参数传递，相对根先解析成绝对路径；
    // 根不存在时 canonicalize 失败，保留原样由遍历返回空列表
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    // walkdir 的深度以根为 0、直接子项为 1，故文件可出现的最大深度为 d + 1
    WalkDir::new(&root)
        .max_depth(max_depth + 1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| matches_extension(e.path(), extensions))
        .map(|e| e.path().to_path_buf())
        .collect()
}

/// 扩展名匹配（大小写不敏感）
fn matches_extension(path: &Path, extensions: &[&str]) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => {
            let ext = ext.to_ascii_lowercase();
            extensions.iter().any(|want| *want == ext)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const EXTS: &[&str] = &["nsp", "xci"];

    /// 构造固定目录树:
    /// root/a.nsp, root/b.txt, root/sub/c.nsp, root/sub/deep/d.xci
    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("a.nsp"), b"").unwrap();
        fs::write(root.join("b.txt"), b"").unwrap();
        fs::create_dir_all(root.join("sub/deep")).unwrap();
        fs::write(root.join("sub/c.nsp"), b"").unwrap();
        fs::write(root.join("sub/deep/d.xci"), b"").unwrap();
        dir
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_depth_zero_stays_in_root() {
        let dir = fixture();
        let found = scan(dir.path(), 0, EXTS);
        assert_eq!(names(&found), vec!["a.nsp"]);
    }

    #[test]
    fn test_depth_one_includes_first_level_subdirs() {
        let dir = fixture();
        let found = scan(dir.path(), 1, EXTS);
        assert_eq!(names(&found), vec!["a.nsp", "c.nsp"]);
    }

    #[test]
    fn test_depth_two_reaches_nested_dir() {
        let dir = fixture();
        let found = scan(dir.path(), 2, EXTS);
        assert_eq!(names(&found), vec!["a.nsp", "c.nsp", "d.xci"]);
    }

    #[test]
    fn test_increasing_depth_only_adds_paths() {
        let dir = fixture();
        let mut previous = Vec::new();
        for depth in 0..=3 {
            let found = scan(dir.path(), depth, EXTS);
            for p in &previous {
                assert!(found.contains(p), "depth increase removed {:?}", p);
            }
            previous = found;
        }
    }

    #[test]
    fn test_relative_root_yields_absolute_paths() {
        let dir = fixture();
        std::env::set_current_dir(dir.path()).unwrap();
        let found = scan(Path::new("."), 0, EXTS);
        assert_eq!(names(&found), vec!["a.nsp"]);
        assert!(found.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn test_nonexistent_root_yields_empty() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");
        assert!(scan(&missing, 3, EXTS).is_empty());
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("GAME.NSP"), b"").unwrap();
        let found = scan(dir.path(), 0, EXTS);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_non_matching_extensions_filtered() {
        let dir = fixture();
        let found = scan(dir.path(), 3, &["ncz"]);
        assert!(found.is_empty());
    }
}

//! 输入图片收集

use comicforge::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// 收录的图片扩展名（不区分大小写）
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// 按阅读顺序收集图片路径
///
/// 封面排在最前；文件参数按给出的顺序原样收录；目录参数递归遍历，
/// 按文件名排序后收录其中的jpg/jpeg文件。封面不会被重复收录。
///
/// # 参数
/// * `inputs` - 图片文件或目录
/// * `cover` - 可选的封面图片
pub fn collect_images(inputs: &[PathBuf], cover: Option<&Path>) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    if let Some(cover) = cover {
        images.push(cover.to_path_buf());
    }

    for input in inputs {
        if input.is_dir() {
            walk_dir(input, cover, &mut images)?;
        } else if Some(input.as_path()) != cover {
            images.push(input.clone());
        }
    }
    Ok(images)
}

fn walk_dir(dir: &Path, cover: Option<&Path>, images: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk_dir(&path, cover, images)?;
        } else if is_image(&path) && Some(path.as_path()) != cover {
            images.push(path);
        }
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_walk_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("ch02")).unwrap();
        fs::create_dir(root.join("ch01")).unwrap();
        for name in ["ch02/001.jpg", "ch01/002.JPEG", "ch01/001.jpg", "ch01/notes.txt", "cover.jpg"] {
            fs::write(root.join(name), b"x").unwrap();
        }

        let cover = root.join("cover.jpg");
        let images = collect_images(&[root.to_path_buf()], Some(&cover)).unwrap();
        assert_eq!(
            images,
            vec![
                cover.clone(),
                root.join("ch01/001.jpg"),
                root.join("ch01/002.JPEG"),
                root.join("ch02/001.jpg"),
            ]
        );
    }

    #[test]
    fn test_files_keep_argument_order() {
        let inputs = vec![PathBuf::from("b.jpg"), PathBuf::from("a.png")];
        let images = collect_images(&inputs, None).unwrap();
        assert_eq!(images, inputs);
    }
}

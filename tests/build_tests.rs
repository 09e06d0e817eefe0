//! 构建与回读的集成测试

use comicforge::{BookMetadata, Epub, EpubBuilder, EpubError, Opf};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::{CompressionMethod, ZipArchive};

/// 在临时目录中写入若干假图片，内容各不相同
fn create_images(dir: &TempDir, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.path().join(name);
            fs::write(&path, format!("\u{FF}\u{D8}{}", name)).expect("写入测试图片失败");
            path
        })
        .collect()
}

fn read_entry(path: &Path, name: &str) -> String {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut content = String::new();
    archive.by_name(name).unwrap().read_to_string(&mut content).unwrap();
    content
}

#[test]
fn test_two_images_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let images = create_images(&dir, &["a.jpg", "b.jpg"]);
    let output = dir.path().join("test.epub");

    let path = EpubBuilder::new(BookMetadata::new("Test Book"))
        .unwrap()
        .with_output(&output)
        .run(|builder| builder.add_images(&images))
        .unwrap();
    assert_eq!(path, output);

    // mimetype是第一个条目且未压缩
    let mut archive = ZipArchive::new(File::open(&output).unwrap()).unwrap();
    {
        let mut first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), CompressionMethod::Stored);
        let mut content = String::new();
        first.read_to_string(&mut content).unwrap();
        assert_eq!(content, "application/epub+zip");
    }
    assert_eq!(archive.by_index(1).unwrap().name(), "META-INF/container.xml");

    // 图片原样写入
    let mut copied = Vec::new();
    archive
        .by_name("OEBPS/Image/1.jpg")
        .unwrap()
        .read_to_end(&mut copied)
        .unwrap();
    assert_eq!(copied, fs::read(&images[1]).unwrap());

    let opf = Opf::parse_xml(&read_entry(&output, "OEBPS/content.opf")).unwrap();
    assert_eq!(opf.version, "3.0");
    assert_eq!(opf.metadata.title, "Test Book");
    assert_eq!(opf.metadata.creator(), "Unknown");
    assert_eq!(opf.metadata.title_sort(), "Test Book");
    assert_eq!(opf.spine_toc.as_deref(), Some("ncx"));

    let spine: Vec<_> = opf.spine.iter().map(|item| item.idref.as_str()).collect();
    assert_eq!(spine, vec!["html0", "html1"]);

    let manifest: Vec<_> = opf.manifest.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(manifest, vec!["nav", "css", "html0", "img0", "html1", "img1", "ncx"]);
    assert_eq!(opf.get_image_paths(), vec!["Image/0.jpg", "Image/1.jpg"]);
    assert_eq!(opf.get_css_paths(), vec!["CSS/stylesheet.css"]);

    // OPF与NCX使用同一个标识符
    let mut epub = Epub::new(&output).unwrap();
    let ncx = epub.parse_ncx().unwrap().expect("缺少NCX");
    let identifier = opf.identifier.clone().expect("缺少dc:identifier");
    assert!(identifier.starts_with("urn:uuid:"));
    assert_eq!(ncx.get_uid(), Some(identifier.as_str()));
    assert_eq!(ncx.get_title(), Some("Test Book"));

    let points = ncx.get_all_nav_points();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].nav_label.text, "Start");
    assert_eq!(points[0].content.src, "0.xhtml");
    assert!(points[0].id.chars().next().is_some_and(|c| c.is_ascii_lowercase()));

    let labels: Vec<_> = epub
        .nav_links()
        .unwrap()
        .into_iter()
        .map(|link| (link.href, link.label))
        .collect();
    assert_eq!(
        labels,
        vec![
            ("0.xhtml".to_string(), "Page 1".to_string()),
            ("1.xhtml".to_string(), "Page 2".to_string()),
        ]
    );

    assert_eq!(
        epub.page_images().unwrap(),
        vec!["OEBPS/Image/0.jpg", "OEBPS/Image/1.jpg"]
    );
}

#[test]
fn test_reading_order_follows_add_order() {
    let dir = tempfile::tempdir().unwrap();
    let images = create_images(&dir, &["c.jpg", "a.jpg", "b.jpg"]);
    let output = dir.path().join("order.epub");

    let mut builder = EpubBuilder::new(BookMetadata::new("Order")).unwrap().with_output(&output);
    for image in &images {
        builder.add_image(image).unwrap();
    }
    builder.finish().unwrap();

    let mut archive = ZipArchive::new(File::open(&output).unwrap()).unwrap();
    for (index, image) in images.iter().enumerate() {
        let mut copied = Vec::new();
        archive
            .by_name(&format!("OEBPS/Image/{}.jpg", index))
            .unwrap()
            .read_to_end(&mut copied)
            .unwrap();
        assert_eq!(copied, fs::read(image).unwrap());
    }
}

#[test]
fn test_series_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let images = create_images(&dir, &["1.jpg"]);
    let metadata = BookMetadata::new("进击的巨人 第1卷")
        .with_creator("諫山創")
        .with_title_sort("Shingeki no Kyojin 01")
        .with_series("进击的巨人", Some("1".to_string()))
        .with_language("ja");

    let output = EpubBuilder::new(metadata)
        .unwrap()
        .with_output_dir(dir.path())
        .run(|builder| builder.add_images(&images))
        .unwrap();
    assert_eq!(output, dir.path().join("进击的巨人_第1卷.epub"));

    let info = Epub::new(&output).unwrap().get_book_info().unwrap();
    assert_eq!(info.creator, "諫山創");
    assert_eq!(info.language, "ja");
    assert_eq!(info.series.as_deref(), Some("进击的巨人"));
    assert_eq!(info.series_index.as_deref(), Some("1"));
    assert_eq!(info.page_count, 1);
    assert_eq!(info.image_count, 1);
}

#[test]
fn test_failed_scope_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut images = create_images(&dir, &["a.jpg"]);
    images.push(dir.path().join("missing.jpg"));
    let output = dir.path().join("broken.epub");

    let result = EpubBuilder::new(BookMetadata::new("Broken"))
        .unwrap()
        .with_output(&output)
        .run(|builder| builder.add_images(&images));

    match result {
        Err(EpubError::ImageRead { path, .. }) => assert_eq!(path, images[1]),
        other => panic!("期望ImageRead错误, 实际: {:?}", other),
    }
    assert!(!output.exists());
    // 目录中只剩测试图片
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_zero_images_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("empty.epub");

    let builder = EpubBuilder::new(BookMetadata::new("Empty")).unwrap().with_output(&output);
    assert!(matches!(builder.finish(), Err(EpubError::NoImages)));
    assert!(!output.exists());
}

#[test]
fn test_existing_output_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let images = create_images(&dir, &["a.jpg"]);
    let output = dir.path().join("again.epub");
    fs::write(&output, b"not an epub").unwrap();

    EpubBuilder::new(BookMetadata::new("Again"))
        .unwrap()
        .with_output(&output)
        .run(|builder| builder.add_images(&images))
        .unwrap();

    assert!(comicforge::open(&output).is_ok());
}

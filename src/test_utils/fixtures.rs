//! Archive and registry fixtures.
//!
//! Release archives are built on the fly so tests can shape their layout
//! (wrapped, flat, missing executable) without checked-in binaries.

use flate2::Compression;
use flate2::write::GzEncoder;
use serde_json::json;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;

/// Write a gzip-compressed tarball at `path` holding `entries`
/// (`(archive path, contents)`), all with mode `0o755`.
///
/// # Panics
///
/// Panics if the archive cannot be written.
pub fn write_tar_gz(path: &Path, entries: &[(&str, &[u8])]) {
    let file = File::create(path).expect("create tar.gz fixture");
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, name, *data).expect("append tar entry");
    }

    builder.into_inner().expect("finish tar").finish().expect("finish gzip");
}

/// Write a gzip-compressed tarball at `path` whose only entry `name` is a
/// symbolic link to `target`.
///
/// # Panics
///
/// Panics if the archive cannot be written.
pub fn write_tar_gz_symlink(path: &Path, name: &str, target: &Path) {
    let file = File::create(path).expect("create tar.gz fixture");
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Symlink);
    header.set_size(0);
    header.set_mode(0o777);
    builder.append_link(&mut header, name, target).expect("append tar link");

    builder.into_inner().expect("finish tar").finish().expect("finish gzip");
}

/// Write a zip archive at `path` holding `entries`.
///
/// # Panics
///
/// Panics if the archive cannot be written.
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = File::create(path).expect("create zip fixture");
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().unix_permissions(0o755);

    for (name, data) in entries {
        zip.start_file(*name, options).expect("start zip entry");
        zip.write_all(data).expect("write zip entry");
    }

    zip.finish().expect("finish zip");
}

/// Registry response body for release `tag` with `assets`
/// (`(name, download url)`).
#[must_use]
pub fn release_json(tag: &str, assets: &[(&str, &str)]) -> String {
    let assets: Vec<_> = assets
        .iter()
        .map(|(name, url)| {
            json!({
                "name": name,
                "browser_download_url": url,
                "content_type": "application/octet-stream",
            })
        })
        .collect();

    json!({
        "tag_name": tag,
        "name": tag,
        "draft": false,
        "prerelease": false,
        "assets": assets,
    })
    .to_string()
}

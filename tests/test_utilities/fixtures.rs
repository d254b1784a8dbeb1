use base64::Engine as _;
use flate2::write::GzEncoder;
use flate2::Compression;
use registry_gate::ingestion::domain::{DependencyMap, PackageName, ResolvedPackage, Version};
use registry_gate::prelude::*;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

pub const BRACES_PACKAGE_JSON: &str = r#"{
  "name": "braces",
  "version": "3.0.3",
  "main": "index.js",
  "repository": "micromatch/braces",
  "dependencies": { "fill-range": "^7.1.1" }
}"#;

pub const BRACES_INDEX_JS: &str = "// expand braces\nfunction expand ( pattern ) {\n    return [ pattern ];\n}\nmodule.exports = expand;\n";

/// Builds a deflated zip from `(path, contents)` pairs
pub fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (path, contents) in entries {
        writer.start_file(path.to_string(), options).unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Zip of the braces package as a user would upload it
pub fn braces_zip() -> Vec<u8> {
    build_zip(&[
        ("braces/package.json", BRACES_PACKAGE_JSON),
        ("braces/README.md", "# braces\n"),
        ("braces/index.js", BRACES_INDEX_JS),
    ])
}

/// Gzipped tarball laid out the way `npm pack` does (`package/` prefix)
pub fn npm_tarball(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (path, contents) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_path(format!("package/{}", path)).unwrap();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append(&header, contents.as_bytes()).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

pub fn braces_tarball() -> Vec<u8> {
    npm_tarball(&[
        ("package.json", BRACES_PACKAGE_JSON),
        ("README.md", "# braces\n"),
        ("index.js", BRACES_INDEX_JS),
    ])
}

pub fn encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub fn decode(content: &str) -> Vec<u8> {
    base64::engine::general_purpose::STANDARD
        .decode(content)
        .unwrap()
}

/// Stored record of an already-ingested package with the given runtime dependencies
pub fn stored_record(name: &str, version: &str, deps: &[&str]) -> PackageRecord {
    let runtime: DependencyMap = deps
        .iter()
        .map(|dep| (dep.to_string(), "^1.0.0".to_string()))
        .collect();
    let package = ResolvedPackage::new(
        PackageName::new(name.to_string()).unwrap(),
        Version::new(version.to_string()).unwrap(),
        vec![],
    )
    .with_dependencies(runtime, DependencyMap::new())
    .with_readme(format!("# {}", name));
    PackageRecord::from_resolved(&package, &Rating::unscored()).unwrap()
}

/// Reads one file out of a zip archive
pub fn zip_entry(archive: &[u8], path: &str) -> Option<String> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).ok()?;
    let mut file = zip.by_name(path).ok()?;
    let mut contents = String::new();
    std::io::Read::read_to_string(&mut file, &mut contents).ok()?;
    Some(contents)
}

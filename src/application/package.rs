//! Artifact Packaging
//!
//! Packs the configured includes into a gzip tarball named after the
//! artifact id and fingerprints it with MD5.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use ignore::WalkBuilder;
use md5::{Digest, Md5};

use crate::config::Include;
use crate::domain::entities::DeployContext;
use crate::domain::ports::remote_join;
use crate::domain::value_objects::{Artifact, ArtifactId, StepError, StepResult};
use crate::error::PackageError;

pub const PACKING: &str = "· packing...";

/// Read size used when hashing archives
pub const HASH_BLOCK_SIZE: usize = 64 * 1024;

/// Directory names never shipped
pub const BUILD_CACHE_DIRS: &[&str] = &["__pycache__", ".pytest_cache", ".mypy_cache"];

fn is_build_cache(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| BUILD_CACHE_DIRS.contains(&n))
}

/// Write a gzip tarball of `includes` (relative to `root`) to `dest`
///
/// Directories are walked in file-name order and headers carry no mtime or
/// ownership, so identical contents always produce identical bytes.
pub fn create_archive(root: &Path, includes: &[Include], dest: &Path) -> Result<(), PackageError> {
    let encoder = GzEncoder::new(File::create(dest)?, Compression::default());
    let mut tar = tar::Builder::new(encoder);
    tar.mode(tar::HeaderMode::Deterministic);

    for include in includes {
        let source = root.join(include.path());
        if !source.exists() {
            return Err(PackageError::MissingInclude(include.path().to_path_buf()));
        }
        let name = include.archive_name();

        if source.is_file() {
            tar.append_path_with_name(&source, &name)?;
            continue;
        }

        let walker = WalkBuilder::new(&source)
            .standard_filters(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(|entry| !is_build_cache(entry.path()))
            .build();

        for entry in walker {
            let entry = entry.map_err(|e| PackageError::Walk {
                path: source.clone(),
                source: e,
            })?;
            let relative = entry.path().strip_prefix(&source).unwrap_or(entry.path());
            let entry_name = name.join(relative);

            if entry.path().is_dir() {
                tar.append_dir(&entry_name, entry.path())?;
            } else {
                tar.append_path_with_name(entry.path(), &entry_name)?;
            }
        }
    }

    tar.into_inner()?.finish()?;
    Ok(())
}

/// Hex MD5 digest of everything `reader` yields, read `block_size` at a time
pub fn md5_reader<R: Read>(mut reader: R, block_size: usize) -> io::Result<String> {
    let mut hasher = Md5::new();
    let mut buf = vec![0u8; block_size.max(1)];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

pub fn md5_file(path: &Path) -> io::Result<String> {
    md5_reader(File::open(path)?, HASH_BLOCK_SIZE)
}

/// Build the artifact for this run and record it in the context
pub fn pack_project(ctx: &mut DeployContext) -> StepResult {
    let product = ctx
        .build
        .product
        .clone()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| StepError::fatal("dont know the product name"))?;
    let app_path = ctx.app_path()?.to_string();

    let id = ArtifactId::new(
        product,
        ctx.timestamp,
        ctx.local_version.clone(),
        &ctx.commit_hash,
    );
    let file_name = id.file_name();

    let artifact_dir = ctx.local_root.join(&ctx.build.artifact_dir);
    std::fs::create_dir_all(&artifact_dir)?;
    let local_path = artifact_dir.join(&file_name);

    create_archive(&ctx.local_root, &ctx.build.includes, &local_path)?;
    let md5 = md5_file(&local_path)?;
    tracing::info!(artifact = %id, %md5, "packed artifact");

    ctx.artifact = Some(Artifact {
        deploy_path: remote_join(&app_path, &id.to_string()),
        id,
        file_name,
        local_path,
        md5,
    });
    Ok(())
}

// download.rs — Model file download with digest logging.
//
// Downloads bge-large-en-v1.5 from the Hugging Face hub on first use, caches
// locally at ~/.corpus-embed/models/. Hub revisions are not hash-pinned, so
// the SHA256 of each file is computed while streaming and logged; a corrupt
// download can be identified from the log and the cache directory wiped.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use sha2::{Digest, Sha256};

use crate::config;

/// Returns the local model directory path (~/.corpus-embed/models/bge-large-en-v1.5/).
pub fn model_dir() -> anyhow::Result<PathBuf> {
    let home = dirs_home()?;
    Ok(home.join(config::embedding::MODEL_DIR_REL))
}

/// Check if all required model files exist locally.
pub fn model_files_exist() -> anyhow::Result<bool> {
    let dir = model_dir()?;
    Ok(dir.join("model.safetensors").exists()
        && dir.join("tokenizer.json").exists()
        && dir.join("config.json").exists())
}

/// Download all model files if not already cached. Returns the model directory path.
pub fn ensure_model_files() -> anyhow::Result<PathBuf> {
    let dir = model_dir()?;

    if model_files_exist()? {
        log::info!("Model files already cached at {}", dir.display());
        return Ok(dir);
    }

    log::info!("Downloading embedding model to {}", dir.display());
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create model dir {}", dir.display()))?;

    let base = config::embedding::MODEL_HUB_BASE;

    download_file(&format!("{base}/model.safetensors"), &dir.join("model.safetensors"))?;
    download_file(&format!("{base}/tokenizer.json"), &dir.join("tokenizer.json"))?;
    download_file(&format!("{base}/config.json"), &dir.join("config.json"))?;

    log::info!("Model download complete");
    Ok(dir)
}

/// Download a file from URL, streaming to disk while hashing.
fn download_file(url: &str, dest: &Path) -> anyhow::Result<()> {
    let filename = dest.file_name().unwrap_or_default().to_string_lossy();
    log::info!("Downloading {} from {}", filename, url);

    let resp = ureq::get(url)
        .timeout(std::time::Duration::from_secs(config::embedding::DOWNLOAD_TIMEOUT_SECS))
        .call()
        .with_context(|| format!("failed to download {url}"))?;

    let status = resp.status();
    if status != 200 {
        bail!("HTTP {status} downloading {url}");
    }

    // Stream to a staging file (model.safetensors is ~1.3 GB, too large to
    // buffer in memory), hashing as we go.
    let tmp_path = dest.with_extension("tmp");
    let mut file = fs::File::create(&tmp_path)
        .with_context(|| format!("failed to create {}", tmp_path.display()))?;

    let mut reader = resp.into_reader();
    let mut hasher = Sha256::new();
    let mut total: u64 = 0;
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = reader
            .read(&mut buf)
            .with_context(|| format!("failed reading response body for {url}"))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        file.write_all(&buf[..n])
            .with_context(|| format!("failed writing {}", tmp_path.display()))?;
        total += n as u64;
    }
    file.flush()?;
    drop(file);

    let digest = hex::encode(hasher.finalize());
    log::info!("Downloaded {} ({} bytes, sha256 {})", filename, total, &digest[..12]);

    fs::rename(&tmp_path, dest)
        .with_context(|| format!("failed to rename {} -> {}", tmp_path.display(), dest.display()))?;

    Ok(())
}

/// Get the user's home directory.
fn dirs_home() -> anyhow::Result<PathBuf> {
    // Use $HOME on all platforms (macOS, Linux, Windows via MSYS/Git Bash)
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .context("cannot determine home directory (neither HOME nor USERPROFILE is set)")
}

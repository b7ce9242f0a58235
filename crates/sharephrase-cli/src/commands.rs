//! Subcommand implementations
//!
//! Each command writes its result to the given writer so it can be tested
//! without touching the process's stdout.

use anyhow::{Context, Result};
use serde::Serialize;
use sharephrase_vss::{PedersenVss, Share, ShareInfo, VssConfig};
use std::io::{Read, Write};
use std::path::Path;
use zeroize::Zeroizing;

/// Per-share line of `verify` output
#[derive(Debug, Serialize)]
pub struct VerifyReport {
    pub index: usize,
    pub id: Option<u8>,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Read a secret, dropping one trailing newline unless `raw`
pub fn read_secret(mut input: impl Read, raw: bool) -> Result<Zeroizing<Vec<u8>>> {
    let mut secret = Zeroizing::new(Vec::new());
    input
        .read_to_end(&mut *secret)
        .context("Failed to read secret from stdin")?;

    if !raw {
        if secret.ends_with(b"\r\n") {
            let len = secret.len();
            secret.truncate(len - 2);
        } else if secret.ends_with(b"\n") {
            let len = secret.len();
            secret.truncate(len - 1);
        }
    }

    anyhow::ensure!(!secret.is_empty(), "Secret is empty");
    Ok(secret)
}

/// Load shares from a JSON file: an array of `{key, key_check}` objects, or
/// a single object. `-` reads stdin.
pub fn read_shares(path: &Path) -> Result<Vec<Share>> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read shares from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read shares file: {}", path.display()))?
    };

    parse_shares(&contents)
}

pub fn parse_shares(contents: &str) -> Result<Vec<Share>> {
    if let Ok(shares) = serde_json::from_str::<Vec<Share>>(contents) {
        return Ok(shares);
    }
    let share: Share =
        serde_json::from_str(contents).context("Shares must be JSON ({key, key_check} or a list)")?;
    Ok(vec![share])
}

pub fn split(vss: &PedersenVss, config: VssConfig, secret: &[u8], out: &mut impl Write) -> Result<()> {
    config.validate().context("Invalid split parameters")?;

    let shares = vss
        .split_secret(secret, config.total_shares, config.threshold)
        .context("Failed to split secret")?;

    log::info!(
        "Created {} shares, any {} reconstruct",
        shares.len(),
        config.threshold
    );

    serde_json::to_writer_pretty(&mut *out, &shares)?;
    writeln!(out)?;
    Ok(())
}

/// Verify every share; fails if any share is invalid or malformed
pub fn verify(vss: &PedersenVss, shares: &[Share], out: &mut impl Write) -> Result<()> {
    anyhow::ensure!(!shares.is_empty(), "No shares to verify");

    let reports: Vec<VerifyReport> = shares
        .iter()
        .enumerate()
        .map(|(index, share)| {
            let id = vss.inspect_share(share).ok().map(|info| info.id);
            match vss.verify_share(share) {
                Ok(valid) => VerifyReport {
                    index,
                    id,
                    valid,
                    error: None,
                },
                Err(e) => VerifyReport {
                    index,
                    id,
                    valid: false,
                    error: Some(e.to_string()),
                },
            }
        })
        .collect();

    serde_json::to_writer_pretty(&mut *out, &reports)?;
    writeln!(out)?;

    let failed = reports.iter().filter(|r| !r.valid).count();
    anyhow::ensure!(failed == 0, "{} of {} shares failed verification", failed, reports.len());
    Ok(())
}

/// Rebuild the secret and write its raw bytes
pub fn combine(vss: &PedersenVss, shares: &[Share], out: &mut impl Write) -> Result<()> {
    let secret = Zeroizing::new(
        vss.reconstruct_secret(shares)
            .context("Failed to reconstruct secret")?,
    );
    out.write_all(&secret)?;
    out.flush()?;
    Ok(())
}

pub fn inspect(vss: &PedersenVss, shares: &[Share], out: &mut impl Write) -> Result<()> {
    let infos = shares
        .iter()
        .enumerate()
        .map(|(index, share)| {
            vss.inspect_share(share)
                .with_context(|| format!("Share {} is malformed", index))
        })
        .collect::<Result<Vec<ShareInfo>>>()?;

    serde_json::to_writer_pretty(&mut *out, &infos)?;
    writeln!(out)?;
    Ok(())
}

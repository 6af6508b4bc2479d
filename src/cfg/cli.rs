// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Makes the keyfile argument absolute, the same way the certificate
/// codec resolves relative paths: against the current working directory,
/// without touching the filesystem. Keeping the two in agreement means
/// `keyfile_name` and the derived certificate base directory describe
/// the same location. A missing file surfaces later, when it is read.
pub fn absolute_keyfile_path(arg: &str) -> Result<PathBuf> {
    let path = Path::new(arg);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("cannot get current working dir")?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_input_is_untouched() {
        let p = absolute_keyfile_path("/etc/profiles/lan.nmconnection").expect("path");
        assert_eq!(p, Path::new("/etc/profiles/lan.nmconnection"));
    }

    #[test]
    fn relative_input_is_anchored_to_cwd() {
        let p = absolute_keyfile_path("profiles/lan.nmconnection").expect("path");
        assert!(p.is_absolute());
        assert!(p.ends_with("profiles/lan.nmconnection"));
    }
}
